// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Spiralbook Contributors

//! Deterministic solid generation for the book model.
//!
//! Every generator here is a pure function of its numeric parameters:
//! the same inputs always produce the same mesh, vertex for vertex.

pub mod mesh;
pub mod panel;
pub mod ring;

pub use mesh::{Mesh, Triangle, Vertex};

use nalgebra::{Point3, Vector3};
use std::collections::HashMap;

/// The solids the book model is assembled from.
pub enum Solid {
    /// Rectangular panel extruded to `thickness`, with `hole_count`
    /// circular holes along the bound edge, pitched `hole_pitch` apart and
    /// vertically centered as a group, hole centers `hole_margin` in from
    /// the edge. The local origin is normalized so the hole centerline
    /// lies on x=0 with the extrusion midplane at z=0.
    HoledPanel {
        width: f64,
        height: f64,
        thickness: f64,
        hole_count: usize,
        hole_radius: f64,
        hole_margin: f64,
        hole_pitch: f64,
    },
    /// Torus used for the spiral-wire loops.
    Ring {
        radius: f64,
        tube_radius: f64,
        radial_segments: u32,
        tubular_segments: u32,
    },
    /// Flat quad centered on the origin, facing +z. Used for content
    /// overlays and decals.
    Plane { width: f64, height: f64 },
}

impl Solid {
    #[allow(clippy::too_many_arguments)]
    pub fn holed_panel(
        width: f64,
        height: f64,
        thickness: f64,
        hole_count: usize,
        hole_radius: f64,
        hole_margin: f64,
        hole_pitch: f64,
    ) -> Self {
        Self::HoledPanel {
            width,
            height,
            thickness,
            hole_count,
            hole_radius,
            hole_margin,
            hole_pitch,
        }
    }

    pub fn ring(radius: f64, tube_radius: f64, radial_segments: u32, tubular_segments: u32) -> Self {
        Self::Ring {
            radius,
            tube_radius,
            radial_segments,
            tubular_segments,
        }
    }

    pub fn plane(width: f64, height: f64) -> Self {
        Self::Plane { width, height }
    }

    pub fn to_mesh(&self) -> Mesh {
        match *self {
            Self::HoledPanel {
                width,
                height,
                thickness,
                hole_count,
                hole_radius,
                hole_margin,
                hole_pitch,
            } => panel::generate_holed_panel(
                width,
                height,
                thickness,
                hole_count,
                hole_radius,
                hole_margin,
                hole_pitch,
            ),
            Self::Ring {
                radius,
                tube_radius,
                radial_segments,
                tubular_segments,
            } => ring::generate_ring_mesh(radius, tube_radius, radial_segments, tubular_segments),
            Self::Plane { width, height } => generate_plane_mesh(width, height),
        }
    }
}

fn generate_plane_mesh(width: f64, height: f64) -> Mesh {
    let mut mesh = Mesh::with_capacity(4, 2);
    let normal = Vector3::z();
    let hw = width / 2.0;
    let hh = height / 2.0;

    let bl = mesh.add_vertex(Vertex::new(Point3::new(-hw, -hh, 0.0), normal));
    let br = mesh.add_vertex(Vertex::new(Point3::new(hw, -hh, 0.0), normal));
    let tr = mesh.add_vertex(Vertex::new(Point3::new(hw, hh, 0.0), normal));
    let tl = mesh.add_vertex(Vertex::new(Point3::new(-hw, hh, 0.0), normal));

    mesh.add_triangle(Triangle::new([bl, br, tr]));
    mesh.add_triangle(Triangle::new([bl, tr, tl]));
    mesh
}

/// True when every edge of the mesh is shared by exactly two triangles
/// (positions compared after welding). Open or T-junctioned surfaces fail.
pub fn is_closed(mesh: &Mesh) -> bool {
    let mut welded = mesh.clone();
    welded.weld_vertices(1e-9);

    let mut edge_counts: HashMap<(usize, usize), usize> = HashMap::new();
    for triangle in &welded.triangles {
        let [a, b, c] = triangle.indices;
        for (u, v) in [(a, b), (b, c), (c, a)] {
            let key = (u.min(v), u.max(v));
            *edge_counts.entry(key).or_insert(0) += 1;
        }
    }
    !edge_counts.is_empty() && edge_counts.values().all(|&count| count == 2)
}
