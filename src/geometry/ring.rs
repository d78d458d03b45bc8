// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Spiralbook Contributors

//! Torus solids for the spiral-wire loops

use super::{Mesh, Triangle, Vertex};
use nalgebra::{Point3, Vector3};
use std::f64::consts::TAU;

/// Torus centered on the origin, ring in the xy plane, axis +z.
/// Vertices wrap in both directions, so the mesh is closed and manifold.
pub(crate) fn generate_ring_mesh(
    radius: f64,
    tube_radius: f64,
    radial_segments: u32,
    tubular_segments: u32,
) -> Mesh {
    let radial = radial_segments.max(3) as usize;
    let tubular = tubular_segments.max(3) as usize;

    let mut mesh = Mesh::with_capacity(radial * tubular, 2 * radial * tubular);

    for i in 0..tubular {
        let u = TAU * i as f64 / tubular as f64;
        for j in 0..radial {
            let v = TAU * j as f64 / radial as f64;
            let ring = radius + tube_radius * v.cos();
            let position = Point3::new(ring * u.cos(), ring * u.sin(), tube_radius * v.sin());
            let normal = Vector3::new(v.cos() * u.cos(), v.cos() * u.sin(), v.sin());
            mesh.add_vertex(Vertex::new(position, normal));
        }
    }

    let index = |i: usize, j: usize| (i % tubular) * radial + (j % radial);
    for i in 0..tubular {
        for j in 0..radial {
            let a = index(i, j);
            let b = index(i + 1, j);
            let c = index(i + 1, j + 1);
            let d = index(i, j + 1);
            mesh.add_triangle(Triangle::new([a, b, c]));
            mesh.add_triangle(Triangle::new([a, c, d]));
        }
    }

    mesh
}

#[cfg(test)]
mod tests {
    use crate::geometry::{is_closed, Solid};
    use approx::assert_relative_eq;

    #[test]
    fn ring_is_closed_and_manifold() {
        let mesh = Solid::ring(0.2, 0.025, 16, 32).to_mesh();
        assert_eq!(mesh.vertex_count(), 16 * 32);
        assert_eq!(mesh.triangle_count(), 2 * 16 * 32);
        assert!(is_closed(&mesh));
    }

    #[test]
    fn ring_spans_expected_extents() {
        let mesh = Solid::ring(0.2, 0.025, 16, 32).to_mesh();
        let (min, max) = mesh.bounding_box().unwrap();
        assert_relative_eq!(max.x, 0.225, epsilon = 1e-9);
        assert_relative_eq!(min.x, -0.225, epsilon = 1e-9);
        assert_relative_eq!(max.z, 0.025, epsilon = 1e-9);
    }

    #[test]
    fn normals_point_away_from_the_tube_core() {
        let mesh = Solid::ring(0.2, 0.025, 16, 32).to_mesh();
        for vertex in &mesh.vertices {
            assert_relative_eq!(vertex.normal.norm(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn degenerate_segment_counts_are_clamped() {
        let mesh = Solid::ring(0.2, 0.025, 1, 2).to_mesh();
        assert!(mesh.triangle_count() >= 2 * 3 * 3);
    }
}
