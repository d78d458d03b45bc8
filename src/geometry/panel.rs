// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Spiralbook Contributors

//! Holed, extruded panel solids.
//!
//! A panel is a rectangle extruded to its thickness with a column of
//! circular spiral holes punched along the bound edge. The caps are
//! triangulated per hole cell by stitching the hole rim against the cell
//! boundary; side walls and hole tubes close the extrusion. After
//! generation the mesh is translated so the hole centerline sits on x=0
//! and the extrusion midplane on z=0, since the pivot rotation axis must
//! pass exactly through the hole centerline.

use super::{Mesh, Triangle, Vertex};
use nalgebra::{Point3, Vector3};
use std::f64::consts::TAU;

/// Rim resolution of each punched hole.
const HOLE_SEGMENTS: usize = 24;

/// Triangles thinner than this are dropped instead of emitted.
const SLIVER_EPS: f64 = 1e-12;

type Tri2 = [[f64; 2]; 3];

#[allow(clippy::too_many_arguments)]
pub(crate) fn generate_holed_panel(
    width: f64,
    height: f64,
    thickness: f64,
    hole_count: usize,
    hole_radius: f64,
    hole_margin: f64,
    hole_pitch: f64,
) -> Mesh {
    let mut mesh = Mesh::new();
    let half_height = height / 2.0;

    // Hole centers, vertically centered as a group.
    let group_height = hole_count.saturating_sub(1) as f64 * hole_pitch;
    let centers: Vec<f64> = (0..hole_count)
        .map(|i| i as f64 * hole_pitch - group_height / 2.0)
        .collect();

    // --- CAP TRIANGULATION (2D) ---
    let band = 2.0 * hole_margin;
    let mut cap: Vec<Tri2> = Vec::new();

    if hole_count == 0 {
        rect_2d(0.0, -half_height, width, half_height, &mut cap);
    } else {
        for (i, &cy) in centers.iter().enumerate() {
            let cell_bottom = (cy - hole_pitch / 2.0).max(-half_height);
            let cell_top = (cy + hole_pitch / 2.0).min(half_height);
            annulus_cell(
                hole_margin,
                cy,
                0.0,
                band,
                cell_bottom,
                cell_top,
                hole_radius,
                &mut cap,
            );

            // Filler strips below the first and above the last cell.
            if i == 0 && cell_bottom - (-half_height) > 1e-12 {
                rect_2d(0.0, -half_height, band, cell_bottom, &mut cap);
            }
            if i == hole_count - 1 && half_height - cell_top > 1e-12 {
                rect_2d(0.0, cell_top, band, half_height, &mut cap);
            }
        }
        // Plain area beyond the hole band.
        rect_2d(band, -half_height, width, half_height, &mut cap);
    }

    // --- CAPS ---
    let front_normal = Vector3::z();
    let back_normal = -Vector3::z();
    for tri in &cap {
        // Front cap at z = thickness, facing +z.
        let a = mesh.add_vertex(Vertex::new(
            Point3::new(tri[0][0], tri[0][1], thickness),
            front_normal,
        ));
        let b = mesh.add_vertex(Vertex::new(
            Point3::new(tri[1][0], tri[1][1], thickness),
            front_normal,
        ));
        let c = mesh.add_vertex(Vertex::new(
            Point3::new(tri[2][0], tri[2][1], thickness),
            front_normal,
        ));
        mesh.add_triangle_checked([a, b, c], SLIVER_EPS);

        // Back cap at z = 0, reversed winding, facing -z.
        let a = mesh.add_vertex(Vertex::new(
            Point3::new(tri[0][0], tri[0][1], 0.0),
            back_normal,
        ));
        let b = mesh.add_vertex(Vertex::new(
            Point3::new(tri[1][0], tri[1][1], 0.0),
            back_normal,
        ));
        let c = mesh.add_vertex(Vertex::new(
            Point3::new(tri[2][0], tri[2][1], 0.0),
            back_normal,
        ));
        mesh.add_triangle_checked([a, c, b], SLIVER_EPS);
    }

    // --- OUTER WALLS ---
    let t = thickness;
    add_quad(
        &mut mesh,
        [
            [0.0, -half_height, 0.0],
            [0.0, -half_height, t],
            [0.0, half_height, t],
            [0.0, half_height, 0.0],
        ],
        -Vector3::x(),
    );
    add_quad(
        &mut mesh,
        [
            [width, -half_height, 0.0],
            [width, half_height, 0.0],
            [width, half_height, t],
            [width, -half_height, t],
        ],
        Vector3::x(),
    );
    add_quad(
        &mut mesh,
        [
            [0.0, -half_height, 0.0],
            [width, -half_height, 0.0],
            [width, -half_height, t],
            [0.0, -half_height, t],
        ],
        -Vector3::y(),
    );
    add_quad(
        &mut mesh,
        [
            [0.0, half_height, 0.0],
            [0.0, half_height, t],
            [width, half_height, t],
            [width, half_height, 0.0],
        ],
        Vector3::y(),
    );

    // --- HOLE TUBES ---
    for &cy in &centers {
        for k in 0..HOLE_SEGMENTS {
            let a0 = TAU * k as f64 / HOLE_SEGMENTS as f64;
            let a1 = TAU * (k + 1) as f64 / HOLE_SEGMENTS as f64;
            let (x0, y0) = (hole_margin + hole_radius * a0.cos(), cy + hole_radius * a0.sin());
            let (x1, y1) = (hole_margin + hole_radius * a1.cos(), cy + hole_radius * a1.sin());
            let n0 = Vector3::new(-a0.cos(), -a0.sin(), 0.0);
            let n1 = Vector3::new(-a1.cos(), -a1.sin(), 0.0);

            let p00 = mesh.add_vertex(Vertex::new(Point3::new(x0, y0, 0.0), n0));
            let p01 = mesh.add_vertex(Vertex::new(Point3::new(x0, y0, t), n0));
            let p11 = mesh.add_vertex(Vertex::new(Point3::new(x1, y1, t), n1));
            let p10 = mesh.add_vertex(Vertex::new(Point3::new(x1, y1, 0.0), n1));

            mesh.add_triangle_checked([p00, p01, p11], SLIVER_EPS);
            mesh.add_triangle_checked([p00, p11, p10], SLIVER_EPS);
        }
    }

    // Normalize: hole centerline on x=0, extrusion midplane on z=0.
    mesh.translate(Vector3::new(-hole_margin, 0.0, -thickness / 2.0));
    mesh
}

/// Triangulate the region of one hole cell: the rectangle
/// [x0,x1]x[y0,y1] minus the circle of `radius` around (cx, cy).
///
/// The outer ring walks the cell perimeter (hole-angle samples plus the
/// four corners), the inner ring is the hole rim; a two-pointer merge
/// stitches them. Rim samples whose ray would leave the cell are clamped
/// to the rim itself, so a hole grazing the panel edge degrades to
/// skipped slivers instead of inverted triangles.
#[allow(clippy::too_many_arguments)]
fn annulus_cell(
    cx: f64,
    cy: f64,
    x0: f64,
    x1: f64,
    y0: f64,
    y1: f64,
    radius: f64,
    out: &mut Vec<Tri2>,
) {
    let seg = HOLE_SEGMENTS;

    let inner: Vec<(f64, [f64; 2])> = (0..seg)
        .map(|k| {
            let a = TAU * k as f64 / seg as f64;
            (a, [cx + radius * a.cos(), cy + radius * a.sin()])
        })
        .collect();

    let mut outer: Vec<(f64, [f64; 2])> = Vec::with_capacity(seg + 4);
    for k in 0..seg {
        let a = TAU * k as f64 / seg as f64;
        let d = ray_to_rect(cx, cy, a, x0, x1, y0, y1).max(radius);
        outer.push((a, [cx + d * a.cos(), cy + d * a.sin()]));
    }
    for corner in [[x1, y1], [x0, y1], [x0, y0], [x1, y0]] {
        let dx = corner[0] - cx;
        let dy = corner[1] - cy;
        if (dx * dx + dy * dy).sqrt() <= radius {
            continue; // corner swallowed by a clipped hole
        }
        let mut a = dy.atan2(dx);
        if a < 0.0 {
            a += TAU;
        }
        outer.push((a, corner));
    }
    outer.sort_by(|p, q| p.0.partial_cmp(&q.0).unwrap());
    outer.dedup_by(|b, a| (b.0 - a.0).abs() < 1e-9);

    stitch_rings(&outer, &inner, out);
}

/// Distance from (cx, cy) along direction `angle` to the rectangle
/// boundary.
fn ray_to_rect(cx: f64, cy: f64, angle: f64, x0: f64, x1: f64, y0: f64, y1: f64) -> f64 {
    let dx = angle.cos();
    let dy = angle.sin();
    let mut d = f64::INFINITY;
    if dx > 1e-12 {
        d = d.min((x1 - cx) / dx);
    } else if dx < -1e-12 {
        d = d.min((x0 - cx) / dx);
    }
    if dy > 1e-12 {
        d = d.min((y1 - cy) / dy);
    } else if dy < -1e-12 {
        d = d.min((y0 - cy) / dy);
    }
    d
}

/// Stitch two angle-sorted rings (outer boundary, inner hole rim) into a
/// triangle band. Both rings are traversed once; the band is counter-
/// clockwise when the rings are.
fn stitch_rings(outer: &[(f64, [f64; 2])], inner: &[(f64, [f64; 2])], out: &mut Vec<Tri2>) {
    let no = outer.len();
    let ni = inner.len();
    if no == 0 || ni == 0 {
        return;
    }

    let angle_at = |ring: &[(f64, [f64; 2])], idx: usize| -> f64 {
        ring[idx % ring.len()].0 + TAU * (idx / ring.len()) as f64
    };

    let mut i = 0usize;
    let mut j = 0usize;
    while i < ni || j < no {
        let advance_outer = if j >= no {
            false
        } else if i >= ni {
            true
        } else {
            angle_at(outer, j + 1) <= angle_at(inner, i + 1)
        };

        if advance_outer {
            out.push([outer[j % no].1, outer[(j + 1) % no].1, inner[i % ni].1]);
            j += 1;
        } else {
            out.push([outer[j % no].1, inner[(i + 1) % ni].1, inner[i % ni].1]);
            i += 1;
        }
    }
}

fn rect_2d(x0: f64, y0: f64, x1: f64, y1: f64, out: &mut Vec<Tri2>) {
    out.push([[x0, y0], [x1, y0], [x1, y1]]);
    out.push([[x0, y0], [x1, y1], [x0, y1]]);
}

fn add_quad(mesh: &mut Mesh, corners: [[f64; 3]; 4], normal: Vector3<f64>) {
    let idx: Vec<usize> = corners
        .iter()
        .map(|c| mesh.add_vertex(Vertex::new(Point3::new(c[0], c[1], c[2]), normal)))
        .collect();
    mesh.add_triangle(Triangle::new([idx[0], idx[1], idx[2]]));
    mesh.add_triangle(Triangle::new([idx[0], idx[2], idx[3]]));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Solid;
    use approx::assert_relative_eq;

    // Production cover panel: 20 holes tile the height exactly.
    fn cover() -> Mesh {
        Solid::holed_panel(3.5, 5.0, 0.05, 20, 0.08, 0.15, 0.25).to_mesh()
    }

    #[test]
    fn origin_is_normalized_to_the_hole_centerline() {
        let (min, max) = cover().bounding_box().unwrap();
        assert_relative_eq!(min.x, -0.15, epsilon = 1e-9);
        assert_relative_eq!(max.x, 3.35, epsilon = 1e-9);
        assert_relative_eq!(min.y, -2.5, epsilon = 1e-9);
        assert_relative_eq!(max.y, 2.5, epsilon = 1e-9);
        assert_relative_eq!(min.z, -0.025, epsilon = 1e-9);
        assert_relative_eq!(max.z, 0.025, epsilon = 1e-9);
    }

    #[test]
    fn front_cap_area_equals_rect_minus_hole_polygons() {
        let mesh = cover();
        let front_area: f64 = mesh
            .triangles
            .iter()
            .filter(|tri| {
                tri.indices
                    .iter()
                    .all(|&i| (mesh.vertices[i].position.z - 0.025).abs() < 1e-9)
            })
            .map(|tri| {
                let p0 = mesh.vertices[tri.indices[0]].position;
                let p1 = mesh.vertices[tri.indices[1]].position;
                let p2 = mesh.vertices[tri.indices[2]].position;
                (p1 - p0).cross(&(p2 - p0)).norm() * 0.5
            })
            .sum();

        // The rim is an inscribed polygon, so each hole removes the
        // polygon area rather than the full circle area.
        let seg = 24.0_f64;
        let hole_polygon = 0.5 * seg * 0.08 * 0.08 * (TAU / seg).sin();
        let expected = 3.5 * 5.0 - 20.0 * hole_polygon;
        assert_relative_eq!(front_area, expected, epsilon = 1e-6);
    }

    #[test]
    fn no_cap_vertex_falls_inside_a_hole() {
        let mesh = cover();
        let centers: Vec<f64> = (0..20).map(|i| i as f64 * 0.25 - 2.375).collect();
        for vertex in &mesh.vertices {
            if vertex.normal.z.abs() < 0.5 {
                continue; // wall or tube vertex
            }
            for &cy in &centers {
                let d = (vertex.position.x.powi(2) + (vertex.position.y - cy).powi(2)).sqrt();
                assert!(d >= 0.08 - 1e-9, "cap vertex inside hole at y={cy}");
            }
        }
    }

    #[test]
    fn hole_tubes_are_emitted() {
        let mesh = cover();
        let tube_vertices = mesh
            .vertices
            .iter()
            .filter(|v| v.normal.z.abs() < 1e-9 && v.position.x.abs() < 0.09)
            .count();
        // 20 holes x 24 segments x 2 triangles x ... at least the rings exist
        assert!(tube_vertices >= 20 * HOLE_SEGMENTS);
    }

    #[test]
    fn generation_is_deterministic() {
        let a = cover();
        let b = cover();
        assert_eq!(a.vertex_count(), b.vertex_count());
        assert_eq!(a.triangle_count(), b.triangle_count());
        for (va, vb) in a.vertices.iter().zip(&b.vertices) {
            assert_eq!(va.position, vb.position);
        }
    }

    #[test]
    fn trimmed_page_panel_generates_with_clipped_cells() {
        // The production page panel is trimmed shorter than the hole
        // span; outer cells clip against the panel edge.
        let mesh = Solid::holed_panel(3.4, 4.9, 0.005, 20, 0.08, 0.15, 0.25).to_mesh();
        assert!(mesh.triangle_count() > 0);
        let (min, max) = mesh.bounding_box().unwrap();
        assert_relative_eq!(min.y, -2.455, epsilon = 1e-3);
        assert_relative_eq!(max.y, 2.455, epsilon = 1e-3);
    }

    #[test]
    fn zero_holes_yields_a_plain_slab() {
        let mesh = Solid::holed_panel(2.0, 1.0, 0.1, 0, 0.08, 0.15, 0.25).to_mesh();
        // 2 caps x 2 triangles + 4 walls x 2 triangles
        assert_eq!(mesh.triangle_count(), 12);
    }
}
