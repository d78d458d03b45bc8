// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Spiralbook Contributors

//! Mesh representation and utilities

use nalgebra::{Point3, Vector3};

/// Vertex with position and normal
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f64>,
    pub normal: Vector3<f64>,
}

impl Vertex {
    pub fn new(position: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self { position, normal }
    }
}

/// Triangle defined by three vertex indices
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    pub indices: [usize; 3],
}

impl Triangle {
    pub fn new(indices: [usize; 3]) -> Self {
        Self { indices }
    }
}

/// Triangular mesh
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            triangles: Vec::with_capacity(triangle_count),
        }
    }

    /// Add a vertex and return its index
    pub fn add_vertex(&mut self, vertex: Vertex) -> usize {
        let index = self.vertices.len();
        self.vertices.push(vertex);
        index
    }

    /// Add a triangle
    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Add a triangle unless it is degenerate (area below `epsilon`).
    /// Panel generation clamps hole rims against the panel boundary, which
    /// can produce zero-area slivers that must not reach the renderer.
    pub fn add_triangle_checked(&mut self, indices: [usize; 3], epsilon: f64) {
        let [a, b, c] = indices;
        if a == b || b == c || a == c {
            return;
        }
        let p0 = self.vertices[a].position;
        let p1 = self.vertices[b].position;
        let p2 = self.vertices[c].position;
        let area = (p1 - p0).cross(&(p2 - p0)).norm() * 0.5;
        if area > epsilon {
            self.triangles.push(Triangle::new(indices));
        }
    }

    /// Translate all vertices. Used to normalize the local origin of
    /// generated solids.
    pub fn translate(&mut self, offset: Vector3<f64>) {
        for vertex in &mut self.vertices {
            vertex.position += offset;
        }
    }

    /// Axis-aligned bounding box as (min, max) corners.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.vertices.first()?;
        let mut min = first.position;
        let mut max = first.position;
        for vertex in &self.vertices[1..] {
            for axis in 0..3 {
                min[axis] = min[axis].min(vertex.position[axis]);
                max[axis] = max[axis].max(vertex.position[axis]);
            }
        }
        Some((min, max))
    }

    /// Sum of triangle areas.
    pub fn surface_area(&self) -> f64 {
        self.triangles
            .iter()
            .map(|triangle| {
                let p0 = self.vertices[triangle.indices[0]].position;
                let p1 = self.vertices[triangle.indices[1]].position;
                let p2 = self.vertices[triangle.indices[2]].position;
                (p1 - p0).cross(&(p2 - p0)).norm() * 0.5
            })
            .sum()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Weld vertices within epsilon distance of each other, remapping
    /// triangle indices. Returns the number of vertices removed.
    pub fn weld_vertices(&mut self, epsilon: f64) -> usize {
        if self.vertices.is_empty() {
            return 0;
        }

        let original_count = self.vertices.len();
        let mut welded: Vec<Vertex> = Vec::new();
        let mut remap: Vec<usize> = vec![0; original_count];

        for i in 0..original_count {
            let position = self.vertices[i].position;
            let existing = welded
                .iter()
                .position(|v| (v.position - position).norm() < epsilon);
            match existing {
                Some(j) => remap[i] = j,
                None => {
                    remap[i] = welded.len();
                    welded.push(self.vertices[i]);
                }
            }
        }

        for triangle in &mut self.triangles {
            for index in &mut triangle.indices {
                *index = remap[*index];
            }
        }
        self.vertices = welded;

        original_count - self.vertices.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn quad() -> Mesh {
        let mut mesh = Mesh::new();
        let n = Vector3::z();
        let a = mesh.add_vertex(Vertex::new(Point3::new(0.0, 0.0, 0.0), n));
        let b = mesh.add_vertex(Vertex::new(Point3::new(1.0, 0.0, 0.0), n));
        let c = mesh.add_vertex(Vertex::new(Point3::new(1.0, 1.0, 0.0), n));
        let d = mesh.add_vertex(Vertex::new(Point3::new(0.0, 1.0, 0.0), n));
        mesh.add_triangle(Triangle::new([a, b, c]));
        mesh.add_triangle(Triangle::new([a, c, d]));
        mesh
    }

    #[test]
    fn surface_area_of_unit_quad() {
        assert_relative_eq!(quad().surface_area(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn bounding_box_spans_vertices() {
        let (min, max) = quad().bounding_box().unwrap();
        assert_relative_eq!(min.x, 0.0);
        assert_relative_eq!(max.x, 1.0);
        assert_relative_eq!(max.y, 1.0);
        assert_relative_eq!(max.z, 0.0);
    }

    #[test]
    fn weld_merges_coincident_vertices() {
        let mut mesh = Mesh::new();
        let n = Vector3::z();
        mesh.add_vertex(Vertex::new(Point3::new(0.0, 0.0, 0.0), n));
        mesh.add_vertex(Vertex::new(Point3::new(0.0, 0.0, 0.0), n));
        let removed = mesh.weld_vertices(1e-9);
        assert_eq!(removed, 1);
        assert_eq!(mesh.vertex_count(), 1);
    }

    #[test]
    fn checked_insert_drops_slivers() {
        let mut mesh = quad();
        let before = mesh.triangle_count();
        mesh.add_triangle_checked([0, 1, 1], 1e-12);
        mesh.add_triangle_checked([0, 0, 2], 1e-12);
        assert_eq!(mesh.triangle_count(), before);
    }

    #[test]
    fn translate_moves_bounding_box() {
        let mut mesh = quad();
        mesh.translate(Vector3::new(-0.5, 0.0, 2.0));
        let (min, max) = mesh.bounding_box().unwrap();
        assert_relative_eq!(min.x, -0.5);
        assert_relative_eq!(max.z, 2.0);
    }
}
