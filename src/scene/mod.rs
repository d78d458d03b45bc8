// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Spiralbook Contributors

//! Arena scene graph emitted by the builder.
//!
//! This is the hand-off surface to the rendering backend: nodes with
//! parent/child links, transforms, optional mesh instances and materials.
//! Nothing here draws; a renderer walks the arena and the host feeds hit
//! results back as [`NodeId`]s.
//!
//! Node metadata is a closed enum with an explicit back-reference to the
//! owning pivot, set once at build time. Hit-testing resolves through it;
//! there is no freeform property bag.

use crate::book::PivotId;
use crate::geometry::Mesh;
use nalgebra::{Matrix4, UnitQuaternion, Vector3};
use std::sync::Arc;

/// Handle into the scene-graph arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// Which face of a surface a plane or decal belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Front,
    Back,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Front => "front",
            Side::Back => "back",
        }
    }
}

/// Typed node metadata. `pivot()` yields the owning pivot where one
/// exists; plain grouping nodes resolve through their ancestors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeTag {
    None,
    Ring,
    /// The rotating anchor group of a turnable (or static back) surface.
    Pivot(PivotId),
    /// The panel mesh of a surface.
    Surface(PivotId),
    /// Content overlay quad for one face of a surface.
    Content { pivot: PivotId, side: Side },
    /// Page-number decal quad.
    Decal { pivot: PivotId, side: Side },
}

impl NodeTag {
    pub fn pivot(&self) -> Option<PivotId> {
        match *self {
            NodeTag::Pivot(p)
            | NodeTag::Surface(p)
            | NodeTag::Content { pivot: p, .. }
            | NodeTag::Decal { pivot: p, .. } => Some(p),
            NodeTag::None | NodeTag::Ring => None,
        }
    }
}

/// Local transform: translation plus XYZ Euler rotation, radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f64>,
    pub rotation: Vector3<f64>,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            position: Vector3::zeros(),
            rotation: Vector3::zeros(),
        }
    }

    /// Compose into a single local matrix.
    pub fn matrix(&self) -> Matrix4<f64> {
        let rx = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), self.rotation.x);
        let ry = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), self.rotation.y);
        let rz = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), self.rotation.z);
        Matrix4::new_translation(&self.position) * (rz * ry * rx).to_homogeneous()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Decoded RGBA texture handed to the renderer.
#[derive(Debug, Clone)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Material description mirroring a physically-based standard material.
#[derive(Debug, Clone)]
pub struct Material {
    pub base_color: [f32; 4],
    pub roughness: f32,
    pub metalness: f32,
    pub double_sided: bool,
    /// Transparent overlays stay hit-testable but draw nothing until a
    /// texture is bound.
    pub opaque: bool,
    pub texture: Option<Arc<TextureData>>,
}

impl Material {
    pub fn standard(base_color: [f32; 4], roughness: f32, metalness: f32) -> Self {
        Self {
            base_color,
            roughness,
            metalness,
            double_sided: true,
            opaque: true,
            texture: None,
        }
    }

    /// Invisible, hit-testable overlay. Binding a texture later marks it
    /// opaque.
    pub fn overlay() -> Self {
        Self {
            base_color: [1.0, 1.0, 1.0, 1.0],
            roughness: 1.0,
            metalness: 0.0,
            double_sided: false,
            opaque: false,
            texture: None,
        }
    }

    pub fn with_texture(mut self, texture: Arc<TextureData>) -> Self {
        self.texture = Some(texture);
        self.opaque = true;
        self
    }
}

/// One node of the arena.
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub transform: Transform,
    pub mesh: Option<Arc<Mesh>>,
    pub material: Option<Material>,
    pub tag: NodeTag,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Scene-graph arena. Nodes are created at build time and persist for
/// the model's lifetime; only transforms and materials mutate afterward.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn add_group(&mut self, parent: Option<NodeId>, tag: NodeTag) -> NodeId {
        self.insert(
            SceneNode {
                transform: Transform::identity(),
                mesh: None,
                material: None,
                tag,
                parent,
                children: Vec::new(),
            },
            parent,
        )
    }

    pub fn add_mesh(
        &mut self,
        parent: NodeId,
        mesh: Arc<Mesh>,
        material: Material,
        tag: NodeTag,
    ) -> NodeId {
        self.insert(
            SceneNode {
                transform: Transform::identity(),
                mesh: Some(mesh),
                material: Some(material),
                tag,
                parent: Some(parent),
                children: Vec::new(),
            },
            Some(parent),
        )
    }

    fn insert(&mut self, node: SceneNode, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    pub fn node(&self, id: NodeId) -> &SceneNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut SceneNode {
        &mut self.nodes[id.0]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Resolve a hit node to its owning pivot, walking ancestors until a
    /// tagged node is found. Returns `None` for rings and loose groups.
    pub fn resolve_pivot(&self, id: NodeId) -> Option<PivotId> {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = &self.nodes[node_id.0];
            if let Some(pivot) = node.tag.pivot() {
                return Some(pivot);
            }
            current = node.parent;
        }
        None
    }

    /// World matrix of a node (product of ancestor transforms).
    pub fn world_matrix(&self, id: NodeId) -> Matrix4<f64> {
        let node = &self.nodes[id.0];
        let local = node.transform.matrix();
        match node.parent {
            Some(parent) => self.world_matrix(parent) * local,
            None => local,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    #[test]
    fn resolve_walks_to_the_tagged_ancestor() {
        let mut graph = SceneGraph::new();
        let root = graph.add_group(None, NodeTag::None);
        let pivot = graph.add_group(Some(root), NodeTag::Pivot(PivotId(3)));
        let child = graph.add_group(Some(pivot), NodeTag::None);

        assert_eq!(graph.resolve_pivot(child), Some(PivotId(3)));
        assert_eq!(graph.resolve_pivot(root), None);
    }

    #[test]
    fn content_tag_resolves_directly() {
        let mut graph = SceneGraph::new();
        let root = graph.add_group(None, NodeTag::None);
        let plane = graph.add_group(
            Some(root),
            NodeTag::Content {
                pivot: PivotId(1),
                side: Side::Back,
            },
        );
        assert_eq!(graph.resolve_pivot(plane), Some(PivotId(1)));
    }

    #[test]
    fn world_matrix_composes_ancestors() {
        let mut graph = SceneGraph::new();
        let root = graph.add_group(None, NodeTag::None);
        graph.node_mut(root).transform.position = Vector3::new(1.0, 0.0, 0.0);
        let child = graph.add_group(Some(root), NodeTag::None);
        graph.node_mut(child).transform.position = Vector3::new(0.0, 2.0, 0.0);

        let world = graph.world_matrix(child);
        let origin = world.transform_point(&Point3::origin());
        assert_relative_eq!(origin.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(origin.y, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn rotation_matrix_turns_about_local_y() {
        let transform = Transform {
            position: Vector3::zeros(),
            rotation: Vector3::new(0.0, std::f64::consts::FRAC_PI_2, 0.0),
        };
        let rotated = transform.matrix().transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(rotated.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(rotated.z, -1.0, epsilon = 1e-12);
    }
}
