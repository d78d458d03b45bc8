// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Spiralbook Contributors

//! Book model assembly.
//!
//! [`BookModel::build`] turns a validated [`BookConfig`] plus a
//! [`ContentSource`] into a scene graph: a root group, a container group
//! holding the spiral rings, and one pivot group per turnable surface
//! (front cover, each page, static back cover). Each pivot's rotation
//! axis runs through the hole centerline, so turning a surface is a pure
//! rotation of its group. Pivot order and depth are fixed at build time;
//! a page-count change means a full rebuild.

pub mod content;
pub mod controller;
pub mod decals;

use crate::config::BookConfig;
use crate::error::ConfigError;
use crate::geometry::{Mesh, Solid};
use crate::scene::{Material, NodeId, NodeTag, SceneGraph, Side};
use crate::store::SurfaceId;
use content::ContentSource;
use std::f64::consts::{FRAC_PI_2, PI};
use std::sync::Arc;

/// Pages are trimmed this much relative to the covers, on both axes.
pub const PAGE_TRIM: f64 = 0.1;
/// Content planes float this far off the panel surface.
const CONTENT_EPS: f64 = 0.0005;
/// Decals float further out than content planes.
const DECAL_EPS: f64 = 0.001;
/// Side length of the square page-number decal plane.
const DECAL_SIZE: f64 = 0.5;
/// Decal center inset from the outer panel corner.
const DECAL_INSET: f64 = 0.25;

const RING_RADIAL_SEGMENTS: u32 = 16;
const RING_TUBULAR_SEGMENTS: u32 = 32;
/// Rings twist slightly around vertical so the wire gap faces away.
const RING_TILT_Y: f64 = -0.25;

/// Index into the model's pivot list, also carried by scene-node tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PivotId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    FrontCover,
    /// 0-based page index.
    Page(usize),
    BackCover,
}

impl SurfaceKind {
    fn surface_id(&self) -> SurfaceId {
        match *self {
            SurfaceKind::FrontCover => SurfaceId::CoverFront,
            SurfaceKind::Page(index) => SurfaceId::Page(index + 1),
            SurfaceKind::BackCover => SurfaceId::CoverBack,
        }
    }
}

/// One turnable (or static back) surface and its fixed layout values.
#[derive(Debug, Clone)]
pub struct SurfacePivot {
    pub id: PivotId,
    pub kind: SurfaceKind,
    /// The pivot group in the scene graph.
    pub node: NodeId,
    pub turned: bool,
    pub animating: bool,
    /// Rotation the surface returns to when closed.
    pub base_angle: f64,
    /// Depth along the stacking axis when closed.
    pub base_z: f64,
}

/// A built book: the scene graph plus the pivot chain the controller
/// drives.
#[derive(Debug)]
pub struct BookModel {
    config: BookConfig,
    pub graph: SceneGraph,
    root: NodeId,
    container: NodeId,
    pivots: Vec<SurfacePivot>,
    group_animating: bool,
}

impl BookModel {
    /// Assemble the model. Fails on invalid dimensions with no partial
    /// graph produced.
    pub fn build(config: BookConfig, content: &dyn ContentSource) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut builder = Builder::new(config, content);
        builder.rings();
        builder.surfaces();
        Ok(builder.finish())
    }

    pub fn config(&self) -> &BookConfig {
        &self.config
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn pivots(&self) -> &[SurfacePivot] {
        &self.pivots
    }

    pub fn pivot(&self, id: PivotId) -> &SurfacePivot {
        &self.pivots[id.0]
    }

    pub fn pivot_mut(&mut self, id: PivotId) -> &mut SurfacePivot {
        &mut self.pivots[id.0]
    }

    pub fn front_cover(&self) -> PivotId {
        PivotId(0)
    }

    pub fn back_cover(&self) -> PivotId {
        PivotId(self.pivots.len() - 1)
    }

    /// Pivot of the 0-based page `index`.
    pub fn page(&self, index: usize) -> PivotId {
        PivotId(1 + index)
    }

    /// Pivots that can turn, in chain order (back cover excluded).
    pub fn turnable_pivots(&self) -> impl Iterator<Item = &SurfacePivot> {
        self.pivots[..self.pivots.len() - 1].iter()
    }

    pub fn page_pivots(&self) -> impl Iterator<Item = &SurfacePivot> {
        self.pivots[1..self.pivots.len() - 1].iter()
    }

    /// Map a hit-tested node to its owning pivot via typed tags.
    pub fn resolve_pivot(&self, node: NodeId) -> Option<PivotId> {
        self.graph.resolve_pivot(node)
    }

    pub fn group_animating(&self) -> bool {
        self.group_animating
    }

    pub(crate) fn set_group_animating(&mut self, animating: bool) {
        self.group_animating = animating;
    }
}

/// Gentle bob and yaw applied by the host while the book sits closed.
/// Returns `(y_offset, yaw_radians)` for the root group.
pub fn idle_sway(elapsed_ms: f64) -> (f64, f64) {
    let bob = (elapsed_ms * 0.001).sin() * 0.1;
    let yaw = (elapsed_ms * 0.0005).sin() * 0.1;
    (bob, yaw)
}

struct Builder<'a> {
    config: BookConfig,
    content: &'a dyn ContentSource,
    graph: SceneGraph,
    root: NodeId,
    container: NodeId,
    pivots: Vec<SurfacePivot>,
}

impl<'a> Builder<'a> {
    fn new(config: BookConfig, content: &'a dyn ContentSource) -> Self {
        let mut graph = SceneGraph::new();
        let root = graph.add_group(None, NodeTag::None);
        let container = graph.add_group(Some(root), NodeTag::None);
        Self {
            config,
            content,
            graph,
            root,
            container,
            pivots: Vec::new(),
        }
    }

    fn cover_material() -> Material {
        Material::standard(
            [0xd4 as f32 / 255.0, 0xa3 as f32 / 255.0, 0x73 as f32 / 255.0, 1.0],
            0.7,
            0.0,
        )
    }

    fn page_material() -> Material {
        Material::standard([1.0, 1.0, 1.0, 1.0], 0.9, 0.0)
    }

    fn wire_material() -> Material {
        Material::standard(
            [0x33 as f32 / 255.0, 0x33 as f32 / 255.0, 0x33 as f32 / 255.0, 1.0],
            0.4,
            0.6,
        )
    }

    /// One ring per hole, sharing a single torus mesh, centered as a
    /// group on the vertical axis.
    fn rings(&mut self) {
        let count = self.config.hole_count();
        let mesh = Arc::new(
            Solid::ring(
                self.config.spiral_radius,
                self.config.wire_thickness,
                RING_RADIAL_SEGMENTS,
                RING_TUBULAR_SEGMENTS,
            )
            .to_mesh(),
        );
        let spacing = self.config.spiral_spacing;
        let span = (count as f64 - 1.0) * spacing;
        for index in 0..count {
            let node = self.graph.add_mesh(
                self.container,
                Arc::clone(&mesh),
                Self::wire_material(),
                NodeTag::Ring,
            );
            let transform = &mut self.graph.node_mut(node).transform;
            transform.position.y = index as f64 * spacing - span / 2.0;
            transform.rotation.x = FRAC_PI_2;
            transform.rotation.y = RING_TILT_Y;
        }
    }

    fn surfaces(&mut self) {
        let config = self.config;
        let hole_count = config.hole_count();

        let cover_mesh = Arc::new(
            Solid::holed_panel(
                config.width,
                config.height,
                config.cover_thickness,
                hole_count,
                config.hole_radius,
                config.hole_margin,
                config.spiral_spacing,
            )
            .to_mesh(),
        );
        let page_mesh = Arc::new(
            Solid::holed_panel(
                config.width - PAGE_TRIM,
                config.height - PAGE_TRIM,
                config.page_thickness,
                hole_count,
                config.hole_radius,
                config.hole_margin,
                config.spiral_spacing,
            )
            .to_mesh(),
        );

        let count = config.page_count;
        let back_cover_z =
            -config.cover_thickness - count as f64 * config.page_thickness;

        self.surface(SurfaceKind::FrontCover, 0.0, &cover_mesh);
        for index in 0..count {
            let z = -config.cover_thickness / 2.0
                - config.page_thickness / 2.0
                - index as f64 * config.page_thickness;
            self.surface(SurfaceKind::Page(index), z, &page_mesh);
        }
        self.surface(SurfaceKind::BackCover, back_cover_z, &cover_mesh);
    }

    fn surface(&mut self, kind: SurfaceKind, base_z: f64, mesh: &Arc<Mesh>) {
        let id = PivotId(self.pivots.len());
        let pivot_node = self.graph.add_group(Some(self.container), NodeTag::Pivot(id));
        self.graph.node_mut(pivot_node).transform.position.z = base_z;

        let material = match kind {
            SurfaceKind::Page(_) => Self::page_material(),
            _ => Self::cover_material(),
        };
        self.graph
            .add_mesh(pivot_node, Arc::clone(mesh), material, NodeTag::Surface(id));

        let (panel_width, panel_height, panel_thickness) = match kind {
            SurfaceKind::Page(_) => (
                self.config.width - PAGE_TRIM,
                self.config.height - PAGE_TRIM,
                self.config.page_thickness,
            ),
            _ => (self.config.width, self.config.height, self.config.cover_thickness),
        };
        let content_width = panel_width - self.config.hole_margin;
        self.content_planes(
            id,
            pivot_node,
            kind.surface_id(),
            content_width,
            panel_height,
            panel_thickness,
        );
        if let SurfaceKind::Page(index) = kind {
            self.decals(id, pivot_node, index, content_width, panel_thickness);
        }

        self.pivots.push(SurfacePivot {
            id,
            kind,
            node: pivot_node,
            turned: false,
            animating: false,
            base_angle: 0.0,
            base_z,
        });
    }

    /// Front and back overlay quads over the printable area. A stored
    /// texture makes the quad opaque; otherwise it stays transparent but
    /// hit-testable.
    fn content_planes(
        &mut self,
        id: PivotId,
        pivot_node: NodeId,
        surface: SurfaceId,
        width: f64,
        height: f64,
        thickness: f64,
    ) {
        let mesh = Arc::new(Solid::plane(width, height).to_mesh());
        for side in [Side::Front, Side::Back] {
            let material = match self.content.texture(surface, side) {
                Some(texture) => Material::overlay().with_texture(texture),
                None => Material::overlay(),
            };
            let node = self.graph.add_mesh(
                pivot_node,
                Arc::clone(&mesh),
                material,
                NodeTag::Content { pivot: id, side },
            );
            let transform = &mut self.graph.node_mut(node).transform;
            transform.position.x = self.config.spiral_radius + width / 2.0;
            match side {
                Side::Front => transform.position.z = thickness / 2.0 + CONTENT_EPS,
                Side::Back => {
                    transform.position.z = -(thickness / 2.0 + CONTENT_EPS);
                    transform.rotation.y = PI;
                }
            }
        }
    }

    /// Page-number decals in the outer bottom corner: odd numbers face
    /// front, even numbers face back. The vertical inset is measured
    /// from the full cover height, not the trimmed page, so decals line
    /// up across sheets.
    fn decals(
        &mut self,
        id: PivotId,
        pivot_node: NodeId,
        page_index: usize,
        content_width: f64,
        thickness: f64,
    ) {
        let mesh = Arc::new(Solid::plane(DECAL_SIZE, DECAL_SIZE).to_mesh());
        for side in [Side::Front, Side::Back] {
            let number = match side {
                Side::Front => 2 * page_index + 1,
                Side::Back => 2 * page_index + 2,
            };
            let texture = Arc::new(decals::page_number_texture(number));
            let node = self.graph.add_mesh(
                pivot_node,
                Arc::clone(&mesh),
                Material::overlay().with_texture(texture),
                NodeTag::Decal { pivot: id, side },
            );
            let transform = &mut self.graph.node_mut(node).transform;
            transform.position.x =
                self.config.spiral_radius + content_width - DECAL_INSET;
            transform.position.y = -self.config.height / 2.0 + DECAL_INSET;
            match side {
                Side::Front => transform.position.z = thickness / 2.0 + DECAL_EPS,
                Side::Back => {
                    transform.position.z = -(thickness / 2.0 + DECAL_EPS);
                    transform.rotation.y = PI;
                }
            }
        }
    }

    fn finish(self) -> BookModel {
        BookModel {
            config: self.config,
            graph: self.graph,
            root: self.root,
            container: self.container,
            pivots: self.pivots,
            group_animating: false,
        }
    }
}
