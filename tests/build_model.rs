// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Spiralbook Contributors

//! End-to-end build checks: store in, scene graph out.

use base64::Engine;
use spiralbook::store::{save_page_count, texture_key};
use spiralbook::{
    build_from_store, BookConfig, BookModel, ConfigStore, MemoryStore, NoContent, NodeTag,
    Side, SurfaceId, SurfaceKind,
};
use std::sync::Arc;

fn png_data_url(r: u8, g: u8, b: u8) -> String {
    let mut image = image::RgbaImage::new(4, 4);
    for pixel in image.pixels_mut() {
        *pixel = image::Rgba([r, g, b, 255]);
    }
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(image)
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(&bytes)
    )
}

fn content_material(model: &BookModel, pivot: spiralbook::PivotId, side: Side) -> spiralbook::scene::Material {
    let pivot_node = model.pivot(pivot).node;
    let node = model
        .graph
        .children(pivot_node)
        .iter()
        .find(|&&n| model.graph.node(n).tag == NodeTag::Content { pivot, side })
        .copied()
        .unwrap();
    model.graph.node(node).material.clone().unwrap()
}

#[test]
fn build_produces_page_count_plus_two_pivots() {
    for pages in [1, 4, 15, 40] {
        let config = BookConfig::default().with_page_count(pages);
        let model = BookModel::build(config, &NoContent).unwrap();
        assert_eq!(model.pivots().len(), pages + 2);

        let depths: Vec<f64> = model.pivots().iter().map(|p| p.base_z).collect();
        let mut sorted = depths.clone();
        sorted.sort_by(|a, b| b.partial_cmp(a).unwrap());
        assert_eq!(depths, sorted, "depths ordered along the chain");
        for pair in depths.windows(2) {
            assert!(pair[0] > pair[1], "depths are unique and monotonic");
        }
    }
}

#[test]
fn pivot_kinds_follow_the_chain_order() {
    let model = BookModel::build(BookConfig::default().with_page_count(3), &NoContent).unwrap();
    let kinds: Vec<SurfaceKind> = model.pivots().iter().map(|p| p.kind).collect();
    assert_eq!(
        kinds,
        vec![
            SurfaceKind::FrontCover,
            SurfaceKind::Page(0),
            SurfaceKind::Page(1),
            SurfaceKind::Page(2),
            SurfaceKind::BackCover,
        ]
    );
}

#[test]
fn all_pages_share_one_panel_mesh() {
    let model = BookModel::build(BookConfig::default().with_page_count(10), &NoContent).unwrap();
    let meshes: Vec<Arc<spiralbook::geometry::Mesh>> = model
        .graph
        .iter()
        .filter(|(_, node)| matches!(node.tag, NodeTag::Surface(_)))
        .filter(|(id, _)| {
            let pivot = model.resolve_pivot(*id).unwrap();
            matches!(model.pivot(pivot).kind, SurfaceKind::Page(_))
        })
        .map(|(_, node)| node.mesh.clone().unwrap())
        .collect();
    assert_eq!(meshes.len(), 10);
    for mesh in &meshes[1..] {
        assert!(Arc::ptr_eq(&meshes[0], mesh));
    }
}

#[test]
fn stored_textures_bind_and_mark_faces_opaque() {
    let mut store = MemoryStore::new();
    save_page_count(&mut store, 2);
    store.set(
        &texture_key(SurfaceId::Page(1), Side::Front),
        &png_data_url(200, 10, 10),
    );

    let model = build_from_store(&store).unwrap();
    let textured = content_material(&model, model.page(0), Side::Front);
    assert!(textured.opaque);
    let texture = textured.texture.unwrap();
    assert_eq!(&texture.rgba[..4], &[200, 10, 10, 255]);

    let blank = content_material(&model, model.page(0), Side::Back);
    assert!(!blank.opaque);
    assert!(blank.texture.is_none());
}

#[test]
fn corrupt_texture_leaves_the_face_transparent() {
    let mut store = MemoryStore::new();
    save_page_count(&mut store, 1);
    store.set(&texture_key(SurfaceId::Page(1), Side::Front), "not a url");

    let model = build_from_store(&store).unwrap();
    let material = content_material(&model, model.page(0), Side::Front);
    assert!(!material.opaque);
    assert!(material.texture.is_none());
}

#[test]
fn legacy_cover_back_texture_is_picked_up() {
    let mut store = MemoryStore::new();
    save_page_count(&mut store, 1);
    store.set("texture_cover-back", &png_data_url(1, 2, 3));

    let model = build_from_store(&store).unwrap();
    let front = content_material(&model, model.back_cover(), Side::Front);
    assert!(front.opaque);
    let back = content_material(&model, model.back_cover(), Side::Back);
    assert!(!back.opaque);
}

#[test]
fn empty_store_builds_the_default_book() {
    let model = build_from_store(&MemoryStore::new()).unwrap();
    assert_eq!(model.config().page_count, 15);
    assert_eq!(model.pivots().len(), 17);
}

#[test]
fn every_content_plane_resolves_to_its_pivot() {
    let model = BookModel::build(BookConfig::default().with_page_count(2), &NoContent).unwrap();
    for (id, node) in model.graph.iter() {
        if let NodeTag::Content { pivot, .. } = node.tag {
            assert_eq!(model.resolve_pivot(id), Some(pivot));
        }
    }
}
