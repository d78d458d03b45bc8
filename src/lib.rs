// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Spiralbook Contributors

//! Parametric spiral-bound book model.
//!
//! The crate builds an interactive 3D notebook (covers and pages bound
//! by a spiral wire, each turnable in strict front-to-back order) as a
//! renderer-agnostic scene graph, and drives it with a page-turn state
//! machine and a gesture classifier. Persistence (page count and
//! per-surface textures) goes through a pluggable string store shared
//! with the page editor.
//!
//! ```
//! use spiralbook::{build_from_store, store::MemoryStore};
//!
//! let store = MemoryStore::new();
//! let model = build_from_store(&store).unwrap();
//! assert_eq!(model.pivots().len(), 15 + 2);
//! ```

pub mod book;
pub mod config;
pub mod error;
pub mod geometry;
pub mod input;
pub mod scene;
pub mod store;

pub use book::content::{ContentSource, NoContent, StoreContent};
pub use book::controller::{
    AnimTarget, Animator, Channel, Easing, PageTurnController, TransitionRequest,
};
pub use book::{idle_sway, BookModel, PivotId, SurfaceKind, SurfacePivot};
pub use config::BookConfig;
pub use error::{AssetError, ConfigError, EditError, StorageError};
pub use input::{Command, GestureInputMapper, WheelInput};
pub use scene::{NodeId, NodeTag, SceneGraph, Side};
pub use store::{ConfigStore, JsonFileStore, MemoryStore, SurfaceId};

/// Build a model from an explicit config and content source.
pub fn build(config: BookConfig, content: &dyn ContentSource) -> Result<BookModel, ConfigError> {
    BookModel::build(config, content)
}

/// Build a model whose page count and textures both come from a store,
/// the way a hosting application boots.
pub fn build_from_store(store: &dyn ConfigStore) -> Result<BookModel, ConfigError> {
    let config = BookConfig::default().with_page_count(store::load_page_count(store));
    BookModel::build(config, &StoreContent::new(store))
}
