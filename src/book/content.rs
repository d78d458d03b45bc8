// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Spiralbook Contributors

//! Resolves user content for book surfaces at build time.
//!
//! Content arrives as base64 data URLs (the editor stores images that
//! way) and is decoded to RGBA here. A surface without content keeps its
//! overlay plane transparent but hit-testable; decode failures degrade
//! the same way, with a warning.

use crate::error::AssetError;
use crate::scene::{Side, TextureData};
use crate::store::{legacy_cover_back_key, texture_key, ConfigStore, SurfaceId};
use base64::Engine;
use std::sync::Arc;
use tracing::warn;

/// Supplies decoded textures for surfaces during a build.
pub trait ContentSource {
    fn texture(&self, surface: SurfaceId, side: Side) -> Option<Arc<TextureData>>;
}

/// A source with no content; every surface stays blank.
pub struct NoContent;

impl ContentSource for NoContent {
    fn texture(&self, _surface: SurfaceId, _side: Side) -> Option<Arc<TextureData>> {
        None
    }
}

/// Content source reading data URLs out of a [`ConfigStore`].
pub struct StoreContent<'a> {
    store: &'a dyn ConfigStore,
}

impl<'a> StoreContent<'a> {
    pub fn new(store: &'a dyn ConfigStore) -> Self {
        Self { store }
    }

    fn raw(&self, surface: SurfaceId, side: Side) -> Option<String> {
        if let Some(value) = self.store.get(&texture_key(surface, side)) {
            return Some(value);
        }
        // Back-cover front textures persisted before sides were split
        // live under an unsuffixed key.
        if surface == SurfaceId::CoverBack && side == Side::Front {
            return self.store.get(&legacy_cover_back_key());
        }
        None
    }
}

impl ContentSource for StoreContent<'_> {
    fn texture(&self, surface: SurfaceId, side: Side) -> Option<Arc<TextureData>> {
        let raw = self.raw(surface, side)?;
        match decode_data_url(&raw) {
            Ok(texture) => Some(Arc::new(texture)),
            Err(error) => {
                warn!(%surface, side = side.as_str(), %error, "skipping unreadable texture");
                None
            }
        }
    }
}

/// Decode a `data:<mime>;base64,<payload>` URL to RGBA pixels.
pub fn decode_data_url(url: &str) -> Result<TextureData, AssetError> {
    let rest = url.strip_prefix("data:").ok_or(AssetError::NotDataUrl)?;
    let (_mime, payload) = rest.split_once(";base64,").ok_or(AssetError::NotDataUrl)?;
    let bytes = base64::engine::general_purpose::STANDARD.decode(payload)?;
    let image = image::load_from_memory(&bytes)?.to_rgba8();
    let (width, height) = image.dimensions();
    Ok(TextureData {
        width,
        height,
        rgba: image.into_raw(),
    })
}
