// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Spiralbook Contributors

//! Persisted configuration and texture store.
//!
//! The store is a flat string-key/string-value space shared with the
//! page editor. Schema:
//!
//! - `book_config`: JSON `{"pageCount": <int>}`
//! - `texture_<surfaceId>-front` / `texture_<surfaceId>-back`: image
//!   payloads as base64 data URLs, where surfaceId is `cover-front`,
//!   `cover-back` or `page-<1..pageCount>`
//! - `texture_cover-back`: legacy unsuffixed key, honored as a fallback
//!   for the front side of the back cover only
//!
//! A missing key means "no override". Corrupt values are recovered with
//! defaults and logged, never surfaced visually.

pub mod editor;

use crate::error::StorageError;
use crate::scene::Side;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Store key holding the persisted book configuration.
pub const BOOK_CONFIG_KEY: &str = "book_config";

/// Page count used when no configuration has been persisted yet.
pub const DEFAULT_PAGE_COUNT: usize = 15;

/// String key/value store persisted across sessions.
pub trait ConfigStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// Identifies one turnable (or cover) surface in store keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceId {
    CoverFront,
    CoverBack,
    /// 1-based page number, matching the editor's labeling.
    Page(usize),
}

impl SurfaceId {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cover-front" => Some(SurfaceId::CoverFront),
            "cover-back" => Some(SurfaceId::CoverBack),
            _ => {
                let number = s.strip_prefix("page-")?.parse::<usize>().ok()?;
                (number >= 1).then_some(SurfaceId::Page(number))
            }
        }
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceId::CoverFront => write!(f, "cover-front"),
            SurfaceId::CoverBack => write!(f, "cover-back"),
            SurfaceId::Page(number) => write!(f, "page-{number}"),
        }
    }
}

/// Store key for one face of one surface.
pub fn texture_key(surface: SurfaceId, side: Side) -> String {
    format!("texture_{surface}-{}", side.as_str())
}

/// Legacy key retained from before textures were split per side.
pub fn legacy_cover_back_key() -> String {
    format!("texture_{}", SurfaceId::CoverBack)
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedConfig {
    page_count: usize,
}

/// Read the persisted page count, recovering to the default on a missing
/// or corrupt record.
pub fn load_page_count(store: &dyn ConfigStore) -> usize {
    let Some(raw) = store.get(BOOK_CONFIG_KEY) else {
        return DEFAULT_PAGE_COUNT;
    };
    match serde_json::from_str::<PersistedConfig>(&raw) {
        Ok(config) => config.page_count,
        Err(err) => {
            let error = StorageError::Malformed {
                key: BOOK_CONFIG_KEY.to_string(),
                reason: err.to_string(),
            };
            warn!(%error, "falling back to {DEFAULT_PAGE_COUNT} pages");
            DEFAULT_PAGE_COUNT
        }
    }
}

/// Persist the page count.
pub fn save_page_count(store: &mut dyn ConfigStore, page_count: usize) {
    let record = PersistedConfig { page_count };
    let json = serde_json::to_string(&record).expect("page count record serializes");
    store.set(BOOK_CONFIG_KEY, &json);
}

/// In-memory store for tests and embedding hosts.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Store backed by a single JSON object file. Mutations are buffered in
/// memory; call [`JsonFileStore::persist`] to write them back.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl JsonFileStore {
    /// Load the store, treating a missing file as empty. A corrupt file
    /// is a [`StorageError`]; callers decide whether starting over is
    /// acceptable.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).map_err(|err| StorageError::Malformed {
                key: path.display().to_string(),
                reason: err.to_string(),
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => {
                return Err(StorageError::Io {
                    path: path.display().to_string(),
                    source: err,
                })
            }
        };
        Ok(Self { path, entries })
    }

    /// Write the current entries back to disk.
    pub fn persist(&self) -> Result<(), StorageError> {
        let json =
            serde_json::to_string_pretty(&self.entries).expect("string map serializes");
        std::fs::write(&self.path, json).map_err(|err| StorageError::Io {
            path: self.path.display().to_string(),
            source: err,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texture_keys_match_the_store_schema() {
        assert_eq!(
            texture_key(SurfaceId::CoverFront, Side::Front),
            "texture_cover-front-front"
        );
        assert_eq!(
            texture_key(SurfaceId::Page(3), Side::Back),
            "texture_page-3-back"
        );
        assert_eq!(legacy_cover_back_key(), "texture_cover-back");
    }

    #[test]
    fn surface_id_round_trips_through_parse() {
        for id in [SurfaceId::CoverFront, SurfaceId::CoverBack, SurfaceId::Page(7)] {
            assert_eq!(SurfaceId::parse(&id.to_string()), Some(id));
        }
        assert_eq!(SurfaceId::parse("page-0"), None);
        assert_eq!(SurfaceId::parse("spine"), None);
    }

    #[test]
    fn missing_config_falls_back_to_default() {
        let store = MemoryStore::new();
        assert_eq!(load_page_count(&store), DEFAULT_PAGE_COUNT);
    }

    #[test]
    fn corrupt_config_falls_back_to_default() {
        let mut store = MemoryStore::new();
        store.set(BOOK_CONFIG_KEY, "{not json");
        assert_eq!(load_page_count(&store), DEFAULT_PAGE_COUNT);
    }

    #[test]
    fn page_count_round_trips() {
        let mut store = MemoryStore::new();
        save_page_count(&mut store, 42);
        assert_eq!(load_page_count(&store), 42);
    }

    #[test]
    fn json_file_store_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.json");

        let mut store = JsonFileStore::load(&path).unwrap();
        store.set("texture_page-1-front", "data:image/png;base64,AAAA");
        save_page_count(&mut store, 3);
        store.persist().unwrap();

        let reloaded = JsonFileStore::load(&path).unwrap();
        assert_eq!(load_page_count(&reloaded), 3);
        assert_eq!(
            reloaded.get("texture_page-1-front").as_deref(),
            Some("data:image/png;base64,AAAA")
        );
    }

    #[test]
    fn corrupt_store_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            JsonFileStore::load(&path),
            Err(StorageError::Malformed { .. })
        ));
    }
}
