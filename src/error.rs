// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Spiralbook Contributors

//! Error taxonomy
//!
//! Four classes with different recovery contracts:
//!
//! - [`ConfigError`] is fatal to a build; no partial model is produced.
//! - [`StorageError`] is recovered locally with defaults and logged.
//! - [`AssetError`] degrades one content slot to its transparent default.
//! - Illegal turn transitions are not errors at all; the controller
//!   models "turn in order" by returning `false` from the operation.

use thiserror::Error;

/// Invalid build parameters. Rejected before any scene-graph node exists.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be finite and positive (got {value})")]
    NonPositiveDimension { field: &'static str, value: f64 },

    #[error("hole radius {radius} does not fit the spiral pitch {spacing}")]
    HoleTooLarge { radius: f64, spacing: f64 },

    #[error("hole margin {margin} must exceed the hole radius {radius}")]
    MarginTooSmall { margin: f64, radius: f64 },

    #[error("width {width} leaves no printable area beyond the hole band")]
    TooNarrow { width: f64 },

    #[error("height {height} is shorter than one spiral pitch {spacing}")]
    TooShort { height: f64, spacing: f64 },
}

/// A persisted value was missing where required, or failed to parse.
/// Never surfaced visually; callers fall back to defaults.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("malformed value for key `{key}`: {reason}")]
    Malformed { key: String, reason: String },

    #[error("store file `{path}` could not be read or written")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A texture payload could not be decoded. The affected content plane
/// keeps its transparent default; the rest of the build is unaffected.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("texture payload is not a base64 data URL")]
    NotDataUrl,

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("image decode failed: {0}")]
    Decode(#[from] image::ImageError),
}

/// Invalid page-management request on the editor boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    #[error("page index {index} is out of range (1..={count})")]
    OutOfRange { index: usize, count: usize },

    #[error("the book has no pages to remove")]
    NoPages,
}
