// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Spiralbook Contributors

//! Book build parameters

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Parameters for one spiral-notebook build. Immutable per build; a
/// page-count change requires a full rebuild, not an incremental resize.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookConfig {
    pub width: f64,
    pub height: f64,
    pub cover_thickness: f64,
    pub page_thickness: f64,
    pub spiral_radius: f64,
    pub spiral_spacing: f64,
    pub wire_thickness: f64,
    pub hole_radius: f64,
    pub hole_margin: f64,
    pub page_count: usize,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            width: 3.5,
            height: 5.0,
            cover_thickness: 0.05,
            page_thickness: 0.005,
            spiral_radius: 0.2,
            spiral_spacing: 0.25,
            wire_thickness: 0.025,
            hole_radius: 0.08,
            hole_margin: 0.15,
            page_count: 15,
        }
    }
}

impl BookConfig {
    /// Number of spiral holes punched along the bound edge. One ring is
    /// threaded per hole.
    pub fn hole_count(&self) -> usize {
        (self.height / self.spiral_spacing).floor() as usize
    }

    /// Reject parameter sets that cannot produce a coherent solid.
    /// Failing here guarantees no partial scene graph is ever built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dims = [
            ("width", self.width),
            ("height", self.height),
            ("coverThickness", self.cover_thickness),
            ("pageThickness", self.page_thickness),
            ("spiralRadius", self.spiral_radius),
            ("spiralSpacing", self.spiral_spacing),
            ("wireThickness", self.wire_thickness),
            ("holeRadius", self.hole_radius),
            ("holeMargin", self.hole_margin),
        ];
        for (field, value) in dims {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NonPositiveDimension { field, value });
            }
        }

        if self.height < self.spiral_spacing || self.height <= crate::book::PAGE_TRIM {
            return Err(ConfigError::TooShort {
                height: self.height,
                spacing: self.spiral_spacing,
            });
        }
        if 2.0 * self.hole_radius >= self.spiral_spacing {
            return Err(ConfigError::HoleTooLarge {
                radius: self.hole_radius,
                spacing: self.spiral_spacing,
            });
        }
        if self.hole_margin <= self.hole_radius {
            return Err(ConfigError::MarginTooSmall {
                margin: self.hole_margin,
                radius: self.hole_radius,
            });
        }
        // The page panel is trimmed narrower than the cover; the hole band
        // must still fit inside it with room left for content.
        if self.width - crate::book::PAGE_TRIM <= 2.0 * self.hole_margin {
            return Err(ConfigError::TooNarrow { width: self.width });
        }

        Ok(())
    }

    /// Same parameters with a different page count.
    pub fn with_page_count(mut self, page_count: usize) -> Self {
        self.page_count = page_count;
        self
    }
}
