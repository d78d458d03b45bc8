// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Spiralbook Contributors

//! Page-level edit operations over a [`ConfigStore`].
//!
//! The editor mutates only store state; the host rebuilds the model to
//! see the result. Deleting a page in the middle shifts the texture
//! keys of every later page down so page numbering stays dense.

use crate::error::EditError;
use crate::scene::Side;
use crate::store::{
    load_page_count, save_page_count, texture_key, ConfigStore, SurfaceId,
};

/// Editing facade over a store.
pub struct PageEditor<'a> {
    store: &'a mut dyn ConfigStore,
}

impl<'a> PageEditor<'a> {
    pub fn new(store: &'a mut dyn ConfigStore) -> Self {
        Self { store }
    }

    pub fn page_count(&self) -> usize {
        load_page_count(self.store)
    }

    /// Append a blank page. Returns the new page count.
    pub fn add_page(&mut self) -> usize {
        let count = self.page_count() + 1;
        save_page_count(self.store, count);
        count
    }

    /// Remove the last page and its textures. Returns the new page count.
    pub fn pop_page(&mut self) -> Result<usize, EditError> {
        let count = self.page_count();
        if count == 0 {
            return Err(EditError::NoPages);
        }
        self.clear_texture_pair(SurfaceId::Page(count));
        save_page_count(self.store, count - 1);
        Ok(count - 1)
    }

    /// Remove the page at `index` (1-based). Later pages keep their
    /// content but take over the vacated numbers.
    pub fn delete_page(&mut self, index: usize) -> Result<usize, EditError> {
        let count = self.page_count();
        if count == 0 {
            return Err(EditError::NoPages);
        }
        if index == 0 || index > count {
            return Err(EditError::OutOfRange { index, count });
        }
        for number in index..count {
            for side in [Side::Front, Side::Back] {
                let from = texture_key(SurfaceId::Page(number + 1), side);
                let to = texture_key(SurfaceId::Page(number), side);
                match self.store.get(&from) {
                    Some(value) => self.store.set(&to, &value),
                    None => self.store.remove(&to),
                }
            }
        }
        self.clear_texture_pair(SurfaceId::Page(count));
        save_page_count(self.store, count - 1);
        Ok(count - 1)
    }

    /// Store a data-URL texture for one face of one surface.
    pub fn set_texture(&mut self, surface: SurfaceId, side: Side, data_url: &str) {
        self.store.set(&texture_key(surface, side), data_url);
    }

    /// Drop the stored texture for one face of one surface.
    pub fn clear_texture(&mut self, surface: SurfaceId, side: Side) {
        self.store.remove(&texture_key(surface, side));
    }

    fn clear_texture_pair(&mut self, surface: SurfaceId) {
        self.store.remove(&texture_key(surface, Side::Front));
        self.store.remove(&texture_key(surface, Side::Back));
    }
}
