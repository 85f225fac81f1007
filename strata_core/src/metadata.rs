// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Key/value metadata attached to layers.
//!
//! Metadata is opaque to the compositor; it is aggregated down the tree so
//! that consumers (e.g. input or accessibility services) can read values
//! inherited from ancestors.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

/// Well-known metadata keys.
pub mod keys {
    /// Owning user id.
    pub const OWNER_UID: u32 = 1;
    /// Window type.
    pub const WINDOW_TYPE: u32 = 2;
    /// Task id.
    pub const TASK_ID: u32 = 3;
    /// Mouse cursor to show over the layer.
    pub const MOUSE_CURSOR: u32 = 4;
    /// Accessibility id.
    pub const ACCESSIBILITY_ID: u32 = 5;
    /// Owning process id.
    pub const OWNER_PID: u32 = 6;
}

/// An ordered map of metadata entries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LayerMetadata {
    entries: BTreeMap<u32, Vec<u8>>,
}

impl LayerMetadata {
    /// Creates empty metadata.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Sets `key`. An empty value removes the key.
    pub fn set(&mut self, key: u32, value: Vec<u8>) {
        if value.is_empty() {
            self.entries.remove(&key);
        } else {
            self.entries.insert(key, value);
        }
    }

    /// Sets `key` to a little-endian `i32`.
    pub fn set_i32(&mut self, key: u32, value: i32) {
        self.set(key, value.to_le_bytes().to_vec());
    }

    /// Returns the raw value for `key`.
    #[must_use]
    pub fn get(&self, key: u32) -> Option<&[u8]> {
        self.entries.get(&key).map(Vec::as_slice)
    }

    /// Returns the value for `key` decoded as a little-endian `i32`.
    #[must_use]
    pub fn get_i32(&self, key: u32) -> Option<i32> {
        let bytes: [u8; 4] = self.get(key)?.try_into().ok()?;
        Some(i32::from_le_bytes(bytes))
    }

    /// Merges `other` into `self`, letting `other` win on conflicts.
    ///
    /// Returns whether anything changed.
    pub fn merge(&mut self, other: &Self) -> bool {
        let mut changed = false;
        for (key, value) in &other.entries {
            if self.entries.get(key) == Some(value) {
                continue;
            }
            changed = true;
            self.set(*key, value.clone());
        }
        changed
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Whether there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
