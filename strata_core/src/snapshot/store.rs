// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat snapshot storage.
//!
//! Snapshots live in one contiguous array whose order is the draw order
//! after a z-order pass. A map from [`TraversalPath`] to array position
//! makes lookups by occurrence cheap. Every entry's
//! [`global_z`](LayerSnapshot::global_z) equals its array position, and
//! every index entry points at the snapshot carrying that path; all
//! mutating operations here keep both in step.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use super::LayerSnapshot;
use crate::scene::{LayerDescriptor, LayerId, TraversalPath};

/// Owns every snapshot and the path-to-position index.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    snapshots: Vec<LayerSnapshot>,
    index: BTreeMap<TraversalPath, usize>,
}

impl SnapshotStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the position of the snapshot for `path`, appending a fresh
    /// one for `layer` if none exists.
    pub fn get_or_create(&mut self, path: &TraversalPath, layer: &LayerDescriptor) -> usize {
        if let Some(&idx) = self.index.get(path) {
            return idx;
        }
        let idx = self.snapshots.len();
        let mut snapshot = LayerSnapshot::new(layer, path.clone());
        snapshot.global_z = idx;
        self.snapshots.push(snapshot);
        self.index.insert(path.clone(), idx);
        idx
    }

    /// Position of the snapshot for `path`.
    #[must_use]
    pub fn index_of(&self, path: &TraversalPath) -> Option<usize> {
        self.index.get(path).copied()
    }

    /// The snapshot for `path`.
    #[must_use]
    pub fn get(&self, path: &TraversalPath) -> Option<&LayerSnapshot> {
        self.index_of(path).map(|idx| &self.snapshots[idx])
    }

    /// The geometric, unmirrored snapshot of `id`.
    #[must_use]
    pub fn get_by_id(&self, id: LayerId) -> Option<&LayerSnapshot> {
        if id.is_invalid() {
            return None;
        }
        self.get(&TraversalPath::of(id))
    }

    /// The snapshot at array position `idx`.
    #[inline]
    #[must_use]
    pub fn at(&self, idx: usize) -> &LayerSnapshot {
        &self.snapshots[idx]
    }

    /// Mutable access to the snapshot at array position `idx`.
    #[inline]
    pub fn at_mut(&mut self, idx: usize) -> &mut LayerSnapshot {
        &mut self.snapshots[idx]
    }

    /// Borrows a parent snapshot immutably and a child snapshot mutably.
    ///
    /// # Panics
    ///
    /// Panics if `parent == child`.
    pub fn pair_mut(&mut self, parent: usize, child: usize) -> (&LayerSnapshot, &mut LayerSnapshot) {
        assert_ne!(parent, child, "a snapshot cannot be its own parent");
        if parent < child {
            let (head, tail) = self.snapshots.split_at_mut(child);
            (&head[parent], &mut tail[0])
        } else {
            let (head, tail) = self.snapshots.split_at_mut(parent);
            (&tail[0], &mut head[child])
        }
    }

    /// Number of snapshots.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether the store holds no snapshots.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// The snapshots in array order.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[LayerSnapshot] {
        &self.snapshots
    }

    /// Mutable iteration in array order.
    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, LayerSnapshot> {
        self.snapshots.iter_mut()
    }

    /// Swaps two array positions, keeping `global_z` and the index
    /// consistent for both entries.
    pub fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.snapshots.swap(a, b);
        self.reseat(a);
        self.reseat(b);
    }

    /// Removes every snapshot whose leaf layer is in `destroyed`.
    ///
    /// Removal swaps the last entry into the vacated slot, so the relative
    /// order of the remaining snapshots is only guaranteed again after the
    /// next z-order pass. Returns the number of snapshots removed.
    pub fn evict(&mut self, destroyed: &[LayerId]) -> usize {
        if destroyed.is_empty() {
            return 0;
        }
        let mut removed = 0;
        let mut idx = 0;
        while idx < self.snapshots.len() {
            if !destroyed.contains(&self.snapshots[idx].path.id) {
                idx += 1;
                continue;
            }
            let gone = self.snapshots.swap_remove(idx);
            self.index.remove(&gone.path);
            if idx < self.snapshots.len() {
                self.reseat(idx);
            }
            removed += 1;
        }
        removed
    }

    /// Asserts that array positions, stored z values and the index agree.
    ///
    /// # Panics
    ///
    /// Panics on the first inconsistency found.
    pub fn check_invariants(&self) {
        assert_eq!(
            self.snapshots.len(),
            self.index.len(),
            "index and array disagree on the snapshot count"
        );
        for (pos, snapshot) in self.snapshots.iter().enumerate() {
            assert_eq!(
                snapshot.global_z, pos,
                "snapshot {:?} stores z {} at position {pos}",
                snapshot.path, snapshot.global_z
            );
            assert_eq!(
                self.index.get(&snapshot.path).copied(),
                Some(pos),
                "index entry for {:?} is stale",
                snapshot.path
            );
        }
    }

    fn reseat(&mut self, idx: usize) {
        let snapshot = &mut self.snapshots[idx];
        snapshot.global_z = idx;
        self.index.insert(snapshot.path.clone(), idx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;

    fn descriptor(id: u32) -> LayerDescriptor {
        LayerDescriptor::new(LayerId(id), String::from("layer"))
    }

    fn store_with(ids: &[u32]) -> SnapshotStore {
        let mut store = SnapshotStore::new();
        for &id in ids {
            store.get_or_create(&TraversalPath::of(LayerId(id)), &descriptor(id));
        }
        store
    }

    #[test]
    fn get_or_create_is_stable() {
        let mut store = store_with(&[1, 2]);
        let again = store.get_or_create(&TraversalPath::of(LayerId(1)), &descriptor(1));
        assert_eq!(again, 0);
        assert_eq!(store.len(), 2);
        assert_eq!(store.at(1).global_z, 1);
        assert_eq!(store.get_by_id(LayerId(2)).map(|s| s.layer_id), Some(LayerId(2)));
        assert!(store.get_by_id(LayerId::INVALID).is_none());
        store.check_invariants();
    }

    #[test]
    fn swap_keeps_index_consistent() {
        let mut store = store_with(&[1, 2, 3]);
        store.swap(0, 2);
        store.check_invariants();
        assert_eq!(store.at(0).layer_id, LayerId(3));
        assert_eq!(store.index_of(&TraversalPath::of(LayerId(1))), Some(2));
    }

    #[test]
    fn evict_removes_all_occurrences() {
        let mut store = store_with(&[1, 2, 3, 4]);
        let mut mirrored = TraversalPath::of(LayerId(2));
        mirrored.mirror_root_ids.push(LayerId(4));
        store.get_or_create(&mirrored, &descriptor(2));

        assert_eq!(store.evict(&[LayerId(2)]), 2);
        store.check_invariants();
        assert_eq!(store.len(), 3);
        assert!(store.get(&mirrored).is_none());
        assert!(store.get_by_id(LayerId(2)).is_none());
    }

    #[test]
    fn evict_last_entry() {
        let mut store = store_with(&[1, 2]);
        assert_eq!(store.evict(&[LayerId(2)]), 1);
        store.check_invariants();
        assert_eq!(store.evict(&[]), 0);
    }

    #[test]
    fn pair_mut_either_order() {
        let mut store = store_with(&[1, 2]);
        {
            let (parent, child) = store.pair_mut(1, 0);
            child.alpha = parent.alpha * 0.5;
        }
        assert_eq!(store.at(0).alpha, 0.5);
        let (parent, child) = store.pair_mut(0, 1);
        assert_eq!(parent.alpha, 0.5);
        child.alpha = 0.25;
    }
}
