// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw-order assignment.

use super::SnapshotStore;
use crate::changes::Changes;
use crate::scene::LayerHierarchy;

/// Reorders `store` so visible snapshots occupy the front of the array in
/// z order. Everything after them is marked invisible.
///
/// Skipped unless `force` is set or `global` contains a hierarchy or
/// visibility change. Returns the number of visible snapshots, or `None`
/// if the pass was skipped.
pub(crate) fn sort_snapshots_by_z(
    store: &mut SnapshotStore,
    hierarchy: &LayerHierarchy,
    force: bool,
    global: Changes,
) -> Option<usize> {
    if !force && !global.intersects(Changes::HIERARCHY | Changes::VISIBILITY) {
        return None;
    }

    let mut next = 0;
    hierarchy.traverse_in_z_order(|path| {
        let Some(idx) = store.index_of(path) else {
            return false;
        };
        let snapshot = store.at(idx);
        if snapshot.is_hidden_by_policy() && !snapshot.changes.contains(Changes::VISIBILITY) {
            return false;
        }
        if snapshot.is_visible {
            store.swap(idx, next);
            next += 1;
        }
        true
    });

    let visible = next;
    for (pos, snapshot) in store.iter_mut().enumerate().skip(visible) {
        snapshot.global_z = pos;
        snapshot.is_visible = false;
    }
    Some(visible)
}
