// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Consumer contract for renderers and input dispatchers.
//!
//! Strata resolves snapshots but never paints pixels or routes touches.
//! Downstream collaborators plug in here:
//!
//! - **Renderer / hardware composer**: walks the visible prefix of the
//!   snapshot array in ascending z order and composites each entry.
//!
//! - **Input dispatcher**: reads [`InputInfo`] from each snapshot that
//!   carries an input channel and builds its hit-test list.
//!
//! Both see the same frozen array. The builder mutates it in place on the
//! next update, so consumers must finish reading (or copy what they need)
//! before then.
//!
//! [`InputInfo`]: crate::input::InputInfo

use crate::snapshot::LayerSnapshot;

/// Receives the resolved snapshot array after an update.
///
/// # Update loop pseudocode
///
/// ```rust,ignore
/// fn on_commit(store: &mut SceneStore, displays: &Displays) {
///     // Resolve: flatten the tree into ordered snapshots
///     builder.update(&store.update_args(displays));
///
///     // Present: hand the frozen array to each consumer
///     builder.present(&mut renderer);
///     builder.present(&mut input_dispatcher);
///
///     // Commit: the change masks have been consumed
///     store.commit();
/// }
/// ```
pub trait SnapshotConsumer {
    /// Consumes the snapshot array, ordered by ascending z among visible
    /// entries; invisible entries follow the visible ones.
    fn consume(&mut self, snapshots: &[LayerSnapshot]);
}
