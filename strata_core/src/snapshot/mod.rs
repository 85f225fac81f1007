// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Snapshot resolution.
//!
//! A [`LayerSnapshot`] is the resolved state of one occurrence of a layer.
//! The [`SnapshotBuilder`] keeps one per [`TraversalPath`] in a
//! [`SnapshotStore`] and brings them up to date each frame:
//!
//! - Geometry composition: local and absolute transforms, bounds,
//!   rounded-corner inheritance and shadows.
//! - Input geometry: display-space hit-test frames and drop-input policy.
//! - Z order: visible snapshots are moved to the front of the array in
//!   draw order.
//!
//! [`TraversalPath`]: crate::scene::TraversalPath

mod builder;
mod geometry;
mod input_geometry;
mod layer_snapshot;
mod store;
mod zorder;

pub use builder::{SnapshotBuilder, UpdateArgs};
pub use input_geometry::{input_bounds, input_transform};
pub use layer_snapshot::{BlendMode, LayerSnapshot, OutputFilter, RoundedCornerState};
pub use store::SnapshotStore;
