// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scene: layer descriptors, their topology, and change tracking.
//!
//! This is the authoritative side the snapshot builder reads from. Each
//! layer has:
//!
//! - An identity ([`LayerId`]), handed out sequentially and never reused.
//! - A [`LayerDescriptor`] holding the requested state and a [`Changes`]
//!   mask that every setter updates.
//! - Topology: a geometric parent, an optional relative (z-order) parent,
//!   and an optional mirror target, all mutated through [`SceneStore`] so
//!   cycles are rejected.
//!
//! The store derives a [`LayerHierarchy`] from the topology and addresses
//! each occurrence of a layer in it with a [`TraversalPath`].
//!
//! [`Changes`]: crate::changes::Changes

mod descriptor;
mod hierarchy;
mod id;
mod path;
mod store;

pub use descriptor::{CompositionType, LayerDescriptor, LayerFlags};
pub use hierarchy::{Edge, HierarchyNode, LayerHierarchy, Variant};
pub use id::LayerId;
pub use path::{IdChain, ScopedPath, TraversalPath};
pub use store::SceneStore;
