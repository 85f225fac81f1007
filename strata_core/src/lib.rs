// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene-graph flattening for display compositing.
//!
//! `strata_core` turns a tree of client-submitted layer descriptors into a
//! flat, z-ordered list of fully resolved [`LayerSnapshot`]s, once per
//! frame. Each snapshot carries absolute geometry, visibility, blending,
//! rounded-corner, shadow and input hit-test state, ready for a renderer and
//! an input dispatcher. It is `no_std` compatible (with `alloc`).
//!
//! # Architecture
//!
//! ```text
//!   SceneStore (descriptors + change masks)
//!       │  update_args()
//!       ▼
//!   UpdateArgs ──► SnapshotBuilder::update() ──► [LayerSnapshot] (z-ordered)
//!                        │                              │
//!                        │ fast path / full walk        ▼
//!                        │ geometry + input     SnapshotConsumer::consume()
//!                        ▼
//!                  z-order sort, eviction
//!       ▲
//!   SceneStore::commit() (clears change masks)
//! ```
//!
//! **[`scene`]**: The tree owner. Holds descriptors, the layer hierarchy with
//! Attached / Detached / Relative / Mirror edges, and traversal keys.
//!
//! **[`snapshot`]**: The engine. Snapshot storage, geometry composition,
//! input geometry translation, z-order sorting and the update driver.
//!
//! **[`changes`]**: Change kinds recorded by descriptor setters and consumed
//! by the update driver to decide what to recompute.
//!
//! **[`output`]**: Display registry consulted for rotation, security and the
//! screen-to-display transform.
//!
//! **[`region`]**: Integer rectangles and overflow-safe region transforms
//! used for hit-testing.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and update events,
//! with a zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies.
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-snapshot
//!   update events.
//!
//! [`LayerSnapshot`]: snapshot::LayerSnapshot

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod buffer;
pub mod changes;
pub mod color;
pub mod consumer;
pub mod effects;
pub mod input;
pub mod metadata;
pub mod output;
pub mod region;
pub mod scene;
pub mod snapshot;
pub mod trace;
pub mod transform;
