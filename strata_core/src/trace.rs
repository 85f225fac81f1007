// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for snapshot updates.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! snapshot builder calls at the start and end of every update. All method
//! bodies default to no-ops, so implementing only the events you care about is
//! fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace` enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`) gates [`SnapshotUpdate`] events and the
//!   corresponding `TraceSink` method.

use crate::changes::Changes;
#[cfg(feature = "trace-rich")]
use crate::scene::LayerId;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which strategy an update took.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UpdatePath {
    /// Nothing changed; only per-frame flags were cleared.
    Unchanged,
    /// Only content changed; affected snapshots were recomputed in place.
    ContentFastPath,
    /// The tree was walked from the root.
    FullWalk,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted before an update does any work.
#[derive(Clone, Copy, Debug)]
pub struct UpdateBeginEvent {
    /// Monotonic update counter.
    pub generation: u64,
    /// Strategy chosen for this update.
    pub path: UpdatePath,
    /// Whether a full update was requested.
    pub forced: bool,
    /// Union of all descriptor change masks since the last commit.
    pub global_changes: Changes,
}

/// Emitted after an update finished.
#[derive(Clone, Copy, Debug)]
pub struct UpdateEndEvent {
    /// Monotonic update counter.
    pub generation: u64,
    /// Number of snapshots held after the update.
    pub snapshot_count: usize,
    /// Number of snapshots with the visible flag set.
    pub visible_count: usize,
    /// Snapshots removed for destroyed layers.
    pub evicted: usize,
    /// Snapshots whose fields were recomputed.
    pub recomputed: usize,
}

/// A per-snapshot update record.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct SnapshotUpdate {
    /// Layer the snapshot belongs to.
    pub layer_id: LayerId,
    /// Changes that were applied.
    pub changes: Changes,
    /// Visibility after the update.
    pub visible: bool,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the snapshot builder.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when an update starts.
    fn on_update_begin(&mut self, e: &UpdateBeginEvent) {
        _ = e;
    }

    /// Called when an update ends.
    fn on_update_end(&mut self, e: &UpdateEndEvent) {
        _ = e;
    }

    /// Called with the snapshots recomputed in one update (requires
    /// `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_snapshot_updates(&mut self, generation: u64, updates: &[SnapshotUpdate]) {
        _ = (generation, updates);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Whether events reach a sink.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        #[cfg(feature = "trace")]
        {
            self.sink.is_some()
        }
        #[cfg(not(feature = "trace"))]
        {
            false
        }
    }

    /// Emits an [`UpdateBeginEvent`].
    #[inline]
    pub fn update_begin(&mut self, e: &UpdateBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_update_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`UpdateEndEvent`].
    #[inline]
    pub fn update_end(&mut self, e: &UpdateEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_update_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits snapshot updates (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn snapshot_updates(&mut self, generation: u64, updates: &[SnapshotUpdate]) {
        if let Some(s) = &mut self.sink {
            s.on_snapshot_updates(generation, updates);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_begin() -> UpdateBeginEvent {
        UpdateBeginEvent {
            generation: 42,
            path: UpdatePath::FullWalk,
            forced: false,
            global_changes: Changes::GEOMETRY,
        }
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_update_begin(&sample_begin());
        sink.on_update_end(&UpdateEndEvent {
            generation: 42,
            snapshot_count: 3,
            visible_count: 2,
            evicted: 0,
            recomputed: 3,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        assert!(!tracer.is_active());
        tracer.update_begin(&sample_begin());
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            paths: Vec<UpdatePath>,
        }
        impl TraceSink for RecordingSink {
            fn on_update_begin(&mut self, e: &UpdateBeginEvent) {
                self.paths.push(e.path);
            }
        }

        let mut sink = RecordingSink { paths: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        assert!(tracer.is_active());
        tracer.update_begin(&sample_begin());
        drop(tracer);
        assert_eq!(sink.paths, &[UpdatePath::FullWalk]);
    }
}
