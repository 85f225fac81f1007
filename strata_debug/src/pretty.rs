// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use strata_core::trace::{
    SnapshotUpdate, TraceSink, UpdateBeginEvent, UpdateEndEvent, UpdatePath,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    verbose: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("verbose", &self.verbose)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self {
            writer,
            verbose: false,
        }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            verbose: false,
        }
    }

    /// Also prints one line per recomputed snapshot.
    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn path_name(path: UpdatePath) -> &'static str {
    match path {
        UpdatePath::Unchanged => "unchanged",
        UpdatePath::ContentFastPath => "content",
        UpdatePath::FullWalk => "walk",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_update_begin(&mut self, e: &UpdateBeginEvent) {
        let forced = if e.forced { " forced" } else { "" };
        let _ = writeln!(
            self.writer,
            "[update:begin] gen={} path={}{forced} changes={:?}",
            e.generation,
            path_name(e.path),
            e.global_changes,
        );
    }

    fn on_update_end(&mut self, e: &UpdateEndEvent) {
        let _ = writeln!(
            self.writer,
            "[update:end] gen={} snapshots={} visible={} recomputed={} evicted={}",
            e.generation, e.snapshot_count, e.visible_count, e.recomputed, e.evicted,
        );
    }

    fn on_snapshot_updates(&mut self, generation: u64, updates: &[SnapshotUpdate]) {
        let _ = writeln!(
            self.writer,
            "[snapshots] gen={generation} updated={}",
            updates.len(),
        );
        if !self.verbose {
            return;
        }
        for u in updates {
            let visible = if u.visible { "visible" } else { "hidden" };
            let _ = writeln!(
                self.writer,
                "  {:?} {visible} changes={:?}",
                u.layer_id, u.changes,
            );
        }
    }
}
