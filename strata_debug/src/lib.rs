// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing and snapshot dumps for strata diagnostics.
//!
//! - [`pretty::PrettyPrintSink`]: a [`TraceSink`](strata_core::trace::TraceSink)
//!   writing one line per update event.
//! - [`dump::dump_snapshots`]: a table of the resolved snapshot list, one row
//!   per snapshot in composition order.

pub mod dump;
pub mod pretty;
