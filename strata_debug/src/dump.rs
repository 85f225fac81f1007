// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tabular snapshot dumps.
//!
//! [`dump_snapshots`] writes one row per snapshot in composition order, the
//! visible prefix first. Rows are stable across runs for the same scene, so
//! dumps can be diffed between frames.

use std::io::{self, Write};

use kurbo::Rect;
use strata_core::scene::CompositionType;
use strata_core::snapshot::{BlendMode, LayerSnapshot, SnapshotBuilder};

const HEADER: &str = "   z  layer      name                  vis  alpha  bounds                     comp     blend";

/// Writes the builder's snapshot list as a table.
///
/// The last line summarises the counts.
pub fn dump_snapshots(builder: &SnapshotBuilder, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{HEADER}")?;
    for snapshot in builder.snapshots() {
        dump_row(snapshot, out)?;
    }
    writeln!(
        out,
        "{} snapshots, {} visible, generation {}",
        builder.snapshots().len(),
        builder.visible().len(),
        builder.generation(),
    )
}

/// Writes one snapshot row.
pub fn dump_row(snapshot: &LayerSnapshot, out: &mut impl Write) -> io::Result<()> {
    let vis = if snapshot.is_visible { "yes" } else { "no" };
    let id = format!("{:?}", snapshot.layer_id);
    writeln!(
        out,
        "{:>4}  {id:<9}  {:<20}  {vis:<3}  {:>5.2}  {:<25}  {:<7}  {}",
        snapshot.global_z,
        truncate(&snapshot.name, 20),
        snapshot.alpha,
        bounds(snapshot.transformed_bounds),
        composition(snapshot.composition_type),
        blend(snapshot.blend_mode),
    )
}

fn truncate(name: &str, max: usize) -> &str {
    match name.char_indices().nth(max) {
        Some((end, _)) => &name[..end],
        None => name,
    }
}

fn bounds(r: Rect) -> String {
    if r.width() <= 0.0 || r.height() <= 0.0 {
        return "empty".into();
    }
    format!("[{:.0},{:.0} {:.0}x{:.0}]", r.x0, r.y0, r.width(), r.height())
}

fn composition(c: CompositionType) -> &'static str {
    match c {
        CompositionType::Invalid => "-",
        CompositionType::Device => "device",
        CompositionType::SolidColor => "color",
        CompositionType::Sideband => "sideband",
    }
}

fn blend(b: BlendMode) -> &'static str {
    match b {
        BlendMode::None => "none",
        BlendMode::Premultiplied => "premul",
        BlendMode::Coverage => "coverage",
    }
}
