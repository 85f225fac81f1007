// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The update driver.
//!
//! Each [`SnapshotBuilder::update`] picks one of three paths from the scene's
//! global change summary:
//!
//! 1. **Unchanged**: nothing changed, so only last frame's per-snapshot
//!    change flags are cleared.
//! 2. **Content fast path**: only [`Changes::CONTENT`] changed. Snapshots of
//!    layers with content changes are recomputed in place against their
//!    already-resolved parents; the tree is not walked.
//! 3. **Full walk**: the hierarchy is walked pre-order from the root. Each
//!    occurrence is resolved from its own descriptor and the resolved
//!    snapshot of its parent occurrence, and subtrees below a layer hidden
//!    by policy are pruned unless visibility or hierarchy changed. A
//!    z-order pass and eviction of destroyed layers follow.
//!
//! Field groups are only recomputed when the change flags that affect them
//! are present, or when the update is forced.

use alloc::collections::BTreeMap;
#[cfg(feature = "trace-rich")]
use alloc::vec::Vec;

use super::geometry;
use super::input_geometry::{self, InputContext};
use super::zorder;
use super::{BlendMode, LayerSnapshot, SnapshotStore};
use crate::buffer::{Dataspace, PixelFormat, ProducerApi};
use crate::changes::Changes;
use crate::color::ColorMatrix;
use crate::consumer::SnapshotConsumer;
use crate::effects::ShadowSettings;
use crate::output::{DisplayInfo, Displays};
use crate::scene::{
    LayerDescriptor, LayerFlags, LayerHierarchy, LayerId, SceneStore, TraversalPath, Variant,
};
#[cfg(feature = "trace-rich")]
use crate::trace::SnapshotUpdate;
use crate::trace::{Tracer, UpdateBeginEvent, UpdateEndEvent, UpdatePath};

/// Everything one update reads.
///
/// Obtained from [`SceneStore::update_args`], then adjusted with the
/// `with_*` methods.
#[derive(Clone, Debug)]
pub struct UpdateArgs<'a> {
    pub(crate) scene: &'a SceneStore,
    pub(crate) hierarchy: &'a LayerHierarchy,
    /// The display registry.
    pub displays: &'a Displays,
    /// Recompute every field of every reachable snapshot.
    pub force_update: bool,
    /// The display registry changed since the last update.
    pub display_changes: bool,
    /// Aggregate layer metadata down the tree.
    pub include_metadata: bool,
    /// Preset copied into every shadow-casting snapshot.
    pub shadow_settings: ShadowSettings,
}

impl<'a> UpdateArgs<'a> {
    pub(crate) fn new(
        scene: &'a SceneStore,
        hierarchy: &'a LayerHierarchy,
        displays: &'a Displays,
    ) -> Self {
        Self {
            scene,
            hierarchy,
            displays,
            force_update: false,
            display_changes: false,
            include_metadata: false,
            shadow_settings: ShadowSettings::default(),
        }
    }

    /// Sets whether every snapshot is recomputed.
    #[must_use]
    pub fn with_force_update(mut self, force: bool) -> Self {
        self.force_update = force;
        self
    }

    /// Sets whether the display registry changed.
    #[must_use]
    pub fn with_display_changes(mut self, changed: bool) -> Self {
        self.display_changes = changed;
        self
    }

    /// Sets whether layer metadata is aggregated.
    #[must_use]
    pub fn with_metadata(mut self, include: bool) -> Self {
        self.include_metadata = include;
        self
    }

    /// Sets the global shadow preset.
    #[must_use]
    pub fn with_shadow_settings(mut self, settings: ShadowSettings) -> Self {
        self.shadow_settings = settings;
        self
    }

    /// The scene being flattened.
    #[must_use]
    pub fn scene(&self) -> &'a SceneStore {
        self.scene
    }

    /// The hierarchy being walked.
    #[must_use]
    pub fn hierarchy(&self) -> &'a LayerHierarchy {
        self.hierarchy
    }
}

/// The parent occurrence of a snapshot being resolved.
#[derive(Clone, Copy, Debug)]
enum ParentRef {
    Root,
    Snapshot(usize),
}

/// Flattens a [`SceneStore`] into z-ordered [`LayerSnapshot`]s.
#[derive(Debug)]
pub struct SnapshotBuilder {
    root: LayerSnapshot,
    store: SnapshotStore,
    generation: u64,
    last_path: UpdatePath,
    recomputed: usize,
    #[cfg(feature = "trace-rich")]
    updates: Vec<SnapshotUpdate>,
}

impl Default for SnapshotBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotBuilder {
    /// Creates a builder with no snapshots.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: LayerSnapshot::root(),
            store: SnapshotStore::new(),
            generation: 0,
            last_path: UpdatePath::Unchanged,
            recomputed: 0,
            #[cfg(feature = "trace-rich")]
            updates: Vec::new(),
        }
    }

    /// Creates a builder and runs a forced update with `args`.
    #[must_use]
    pub fn with_initial_update(args: &UpdateArgs<'_>) -> Self {
        let mut builder = Self::new();
        builder.update(&args.clone().with_force_update(true));
        builder
    }

    /// Brings the snapshots up to date with the scene.
    pub fn update(&mut self, args: &UpdateArgs<'_>) {
        self.update_traced(args, &mut Tracer::none());
    }

    /// Like [`update`](Self::update), reporting to `tracer`.
    pub fn update_traced(&mut self, args: &UpdateArgs<'_>, tracer: &mut Tracer<'_>) {
        self.generation += 1;
        self.recomputed = 0;

        let global = args.scene.global_changes();
        let path = if args.force_update || args.display_changes {
            UpdatePath::FullWalk
        } else if global.is_empty() {
            UpdatePath::Unchanged
        } else if global.is_content_only() {
            UpdatePath::ContentFastPath
        } else {
            UpdatePath::FullWalk
        };
        self.last_path = path;
        log::debug!(
            "update {}: {path:?} (forced: {}, changes: {global:?})",
            self.generation,
            args.force_update
        );
        tracer.update_begin(&UpdateBeginEvent {
            generation: self.generation,
            path,
            forced: args.force_update,
            global_changes: global,
        });

        let evicted = match path {
            UpdatePath::Unchanged => {
                self.clear_changes();
                0
            }
            UpdatePath::ContentFastPath => {
                self.update_content(args);
                0
            }
            UpdatePath::FullWalk => self.update_walk(args, global),
        };

        #[cfg(feature = "trace-rich")]
        {
            tracer.snapshot_updates(self.generation, &self.updates);
            self.updates.clear();
        }
        tracer.update_end(&UpdateEndEvent {
            generation: self.generation,
            snapshot_count: self.store.len(),
            visible_count: self.visible().len(),
            evicted,
            recomputed: self.recomputed,
        });
    }

    /// Hands the snapshot array to `consumer`.
    pub fn present(&self, consumer: &mut impl SnapshotConsumer) {
        consumer.consume(self.store.as_slice());
    }

    // -- Read access --

    /// All snapshots: the visible ones in ascending z order, then the rest.
    #[must_use]
    pub fn snapshots(&self) -> &[LayerSnapshot] {
        self.store.as_slice()
    }

    /// The visible prefix of [`snapshots`](Self::snapshots).
    #[must_use]
    pub fn visible(&self) -> &[LayerSnapshot] {
        let all = self.store.as_slice();
        let count = all.iter().take_while(|s| s.is_visible).count();
        &all[..count]
    }

    /// The snapshot resolved for one occurrence.
    #[must_use]
    pub fn get(&self, path: &TraversalPath) -> Option<&LayerSnapshot> {
        self.store.get(path)
    }

    /// The geometric, unmirrored snapshot of a layer.
    #[must_use]
    pub fn get_by_id(&self, id: LayerId) -> Option<&LayerSnapshot> {
        self.store.get_by_id(id)
    }

    /// The synthetic parent of every root layer.
    #[must_use]
    pub fn root_snapshot(&self) -> &LayerSnapshot {
        &self.root
    }

    /// Number of updates run so far.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The path taken by the most recent update.
    #[must_use]
    pub fn last_update_path(&self) -> UpdatePath {
        self.last_path
    }

    /// Asserts the snapshot store's internal consistency.
    ///
    /// # Panics
    ///
    /// Panics if an array position, stored z value and index entry disagree.
    pub fn check_invariants(&self) {
        self.store.check_invariants();
    }

    // -- Update paths --

    fn clear_changes(&mut self) {
        for snapshot in self.store.iter_mut() {
            snapshot.changes = Changes::empty();
            snapshot.content_dirty = false;
        }
    }

    fn update_content(&mut self, args: &UpdateArgs<'_>) {
        self.clear_changes();
        let changed: BTreeMap<LayerId, &LayerDescriptor> = args
            .scene
            .layers()
            .filter(|l| l.changes().contains(Changes::CONTENT))
            .map(|l| (l.id(), l))
            .collect();

        for idx in 0..self.store.len() {
            let snapshot = self.store.at(idx);
            let Some(&requested) = changed.get(&snapshot.path.id) else {
                continue;
            };
            let path = snapshot.path.clone();
            let parent = if snapshot.parent_path == TraversalPath::root() {
                ParentRef::Root
            } else {
                self.store
                    .index_of(&snapshot.parent_path)
                    .map_or(ParentRef::Root, ParentRef::Snapshot)
            };
            self.update_snapshot(idx, parent, args, requested, &path);
        }
    }

    fn update_walk(&mut self, args: &UpdateArgs<'_>, global: Changes) -> usize {
        if args.force_update || args.display_changes {
            self.root.geom_layer_bounds = args.displays.max_bounds();
        }
        if args.display_changes {
            self.root.changes = Changes::AFFECTS_CHILDREN | Changes::GEOMETRY;
        }

        let hierarchy = args.hierarchy;
        let mut path = TraversalPath::root();
        for edge in hierarchy.node(LayerHierarchy::ROOT).children() {
            let layer = hierarchy.node(edge.node).layer();
            let mut child_path = path.descend(layer, edge.variant);
            self.update_in_hierarchy(args, edge.node, &mut child_path, ParentRef::Root);
        }

        let visible =
            zorder::sort_snapshots_by_z(&mut self.store, hierarchy, args.force_update, global);
        if let Some(visible) = visible {
            log::trace!("z order: {visible} of {} snapshots visible", self.store.len());
        }
        self.root.changes = Changes::empty();
        self.store.evict(args.scene.destroyed_layers())
    }

    fn update_in_hierarchy(
        &mut self,
        args: &UpdateArgs<'_>,
        node: usize,
        path: &mut TraversalPath,
        parent: ParentRef,
    ) {
        let hierarchy = args.hierarchy;
        let Some(layer) = args.scene.get(hierarchy.node(node).layer()) else {
            return;
        };
        let idx = self.store.get_or_create(path, layer);
        if path.is_relative() {
            let parent_is_relative = path.variant == Variant::Relative;
            self.update_relative_state(idx, parent, parent_is_relative, args.include_metadata);
        } else {
            if path.is_attached() {
                let snapshot = self.store.at_mut(idx);
                snapshot.is_hidden_by_policy_from_relative_parent = false;
                snapshot.relative_layer_metadata.clear();
            }
            self.update_snapshot(idx, parent, args, layer, path);
        }

        // Children of a hidden layer keep last frame's state unless the
        // hiding itself changed.
        let snapshot = self.store.at(idx);
        if snapshot.is_hidden_by_policy()
            && !snapshot
                .changes
                .intersects(Changes::VISIBILITY | Changes::HIERARCHY)
        {
            return;
        }

        for edge in hierarchy.node(node).children() {
            let child = hierarchy.node(edge.node).layer();
            let mut child_path = path.descend(child, edge.variant);
            self.update_in_hierarchy(args, edge.node, &mut child_path, ParentRef::Snapshot(idx));
        }
    }

    /// Inherits hidden state and metadata through a relative edge.
    fn update_relative_state(
        &mut self,
        idx: usize,
        parent: ParentRef,
        parent_is_relative: bool,
        include_metadata: bool,
    ) {
        let (parent, snapshot) = self.split(parent, idx);
        if parent_is_relative {
            snapshot.is_hidden_by_policy_from_relative_parent =
                parent.is_hidden_by_policy_from_parent;
            if include_metadata {
                snapshot.relative_layer_metadata = parent.layer_metadata.clone();
            }
        } else {
            snapshot.is_hidden_by_policy_from_relative_parent =
                parent.is_hidden_by_policy_from_relative_parent;
            if include_metadata {
                snapshot.relative_layer_metadata = parent.relative_layer_metadata.clone();
            }
        }
        // Keeps the relative subtree from being pruned when the relative
        // parent's visibility changed.
        snapshot.changes |= parent.changes.propagated();
        snapshot.is_visible = snapshot.compute_is_visible();
    }

    /// Resolves one snapshot from its descriptor and its parent.
    fn update_snapshot(
        &mut self,
        idx: usize,
        parent: ParentRef,
        args: &UpdateArgs<'_>,
        requested: &LayerDescriptor,
        path: &TraversalPath,
    ) {
        self.recomputed += 1;
        if let Some(input_needed) = self.update_fields(idx, parent, args, requested) {
            if input_needed {
                self.update_input(idx, parent, args, requested, path);
            }
            let (parent, snapshot) = self.split(parent, idx);
            finish_snapshot(snapshot, parent, args, requested);
        }

        let snapshot = self.store.at(idx);
        log::trace!(
            "updated {path:?} {} changes: {:?} visible: {}",
            snapshot.name,
            snapshot.changes,
            snapshot.is_visible
        );
        #[cfg(feature = "trace-rich")]
        self.updates.push(SnapshotUpdate {
            layer_id: snapshot.layer_id,
            changes: snapshot.changes,
            visible: snapshot.is_visible,
        });
    }

    /// Recomputes the gated field groups. Returns `None` if the snapshot is
    /// hidden by policy, otherwise whether input needs recomputing.
    fn update_fields(
        &mut self,
        idx: usize,
        parent: ParentRef,
        args: &UpdateArgs<'_>,
        requested: &LayerDescriptor,
    ) -> Option<bool> {
        let (parent, snapshot) = self.split(parent, idx);
        snapshot.parent_path = parent.path.clone();
        snapshot.changes = parent.changes.propagated() | requested.changes();
        snapshot.is_hidden_by_policy_from_parent =
            parent.is_hidden_by_policy_from_parent || requested.is_hidden_by_policy();
        snapshot.content_dirty = requested.content_dirty();
        if snapshot.is_hidden_by_policy_from_parent {
            snapshot.is_visible = false;
            return None;
        }

        let changes = snapshot.changes;
        let force =
            args.force_update || changes.intersects(Changes::VISIBILITY | Changes::CREATED);
        let flags = requested.flags();

        if force || changes.contains(Changes::AFFECTS_CHILDREN) {
            snapshot.color.a = parent.color.a * requested.alpha();
            snapshot.alpha = snapshot.color.a;
            snapshot.is_secure = parent.is_secure || flags.contains(LayerFlags::SECURE);
            snapshot.is_trusted_overlay =
                parent.is_trusted_overlay || requested.is_trusted_overlay();
            // Only root layers pick their own output.
            snapshot.output_filter.layer_stack = if requested.parent().is_some() {
                parent.output_filter.layer_stack
            } else {
                requested.layer_stack()
            };
            snapshot.output_filter.to_internal_display = parent.output_filter.to_internal_display
                || flags.contains(LayerFlags::SKIP_SCREENSHOT);
            snapshot.stretch_effect = if requested.stretch_effect.has_effect() {
                requested.stretch_effect
            } else {
                parent.stretch_effect
            };
            let own = requested.color_transform;
            if parent.color_transform_is_identity {
                snapshot.color_transform = own.unwrap_or(ColorMatrix::IDENTITY);
                snapshot.color_transform_is_identity = own.is_none();
            } else {
                snapshot.color_transform =
                    parent.color_transform * own.unwrap_or(ColorMatrix::IDENTITY);
                snapshot.color_transform_is_identity = false;
            }
        }

        let rotation = args
            .displays
            .rotation_flags(snapshot.output_filter.layer_stack);

        if force || !requested.changes().is_empty() {
            snapshot.composition_type = requested.composition_type();
            snapshot.dimming_enabled = requested.dimming_enabled;
            snapshot.layer_opaque_flag_set = flags.contains(LayerFlags::OPAQUE);
        }

        if force || requested.changes().contains(Changes::BUFFER) {
            let buffer = requested.buffer().copied();
            snapshot.buffer = buffer;
            snapshot.acquire_fence = buffer.and_then(|b| b.acquire_fence);
            snapshot.frame_number = buffer.map_or(0, |b| b.frame_number);
            snapshot.buffer_size = requested.buffer_size(rotation);
            snapshot.cropped_buffer_size = requested.cropped_buffer_size(snapshot.buffer_size);
            snapshot.dataspace = requested.dataspace;
            snapshot.buffer_transform = requested.buffer_transform;
            snapshot.buffer_uses_display_inverse_transform =
                requested.transform_to_display_inverse;
            snapshot.content_crop = requested.buffer_crop();
            snapshot.sideband_stream = requested.sideband;
            snapshot.surface_damage.clone_from(&requested.surface_damage);
            snapshot
                .transparent_region_hint
                .clone_from(&requested.transparent_region);
            snapshot.uses_source_crop = snapshot.has_buffer_or_sideband();
            snapshot.has_protected_content = buffer.is_some_and(|b| b.protected);
            snapshot.is_hdr_y410 = requested.dataspace == Dataspace::Bt2020ItuPq
                && requested.api == ProducerApi::Media
                && buffer.is_some_and(|b| b.format == PixelFormat::Rgba1010102);
        }

        if force || changes.contains(Changes::CONTENT) {
            snapshot.color = snapshot.color.with_rgb_of(requested.color());
            snapshot.is_color_space_agnostic = requested.color_space_agnostic;
            snapshot.background_blur_radius = requested.background_blur_radius;
            snapshot.blur_regions.clone_from(&requested.blur_regions);
            snapshot.hdr_metadata.clone_from(&requested.hdr_metadata);
        }

        if force || changes.intersects(Changes::HIERARCHY | Changes::GEOMETRY) {
            geometry::update_layer_bounds(snapshot, requested, parent, rotation);
            geometry::update_rounded_corner(snapshot, requested, parent);
        }

        Some(
            force
                || changes.intersects(
                    Changes::HIERARCHY
                        | Changes::GEOMETRY
                        | Changes::INPUT
                        | Changes::AFFECTS_CHILDREN,
                ),
        )
    }

    fn update_input(
        &mut self,
        idx: usize,
        parent: ParentRef,
        args: &UpdateArgs<'_>,
        requested: &LayerDescriptor,
        path: &TraversalPath,
    ) {
        // Cross-references that did not resolve are ignored.
        let touch_crop_bounds = requested
            .touch_crop
            .and_then(|id| self.store.get_by_id(id))
            .map(|s| s.transformed_bounds);
        let clone_root_bounds = path
            .mirror_root_ids
            .last()
            .and_then(|&id| self.store.get_by_id(id))
            .map(|s| s.transformed_bounds);

        let stack = self.store.at(idx).output_filter.layer_stack;
        let fallback = DisplayInfo::default();
        let display = args.displays.get(stack);
        let cx = InputContext {
            display: display.unwrap_or(&fallback),
            no_valid_display: display.is_none(),
            touch_crop_bounds,
            clone_root_bounds,
        };

        let (parent, snapshot) = self.split(parent, idx);
        input_geometry::update_input(snapshot, requested, parent, path, &cx);
    }

    /// Borrows the parent immutably and the snapshot at `idx` mutably.
    fn split(&mut self, parent: ParentRef, idx: usize) -> (&LayerSnapshot, &mut LayerSnapshot) {
        match parent {
            ParentRef::Snapshot(p) if p != idx => self.store.pair_mut(p, idx),
            ParentRef::Snapshot(_) => {
                log::warn!("snapshot {idx} resolved as its own parent, using the root");
                (&self.root, self.store.at_mut(idx))
            }
            ParentRef::Root => (&self.root, self.store.at_mut(idx)),
        }
    }
}

/// Fields recomputed on every update of a visible-by-policy snapshot.
fn finish_snapshot(
    snapshot: &mut LayerSnapshot,
    parent: &LayerSnapshot,
    args: &UpdateArgs<'_>,
    requested: &LayerDescriptor,
) {
    geometry::update_shadows(snapshot, requested, &args.shadow_settings);
    if args.include_metadata {
        snapshot.layer_metadata.clone_from(&parent.layer_metadata);
        snapshot.layer_metadata.merge(requested.metadata());
    }
    snapshot.force_client_composition = snapshot.is_hdr_y410
        || snapshot.shadow_settings.length > 0.0
        || !requested.blur_regions.is_empty()
        || snapshot.stretch_effect.has_effect();
    snapshot.is_visible = snapshot.compute_is_visible();
    let content_opaque = snapshot.is_content_opaque();
    snapshot.is_opaque = content_opaque
        && !snapshot.rounded_corner.has_rounded_corners()
        && snapshot.color.a == 1.0;
    snapshot.blend_mode = if snapshot.alpha != 1.0 || !content_opaque {
        if requested.premultiplied_alpha {
            BlendMode::Premultiplied
        } else {
            BlendMode::Coverage
        }
    } else {
        BlendMode::None
    };
}
