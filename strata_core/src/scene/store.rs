// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Authoritative layer storage with topology and change tracking.

use alloc::string::String;
use alloc::vec::Vec;

use crate::changes::Changes;
use crate::output::{Displays, LayerStack};
use crate::snapshot::UpdateArgs;

use super::LayerId;
use super::descriptor::LayerDescriptor;
use super::hierarchy::LayerHierarchy;

/// Storage for all layer descriptors.
///
/// Layers are addressed by [`LayerId`] handles. Each layer occupies the slot
/// `id - 1`; destroyed slots stay empty so ids are never reused. Topology
/// mutations go through the store so cycles can be rejected, and the
/// [`LayerHierarchy`] is rebuilt lazily the next time it is needed.
#[derive(Debug, Default)]
pub struct SceneStore {
    layers: Vec<Option<LayerDescriptor>>,

    // -- Change tracking --
    structure_changes: Changes,
    destroyed: Vec<LayerId>,

    // -- Hierarchy cache --
    hierarchy: LayerHierarchy,
    hierarchy_dirty: bool,
}

impl SceneStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -- Allocation API --

    /// Creates a new root layer and returns its handle.
    ///
    /// The layer starts with an identity transform, full opacity, no fill,
    /// no buffer and no input, and records [`Changes::CREATED`].
    ///
    /// # Panics
    ///
    /// Panics if the id space is exhausted.
    pub fn create_layer(&mut self, name: impl Into<String>) -> LayerId {
        let raw = u32::try_from(self.layers.len() + 1)
            .ok()
            .filter(|&raw| raw != LayerId::INVALID.0);
        let Some(raw) = raw else {
            panic!("layer id space exhausted");
        };
        let id = LayerId(raw);
        self.layers.push(Some(LayerDescriptor::new(id, name.into())));
        self.hierarchy_dirty = true;
        log::trace!("created layer {id}");
        id
    }

    /// Destroys a layer.
    ///
    /// Layers that used it as relative parent or mirror target lose that
    /// link. Its snapshots are evicted by the next update.
    ///
    /// # Panics
    ///
    /// Panics if the layer has children (reparent or destroy them first) or
    /// if the handle is stale.
    pub fn destroy_layer(&mut self, id: LayerId) {
        self.validate(id);
        assert!(
            !self.layers().any(|l| l.parent == Some(id)),
            "cannot destroy layer with children"
        );

        for layer in self.layers.iter_mut().flatten() {
            if layer.relative_parent == Some(id) {
                layer.relative_parent = None;
                layer.changes |= Changes::HIERARCHY;
            }
            if layer.mirror == Some(id) {
                layer.mirror = None;
                layer.changes |= Changes::HIERARCHY;
            }
        }

        self.layers[Self::slot(id)] = None;
        self.destroyed.push(id);
        self.structure_changes |= Changes::HIERARCHY;
        self.hierarchy_dirty = true;
        log::trace!("destroyed layer {id}");
    }

    /// Returns whether the given handle refers to a live layer.
    #[must_use]
    pub fn is_alive(&self, id: LayerId) -> bool {
        !id.is_invalid()
            && id.0 != 0
            && self
                .layers
                .get(Self::slot(id))
                .is_some_and(Option::is_some)
    }

    /// Number of live layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers().count()
    }

    /// Whether no layer is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers().next().is_none()
    }

    /// Iterates over live layers in id order.
    pub fn layers(&self) -> impl Iterator<Item = &LayerDescriptor> + Clone {
        self.layers.iter().flatten()
    }

    /// Returns a layer's descriptor.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn layer(&self, id: LayerId) -> &LayerDescriptor {
        self.get(id)
            .unwrap_or_else(|| panic!("stale layer id {id:?}"))
    }

    /// Returns a layer's descriptor for modification.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn layer_mut(&mut self, id: LayerId) -> &mut LayerDescriptor {
        self.layers
            .get_mut(Self::slot(id))
            .and_then(Option::as_mut)
            .unwrap_or_else(|| panic!("stale layer id {id:?}"))
    }

    /// Returns a layer's descriptor if it is alive.
    #[must_use]
    pub fn get(&self, id: LayerId) -> Option<&LayerDescriptor> {
        if !self.is_alive(id) {
            return None;
        }
        self.layers[Self::slot(id)].as_ref()
    }

    // -- Topology API --

    /// Sets the geometric parent of `child`, or makes it a root with `None`.
    ///
    /// Returns `false` and changes nothing if the link would create a cycle.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    pub fn set_parent(&mut self, child: LayerId, parent: Option<LayerId>) -> bool {
        self.validate(child);
        if let Some(parent) = parent {
            self.validate(parent);
            if self.reaches(child, parent) {
                log::warn!("rejected parent {parent} for layer {child}: cycle");
                return false;
            }
        }
        let layer = self.layer_mut(child);
        layer.parent = parent;
        layer.changes |= Changes::HIERARCHY | Changes::AFFECTS_CHILDREN;
        self.hierarchy_dirty = true;
        true
    }

    /// Sets the z-order parent of `child`, or removes it with `None`.
    ///
    /// Returns `false` and changes nothing if the link would create a cycle.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    pub fn set_relative_parent(&mut self, child: LayerId, relative: Option<LayerId>) -> bool {
        self.validate(child);
        if let Some(relative) = relative {
            self.validate(relative);
            if self.reaches(child, relative) {
                log::warn!("rejected relative parent {relative} for layer {child}: cycle");
                return false;
            }
        }
        let layer = self.layer_mut(child);
        layer.relative_parent = relative;
        layer.changes |= Changes::HIERARCHY;
        self.hierarchy_dirty = true;
        true
    }

    /// Makes `layer` mirror the subtree of `target`, or stops mirroring with
    /// `None`.
    ///
    /// Returns `false` and changes nothing if the link would create a cycle.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    pub fn set_mirror(&mut self, layer: LayerId, target: Option<LayerId>) -> bool {
        self.validate(layer);
        if let Some(target) = target {
            self.validate(target);
            if self.reaches(target, layer) {
                log::warn!("rejected mirror of {target} by layer {layer}: cycle");
                return false;
            }
        }
        let descriptor = self.layer_mut(layer);
        descriptor.mirror = target;
        descriptor.changes |= Changes::HIERARCHY;
        self.hierarchy_dirty = true;
        true
    }

    /// Sets the z position of a layer among its siblings.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_z(&mut self, id: LayerId, z: i32) {
        let layer = self.layer_mut(id);
        if layer.z == z {
            return;
        }
        layer.z = z;
        layer.changes |= Changes::HIERARCHY;
        self.hierarchy_dirty = true;
    }

    /// Sets the output a root layer is shown on.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_layer_stack(&mut self, id: LayerId, stack: LayerStack) {
        let layer = self.layer_mut(id);
        if layer.layer_stack == stack {
            return;
        }
        layer.layer_stack = stack;
        layer.changes |= Changes::HIERARCHY | Changes::AFFECTS_CHILDREN;
        self.hierarchy_dirty = true;
    }

    // -- Change tracking --

    /// Union of every change recorded since the last [`commit`](Self::commit).
    #[must_use]
    pub fn global_changes(&self) -> Changes {
        self.layers()
            .fold(self.structure_changes, |acc, l| acc | l.changes)
    }

    /// Layers destroyed since the last [`commit`](Self::commit).
    #[must_use]
    pub fn destroyed_layers(&self) -> &[LayerId] {
        &self.destroyed
    }

    /// Returns the hierarchy, rebuilding it if the topology changed.
    pub fn hierarchy(&mut self) -> &LayerHierarchy {
        self.refresh_hierarchy();
        &self.hierarchy
    }

    /// Returns the hierarchy without rebuilding it, or `None` if it is out of
    /// date.
    #[must_use]
    pub fn current_hierarchy(&self) -> Option<&LayerHierarchy> {
        (!self.hierarchy_dirty).then_some(&self.hierarchy)
    }

    /// Prepares the arguments for one snapshot update.
    pub fn update_args<'a>(&'a mut self, displays: &'a Displays) -> UpdateArgs<'a> {
        self.refresh_hierarchy();
        let this: &'a Self = self;
        UpdateArgs::new(this, &this.hierarchy, displays)
    }

    /// Clears all recorded changes once an update has consumed them.
    pub fn commit(&mut self) {
        for layer in self.layers.iter_mut().flatten() {
            layer.changes = Changes::empty();
        }
        self.structure_changes = Changes::empty();
        self.destroyed.clear();
    }

    // -- Internals --

    fn refresh_hierarchy(&mut self) {
        if self.hierarchy_dirty {
            self.hierarchy = LayerHierarchy::build(self.layers.iter().flatten());
            self.hierarchy_dirty = false;
            log::debug!("rebuilt hierarchy with {} nodes", self.hierarchy.len());
        }
    }

    #[inline]
    fn slot(id: LayerId) -> usize {
        id.0.wrapping_sub(1) as usize
    }

    #[inline]
    fn validate(&self, id: LayerId) {
        assert!(self.is_alive(id), "stale layer id {id:?}");
    }

    /// Whether `to` is reachable from `from` along parent, relative-parent
    /// and mirror edges (or is `from` itself).
    fn reaches(&self, from: LayerId, to: LayerId) -> bool {
        let mut stack = alloc::vec![from];
        let mut seen = alloc::vec![false; self.layers.len()];
        while let Some(id) = stack.pop() {
            if id == to {
                return true;
            }
            let slot = Self::slot(id);
            if core::mem::replace(&mut seen[slot], true) {
                continue;
            }
            if let Some(Some(layer)) = self.layers.get(slot) {
                if let Some(target) = layer.mirror {
                    stack.push(target);
                }
            }
            for layer in self.layers() {
                if layer.parent == Some(id) || layer.relative_parent == Some(id) {
                    stack.push(layer.id);
                }
            }
        }
        false
    }
}
