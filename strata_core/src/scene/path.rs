// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Traversal keys.
//!
//! The same layer can be reached through several routes: its geometric
//! parent, a relative (z-order only) parent, and any number of mirrors. A
//! [`TraversalPath`] describes one such route and identifies the snapshot
//! resolved for it.
//!
//! Identity is `(id, mirror_root_ids)`. The occurrence reached through a
//! relative edge therefore shares its snapshot with the layer's geometric
//! occurrence, while every mirrored instance gets its own.

use core::cmp::Ordering;
use core::fmt;
use core::ops::{Deref, DerefMut};

use smallvec::SmallVec;

use super::LayerId;
use super::hierarchy::Variant;

/// A chain of layer ids crossed while descending.
pub type IdChain = SmallVec<[LayerId; 4]>;

/// One occurrence of a layer in the hierarchy.
#[derive(Clone)]
pub struct TraversalPath {
    /// The layer at the end of the path.
    pub id: LayerId,
    /// The kind of edge the layer was reached through.
    pub variant: Variant,
    /// Mirroring layers crossed on the way down, outermost first.
    pub mirror_root_ids: IdChain,
    /// Relatively parented layers crossed on the way down, outermost first.
    pub relative_root_ids: IdChain,
    /// Whether a detached edge was crossed on the way down.
    pub detached: bool,
}

impl TraversalPath {
    /// The path of the synthetic root above every layer.
    #[must_use]
    pub fn root() -> Self {
        Self::of(LayerId::INVALID)
    }

    /// The geometric, unmirrored occurrence of `id`.
    #[must_use]
    pub fn of(id: LayerId) -> Self {
        Self {
            id,
            variant: Variant::Attached,
            mirror_root_ids: IdChain::new(),
            relative_root_ids: IdChain::new(),
            detached: false,
        }
    }

    /// Whether this occurrence was reached through plain parent edges only.
    ///
    /// Occurrences below a detached edge are not attached: their relative
    /// state is owned by the occurrence below the relative edge.
    #[inline]
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.variant == Variant::Attached && !self.detached && self.relative_root_ids.is_empty()
    }

    /// Whether this occurrence lies below a relative edge.
    #[inline]
    #[must_use]
    pub fn is_relative(&self) -> bool {
        !self.relative_root_ids.is_empty()
    }

    /// Whether this occurrence lies inside a mirrored subtree.
    #[inline]
    #[must_use]
    pub fn is_clone(&self) -> bool {
        !self.mirror_root_ids.is_empty()
    }

    /// Extends the path by one edge; the returned guard restores it on drop.
    pub fn descend(&mut self, id: LayerId, variant: Variant) -> ScopedPath<'_> {
        let parent_id = self.id;
        let parent_variant = self.variant;
        let parent_detached = self.detached;
        match variant {
            Variant::Mirror => self.mirror_root_ids.push(parent_id),
            Variant::Relative => self.relative_root_ids.push(id),
            Variant::Detached => self.detached = true,
            Variant::Attached => {}
        }
        self.id = id;
        self.variant = variant;
        ScopedPath {
            path: self,
            parent_id,
            parent_variant,
            parent_detached,
            pushed: variant,
        }
    }
}

impl PartialEq for TraversalPath {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.mirror_root_ids == other.mirror_root_ids
    }
}

impl Eq for TraversalPath {}

impl PartialOrd for TraversalPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TraversalPath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id
            .cmp(&other.id)
            .then_with(|| self.mirror_root_ids.cmp(&other.mirror_root_ids))
    }
}

impl fmt::Debug for TraversalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.id)?;
        if self.variant != Variant::Attached {
            write!(f, " {:?}", self.variant)?;
        }
        if !self.mirror_root_ids.is_empty() {
            write!(f, " mirrors={:?}", self.mirror_root_ids.as_slice())?;
        }
        if !self.relative_root_ids.is_empty() {
            write!(f, " relative={:?}", self.relative_root_ids.as_slice())?;
        }
        Ok(())
    }
}

/// Restores a [`TraversalPath`] to its parent state when dropped.
pub struct ScopedPath<'a> {
    path: &'a mut TraversalPath,
    parent_id: LayerId,
    parent_variant: Variant,
    parent_detached: bool,
    pushed: Variant,
}

impl Deref for ScopedPath<'_> {
    type Target = TraversalPath;

    fn deref(&self) -> &TraversalPath {
        self.path
    }
}

impl DerefMut for ScopedPath<'_> {
    fn deref_mut(&mut self) -> &mut TraversalPath {
        self.path
    }
}

impl Drop for ScopedPath<'_> {
    fn drop(&mut self) {
        match self.pushed {
            Variant::Mirror => {
                self.path.mirror_root_ids.pop();
            }
            Variant::Relative => {
                self.path.relative_root_ids.pop();
            }
            Variant::Attached | Variant::Detached => {}
        }
        self.path.id = self.parent_id;
        self.path.variant = self.parent_variant;
        self.path.detached = self.parent_detached;
    }
}

impl fmt::Debug for ScopedPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}
