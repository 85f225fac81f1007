// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change kinds.
//!
//! Every descriptor carries a [`Changes`] mask describing what was requested
//! since the last committed update, and the scene store exposes the union of
//! all masks as the *global change summary*. The update driver tests these
//! flags to choose between the fast paths and a full walk, and to gate which
//! field groups of a snapshot are recomputed.
//!
//! # Propagation semantics
//!
//! - **Propagating**: [`Changes::HIERARCHY`], [`Changes::GEOMETRY`],
//!   [`Changes::VISIBILITY`], [`Changes::METADATA`] and
//!   [`Changes::AFFECTS_CHILDREN`] are copied from a resolved parent snapshot
//!   into each child's mask during a walk, because the corresponding child
//!   fields are inherited.
//! - **Local-only**: [`Changes::CONTENT`], [`Changes::INPUT`],
//!   [`Changes::BUFFER`] and [`Changes::CREATED`] only affect the descriptor
//!   that recorded them.

use bitflags::bitflags;

bitflags! {
    /// A set of change kinds.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Changes: u32 {
        /// Transform, crop, destination frame or corner radius changed.
        const GEOMETRY = 1 << 0;
        /// Something that can flip visibility changed (hidden flag, alpha
        /// crossing zero, content appearing or disappearing).
        const VISIBILITY = 1 << 1;
        /// Colour, blur, HDR metadata, opacity or other content state changed.
        const CONTENT = 1 << 2;
        /// Parent, relative parent, mirror, z or layer stack changed.
        const HIERARCHY = 1 << 3;
        /// Layer metadata changed.
        const METADATA = 1 << 4;
        /// Input configuration, touch crop or drop-input mode changed.
        const INPUT = 1 << 5;
        /// A property inherited by every descendant changed (alpha, secure,
        /// colour transform, stretch effect, layer stack, ...).
        const AFFECTS_CHILDREN = 1 << 6;
        /// The layer was created since the last update.
        const CREATED = 1 << 7;
        /// A new buffer or buffer property was latched.
        const BUFFER = 1 << 8;
    }
}

impl Changes {
    /// The changes a resolved parent hands down to its children.
    pub const PROPAGATING: Self = Self::HIERARCHY
        .union(Self::GEOMETRY)
        .union(Self::VISIBILITY)
        .union(Self::METADATA)
        .union(Self::AFFECTS_CHILDREN);

    /// Returns the subset of `self` that a child inherits.
    #[inline]
    #[must_use]
    pub const fn propagated(self) -> Self {
        self.intersection(Self::PROPAGATING)
    }

    /// Whether this summary allows the content-only fast path: content
    /// changed and nothing else did.
    #[inline]
    #[must_use]
    pub fn is_content_only(self) -> bool {
        self == Self::CONTENT
    }
}
