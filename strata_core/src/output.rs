// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Display outputs.
//!
//! [`LayerStack`] identifies the output a layer tree is shown on. The
//! display registry ([`Displays`]) maps each stack to a [`DisplayInfo`];
//! stacks without a registered display fall back to
//! [`DisplayInfo::default`], which is neither secure nor primary.

use alloc::collections::BTreeMap;
use core::fmt;

use kurbo::{Affine, Rect};

use crate::transform::Rotation;

/// Identifies a display output (a "layer stack").
///
/// The registry assigns these; core code passes them through without
/// interpreting the value.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LayerStack(pub u32);

impl LayerStack {
    /// The stack root layers land on unless told otherwise.
    pub const DEFAULT: Self = Self(0);
}

impl fmt::Debug for LayerStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LayerStack({})", self.0)
    }
}

/// What the snapshot builder needs to know about one display.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayInfo {
    /// Logical (post-rotation) width.
    pub logical_width: u32,
    /// Logical (post-rotation) height.
    pub logical_height: u32,
    /// Display orientation, honoured only on the primary display.
    pub rotation_flags: Rotation,
    /// Whether this is the primary display.
    pub is_primary: bool,
    /// Whether the display may show secure layers.
    pub is_secure: bool,
    /// Screen-space (logical) to display-space (physical) transform.
    pub transform: Affine,
}

impl Default for DisplayInfo {
    fn default() -> Self {
        Self {
            logical_width: 0,
            logical_height: 0,
            rotation_flags: Rotation::ROT_0,
            is_primary: false,
            is_secure: false,
            transform: Affine::IDENTITY,
        }
    }
}

impl DisplayInfo {
    /// Creates a non-primary, non-secure display of the given logical size.
    #[must_use]
    pub fn new(logical_width: u32, logical_height: u32) -> Self {
        Self {
            logical_width,
            logical_height,
            ..Self::default()
        }
    }
}

/// The display registry.
#[derive(Clone, Debug, Default)]
pub struct Displays {
    map: BTreeMap<LayerStack, DisplayInfo>,
}

impl Displays {
    /// Base extent used when no display is registered.
    const FALLBACK_SIZE: u32 = 5000;

    /// Factor between the largest display and the root bounds.
    const ROOT_BOUNDS_SCALE: f64 = 10.0;

    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            map: BTreeMap::new(),
        }
    }

    /// Registers or replaces the display for `stack`.
    pub fn insert(&mut self, stack: LayerStack, info: DisplayInfo) {
        self.map.insert(stack, info);
    }

    /// Unregisters the display for `stack`.
    pub fn remove(&mut self, stack: LayerStack) -> Option<DisplayInfo> {
        self.map.remove(&stack)
    }

    /// Returns the display registered for `stack`.
    #[must_use]
    pub fn get(&self, stack: LayerStack) -> Option<&DisplayInfo> {
        self.map.get(&stack)
    }

    /// Whether no display is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns the orientation to undo for layers on `stack`.
    ///
    /// Only the primary display's rotation is honoured.
    #[must_use]
    pub fn rotation_flags(&self, stack: LayerStack) -> Rotation {
        match self.map.get(&stack) {
            Some(info) if info.is_primary => info.rotation_flags,
            _ => Rotation::ROT_0,
        }
    }

    /// Bounds that comfortably contain every display.
    ///
    /// This is the largest logical width and height over all displays scaled
    /// by ten, centred on the origin.
    #[must_use]
    pub fn max_bounds(&self) -> Rect {
        let (w, h) = if self.map.is_empty() {
            (Self::FALLBACK_SIZE, Self::FALLBACK_SIZE)
        } else {
            self.map.values().fold((0, 0), |(w, h), d| {
                (w.max(d.logical_width), h.max(d.logical_height))
            })
        };
        let x = f64::from(w) * Self::ROOT_BOUNDS_SCALE;
        let y = f64::from(h) * Self::ROOT_BOUNDS_SCALE;
        Rect::new(-x, -y, x, y)
    }
}
