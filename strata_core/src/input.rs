// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input descriptors handed to the input dispatcher.
//!
//! A layer opts into hit-testing by carrying an [`InputRequest`]. The
//! snapshot builder turns that request into an [`InputInfo`] expressed in
//! display space: frame, display-to-input transform, touchable region, and
//! the policy flags resolved from the layer's ancestry.

use bitflags::bitflags;
use kurbo::Affine;

use crate::output::LayerStack;
use crate::region::{IRect, Region};

bitflags! {
    /// Window input configuration flags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct InputConfig: u32 {
        /// The window has no input channel; it only takes part in occlusion.
        const NO_INPUT_CHANNEL = 1 << 0;
        /// The window is not visible to the input dispatcher.
        const NOT_VISIBLE = 1 << 1;
        /// The window does not receive touches.
        const NOT_TOUCHABLE = 1 << 2;
        /// The window cannot take focus.
        const NOT_FOCUSABLE = 1 << 3;
        /// All input to the window is dropped.
        const DROP_INPUT = 1 << 4;
        /// Input is dropped if the window is obscured.
        const DROP_INPUT_IF_OBSCURED = 1 << 5;
        /// The window is a trusted system overlay.
        const TRUSTED_OVERLAY = 1 << 6;
        /// The window is a mirrored instance.
        const CLONE = 1 << 7;
    }
}

/// How strictly a layer suppresses touch delivery.
///
/// Variants are ordered by restrictiveness, so the effective mode of a layer
/// is the maximum of its own and its parent's.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DropInputMode {
    /// Input is delivered normally.
    #[default]
    None,
    /// Input is dropped when the window is obscured or cropped by an
    /// ancestor.
    Obscured,
    /// Input is always dropped.
    All,
}

/// How touches passing through this window are treated by windows below.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TouchOcclusionMode {
    /// Block touches unless the window is trusted.
    #[default]
    BlockUntrusted,
    /// Block touches depending on the window's opacity.
    UseOpacity,
    /// Never block touches.
    Allow,
}

/// The input configuration a client requests for one layer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputRequest {
    /// Requested flags; policy flags are added on top.
    pub config: InputConfig,
    /// Touchable region in input space.
    pub touchable_region: Region,
    /// Inset applied symmetrically to the input bounds.
    pub surface_inset: i32,
    /// Replace the touchable region with the touch-crop layer's bounds.
    pub replace_touchable_region_with_crop: bool,
    /// Occlusion mode; inherited from the parent when unset.
    pub touch_occlusion_mode: Option<TouchOcclusionMode>,
}

impl InputRequest {
    /// Creates a request with the given touchable region.
    #[must_use]
    pub fn with_region(touchable_region: Region) -> Self {
        Self {
            touchable_region,
            ..Self::default()
        }
    }
}

/// The resolved input descriptor of one snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct InputInfo {
    /// Display the window lives on.
    pub display_id: LayerStack,
    /// Window frame in display space.
    pub frame: IRect,
    /// Display-to-input transform.
    pub transform: Affine,
    /// Touchable region in display space.
    pub touchable_region: Region,
    /// Resolved flags.
    pub config: InputConfig,
    /// Resolved occlusion mode.
    pub touch_occlusion_mode: TouchOcclusionMode,
    /// Inset copied from the request.
    pub surface_inset: i32,
    /// Copied from the request.
    pub replace_touchable_region_with_crop: bool,
    /// Resolved alpha of the layer.
    pub alpha: f32,
}

impl Default for InputInfo {
    fn default() -> Self {
        Self {
            display_id: LayerStack::DEFAULT,
            frame: IRect::EMPTY,
            transform: Affine::IDENTITY,
            touchable_region: Region::new(),
            config: InputConfig::empty(),
            touch_occlusion_mode: TouchOcclusionMode::BlockUntrusted,
            surface_inset: 0,
            replace_touchable_region_with_crop: false,
            alpha: 1.0,
        }
    }
}

impl InputInfo {
    /// Whether the layer has an input channel.
    #[inline]
    #[must_use]
    pub fn has_input_channel(&self) -> bool {
        !self.config.contains(InputConfig::NO_INPUT_CHANNEL)
    }

    /// Resets the descriptor to the client's request, discarding everything
    /// derived in a previous update.
    pub fn reset_from(&mut self, request: &InputRequest, parent_mode: TouchOcclusionMode) {
        self.config = request.config;
        self.touchable_region = request.touchable_region.clone();
        self.surface_inset = request.surface_inset;
        self.replace_touchable_region_with_crop = request.replace_touchable_region_with_crop;
        self.touch_occlusion_mode = request.touch_occlusion_mode.unwrap_or(parent_mode);
    }
}
