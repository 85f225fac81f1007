// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visual effect parameters carried by descriptors and snapshots.

use alloc::vec::Vec;

use bitflags::bitflags;
use kurbo::{Point, Rect};

use crate::color::Color;
use crate::region::IRect;

/// Shadow parameters.
///
/// The compositor owns one global preset; a layer requesting a shadow radius
/// gets a copy of the preset bounded by its own bounds and faded by its
/// alpha.
#[derive(Clone, Debug, PartialEq)]
pub struct ShadowSettings {
    /// Bounds of the casting layer, in layer space.
    pub boundaries: Rect,
    /// Ambient shadow colour.
    pub ambient_color: Color,
    /// Spot shadow colour.
    pub spot_color: Color,
    /// Light position.
    pub light_pos: Point,
    /// Light radius.
    pub light_radius: f32,
    /// Shadow length. Zero disables the shadow.
    pub length: f32,
    /// Whether the shadow must also be drawn underneath the caster.
    pub caster_is_translucent: bool,
}

impl Default for ShadowSettings {
    fn default() -> Self {
        Self {
            boundaries: Rect::ZERO,
            ambient_color: Color::TRANSPARENT,
            spot_color: Color::TRANSPARENT,
            light_pos: Point::ORIGIN,
            light_radius: 0.0,
            length: 0.0,
            caster_is_translucent: false,
        }
    }
}

/// Overscroll stretch parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StretchEffect {
    /// Stretch direction and strength along x.
    pub vector_x: f32,
    /// Stretch direction and strength along y.
    pub vector_y: f32,
    /// Maximum stretch along x.
    pub max_amount_x: f32,
    /// Maximum stretch along y.
    pub max_amount_y: f32,
}

impl StretchEffect {
    /// Whether this stretch does anything.
    #[inline]
    #[must_use]
    pub fn has_effect(&self) -> bool {
        self.vector_x != 0.0 || self.vector_y != 0.0
    }
}

/// A blurred area behind a layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlurRegion {
    /// Blur radius in pixels.
    pub blur_radius: u32,
    /// Corner radius of the blurred area.
    pub corner_radius: f32,
    /// Opacity of the blur.
    pub alpha: f32,
    /// Blurred area in layer space.
    pub bounds: IRect,
}

bitflags! {
    /// Which HDR metadata blocks are present.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct HdrMetadataTypes: u32 {
        /// SMPTE ST 2086 mastering display colour volume.
        const SMPTE2086 = 1 << 0;
        /// CTA 861.3 content light level.
        const CTA861_3 = 1 << 1;
        /// HDR10+ dynamic metadata.
        const HDR10PLUS = 1 << 2;
    }
}

/// HDR metadata attached to buffer content.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HdrMetadata {
    /// Which blocks below are valid.
    pub valid_types: HdrMetadataTypes,
    /// Maximum content light level (nits).
    pub max_content_light_level: f32,
    /// Maximum frame-average light level (nits).
    pub max_frame_average_light_level: f32,
    /// Opaque HDR10+ payload.
    pub hdr10plus: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stretch_effect_needs_a_vector() {
        assert!(!StretchEffect::default().has_effect());
        let s = StretchEffect {
            vector_y: -0.5,
            ..StretchEffect::default()
        };
        assert!(s.has_effect());
    }
}
