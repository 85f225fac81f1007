// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Orientation flags and 2-D affine helpers.
//!
//! Layer transforms are plain [`kurbo::Affine`] values. This module adds the
//! pieces the snapshot builder needs on top of `kurbo`: the buffer/display
//! orientation flag set, a validity test for composed transforms, per-axis
//! scale factors, and rounding of transformed rectangles onto the integer
//! grid used by hit-testing.

use bitflags::bitflags;
use kurbo::{Affine, Rect};
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::region::IRect;

bitflags! {
    /// Buffer or display orientation.
    ///
    /// The encoding matches the usual compositor convention: 180° is both
    /// flips, 270° is both flips plus a 90° rotation.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Rotation: u32 {
        /// Mirror horizontally.
        const FLIP_H = 1 << 0;
        /// Mirror vertically.
        const FLIP_V = 1 << 1;
        /// Rotate 90° clockwise.
        const ROT_90 = 1 << 2;
        /// Rotate 180°.
        const ROT_180 = Self::FLIP_H.bits() | Self::FLIP_V.bits();
        /// Rotate 270° clockwise.
        const ROT_270 = Self::ROT_180.bits() | Self::ROT_90.bits();
    }
}

impl Rotation {
    /// No rotation.
    pub const ROT_0: Self = Self::empty();

    /// Whether this orientation swaps width and height.
    #[inline]
    #[must_use]
    pub const fn swaps_axes(self) -> bool {
        self.contains(Self::ROT_90)
    }
}

/// Whether a composed transform can safely be handed to descendants.
///
/// A transform is valid when its linear part is invertible and finite.
#[must_use]
pub fn is_valid(t: Affine) -> bool {
    let det = t.determinant();
    det != 0.0 && det.is_finite() && t.is_finite()
}

/// Returns the inverse of `t`, or the identity if `t` is not invertible.
#[must_use]
pub fn inverse_or_identity(t: Affine) -> Affine {
    if is_valid(t) { t.inverse() } else { Affine::IDENTITY }
}

/// Scale factor of `t` along the x axis.
///
/// This is the norm of the row producing the output x coordinate, the
/// convention compositor transforms use when scaling corner radii.
#[must_use]
pub fn scale_x(t: Affine) -> f64 {
    let [a, _, c, ..] = t.as_coeffs();
    a.hypot(c)
}

/// Scale factor of `t` along the y axis, the norm of the output y row.
#[must_use]
pub fn scale_y(t: Affine) -> f64 {
    let [_, b, _, d, ..] = t.as_coeffs();
    b.hypot(d)
}

/// Whether `t` is exactly the identity.
#[inline]
#[must_use]
pub fn is_identity(t: Affine) -> bool {
    t == Affine::IDENTITY
}

/// Transforms `rect` by `t` and returns the bounding box.
#[inline]
#[must_use]
pub fn transform_rect(t: Affine, rect: Rect) -> Rect {
    t.transform_rect_bbox(rect)
}

/// Transforms an integer rectangle by `t` and rounds the bounding box back
/// onto the integer grid.
#[must_use]
pub fn transform_irect(t: Affine, rect: IRect) -> IRect {
    IRect::from_rect_rounded(t.transform_rect_bbox(rect.to_rect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_encoding() {
        assert_eq!(Rotation::ROT_180.bits(), 3);
        assert_eq!(Rotation::ROT_270.bits(), 7);
        assert!(Rotation::ROT_270.swaps_axes());
        assert!(!Rotation::ROT_180.swaps_axes());
        assert!(!Rotation::ROT_0.swaps_axes());
    }

    #[test]
    fn singular_transform_is_invalid() {
        assert!(is_valid(Affine::IDENTITY));
        assert!(!is_valid(Affine::scale_non_uniform(0.0, 1.0)));
        assert!(!is_valid(Affine::new([f64::NAN, 0.0, 0.0, 1.0, 0.0, 0.0])));
        assert!(!is_valid(Affine::translate((f64::INFINITY, 0.0))));
    }

    #[test]
    fn inverse_falls_back_to_identity() {
        assert_eq!(
            inverse_or_identity(Affine::scale(0.0)),
            Affine::IDENTITY,
            "singular transforms have no inverse"
        );
        let t = Affine::translate((3.0, 4.0));
        assert_eq!(inverse_or_identity(t), Affine::translate((-3.0, -4.0)));
    }

    #[test]
    fn axis_scales() {
        let t = Affine::scale_non_uniform(2.0, 3.0) * Affine::translate((7.0, 7.0));
        assert_eq!(scale_x(t), 2.0);
        assert_eq!(scale_y(t), 3.0);

        // Scale (2, 3) followed by a quarter turn: x' = -3y, y' = 2x.
        let rotated = Affine::new([0.0, 2.0, -3.0, 0.0, 0.0, 0.0]);
        assert_eq!(scale_x(rotated), 3.0, "output x is driven by the y scale");
        assert_eq!(scale_y(rotated), 2.0, "output y is driven by the x scale");
    }

    #[test]
    fn transformed_irect_rounds() {
        let r = IRect::new(0, 0, 10, 10);
        let t = Affine::translate((0.4, 0.6)) * Affine::scale(1.5);
        assert_eq!(transform_irect(t, r), IRect::new(0, 1, 15, 16));
    }
}
