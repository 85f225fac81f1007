// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Colours and colour transforms.

use core::ops::{Mul, MulAssign};

/// A linear RGBA colour with `f32` channels.
///
/// Negative RGB channels mean "no fill colour": a layer with such a colour
/// only draws its buffer (if any).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Color {
    /// No fill colour, fully opaque alpha.
    pub const NO_FILL: Self = Self::new(-1.0, -1.0, -1.0, 1.0);

    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Creates a colour from its channels.
    #[inline]
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Whether all RGB channels are non-negative, i.e. a fill colour is set.
    #[inline]
    #[must_use]
    pub fn has_fill(&self) -> bool {
        self.r >= 0.0 && self.g >= 0.0 && self.b >= 0.0
    }

    /// Returns this colour with `rgb` replaced by `other`'s.
    #[inline]
    #[must_use]
    pub const fn with_rgb_of(self, other: Self) -> Self {
        Self::new(other.r, other.g, other.b, self.a)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::NO_FILL
    }
}

impl Mul<f32> for Color {
    type Output = Self;

    /// Scales all four channels.
    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.r * rhs, self.g * rhs, self.b * rhs, self.a * rhs)
    }
}

impl MulAssign<f32> for Color {
    #[inline]
    fn mul_assign(&mut self, rhs: f32) {
        *self = *self * rhs;
    }
}

/// A column-major 4×4 colour matrix applied to `[r, g, b, a]`.
///
/// Each inner array is one *column*, the same layout GPU colour-matrix
/// uniforms use.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorMatrix {
    /// Four columns, each `[r, g, b, a]`.
    pub cols: [[f32; 4]; 4],
}

impl ColorMatrix {
    /// The identity colour transform.
    pub const IDENTITY: Self = Self::from_diagonal(1.0, 1.0, 1.0, 1.0);

    /// Creates a matrix from four columns.
    #[inline]
    #[must_use]
    pub const fn from_cols(cols: [[f32; 4]; 4]) -> Self {
        Self { cols }
    }

    /// Creates a per-channel gain matrix.
    #[inline]
    #[must_use]
    pub const fn from_diagonal(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            cols: [
                [r, 0.0, 0.0, 0.0],
                [0.0, g, 0.0, 0.0],
                [0.0, 0.0, b, 0.0],
                [0.0, 0.0, 0.0, a],
            ],
        }
    }

    /// Whether this is exactly the identity.
    #[inline]
    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Applies the matrix to a colour.
    #[must_use]
    pub fn apply(&self, c: Color) -> Color {
        let v = [c.r, c.g, c.b, c.a];
        let row = |i: usize| -> f32 { (0..4).map(|k| self.cols[k][i] * v[k]).sum() };
        Color::new(row(0), row(1), row(2), row(3))
    }
}

impl Default for ColorMatrix {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for ColorMatrix {
    type Output = Self;

    /// `self * rhs` applies `rhs` first, then `self`.
    fn mul(self, rhs: Self) -> Self {
        let mut out = [[0.0_f32; 4]; 4];
        for (j, col) in out.iter_mut().enumerate() {
            for (i, cell) in col.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.cols[k][i] * rhs.cols[j][k]).sum();
            }
        }
        Self { cols: out }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_fill_by_default() {
        assert!(!Color::default().has_fill());
        assert!(Color::BLACK.has_fill());
    }

    #[test]
    fn scaling_touches_every_channel() {
        let c = Color::new(0.2, 0.4, 0.6, 0.8) * 0.5;
        assert_eq!(c, Color::new(0.1, 0.2, 0.3, 0.4));
    }

    #[test]
    fn identity_multiply() {
        let m = ColorMatrix::from_diagonal(0.5, 1.0, 2.0, 1.0);
        assert_eq!(ColorMatrix::IDENTITY * m, m);
        assert_eq!(m * ColorMatrix::IDENTITY, m);
        assert!(ColorMatrix::default().is_identity());
    }

    #[test]
    fn composition_applies_right_first() {
        let gain = ColorMatrix::from_diagonal(2.0, 2.0, 2.0, 1.0);
        let mut swap_rg = ColorMatrix::from_diagonal(0.0, 0.0, 1.0, 1.0);
        swap_rg.cols[0][1] = 1.0;
        swap_rg.cols[1][0] = 1.0;
        let c = Color::new(0.25, 0.5, 0.0, 1.0);
        assert_eq!((gain * swap_rg).apply(c), gain.apply(swap_rg.apply(c)));
        assert_eq!((gain * swap_rg).apply(c), Color::new(1.0, 0.5, 0.0, 1.0));
    }
}
