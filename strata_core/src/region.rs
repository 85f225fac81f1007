// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer rectangles and regions for hit-testing.
//!
//! Input dispatch works on 32-bit integer coordinates. [`IRect`] follows the
//! compositor convention where a rectangle with `right < left` or
//! `bottom < top` is *invalid* (used to mean "no size known"), while one with
//! zero width or height is merely *empty*.
//!
//! [`Region::transform_safely`] applies a transform to every rectangle while
//! checking each translated coordinate for `i32` overflow, dropping only the
//! rectangles that would overflow.

use alloc::vec::Vec;

use kurbo::{Affine, Rect};
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// An axis-aligned rectangle on the integer grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct IRect {
    /// Left edge (inclusive).
    pub left: i32,
    /// Top edge (inclusive).
    pub top: i32,
    /// Right edge (exclusive).
    pub right: i32,
    /// Bottom edge (exclusive).
    pub bottom: i32,
}

impl IRect {
    /// The empty rectangle at the origin.
    pub const EMPTY: Self = Self::new(0, 0, 0, 0);

    /// The canonical invalid rectangle, meaning "no bounds".
    pub const INVALID: Self = Self::new(0, 0, -1, -1);

    /// Creates a rectangle from its edges.
    #[inline]
    #[must_use]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Creates a rectangle at the origin with the given size.
    #[inline]
    #[must_use]
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Width, which may be negative for invalid rectangles.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.right.wrapping_sub(self.left)
    }

    /// Height, which may be negative for invalid rectangles.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.bottom.wrapping_sub(self.top)
    }

    /// Whether the rectangle has non-negative extent.
    #[inline]
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.width() >= 0 && self.height() >= 0
    }

    /// Whether the rectangle covers no area.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Edge-wise intersection. The result is empty or invalid when the inputs
    /// do not overlap.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        Self::new(
            self.left.max(other.left),
            self.top.max(other.top),
            self.right.min(other.right),
            self.bottom.min(other.bottom),
        )
    }

    /// Converts to a float rectangle.
    #[inline]
    #[must_use]
    pub fn to_rect(&self) -> Rect {
        Rect::new(
            f64::from(self.left),
            f64::from(self.top),
            f64::from(self.right),
            f64::from(self.bottom),
        )
    }

    /// Rounds each edge of a float rectangle to the nearest integer.
    ///
    /// Edges beyond the `i32` range saturate.
    #[must_use]
    pub fn from_rect_rounded(rect: Rect) -> Self {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "saturating float-to-int conversion is intended"
        )]
        let round = |v: f64| v.round() as i32;
        Self::new(round(rect.x0), round(rect.y0), round(rect.x1), round(rect.y1))
    }

    /// Shrinks `self` by `exclude` when `exclude` covers it completely along
    /// one axis and sticks out past exactly one edge.
    ///
    /// Returns [`IRect::EMPTY`] when `exclude` covers `self` entirely, and
    /// `self` unchanged when the difference is not a rectangle.
    #[must_use]
    pub fn reduce(&self, exclude: &Self) -> Self {
        let mut mask = 0_u8;
        if exclude.left > self.left {
            mask |= 1;
        }
        if exclude.top > self.top {
            mask |= 2;
        }
        if exclude.right < self.right {
            mask |= 4;
        }
        if exclude.bottom < self.bottom {
            mask |= 8;
        }
        let mut out = *self;
        match mask {
            0 => return Self::EMPTY,
            1 => out.right = out.right.min(exclude.left),
            2 => out.bottom = out.bottom.min(exclude.top),
            4 => out.left = out.left.max(exclude.right),
            8 => out.top = out.top.max(exclude.bottom),
            _ => {}
        }
        out
    }

    /// Translates by `(dx, dy)`, returning `None` if any edge overflows.
    #[must_use]
    pub fn checked_translate(&self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self::new(
            self.left.checked_add(dx)?,
            self.top.checked_add(dy)?,
            self.right.checked_add(dx)?,
            self.bottom.checked_add(dy)?,
        ))
    }
}

/// A set of rectangles.
///
/// Rectangles may overlap; the region is their union. Empty rectangles are
/// never stored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Region {
    rects: Vec<IRect>,
}

impl Region {
    /// Creates an empty region.
    #[must_use]
    pub const fn new() -> Self {
        Self { rects: Vec::new() }
    }

    /// Creates a region covering one rectangle.
    #[must_use]
    pub fn from_rect(rect: IRect) -> Self {
        let mut region = Self::new();
        region.add(rect);
        region
    }

    /// Adds a rectangle to the region, ignoring empty ones.
    pub fn add(&mut self, rect: IRect) {
        if !rect.is_empty() {
            self.rects.push(rect);
        }
    }

    /// Removes every rectangle.
    pub fn clear(&mut self) {
        self.rects.clear();
    }

    /// Whether the region covers no area.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// The rectangles making up this region.
    #[must_use]
    pub fn rects(&self) -> &[IRect] {
        &self.rects
    }

    /// The bounding box of the region, or [`IRect::EMPTY`].
    #[must_use]
    pub fn bounds(&self) -> IRect {
        self.rects
            .iter()
            .copied()
            .reduce(|a, b| {
                IRect::new(
                    a.left.min(b.left),
                    a.top.min(b.top),
                    a.right.max(b.right),
                    a.bottom.max(b.bottom),
                )
            })
            .unwrap_or(IRect::EMPTY)
    }

    /// Bounding box of `win` with this region cut out of it.
    ///
    /// A single-rectangle region goes through [`IRect::reduce`]; otherwise the
    /// exact bounds of the difference are computed on the grid spanned by
    /// all rectangle edges.
    #[must_use]
    pub fn reduce(&self, win: IRect) -> IRect {
        match self.rects.as_slice() {
            [] => win,
            [only] => win.reduce(only),
            rects => {
                if win.is_empty() {
                    return IRect::EMPTY;
                }
                let edges = |lo: i32, hi: i32, f: fn(&IRect) -> (i32, i32)| {
                    let mut v: Vec<i32> = rects
                        .iter()
                        .flat_map(|r| {
                            let (a, b) = f(r);
                            [a.clamp(lo, hi), b.clamp(lo, hi)]
                        })
                        .chain([lo, hi])
                        .collect();
                    v.sort_unstable();
                    v.dedup();
                    v
                };
                let xs = edges(win.left, win.right, |r: &IRect| (r.left, r.right));
                let ys = edges(win.top, win.bottom, |r: &IRect| (r.top, r.bottom));

                let mut remaining = Self::new();
                for x in xs.windows(2) {
                    for y in ys.windows(2) {
                        let cell = IRect::new(x[0], y[0], x[1], y[1]);
                        let covered = rects.iter().any(|r| {
                            r.left <= cell.left
                                && r.top <= cell.top
                                && r.right >= cell.right
                                && r.bottom >= cell.bottom
                        });
                        if !covered {
                            remaining.add(cell);
                        }
                    }
                }
                remaining.bounds()
            }
        }
    }

    /// Intersects every rectangle with `rect`.
    #[must_use]
    pub fn intersect(&self, rect: &IRect) -> Self {
        let mut out = Self::new();
        for r in &self.rects {
            out.add(r.intersect(rect));
        }
        out
    }

    /// Applies `t` to every rectangle, protecting against overflow from the
    /// translation component.
    ///
    /// The linear part of `t` is applied first; the translation, rounded to
    /// the nearest integer, is then added to each edge with overflow checks.
    /// Rectangles that would overflow are dropped and reported under `name`;
    /// the rest are kept.
    #[must_use]
    pub fn transform_safely(&self, t: Affine, name: &str) -> Self {
        let offset = t.translation();
        #[expect(
            clippy::cast_possible_truncation,
            reason = "saturating float-to-int conversion is intended"
        )]
        let (tx, ty) = ((offset.x + 0.5).floor() as i32, (offset.y + 0.5).floor() as i32);
        let linear = t.with_translation(kurbo::Vec2::ZERO);

        let mut out = Self::new();
        for rect in &self.rects {
            let transformed = crate::transform::transform_irect(linear, *rect);
            match transformed.checked_translate(tx, ty) {
                Some(r) => out.add(r),
                None => {
                    log::error!(
                        "Applying transform to touchable region of window '{name}' resulted in an overflow."
                    );
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validity_and_emptiness() {
        assert!(!IRect::INVALID.is_valid());
        assert!(IRect::INVALID.is_empty());
        assert!(IRect::EMPTY.is_valid());
        assert!(IRect::EMPTY.is_empty());
        assert!(IRect::from_size(4, 2).is_valid());
        assert!(!IRect::from_size(4, 2).is_empty());
    }

    #[test]
    fn intersect_disjoint_is_empty() {
        let a = IRect::new(0, 0, 10, 10);
        let b = IRect::new(20, 20, 30, 30);
        assert!(a.intersect(&b).is_empty());
        assert_eq!(a.intersect(&IRect::new(5, 5, 15, 15)), IRect::new(5, 5, 10, 10));
    }

    #[test]
    fn region_drops_empty_rects() {
        let mut region = Region::new();
        region.add(IRect::EMPTY);
        region.add(IRect::INVALID);
        assert!(region.is_empty());
        region.add(IRect::new(0, 0, 1, 1));
        assert_eq!(region.rects().len(), 1);
    }

    #[test]
    fn region_bounds() {
        let mut region = Region::from_rect(IRect::new(0, 0, 10, 10));
        region.add(IRect::new(20, -5, 30, 5));
        assert_eq!(region.bounds(), IRect::new(0, -5, 30, 10));
        assert_eq!(Region::new().bounds(), IRect::EMPTY);
    }

    #[test]
    fn reduce_trims_one_covered_side() {
        let win = IRect::new(0, 0, 100, 100);
        assert_eq!(win.reduce(&IRect::new(-10, -10, 110, 20)), IRect::new(0, 20, 100, 100));
        assert_eq!(win.reduce(&IRect::new(60, -10, 110, 110)), IRect::new(0, 0, 60, 100));
        assert_eq!(win.reduce(&IRect::new(-1, -1, 101, 101)), IRect::EMPTY);
        assert_eq!(
            win.reduce(&IRect::new(40, 40, 60, 60)),
            win,
            "a hole leaves the bounds alone"
        );
    }

    #[test]
    fn region_reduce_cuts_out_every_rect() {
        let win = IRect::new(0, 0, 100, 100);
        assert_eq!(Region::new().reduce(win), win);
        assert_eq!(
            Region::from_rect(IRect::new(0, 0, 100, 30)).reduce(win),
            IRect::new(0, 30, 100, 100)
        );

        let mut strips = Region::from_rect(IRect::new(0, 0, 100, 30));
        strips.add(IRect::new(0, 70, 100, 100));
        assert_eq!(strips.reduce(win), IRect::new(0, 30, 100, 70));

        let mut halves = Region::from_rect(IRect::new(0, 0, 50, 100));
        halves.add(IRect::new(40, 0, 100, 100));
        assert_eq!(halves.reduce(win), IRect::EMPTY, "fully covered");
    }

    #[test]
    fn transform_safely_translates() {
        let region = Region::from_rect(IRect::new(0, 0, 10, 10));
        let out = region.transform_safely(Affine::translate((5.0, -3.0)), "win");
        assert_eq!(out.rects(), &[IRect::new(5, -3, 15, 7)]);
    }

    #[test]
    fn transform_safely_drops_only_overflowing_rects() {
        let mut region = Region::new();
        region.add(IRect::new(0, 0, 10, 10));
        region.add(IRect::new(i32::MAX - 20, 0, i32::MAX - 10, 10));
        let out = region.transform_safely(Affine::translate((100.0, 0.0)), "overflowing");
        assert_eq!(
            out.rects(),
            &[IRect::new(100, 0, 110, 10)],
            "only the rectangle that overflows is dropped"
        );
    }

    #[test]
    fn transform_safely_overflowing_translation_never_panics() {
        let region = Region::from_rect(IRect::new(1, 1, 2, 2));
        let out = region.transform_safely(Affine::translate((f64::from(i32::MAX), 0.0)), "far");
        assert!(out.is_empty(), "every rectangle overflows");
    }

    #[test]
    fn transform_safely_applies_linear_part() {
        let region = Region::from_rect(IRect::new(0, 0, 10, 20));
        let t = Affine::translate((1.0, 1.0)) * Affine::scale(2.0);
        let out = region.transform_safely(t, "scaled");
        assert_eq!(out.rects(), &[IRect::new(1, 1, 21, 41)]);
    }
}
