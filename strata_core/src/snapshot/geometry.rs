// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry composition: transforms, bounds, rounded corners and shadows.
//!
//! Every function here reads the layer's own descriptor and the resolved
//! snapshot of its parent occurrence, and writes only the child snapshot.

use kurbo::{Rect, Vec2};

use super::{LayerSnapshot, RoundedCornerState};
use crate::effects::ShadowSettings;
use crate::region::IRect;
use crate::scene::LayerDescriptor;
use crate::transform::{self, Rotation};

/// Whether a float rectangle covers no area.
///
/// Inverted rectangles count as empty, matching the integer convention.
#[inline]
pub(crate) fn rect_is_empty(r: Rect) -> bool {
    r.width() <= 0.0 || r.height() <= 0.0
}

/// Composes the layer's transforms and bounds with its parent's.
///
/// An invalid composed transform is reset to identity and flagged on the
/// snapshot, so the damage stays within this level of the tree.
pub(crate) fn update_layer_bounds(
    snapshot: &mut LayerSnapshot,
    requested: &LayerDescriptor,
    parent: &LayerSnapshot,
    display_rotation: Rotation,
) {
    snapshot.cropped_buffer_size = requested.cropped_buffer_size(snapshot.buffer_size);
    snapshot.geom_crop = requested.crop();
    snapshot.local_transform = requested.transform(display_rotation);
    snapshot.local_transform_inverse = transform::inverse_or_identity(snapshot.local_transform);
    snapshot.geom_layer_transform = parent.geom_layer_transform * snapshot.local_transform;
    snapshot.invalid_transform = !transform::is_valid(snapshot.geom_layer_transform);
    if snapshot.invalid_transform {
        log::warn!(
            "Resetting transform for {} ({}) because it has an invalid transformation.",
            requested.name(),
            requested.id()
        );
        snapshot.geom_layer_transform = kurbo::Affine::IDENTITY;
    }
    snapshot.geom_inverse_layer_transform =
        transform::inverse_or_identity(snapshot.geom_layer_transform);
    snapshot.cursor_frame = if snapshot.cropped_buffer_size.is_valid() {
        let visible = requested
            .transparent_region
            .reduce(snapshot.cropped_buffer_size);
        transform::transform_irect(snapshot.geom_layer_transform, visible)
    } else {
        IRect::EMPTY
    };

    let parent_bounds =
        transform::transform_rect(snapshot.local_transform_inverse, parent.geom_layer_bounds);
    let mut bounds = if requested.buffer().is_some() {
        snapshot.buffer_size.to_rect()
    } else {
        parent_bounds
    };
    if !requested.crop().is_empty() {
        bounds = bounds.intersect(requested.crop().to_rect());
    }
    snapshot.geom_layer_bounds = bounds.intersect(parent_bounds);
    snapshot.transformed_bounds =
        transform::transform_rect(snapshot.geom_layer_transform, snapshot.geom_layer_bounds);
    snapshot.parent_transform = parent.geom_layer_transform;

    snapshot.buffer_needs_filtering = requested
        .unrotated_buffer_size(display_rotation)
        .is_some_and(|size| buffer_needs_filtering(snapshot.geom_layer_bounds, size));
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "layer bounds are compared on the integer grid"
)]
fn buffer_needs_filtering(bounds: Rect, (w, h): (i32, i32)) -> bool {
    bounds.width() as i32 != w || bounds.height() as i32 != h
}

/// Resolves the rounded-corner clip for the layer.
///
/// The parent's clip is carried into local space. When both the parent and
/// the layer round their corners, the parent's clip wins only if it lies
/// strictly inside the layer's crop on all four edges.
pub(crate) fn update_rounded_corner(
    snapshot: &mut LayerSnapshot,
    requested: &LayerDescriptor,
    parent: &LayerSnapshot,
) {
    snapshot.rounded_corner = RoundedCornerState::default();

    let mut parent_corner = RoundedCornerState::default();
    if parent.rounded_corner.has_rounded_corners() {
        let t = snapshot.local_transform_inverse;
        parent_corner.crop_rect = transform::transform_rect(t, parent.rounded_corner.crop_rect);
        parent_corner.radius = Vec2::new(
            parent.rounded_corner.radius.x * transform::scale_x(t),
            parent.rounded_corner.radius.y * transform::scale_y(t),
        );
    }

    let layer_crop = snapshot.cropped_buffer_size.to_rect();
    let radius = f64::from(requested.corner_radius);
    let layer_corner = RoundedCornerState {
        crop_rect: layer_crop,
        radius: Vec2::new(radius, radius),
    };
    let layer_valid = layer_corner.has_rounded_corners() && !rect_is_empty(layer_crop);
    let parent_valid = parent_corner.has_rounded_corners();

    snapshot.rounded_corner = match (layer_valid, parent_valid) {
        (true, true) => {
            let p = parent_corner.crop_rect;
            let inside = p.x0 > layer_crop.x0
                && p.y0 > layer_crop.y0
                && p.x1 < layer_crop.x1
                && p.y1 < layer_crop.y1;
            if inside { parent_corner } else { layer_corner }
        }
        (true, false) => layer_corner,
        (false, true) => parent_corner,
        (false, false) => RoundedCornerState::default(),
    };
}

/// Resolves the layer's shadow from the global preset.
pub(crate) fn update_shadows(
    snapshot: &mut LayerSnapshot,
    requested: &LayerDescriptor,
    preset: &ShadowSettings,
) {
    snapshot.shadow_radius = requested.shadow_radius;
    snapshot.shadow_settings.length = requested.shadow_radius;
    if snapshot.shadow_radius > 0.0 {
        snapshot.shadow_settings = preset.clone();
        snapshot.shadow_settings.boundaries = snapshot.geom_layer_bounds;
        snapshot.shadow_settings.caster_is_translucent =
            !snapshot.is_content_opaque() || snapshot.alpha < 1.0;
        snapshot.shadow_settings.ambient_color *= snapshot.alpha;
        snapshot.shadow_settings.spot_color *= snapshot.alpha;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::BufferRef;
    use crate::color::Color;
    use crate::region::Region;
    use crate::scene::{LayerId, TraversalPath};
    use alloc::string::String;
    use kurbo::{Affine, Point};

    fn descriptor(id: u32) -> LayerDescriptor {
        LayerDescriptor::new(LayerId(id), String::from("geometry"))
    }

    fn resolve(requested: &LayerDescriptor, parent: &LayerSnapshot) -> LayerSnapshot {
        let mut s = LayerSnapshot::new(requested, TraversalPath::of(requested.id()));
        s.buffer_size = requested.buffer_size(Rotation::ROT_0);
        update_layer_bounds(&mut s, requested, parent, Rotation::ROT_0);
        update_rounded_corner(&mut s, requested, parent);
        s
    }

    #[test]
    fn bounds_follow_crop_and_parent() {
        let root = LayerSnapshot::root();
        let mut d = descriptor(1);
        d.set_position(10.0, 20.0);
        d.set_crop(IRect::new(0, 0, 100, 50));
        let s = resolve(&d, &root);
        assert_eq!(s.geom_layer_bounds, Rect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(s.transformed_bounds, Rect::new(10.0, 20.0, 110.0, 70.0));
        assert_eq!(s.parent_transform, Affine::IDENTITY);

        let mut child = descriptor(2);
        child.set_position(-5.0, 0.0);
        let c = resolve(&child, &s);
        assert_eq!(c.geom_layer_bounds, Rect::new(5.0, 0.0, 105.0, 50.0));
        assert_eq!(c.transformed_bounds, s.transformed_bounds);
    }

    #[test]
    fn buffer_bounds_and_filtering() {
        let root = LayerSnapshot::root();
        let mut d = descriptor(1);
        d.set_buffer(Some(BufferRef::new(1, 64, 32)));
        let s = resolve(&d, &root);
        assert_eq!(s.geom_layer_bounds, Rect::new(0.0, 0.0, 64.0, 32.0));
        assert!(!s.buffer_needs_filtering);

        d.set_crop(IRect::new(0, 0, 16, 16));
        let s = resolve(&d, &root);
        assert!(s.buffer_needs_filtering);
        assert_eq!(s.cropped_buffer_size, IRect::new(0, 0, 16, 16));
    }

    #[test]
    fn cursor_frame_skips_transparent_columns() {
        let root = LayerSnapshot::root();
        let mut d = descriptor(1);
        assert_eq!(resolve(&d, &root).cursor_frame, IRect::EMPTY);

        d.set_buffer(Some(BufferRef::new(1, 64, 32)));
        d.set_position(10.0, 0.0);
        assert_eq!(resolve(&d, &root).cursor_frame, IRect::new(10, 0, 74, 32));

        d.set_transparent_region(Region::from_rect(IRect::new(0, 0, 16, 32)));
        assert_eq!(resolve(&d, &root).cursor_frame, IRect::new(26, 0, 74, 32));
    }

    #[test]
    fn singular_transform_is_reset() {
        let root = LayerSnapshot::root();
        let mut d = descriptor(1);
        d.set_matrix(0.0, 0.0, 0.0, 0.0);
        let s = resolve(&d, &root);
        assert!(s.invalid_transform);
        assert_eq!(s.geom_layer_transform, Affine::IDENTITY);
        assert_eq!(s.geom_inverse_layer_transform, Affine::IDENTITY);
    }

    #[test]
    fn parent_corner_scales_into_local_space() {
        let mut parent = LayerSnapshot::root();
        parent.rounded_corner = RoundedCornerState {
            crop_rect: Rect::new(0.0, 0.0, 100.0, 100.0),
            radius: Vec2::new(8.0, 8.0),
        };
        let mut d = descriptor(1);
        d.set_transform(Affine::scale(2.0));
        let s = resolve(&d, &parent);
        assert_eq!(s.rounded_corner.crop_rect, Rect::new(0.0, 0.0, 50.0, 50.0));
        assert_eq!(s.rounded_corner.radius, Vec2::new(4.0, 4.0));
    }

    #[test]
    fn parent_corner_follows_rotated_axes() {
        let mut parent = LayerSnapshot::root();
        parent.rounded_corner = RoundedCornerState {
            crop_rect: Rect::new(0.0, 0.0, 100.0, 100.0),
            radius: Vec2::new(8.0, 8.0),
        };
        let mut d = descriptor(1);
        // Scale (2, 3) followed by a quarter turn.
        d.set_transform(Affine::new([0.0, 2.0, -3.0, 0.0, 0.0, 0.0]));
        let s = resolve(&d, &parent);
        let radius = s.rounded_corner.radius;
        assert!((radius.x - 4.0).abs() < 1e-9, "got {radius:?}");
        assert!((radius.y - 8.0 / 3.0).abs() < 1e-9, "got {radius:?}");
    }

    #[test]
    fn shadow_scales_with_alpha() {
        let preset = ShadowSettings {
            ambient_color: Color::new(0.0, 0.0, 0.0, 0.5),
            spot_color: Color::new(0.0, 0.0, 0.0, 1.0),
            light_pos: Point::new(0.0, 0.0),
            length: 200.0,
            ..ShadowSettings::default()
        };
        let mut d = descriptor(1);
        d.set_shadow_radius(12.0);
        let mut s = resolve(&d, &LayerSnapshot::root());
        s.alpha = 0.5;
        s.color = Color::new(0.0, 0.0, 0.0, 0.5);
        update_shadows(&mut s, &d, &preset);
        assert_eq!(s.shadow_radius, 12.0);
        assert_eq!(s.shadow_settings.length, 200.0);
        assert_eq!(s.shadow_settings.ambient_color.a, 0.25);
        assert_eq!(s.shadow_settings.spot_color.a, 0.5);
        assert!(s.shadow_settings.caster_is_translucent);
        assert_eq!(s.shadow_settings.boundaries, s.geom_layer_bounds);

        d.set_shadow_radius(0.0);
        update_shadows(&mut s, &d, &preset);
        assert_eq!(s.shadow_settings.length, 0.0);
        assert!(!s.draw_shadows());
    }
}
