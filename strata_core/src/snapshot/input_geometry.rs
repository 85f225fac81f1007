// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input geometry: the hit-test view of a snapshot.
//!
//! Hit-testing works in display space on the integer grid. The functions
//! here project a snapshot's layer-space bounds into that space, derive the
//! display-to-input transform, and apply drop-input and occlusion policy.
//!
//! Coordinate spaces, as used in the names below:
//! - *layer*: the layer's own space.
//! - *screen*: the logical, post-rotation display space.
//! - *display*: the physical display's pixels.
//! - *input*: layer space shifted to the inset origin.

use kurbo::{Affine, Rect, Vec2};

use super::LayerSnapshot;
use crate::input::{DropInputMode, InputConfig};
use crate::output::DisplayInfo;
use crate::region::{IRect, Region};
use crate::scene::{LayerDescriptor, TraversalPath};
use crate::transform;

/// Lookups [`update_input`] needs from outside the snapshot being resolved.
#[derive(Clone, Copy, Debug)]
pub(crate) struct InputContext<'a> {
    /// The snapshot's display, or the default one.
    pub(crate) display: &'a DisplayInfo,
    /// Whether the snapshot's layer stack has no registered display.
    pub(crate) no_valid_display: bool,
    /// Transformed bounds of the touch-crop target, if it resolved.
    pub(crate) touch_crop_bounds: Option<Rect>,
    /// Transformed bounds of the innermost mirror root, if it resolved.
    pub(crate) clone_root_bounds: Option<Rect>,
}

/// Layer-to-screen transform used for input.
///
/// Buffer placement is a rendering concern, so layers with content use
/// their parent's transform.
#[must_use]
pub fn input_transform(snapshot: &LayerSnapshot) -> Affine {
    if snapshot.has_buffer_or_sideband() {
        snapshot.parent_transform
    } else {
        snapshot.geom_layer_transform
    }
}

/// Input bounds in layer space, with the local transform applied for
/// layers with content.
#[must_use]
pub fn input_bounds(snapshot: &LayerSnapshot) -> IRect {
    let cropped = snapshot.cropped_buffer_size;
    if !snapshot.has_buffer_or_sideband()
        || transform::is_identity(snapshot.local_transform)
        || !cropped.is_valid()
    {
        return cropped;
    }
    transform::transform_irect(snapshot.local_transform, cropped)
}

/// Computes the display-space frame, the display-to-input transform, and
/// moves the touchable region from input space into display space.
pub(crate) fn fill_input_frame_info(snapshot: &mut LayerSnapshot, screen_to_display: Affine) {
    let mut bounds = input_bounds(snapshot);
    if !bounds.is_valid() {
        // Still give the layer a coordinate space of its own, in case its
        // touchable region is later replaced by a crop.
        snapshot.input_info.touchable_region.clear();
        bounds = IRect::EMPTY;
    }
    let bounds_in_layer = bounds.to_rect();

    let inset = f64::from(snapshot.input_info.surface_inset);
    let x_inset = inset.min(bounds_in_layer.width() / 2.0).max(0.0);
    let y_inset = inset.min(bounds_in_layer.height() / 2.0).max(0.0);
    let inset_bounds = Rect::new(
        bounds_in_layer.x0 + x_inset,
        bounds_in_layer.y0 + y_inset,
        bounds_in_layer.x1 - x_inset,
        bounds_in_layer.y1 - y_inset,
    );
    let cropped_inset_bounds = snapshot.geom_layer_bounds.intersect(inset_bounds);

    let layer_to_display = screen_to_display * input_transform(snapshot);
    snapshot.input_info.frame = IRect::from_rect_rounded(transform::transform_rect(
        layer_to_display,
        cropped_inset_bounds,
    ));

    let input_to_layer = Affine::translate(Vec2::new(inset_bounds.x0, inset_bounds.y0));
    let input_to_display = layer_to_display * input_to_layer;
    snapshot.input_info.transform = transform::inverse_or_identity(input_to_display);
    snapshot.input_info.touchable_region = snapshot
        .input_info
        .touchable_region
        .transform_safely(input_to_display, &snapshot.name);
}

/// Applies the effective drop-input mode to the input configuration.
pub(crate) fn handle_drop_input_mode(snapshot: &mut LayerSnapshot, parent_alpha: f32) {
    let config = &mut snapshot.input_info.config;
    if config.contains(InputConfig::NO_INPUT_CHANNEL) {
        return;
    }
    match snapshot.drop_input_mode {
        DropInputMode::None => {}
        DropInputMode::All => {
            log::trace!("dropping input for {} as requested by policy", snapshot.name);
            config.insert(InputConfig::DROP_INPUT);
        }
        DropInputMode::Obscured => {
            if parent_alpha != 1.0 {
                log::trace!(
                    "dropping input for {} because parent alpha is {parent_alpha}",
                    snapshot.name
                );
                config.insert(InputConfig::DROP_INPUT);
            }
            let cropped = snapshot.cropped_buffer_size;
            if !cropped.is_valid() {
                config.insert(InputConfig::DROP_INPUT_IF_OBSCURED);
                return;
            }
            // An ancestor crop shows up as a difference between the content
            // bounds and the transformed bounds.
            let content_on_screen =
                transform::transform_irect(snapshot.geom_layer_transform, cropped);
            if content_on_screen != IRect::from_rect_rounded(snapshot.transformed_bounds) {
                log::trace!("dropping input for {} because a parent crops it", snapshot.name);
                config.insert(InputConfig::DROP_INPUT);
            } else {
                config.insert(InputConfig::DROP_INPUT_IF_OBSCURED);
            }
        }
    }
}

/// Resolves the input descriptor of `snapshot`.
///
/// The descriptor is rebuilt from the layer's request each time, so
/// region transforms are never applied twice.
pub(crate) fn update_input(
    snapshot: &mut LayerSnapshot,
    requested: &LayerDescriptor,
    parent: &LayerSnapshot,
    path: &TraversalPath,
    cx: &InputContext<'_>,
) {
    snapshot.input_info.display_id = snapshot.output_filter.layer_stack;
    snapshot.drop_input_mode = requested.drop_input_mode.max(parent.drop_input_mode);
    let Some(request) = requested.input() else {
        snapshot.input_info.config = InputConfig::NO_INPUT_CHANNEL;
        return;
    };

    snapshot
        .input_info
        .reset_from(request, parent.input_info.touch_occlusion_mode);
    fill_input_frame_info(snapshot, cx.display.transform);

    if cx.no_valid_display {
        // Keys still arrive; touches need a display transform.
        snapshot.input_info.config.insert(InputConfig::NOT_TOUCHABLE);
    }

    let visible = if request.config.contains(InputConfig::NO_INPUT_CHANNEL) {
        snapshot.compute_is_visible()
    } else {
        snapshot.can_receive_input()
    };
    snapshot
        .input_info
        .config
        .set(InputConfig::NOT_VISIBLE, !visible);
    snapshot.input_info.alpha = snapshot.color.a;

    handle_drop_input_mode(snapshot, parent.color.a);

    if !cx.display.is_secure && snapshot.is_secure {
        snapshot.input_info.config.insert(InputConfig::DROP_INPUT);
    }

    let display_transform = cx.display.transform;
    if snapshot.input_info.replace_touchable_region_with_crop {
        let bounds = cx
            .touch_crop_bounds
            .unwrap_or(snapshot.transformed_bounds);
        snapshot.input_info.touchable_region = Region::from_rect(transform::transform_irect(
            display_transform,
            IRect::from_rect_rounded(bounds),
        ));
    } else if let Some(bounds) = cx.touch_crop_bounds {
        let crop =
            transform::transform_irect(display_transform, IRect::from_rect_rounded(bounds));
        snapshot.input_info.touchable_region =
            snapshot.input_info.touchable_region.intersect(&crop);
    }

    if snapshot.is_trusted_overlay {
        snapshot.input_info.config.insert(InputConfig::TRUSTED_OVERLAY);
    }

    if path.is_clone() {
        snapshot.input_info.config.insert(InputConfig::CLONE);
        if let Some(bounds) = cx.clone_root_bounds {
            let crop =
                transform::transform_irect(display_transform, IRect::from_rect_rounded(bounds));
            snapshot.input_info.touchable_region =
                snapshot.input_info.touchable_region.intersect(&crop);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::BufferRef;
    use crate::input::InputRequest;
    use crate::scene::LayerId;
    use crate::snapshot::geometry;
    use crate::transform::Rotation;
    use alloc::string::String;

    fn descriptor() -> LayerDescriptor {
        LayerDescriptor::new(LayerId(1), String::from("input"))
    }

    fn resolve(d: &LayerDescriptor, parent: &LayerSnapshot) -> LayerSnapshot {
        let mut s = LayerSnapshot::new(d, TraversalPath::of(d.id()));
        s.buffer = d.buffer().copied();
        s.buffer_size = d.buffer_size(Rotation::ROT_0);
        s.color = d.color();
        s.alpha = d.alpha();
        geometry::update_layer_bounds(&mut s, d, parent, Rotation::ROT_0);
        s
    }

    fn run(
        s: &mut LayerSnapshot,
        d: &LayerDescriptor,
        parent: &LayerSnapshot,
        cx: &InputContext<'_>,
    ) {
        update_input(s, d, parent, &TraversalPath::of(d.id()), cx);
    }

    fn context(display: &DisplayInfo) -> InputContext<'_> {
        InputContext {
            display,
            no_valid_display: false,
            touch_crop_bounds: None,
            clone_root_bounds: None,
        }
    }

    #[test]
    fn frame_and_inset() {
        let mut d = descriptor();
        d.set_position(100.0, 200.0);
        d.set_crop(IRect::new(0, 0, 50, 40));
        d.set_input(Some(InputRequest {
            surface_inset: 5,
            ..InputRequest::with_region(Region::from_rect(IRect::new(0, 0, 10, 10)))
        }));

        let mut s = resolve(&d, &LayerSnapshot::root());
        let display = DisplayInfo::new(1000, 1000);
        run(&mut s, &d, &LayerSnapshot::root(), &context(&display));

        assert_eq!(s.input_info.frame, IRect::new(105, 205, 145, 235));
        // The region is given in input space, which starts at the inset.
        assert_eq!(
            s.input_info.touchable_region.rects(),
            &[IRect::new(105, 205, 115, 215)]
        );
        assert_eq!(
            s.input_info.transform * kurbo::Point::new(105.0, 205.0),
            kurbo::Point::ORIGIN
        );
        assert!(!s.input_info.config.contains(InputConfig::NOT_VISIBLE));
    }

    #[test]
    fn inset_is_clamped_to_half_the_bounds() {
        let mut d = descriptor();
        d.set_crop(IRect::new(0, 0, 20, 10));
        d.set_input(Some(InputRequest {
            surface_inset: 50,
            ..InputRequest::default()
        }));
        let mut s = resolve(&d, &LayerSnapshot::root());
        let display = DisplayInfo::new(100, 100);
        run(&mut s, &d, &LayerSnapshot::root(), &context(&display));
        assert_eq!(s.input_info.frame, IRect::new(10, 5, 10, 5));
    }

    #[test]
    fn no_request_means_no_channel() {
        let mut d = descriptor();
        d.set_drop_input_mode(DropInputMode::All);
        let mut s = resolve(&d, &LayerSnapshot::root());
        let display = DisplayInfo::default();
        run(&mut s, &d, &LayerSnapshot::root(), &context(&display));
        assert_eq!(s.input_info.config, InputConfig::NO_INPUT_CHANNEL);
        assert_eq!(s.drop_input_mode, DropInputMode::All, "still inherited by children");
    }

    #[test]
    fn obscured_mode_cropped_by_parent() {
        let mut parent = LayerSnapshot::root();
        parent.geom_layer_bounds = Rect::new(0.0, 0.0, 10.0, 10.0);
        let mut d = descriptor();
        d.set_buffer(Some(BufferRef::new(1, 20, 20)));
        d.set_input(Some(InputRequest::default()));
        d.set_drop_input_mode(DropInputMode::Obscured);

        let mut s = resolve(&d, &parent);
        let display = DisplayInfo::default();
        run(&mut s, &d, &parent, &context(&display));
        assert!(s.input_info.config.contains(InputConfig::DROP_INPUT));

        let root = LayerSnapshot::root();
        let mut s = resolve(&d, &root);
        run(&mut s, &d, &root, &context(&display));
        assert!(!s.input_info.config.contains(InputConfig::DROP_INPUT));
        assert!(s.input_info.config.contains(InputConfig::DROP_INPUT_IF_OBSCURED));
    }

    #[test]
    fn obscured_mode_translucent_parent() {
        let mut parent = LayerSnapshot::root();
        parent.color.a = 0.5;
        let mut s = LayerSnapshot::root();
        s.drop_input_mode = DropInputMode::Obscured;
        handle_drop_input_mode(&mut s, parent.color.a);
        assert!(s.input_info.config.contains(InputConfig::DROP_INPUT));
        assert!(s.input_info.config.contains(InputConfig::DROP_INPUT_IF_OBSCURED));
    }

    #[test]
    fn secure_layer_on_insecure_display() {
        let mut d = descriptor();
        d.set_input(Some(InputRequest::default()));
        let mut s = resolve(&d, &LayerSnapshot::root());
        s.is_secure = true;
        let display = DisplayInfo::default();
        let mut cx = context(&display);
        cx.no_valid_display = true;
        run(&mut s, &d, &LayerSnapshot::root(), &cx);
        assert!(s.input_info.config.contains(InputConfig::DROP_INPUT));
        assert!(s.input_info.config.contains(InputConfig::NOT_TOUCHABLE));
    }

    #[test]
    fn replace_region_with_crop() {
        let mut d = descriptor();
        d.set_crop(IRect::new(0, 0, 30, 30));
        d.set_input(Some(InputRequest {
            replace_touchable_region_with_crop: true,
            ..InputRequest::default()
        }));
        let mut s = resolve(&d, &LayerSnapshot::root());
        let display = DisplayInfo::default();

        run(&mut s, &d, &LayerSnapshot::root(), &context(&display));
        assert_eq!(s.input_info.touchable_region.rects(), &[IRect::new(0, 0, 30, 30)]);

        let mut cx = context(&display);
        cx.touch_crop_bounds = Some(Rect::new(5.0, 5.0, 15.0, 15.0));
        run(&mut s, &d, &LayerSnapshot::root(), &cx);
        assert_eq!(s.input_info.touchable_region.rects(), &[IRect::new(5, 5, 15, 15)]);
    }
}
