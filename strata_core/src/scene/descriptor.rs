// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The requested state of one layer.
//!
//! A [`LayerDescriptor`] is what a client asked for: transform, crop, alpha,
//! buffer, metadata, input configuration and so on. Every setter records the
//! kind of change it implies in the descriptor's own [`Changes`] mask; the
//! snapshot builder reads these masks to decide what to recompute.
//!
//! Topology (parent, relative parent, mirror target, z, layer stack) is
//! owned by the [`SceneStore`](super::SceneStore) so cycles can be rejected
//! there; the descriptor only exposes it read-only.

use alloc::string::String;
use alloc::vec::Vec;

use bitflags::bitflags;
use kurbo::{Affine, Vec2};

use crate::buffer::{BufferRef, Dataspace, ProducerApi, SidebandStream};
use crate::changes::Changes;
use crate::color::{Color, ColorMatrix};
use crate::effects::{BlurRegion, HdrMetadata, StretchEffect};
use crate::input::{DropInputMode, InputRequest};
use crate::metadata::LayerMetadata;
use crate::output::LayerStack;
use crate::region::{IRect, Region};
use crate::transform::Rotation;

use super::LayerId;

bitflags! {
    /// Per-layer policy flags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct LayerFlags: u32 {
        /// The layer and its subtree are hidden by policy.
        const HIDDEN = 1 << 0;
        /// The client promises fully opaque content.
        const OPAQUE = 1 << 1;
        /// The layer must not be shown on non-secure outputs.
        const SECURE = 1 << 2;
        /// The layer is excluded from screenshots and shown only on
        /// internal displays.
        const SKIP_SCREENSHOT = 1 << 3;
        /// The layer is a trusted system overlay.
        const TRUSTED_OVERLAY = 1 << 4;
    }
}

/// How a snapshot's content is composited.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CompositionType {
    /// Not yet decided.
    #[default]
    Invalid,
    /// Composited by the display controller from a buffer.
    Device,
    /// A flat colour fill.
    SolidColor,
    /// A sideband stream.
    Sideband,
}

/// The requested state of one layer.
#[derive(Clone, Debug)]
pub struct LayerDescriptor {
    pub(crate) id: LayerId,
    pub(crate) name: String,
    pub(crate) changes: Changes,

    // -- Topology (written by the scene store) --
    pub(crate) parent: Option<LayerId>,
    pub(crate) relative_parent: Option<LayerId>,
    pub(crate) mirror: Option<LayerId>,
    pub(crate) z: i32,
    pub(crate) layer_stack: LayerStack,

    // -- Geometry --
    pub(crate) transform: Affine,
    pub(crate) crop: IRect,
    pub(crate) destination_frame: IRect,
    pub(crate) corner_radius: f32,

    // -- Appearance --
    pub(crate) color: Color,
    pub(crate) flags: LayerFlags,
    pub(crate) premultiplied_alpha: bool,
    pub(crate) dimming_enabled: bool,
    pub(crate) color_space_agnostic: bool,
    pub(crate) color_transform: Option<ColorMatrix>,
    pub(crate) stretch_effect: StretchEffect,
    pub(crate) shadow_radius: f32,
    pub(crate) background_blur_radius: u32,
    pub(crate) blur_regions: Vec<BlurRegion>,
    pub(crate) hdr_metadata: HdrMetadata,

    // -- Buffer --
    pub(crate) buffer: Option<BufferRef>,
    pub(crate) buffer_transform: Rotation,
    pub(crate) transform_to_display_inverse: bool,
    pub(crate) buffer_crop: IRect,
    pub(crate) dataspace: Dataspace,
    pub(crate) api: ProducerApi,
    pub(crate) sideband: Option<SidebandStream>,
    pub(crate) surface_damage: Region,
    pub(crate) transparent_region: Region,

    // -- Metadata and input --
    pub(crate) metadata: LayerMetadata,
    pub(crate) input: Option<InputRequest>,
    pub(crate) touch_crop: Option<LayerId>,
    pub(crate) drop_input_mode: DropInputMode,
}

impl LayerDescriptor {
    pub(crate) fn new(id: LayerId, name: String) -> Self {
        Self {
            id,
            name,
            changes: Changes::CREATED | Changes::HIERARCHY,
            parent: None,
            relative_parent: None,
            mirror: None,
            z: 0,
            layer_stack: LayerStack::DEFAULT,
            transform: Affine::IDENTITY,
            crop: IRect::EMPTY,
            destination_frame: IRect::EMPTY,
            corner_radius: 0.0,
            color: Color::NO_FILL,
            flags: LayerFlags::empty(),
            premultiplied_alpha: true,
            dimming_enabled: true,
            color_space_agnostic: false,
            color_transform: None,
            stretch_effect: StretchEffect::default(),
            shadow_radius: 0.0,
            background_blur_radius: 0,
            blur_regions: Vec::new(),
            hdr_metadata: HdrMetadata::default(),
            buffer: None,
            buffer_transform: Rotation::ROT_0,
            transform_to_display_inverse: false,
            buffer_crop: IRect::EMPTY,
            dataspace: Dataspace::Unknown,
            api: ProducerApi::Gpu,
            sideband: None,
            surface_damage: Region::new(),
            transparent_region: Region::new(),
            metadata: LayerMetadata::new(),
            input: None,
            touch_crop: None,
            drop_input_mode: DropInputMode::None,
        }
    }

    // -- Read access --

    /// The layer's id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> LayerId {
        self.id
    }

    /// Debug name used in diagnostics.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Changes recorded since the last commit.
    #[inline]
    #[must_use]
    pub fn changes(&self) -> Changes {
        self.changes
    }

    /// Geometric parent, if any.
    #[must_use]
    pub fn parent(&self) -> Option<LayerId> {
        self.parent
    }

    /// Z-order parent, if different from the geometric parent.
    #[must_use]
    pub fn relative_parent(&self) -> Option<LayerId> {
        self.relative_parent
    }

    /// Layer whose subtree this layer mirrors, if any.
    #[must_use]
    pub fn mirror(&self) -> Option<LayerId> {
        self.mirror
    }

    /// Z position among siblings.
    #[must_use]
    pub fn z(&self) -> i32 {
        self.z
    }

    /// Output the layer is shown on when it has no parent.
    #[must_use]
    pub fn layer_stack(&self) -> LayerStack {
        self.layer_stack
    }

    /// Requested transform.
    #[must_use]
    pub fn requested_transform(&self) -> Affine {
        self.transform
    }

    /// Requested crop, in layer space. Empty means "no crop".
    #[must_use]
    pub fn crop(&self) -> IRect {
        self.crop
    }

    /// Requested alpha.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        self.color.a
    }

    /// Requested colour; negative channels mean "no fill".
    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Policy flags.
    #[must_use]
    pub fn flags(&self) -> LayerFlags {
        self.flags
    }

    /// Latched buffer, if any.
    #[must_use]
    pub fn buffer(&self) -> Option<&BufferRef> {
        self.buffer.as_ref()
    }

    /// Layer metadata.
    #[must_use]
    pub fn metadata(&self) -> &LayerMetadata {
        &self.metadata
    }

    /// Input request, if the layer takes part in input dispatch.
    #[must_use]
    pub fn input(&self) -> Option<&InputRequest> {
        self.input.as_ref()
    }

    // -- Derived state --

    /// Whether the layer asks to be hidden.
    #[inline]
    #[must_use]
    pub fn is_hidden_by_policy(&self) -> bool {
        self.flags.contains(LayerFlags::HIDDEN)
    }

    /// Whether the layer takes part in input dispatch.
    #[inline]
    #[must_use]
    pub fn has_input_info(&self) -> bool {
        self.input.is_some()
    }

    /// Whether the layer's pixels need to be redrawn this frame.
    #[inline]
    #[must_use]
    pub fn content_dirty(&self) -> bool {
        self.changes.intersects(Changes::CONTENT | Changes::BUFFER)
    }

    /// Whether the layer is a trusted overlay.
    #[inline]
    #[must_use]
    pub fn is_trusted_overlay(&self) -> bool {
        self.flags.contains(LayerFlags::TRUSTED_OVERLAY)
    }

    /// Whether the layer would draw anything at all, ignoring policy.
    fn has_something_to_draw(&self) -> bool {
        self.buffer.is_some()
            || self.sideband.is_some()
            || self.color.has_fill()
            || self.shadow_radius > 0.0
            || self.background_blur_radius > 0
            || !self.blur_regions.is_empty()
    }

    /// Whether the layer blurs what lies below it.
    fn has_blur(&self) -> bool {
        self.background_blur_radius > 0 || !self.blur_regions.is_empty()
    }

    /// Buffer width and height after undoing the buffer transform and, when
    /// requested, the display's inverse rotation.
    #[must_use]
    pub fn unrotated_buffer_size(&self, display_rotation: Rotation) -> Option<(i32, i32)> {
        let buffer = self.buffer.as_ref()?;
        let mut w = i32::try_from(buffer.width).unwrap_or(i32::MAX);
        let mut h = i32::try_from(buffer.height).unwrap_or(i32::MAX);
        if self.buffer_transform.swaps_axes() {
            core::mem::swap(&mut w, &mut h);
        }
        if self.transform_to_display_inverse && display_rotation.swaps_axes() {
            core::mem::swap(&mut w, &mut h);
        }
        Some((w, h))
    }

    /// Size of the latched buffer in layer space, or [`IRect::INVALID`]
    /// without a buffer.
    #[must_use]
    pub fn buffer_size(&self, display_rotation: Rotation) -> IRect {
        match self.unrotated_buffer_size(display_rotation) {
            Some((w, h)) => IRect::from_size(w, h),
            None => IRect::INVALID,
        }
    }

    /// The buffer size cut down by the requested crop.
    #[must_use]
    pub fn cropped_buffer_size(&self, buffer_size: IRect) -> IRect {
        if self.crop.is_empty() {
            buffer_size
        } else if buffer_size.is_valid() {
            buffer_size.intersect(&self.crop)
        } else {
            self.crop
        }
    }

    /// The region of the buffer to sample from.
    #[must_use]
    pub fn buffer_crop(&self) -> IRect {
        if !self.buffer_crop.is_empty() {
            self.buffer_crop
        } else if let Some(buffer) = &self.buffer {
            IRect::from_size(
                i32::try_from(buffer.width).unwrap_or(i32::MAX),
                i32::try_from(buffer.height).unwrap_or(i32::MAX),
            )
        } else {
            IRect::EMPTY
        }
    }

    /// How the layer's content is composited.
    #[must_use]
    pub fn composition_type(&self) -> CompositionType {
        if self.sideband.is_some() {
            CompositionType::Sideband
        } else if self.buffer.is_none() {
            CompositionType::SolidColor
        } else {
            CompositionType::Device
        }
    }

    /// The layer's local transform.
    ///
    /// Without a destination frame (or without a buffer) this is the
    /// requested transform. With both, the buffer is scaled to fill the
    /// destination frame, honouring the buffer transform and, when
    /// requested, the display's inverse rotation.
    #[must_use]
    pub fn transform(&self, display_rotation: Rotation) -> Affine {
        let Some((w, h)) = self.unrotated_buffer_size(display_rotation) else {
            return self.transform;
        };
        if self.destination_frame.is_empty() || w <= 0 || h <= 0 {
            return self.transform;
        }
        let sx = f64::from(self.destination_frame.width()) / f64::from(w);
        let sy = f64::from(self.destination_frame.height()) / f64::from(h);
        Affine::translate(Vec2::new(
            f64::from(self.destination_frame.left),
            f64::from(self.destination_frame.top),
        )) * Affine::scale_non_uniform(sx, sy)
    }

    // -- Mutation --

    fn mark(&mut self, changes: Changes) {
        self.changes |= changes;
    }

    /// Applies `f` and adds [`Changes::VISIBILITY`] if the layer went from
    /// drawing something to nothing or back, or started or stopped blurring.
    ///
    /// A blur keeps a layer visible at zero alpha, so the blur state is a
    /// visibility input on its own.
    fn with_draw_check(&mut self, changes: Changes, f: impl FnOnce(&mut Self)) {
        let before = (self.has_something_to_draw(), self.has_blur());
        f(self);
        let mut changes = changes;
        if before != (self.has_something_to_draw(), self.has_blur()) {
            changes |= Changes::VISIBILITY;
        }
        self.mark(changes);
    }

    /// Sets the debug name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Sets the whole requested transform.
    pub fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
        self.mark(Changes::GEOMETRY);
    }

    /// Sets the translation part of the requested transform.
    pub fn set_position(&mut self, x: f64, y: f64) {
        self.transform = self.transform.with_translation(Vec2::new(x, y));
        self.mark(Changes::GEOMETRY);
    }

    /// Sets the linear part of the requested transform.
    pub fn set_matrix(&mut self, a: f64, b: f64, c: f64, d: f64) {
        let t = self.transform.translation();
        self.transform = Affine::new([a, b, c, d, t.x, t.y]);
        self.mark(Changes::GEOMETRY);
    }

    /// Sets the crop in layer space. An empty rectangle removes the crop.
    pub fn set_crop(&mut self, crop: IRect) {
        self.crop = crop;
        self.mark(Changes::GEOMETRY);
    }

    /// Sets the frame the buffer is scaled into.
    pub fn set_destination_frame(&mut self, frame: IRect) {
        self.destination_frame = frame;
        self.mark(Changes::GEOMETRY);
    }

    /// Sets the corner radius.
    pub fn set_corner_radius(&mut self, radius: f32) {
        self.corner_radius = radius;
        self.mark(Changes::GEOMETRY);
    }

    /// Sets the requested alpha.
    pub fn set_alpha(&mut self, alpha: f32) {
        let crossed_zero = (self.color.a == 0.0) != (alpha == 0.0);
        self.color.a = alpha;
        let mut changes = Changes::AFFECTS_CHILDREN | Changes::CONTENT;
        if crossed_zero {
            changes |= Changes::VISIBILITY;
        }
        self.mark(changes);
    }

    /// Sets the fill colour, keeping alpha. Negative channels remove the
    /// fill.
    pub fn set_color(&mut self, r: f32, g: f32, b: f32) {
        self.with_draw_check(Changes::CONTENT, |d| {
            d.color = d.color.with_rgb_of(Color::new(r, g, b, 1.0));
        });
    }

    /// Sets whether colour management is skipped for this layer.
    pub fn set_color_space_agnostic(&mut self, agnostic: bool) {
        self.color_space_agnostic = agnostic;
        self.mark(Changes::CONTENT);
    }

    /// Sets HDR metadata.
    pub fn set_hdr_metadata(&mut self, metadata: HdrMetadata) {
        self.hdr_metadata = metadata;
        self.mark(Changes::CONTENT);
    }

    /// Sets whether alpha is premultiplied in the layer's content.
    pub fn set_premultiplied_alpha(&mut self, premultiplied: bool) {
        self.premultiplied_alpha = premultiplied;
        self.mark(Changes::CONTENT);
    }

    /// Sets whether the layer is dimmed with the display.
    pub fn set_dimming_enabled(&mut self, enabled: bool) {
        self.dimming_enabled = enabled;
        self.mark(Changes::CONTENT);
    }

    /// Sets the shadow radius. Zero disables the shadow.
    pub fn set_shadow_radius(&mut self, radius: f32) {
        self.with_draw_check(Changes::CONTENT, |d| d.shadow_radius = radius);
    }

    /// Sets the background blur radius.
    pub fn set_background_blur_radius(&mut self, radius: u32) {
        self.with_draw_check(Changes::CONTENT, |d| d.background_blur_radius = radius);
    }

    /// Replaces the blur regions.
    pub fn set_blur_regions(&mut self, regions: Vec<BlurRegion>) {
        self.with_draw_check(Changes::CONTENT, |d| d.blur_regions = regions);
    }

    /// Sets or clears one policy flag.
    pub fn set_flag(&mut self, flag: LayerFlags, on: bool) {
        if self.flags.contains(flag) == on {
            return;
        }
        self.flags.set(flag, on);
        let mut changes = Changes::empty();
        if flag.contains(LayerFlags::HIDDEN) {
            changes |= Changes::VISIBILITY;
        }
        if flag.contains(LayerFlags::OPAQUE) {
            changes |= Changes::CONTENT;
        }
        if flag.intersects(LayerFlags::SECURE | LayerFlags::SKIP_SCREENSHOT) {
            changes |= Changes::AFFECTS_CHILDREN;
        }
        if flag.contains(LayerFlags::TRUSTED_OVERLAY) {
            changes |= Changes::AFFECTS_CHILDREN | Changes::INPUT;
        }
        self.mark(changes);
    }

    /// Sets the colour transform applied to this layer and its subtree.
    pub fn set_color_transform(&mut self, matrix: Option<ColorMatrix>) {
        self.color_transform = matrix;
        self.mark(Changes::AFFECTS_CHILDREN);
    }

    /// Sets the stretch effect applied to this layer and its subtree.
    pub fn set_stretch_effect(&mut self, effect: StretchEffect) {
        self.stretch_effect = effect;
        self.mark(Changes::AFFECTS_CHILDREN);
    }

    /// Latches a buffer, or removes it with `None`.
    pub fn set_buffer(&mut self, buffer: Option<BufferRef>) {
        let old_size = self.buffer.map(|b| (b.width, b.height));
        let new_size = buffer.map(|b| (b.width, b.height));
        let mut changes = Changes::BUFFER | Changes::CONTENT;
        if old_size != new_size {
            changes |= Changes::GEOMETRY;
        }
        self.with_draw_check(changes, |d| d.buffer = buffer);
    }

    /// Sets the producer API of the latched buffers.
    pub fn set_api(&mut self, api: ProducerApi) {
        self.api = api;
        self.mark(Changes::BUFFER | Changes::CONTENT);
    }

    /// Sets the buffer orientation.
    pub fn set_buffer_transform(&mut self, transform: Rotation) {
        let mut changes = Changes::BUFFER | Changes::CONTENT;
        if self.buffer_transform.swaps_axes() != transform.swaps_axes() {
            changes |= Changes::GEOMETRY;
        }
        self.buffer_transform = transform;
        self.mark(changes);
    }

    /// Sets whether the buffer is pre-rotated by the inverse display
    /// rotation.
    pub fn set_transform_to_display_inverse(&mut self, inverse: bool) {
        let mut changes = Changes::BUFFER | Changes::CONTENT;
        if self.transform_to_display_inverse != inverse {
            changes |= Changes::GEOMETRY;
        }
        self.transform_to_display_inverse = inverse;
        self.mark(changes);
    }

    /// Sets the area of the buffer to sample from.
    pub fn set_buffer_crop(&mut self, crop: IRect) {
        self.buffer_crop = crop;
        self.mark(Changes::BUFFER | Changes::CONTENT);
    }

    /// Sets the dataspace of the buffer content.
    pub fn set_dataspace(&mut self, dataspace: Dataspace) {
        self.dataspace = dataspace;
        self.mark(Changes::BUFFER | Changes::CONTENT);
    }

    /// Sets the area of the buffer that changed since the last frame, in
    /// buffer space.
    pub fn set_surface_damage(&mut self, damage: Region) {
        self.surface_damage = damage;
        self.mark(Changes::BUFFER | Changes::CONTENT);
    }

    /// Sets the area of the buffer the producer promises is fully
    /// transparent. It is cut out of the cursor frame.
    pub fn set_transparent_region(&mut self, region: Region) {
        self.transparent_region = region;
        self.mark(Changes::BUFFER | Changes::CONTENT | Changes::GEOMETRY);
    }

    /// Attaches or detaches a sideband stream.
    pub fn set_sideband_stream(&mut self, stream: Option<SidebandStream>) {
        self.with_draw_check(Changes::BUFFER | Changes::CONTENT, |d| d.sideband = stream);
    }

    /// Replaces the layer metadata.
    pub fn set_metadata(&mut self, metadata: LayerMetadata) {
        self.metadata = metadata;
        self.mark(Changes::METADATA);
    }

    /// Sets or removes the input request.
    pub fn set_input(&mut self, input: Option<InputRequest>) {
        self.input = input;
        self.mark(Changes::INPUT);
    }

    /// Sets the layer whose bounds crop this layer's touchable region.
    pub fn set_touch_crop(&mut self, target: Option<LayerId>) {
        self.touch_crop = target;
        self.mark(Changes::INPUT);
    }

    /// Sets the drop-input policy. Descendants inherit the stricter mode.
    pub fn set_drop_input_mode(&mut self, mode: DropInputMode) {
        self.drop_input_mode = mode;
        self.mark(Changes::INPUT | Changes::AFFECTS_CHILDREN);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> LayerDescriptor {
        let mut d = LayerDescriptor::new(LayerId(1), String::from("test"));
        d.changes = Changes::empty();
        d
    }

    #[test]
    fn alpha_crossing_zero_flips_visibility() {
        let mut d = descriptor();
        d.set_alpha(0.5);
        assert_eq!(d.changes(), Changes::AFFECTS_CHILDREN | Changes::CONTENT);
        d.changes = Changes::empty();
        d.set_alpha(0.0);
        assert!(d.changes().contains(Changes::VISIBILITY));
    }

    #[test]
    fn color_fill_flips_visibility() {
        let mut d = descriptor();
        d.set_color(1.0, 0.0, 0.0);
        assert_eq!(d.changes(), Changes::CONTENT | Changes::VISIBILITY);
        d.changes = Changes::empty();
        d.set_color(0.0, 1.0, 0.0);
        assert_eq!(d.changes(), Changes::CONTENT, "colour stays a fill");
    }

    #[test]
    fn blur_flips_visibility_even_when_already_drawing() {
        let mut d = descriptor();
        d.set_color(1.0, 0.0, 0.0);
        d.changes = Changes::empty();
        d.set_background_blur_radius(8);
        assert_eq!(d.changes(), Changes::CONTENT | Changes::VISIBILITY);
        d.changes = Changes::empty();
        d.set_background_blur_radius(4);
        assert_eq!(d.changes(), Changes::CONTENT, "still blurring");
        d.changes = Changes::empty();
        d.set_blur_regions(Vec::new());
        assert_eq!(d.changes(), Changes::CONTENT, "radius still blurs");
        d.set_background_blur_radius(0);
        assert!(d.changes().contains(Changes::VISIBILITY));
    }

    #[test]
    fn buffer_size_change_is_geometry() {
        let mut d = descriptor();
        d.set_buffer(Some(BufferRef::new(1, 100, 50)));
        assert!(d.changes().contains(Changes::GEOMETRY | Changes::BUFFER | Changes::VISIBILITY));
        d.changes = Changes::empty();
        d.set_buffer(Some(BufferRef::new(2, 100, 50)));
        assert_eq!(d.changes(), Changes::BUFFER | Changes::CONTENT);
    }

    #[test]
    fn buffer_size_honours_rotation() {
        let mut d = descriptor();
        assert_eq!(d.buffer_size(Rotation::ROT_0), IRect::INVALID);
        d.set_buffer(Some(BufferRef::new(1, 100, 50)));
        d.set_buffer_transform(Rotation::ROT_90);
        assert_eq!(d.buffer_size(Rotation::ROT_0), IRect::from_size(50, 100));
        d.set_transform_to_display_inverse(true);
        assert_eq!(d.buffer_size(Rotation::ROT_270), IRect::from_size(100, 50));
    }

    #[test]
    fn cropped_buffer_size_rules() {
        let mut d = descriptor();
        assert_eq!(d.cropped_buffer_size(IRect::INVALID), IRect::INVALID);
        d.set_crop(IRect::new(10, 10, 40, 40));
        assert_eq!(d.cropped_buffer_size(IRect::INVALID), IRect::new(10, 10, 40, 40));
        assert_eq!(
            d.cropped_buffer_size(IRect::from_size(20, 20)),
            IRect::new(10, 10, 20, 20)
        );
    }

    #[test]
    fn destination_frame_scales_buffer() {
        let mut d = descriptor();
        d.set_destination_frame(IRect::new(10, 20, 110, 70));
        assert_eq!(d.transform(Rotation::ROT_0), Affine::IDENTITY, "no buffer yet");
        d.set_buffer(Some(BufferRef::new(1, 50, 25)));
        let t = d.transform(Rotation::ROT_0);
        assert_eq!(t * kurbo::Point::new(50.0, 25.0), kurbo::Point::new(110.0, 70.0));
    }

    #[test]
    fn composition_type_follows_content() {
        let mut d = descriptor();
        assert_eq!(d.composition_type(), CompositionType::SolidColor);
        d.set_buffer(Some(BufferRef::new(1, 1, 1)));
        assert_eq!(d.composition_type(), CompositionType::Device);
        d.set_sideband_stream(Some(SidebandStream(3)));
        assert_eq!(d.composition_type(), CompositionType::Sideband);
    }

    #[test]
    fn flag_changes() {
        let mut d = descriptor();
        d.set_flag(LayerFlags::HIDDEN, true);
        assert_eq!(d.changes(), Changes::VISIBILITY);
        assert!(d.is_hidden_by_policy());
        d.changes = Changes::empty();
        d.set_flag(LayerFlags::HIDDEN, true);
        assert_eq!(d.changes(), Changes::empty(), "no-op set records nothing");
        d.set_flag(LayerFlags::TRUSTED_OVERLAY, true);
        assert_eq!(d.changes(), Changes::AFFECTS_CHILDREN | Changes::INPUT);
    }
}
