// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The resolved, frame-current state of one layer occurrence.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Affine, Rect, Vec2};

use crate::buffer::{BufferRef, Dataspace, SidebandStream};
use crate::changes::Changes;
use crate::color::{Color, ColorMatrix};
use crate::effects::{BlurRegion, HdrMetadata, ShadowSettings, StretchEffect};
use crate::input::{DropInputMode, InputInfo};
use crate::metadata::LayerMetadata;
use crate::output::{Displays, LayerStack};
use crate::region::{IRect, Region};
use crate::scene::{CompositionType, LayerDescriptor, LayerId, TraversalPath};
use crate::transform::Rotation;

/// Which outputs a snapshot is shown on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct OutputFilter {
    /// The layer stack the snapshot belongs to.
    pub layer_stack: LayerStack,
    /// Restrict the snapshot to internal displays.
    pub to_internal_display: bool,
}

/// Rounded-corner clip in layer space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoundedCornerState {
    /// The rectangle whose corners are rounded.
    pub crop_rect: Rect,
    /// Corner radius along each axis.
    pub radius: Vec2,
}

impl Default for RoundedCornerState {
    fn default() -> Self {
        Self {
            crop_rect: Rect::ZERO,
            radius: Vec2::ZERO,
        }
    }
}

impl RoundedCornerState {
    /// Whether any rounding applies.
    #[inline]
    #[must_use]
    pub fn has_rounded_corners(&self) -> bool {
        self.radius.x > 0.0 && self.radius.y > 0.0
    }
}

/// How a snapshot is blended over what lies below.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlendMode {
    /// Opaque; no blending.
    #[default]
    None,
    /// Source colour is premultiplied by alpha.
    Premultiplied,
    /// Source colour is multiplied by alpha while blending.
    Coverage,
}

/// The resolved state of one occurrence of a layer.
///
/// Composed fields are derived from the layer's own descriptor and the
/// resolved snapshot of its parent occurrence only. When
/// [`is_visible`](Self::is_visible) is false, fields other than the policy
/// flags may be stale and should be ignored.
#[derive(Clone, Debug)]
pub struct LayerSnapshot {
    // -- Identity --
    /// Occurrence this snapshot was created for.
    pub path: TraversalPath,
    /// Parent occurrence this snapshot was last resolved against.
    pub parent_path: TraversalPath,
    /// Layer the snapshot belongs to.
    pub layer_id: LayerId,
    /// Debug name copied from the descriptor.
    pub name: String,
    /// Position in the ordered snapshot array.
    pub global_z: usize,

    // -- Per-update flags --
    /// Changes applied in the last update.
    pub changes: Changes,
    /// Whether pixels changed in the last update.
    pub content_dirty: bool,

    // -- Policy and visibility --
    /// Hidden by this layer's or a geometric ancestor's policy.
    pub is_hidden_by_policy_from_parent: bool,
    /// Hidden because the relative parent is hidden.
    pub is_hidden_by_policy_from_relative_parent: bool,
    /// Whether the snapshot is drawn.
    pub is_visible: bool,

    // -- Geometry --
    /// The layer's own transform.
    pub local_transform: Affine,
    /// Inverse of [`local_transform`](Self::local_transform).
    pub local_transform_inverse: Affine,
    /// The parent's absolute transform.
    pub parent_transform: Affine,
    /// Layer-to-screen transform.
    pub geom_layer_transform: Affine,
    /// Screen-to-layer transform.
    pub geom_inverse_layer_transform: Affine,
    /// Bounds in layer space, cut by crop and ancestors.
    pub geom_layer_bounds: Rect,
    /// Bounds in screen space.
    pub transformed_bounds: Rect,
    /// Requested crop.
    pub geom_crop: IRect,
    /// Buffer size in layer space, or [`IRect::INVALID`].
    pub buffer_size: IRect,
    /// Buffer size cut by the crop.
    pub cropped_buffer_size: IRect,
    /// Screen-space frame of the cropped buffer minus its transparent
    /// region, used to place a cursor layer.
    pub cursor_frame: IRect,
    /// Whether the composed transform was invalid and got reset.
    pub invalid_transform: bool,
    /// Whether sampling the buffer needs filtering.
    pub buffer_needs_filtering: bool,

    // -- Appearance --
    /// Fill colour; alpha is the composed alpha.
    pub color: Color,
    /// Composed alpha.
    pub alpha: f32,
    /// Whether the snapshot must not reach non-secure outputs.
    pub is_secure: bool,
    /// Whether the layer or an ancestor is a trusted overlay.
    pub is_trusted_overlay: bool,
    /// Output restriction.
    pub output_filter: OutputFilter,
    /// Stretch effect, own or inherited.
    pub stretch_effect: StretchEffect,
    /// Composed colour transform.
    pub color_transform: ColorMatrix,
    /// Whether no colour transform applies anywhere up the tree.
    pub color_transform_is_identity: bool,
    /// How the content is composited.
    pub composition_type: CompositionType,
    /// Whether the layer is dimmed with the display.
    pub dimming_enabled: bool,
    /// Whether the client set the opaque flag.
    pub layer_opaque_flag_set: bool,
    /// Whether colour management is skipped.
    pub is_color_space_agnostic: bool,
    /// Background blur radius.
    pub background_blur_radius: u32,
    /// Blurred areas.
    pub blur_regions: Vec<BlurRegion>,
    /// HDR metadata.
    pub hdr_metadata: HdrMetadata,
    /// Rounded-corner clip.
    pub rounded_corner: RoundedCornerState,
    /// Requested shadow radius.
    pub shadow_radius: f32,
    /// Resolved shadow.
    pub shadow_settings: ShadowSettings,
    /// Whether the snapshot needs client (GPU) composition.
    pub force_client_composition: bool,
    /// Whether the snapshot fully covers what lies below it.
    pub is_opaque: bool,
    /// Blend mode.
    pub blend_mode: BlendMode,

    // -- Buffer --
    /// Latched buffer.
    pub buffer: Option<BufferRef>,
    /// Acquire fence of the latched buffer.
    pub acquire_fence: Option<u64>,
    /// Producer frame number of the latched buffer.
    pub frame_number: u64,
    /// Buffer orientation.
    pub buffer_transform: Rotation,
    /// Whether the buffer is pre-rotated by the inverse display rotation.
    pub buffer_uses_display_inverse_transform: bool,
    /// Area of the buffer to sample from.
    pub content_crop: IRect,
    /// Whether [`content_crop`](Self::content_crop) applies.
    pub uses_source_crop: bool,
    /// Dataspace of the content.
    pub dataspace: Dataspace,
    /// Whether the buffer holds protected content.
    pub has_protected_content: bool,
    /// Whether the content is HDR video in an RGBA 10:10:10:2 buffer.
    pub is_hdr_y410: bool,
    /// Sideband stream.
    pub sideband_stream: Option<SidebandStream>,
    /// Changed area of the buffer, in buffer space.
    pub surface_damage: Region,
    /// Area of the buffer the producer marked transparent.
    pub transparent_region_hint: Region,

    // -- Input --
    /// Resolved input descriptor.
    pub input_info: InputInfo,
    /// Effective drop-input mode.
    pub drop_input_mode: DropInputMode,

    // -- Metadata --
    /// Metadata aggregated down the geometric ancestry.
    pub layer_metadata: LayerMetadata,
    /// Metadata inherited from the relative parent.
    pub relative_layer_metadata: LayerMetadata,
}

impl LayerSnapshot {
    /// Creates an unresolved snapshot for one occurrence of `layer`.
    #[must_use]
    pub fn new(layer: &LayerDescriptor, path: TraversalPath) -> Self {
        Self {
            layer_id: layer.id(),
            name: String::from(layer.name()),
            ..Self::blank(path)
        }
    }

    /// The synthetic parent of every root layer.
    ///
    /// Identity transform, bounds far larger than any display, full alpha,
    /// nothing hidden, secure or rounded.
    #[must_use]
    pub fn root() -> Self {
        let mut root = Self::blank(TraversalPath::root());
        root.geom_layer_bounds = Displays::new().max_bounds();
        root
    }

    fn blank(path: TraversalPath) -> Self {
        Self {
            layer_id: path.id,
            path,
            parent_path: TraversalPath::root(),
            name: String::new(),
            global_z: 0,
            changes: Changes::empty(),
            content_dirty: false,
            is_hidden_by_policy_from_parent: false,
            is_hidden_by_policy_from_relative_parent: false,
            is_visible: false,
            local_transform: Affine::IDENTITY,
            local_transform_inverse: Affine::IDENTITY,
            parent_transform: Affine::IDENTITY,
            geom_layer_transform: Affine::IDENTITY,
            geom_inverse_layer_transform: Affine::IDENTITY,
            geom_layer_bounds: Rect::ZERO,
            transformed_bounds: Rect::ZERO,
            geom_crop: IRect::EMPTY,
            buffer_size: IRect::INVALID,
            cropped_buffer_size: IRect::INVALID,
            cursor_frame: IRect::EMPTY,
            invalid_transform: false,
            buffer_needs_filtering: false,
            color: Color::new(0.0, 0.0, 0.0, 1.0),
            alpha: 1.0,
            is_secure: false,
            is_trusted_overlay: false,
            output_filter: OutputFilter::default(),
            stretch_effect: StretchEffect::default(),
            color_transform: ColorMatrix::IDENTITY,
            color_transform_is_identity: true,
            composition_type: CompositionType::Invalid,
            dimming_enabled: true,
            layer_opaque_flag_set: false,
            is_color_space_agnostic: false,
            background_blur_radius: 0,
            blur_regions: Vec::new(),
            hdr_metadata: HdrMetadata::default(),
            rounded_corner: RoundedCornerState::default(),
            shadow_radius: 0.0,
            shadow_settings: ShadowSettings::default(),
            force_client_composition: false,
            is_opaque: false,
            blend_mode: BlendMode::None,
            buffer: None,
            acquire_fence: None,
            frame_number: 0,
            buffer_transform: Rotation::ROT_0,
            buffer_uses_display_inverse_transform: false,
            content_crop: IRect::EMPTY,
            uses_source_crop: false,
            dataspace: Dataspace::Unknown,
            has_protected_content: false,
            is_hdr_y410: false,
            sideband_stream: None,
            surface_damage: Region::new(),
            transparent_region_hint: Region::new(),
            input_info: InputInfo::default(),
            drop_input_mode: DropInputMode::None,
            layer_metadata: LayerMetadata::new(),
            relative_layer_metadata: LayerMetadata::new(),
        }
    }

    // -- Predicates --

    /// Whether pixel content comes from a buffer or a sideband stream.
    #[inline]
    #[must_use]
    pub fn has_buffer_or_sideband(&self) -> bool {
        self.buffer.is_some() || self.sideband_stream.is_some()
    }

    /// Whether the layer draws a flat colour.
    #[inline]
    #[must_use]
    pub fn fills_color(&self) -> bool {
        !self.has_buffer_or_sideband() && self.color.has_fill()
    }

    /// Whether the layer casts a shadow.
    #[inline]
    #[must_use]
    pub fn draw_shadows(&self) -> bool {
        self.shadow_settings.length > 0.0
    }

    /// Whether the layer blurs what lies below it.
    #[inline]
    #[must_use]
    pub fn has_blur(&self) -> bool {
        self.background_blur_radius > 0 || !self.blur_regions.is_empty()
    }

    /// Whether the layer draws something without a buffer.
    #[inline]
    #[must_use]
    pub fn has_effect(&self) -> bool {
        self.fills_color() || self.draw_shadows() || self.has_blur()
    }

    /// Whether the layer draws anything at all.
    #[inline]
    #[must_use]
    pub fn has_something_to_draw(&self) -> bool {
        self.has_effect() || self.has_buffer_or_sideband()
    }

    /// Whether the content itself covers its bounds completely.
    #[must_use]
    pub fn is_content_opaque(&self) -> bool {
        if !self.has_something_to_draw() {
            return false;
        }
        if self.layer_opaque_flag_set {
            return true;
        }
        if self.buffer.is_some_and(|b| b.format.is_opaque()) {
            return true;
        }
        self.fills_color() && self.color.a == 1.0
    }

    /// Whether the layer is hidden by its own or inherited policy.
    #[inline]
    #[must_use]
    pub fn is_hidden_by_policy(&self) -> bool {
        self.is_hidden_by_policy_from_parent || self.is_hidden_by_policy_from_relative_parent
    }

    /// Visibility derived from current fields.
    #[must_use]
    pub fn compute_is_visible(&self) -> bool {
        if !self.has_something_to_draw() || self.is_hidden_by_policy() {
            return false;
        }
        self.color.a > 0.0 || self.has_blur()
    }

    /// Whether the layer may receive input. Unlike visibility this ignores
    /// whether a buffer has arrived yet.
    #[must_use]
    pub fn can_receive_input(&self) -> bool {
        !self.is_hidden_by_policy() && (!self.has_buffer_or_sideband() || self.color.a > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::PixelFormat;

    fn snapshot() -> LayerSnapshot {
        LayerSnapshot::blank(TraversalPath::of(LayerId(1)))
    }

    #[test]
    fn nothing_to_draw_is_never_visible() {
        let mut s = snapshot();
        s.color = Color::NO_FILL;
        assert!(!s.has_something_to_draw());
        assert!(!s.compute_is_visible());
        assert!(!s.is_content_opaque());
        assert!(s.can_receive_input(), "input does not wait for content");
    }

    #[test]
    fn opaque_fill() {
        let mut s = snapshot();
        s.color = Color::BLACK;
        assert!(s.fills_color());
        assert!(s.is_content_opaque());
        s.color.a = 0.5;
        assert!(!s.is_content_opaque());
        assert!(s.compute_is_visible());
        s.color.a = 0.0;
        assert!(!s.compute_is_visible());
        s.background_blur_radius = 4;
        assert!(s.compute_is_visible(), "blur shows even at zero alpha");
    }

    #[test]
    fn buffer_opacity_follows_format() {
        let mut s = snapshot();
        s.color = Color::NO_FILL;
        s.buffer = Some(BufferRef::new(1, 4, 4));
        assert!(!s.is_content_opaque());
        s.buffer = Some(BufferRef::new(1, 4, 4).with_format(PixelFormat::Rgbx8888));
        assert!(s.is_content_opaque());
        s.color.a = 0.0;
        assert!(!s.can_receive_input());
    }

    #[test]
    fn relative_policy_hides() {
        let mut s = snapshot();
        s.color = Color::BLACK;
        s.is_hidden_by_policy_from_relative_parent = true;
        assert!(s.is_hidden_by_policy());
        assert!(!s.compute_is_visible());
        assert!(!s.can_receive_input());
    }
}
