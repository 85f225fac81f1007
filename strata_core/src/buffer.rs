// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Buffer references and pixel-content descriptions.
//!
//! Buffers are allocated and recycled elsewhere; snapshots only hold a
//! [`BufferRef`] describing the latched buffer.

use core::fmt;

/// Pixel layout of a buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 8-bit RGBA.
    #[default]
    Rgba8888,
    /// 8-bit RGB with an ignored fourth byte.
    Rgbx8888,
    /// 8-bit RGB.
    Rgb888,
    /// 5-6-5 packed RGB.
    Rgb565,
    /// 10-bit RGB with 2-bit alpha.
    Rgba1010102,
    /// Half-float RGBA.
    RgbaFp16,
}

impl PixelFormat {
    /// Whether the format has no alpha channel, making the content opaque.
    #[must_use]
    pub const fn is_opaque(self) -> bool {
        matches!(self, Self::Rgbx8888 | Self::Rgb888 | Self::Rgb565)
    }
}

/// Colour space and transfer function of buffer content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Dataspace {
    /// Not specified.
    #[default]
    Unknown,
    /// sRGB.
    Srgb,
    /// Display P3.
    DisplayP3,
    /// BT.2020 with the PQ (ST 2084) transfer function.
    Bt2020ItuPq,
    /// BT.2020 with the HLG transfer function.
    Bt2020ItuHlg,
}

/// The kind of producer that queued a buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ProducerApi {
    /// GPU rendering.
    #[default]
    Gpu,
    /// CPU rendering.
    Cpu,
    /// Media decoder.
    Media,
    /// Camera.
    Camera,
}

/// Identifies a buffer owned by an external allocator.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BufferId(pub u64);

impl fmt::Debug for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BufferId({})", self.0)
    }
}

/// A latched client buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BufferRef {
    /// Allocator handle.
    pub id: BufferId,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel layout.
    pub format: PixelFormat,
    /// Whether the buffer was allocated for protected content.
    pub protected: bool,
    /// Producer frame number.
    pub frame_number: u64,
    /// Acquire fence sequence number, if the producer supplied one.
    pub acquire_fence: Option<u64>,
}

impl BufferRef {
    /// Creates an unprotected RGBA buffer reference.
    #[must_use]
    pub const fn new(id: u64, width: u32, height: u32) -> Self {
        Self {
            id: BufferId(id),
            width,
            height,
            format: PixelFormat::Rgba8888,
            protected: false,
            frame_number: 0,
            acquire_fence: None,
        }
    }

    /// Returns this reference with a different pixel format.
    #[must_use]
    pub const fn with_format(mut self, format: PixelFormat) -> Self {
        self.format = format;
        self
    }

    /// Returns this reference with a producer frame number.
    #[must_use]
    pub const fn with_frame_number(mut self, frame_number: u64) -> Self {
        self.frame_number = frame_number;
        self
    }
}

/// A sideband stream: content delivered outside the buffer queue (e.g. a
/// tuner feeding the display controller directly).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SidebandStream(pub u64);

impl fmt::Debug for SidebandStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SidebandStream({})", self.0)
    }
}
