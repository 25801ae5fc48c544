// Copyright 2025 the Autocrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

/// A packed premultiplied ARGB32 pixel, laid out as `0xAARRGGBB`.
///
/// Transparent is `0x0000_0000`. Because color channels are premultiplied, a
/// pixel with zero alpha always has zero color channels when produced by a
/// conforming renderer.
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Color(pub u32);

/// Marker returned by [`area_color`](crate::area_color) for non-uniform areas.
///
/// It has zero alpha and non-zero color channels, which premultiplied output
/// cannot contain. Rasters are checked for it with
/// [`RasterSample::contains_invalid`](crate::RasterSample::contains_invalid)
/// before they are scanned.
pub const INVALID_COLOR: Color = Color(0x00DE_AD00);

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self(0);

    /// Pack premultiplied RGBA8 channels.
    #[inline]
    pub const fn from_premul_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32))
    }

    /// Unpack into premultiplied `[r, g, b, a]`.
    #[inline]
    pub const fn to_premul_rgba8(self) -> [u8; 4] {
        let [a, r, g, b] = self.0.to_be_bytes();
        [r, g, b, a]
    }

    /// Alpha channel.
    #[inline]
    pub const fn alpha(self) -> u8 {
        self.0.to_be_bytes()[0]
    }

    /// Returns `true` for exactly [`Color::TRANSPARENT`].
    #[inline]
    pub const fn is_transparent(self) -> bool {
        self.0 == Self::TRANSPARENT.0
    }

    /// Returns `true` for exactly [`INVALID_COLOR`].
    #[inline]
    pub const fn is_invalid(self) -> bool {
        self.0 == INVALID_COLOR.0
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color(0x{:08X})", self.0)
    }
}
