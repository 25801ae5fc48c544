// Copyright 2025 the Autocrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec;
use alloc::vec::Vec;

use thiserror::Error;

use crate::color::Color;
use crate::sample::area_color;

/// Errors from constructing a [`RasterSample`] out of caller-provided pixels.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RasterError {
    /// The row stride is shorter than a row.
    #[error("stride {stride} is smaller than width {width}")]
    StrideTooSmall {
        /// Requested width in pixels.
        width: u16,
        /// Requested stride in pixels.
        stride: usize,
    },
    /// The pixel buffer cannot hold `height` rows of `stride` pixels.
    #[error("pixel buffer holds {actual} pixels, {required} required")]
    BufferTooSmall {
        /// Minimum number of pixels required.
        required: usize,
        /// Number of pixels provided.
        actual: usize,
    },
}

/// A fixed-size buffer of packed premultiplied ARGB32 pixels.
///
/// Rows are `stride` pixels apart; only the first `width` pixels of each row
/// belong to the image. Samples are produced fresh by every render and owned
/// by whoever requested the render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterSample {
    width: u16,
    height: u16,
    stride: usize,
    pixels: Vec<Color>,
}

impl RasterSample {
    /// Creates a transparent raster with a tight stride.
    pub fn new(width: u16, height: u16) -> Self {
        let stride = usize::from(width);
        Self {
            width,
            height,
            stride,
            pixels: vec![Color::TRANSPARENT; stride * usize::from(height)],
        }
    }

    /// Wraps an existing pixel buffer.
    ///
    /// The last row may be short: only `stride * (height - 1) + width` pixels
    /// are required.
    pub fn from_pixels(
        width: u16,
        height: u16,
        stride: usize,
        pixels: Vec<Color>,
    ) -> Result<Self, RasterError> {
        if stride < usize::from(width) {
            return Err(RasterError::StrideTooSmall { width, stride });
        }
        let required = match height {
            0 => 0,
            h => stride * (usize::from(h) - 1) + usize::from(width),
        };
        if pixels.len() < required {
            return Err(RasterError::BufferTooSmall {
                required,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            stride,
            pixels,
        })
    }

    /// Packs tightly laid out premultiplied RGBA8 bytes.
    pub fn from_premul_rgba8(width: u16, height: u16, bytes: &[u8]) -> Result<Self, RasterError> {
        let pixels: Vec<Color> = bytes
            .chunks_exact(4)
            .map(|p| Color::from_premul_rgba8(p[0], p[1], p[2], p[3]))
            .collect();
        Self::from_pixels(width, height, usize::from(width), pixels)
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Distance between the starts of two consecutive rows, in pixels.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns `true` if the raster has no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The raw pixel storage, including any stride padding.
    #[inline]
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Reads the pixel at `(x, y)`.
    ///
    /// Panics if the coordinate is outside the raster.
    #[inline]
    pub fn pixel(&self, x: u16, y: u16) -> Color {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} raster",
            self.width,
            self.height
        );
        self.pixels[self.stride * usize::from(y) + usize::from(x)]
    }

    /// Writes the pixel at `(x, y)`.
    ///
    /// Panics if the coordinate is outside the raster.
    #[inline]
    pub fn set_pixel(&mut self, x: u16, y: u16, color: Color) {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} raster",
            self.width,
            self.height
        );
        self.pixels[self.stride * usize::from(y) + usize::from(x)] = color;
    }

    /// Fills the half-open pixel rectangle `[x0, x1) × [y0, y1)`, clamped to
    /// the raster.
    pub fn fill_rect(&mut self, x0: u16, y0: u16, x1: u16, y1: u16, color: Color) {
        let x1 = x1.min(self.width);
        let y1 = y1.min(self.height);
        for y in y0..y1 {
            let row = self.stride * usize::from(y);
            for x in x0..x1 {
                self.pixels[row + usize::from(x)] = color;
            }
        }
    }

    /// Iterates the image rows, without stride padding.
    pub fn rows(&self) -> impl Iterator<Item = &[Color]> + '_ {
        let width = usize::from(self.width);
        (0..usize::from(self.height)).map(move |y| {
            let start = y * self.stride;
            &self.pixels[start..start + width]
        })
    }

    /// The single color of the whole raster, or `None` if it is empty or not
    /// uniform.
    pub fn uniform_color(&self) -> Option<Color> {
        if self.is_empty() {
            return None;
        }
        let color = area_color(self, 0..=self.width - 1, 0..=self.height - 1);
        (!color.is_invalid()).then_some(color)
    }

    /// Returns `true` if any image pixel equals
    /// [`INVALID_COLOR`](crate::INVALID_COLOR).
    pub fn contains_invalid(&self) -> bool {
        self.rows().flatten().any(|p| p.is_invalid())
    }
}
