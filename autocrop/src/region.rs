// Copyright 2025 the Autocrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `round`
use kurbo::{Rect, Size};

/// A rectangle in document (user) space, stored by its four bounds.
///
/// Inside the engine `bottom >= top` and `right >= left` always hold; see
/// [`DocumentRegion::is_valid`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DocumentRegion {
    /// Minimum y.
    pub top: f64,
    /// Maximum y.
    pub bottom: f64,
    /// Minimum x.
    pub left: f64,
    /// Maximum x.
    pub right: f64,
}

impl DocumentRegion {
    /// Creates a region from its four bounds.
    #[inline]
    pub const fn new(top: f64, bottom: f64, left: f64, right: f64) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    /// The region `[0, width] × [0, height]` covering a whole document.
    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self::new(0.0, size.height, 0.0, size.width)
    }

    /// Horizontal span.
    #[inline]
    pub fn width(self) -> f64 {
        self.right - self.left
    }

    /// Vertical span.
    #[inline]
    pub fn height(self) -> f64 {
        self.bottom - self.top
    }

    /// Returns `true` if all bounds are finite and the region is not inverted.
    ///
    /// Zero-width and zero-height regions are valid.
    pub fn is_valid(self) -> bool {
        let finite = self.top.is_finite()
            && self.bottom.is_finite()
            && self.left.is_finite()
            && self.right.is_finite();
        finite && self.bottom >= self.top && self.right >= self.left
    }

    /// Returns `true` if either span is below `epsilon`, i.e. the region is
    /// already finer than the refinement can resolve.
    #[inline]
    pub fn is_converged(self, epsilon: f64) -> bool {
        self.height() < epsilon || self.width() < epsilon
    }

    /// Converts into a kurbo rectangle.
    #[inline]
    pub fn to_rect(self) -> Rect {
        Rect::new(self.left, self.top, self.right, self.bottom)
    }
}

impl From<Rect> for DocumentRegion {
    fn from(rect: Rect) -> Self {
        Self::new(rect.y0, rect.y1, rect.x0, rect.x1)
    }
}

impl From<DocumentRegion> for Rect {
    fn from(region: DocumentRegion) -> Self {
        region.to_rect()
    }
}

/// Rounds to three decimal places, suppressing noise from repeated
/// transform composition.
///
/// ```rust
/// assert_eq!(autocrop::round3(12.34567), 12.346);
/// ```
#[inline]
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// The result of an autocrop: the painted area of a document, in document
/// units, with every field rounded by [`round3`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingBox {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl BoundingBox {
    /// Rounds a refined region into a bounding box.
    pub fn from_region(region: DocumentRegion) -> Self {
        Self {
            x: round3(region.left),
            y: round3(region.top),
            width: round3(region.width()),
            height: round3(region.height()),
        }
    }

    /// Converts into a kurbo rectangle.
    #[inline]
    pub fn to_rect(self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Returns `true` if the box covers no area.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ x: {}, y: {}, width: {}, height: {} }}",
            self.x, self.y, self.width, self.height
        )
    }
}
