// Copyright 2025 the Autocrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One-pixel strip scans used to locate where content starts in a raster.

use thiserror::Error;

use crate::color::{Color, INVALID_COLOR};
use crate::raster::RasterSample;
use crate::sample::area_color;

/// Errors from [`find_edge`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum ScanError {
    /// The direction is not one of the four axis-aligned unit vectors.
    #[error("invalid scan direction ({dx}, {dy})")]
    InvalidDirection {
        /// Horizontal component.
        dx: i32,
        /// Vertical component.
        dy: i32,
    },
    /// The raster has no pixels to scan.
    #[error("cannot scan an empty raster")]
    EmptyRaster,
}

/// An axis-aligned unit scan direction.
///
/// Exactly one of `dx` and `dy` is `±1`; the other is `0`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct EdgeQuery {
    dx: i16,
    dy: i16,
}

impl EdgeQuery {
    /// Scan left to right; finds the leftmost content column.
    pub const RIGHT: Self = Self { dx: 1, dy: 0 };
    /// Scan right to left; finds the rightmost content column.
    pub const LEFT: Self = Self { dx: -1, dy: 0 };
    /// Scan top to bottom; finds the topmost content row.
    pub const DOWN: Self = Self { dx: 0, dy: 1 };
    /// Scan bottom to top; finds the bottommost content row.
    pub const UP: Self = Self { dx: 0, dy: -1 };

    /// Validates a direction vector.
    pub const fn new(dx: i32, dy: i32) -> Result<Self, ScanError> {
        match (dx, dy) {
            (1, 0) => Ok(Self::RIGHT),
            (-1, 0) => Ok(Self::LEFT),
            (0, 1) => Ok(Self::DOWN),
            (0, -1) => Ok(Self::UP),
            _ => Err(ScanError::InvalidDirection { dx, dy }),
        }
    }

    /// Horizontal component.
    #[inline]
    pub const fn dx(self) -> i32 {
        self.dx as i32
    }

    /// Vertical component.
    #[inline]
    pub const fn dy(self) -> i32 {
        self.dy as i32
    }

    /// Returns `true` if the scan moves along the x axis.
    #[inline]
    pub const fn is_horizontal(self) -> bool {
        self.dx != 0
    }
}

/// Inclusive pixel bounds of the strip being scanned.
#[derive(Copy, Clone, Debug)]
struct Strip {
    x0: u16,
    x1: u16,
    y0: u16,
    y1: u16,
}

impl Strip {
    /// The strip on the side of the raster the scan starts from.
    fn first(query: EdgeQuery, width: u16, height: u16) -> Self {
        let (right, bottom) = (width - 1, height - 1);
        let (x0, x1, y0, y1) = match (query.dx, query.dy) {
            (1, _) => (0, 0, 0, bottom),
            (-1, _) => (right, right, 0, bottom),
            (_, 1) => (0, right, 0, 0),
            _ => (0, right, bottom, bottom),
        };
        Self { x0, x1, y0, y1 }
    }

    /// The strip one pixel further along `query`, if it is still inside the raster.
    fn advance(self, query: EdgeQuery, width: u16, height: u16) -> Option<Self> {
        let x0 = self.x0.checked_add_signed(query.dx)?;
        let x1 = self.x1.checked_add_signed(query.dx)?;
        let y0 = self.y0.checked_add_signed(query.dy)?;
        let y1 = self.y1.checked_add_signed(query.dy)?;
        (x1 < width && y1 < height).then_some(Self { x0, x1, y0, y1 })
    }
}

/// Color of the one-pixel strip a scan along `query` starts from.
///
/// Returns [`INVALID_COLOR`] if that strip is not uniform, and
/// [`ScanError::EmptyRaster`] if the raster has no pixels.
pub fn leading_strip_color(raster: &RasterSample, query: EdgeQuery) -> Result<Color, ScanError> {
    if raster.is_empty() {
        return Err(ScanError::EmptyRaster);
    }
    let strip = Strip::first(query, raster.width(), raster.height());
    Ok(area_color(raster, strip.x0..=strip.x1, strip.y0..=strip.y1))
}

/// Finds the first row or column, scanning along `(dx, dy)`, that is not the
/// background color.
///
/// See [`find_edge_for`]; this entry point additionally validates the raw
/// direction vector.
pub fn find_edge(raster: &RasterSample, dx: i32, dy: i32) -> Result<u16, ScanError> {
    find_edge_for(raster, EdgeQuery::new(dx, dy)?)
}

/// Finds the first row or column, scanning along `query`, that is not the
/// background color.
///
/// A one-pixel strip spanning the full perpendicular extent starts at the side
/// the scan comes from. The color of that first strip is the background,
/// and the scan stops at the first strip that is non-uniform or a different
/// color. If every strip matches the background, the scan stops at the last
/// strip on the far side.
///
/// Returns the x coordinate of the stopping strip for horizontal scans and
/// its y coordinate for vertical ones.
pub fn find_edge_for(raster: &RasterSample, query: EdgeQuery) -> Result<u16, ScanError> {
    let (width, height) = (raster.width(), raster.height());
    if raster.is_empty() {
        return Err(ScanError::EmptyRaster);
    }

    let mut strip = Strip::first(query, width, height);
    let background = area_color(raster, strip.x0..=strip.x1, strip.y0..=strip.y1);
    if background != INVALID_COLOR {
        while let Some(next) = strip.advance(query, width, height) {
            strip = next;
            if area_color(raster, strip.x0..=strip.x1, strip.y0..=strip.y1) != background {
                break;
            }
        }
    }

    Ok(if query.is_horizontal() {
        strip.x0
    } else {
        strip.y0
    })
}
