// Copyright 2025 the Autocrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::ops::RangeInclusive;

use crate::color::{Color, INVALID_COLOR};
use crate::raster::RasterSample;

/// Returns the single color of the inclusive pixel area `xs × ys`, or
/// [`INVALID_COLOR`] if the area holds more than one color.
///
/// The candidate color is the pixel at the area's minimum corner; scanning
/// stops at the first pixel that differs.
///
/// Both ranges must be non-empty and lie inside `raster`. This is the
/// caller's responsibility and is only checked in debug builds.
pub fn area_color(
    raster: &RasterSample,
    xs: RangeInclusive<u16>,
    ys: RangeInclusive<u16>,
) -> Color {
    let (x0, x1) = (*xs.start(), *xs.end());
    let (y0, y1) = (*ys.start(), *ys.end());
    debug_assert!(
        x0 <= x1 && x1 < raster.width() && y0 <= y1 && y1 < raster.height(),
        "area [{x0}, {x1}] x [{y0}, {y1}] outside {}x{} raster",
        raster.width(),
        raster.height()
    );

    let pixels = raster.pixels();
    let stride = raster.stride();
    let candidate = pixels[stride * usize::from(y0) + usize::from(x0)];
    for y in ys {
        let row = stride * usize::from(y);
        let span = &pixels[row + usize::from(x0)..=row + usize::from(x1)];
        if span.iter().any(|&p| p != candidate) {
            return INVALID_COLOR;
        }
    }
    candidate
}
