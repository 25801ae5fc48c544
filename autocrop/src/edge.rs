// Copyright 2025 the Autocrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use autocrop_raster::EdgeQuery;
use kurbo::Rect;

use crate::region::DocumentRegion;

/// One of the four sides of a bounding box.
///
/// Each edge is searched independently and owns exactly one bound of the
/// final region.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    /// Minimum y; found by scanning downward.
    Top,
    /// Maximum y; found by scanning upward.
    Bottom,
    /// Minimum x; found by scanning rightward.
    Left,
    /// Maximum x; found by scanning leftward.
    Right,
}

impl Edge {
    /// All edges, in the order the engine searches them.
    pub const ALL: [Self; 4] = [Self::Top, Self::Bottom, Self::Left, Self::Right];

    /// The scan direction that approaches this edge from outside the content.
    #[inline]
    pub const fn query(self) -> EdgeQuery {
        match self {
            Self::Top => EdgeQuery::DOWN,
            Self::Bottom => EdgeQuery::UP,
            Self::Left => EdgeQuery::RIGHT,
            Self::Right => EdgeQuery::LEFT,
        }
    }

    /// The edge a scan direction is responsible for.
    pub fn from_query(query: EdgeQuery) -> Self {
        match (query.dx(), query.dy()) {
            (0, 1) => Self::Top,
            (0, _) => Self::Bottom,
            (1, _) => Self::Left,
            _ => Self::Right,
        }
    }

    /// The bound of `region` this edge owns.
    #[inline]
    pub fn bound(self, region: DocumentRegion) -> f64 {
        match self {
            Self::Top => region.top,
            Self::Bottom => region.bottom,
            Self::Left => region.left,
            Self::Right => region.right,
        }
    }

    /// `region` with only the bound this edge owns replaced.
    #[inline]
    pub fn with_bound(self, mut region: DocumentRegion, value: f64) -> DocumentRegion {
        match self {
            Self::Top => region.top = value,
            Self::Bottom => region.bottom = value,
            Self::Left => region.left = value,
            Self::Right => region.right = value,
        }
        region
    }

    /// Span of `region` along the axis this edge refines.
    #[inline]
    pub fn span(self, region: DocumentRegion) -> f64 {
        match self {
            Self::Top | Self::Bottom => region.height(),
            Self::Left | Self::Right => region.width(),
        }
    }

    /// Scan position of the row or column on this edge's side of a
    /// `width × height` raster.
    pub(crate) fn leading_pixel(self, width: u16, height: u16) -> u16 {
        match self {
            Self::Top | Self::Left => 0,
            Self::Bottom => height.saturating_sub(1),
            Self::Right => width.saturating_sub(1),
        }
    }

    /// The one-pixel device strip at scan position `k`, spanning the full
    /// perpendicular extent of a `width × height` raster.
    ///
    /// Top and bottom searches both narrow to row `k`; left and right
    /// searches to column `k`.
    pub(crate) fn device_strip(self, k: u16, width: u16, height: u16) -> Rect {
        let k = f64::from(k);
        match self {
            Self::Top | Self::Bottom => Rect::new(0.0, k, f64::from(width), k + 1.0),
            Self::Left | Self::Right => Rect::new(k, 0.0, k + 1.0, f64::from(height)),
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queries_round_trip() {
        for edge in Edge::ALL {
            assert_eq!(Edge::from_query(edge.query()), edge);
        }
    }

    #[test]
    fn with_bound_touches_one_side() {
        let region = DocumentRegion::new(0.0, 10.0, 0.0, 20.0);
        assert_eq!(
            Edge::Bottom.with_bound(region, 7.5),
            DocumentRegion::new(0.0, 7.5, 0.0, 20.0)
        );
        assert_eq!(
            Edge::Left.with_bound(region, 2.0),
            DocumentRegion::new(0.0, 10.0, 2.0, 20.0)
        );
        assert_eq!(Edge::Right.bound(region), 20.0);
    }

    #[test]
    fn leading_pixels_sit_on_the_scanned_side() {
        assert_eq!(Edge::Top.leading_pixel(100, 80), 0);
        assert_eq!(Edge::Bottom.leading_pixel(100, 80), 79);
        assert_eq!(Edge::Left.leading_pixel(100, 80), 0);
        assert_eq!(Edge::Right.leading_pixel(100, 80), 99);
    }

    #[test]
    fn strips_span_the_raster() {
        assert_eq!(
            Edge::Bottom.device_strip(42, 100, 80),
            Rect::new(0.0, 42.0, 100.0, 43.0)
        );
        assert_eq!(
            Edge::Left.device_strip(0, 100, 80),
            Rect::new(0.0, 0.0, 1.0, 80.0)
        );
    }
}
