// Copyright 2025 the Autocrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use peniko::Color;

/// A layer effect that can paint past the geometry drawn inside the layer.
///
/// Path bounds say nothing about where these effects leave pixels, so a
/// document using them can only be cropped by rendering it. Distances are in
/// the layer's user space and scale with the transform current at
/// [`DocumentOp::PushLayer`](crate::DocumentOp::PushLayer).
#[derive(Clone, Debug, PartialEq)]
pub enum FilterDesc {
    /// Gaussian blur. The faint tail reaches a few `sigma` past every edge.
    Blur {
        /// Standard deviation.
        sigma: f32,
    },
    /// A blurred, tinted copy of the layer, moved by `(dx, dy)` and painted
    /// beneath it. Grows the painted area toward the offset.
    DropShadow {
        /// Shadow offset along X.
        dx: f32,
        /// Shadow offset along Y.
        dy: f32,
        /// Shadow blur standard deviation.
        sigma: f32,
        /// Shadow color.
        color: Color,
    },
    /// Moves the whole layer by `(dx, dy)`; nothing is painted where it was
    /// drawn.
    Offset {
        /// Offset along X.
        dx: f32,
        /// Offset along Y.
        dy: f32,
    },
}

impl FilterDesc {
    /// A blur.
    #[inline]
    pub const fn blur(sigma: f32) -> Self {
        Self::Blur { sigma }
    }

    /// A drop shadow.
    #[inline]
    pub const fn drop_shadow(dx: f32, dy: f32, sigma: f32, color: Color) -> Self {
        Self::DropShadow {
            dx,
            dy,
            sigma,
            color,
        }
    }

    /// An offset.
    #[inline]
    pub const fn offset(dx: f32, dy: f32) -> Self {
        Self::Offset { dx, dy }
    }
}
