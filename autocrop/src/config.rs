// Copyright 2025 the Autocrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::error::AutocropError;

/// Tuning knobs for [`AutocropEngine`](crate::AutocropEngine).
///
/// Larger rasters converge in fewer refinement steps at a higher cost per
/// render; smaller rasters the reverse.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AutocropConfig {
    /// Width of each refinement raster, in pixels.
    pub raster_width: u16,
    /// Height of each refinement raster, in pixels.
    pub raster_height: u16,
    /// Spans below this many document units are considered converged.
    pub epsilon: f64,
    /// Maximum number of refinement renders per edge.
    pub max_depth: u32,
}

impl AutocropConfig {
    /// Default raster side length.
    pub const DEFAULT_RASTER_SIZE: u16 = 100;
    /// Default convergence tolerance.
    pub const DEFAULT_EPSILON: f64 = 1e-4;
    /// Default refinement step ceiling.
    ///
    /// With the default raster and tolerance, a 1e12-unit document converges
    /// in under ten steps.
    pub const DEFAULT_MAX_DEPTH: u32 = 32;

    /// Sets the raster resolution.
    #[must_use]
    pub fn with_raster_size(mut self, width: u16, height: u16) -> Self {
        self.raster_width = width;
        self.raster_height = height;
        self
    }

    /// Sets the convergence tolerance.
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Sets the refinement step ceiling.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Checks that every value is in range.
    ///
    /// Each raster axis needs at least two pixels, otherwise narrowing to
    /// one pixel along that axis does not shrink the region.
    pub fn validate(&self) -> Result<(), AutocropError> {
        if self.raster_width < 2 || self.raster_height < 2 {
            return Err(AutocropError::InvalidConfig(
                "raster must be at least 2x2 pixels",
            ));
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(AutocropError::InvalidConfig(
                "epsilon must be positive and finite",
            ));
        }
        if self.max_depth == 0 {
            return Err(AutocropError::InvalidConfig("max_depth must be at least 1"));
        }
        Ok(())
    }
}

impl Default for AutocropConfig {
    fn default() -> Self {
        Self {
            raster_width: Self::DEFAULT_RASTER_SIZE,
            raster_height: Self::DEFAULT_RASTER_SIZE,
            epsilon: Self::DEFAULT_EPSILON,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}
