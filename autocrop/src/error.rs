// Copyright 2025 the Autocrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;

use autocrop_raster::{RasterError, ScanError};
use thiserror::Error;

use crate::edge::Edge;

/// A renderer failed to produce a raster.
///
/// The message is the renderer's own diagnostic, carried verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RenderError {
    /// Renderer diagnostic.
    pub message: String,
}

impl RenderError {
    /// Creates an error from a renderer diagnostic.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<RasterError> for RenderError {
    fn from(err: RasterError) -> Self {
        use alloc::string::ToString;
        Self::new(err.to_string())
    }
}

/// Errors from an autocrop call. None of them leaves a partial result.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum AutocropError {
    /// The renderer failed on one of the refinement renders.
    #[error("render failed: {0}")]
    Render(#[from] RenderError),
    /// A scan was requested along something other than an axis-aligned unit
    /// vector.
    #[error("invalid edge direction ({dx}, {dy})")]
    InvalidDirection {
        /// Horizontal component.
        dx: i32,
        /// Vertical component.
        dy: i32,
    },
    /// The document extent is zero, negative, or not finite.
    #[error("degenerate document extent {width}x{height}")]
    DegenerateDocument {
        /// Reported width.
        width: f64,
        /// Reported height.
        height: f64,
    },
    /// The starting region is inverted or not finite.
    #[error("invalid document region")]
    InvalidRegion,
    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    /// An edge search did not converge within the configured step ceiling.
    #[error("{edge} edge did not converge within {depth} refinement steps")]
    DepthLimit {
        /// The edge that was being refined.
        edge: Edge,
        /// The step ceiling that was hit.
        depth: u32,
    },
}

impl From<ScanError> for AutocropError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::InvalidDirection { dx, dy } => Self::InvalidDirection { dx, dy },
            ScanError::EmptyRaster => {
                Self::Render(RenderError::new("renderer returned an empty raster"))
            }
        }
    }
}
