// Copyright 2025 the Autocrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=autocrop --heading-base-level=0

//! Autocrop: tight bounding boxes for vector documents.
//!
//! Given anything that can rasterize a document under an arbitrary view
//! transform, this crate finds the smallest document-space rectangle that
//! contains every painted pixel. It only ever looks at rendered output, so
//! blurs, strokes, shadows, clips, and offsets are all accounted for without
//! any geometric reasoning about the document itself.
//!
//! Each of the four edges is found independently:
//! - Render the current region into a small raster (100x100 by default).
//! - If the raster is fully transparent, stop: there is nothing to refine.
//! - If the one-pixel strip on the edge's side holds any paint, narrow the
//!   region to that strip. Otherwise scan strips inward past the transparent
//!   margin and narrow to the first one that is not empty.
//! - Repeat until the region is thinner than the tolerance.
//!
//! Every step shrinks the refined span by the raster resolution, so a few
//! renders per edge reach sub-1e-4 precision. The four bounds are assembled
//! and rounded to three decimals.
//!
//! The engine talks to rendering only through the [`Renderer`] trait. See
//! `autocrop_vello_cpu` for an implementation backed by Vello CPU.
//!
//! ## Example
//!
//! ```rust
//! use autocrop::{AutocropEngine, RenderError, Renderer};
//! use autocrop::raster::RasterSample;
//! use kurbo::{Affine, Size};
//!
//! /// A blank A4 page.
//! struct Blank;
//!
//! impl Renderer for Blank {
//!     fn document_extent(&self) -> Size {
//!         Size::new(595.0, 842.0)
//!     }
//!
//!     fn render_region(
//!         &self,
//!         _transform: Affine,
//!         width: u16,
//!         height: u16,
//!     ) -> Result<RasterSample, RenderError> {
//!         Ok(RasterSample::new(width, height))
//!     }
//! }
//!
//! // Nothing painted: the whole page comes back.
//! let bbox = AutocropEngine::default().autocrop(&Blank).unwrap();
//! assert_eq!((bbox.width, bbox.height), (595.0, 842.0));
//! ```
//!
//! ## Features
//!
//! - `std` (default): use the standard library.
//! - `libm`: float math for `no_std` builds.
//! - `rayon`: [`AutocropEngine::autocrop_parallel`], which searches the four
//!   edges concurrently. Requires a `Sync` renderer.
//!
//! This crate is `no_std` without the `std` feature.

#![no_std]

extern crate alloc;

mod config;
mod edge;
mod engine;
mod error;
mod region;
mod render;

/// Re-export of the raster layer.
pub use autocrop_raster as raster;

pub use config::AutocropConfig;
pub use edge::Edge;
pub use engine::{AutocropEngine, AutocropReport, EdgeOutcome, Terminal};
pub use error::{AutocropError, RenderError};
pub use region::{BoundingBox, DocumentRegion, round3};
pub use render::{RegionRenderer, RenderedRegion, Renderer, ViewTransform};

/// Computes the bounding box of `renderer`'s document with the default
/// configuration.
///
/// Shorthand for `AutocropEngine::default().autocrop(renderer)`.
pub fn autocrop<R: Renderer + ?Sized>(renderer: &R) -> Result<BoundingBox, AutocropError> {
    AutocropEngine::default().autocrop(renderer)
}
