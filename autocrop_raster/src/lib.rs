// Copyright 2025 the Autocrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Autocrop Raster: small raster samples and the pixel scans run over them.
//!
//! This crate holds the pixel-level half of autocrop:
//! - [`RasterSample`]: a fixed-size buffer of packed premultiplied ARGB32
//!   pixels with an explicit row stride.
//! - [`area_color`]: reports whether a rectangular pixel area is one uniform
//!   [`Color`], or [`INVALID_COLOR`] if it is not.
//! - [`find_edge`] / [`find_edge_for`]: scans one-pixel strips from one side
//!   of a raster until the first strip that is not pure background.
//!
//! It knows nothing about documents, transforms, or renderers. Those live in
//! the `autocrop` crate, which renders document regions into
//! [`RasterSample`]s and feeds them to these scans.
//!
//! ## Example
//!
//! ```rust
//! use autocrop_raster::{Color, EdgeQuery, RasterSample, find_edge_for};
//!
//! let mut raster = RasterSample::new(10, 10);
//! raster.fill_rect(3, 4, 7, 6, Color::from_premul_rgba8(0, 0, 0, 255));
//!
//! assert_eq!(find_edge_for(&raster, EdgeQuery::DOWN), Ok(4));
//! assert_eq!(find_edge_for(&raster, EdgeQuery::RIGHT), Ok(3));
//! ```
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

mod color;
mod raster;
mod sample;
mod scan;

pub use color::{Color, INVALID_COLOR};
pub use raster::{RasterError, RasterSample};
pub use sample::area_color;
pub use scan::{EdgeQuery, ScanError, find_edge, find_edge_for, leading_strip_color};
