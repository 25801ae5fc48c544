// Copyright 2025 the Autocrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=autocrop_imaging --heading-base-level=0

//! Autocrop Imaging: a small in-memory vector document model.
//!
//! A [`Document`] is a nominal page size plus a flat drawing program of
//! [`DocumentOp`]s: state changes (transform, brush, stroke, fill rule),
//! draws (paths and rectangles), and well-nested layers carrying clips,
//! filters, blend modes, and opacity.
//!
//! The model is deliberately rich in the things that make geometric bounds
//! unreliable (strokes, blurs, shadows, offsets, clips) and is meant to be
//! rendered, not inspected. Renderers such as `autocrop_vello_cpu` consume it.
//!
//! Documents are built programmatically with [`DocumentBuilder`]; there is no
//! parser.
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

mod builder;
mod document;
mod filter;
mod layer;

pub use builder::{DocumentBuilder, PATH_TOLERANCE};
pub use document::{Document, DocumentError, DocumentOp};
pub use filter::FilterDesc;
pub use layer::{ClipOp, ClipShape, LayerOp};
pub use peniko::{BlendMode, Brush, Fill as FillRule};

/// Stroke style used by [`DocumentOp::SetStroke`].
///
/// A re-export of [`kurbo::Stroke`]: width, joins, caps, and dashes.
pub type StrokeStyle = kurbo::Stroke;
