// Copyright 2025 the Autocrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use kurbo::{Affine, BezPath, Rect, Size};
use peniko::Brush;
use thiserror::Error;

use crate::{FillRule, LayerOp, StrokeStyle};

/// One operation of a [`Document`]'s drawing program.
///
/// State operations (`Set*`, layers) affect every draw operation after them.
/// The initial state is the identity transform, an opaque black brush, a
/// one-unit stroke, and [`FillRule::NonZero`].
#[derive(Clone, Debug, PartialEq)]
pub enum DocumentOp {
    /// Set the current geometry transform.
    SetTransform(Affine),
    /// Set the transform used when sampling brushes (e.g. gradients).
    SetPaintTransform(Affine),
    /// Set the current brush.
    SetBrush(Brush),
    /// Set the current stroke style.
    SetStroke(StrokeStyle),
    /// Set the fill rule used by [`DocumentOp::FillPath`].
    SetFillRule(FillRule),
    /// Open a layer. Must be matched by a later [`DocumentOp::PopLayer`].
    PushLayer(LayerOp),
    /// Close the most recently opened layer.
    PopLayer,
    /// Fill a path with the current brush.
    FillPath(BezPath),
    /// Stroke a path with the current stroke style and brush.
    StrokePath(BezPath),
    /// Fill a rectangle with the current brush.
    FillRect(Rect),
    /// Stroke a rectangle with the current stroke style and brush.
    StrokeRect(Rect),
}

/// A structural problem in a document's drawing program.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// A [`DocumentOp::PopLayer`] with no open layer.
    #[error("op {index}: PopLayer without a matching PushLayer")]
    UnbalancedPop {
        /// Position of the offending op.
        index: usize,
    },
    /// Layers still open at the end of the program.
    #[error("{open} layer(s) left open at end of document")]
    UnclosedLayers {
        /// Number of open layers.
        open: usize,
    },
}

/// An immutable vector document: a nominal page size plus a drawing program.
///
/// The page size seeds autocropping; content is free to extend past it, and
/// is then cut off at the page edge.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    size: Size,
    ops: Vec<DocumentOp>,
}

impl Document {
    /// Creates a document from its page size and drawing program.
    pub fn new(size: Size, ops: Vec<DocumentOp>) -> Self {
        Self { size, ops }
    }

    /// Creates an empty page.
    pub fn empty(width: f64, height: f64) -> Self {
        Self::new(Size::new(width, height), Vec::new())
    }

    /// Nominal page size.
    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    /// The drawing program.
    #[inline]
    pub fn ops(&self) -> &[DocumentOp] {
        &self.ops
    }

    /// Returns true if the document draws nothing.
    pub fn is_blank(&self) -> bool {
        !self.ops.iter().any(|op| {
            matches!(
                op,
                DocumentOp::FillPath(_)
                    | DocumentOp::StrokePath(_)
                    | DocumentOp::FillRect(_)
                    | DocumentOp::StrokeRect(_)
            )
        })
    }

    /// Checks that every layer push is matched by a pop, and vice versa.
    pub fn validate(&self) -> Result<(), DocumentError> {
        let mut depth = 0_usize;
        for (index, op) in self.ops.iter().enumerate() {
            match op {
                DocumentOp::PushLayer(_) => depth += 1,
                DocumentOp::PopLayer => {
                    depth = depth
                        .checked_sub(1)
                        .ok_or(DocumentError::UnbalancedPop { index })?;
                }
                _ => {}
            }
        }
        if depth == 0 {
            Ok(())
        } else {
            Err(DocumentError::UnclosedLayers { open: depth })
        }
    }
}
