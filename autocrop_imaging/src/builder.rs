// Copyright 2025 the Autocrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use kurbo::{Affine, Rect, Shape, Size};
use peniko::Brush;

use crate::{ClipOp, ClipShape, Document, DocumentOp, FillRule, FilterDesc, LayerOp, StrokeStyle};

/// Tolerance used when converting shapes into paths.
///
/// Autocropping zooms far into edges, so curves are kept much tighter than
/// display rendering would need.
pub const PATH_TOLERANCE: f64 = 1e-6;

/// Records a [`Document`] one operation at a time.
///
/// ```rust
/// use autocrop_imaging::{DocumentBuilder, FilterDesc};
/// use kurbo::{Circle, Rect};
/// use peniko::Color;
///
/// let mut builder = DocumentBuilder::new(200.0, 100.0);
/// builder
///     .set_brush(Color::from_rgba8(0, 0, 255, 255))
///     .fill(&Circle::new((50.0, 50.0), 20.0))
///     .with_filter(FilterDesc::blur(4.0), |b| {
///         b.fill_rect(Rect::new(120.0, 20.0, 180.0, 80.0));
///     });
/// let doc = builder.build();
/// assert_eq!(doc.ops().len(), 5);
/// assert!(doc.validate().is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct DocumentBuilder {
    size: Size,
    ops: Vec<DocumentOp>,
}

impl DocumentBuilder {
    /// Starts an empty `width × height` page.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: Size::new(width, height),
            ops: Vec::new(),
        }
    }

    /// Appends a raw operation.
    pub fn push(&mut self, op: DocumentOp) -> &mut Self {
        self.ops.push(op);
        self
    }

    /// Sets the geometry transform.
    pub fn set_transform(&mut self, transform: Affine) -> &mut Self {
        self.push(DocumentOp::SetTransform(transform))
    }

    /// Sets the brush-sampling transform.
    pub fn set_paint_transform(&mut self, transform: Affine) -> &mut Self {
        self.push(DocumentOp::SetPaintTransform(transform))
    }

    /// Sets the brush.
    pub fn set_brush(&mut self, brush: impl Into<Brush>) -> &mut Self {
        self.push(DocumentOp::SetBrush(brush.into()))
    }

    /// Sets the stroke style.
    pub fn set_stroke(&mut self, style: StrokeStyle) -> &mut Self {
        self.push(DocumentOp::SetStroke(style))
    }

    /// Sets the fill rule.
    pub fn set_fill_rule(&mut self, rule: FillRule) -> &mut Self {
        self.push(DocumentOp::SetFillRule(rule))
    }

    /// Fills any kurbo shape.
    pub fn fill(&mut self, shape: &impl Shape) -> &mut Self {
        self.push(DocumentOp::FillPath(shape.to_path(PATH_TOLERANCE)))
    }

    /// Strokes any kurbo shape.
    pub fn stroke(&mut self, shape: &impl Shape) -> &mut Self {
        self.push(DocumentOp::StrokePath(shape.to_path(PATH_TOLERANCE)))
    }

    /// Fills a rectangle.
    pub fn fill_rect(&mut self, rect: Rect) -> &mut Self {
        self.push(DocumentOp::FillRect(rect))
    }

    /// Strokes a rectangle.
    pub fn stroke_rect(&mut self, rect: Rect) -> &mut Self {
        self.push(DocumentOp::StrokeRect(rect))
    }

    /// Opens a layer.
    pub fn push_layer(&mut self, layer: LayerOp) -> &mut Self {
        self.push(DocumentOp::PushLayer(layer))
    }

    /// Closes the innermost layer.
    pub fn pop_layer(&mut self) -> &mut Self {
        self.push(DocumentOp::PopLayer)
    }

    /// Records `f` inside a layer, closing it afterwards.
    pub fn with_layer(&mut self, layer: LayerOp, f: impl FnOnce(&mut Self)) -> &mut Self {
        self.push_layer(layer);
        f(self);
        self.pop_layer()
    }

    /// Records `f` clipped to the inside of `shape`.
    pub fn with_clip(
        &mut self,
        shape: impl Into<ClipShape>,
        fill_rule: FillRule,
        f: impl FnOnce(&mut Self),
    ) -> &mut Self {
        let clip = ClipOp::Fill {
            shape: shape.into(),
            fill_rule,
        };
        self.with_layer(LayerOp::clip(clip), f)
    }

    /// Records `f` clipped to the stroke outline of `shape`.
    pub fn with_clip_stroke(
        &mut self,
        shape: impl Into<ClipShape>,
        style: StrokeStyle,
        f: impl FnOnce(&mut Self),
    ) -> &mut Self {
        self.with_layer(LayerOp::clip(ClipOp::stroke(shape, style)), f)
    }

    /// Records `f` inside a filtered layer.
    pub fn with_filter(&mut self, filter: FilterDesc, f: impl FnOnce(&mut Self)) -> &mut Self {
        self.with_layer(LayerOp::filter(filter), f)
    }

    /// Records `f` inside a layer with group opacity.
    pub fn with_opacity(&mut self, opacity: f32, f: impl FnOnce(&mut Self)) -> &mut Self {
        self.with_layer(LayerOp::opacity(opacity), f)
    }

    /// Finishes recording.
    pub fn build(self) -> Document {
        Document::new(self.size, self.ops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{BezPath, Circle};

    #[test]
    fn nested_layers_balance() {
        let mut builder = DocumentBuilder::new(100.0, 100.0);
        builder.with_opacity(0.5, |b| {
            b.with_clip(Rect::new(0.0, 0.0, 50.0, 50.0), FillRule::EvenOdd, |b| {
                b.fill_rect(Rect::new(10.0, 10.0, 90.0, 90.0));
            });
        });
        let doc = builder.build();
        assert_eq!(doc.ops().len(), 5);
        assert!(doc.validate().is_ok());
        assert!(matches!(doc.ops()[4], DocumentOp::PopLayer));
    }

    #[test]
    fn shapes_become_tight_paths() {
        let mut builder = DocumentBuilder::new(100.0, 100.0);
        builder.fill(&Circle::new((50.0, 50.0), 10.0));
        let doc = builder.build();
        let DocumentOp::FillPath(path) = &doc.ops()[0] else {
            panic!("expected a fill, got {:?}", doc.ops()[0]);
        };
        let bounds = path.bounding_box();
        assert!((bounds.x0 - 40.0).abs() < 1e-5, "{bounds:?}");
        assert!((bounds.y1 - 60.0).abs() < 1e-5, "{bounds:?}");
    }

    #[test]
    fn raw_ops_pass_through() {
        let mut builder = DocumentBuilder::new(1.0, 1.0);
        builder.push(DocumentOp::StrokePath(BezPath::new()));
        assert_eq!(builder.build().ops(), &[DocumentOp::StrokePath(BezPath::new())]);
    }
}
