// Copyright 2025 the Autocrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{BezPath, Rect, RoundedRect, Shape, StrokeOpts, stroke};
use peniko::BlendMode;

use crate::{FillRule, FilterDesc, StrokeStyle};

/// Clip geometry used by [`ClipOp`], in the user space current when the
/// layer is pushed.
#[derive(Clone, Debug, PartialEq)]
pub enum ClipShape {
    /// An axis-aligned rectangle.
    Rect(Rect),
    /// An axis-aligned rounded rectangle.
    RoundedRect(RoundedRect),
    /// An arbitrary path.
    Path(BezPath),
}

impl ClipShape {
    /// The shape as a path, flattened curves within `tolerance`.
    pub fn to_path(&self, tolerance: f64) -> BezPath {
        match self {
            Self::Rect(rect) => rect.to_path(tolerance),
            Self::RoundedRect(rr) => rr.to_path(tolerance),
            Self::Path(path) => path.clone(),
        }
    }
}

impl From<Rect> for ClipShape {
    fn from(rect: Rect) -> Self {
        Self::Rect(rect)
    }
}

impl From<RoundedRect> for ClipShape {
    fn from(rr: RoundedRect) -> Self {
        Self::RoundedRect(rr)
    }
}

impl From<BezPath> for ClipShape {
    fn from(path: BezPath) -> Self {
        Self::Path(path)
    }
}

/// A clip attached to a pushed layer.
#[derive(Clone, Debug, PartialEq)]
pub enum ClipOp {
    /// Clip to the inside of a shape.
    Fill {
        /// Clip geometry.
        shape: ClipShape,
        /// Rule deciding what "inside" means for self-intersecting paths.
        fill_rule: FillRule,
    },
    /// Clip to the outline a stroke of `shape` would paint, dashes included.
    Stroke {
        /// Stroked geometry.
        shape: ClipShape,
        /// Stroke parameters.
        style: StrokeStyle,
    },
}

impl ClipOp {
    /// A non-zero fill clip.
    pub fn fill(shape: impl Into<ClipShape>) -> Self {
        Self::Fill {
            shape: shape.into(),
            fill_rule: FillRule::NonZero,
        }
    }

    /// A stroke clip.
    pub fn stroke(shape: impl Into<ClipShape>, style: StrokeStyle) -> Self {
        Self::Stroke {
            shape: shape.into(),
            style,
        }
    }

    /// The fill rule to use when clipping to [`ClipOp::outline`].
    pub fn fill_rule(&self) -> FillRule {
        match self {
            Self::Fill { fill_rule, .. } => *fill_rule,
            Self::Stroke { .. } => FillRule::NonZero,
        }
    }

    /// The region to clip to, as a fillable path.
    pub fn outline(&self, tolerance: f64) -> BezPath {
        match self {
            Self::Fill { shape, .. } => shape.to_path(tolerance),
            Self::Stroke { shape, style } => {
                let path = shape.to_path(tolerance);
                stroke(path.iter(), style, &StrokeOpts::default(), tolerance)
            }
        }
    }
}

/// Parameters of a pushed compositing layer.
///
/// Layers are the only scoping mechanism in a document: clips, filters, blend
/// modes, and group opacity all apply to everything drawn between a
/// [`DocumentOp::PushLayer`] and its matching [`DocumentOp::PopLayer`].
///
/// [`DocumentOp::PushLayer`]: crate::DocumentOp::PushLayer
/// [`DocumentOp::PopLayer`]: crate::DocumentOp::PopLayer
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayerOp {
    /// Clip applied to the layer's content.
    pub clip: Option<ClipOp>,
    /// Filter applied to the layer when compositing it into its parent.
    pub filter: Option<FilterDesc>,
    /// Blend mode used when compositing into the parent.
    pub blend: Option<BlendMode>,
    /// Group opacity (0-1) applied when compositing into the parent.
    pub opacity: Option<f32>,
}

impl LayerOp {
    /// A layer that only clips.
    pub fn clip(clip: ClipOp) -> Self {
        Self {
            clip: Some(clip),
            ..Self::default()
        }
    }

    /// A layer that only filters.
    pub fn filter(filter: FilterDesc) -> Self {
        Self {
            filter: Some(filter),
            ..Self::default()
        }
    }

    /// A layer that only fades its content.
    pub fn opacity(opacity: f32) -> Self {
        Self {
            opacity: Some(opacity),
            ..Self::default()
        }
    }

    /// Returns true if this layer changes how its content is composited into
    /// its parent. The clip is not considered.
    #[inline]
    pub fn has_compositing_effects(&self) -> bool {
        self.filter.is_some() || self.blend.is_some() || self.opacity.is_some()
    }

    /// Returns true if this layer has no effect at all.
    #[inline]
    pub fn is_noop(&self) -> bool {
        self.clip.is_none() && !self.has_compositing_effects()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stroke_clip_outline_covers_the_stroke() {
        let clip = ClipOp::stroke(Rect::new(10.0, 10.0, 20.0, 20.0), StrokeStyle::new(4.0));
        let bounds = clip.outline(0.01).bounding_box();
        assert!((bounds.x0 - 8.0).abs() < 1e-3, "{bounds:?}");
        assert!((bounds.x1 - 22.0).abs() < 1e-3, "{bounds:?}");
        assert_eq!(clip.fill_rule(), FillRule::NonZero);
    }

    #[test]
    fn fill_clip_keeps_its_rule() {
        let clip = ClipOp::Fill {
            shape: Rect::new(0.0, 0.0, 1.0, 1.0).into(),
            fill_rule: FillRule::EvenOdd,
        };
        assert_eq!(clip.fill_rule(), FillRule::EvenOdd);
        assert_eq!(clip.outline(0.1).bounding_box(), Rect::new(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn noop_layers() {
        assert!(LayerOp::default().is_noop());
        assert!(!LayerOp::opacity(0.5).is_noop());
        let clip_only = LayerOp::clip(ClipOp::fill(Rect::new(0.0, 0.0, 1.0, 1.0)));
        assert!(!clip_only.is_noop());
        assert!(!clip_only.has_compositing_effects());
    }
}
