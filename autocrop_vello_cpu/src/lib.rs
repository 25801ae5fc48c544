// Copyright 2025 the Autocrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=autocrop_vello_cpu --heading-base-level=0

//! Vello CPU-backed [`Renderer`] for autocrop documents.
//!
//! [`VelloCpuRenderer`] rasterizes an [`autocrop_imaging::Document`] with the
//! sparse-strips [`vello_cpu::RenderContext`], so the autocrop engine sees
//! exactly what a CPU render of the document would paint: anti-aliased
//! edges, stroke outlines, blurs, shadows, offsets, and clips included.
//!
//! ```rust
//! use autocrop::AutocropEngine;
//! use autocrop_imaging::DocumentBuilder;
//! use autocrop_vello_cpu::VelloCpuRenderer;
//! use kurbo::Rect;
//!
//! let mut builder = DocumentBuilder::new(200.0, 200.0);
//! builder.fill_rect(Rect::new(60.0, 80.0, 110.0, 110.0));
//! let renderer = VelloCpuRenderer::new(builder.build());
//!
//! let bbox = AutocropEngine::default().autocrop(&renderer).unwrap();
//! assert!((bbox.x - 60.0).abs() < 1e-2 && (bbox.width - 50.0).abs() < 1e-2);
//!
//! // Render just the painted area.
//! let trimmed = renderer
//!     .render_area(bbox.to_rect().into(), 50, 30)
//!     .unwrap();
//! assert_eq!(trimmed.pixel(25, 15).alpha(), 255);
//! ```
//!
//! Each render allocates its own context and pixmap, so one renderer can be
//! shared between threads.

#![no_std]

extern crate alloc;

use alloc::string::ToString;
use alloc::vec::Vec;
use core::fmt;

use autocrop::raster::{Color, RasterSample};
use autocrop::{DocumentRegion, RenderError, Renderer, ViewTransform};
use autocrop_imaging::{
    Brush, ClipOp, Document, DocumentOp, FillRule, FilterDesc, LayerOp, PATH_TOLERANCE,
    StrokeStyle,
};
use kurbo::{Affine, BezPath, Cap, Join, PathEl, Rect, Size, Vec2};
use vello_common::filter_effects::{EdgeMode, Filter, FilterPrimitive};
use vello_cpu::kurbo::{
    Affine as CpuAffine, BezPath as CpuBezPath, Cap as CpuCap, Join as CpuJoin, Rect as CpuRect,
    Stroke as CpuStroke,
};
use vello_cpu::{
    Image as CpuImage, ImageSource, Pixmap, RenderContext, RenderMode, RenderSettings,
};

/// Renders a [`Document`] with `vello_cpu`.
pub struct VelloCpuRenderer {
    document: Document,
}

impl fmt::Debug for VelloCpuRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VelloCpuRenderer")
            .field("size", &self.document.size())
            .field("ops", &self.document.ops().len())
            .finish()
    }
}

impl VelloCpuRenderer {
    /// Wraps a document.
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// The rendered document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Renders the document-space `region` stretched over a `width × height`
    /// raster.
    ///
    /// With an autocrop result as `region`, this renders the trimmed document.
    pub fn render_area(
        &self,
        region: DocumentRegion,
        width: u16,
        height: u16,
    ) -> Result<RasterSample, RenderError> {
        if !(region.is_valid() && region.width() > 0.0 && region.height() > 0.0) {
            return Err(RenderError::new("render area must have a positive size"));
        }
        let view = ViewTransform::for_region(region, width, height);
        self.render(view.affine(), width, height)
    }

    fn render(
        &self,
        transform: Affine,
        width: u16,
        height: u16,
    ) -> Result<RasterSample, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::new("cannot render into an empty raster"));
        }
        let det = transform.determinant();
        if !(det.is_finite() && det != 0.0) {
            return Err(RenderError::new("view transform is not invertible"));
        }
        self.document
            .validate()
            .map_err(|err| RenderError::new(err.to_string()))?;
        if self.document.is_blank() {
            log::trace!("blank document, skipping vello_cpu for {width}x{height}");
            return Ok(RasterSample::new(width, height));
        }

        let settings = RenderSettings {
            // Pin the u8 pipeline so output does not depend on which
            // pipelines other crates enable.
            render_mode: RenderMode::OptimizeSpeed,
            ..RenderSettings::default()
        };
        let mut ctx = RenderContext::new_with(width, height, settings);
        let mut painter = Painter::new(&mut ctx, transform);
        for op in self.document.ops() {
            painter.apply(op)?;
        }
        painter.finish()?;

        let mut pixmap = Pixmap::new(width, height);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);
        log::trace!("vello_cpu rendered {width}x{height} under {transform:?}");

        let pixels: Vec<Color> = pixmap
            .data()
            .iter()
            .map(|p| Color::from_premul_rgba8(p.r, p.g, p.b, p.a))
            .collect();
        Ok(RasterSample::from_pixels(
            width,
            height,
            usize::from(width),
            pixels,
        )?)
    }
}

impl Renderer for VelloCpuRenderer {
    fn document_extent(&self) -> Size {
        self.document.size()
    }

    fn render_region(
        &self,
        transform: Affine,
        width: u16,
        height: u16,
    ) -> Result<RasterSample, RenderError> {
        self.render(transform, width, height)
    }
}

#[derive(Copy, Clone, Debug)]
struct LayerEntry {
    /// Whether a `vello_cpu` layer was pushed for this document layer.
    pushed: bool,
    /// Content shift to restore when the layer closes.
    saved_shift: Vec2,
}

/// Replays a document's drawing program into a render context.
///
/// Offset filters have no `vello_cpu` counterpart; they are applied by
/// shifting everything drawn inside the layer.
struct Painter<'ctx> {
    ctx: &'ctx mut RenderContext,
    view: Affine,
    transform: Affine,
    /// Sum of the document-space shifts of all enclosing offset layers.
    shift: Vec2,
    fill_rule: FillRule,
    stack: Vec<LayerEntry>,
}

impl<'ctx> Painter<'ctx> {
    fn new(ctx: &'ctx mut RenderContext, view: Affine) -> Self {
        let mut painter = Self {
            ctx,
            view,
            transform: Affine::IDENTITY,
            shift: Vec2::ZERO,
            fill_rule: FillRule::NonZero,
            stack: Vec::new(),
        };
        painter.sync_transform();
        painter.ctx.set_paint(peniko::Color::BLACK);
        painter.ctx.set_stroke(stroke_to_cpu(&StrokeStyle::default()));
        painter.ctx.set_fill_rule(FillRule::NonZero);
        painter
    }

    fn sync_transform(&mut self) {
        let device = self.view * Affine::translate(self.shift) * self.transform;
        self.ctx.set_transform(affine_to_cpu(device));
    }

    fn apply(&mut self, op: &DocumentOp) -> Result<(), RenderError> {
        match op {
            DocumentOp::SetTransform(xf) => {
                self.transform = *xf;
                self.sync_transform();
            }
            DocumentOp::SetPaintTransform(xf) => {
                self.ctx.set_paint_transform(affine_to_cpu(*xf));
            }
            DocumentOp::SetBrush(brush) => match brush.clone() {
                Brush::Solid(color) => self.ctx.set_paint(color),
                Brush::Gradient(gradient) => self.ctx.set_paint(gradient),
                Brush::Image(image_brush) => {
                    let source = ImageSource::from_peniko_image_data(&image_brush.image);
                    self.ctx.set_paint(CpuImage {
                        image: source,
                        sampler: image_brush.sampler,
                    });
                }
            },
            DocumentOp::SetStroke(style) => self.ctx.set_stroke(stroke_to_cpu(style)),
            DocumentOp::SetFillRule(rule) => {
                self.fill_rule = *rule;
                self.ctx.set_fill_rule(*rule);
            }
            DocumentOp::PushLayer(layer) => self.push_layer(layer),
            DocumentOp::PopLayer => self.pop_layer()?,
            DocumentOp::FillPath(path) => self.ctx.fill_path(&path_to_cpu(path)),
            DocumentOp::StrokePath(path) => self.ctx.stroke_path(&path_to_cpu(path)),
            DocumentOp::FillRect(rect) => self.ctx.fill_rect(&rect_to_cpu(*rect)),
            DocumentOp::StrokeRect(rect) => self.ctx.stroke_rect(&rect_to_cpu(*rect)),
        }
        Ok(())
    }

    fn push_layer(&mut self, layer: &LayerOp) {
        let LayerOp {
            clip,
            filter,
            blend,
            opacity,
        } = layer;

        let (filter, offset) = match filter {
            Some(FilterDesc::Offset { dx, dy }) => {
                // User-space vector; only the linear part of the transform applies.
                let [a, b, c, d, _, _] = self.transform.as_coeffs();
                let (dx, dy) = (f64::from(*dx), f64::from(*dy));
                (None, Some(Vec2::new(a * dx + c * dy, b * dx + d * dy)))
            }
            Some(other) => (filter_to_vello(other), None),
            None => (None, None),
        };
        let clip_path = clip
            .as_ref()
            .map(|clip| path_to_cpu(&clip.outline(PATH_TOLERANCE)));

        // An offset-only layer is fully handled by the shift.
        let offset_only =
            offset.is_some() && clip.is_none() && blend.is_none() && opacity.is_none();
        let pushed = !(layer.is_noop() || offset_only);
        if pushed {
            let desired = clip.as_ref().map_or(self.fill_rule, ClipOp::fill_rule);
            if desired != self.fill_rule {
                self.ctx.set_fill_rule(desired);
            }
            self.ctx
                .push_layer(clip_path.as_ref(), *blend, *opacity, None, filter);
            if desired != self.fill_rule {
                self.ctx.set_fill_rule(self.fill_rule);
            }
        }

        self.stack.push(LayerEntry {
            pushed,
            saved_shift: self.shift,
        });
        if let Some(offset) = offset {
            self.shift += offset;
            self.sync_transform();
        }
    }

    fn pop_layer(&mut self) -> Result<(), RenderError> {
        let entry = self
            .stack
            .pop()
            .ok_or_else(|| RenderError::new("PopLayer without a matching PushLayer"))?;
        if entry.pushed {
            self.ctx.pop_layer();
        }
        if entry.saved_shift != self.shift {
            self.shift = entry.saved_shift;
            self.sync_transform();
        }
        Ok(())
    }

    fn finish(self) -> Result<(), RenderError> {
        if self.stack.is_empty() {
            Ok(())
        } else {
            Err(RenderError::new("layers left open at end of document"))
        }
    }
}

fn affine_to_cpu(xf: Affine) -> CpuAffine {
    CpuAffine::new(xf.as_coeffs())
}

fn rect_to_cpu(rect: Rect) -> CpuRect {
    CpuRect::new(rect.x0, rect.y0, rect.x1, rect.y1)
}

fn path_to_cpu(path: &BezPath) -> CpuBezPath {
    let mut out = CpuBezPath::new();
    for el in path.iter() {
        match el {
            PathEl::MoveTo(p) => out.move_to((p.x, p.y)),
            PathEl::LineTo(p) => out.line_to((p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to((p1.x, p1.y), (p2.x, p2.y)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to((p1.x, p1.y), (p2.x, p2.y), (p3.x, p3.y));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn stroke_to_cpu(style: &StrokeStyle) -> CpuStroke {
    let mut stroke = CpuStroke::new(style.width)
        .with_dashes(style.dash_offset, style.dash_pattern.iter().copied());
    stroke.miter_limit = style.miter_limit;
    stroke.join = match style.join {
        Join::Bevel => CpuJoin::Bevel,
        Join::Miter => CpuJoin::Miter,
        Join::Round => CpuJoin::Round,
    };
    stroke.start_cap = match style.start_cap {
        Cap::Butt => CpuCap::Butt,
        Cap::Round => CpuCap::Round,
        Cap::Square => CpuCap::Square,
    };
    stroke.end_cap = match style.end_cap {
        Cap::Butt => CpuCap::Butt,
        Cap::Round => CpuCap::Round,
        Cap::Square => CpuCap::Square,
    };
    stroke
}

/// Translates a filter that `vello_cpu` supports natively.
///
/// `vello_cpu` scales filter parameters by the layer transform itself, so
/// user-space values pass straight through.
fn filter_to_vello(filter: &FilterDesc) -> Option<Filter> {
    let primitive = match *filter {
        FilterDesc::Blur { sigma } => FilterPrimitive::GaussianBlur {
            std_deviation: sigma,
            edge_mode: EdgeMode::None,
        },
        FilterDesc::DropShadow {
            dx,
            dy,
            sigma,
            color,
        } => FilterPrimitive::DropShadow {
            dx,
            dy,
            std_deviation: sigma,
            color,
            edge_mode: EdgeMode::None,
        },
        // Applied by `Painter::push_layer` as a content shift.
        FilterDesc::Offset { .. } => return None,
    };
    Some(Filter::from_primitive(primitive))
}
