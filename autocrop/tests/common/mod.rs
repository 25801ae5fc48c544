// Copyright 2025 the Autocrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A synthetic renderer for integration tests.

#![allow(
    missing_docs,
    reason = "Integration-test helper module; not part of the public API."
)]

use std::sync::atomic::{AtomicUsize, Ordering};

use autocrop::raster::{Color, RasterSample};
use autocrop::{RenderError, Renderer};
use kurbo::{Affine, Circle, Point, Rect, Size};

pub(crate) const INK: Color = Color::from_premul_rgba8(0, 0, 0, 255);

#[derive(Copy, Clone, Debug)]
pub(crate) enum Shape {
    Rect(Rect),
    Circle(Circle),
}

/// Paints shapes into every pixel they touch, like the partial coverage an
/// anti-aliasing rasterizer leaves at shape boundaries.
///
/// Only axis-aligned scale + translate transforms are supported, which is all
/// the engine ever asks for.
#[derive(Debug)]
pub(crate) struct Shapes {
    size: Size,
    shapes: Vec<(Shape, Color)>,
    renders: AtomicUsize,
}

impl Shapes {
    pub(crate) fn new(width: f64, height: f64) -> Self {
        Self {
            size: Size::new(width, height),
            shapes: Vec::new(),
            renders: AtomicUsize::new(0),
        }
    }

    pub(crate) fn rect(mut self, x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        self.shapes
            .push((Shape::Rect(Rect::new(x0, y0, x1, y1)), INK));
        self
    }

    pub(crate) fn tinted_rect(mut self, rect: Rect, color: Color) -> Self {
        self.shapes.push((Shape::Rect(rect), color));
        self
    }

    pub(crate) fn circle(mut self, cx: f64, cy: f64, r: f64) -> Self {
        self.shapes
            .push((Shape::Circle(Circle::new((cx, cy), r)), INK));
        self
    }

    pub(crate) fn renders(&self) -> usize {
        self.renders.load(Ordering::Relaxed)
    }

    /// Whether `shape` touches the document-space rectangle `cell`.
    fn touches(shape: Shape, cell: Rect) -> bool {
        match shape {
            Shape::Rect(r) => r.x0 < cell.x1 && r.x1 > cell.x0 && r.y0 < cell.y1 && r.y1 > cell.y0,
            Shape::Circle(c) => {
                let nearest = Point::new(
                    c.center.x.clamp(cell.x0, cell.x1),
                    c.center.y.clamp(cell.y0, cell.y1),
                );
                (nearest - c.center).hypot() < c.radius
            }
        }
    }
}

impl Renderer for Shapes {
    fn document_extent(&self) -> Size {
        self.size
    }

    fn render_region(
        &self,
        transform: Affine,
        width: u16,
        height: u16,
    ) -> Result<RasterSample, RenderError> {
        self.renders.fetch_add(1, Ordering::Relaxed);
        let inverse = transform.inverse();
        let mut raster = RasterSample::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let device = Rect::new(
                    f64::from(x),
                    f64::from(y),
                    f64::from(x) + 1.0,
                    f64::from(y) + 1.0,
                );
                let cell = inverse.transform_rect_bbox(device);
                // Later shapes paint over earlier ones.
                if let Some(&(_, color)) = self
                    .shapes
                    .iter()
                    .rev()
                    .find(|(shape, _)| Self::touches(*shape, cell))
                {
                    raster.set_pixel(x, y, color);
                }
            }
        }
        Ok(raster)
    }
}

pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
