// Copyright 2025 the Autocrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-edge refinement loop and the four-edge orchestration around it.

use autocrop_raster::{Color, EdgeQuery, find_edge_for, leading_strip_color};

use crate::config::AutocropConfig;
use crate::edge::Edge;
use crate::error::{AutocropError, RenderError};
use crate::region::{BoundingBox, DocumentRegion};
use crate::render::{RegionRenderer, Renderer};

/// Why an edge search stopped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Terminal {
    /// The region became thinner than the convergence tolerance.
    Converged,
    /// The region rendered fully transparent.
    ///
    /// On the first render this means the searched region holds no content,
    /// and the bound stays where the search started. Deeper down it means
    /// the strip chosen at the previous step shows nothing at the finer
    /// resolution, as with the faint tail of a blur or an edge that only
    /// grazed the parent pixel. The bound then stays on the outer side of
    /// that strip, so it can lie up to one pixel of the previous raster
    /// outside the visible content, and never inside it.
    Empty,
}

/// The result of refining one edge.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EdgeOutcome {
    /// The edge that was refined.
    pub edge: Edge,
    /// The final region of the search. Only the bound owned by `edge` is
    /// meaningful to the caller.
    pub region: DocumentRegion,
    /// Why the search stopped.
    pub terminal: Terminal,
    /// Number of renders performed.
    pub depth: u32,
}

impl EdgeOutcome {
    /// The refined document-space coordinate of this edge.
    #[inline]
    pub fn bound(&self) -> f64 {
        self.edge.bound(self.region)
    }
}

/// Everything an autocrop call found, for diagnostics.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AutocropReport {
    /// The rounded result.
    pub bounding_box: BoundingBox,
    /// The unrounded assembled region.
    pub region: DocumentRegion,
    /// Per-edge outcomes in [`Edge::ALL`] order.
    pub edges: [EdgeOutcome; 4],
}

impl AutocropReport {
    fn assemble(edges: [EdgeOutcome; 4]) -> Self {
        let [top, bottom, left, right] = edges;
        let region = DocumentRegion::new(top.bound(), bottom.bound(), left.bound(), right.bound());
        Self {
            bounding_box: BoundingBox::from_region(region),
            region,
            edges,
        }
    }

    /// The outcome for one edge.
    pub fn edge(&self, edge: Edge) -> &EdgeOutcome {
        let idx = match edge {
            Edge::Top => 0,
            Edge::Bottom => 1,
            Edge::Left => 2,
            Edge::Right => 3,
        };
        &self.edges[idx]
    }
}

/// Finds the painted area of a document by repeatedly rendering ever thinner
/// strips around each of its four edges.
///
/// ```rust
/// use autocrop::{AutocropConfig, AutocropEngine, RenderError, Renderer};
/// use autocrop::raster::{Color, RasterSample};
/// use kurbo::{Affine, Point, Rect, Size};
///
/// /// A 200x200 document holding one opaque rectangle.
/// struct OneRect(Rect);
///
/// impl Renderer for OneRect {
///     fn document_extent(&self) -> Size {
///         Size::new(200.0, 200.0)
///     }
///
///     fn render_region(
///         &self,
///         transform: Affine,
///         width: u16,
///         height: u16,
///     ) -> Result<RasterSample, RenderError> {
///         let mut raster = RasterSample::new(width, height);
///         let device = transform.transform_rect_bbox(self.0);
///         for y in 0..height {
///             for x in 0..width {
///                 let (cx, cy) = (f64::from(x) + 0.5, f64::from(y) + 0.5);
///                 if device.contains(Point::new(cx, cy)) {
///                     raster.set_pixel(x, y, Color::from_premul_rgba8(0, 0, 0, 255));
///                 }
///             }
///         }
///         Ok(raster)
///     }
/// }
///
/// let engine = AutocropEngine::new(AutocropConfig::default()).unwrap();
/// let bbox = engine.autocrop(&OneRect(Rect::new(60.0, 80.0, 110.0, 110.0))).unwrap();
/// assert_eq!((bbox.x, bbox.y, bbox.width, bbox.height), (60.0, 80.0, 50.0, 30.0));
/// ```
#[derive(Clone, Debug, Default)]
pub struct AutocropEngine {
    config: AutocropConfig,
}

impl AutocropEngine {
    /// Creates an engine after validating `config`.
    pub fn new(config: AutocropConfig) -> Result<Self, AutocropError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The engine's configuration.
    pub fn config(&self) -> &AutocropConfig {
        &self.config
    }

    /// The full-document region `[0, width] × [0, height]` of `renderer`.
    ///
    /// Fails with [`AutocropError::DegenerateDocument`] if either dimension
    /// is zero, negative, or not finite.
    pub fn document_region<R: Renderer + ?Sized>(
        &self,
        renderer: &R,
    ) -> Result<DocumentRegion, AutocropError> {
        let size = renderer.document_extent();
        let ok = |v: f64| v.is_finite() && v > 0.0;
        if !(ok(size.width) && ok(size.height)) {
            return Err(AutocropError::DegenerateDocument {
                width: size.width,
                height: size.height,
            });
        }
        Ok(DocumentRegion::from_size(size))
    }

    /// Computes the painted area of the whole document.
    pub fn autocrop<R: Renderer + ?Sized>(&self, renderer: &R) -> Result<BoundingBox, AutocropError> {
        Ok(self.report(renderer)?.bounding_box)
    }

    /// Like [`AutocropEngine::autocrop`], with per-edge details.
    pub fn report<R: Renderer + ?Sized>(&self, renderer: &R) -> Result<AutocropReport, AutocropError> {
        let region = self.document_region(renderer)?;
        self.report_region(renderer, region)
    }

    /// Computes the painted area inside `region`.
    pub fn autocrop_region<R: Renderer + ?Sized>(
        &self,
        renderer: &R,
        region: DocumentRegion,
    ) -> Result<BoundingBox, AutocropError> {
        Ok(self.report_region(renderer, region)?.bounding_box)
    }

    /// Like [`AutocropEngine::autocrop_region`], with per-edge details.
    ///
    /// The edges are searched one after another; the first failure aborts
    /// the call.
    pub fn report_region<R: Renderer + ?Sized>(
        &self,
        renderer: &R,
        region: DocumentRegion,
    ) -> Result<AutocropReport, AutocropError> {
        Self::check_region(region)?;
        log::debug!("autocrop start: {:?}", region.to_rect());
        let top = self.refine_edge(renderer, region, Edge::Top)?;
        let bottom = self.refine_edge(renderer, region, Edge::Bottom)?;
        let left = self.refine_edge(renderer, region, Edge::Left)?;
        let right = self.refine_edge(renderer, region, Edge::Right)?;
        let report = AutocropReport::assemble([top, bottom, left, right]);
        log::debug!("autocrop done: {}", report.bounding_box);
        Ok(report)
    }

    /// Computes the painted area of the whole document, searching the four
    /// edges on the rayon thread pool.
    ///
    /// Produces the same result as [`AutocropEngine::autocrop`].
    #[cfg(feature = "rayon")]
    pub fn autocrop_parallel<R: Renderer + Sync + ?Sized>(
        &self,
        renderer: &R,
    ) -> Result<BoundingBox, AutocropError> {
        let region = self.document_region(renderer)?;
        Ok(self.report_region_parallel(renderer, region)?.bounding_box)
    }

    /// Parallel counterpart of [`AutocropEngine::report_region`].
    ///
    /// All four searches run to completion before any error is reported.
    #[cfg(feature = "rayon")]
    pub fn report_region_parallel<R: Renderer + Sync + ?Sized>(
        &self,
        renderer: &R,
        region: DocumentRegion,
    ) -> Result<AutocropReport, AutocropError> {
        Self::check_region(region)?;
        log::debug!("parallel autocrop start: {:?}", region.to_rect());
        let ((top, bottom), (left, right)) = rayon::join(
            || {
                rayon::join(
                    || self.refine_edge(renderer, region, Edge::Top),
                    || self.refine_edge(renderer, region, Edge::Bottom),
                )
            },
            || {
                rayon::join(
                    || self.refine_edge(renderer, region, Edge::Left),
                    || self.refine_edge(renderer, region, Edge::Right),
                )
            },
        );
        let report = AutocropReport::assemble([top?, bottom?, left?, right?]);
        log::debug!("parallel autocrop done: {}", report.bounding_box);
        Ok(report)
    }

    /// Refines one edge along a raw direction vector.
    ///
    /// `(dx, dy)` must be one of `(0, 1)` (top), `(0, -1)` (bottom), `(1, 0)`
    /// (left) or `(-1, 0)` (right).
    pub fn refine_direction<R: Renderer + ?Sized>(
        &self,
        renderer: &R,
        region: DocumentRegion,
        dx: i32,
        dy: i32,
    ) -> Result<EdgeOutcome, AutocropError> {
        let query = EdgeQuery::new(dx, dy)?;
        self.refine_edge(renderer, region, Edge::from_query(query))
    }

    /// Refines the bound of `region` owned by `edge`.
    ///
    /// Each step renders the current region and narrows it to the one-pixel
    /// row or column where content starts: the leading strip if it holds any
    /// paint, otherwise the first strip past the transparent margin. Every
    /// step shrinks the refined span by the raster resolution along that
    /// axis, until the region is thinner than the tolerance or renders fully
    /// transparent.
    pub fn refine_edge<R: Renderer + ?Sized>(
        &self,
        renderer: &R,
        region: DocumentRegion,
        edge: Edge,
    ) -> Result<EdgeOutcome, AutocropError> {
        Self::check_region(region)?;
        let AutocropConfig {
            raster_width,
            raster_height,
            epsilon,
            max_depth,
        } = self.config;
        let regions = RegionRenderer::new(renderer, raster_width, raster_height);
        let query = edge.query();

        let mut current = region;
        let mut depth = 0;
        let terminal = loop {
            if current.is_converged(epsilon) {
                break Terminal::Converged;
            }
            if depth == max_depth {
                log::warn!("{edge} edge hit the refinement ceiling of {max_depth} steps");
                return Err(AutocropError::DepthLimit {
                    edge,
                    depth: max_depth,
                });
            }
            depth += 1;

            let rendered = regions.render(current)?;
            let raster = &rendered.raster;
            if raster.uniform_color().is_some_and(Color::is_transparent) {
                break Terminal::Empty;
            }

            // Paint in the leading strip means content reaches the region's
            // side, even if the whole raster is one color.
            let k = if leading_strip_color(raster, query)?.is_transparent() {
                find_edge_for(raster, query)?
            } else {
                edge.leading_pixel(raster_width, raster_height)
            };
            let strip = edge.device_strip(k, raster_width, raster_height);
            let next = regions.device_to_user(&rendered, strip);
            if !next.is_valid() {
                return Err(RenderError::new("device_to_user produced an inverted region").into());
            }
            log::trace!("{edge} step {depth}: pixel {k} -> {:?}", next.to_rect());
            current = next;
        };

        log::debug!(
            "{edge} edge: {terminal:?} after {depth} renders at {}",
            edge.bound(current)
        );
        Ok(EdgeOutcome {
            edge,
            region: current,
            terminal,
            depth,
        })
    }

    fn check_region(region: DocumentRegion) -> Result<(), AutocropError> {
        if region.is_valid() {
            Ok(())
        } else {
            Err(AutocropError::InvalidRegion)
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use autocrop_raster::{Color, RasterSample};
    use kurbo::{Affine, Rect, Size};

    use super::*;

    const INK: Color = Color::from_premul_rgba8(0, 0, 0, 255);

    /// Paints axis-aligned rectangles into every pixel they overlap, the way
    /// an anti-aliasing rasterizer leaves partial coverage behind, and
    /// remembers every transform it was asked to use.
    struct Rects {
        size: Size,
        rects: Vec<(Rect, Color)>,
        log: RefCell<Vec<Affine>>,
    }

    impl Rects {
        fn new(width: f64, height: f64, rects: &[(Rect, Color)]) -> Self {
            Self {
                size: Size::new(width, height),
                rects: rects.to_vec(),
                log: RefCell::new(Vec::new()),
            }
        }
    }

    impl Renderer for Rects {
        fn document_extent(&self) -> Size {
            self.size
        }

        fn render_region(
            &self,
            transform: Affine,
            width: u16,
            height: u16,
        ) -> Result<RasterSample, RenderError> {
            self.log.borrow_mut().push(transform);
            let mut raster = RasterSample::new(width, height);
            for &(rect, color) in &self.rects {
                let device = transform.transform_rect_bbox(rect);
                for y in 0..height {
                    for x in 0..width {
                        let (px, py) = (f64::from(x), f64::from(y));
                        let covered = device.x0 < px + 1.0
                            && device.x1 > px
                            && device.y0 < py + 1.0
                            && device.y1 > py;
                        if covered {
                            raster.set_pixel(x, y, color);
                        }
                    }
                }
            }
            Ok(raster)
        }
    }

    /// Always fails.
    struct Broken;

    impl Renderer for Broken {
        fn document_extent(&self) -> Size {
            Size::new(10.0, 10.0)
        }

        fn render_region(
            &self,
            _transform: Affine,
            _width: u16,
            _height: u16,
        ) -> Result<RasterSample, RenderError> {
            Err(RenderError::new("out of memory"))
        }
    }

    /// Renders a different checkerboard every time, so nothing ever
    /// converges or turns uniform.
    struct Noise;

    impl Renderer for Noise {
        fn document_extent(&self) -> Size {
            Size::new(1e9, 1e9)
        }

        fn render_region(
            &self,
            _transform: Affine,
            width: u16,
            height: u16,
        ) -> Result<RasterSample, RenderError> {
            let mut raster = RasterSample::new(width, height);
            for y in 0..height {
                for x in 0..width {
                    if (x + y) % 2 == 0 {
                        raster.set_pixel(x, y, INK);
                    }
                }
            }
            Ok(raster)
        }
    }

    fn engine() -> AutocropEngine {
        AutocropEngine::new(AutocropConfig::default()).unwrap()
    }

    fn assert_bbox(bbox: BoundingBox, expected: (f64, f64, f64, f64)) {
        let got = (bbox.x, bbox.y, bbox.width, bbox.height);
        assert_eq!(got, expected, "bounding box {bbox}");
    }

    #[test]
    fn finds_a_single_rectangle() {
        let doc = Rects::new(200.0, 200.0, &[(Rect::new(60.0, 80.0, 110.0, 110.0), INK)]);
        assert_bbox(engine().autocrop(&doc).unwrap(), (60.0, 80.0, 50.0, 30.0));
    }

    #[test]
    fn finds_the_union_of_rectangles() {
        let doc = Rects::new(
            640.0,
            480.0,
            &[
                (Rect::new(12.25, 300.0, 40.0, 310.0), INK),
                (Rect::new(100.0, 33.5, 101.0, 34.0), INK),
                (Rect::new(500.0, 200.0, 611.125, 401.75), INK),
            ],
        );
        assert_bbox(
            engine().autocrop(&doc).unwrap(),
            (12.25, 33.5, 598.875, 368.25),
        );
    }

    #[test]
    fn full_canvas_converges_onto_its_own_sides() {
        let doc = Rects::new(30.0, 20.0, &[(Rect::new(-5.0, -5.0, 35.0, 25.0), INK)]);
        let report = engine().report(&doc).unwrap();
        assert_bbox(report.bounding_box, (0.0, 0.0, 30.0, 20.0));
        for outcome in report.edges {
            // 20 -> 0.2 -> 0.002 -> 2e-5 (and 30 -> 3e-5) at 100 pixels a step.
            assert_eq!(outcome.terminal, Terminal::Converged);
            assert_eq!(outcome.depth, 3);
        }
    }

    #[test]
    fn uniform_coarse_rasters_keep_refining() {
        // On a 2x2 raster every pixel sees a corner of the square.
        let doc = Rects::new(200.0, 200.0, &[(Rect::new(50.0, 50.0, 150.0, 150.0), INK)]);
        let engine =
            AutocropEngine::new(AutocropConfig::default().with_raster_size(2, 2)).unwrap();
        let report = engine.report(&doc).unwrap();
        assert_bbox(report.bounding_box, (50.0, 50.0, 100.0, 100.0));
        assert!(report.edges.iter().all(|e| e.depth > 1));
    }

    #[test]
    fn content_along_the_scanned_side_is_kept() {
        let doc = Rects::new(200.0, 200.0, &[(Rect::new(0.0, 0.0, 200.0, 50.0), INK)]);
        let report = engine().report(&doc).unwrap();
        assert_bbox(report.bounding_box, (0.0, 0.0, 200.0, 50.0));
        assert_eq!(report.edge(Edge::Top).terminal, Terminal::Converged);
    }

    #[test]
    fn empty_canvas_keeps_the_document_extent() {
        let doc = Rects::new(120.0, 45.0, &[]);
        let report = engine().report(&doc).unwrap();
        assert_bbox(report.bounding_box, (0.0, 0.0, 120.0, 45.0));
        for outcome in report.edges {
            assert_eq!(outcome.terminal, Terminal::Empty);
            assert_eq!(outcome.depth, 1);
        }
    }

    #[test]
    fn content_outside_the_canvas_is_ignored() {
        let doc = Rects::new(
            100.0,
            100.0,
            &[
                (Rect::new(150.0, 150.0, 160.0, 160.0), INK),
                (Rect::new(20.0, 30.0, 40.0, 50.0), INK),
            ],
        );
        assert_bbox(engine().autocrop(&doc).unwrap(), (20.0, 30.0, 20.0, 20.0));
    }

    #[test]
    fn runs_are_idempotent() {
        let doc = Rects::new(200.0, 100.0, &[(Rect::new(3.3, 4.4, 150.15, 99.0), INK)]);
        let engine = engine();
        assert_eq!(engine.autocrop(&doc).unwrap(), engine.autocrop(&doc).unwrap());
    }

    #[test]
    fn refinement_shrinks_monotonically() {
        let doc = Rects::new(200.0, 200.0, &[(Rect::new(60.0, 80.0, 110.0, 110.0), INK)]);
        let region = DocumentRegion::from_size(doc.size);
        for edge in Edge::ALL {
            doc.log.borrow_mut().clear();
            let outcome = engine().refine_edge(&doc, region, edge).unwrap();
            assert_eq!(outcome.terminal, Terminal::Converged);

            let spans: Vec<f64> = doc
                .log
                .borrow()
                .iter()
                .map(|xf| {
                    let visible = DocumentRegion::from(xf.inverse().transform_rect_bbox(
                        Rect::new(0.0, 0.0, 100.0, 100.0),
                    ));
                    edge.span(visible)
                })
                .collect();
            assert_eq!(spans.len(), outcome.depth as usize);
            assert!(spans.len() >= 2, "{edge}: {spans:?}");
            for pair in spans.windows(2) {
                assert!(pair[1] < pair[0], "{edge}: {spans:?}");
            }
        }
    }

    #[test]
    fn converged_regions_are_not_rendered() {
        let doc = Rects::new(10.0, 10.0, &[(Rect::new(0.0, 0.0, 10.0, 10.0), INK)]);
        let thin = DocumentRegion::new(5.0, 5.000_01, 0.0, 10.0);
        let outcome = engine().refine_edge(&doc, thin, Edge::Top).unwrap();
        assert_eq!(outcome.terminal, Terminal::Converged);
        assert_eq!(outcome.depth, 0);
        assert_eq!(outcome.region, thin);
        assert!(doc.log.borrow().is_empty());
    }

    #[test]
    fn render_failures_abort_with_the_renderer_message() {
        let err = engine().autocrop(&Broken).unwrap_err();
        assert_eq!(err, AutocropError::Render(RenderError::new("out of memory")));
        assert_eq!(
            alloc::string::ToString::to_string(&err),
            "render failed: out of memory"
        );
    }

    #[test]
    fn degenerate_documents_fail_fast() {
        for (w, h) in [(0.0, 10.0), (10.0, -1.0), (f64::NAN, 1.0), (f64::INFINITY, 1.0)] {
            let doc = Rects::new(w, h, &[]);
            let err = engine().autocrop(&doc).unwrap_err();
            assert!(
                matches!(err, AutocropError::DegenerateDocument { .. }),
                "{w}x{h}: {err:?}"
            );
            assert!(doc.log.borrow().is_empty());
        }
    }

    #[test]
    fn invalid_regions_are_rejected() {
        let doc = Rects::new(10.0, 10.0, &[]);
        let inverted = DocumentRegion::new(5.0, 1.0, 0.0, 10.0);
        assert_eq!(
            engine().autocrop_region(&doc, inverted),
            Err(AutocropError::InvalidRegion)
        );
    }

    #[test]
    fn raw_directions_are_validated() {
        let doc = Rects::new(200.0, 200.0, &[(Rect::new(60.0, 80.0, 110.0, 110.0), INK)]);
        let region = DocumentRegion::from_size(doc.size);
        let engine = engine();
        assert_eq!(
            engine.refine_direction(&doc, region, 0, 0),
            Err(AutocropError::InvalidDirection { dx: 0, dy: 0 })
        );
        let right = engine.refine_direction(&doc, region, -1, 0).unwrap();
        assert_eq!(right.edge, Edge::Right);
        assert!((right.bound() - 110.0).abs() < 1e-3);
    }

    #[test]
    fn pathological_renderers_hit_the_depth_ceiling() {
        let engine = AutocropEngine::new(AutocropConfig::default().with_max_depth(5)).unwrap();
        assert_eq!(
            engine.autocrop(&Noise),
            Err(AutocropError::DepthLimit {
                edge: Edge::Top,
                depth: 5
            })
        );
    }

    #[test]
    fn raster_size_does_not_change_the_answer() {
        let doc = Rects::new(200.0, 200.0, &[(Rect::new(60.0, 80.0, 110.0, 110.0), INK)]);
        for (w, h) in [(2, 2), (7, 13), (64, 64), (250, 40)] {
            let engine = AutocropEngine::new(AutocropConfig::default().with_raster_size(w, h))
                .unwrap();
            assert_bbox(engine.autocrop(&doc).unwrap(), (60.0, 80.0, 50.0, 30.0));
        }
    }
}
