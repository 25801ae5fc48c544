// Copyright 2025 the Autocrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The renderer seam and the region/raster bookkeeping around it.

use alloc::boxed::Box;
use alloc::format;

use autocrop_raster::RasterSample;
use kurbo::{Affine, Point, Rect, Size};

use crate::error::{AutocropError, RenderError};
use crate::region::DocumentRegion;

/// Something that can rasterize a document under an arbitrary view transform.
///
/// This is the only capability the engine consumes. Implementations own the
/// document; the engine never sees its contents.
///
/// The parallel entry points of [`AutocropEngine`](crate::AutocropEngine)
/// additionally require `Sync` and call `render_region` concurrently.
pub trait Renderer {
    /// Nominal, untransformed document size. Seeds the initial region.
    fn document_extent(&self) -> Size;

    /// Rasterizes the document with `transform` mapping document space to
    /// device space, into a fresh `width × height` raster of premultiplied
    /// ARGB32 pixels (transparent is `0x0000_0000`).
    fn render_region(
        &self,
        transform: Affine,
        width: u16,
        height: u16,
    ) -> Result<RasterSample, RenderError>;

    /// Maps a device point back into document space under `transform`.
    ///
    /// The default applies the inverse affine.
    fn device_to_user(&self, transform: Affine, point: Point) -> Point {
        transform.inverse() * point
    }
}

impl<R: Renderer + ?Sized> Renderer for &R {
    fn document_extent(&self) -> Size {
        (**self).document_extent()
    }

    fn render_region(
        &self,
        transform: Affine,
        width: u16,
        height: u16,
    ) -> Result<RasterSample, RenderError> {
        (**self).render_region(transform, width, height)
    }

    fn device_to_user(&self, transform: Affine, point: Point) -> Point {
        (**self).device_to_user(transform, point)
    }
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn document_extent(&self) -> Size {
        (**self).document_extent()
    }

    fn render_region(
        &self,
        transform: Affine,
        width: u16,
        height: u16,
    ) -> Result<RasterSample, RenderError> {
        (**self).render_region(transform, width, height)
    }

    fn device_to_user(&self, transform: Affine, point: Point) -> Point {
        (**self).device_to_user(transform, point)
    }
}

/// The scale + translate that maps a document region exactly onto a raster.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewTransform {
    user_to_device: Affine,
    device_to_user: Affine,
}

impl ViewTransform {
    /// Builds the transform mapping `region` onto `[0, width] × [0, height]`.
    ///
    /// `region` must have a non-zero width and height.
    pub fn for_region(region: DocumentRegion, width: u16, height: u16) -> Self {
        let sx = f64::from(width) / region.width();
        let sy = f64::from(height) / region.height();
        // Translate first, then scale.
        let user_to_device =
            Affine::scale_non_uniform(sx, sy) * Affine::translate((-region.left, -region.top));
        Self {
            user_to_device,
            device_to_user: user_to_device.inverse(),
        }
    }

    /// Document → device.
    #[inline]
    pub fn affine(&self) -> Affine {
        self.user_to_device
    }

    /// Converts a document-space point into device pixels.
    #[inline]
    pub fn user_to_device_point(&self, pt: Point) -> Point {
        self.user_to_device * pt
    }

    /// Converts a device-space point into document space.
    #[inline]
    pub fn device_to_user_point(&self, pt: Point) -> Point {
        self.device_to_user * pt
    }
}

/// A rendered region: the raster plus the transform it was rendered under.
///
/// Owns its raster; dropping it releases the buffer.
#[derive(Clone, Debug)]
pub struct RenderedRegion {
    /// The document region that was rendered.
    pub region: DocumentRegion,
    /// The transform the region was rendered under.
    pub transform: ViewTransform,
    /// The rendered pixels.
    pub raster: RasterSample,
}

/// Renders document regions into fixed-size rasters through a [`Renderer`].
#[derive(Debug)]
pub struct RegionRenderer<'r, R: ?Sized> {
    renderer: &'r R,
    width: u16,
    height: u16,
}

impl<'r, R: Renderer + ?Sized> RegionRenderer<'r, R> {
    /// Creates a region renderer producing `width × height` rasters.
    pub fn new(renderer: &'r R, width: u16, height: u16) -> Self {
        Self {
            renderer,
            width,
            height,
        }
    }

    /// The wrapped renderer.
    pub fn renderer(&self) -> &'r R {
        self.renderer
    }

    /// Raster size as `(width, height)`.
    pub fn raster_size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Renders `region` so that it exactly fills the raster.
    ///
    /// Fails if the renderer fails, returns a raster of the wrong size, or
    /// returns pixels equal to the reserved
    /// [`INVALID_COLOR`](autocrop_raster::INVALID_COLOR).
    pub fn render(&self, region: DocumentRegion) -> Result<RenderedRegion, AutocropError> {
        let transform = ViewTransform::for_region(region, self.width, self.height);
        let raster = self
            .renderer
            .render_region(transform.affine(), self.width, self.height)?;

        if raster.width() != self.width || raster.height() != self.height {
            return Err(RenderError::new(format!(
                "renderer returned a {}x{} raster, {}x{} requested",
                raster.width(),
                raster.height(),
                self.width,
                self.height
            ))
            .into());
        }
        if raster.contains_invalid() {
            return Err(
                RenderError::new("renderer produced the reserved INVALID_COLOR value").into(),
            );
        }

        log::trace!(
            "rendered region t={} b={} l={} r={} at {}x{}",
            region.top,
            region.bottom,
            region.left,
            region.right,
            self.width,
            self.height
        );
        Ok(RenderedRegion {
            region,
            transform,
            raster,
        })
    }

    /// Maps a device rectangle of `rendered` back into document space, one
    /// corner at a time, through the renderer's inverse mapping.
    pub fn device_to_user(&self, rendered: &RenderedRegion, device: Rect) -> DocumentRegion {
        let affine = rendered.transform.affine();
        let min = self
            .renderer
            .device_to_user(affine, Point::new(device.x0, device.y0));
        let max = self
            .renderer
            .device_to_user(affine, Point::new(device.x1, device.y1));
        DocumentRegion::new(min.y, max.y, min.x, max.x)
    }
}
