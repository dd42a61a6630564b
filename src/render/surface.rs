//! Layered card surfaces and their rasterization.

use std::sync::Arc;

use crate::foundation::core::{Frame, Size};
use crate::foundation::error::{CardError, CardResult};
use crate::render::composite::{fill, over_in_place};

/// Pixel ratio used for exported stills and recorded overlays.
pub const EXPORT_PIXEL_RATIO: u32 = 2;

/// Role of a layer within a card surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// Live background video (or its poster frame while previewing).
    BackgroundVideo,
    Backdrop,
    Content,
}

#[derive(Clone, Debug)]
pub enum LayerSource {
    /// Premultiplied pixels, stretched over the surface.
    Pixels(Frame),
    /// Straight-alpha solid color.
    Fill([u8; 4]),
    /// Vector content in surface (logical) coordinates.
    Svg(Arc<usvg::Tree>),
}

#[derive(Clone, Debug)]
pub struct Layer {
    pub kind: LayerKind,
    pub source: LayerSource,
    pub opacity: f32,
}

impl Layer {
    pub fn new(kind: LayerKind, source: LayerSource) -> Self {
        Self {
            kind,
            source,
            opacity: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RasterizeOpts {
    pub pixel_ratio: u32,
    /// Layer kinds left out of the raster (they stay transparent).
    pub exclude: Vec<LayerKind>,
}

impl RasterizeOpts {
    /// 2x with the background video layer excluded: what stills and overlays use.
    pub fn export() -> Self {
        Self {
            pixel_ratio: EXPORT_PIXEL_RATIO,
            exclude: vec![LayerKind::BackgroundVideo],
        }
    }

    /// 1x, everything visible.
    pub fn preview() -> Self {
        Self {
            pixel_ratio: 1,
            exclude: Vec::new(),
        }
    }

    pub fn includes(&self, kind: LayerKind) -> bool {
        !self.exclude.contains(&kind)
    }
}

/// Anything the capture engine can turn into pixels.
pub trait CaptureSurface {
    /// Logical size in CSS-like pixels (before the pixel ratio).
    fn size(&self) -> Size;

    fn rasterize(&self, opts: &RasterizeOpts) -> CardResult<Frame>;
}

/// A stack of layers drawn bottom to top.
#[derive(Clone, Debug)]
pub struct CardSurface {
    size: Size,
    layers: Vec<Layer>,
}

impl CardSurface {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            layers: Vec::new(),
        }
    }

    pub fn push(&mut self, layer: Layer) -> &mut Self {
        self.layers.push(layer);
        self
    }

    pub fn with_layer(mut self, layer: Layer) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn has_layer(&self, kind: LayerKind) -> bool {
        self.layers.iter().any(|l| l.kind == kind)
    }
}

impl CaptureSurface for CardSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn rasterize(&self, opts: &RasterizeOpts) -> CardResult<Frame> {
        if opts.pixel_ratio == 0 {
            return Err(CardError::validation("pixel ratio must be >= 1"));
        }
        let target = self.size.scaled(opts.pixel_ratio)?;
        let mut out = Frame::transparent(target)?;

        for layer in self.layers.iter().filter(|l| opts.includes(l.kind)) {
            match &layer.source {
                LayerSource::Pixels(frame) => {
                    let scaled = frame.resized(target)?;
                    over_in_place(&mut out, &scaled, layer.opacity)?;
                }
                LayerSource::Fill(rgba) => {
                    let a = (f32::from(rgba[3]) * layer.opacity.clamp(0.0, 1.0)).round() as u8;
                    fill(&mut out, [rgba[0], rgba[1], rgba[2], a]);
                }
                LayerSource::Svg(tree) => {
                    let raster = rasterize_svg(tree, target)?;
                    over_in_place(&mut out, &raster, layer.opacity)?;
                }
            }
        }
        Ok(out)
    }
}

/// Render `tree` stretched to `target` into a premultiplied frame.
pub fn rasterize_svg(tree: &usvg::Tree, target: Size) -> CardResult<Frame> {
    target.check_raster_target()?;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(target.width, target.height)
        .ok_or_else(|| CardError::raster("failed to allocate svg pixmap"))?;

    let sx = (target.width as f32) / tree.size().width();
    let sy = (target.height as f32) / tree.size().height();
    resvg::render(
        tree,
        resvg::tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );
    Frame::from_premul(target.width, target.height, pixmap.take())
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
