// src/rasterizer/headless.rs

//! Headless rasterizer: surfaces that never receive ink.

use super::{Rasterizer, Surface};
use crate::error::Result;
use crate::font::FontDescriptor;
use crate::geometry::PixelImage;
use log::trace;

/// Produces blank surfaces. Every grapheme measures as inkless with a zero
/// advance, so every pair comes out as normal spacing. Useful for dry runs
/// of the document rewriter.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessRasterizer;

impl HeadlessRasterizer {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Debug)]
pub struct HeadlessSurface {
    width: usize,
    height: usize,
}

impl Rasterizer for HeadlessRasterizer {
    type Surface = HeadlessSurface;

    fn create_surface(&self, width: usize, height: usize) -> Result<Self::Surface> {
        trace!("HeadlessRasterizer: creating {}x{} surface", width, height);
        Ok(HeadlessSurface { width, height })
    }
}

impl Surface for HeadlessSurface {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn set_font(&mut self, _font: &FontDescriptor, _size_px: u32) {}

    fn measure_text(&mut self, _text: &str) -> f64 {
        0.0
    }

    fn fill_text(&mut self, _text: &str, _x: f64, _baseline: f64) {}

    fn clear(&mut self) {}

    fn read_pixels(&mut self) -> Result<PixelImage> {
        Ok(PixelImage::blank(self.width, self.height))
    }
}
