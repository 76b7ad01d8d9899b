// src/rasterizer/offline.rs

//! Rasterizer for cache-only runs.

use super::{Rasterizer, Surface};
use crate::error::{KerningError, Result};
use crate::font::FontDescriptor;
use crate::geometry::PixelImage;

/// Refuses to hand out surfaces.
///
/// Used when kerning runs purely from a warm cache: any cache miss surfaces
/// as [`KerningError::SurfaceUnavailable`] instead of a silent guess.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineRasterizer;

/// Uninhabited; an [`OfflineRasterizer`] never creates one.
#[derive(Debug)]
pub enum OfflineSurface {}

impl Rasterizer for OfflineRasterizer {
    type Surface = OfflineSurface;

    fn create_surface(&self, width: usize, height: usize) -> Result<Self::Surface> {
        Err(KerningError::SurfaceUnavailable {
            width,
            height,
            reason: "no rasterizer backend attached (offline mode)".to_string(),
        })
    }
}

impl Surface for OfflineSurface {
    fn width(&self) -> usize {
        match *self {}
    }

    fn height(&self) -> usize {
        match *self {}
    }

    fn set_font(&mut self, _font: &FontDescriptor, _size_px: u32) {
        match *self {}
    }

    fn measure_text(&mut self, _text: &str) -> f64 {
        match *self {}
    }

    fn fill_text(&mut self, _text: &str, _x: f64, _baseline: f64) {
        match *self {}
    }

    fn clear(&mut self) {
        match *self {}
    }

    fn read_pixels(&mut self) -> Result<PixelImage> {
        match *self {}
    }
}
