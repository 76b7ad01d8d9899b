// src/rasterizer/mod.rs

//! Rasterizer port: the only way the engine gets pixels.
//!
//! The engine never decides how glyphs are drawn. A [`Rasterizer`] is a
//! factory for drawing [`Surface`]s, and a surface behaves like a 2D canvas:
//! pick a font, measure a string, fill it at a pen position, read the pixels
//! back. Any backend (native font stack, software rasterizer, a test double
//! painting rectangles) can sit behind these traits.

pub mod headless;
pub mod offline;

pub use headless::HeadlessRasterizer;
pub use offline::OfflineRasterizer;

use crate::error::Result;
use crate::font::FontDescriptor;
use crate::geometry::PixelImage;

/// Factory for drawing surfaces.
pub trait Rasterizer {
    type Surface: Surface;

    /// Creates a transparent surface of the given size in pixels.
    ///
    /// Failing here is fatal for the caller: nothing can be measured without
    /// a surface, so implementations should return
    /// [`KerningError::SurfaceUnavailable`](crate::error::KerningError::SurfaceUnavailable)
    /// rather than a fallback.
    fn create_surface(&self, width: usize, height: usize) -> Result<Self::Surface>;
}

/// A canvas-like drawing target.
pub trait Surface {
    fn width(&self) -> usize;

    fn height(&self) -> usize;

    /// Font used by subsequent `measure_text` and `fill_text` calls.
    fn set_font(&mut self, font: &FontDescriptor, size_px: u32);

    /// Advance width of `text` in pixels with the current font.
    fn measure_text(&mut self, text: &str) -> f64;

    /// Draws `text` with its pen origin at `x` and its alphabetic baseline at
    /// `baseline`.
    fn fill_text(&mut self, text: &str, x: f64, baseline: f64);

    /// Resets every pixel to transparent.
    fn clear(&mut self);

    /// Blocking read-back of the whole surface.
    fn read_pixels(&mut self) -> Result<PixelImage>;
}
