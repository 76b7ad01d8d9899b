// tests/support/mod.rs

//! Synthetic rasterizer painting each known grapheme as a solid rectangle.

#![allow(dead_code)]

use std::cell::Cell;
use std::collections::HashMap;

use optical_kerning::{FontDescriptor, PixelImage, Rasterizer, Result, Surface};

/// Ink box of a grapheme in pixels, relative to the pen position and the
/// baseline. `top` is negative above the baseline. Ranges are half-open.
#[derive(Debug, Clone, Copy)]
pub struct RectGlyph {
    pub advance: f64,
    pub x0: i64,
    pub x1: i64,
    pub top: i64,
    pub bottom: i64,
}

impl RectGlyph {
    pub fn new(advance: f64, x0: i64, x1: i64, top: i64, bottom: i64) -> Self {
        Self {
            advance,
            x0,
            x1,
            top,
            bottom,
        }
    }
}

#[derive(Debug, Default)]
pub struct RectRasterizer {
    glyphs: HashMap<String, RectGlyph>,
    surfaces: Cell<usize>,
}

impl RectRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_glyph(mut self, grapheme: &str, glyph: RectGlyph) -> Self {
        self.glyphs.insert(grapheme.to_string(), glyph);
        self
    }

    /// Number of surfaces created so far.
    pub fn surfaces(&self) -> usize {
        self.surfaces.get()
    }
}

/// Glyph set for a 16px layout (tile 32, pen at 8, baseline at 24).
///
/// - `l`: tall stem, 1px left bearing and 2px right bearing.
/// - `o`: x-height bowl, 2px left and 3px right bearing.
/// - `'` and `.`: marks that never share a scanline.
/// - `j`: overhangs 3px to the left of the pen.
/// - space: no ink.
pub fn latin_16px() -> RectRasterizer {
    RectRasterizer::new()
        .with_glyph("l", RectGlyph::new(8.0, 1, 7, -16, 0))
        .with_glyph("o", RectGlyph::new(8.0, 2, 6, -8, 0))
        .with_glyph("'", RectGlyph::new(4.0, 1, 3, -16, -12))
        .with_glyph(".", RectGlyph::new(4.0, 1, 3, -2, 0))
        .with_glyph("j", RectGlyph::new(6.0, -3, 3, -16, 0))
        .with_glyph(" ", RectGlyph::new(4.0, 0, 0, 0, 0))
}

pub struct RectSurface {
    glyphs: HashMap<String, RectGlyph>,
    width: usize,
    height: usize,
    rgba: Vec<u8>,
}

impl Rasterizer for RectRasterizer {
    type Surface = RectSurface;

    fn create_surface(&self, width: usize, height: usize) -> Result<Self::Surface> {
        self.surfaces.set(self.surfaces.get() + 1);
        Ok(RectSurface {
            glyphs: self.glyphs.clone(),
            width,
            height,
            rgba: vec![0; width * height * 4],
        })
    }
}

impl Surface for RectSurface {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn set_font(&mut self, _font: &FontDescriptor, _size_px: u32) {}

    fn measure_text(&mut self, text: &str) -> f64 {
        self.glyphs.get(text).map_or(0.0, |g| g.advance)
    }

    fn fill_text(&mut self, text: &str, x: f64, baseline: f64) {
        let Some(glyph) = self.glyphs.get(text) else {
            return;
        };
        let pen = x.round() as i64;
        let base = baseline.round() as i64;
        for y in (base + glyph.top)..(base + glyph.bottom) {
            for x in (pen + glyph.x0)..(pen + glyph.x1) {
                if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
                    continue;
                }
                let offset = (y as usize * self.width + x as usize) * 4;
                self.rgba[offset + 3] = 255;
            }
        }
    }

    fn clear(&mut self) {
        self.rgba.iter_mut().for_each(|b| *b = 0);
    }

    fn read_pixels(&mut self) -> Result<PixelImage> {
        PixelImage::new(self.width, self.height, self.rgba.clone())
    }
}
