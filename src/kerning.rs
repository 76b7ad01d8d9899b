// src/kerning.rs

//! Per-grapheme measurement and pair kerning.
//!
//! A grapheme is drawn alone on a square surface twice the font size on each
//! side, pen at half an em from the left edge and baseline at one and a half
//! em from the top. That leaves headroom for ascenders, descenders and
//! overhangs. The convex hull of its ink becomes a pair of edge profiles,
//! which are cached under the (grapheme, font) key.

use crate::cache::{CacheKey, ProfileStore};
use crate::error::{KerningError, Result};
use crate::font::FontDescriptor;
use crate::gap::{self, KerningResult};
use crate::geometry::{convex_hull, interpolate_integer_y, PixelImage};
use crate::profile::{extract_profiles, ProfileAnchors, ProfilePair};
use crate::rasterizer::{Rasterizer, Surface};
use log::debug;

/// Default rasterization size in pixels.
pub const FONT_SIZE_PX: u32 = 256;

/// Placement of a glyph on its measuring surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasureLayout {
    pub font_size_px: u32,
}

impl Default for MeasureLayout {
    fn default() -> Self {
        MeasureLayout {
            font_size_px: FONT_SIZE_PX,
        }
    }
}

impl MeasureLayout {
    pub fn new(font_size_px: u32) -> Self {
        Self { font_size_px }
    }

    /// Width and height of one glyph tile.
    pub fn tile_size(&self) -> usize {
        self.font_size_px as usize * 2
    }

    /// One profile entry per scanline of a tile.
    pub fn scanlines(&self) -> usize {
        self.tile_size()
    }

    pub fn left_margin(&self) -> f64 {
        f64::from(self.font_size_px) * 0.5
    }

    /// Baseline measured from the top of a tile.
    pub fn baseline(&self) -> f64 {
        f64::from(self.font_size_px) * 1.5
    }

    /// Turns one tile of pixels into edge profiles. `advance` is the glyph's
    /// measured width in pixels.
    pub fn analyze(&self, tile: &PixelImage, advance: f64) -> ProfilePair {
        let hull = convex_hull(tile);
        let samples = interpolate_integer_y(&hull);
        let left_margin = self.left_margin();
        let anchors = ProfileAnchors {
            left_margin,
            right_margin: left_margin + advance,
            font_size_px: f64::from(self.font_size_px),
        };
        extract_profiles(&samples, anchors, self.scanlines())
    }
}

/// Something that can answer "how much should this pair be tightened".
///
/// Implemented by the direct [`SpacingEngine`] and by the batching
/// [`BatchAnalyzer`](crate::batch::BatchAnalyzer), so the document rewriter
/// runs on either.
pub trait KerningEngine {
    /// Announces a pair that will be asked for later. Engines that batch use
    /// this to queue work; the default does nothing.
    fn prepare<S: ProfileStore + ?Sized>(
        &mut self,
        _left: &str,
        _right: &str,
        _font: &FontDescriptor,
        _store: &mut S,
    ) -> Result<()> {
        Ok(())
    }

    /// Spacing adjustment for `left` followed by `right`.
    fn kerning<S: ProfileStore + ?Sized>(
        &mut self,
        left: &str,
        right: &str,
        font: &FontDescriptor,
        factor: f64,
        store: &mut S,
    ) -> Result<KerningResult>;
}

/// Measures one grapheme per surface, on demand.
#[derive(Debug, Clone)]
pub struct SpacingEngine<R> {
    rasterizer: R,
    layout: MeasureLayout,
}

impl<R: Rasterizer> SpacingEngine<R> {
    pub fn new(rasterizer: R) -> Self {
        Self::with_layout(rasterizer, MeasureLayout::default())
    }

    pub fn with_layout(rasterizer: R, layout: MeasureLayout) -> Self {
        Self { rasterizer, layout }
    }

    pub fn layout(&self) -> MeasureLayout {
        self.layout
    }

    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    /// Cached profiles of `grapheme`, measuring it first on a miss.
    pub fn measure<S: ProfileStore + ?Sized>(
        &self,
        grapheme: &str,
        font: &FontDescriptor,
        store: &mut S,
    ) -> Result<ProfilePair> {
        let key = self.ensure_measured(grapheme, font, store)?;
        lookup(store, &key, grapheme, font).cloned()
    }

    fn ensure_measured<S: ProfileStore + ?Sized>(
        &self,
        grapheme: &str,
        font: &FontDescriptor,
        store: &mut S,
    ) -> Result<CacheKey> {
        let key = CacheKey::new(grapheme, font);
        if !store.has(&key) {
            let profiles = self.rasterize_and_analyze(grapheme, font)?;
            store.set(key.clone(), profiles);
        }
        Ok(key)
    }

    fn rasterize_and_analyze(&self, grapheme: &str, font: &FontDescriptor) -> Result<ProfilePair> {
        let size = self.layout.tile_size();
        let mut surface = self.rasterizer.create_surface(size, size)?;
        surface.set_font(font, self.layout.font_size_px);
        let advance = surface.measure_text(grapheme);
        surface.fill_text(grapheme, self.layout.left_margin(), self.layout.baseline());
        let image = surface.read_pixels()?;

        let profiles = self.layout.analyze(&image, advance);
        debug!(
            "Measured {:?} in {}: advance {:.2}px, {} ink scanlines",
            grapheme,
            font,
            advance,
            profiles.left.ink_scanlines()
        );
        Ok(profiles)
    }
}

impl<R: Rasterizer> KerningEngine for SpacingEngine<R> {
    fn kerning<S: ProfileStore + ?Sized>(
        &mut self,
        left: &str,
        right: &str,
        font: &FontDescriptor,
        factor: f64,
        store: &mut S,
    ) -> Result<KerningResult> {
        let left_key = self.ensure_measured(left, font, store)?;
        let right_key = self.ensure_measured(right, font, store)?;
        let left_glyph = lookup(store, &left_key, left, font)?;
        let right_glyph = lookup(store, &right_key, right, font)?;
        Ok(gap::combine(&left_glyph.right, &right_glyph.left, factor))
    }
}

/// Profiles that must already be in `store`.
pub(crate) fn lookup<'s, S: ProfileStore + ?Sized>(
    store: &'s S,
    key: &CacheKey,
    grapheme: &str,
    font: &FontDescriptor,
) -> Result<&'s ProfilePair> {
    store.get(key).ok_or_else(|| KerningError::MissingProfile {
        grapheme: grapheme.to_string(),
        font: font.to_string(),
    })
}

/// Left/right profiles of `grapheme` at the default size, measured through
/// `rasterizer` on a cache miss.
pub fn measure_spacing<R: Rasterizer, S: ProfileStore + ?Sized>(
    grapheme: &str,
    font: &FontDescriptor,
    rasterizer: &R,
    cache: &mut S,
) -> Result<ProfilePair> {
    SpacingEngine::new(rasterizer).measure(grapheme, font, cache)
}

/// Tightening for `left` followed by `right`: `left`'s right profile against
/// `right`'s left profile, scaled by `factor`.
pub fn calculate_kerning<R: Rasterizer, S: ProfileStore + ?Sized>(
    left: &str,
    right: &str,
    font: &FontDescriptor,
    factor: f64,
    rasterizer: &R,
    cache: &mut S,
) -> Result<KerningResult> {
    SpacingEngine::new(rasterizer).kerning(left, right, font, factor, cache)
}

impl<R: Rasterizer + ?Sized> Rasterizer for &R {
    type Surface = R::Surface;

    fn create_surface(&self, width: usize, height: usize) -> Result<Self::Surface> {
        (**self).create_surface(width, height)
    }
}
