// src/batch.rs

//! Batched measurement: many graphemes per pixel read-back.
//!
//! Reading pixels back is the slow part of measuring, so the batch analyzer
//! stacks glyph tiles vertically on one tall surface and only reads it back
//! once all tiles are used, or when someone asks for a gap. Tiles use the same
//! placement as [`SpacingEngine`](crate::kerning::SpacingEngine), so both paths
//! fill the cache with identical profiles.
//!
//! ```text
//!   +--------+  tile 0: pen at (0.5em, 1.5em)
//!   |   A    |
//!   +--------+  tile 1: pen at (0.5em, 2em + 1.5em)
//!   |   V    |
//!   +--------+
//!   |  ...   |
//! ```

use crate::cache::{CacheKey, ProfileStore};
use crate::error::{KerningError, Result};
use crate::font::FontDescriptor;
use crate::gap::{self, KerningResult};
use crate::kerning::{lookup, KerningEngine, MeasureLayout};
use crate::rasterizer::{Rasterizer, Surface};
use log::{debug, trace};

/// A grapheme drawn on the surface but not yet analyzed. Its tile index is
/// its position in the pending list.
#[derive(Debug)]
struct PendingTile {
    key: CacheKey,
    advance: f64,
}

pub struct BatchAnalyzer<R: Rasterizer> {
    rasterizer: R,
    layout: MeasureLayout,
    tiles: usize,
    /// Created on first use and reused for every batch.
    surface: Option<R::Surface>,
    pending: Vec<PendingTile>,
    read_backs: usize,
}

impl<R: Rasterizer> BatchAnalyzer<R> {
    /// `tiles` is clamped to at least one.
    pub fn new(rasterizer: R, layout: MeasureLayout, tiles: usize) -> Self {
        Self {
            rasterizer,
            layout,
            tiles: tiles.max(1),
            surface: None,
            pending: Vec::new(),
            read_backs: 0,
        }
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Number of read-backs performed so far.
    pub fn read_backs(&self) -> usize {
        self.read_backs
    }

    /// Queues `grapheme` for measurement unless it is cached or already queued.
    pub fn prepare<S: ProfileStore + ?Sized>(
        &mut self,
        grapheme: &str,
        font: &FontDescriptor,
        store: &mut S,
    ) -> Result<()> {
        let key = CacheKey::new(grapheme, font);
        if store.has(&key) || self.pending.iter().any(|p| p.key == key) {
            return Ok(());
        }

        let layout = self.layout;
        let top = (self.pending.len() * layout.tile_size()) as f64;
        let fresh_batch = self.pending.is_empty();
        let surface = self.surface()?;
        if fresh_batch {
            surface.clear();
        }
        surface.set_font(font, layout.font_size_px);
        let advance = surface.measure_text(grapheme);
        surface.fill_text(grapheme, layout.left_margin(), top + layout.baseline());
        trace!(
            "BatchAnalyzer: queued {:?} in tile {}",
            grapheme,
            self.pending.len()
        );
        self.pending.push(PendingTile { key, advance });

        if self.pending.len() == self.tiles {
            self.flush(store)?;
        }
        Ok(())
    }

    /// Queues both graphemes of a pair.
    pub fn prepare_pair<S: ProfileStore + ?Sized>(
        &mut self,
        left: &str,
        right: &str,
        font: &FontDescriptor,
        store: &mut S,
    ) -> Result<()> {
        self.prepare(left, font, store)?;
        self.prepare(right, font, store)
    }

    /// Reads the surface back once and stores profiles for every queued tile.
    pub fn flush<S: ProfileStore + ?Sized>(&mut self, store: &mut S) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let Some(surface) = self.surface.as_mut() else {
            return Err(KerningError::ReadBack(
                "pending tiles without a surface".to_string(),
            ));
        };
        let image = surface.read_pixels()?;
        self.read_backs += 1;

        let tile_size = self.layout.tile_size();
        let pending = std::mem::take(&mut self.pending);
        debug!("BatchAnalyzer: analyzing {} tiles", pending.len());
        for (index, tile) in pending.into_iter().enumerate() {
            let band = image.crop_rows(index * tile_size, tile_size);
            let profiles = self.layout.analyze(&band, tile.advance);
            store.set(tile.key, profiles);
        }
        Ok(())
    }

    /// Gap for a pair prepared earlier. Flushes pending work first; a pair
    /// that was never prepared is an error rather than a guess.
    pub fn gap<S: ProfileStore + ?Sized>(
        &mut self,
        left: &str,
        right: &str,
        font: &FontDescriptor,
        factor: f64,
        store: &mut S,
    ) -> Result<KerningResult> {
        self.flush(store)?;
        let left_glyph = lookup(store, &CacheKey::new(left, font), left, font)?;
        let right_glyph = lookup(store, &CacheKey::new(right, font), right, font)?;
        Ok(gap::combine(&left_glyph.right, &right_glyph.left, factor))
    }

    fn surface(&mut self) -> Result<&mut R::Surface> {
        if self.surface.is_none() {
            let width = self.layout.tile_size();
            let height = width * self.tiles;
            debug!("BatchAnalyzer: creating {}x{} surface", width, height);
            self.surface = Some(self.rasterizer.create_surface(width, height)?);
        }
        self.surface
            .as_mut()
            .ok_or_else(|| KerningError::ReadBack("surface vanished".to_string()))
    }
}

impl<R: Rasterizer> KerningEngine for BatchAnalyzer<R> {
    fn prepare<S: ProfileStore + ?Sized>(
        &mut self,
        left: &str,
        right: &str,
        font: &FontDescriptor,
        store: &mut S,
    ) -> Result<()> {
        self.prepare_pair(left, right, font, store)
    }

    fn kerning<S: ProfileStore + ?Sized>(
        &mut self,
        left: &str,
        right: &str,
        font: &FontDescriptor,
        factor: f64,
        store: &mut S,
    ) -> Result<KerningResult> {
        self.gap(left, right, font, factor, store)
    }
}
