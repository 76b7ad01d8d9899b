// src/lib.rs

//! Pixel-based optical kerning.
//!
//! Glyphs are rasterized through a [`Rasterizer`], reduced to the convex hull
//! of their ink, and turned into per-scanline edge profiles. The gap between
//! two glyphs is the closest approach of the left glyph's right profile and
//! the right glyph's left profile; a fraction of it becomes negative
//! letter-spacing. Profiles are cached per (grapheme, font) and the cache can
//! be exported as canonical JSON.

pub mod batch;
pub mod cache;
pub mod canonical;
pub mod config;
pub mod document;
pub mod error;
pub mod font;
pub mod gap;
pub mod geometry;
pub mod kerning;
pub mod profile;
pub mod rasterizer;
pub mod text;

pub use batch::BatchAnalyzer;
pub use cache::{CacheKey, CacheStats, ProfileStore, SpacingCache};
pub use config::{ExcludeRule, KerningConfig, MeasurementConfig};
pub use document::rewrite::{apply_kerning, strip_kerning, RewriteStats, APPLIED_CLASS};
pub use document::{Document, Element, NodeId, NodeKind};
pub use error::{KerningError, Result};
pub use font::FontDescriptor;
pub use gap::KerningResult;
pub use geometry::{convex_hull, interpolate_integer_y, HullSample, PixelImage, Point};
pub use kerning::{
    calculate_kerning, measure_spacing, KerningEngine, MeasureLayout, SpacingEngine, FONT_SIZE_PX,
};
pub use profile::{EdgeProfile, ProfileEntry, ProfilePair};
pub use rasterizer::{HeadlessRasterizer, OfflineRasterizer, Rasterizer, Surface};
