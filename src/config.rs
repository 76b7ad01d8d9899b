// src/config.rs

//! Configuration for kerning runs.
//!
//! Every struct deserializes with `#[serde(default)]`, so a configuration file
//! only needs to name the settings it changes. Defaults match the values the
//! engine has always been tuned with: half-strength tightening, 256px
//! measurements, and form controls/scripts left alone.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{KerningError, Result};
use crate::font::FontDescriptor;

// --- Top-Level Configuration Structure ---

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KerningConfig {
    /// Scale applied to every measured gap. `0.0` disables kerning entirely
    /// (existing annotations are still removed).
    pub factor: f64,
    /// Graphemes whose pairs always keep normal spacing.
    pub exclude: Vec<ExcludeRule>,
    /// Font used for text with no font-carrying ancestor.
    pub font: FontDescriptor,
    /// Element tags the rewriter never descends into.
    pub excluded_tags: Vec<String>,
    pub measurement: MeasurementConfig,
}

impl Default for KerningConfig {
    fn default() -> Self {
        KerningConfig {
            factor: 0.5,
            exclude: Vec::new(),
            font: FontDescriptor::default(),
            excluded_tags: vec![
                "option".to_string(),
                "script".to_string(),
                "textarea".to_string(),
            ],
            measurement: MeasurementConfig::default(),
        }
    }
}

impl KerningConfig {
    /// Reads a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: KerningConfig = serde_json::from_str(&text)
            .map_err(|e| KerningError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.factor.is_finite() || self.factor < 0.0 {
            return Err(KerningError::Config(format!(
                "factor must be a finite non-negative number, got {}",
                self.factor
            )));
        }
        if self.measurement.font_size_px == 0 {
            return Err(KerningError::Config("font_size_px must be positive".to_string()));
        }
        if self.measurement.batch_tiles == 0 {
            return Err(KerningError::Config("batch_tiles must be positive".to_string()));
        }
        for rule in &self.exclude {
            if let ExcludeRule::Range(start, end) = rule {
                if start > end {
                    return Err(KerningError::Config(format!(
                        "exclude range [{:#x}, {:#x}] is reversed",
                        start, end
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn is_tag_excluded(&self, tag: &str) -> bool {
        self.excluded_tags
            .iter()
            .any(|t| t.eq_ignore_ascii_case(tag))
    }
}

// --- Exclusion Rules ---

/// A rule matching graphemes by their first codepoint.
///
/// In JSON a rule is either a string of literal characters (`"、。"`) or an
/// inclusive codepoint range (`[0, 255]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExcludeRule {
    Chars(String),
    Range(u32, u32),
}

// --- Measurement Configuration ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementConfig {
    /// Rasterization size. Large enough for sub-pixel accurate em values.
    pub font_size_px: u32,
    /// Glyph tiles per read-back when batching.
    pub batch_tiles: usize,
}

impl Default for MeasurementConfig {
    fn default() -> Self {
        MeasurementConfig {
            font_size_px: 256,
            batch_tiles: 8,
        }
    }
}
