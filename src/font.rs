// src/font.rs

//! Font descriptor identifying the rendering context of a measurement.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The (family, style, weight) triplet a grapheme is rendered with.
///
/// Field names serialize in the CSS-ish camelCase form because they become
/// part of every persisted cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FontDescriptor {
    pub font_family: String,
    pub font_style: String,
    pub font_weight: String,
}

impl FontDescriptor {
    pub fn new(
        family: impl Into<String>,
        style: impl Into<String>,
        weight: impl Into<String>,
    ) -> Self {
        Self {
            font_family: family.into(),
            font_style: style.into(),
            font_weight: weight.into(),
        }
    }

    /// CSS `font` shorthand at the given pixel size, e.g. `italic 700 256px serif`.
    pub fn css_shorthand(&self, size_px: u32) -> String {
        format!(
            "{} {} {}px {}",
            self.font_style, self.font_weight, size_px, self.font_family
        )
    }
}

impl Default for FontDescriptor {
    fn default() -> Self {
        FontDescriptor {
            font_family: "serif".to_string(),
            font_style: "normal".to_string(),
            font_weight: "400".to_string(),
        }
    }
}

impl fmt::Display for FontDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.font_style, self.font_weight, self.font_family
        )
    }
}
