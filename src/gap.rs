// src/gap.rs

//! Combining two edge profiles into a spacing adjustment.

use crate::profile::EdgeProfile;
use log::warn;
use std::fmt;

/// Outcome of a kerning computation for one grapheme pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KerningResult {
    /// Tighten the pair by this many em. Always strictly positive.
    Tighten(f64),
    /// Keep the default spacing.
    Normal,
}

impl KerningResult {
    /// Tightening amount, if any.
    pub fn em(self) -> Option<f64> {
        match self {
            KerningResult::Tighten(em) => Some(em),
            KerningResult::Normal => None,
        }
    }

    /// CSS `letter-spacing` value for the left grapheme of the pair.
    pub fn letter_spacing(self) -> String {
        match self {
            KerningResult::Tighten(em) => format!("-{}em", em),
            KerningResult::Normal => "normal".to_string(),
        }
    }

    fn scaled(gap: f64, factor: f64) -> Self {
        let em = gap * factor;
        if gap > 0.0 && em > 0.0 && em.is_finite() {
            KerningResult::Tighten(em)
        } else {
            KerningResult::Normal
        }
    }
}

impl fmt::Display for KerningResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.letter_spacing())
    }
}

/// Gap between a left glyph (its `right` profile) and a right glyph (its
/// `left` profile). Not commutative.
///
/// The closest approach over scanlines where both glyphs have ink decides
/// the gap. If the glyphs never share a scanline, the two single-sided minima
/// are added instead. Touching or overlapping ink, or a glyph without ink,
/// yields [`KerningResult::Normal`].
pub fn combine(right: &EdgeProfile, left: &EdgeProfile, factor: f64) -> KerningResult {
    if right.len() != left.len() {
        warn!(
            "Combining profiles of different heights ({} vs {}), comparing the common scanlines",
            right.len(),
            left.len()
        );
    }

    let closest = right
        .entries()
        .iter()
        .zip(left.entries())
        .filter_map(|(r, l)| Some(r.finite()? + l.finite()?))
        .reduce(f64::min);

    if let Some(gap) = closest {
        return KerningResult::scaled(gap, factor);
    }

    // No shared scanline, e.g. an apostrophe followed by a period.
    match (right.min_finite(), left.min_finite()) {
        (Some(r), Some(l)) => KerningResult::scaled(r + l, factor),
        _ => KerningResult::Normal,
    }
}
