// src/profile.rs

//! Edge profiles: per-scanline distance from a glyph's margins to its ink.

use crate::geometry::HullSample;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// One scanline of an edge profile.
///
/// `NoInk` is a real variant rather than an infinite float so that it cannot
/// leak into arithmetic and so it maps to `null` on the wire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProfileEntry {
    /// Distance in em units. Always finite.
    Finite(f64),
    NoInk,
}

impl ProfileEntry {
    /// Wraps a distance, mapping non-finite values to `NoInk`.
    pub fn from_distance(distance: f64) -> Self {
        if distance.is_finite() {
            ProfileEntry::Finite(distance)
        } else {
            ProfileEntry::NoInk
        }
    }

    pub fn finite(self) -> Option<f64> {
        match self {
            ProfileEntry::Finite(d) => Some(d),
            ProfileEntry::NoInk => None,
        }
    }

    pub fn is_ink(self) -> bool {
        matches!(self, ProfileEntry::Finite(_))
    }
}

impl Serialize for ProfileEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.finite().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ProfileEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?
            .map_or(ProfileEntry::NoInk, ProfileEntry::from_distance))
    }
}

/// Fixed-length profile, one entry per scanline of the measuring surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeProfile(Vec<ProfileEntry>);

impl EdgeProfile {
    pub fn new(entries: Vec<ProfileEntry>) -> Self {
        Self(entries)
    }

    /// A profile with no ink on any of its `scanlines`.
    pub fn empty(scanlines: usize) -> Self {
        Self(vec![ProfileEntry::NoInk; scanlines])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn entries(&self) -> &[ProfileEntry] {
        &self.0
    }

    /// Smallest finite entry, or `None` when the profile holds no ink.
    pub fn min_finite(&self) -> Option<f64> {
        self.0
            .iter()
            .filter_map(|e| e.finite())
            .fold(None, |acc, d| Some(acc.map_or(d, |m: f64| m.min(d))))
    }

    pub fn ink_scanlines(&self) -> usize {
        self.0.iter().filter(|e| e.is_ink()).count()
    }
}

/// Left and right profiles of one glyph. Serialized as a two-element array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "(EdgeProfile, EdgeProfile)", into = "(EdgeProfile, EdgeProfile)")]
pub struct ProfilePair {
    pub left: EdgeProfile,
    pub right: EdgeProfile,
}

impl From<(EdgeProfile, EdgeProfile)> for ProfilePair {
    fn from((left, right): (EdgeProfile, EdgeProfile)) -> Self {
        ProfilePair { left, right }
    }
}

impl From<ProfilePair> for (EdgeProfile, EdgeProfile) {
    fn from(pair: ProfilePair) -> Self {
        (pair.left, pair.right)
    }
}

/// Where the glyph was drawn on its surface, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileAnchors {
    /// Pen position the glyph was drawn at.
    pub left_margin: f64,
    /// `left_margin` plus the glyph's advance width.
    pub right_margin: f64,
    pub font_size_px: f64,
}

/// Builds both edge profiles from an interpolated hull.
///
/// Samples whose scanline falls outside `0..scanlines` are ignored.
pub fn extract_profiles(
    samples: &[HullSample],
    anchors: ProfileAnchors,
    scanlines: usize,
) -> ProfilePair {
    // scanline -> (min x, max x)
    let mut extents: BTreeMap<usize, (f64, f64)> = BTreeMap::new();
    for sample in samples {
        let Ok(y) = usize::try_from(sample.y) else {
            continue;
        };
        if y >= scanlines {
            continue;
        }
        extents
            .entry(y)
            .and_modify(|(lo, hi)| {
                *lo = lo.min(sample.x);
                *hi = hi.max(sample.x);
            })
            .or_insert((sample.x, sample.x));
    }

    let mut left = vec![ProfileEntry::NoInk; scanlines];
    let mut right = vec![ProfileEntry::NoInk; scanlines];
    for (&y, &(min_x, max_x)) in &extents {
        left[y] = ProfileEntry::from_distance((min_x - anchors.left_margin) / anchors.font_size_px);
        right[y] =
            ProfileEntry::from_distance((anchors.right_margin - max_x) / anchors.font_size_px);
    }

    ProfilePair {
        left: EdgeProfile::new(left),
        right: EdgeProfile::new(right),
    }
}
