// src/cache/mod.rs

//! Spacing cache: measured profile pairs keyed by (grapheme, font).
//!
//! A cache lives for one logical session and only ever grows. Entries are
//! write-once because a grapheme in a given font always rasterizes to the same
//! ink. The cache can be exported to canonical JSON and imported again to
//! warm-start a later run.

use crate::canonical;
use crate::error::{KerningError, Result};
use crate::font::FontDescriptor;
use crate::profile::ProfilePair;
use log::{debug, info, trace, warn};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::fmt;


/// Canonical identifier of a measurement.
///
/// The wrapped string is the canonical JSON of
/// `{fontFamily, fontStyle, fontWeight, grapheme}`, so equal keys are equal
/// strings whichever way they were built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(grapheme: &str, font: &FontDescriptor) -> Self {
        CacheKey(canonical::value_to_canonical_string(&json!({
            "fontFamily": font.font_family,
            "fontStyle": font.font_style,
            "fontWeight": font.font_weight,
            "grapheme": grapheme,
        })))
    }

    /// Validates a persisted key string. It must hold exactly the four key
    /// fields and already be in canonical form, otherwise lookups built with
    /// [`CacheKey::new`] could never find it.
    pub fn parse(text: &str) -> Result<Self> {
        let fields: KeyFields = serde_json::from_str(text)
            .map_err(|e| KerningError::CacheFormat(format!("bad cache key {}: {}", text, e)))?;
        let font = FontDescriptor::new(fields.font_family, fields.font_style, fields.font_weight);
        let key = CacheKey::new(&fields.grapheme, &font);
        if key.0 != text {
            return Err(KerningError::CacheFormat(format!(
                "cache key {} is not canonical, expected {}",
                text, key
            )));
        }
        Ok(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Wire shape of a key. Every field is required.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct KeyFields {
    font_family: String,
    font_style: String,
    font_weight: String,
    grapheme: String,
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Storage seam for measured profiles.
///
/// Measurement code only talks to this trait, so callers decide where the
/// profiles live and for how long.
pub trait ProfileStore {
    fn get(&self, key: &CacheKey) -> Option<&ProfilePair>;

    /// Stores `profiles` unless `key` is already present. Returns whether the
    /// value was inserted.
    fn set(&mut self, key: CacheKey, profiles: ProfilePair) -> bool;

    fn has(&self, key: &CacheKey) -> bool {
        self.get(key).is_some()
    }
}

/// Summary numbers for a cache, as reported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheStats {
    pub entries: usize,
    pub scanlines: usize,
    /// Fraction of all scanlines (both sides) that carry ink.
    pub ink_ratio: f64,
}

/// In-memory [`ProfileStore`] with canonical export/import.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpacingCache {
    entries: HashMap<CacheKey, ProfilePair>,
}

impl SpacingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CacheKey, &ProfilePair)> {
        self.entries.iter()
    }

    /// Adds every entry of `other` that is not already present. Returns the
    /// number of entries added.
    pub fn merge(&mut self, other: SpacingCache) -> usize {
        let mut added = 0;
        for (key, profiles) in other.entries {
            match self.entries.get(&key) {
                Some(existing) => {
                    if *existing != profiles {
                        warn!("Conflicting profiles for {}, keeping the first", key);
                    }
                }
                None => {
                    self.entries.insert(key, profiles);
                    added += 1;
                }
            }
        }
        debug!("Merged {} new cache entries", added);
        added
    }

    pub fn stats(&self) -> CacheStats {
        let mut scanlines = 0;
        let mut ink = 0;
        for profiles in self.entries.values() {
            scanlines += profiles.left.len() + profiles.right.len();
            ink += profiles.left.ink_scanlines() + profiles.right.ink_scanlines();
        }
        CacheStats {
            entries: self.entries.len(),
            scanlines,
            ink_ratio: if scanlines == 0 {
                0.0
            } else {
                ink as f64 / scanlines as f64
            },
        }
    }

    /// Canonical JSON form. Two caches holding the same entries export to the
    /// same bytes regardless of insertion order.
    pub fn export(&self) -> Result<String> {
        let text = canonical::to_canonical_string(&self.entries)
            .map_err(|e| KerningError::CacheFormat(e.to_string()))?;
        info!("Exported spacing cache with {} entries", self.entries.len());
        Ok(text)
    }

    /// Parses the output of [`SpacingCache::export`].
    ///
    /// Fails without side effects on anything that is not an object of
    /// `[left, right]` arrays of equal length holding numbers or `null`,
    /// keyed by canonical cache keys.
    pub fn import(input: &str) -> Result<Self> {
        let entries: HashMap<String, ProfilePair> =
            serde_json::from_str(input).map_err(|e| KerningError::CacheFormat(e.to_string()))?;

        for (key, profiles) in &entries {
            if profiles.left.len() != profiles.right.len() {
                return Err(KerningError::CacheFormat(format!(
                    "entry {} has {} left and {} right scanlines",
                    key,
                    profiles.left.len(),
                    profiles.right.len()
                )));
            }
        }

        let cache = SpacingCache {
            entries: entries
                .into_iter()
                .map(|(key, profiles)| Ok((CacheKey::parse(&key)?, profiles)))
                .collect::<Result<_>>()?,
        };
        info!("Imported spacing cache with {} entries", cache.len());
        Ok(cache)
    }
}

impl ProfileStore for SpacingCache {
    fn get(&self, key: &CacheKey) -> Option<&ProfilePair> {
        let hit = self.entries.get(key);
        if hit.is_some() {
            trace!("Spacing cache hit for {}", key);
        }
        hit
    }

    fn set(&mut self, key: CacheKey, profiles: ProfilePair) -> bool {
        if self.entries.contains_key(&key) {
            trace!("Spacing cache already holds {}, keeping it", key);
            return false;
        }
        self.entries.insert(key, profiles);
        true
    }
}
