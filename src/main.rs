// src/main.rs

//! `optical-kerning`: maintenance and offline kerning on spacing caches.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::{info, warn};

use optical_kerning::{
    apply_kerning, BatchAnalyzer, Document, Element, KerningConfig, MeasureLayout,
    OfflineRasterizer, SpacingCache, SpacingEngine,
};

#[derive(Parser)]
#[command(version, about = "Pixel-based optical kerning")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Re-export a spacing cache in canonical form to stdout
    Normalize {
        /// Cache file to read
        cache: PathBuf,
    },
    /// Merge spacing caches; the first file holding a key wins
    Merge {
        /// File to write the merged cache to
        out: PathBuf,
        /// Caches to merge, in priority order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Print entry and scanline counts of a spacing cache
    Stats {
        /// Cache file to read
        cache: PathBuf,
    },
    /// Kern text against a warm cache and print the annotated HTML
    Kern {
        /// Cache holding profiles for every grapheme in the text
        #[arg(long)]
        cache: PathBuf,
        /// JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Override the configured kerning factor
        #[arg(long)]
        factor: Option<f64>,
        /// Measure through the batch analyzer
        #[arg(long)]
        batch: bool,
        /// Text to kern
        text: String,
    },
}

fn read_cache(path: &Path) -> anyhow::Result<SpacingCache> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read cache {}", path.display()))?;
    SpacingCache::import(&text).with_context(|| format!("Failed to import {}", path.display()))
}

fn load_config(path: Option<&Path>, factor: Option<f64>) -> anyhow::Result<KerningConfig> {
    let mut config = match path {
        Some(path) => KerningConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => KerningConfig::default(),
    };
    if let Some(factor) = factor {
        config.factor = factor;
        config.validate().context("Invalid --factor")?;
    }
    Ok(config)
}

fn kern(
    cache_path: &Path,
    config: &KerningConfig,
    batch: bool,
    text: &str,
) -> anyhow::Result<String> {
    let mut cache = read_cache(cache_path)?;
    let mut doc = Document::new(Element::new("p").with_font(config.font.clone()));
    let root = doc.root();
    let node = doc.create_text(text);
    doc.append_child(root, node);

    let layout = MeasureLayout::new(config.measurement.font_size_px);
    let result = if batch {
        let mut engine =
            BatchAnalyzer::new(OfflineRasterizer, layout, config.measurement.batch_tiles);
        apply_kerning(&mut doc, root, config, &mut engine, &mut cache)
    } else {
        let mut engine = SpacingEngine::with_layout(OfflineRasterizer, layout);
        apply_kerning(&mut doc, root, config, &mut engine, &mut cache)
    };
    let stats = result.context("Kerning failed")?;

    if stats.pairs > 0 && stats.tightened == 0 {
        warn!("No pair was tightened; is the cache for the right font?");
    }
    Ok(doc.to_html(root))
}

/// Main entry point for the `optical-kerning` tool.
fn main() -> anyhow::Result<()> {
    // Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Normalize { cache } => {
            let cache = read_cache(&cache)?;
            println!("{}", cache.export().context("Failed to export cache")?);
        }
        Command::Merge { out, inputs } => {
            let mut merged = SpacingCache::new();
            for input in &inputs {
                let added = merged.merge(read_cache(input)?);
                info!("{}: {} new entries", input.display(), added);
            }
            let text = merged.export().context("Failed to export merged cache")?;
            fs::write(&out, text)
                .with_context(|| format!("Failed to write {}", out.display()))?;
            info!("Wrote {} entries to {}", merged.len(), out.display());
        }
        Command::Stats { cache } => {
            let stats = read_cache(&cache)?.stats();
            info!("Cache {}: {:?}", cache.display(), stats);
            println!("entries: {}", stats.entries);
            println!("scanlines: {}", stats.scanlines);
            println!("ink ratio: {:.4}", stats.ink_ratio);
        }
        Command::Kern {
            cache,
            config,
            factor,
            batch,
            text,
        } => {
            let config = load_config(config.as_deref(), factor)?;
            println!("{}", kern(&cache, &config, batch, &text)?);
        }
    }
    Ok(())
}
