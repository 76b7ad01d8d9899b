// src/error.rs

//! Error type shared by every fallible operation in the crate.

use thiserror::Error;

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, KerningError>;

#[derive(Error, Debug)]
pub enum KerningError {
    /// The rasterizer could not hand out a drawable surface. Nothing can be
    /// measured without one.
    #[error("Failed to acquire a {width}x{height} rasterization surface: {reason}")]
    SurfaceUnavailable {
        width: usize,
        height: usize,
        reason: String,
    },
    #[error("Pixel read-back failed: {0}")]
    ReadBack(String),
    #[error("Pixel buffer of {len} bytes does not match a {width}x{height} RGBA image")]
    InvalidImage { width: usize, height: usize, len: usize },
    /// Imported cache text did not have the expected shape.
    #[error("Malformed spacing cache: {0}")]
    CacheFormat(String),
    /// A profile that must exist after a flush was not found.
    #[error("No spacing profile for {grapheme:?} in {font} after flush")]
    MissingProfile { grapheme: String, font: String },
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
