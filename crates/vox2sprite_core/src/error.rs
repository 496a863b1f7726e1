//! # Error Types
//!
//! All errors that can occur while decoding a model container or composing a
//! sprite sheet. Every error is terminal for the current conversion: there is
//! no partial result.

use thiserror::Error;

/// Errors that can occur in the sprite pipeline.
#[derive(Error, Debug)]
pub enum SpriteError {
    /// File could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input is not a MagicaVoxel container, or its chunk structure is broken.
    #[error("not a valid MagicaVoxel file: {0}")]
    Format(String),

    /// Recognized container with an unsupported version number.
    #[error("unsupported MagicaVoxel version {0}")]
    UnsupportedVersion(u32),

    /// A declared length or record count runs past the available bytes.
    #[error("truncated data: need {needed} bytes at offset {offset}, only {available} available")]
    Truncated {
        /// Absolute byte offset of the failed read.
        offset: usize,
        /// Bytes the read required.
        needed: usize,
        /// Bytes left in the enclosing region.
        available: usize,
    },

    /// Model dimensions or voxel coordinates are out of range.
    #[error("invalid model: {0}")]
    InvalidModel(String),

    /// There is nothing to render.
    #[error("file contains no models")]
    NoModels,

    /// Render configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type for sprite pipeline operations.
pub type SpriteResult<T> = Result<T, SpriteError>;
