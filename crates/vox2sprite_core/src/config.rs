//! # Render Configuration
//!
//! Loaded once, from TOML:
//!
//! ```toml
//! shading = "hsl"   # or "rgb"
//! parallel = true
//! ```
//!
//! Missing keys take their defaults; unknown keys are rejected.

use std::path::Path;

use serde::Deserialize;

use crate::error::{SpriteError, SpriteResult};
use crate::raster::ShadingModel;

/// Options for composing a sprite sheet.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// How face darkening is applied.
    pub shading: ShadingModel,
    /// Render frames on the rayon thread pool.
    pub parallel: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            shading: ShadingModel::Hsl,
            parallel: true,
        }
    }
}

impl RenderConfig {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`SpriteError::Config`] if the document is not valid TOML or
    /// contains unknown keys or values.
    pub fn from_toml_str(source: &str) -> SpriteResult<Self> {
        toml::from_str(source).map_err(|e| SpriteError::Config(e.to_string()))
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`SpriteError::Io`] if the file cannot be read, or
    /// [`SpriteError::Config`] if it cannot be parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> SpriteResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
}
