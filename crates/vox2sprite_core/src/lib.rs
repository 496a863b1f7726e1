//! # vox2sprite Core
//!
//! Converts MagicaVoxel models into flat-shaded isometric sprite sheets.
//!
//! ## Pipeline
//!
//! ```text
//! ┌────────────┐   ┌──────────────┐   ┌───────────────┐   ┌─────────────┐
//! │ .vox bytes │ → │ Model +      │ → │ Lattice per   │ → │ PixelBlock  │
//! │            │   │ Palette      │   │ (model, side) │   │ per (m, s)  │
//! └────────────┘   └──────────────┘   └───────────────┘   └──────┬──────┘
//!                                                                 ↓
//!                                                         ┌─────────────┐
//!                                                         │ SpriteSheet │
//!                                                         └─────────────┘
//! ```
//!
//! - `vox`: chunk-tree decoder, models, palette
//! - `projection`: voxels → `(u, v, w)` lattice of surface patches per side
//! - `raster`: nearest patch per column → shaded double-height pixels
//! - `sheet`: every model's four sides tiled into one atlas
//!
//! Every stage produces immutable values from immutable inputs. The core does
//! no terminal output; errors are returned, never logged.
//!
//! ## Example
//!
//! ```rust,ignore
//! use vox2sprite_core::{RenderConfig, SpriteSheet, VoxData};
//!
//! let data = VoxData::load("assets/horse.vox")?;
//! let sheet = SpriteSheet::compose(&data, &RenderConfig::default())?;
//! assert_eq!(sheet.frame_count(), data.models().len());
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]
#![allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]

pub mod config;
pub mod error;
pub mod projection;
pub mod raster;
pub mod sheet;
pub mod vox;

pub use config::RenderConfig;
pub use error::{SpriteError, SpriteResult};
pub use projection::{Face, Lattice, Side, SurfacePatch};
pub use raster::{shade, FrameRenderer, PixelBlock, ShadingModel, BYTES_PER_PIXEL};
pub use sheet::{BlockRect, FrameInfo, SheetManifest, SpriteSheet};
pub use vox::{Model, Palette, PaletteSource, Rgba, Voxel, VoxData, MAX_MODEL_SIZE};

/// Decodes a `.vox` buffer and composes its sprite sheet in one step.
///
/// # Errors
///
/// Any decode error from [`VoxData::decode`], or [`SpriteError::NoModels`].
pub fn render_sprite_sheet(bytes: &[u8], config: &RenderConfig) -> SpriteResult<SpriteSheet> {
    let data = VoxData::decode(bytes)?;
    SpriteSheet::compose(&data, config)
}
