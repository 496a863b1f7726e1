//! # Sprite Sheet Composer
//!
//! Tiles every model's four side renders into one atlas.
//!
//! ```text
//!              side 0      side 1      side 2      side 3
//!            ┌──────────┬──────────┬──────────┬──────────┐
//!  frame 0   │ East     │ South    │ West     │ North    │  max(size_v) rows
//!            ├──────────┼──────────┼──────────┼──────────┤
//!  frame 1   │ ...      │          │          │          │
//!            └──────────┴──────────┴──────────┴──────────┘
//!              2 * max(size_u) columns per side
//! ```
//!
//! Each block is copied to the top-left of its cell. The rest of the cell
//! stays transparent. Cells never overlap, so every frame's band of rows is
//! rendered independently.

use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;

use crate::config::RenderConfig;
use crate::error::{SpriteError, SpriteResult};
use crate::projection::Side;
use crate::raster::{FrameRenderer, PixelBlock, BYTES_PER_PIXEL};
use crate::vox::{Model, Palette, Rgba, VoxData};

/// Placement of one `(model, side)` block in the atlas, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BlockRect {
    /// Left edge.
    pub x: usize,
    /// Top edge.
    pub y: usize,
    /// Block width (`2 * size_u`).
    pub width: usize,
    /// Block height (`size_v`).
    pub height: usize,
}

/// Size of the model behind one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FrameInfo {
    /// Model dimensions `[x, y, z]`.
    pub model_size: [u32; 3],
    /// Rendered block width.
    pub block_width: usize,
    /// Rendered block height.
    pub block_height: usize,
}

/// Serializable description of a sprite sheet's layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SheetManifest {
    /// Atlas width.
    pub width: usize,
    /// Atlas height.
    pub height: usize,
    /// Number of frames (models).
    pub frame_count: usize,
    /// Width of one side cell.
    pub cell_width: usize,
    /// Height of one frame band.
    pub cell_height: usize,
    /// Side names in column order.
    pub sides: [&'static str; 4],
    /// Per-frame model and block sizes.
    pub frames: Vec<FrameInfo>,
}

/// Atlas of all `(model, side)` renders.
#[derive(Clone, Debug)]
pub struct SpriteSheet {
    width: usize,
    height: usize,
    cell_width: usize,
    cell_height: usize,
    frames: Vec<FrameInfo>,
    data: Vec<u8>,
}

impl SpriteSheet {
    /// Composes the sheet for a decoded file.
    ///
    /// # Errors
    ///
    /// Returns [`SpriteError::NoModels`] if the file has no models.
    pub fn compose(data: &VoxData, config: &RenderConfig) -> SpriteResult<Self> {
        Self::compose_models(data.models(), data.palette(), config)
    }

    /// Composes the sheet for `models`, one frame each, in order.
    ///
    /// # Errors
    ///
    /// Returns [`SpriteError::NoModels`] if `models` is empty.
    pub fn compose_models(
        models: &[Model],
        palette: &Palette,
        config: &RenderConfig,
    ) -> SpriteResult<Self> {
        if models.is_empty() {
            return Err(SpriteError::NoModels);
        }
        let cell_width = models.iter().map(|m| m.size_u() as usize * 2).max().unwrap_or(0);
        let cell_height = models.iter().map(|m| m.size_v() as usize).max().unwrap_or(0);
        let width = cell_width * Side::ALL.len();
        let height = cell_height * models.len();

        let mut data = vec![0u8; width * height * BYTES_PER_PIXEL];
        let renderer = FrameRenderer::new(palette, config.shading);
        let stride = width * BYTES_PER_PIXEL;
        let band_len = stride * cell_height;

        let started = Instant::now();
        let render_band = |(frame, (band, model)): (usize, (&mut [u8], &Model))| {
            for side in Side::ALL {
                let block = renderer.render(model, side);
                blit(band, stride, side.index() * cell_width, &block);
            }
            tracing::trace!(frame, "rendered frame");
        };

        if config.parallel {
            data.par_chunks_mut(band_len)
                .zip(models.par_iter())
                .enumerate()
                .for_each(render_band);
        } else {
            data.chunks_mut(band_len)
                .zip(models.iter())
                .enumerate()
                .for_each(render_band);
        }

        tracing::debug!(
            width,
            height,
            frames = models.len(),
            parallel = config.parallel,
            elapsed_us = started.elapsed().as_micros() as u64,
            "composed sprite sheet"
        );

        let frames = models
            .iter()
            .map(|m| FrameInfo {
                model_size: [m.size_x(), m.size_y(), m.size_z()],
                block_width: m.size_u() as usize * 2,
                block_height: m.size_v() as usize,
            })
            .collect();

        Ok(Self {
            width,
            height,
            cell_width,
            cell_height,
            frames,
            data,
        })
    }

    /// Atlas width in pixels (`8 * max(size_u)`).
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Atlas height in pixels (`frame_count * max(size_v)`).
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Number of frames (one per model).
    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Row-major RGBA8 bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the sheet, returning its RGBA8 bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Pixel at `(x, y)`.
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> Rgba {
        let start = (y * self.width + x) * BYTES_PER_PIXEL;
        *bytemuck::from_bytes(&self.data[start..start + BYTES_PER_PIXEL])
    }

    /// Where the block for `(frame, side)` sits, or `None` past the last frame.
    #[must_use]
    pub fn frame_block(&self, frame: usize, side: Side) -> Option<BlockRect> {
        self.frames.get(frame).map(|info| BlockRect {
            x: side.index() * self.cell_width,
            y: frame * self.cell_height,
            width: info.block_width,
            height: info.block_height,
        })
    }

    /// Layout description for writing next to the image.
    #[must_use]
    pub fn manifest(&self) -> SheetManifest {
        SheetManifest {
            width: self.width,
            height: self.height,
            frame_count: self.frame_count(),
            cell_width: self.cell_width,
            cell_height: self.cell_height,
            sides: Side::ALL.map(Side::name),
            frames: self.frames.clone(),
        }
    }
}

/// Copies `block` row by row into a frame band at pixel column `x`.
fn blit(band: &mut [u8], stride: usize, x: usize, block: &PixelBlock) {
    let offset = x * BYTES_PER_PIXEL;
    for y in 0..block.height() {
        let row = block.row(y);
        let start = y * stride + offset;
        band[start..start + row.len()].copy_from_slice(row);
    }
}
