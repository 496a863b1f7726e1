//! # MagicaVoxel Container Decoder
//!
//! Parser for the MagicaVoxel `.vox` file format (RIFF-like chunk tree).
//!
//! ## VOX Format Reference
//!
//! ```text
//! VOX File Structure:
//! ├── "VOX " (4 bytes) - Magic number
//! ├── Version (4 bytes, LE) - File version (150)
//! └── MAIN Chunk
//!     ├── SIZE Chunk - Model dimensions          ─┐ repeated once
//!     ├── XYZI Chunk - Voxel data                 ─┘ per model
//!     └── RGBA Chunk - Palette (optional)
//!
//! Chunk header: tag (4) | content length (u32 LE) | children length (u32 LE)
//! ```
//!
//! The tree is walked depth-first with an explicit stack of region ends, so
//! hostile nesting cannot exhaust the call stack. Unknown chunks are skipped.

mod cursor;
mod model;
mod palette;

use std::path::Path;

pub use model::{Model, Voxel, MAX_MODEL_SIZE};
pub use palette::{Palette, PaletteSource, Rgba, PALETTE_SIZE};

use crate::error::{SpriteError, SpriteResult};
use cursor::ByteCursor;

/// VOX file magic number.
pub const VOX_MAGIC: [u8; 4] = *b"VOX ";

/// Supported VOX version.
pub const VOX_VERSION: u32 = 150;

/// Bytes in the file header (magic + version).
const FILE_HEADER_LEN: usize = 8;

/// Bytes in a chunk header (tag + content length + children length).
const CHUNK_HEADER_LEN: usize = 12;

/// Palette records in an `RGBA` chunk that map to slots 1..=255.
const PALETTE_RECORDS: usize = PALETTE_SIZE - 1;

const TAG_SIZE: [u8; 4] = *b"SIZE";
const TAG_XYZI: [u8; 4] = *b"XYZI";
const TAG_RGBA: [u8; 4] = *b"RGBA";

/// Everything decoded from one container.
#[derive(Clone, Debug)]
pub struct VoxData {
    models: Vec<Model>,
    palette: Palette,
    palette_source: PaletteSource,
}

impl VoxData {
    /// Decodes a `.vox` buffer.
    ///
    /// # Errors
    ///
    /// - [`SpriteError::Format`] on a bad magic tag or broken chunk header
    /// - [`SpriteError::UnsupportedVersion`] on any version other than 150
    /// - [`SpriteError::Truncated`] when a declared length or record count
    ///   runs past the data
    /// - [`SpriteError::InvalidModel`] on bad dimensions or stray voxels
    pub fn decode(bytes: &[u8]) -> SpriteResult<Self> {
        Decoder::read_header(bytes)?;
        let mut decoder = Decoder::default();
        decoder.walk(bytes)?;
        Ok(decoder.finish())
    }

    /// Reads and decodes a `.vox` file.
    ///
    /// # Errors
    ///
    /// Returns [`SpriteError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`VoxData::decode`].
    pub fn load<P: AsRef<Path>>(path: P) -> SpriteResult<Self> {
        let bytes = std::fs::read(path)?;
        Self::decode(&bytes)
    }

    /// Models in the order their `SIZE` chunks appear.
    #[inline]
    #[must_use]
    pub fn models(&self) -> &[Model] {
        &self.models
    }

    /// The shared palette.
    #[inline]
    #[must_use]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Whether the palette came from the file or the built-in default.
    #[inline]
    #[must_use]
    pub fn palette_source(&self) -> PaletteSource {
        self.palette_source
    }
}

/// Model under construction.
struct PendingModel {
    size: [u32; 3],
    voxels: Vec<Voxel>,
}

/// Chunk walk state. The "current model" is the last one opened by a `SIZE`
/// chunk; `XYZI` chunks append to it.
#[derive(Default)]
struct Decoder {
    models: Vec<PendingModel>,
    palette: Option<Palette>,
    chunks_seen: usize,
}

impl Decoder {
    fn read_header(bytes: &[u8]) -> SpriteResult<()> {
        if bytes.len() < FILE_HEADER_LEN {
            return Err(SpriteError::Format(format!(
                "file is {} bytes, shorter than the {FILE_HEADER_LEN}-byte header",
                bytes.len()
            )));
        }
        let mut cursor = ByteCursor::new(bytes);
        let magic = cursor.read_tag()?;
        if magic != VOX_MAGIC {
            return Err(SpriteError::Format(format!(
                "expected 'VOX ', got '{}'",
                String::from_utf8_lossy(&magic)
            )));
        }
        let version = cursor.read_u32()?;
        if version != VOX_VERSION {
            return Err(SpriteError::UnsupportedVersion(version));
        }
        Ok(())
    }

    fn walk(&mut self, bytes: &[u8]) -> SpriteResult<()> {
        let mut cursor = ByteCursor::new(bytes);
        cursor.take(FILE_HEADER_LEN)?;

        // End offsets of the regions being walked, innermost last.
        let mut regions = vec![bytes.len()];

        while let Some(&region_end) = regions.last() {
            let start = cursor.position();
            if start >= region_end {
                regions.pop();
                continue;
            }
            if region_end - start < CHUNK_HEADER_LEN {
                return Err(SpriteError::Format(format!(
                    "chunk header at offset {start} cut short ({} of {CHUNK_HEADER_LEN} bytes)",
                    region_end - start
                )));
            }

            let tag = cursor.read_tag()?;
            let content_len = cursor.read_u32()? as usize;
            let children_len = cursor.read_u32()? as usize;

            let available = region_end - cursor.position();
            let declared = content_len.saturating_add(children_len);
            if declared > available {
                return Err(SpriteError::Truncated {
                    offset: cursor.position(),
                    needed: declared,
                    available,
                });
            }

            let content = cursor.split(content_len)?;
            self.chunks_seen += 1;
            self.read_chunk(tag, content)?;

            if children_len > 0 {
                regions.push(cursor.position() + children_len);
            }
        }
        Ok(())
    }

    fn read_chunk(&mut self, tag: [u8; 4], mut content: ByteCursor<'_>) -> SpriteResult<()> {
        if content.is_empty() {
            return Ok(());
        }
        match tag {
            TAG_SIZE => {
                let size = [content.read_u32()?, content.read_u32()?, content.read_u32()?];
                check_dimensions(self.models.len(), size)?;
                self.models.push(PendingModel {
                    size,
                    voxels: Vec::new(),
                });
            }
            TAG_XYZI => {
                let index = self.models.len().saturating_sub(1);
                let Some(model) = self.models.last_mut() else {
                    return Err(SpriteError::Format(format!(
                        "voxel data at offset {} before any SIZE chunk",
                        content.position()
                    )));
                };
                let count = content.read_u32()? as usize;
                let records = content.take(count.saturating_mul(4))?;
                let voxels: &[Voxel] = bytemuck::cast_slice(records);

                let [sx, sy, sz] = model.size;
                if let Some(v) = voxels.iter().find(|v| {
                    u32::from(v.x) >= sx || u32::from(v.y) >= sy || u32::from(v.z) >= sz
                }) {
                    return Err(SpriteError::InvalidModel(format!(
                        "model {index}: voxel ({}, {}, {}) outside {sx}x{sy}x{sz}",
                        v.x, v.y, v.z
                    )));
                }
                model.voxels.extend_from_slice(voxels);
            }
            TAG_RGBA => {
                // Up to 255 whole records; missing slots stay transparent.
                let len = content.remaining().min(PALETTE_RECORDS * 4) & !3;
                let records = content.take(len)?;
                self.palette = Some(Palette::from_entries(bytemuck::cast_slice(records)));
            }
            _ => {}
        }
        Ok(())
    }

    fn finish(self) -> VoxData {
        let (palette, palette_source) = match self.palette {
            Some(palette) => (palette, PaletteSource::File),
            None => (Palette::default(), PaletteSource::Default),
        };
        let models: Vec<Model> = self
            .models
            .into_iter()
            .map(|m| Model::from_parts(m.size, m.voxels))
            .collect();

        tracing::debug!(
            chunks = self.chunks_seen,
            models = models.len(),
            palette = ?palette_source,
            "decoded vox container"
        );

        VoxData {
            models,
            palette,
            palette_source,
        }
    }
}

fn check_dimensions(index: usize, size: [u32; 3]) -> SpriteResult<()> {
    model::check_dimensions(size)
        .map_err(|reason| SpriteError::InvalidModel(format!("model {index}: {reason}")))
}

#[cfg(test)]
#[path = "../../tests/common/mod.rs"]
mod test_support;

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_decode_single_model() {
        let bytes = vox_file(&model_chunks([2, 3, 4], &[[0, 1, 2, 7], [1, 2, 3, 9]]));
        let data = VoxData::decode(&bytes).unwrap();

        assert_eq!(data.models().len(), 1);
        let model = &data.models()[0];
        assert_eq!((model.size_x(), model.size_y(), model.size_z()), (2, 3, 4));
        assert_eq!(model.voxels(), &[Voxel::new(0, 1, 2, 7), Voxel::new(1, 2, 3, 9)]);
    }

    #[test]
    fn test_missing_palette_uses_default() {
        let bytes = vox_file(&model_chunks([1, 1, 1], &[[0, 0, 0, 1]]));
        let data = VoxData::decode(&bytes).unwrap();

        assert_eq!(data.palette_source(), PaletteSource::Default);
        assert_eq!(data.palette(), &Palette::default());
    }

    #[test]
    fn test_rgba_chunk_replaces_palette() {
        let mut chunks = model_chunks([1, 1, 1], &[[0, 0, 0, 1]]);
        chunks.push(rgba_chunk(&[[10, 20, 30, 200]; 255]));
        let data = VoxData::decode(&vox_file(&chunks)).unwrap();

        assert_eq!(data.palette_source(), PaletteSource::File);
        assert_eq!(data.palette().get(0), Rgba::TRANSPARENT);
        assert_eq!(data.palette().get(1), Rgba::new(10, 20, 30, 200));
        assert_eq!(data.palette().get(255), Rgba::new(10, 20, 30, 200));
    }

    #[test]
    fn test_short_rgba_chunk_fills_leading_slots() {
        // Two whole records and a stray byte.
        let content = [10, 20, 30, 255, 40, 50, 60, 255, 99];
        let mut chunks = model_chunks([1, 1, 1], &[[0, 0, 0, 2]]);
        chunks.push(chunk(b"RGBA", &content, &[]));
        let data = VoxData::decode(&vox_file(&chunks)).unwrap();

        assert_eq!(data.palette_source(), PaletteSource::File);
        assert_eq!(data.palette().get(0), Rgba::TRANSPARENT);
        assert_eq!(data.palette().get(1), Rgba::new(10, 20, 30, 255));
        assert_eq!(data.palette().get(2), Rgba::new(40, 50, 60, 255));
        assert!((3..=255u8).all(|i| data.palette().get(i) == Rgba::TRANSPARENT));
    }

    #[test]
    fn test_multiple_models_in_order() {
        let bytes = vox_file(&[
            size_chunk([1, 1, 1]),
            xyzi_chunk(&[[0, 0, 0, 1]]),
            size_chunk([2, 2, 2]),
            xyzi_chunk(&[[1, 1, 1, 2]]),
            xyzi_chunk(&[[0, 1, 0, 3]]),
        ]);
        let data = VoxData::decode(&bytes).unwrap();

        assert_eq!(data.models().len(), 2);
        assert_eq!(data.models()[0].voxels().len(), 1);
        assert_eq!(data.models()[1].size_x(), 2);
        assert_eq!(data.models()[1].voxels().len(), 2);
    }

    #[test]
    fn test_unknown_chunks_are_skipped() {
        let nested = chunk(b"nTRN", &[1, 2, 3, 4], &chunk(b"nGRP", &[0; 8], &[]));
        let bytes = vox_file(&[
            chunk(b"PACK", &1u32.to_le_bytes(), &[]),
            size_chunk([1, 1, 1]),
            nested,
            xyzi_chunk(&[[0, 0, 0, 5]]),
        ]);
        let data = VoxData::decode(&bytes).unwrap();

        assert_eq!(data.models()[0].voxels(), &[Voxel::new(0, 0, 0, 5)]);
    }

    #[test]
    fn test_bad_magic_is_format_error() {
        let mut bytes = vox_file(&[size_chunk([1, 1, 1])]);
        bytes[0] = b'X';
        assert!(matches!(VoxData::decode(&bytes), Err(SpriteError::Format(_))));
        assert!(matches!(VoxData::decode(b"invalid"), Err(SpriteError::Format(_))));
    }

    #[test]
    fn test_wrong_version_is_rejected() {
        let mut bytes = vox_file(&[size_chunk([1, 1, 1])]);
        bytes[4..8].copy_from_slice(&200u32.to_le_bytes());
        assert!(matches!(
            VoxData::decode(&bytes),
            Err(SpriteError::UnsupportedVersion(200))
        ));
    }

    #[test]
    fn test_voxel_count_past_end_is_truncated() {
        // Claims 3 voxels, carries 1.
        let mut content = 3u32.to_le_bytes().to_vec();
        content.extend_from_slice(&[0, 0, 0, 1]);
        let bytes = vox_file(&[size_chunk([1, 1, 1]), chunk(b"XYZI", &content, &[])]);

        assert!(matches!(
            VoxData::decode(&bytes),
            Err(SpriteError::Truncated { needed: 12, available: 4, .. })
        ));
    }

    #[test]
    fn test_content_length_past_end_is_truncated() {
        let mut bytes = vox_file(&[size_chunk([1, 1, 1])]);
        bytes.truncate(bytes.len() - 4);
        assert!(matches!(VoxData::decode(&bytes), Err(SpriteError::Truncated { .. })));
    }

    #[test]
    fn test_short_chunk_header_is_format_error() {
        let mut bytes = vox_file(&[size_chunk([1, 1, 1])]);
        bytes.extend_from_slice(b"XYZ");
        assert!(matches!(VoxData::decode(&bytes), Err(SpriteError::Format(_))));
    }

    #[test]
    fn test_voxels_before_size_rejected() {
        let bytes = vox_file(&[xyzi_chunk(&[[0, 0, 0, 1]])]);
        assert!(matches!(VoxData::decode(&bytes), Err(SpriteError::Format(_))));
    }

    #[test]
    fn test_voxel_outside_model_rejected() {
        let bytes = vox_file(&model_chunks([2, 2, 2], &[[0, 0, 2, 1]]));
        assert!(matches!(
            VoxData::decode(&bytes),
            Err(SpriteError::InvalidModel(_))
        ));
    }

    #[test]
    fn test_header_only_has_no_models() {
        let mut bytes = b"VOX ".to_vec();
        bytes.extend_from_slice(&150u32.to_le_bytes());
        let data = VoxData::decode(&bytes).unwrap();
        assert!(data.models().is_empty());
    }
}
