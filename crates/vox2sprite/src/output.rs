//! Writing the sheet image and its manifest.

use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;

use anyhow::{anyhow, ensure, Context, Result};
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};
use vox2sprite_core::{SpriteSheet, BYTES_PER_PIXEL};

/// Encodes the sheet as an RGBA8 PNG at `path`.
///
/// A file left half-written by a failed encode is removed.
pub fn write_sheet_png(path: &Path, sheet: &SpriteSheet) -> Result<()> {
    let width = u32::try_from(sheet.width()).context("sheet too wide for PNG")?;
    let height = u32::try_from(sheet.height()).context("sheet too tall for PNG")?;
    let expected = sheet
        .width()
        .checked_mul(sheet.height())
        .and_then(|px| px.checked_mul(BYTES_PER_PIXEL))
        .ok_or_else(|| anyhow!("sheet dimensions overflow"))?;
    ensure!(
        sheet.as_bytes().len() == expected,
        "sheet buffer holds {} bytes, expected {expected}",
        sheet.as_bytes().len()
    );

    let file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    let encoded = encode_png(BufWriter::new(file), sheet.as_bytes(), width, height);
    if let Err(err) = encoded {
        discard(path);
        return Err(err.context(format!("failed to write {}", path.display())));
    }
    Ok(())
}

/// Writes the PNG and, when `manifest` is set, the JSON manifest.
///
/// Either every requested file is written or none is left behind.
pub fn write_outputs(png: &Path, manifest: Option<&Path>, sheet: &SpriteSheet) -> Result<()> {
    write_sheet_png(png, sheet)?;
    if let Some(manifest) = manifest {
        if let Err(err) = write_manifest(manifest, sheet) {
            discard(manifest);
            discard(png);
            return Err(err);
        }
    }
    Ok(())
}

/// Removes a file this run created.
fn discard(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(remove_err) => {
            tracing::warn!(path = %path.display(), %remove_err, "could not remove partial output");
        }
    }
}

fn encode_png<W: Write>(mut writer: W, data: &[u8], width: u32, height: u32) -> Result<()> {
    PngEncoder::new_with_quality(&mut writer, CompressionType::Default, FilterType::Adaptive)
        .write_image(data, width, height, ExtendedColorType::Rgba8)
        .context("PNG encoding failed")?;
    writer.flush().context("flushing PNG data failed")?;
    Ok(())
}

/// Writes the sheet layout as pretty JSON.
pub fn write_manifest(path: &Path, sheet: &SpriteSheet) -> Result<()> {
    let json = serde_json::to_string_pretty(&sheet.manifest()).context("serializing manifest")?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}
