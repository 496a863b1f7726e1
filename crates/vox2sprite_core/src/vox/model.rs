//! Decoded voxel models.

use bytemuck::{Pod, Zeroable};

use crate::error::{SpriteError, SpriteResult};

/// Largest dimension a model may declare. Voxel coordinates are bytes, so
/// anything larger could never be filled.
pub const MAX_MODEL_SIZE: u32 = 256;

/// Single voxel. Layout matches the on-disk `XYZI` record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct Voxel {
    /// X position.
    pub x: u8,
    /// Y position.
    pub y: u8,
    /// Z position (up).
    pub z: u8,
    /// Color index (palette reference).
    pub color_index: u8,
}

impl Voxel {
    /// Creates a voxel.
    #[inline]
    #[must_use]
    pub const fn new(x: u8, y: u8, z: u8, color_index: u8) -> Self {
        Self { x, y, z, color_index }
    }
}

/// A voxel model: bounding box plus voxels, immutable once built.
///
/// The lattice extents `size_u` and `size_v` are derived on demand and never
/// stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Model {
    size_x: u32,
    size_y: u32,
    size_z: u32,
    voxels: Vec<Voxel>,
}

impl Model {
    /// Creates a model, rejecting zero or oversized dimensions and voxels
    /// outside the bounding box.
    ///
    /// # Errors
    ///
    /// Returns [`SpriteError::InvalidModel`] describing the first problem.
    pub fn new(size_x: u32, size_y: u32, size_z: u32, voxels: Vec<Voxel>) -> SpriteResult<Self> {
        check_dimensions([size_x, size_y, size_z]).map_err(SpriteError::InvalidModel)?;
        let model = Self::from_parts([size_x, size_y, size_z], voxels);
        if let Some(voxel) = model.voxels.iter().find(|v| !model.contains(v)) {
            return Err(SpriteError::InvalidModel(format!(
                "voxel ({}, {}, {}) outside {size_x}x{size_y}x{size_z}",
                voxel.x, voxel.y, voxel.z
            )));
        }
        Ok(model)
    }

    /// Assembles a model the decoder has already validated.
    pub(crate) fn from_parts(size: [u32; 3], voxels: Vec<Voxel>) -> Self {
        Self {
            size_x: size[0],
            size_y: size[1],
            size_z: size[2],
            voxels,
        }
    }

    /// Width along X.
    #[inline]
    #[must_use]
    pub const fn size_x(&self) -> u32 {
        self.size_x
    }

    /// Depth along Y.
    #[inline]
    #[must_use]
    pub const fn size_y(&self) -> u32 {
        self.size_y
    }

    /// Height along Z.
    #[inline]
    #[must_use]
    pub const fn size_z(&self) -> u32 {
        self.size_z
    }

    /// Lattice columns: `size_x + size_y`.
    #[inline]
    #[must_use]
    pub const fn size_u(&self) -> u32 {
        self.size_x + self.size_y
    }

    /// Pixel block height: `size_x + size_y + 2 * size_z`.
    #[inline]
    #[must_use]
    pub const fn size_v(&self) -> u32 {
        self.size_x + self.size_y + 2 * self.size_z
    }

    /// Voxels in file order.
    #[inline]
    #[must_use]
    pub fn voxels(&self) -> &[Voxel] {
        &self.voxels
    }

    /// Returns true if `voxel` lies inside the bounding box.
    #[inline]
    #[must_use]
    pub fn contains(&self, voxel: &Voxel) -> bool {
        u32::from(voxel.x) < self.size_x
            && u32::from(voxel.y) < self.size_y
            && u32::from(voxel.z) < self.size_z
    }
}

/// Checks that every dimension is in `1..=MAX_MODEL_SIZE`.
pub(crate) fn check_dimensions(size: [u32; 3]) -> Result<(), String> {
    if size.iter().any(|&d| d == 0 || d > MAX_MODEL_SIZE) {
        return Err(format!(
            "dimensions {}x{}x{} outside 1..={MAX_MODEL_SIZE}",
            size[0], size[1], size[2]
        ));
    }
    Ok(())
}
