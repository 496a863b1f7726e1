//! # Side Projector
//!
//! Maps a model's voxels onto the oblique `(u, v, w)` lattice for one of the
//! four viewing sides.
//!
//! ## Lattice
//!
//! ```text
//! u = offset_u + vx - vy            column (two pixels wide)
//! v = offset_v - vx - vy - 2z       row
//! w = offset_w + vx + vy - z        depth, smaller is nearer the viewer
//!
//!   offset_u = size_y - 1 (East/West) | size_x - 1 (South/North)
//!   offset_v = size_v - 4
//!   offset_w = size_z - 1
//! ```
//!
//! Each voxel deposits three faces, each covering two lattice cells at the
//! same depth:
//!
//! ```text
//!        u   u+1
//!   v    T    T
//!   v+1  L    R
//!   v+2  L    R
//! ```

use crate::vox::{Model, Voxel};

/// Viewing side, in 90° steps around the vertical axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Side {
    /// Identity rotation.
    East = 0,
    /// Rotated 90°.
    South = 1,
    /// Rotated 180°.
    West = 2,
    /// Rotated 270°.
    North = 3,
}

impl Side {
    /// All sides in sprite sheet order.
    pub const ALL: [Side; 4] = [Side::East, Side::South, Side::West, Side::North];

    /// Position of this side in the sheet, 0..4.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Lower-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Side::East => "east",
            Side::South => "south",
            Side::West => "west",
            Side::North => "north",
        }
    }

    /// South and North swap the X and Y extents.
    #[inline]
    #[must_use]
    pub const fn swaps_axes(self) -> bool {
        self.index() % 2 == 1
    }

    /// Rotates a voxel's `(x, y)` into view space `(vx, vy)`.
    #[inline]
    #[must_use]
    pub fn rotate(self, model: &Model, voxel: &Voxel) -> (i32, i32) {
        let x = i32::from(voxel.x);
        let y = i32::from(voxel.y);
        let sx = model.size_x() as i32;
        let sy = model.size_y() as i32;
        match self {
            Side::East => (x, y),
            Side::South => (y, sx - x - 1),
            Side::West => (sx - x - 1, sy - y - 1),
            Side::North => (sy - y - 1, x),
        }
    }

    /// Model extent running down-right from the top corner in this view.
    #[inline]
    #[must_use]
    pub const fn right_extent(self, model: &Model) -> u32 {
        if self.swaps_axes() {
            model.size_y()
        } else {
            model.size_x()
        }
    }

    /// Model extent running down-left from the top corner in this view.
    #[inline]
    #[must_use]
    pub const fn left_extent(self, model: &Model) -> u32 {
        if self.swaps_axes() {
            model.size_x()
        } else {
            model.size_y()
        }
    }
}

/// Which cube face a surface patch shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Face {
    /// Upward face, unshaded.
    Top = 0,
    /// Right-hand face, shaded by a third.
    Right = 1,
    /// Left-hand face, shaded by two thirds.
    Left = 2,
}

impl Face {
    /// Fraction of lightness removed when shading this face.
    #[inline]
    #[must_use]
    pub fn darkening(self) -> f64 {
        f64::from(self as u8) / 3.0
    }
}

/// One visible unit of a cube face at a lattice cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SurfacePatch {
    /// Palette index of the voxel it came from.
    pub color_index: u8,
    /// Face it represents.
    pub face: Face,
}

#[derive(Clone, Copy, Debug)]
struct Deposit {
    w: u32,
    patch: SurfacePatch,
}

/// Surface patches of one model seen from one side.
///
/// Cells are addressed by column `u`, row `v` and depth `w`. A `(u, v)` pair
/// can hold patches at several depths; a second deposit at the same depth
/// replaces the first.
#[derive(Clone, Debug)]
pub struct Lattice {
    side: Side,
    size_u: usize,
    rows: usize,
    depth: usize,
    size_v: usize,
    right_extent: usize,
    left_extent: usize,
    /// Row-major by `(u, v)`; each column sorted by `w`.
    columns: Vec<Vec<Deposit>>,
}

impl Lattice {
    /// Projects every voxel of `model` as seen from `side`.
    #[must_use]
    pub fn project(model: &Model, side: Side) -> Self {
        let size_u = model.size_u() as usize;
        let size_v = model.size_v() as usize;
        let rows = size_v - 1;
        let mut lattice = Self {
            side,
            size_u,
            rows,
            depth: (model.size_x() + model.size_y() + model.size_z()) as usize - 2,
            size_v,
            right_extent: side.right_extent(model) as usize,
            left_extent: side.left_extent(model) as usize,
            columns: vec![Vec::new(); size_u * rows],
        };

        let offset_u = side.left_extent(model) as i32 - 1;
        let offset_v = size_v as i32 - 4;
        let offset_w = model.size_z() as i32 - 1;

        for voxel in model.voxels() {
            let (vx, vy) = side.rotate(model, voxel);
            let z = i32::from(voxel.z);

            // Non-negative and in range for any voxel inside the model.
            let u = (offset_u + vx - vy) as usize;
            let v = (offset_v - vx - vy - 2 * z) as usize;
            let w = (offset_w + vx + vy - z) as u32;

            let top = SurfacePatch { color_index: voxel.color_index, face: Face::Top };
            let left = SurfacePatch { color_index: voxel.color_index, face: Face::Left };
            let right = SurfacePatch { color_index: voxel.color_index, face: Face::Right };

            lattice.deposit(u, v, w, top);
            lattice.deposit(u + 1, v, w, top);
            lattice.deposit(u, v + 1, w, left);
            lattice.deposit(u, v + 2, w, left);
            lattice.deposit(u + 1, v + 1, w, right);
            lattice.deposit(u + 1, v + 2, w, right);
        }

        lattice
    }

    fn deposit(&mut self, u: usize, v: usize, w: u32, patch: SurfacePatch) {
        debug_assert!(u < self.size_u && v < self.rows && (w as usize) < self.depth);
        let column = &mut self.columns[u * self.rows + v];
        match column.binary_search_by_key(&w, |d| d.w) {
            Ok(i) => column[i].patch = patch,
            Err(i) => column.insert(i, Deposit { w, patch }),
        }
    }

    /// Side this lattice was projected for.
    #[inline]
    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    /// Number of columns (`size_u`).
    #[inline]
    #[must_use]
    pub const fn size_u(&self) -> usize {
        self.size_u
    }

    /// Number of rows (`size_v - 1`).
    #[inline]
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of depth layers.
    #[inline]
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Height of the pixel block this lattice rasterizes to.
    #[inline]
    #[must_use]
    pub const fn size_v(&self) -> usize {
        self.size_v
    }

    /// Rows of column `u` that can hold patches: the silhouette of the
    /// bounding box under this projection.
    #[must_use]
    pub fn row_span(&self, u: usize) -> std::ops::Range<usize> {
        let u = u as isize;
        let right = self.right_extent as isize;
        let left = self.left_extent as isize;
        let start = (right - u - 1).max(u - right);
        let end = self.size_v as isize - (left - u - 1).max(u - left) - 1;
        let end = end.min(self.rows as isize);
        start.max(0) as usize..end.max(start).max(0) as usize
    }

    /// Patch at an exact cell, if any.
    #[cfg(test)]
    fn patch_at(&self, u: usize, v: usize, w: usize) -> Option<SurfacePatch> {
        self.ray(u, v).find(|&(depth, _)| depth == w).map(|(_, patch)| patch)
    }

    /// Occupied depths of column `(u, v)` with their patches, nearest first.
    pub fn ray(&self, u: usize, v: usize) -> impl Iterator<Item = (usize, SurfacePatch)> + '_ {
        self.column(u, v).iter().map(|d| (d.w as usize, d.patch))
    }

    /// The nearest patch along column `(u, v)`: the first occupied depth when
    /// scanning `w` upward.
    #[must_use]
    pub fn nearest(&self, u: usize, v: usize) -> Option<SurfacePatch> {
        self.ray(u, v).next().map(|(_, patch)| patch)
    }

    /// Total occupied `(u, v, w)` cells.
    #[must_use]
    pub fn populated_cells(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    fn column(&self, u: usize, v: usize) -> &[Deposit] {
        if u >= self.size_u || v >= self.rows {
            return &[];
        }
        &self.columns[u * self.rows + v]
    }
}
