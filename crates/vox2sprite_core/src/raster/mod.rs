//! # Ray Resolver & Shader
//!
//! Turns one `(model, side)` lattice into an RGBA pixel block.
//!
//! For every lattice column the nearest patch wins. It is shaded by face and
//! drawn as a double-height pixel: two vertically stacked copies at
//! `x = 2u` or `x = 2u + 1`, alternating with the parity of `u`, `v` and the
//! right-hand extent. Empty columns stay transparent.

mod shading;

pub use shading::{shade, ShadingModel};

use crate::projection::{Lattice, Side};
use crate::vox::{Model, Palette, Rgba};

/// Bytes per RGBA8 pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Row-major RGBA8 pixel buffer with a top-left origin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBlock {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl PixelBlock {
    /// Creates a fully transparent block.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height * BYTES_PER_PIXEL],
        }
    }

    /// Width in pixels.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Raw RGBA bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Bytes of one pixel row.
    #[must_use]
    pub fn row(&self, y: usize) -> &[u8] {
        let stride = self.width * BYTES_PER_PIXEL;
        &self.data[y * stride..(y + 1) * stride]
    }

    /// Pixel at `(x, y)`.
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> Rgba {
        let start = (y * self.width + x) * BYTES_PER_PIXEL;
        *bytemuck::from_bytes(&self.data[start..start + BYTES_PER_PIXEL])
    }

    /// Iterates over all pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Rgba> + '_ {
        bytemuck::cast_slice::<u8, Rgba>(&self.data).iter().copied()
    }

    /// Writes `color` at `(x, y)` and `(x, y + 1)`.
    fn put_double_height(&mut self, x: usize, y: usize, color: Rgba) {
        for row in [y, y + 1] {
            let start = (row * self.width + x) * BYTES_PER_PIXEL;
            self.data[start..start + BYTES_PER_PIXEL].copy_from_slice(bytemuck::bytes_of(&color));
        }
    }
}

/// Renders `(model, side)` pairs against one palette.
#[derive(Clone, Copy, Debug)]
pub struct FrameRenderer<'a> {
    palette: &'a Palette,
    shading: ShadingModel,
}

impl<'a> FrameRenderer<'a> {
    /// Creates a renderer.
    #[must_use]
    pub const fn new(palette: &'a Palette, shading: ShadingModel) -> Self {
        Self { palette, shading }
    }

    /// Projects and rasterizes one side of a model.
    ///
    /// The block is `2 * size_u` wide and `size_v` tall.
    #[must_use]
    pub fn render(&self, model: &Model, side: Side) -> PixelBlock {
        let lattice = Lattice::project(model, side);
        tracing::trace!(
            side = side.name(),
            cells = lattice.populated_cells(),
            "projected model"
        );
        self.rasterize(&lattice, side.right_extent(model) as usize)
    }

    /// Resolves every column of a lattice into pixels.
    #[must_use]
    pub fn rasterize(&self, lattice: &Lattice, right_extent: usize) -> PixelBlock {
        let mut block = PixelBlock::new(lattice.size_u() * 2, lattice.size_v());

        for u in 0..lattice.size_u() {
            for v in lattice.row_span(u) {
                let Some(patch) = lattice.nearest(u, v) else {
                    continue;
                };
                let color = shade(self.palette.get(patch.color_index), patch.face, self.shading);
                let toggle = (right_extent ^ v ^ u) & 1;
                block.put_double_height(u * 2 + toggle, v, color);
            }
        }

        block
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vox::Voxel;

    fn renderer(palette: &Palette) -> FrameRenderer<'_> {
        FrameRenderer::new(palette, ShadingModel::Hsl)
    }

    #[test]
    fn test_block_dimensions() {
        let palette = Palette::default();
        let model = Model::new(3, 5, 2, vec![Voxel::new(1, 1, 1, 1)]).unwrap();

        for side in Side::ALL {
            let block = renderer(&palette).render(&model, side);
            assert_eq!(block.width(), 16);
            assert_eq!(block.height(), 12);
            assert_eq!(block.as_bytes().len(), 16 * 12 * 4);
        }
    }

    #[test]
    fn test_single_voxel_cube_shape() {
        // 1x1x1: right extent 1 is odd, so column 0 starts at x = 1.
        let palette = Palette::from_entries(&[Rgba::new(150, 150, 150, 255)]);
        let model = Model::new(1, 1, 1, vec![Voxel::new(0, 0, 0, 1)]).unwrap();
        let block = renderer(&palette).render(&model, Side::East);

        let top = Rgba::new(150, 150, 150, 255);
        let right = Rgba::new(100, 100, 100, 255);
        let left = Rgba::new(50, 50, 50, 255);
        let clear = Rgba::TRANSPARENT;

        let expected = [
            [clear, top, top, clear],
            [left, top, top, right],
            [left, left, right, right],
            [clear, left, right, clear],
        ];
        for (y, row) in expected.iter().enumerate() {
            for (x, &color) in row.iter().enumerate() {
                assert_eq!(block.pixel(x, y), color, "pixel ({x}, {y})");
            }
        }
    }

    /// Compares a block against rows of `.` (clear), `T`, `R` and `L` for
    /// the three shades of palette grey 150.
    fn assert_pattern(block: &PixelBlock, rows: &[&str]) {
        assert_eq!(block.height(), rows.len());
        for (y, row) in rows.iter().enumerate() {
            assert_eq!(block.width(), row.len(), "row {y}");
            for (x, cell) in row.chars().enumerate() {
                let expected = match cell {
                    'T' => Rgba::new(150, 150, 150, 255),
                    'R' => Rgba::new(100, 100, 100, 255),
                    'L' => Rgba::new(50, 50, 50, 255),
                    _ => Rgba::TRANSPARENT,
                };
                assert_eq!(block.pixel(x, y), expected, "pixel ({x}, {y})");
            }
        }
    }

    fn grey_palette() -> Palette {
        Palette::from_entries(&[Rgba::new(150, 150, 150, 255)])
    }

    #[test]
    fn test_even_right_extent_east() {
        // 2x1x1 from the east: right extent 2 is even, so column 0 starts
        // at x = 1 only on odd rows.
        let palette = grey_palette();
        let near = Model::new(2, 1, 1, vec![Voxel::new(0, 0, 0, 1)]).unwrap();
        let far = Model::new(2, 1, 1, vec![Voxel::new(1, 0, 0, 1)]).unwrap();

        assert_pattern(
            &renderer(&palette).render(&near, Side::East),
            &["......", ".TT...", "LTTR..", "LLRR..", ".LR..."],
        );
        assert_pattern(
            &renderer(&palette).render(&far, Side::East),
            &["...TT.", "..LTTR", "..LLRR", "...LR.", "......"],
        );
    }

    #[test]
    fn test_right_extent_from_size_y_south() {
        // 2x1x1 from the south: right extent is size_y = 1.
        let palette = grey_palette();
        let low_x = Model::new(2, 1, 1, vec![Voxel::new(0, 0, 0, 1)]).unwrap();
        let high_x = Model::new(2, 1, 1, vec![Voxel::new(1, 0, 0, 1)]).unwrap();

        assert_pattern(
            &renderer(&palette).render(&low_x, Side::South),
            &[".TT...", "LTTR..", "LLRR..", ".LR...", "......"],
        );
        assert_pattern(
            &renderer(&palette).render(&high_x, Side::South),
            &["......", "...TT.", "..LTTR", "..LLRR", "...LR."],
        );
    }

    #[test]
    fn test_empty_model_is_transparent() {
        let palette = Palette::default();
        let model = Model::new(4, 4, 4, Vec::new()).unwrap();
        let block = renderer(&palette).render(&model, Side::North);
        assert!(block.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_render_is_deterministic() {
        let palette = Palette::default();
        let voxels = (0..4u8).map(|i| Voxel::new(i, 3 - i, i % 2, 10 + i)).collect();
        let model = Model::new(4, 4, 2, voxels).unwrap();

        for side in Side::ALL {
            let first = renderer(&palette).render(&model, side);
            let second = renderer(&palette).render(&model, side);
            assert_eq!(first, second);
        }
    }
}
