//! Board-space geometry: world points, cell centers, and image tiles.
//!
//! The engine reasons in (row, col) cells; everything here converts between
//! that space and the world/pixel spaces presentation lives in. World space
//! is y-up with the board centered on a configurable point; image space is
//! pixel rows counted from the bottom, so tile rectangles flip the row axis.

use crate::coord::Coordinate;

/// Placement and cell metrics of a board in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardLayout {
    center: (f32, f32),
    width: f32,
    height: f32,
    cell_width: f32,
    cell_height: f32,
    rows: usize,
    cols: usize,
}

impl BoardLayout {
    pub fn new(center: (f32, f32), width: f32, height: f32, rows: usize, cols: usize) -> Self {
        assert!(rows > 0 && cols > 0, "layout needs at least one cell");
        Self {
            center,
            width,
            height,
            cell_width: width / cols as f32,
            cell_height: height / rows as f32,
            rows,
            cols,
        }
    }

    /// Derives the layout from the source image, one tile per cell.
    ///
    /// Tile sizes use integer pixel division, so a few right/bottom edge
    /// pixels may be cropped when the image does not divide evenly; the
    /// board size is the tiled size, not the raw image size.
    pub fn from_image(
        center: (f32, f32),
        image_width: u32,
        image_height: u32,
        pixels_per_unit: f32,
        rows: usize,
        cols: usize,
    ) -> Self {
        let tile_width = (image_width / cols as u32) as f32 / pixels_per_unit;
        let tile_height = (image_height / rows as u32) as f32 / pixels_per_unit;
        Self {
            center,
            width: tile_width * cols as f32,
            height: tile_height * rows as f32,
            cell_width: tile_width,
            cell_height: tile_height,
            rows,
            cols,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Maps a world-space point to the cell covering it.
    ///
    /// Returns `None` for points outside the board rectangle. Points inside
    /// are clamped into valid cell indices so edge coordinates never round
    /// out of range.
    pub fn cell_from_point(&self, point: (f32, f32)) -> Option<Coordinate> {
        let local_x = point.0 - self.center.0;
        let local_y = point.1 - self.center.1;

        let half_width = self.width / 2.0;
        let half_height = self.height / 2.0;

        if local_x < -half_width
            || local_x > half_width
            || local_y < -half_height
            || local_y > half_height
        {
            return None;
        }

        let x01 = (local_x + half_width) / self.width;
        let y01 = (half_height - local_y) / self.height;

        let col = ((x01 * self.cols as f32) as i32).clamp(0, self.cols as i32 - 1);
        let row = ((y01 * self.rows as f32) as i32).clamp(0, self.rows as i32 - 1);

        Some(Coordinate::new(row, col))
    }

    /// World-space center of a cell. Row 0 is the top row.
    pub fn cell_center(&self, coord: Coordinate) -> (f32, f32) {
        let top_left_x = self.center.0 - self.width / 2.0 + self.cell_width / 2.0;
        let top_left_y = self.center.1 + self.height / 2.0 - self.cell_height / 2.0;

        (
            top_left_x + coord.col as f32 * self.cell_width,
            top_left_y - coord.row as f32 * self.cell_height,
        )
    }
}

/// A tile of the source image, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Pixel rectangle of the image tile belonging to the piece solved at
/// `coord`.
///
/// Image pixel rows grow upward while board rows grow downward, so the top
/// board row reads from the top of the image: `y = (rows - 1 - row) * tile`.
pub fn tile_rect(
    image_width: u32,
    image_height: u32,
    rows: usize,
    cols: usize,
    coord: Coordinate,
) -> TileRect {
    let tile_width = image_width / cols as u32;
    let tile_height = image_height / rows as u32;

    TileRect {
        x: coord.col as u32 * tile_width,
        y: (rows as u32 - 1 - coord.row as u32) * tile_height,
        width: tile_width,
        height: tile_height,
    }
}
