//! Destination-raster tiling for the worker pool.
//!
//! The destination rectangle is partitioned into small half-open tiles in
//! row-major scan order. The partition is exact: every destination pixel
//! belongs to exactly one tile, which is what lets workers write the shared
//! destination buffer without any locking.

use serde::{Deserialize, Serialize};

/// Default tile edge length in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 16;

/// A rectangular, half-open write region of the destination raster:
/// `[start_x, end_x) x [start_y, end_y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub start_x: u32,
    pub end_x: u32,
    pub start_y: u32,
    pub end_y: u32,
}

impl Tile {
    /// Number of pixels covered by this tile.
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.end_x - self.start_x) * u64::from(self.end_y - self.start_y)
    }
}

/// Partition `[0, width) x [0, height)` into tiles of at most
/// `tile_size x tile_size` pixels, in row-major scan order.
///
/// Boundary tiles are truncated to the raster edge. A `tile_size` of zero
/// is treated as 1 rather than looping forever.
pub fn tile_grid(width: u32, height: u32, tile_size: u32) -> Vec<Tile> {
    let tile_size = tile_size.max(1);
    let cols = width.div_ceil(tile_size) as usize;
    let rows = height.div_ceil(tile_size) as usize;

    let mut tiles = Vec::with_capacity(cols * rows);
    let mut start_y = 0;
    while start_y < height {
        let end_y = (start_y + tile_size).min(height);
        let mut start_x = 0;
        while start_x < width {
            let end_x = (start_x + tile_size).min(width);
            tiles.push(Tile {
                start_x,
                end_x,
                start_y,
                end_y,
            });
            start_x = end_x;
        }
        start_y = end_y;
    }
    tiles
}
