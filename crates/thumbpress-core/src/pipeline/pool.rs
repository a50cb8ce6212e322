//! Tile worker pool.
//!
//! The scheduling thread enqueues every tile of the destination raster into
//! a bounded channel, closes it, and waits for the scoped workers to drain
//! it. Workers write the shared destination buffer directly: the tile grid
//! is a disjoint partition, so no two threads ever touch the same pixel and
//! no locking is required. The scope join is the barrier after which the
//! destination is fully rendered.

use std::marker::PhantomData;
use std::thread;

use crate::pipeline::kernel::sample_bicubic;
use crate::pipeline::tiles::{tile_grid, Tile};
use crate::quantize::ColorQuantizer;
use crate::raster::Raster;

/// Shared view of the destination buffer for tile workers.
///
/// Each worker writes only the pixels of tiles it received from the queue.
/// Tiles form a disjoint partition of the raster, so writes from different
/// threads never alias; that invariant is what makes the `Sync` impl and
/// the lock-free writes below sound.
struct TileCanvas<'a> {
    ptr: *mut u8,
    width: u32,
    _dst: PhantomData<&'a mut Raster>,
}

// SAFETY: workers write disjoint pixel ranges (one tile is owned by exactly
// one worker, and tiles never overlap), and nobody reads the buffer until
// the thread scope has joined.
unsafe impl Send for TileCanvas<'_> {}
unsafe impl Sync for TileCanvas<'_> {}

impl<'a> TileCanvas<'a> {
    fn new(dst: &'a mut Raster) -> Self {
        Self {
            ptr: dst.pixels.as_mut_ptr(),
            width: dst.width,
            _dst: PhantomData,
        }
    }

    /// Write one RGBA pixel.
    ///
    /// # Safety
    ///
    /// `(x, y)` must lie inside the raster and inside a tile currently
    /// owned by the calling worker.
    #[inline]
    unsafe fn set_pixel(&self, x: u32, y: u32, rgba: [u8; 4]) {
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let dst = self.ptr.add(idx);
        std::ptr::copy_nonoverlapping(rgba.as_ptr(), dst, 4);
    }
}

/// Render one tile: bicubic-sample every destination pixel from the source,
/// optionally quantize, and write it.
fn render_tile(
    src: &Raster,
    canvas: &TileCanvas<'_>,
    tile: Tile,
    scale_x: f64,
    scale_y: f64,
    quantizer: Option<ColorQuantizer>,
) {
    for y in tile.start_y..tile.end_y {
        let src_y = f64::from(y) * scale_y;
        for x in tile.start_x..tile.end_x {
            let src_x = f64::from(x) * scale_x;
            let mut px = sample_bicubic(src, src_x, src_y);
            if let Some(q) = quantizer {
                px = q.quantize(px);
            }
            // SAFETY: (x, y) is inside this worker's tile; tiles are a
            // disjoint partition of the destination raster.
            unsafe { canvas.set_pixel(x, y, px) };
        }
    }
}

/// Resample `src` into `dst` across a pool of worker threads.
///
/// Every destination pixel is a pure function of the immutable source and
/// its own coordinates, so the result is byte-identical for any `workers`
/// count; scheduling affects wall-clock time only. Returns once the whole
/// destination raster has been written.
pub fn render_tiled(
    src: &Raster,
    dst: &mut Raster,
    tile_size: u32,
    workers: usize,
    quantizer: Option<ColorQuantizer>,
) {
    let scale_x = f64::from(src.width) / f64::from(dst.width);
    let scale_y = f64::from(src.height) / f64::from(dst.height);
    let tiles = tile_grid(dst.width, dst.height, tile_size);
    let workers = workers.max(1);

    let canvas = TileCanvas::new(dst);
    let (tx, rx) = crossbeam_channel::bounded::<Tile>(workers);

    thread::scope(|scope| {
        for _ in 0..workers {
            let rx = rx.clone();
            let canvas = &canvas;
            scope.spawn(move || {
                while let Ok(tile) = rx.recv() {
                    render_tile(src, canvas, tile, scale_x, scale_y, quantizer);
                }
            });
        }
        drop(rx);

        for tile in tiles {
            if tx.send(tile).is_err() {
                // All workers gone; the scope join below will surface the
                // panic that killed them.
                break;
            }
        }
        drop(tx);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_raster(width: u32, height: u32) -> Raster {
        let mut img = Raster::blank(width, height);
        for y in 0..height {
            for x in 0..width {
                img.set_pixel(
                    x,
                    y,
                    [
                        ((x * 255) / width.max(1)) as u8,
                        ((y * 255) / height.max(1)) as u8,
                        ((x + y) % 256) as u8,
                        255,
                    ],
                );
            }
        }
        img
    }

    /// Single-threaded reference: same per-pixel math, no pool.
    fn render_serial(src: &Raster, width: u32, height: u32) -> Raster {
        let mut dst = Raster::blank(width, height);
        let scale_x = f64::from(src.width) / f64::from(width);
        let scale_y = f64::from(src.height) / f64::from(height);
        for y in 0..height {
            for x in 0..width {
                let px = sample_bicubic(src, f64::from(x) * scale_x, f64::from(y) * scale_y);
                dst.set_pixel(x, y, px);
            }
        }
        dst
    }

    #[test]
    fn test_every_pixel_written() {
        // An all-255 source must leave no destination pixel at its zeroed
        // initial value.
        let src = Raster::filled(64, 64, [255, 255, 255, 255]);
        let mut dst = Raster::blank(30, 30);
        render_tiled(&src, &mut dst, 16, 4, None);

        assert!(dst.pixels.iter().all(|&b| b == 255));
    }

    #[test]
    fn test_matches_serial_reference() {
        let src = gradient_raster(97, 61);
        let mut dst = Raster::blank(41, 26);
        render_tiled(&src, &mut dst, 16, 4, None);

        assert_eq!(dst, render_serial(&src, 41, 26));
    }

    #[test]
    fn test_worker_count_does_not_change_output() {
        let src = gradient_raster(120, 80);

        let mut one = Raster::blank(50, 33);
        render_tiled(&src, &mut one, 16, 1, None);

        for workers in [2, 3, 8] {
            let mut many = Raster::blank(50, 33);
            render_tiled(&src, &mut many, 16, workers, None);
            assert_eq!(one, many, "output differs with {} workers", workers);
        }
    }

    #[test]
    fn test_tile_size_does_not_change_output() {
        let src = gradient_raster(90, 90);

        let mut a = Raster::blank(40, 40);
        render_tiled(&src, &mut a, 16, 4, None);

        for tile_size in [1, 5, 64] {
            let mut b = Raster::blank(40, 40);
            render_tiled(&src, &mut b, tile_size, 4, None);
            assert_eq!(a, b, "output differs with tile size {}", tile_size);
        }
    }

    #[test]
    fn test_zero_workers_treated_as_one() {
        let src = gradient_raster(32, 32);
        let mut dst = Raster::blank(16, 16);
        render_tiled(&src, &mut dst, 16, 0, None);

        assert_eq!(dst, render_serial(&src, 16, 16));
    }

    #[test]
    fn test_quantizer_applied_before_write() {
        let src = gradient_raster(64, 64);
        let q = ColorQuantizer::new(4);

        let mut plain = Raster::blank(20, 20);
        render_tiled(&src, &mut plain, 16, 2, None);

        let mut quantized = Raster::blank(20, 20);
        render_tiled(&src, &mut quantized, 16, 2, Some(q));

        for y in 0..20 {
            for x in 0..20 {
                assert_eq!(quantized.pixel(x, y), q.quantize(plain.pixel(x, y)));
            }
        }
    }
}
