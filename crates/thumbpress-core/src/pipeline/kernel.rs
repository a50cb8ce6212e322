//! Bicubic sampling kernel.
//!
//! Each destination pixel is resampled from a 4x4 neighborhood of source
//! pixels using separable cubic convolution:
//!
//! ```text
//! w(t) =  1.5|t|^3 - 2.5|t|^2 + 1            for |t| <= 1
//!      = -0.5|t|^3 + 2.5|t|^2 - 4|t| + 2     for 1 < |t| <= 2
//!      =  0                                   otherwise
//! ```
//!
//! Neighbor coordinates are clamped into bounds (edge replication), so the
//! sampler never reads outside the source raster. Channels, including
//! alpha, are interpolated independently.

use crate::raster::Raster;

/// Widening factor from 8-bit to 16-bit-scaled channel values
/// (255 * 257 = 65535).
const CHANNEL_SCALE: f64 = 257.0;

/// Cubic convolution weight for a sample at distance `t` from the
/// interpolation point.
#[inline]
pub fn cubic_weight(t: f64) -> f64 {
    let t = t.abs();
    if t <= 1.0 {
        1.5 * t * t * t - 2.5 * t * t + 1.0
    } else if t <= 2.0 {
        -0.5 * t * t * t + 2.5 * t * t - 4.0 * t + 2.0
    } else {
        0.0
    }
}

/// Sample the source raster at a real-valued coordinate.
///
/// `src_x`/`src_y` are in source pixel units; the integer part selects the
/// 4x4 neighborhood and the fractional part positions the kernel within it.
/// The weighted sum runs over 16-bit-scaled samples and is rescaled back to
/// 8 bits, rounded to nearest and clamped.
pub fn sample_bicubic(src: &Raster, src_x: f64, src_y: f64) -> [u8; 4] {
    let x1 = src_x.floor() as i64;
    let y1 = src_y.floor() as i64;
    let dx = src_x - x1 as f64;
    let dy = src_y - y1 as f64;

    let mut acc = [0.0f64; 4];
    for j in 0..4i64 {
        let wy = cubic_weight(j as f64 - 1.0 - dy);
        if wy == 0.0 {
            continue;
        }
        for i in 0..4i64 {
            let w = cubic_weight(i as f64 - 1.0 - dx) * wy;
            if w == 0.0 {
                continue;
            }
            let px = src.pixel_clamped(x1 + i - 1, y1 + j - 1);
            for (c, a) in acc.iter_mut().enumerate() {
                *a += w * f64::from(px[c]) * CHANNEL_SCALE;
            }
        }
    }

    let mut out = [0u8; 4];
    for (c, a) in acc.iter().enumerate() {
        out[c] = (a / CHANNEL_SCALE).round().clamp(0.0, 255.0) as u8;
    }
    out
}
