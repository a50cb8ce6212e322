//! Color quantization for better lossy-compression ratios.
//!
//! The quantizer coarsens each pixel in ITU-R BT.601 luma/chroma space:
//! forward transform, round Y/Cb/Cr to a fixed step, inverse transform.
//! Flattening the color field this way costs a controlled amount of
//! precision and makes the downstream lossy encoder's job materially
//! cheaper. Alpha is passed through unmodified.
//!
//! The step is parameterized as kept bits of precision per component
//! (`step = 2^(8 - bits)` in 8-bit channel units) rather than a magic
//! constant.

use serde::{Deserialize, Serialize};

/// ITU-R BT.601 luma coefficient for the red channel.
pub const KR: f64 = 0.299;

/// ITU-R BT.601 luma coefficient for the green channel.
pub const KG: f64 = 0.587;

/// ITU-R BT.601 luma coefficient for the blue channel.
pub const KB: f64 = 0.114;

/// Default kept bits per Y/Cb/Cr component (32 levels, step 8).
pub const DEFAULT_PRECISION_BITS: u8 = 5;

/// Rounding passes attempted before a pixel is declared cyclic and left
/// unquantized. Gamut-edge colors settle within two or three passes.
const MAX_PASSES: usize = 8;

/// Per-pixel color quantizer operating in BT.601 luma/chroma space.
///
/// Stateless and idempotent: re-applying it to its own output leaves the
/// pixels unchanged, so it may run anywhere in a pipeline without
/// compounding loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorQuantizer {
    /// Bits of precision kept per Y/Cb/Cr component (1-8).
    bits: u8,
}

impl Default for ColorQuantizer {
    fn default() -> Self {
        Self {
            bits: DEFAULT_PRECISION_BITS,
        }
    }
}

impl ColorQuantizer {
    /// Create a quantizer keeping `bits` bits of precision per component.
    ///
    /// `bits` is clamped into 1..=8. At 8 bits the step is 1 and the
    /// transform round-trip is the only source of change.
    pub fn new(bits: u8) -> Self {
        Self {
            bits: bits.clamp(1, 8),
        }
    }

    /// Bits of precision kept per component.
    pub fn bits(&self) -> u8 {
        self.bits
    }

    /// Quantization step in 8-bit channel units.
    pub fn step(&self) -> u32 {
        1u32 << (8 - self.bits)
    }

    /// Quantize one RGBA pixel. Alpha is untouched.
    ///
    /// The result is a fixed point of the rounding pass: quantizing an
    /// already-quantized pixel returns it unchanged. A single pass does
    /// not have that property for saturated colors - when the inverse
    /// transform lands outside the RGB cube, the clamp can shift the
    /// color into a different Y/Cb/Cr bin - so the pass is iterated until
    /// it stabilizes. A pixel that never stabilizes within [`MAX_PASSES`]
    /// (a rounding cycle) is returned unquantized; re-application walks
    /// the same cycle and makes the same call, so closure holds there
    /// too.
    pub fn quantize(&self, rgba: [u8; 4]) -> [u8; 4] {
        let mut rgb = [rgba[0], rgba[1], rgba[2]];
        for _ in 0..MAX_PASSES {
            let next = self.quantize_pass(rgb);
            if next == rgb {
                return [rgb[0], rgb[1], rgb[2], rgba[3]];
            }
            rgb = next;
        }
        rgba
    }

    /// One rounding pass: forward transform, snap Y/Cb/Cr to the step
    /// lattice, inverse transform, clamp into the RGB cube.
    fn quantize_pass(&self, [r, g, b]: [u8; 3]) -> [u8; 3] {
        let step = f64::from(self.step());
        let (y, cb, cr) = rgb_to_ycbcr(r, g, b);

        let y = (y / step).round() * step;
        let cb = (cb / step).round() * step;
        let cr = (cr / step).round() * step;

        let (r, g, b) = ycbcr_to_rgb(y, cb, cr);
        [r, g, b]
    }
}

/// BT.601 full-range forward transform.
///
/// Returns `(y, cb, cr)` with Y in `[0, 255]` and Cb/Cr centered on 128.
#[inline]
pub fn rgb_to_ycbcr(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    let r = f64::from(r);
    let g = f64::from(g);
    let b = f64::from(b);

    let y = KR * r + KG * g + KB * b;
    let cb = 128.0 + (b - y) / (2.0 * (1.0 - KB));
    let cr = 128.0 + (r - y) / (2.0 * (1.0 - KR));
    (y, cb, cr)
}

/// BT.601 full-range inverse transform, rounded and clamped to `[0, 255]`.
#[inline]
pub fn ycbcr_to_rgb(y: f64, cb: f64, cr: f64) -> (u8, u8, u8) {
    let cb = cb - 128.0;
    let cr = cr - 128.0;

    let r = y + 2.0 * (1.0 - KR) * cr;
    let b = y + 2.0 * (1.0 - KB) * cb;
    let g = (y - KR * r - KB * b) / KG;

    (
        r.round().clamp(0.0, 255.0) as u8,
        g.round().clamp(0.0, 255.0) as u8,
        b.round().clamp(0.0, 255.0) as u8,
    )
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: the forward/inverse transform pair round-trips any
        /// RGB triple to within one count per channel.
        #[test]
        fn prop_transform_roundtrip(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
            let (y, cb, cr) = rgb_to_ycbcr(r, g, b);
            let (r2, g2, b2) = ycbcr_to_rgb(y, cb, cr);
            prop_assert!((i32::from(r) - i32::from(r2)).abs() <= 1);
            prop_assert!((i32::from(g) - i32::from(g2)).abs() <= 1);
            prop_assert!((i32::from(b) - i32::from(b2)).abs() <= 1);
        }

        /// Property: luma of any pixel stays within [0, 255].
        #[test]
        fn prop_luma_in_range(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
            let (y, _, _) = rgb_to_ycbcr(r, g, b);
            prop_assert!((0.0..=255.0).contains(&y));
        }

        /// Property: bins are closed under re-quantization for any color
        /// at every precision setting.
        #[test]
        fn prop_requantize_is_noop(
            r in any::<u8>(),
            g in any::<u8>(),
            b in any::<u8>(),
            a in any::<u8>(),
        ) {
            for bits in 1..=8u8 {
                let q = ColorQuantizer::new(bits);
                let once = q.quantize([r, g, b, a]);
                let twice = q.quantize(once);
                prop_assert_eq!(once, twice, "bits = {}", bits);
            }
        }

        /// Property: quantization error per channel is bounded by the step
        /// times the worst-case inverse-transform gain, with slack for the
        /// extra gamut-edge passes.
        #[test]
        fn prop_error_bounded(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
            let q = ColorQuantizer::new(5);
            let [r2, g2, b2, _] = q.quantize([r, g, b, 255]);

            let bound = (q.step() as i32) * 5;
            prop_assert!((i32::from(r) - i32::from(r2)).abs() <= bound);
            prop_assert!((i32::from(g) - i32::from(g2)).abs() <= bound);
            prop_assert!((i32::from(b) - i32::from(b2)).abs() <= bound);
        }
    }
}
