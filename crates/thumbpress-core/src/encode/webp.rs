//! Lossy WebP back-end via libwebp.
//!
//! Uses the advanced configuration surface so the encoder runs with the
//! photographic content hint and the slowest/densest compression method
//! instead of libwebp's fast defaults. Fully transparent regions may be
//! altered by the compressor (`exact` stays off); this back-end is lossy by
//! contract.

use libwebp_sys::WebPImageHint;
use webp::{Encoder, WebPConfig};

use super::EncodeError;

/// libwebp `method` parameter: 0 = fast, 6 = slowest/best compression.
const COMPRESSION_METHOD: i32 = 6;

/// Encode RGBA pixel data to lossy WebP bytes.
///
/// # Arguments
///
/// * `pixels` - RGBA pixel data (4 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - Quality in `[0, 100]`, already validated by the caller
///
/// # Errors
///
/// Returns [`EncodeError::EncodingFailed`] with the libwebp error code if
/// configuration or compression fails.
pub fn encode_webp(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: f32,
) -> Result<Vec<u8>, EncodeError> {
    let mut config = WebPConfig::new()
        .map_err(|_| EncodeError::EncodingFailed("WebP config initialization failed".to_string()))?;
    config.lossless = 0;
    config.quality = quality;
    config.method = COMPRESSION_METHOD;
    config.image_hint = WebPImageHint::WEBP_HINT_PHOTO;

    let encoder = Encoder::from_rgba(pixels, width, height);
    let memory = encoder
        .encode_advanced(&config)
        .map_err(|e| EncodeError::EncodingFailed(format!("libwebp: {e:?}")))?;

    Ok(memory.to_vec())
}
