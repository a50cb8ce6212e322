//! JPEG back-end via the `image` crate's encoder.
//!
//! JPEG has no alpha channel, so the RGBA destination buffer is flattened
//! to RGB before encoding. Alpha is simply dropped; compositing against a
//! background is the caller's concern.

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;

use super::EncodeError;

/// Encode RGBA pixel data to JPEG bytes, discarding alpha.
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
/// Returns [`EncodeError::EncodingFailed`] if the underlying encoder fails.
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: f32,
) -> Result<Vec<u8>, EncodeError> {
    // The image crate takes quality as 1-100
    let quality = (quality.round() as u8).clamp(1, 100);

    let rgb: Vec<u8> = pixels
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();

    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder
        .write_image(&rgb, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}
