//! Lossy encoding of finished destination rasters.
//!
//! The pipeline historically went through more than one compressor for the
//! same role, so the back-end is a configuration point rather than a
//! hard-wired call: [`OutputFormat`] selects the container, [`encode`]
//! dispatches. Both back-ends are lossy; there is no lossless path in this
//! design.

mod jpeg;
mod webp;

pub use self::jpeg::encode_jpeg;
pub use self::webp::encode_webp;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::raster::Raster;

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying compressor reported an error
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// Lossy output container for encoded thumbnails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Lossy WebP (photographic preset, high-effort compression).
    #[default]
    WebP,
    /// Baseline JPEG via the `image` crate.
    Jpeg,
}

impl OutputFormat {
    /// MIME type of the encoded byte stream.
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::WebP => "image/webp",
            OutputFormat::Jpeg => "image/jpeg",
        }
    }

    /// Conventional file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::WebP => "webp",
            OutputFormat::Jpeg => "jpg",
        }
    }
}

/// Encode a finished raster into a lossy byte stream.
///
/// `quality` is clamped into `[0, 100]`. The output is self-contained,
/// independently decodable compressed data; a failed call returns an error
/// and no bytes, never a partial stream.
///
/// # Errors
///
/// Returns [`EncodeError::InvalidDimensions`] or
/// [`EncodeError::InvalidPixelData`] on malformed input, and
/// [`EncodeError::EncodingFailed`] with the underlying cause when the
/// compressor itself fails.
pub fn encode(raster: &Raster, format: OutputFormat, quality: f32) -> Result<Vec<u8>, EncodeError> {
    if raster.width == 0 || raster.height == 0 {
        return Err(EncodeError::InvalidDimensions {
            width: raster.width,
            height: raster.height,
        });
    }

    let expected_len = (raster.width as usize) * (raster.height as usize) * 4;
    if raster.pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: raster.pixels.len(),
        });
    }

    let quality = quality.clamp(0.0, 100.0);

    match format {
        OutputFormat::WebP => encode_webp(&raster.pixels, raster.width, raster.height, quality),
        OutputFormat::Jpeg => encode_jpeg(&raster.pixels, raster.width, raster.height, quality),
    }
}
