//! Thumbnail-generation pipeline.
//!
//! One invocation runs a straight line:
//!
//! ```text
//! Validate -> { PassThrough | Resample (tiles -> dispatch -> barrier) }
//!          -> Encode -> bytes | error
//! ```
//!
//! The planner decides the target dimensions (or a pass-through for budgets
//! that would not shrink the image), the worker pool renders the
//! destination raster tile by tile, and the encoder turns it into a lossy
//! byte stream. A call yields either a complete encoded buffer or an error,
//! never a partial output, and holds no state between invocations; any
//! number of calls may run concurrently.
//!
//! Fetching and decoding the source image, and storing or shipping the
//! encoded bytes, are the caller's responsibility.

mod kernel;
mod plan;
mod pool;
mod tiles;

pub use kernel::{cubic_weight, sample_bicubic};
pub use plan::{plan_dimensions, ResizePlan};
pub use pool::render_tiled;
pub use tiles::{tile_grid, Tile, DEFAULT_TILE_SIZE};

use std::num::NonZeroUsize;
use std::thread;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::encode::{encode, EncodeError, OutputFormat};
use crate::quantize::ColorQuantizer;
use crate::raster::Raster;

/// Pixel budget of the small grid thumbnail (the original service's
/// `tmb03` output).
pub const BUDGET_SMALL: u64 = 300_000;

/// Pixel budget of the large preview thumbnail (the original service's
/// `tmb20` output).
pub const BUDGET_LARGE: u64 = 2_000_000;

/// Errors surfaced by a pipeline invocation.
#[derive(Debug, Error)]
pub enum ThumbnailError {
    /// Source dimensions or pixel budget are unusable.
    #[error("Invalid resize input: {reason}")]
    InvalidInput { reason: String },

    /// The encoder failed; the underlying cause is attached.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Per-invocation resize parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThumbnailRequest {
    /// Pixel-area budget for the output (aspect ratio is preserved).
    pub target_pixels: u64,
    /// Encoder quality in `[0, 100]`.
    pub quality: f32,
}

impl ThumbnailRequest {
    pub fn new(target_pixels: u64, quality: f32) -> Self {
        Self {
            target_pixels,
            quality,
        }
    }
}

/// Reusable pipeline configuration.
///
/// Tile size and worker count are deliberately explicit here instead of
/// hidden constants, so tests can pin `workers` to 1 and compare against
/// multi-threaded runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipelineOptions {
    /// Tile edge length for the chunk scheduler.
    pub tile_size: u32,
    /// Worker thread count; 0 is treated as 1.
    pub workers: usize,
    /// Output container.
    pub format: OutputFormat,
    /// Optional color-coarsening stage between sampling and the
    /// destination write.
    pub quantizer: Option<ColorQuantizer>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            workers: detected_parallelism(),
            format: OutputFormat::default(),
            quantizer: None,
        }
    }
}

/// Worker count derived from available hardware parallelism.
pub fn detected_parallelism() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Generate one encoded thumbnail from a decoded source raster.
///
/// The source is only read for the duration of the call. When the budget
/// does not shrink the image the source is re-encoded verbatim (upscaling
/// is never performed); otherwise a fresh destination raster is rendered by
/// the tile worker pool and encoded after the pool's join barrier.
///
/// # Errors
///
/// [`ThumbnailError::InvalidInput`] for unusable dimensions or budgets,
/// [`ThumbnailError::Encode`] when the compressor fails.
pub fn generate_thumbnail(
    source: &Raster,
    request: &ThumbnailRequest,
    options: &PipelineOptions,
) -> Result<Vec<u8>, ThumbnailError> {
    let plan = plan_dimensions(source.width, source.height, request.target_pixels)?;

    match plan {
        ResizePlan::PassThrough => {
            let bytes = encode(source, options.format, request.quality)?;
            Ok(bytes)
        }
        ResizePlan::Resample { width, height } => {
            let mut dst = Raster::blank(width, height);
            render_tiled(
                source,
                &mut dst,
                options.tile_size,
                options.workers,
                options.quantizer,
            );
            let bytes = encode(&dst, options.format, request.quality)?;
            Ok(bytes)
        }
    }
}

/// Generate one encoded thumbnail per pixel budget, reusing the decoded
/// source.
///
/// Convenience for callers producing several sizes per upload (the
/// original service emits [`BUDGET_SMALL`] and [`BUDGET_LARGE`] variants
/// from a single decode). Fails on the first budget that fails; nothing is
/// retried.
pub fn generate_thumbnail_set(
    source: &Raster,
    budgets: &[u64],
    quality: f32,
    options: &PipelineOptions,
) -> Result<Vec<Vec<u8>>, ThumbnailError> {
    budgets
        .iter()
        .map(|&target_pixels| {
            generate_thumbnail(source, &ThumbnailRequest::new(target_pixels, quality), options)
        })
        .collect()
}
