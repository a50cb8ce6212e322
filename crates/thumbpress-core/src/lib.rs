//! Thumbpress Core - Thumbnail generation pipeline
//!
//! This crate turns an already-decoded raster image into a lossy-compressed
//! thumbnail: aspect-preserving dimension planning, parallel bicubic
//! resampling over a tiled destination, an optional color-quantization
//! stage, and WebP/JPEG encoding.
//!
//! Decoding compressed image bytes is an external collaborator's job; the
//! pipeline consumes a [`Raster`] and returns an encoded byte buffer. It
//! performs no I/O and keeps no state between invocations.
//!
//! ```ignore
//! use thumbpress_core::{generate_thumbnail, PipelineOptions, Raster, ThumbnailRequest};
//!
//! let source = Raster::from_rgba_image(decoded);
//! let bytes = generate_thumbnail(
//!     &source,
//!     &ThumbnailRequest::new(300_000, 80.0),
//!     &PipelineOptions::default(),
//! )?;
//! ```

pub mod encode;
pub mod pipeline;
pub mod quantize;
pub mod raster;

pub use encode::{encode, EncodeError, OutputFormat};
pub use pipeline::{
    detected_parallelism, generate_thumbnail, generate_thumbnail_set, plan_dimensions,
    PipelineOptions, ResizePlan, ThumbnailError, ThumbnailRequest, Tile, BUDGET_LARGE,
    BUDGET_SMALL, DEFAULT_TILE_SIZE,
};
pub use quantize::ColorQuantizer;
pub use raster::Raster;
