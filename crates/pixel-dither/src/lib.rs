#![allow(clippy::module_inception)]

//! pixel-dither: pixel-art conversion with palette-constrained dithering
//!
//! This library turns a full-color raster image into low-color pixel art by
//! chaining three stages: nearest-neighbor downsampling, dithering against a
//! fixed palette, and nearest-neighbor upsampling back to the source size.
//! A median-cut extractor can derive the palette from the image itself.
//!
//! # Quick Start
//!
//! The [`PixelArtPipeline`] builder is the primary entry point:
//!
//! ```
//! use pixel_dither::{Color, Palette, PixelArtPipeline, PixelBuffer};
//!
//! let palette = Palette::from_hex(&["#000000", "#ffffff"]).unwrap();
//! let source = PixelBuffer::filled(16, 16, Color::new(128, 128, 128));
//!
//! let out = PixelArtPipeline::new(palette).pixel_size(50).process(&source);
//! assert_eq!(out.dimensions(), (16, 16));
//! ```
//!
//! # Automatic Palettes
//!
//! ```
//! use pixel_dither::{extract_palette, Color, PixelArtPipeline, PixelBuffer, RasterImage};
//!
//! let source = PixelBuffer::filled(4, 4, Color::new(200, 40, 40));
//! let palette = extract_palette(&RasterImage::from_pixel_buffer(&source), 8);
//!
//! let out = PixelArtPipeline::new(palette).process(&source);
//! assert_eq!(out.get(0, 0), Color::new(200, 40, 40));
//! ```
//!
//! # Dithering
//!
//! Two spatial strategies are available via [`DitherMode`]:
//!
//! - Floyd-Steinberg error diffusion (strict raster order, 100% propagation)
//! - Ordered dithering with a 4x4 Bayer matrix (per-pixel, order independent)
//!
//! Independently, [`PaletteAssignmentMode`] picks how a color maps to a
//! palette entry: nearest by Euclidean distance, by luminance rank, or by a
//! horizontal/vertical palette gradient blended with the nearest entry.
//! Every emitted pixel is an exact palette member in all combinations.
//!
//! # Color Metrics
//!
//! Exact nearest-color searches use plain Euclidean RGB distance. The
//! extractor's diversity filter uses the "redmean" weighted distance,
//! which tracks perceived difference more closely at almost no cost.
//!
//! All operations are pure and deterministic: identical inputs always
//! produce identical buffers.

pub mod api;
pub mod buffer;
pub mod color;
pub mod dither;
pub mod palette;
pub mod pipeline;
pub mod quantize;
pub mod resample;


pub use api::DitherError;
pub use buffer::{BufferError, PixelBuffer, RasterImage};
pub use color::Color;
pub use dither::{
    dither, Bayer, Dither, DitherMode, FloydSteinberg, PaletteAssignmentMode, ParseModeError,
};
pub use palette::{Palette, PaletteError, ParseColorError};
pub use pipeline::PixelArtPipeline;
pub use quantize::{extract_palette, ExtractionRequest, PaletteExtractor};
