//! PixelArtPipeline builder -- the primary entry point for the crate.
//!
//! [`PixelArtPipeline`] wires the stages together:
//!
//! ```text
//! source ──> downsample(pixel_size %) ──> dither(palette, mode) ──> upsample(source size)
//! ```
//!
//! Every stage is a pure function producing a fresh buffer, so a pipeline
//! can be shared across threads and reused for any number of images.

use crate::api::DitherError;
use crate::buffer::{PixelBuffer, RasterImage};
use crate::dither::{dither, DitherMode, PaletteAssignmentMode};
use crate::palette::Palette;
use crate::resample::{downsample, upsample};

/// Working-grid scale used when none is configured, in percent.
pub const DEFAULT_PIXEL_SIZE: u32 = 50;

/// Pixel-art conversion pipeline with fluent configuration.
///
/// # Example
///
/// ```
/// use pixel_dither::{Color, DitherMode, Palette, PixelArtPipeline, PixelBuffer};
///
/// let palette = Palette::from_hex(&["#000000", "#ffffff"]).unwrap();
/// let pipeline = PixelArtPipeline::new(palette)
///     .pixel_size(25)
///     .algorithm(DitherMode::Ordered);
///
/// let source = PixelBuffer::filled(8, 8, Color::new(90, 90, 90));
/// let out = pipeline.process(&source);
///
/// assert_eq!(out.dimensions(), (8, 8));
/// // 25% of 8 is a 2x2 grid, so the output is made of 4x4 blocks
/// assert_eq!(out.get(0, 0), out.get(3, 3));
/// ```
#[derive(Debug, Clone)]
pub struct PixelArtPipeline {
    palette: Palette,
    pixel_size: u32,
    algorithm: DitherMode,
    palette_mode: PaletteAssignmentMode,
    dithering: bool,
}

impl PixelArtPipeline {
    /// Create a pipeline for `palette` with default settings:
    /// 50% pixel size, Floyd-Steinberg, nearest-color assignment, dithering on.
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            pixel_size: DEFAULT_PIXEL_SIZE,
            algorithm: DitherMode::default(),
            palette_mode: PaletteAssignmentMode::default(),
            dithering: true,
        }
    }

    /// Working-grid scale in percent of the source size.
    ///
    /// Callers are expected to clamp this to `10..=100`; the resampler still
    /// floors the grid at one cell per axis.
    #[inline]
    pub fn pixel_size(mut self, percent: u32) -> Self {
        self.pixel_size = percent;
        self
    }

    /// Spatial dithering strategy.
    #[inline]
    pub fn algorithm(mut self, algorithm: DitherMode) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Rule mapping working-grid colors to palette entries.
    #[inline]
    pub fn palette_mode(mut self, mode: PaletteAssignmentMode) -> Self {
        self.palette_mode = mode;
        self
    }

    /// Enable or disable the palette stage.
    ///
    /// Disabled, the pipeline only pixelates: downsample then upsample, with
    /// source colors kept as they are.
    #[inline]
    pub fn dithering(mut self, enabled: bool) -> Self {
        self.dithering = enabled;
        self
    }

    /// The configured palette.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Run the pipeline on an opaque buffer.
    ///
    /// The output always has the source's dimensions.
    pub fn process(&self, source: &PixelBuffer) -> PixelBuffer {
        let small = downsample(source, self.pixel_size);
        let small = if self.dithering {
            dither(&small, &self.palette, self.algorithm, self.palette_mode)
        } else {
            small
        };
        upsample(&small, source.width(), source.height())
    }

    /// Run the pipeline on a decoded RGBA image.
    ///
    /// Translucent pixels are composited over white first.
    pub fn process_image(&self, image: &RasterImage) -> PixelBuffer {
        self.process(&image.to_pixel_buffer())
    }

    /// Run the pipeline on each animation frame, in order.
    ///
    /// # Errors
    ///
    /// Returns [`DitherError::FrameSizeMismatch`] if any frame's dimensions
    /// differ from the first frame's. No frames are processed in that case.
    pub fn process_frames(&self, frames: &[PixelBuffer]) -> Result<Vec<PixelBuffer>, DitherError> {
        if let Some(first) = frames.first() {
            let expected = first.dimensions();
            for (index, frame) in frames.iter().enumerate() {
                if frame.dimensions() != expected {
                    return Err(DitherError::FrameSizeMismatch {
                        index,
                        expected,
                        actual: frame.dimensions(),
                    });
                }
            }
        }

        Ok(frames.iter().map(|frame| self.process(frame)).collect())
    }
}
