//! Palette-constrained dithering.
//!
//! Two spatial strategies are available, selected by [`DitherMode`]:
//!
//! - **Floyd-Steinberg**: error diffusion in strict raster order
//! - **Ordered**: 4x4 Bayer threshold matrix, each pixel independent
//!
//! Both resolve each (possibly perturbed) color to a palette entry using a
//! [`PaletteAssignmentMode`]. Every color written to the output is an exact
//! palette member: gradient modes only use interpolated colors as a search
//! key and snap the result back to the palette.
//!
//! # Example
//!
//! ```
//! use pixel_dither::{dither, Color, DitherMode, Palette, PaletteAssignmentMode, PixelBuffer};
//!
//! let palette = Palette::from_hex(&["#000000", "#ffffff"]).unwrap();
//! let gray = PixelBuffer::filled(4, 4, Color::new(128, 128, 128));
//!
//! let out = dither(&gray, &palette, DitherMode::Ordered, PaletteAssignmentMode::Nearest);
//! assert!(out.pixels().iter().all(|&c| palette.contains(c)));
//! ```

mod bayer;
mod floyd_steinberg;
mod kernel;
mod mode;

pub use bayer::{Bayer, BAYER_4X4, SPREAD_FACTOR};
pub use floyd_steinberg::FloydSteinberg;
pub use kernel::{Kernel, Tap, FLOYD_STEINBERG};
pub use mode::{DitherMode, PaletteAssignmentMode, ParseModeError};

use crate::buffer::PixelBuffer;
use crate::color::Color;
use crate::palette::Palette;

/// Trait for dithering algorithms.
pub trait Dither {
    /// Dither `buffer` into colors drawn from `palette`.
    ///
    /// The output has the same dimensions as the input.
    fn dither(
        &self,
        buffer: &PixelBuffer,
        palette: &Palette,
        palette_mode: PaletteAssignmentMode,
    ) -> PixelBuffer;
}

/// Dither `buffer` with the algorithm selected by `mode`.
pub fn dither(
    buffer: &PixelBuffer,
    palette: &Palette,
    mode: DitherMode,
    palette_mode: PaletteAssignmentMode,
) -> PixelBuffer {
    match mode {
        DitherMode::FloydSteinberg => FloydSteinberg.dither(buffer, palette, palette_mode),
        DitherMode::Ordered => Bayer.dither(buffer, palette, palette_mode),
    }
}

/// Resolve a source color at `(x, y)` in a `width x height` grid to a
/// palette entry.
///
/// - `Nearest`: closest entry by Euclidean distance
/// - `Luminance`: entry at the brightness rank, no nearest-search snap
/// - `GradientHorizontal` / `GradientVertical`: interpolate the palette at
///   `x / width` (or `y / height`), blend 50/50 with the nearest entry, then
///   snap the blend to the nearest entry
#[inline]
pub fn resolve_color(
    color: Color,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
    palette: &Palette,
    mode: PaletteAssignmentMode,
) -> Color {
    match mode {
        PaletteAssignmentMode::Nearest => palette.nearest(color),
        PaletteAssignmentMode::Luminance => palette.get(palette.luminance_index(color)),
        PaletteAssignmentMode::GradientHorizontal => {
            gradient_snap(color, x as f64 / width as f64, palette)
        }
        PaletteAssignmentMode::GradientVertical => {
            gradient_snap(color, y as f64 / height as f64, palette)
        }
    }
}

fn gradient_snap(color: Color, pos: f64, palette: &Palette) -> Color {
    let positional = palette.gradient_color(pos);
    let local = palette.nearest(color);
    palette.nearest(positional.lerp(local, 0.5))
}

/// Rolling error buffer for error diffusion.
///
/// Stores only the rows the diffusion kernel can reach (`reach() + 1`), so a
/// full-image accumulator is never allocated.
///
/// # Usage Pattern
///
/// 1. Create buffer with `new(width, row_depth)`
/// 2. For each row:
///    a. Read accumulated error with `get_accumulated(x)`
///    b. After processing pixel, distribute error with `add_error(x, dy, error)`
///    c. After row complete, call `advance_row()`
#[derive(Debug)]
pub struct ErrorBuffer {
    /// Error rows: rows[0] is current row, rows[1] is next, etc.
    rows: Vec<Vec<[f32; 3]>>,
    /// Image width
    width: usize,
}

impl ErrorBuffer {
    /// Create a new error buffer.
    pub fn new(width: usize, row_depth: usize) -> Self {
        Self {
            rows: (0..row_depth).map(|_| vec![[0.0; 3]; width]).collect(),
            width,
        }
    }

    /// Accumulated error for a pixel in the current row.
    #[inline]
    pub fn get_accumulated(&self, x: usize) -> [f32; 3] {
        self.rows[0][x]
    }

    /// Add error to a future pixel.
    ///
    /// Silently ignores out-of-bounds coordinates.
    #[inline]
    pub fn add_error(&mut self, x: usize, row_offset: usize, error: [f32; 3]) {
        if x < self.width && row_offset < self.rows.len() {
            for c in 0..3 {
                self.rows[row_offset][x][c] += error[c];
            }
        }
    }

    /// Advance to the next row.
    pub fn advance_row(&mut self) {
        // Rotate left: [0,1] -> [1,0]
        self.rows.rotate_left(1);
        if let Some(last) = self.rows.last_mut() {
            last.fill([0.0; 3]);
        }
    }
}
