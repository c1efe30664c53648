//! Ordered dithering with a 4x4 Bayer matrix.
//!
//! Unlike error diffusion, ordered dithering processes each pixel
//! independently: the perturbation depends only on the pixel's value and its
//! position modulo 4. Any processing order produces the same result.
//!
//! # Algorithm
//!
//! For each pixel:
//! 1. `threshold = BAYER_4X4[y % 4][x % 4] / 16 - 0.5` (in `[-0.5, 0.4375]`)
//! 2. Add `threshold * SPREAD_FACTOR` to every channel, clamp to 0..=255 and
//!    round
//! 3. Resolve the perturbed color to a palette entry

use crate::buffer::PixelBuffer;
use crate::color::Color;
use crate::palette::Palette;

use super::{resolve_color, Dither, PaletteAssignmentMode};

/// Classic 4x4 Bayer index matrix, row-major (`[y][x]`).
///
/// Contains each of 0..16 exactly once.
pub const BAYER_4X4: [[u8; 4]; 4] = [
    [0, 8, 2, 10],
    [12, 4, 14, 6],
    [3, 11, 1, 9],
    [15, 7, 13, 5],
];

/// Channel offset range of the threshold; controls dither contrast.
pub const SPREAD_FACTOR: f32 = 64.0;

/// Ordered (Bayer) dithering.
///
/// # Example
///
/// ```
/// use pixel_dither::{Bayer, Color, Dither, Palette, PaletteAssignmentMode, PixelBuffer};
///
/// let palette = Palette::from_hex(&["#000000", "#ffffff"]).unwrap();
/// let gray = PixelBuffer::filled(4, 4, Color::new(128, 128, 128));
///
/// let out = Bayer.dither(&gray, &palette, PaletteAssignmentMode::Nearest);
/// let white = out.pixels().iter().filter(|&&c| c == Color::WHITE).count();
/// assert_eq!(white, 8);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Bayer;

impl Bayer {
    /// Threshold for position `(x, y)`, in `[-0.5, 0.4375]`.
    #[inline]
    pub fn threshold(x: usize, y: usize) -> f32 {
        BAYER_4X4[y % 4][x % 4] as f32 / 16.0 - 0.5
    }

    /// Perturb `color` by the threshold at `(x, y)`.
    #[inline]
    pub fn perturb(color: Color, x: usize, y: usize) -> Color {
        let offset = Self::threshold(x, y) * SPREAD_FACTOR;
        let [r, g, b] = color.to_f32();
        Color::from_f32(r + offset, g + offset, b + offset)
    }

    /// Dither a single pixel.
    ///
    /// This is all the per-pixel work of [`Dither::dither`]; the result
    /// depends on nothing but the arguments.
    #[inline]
    pub fn dither_pixel(
        color: Color,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        palette: &Palette,
        palette_mode: PaletteAssignmentMode,
    ) -> Color {
        resolve_color(
            Self::perturb(color, x, y),
            x,
            y,
            width,
            height,
            palette,
            palette_mode,
        )
    }
}

impl Dither for Bayer {
    fn dither(
        &self,
        buffer: &PixelBuffer,
        palette: &Palette,
        palette_mode: PaletteAssignmentMode,
    ) -> PixelBuffer {
        let (width, height) = buffer.dimensions();
        let mut output = PixelBuffer::filled(width, height, Color::BLACK);

        for y in 0..height {
            for x in 0..width {
                let color = Self::dither_pixel(
                    buffer.get(x, y),
                    x,
                    y,
                    width,
                    height,
                    palette,
                    palette_mode,
                );
                output.set(x, y, color);
            }
        }

        output
    }
}
