//! Floyd-Steinberg error diffusion dithering algorithm.
//!
//! Floyd-Steinberg distributes 100% of the quantization error to 4
//! not-yet-visited neighbors. Rows are scanned top to bottom, columns left
//! to right; every output pixel depends on the error accumulated from the
//! pixels before it, so the scan order must be preserved exactly.

use crate::buffer::PixelBuffer;
use crate::color::Color;
use crate::palette::Palette;

use super::{
    resolve_color, Dither, ErrorBuffer, PaletteAssignmentMode, FLOYD_STEINBERG,
};

/// Floyd-Steinberg error diffusion dithering.
///
/// # Algorithm
///
/// For each pixel in raster order:
///
/// 1. Add accumulated error to the source color, clamp to 0..=255 and round
///    (the *old* color)
/// 2. Resolve the old color to a palette entry (the *new* color)
/// 3. Emit the new color
/// 4. Diffuse `old - new` per channel to the neighbors below; neighbors
///    outside the buffer are skipped
///
/// ```text
///        X   7
///    3   5   1
/// ```
///
/// # Example
///
/// ```
/// use pixel_dither::{Color, Dither, FloydSteinberg, Palette, PaletteAssignmentMode, PixelBuffer};
///
/// let palette = Palette::from_hex(&["#000000", "#ffffff"]).unwrap();
/// let light = PixelBuffer::filled(1, 1, Color::new(200, 200, 200));
///
/// let out = FloydSteinberg.dither(&light, &palette, PaletteAssignmentMode::Nearest);
/// assert_eq!(out.get(0, 0), Color::WHITE);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FloydSteinberg;

impl Dither for FloydSteinberg {
    fn dither(
        &self,
        buffer: &PixelBuffer,
        palette: &Palette,
        palette_mode: PaletteAssignmentMode,
    ) -> PixelBuffer {
        let (width, height) = buffer.dimensions();
        let kernel = &FLOYD_STEINBERG;

        let mut output = PixelBuffer::filled(width, height, Color::BLACK);
        let mut errors = ErrorBuffer::new(width, kernel.reach() + 1);

        for y in 0..height {
            for x in 0..width {
                let source = buffer.get(x, y).to_f32();
                let acc = errors.get_accumulated(x);
                let old = Color::from_f32(
                    source[0] + acc[0],
                    source[1] + acc[1],
                    source[2] + acc[2],
                );

                let new = resolve_color(old, x, y, width, height, palette, palette_mode);
                output.set(x, y, new);

                let old = old.to_f32();
                let new = new.to_f32();
                let error = [old[0] - new[0], old[1] - new[1], old[2] - new[2]];

                for tap in kernel.taps {
                    let nx = x as isize + tap.dx as isize;
                    let dy = tap.dy as usize;
                    if nx < 0 || nx as usize >= width || y + dy >= height {
                        continue;
                    }
                    let w = kernel.share(tap);
                    errors.add_error(
                        nx as usize,
                        dy,
                        [error[0] * w, error[1] * w, error[2] * w],
                    );
                }
            }
            errors.advance_row();
        }

        output
    }
}
