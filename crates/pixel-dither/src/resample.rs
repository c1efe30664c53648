//! Nearest-neighbor resampling.
//!
//! Neither direction ever blends source pixels: every output cell is a copy
//! of exactly one input cell, which keeps the hard block edges pixel art
//! depends on.

use crate::buffer::PixelBuffer;
use crate::color::Color;

/// Working-grid size for a `width x height` source at `percent` scale.
///
/// Each dimension is `round(dim * percent / 100)`, floored at 1.
///
/// ```
/// use pixel_dither::resample::target_dimensions;
///
/// assert_eq!(target_dimensions(200, 100, 50), (100, 50));
/// assert_eq!(target_dimensions(3, 3, 10), (1, 1));
/// ```
pub fn target_dimensions(width: usize, height: usize, percent: u32) -> (usize, usize) {
    let scale = percent as f64 / 100.0;
    let scaled = |dim: usize| ((dim as f64 * scale).round() as usize).max(1);
    (scaled(width), scaled(height))
}

/// Shrink `source` to the working grid for `percent`.
///
/// Each target cell takes the source pixel under its centre. A zero-area
/// source yields a single black cell.
pub fn downsample(source: &PixelBuffer, percent: u32) -> PixelBuffer {
    if source.is_empty() {
        return PixelBuffer::filled(1, 1, Color::BLACK);
    }

    let (sw, sh) = source.dimensions();
    let (tw, th) = target_dimensions(sw, sh, percent);
    assert!(tw >= 1 && th >= 1, "empty working grid {tw}x{th}");

    let mut pixels = Vec::with_capacity(tw * th);
    for y in 0..th {
        let sy = (((2 * y + 1) * sh) / (2 * th)).min(sh - 1);
        for x in 0..tw {
            let sx = (((2 * x + 1) * sw) / (2 * tw)).min(sw - 1);
            pixels.push(source.get(sx, sy));
        }
    }

    PixelBuffer::from_parts(tw, th, pixels)
}

/// Magnify `small` to `width x height` by block replication.
///
/// A zero-area target yields an empty buffer; an empty `small` fills the
/// target with black.
pub fn upsample(small: &PixelBuffer, width: usize, height: usize) -> PixelBuffer {
    if width == 0 || height == 0 || small.is_empty() {
        return PixelBuffer::filled(width, height, Color::BLACK);
    }

    let (sw, sh) = small.dimensions();
    let mut pixels = Vec::with_capacity(width * height);
    for y in 0..height {
        let sy = y * sh / height;
        for x in 0..width {
            let sx = x * sw / width;
            pixels.push(small.get(sx, sy));
        }
    }

    PixelBuffer::from_parts(width, height, pixels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: usize, height: usize) -> PixelBuffer {
        let pixels = (0..width * height)
            .map(|i| Color::new((i % 256) as u8, (i / 7 % 256) as u8, 3))
            .collect();
        PixelBuffer::new(width, height, pixels).unwrap()
    }

    #[test]
    fn test_target_dimensions_rounding() {
        assert_eq!(target_dimensions(15, 5, 10), (2, 1)); // 1.5 rounds up, 0.5 rounds up
        assert_eq!(target_dimensions(14, 4, 10), (1, 1)); // 1.4 down, 0.4 floored at 1
        assert_eq!(target_dimensions(0, 0, 50), (1, 1));
        assert_eq!(target_dimensions(640, 480, 100), (640, 480));
    }

    #[test]
    fn test_downsample_full_size_is_identity() {
        let src = gradient(7, 5);
        assert_eq!(downsample(&src, 100), src);
    }

    #[test]
    fn test_downsample_samples_centres() {
        // 4x1 at 50%: cells cover [0,2) and [2,4), centres at 1 and 3
        let src = PixelBuffer::new(
            4,
            1,
            vec![
                Color::new(0, 0, 0),
                Color::new(1, 1, 1),
                Color::new(2, 2, 2),
                Color::new(3, 3, 3),
            ],
        )
        .unwrap();
        let out = downsample(&src, 50);
        assert_eq!(out.pixels(), &[Color::new(1, 1, 1), Color::new(3, 3, 3)]);
    }

    #[test]
    fn test_downsample_never_blends() {
        let src = gradient(33, 17);
        let out = downsample(&src, 37);
        assert!(out.pixels().iter().all(|c| src.pixels().contains(c)));
    }

    #[test]
    fn test_downsample_zero_area_source() {
        let src = PixelBuffer::filled(0, 9, Color::WHITE);
        let out = downsample(&src, 50);
        assert_eq!(out.dimensions(), (1, 1));
        assert_eq!(out.get(0, 0), Color::BLACK);
    }

    #[test]
    fn test_downsample_tiny_source_keeps_one_cell() {
        // 10% of 1x3 rounds to 0x0 before the floor kicks in
        let src = PixelBuffer::filled(1, 3, Color::new(9, 8, 7));
        let out = downsample(&src, 10);
        assert_eq!(out.dimensions(), (1, 1));
        assert_eq!(out.get(0, 0), Color::new(9, 8, 7));
    }

    #[test]
    fn test_upsample_replicates_blocks() {
        let small = PixelBuffer::new(2, 1, vec![Color::BLACK, Color::WHITE]).unwrap();
        let big = upsample(&small, 4, 2);
        assert_eq!(
            big.pixels(),
            &[
                Color::BLACK,
                Color::BLACK,
                Color::WHITE,
                Color::WHITE,
                Color::BLACK,
                Color::BLACK,
                Color::WHITE,
                Color::WHITE,
            ]
        );
    }

    #[test]
    fn test_round_trip_restores_dimensions() {
        for &(w, h) in &[(1, 1), (13, 7), (100, 3), (64, 64)] {
            for percent in [10, 33, 50, 99, 100] {
                let src = gradient(w, h);
                let small = downsample(&src, percent);
                let big = upsample(&small, w, h);
                assert_eq!(big.dimensions(), (w, h), "{w}x{h} at {percent}%");
            }
        }
    }

    #[test]
    fn test_upsample_zero_target() {
        let small = PixelBuffer::filled(2, 2, Color::WHITE);
        assert!(upsample(&small, 0, 5).is_empty());
    }
}
