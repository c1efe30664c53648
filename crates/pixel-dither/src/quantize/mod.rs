//! Median-cut palette extraction with a diversity filter.
//!
//! Extraction deliberately over-produces candidates (about four per
//! requested color), ranks them by how distinctive they look, then keeps
//! only colors that are perceptually far enough apart. The result is sorted
//! dark to light so luminance and gradient palette modes can rely on index
//! order.
//!
//! # Example
//!
//! ```
//! use pixel_dither::{extract_palette, Color, PixelBuffer, RasterImage};
//!
//! let mut pixels = vec![Color::new(220, 30, 30); 50];
//! pixels.extend(vec![Color::new(20, 20, 160); 50]);
//! let image = RasterImage::from_pixel_buffer(&PixelBuffer::new(10, 10, pixels).unwrap());
//!
//! let palette = extract_palette(&image, 4);
//! assert!(palette.len() <= 4);
//! assert_eq!(palette.get(0), Color::new(20, 20, 160));
//! ```

mod median_cut;

pub use median_cut::{depth_for, median_cut};

use crate::buffer::RasterImage;
use crate::color::Color;
use crate::palette::Palette;

/// Longer side of the sampling grid.
pub const DEFAULT_MAX_SAMPLE_DIMENSION: usize = 150;

/// Pixels with alpha below this are skipped.
pub const DEFAULT_ALPHA_THRESHOLD: u8 = 128;

/// Minimum redmean distance between accepted colors on the first pass.
pub const DEFAULT_MIN_DISTANCE: f64 = 60.0;

/// Median-cut palette extractor.
///
/// # Example
///
/// ```
/// use pixel_dither::{PaletteExtractor, RasterImage};
///
/// let image = RasterImage::new(1, 1, vec![0, 0, 0, 0]).unwrap();
/// // Nothing visible: the fallback palette comes back
/// let palette = PaletteExtractor::new().extract(&image, 8);
/// assert_eq!(palette.len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct PaletteExtractor {
    max_sample_dimension: usize,
    alpha_threshold: u8,
    min_distance: f64,
}

impl Default for PaletteExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PaletteExtractor {
    /// Extractor with the default sampling and diversity settings.
    pub fn new() -> Self {
        Self {
            max_sample_dimension: DEFAULT_MAX_SAMPLE_DIMENSION,
            alpha_threshold: DEFAULT_ALPHA_THRESHOLD,
            min_distance: DEFAULT_MIN_DISTANCE,
        }
    }

    /// Bound the sampling grid's longer side (at least 1).
    #[inline]
    pub fn max_sample_dimension(mut self, max: usize) -> Self {
        self.max_sample_dimension = max.max(1);
        self
    }

    /// Skip pixels whose alpha is below `threshold`.
    #[inline]
    pub fn alpha_threshold(mut self, threshold: u8) -> Self {
        self.alpha_threshold = threshold;
        self
    }

    /// First-pass minimum redmean distance; the backfill pass uses half.
    #[inline]
    pub fn min_distance(mut self, distance: f64) -> Self {
        self.min_distance = distance;
        self
    }

    /// Extract up to `color_count` colors from `image`, sorted dark to light.
    ///
    /// A `color_count` of 0 is treated as 1. When no sampled pixel is
    /// visible the result is [`Palette::fallback`].
    pub fn extract(&self, image: &RasterImage, color_count: usize) -> Palette {
        let color_count = color_count.max(1);

        let mut samples = self.sample(image);
        if samples.is_empty() {
            return Palette::fallback();
        }

        let mut candidates = Vec::new();
        median_cut(&mut samples, depth_for(color_count), &mut candidates);

        let ranked = rank_by_vividness(candidates);
        let mut selected = self.select_diverse(&ranked, color_count);
        selected.sort_by(|a, b| a.luminance().total_cmp(&b.luminance()));

        Palette::new(selected).unwrap_or_else(|_| Palette::fallback())
    }

    /// Visible pixels on a nearest-neighbor grid no larger than
    /// `max_sample_dimension` on its longer side.
    fn sample(&self, image: &RasterImage) -> Vec<Color> {
        if image.is_empty() {
            return Vec::new();
        }

        let (w, h) = (image.width(), image.height());
        let longer = w.max(h);
        let (sw, sh) = if longer > self.max_sample_dimension {
            let scale = self.max_sample_dimension as f64 / longer as f64;
            (
                ((w as f64 * scale).round() as usize).max(1),
                ((h as f64 * scale).round() as usize).max(1),
            )
        } else {
            (w, h)
        };

        let mut samples = Vec::with_capacity(sw * sh);
        for y in 0..sh {
            let py = (((2 * y + 1) * h) / (2 * sh)).min(h - 1);
            for x in 0..sw {
                let px = (((2 * x + 1) * w) / (2 * sw)).min(w - 1);
                let [r, g, b, a] = image.pixel(px, py);
                if a >= self.alpha_threshold {
                    samples.push(Color::new(r, g, b));
                }
            }
        }
        samples
    }

    /// Greedy diversity filter over ranked candidates.
    ///
    /// The first pass accepts colors at least `min_distance` from every
    /// accepted color; if that leaves the palette short, a second pass with
    /// half the distance backfills from the remaining candidates.
    fn select_diverse(&self, ranked: &[Color], color_count: usize) -> Vec<Color> {
        let mut chosen: Vec<usize> = Vec::with_capacity(color_count);

        for threshold in [self.min_distance, self.min_distance / 2.0] {
            for (i, &candidate) in ranked.iter().enumerate() {
                if chosen.len() >= color_count {
                    break;
                }
                if chosen.contains(&i) {
                    continue;
                }
                let far_enough = chosen
                    .iter()
                    .all(|&j| candidate.perceptual_distance(ranked[j]) >= threshold);
                if far_enough {
                    chosen.push(i);
                }
            }
            if chosen.len() >= color_count {
                break;
            }
        }

        chosen.into_iter().map(|i| ranked[i]).collect()
    }
}

/// Vividness score: `0.7 * saturation + 0.3 * brightness`.
#[inline]
pub fn vividness(color: Color) -> f64 {
    0.7 * color.saturation() + 0.3 * color.brightness()
}

/// Candidates ordered by descending [`vividness`]; equal scores keep their
/// median-cut order.
fn rank_by_vividness(mut candidates: Vec<Color>) -> Vec<Color> {
    candidates.sort_by(|a, b| vividness(*b).total_cmp(&vividness(*a)));
    candidates
}

/// Extract a palette with default extractor settings.
pub fn extract_palette(image: &RasterImage, color_count: usize) -> Palette {
    PaletteExtractor::new().extract(image, color_count)
}

/// One extraction call: a source image and how many colors to derive.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionRequest<'a> {
    /// Decoded RGBA source
    pub image: &'a RasterImage,
    /// Desired number of colors
    pub color_count: usize,
}

impl<'a> ExtractionRequest<'a> {
    /// Build a request.
    pub fn new(image: &'a RasterImage, color_count: usize) -> Self {
        Self { image, color_count }
    }

    /// Run the request with default extractor settings.
    pub fn extract(&self) -> Palette {
        extract_palette(self.image, self.color_count)
    }

    /// Run the request with a configured extractor.
    pub fn extract_with(&self, extractor: &PaletteExtractor) -> Palette {
        extractor.extract(self.image, self.color_count)
    }
}
