use pixel_dither::{
    DitherMode, Palette, PaletteAssignmentMode, PaletteExtractor, PixelArtPipeline, RasterImage,
};
use serde::Deserialize;
use utoipa::IntoParams;

use super::config::RenderDefaults;
use crate::error::ApiError;

pub const MIN_PIXEL_SIZE: u32 = 10;
pub const MAX_PIXEL_SIZE: u32 = 100;
pub const MIN_COLOR_COUNT: usize = 2;
pub const MAX_COLOR_COUNT: usize = 16;

/// Palette value that requests extraction from the uploaded image
pub const AUTO_PALETTE: &str = "auto";

/// Raw rendering parameters as they arrive in the query string
#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RenderQuery {
    /// Working-grid scale in percent, clamped to 10-100
    pub pixel_size: Option<u32>,
    /// Dithering algorithm: floyd-steinberg or ordered
    pub algorithm: Option<String>,
    /// Palette assignment: nearest, luminance, gradient-horizontal, gradient-vertical
    pub palette_mode: Option<String>,
    /// Comma-separated hex colors, or "auto" to extract from the image
    pub palette: Option<String>,
    /// Number of colors to extract when palette=auto, clamped to 2-16
    pub colors: Option<usize>,
    /// Set to false to pixelate without palette reduction
    pub dither: Option<bool>,
}

/// Where the palette for a render comes from
#[derive(Debug, Clone, PartialEq)]
pub enum PaletteSource {
    Fixed(Palette),
    Auto { color_count: usize },
}

impl PaletteSource {
    /// Produce the concrete palette, extracting from `image` when automatic.
    pub fn resolve(&self, image: &RasterImage) -> Palette {
        match self {
            PaletteSource::Fixed(palette) => palette.clone(),
            PaletteSource::Auto { color_count } => {
                PaletteExtractor::new().extract(image, *color_count)
            }
        }
    }
}

/// Fully validated rendering parameters
#[derive(Debug, Clone, PartialEq)]
pub struct RenderParams {
    pub pixel_size: u32,
    pub algorithm: DitherMode,
    pub palette_mode: PaletteAssignmentMode,
    pub palette: PaletteSource,
    pub dither: bool,
}

impl RenderParams {
    /// Merge a query with configured defaults.
    ///
    /// Numeric values are clamped into range; unknown names are rejected.
    pub fn resolve(query: &RenderQuery, defaults: &RenderDefaults) -> Result<Self, ApiError> {
        let pixel_size = query
            .pixel_size
            .unwrap_or(defaults.pixel_size)
            .clamp(MIN_PIXEL_SIZE, MAX_PIXEL_SIZE);

        let algorithm = query
            .algorithm
            .as_deref()
            .unwrap_or(&defaults.algorithm)
            .parse::<DitherMode>()
            .map_err(|e| ApiError::InvalidParameter(e.to_string()))?;

        let palette_mode = query
            .palette_mode
            .as_deref()
            .unwrap_or(&defaults.palette_mode)
            .parse::<PaletteAssignmentMode>()
            .map_err(|e| ApiError::InvalidParameter(e.to_string()))?;

        let color_count = clamp_color_count(query.colors.unwrap_or(defaults.color_count));

        let palette = match query.palette.as_deref().map(str::trim) {
            Some(p) if p.eq_ignore_ascii_case(AUTO_PALETTE) => PaletteSource::Auto { color_count },
            Some(list) => PaletteSource::Fixed(
                Palette::parse_list(list)
                    .map_err(|e| ApiError::InvalidParameter(format!("palette: {e}")))?,
            ),
            None => PaletteSource::Fixed(
                Palette::from_hex(&defaults.palette).unwrap_or_else(|_| Palette::fallback()),
            ),
        };

        Ok(Self {
            pixel_size,
            algorithm,
            palette_mode,
            palette,
            dither: query.dither.unwrap_or(defaults.dither),
        })
    }

    /// Build the pipeline for a concrete palette.
    pub fn pipeline(&self, palette: Palette) -> PixelArtPipeline {
        PixelArtPipeline::new(palette)
            .pixel_size(self.pixel_size)
            .algorithm(self.algorithm)
            .palette_mode(self.palette_mode)
            .dithering(self.dither)
    }

    /// Canonical text form of the parameters, used as cache key material.
    pub fn fingerprint(&self) -> String {
        let palette = match &self.palette {
            PaletteSource::Fixed(p) => p.to_hex_strings().join(","),
            PaletteSource::Auto { color_count } => format!("{AUTO_PALETTE}:{color_count}"),
        };
        format!(
            "px={};alg={};mode={};pal={};dither={}",
            self.pixel_size, self.algorithm, self.palette_mode, palette, self.dither
        )
    }
}

/// Clamp a requested extraction size into the supported range.
pub fn clamp_color_count(count: usize) -> usize {
    count.clamp(MIN_COLOR_COUNT, MAX_COLOR_COUNT)
}
