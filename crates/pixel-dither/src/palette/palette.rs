//! Ordered, non-empty color palette with the assignment lookups used by
//! the dithering engine.

use std::str::FromStr;

use super::error::PaletteError;
use crate::color::Color;

/// Swatch set returned when palette extraction has nothing to work with.
const FALLBACK_SWATCHES: [Color; 4] = [
    Color::new(0x00, 0x00, 0x00),
    Color::new(0x55, 0x55, 0x55),
    Color::new(0xaa, 0xaa, 0xaa),
    Color::new(0xff, 0xff, 0xff),
];

/// An ordered, non-empty sequence of colors.
///
/// Order matters for the luminance and gradient assignment modes: index 0
/// is the darkest / leftmost / topmost end. Nearest-color matching ignores
/// order except for tie-breaking (first entry wins).
///
/// Emptiness is rejected at construction, so every `Palette` handed to the
/// dithering engine satisfies its non-empty precondition.
///
/// # Example
///
/// ```
/// use pixel_dither::{Color, Palette};
///
/// let palette = Palette::from_hex(&["#000000", "#ffffff"]).unwrap();
/// assert_eq!(palette.len(), 2);
/// assert_eq!(palette.nearest(Color::new(200, 200, 200)), Color::WHITE);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    /// Create a palette from a list of colors.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::EmptyPalette`] if `colors` is empty.
    pub fn new(colors: Vec<Color>) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::EmptyPalette);
        }
        Ok(Self { colors })
    }

    /// Create a palette from hex strings, parsing each entry permissively.
    ///
    /// Malformed entries become black (see [`Color::parse_hex`]).
    pub fn from_hex<S: AsRef<str>>(hex: &[S]) -> Result<Self, PaletteError> {
        Self::new(hex.iter().map(|s| Color::parse_hex(s.as_ref())).collect())
    }

    /// Parse a comma-separated list such as `"#000000,#ff0000,#ffffff"`.
    ///
    /// Entries are parsed permissively; blank entries are skipped.
    pub fn parse_list(list: &str) -> Result<Self, PaletteError> {
        let entries: Vec<&str> = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        Self::from_hex(&entries)
    }

    /// The default swatch set: four evenly spaced greys, dark to light.
    pub fn fallback() -> Self {
        Self {
            colors: FALLBACK_SWATCHES.to_vec(),
        }
    }

    /// Returns the number of colors in the palette.
    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always `false`; empty palettes are rejected at construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// The palette colors in order.
    #[inline]
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Color at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[inline]
    pub fn get(&self, index: usize) -> Color {
        self.colors[index]
    }

    /// Index of the first entry exactly equal to `color`.
    pub fn index_of(&self, color: Color) -> Option<usize> {
        self.colors.iter().position(|&c| c == color)
    }

    /// Whether `color` is exactly one of the palette entries.
    #[inline]
    pub fn contains(&self, color: Color) -> bool {
        self.colors.contains(&color)
    }

    /// Index of the entry closest to `color` by Euclidean distance.
    ///
    /// Ties resolve to the first entry achieving the minimum.
    pub fn nearest_index(&self, color: Color) -> usize {
        let mut best_idx = 0;
        let mut best_dist = f64::MAX;

        for (i, &candidate) in self.colors.iter().enumerate() {
            let dist = color.distance(candidate);
            if dist < best_dist {
                best_dist = dist;
                best_idx = i;
            }
        }

        best_idx
    }

    /// The entry closest to `color` by Euclidean distance.
    #[inline]
    pub fn nearest(&self, color: Color) -> Color {
        self.colors[self.nearest_index(color)]
    }

    /// Index selected by brightness rank.
    ///
    /// `floor(luminance / 255 * len)`, clamped to `0..len`.
    pub fn luminance_index(&self, color: Color) -> usize {
        let n = self.colors.len();
        let scaled = (color.luminance() / 255.0 * n as f64).floor();
        if scaled <= 0.0 {
            0
        } else {
            (scaled as usize).min(n - 1)
        }
    }

    /// Piecewise-linear interpolation across the palette stops.
    ///
    /// `pos` in 0..=1 maps onto stops `0..=len-1`. A single-entry palette
    /// always returns that entry.
    pub fn gradient_color(&self, pos: f64) -> Color {
        let n = self.colors.len();
        if n == 1 {
            return self.colors[0];
        }

        let scaled = pos * (n - 1) as f64;
        let floor = scaled.floor();
        let t = scaled - floor;
        if floor >= (n - 1) as f64 {
            return self.colors[n - 1];
        }
        // Negative positions are outside the documented domain; pin them to
        // the first stop rather than wrapping the index.
        if floor < 0.0 {
            return self.colors[0];
        }
        let i = floor as usize;
        self.colors[i].lerp(self.colors[i + 1], t)
    }

    /// A copy sorted by luminance ascending (dark to light). The sort is
    /// stable, so equally bright entries keep their relative order.
    pub fn sorted_by_luminance(&self) -> Self {
        let mut colors = self.colors.clone();
        colors.sort_by(|a, b| a.luminance().total_cmp(&b.luminance()));
        Self { colors }
    }

    /// Entries as lowercase `#rrggbb` strings.
    pub fn to_hex_strings(&self) -> Vec<String> {
        self.colors.iter().map(|c| c.to_hex()).collect()
    }

    /// Consume the palette, returning its colors.
    pub fn into_colors(self) -> Vec<Color> {
        self.colors
    }
}

impl FromStr for Palette {
    type Err = PaletteError;

    /// Strictly parse a comma-separated list of hex colors.
    ///
    /// Unlike [`Palette::parse_list`], a malformed entry is an error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let colors = s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Color::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(colors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::ParseColorError;

    fn grey_ramp() -> Palette {
        Palette::from_hex(&["#000000", "#808080", "#ffffff"]).unwrap()
    }

    #[test]
    fn test_empty_palette_rejected() {
        assert_eq!(Palette::new(Vec::new()), Err(PaletteError::EmptyPalette));
        assert_eq!(Palette::parse_list(" , ,"), Err(PaletteError::EmptyPalette));
    }

    #[test]
    fn test_parse_list_is_permissive() {
        let palette = Palette::parse_list("#ff0000, nonsense ,00ff00").unwrap();
        assert_eq!(
            palette.colors(),
            &[Color::new(255, 0, 0), Color::BLACK, Color::new(0, 255, 0)]
        );
    }

    #[test]
    fn test_from_str_is_strict() {
        let err = "#ff0000,#zz0000".parse::<Palette>().unwrap_err();
        assert_eq!(
            err,
            PaletteError::ParseColor(ParseColorError::InvalidDigit('z'))
        );
        let ok: Palette = "#ff0000,#00ff00".parse().unwrap();
        assert_eq!(ok.len(), 2);
    }

    #[test]
    fn test_nearest_tie_resolves_to_first() {
        // (10,0,0) sits exactly 10 from both entries
        let palette = Palette::new(vec![Color::new(0, 0, 0), Color::new(20, 0, 0)]).unwrap();
        assert_eq!(palette.nearest_index(Color::new(10, 0, 0)), 0);

        let reversed = Palette::new(vec![Color::new(20, 0, 0), Color::new(0, 0, 0)]).unwrap();
        assert_eq!(reversed.nearest_index(Color::new(10, 0, 0)), 0);
    }

    #[test]
    fn test_nearest_red_picks_black() {
        // 255 to black, ~360.6 to white
        let palette = Palette::from_hex(&["#000000", "#ffffff"]).unwrap();
        assert_eq!(palette.nearest(Color::new(255, 0, 0)), Color::BLACK);
    }

    #[test]
    fn test_luminance_index_bounds() {
        let palette = grey_ramp();
        assert_eq!(palette.luminance_index(Color::BLACK), 0);
        assert_eq!(palette.luminance_index(Color::WHITE), 2);
        assert_eq!(palette.luminance_index(Color::new(128, 128, 128)), 1);
    }

    #[test]
    fn test_gradient_color_stops() {
        let palette = grey_ramp();
        assert_eq!(palette.gradient_color(0.0), Color::BLACK);
        assert_eq!(palette.gradient_color(0.5), Color::new(128, 128, 128));
        assert_eq!(palette.gradient_color(1.0), Color::WHITE);
        assert_eq!(palette.gradient_color(0.25), Color::new(64, 64, 64));
        assert_eq!(palette.gradient_color(-0.5), Color::BLACK);
    }

    #[test]
    fn test_gradient_single_entry() {
        let palette = Palette::from_hex(&["#123456"]).unwrap();
        assert_eq!(palette.gradient_color(0.7), Color::new(0x12, 0x34, 0x56));
    }

    #[test]
    fn test_sorted_by_luminance() {
        let palette = Palette::from_hex(&["#ffffff", "#ff0000", "#000000"]).unwrap();
        let sorted = palette.sorted_by_luminance();
        assert_eq!(
            sorted.to_hex_strings(),
            vec!["#000000", "#ff0000", "#ffffff"]
        );
    }

    #[test]
    fn test_fallback_is_dark_to_light() {
        let fallback = Palette::fallback();
        assert_eq!(fallback.len(), 4);
        assert_eq!(fallback, fallback.sorted_by_luminance());
    }

    #[test]
    fn test_index_of_exact_match() {
        let palette = grey_ramp();
        assert_eq!(palette.index_of(Color::new(128, 128, 128)), Some(1));
        assert_eq!(palette.index_of(Color::new(127, 128, 128)), None);
    }
}
