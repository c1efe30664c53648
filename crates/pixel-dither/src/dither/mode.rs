//! Algorithm and palette-assignment selection.

use std::fmt;
use std::str::FromStr;

/// Spatial distribution strategy.
///
/// Names match the configuration surface: `floyd-steinberg`, `ordered`.
///
/// # Example
///
/// ```
/// use pixel_dither::DitherMode;
///
/// let mode: DitherMode = "ordered".parse().unwrap();
/// assert_eq!(mode, DitherMode::Ordered);
/// assert_eq!(DitherMode::default().as_str(), "floyd-steinberg");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DitherMode {
    /// Floyd-Steinberg error diffusion (raster order, 100% propagation).
    #[default]
    FloydSteinberg,

    /// Ordered dithering with a 4x4 Bayer threshold matrix.
    ///
    /// Every pixel is independent of every other pixel.
    Ordered,
}

impl DitherMode {
    /// All modes, in declaration order.
    pub const ALL: [DitherMode; 2] = [DitherMode::FloydSteinberg, DitherMode::Ordered];

    /// Configuration name.
    pub fn as_str(self) -> &'static str {
        match self {
            DitherMode::FloydSteinberg => "floyd-steinberg",
            DitherMode::Ordered => "ordered",
        }
    }
}

/// Rule mapping a source color to a palette entry.
///
/// Independent of [`DitherMode`]. Names match the configuration surface:
/// `nearest`, `luminance`, `gradient-horizontal`, `gradient-vertical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PaletteAssignmentMode {
    /// Closest entry by Euclidean distance; ties go to the first entry.
    #[default]
    Nearest,

    /// Entry chosen by brightness rank; assumes the palette is ordered dark
    /// to light.
    Luminance,

    /// Blend of a left-to-right palette gradient with the nearest entry,
    /// snapped back to the palette.
    GradientHorizontal,

    /// Same as [`GradientHorizontal`](Self::GradientHorizontal), top to bottom.
    GradientVertical,
}

impl PaletteAssignmentMode {
    /// All modes, in declaration order.
    pub const ALL: [PaletteAssignmentMode; 4] = [
        PaletteAssignmentMode::Nearest,
        PaletteAssignmentMode::Luminance,
        PaletteAssignmentMode::GradientHorizontal,
        PaletteAssignmentMode::GradientVertical,
    ];

    /// Configuration name.
    pub fn as_str(self) -> &'static str {
        match self {
            PaletteAssignmentMode::Nearest => "nearest",
            PaletteAssignmentMode::Luminance => "luminance",
            PaletteAssignmentMode::GradientHorizontal => "gradient-horizontal",
            PaletteAssignmentMode::GradientVertical => "gradient-vertical",
        }
    }
}

/// Unknown mode name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseModeError {
    /// What kind of mode was being parsed
    pub kind: &'static str,
    /// The rejected input
    pub value: String,
}

impl fmt::Display for ParseModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {}: {:?}", self.kind, self.value)
    }
}

impl std::error::Error for ParseModeError {}

impl FromStr for DitherMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        DitherMode::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseModeError {
                kind: "dither algorithm",
                value: s.to_string(),
            })
    }
}

impl FromStr for PaletteAssignmentMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        PaletteAssignmentMode::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseModeError {
                kind: "palette mode",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for DitherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PaletteAssignmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
