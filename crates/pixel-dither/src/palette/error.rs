//! Error types for color parsing and palette construction.

use std::fmt;

/// Why a string is not a `#RRGGBB` color.
///
/// Only returned by [`str::parse`]; [`Color::parse_hex`](crate::Color::parse_hex)
/// swallows it and falls back to black.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseColorError {
    /// Number of hex digits after the optional `#`, when it is not 6
    InvalidLength(usize),
    /// First character that is not a hexadecimal digit
    InvalidDigit(char),
}

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::InvalidLength(n) => write!(f, "expected 6 hex digits, found {n}"),
            Self::InvalidDigit(c) => write!(f, "{c:?} is not a hex digit"),
        }
    }
}

impl std::error::Error for ParseColorError {}

/// A palette could not be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteError {
    /// The palette would have no colors
    EmptyPalette,
    /// One of the listed colors failed to parse
    ParseColor(ParseColorError),
}

impl From<ParseColorError> for PaletteError {
    fn from(err: ParseColorError) -> Self {
        Self::ParseColor(err)
    }
}

impl fmt::Display for PaletteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPalette => f.write_str("palette cannot be empty"),
            Self::ParseColor(err) => write!(f, "invalid color: {err}"),
        }
    }
}

impl std::error::Error for PaletteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ParseColor(err) => Some(err),
            Self::EmptyPalette => None,
        }
    }
}
