use crate::buffer::BufferError;
use crate::palette::{PaletteError, ParseColorError};
use std::error::Error;
use std::fmt;

/// Any failure the pixel-dither API can report.
///
/// Every error type in the crate converts into this one, so callers can
/// use `?` across palette parsing, buffer construction and frame
/// processing alike.
///
/// ```
/// use pixel_dither::{DitherError, Palette};
///
/// fn two_tone() -> Result<Palette, DitherError> {
///     Ok("#000000,#ffffff".parse::<Palette>()?)
/// }
/// # assert_eq!(two_tone().unwrap().len(), 2);
/// ```
#[derive(Debug)]
pub enum DitherError {
    Palette(PaletteError),
    ParseColor(ParseColorError),
    Buffer(BufferError),
    /// Frame `index` does not share the first frame's dimensions.
    FrameSizeMismatch {
        index: usize,
        expected: (usize, usize),
        actual: (usize, usize),
    },
}

impl fmt::Display for DitherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Palette(err) => write!(f, "palette error: {err}"),
            Self::ParseColor(err) => write!(f, "color parse error: {err}"),
            Self::Buffer(err) => write!(f, "buffer error: {err}"),
            Self::FrameSizeMismatch {
                index,
                expected: (ew, eh),
                actual: (aw, ah),
            } => write!(f, "frame {index} is {aw}x{ah}, expected {ew}x{eh}"),
        }
    }
}

impl Error for DitherError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Palette(err) => Some(err),
            Self::ParseColor(err) => Some(err),
            Self::Buffer(err) => Some(err),
            Self::FrameSizeMismatch { .. } => None,
        }
    }
}

macro_rules! wrap_error {
    ($($source:ty => $variant:ident),* $(,)?) => {$(
        impl From<$source> for DitherError {
            fn from(err: $source) -> Self {
                Self::$variant(err)
            }
        }
    )*};
}

wrap_error! {
    PaletteError => Palette,
    ParseColorError => ParseColor,
    BufferError => Buffer,
}
