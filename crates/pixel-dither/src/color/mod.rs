//! Color type and metric utilities
//!
//! This module provides the 8-bit RGB [`Color`] value type together with the
//! distance and luminance functions used by the dithering and extraction
//! stages.
//!
//! # Metrics
//!
//! - [`Color::distance`]: plain Euclidean distance over (R, G, B). Used for
//!   every exact nearest-color search.
//! - [`Color::perceptual_distance`]: "redmean" weighted distance. Used only
//!   by the palette extractor when judging swatch diversity.
//! - [`Color::luminance`]: Rec. 601 luma, range 0..=255.
//!
//! # Example
//!
//! ```
//! use pixel_dither::Color;
//!
//! let red = Color::parse_hex("#ff0000");
//!
//! assert_eq!(red.distance(Color::BLACK), 255.0);
//! assert!(red.distance(Color::WHITE) > 360.0);
//! ```

mod rgb;

pub use rgb::Color;
