//! 8-bit RGB color type
//!
//! Colors are plain value types: three channel intensities in 0..=255.
//! Equality is exact component match.

use std::fmt;
use std::str::FromStr;

use crate::palette::ParseColorError;

/// A color with three 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    /// Red channel (0..=255)
    pub r: u8,
    /// Green channel (0..=255)
    pub g: u8,
    /// Blue channel (0..=255)
    pub b: u8,
}

impl Color {
    /// Pure black, also the fallback for malformed hex input.
    pub const BLACK: Color = Color::new(0, 0, 0);

    /// Pure white.
    pub const WHITE: Color = Color::new(255, 255, 255);

    /// Create a color from channel values.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a color from a byte array `[R, G, B]`.
    #[inline]
    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2])
    }

    /// Convert to a byte array `[R, G, B]`.
    #[inline]
    pub const fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Create a color from floating-point channels.
    ///
    /// Each channel is clamped to 0..=255 and rounded to the nearest integer.
    #[inline]
    pub fn from_f32(r: f32, g: f32, b: f32) -> Self {
        Self::new(channel_from_f32(r), channel_from_f32(g), channel_from_f32(b))
    }

    /// Channels as floats, in the same 0..=255 scale.
    #[inline]
    pub fn to_f32(self) -> [f32; 3] {
        [self.r as f32, self.g as f32, self.b as f32]
    }

    /// Parse a hex color permissively.
    ///
    /// Accepts an optional leading `#` followed by exactly six hex digits
    /// (case-insensitive). Any other input yields [`Color::BLACK`]; there is
    /// no error channel. Use [`str::parse`] for strict parsing.
    ///
    /// # Example
    /// ```
    /// use pixel_dither::Color;
    ///
    /// assert_eq!(Color::parse_hex("#FF8000"), Color::new(255, 128, 0));
    /// assert_eq!(Color::parse_hex("ff8000"), Color::new(255, 128, 0));
    /// assert_eq!(Color::parse_hex("#f80"), Color::BLACK);
    /// assert_eq!(Color::parse_hex("banana"), Color::BLACK);
    /// ```
    pub fn parse_hex(s: &str) -> Self {
        s.parse().unwrap_or(Self::BLACK)
    }

    /// Format as a lowercase `#rrggbb` string.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Euclidean distance over (R, G, B).
    #[inline]
    pub fn distance(self, other: Color) -> f64 {
        let dr = self.r as f64 - other.r as f64;
        let dg = self.g as f64 - other.g as f64;
        let db = self.b as f64 - other.b as f64;
        (dr * dr + dg * dg + db * db).sqrt()
    }

    /// Weighted "redmean" distance.
    ///
    /// `sqrt((2 + r̄/256)·dR² + 4·dG² + (2 + (255 - r̄)/256)·dB²)` where `r̄`
    /// is the mean of the two red channels.
    #[inline]
    pub fn perceptual_distance(self, other: Color) -> f64 {
        let r_mean = (self.r as f64 + other.r as f64) / 2.0;
        let dr = self.r as f64 - other.r as f64;
        let dg = self.g as f64 - other.g as f64;
        let db = self.b as f64 - other.b as f64;
        ((2.0 + r_mean / 256.0) * dr * dr
            + 4.0 * dg * dg
            + (2.0 + (255.0 - r_mean) / 256.0) * db * db)
            .sqrt()
    }

    /// Rec. 601 luma: `0.299 R + 0.587 G + 0.114 B`, range 0..=255.
    #[inline]
    pub fn luminance(self) -> f64 {
        0.299 * self.r as f64 + 0.587 * self.g as f64 + 0.114 * self.b as f64
    }

    /// HSV saturation in 0..=1 (`(max - min) / max`, 0 for black).
    pub fn saturation(self) -> f64 {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        if max == 0 {
            0.0
        } else {
            (max - min) as f64 / max as f64
        }
    }

    /// HSV value (brightness) in 0..=1.
    pub fn brightness(self) -> f64 {
        self.r.max(self.g).max(self.b) as f64 / 255.0
    }

    /// Linear per-channel interpolation, rounded to the nearest integer.
    ///
    /// `t` is expected in 0..=1; `t = 0` returns `self`, `t = 1` returns `other`.
    pub fn lerp(self, other: Color, t: f64) -> Color {
        let mix = |a: u8, b: u8| -> u8 {
            let v = a as f64 + (b as f64 - a as f64) * t;
            v.round().clamp(0.0, 255.0) as u8
        };
        Color::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
        )
    }
}

#[inline]
fn channel_from_f32(v: f32) -> u8 {
    v.clamp(0.0, 255.0).round() as u8
}

impl From<[u8; 3]> for Color {
    fn from(bytes: [u8; 3]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    /// Parse a color from `#RRGGBB` or `RRGGBB`.
    ///
    /// Parsing is case-insensitive. Whitespace is not a hex digit, so padded
    /// input is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix('#').unwrap_or(s);

        let mut nibbles = [0u8; 6];
        let mut len = 0;
        for c in s.chars() {
            let digit = c.to_digit(16).ok_or(ParseColorError::InvalidDigit(c))?;
            if len < nibbles.len() {
                nibbles[len] = digit as u8;
            }
            len += 1;
        }
        if len != nibbles.len() {
            return Err(ParseColorError::InvalidLength(len));
        }

        let byte = |i: usize| nibbles[i] << 4 | nibbles[i + 1];
        Ok(Self::new(byte(0), byte(2), byte(4)))
    }
}
