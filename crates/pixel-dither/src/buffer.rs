//! Pixel containers.
//!
//! [`PixelBuffer`] is the working grid every pipeline stage consumes and
//! produces. [`RasterImage`] is the decoded RGBA source handed over by the
//! input layer; it keeps alpha so the palette extractor can skip
//! transparent pixels.

use std::fmt;

use crate::color::Color;

/// Error type for buffer construction.
#[derive(Debug, Clone, PartialEq)]
pub enum BufferError {
    /// Pixel data length does not match the declared dimensions
    LengthMismatch {
        /// Expected number of elements (pixels or bytes)
        expected: usize,
        /// Number of elements supplied
        actual: usize,
    },
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferError::LengthMismatch { expected, actual } => {
                write!(
                    f,
                    "pixel data length mismatch: expected {}, got {}",
                    expected, actual
                )
            }
        }
    }
}

impl std::error::Error for BufferError {}

/// A 2D grid of colors in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl PixelBuffer {
    /// Wrap row-major pixels.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::LengthMismatch`] unless
    /// `pixels.len() == width * height`.
    pub fn new(width: usize, height: usize, pixels: Vec<Color>) -> Result<Self, BufferError> {
        let expected = width * height;
        if pixels.len() != expected {
            return Err(BufferError::LengthMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Wrap pixels already known to match the dimensions.
    pub(crate) fn from_parts(width: usize, height: usize, pixels: Vec<Color>) -> Self {
        debug_assert_eq!(pixels.len(), width * height);
        Self {
            width,
            height,
            pixels,
        }
    }

    /// A buffer with every cell set to `color`.
    pub fn filled(width: usize, height: usize, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width * height],
        }
    }

    /// Build a buffer from packed `[R, G, B, ...]` bytes.
    pub fn from_rgb_bytes(width: usize, height: usize, bytes: &[u8]) -> Result<Self, BufferError> {
        let expected = width * height * 3;
        if bytes.len() != expected {
            return Err(BufferError::LengthMismatch {
                expected,
                actual: bytes.len(),
            });
        }
        let pixels = bytes
            .chunks_exact(3)
            .map(|p| Color::new(p[0], p[1], p[2]))
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Width in cells.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in cells.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// True when the buffer has no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Color at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is out of bounds.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Color {
        debug_assert!(x < self.width && y < self.height);
        self.pixels[y * self.width + x]
    }

    /// Overwrite the color at `(x, y)`.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, color: Color) {
        debug_assert!(x < self.width && y < self.height);
        self.pixels[y * self.width + x] = color;
    }

    /// All pixels, row-major.
    #[inline]
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Consume the buffer, returning its pixels.
    pub fn into_pixels(self) -> Vec<Color> {
        self.pixels
    }

    /// Packed `[R, G, B, R, G, B, ...]` bytes, length `width * height * 3`.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.pixels.len() * 3);
        for c in &self.pixels {
            rgb.extend_from_slice(&c.to_bytes());
        }
        rgb
    }
}

/// A decoded RGBA8 raster image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl RasterImage {
    /// Wrap packed `[R, G, B, A, ...]` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::LengthMismatch`] unless
    /// `data.len() == width * height * 4`.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self, BufferError> {
        let expected = width * height * 4;
        if data.len() != expected {
            return Err(BufferError::LengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A fully opaque image from a pixel buffer.
    pub fn from_pixel_buffer(buffer: &PixelBuffer) -> Self {
        let mut data = Vec::with_capacity(buffer.pixels().len() * 4);
        for c in buffer.pixels() {
            data.extend_from_slice(&[c.r, c.g, c.b, 255]);
        }
        Self {
            width: buffer.width(),
            height: buffer.height(),
            data,
        }
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// True when the image has no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw RGBA bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// `[R, G, B, A]` at `(x, y)`.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let i = (y * self.width + x) * 4;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    /// Flatten to opaque colors, compositing translucent pixels over white.
    pub fn to_pixel_buffer(&self) -> PixelBuffer {
        let pixels = self
            .data
            .chunks_exact(4)
            .map(|p| composite_over_white(p[0], p[1], p[2], p[3]))
            .collect();
        PixelBuffer {
            width: self.width,
            height: self.height,
            pixels,
        }
    }
}

/// Alpha composite against white.
fn composite_over_white(r: u8, g: u8, b: u8, a: u8) -> Color {
    match a {
        255 => Color::new(r, g, b),
        0 => Color::WHITE,
        _ => {
            let af = a as u16;
            let blend = |c: u8| ((c as u16 * af + 255 * (255 - af)) / 255) as u8;
            Color::new(blend(r), blend(g), blend(b))
        }
    }
}
