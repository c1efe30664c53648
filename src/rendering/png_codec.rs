//! PNG decoding into raster images and palette-aware PNG encoding.

use pixel_dither::{Palette, PixelBuffer, RasterImage};
use std::io::Cursor;

use crate::error::RenderError;

/// Decode a PNG of any color type and bit depth into an RGBA8 image.
///
/// Images wider or taller than `max_dimension` are rejected before their
/// pixel data is read.
pub fn decode_png(bytes: &[u8], max_dimension: usize) -> Result<RasterImage, RenderError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| RenderError::PngDecode(e.to_string()))?;

    let (width, height) = {
        let info = reader.info();
        (info.width as usize, info.height as usize)
    };
    if width > max_dimension || height > max_dimension {
        return Err(RenderError::ImageTooLarge {
            width,
            height,
            max: max_dimension,
        });
    }

    let mut buf = vec![0; reader.output_buffer_size()];
    let frame = reader
        .next_frame(&mut buf)
        .map_err(|e| RenderError::PngDecode(e.to_string()))?;
    let data = &buf[..frame.buffer_size()];

    let rgba: Vec<u8> = match frame.color_type {
        png::ColorType::Rgba => data.to_vec(),
        png::ColorType::Rgb => data
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        png::ColorType::Grayscale => data.iter().flat_map(|&l| [l, l, l, 255]).collect(),
        png::ColorType::GrayscaleAlpha => data
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        png::ColorType::Indexed => {
            return Err(RenderError::PngDecode(
                "indexed data was not expanded".to_string(),
            ))
        }
    };

    RasterImage::new(width, height, rgba).map_err(|e| RenderError::PngDecode(e.to_string()))
}

/// Encode a rendered buffer as PNG.
///
/// When every pixel is a member of `palette` (and the palette fits in a
/// PLTE chunk) the output is indexed at the smallest bit depth that holds
/// the palette; otherwise it is 8-bit RGB. The result is re-compressed
/// with oxipng.
pub fn encode_png(buffer: &PixelBuffer, palette: Option<&Palette>) -> Result<Vec<u8>, RenderError> {
    let width = buffer.width() as u32;
    let height = buffer.height() as u32;

    let indexed = palette
        .filter(|p| p.len() <= 256)
        .and_then(|p| palette_indices(buffer, p).map(|indices| (p, indices)));

    let png_bytes = match indexed {
        Some((palette, indices)) => {
            let (depth, bits) = match palette.len() {
                0..=2 => (png::BitDepth::One, 1),
                3..=4 => (png::BitDepth::Two, 2),
                5..=16 => (png::BitDepth::Four, 4),
                _ => (png::BitDepth::Eight, 8),
            };
            let plte: Vec<u8> = palette.colors().iter().flat_map(|c| c.to_bytes()).collect();
            let packed = if bits == 8 {
                indices
            } else {
                pack_nbits(&indices, width, bits)
            };
            write_png(
                width,
                height,
                png::ColorType::Indexed,
                depth,
                Some(&plte),
                &packed,
            )?
        }
        None => write_png(
            width,
            height,
            png::ColorType::Rgb,
            png::BitDepth::Eight,
            None,
            &buffer.to_rgb_bytes(),
        )?,
    };

    // Fast settings above; oxipng picks filters and compression
    let optimized = oxipng::optimize_from_memory(
        &png_bytes,
        &oxipng::Options {
            strip: oxipng::StripChunks::Safe,
            optimize_alpha: false,
            ..Default::default()
        },
    )
    .unwrap_or(png_bytes);
    Ok(optimized)
}

/// Map every pixel to its palette index, or `None` if any pixel is off-palette.
fn palette_indices(buffer: &PixelBuffer, palette: &Palette) -> Option<Vec<u8>> {
    buffer
        .pixels()
        .iter()
        .map(|&c| palette.index_of(c).map(|i| i as u8))
        .collect()
}

fn write_png(
    width: u32,
    height: u32,
    color_type: png::ColorType,
    bit_depth: png::BitDepth,
    plte: Option<&[u8]>,
    data: &[u8],
) -> Result<Vec<u8>, RenderError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(color_type);
        encoder.set_depth(bit_depth);
        encoder.set_compression(png::Compression::Fast);
        encoder.set_filter(png::FilterType::NoFilter);
        if let Some(plte) = plte {
            encoder.set_palette(plte);
        }
        let mut writer = encoder
            .write_header()
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(data)
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

/// Pack palette indices into N-bit PNG row data (1, 2, or 4 bits per pixel).
///
/// Each row starts on a byte boundary, most significant bits first.
fn pack_nbits(indices: &[u8], width: u32, bits: u8) -> Vec<u8> {
    let width = width as usize;
    if width == 0 {
        return Vec::new();
    }
    let pixels_per_byte = 8 / bits as usize;
    let bytes_per_row = width.div_ceil(pixels_per_byte);
    let mask = (1u8 << bits) - 1;
    let mut packed = Vec::with_capacity(bytes_per_row * (indices.len() / width));

    for row in indices.chunks(width) {
        let mut byte = 0u8;
        for (i, &idx) in row.iter().enumerate() {
            let shift = (8 - bits) - (i % pixels_per_byte) as u8 * bits;
            byte |= (idx & mask) << shift;

            if (i % pixels_per_byte) == pixels_per_byte - 1 || i == row.len() - 1 {
                packed.push(byte);
                byte = 0;
            }
        }
    }

    packed
}
