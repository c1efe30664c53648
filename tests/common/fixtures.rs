//! Test fixtures: PNG images built in memory.

use std::io::Cursor;

/// Encode raw 8-bit samples as a PNG of the given color type
pub fn png_bytes(width: u32, height: u32, color_type: png::ColorType, data: &[u8]) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(color_type);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().expect("PNG header");
        writer.write_image_data(data).expect("PNG data");
    }
    buf.into_inner()
}

/// Solid RGB image
pub fn solid_png(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    let data: Vec<u8> = (0..width * height).flat_map(|_| rgb).collect();
    png_bytes(width, height, png::ColorType::Rgb, &data)
}

/// Horizontal-and-vertical color ramp, rich enough for dithering and extraction
pub fn gradient_png(width: u32, height: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            data.push((x * 255 / width.max(2).saturating_sub(1)) as u8);
            data.push((y * 255 / height.max(2).saturating_sub(1)) as u8);
            data.push(((x + y) * 127 / (width + height).max(1)) as u8);
        }
    }
    png_bytes(width, height, png::ColorType::Rgb, &data)
}

/// Image split into a left red half and a right blue half
pub fn two_tone_png(width: u32, height: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for _ in 0..height {
        for x in 0..width {
            if x < width / 2 {
                data.extend_from_slice(&[220, 30, 30]);
            } else {
                data.extend_from_slice(&[30, 30, 220]);
            }
        }
    }
    png_bytes(width, height, png::ColorType::Rgb, &data)
}

/// Fully transparent RGBA image
pub fn transparent_png(width: u32, height: u32) -> Vec<u8> {
    let data = vec![0u8; (width * height * 4) as usize];
    png_bytes(width, height, png::ColorType::Rgba, &data)
}
