//! PNG input and preview output.

use std::io::Cursor;

use mapart_core::color::Rgb;

use crate::error::ImageError;

/// A decoded image as opaque sRGB pixels, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Rgb>,
}

/// Decode 8-bit PNG data of any color type.
///
/// Palette and low-bit-depth images are expanded. Alpha is dropped: every
/// pixel is treated as opaque.
pub fn decode_png(data: &[u8]) -> Result<DecodedImage, ImageError> {
    let mut decoder = png::Decoder::new(Cursor::new(data));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| ImageError::PngDecode(e.to_string()))?;

    let mut buf = vec![0u8; reader.output_buffer_size()];
    let frame = reader
        .next_frame(&mut buf)
        .map_err(|e| ImageError::PngDecode(e.to_string()))?;
    buf.truncate(frame.buffer_size());

    let (width, height) = (frame.width, frame.height);
    if width == 0 || height == 0 {
        return Err(ImageError::Empty { width, height });
    }

    let pixels: Vec<Rgb> = match frame.color_type {
        png::ColorType::Rgba => buf.chunks_exact(4).map(|c| Rgb::new(c[0], c[1], c[2])).collect(),
        png::ColorType::Rgb => buf.chunks_exact(3).map(|c| Rgb::new(c[0], c[1], c[2])).collect(),
        png::ColorType::GrayscaleAlpha => buf.chunks_exact(2).map(|c| Rgb::new(c[0], c[0], c[0])).collect(),
        png::ColorType::Grayscale => buf.iter().map(|&v| Rgb::new(v, v, v)).collect(),
        other => return Err(ImageError::Unsupported(format!("{other:?}"))),
    };

    if pixels.len() != width as usize * height as usize {
        return Err(ImageError::Unsupported(format!(
            "{} pixels for {width}x{height}",
            pixels.len()
        )));
    }

    tracing::debug!(width, height, color_type = ?frame.color_type, "Decoded PNG");
    Ok(DecodedImage { width, height, pixels })
}

/// Encode RGBA8 bytes as a PNG.
pub fn encode_rgba_png(width: u32, height: u32, rgba: &[u8]) -> Result<Vec<u8>, ImageError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        let mut writer = encoder
            .write_header()
            .map_err(|e| ImageError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(rgba)
            .map_err(|e| ImageError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}
