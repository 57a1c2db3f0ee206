//! Test fixtures and constants.

use mapart_core::color::Rgb;

/// Exact built-in palette colors
pub mod colors {
    use mapart_core::color::Rgb;

    pub const WHITE_WOOL: Rgb = Rgb::new(233, 236, 236);
    pub const RED_WOOL: Rgb = Rgb::new(160, 39, 34);
    pub const LIME_WOOL: Rgb = Rgb::new(112, 185, 25);
    pub const BLACK_CONCRETE: Rgb = Rgb::new(8, 10, 15);
}

/// Wool-only palette, no diffusion
pub const WOOL_DIRECT_CONFIG: &str = r#"
palette:
  terracotta: false
  concrete: false
  custom: false
dither:
  method: none
export:
  name: art
"#;

/// Encode RGB pixels as an 8-bit RGB PNG
pub fn rgb_png(width: u32, height: u32, pixels: &[Rgb]) -> Vec<u8> {
    let data: Vec<u8> = pixels.iter().flat_map(|p| p.to_array()).collect();
    let mut buf = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(&data).unwrap();
    }
    buf
}

/// A horizontal gradient from black to white
pub fn gradient(width: u32, height: u32) -> Vec<Rgb> {
    (0..height)
        .flat_map(|_| {
            (0..width).map(move |x| {
                let v = (x * 255 / width.max(2).saturating_sub(1)).min(255) as u8;
                Rgb::new(v, v, v)
            })
        })
        .collect()
}
