use std::env;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// IEC 61966-2-1 transfer function, decoding an 8-bit sRGB channel to linear light.
fn decode_channel(byte: u8) -> f64 {
    let c = byte as f64 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("srgb_lut.rs");
    let mut file = File::create(&dest_path).unwrap();

    writeln!(file, "/// Linear-light value of every 8-bit sRGB channel value (f64).").unwrap();
    writeln!(file, "pub static SRGB8_TO_LINEAR_F64: [f64; 256] = [").unwrap();
    for i in 0..=255u8 {
        if i > 0 && i % 4 == 0 {
            writeln!(file).unwrap();
        }
        write!(file, "    {:.17},", decode_channel(i)).unwrap();
    }
    writeln!(file, "\n];").unwrap();

    writeln!(file).unwrap();

    writeln!(file, "/// Linear-light value of every 8-bit sRGB channel value (f32).").unwrap();
    writeln!(file, "pub static SRGB8_TO_LINEAR: [f32; 256] = [").unwrap();
    for i in 0..=255u8 {
        if i > 0 && i % 8 == 0 {
            writeln!(file).unwrap();
        }
        write!(file, "    {:.9},", decode_channel(i) as f32).unwrap();
    }
    writeln!(file, "\n];").unwrap();

    println!("cargo::rerun-if-changed=build.rs");
}
