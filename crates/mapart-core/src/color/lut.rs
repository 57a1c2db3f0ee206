//! Gamma decoding tables.
//!
//! Both tables are indexed directly by the 8-bit channel value and are
//! generated at compile time by build.rs.

include!(concat!(env!("OUT_DIR"), "/srgb_lut.rs"));

/// Linear-light value of an 8-bit sRGB channel, single precision.
#[inline]
pub fn linear_f32(channel: u8) -> f32 {
    SRGB8_TO_LINEAR[channel as usize]
}

/// Linear-light value of an 8-bit sRGB channel, double precision.
#[inline]
pub fn linear_f64(channel: u8) -> f64 {
    SRGB8_TO_LINEAR_F64[channel as usize]
}
