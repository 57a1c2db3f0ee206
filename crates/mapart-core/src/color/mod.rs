//! Color types, conversions and perceptual distance.
//!
//! Two perceptual spaces are used side by side:
//!
//! - **CIE Lab** (f64) with the CIEDE2000 difference, used by the
//!   [`NearestColorMatcher`](crate::matcher::NearestColorMatcher) for palette
//!   lookups.
//! - **Oklab / Oklch** (f32), a cheaper space used by the guided quantizer.
//!
//! Both start from [`Rgb`], an 8-bit sRGB triple, and decode gamma through a
//! 256-entry lookup table generated by `build.rs`.

mod lab;
mod lut;
mod oklab;
mod oklch;
mod rgb;

pub use lab::{delta_e_2000, Lab, LabCache};
pub use lut::{linear_f32, linear_f64};
pub use oklab::Oklab;
pub use oklch::Oklch;
pub use rgb::Rgb;
