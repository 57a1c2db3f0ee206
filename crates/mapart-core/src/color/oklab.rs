//! Oklab perceptual color space.
//!
//! Used by the guided quantizer, where it replaces CIE Lab: it is cheaper to
//! compute and its Euclidean distance is already close to perceptual.
//!
//! Björn Ottosson, "A perceptual color space for image processing"
//! <https://bottosson.github.io/posts/oklab/>

use super::lut::linear_f32;
use super::rgb::Rgb;

/// A color in Oklab space.
///
/// Values are not clamped: error diffusion in the guided quantizer pushes
/// working colors outside the gamut and relies on that headroom.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Oklab {
    /// Lightness: 0.0 (black) to 1.0 (white) for in-gamut colors
    pub l: f32,
    /// Green-red axis
    pub a: f32,
    /// Blue-yellow axis
    pub b: f32,
}

impl Oklab {
    #[inline]
    pub fn new(l: f32, a: f32, b: f32) -> Self {
        Self { l, a, b }
    }

    /// Convert linear-light RGB (0.0..=1.0 per channel) to Oklab.
    ///
    /// The linear-to-LMS rows do not sum to exactly 1, so white lands about
    /// 1e-4 off the neutral axis. Palette costs are tuned against these
    /// coefficients.
    pub fn from_linear(r: f32, g: f32, b: f32) -> Self {
        let l = 0.412165612 * r + 0.536275208 * g + 0.0514575653 * b;
        let m = 0.211859107 * r + 0.6807189584 * g + 0.107406579 * b;
        let s = 0.0883097947 * r + 0.2818474174 * g + 0.6302613616 * b;

        let l_ = l.cbrt();
        let m_ = m.cbrt();
        let s_ = s.cbrt();

        Oklab {
            l: 0.2104542553 * l_ + 0.7936177850 * m_ - 0.0040720468 * s_,
            a: 1.9779984951 * l_ - 2.4285922050 * m_ + 0.4505937099 * s_,
            b: 0.0259040371 * l_ + 0.7827717662 * m_ - 0.8086757660 * s_,
        }
    }

    /// Squared Euclidean distance.
    #[inline]
    pub fn distance_squared(self, other: Oklab) -> f32 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        dl * dl + da * da + db * db
    }
}

impl From<Rgb> for Oklab {
    /// Gamma-decode through the 256-entry table, then convert.
    #[inline]
    fn from(rgb: Rgb) -> Self {
        Oklab::from_linear(linear_f32(rgb.r), linear_f32(rgb.g), linear_f32(rgb.b))
    }
}
