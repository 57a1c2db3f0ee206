//! CIE L*a*b* (D65) and the CIEDE2000 color difference.
//!
//! This is the space the nearest-color matcher works in. Everything is f64;
//! the symmetry of [`delta_e_2000`] is tested to 1e-9.

use std::collections::HashMap;

use super::lut::linear_f64;
use super::rgb::Rgb;

/// D65 reference white used to normalize XYZ.
const WHITE_X: f64 = 0.95047;
const WHITE_Y: f64 = 1.0;
const WHITE_Z: f64 = 1.08883;

/// Threshold between the cube-root and linear branches of the Lab transfer.
const EPSILON: f64 = 0.008856;
const KAPPA: f64 = 903.3;

/// 25^7, the chroma-correction constant of CIEDE2000.
const POW25_7: f64 = 6_103_515_625.0;

/// A color in CIE L*a*b* space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    /// Lightness, 0 (black) to 100 (white).
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

impl Lab {
    #[inline]
    pub fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }
}

#[inline]
fn lab_f(t: f64) -> f64 {
    if t > EPSILON {
        t.cbrt()
    } else {
        (KAPPA * t + 16.0) / 116.0
    }
}

impl From<Rgb> for Lab {
    fn from(rgb: Rgb) -> Self {
        let r = linear_f64(rgb.r);
        let g = linear_f64(rgb.g);
        let b = linear_f64(rgb.b);

        let x = (0.4124 * r + 0.3576 * g + 0.1805 * b) / WHITE_X;
        let y = (0.2126 * r + 0.7152 * g + 0.0722 * b) / WHITE_Y;
        let z = (0.0193 * r + 0.1192 * g + 0.9505 * b) / WHITE_Z;

        let fx = lab_f(x);
        let fy = lab_f(y);
        let fz = lab_f(z);

        Lab {
            l: 116.0 * fy - 16.0,
            a: 500.0 * (fx - fy),
            b: 200.0 * (fy - fz),
        }
    }
}

/// Hue angle in degrees, normalized to `[0, 360)`.
#[inline]
fn hue_degrees(b: f64, a: f64) -> f64 {
    if a == 0.0 && b == 0.0 {
        return 0.0;
    }
    let h = b.atan2(a).to_degrees();
    if h < 0.0 {
        h + 360.0
    } else {
        h
    }
}

/// CIEDE2000 color difference (kL = kC = kH = 1).
///
/// Follows Sharma, Wu & Dalal (2005), including the mean-hue rule for hue
/// pairs more than 180° apart. The result is symmetric in its arguments.
pub fn delta_e_2000(lab1: Lab, lab2: Lab) -> f64 {
    let c1 = lab1.a.hypot(lab1.b);
    let c2 = lab2.a.hypot(lab2.b);
    let c_bar = (c1 + c2) / 2.0;
    let c_bar7 = c_bar.powi(7);
    let g = 0.5 * (1.0 - (c_bar7 / (c_bar7 + POW25_7)).sqrt());

    let a1p = lab1.a * (1.0 + g);
    let a2p = lab2.a * (1.0 + g);
    let c1p = a1p.hypot(lab1.b);
    let c2p = a2p.hypot(lab2.b);
    let h1p = hue_degrees(lab1.b, a1p);
    let h2p = hue_degrees(lab2.b, a2p);

    let d_lp = lab2.l - lab1.l;
    let d_cp = c2p - c1p;

    let chroma_product = c1p * c2p;
    let d_hp_angle = if chroma_product == 0.0 {
        0.0
    } else {
        let d = h2p - h1p;
        if d > 180.0 {
            d - 360.0
        } else if d < -180.0 {
            d + 360.0
        } else {
            d
        }
    };
    let d_hp = 2.0 * chroma_product.sqrt() * (d_hp_angle.to_radians() / 2.0).sin();

    let l_bar_p = (lab1.l + lab2.l) / 2.0;
    let c_bar_p = (c1p + c2p) / 2.0;
    let h_bar_p = if chroma_product == 0.0 {
        h1p + h2p
    } else if (h1p - h2p).abs() <= 180.0 {
        (h1p + h2p) / 2.0
    } else if h1p + h2p < 360.0 {
        (h1p + h2p + 360.0) / 2.0
    } else {
        (h1p + h2p - 360.0) / 2.0
    };

    let t = 1.0 - 0.17 * (h_bar_p - 30.0).to_radians().cos()
        + 0.24 * (2.0 * h_bar_p).to_radians().cos()
        + 0.32 * (3.0 * h_bar_p + 6.0).to_radians().cos()
        - 0.20 * (4.0 * h_bar_p - 63.0).to_radians().cos();

    let d_theta = 30.0 * (-((h_bar_p - 275.0) / 25.0).powi(2)).exp();
    let c_bar_p7 = c_bar_p.powi(7);
    let r_c = 2.0 * (c_bar_p7 / (c_bar_p7 + POW25_7)).sqrt();
    let l_off = (l_bar_p - 50.0).powi(2);
    let s_l = 1.0 + 0.015 * l_off / (20.0 + l_off).sqrt();
    let s_c = 1.0 + 0.045 * c_bar_p;
    let s_h = 1.0 + 0.015 * c_bar_p * t;
    let r_t = -(2.0 * d_theta).to_radians().sin() * r_c;

    let tl = d_lp / s_l;
    let tc = d_cp / s_c;
    let th = d_hp / s_h;

    (tl * tl + tc * tc + th * th + r_t * tc * th).max(0.0).sqrt()
}

/// Memo of `Rgb -> Lab` conversions keyed by the exact channel triple.
///
/// The cache is owned by its caller (normally the
/// [`Session`](crate::session::Session)) and is cleared whenever the active
/// palette is reassembled.
#[derive(Debug, Default, Clone)]
pub struct LabCache {
    entries: HashMap<Rgb, Lab>,
}

impl LabCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the Lab value of `rgb`, converting it on first use.
    #[inline]
    pub fn lab(&mut self, rgb: Rgb) -> Lab {
        *self.entries.entry(rgb).or_insert_with(|| Lab::from(rgb))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
