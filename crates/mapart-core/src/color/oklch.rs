//! Oklch, the polar form of Oklab.

use super::oklab::Oklab;

/// Lightness, chroma and hue (radians, `atan2(b, a)`).
///
/// Hue is meaningless for achromatic colors; it is still computed so callers
/// can use `sin`/`cos` of it without branching, and the guided quantizer's
/// hue term scales with chroma so the value has no effect there.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Oklch {
    pub l: f32,
    pub c: f32,
    pub h: f32,
}

impl From<Oklab> for Oklch {
    #[inline]
    fn from(lab: Oklab) -> Self {
        Oklch {
            l: lab.l,
            c: lab.a.hypot(lab.b),
            h: lab.b.atan2(lab.a),
        }
    }
}

impl From<Oklch> for Oklab {
    #[inline]
    fn from(lch: Oklch) -> Self {
        Oklab {
            l: lch.l,
            a: lch.c * lch.h.cos(),
            b: lch.c * lch.h.sin(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    #[test]
    fn test_polar_round_trip() {
        for rgb in [
            Rgb::new(255, 0, 0),
            Rgb::new(0, 128, 255),
            Rgb::new(60, 200, 40),
            Rgb::new(128, 128, 128),
        ] {
            let lab = Oklab::from(rgb);
            let back = Oklab::from(Oklch::from(lab));
            assert!((lab.l - back.l).abs() < 1e-6);
            assert!((lab.a - back.a).abs() < 1e-6);
            assert!((lab.b - back.b).abs() < 1e-6);
        }
    }

    #[test]
    fn test_gray_has_zero_chroma() {
        let lch = Oklch::from(Oklab::from(Rgb::new(100, 100, 100)));
        assert!(lch.c < 1e-4);
    }

    #[test]
    fn test_hue_range() {
        let lch = Oklch::from(Oklab::new(0.5, -0.1, -0.1));
        assert!(lch.h > -std::f32::consts::PI && lch.h <= std::f32::consts::PI);
    }
}
