//! 8-bit sRGB color triple.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::palette::ParseColorError;

/// Three 8-bit sRGB channels.
///
/// This is the color every pixel and every palette entry starts from. It is
/// `Hash + Eq` so it can key memo caches directly, and serializes as a
/// `[r, g, b]` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from float channels, clamping each to 0..=255 and
    /// rounding to the nearest integer. Non-finite channels become 0.
    #[inline]
    pub fn from_f32_clamped(c: [f32; 3]) -> Self {
        fn channel(v: f32) -> u8 {
            if v.is_finite() {
                v.round().clamp(0.0, 255.0) as u8
            } else {
                0
            }
        }
        Self::new(channel(c[0]), channel(c[1]), channel(c[2]))
    }

    #[inline]
    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    #[inline]
    pub fn to_f32(self) -> [f32; 3] {
        [self.r as f32, self.g as f32, self.b as f32]
    }

    /// Squared Euclidean distance in raw sRGB channel space.
    #[inline]
    pub fn distance_squared_f32(self, other: [f32; 3]) -> f32 {
        let dr = self.r as f32 - other[0];
        let dg = self.g as f32 - other[1];
        let db = self.b as f32 - other[2];
        dr * dr + dg * dg + db * db
    }

    /// Rec. 601 luma on the 0..=255 scale.
    #[inline]
    pub fn luma(c: [f32; 3]) -> f32 {
        0.299 * c[0] + 0.587 * c[1] + 0.114 * c[2]
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(c: [u8; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        c.to_array()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ParseColorError;

    /// Parse `#RRGGBB`, `RRGGBB`, `#RGB` or `RGB`, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if !s.is_ascii() {
            return Err(ParseColorError::InvalidLength(s.chars().count()));
        }

        match s.len() {
            3 => {
                let r = u8::from_str_radix(&s[0..1], 16)? * 17;
                let g = u8::from_str_radix(&s[1..2], 16)? * 17;
                let b = u8::from_str_radix(&s[2..3], 16)? * 17;
                Ok(Self::new(r, g, b))
            }
            6 => {
                let r = u8::from_str_radix(&s[0..2], 16)?;
                let g = u8::from_str_radix(&s[2..4], 16)?;
                let b = u8::from_str_radix(&s[4..6], 16)?;
                Ok(Self::new(r, g, b))
            }
            n => Err(ParseColorError::InvalidLength(n)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!("#FF8000".parse::<Rgb>().unwrap(), Rgb::new(255, 128, 0));
        assert_eq!("ff8000".parse::<Rgb>().unwrap(), Rgb::new(255, 128, 0));
        assert_eq!("#F00".parse::<Rgb>().unwrap(), Rgb::new(255, 0, 0));
        assert_eq!("  #0a0B0c ".parse::<Rgb>().unwrap(), Rgb::new(10, 11, 12));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "#FFFF".parse::<Rgb>(),
            Err(ParseColorError::InvalidLength(4))
        );
        assert!(matches!(
            "#GG0000".parse::<Rgb>(),
            Err(ParseColorError::InvalidHex(_))
        ));
        assert!("#ééé".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_display_round_trip() {
        let c = Rgb::new(1, 171, 255);
        assert_eq!(c.to_string(), "#01abff");
        assert_eq!(c.to_string().parse::<Rgb>().unwrap(), c);
    }

    #[test]
    fn test_from_f32_clamped() {
        assert_eq!(
            Rgb::from_f32_clamped([-12.0, 127.6, 300.0]),
            Rgb::new(0, 128, 255)
        );
        assert_eq!(Rgb::from_f32_clamped([f32::NAN, 0.0, 0.0]), Rgb::new(0, 0, 0));
    }

    #[test]
    fn test_serializes_as_array() {
        let json = serde_json::to_string(&Rgb::new(1, 2, 3)).unwrap();
        assert_eq!(json, "[1,2,3]");
        let back: Rgb = serde_json::from_str("[4,5,6]").unwrap();
        assert_eq!(back, Rgb::new(4, 5, 6));
    }
}
