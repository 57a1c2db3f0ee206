//! Options shared by the direct, classic and ordered policies.

/// Configuration for the classic error-diffusion and ordered policies.
///
/// # Example
///
/// ```
/// use mapart_core::dither::DitherOptions;
///
/// let options = DitherOptions::new().natural(true).natural_strength(0.5);
/// assert_eq!(options.strength_ratio(), 0.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DitherOptions {
    /// Modulate propagated error by local contrast.
    ///
    /// Default: `false`
    pub natural: bool,

    /// Global multiplier on the local strength, 0.0..=1.0.
    ///
    /// Default: `1.0`
    pub natural_strength: f32,
}

impl Default for DitherOptions {
    fn default() -> Self {
        Self {
            natural: false,
            natural_strength: 1.0,
        }
    }
}

impl DitherOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn natural(mut self, enabled: bool) -> Self {
        self.natural = enabled;
        self
    }

    #[inline]
    pub fn natural_strength(mut self, ratio: f32) -> Self {
        self.natural_strength = ratio;
        self
    }

    /// Global ratio clamped to 0.0..=1.0; non-finite values count as 1.0.
    #[inline]
    pub fn strength_ratio(&self) -> f32 {
        if self.natural_strength.is_finite() {
            self.natural_strength.clamp(0.0, 1.0)
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let o = DitherOptions::new();
        assert!(!o.natural);
        assert_eq!(o.strength_ratio(), 1.0);
    }

    #[test]
    fn test_ratio_clamped() {
        assert_eq!(DitherOptions::new().natural_strength(1.7).strength_ratio(), 1.0);
        assert_eq!(DitherOptions::new().natural_strength(-1.0).strength_ratio(), 0.0);
        assert_eq!(DitherOptions::new().natural_strength(f32::NAN).strength_ratio(), 1.0);
    }
}
