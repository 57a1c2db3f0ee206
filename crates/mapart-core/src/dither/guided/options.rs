use serde::{Deserialize, Serialize};

use crate::palette::Family;

/// Which material families the guided pipeline may pick from.
///
/// With no flag set the filter falls back to wool, terracotta and concrete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FamilyAllow {
    pub wool: bool,
    pub terracotta: bool,
    pub concrete: bool,
    pub custom: bool,
}

impl FamilyAllow {
    pub fn all() -> Self {
        Self {
            wool: true,
            terracotta: true,
            concrete: true,
            custom: true,
        }
    }

    /// Flags actually applied, with the all-unset fallback resolved.
    pub fn resolved(self) -> Self {
        if self.wool || self.terracotta || self.concrete || self.custom {
            self
        } else {
            Self {
                wool: true,
                terracotta: true,
                concrete: true,
                custom: false,
            }
        }
    }

    pub fn allows(&self, family: Family) -> bool {
        match family {
            Family::Wool => self.wool,
            Family::Terracotta => self.terracotta,
            Family::Concrete => self.concrete,
            Family::Custom => self.custom,
        }
    }
}

/// Per-family UI weights in percent. 100 means no material penalty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FamilyWeights {
    pub wool: f32,
    pub terracotta: f32,
    pub concrete: f32,
    pub custom: f32,
}

impl Default for FamilyWeights {
    fn default() -> Self {
        Self {
            wool: 100.0,
            terracotta: 100.0,
            concrete: 100.0,
            custom: 100.0,
        }
    }
}

impl FamilyWeights {
    pub fn percent(&self, family: Family) -> f32 {
        match family {
            Family::Wool => self.wool,
            Family::Terracotta => self.terracotta,
            Family::Concrete => self.concrete,
            Family::Custom => self.custom,
        }
    }

    /// `max(0, (100 - weight) / 100)`.
    pub fn penalty(&self, family: Family) -> f32 {
        ((100.0 - self.percent(family)) / 100.0).max(0.0)
    }
}

/// Configuration for [`GuidedPipeline`](super::GuidedPipeline).
///
/// # Example
///
/// ```
/// use mapart_core::dither::GuidedOptions;
///
/// let options = GuidedOptions::new().pre_smooth(true).serpentine(false);
/// assert_eq!(options.radius, 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidedOptions {
    /// Run the guided filter on L and let a/b follow it.
    ///
    /// Default: `false`
    pub pre_smooth: bool,

    /// Box radius of the guided filter.
    ///
    /// Default: `1`
    pub radius: usize,

    /// Guided filter regularization.
    ///
    /// Default: `5e-3`
    pub epsilon: f32,

    /// Diffuse quantization error. Off means plain per-pixel selection.
    ///
    /// Default: `true`
    pub use_dither: bool,

    /// Alternate scan direction on odd rows.
    ///
    /// Default: `true`
    pub serpentine: bool,

    /// Damp error at lightness edges.
    ///
    /// Default: `true`
    pub edge_aware: bool,

    /// Sobel magnitude at which the edge multiplier is halfway.
    ///
    /// Default: `0.28`
    pub edge_threshold: f32,

    /// Width of the edge sigmoid. Read through [`GuidedOptions::effective_edge_slope`].
    ///
    /// Default: `0.1`
    pub edge_slope: f32,

    /// Add ordered-noise phase (8x8 Bayer) to lightness.
    ///
    /// Default: `true`
    pub natural: bool,

    /// Amplitude of the lightness noise.
    ///
    /// Default: `0.035`
    pub natural_strength: f32,

    /// Default: `0.6`
    pub weight_l: f32,

    /// Default: `1.25`
    pub weight_c: f32,

    /// Default: `1.0`
    pub weight_h: f32,

    /// Cost per unit chroma lost when a chromatic source lands on a gray entry.
    ///
    /// Default: `0.18`
    pub gray_bias: f32,

    /// Default: `0.3`
    pub white_guard_l: f32,

    /// Default: `0.2`
    pub white_guard_c: f32,

    /// Scale of the material penalty.
    ///
    /// Default: `0.18`
    pub penalty_k: f32,

    /// Default: `0.6`
    pub unsharp_amount: f32,

    /// Default: `1`
    pub unsharp_radius: usize,

    /// Default: `2`
    pub unsharp_passes: usize,

    /// Bound on the a/b follow slope.
    ///
    /// Default: `0.6`
    pub follow_slope_cap: f32,

    pub allow: FamilyAllow,

    pub family_weights: FamilyWeights,
}

impl Default for GuidedOptions {
    fn default() -> Self {
        Self {
            pre_smooth: false,
            radius: 1,
            epsilon: 5e-3,
            use_dither: true,
            serpentine: true,
            edge_aware: true,
            edge_threshold: 0.28,
            edge_slope: 0.1,
            natural: true,
            natural_strength: 0.035,
            weight_l: 0.6,
            weight_c: 1.25,
            weight_h: 1.0,
            gray_bias: 0.18,
            white_guard_l: 0.3,
            white_guard_c: 0.2,
            penalty_k: 0.18,
            unsharp_amount: 0.6,
            unsharp_radius: 1,
            unsharp_passes: 2,
            follow_slope_cap: 0.6,
            allow: FamilyAllow::default(),
            family_weights: FamilyWeights::default(),
        }
    }
}

/// Smallest edge sigmoid width the scan will divide by.
pub const MIN_EDGE_SLOPE: f32 = 1e-4;

impl GuidedOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// `edge_slope` floored at [`MIN_EDGE_SLOPE`]; NaN maps to the floor.
    #[inline]
    pub fn effective_edge_slope(&self) -> f32 {
        self.edge_slope.max(MIN_EDGE_SLOPE)
    }

    /// Values below [`MIN_EDGE_SLOPE`] are raised to it.
    #[inline]
    pub fn edge_slope(mut self, slope: f32) -> Self {
        self.edge_slope = slope.max(MIN_EDGE_SLOPE);
        self
    }

    #[inline]
    pub fn natural_strength(mut self, strength: f32) -> Self {
        self.natural_strength = strength;
        self
    }

    #[inline]
    pub fn pre_smooth(mut self, enabled: bool) -> Self {
        self.pre_smooth = enabled;
        self
    }

    #[inline]
    pub fn use_dither(mut self, enabled: bool) -> Self {
        self.use_dither = enabled;
        self
    }

    #[inline]
    pub fn serpentine(mut self, enabled: bool) -> Self {
        self.serpentine = enabled;
        self
    }

    #[inline]
    pub fn edge_aware(mut self, enabled: bool) -> Self {
        self.edge_aware = enabled;
        self
    }

    #[inline]
    pub fn natural(mut self, enabled: bool) -> Self {
        self.natural = enabled;
        self
    }

    #[inline]
    pub fn allow(mut self, allow: FamilyAllow) -> Self {
        self.allow = allow;
        self
    }

    #[inline]
    pub fn family_weights(mut self, weights: FamilyWeights) -> Self {
        self.family_weights = weights;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_allow_falls_back() {
        let allow = FamilyAllow::default().resolved();
        assert!(allow.wool && allow.terracotta && allow.concrete);
        assert!(!allow.custom);

        let only_custom = FamilyAllow {
            custom: true,
            ..FamilyAllow::default()
        };
        assert_eq!(only_custom.resolved(), only_custom);
    }

    #[test]
    fn test_material_penalty() {
        let weights = FamilyWeights {
            wool: 40.0,
            concrete: 150.0,
            ..FamilyWeights::default()
        };
        assert!((weights.penalty(Family::Wool) - 0.6).abs() < 1e-6);
        assert_eq!(weights.penalty(Family::Concrete), 0.0);
        assert_eq!(weights.penalty(Family::Custom), 0.0);
    }

    #[test]
    fn test_edge_slope_floor() {
        assert_eq!(GuidedOptions::new().edge_slope(0.0).edge_slope, MIN_EDGE_SLOPE);
        assert_eq!(GuidedOptions::new().edge_slope(-1.0).edge_slope, MIN_EDGE_SLOPE);
        assert_eq!(GuidedOptions::new().edge_slope(0.25).edge_slope, 0.25);

        let from_config: GuidedOptions = serde_json::from_str(r#"{"edge_slope": 0.0}"#).unwrap();
        assert_eq!(from_config.effective_edge_slope(), MIN_EDGE_SLOPE);
        assert_eq!(GuidedOptions::new().effective_edge_slope(), 0.1);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let opts: GuidedOptions = serde_json::from_str(r#"{"radius": 3, "allow": {"wool": true}}"#).unwrap();
        assert_eq!(opts.radius, 3);
        assert_eq!(opts.epsilon, 5e-3);
        assert!(opts.allow.wool && !opts.allow.concrete);
    }
}
