//! Nearest-color matching against the active palette.
//!
//! The perceptual cost of candidate `i` for an input color is
//!
//! ```text
//! cost_i = deltaE2000(lab(input), lab_i) / (entry_weight_i * group_weight_i)
//! ```
//!
//! Disabled entries cost `+inf`. The scan is linear and keeps the first
//! index on ties, so results are reproducible for a given configuration.

use crate::color::{delta_e_2000, Lab, LabCache, Rgb};
use crate::palette::{ActivePalette, GroupWeights, PaletteEntry, PreferenceTable};

/// Result of a palette lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match {
    pub index: usize,
    /// Weighted cost of the winner; `+inf` when every entry is disabled.
    pub cost: f64,
}

/// Palette lookups with per-entry and per-group weighting.
///
/// Effective divisors are resolved once at construction, so a matcher should
/// be built after the palette and preferences it borrows are final.
pub struct NearestColorMatcher<'a> {
    palette: &'a ActivePalette,
    /// `None` for disabled entries, otherwise `entry_weight * group_weight`.
    divisors: Vec<Option<f64>>,
}

impl<'a> NearestColorMatcher<'a> {
    pub fn new(palette: &'a ActivePalette, prefs: &PreferenceTable, groups: &GroupWeights) -> Self {
        let divisors = palette
            .entries()
            .iter()
            .map(|entry| {
                if !prefs.is_enabled(&entry.block_id) {
                    return None;
                }
                let group = palette
                    .group_of(&entry.block_id)
                    .unwrap_or(entry.group_key.as_str());
                Some(prefs.effective_weight(&entry.block_id) * groups.effective_weight(group))
            })
            .collect();
        Self { palette, divisors }
    }

    pub fn palette(&self) -> &'a ActivePalette {
        self.palette
    }

    pub fn entry(&self, index: usize) -> Option<&'a PaletteEntry> {
        self.palette.get(index)
    }

    /// Whether at least one entry can be selected.
    pub fn has_enabled(&self) -> bool {
        self.divisors.iter().any(Option::is_some)
    }

    pub fn is_enabled(&self, index: usize) -> bool {
        matches!(self.divisors.get(index), Some(Some(_)))
    }

    /// Effective cost of entry `index` for an input already in Lab.
    pub fn cost(&self, lab: Lab, index: usize) -> f64 {
        match self.divisors.get(index).copied().flatten() {
            Some(divisor) => delta_e_2000(lab, self.palette.lab()[index]) / divisor,
            None => f64::INFINITY,
        }
    }

    /// Best entry for an input already in Lab.
    pub fn find_nearest_lab(&self, lab: Lab) -> Match {
        let mut best = Match {
            index: 0,
            cost: f64::INFINITY,
        };
        for index in 0..self.divisors.len() {
            let cost = self.cost(lab, index);
            if cost < best.cost {
                best = Match { index, cost };
            }
        }
        best
    }

    /// Best entry for an sRGB color, memoizing its Lab conversion in `cache`.
    pub fn find_nearest(&self, rgb: Rgb, cache: &mut LabCache) -> Match {
        self.find_nearest_lab(cache.lab(rgb))
    }

    /// Best entry by plain Euclidean distance in sRGB channel space.
    ///
    /// Used by the classic error-diffusion kernels, which work on unclamped
    /// float channels. Enable flags and weights apply as for the perceptual
    /// lookup.
    pub fn find_nearest_srgb(&self, color: [f32; 3]) -> Match {
        let mut best = Match {
            index: 0,
            cost: f64::INFINITY,
        };
        for (index, entry) in self.palette.entries().iter().enumerate() {
            let Some(divisor) = self.divisors[index] else {
                continue;
            };
            let cost = (entry.rgb.distance_squared_f32(color) as f64).sqrt() / divisor;
            if cost < best.cost {
                best = Match { index, cost };
            }
        }
        best
    }
}
