use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Matching preference for one block id.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockPreference {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_enabled() -> bool {
    true
}

fn default_weight() -> f64 {
    1.0
}

impl Default for BlockPreference {
    fn default() -> Self {
        Self {
            enabled: true,
            weight: 1.0,
        }
    }
}

/// Treat non-positive or non-finite weights as 1.0.
#[inline]
fn effective(weight: f64) -> f64 {
    if weight.is_finite() && weight > 0.0 {
        weight
    } else {
        1.0
    }
}

/// Per-block preferences keyed by block id.
///
/// Ids absent from the table are enabled with weight 1.0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreferenceTable {
    prefs: HashMap<String, BlockPreference>,
}

impl PreferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, block_id: &str) -> BlockPreference {
        self.prefs.get(block_id).copied().unwrap_or_default()
    }

    pub fn set(&mut self, block_id: impl Into<String>, pref: BlockPreference) {
        self.prefs.insert(block_id.into(), pref);
    }

    pub fn set_enabled(&mut self, block_id: &str, enabled: bool) {
        self.prefs.entry(block_id.to_string()).or_default().enabled = enabled;
    }

    pub fn set_weight(&mut self, block_id: &str, weight: f64) {
        self.prefs.entry(block_id.to_string()).or_default().weight = weight;
    }

    pub fn is_enabled(&self, block_id: &str) -> bool {
        self.get(block_id).enabled
    }

    /// Configured weight, clamped to a strictly positive value.
    pub fn effective_weight(&self, block_id: &str) -> f64 {
        effective(self.get(block_id).weight)
    }

    pub fn len(&self) -> usize {
        self.prefs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefs.is_empty()
    }
}

/// Multipliers per group key. Unknown keys weigh 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupWeights {
    weights: HashMap<String, f64>,
}

impl Default for GroupWeights {
    fn default() -> Self {
        let weights = ["wool", "terracotta", "concrete", "custom"]
            .into_iter()
            .map(|k| (k.to_string(), 1.0))
            .collect();
        Self { weights }
    }
}

impl GroupWeights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, group_key: impl Into<String>, weight: f64) {
        self.weights.insert(group_key.into(), weight);
    }

    /// Configured weight, clamped to a strictly positive value.
    pub fn effective_weight(&self, group_key: &str) -> f64 {
        self.weights.get(group_key).copied().map_or(1.0, effective)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(k, &v)| (k.as_str(), v))
    }
}
