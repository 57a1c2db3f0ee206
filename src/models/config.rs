use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use mapart_core::color::Rgb;
use mapart_core::dither::{DitherMethod, GuidedOptions};
use mapart_core::palette::{AllowRule, GroupWeights, PaletteEntry, ParseColorError, PreferenceTable, SourceSelection};

/// Default config file name, relative to the working directory
pub const CONFIG_FILE: &str = "config.yaml";

/// Application configuration loaded from config.yaml
///
/// Every section has defaults, so a partial or missing file still works.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Palette sources
    pub palette: PaletteConfig,

    /// Extra blocks, merged after the built-in sets
    pub custom: Vec<CustomBlockConfig>,

    /// Multipliers per group key (wool, terracotta, concrete, custom, import categories)
    pub group_weights: GroupWeights,

    /// Per-block enable flags and weights
    pub block_prefs: PreferenceTable,

    pub dither: DitherConfig,

    /// Options of the `guided` method
    pub guided: GuidedOptions,

    pub export: ExportConfig,

    pub import: ImportConfig,
}

/// Which palette sources are enabled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    pub wool: bool,
    pub terracotta: bool,
    pub concrete: bool,
    pub custom: bool,

    /// Imported categories to enable. Empty enables all of them.
    pub categories: Vec<String>,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            wool: true,
            terracotta: true,
            concrete: true,
            custom: true,
            categories: Vec::new(),
        }
    }
}

impl PaletteConfig {
    pub fn selection(&self) -> SourceSelection {
        SourceSelection {
            wool: self.wool,
            terracotta: self.terracotta,
            concrete: self.concrete,
            custom: self.custom,
        }
    }

    /// Enable flags for the given imported categories.
    pub fn category_flags<'a>(&self, keys: impl IntoIterator<Item = &'a str>) -> HashMap<String, bool> {
        keys.into_iter()
            .map(|key| {
                let enabled = self.categories.is_empty() || self.categories.iter().any(|c| c == key);
                (key.to_string(), enabled)
            })
            .collect()
    }
}

/// A custom block written as hex color, id and label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomBlockConfig {
    /// `#rrggbb` or `#rgb`
    pub color: String,
    pub id: String,
    #[serde(default)]
    pub label: String,
}

impl CustomBlockConfig {
    pub fn to_entry(&self) -> Result<PaletteEntry, ParseColorError> {
        let rgb: Rgb = self.color.parse()?;
        Ok(PaletteEntry::new(rgb, self.id.clone(), self.label.clone(), "custom"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DitherConfig {
    pub method: DitherMethod,

    /// Adapt diffusion strength to local contrast
    pub natural: bool,

    /// Global natural strength in percent (0..100)
    pub natural_strength: f32,
}

impl Default for DitherConfig {
    fn default() -> Self {
        Self {
            method: DitherMethod::default(),
            natural: false,
            natural_strength: 100.0,
        }
    }
}

impl DitherConfig {
    /// Natural strength as a 0..=1 ratio.
    pub fn strength_ratio(&self) -> f32 {
        (self.natural_strength / 100.0).clamp(0.0, 1.0)
    }
}

/// Structure file flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Bedrock `.mcstructure` tiles
    #[default]
    Bedrock,
    /// Java gzip `.nbt`
    Java,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub format: ExportFormat,

    /// Base file name, without extension
    pub name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::default(),
            name: "mapart".to_string(),
        }
    }
}

/// External block-set import
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Blocks to keep and the category each lands in
    pub allow: Vec<AllowRule>,

    /// JSON file of `{rgb, id, label}` records
    pub blocks: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from a YAML file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_yaml(&content),
            Err(e) => {
                tracing::warn!(%e, path = %path.display(), "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Parse YAML, falling back to defaults
    pub fn from_yaml(content: &str) -> Self {
        match serde_yaml::from_str::<Self>(content) {
            Ok(config) => {
                tracing::info!(
                    method = %config.dither.method,
                    custom = config.custom.len(),
                    allow_rules = config.import.allow.len(),
                    "Loaded configuration"
                );
                config
            }
            Err(e) => {
                tracing::warn!(%e, "Failed to parse config, using defaults");
                Self::default()
            }
        }
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}
