//! Shapes of the persisted settings document.
//!
//! ```json
//! {
//!   "customPalette": [{"rgb": [10, 20, 30], "blockId": "my:block", "displayLabel": "Mine"}],
//!   "groupWeights": {"wool": 1.0},
//!   "blockPrefs": {"minecraft:black_wool": {"enabled": false, "weight": 1.0}},
//!   "dynamicCategories": {"brown": true}
//! }
//! ```
//!
//! Custom entries written by older versions as `[r, g, b, id, label]` arrays
//! are accepted on load and always saved as objects. Records that fit neither
//! shape, or that carry a blank id, are skipped without failing the document.

use std::collections::HashMap;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use crate::color::Rgb;
use crate::palette::{GroupWeights, PaletteEntry, PreferenceTable};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedSettings {
    #[serde(deserialize_with = "deserialize_custom")]
    pub custom_palette: Vec<PaletteEntry>,
    pub group_weights: GroupWeights,
    pub block_prefs: PreferenceTable,
    pub dynamic_categories: HashMap<String, bool>,
}

/// Most custom entries a settings document keeps.
pub const MAX_CUSTOM_ENTRIES: usize = 32;

/// A stored custom entry in either accepted shape.
#[derive(Deserialize)]
#[serde(untagged)]
enum CustomEntryRecord {
    Object(PaletteEntry),
    Labeled(u8, u8, u8, String, String),
    Bare(u8, u8, u8, String),
    Malformed(IgnoredAny),
}

impl CustomEntryRecord {
    fn into_entry(self) -> Option<PaletteEntry> {
        let entry = match self {
            CustomEntryRecord::Object(entry) => entry,
            CustomEntryRecord::Labeled(r, g, b, id, label) => PaletteEntry::new(Rgb::new(r, g, b), id, label, ""),
            CustomEntryRecord::Bare(r, g, b, id) => PaletteEntry::new(Rgb::new(r, g, b), id, "", ""),
            CustomEntryRecord::Malformed(_) => return None,
        };
        entry.is_well_formed().then_some(entry)
    }
}

fn deserialize_custom<'de, D>(deserializer: D) -> Result<Vec<PaletteEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let records = Vec::<CustomEntryRecord>::deserialize(deserializer)?;
    let total = records.len();
    let mut entries: Vec<PaletteEntry> = records.into_iter().filter_map(CustomEntryRecord::into_entry).collect();
    let skipped = total - entries.len();
    if skipped > 0 {
        tracing::warn!(skipped, "Skipped malformed custom palette entries");
    }
    if entries.len() > MAX_CUSTOM_ENTRIES {
        tracing::warn!(
            kept = MAX_CUSTOM_ENTRIES,
            dropped = entries.len() - MAX_CUSTOM_ENTRIES,
            "Custom palette truncated"
        );
        entries.truncate(MAX_CUSTOM_ENTRIES);
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_legacy_tuples_accepted() {
        let json = r#"{
            "customPalette": [
                [10, 20, 30, "my:a", "A"],
                [1, 2, 3, "my:b"],
                {"rgb": [4, 5, 6], "blockId": "my:c", "groupKey": "custom"}
            ]
        }"#;
        let settings: PersistedSettings = serde_json::from_str(json).unwrap();
        assert_eq!(
            settings.custom_palette,
            vec![
                PaletteEntry::new(Rgb::new(10, 20, 30), "my:a", "A", ""),
                PaletteEntry::new(Rgb::new(1, 2, 3), "my:b", "", ""),
                PaletteEntry::new(Rgb::new(4, 5, 6), "my:c", "", "custom"),
            ]
        );
        assert!(settings.dynamic_categories.is_empty());
    }

    #[test]
    fn test_malformed_entry_keeps_rest_of_document() {
        let json = r#"{
            "customPalette": [
                [10, 20, 30, "my:a"],
                [null, 0, 0, "my:bad"],
                [300, 0, 0, "my:too_bright"],
                {"rgb": [1, 2], "blockId": "my:short"},
                [4, 5, 6, "   "],
                "junk",
                {"rgb": [7, 8, 9], "blockId": "my:c"}
            ],
            "groupWeights": {"wool": 3.0},
            "dynamicCategories": {"brown": false}
        }"#;
        let settings: PersistedSettings = serde_json::from_str(json).unwrap();
        let ids: Vec<_> = settings.custom_palette.iter().map(|e| e.block_id.as_str()).collect();
        assert_eq!(ids, ["my:a", "my:c"]);
        assert_eq!(settings.group_weights.effective_weight("wool"), 3.0);
        assert_eq!(settings.dynamic_categories.get("brown"), Some(&false));
    }

    #[test]
    fn test_custom_palette_capped() {
        let rows: Vec<_> = (0..40)
            .map(|i| serde_json::json!([i, i, i, format!("my:block_{i}")]))
            .collect();
        let json = serde_json::json!({ "customPalette": rows });
        let settings: PersistedSettings = serde_json::from_value(json).unwrap();
        assert_eq!(settings.custom_palette.len(), MAX_CUSTOM_ENTRIES);
        assert_eq!(settings.custom_palette[0].block_id, "my:block_0");
        assert_eq!(settings.custom_palette[31].block_id, "my:block_31");
    }

    #[test]
    fn test_saved_as_objects() {
        let settings = PersistedSettings {
            custom_palette: vec![PaletteEntry::new(Rgb::new(1, 2, 3), "my:b", "B", "custom")],
            ..Default::default()
        };
        let value = serde_json::to_value(&settings).unwrap();
        assert_eq!(value["customPalette"][0]["blockId"], "my:b");
        assert_eq!(value["customPalette"][0]["rgb"], serde_json::json!([1, 2, 3]));
        assert!(value.get("groupWeights").is_some());
        assert!(value.get("dynamicCategories").is_some());

        let back: PersistedSettings = serde_json::from_value(value).unwrap();
        assert_eq!(back, settings);
    }
}
