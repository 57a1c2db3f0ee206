//! Classification of externally generated block sets.
//!
//! A texture-pack generator produces raw `{rgb, id, label}` records for every
//! block it knows. Only records named by an [`ImportAllowList`] are kept, and
//! they are bucketed into the allow-list's categories, each of which becomes
//! one [`ImportedGroup`] for palette assembly.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::entry::PaletteEntry;
use super::index::ImportedGroup;
use crate::color::Rgb;

/// One raw record from the external generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedBlock {
    pub rgb: Rgb,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub label: String,
}

/// An allow-list row: a block known by label and/or ids, and its category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllowRule {
    pub label: String,
    pub category: String,
    #[serde(default)]
    pub ids: Vec<String>,
}

/// Lookup over allow-list rules by id and by normalized label.
#[derive(Debug, Clone, Default)]
pub struct ImportAllowList {
    rules: Vec<AllowRule>,
    by_id: HashMap<String, usize>,
    by_label: HashMap<String, usize>,
}

fn normalize_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

fn strip_namespace(id: &str) -> &str {
    id.strip_prefix("minecraft:").unwrap_or(id)
}

impl ImportAllowList {
    pub fn new(rules: Vec<AllowRule>) -> Self {
        let mut by_id = HashMap::new();
        let mut by_label = HashMap::new();
        for (i, rule) in rules.iter().enumerate() {
            for id in &rule.ids {
                by_id.entry(id.clone()).or_insert(i);
                by_id.entry(strip_namespace(id).to_string()).or_insert(i);
            }
            by_label.entry(normalize_label(&rule.label)).or_insert(i);
        }
        Self {
            rules,
            by_id,
            by_label,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Find the rule for a record: exact id, id without namespace, then label.
    pub fn lookup(&self, id: &str, label: &str) -> Option<&AllowRule> {
        self.by_id
            .get(id)
            .or_else(|| self.by_id.get(strip_namespace(id)))
            .or_else(|| {
                let key = normalize_label(label);
                if key.is_empty() {
                    None
                } else {
                    self.by_label.get(&key)
                }
            })
            .map(|&i| &self.rules[i])
    }

    /// Category keys in first-appearance order.
    fn categories(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for rule in &self.rules {
            if !out.contains(&rule.category.as_str()) {
                out.push(&rule.category);
            }
        }
        out
    }
}

/// Imported entries grouped by category, empty categories removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedCatalog {
    pub categories: Vec<(String, Vec<PaletteEntry>)>,
}

impl ImportedCatalog {
    pub fn total_entries(&self) -> usize {
        self.categories.iter().map(|(_, e)| e.len()).sum()
    }

    /// Turn categories into assembly groups.
    ///
    /// Categories absent from `enabled` are enabled.
    pub fn into_groups(self, enabled: &HashMap<String, bool>) -> Vec<ImportedGroup> {
        self.categories
            .into_iter()
            .map(|(key, entries)| ImportedGroup {
                enabled: enabled.get(&key).copied().unwrap_or(true),
                key,
                entries,
            })
            .collect()
    }
}

/// Keep only allow-listed records and bucket them by category.
///
/// Records without an id are dropped.
pub fn import_blocks(blocks: &[ImportedBlock], allow: &ImportAllowList) -> ImportedCatalog {
    let mut buckets: Vec<(String, Vec<PaletteEntry>)> = allow
        .categories()
        .into_iter()
        .map(|c| (c.to_string(), Vec::new()))
        .collect();

    let mut dropped = 0usize;
    for block in blocks {
        if block.id.trim().is_empty() {
            dropped += 1;
            continue;
        }
        let Some(rule) = allow.lookup(&block.id, &block.label) else {
            dropped += 1;
            continue;
        };
        let label = if block.label.is_empty() {
            rule.label.clone()
        } else {
            block.label.clone()
        };
        if let Some((_, entries)) = buckets.iter_mut().find(|(k, _)| *k == rule.category) {
            entries.push(PaletteEntry::new(
                block.rgb,
                block.id.clone(),
                label,
                rule.category.clone(),
            ));
        }
    }

    buckets.retain(|(_, entries)| !entries.is_empty());
    let catalog = ImportedCatalog {
        categories: buckets,
    };
    tracing::info!(
        kept = catalog.total_entries(),
        dropped,
        categories = catalog.categories.len(),
        "Imported block set"
    );
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn allow_list() -> ImportAllowList {
        ImportAllowList::new(vec![
            AllowRule {
                label: "Spruce Log".into(),
                category: "brown".into(),
                ids: vec!["minecraft:spruce_log".into()],
            },
            AllowRule {
                label: "Smooth Stone".into(),
                category: "gray".into(),
                ids: vec![],
            },
            AllowRule {
                label: "Gold Block".into(),
                category: "yellow".into(),
                ids: vec!["minecraft:gold_block".into()],
            },
        ])
    }

    fn block(id: &str, label: &str) -> ImportedBlock {
        ImportedBlock {
            rgb: Rgb::new(1, 2, 3),
            id: id.into(),
            label: label.into(),
        }
    }

    #[test]
    fn test_lookup_paths() {
        let allow = allow_list();
        assert_eq!(allow.lookup("minecraft:spruce_log", "").unwrap().category, "brown");
        assert_eq!(allow.lookup("spruce_log", "").unwrap().category, "brown");
        assert_eq!(allow.lookup("x:unknown", "smooth  stone").unwrap().category, "gray");
        assert!(allow.lookup("x:unknown", "").is_none());
    }

    #[test]
    fn test_import_filters_and_buckets() {
        let blocks = [
            block("minecraft:spruce_log", "Spruce Log"),
            block("minecraft:smooth_stone", "Smooth Stone"),
            block("minecraft:diamond_ore", "Diamond Ore"),
            block("", "Spruce Log"),
        ];
        let catalog = import_blocks(&blocks, &allow_list());
        let keys: Vec<_> = catalog.categories.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["brown", "gray"], "empty yellow category must be dropped");
        assert_eq!(catalog.total_entries(), 2);
        assert_eq!(catalog.categories[1].1[0].group_key, "gray");
    }

    #[test]
    fn test_into_groups_respects_enable_map() {
        let blocks = [
            block("minecraft:spruce_log", ""),
            block("minecraft:gold_block", ""),
        ];
        let catalog = import_blocks(&blocks, &allow_list());
        let enabled = HashMap::from([("yellow".to_string(), false)]);
        let groups = catalog.into_groups(&enabled);
        assert_eq!(groups.len(), 2);
        assert!(groups[0].enabled);
        assert!(!groups[1].enabled);
        assert_eq!(groups[0].entries[0].display_label, "Spruce Log");
    }
}
