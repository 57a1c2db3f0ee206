use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::builtin::builtin_set;
use super::entry::PaletteEntry;
use super::family::Family;
use crate::color::{Lab, LabCache};
use crate::output::PaletteSnapshot;

/// Which built-in sets and the custom list take part in assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSelection {
    pub wool: bool,
    pub terracotta: bool,
    pub concrete: bool,
    pub custom: bool,
}

impl Default for SourceSelection {
    fn default() -> Self {
        Self {
            wool: true,
            terracotta: true,
            concrete: true,
            custom: true,
        }
    }
}

impl SourceSelection {
    /// Nothing enabled.
    pub fn none() -> Self {
        Self {
            wool: false,
            terracotta: false,
            concrete: false,
            custom: false,
        }
    }

    pub fn includes(&self, family: Family) -> bool {
        match family {
            Family::Wool => self.wool,
            Family::Terracotta => self.terracotta,
            Family::Concrete => self.concrete,
            Family::Custom => self.custom,
        }
    }
}

/// A dynamically imported block set, merged after the custom entries.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedGroup {
    pub key: String,
    pub entries: Vec<PaletteEntry>,
    pub enabled: bool,
}

/// The ordered, de-duplicated palette the matcher works against.
///
/// The CIE Lab cache is index-aligned with the entries and is only ever
/// rebuilt together with them.
#[derive(Debug, Clone)]
pub struct ActivePalette {
    entries: Vec<PaletteEntry>,
    lab: Vec<Lab>,
    group_of: HashMap<String, String>,
    fallback: bool,
}

impl ActivePalette {
    /// Build a palette from entries in precedence order.
    ///
    /// Malformed entries are dropped, later duplicates of a block id are
    /// skipped, and an empty result falls back to the built-in wool set.
    /// The group of a block id is taken from its last occurrence, so a
    /// skipped duplicate still moves the id into its own group.
    pub fn from_entries(candidates: impl IntoIterator<Item = PaletteEntry>) -> Self {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();
        let mut group_of = HashMap::new();
        for entry in candidates {
            if !entry.is_well_formed() {
                tracing::debug!(label = %entry.display_label, "Skipping palette entry without block id");
                continue;
            }
            group_of.insert(entry.block_id.clone(), entry.group_key.clone());
            if seen.insert(entry.block_id.clone()) {
                entries.push(entry);
            }
        }

        let fallback = entries.is_empty();
        if fallback {
            tracing::warn!("No palette source produced entries, falling back to wool");
            entries = builtin_set(Family::Wool);
            group_of = entries
                .iter()
                .map(|e| (e.block_id.clone(), e.group_key.clone()))
                .collect();
        }

        let lab = entries.iter().map(|e| Lab::from(e.rgb)).collect();

        Self {
            entries,
            lab,
            group_of,
            fallback,
        }
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&PaletteEntry> {
        self.entries.get(index)
    }

    /// Lab coordinates, index-aligned with [`entries`](Self::entries).
    pub fn lab(&self) -> &[Lab] {
        &self.lab
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false after assembly; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Source group of a block id, from its last occurrence during assembly.
    pub fn group_of(&self, block_id: &str) -> Option<&str> {
        self.group_of.get(block_id).map(String::as_str)
    }

    /// Whether assembly had to fall back to the built-in wool set.
    pub fn used_fallback(&self) -> bool {
        self.fallback
    }

    pub fn index_of(&self, block_id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.block_id == block_id)
    }

    /// Freeze the current entries for a quantized raster.
    pub fn snapshot(&self) -> PaletteSnapshot {
        PaletteSnapshot::new(self.entries.clone())
    }
}

/// Assemble the active palette.
///
/// Sources are visited in fixed precedence: wool, terracotta, concrete,
/// custom entries, then enabled imported groups. Custom entries get the
/// `custom` group key when they carry none. The caller's Lab memo is cleared
/// last, since it may hold conversions made under the previous palette.
pub fn assemble(
    selection: &SourceSelection,
    custom: &[PaletteEntry],
    imported: &[ImportedGroup],
    cache: &mut LabCache,
) -> ActivePalette {
    let mut candidates = Vec::new();

    for family in Family::BUILTIN {
        if selection.includes(family) {
            candidates.extend(builtin_set(family));
        }
    }

    if selection.custom {
        candidates.extend(custom.iter().cloned().map(|mut entry| {
            if entry.group_key.is_empty() {
                entry.group_key = Family::Custom.key().to_string();
            }
            entry
        }));
    }

    for group in imported.iter().filter(|g| g.enabled) {
        candidates.extend(group.entries.iter().cloned().map(|mut entry| {
            entry.group_key = group.key.clone();
            entry
        }));
    }

    let palette = ActivePalette::from_entries(candidates);
    tracing::info!(
        entries = palette.len(),
        fallback = palette.used_fallback(),
        "Assembled active palette"
    );

    cache.clear();
    palette
}
