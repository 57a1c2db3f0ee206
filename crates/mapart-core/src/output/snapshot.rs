use std::collections::HashMap;
use std::ops::Deref;
use std::sync::Arc;

use crate::color::Rgb;
use crate::palette::PaletteEntry;

/// Immutable copy of palette entries captured at quantization time.
///
/// Cloning is cheap; the entries are shared.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteSnapshot {
    entries: Arc<[PaletteEntry]>,
}

impl PaletteSnapshot {
    pub fn new(entries: Vec<PaletteEntry>) -> Self {
        Self {
            entries: entries.into(),
        }
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    /// Exact-color lookup table. When several entries share a color the
    /// first one wins.
    pub fn rgb_index(&self) -> HashMap<Rgb, usize> {
        let mut map = HashMap::with_capacity(self.entries.len());
        for (i, entry) in self.entries.iter().enumerate() {
            map.entry(entry.rgb).or_insert(i);
        }
        map
    }
}

impl Deref for PaletteSnapshot {
    type Target = [PaletteEntry];

    fn deref(&self) -> &[PaletteEntry] {
        &self.entries
    }
}
