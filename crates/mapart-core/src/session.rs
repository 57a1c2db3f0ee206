//! The explicit context every conversion runs against.

use crate::color::LabCache;
use crate::matcher::NearestColorMatcher;
use crate::palette::{assemble, ActivePalette, GroupWeights, ImportedGroup, PaletteEntry, PreferenceTable, SourceSelection};
use crate::settings::PersistedSettings;

/// Active palette, preferences, group weights and the Lab memo.
///
/// Any change that can affect matching goes through a method here, which
/// also clears the memo.
#[derive(Debug, Clone)]
pub struct Session {
    palette: ActivePalette,
    prefs: PreferenceTable,
    groups: GroupWeights,
    cache: LabCache,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(&SourceSelection::default(), &[], &[], PreferenceTable::new(), GroupWeights::new())
    }
}

impl Session {
    pub fn new(
        selection: &SourceSelection,
        custom: &[PaletteEntry],
        imported: &[ImportedGroup],
        prefs: PreferenceTable,
        groups: GroupWeights,
    ) -> Self {
        let mut cache = LabCache::new();
        let palette = assemble(selection, custom, imported, &mut cache);
        Self {
            palette,
            prefs,
            groups,
            cache,
        }
    }

    /// Build a session from persisted settings and already imported groups.
    pub fn from_settings(selection: &SourceSelection, settings: &PersistedSettings, imported: &[ImportedGroup]) -> Self {
        Self::new(
            selection,
            &settings.custom_palette,
            imported,
            settings.block_prefs.clone(),
            settings.group_weights.clone(),
        )
    }

    /// Rebuild the active palette after a source, custom or import change.
    pub fn reassemble(&mut self, selection: &SourceSelection, custom: &[PaletteEntry], imported: &[ImportedGroup]) {
        self.palette = assemble(selection, custom, imported, &mut self.cache);
    }

    pub fn set_preferences(&mut self, prefs: PreferenceTable) {
        self.prefs = prefs;
        self.cache.clear();
    }

    pub fn set_group_weights(&mut self, groups: GroupWeights) {
        self.groups = groups;
        self.cache.clear();
    }

    pub fn palette(&self) -> &ActivePalette {
        &self.palette
    }

    pub fn preferences(&self) -> &PreferenceTable {
        &self.prefs
    }

    pub fn group_weights(&self) -> &GroupWeights {
        &self.groups
    }

    pub fn cache(&self) -> &LabCache {
        &self.cache
    }

    /// A matcher over the current state plus the memo it should use.
    pub fn matcher(&mut self) -> (NearestColorMatcher<'_>, &mut LabCache) {
        (NearestColorMatcher::new(&self.palette, &self.prefs, &self.groups), &mut self.cache)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    #[test]
    fn test_default_session_has_all_builtins() {
        let session = Session::default();
        assert_eq!(session.palette().len(), 48);
        assert!(!session.palette().used_fallback());
    }

    #[test]
    fn test_changes_clear_memo() {
        let mut session = Session::default();
        {
            let (matcher, cache) = session.matcher();
            matcher.find_nearest(Rgb::new(10, 20, 30), cache);
        }
        assert_eq!(session.cache().len(), 1);

        let mut prefs = PreferenceTable::new();
        prefs.set_enabled("minecraft:black_wool", false);
        session.set_preferences(prefs);
        assert!(session.cache().is_empty());

        session.reassemble(&SourceSelection::none(), &[], &[]);
        assert!(session.palette().used_fallback());
    }

    #[test]
    fn test_preferences_reach_matcher() {
        let mut session = Session::default();
        let mut prefs = PreferenceTable::new();
        for entry in session.palette().entries() {
            if entry.block_id != "minecraft:red_concrete" {
                prefs.set_enabled(&entry.block_id, false);
            }
        }
        session.set_preferences(prefs);
        let (matcher, cache) = session.matcher();
        let m = matcher.find_nearest(Rgb::new(255, 255, 255), cache);
        assert_eq!(matcher.entry(m.index).unwrap().block_id, "minecraft:red_concrete");
    }
}
