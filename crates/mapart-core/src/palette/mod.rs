//! Palette sources and the assembled active palette.
//!
//! An [`ActivePalette`] is built by [`assemble`] from the enabled
//! [`SourceSelection`] (built-in wool, terracotta and concrete sets), custom
//! entries and imported groups, in that precedence. Entries are unique by
//! block id; the first source to provide an id wins.
//!
//! Per-entry and per-group matching weights live next to it in
//! [`PreferenceTable`] and [`GroupWeights`].

mod builtin;
mod entry;
mod error;
mod family;
mod import;
mod index;
mod prefs;

pub use builtin::{builtin_set, DYE_COLORS};
pub use entry::PaletteEntry;
pub use error::ParseColorError;
pub use family::Family;
pub use import::{import_blocks, AllowRule, ImportAllowList, ImportedBlock, ImportedCatalog};
pub use index::{assemble, ActivePalette, ImportedGroup, SourceSelection};
pub use prefs::{BlockPreference, GroupWeights, PreferenceTable};
