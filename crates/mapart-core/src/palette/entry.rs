use serde::{Deserialize, Serialize};

use crate::color::Rgb;

/// One selectable block color.
///
/// `block_id` is the identity key: two entries with the same id are the same
/// logical entry. `group_key` names the source group (material family or
/// import category) that group weights apply to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaletteEntry {
    pub rgb: Rgb,
    pub block_id: String,
    #[serde(default)]
    pub display_label: String,
    #[serde(default)]
    pub group_key: String,
}

impl PaletteEntry {
    pub fn new(
        rgb: Rgb,
        block_id: impl Into<String>,
        display_label: impl Into<String>,
        group_key: impl Into<String>,
    ) -> Self {
        Self {
            rgb,
            block_id: block_id.into(),
            display_label: display_label.into(),
            group_key: group_key.into(),
        }
    }

    /// The label to show, falling back to the block id.
    pub fn label(&self) -> &str {
        if self.display_label.is_empty() {
            &self.block_id
        } else {
            &self.display_label
        }
    }

    /// Whether the entry can take part in assembly.
    pub(crate) fn is_well_formed(&self) -> bool {
        !self.block_id.trim().is_empty()
    }
}
