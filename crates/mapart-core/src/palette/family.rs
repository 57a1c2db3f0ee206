/// Material family of a palette entry.
///
/// The three built-in families have their own source sets and group keys;
/// everything else (user entries, imports) counts as custom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Wool,
    Terracotta,
    Concrete,
    Custom,
}

impl Family {
    pub const BUILTIN: [Family; 3] = [Family::Wool, Family::Terracotta, Family::Concrete];

    /// Group key used for group weights.
    pub fn key(self) -> &'static str {
        match self {
            Family::Wool => "wool",
            Family::Terracotta => "terracotta",
            Family::Concrete => "concrete",
            Family::Custom => "custom",
        }
    }

    /// Classify a block id by its material suffix.
    ///
    /// Legacy `stained_hardened_clay` ids count as terracotta.
    pub fn classify(block_id: &str) -> Family {
        if block_id.ends_with("_wool") {
            Family::Wool
        } else if block_id.ends_with("_terracotta") || block_id.contains("stained_hardened_clay")
        {
            Family::Terracotta
        } else if block_id.ends_with("_concrete") {
            Family::Concrete
        } else {
            Family::Custom
        }
    }
}
