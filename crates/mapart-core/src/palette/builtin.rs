//! Built-in block color sets.
//!
//! Colors are averaged top-face texture colors of the sixteen dyed variants
//! of each family, in the canonical dye order.

use super::entry::PaletteEntry;
use super::family::Family;
use crate::color::Rgb;

/// The sixteen dye colors in canonical order. Numeric color indices in
/// legacy block states refer to this order.
pub const DYE_COLORS: [&str; 16] = [
    "white",
    "orange",
    "magenta",
    "light_blue",
    "yellow",
    "lime",
    "pink",
    "gray",
    "light_gray",
    "cyan",
    "purple",
    "blue",
    "brown",
    "green",
    "red",
    "black",
];

#[rustfmt::skip]
const WOOL: [(u8, u8, u8); 16] = [
    (233, 236, 236), (240, 118, 19), (189, 68, 179), (58, 175, 217),
    (248, 197, 39), (112, 185, 25), (237, 141, 172), (62, 68, 71),
    (142, 142, 134), (21, 137, 145), (121, 42, 172), (53, 57, 157),
    (114, 71, 40), (84, 109, 27), (160, 39, 34), (20, 21, 25),
];

#[rustfmt::skip]
const TERRACOTTA: [(u8, u8, u8); 16] = [
    (209, 178, 161), (161, 83, 37), (149, 88, 108), (113, 108, 137),
    (186, 133, 35), (103, 117, 52), (161, 78, 78), (57, 42, 35),
    (135, 106, 97), (86, 91, 91), (118, 70, 86), (74, 59, 91),
    (77, 51, 35), (76, 83, 42), (143, 61, 46), (37, 22, 16),
];

#[rustfmt::skip]
const CONCRETE: [(u8, u8, u8); 16] = [
    (207, 213, 214), (224, 97, 0), (169, 48, 159), (35, 137, 198),
    (240, 175, 21), (94, 168, 24), (213, 101, 142), (54, 57, 61),
    (125, 125, 115), (21, 119, 136), (100, 31, 156), (44, 46, 143),
    (96, 59, 31), (73, 91, 36), (142, 32, 32), (8, 10, 15),
];

/// "light_blue" -> "Light Blue"
fn title_case(token: &str) -> String {
    token
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// The built-in set for a family. [`Family::Custom`] has no built-in set.
pub fn builtin_set(family: Family) -> Vec<PaletteEntry> {
    let colors = match family {
        Family::Wool => &WOOL,
        Family::Terracotta => &TERRACOTTA,
        Family::Concrete => &CONCRETE,
        Family::Custom => return Vec::new(),
    };
    let material = family.key();

    DYE_COLORS
        .iter()
        .zip(colors.iter())
        .map(|(color, &(r, g, b))| {
            PaletteEntry::new(
                Rgb::new(r, g, b),
                format!("minecraft:{color}_{material}"),
                format!("{} {}", title_case(color), title_case(material)),
                material,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sets_have_sixteen_unique_entries() {
        for family in Family::BUILTIN {
            let set = builtin_set(family);
            assert_eq!(set.len(), 16, "{family:?}");
            let ids: HashSet<_> = set.iter().map(|e| e.block_id.as_str()).collect();
            assert_eq!(ids.len(), 16);
            let colors: HashSet<_> = set.iter().map(|e| e.rgb).collect();
            assert_eq!(colors.len(), 16, "{family:?} has duplicate colors");
            assert!(set.iter().all(|e| e.group_key == family.key()));
        }
    }

    #[test]
    fn test_ids_and_labels() {
        let wool = builtin_set(Family::Wool);
        assert_eq!(wool[0].block_id, "minecraft:white_wool");
        assert_eq!(wool[3].block_id, "minecraft:light_blue_wool");
        assert_eq!(wool[3].display_label, "Light Blue Wool");
        let concrete = builtin_set(Family::Concrete);
        assert_eq!(concrete[15].block_id, "minecraft:black_concrete");
    }

    #[test]
    fn test_custom_has_no_builtin_set() {
        assert!(builtin_set(Family::Custom).is_empty());
    }
}
