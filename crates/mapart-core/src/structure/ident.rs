//! Block identifier normalization.
//!
//! Identifiers from palettes, imports and older exports come in several
//! naming schemes: `color_family`, reversed `family_color`, legacy clay
//! names, `powder_red_concrete`, bracketed states with numeric colors. All
//! of them are rewritten to `minecraft:{color}_{family}` by an ordered rule
//! table, then validated against the allow-list of 16 colors times
//! [`ALLOW_FAMILIES`]. [`canonicalize`] never returns anything outside that
//! allow-list.

use std::sync::OnceLock;

use regex::Regex;

use crate::palette::DYE_COLORS;

/// The empty cell. Only used for unmapped or out-of-bounds cells.
pub const AIR: &str = "minecraft:air";

/// Last-resort substitute for identifiers that cannot be resolved.
pub const SAFE_DEFAULT: &str = "minecraft:white_concrete";

pub const ALLOW_FAMILIES: [&str; 5] = ["wool", "concrete", "concrete_powder", "terracotta", "glazed_terracotta"];

/// Single blocks that render poorly on maps, mapped to a colored block.
pub const FORCE_MAP: [(&str, &str); 9] = [
    ("minecraft:emerald_block", "minecraft:lime_concrete"),
    ("minecraft:gold_block", "minecraft:yellow_concrete"),
    ("minecraft:end_stone", "minecraft:yellow_concrete"),
    ("minecraft:sponge", "minecraft:yellow_concrete"),
    ("minecraft:moss_block", "minecraft:lime_concrete"),
    ("minecraft:exposed_cut_copper", "minecraft:orange_concrete"),
    ("minecraft:cut_copper", "minecraft:orange_concrete"),
    ("minecraft:stripped_birch_log", "minecraft:light_gray_concrete"),
    ("minecraft:stripped_dark_oak_log", "minecraft:brown_concrete"),
];

/// Substring aliases applied to color tokens, first occurrence each, in order.
const COLOR_ALIASES: [(&str, &str); 5] = [
    ("lightgrey", "light_gray"),
    ("lightgray", "light_gray"),
    ("lightblue", "light_blue"),
    ("grey", "gray"),
    ("silver", "light_gray"),
];

const FAMILIES: &str = "concrete_powder|concrete|wool|carpet|glazed_terracotta|terracotta|stained_glass_pane|stained_glass";

struct Rules {
    powder_reversed: Regex,
    glazed_reversed: Regex,
    clay_stained: Regex,
    stained_clay: Regex,
    family_first: Regex,
    glazed: Regex,
    variant: Regex,
    bracketed: Regex,
}

fn rules() -> &'static Rules {
    static RULES: OnceLock<Rules> = OnceLock::new();
    RULES.get_or_init(|| {
        let re = |pattern: &str| match Regex::new(pattern) {
            Ok(re) => re,
            Err(e) => unreachable!("invalid identifier rule {pattern}: {e}"),
        };
        Rules {
            powder_reversed: re(r"^minecraft:powder_([a-z_]+)_concrete$"),
            glazed_reversed: re(r"^minecraft:glazed_terracotta_([a-z_]+)$"),
            clay_stained: re(r"^minecraft:hardened_clay_stained_([a-z_]+)$"),
            stained_clay: re(r"^minecraft:stained_clay_([a-z_]+)$"),
            family_first: re(
                r"^minecraft:(concrete_powder|concrete|wool|carpet|terracotta|stained_hardened_clay|stained_glass_pane|stained_glass)_(?:colored_)?([a-z_]+)$",
            ),
            glazed: re(r"^minecraft:([a-z_]+)_glazed_terracotta$"),
            variant: re(&format!(r"^minecraft:([a-z_]+?)_({FAMILIES})$")),
            bracketed: re(
                r"^minecraft:(concrete_powder|concrete|wool|carpet|stained_hardened_clay|stained_glass_pane|stained_glass)\[(?:.*[,\s])?color=(\w+)(?:[,\s].*)?\]$",
            ),
        }
    })
}

/// Apply the color aliases to a color token.
pub fn normalize_color(token: &str) -> String {
    let mut t = token.to_ascii_lowercase();
    for (from, to) in COLOR_ALIASES {
        t = t.replacen(from, to, 1);
    }
    t
}

fn normalize_family(family: &str) -> &str {
    match family {
        "stained_hardened_clay" | "hardened_clay" => "terracotta",
        other => other,
    }
}

/// Lowercase, add the `minecraft:` namespace when missing, and fold the
/// `bedrock:` namespace into it. Blank input becomes [`AIR`].
pub fn ensure_namespace(id: &str) -> String {
    let id = id.trim().to_ascii_lowercase();
    if id.is_empty() {
        return AIR.to_string();
    }
    if let Some(rest) = id.strip_prefix("bedrock:") {
        return format!("minecraft:{rest}");
    }
    if id.contains(':') {
        id
    } else {
        format!("minecraft:{id}")
    }
}

fn force_mapped(id: &str) -> Option<&'static str> {
    FORCE_MAP.iter().find(|(from, _)| *from == id).map(|(_, to)| *to)
}

/// Rewrite an identifier into `minecraft:{color}_{family}` form.
///
/// Unrecognized forms come back namespaced but otherwise unchanged; they
/// are not validated here.
pub fn to_variant_name(id: &str) -> String {
    let id = ensure_namespace(id);
    if let Some(forced) = force_mapped(&id) {
        return forced.to_string();
    }
    let r = rules();

    if let Some(c) = r.powder_reversed.captures(&id) {
        return format!("minecraft:{}_concrete_powder", normalize_color(&c[1]));
    }
    if let Some(c) = r.glazed_reversed.captures(&id) {
        return format!("minecraft:{}_glazed_terracotta", normalize_color(&c[1]));
    }
    if let Some(c) = r.clay_stained.captures(&id).or_else(|| r.stained_clay.captures(&id)) {
        return format!("minecraft:{}_terracotta", normalize_color(&c[1]));
    }
    if let Some(c) = r.bracketed.captures(&id) {
        let family = normalize_family(&c[1]);
        let raw = &c[2];
        let color = match raw.parse::<usize>() {
            Ok(n) => DYE_COLORS.get(n).map_or_else(|| raw.to_string(), |c| c.to_string()),
            Err(_) => normalize_color(raw),
        };
        let family = if family.starts_with("stained_glass") { "concrete" } else { family };
        return format!("minecraft:{color}_{family}");
    }
    if let Some(c) = r.family_first.captures(&id) {
        let family = normalize_family(&c[1]);
        return format!("minecraft:{}_{family}", normalize_color(&c[2]));
    }
    if let Some(c) = r.glazed.captures(&id) {
        return format!("minecraft:{}_glazed_terracotta", normalize_color(&c[1]));
    }
    if let Some(c) = r.variant.captures(&id) {
        return format!("minecraft:{}_{}", normalize_color(&c[1]), &c[2]);
    }
    id
}

/// Whether `id` is one of the 16 colors times [`ALLOW_FAMILIES`].
pub fn is_allowed(id: &str) -> bool {
    let Some(rest) = id.strip_prefix("minecraft:") else {
        return false;
    };
    DYE_COLORS.iter().any(|color| {
        rest.strip_prefix(color)
            .and_then(|r| r.strip_prefix('_'))
            .is_some_and(|family| ALLOW_FAMILIES.contains(&family))
    })
}

/// Resolve any identifier to a member of the allow-list.
///
/// Rewrites with [`to_variant_name`], then coerces families outside
/// [`ALLOW_FAMILIES`] to concrete of the same color, then falls back to
/// [`SAFE_DEFAULT`]. Never returns [`AIR`].
pub fn canonicalize(id: &str) -> String {
    let variant = to_variant_name(id);
    if is_allowed(&variant) {
        return variant;
    }

    if let Some(c) = rules().variant.captures(&variant) {
        let family = normalize_family(&c[2]);
        let family = if ALLOW_FAMILIES.contains(&family) { family } else { "concrete" };
        let coerced = format!("minecraft:{}_{family}", &c[1]);
        if is_allowed(&coerced) {
            return coerced;
        }
    }

    if let Some(forced) = force_mapped(&variant) {
        return forced.to_string();
    }

    tracing::debug!(id, "Unrecognized block identifier, using safe default");
    SAFE_DEFAULT.to_string()
}
