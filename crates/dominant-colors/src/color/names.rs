//! Named-color lookup and color-family normalization.
//!
//! The table is an explicitly constructed, read-only value. Callers build it
//! once (usually [`ColorNameTable::css3`]) and share it by reference.

/// A reference color with its human-readable name.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedColor {
    pub name: String,
    pub rgb: (u8, u8, u8),
}

impl NamedColor {
    pub fn new(name: impl Into<String>, rgb: (u8, u8, u8)) -> Self {
        Self {
            name: name.into(),
            rgb,
        }
    }
}

/// Fixed mapping from reference RGB points to names, queried by
/// nearest-neighbour distance.
#[derive(Debug, Clone)]
pub struct ColorNameTable {
    entries: Vec<NamedColor>,
}

impl ColorNameTable {
    pub fn new(entries: Vec<NamedColor>) -> Self {
        Self { entries }
    }

    /// The CSS named color keywords from [`palette::named`], sorted by name,
    /// with one spelling per gray (the `grey` aliases are dropped).
    pub fn css3() -> Self {
        let mut entries: Vec<NamedColor> = palette::named::entries()
            .filter(|(name, _)| !name.contains("grey"))
            .map(|(name, color)| NamedColor::new(name, color.into_components()))
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Self::new(entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[NamedColor] {
        &self.entries
    }

    /// Closest entry by squared Euclidean RGB distance.
    ///
    /// Ties resolve to the entry listed first. `None` only for an empty table.
    pub fn nearest(&self, rgb: (u8, u8, u8)) -> Option<&NamedColor> {
        let mut best: Option<(&NamedColor, u32)> = None;
        for entry in &self.entries {
            let d = squared_distance(rgb, entry.rgb);
            match best {
                Some((_, best_d)) if d >= best_d => {}
                _ => best = Some((entry, d)),
            }
        }
        best.map(|(entry, _)| entry)
    }

    /// Family name of the nearest entry after normalization.
    pub fn family(&self, rgb: (u8, u8, u8), normalizer: &dyn FamilyNormalizer) -> Option<String> {
        self.nearest(rgb).map(|entry| normalizer.family(&entry.name))
    }
}

impl Default for ColorNameTable {
    fn default() -> Self {
        Self::css3()
    }
}

fn squared_distance(a: (u8, u8, u8), b: (u8, u8, u8)) -> u32 {
    let dr = a.0 as i32 - b.0 as i32;
    let dg = a.1 as i32 - b.1 as i32;
    let db = a.2 as i32 - b.2 as i32;
    (dr * dr + dg * dg + db * db) as u32
}

/// Maps a color name onto the family it is grouped under.
///
/// Family boundaries are fuzzy; implementations decide how aggressively
/// near-duplicates are merged.
pub trait FamilyNormalizer: Send + Sync {
    fn family(&self, color_name: &str) -> String;
}

/// Keeps every name as its own family.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactName;

impl FamilyNormalizer for ExactName {
    fn family(&self, color_name: &str) -> String {
        color_name.to_lowercase()
    }
}

/// Strips leading shade modifiers ("light", "dark", "pale", ...) so that
/// e.g. `darkred`, `light red` and `red` share one family.
#[derive(Debug, Clone)]
pub struct ShadeModifierStripper {
    modifiers: Vec<String>,
}

impl ShadeModifierStripper {
    pub fn new<I, S>(modifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            modifiers: modifiers.into_iter().map(|m| m.into().to_lowercase()).collect(),
        }
    }

    pub fn modifiers(&self) -> &[String] {
        &self.modifiers
    }
}

impl Default for ShadeModifierStripper {
    fn default() -> Self {
        Self::new(["light", "dark", "pale", "bright", "medium", "deep"])
    }
}

impl FamilyNormalizer for ShadeModifierStripper {
    fn family(&self, color_name: &str) -> String {
        let mut name = color_name.trim().to_lowercase();
        'strip: loop {
            for modifier in &self.modifiers {
                if let Some(rest) = name.strip_prefix(modifier.as_str()) {
                    let rest = rest.trim_start_matches([' ', '-', '_']);
                    if !rest.is_empty() {
                        name = rest.to_string();
                        continue 'strip;
                    }
                }
            }
            break;
        }
        name
    }
}
