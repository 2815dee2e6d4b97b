//! The family map: declared font families, the selectors that use them,
//! and the characters rendered with them.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use fontspider_css::values::{quoteless, split_family_list};
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

/// One declared font family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FamilyEntry {
    /// Selectors known to render this family, in discovery order.
    #[serde(rename = "selector")]
    pub selectors: Vec<String>,
    /// Absolute path of the font file bound by `@font-face`.
    pub path: PathBuf,
    /// Characters rendered with this family.
    ///
    /// A raw bag while a run is in progress; [`normalize_chars`] turns it
    /// into a set at the end.
    pub chars: String,
}

impl FamilyEntry {
    /// An entry for the font at `path`, not yet used by anything.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self {
            selectors: Vec::new(),
            path,
            chars: String::new(),
        }
    }

    /// Record `selector`. Returns `false` if it was already recorded.
    pub fn add_selector(&mut self, selector: &str) -> bool {
        if self.selectors.iter().any(|s| s == selector) {
            return false;
        }
        self.selectors.push(selector.to_string());
        true
    }

    /// Append rendered text.
    pub fn push_chars(&mut self, text: &str) {
        self.chars.push_str(text);
    }
}

/// Remove whitespace and repeated characters, keeping the first occurrence.
///
/// ```
/// use fontspider_resolve::normalize_chars;
///
/// assert_eq!(normalize_chars(r#""666" 'result' result result"#), r#""6'result"#);
/// ```
#[must_use]
pub fn normalize_chars(text: &str) -> String {
    let mut seen = HashSet::new();
    text.chars()
        .filter(|c| !c.is_whitespace() && seen.insert(*c))
        .collect()
}

/// Family name to [`FamilyEntry`], in declaration order.
///
/// Serializes as a JSON object keyed by family name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclaredFamilyMap {
    entries: Vec<(String, FamilyEntry)>,
    index: HashMap<String, usize>,
}

impl DeclaredFamilyMap {
    /// An empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to the font at `path`.
    ///
    /// The first declaration of a name wins; later ones are ignored and
    /// `false` is returned.
    pub fn declare(&mut self, name: impl Into<String>, path: PathBuf) -> bool {
        let name = name.into();
        if self.index.contains_key(&name) {
            return false;
        }
        let _ = self.index.insert(name.clone(), self.entries.len());
        self.entries.push((name, FamilyEntry::new(path)));
        true
    }

    /// Whether `name` is declared.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// The entry for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FamilyEntry> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    /// The entry for `name`, mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut FamilyEntry> {
        let i = *self.index.get(name)?;
        Some(&mut self.entries[i].1)
    }

    /// Drop `name` from the map, returning its entry.
    pub fn remove(&mut self, name: &str) -> Option<FamilyEntry> {
        let i = self.index.remove(name)?;
        let (_, entry) = self.entries.remove(i);
        self.reindex();
        Some(entry)
    }

    /// Keep only the families for which `keep` returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &mut FamilyEntry) -> bool) {
        self.entries.retain_mut(|(name, entry)| keep(name, entry));
        self.reindex();
    }

    fn reindex(&mut self) {
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, (name, _))| (name.clone(), i))
            .collect();
    }

    /// Families in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FamilyEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Families in declaration order, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut FamilyEntry)> {
        self.entries
            .iter_mut()
            .map(|(name, entry)| (name.as_str(), entry))
    }

    /// Declared names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Number of declared families.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no family is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply [`normalize_chars`] to every entry.
    pub fn normalize(&mut self) {
        for (_, entry) in &mut self.entries {
            entry.chars = normalize_chars(&entry.chars);
        }
    }

    /// The first declared family named inside a `font` shorthand value.
    ///
    /// Names are matched literally, in declaration order. An occurrence only
    /// counts when it is delimited on both sides by the ends of the value,
    /// whitespace, a comma, a quote or a slash, so `Mono` is not found in
    /// `12px MonoLisa`.
    #[must_use]
    pub fn find_in_shorthand(&self, value: &str) -> Option<&str> {
        self.names()
            .find(|name| contains_delimited(value, name))
    }

    /// The first entry of a `font-family` list that is declared.
    ///
    /// Entries are trimmed and unquoted before the lookup. Only the first
    /// declared fallback renders; later ones are never attributed.
    #[must_use]
    pub fn first_declared_in_list(&self, value: &str) -> Option<&str> {
        split_family_list(value).iter().find_map(|token| {
            let name = quoteless(token.trim());
            self.index
                .get(name.trim())
                .map(|&i| self.entries[i].0.as_str())
        })
    }
}

fn is_shorthand_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, ',' | '"' | '\'' | '/')
}

fn contains_delimited(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + needle.len()..].chars().next();
        before.is_none_or(is_shorthand_delimiter) && after.is_none_or(is_shorthand_delimiter)
    })
}

impl Serialize for DeclaredFamilyMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, entry) in &self.entries {
            map.serialize_entry(name, entry)?;
        }
        map.end()
    }
}
