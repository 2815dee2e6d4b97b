//! Reserved text: characters a font must keep although no page shows them.
//!
//! Text inserted by scripts is invisible to the resolver. Callers list it
//! here, for every family at once or per family name.

use std::collections::HashMap;

use fontspider_resolve::{DeclaredFamilyMap, normalize_chars};
use serde::Deserialize;

/// Extra characters merged into the resolved families.
///
/// Deserializes from a JSON string (every family) or an object keyed by
/// family name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ReserveText {
    /// Nothing reserved.
    #[default]
    None,
    /// Text kept in every family.
    All(String),
    /// Text kept per family name.
    PerFamily(HashMap<String, String>),
}

impl ReserveText {
    /// The text reserved for `family`.
    #[must_use]
    pub fn text_for(&self, family: &str) -> Option<&str> {
        match self {
            Self::None => None,
            Self::All(text) => Some(text.as_str()),
            Self::PerFamily(texts) => texts.get(family).map(String::as_str),
        }
    }

    /// Add the reserved text to every declared family.
    ///
    /// Characters stay normalized: no whitespace, no repeats. Names in a
    /// per-family table that are not declared are ignored.
    pub fn apply(&self, map: &mut DeclaredFamilyMap) {
        for (name, entry) in map.iter_mut() {
            if let Some(text) = self.text_for(name) {
                entry.push_chars(text);
                entry.chars = normalize_chars(&entry.chars);
            }
        }
    }
}
