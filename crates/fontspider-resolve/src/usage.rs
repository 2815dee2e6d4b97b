//! Usage attribution: which selectors render which declared family.
//!
//! There is no cascade. A `font-family` list is attributed to its first
//! declared entry, the way a browser would render with the first fallback
//! that is available, and `font` shorthands are searched for a declared
//! name.

use fontspider_css::{Declaration, Stylesheet};

use crate::family::DeclaredFamilyMap;

/// Pseudo-classes and pseudo-elements stripped from recorded selectors, and
/// whether each one generates content.
///
/// Text shown on hover or focus is the text of the element itself, so the
/// bare selector finds it. `::before` and `::after` have no node; their text
/// comes from the `content` property instead.
const INTERACTION_PSEUDOS: &[(&str, bool)] = &[
    ("active", false),
    ("hover", false),
    ("focus", false),
    ("before", true),
    ("after", true),
];

/// Attribute the `font-family` and `font` declarations of `sheet`.
///
/// Every selector of a rule that uses a declared family is recorded on that
/// family once, with interaction pseudos removed. Rules that style
/// `::before` or `::after` also contribute the string of their `content`
/// declaration. Families that are not in `map` are ignored; nothing is
/// declared here.
pub fn resolve_usage(sheet: &Stylesheet, map: &mut DeclaredFamilyMap) {
    for rule in sheet.style_rules() {
        for declaration in &rule.declarations {
            let Some(family) = attributed_family(map, declaration) else {
                continue;
            };
            let Some(entry) = map.get_mut(&family) else {
                continue;
            };

            for selector in &rule.selectors {
                let (cleaned, generates_content) = strip_interaction_pseudos(&selector.text);
                if !cleaned.is_empty() {
                    let _ = entry.add_selector(&cleaned);
                }
                let literal = if generates_content {
                    content_literal(&rule.declarations)
                } else {
                    None
                };
                if let Some(text) = literal {
                    entry.push_chars(&text);
                }
            }
        }
    }
}

/// The declared family a `font-family` or `font` declaration renders with.
///
/// For the shorthand, the first declared name found in the value (see
/// [`DeclaredFamilyMap::find_in_shorthand`]) stands in for the whole value.
/// Any other property attributes nothing.
#[must_use]
pub fn attributed_family(map: &DeclaredFamilyMap, declaration: &Declaration) -> Option<String> {
    let value = declaration.value_text();
    let working = match declaration.name.as_str() {
        "font-family" => value,
        "font" => map.find_in_shorthand(&value).map_or(value, str::to_string),
        _ => return None,
    };
    map.first_declared_in_list(&working).map(str::to_string)
}

/// Remove `:hover`, `:focus`, `:active`, `::before` and `::after` from a
/// selector.
///
/// Either colon form is accepted and names match ASCII case-insensitively.
/// A name followed by more identifier characters is a different pseudo
/// (`:focus-visible`) and is kept. Only the top level is touched: pseudos
/// inside `:not(...)`, attribute selectors and strings are left alone.
///
/// Returns the trimmed selector and whether a content-generating pseudo
/// element was removed.
///
/// ```
/// use fontspider_resolve::usage::strip_interaction_pseudos;
///
/// assert_eq!(strip_interaction_pseudos(".title:hover"), (".title".to_string(), false));
/// assert_eq!(strip_interaction_pseudos("a::before"), ("a".to_string(), true));
/// assert_eq!(strip_interaction_pseudos("a:focus-visible"), ("a:focus-visible".to_string(), false));
/// ```
#[must_use]
pub fn strip_interaction_pseudos(selector: &str) -> (String, bool) {
    let chars: Vec<char> = selector.chars().collect();
    let mut out = String::with_capacity(selector.len());
    let mut generates_content = false;
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\\' {
            out.push(c);
            if let Some(&escaped) = chars.get(i + 1) {
                out.push(escaped);
            }
            i += 2;
            continue;
        }

        if let Some(open) = quote {
            out.push(c);
            quote = (c != open).then_some(open);
            i += 1;
            continue;
        }

        match c {
            '"' | '\'' => quote = Some(c),
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            ':' if depth == 0 => {
                if let Some((len, generates)) = interaction_pseudo_at(&chars, i) {
                    generates_content |= generates;
                    i += len;
                    continue;
                }
            }
            _ => {}
        }

        out.push(c);
        i += 1;
    }

    (out.trim().to_string(), generates_content)
}

/// Length of the interaction pseudo starting at the colon at `start`.
fn interaction_pseudo_at(chars: &[char], start: usize) -> Option<(usize, bool)> {
    let name_start = if chars.get(start + 1) == Some(&':') {
        start + 2
    } else {
        start + 1
    };

    INTERACTION_PSEUDOS.iter().find_map(|&(name, generates)| {
        let name_end = name_start + name.len();
        let candidate = chars.get(name_start..name_end)?;
        let matches = candidate
            .iter()
            .zip(name.chars())
            .all(|(c, expected)| c.eq_ignore_ascii_case(&expected));
        let continues = chars.get(name_end).copied().is_some_and(is_ident_char);
        (matches && !continues).then_some((name_end - start, generates))
    })
}

const fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '\\') || !c.is_ascii()
}

/// The text a `::before` or `::after` rule draws.
///
/// [CSS Generated Content § 2 The content property](https://www.w3.org/TR/css-content-3/#content-property)
///
/// Only the strings of the last `content` declaration count. Keywords such as
/// `none` and functions such as `counter()` or `attr()` produce text this
/// engine cannot know.
#[must_use]
pub fn content_literal(declarations: &[Declaration]) -> Option<String> {
    let declaration = declarations.iter().rev().find(|d| d.name == "content")?;
    Some(declaration.string_values().collect())
}
