//! Text helpers for declaration values.
//!
//! These work on the text of a value as written back out by
//! [`Declaration::value_text`](crate::parser::Declaration::value_text),
//! where every string is quoted with `"`.

/// A `url(...)` reference found in a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlReference {
    /// The whole `url(...)` text.
    pub source: String,
    /// The quote around the reference, if it was quoted.
    pub quote: Option<char>,
    /// The reference itself, without quotes or surrounding whitespace.
    pub value: String,
}

/// Remove quotes that pair up.
///
/// A quote opens a pair with the *last* matching quote later on the same
/// line, provided at least one character sits between them, and both quotes
/// are dropped. Quotes that do not pair are kept.
///
/// ```
/// use fontspider_css::values::quoteless;
///
/// assert_eq!(quoteless(r#""Open Sans""#), "Open Sans");
/// assert_eq!(quoteless(r#""a", "b""#), r#"a", "b"#);
/// assert_eq!(quoteless("it's"), "it's");
/// ```
#[must_use]
pub fn quoteless(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if matches!(c, '"' | '\'') {
            let line_end = chars[i + 1..]
                .iter()
                .position(|&c| is_line_terminator(c))
                .map_or(chars.len(), |offset| i + 1 + offset);
            let closing = chars[i + 1..line_end]
                .iter()
                .rposition(|&candidate| candidate == c)
                .map(|offset| i + 1 + offset)
                .filter(|&j| j > i + 1);
            if let Some(j) = closing {
                out.extend(&chars[i + 1..j]);
                i = j + 1;
                continue;
            }
        }
        out.push(c);
        i += 1;
    }

    out
}

/// Every `url(...)` in `value`, in order.
///
/// The reference may be quoted with either quote or not quoted, and may be
/// padded with whitespace inside the parentheses. `data:` URLs are skipped:
/// they never name a file.
#[must_use]
pub fn url_references(value: &str) -> Vec<UrlReference> {
    let chars: Vec<char> = value.chars().collect();
    let mut references = Vec::new();
    let mut i = 0;

    while i + 4 <= chars.len() {
        let opens_url = chars[i..i + 4]
            .iter()
            .zip("url(".chars())
            .all(|(&c, expected)| c.to_ascii_lowercase() == expected);
        if !opens_url {
            i += 1;
            continue;
        }

        match match_url_body(&chars, i + 4) {
            Some((end, quote, reference)) => {
                if !reference.get(..5).is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:")) {
                    references.push(UrlReference {
                        source: chars[i..end].iter().collect(),
                        quote,
                        value: reference,
                    });
                }
                i = end;
            }
            None => i += 1,
        }
    }

    references
}

/// Match `\s*(['"]?)(.+?)\1\s*\)` at `start`, returning the end of the match,
/// the quote and the reference.
fn match_url_body(chars: &[char], start: usize) -> Option<(usize, Option<char>, String)> {
    let mut body_start = start;
    while chars.get(body_start).is_some_and(|c| c.is_whitespace()) {
        body_start += 1;
    }

    let quoted = chars
        .get(body_start)
        .copied()
        .filter(|c| matches!(c, '"' | '\''));
    let attempts = quoted
        .map(|quote| (Some(quote), body_start + 1))
        .into_iter()
        .chain([(None, body_start)]);

    for (quote, value_start) in attempts {
        let mut value_end = value_start;
        while let Some(&c) = chars.get(value_end) {
            if is_line_terminator(c) {
                break;
            }
            value_end += 1;
            if let Some(end) = closes_url(chars, value_end, quote) {
                let reference = chars[value_start..value_end].iter().collect();
                return Some((end, quote, reference));
            }
        }
    }
    None
}

/// If `quote`, optional whitespace and `)` follow at `position`, the index
/// just past the `)`.
fn closes_url(chars: &[char], position: usize, quote: Option<char>) -> Option<usize> {
    let mut position = position;
    if let Some(quote) = quote {
        if chars.get(position) != Some(&quote) {
            return None;
        }
        position += 1;
    }
    while chars.get(position).is_some_and(|c| c.is_whitespace()) {
        position += 1;
    }
    (chars.get(position) == Some(&')')).then_some(position + 1)
}

/// Split a `font-family` list on the commas between families.
///
/// Commas inside quotes do not split. Entries are trimmed and keep their
/// quotes; empty entries are dropped.
///
/// ```
/// use fontspider_css::values::split_family_list;
///
/// assert_eq!(
///     split_family_list(r#""Hello, World", Foo , serif"#),
///     vec![r#""Hello, World""#, "Foo", "serif"],
/// );
/// ```
#[must_use]
pub fn split_family_list(value: &str) -> Vec<String> {
    let mut families = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for c in value.chars() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if let Some(open) = quote {
            quote = (c != open).then_some(open);
        } else if matches!(c, '"' | '\'') {
            quote = Some(c);
        } else if c == ',' {
            push_family(&mut families, &current);
            current.clear();
            continue;
        }
        current.push(c);
    }
    push_family(&mut families, &current);

    families
}

fn push_family(families: &mut Vec<String>, entry: &str) {
    let entry = entry.trim();
    if !entry.is_empty() {
        families.push(entry.to_string());
    }
}

/// Line terminators. Neither a quote pair nor a `url()` reference spans one.
const fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}
