//! Character references.
//!
//! [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
//!
//! The reference states are collapsed into a single lookahead: when the data,
//! RCDATA or attribute value state meets `&`, [`HTMLTokenizer::consume_character_reference`]
//! decides from the upcoming input what the reference stands for and advances
//! past it. When nothing matches, only the `&` is returned and the rest of the
//! input is tokenized normally, which is the same output "flush code points
//! consumed as a character reference" produces.
//!
//! Named references cover the entities commonly written by hand or emitted by
//! site generators, not all 2,231 of § 13.5.

use std::collections::HashMap;
use std::sync::LazyLock;

use super::core::HTMLTokenizer;

/// Longest entity name in the table, used to bound the lookahead.
const MAX_NAME_LEN: usize = 32;

/// Named references. Keys ending in `;` need the semicolon; the keys without
/// one are the legacy forms browsers also accept bare (`&amp` in `a&ampb`).
static NAMED_ENTITIES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("amp;", "&"),
        ("amp", "&"),
        ("AMP;", "&"),
        ("AMP", "&"),
        ("lt;", "<"),
        ("lt", "<"),
        ("LT;", "<"),
        ("LT", "<"),
        ("gt;", ">"),
        ("gt", ">"),
        ("GT;", ">"),
        ("GT", ">"),
        ("quot;", "\""),
        ("quot", "\""),
        ("QUOT;", "\""),
        ("QUOT", "\""),
        ("apos;", "'"),
        ("nbsp;", "\u{00A0}"),
        ("nbsp", "\u{00A0}"),
        ("ensp;", "\u{2002}"),
        ("emsp;", "\u{2003}"),
        ("thinsp;", "\u{2009}"),
        ("zwnj;", "\u{200C}"),
        ("zwj;", "\u{200D}"),
        ("shy;", "\u{00AD}"),
        ("shy", "\u{00AD}"),
        ("copy;", "\u{00A9}"),
        ("copy", "\u{00A9}"),
        ("COPY;", "\u{00A9}"),
        ("reg;", "\u{00AE}"),
        ("reg", "\u{00AE}"),
        ("REG;", "\u{00AE}"),
        ("trade;", "\u{2122}"),
        ("hellip;", "\u{2026}"),
        ("mdash;", "\u{2014}"),
        ("ndash;", "\u{2013}"),
        ("lsquo;", "\u{2018}"),
        ("rsquo;", "\u{2019}"),
        ("sbquo;", "\u{201A}"),
        ("ldquo;", "\u{201C}"),
        ("rdquo;", "\u{201D}"),
        ("bdquo;", "\u{201E}"),
        ("laquo;", "\u{00AB}"),
        ("laquo", "\u{00AB}"),
        ("raquo;", "\u{00BB}"),
        ("raquo", "\u{00BB}"),
        ("lsaquo;", "\u{2039}"),
        ("rsaquo;", "\u{203A}"),
        ("middot;", "\u{00B7}"),
        ("middot", "\u{00B7}"),
        ("bull;", "\u{2022}"),
        ("dagger;", "\u{2020}"),
        ("Dagger;", "\u{2021}"),
        ("para;", "\u{00B6}"),
        ("para", "\u{00B6}"),
        ("sect;", "\u{00A7}"),
        ("sect", "\u{00A7}"),
        ("deg;", "\u{00B0}"),
        ("deg", "\u{00B0}"),
        ("plusmn;", "\u{00B1}"),
        ("plusmn", "\u{00B1}"),
        ("times;", "\u{00D7}"),
        ("times", "\u{00D7}"),
        ("divide;", "\u{00F7}"),
        ("divide", "\u{00F7}"),
        ("minus;", "\u{2212}"),
        ("ne;", "\u{2260}"),
        ("le;", "\u{2264}"),
        ("ge;", "\u{2265}"),
        ("infin;", "\u{221E}"),
        ("frac12;", "\u{00BD}"),
        ("frac14;", "\u{00BC}"),
        ("frac34;", "\u{00BE}"),
        ("sup2;", "\u{00B2}"),
        ("sup3;", "\u{00B3}"),
        ("micro;", "\u{00B5}"),
        ("cent;", "\u{00A2}"),
        ("cent", "\u{00A2}"),
        ("pound;", "\u{00A3}"),
        ("pound", "\u{00A3}"),
        ("yen;", "\u{00A5}"),
        ("yen", "\u{00A5}"),
        ("euro;", "\u{20AC}"),
        ("larr;", "\u{2190}"),
        ("rarr;", "\u{2192}"),
        ("uarr;", "\u{2191}"),
        ("darr;", "\u{2193}"),
        ("harr;", "\u{2194}"),
        ("hearts;", "\u{2665}"),
        ("check;", "\u{2713}"),
        ("star;", "\u{2606}"),
        ("starf;", "\u{2605}"),
        ("iexcl;", "\u{00A1}"),
        ("iquest;", "\u{00BF}"),
        ("ordf;", "\u{00AA}"),
        ("ordm;", "\u{00BA}"),
        ("szlig;", "\u{00DF}"),
        ("Agrave;", "\u{00C0}"),
        ("Aacute;", "\u{00C1}"),
        ("Acirc;", "\u{00C2}"),
        ("Atilde;", "\u{00C3}"),
        ("Auml;", "\u{00C4}"),
        ("Aring;", "\u{00C5}"),
        ("AElig;", "\u{00C6}"),
        ("Ccedil;", "\u{00C7}"),
        ("Egrave;", "\u{00C8}"),
        ("Eacute;", "\u{00C9}"),
        ("Ecirc;", "\u{00CA}"),
        ("Euml;", "\u{00CB}"),
        ("Iacute;", "\u{00CD}"),
        ("Ntilde;", "\u{00D1}"),
        ("Oacute;", "\u{00D3}"),
        ("Ouml;", "\u{00D6}"),
        ("Oslash;", "\u{00D8}"),
        ("Uacute;", "\u{00DA}"),
        ("Uuml;", "\u{00DC}"),
        ("agrave;", "\u{00E0}"),
        ("aacute;", "\u{00E1}"),
        ("acirc;", "\u{00E2}"),
        ("atilde;", "\u{00E3}"),
        ("auml;", "\u{00E4}"),
        ("aring;", "\u{00E5}"),
        ("aelig;", "\u{00E6}"),
        ("ccedil;", "\u{00E7}"),
        ("egrave;", "\u{00E8}"),
        ("eacute;", "\u{00E9}"),
        ("ecirc;", "\u{00EA}"),
        ("euml;", "\u{00EB}"),
        ("igrave;", "\u{00EC}"),
        ("iacute;", "\u{00ED}"),
        ("icirc;", "\u{00EE}"),
        ("iuml;", "\u{00EF}"),
        ("ntilde;", "\u{00F1}"),
        ("ograve;", "\u{00F2}"),
        ("oacute;", "\u{00F3}"),
        ("ocirc;", "\u{00F4}"),
        ("otilde;", "\u{00F5}"),
        ("ouml;", "\u{00F6}"),
        ("oslash;", "\u{00F8}"),
        ("ugrave;", "\u{00F9}"),
        ("uacute;", "\u{00FA}"),
        ("ucirc;", "\u{00FB}"),
        ("uuml;", "\u{00FC}"),
        ("yacute;", "\u{00FD}"),
        ("yuml;", "\u{00FF}"),
        ("oelig;", "\u{0153}"),
        ("OElig;", "\u{0152}"),
        ("scaron;", "\u{0161}"),
        ("Scaron;", "\u{0160}"),
        ("alpha;", "\u{03B1}"),
        ("beta;", "\u{03B2}"),
        ("gamma;", "\u{03B3}"),
        ("delta;", "\u{03B4}"),
        ("epsilon;", "\u{03B5}"),
        ("lambda;", "\u{03BB}"),
        ("mu;", "\u{03BC}"),
        ("pi;", "\u{03C0}"),
        ("sigma;", "\u{03C3}"),
        ("omega;", "\u{03C9}"),
        ("Omega;", "\u{03A9}"),
    ])
});

/// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
///
/// "If the number is one of the numbers in the first column of the following
/// table, then find the row with that number in the first column, and set the
/// character reference code to the number in the second column of that row."
const C1_REPLACEMENTS: [(u32, char); 27] = [
    (0x80, '\u{20AC}'),
    (0x82, '\u{201A}'),
    (0x83, '\u{0192}'),
    (0x84, '\u{201E}'),
    (0x85, '\u{2026}'),
    (0x86, '\u{2020}'),
    (0x87, '\u{2021}'),
    (0x88, '\u{02C6}'),
    (0x89, '\u{2030}'),
    (0x8A, '\u{0160}'),
    (0x8B, '\u{2039}'),
    (0x8C, '\u{0152}'),
    (0x8E, '\u{017D}'),
    (0x91, '\u{2018}'),
    (0x92, '\u{2019}'),
    (0x93, '\u{201C}'),
    (0x94, '\u{201D}'),
    (0x95, '\u{2022}'),
    (0x96, '\u{2013}'),
    (0x97, '\u{2014}'),
    (0x98, '\u{02DC}'),
    (0x99, '\u{2122}'),
    (0x9A, '\u{0161}'),
    (0x9B, '\u{203A}'),
    (0x9C, '\u{0153}'),
    (0x9E, '\u{017E}'),
    (0x9F, '\u{0178}'),
];

/// Look up a named character reference, `name` without the leading `&`.
#[must_use]
pub fn lookup_entity(name: &str) -> Option<&'static str> {
    NAMED_ENTITIES.get(name).copied()
}

/// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
///
/// Map a character reference code to the character it produces.
#[must_use]
pub fn numeric_reference_to_char(code: u32) -> char {
    // "If the number is 0x00, then this is a null-character-reference parse
    // error. Set the character reference code to 0xFFFD."
    // "If the number is greater than 0x10FFFF ... Set the character reference
    // code to 0xFFFD."
    // "If the number is a surrogate ... Set the character reference code to 0xFFFD."
    if code == 0 {
        return '\u{FFFD}';
    }
    if let Some(&(_, replacement)) = C1_REPLACEMENTS.iter().find(|(c1, _)| *c1 == code) {
        return replacement;
    }
    char::from_u32(code).unwrap_or('\u{FFFD}')
}

impl HTMLTokenizer {
    /// [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
    ///
    /// Called with the `&` just consumed. Returns the text the reference
    /// stands for, or `"&"` when the input does not form a reference.
    pub(super) fn consume_character_reference(&mut self, in_attribute: bool) -> String {
        match self.peek_codepoint(0) {
            // "U+0023 NUMBER SIGN (#) - ... Switch to the numeric character reference state."
            Some('#') => self.consume_numeric_character_reference(),
            // "ASCII alphanumeric - Reconsume in the named character reference state."
            Some(c) if c.is_ascii_alphanumeric() => {
                self.consume_named_character_reference(in_attribute)
            }
            // "Anything else - Flush code points consumed as a character reference."
            _ => String::from("&"),
        }
    }

    /// [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
    fn consume_named_character_reference(&mut self, in_attribute: bool) -> String {
        let rest = &self.input[self.current_pos..];
        let run = rest
            .bytes()
            .take(MAX_NAME_LEN)
            .take_while(u8::is_ascii_alphanumeric)
            .count();

        // "Consume the maximum number of characters possible, where the consumed
        // characters are one of the identifiers in the first column of the named
        // character references table."
        let with_semicolon = rest
            .get(..=run)
            .filter(|name| name.ends_with(';'))
            .and_then(|name| lookup_entity(name).map(|r| (name.len(), r)));
        let matched = with_semicolon
            .or_else(|| (1..=run).rev().find_map(|len| lookup_entity(&rest[..len]).map(|r| (len, r))));

        let Some((len, replacement)) = matched else {
            // "Otherwise - Flush code points consumed as a character reference.
            // Switch to the ambiguous ampersand state."
            self.log_parse_error("unknown-named-character-reference");
            return String::from("&");
        };

        // "If the character reference was consumed as part of an attribute, and
        // the last character matched is not a U+003B SEMICOLON character (;), and
        // the next input character is either a U+003D EQUALS SIGN character (=) or
        // an ASCII alphanumeric, then, for historical reasons, flush code points
        // consumed as a character reference and switch to the return state."
        let ends_with_semicolon = rest[..len].ends_with(';');
        if in_attribute
            && !ends_with_semicolon
            && rest[len..]
                .chars()
                .next()
                .is_some_and(|c| c == '=' || c.is_ascii_alphanumeric())
        {
            return String::from("&");
        }

        if !ends_with_semicolon {
            self.log_parse_error("missing-semicolon-after-character-reference");
        }
        self.current_pos += len;
        replacement.to_string()
    }

    /// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
    fn consume_numeric_character_reference(&mut self) -> String {
        // Skip the '#'.
        let rest = &self.input[self.current_pos + 1..];
        let (radix, prefix_len) = match rest.chars().next() {
            Some('x' | 'X') => (16, 1),
            _ => (10, 0),
        };
        let digits_len = rest[prefix_len..]
            .chars()
            .take_while(|c| c.is_digit(radix))
            .count();

        // "Anything else - This is an absence-of-digits-in-numeric-character-reference
        // parse error. Flush code points consumed as a character reference."
        if digits_len == 0 {
            self.log_parse_error("absence-of-digits-in-numeric-character-reference");
            return String::from("&");
        }

        let digits = &rest[prefix_len..prefix_len + digits_len];
        // Overflow behaves like any other out-of-range value.
        let code = u32::from_str_radix(digits, radix).unwrap_or(u32::MAX);
        let has_semicolon = rest[prefix_len + digits_len..].starts_with(';');

        self.current_pos += 1 + prefix_len + digits_len + usize::from(has_semicolon);
        if !has_semicolon {
            self.log_parse_error("missing-semicolon-after-character-reference");
        }
        numeric_reference_to_char(code).to_string()
    }
}
