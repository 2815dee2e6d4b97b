//! [§ 4 Selector syntax](https://www.w3.org/TR/selectors-4/#syntax)
//!
//! Selector text reaches this parser after the stylesheet parser has written
//! it back out, so identifiers may carry CSS escapes. Namespaces (`ns|div`)
//! and nesting (`&`) are not supported; a selector using them fails to
//! parse.

use super::{
    AttributeMatcher, AttributeSelector, Combinator, ComplexSelector, CompoundSelector, Nth,
    ParsedSelector, PseudoClass, SimpleSelector,
};
use crate::tokenizer::core::{is_ident_code_point, is_ident_start_code_point};

/// Functional pseudo-classes that take a selector list and match like `:is()`.
const MATCHES_ANY: &[&str] = &["is", "where", "matches", "-webkit-any", "-moz-any"];

/// Parse a raw selector string into a `ParsedSelector`.
///
/// "The grammar of Selectors is defined in terms of CSS syntax."
///
/// Accepts exactly one complex selector; a selector list such as `a, b`
/// returns `None`, as does any syntax this module does not model.
#[must_use]
pub fn parse_selector(raw: &str) -> Option<ParsedSelector> {
    let mut parser = SelectorParser::new(raw);
    let _ = parser.skip_whitespace();
    let selector = parser.parse_complex()?;
    let _ = parser.skip_whitespace();
    parser.at_end().then_some(selector)
}

/// [§ 5.1 Selector Lists](https://www.w3.org/TR/selectors-4/#selector-list)
///
/// "A selector list is a comma-separated list of selectors." The list is
/// rejected as a whole if any of its selectors fails to parse, matching
/// how browsers drop an invalid rule.
#[must_use]
pub fn parse_selector_list(raw: &str) -> Option<Vec<ParsedSelector>> {
    let mut parser = SelectorParser::new(raw);
    let list = parser.parse_list()?;
    parser.at_end().then_some(list)
}

struct SelectorParser {
    chars: Vec<char>,
    position: usize,
}

impl SelectorParser {
    fn new(raw: &str) -> Self {
        Self {
            chars: raw.chars().collect(),
            position: 0,
        }
    }

    /// A comma-separated list, stopping in front of a `)` or the end.
    fn parse_list(&mut self) -> Option<Vec<ParsedSelector>> {
        let mut list = Vec::new();
        loop {
            let _ = self.skip_whitespace();
            list.push(self.parse_complex()?);
            let _ = self.skip_whitespace();
            if self.peek() != Some(',') {
                return Some(list);
            }
            self.position += 1;
        }
    }

    /// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
    ///
    /// Parsed left-to-right, then reversed so the subject comes first.
    fn parse_complex(&mut self) -> Option<ParsedSelector> {
        let mut compounds = vec![self.parse_compound()?];
        let mut combinators = Vec::new();

        loop {
            let had_whitespace = self.skip_whitespace();
            let combinator = match self.peek() {
                None | Some(',' | ')') => break,
                Some('>') => Combinator::Child,
                Some('+') => Combinator::NextSibling,
                Some('~') => Combinator::SubsequentSibling,
                Some(_) if had_whitespace => Combinator::Descendant,
                Some(_) => return None,
            };
            if combinator != Combinator::Descendant {
                self.position += 1;
                let _ = self.skip_whitespace();
            }
            combinators.push(combinator);
            compounds.push(self.parse_compound()?);
        }

        // "The elements represented by a complex selector are the elements
        // matched by the last compound selector in the complex selector."
        let subject = compounds.pop()?;
        let combinators = combinators
            .into_iter()
            .zip(compounds)
            .rev()
            .collect();

        Some(ParsedSelector {
            complex: ComplexSelector {
                subject,
                combinators,
            },
        })
    }

    /// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
    ///
    /// "If it contains a type selector or universal selector, that type
    /// selector or universal selector must come first in the sequence."
    fn parse_compound(&mut self) -> Option<CompoundSelector> {
        let mut simple_selectors = Vec::new();

        if self.peek() == Some('*') {
            self.position += 1;
            simple_selectors.push(SimpleSelector::Universal);
        } else if self.starts_ident() {
            let name = self.consume_ident()?;
            simple_selectors.push(SimpleSelector::Type(name.to_ascii_lowercase()));
        }

        loop {
            match self.peek() {
                // [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
                Some('.') => {
                    self.position += 1;
                    simple_selectors.push(SimpleSelector::Class(self.consume_ident()?));
                }

                // [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
                Some('#') => {
                    self.position += 1;
                    let id = self.consume_name();
                    if id.is_empty() {
                        return None;
                    }
                    simple_selectors.push(SimpleSelector::Id(id));
                }

                Some('[') => {
                    self.position += 1;
                    simple_selectors.push(SimpleSelector::Attribute(self.parse_attribute()?));
                }

                Some(':') => {
                    self.position += 1;
                    simple_selectors.push(self.parse_pseudo()?);
                }

                // Namespaces and nesting.
                Some('|' | '&') => return None,

                _ => break,
            }
        }

        if simple_selectors.is_empty() {
            None
        } else {
            Some(CompoundSelector { simple_selectors })
        }
    }

    /// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    ///
    /// Called after the `[`.
    fn parse_attribute(&mut self) -> Option<AttributeSelector> {
        let _ = self.skip_whitespace();
        let name = self.consume_ident()?.to_ascii_lowercase();
        let _ = self.skip_whitespace();

        let operator = match self.peek()? {
            ']' => {
                self.position += 1;
                return Some(AttributeSelector {
                    name,
                    matcher: AttributeMatcher::Exists,
                    case_insensitive: false,
                });
            }
            '=' => {
                self.position += 1;
                '='
            }
            op @ ('~' | '|' | '^' | '$' | '*') if self.peek_at(1) == Some('=') => {
                self.position += 2;
                op
            }
            _ => return None,
        };

        let _ = self.skip_whitespace();
        let value = match self.peek()? {
            quote @ ('"' | '\'') => {
                self.position += 1;
                self.consume_string(quote)?
            }
            _ => self.consume_ident()?,
        };
        let _ = self.skip_whitespace();

        // [§ 6.3 Case-sensitivity](https://www.w3.org/TR/selectors-4/#attribute-case)
        let case_insensitive = match self.peek()? {
            'i' | 'I' => true,
            's' | 'S' | ']' => false,
            _ => return None,
        };
        if self.peek() != Some(']') {
            self.position += 1;
            let _ = self.skip_whitespace();
        }
        if self.peek() != Some(']') {
            return None;
        }
        self.position += 1;

        let matcher = match operator {
            '~' => AttributeMatcher::Includes(value),
            '|' => AttributeMatcher::DashMatch(value),
            '^' => AttributeMatcher::Prefix(value),
            '$' => AttributeMatcher::Suffix(value),
            '*' => AttributeMatcher::Substring(value),
            _ => AttributeMatcher::Equals(value),
        };
        Some(AttributeSelector {
            name,
            matcher,
            case_insensitive,
        })
    }

    /// [§ 3.5 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    /// [§ 3.6 Pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-elements)
    ///
    /// Called after the first `:`.
    fn parse_pseudo(&mut self) -> Option<SimpleSelector> {
        let is_pseudo_element = self.peek() == Some(':');
        if is_pseudo_element {
            self.position += 1;
        }
        let name = self.consume_ident()?.to_ascii_lowercase();

        if self.peek() == Some('(') {
            self.position += 1;
            return self.parse_functional_pseudo(name, is_pseudo_element);
        }

        if is_pseudo_element {
            return Some(SimpleSelector::Permissive(name));
        }

        let pseudo_class = match name.as_str() {
            "root" => PseudoClass::Root,
            "first-child" => PseudoClass::FirstChild,
            "last-child" => PseudoClass::LastChild,
            "first-of-type" => PseudoClass::FirstOfType,
            "last-of-type" => PseudoClass::LastOfType,
            "only-child" => PseudoClass::OnlyChild,
            "empty" => PseudoClass::Empty,
            "link" | "any-link" => PseudoClass::Link,
            "enabled" => PseudoClass::Enabled,
            "disabled" => PseudoClass::Disabled,
            // Interaction and document state, legacy one-colon
            // pseudo-elements, and anything unknown.
            _ => return Some(SimpleSelector::Permissive(name)),
        };
        Some(SimpleSelector::PseudoClass(pseudo_class))
    }

    /// Called after the `(`; consumes through the matching `)`.
    fn parse_functional_pseudo(&mut self, name: String, is_pseudo_element: bool) -> Option<SimpleSelector> {
        if !is_pseudo_element {
            if name == "not" || MATCHES_ANY.contains(&name.as_str()) {
                let list = self.parse_list()?;
                if self.peek() != Some(')') {
                    return None;
                }
                self.position += 1;
                return Some(if name == "not" {
                    SimpleSelector::Not(list)
                } else {
                    SimpleSelector::Is(list)
                });
            }

            let constructor: Option<fn(Nth) -> PseudoClass> = match name.as_str() {
                "nth-child" => Some(PseudoClass::NthChild),
                "nth-last-child" => Some(PseudoClass::NthLastChild),
                "nth-of-type" => Some(PseudoClass::NthOfType),
                "nth-last-of-type" => Some(PseudoClass::NthLastOfType),
                _ => None,
            };
            if let Some(constructor) = constructor {
                let argument = self.consume_balanced()?;
                return parse_nth(&argument).map(|nth| SimpleSelector::PseudoClass(constructor(nth)));
            }
        }

        // `:has()`, `:lang()`, `::slotted()`, `::part()` and friends.
        let _ = self.consume_balanced()?;
        Some(SimpleSelector::Permissive(name))
    }

    /// Everything up to the `)` closing an already consumed `(`.
    fn consume_balanced(&mut self) -> Option<String> {
        let mut depth = 1_usize;
        let mut argument = String::new();
        while let Some(c) = self.next_char() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(argument);
                    }
                }
                '\\' => {
                    argument.push(c);
                    if let Some(escaped) = self.next_char() {
                        argument.push(escaped);
                    }
                    continue;
                }
                _ => {}
            }
            argument.push(c);
        }
        None
    }

    /// [CSS Syntax § 4.3.9](https://www.w3.org/TR/css-syntax-3/#would-start-an-identifier)
    fn starts_ident(&self) -> bool {
        match self.peek() {
            Some('-') => match self.peek_at(1) {
                Some('\\') => true,
                Some(c) => is_ident_start_code_point(c) || c == '-',
                None => false,
            },
            Some('\\') => true,
            Some(c) => is_ident_start_code_point(c),
            None => false,
        }
    }

    /// An identifier, with escapes resolved.
    fn consume_ident(&mut self) -> Option<String> {
        if !self.starts_ident() {
            return None;
        }
        Some(self.consume_name())
    }

    /// A run of ident code points and escapes, possibly empty.
    fn consume_name(&mut self) -> String {
        let mut name = String::new();
        loop {
            match self.peek() {
                Some(c) if is_ident_code_point(c) => {
                    self.position += 1;
                    name.push(c);
                }
                Some('\\') if self.peek_at(1).is_some_and(|c| c != '\n') => {
                    self.position += 1;
                    name.push(self.consume_escape());
                }
                _ => return name,
            }
        }
    }

    /// [CSS Syntax § 4.3.7 Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-escaped-code-point)
    fn consume_escape(&mut self) -> char {
        let mut hex = String::new();
        while hex.len() < 6 && self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
            if let Some(c) = self.next_char() {
                hex.push(c);
            }
        }
        if hex.is_empty() {
            return self.next_char().unwrap_or('\u{FFFD}');
        }
        if self.peek().is_some_and(|c| matches!(c, ' ' | '\t' | '\n')) {
            self.position += 1;
        }
        u32::from_str_radix(&hex, 16)
            .ok()
            .filter(|&code| code != 0)
            .and_then(char::from_u32)
            .unwrap_or('\u{FFFD}')
    }

    /// A quoted string, called after the opening quote.
    fn consume_string(&mut self, quote: char) -> Option<String> {
        let mut value = String::new();
        loop {
            match self.next_char()? {
                c if c == quote => return Some(value),
                '\\' => match self.peek()? {
                    '\n' => self.position += 1,
                    _ => value.push(self.consume_escape()),
                },
                c => value.push(c),
            }
        }
    }

    /// Returns whether any whitespace was skipped.
    fn skip_whitespace(&mut self) -> bool {
        let start = self.position;
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.position += 1;
        }
        self.position > start
    }

    fn at_end(&self) -> bool {
        self.position >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.position + offset).copied()
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += 1;
        Some(c)
    }
}

/// [CSS Syntax § 6 The An+B microsyntax](https://www.w3.org/TR/css-syntax-3/#anb-microsyntax)
///
/// `odd`, `even`, `3`, `-n+3`, `2n + 1`. The `of S` form is not supported.
fn parse_nth(argument: &str) -> Option<Nth> {
    let compact: String = argument
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();

    match compact.as_str() {
        "odd" => return Some(Nth { a: 2, b: 1 }),
        "even" => return Some(Nth { a: 2, b: 0 }),
        _ => {}
    }

    let Some((step, offset)) = compact.split_once('n') else {
        return compact.parse().ok().map(|b| Nth { a: 0, b });
    };
    let a = match step {
        "" | "+" => 1,
        "-" => -1,
        step => step.parse().ok()?,
    };
    let b = match offset {
        "" => 0,
        offset if offset.starts_with(['+', '-']) => offset.trim_start_matches('+').parse().ok()?,
        _ => return None,
    };
    Some(Nth { a, b })
}
