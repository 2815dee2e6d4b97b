//! The rule tree produced by the parser.
//!
//! [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing)

use core::slice;

use super::serialize::serialize_component_values;
use crate::tokenizer::{CSSToken, SourceLocation};

/// [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
///
/// A CSS declaration (e.g., `font-family: Foo, serif`).
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// The property name, ASCII-lowercased.
    pub name: String,
    /// The property value as component values, without `!important`.
    pub value: Vec<ComponentValue>,
    /// Whether the declaration has `!important`.
    pub important: bool,
}

impl Declaration {
    /// The value written back out as CSS text.
    ///
    /// Strings are re-quoted with `"` and runs of whitespace become a single
    /// space, so `font-family:'A',  B` reads back as `"A", B`.
    #[must_use]
    pub fn value_text(&self) -> String {
        serialize_component_values(&self.value)
    }

    /// The `<string-token>` values of the declaration, in order.
    ///
    /// Strings nested in functions are not included, so
    /// `content: "a" attr(title) "b"` yields `["a", "b"]`.
    pub fn string_values(&self) -> impl Iterator<Item = &str> {
        self.value.iter().filter_map(|component| match component {
            ComponentValue::Token(CSSToken::String(value)) => Some(value.as_str()),
            _ => None,
        })
    }
}

/// [§ 5.4.9 Consume a component value](https://www.w3.org/TR/css-syntax-3/#consume-component-value)
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentValue {
    /// A preserved token.
    Token(CSSToken),
    /// A function with its contents.
    Function {
        /// The function name.
        name: String,
        /// The function arguments.
        value: Vec<ComponentValue>,
    },
    /// A simple block.
    Block {
        /// The opening token character: `{`, `[` or `(`.
        token: char,
        /// The block contents.
        value: Vec<ComponentValue>,
    },
}

/// One selector of a rule prelude, as text.
///
/// [§ 5.1 Selector Lists](https://www.w3.org/TR/selectors-4/#selector-list)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selector {
    /// The serialized selector, trimmed.
    pub text: String,
}

/// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
///
/// A style rule: a selector list and its declaration block.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    /// The comma-separated selectors of the prelude, in order.
    pub selectors: Vec<Selector>,
    /// The declarations in the rule's block.
    pub declarations: Vec<Declaration>,
    /// Where the prelude starts.
    pub location: SourceLocation,
}

/// The block of an at-rule, typed by the at-rule's name.
#[derive(Debug, Clone, PartialEq)]
pub enum AtRuleBlock {
    /// `@font-face`, `@page` and friends hold declarations.
    Declarations(Vec<Declaration>),
    /// Conditional group rules (`@media`, `@supports`, ...) hold rules.
    Rules(Vec<Rule>),
    /// Anything else is kept as component values.
    Raw(Vec<ComponentValue>),
}

/// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule)
#[derive(Debug, Clone, PartialEq)]
pub struct AtRule {
    /// The at-keyword name (without the `@`), as written.
    pub name: String,
    /// The prelude component values, trimmed of surrounding whitespace.
    pub prelude: Vec<ComponentValue>,
    /// The block, if the rule has one.
    pub block: Option<AtRuleBlock>,
    /// Where the at-keyword starts.
    pub location: SourceLocation,
}

impl AtRule {
    /// Whether this is an `@font-face` rule.
    #[must_use]
    pub fn is_font_face(&self) -> bool {
        self.name.eq_ignore_ascii_case("font-face")
    }
}

/// A rule: either a style rule or an at-rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// A style rule (qualified rule).
    Style(StyleRule),
    /// An at-rule.
    At(AtRule),
}

/// [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stylesheet {
    /// The top-level rules, in source order.
    pub rules: Vec<Rule>,
}

impl Stylesheet {
    /// Every rule, depth-first, descending into conditional group rules.
    #[must_use]
    pub fn walk(&self) -> RuleWalk<'_> {
        RuleWalk {
            stack: vec![self.rules.iter()],
        }
    }

    /// Every style rule, including those nested in `@media` and friends.
    pub fn style_rules(&self) -> impl Iterator<Item = &StyleRule> {
        self.walk().filter_map(|rule| match rule {
            Rule::Style(style) => Some(style),
            Rule::At(_) => None,
        })
    }

    /// The declaration block of every `@font-face` rule, nested ones included.
    pub fn font_faces(&self) -> impl Iterator<Item = &[Declaration]> {
        self.walk().filter_map(|rule| match rule {
            Rule::At(at) if at.is_font_face() => match &at.block {
                Some(AtRuleBlock::Declarations(declarations)) => Some(declarations.as_slice()),
                _ => None,
            },
            _ => None,
        })
    }
}

/// Depth-first iterator over the rules of a [`Stylesheet`].
#[derive(Debug)]
pub struct RuleWalk<'a> {
    stack: Vec<slice::Iter<'a, Rule>>,
}

impl<'a> Iterator for RuleWalk<'a> {
    type Item = &'a Rule;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let level = self.stack.last_mut()?;
            let Some(rule) = level.next() else {
                let _ = self.stack.pop();
                continue;
            };
            if let Rule::At(AtRule {
                block: Some(AtRuleBlock::Rules(children)),
                ..
            }) = rule
            {
                self.stack.push(children.iter());
            }
            return Some(rule);
        }
    }
}
