//! CSS tokenizer, parser and selector matching for fontspider.
//!
//! # Scope
//!
//! This crate implements:
//! - **CSS Tokenizer** ([§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization))
//!   - All token types, with the source location of each
//!   - Comment handling and escape sequences
//!
//! - **CSS Parser** ([§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing))
//!   - Style rules, at-rules with typed blocks, declarations
//!   - Conditional group rules (`@media`, `@supports`, ...) nest rules
//!
//! - **CSS Selectors** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - Type, class, ID, universal and attribute selectors
//!   - Structural pseudo-classes, `:not()`, `:is()`, `:where()`
//!   - All four combinators
//!
//! - **Value helpers** for `font-family` lists and `url()` references
//!
//! # Not Implemented
//!
//! - Cascade, specificity and computed values
//! - `@import`
//! - Namespaced selectors and CSS nesting

/// Stylesheet syntax errors.
pub mod error;
/// CSS parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
pub mod parser;
/// CSS selector parsing and matching per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
pub mod selector;
/// CSS tokenizer per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
pub mod tokenizer;
/// Helpers for declaration value text.
pub mod values;

pub use error::{CssErrorKind, CssParseError};
pub use parser::{AtRule, AtRuleBlock, CSSParser, ComponentValue, Declaration, Rule, Selector, StyleRule, Stylesheet};
pub use selector::{ParsedSelector, parse_selector, select_all};
pub use tokenizer::{CSSToken, CSSTokenizer, SourceLocation};

/// Tokenize and parse a whole stylesheet.
///
/// # Errors
///
/// Returns the first error in source order of the tokenizer (unclosed
/// comment, string or `url(`), and otherwise the first structural error of
/// the parser.
pub fn parse_stylesheet(text: &str) -> Result<Stylesheet, CssParseError> {
    let tokens = tokenize(text)?;
    CSSParser::new(tokens).parse_stylesheet()
}

/// Parse the contents of a `style` attribute.
///
/// # Errors
///
/// As for [`parse_stylesheet`], except that a stray `}` is skipped.
pub fn parse_declaration_list(text: &str) -> Result<Vec<Declaration>, CssParseError> {
    let tokens = tokenize(text)?;
    CSSParser::new(tokens).parse_declaration_list()
}

fn tokenize(text: &str) -> Result<Vec<tokenizer::SpannedToken>, CssParseError> {
    let mut tokenizer = CSSTokenizer::new(text);
    tokenizer.run();
    if let Some(&error) = tokenizer.errors().first() {
        return Err(error);
    }
    Ok(tokenizer.into_tokens())
}
