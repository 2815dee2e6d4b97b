//! CSS tokenizer module.

/// CSS tokenizer implementation.
pub mod core;
/// CSS token types per [CSS Syntax Level 3 § 4](https://www.w3.org/TR/css-syntax-3/#tokenization).
pub mod token;

pub use self::core::CSSTokenizer;
pub use token::{CSSToken, SourceLocation, SpannedToken};
