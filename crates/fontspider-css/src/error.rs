//! Stylesheet syntax errors.
//!
//! CSS Syntax Level 3 recovers from every error. Stylesheets fed to the
//! resolver are authored by hand, so the conditions below are treated as
//! fatal instead: they almost always mean the file was truncated or a brace
//! went missing, and guessing would attribute text to the wrong rules.

use strum_macros::Display;
use thiserror::Error;

use crate::tokenizer::SourceLocation;

/// What kind of syntax error stopped parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum CssErrorKind {
    /// A `{` block still open at the end of input.
    #[strum(to_string = "unclosed block")]
    UnclosedBlock,
    /// A `(` or `[` group, or a function, still open at the end of input.
    #[strum(to_string = "unclosed bracket")]
    UnclosedBracket,
    /// A quoted string still open at the end of input.
    #[strum(to_string = "unclosed string")]
    UnclosedString,
    /// A `/*` comment still open at the end of input.
    #[strum(to_string = "unclosed comment")]
    UnclosedComment,
    /// An unquoted `url(` still open at the end of input.
    #[strum(to_string = "unclosed url")]
    UnclosedUrl,
    /// A `}` at the top level of a stylesheet.
    #[strum(to_string = "unexpected }}")]
    UnexpectedCloseBrace,
}

/// A fatal stylesheet syntax error and where it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind} at {location}")]
pub struct CssParseError {
    /// What went wrong.
    pub kind: CssErrorKind,
    /// Location of the construct that was left open, or of the stray token.
    pub location: SourceLocation,
}

impl CssParseError {
    /// Error of `kind` at `location`.
    #[must_use]
    pub const fn new(kind: CssErrorKind, location: SourceLocation) -> Self {
        Self { kind, location }
    }
}
