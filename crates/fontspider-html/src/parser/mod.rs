//! HTML tree construction.

/// Insertion modes and the tree builder.
pub mod core;

pub use self::core::{HTMLParser, InsertionMode, ParseIssue};
