//! Font usage resolution for fontspider.
//!
//! Given the HTML documents of a site, this crate works out which declared
//! web fonts are used, by which selectors, and which characters each one
//! renders. The result is a [`DeclaredFamilyMap`]:
//!
//! ```text
//! Foo → { selector: [".headline"], path: /site/fonts/foo.ttf, chars: "Hi" }
//! ```
//!
//! See [`pipeline`] for the passes of a run.
//!
//! # Not Implemented
//!
//! - Cascade and specificity: a `font-family` list is attributed to its
//!   first declared entry wherever the rule applies
//! - `@import`
//! - Text inserted by scripts (callers supply it as reserved text)

/// `@font-face` declarations.
pub mod declare;
/// Errors that end a run.
pub mod error;
/// The family map.
pub mod family;
/// The resolution run.
pub mod pipeline;
/// Stylesheet discovery in documents.
pub mod sources;
/// Selector attribution.
pub mod usage;
/// Text collection.
pub mod walker;

pub use error::ResolveError;
pub use family::{DeclaredFamilyMap, FamilyEntry, normalize_chars};
pub use pipeline::{Resolution, Resolver};
