//! Common utilities for fontspider.
//!
//! This crate provides the leaf infrastructure used by every other crate:
//! - **Diagnostics** - deduplicated warnings and the error report channel
//! - **Content Hasher** - short, stable fingerprints used as cache keys
//! - **Path Resolver** - turns references found in documents into absolute paths

pub mod diagnostics;
pub mod hash;
pub mod path;

pub use hash::{Content, DEFAULT_HASH_LENGTH, HashError, content_hash, hash_any};
pub use path::{is_regular_file, resolve_reference, strip_url_decorations};
