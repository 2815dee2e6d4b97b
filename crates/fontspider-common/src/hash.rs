//! Content Hasher.
//!
//! Fingerprints stylesheet text so that a `<style>` block repeated verbatim
//! across many pages is parsed once per run. The digest is a cache key, not a
//! security property.

use std::any::Any;

use sha2::{Digest, Sha256};
use thiserror::Error;

/// Number of hex digits returned when the caller does not ask for a length.
pub const DEFAULT_HASH_LENGTH: usize = 10;

/// Hex digits in a full SHA-256 digest. Longer requests are clamped to this.
const FULL_HASH_LENGTH: usize = 64;

/// Errors raised by the hasher.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HashError {
    /// The value was neither text nor binary content.
    #[error("expected text or binary content, got a value of another kind")]
    InvalidInputKind,
}

/// Something the hasher knows how to fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Content<'a> {
    /// UTF-8 text, hashed as its bytes.
    Text(&'a str),
    /// Raw bytes.
    Binary(&'a [u8]),
}

impl<'a> Content<'a> {
    /// Classify a dynamically typed value.
    ///
    /// Accepts `String`, `&'static str`, `Vec<u8>` and `&'static [u8]`.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::InvalidInputKind`] for any other type.
    pub fn from_any(value: &'a dyn Any) -> Result<Self, HashError> {
        if let Some(text) = value.downcast_ref::<String>() {
            return Ok(Self::Text(text));
        }
        if let Some(text) = value.downcast_ref::<&str>() {
            return Ok(Self::Text(text));
        }
        if let Some(bytes) = value.downcast_ref::<Vec<u8>>() {
            return Ok(Self::Binary(bytes));
        }
        if let Some(bytes) = value.downcast_ref::<&[u8]>() {
            return Ok(Self::Binary(bytes));
        }
        Err(HashError::InvalidInputKind)
    }

    /// The bytes that are fed to the digest.
    #[must_use]
    pub const fn as_bytes(&self) -> &'a [u8] {
        match *self {
            Self::Text(text) => text.as_bytes(),
            Self::Binary(bytes) => bytes,
        }
    }
}

impl<'a> From<&'a str> for Content<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<&'a [u8]> for Content<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::Binary(bytes)
    }
}

/// Lowercase hex digest of `content`, truncated to `length` digits.
///
/// `length` defaults to [`DEFAULT_HASH_LENGTH`] and is clamped to the full
/// 64-digit digest when a caller asks for more.
#[must_use]
pub fn content_hash(content: Content<'_>, length: Option<usize>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let mut digest = format!("{:x}", hasher.finalize());
    digest.truncate(length.unwrap_or(DEFAULT_HASH_LENGTH).min(FULL_HASH_LENGTH));
    digest
}

/// [`content_hash`] for a value whose kind is only known at runtime.
///
/// # Errors
///
/// Returns [`HashError::InvalidInputKind`] when `value` is not text or bytes.
pub fn hash_any(value: &dyn Any, length: Option<usize>) -> Result<String, HashError> {
    Content::from_any(value).map(|content| content_hash(content, length))
}
