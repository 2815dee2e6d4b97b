//! Errors that end a resolution run.
//!
//! A reference that does not name an existing file is not an error: the
//! stylesheet or font it points at is skipped. Everything below stops the
//! run and is handed back next to the partial map.

use std::io;
use std::path::{Path, PathBuf};

use fontspider_common::HashError;
use fontspider_css::CssParseError;
use thiserror::Error;

/// Why a resolution run stopped early.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Content handed to the hasher was neither text nor bytes.
    #[error(transparent)]
    InvalidInputKind(#[from] HashError),

    /// A stylesheet, a `<style>` block or a `style` attribute did not parse.
    #[error("failed to parse stylesheet {}", path.display())]
    ParseFailure {
        /// The stylesheet file, or the document holding the inline CSS.
        path: PathBuf,
        /// The syntax error.
        #[source]
        source: CssParseError,
    },

    /// A document or stylesheet could not be read.
    #[error("failed to read {}", path.display())]
    Io {
        /// The file being read.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// A document is not UTF-8 text.
    #[error("{} is not valid UTF-8", path.display())]
    InvalidDocument {
        /// The offending document.
        path: PathBuf,
    },
}

impl ResolveError {
    /// The file the error is about, when there is one.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::InvalidInputKind(_) => None,
            Self::ParseFailure { path, .. } | Self::Io { path, .. } | Self::InvalidDocument { path } => {
                Some(path)
            }
        }
    }
}
