//! Errors of a compaction run.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use fontspider_resolve::ResolveError;
use thiserror::Error;

/// Why a font could not be subset.
#[derive(Debug, Error)]
pub enum SubsetError {
    /// The subsetting program could not be started.
    #[error("failed to run {program}")]
    Spawn {
        /// The program that was invoked.
        program: String,
        /// Why it did not start.
        #[source]
        source: io::Error,
    },

    /// The subsetting program ran and failed.
    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        /// The program that was invoked.
        program: String,
        /// Its exit status.
        status: ExitStatus,
        /// What it printed to stderr, trimmed.
        stderr: String,
    },

    /// Scratch files could not be written or read back.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Something that went wrong while discovering, resolving or rewriting.
#[derive(Debug, Error)]
pub enum CompactError {
    /// A `source` or `ignore` pattern is not a valid glob.
    #[error("invalid glob pattern '{pattern}'")]
    InvalidGlob {
        /// The pattern as given.
        pattern: String,
        /// What is wrong with it.
        #[source]
        source: globset::Error,
    },

    /// The site root could not be walked.
    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    /// Font usage resolution stopped early.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// A font or its backup could not be read or written.
    #[error("failed to access {}", path.display())]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// The subsetter rejected a font.
    #[error("failed to subset {}", path.display())]
    Subset {
        /// The font being subset.
        path: PathBuf,
        /// What the subsetter reported.
        #[source]
        source: SubsetError,
    },

    /// The worker compacting a font panicked.
    #[error("worker for {} panicked", path.display())]
    WorkerPanicked {
        /// The font the worker was rewriting.
        path: PathBuf,
    },
}
