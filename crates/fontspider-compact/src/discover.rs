//! Document discovery under a site root.

use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

use crate::error::CompactError;

/// Pattern used when no source pattern is given.
pub const DEFAULT_SOURCE: &str = "**/*.html";

/// Every file under `root` matching one of `sources` and none of `ignore`.
///
/// Patterns are matched against the path relative to `root`, with `/` as
/// separator: `*` stays within one directory, `**` crosses any number.
/// Hidden files and directories are included. An empty `sources` means
/// [`DEFAULT_SOURCE`]. The result is sorted so runs are deterministic.
///
/// # Errors
///
/// Returns [`CompactError::InvalidGlob`] for a bad pattern and
/// [`CompactError::Walk`] when part of the tree cannot be read.
pub fn discover(root: &Path, sources: &[String], ignore: &[String]) -> Result<Vec<PathBuf>, CompactError> {
    let default_source = [DEFAULT_SOURCE.to_string()];
    let sources = if sources.is_empty() {
        build_globset(&default_source)?
    } else {
        build_globset(sources)?
    };
    let ignore = build_globset(ignore)?;

    let mut documents = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        if sources.is_match(relative) && !ignore.is_match(relative) {
            documents.push(entry.into_path());
        }
    }

    documents.sort();
    Ok(documents)
}

fn build_globset(patterns: &[String]) -> Result<GlobSet, CompactError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|source| CompactError::InvalidGlob {
                pattern: pattern.clone(),
                source,
            })?;
        let _ = builder.add(glob);
    }
    builder.build().map_err(|source| CompactError::InvalidGlob {
        pattern: patterns.join(", "),
        source,
    })
}
