//! The whole job: find pages, resolve font usage, rewrite fonts.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;

use fontspider_common::diagnostics;
use fontspider_resolve::{DeclaredFamilyMap, Resolution, Resolver, normalize_chars};
use serde::Deserialize;
use tempfile::NamedTempFile;

use crate::backup::backup;
use crate::discover::discover;
use crate::error::CompactError;
use crate::reserve::ReserveText;
use crate::subset::Subsetter;

/// What to compact, and how.
///
/// Deserializes from a JSON config file. The keys `basePath`, `source` and
/// `reserveText` are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpiderOptions {
    /// The site root.
    #[serde(alias = "basePath")]
    pub root: PathBuf,
    /// Document patterns, relative to the root. Empty means every
    /// `.html` file.
    #[serde(default, alias = "source")]
    pub sources: Vec<String>,
    /// Patterns of documents to leave out.
    #[serde(default)]
    pub ignore: Vec<String>,
    /// Keep a `.backup` copy of every font and always subset from it.
    #[serde(default = "default_backup")]
    pub backup: bool,
    /// Characters to keep regardless of the pages.
    #[serde(default, alias = "reserveText")]
    pub reserve_text: ReserveText,
}

const fn default_backup() -> bool {
    true
}

impl SpiderOptions {
    /// Options for the site at `root`, with backups on.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            sources: Vec::new(),
            ignore: Vec::new(),
            backup: default_backup(),
            reserve_text: ReserveText::None,
        }
    }
}

/// The outcome of [`spider`].
#[derive(Debug, Default)]
pub struct SpiderReport {
    /// The resolved families, reserved text included.
    pub map: DeclaredFamilyMap,
    /// Fonts that were rewritten.
    pub written: Vec<PathBuf>,
    /// Families left untouched because no characters were found for them.
    pub skipped: Vec<String>,
    /// Everything that went wrong.
    pub errors: Vec<CompactError>,
}

impl SpiderReport {
    /// Whether every step succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Discover the documents of `options` and resolve their font usage, with
/// the reserved text merged in. Nothing is written.
///
/// # Errors
///
/// Returns the discovery error. Resolution errors are part of the returned
/// [`Resolution`].
pub fn plan(options: &SpiderOptions) -> Result<Resolution, CompactError> {
    let documents = discover(&options.root, &options.sources, &options.ignore)?;
    let mut resolution = Resolver::new(&options.root).resolve(&documents);
    options.reserve_text.apply(&mut resolution.map);
    Ok(resolution)
}

/// A font file and everything to keep in it.
struct Job {
    path: PathBuf,
    chars: String,
}

/// Resolve the site and subset every used font in place.
///
/// Each font file is rewritten by its own worker thread. Families bound to
/// the same file are merged into one job so no file has two writers. A
/// font is replaced through a temporary file in the same directory and a
/// rename, so readers never see half a font.
///
/// If resolution stopped early, no font is touched: a partial map would
/// drop glyphs used by the pages that were not read.
pub fn spider(options: &SpiderOptions, subsetter: &dyn Subsetter) -> SpiderReport {
    let mut report = SpiderReport::default();

    let resolution = match plan(options) {
        Ok(resolution) => resolution,
        Err(error) => {
            diagnostics::report(&options.root.display().to_string(), &error);
            report.errors.push(error);
            return report;
        }
    };
    report.map = resolution.map;
    if !resolution.errors.is_empty() {
        report
            .errors
            .extend(resolution.errors.into_iter().map(CompactError::from));
        report.skipped = report.map.names().map(str::to_string).collect();
        return report;
    }

    let mut jobs: Vec<Job> = Vec::new();
    for (name, entry) in report.map.iter() {
        if entry.chars.is_empty() {
            let message = format!("no text uses '{name}', leaving {} as it is", entry.path.display());
            diagnostics::warn_once("compact", &message);
            report.skipped.push(name.to_string());
            continue;
        }
        match jobs.iter_mut().find(|job| job.path == entry.path) {
            Some(job) => {
                job.chars.push_str(&entry.chars);
                job.chars = normalize_chars(&job.chars);
            }
            None => jobs.push(Job {
                path: entry.path.clone(),
                chars: entry.chars.clone(),
            }),
        }
    }

    let outcomes: Vec<(PathBuf, Result<(), CompactError>)> = thread::scope(|scope| {
        let workers: Vec<_> = jobs
            .iter()
            .map(|job| scope.spawn(move || compact_font(job, options.backup, subsetter)))
            .collect();
        jobs.iter()
            .zip(workers)
            .map(|(job, worker)| {
                let outcome = worker.join().unwrap_or_else(|_| {
                    Err(CompactError::WorkerPanicked {
                        path: job.path.clone(),
                    })
                });
                (job.path.clone(), outcome)
            })
            .collect()
    });

    for (path, outcome) in outcomes {
        match outcome {
            Ok(()) => report.written.push(path),
            Err(error) => {
                diagnostics::report(&path.display().to_string(), &error);
                report.errors.push(error);
            }
        }
    }

    report
}

fn compact_font(job: &Job, backup_first: bool, subsetter: &dyn Subsetter) -> Result<(), CompactError> {
    let source = if backup_first {
        backup(&job.path).map_err(|source| CompactError::Io {
            path: job.path.clone(),
            source,
        })?
    } else {
        job.path.clone()
    };

    let bytes = subsetter
        .subset(&source, &job.chars)
        .map_err(|source| CompactError::Subset {
            path: job.path.clone(),
            source,
        })?;

    replace_file(&job.path, &bytes).map_err(|source| CompactError::Io {
        path: job.path.clone(),
        source,
    })
}

/// Write `bytes` next to `path`, then rename over it.
fn replace_file(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    if let Ok(metadata) = fs::metadata(path) {
        temp.as_file().set_permissions(metadata.permissions())?;
    }
    let _ = temp.persist(path).map_err(|error| error.error)?;
    Ok(())
}
