//! Path Resolver.
//!
//! References found in documents (`<link href>`, `src: url(...)`) are
//! resolved against the site on disk, not against a URL. An absolute
//! reference such as `/css/site.css` is rooted at the project root; anything
//! else is relative to the directory of the file that contains it.

use std::path::{Component, Path, PathBuf};

/// Resolve `reference`, found inside `document`, to an absolute path.
///
/// # Algorithm
///
/// STEP 1: If the reference is absolute, join it onto the project root.
///
/// STEP 2: Otherwise, join it onto the directory containing the document.
///
/// STEP 3: Normalise the result lexically: `.` segments are dropped and `..`
/// removes the preceding segment. The filesystem is never consulted, so the
/// returned path may not exist.
///
/// Callers strip `?query` and `#fragment` suffixes first, see
/// [`strip_url_decorations`].
#[must_use]
pub fn resolve_reference(root: &Path, document: &Path, reference: &str) -> PathBuf {
    let reference_path = Path::new(reference);
    let joined = if reference.starts_with('/') || reference_path.has_root() {
        // STEP 1: Path::join would discard the root for an absolute
        // reference, so the root component is skipped explicitly.
        let relative: PathBuf = reference_path
            .components()
            .filter(|component| !matches!(component, Component::RootDir | Component::Prefix(_)))
            .collect();
        root.join(relative)
    } else {
        // STEP 2
        document
            .parent()
            .map_or_else(|| PathBuf::from(reference), |dir| dir.join(reference_path))
    };

    // STEP 3
    normalize(&joined)
}

/// Lexically normalise `path` without touching the filesystem.
///
/// `..` never climbs above the root of an absolute path.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    let _ = out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                Some(Component::CurDir | Component::ParentDir) | None => out.push(".."),
            },
            Component::Prefix(_) | Component::RootDir | Component::Normal(_) => {
                out.push(component.as_os_str());
            }
        }
    }
    out
}

/// Strip a `#fragment` and then a `?query` suffix from a reference.
///
/// `fonts/icons.woff2?v=3#iefix` becomes `fonts/icons.woff2`.
#[must_use]
pub fn strip_url_decorations(reference: &str) -> &str {
    let without_fragment = reference.split_once('#').map_or(reference, |(b, _)| b);
    without_fragment
        .split_once('?')
        .map_or(without_fragment, |(b, _)| b)
}

/// Whether `path` names an existing regular file.
///
/// Metadata errors (missing file, permission denied) count as "no".
#[must_use]
pub fn is_regular_file(path: &Path) -> bool {
    path.metadata().is_ok_and(|metadata| metadata.is_file())
}
