//! Pristine copies of fonts before they are rewritten.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Where the backup of `font` lives: `<dir>/<stem>.backup.<ext>`.
///
/// ```
/// use std::path::Path;
/// use fontspider_compact::backup::backup_path;
///
/// assert_eq!(
///     backup_path(Path::new("/site/font/Smiley.ttf")),
///     Path::new("/site/font/Smiley.backup.ttf"),
/// );
/// ```
#[must_use]
pub fn backup_path(font: &Path) -> PathBuf {
    let stem = font.file_stem().unwrap_or_default().to_string_lossy();
    let name = match font.extension() {
        Some(ext) => format!("{stem}.backup.{}", ext.to_string_lossy()),
        None => format!("{stem}.backup"),
    };
    font.with_file_name(name)
}

/// Copy `font` to its [`backup_path`] and return that path.
///
/// An existing backup is kept as it is. After a first run the font itself
/// is already a subset, so later runs must start again from the backup.
///
/// # Errors
///
/// Returns the error of the copy.
pub fn backup(font: &Path) -> io::Result<PathBuf> {
    let path = backup_path(font);
    if !path.is_file() {
        let _ = fs::copy(font, &path)?;
    }
    Ok(path)
}
