//! The glyph subsetting seam.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::SubsetError;

/// Reduces a font to the glyphs needed for a piece of text.
///
/// Implementations are shared between worker threads, one font each.
pub trait Subsetter: Send + Sync {
    /// The bytes of `source` reduced to the glyphs of `text`, in the same
    /// format as `source`.
    ///
    /// # Errors
    ///
    /// Returns whatever stopped the font from being subset.
    fn subset(&self, source: &Path, text: &str) -> Result<Vec<u8>, SubsetError>;
}

/// Subsets with the `pyftsubset` program of fontTools.
///
/// Hinting is dropped, and `.woff` and `.woff2` fonts are written back in
/// their own flavor.
#[derive(Debug, Clone)]
pub struct PyftsubsetCommand {
    program: PathBuf,
}

impl Default for PyftsubsetCommand {
    fn default() -> Self {
        Self::new("pyftsubset")
    }
}

impl PyftsubsetCommand {
    /// Run `program` instead of the `pyftsubset` found on `PATH`.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn arguments(source: &Path, text_file: &Path, output_file: &Path) -> Vec<OsString> {
        let mut text_arg = OsString::from("--text-file=");
        text_arg.push(text_file);
        let mut output_arg = OsString::from("--output-file=");
        output_arg.push(output_file);

        let mut args = vec![source.as_os_str().to_os_string(), text_arg, output_arg, "--no-hinting".into()];
        if let Some(flavor) = flavor(source) {
            args.push(format!("--flavor={flavor}").into());
        }
        args
    }
}

/// WOFF flavor of a font, from its extension.
fn flavor(source: &Path) -> Option<&'static str> {
    let ext = source.extension()?;
    if ext.eq_ignore_ascii_case("woff2") {
        Some("woff2")
    } else if ext.eq_ignore_ascii_case("woff") {
        Some("woff")
    } else {
        None
    }
}

impl Subsetter for PyftsubsetCommand {
    fn subset(&self, source: &Path, text: &str) -> Result<Vec<u8>, SubsetError> {
        let scratch = tempfile::tempdir()?;
        let text_file = scratch.path().join("text.txt");
        let output_file = scratch.path().join("subset");
        fs::write(&text_file, text)?;

        let program = self.program.display().to_string();
        let output = Command::new(&self.program)
            .args(Self::arguments(source, &text_file, &output_file))
            .stdin(Stdio::null())
            .output()
            .map_err(|source| SubsetError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(SubsetError::Failed {
                program,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(fs::read(&output_file)?)
    }
}
