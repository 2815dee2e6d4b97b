//! Font family declarations.
//!
//! [CSS Fonts § 4.1 The @font-face rule](https://www.w3.org/TR/css-fonts-4/#font-face-rule)
//!
//! "The @font-face rule allows for linking to fonts that are automatically
//! fetched and activated when needed."
//!
//! Only the two descriptors that bind a name to a file are read here:
//! `font-family` and `src`.

use std::path::{Path, PathBuf};

use fontspider_common::{is_regular_file, resolve_reference, strip_url_decorations};
use fontspider_css::Stylesheet;
use fontspider_css::values::{quoteless, url_references};

use crate::family::DeclaredFamilyMap;

/// Declare every family bound to an existing font file by `sheet`.
///
/// Within one `@font-face` block the last `font-family` and the last `src`
/// reference that names an existing regular file are paired. Relative
/// references are resolved against `stylesheet_path`, root-absolute ones
/// against `root`. A block missing either half declares nothing, and a name
/// that is already declared keeps its first binding.
pub fn extract_declarations(
    sheet: &Stylesheet,
    stylesheet_path: &Path,
    root: &Path,
    map: &mut DeclaredFamilyMap,
) {
    for block in sheet.font_faces() {
        let mut family: Option<String> = None;
        let mut source: Option<PathBuf> = None;

        for declaration in block {
            match declaration.name.as_str() {
                "font-family" => {
                    let name = quoteless(&declaration.value_text()).trim().to_string();
                    if !name.is_empty() {
                        family = Some(name);
                    }
                }
                "src" => {
                    for reference in url_references(&declaration.value_text()) {
                        let target = resolve_reference(
                            root,
                            stylesheet_path,
                            strip_url_decorations(&reference.value),
                        );
                        if is_regular_file(&target) {
                            source = Some(target);
                        }
                    }
                }
                _ => {}
            }
        }

        if let (Some(name), Some(path)) = (family, source) {
            let _ = map.declare(name, path);
        }
    }
}
