//! The resolution run.
//!
//! A run makes three passes over its documents:
//!
//! 1. **Declare.** Every document is parsed once. Each distinct stylesheet
//!    (`<style>` blocks by content hash, linked files by path) is parsed
//!    once and its `@font-face` rules are declared.
//! 2. **Usage.** After the `filter` hook, every stylesheet attributes its
//!    selectors to the declared families.
//! 3. **Walk.** Every document is walked with the complete selector sets,
//!    so a selector from a later page still finds text on an earlier one.
//!    `style` attributes are handled here.
//!
//! Characters are then normalized and the `after_filter` hook runs.
//!
//! The first error stops the run. It is reported through
//! [`diagnostics::report`] and returned with the partial map.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use fontspider_common::{diagnostics, hash_any};
use fontspider_css::{Stylesheet, parse_stylesheet};
use fontspider_dom::DomTree;
use fontspider_html::parse_document;

use crate::declare::extract_declarations;
use crate::error::ResolveError;
use crate::family::DeclaredFamilyMap;
use crate::sources::{StylesheetSource, stylesheet_sources};
use crate::usage::resolve_usage;
use crate::walker::{collect_inline_style_text, collect_text};

type Hook<'a> = Box<dyn FnMut(&mut DeclaredFamilyMap) + 'a>;

/// The outcome of a run: the map, and the error that stopped it early.
#[derive(Debug, Default)]
pub struct Resolution {
    /// Declared families with their selectors and characters.
    pub map: DeclaredFamilyMap,
    /// Errors recorded during the run. Empty when every document was
    /// processed.
    pub errors: Vec<ResolveError>,
}

impl Resolution {
    /// Whether the run processed every document.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Resolves the font usage of a set of documents under one site root.
///
/// ```no_run
/// use fontspider_resolve::Resolver;
///
/// let resolution = Resolver::new("site")
///     .filter(|map| {
///         let _ = map.remove("Icons");
///     })
///     .resolve(&["site/index.html"]);
///
/// for (name, entry) in resolution.map.iter() {
///     println!("{name}: {}", entry.chars);
/// }
/// ```
pub struct Resolver<'a> {
    root: PathBuf,
    filter: Option<Hook<'a>>,
    after_filter: Option<Hook<'a>>,
}

impl<'a> Resolver<'a> {
    /// A resolver for documents under `root`.
    ///
    /// Root-absolute references such as `/css/site.css` resolve under
    /// `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            filter: None,
            after_filter: None,
        }
    }

    /// Call `hook` once every family is declared, before any text is
    /// collected. Families removed here never receive text.
    #[must_use]
    pub fn filter(mut self, hook: impl FnMut(&mut DeclaredFamilyMap) + 'a) -> Self {
        self.filter = Some(Box::new(hook));
        self
    }

    /// Call `hook` with the finished map, also after an error.
    #[must_use]
    pub fn after_filter(mut self, hook: impl FnMut(&mut DeclaredFamilyMap) + 'a) -> Self {
        self.after_filter = Some(Box::new(hook));
        self
    }

    /// The site root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `documents`, in order.
    ///
    /// Never fails as a whole: an error ends the run early and is returned in
    /// [`Resolution::errors`] beside the map built so far.
    pub fn resolve<P: AsRef<Path>>(&mut self, documents: &[P]) -> Resolution {
        let mut map = DeclaredFamilyMap::new();
        let mut errors = Vec::new();

        if let Err(error) = self.run(documents, &mut map) {
            let label = error
                .path()
                .map_or_else(|| "resolve".to_string(), |path| path.display().to_string());
            diagnostics::report(&label, &error);
            errors.push(error);
        }

        map.normalize();
        if let Some(hook) = self.after_filter.as_mut() {
            hook(&mut map);
        }

        Resolution { map, errors }
    }

    fn run<P: AsRef<Path>>(
        &mut self,
        documents: &[P],
        map: &mut DeclaredFamilyMap,
    ) -> Result<(), ResolveError> {
        let mut trees = Vec::with_capacity(documents.len());
        let mut sheets = Vec::new();
        let mut seen = HashSet::new();

        for document in documents {
            let document = document.as_ref();
            let tree = load_document(document)?;

            for source in stylesheet_sources(&tree, &self.root, document) {
                let Some((sheet, sheet_path)) = load_stylesheet(source, document, &mut seen)? else {
                    continue;
                };
                extract_declarations(&sheet, &sheet_path, &self.root, map);
                sheets.push(sheet);
            }

            trees.push((document.to_path_buf(), tree));
        }

        if let Some(hook) = self.filter.as_mut() {
            hook(map);
        }

        for sheet in &sheets {
            resolve_usage(sheet, map);
        }

        for (path, tree) in &trees {
            collect_text(tree, map);
            collect_inline_style_text(tree, map).map_err(|source| ResolveError::ParseFailure {
                path: path.clone(),
                source,
            })?;
        }

        Ok(())
    }
}

/// Identity of a stylesheet within one run.
#[derive(Debug, PartialEq, Eq, Hash)]
enum SourceKey {
    Inline(String),
    Linked(PathBuf),
}

fn load_document(path: &Path) -> Result<DomTree, ResolveError> {
    let bytes = fs::read(path).map_err(|source| ResolveError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let html = String::from_utf8(bytes).map_err(|_| ResolveError::InvalidDocument {
        path: path.to_path_buf(),
    })?;
    Ok(parse_document(&html))
}

/// Parse `source` unless it was already seen this run.
///
/// Returns the stylesheet with the path its relative references resolve
/// against: the file itself, or `document` for a `<style>` block.
fn load_stylesheet(
    source: StylesheetSource,
    document: &Path,
    seen: &mut HashSet<SourceKey>,
) -> Result<Option<(Stylesheet, PathBuf)>, ResolveError> {
    let (key, text, path) = match source {
        StylesheetSource::Inline(text) => {
            let key = SourceKey::Inline(hash_any(&text, None)?);
            (key, text, document.to_path_buf())
        }
        StylesheetSource::Linked(path) => {
            let key = SourceKey::Linked(path.clone());
            if seen.contains(&key) {
                return Ok(None);
            }
            let text = fs::read_to_string(&path).map_err(|source| ResolveError::Io {
                path: path.clone(),
                source,
            })?;
            (key, text, path)
        }
    };

    if !seen.insert(key) {
        return Ok(None);
    }
    let sheet = parse_stylesheet(&text).map_err(|source| ResolveError::ParseFailure {
        path: path.clone(),
        source,
    })?;
    Ok(Some((sheet, path)))
}
