//! Stylesheets referenced by a document.

use std::path::{Path, PathBuf};

use fontspider_common::{is_regular_file, resolve_reference, strip_url_decorations};
use fontspider_dom::DomTree;

/// Where a document's CSS comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StylesheetSource {
    /// The text of a `<style>` element.
    Inline(String),
    /// An existing stylesheet file named by a `<link href>`.
    Linked(PathBuf),
}

/// Every `<style>` block and linked stylesheet of `tree`, in document order.
///
/// [HTML § 4.2.6 The style element](https://html.spec.whatwg.org/multipage/semantics.html#the-style-element)
///
/// The CSS of a `<style>` element is the text of its child text nodes. A
/// `<link>` counts when its `href`, without query and fragment, ends in
/// `.css` and resolves to an existing regular file; `rel` is not consulted.
/// Links to anything else are skipped silently.
#[must_use]
pub fn stylesheet_sources(tree: &DomTree, root: &Path, document: &Path) -> Vec<StylesheetSource> {
    let mut sources = Vec::new();

    for node in tree.elements() {
        let Some(element) = tree.as_element(node) else {
            continue;
        };
        match element.tag_name.as_str() {
            "style" => {
                let text: String = tree
                    .children(node)
                    .iter()
                    .filter_map(|&child| tree.as_text(child))
                    .collect();
                sources.push(StylesheetSource::Inline(text));
            }
            "link" => {
                let Some(href) = element.attr("href") else {
                    continue;
                };
                let reference = strip_url_decorations(href.trim());
                let is_css = Path::new(reference)
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("css"));
                if !is_css {
                    continue;
                }
                let path = resolve_reference(root, document, reference);
                if is_regular_file(&path) {
                    sources.push(StylesheetSource::Linked(path));
                }
            }
            _ => {}
        }
    }

    sources
}
