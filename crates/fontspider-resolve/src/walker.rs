//! Text collection: the characters each family actually renders.

use fontspider_css::{CssParseError, parse_declaration_list, select_all};
use fontspider_dom::DomTree;

use crate::family::DeclaredFamilyMap;
use crate::usage::attributed_family;

/// Append the rendered text of every element matched by a family's
/// selectors to that family.
///
/// A selector that does not parse selects nothing and stays recorded.
pub fn collect_text(tree: &DomTree, map: &mut DeclaredFamilyMap) {
    for (_, entry) in map.iter_mut() {
        let mut text = String::new();
        for selector in &entry.selectors {
            for node in select_all(tree, selector) {
                text.push_str(&tree.rendered_text(node));
            }
        }
        entry.push_chars(&text);
    }
}

/// Attribute elements styled through their own `style` attribute.
///
/// [HTML § 3.2.6 The style attribute](https://html.spec.whatwg.org/multipage/dom.html#the-style-attribute)
///
/// An element whose `font-family` or `font` names a declared family
/// contributes its own rendered text to it. No selector is recorded: the
/// attribution belongs to that element alone.
///
/// # Errors
///
/// Returns the syntax error of the first `style` attribute that does not
/// parse.
pub fn collect_inline_style_text(
    tree: &DomTree,
    map: &mut DeclaredFamilyMap,
) -> Result<(), CssParseError> {
    for node in tree.elements() {
        let Some(style) = tree.as_element(node).and_then(|e| e.attr("style")) else {
            continue;
        };
        for declaration in parse_declaration_list(style)? {
            let Some(family) = attributed_family(map, &declaration) else {
                continue;
            };
            if let Some(entry) = map.get_mut(&family) {
                entry.push_chars(&tree.rendered_text(node));
            }
        }
    }
    Ok(())
}
