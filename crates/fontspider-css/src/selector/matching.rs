//! [§ 4.1 Selector Matching](https://www.w3.org/TR/selectors-4/#match-a-selector-against-an-element)

use fontspider_dom::{DomTree, ElementData, NodeId, NodeType};

use super::parse::parse_selector_list;
use super::{
    AttributeMatcher, AttributeSelector, Combinator, CompoundSelector, ParsedSelector, PseudoClass,
    SimpleSelector,
};

/// Every element of `tree` matched by any selector of the comma-separated
/// `selector_list`, in document order and without duplicates.
///
/// A list that fails to parse selects nothing.
#[must_use]
pub fn select_all(tree: &DomTree, selector_list: &str) -> Vec<NodeId> {
    let Some(selectors) = parse_selector_list(selector_list) else {
        return Vec::new();
    };
    tree.elements()
        .filter(|&id| selectors.iter().any(|selector| selector.matches_in_tree(tree, id)))
        .collect()
}

impl ParsedSelector {
    /// [§ 4.1 Selector Matching](https://www.w3.org/TR/selectors-4/#match-a-selector-against-an-element)
    /// "A selector is said to match an element when..."
    ///
    /// Match against an element with full DOM tree context. Permissive
    /// pseudo-classes and pseudo-elements match.
    #[must_use]
    pub fn matches_in_tree(&self, tree: &DomTree, node_id: NodeId) -> bool {
        self.matches_with(tree, node_id, true)
    }

    /// `permissive` is the outcome of state-dependent simple selectors. It
    /// flips under `:not()`, so that `a:not(:hover)` still matches `a`.
    fn matches_with(&self, tree: &DomTree, node_id: NodeId, permissive: bool) -> bool {
        compound_matches(&self.complex.subject, tree, node_id, permissive)
            && chain_matches(&self.complex.combinators, tree, node_id, permissive)
    }
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
///
/// The chain is stored right-to-left. Descendant and subsequent-sibling
/// combinators try every candidate, so `a b > c` finds the `b` whose own
/// ancestors include an `a` even when a nearer `b` does not.
fn chain_matches(
    chain: &[(Combinator, CompoundSelector)],
    tree: &DomTree,
    node_id: NodeId,
    permissive: bool,
) -> bool {
    let Some(((combinator, compound), rest)) = chain.split_first() else {
        return true;
    };
    let candidate_matches =
        |id: NodeId| compound_matches(compound, tree, id, permissive) && chain_matches(rest, tree, id, permissive);

    match combinator {
        // "A selector of the form 'A B' represents an element B that is an
        // arbitrary descendant of some ancestor element A."
        Combinator::Descendant => tree.ancestors(node_id).any(candidate_matches),

        // "A selector of the form 'A > B' represents an element B that is a
        // direct child of element A."
        Combinator::Child => tree.parent(node_id).is_some_and(candidate_matches),

        // Only element siblings count.
        Combinator::NextSibling => previous_element_sibling(tree, node_id).is_some_and(candidate_matches),

        Combinator::SubsequentSibling => tree
            .preceding_siblings(node_id)
            .filter(|&sibling| tree.as_element(sibling).is_some())
            .any(candidate_matches),
    }
}

/// "A compound selector ... represents a set of simultaneous conditions on
/// a single element."
fn compound_matches(compound: &CompoundSelector, tree: &DomTree, node_id: NodeId, permissive: bool) -> bool {
    let Some(element) = tree.as_element(node_id) else {
        return false;
    };
    compound
        .simple_selectors
        .iter()
        .all(|simple| simple_matches(simple, tree, node_id, element, permissive))
}

fn simple_matches(
    simple: &SimpleSelector,
    tree: &DomTree,
    node_id: NodeId,
    element: &ElementData,
    permissive: bool,
) -> bool {
    match simple {
        // [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
        SimpleSelector::Type(name) => element.tag_name.eq_ignore_ascii_case(name),

        // [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
        SimpleSelector::Class(class_name) => element.has_class(class_name),

        // [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
        SimpleSelector::Id(id) => element.id() == Some(id.as_str()),

        SimpleSelector::Universal => true,

        SimpleSelector::Attribute(attribute) => attribute_matches(attribute, element),

        SimpleSelector::PseudoClass(pseudo_class) => pseudo_class_matches(*pseudo_class, tree, node_id, element),

        // "It represents an element that is not represented by its argument."
        SimpleSelector::Not(list) => !list
            .iter()
            .any(|selector| selector.matches_with(tree, node_id, !permissive)),

        SimpleSelector::Is(list) => list
            .iter()
            .any(|selector| selector.matches_with(tree, node_id, permissive)),

        SimpleSelector::Permissive(_) => permissive,
    }
}

/// [§ 6.1 Attribute presence and value selectors](https://www.w3.org/TR/selectors-4/#attribute-representation)
fn attribute_matches(selector: &AttributeSelector, element: &ElementData) -> bool {
    let Some(actual) = element.attr(&selector.name) else {
        return false;
    };
    let (actual, expected) = match &selector.matcher {
        AttributeMatcher::Exists => return true,
        AttributeMatcher::Equals(value)
        | AttributeMatcher::Includes(value)
        | AttributeMatcher::DashMatch(value)
        | AttributeMatcher::Prefix(value)
        | AttributeMatcher::Suffix(value)
        | AttributeMatcher::Substring(value) => {
            if selector.case_insensitive {
                (actual.to_ascii_lowercase(), value.to_ascii_lowercase())
            } else {
                (actual.to_string(), value.clone())
            }
        }
    };

    match &selector.matcher {
        AttributeMatcher::Exists => true,
        AttributeMatcher::Equals(_) => actual == expected,
        // "If "val" contains whitespace, it will never represent anything (since
        // the words are separated by spaces). Also if "val" is the empty string,
        // it will never represent anything."
        AttributeMatcher::Includes(_) => {
            !expected.is_empty()
                && !expected.contains(|c: char| c.is_ascii_whitespace())
                && actual.split_ascii_whitespace().any(|word| word == expected)
        }
        AttributeMatcher::DashMatch(_) => {
            actual == expected
                || actual
                    .strip_prefix(expected.as_str())
                    .is_some_and(|rest| rest.starts_with('-'))
        }
        // "If "val" is the empty string then the selector does not represent
        // anything."
        AttributeMatcher::Prefix(_) => !expected.is_empty() && actual.starts_with(expected.as_str()),
        AttributeMatcher::Suffix(_) => !expected.is_empty() && actual.ends_with(expected.as_str()),
        AttributeMatcher::Substring(_) => !expected.is_empty() && actual.contains(expected.as_str()),
    }
}

/// [§ 14 Tree-Structural pseudo-classes](https://www.w3.org/TR/selectors-4/#structural-pseudos)
fn pseudo_class_matches(pseudo_class: PseudoClass, tree: &DomTree, node_id: NodeId, element: &ElementData) -> bool {
    match pseudo_class {
        // "In HTML, this is the <html> element."
        PseudoClass::Root => tree.document_element() == Some(node_id),

        PseudoClass::FirstChild => element_position(tree, node_id, false, false) == Some(1),
        PseudoClass::LastChild => element_position(tree, node_id, true, false) == Some(1),
        PseudoClass::FirstOfType => element_position(tree, node_id, false, true) == Some(1),
        PseudoClass::LastOfType => element_position(tree, node_id, true, true) == Some(1),
        PseudoClass::OnlyChild => {
            element_position(tree, node_id, false, false) == Some(1)
                && element_position(tree, node_id, true, false) == Some(1)
        }

        PseudoClass::NthChild(nth) => element_position(tree, node_id, false, false).is_some_and(|i| nth.matches(i)),
        PseudoClass::NthLastChild(nth) => element_position(tree, node_id, true, false).is_some_and(|i| nth.matches(i)),
        PseudoClass::NthOfType(nth) => element_position(tree, node_id, false, true).is_some_and(|i| nth.matches(i)),
        PseudoClass::NthLastOfType(nth) => {
            element_position(tree, node_id, true, true).is_some_and(|i| nth.matches(i))
        }

        // "The :empty pseudo-class represents an element that has no children
        // except, optionally, document white space characters."
        PseudoClass::Empty => tree
            .children(node_id)
            .iter()
            .all(|&child| match tree.get(child).map(|node| &node.node_type) {
                Some(NodeType::Text(text)) => text.chars().all(|c| c.is_ascii_whitespace()),
                Some(NodeType::Comment(_)) => true,
                _ => false,
            }),

        PseudoClass::Link => {
            matches!(element.tag_name.as_str(), "a" | "area") && element.attr("href").is_some()
        }

        PseudoClass::Disabled => element.attr("disabled").is_some(),
        PseudoClass::Enabled => element.attr("disabled").is_none(),
    }
}

/// 1-based position of `node_id` among its element siblings, counted from
/// the end when `from_end` is set, and among siblings with the same tag name
/// when `same_type` is set. `None` for the root and detached nodes.
fn element_position(tree: &DomTree, node_id: NodeId, from_end: bool, same_type: bool) -> Option<usize> {
    let tag_name = &tree.as_element(node_id)?.tag_name;
    let _ = tree.parent(node_id)?;
    let counts = |sibling: &NodeId| {
        tree.as_element(*sibling)
            .is_some_and(|e| !same_type || e.tag_name.eq_ignore_ascii_case(tag_name))
    };
    let before = if from_end {
        tree.following_siblings(node_id).filter(counts).count()
    } else {
        tree.preceding_siblings(node_id).filter(counts).count()
    };
    Some(before + 1)
}

/// [§ 16.3 Next-sibling combinator](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators)
///
/// The closest preceding sibling that is an element.
fn previous_element_sibling(tree: &DomTree, node_id: NodeId) -> Option<NodeId> {
    tree.preceding_siblings(node_id)
        .find(|&sibling| tree.as_element(sibling).is_some())
}
