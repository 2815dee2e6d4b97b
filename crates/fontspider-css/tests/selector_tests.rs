//! Integration tests for CSS selector parsing and matching.

use fontspider_css::selector::{
    AttributeMatcher, Combinator, PseudoClass, SimpleSelector, parse_selector, parse_selector_list, select_all,
};
use fontspider_dom::DomTree;
use fontspider_html::parse_document;

const LIST_PAGE: &str = r#"<div id="main" class="box"><p class="a">One</p><p>Two</p><span lang="en-US">Three</span></div><ul><li>1</li><li>2</li><li>3</li></ul>"#;

/// Text of every element `selector` selects, in order.
fn texts(tree: &DomTree, selector: &str) -> Vec<String> {
    select_all(tree, selector)
        .into_iter()
        .map(|id| tree.text_content(id))
        .collect()
}

#[test]
fn test_parse_compound_selector() {
    let selector = parse_selector("DIV.a#b").unwrap();
    assert!(selector.is_simple());
    assert_eq!(
        selector.complex.subject.simple_selectors,
        vec![
            SimpleSelector::Type("div".to_string()),
            SimpleSelector::Class("a".to_string()),
            SimpleSelector::Id("b".to_string()),
        ]
    );
}

#[test]
fn test_parse_combinator_chain_right_to_left() {
    let selector = parse_selector("div > p + span ~ em b").unwrap();
    assert_eq!(
        selector.complex.subject.simple_selectors,
        vec![SimpleSelector::Type("b".to_string())]
    );
    let chain: Vec<(Combinator, String)> = selector
        .complex
        .combinators
        .iter()
        .map(|(combinator, compound)| {
            let SimpleSelector::Type(name) = &compound.simple_selectors[0] else {
                panic!("Expected type selector");
            };
            (*combinator, name.clone())
        })
        .collect();
    assert_eq!(
        chain,
        vec![
            (Combinator::Descendant, "em".to_string()),
            (Combinator::SubsequentSibling, "span".to_string()),
            (Combinator::NextSibling, "p".to_string()),
            (Combinator::Child, "div".to_string()),
        ]
    );
}

#[test]
fn test_parse_escaped_identifier() {
    let selector = parse_selector(r".\31 0").unwrap();
    assert_eq!(
        selector.complex.subject.simple_selectors,
        vec![SimpleSelector::Class("10".to_string())]
    );
}

#[test]
fn test_parse_attribute_selectors() {
    let selector = parse_selector(r#"[lang|=en][data-x="A" i]"#).unwrap();
    let simple = &selector.complex.subject.simple_selectors;
    let SimpleSelector::Attribute(lang) = &simple[0] else {
        panic!("Expected attribute selector");
    };
    assert_eq!(lang.name, "lang");
    assert_eq!(lang.matcher, AttributeMatcher::DashMatch("en".to_string()));
    assert!(!lang.case_insensitive);

    let SimpleSelector::Attribute(data) = &simple[1] else {
        panic!("Expected attribute selector");
    };
    assert_eq!(data.matcher, AttributeMatcher::Equals("A".to_string()));
    assert!(data.case_insensitive);
}

#[test]
fn test_parse_pseudo_classes() {
    let selector = parse_selector("li:first-child:nth-child(2n+1)::first-line:hover").unwrap();
    assert_eq!(
        selector.complex.subject.simple_selectors[1..],
        [
            SimpleSelector::PseudoClass(PseudoClass::FirstChild),
            SimpleSelector::PseudoClass(PseudoClass::NthChild(fontspider_css::selector::Nth { a: 2, b: 1 })),
            SimpleSelector::Permissive("first-line".to_string()),
            SimpleSelector::Permissive("hover".to_string()),
        ]
    );
}

#[test]
fn test_unsupported_selectors_do_not_parse() {
    for raw in ["", "a >", "a, b", "ns|a", "& .a", ".1a", "a:not(", "[x=]", "p:nth-child(foo)"] {
        assert!(parse_selector(raw).is_none(), "{raw:?} should not parse");
    }
    assert_eq!(parse_selector_list("a, b").map(|list| list.len()), Some(2));
    assert!(parse_selector_list("a, ns|b").is_none());
}

#[test]
fn test_type_class_id_and_combinators() {
    let tree = parse_document(LIST_PAGE);
    assert_eq!(texts(&tree, "p"), vec!["One", "Two"]);
    assert_eq!(texts(&tree, "body p"), vec!["One", "Two"]);
    assert_eq!(texts(&tree, "#main > p:first-child"), vec!["One"]);
    assert_eq!(texts(&tree, ".box .a"), vec!["One"]);
    assert_eq!(texts(&tree, "p + span"), vec!["Three"]);
    assert_eq!(texts(&tree, "p.a ~ span"), vec!["Three"]);
    assert!(texts(&tree, "span + p").is_empty());
}

#[test]
fn test_structural_pseudo_classes() {
    let tree = parse_document(LIST_PAGE);
    assert_eq!(texts(&tree, "li:nth-child(odd)"), vec!["1", "3"]);
    assert_eq!(texts(&tree, "li:nth-child(-n+2)"), vec!["1", "2"]);
    assert_eq!(texts(&tree, "li:last-child"), vec!["3"]);
    assert_eq!(texts(&tree, "li:nth-last-child(1)"), vec!["3"]);
    assert_eq!(texts(&tree, "p:first-of-type"), vec!["One"]);
    assert_eq!(texts(&tree, "span:last-of-type"), vec!["Three"]);
    assert!(texts(&tree, "li:only-child").is_empty());

    let roots = select_all(&tree, ":root");
    assert_eq!(roots.len(), 1);
    assert_eq!(tree.as_element(roots[0]).unwrap().tag_name, "html");
}

#[test]
fn test_empty_ignores_whitespace() {
    let tree = parse_document(r#"<div class="e"> </div><div class="e">x</div>"#);
    assert_eq!(select_all(&tree, ".e:empty").len(), 1);
}

#[test]
fn test_attribute_matching() {
    let tree = parse_document(LIST_PAGE);
    assert_eq!(texts(&tree, "[lang|=en]"), vec!["Three"]);
    assert_eq!(texts(&tree, "[lang^=EN i]"), vec!["Three"]);
    assert!(texts(&tree, "[lang^=EN]").is_empty());
    assert!(texts(&tree, "[lang^='']").is_empty());
    assert_eq!(texts(&tree, "[class~=box]").len(), 1);
}

#[test]
fn test_state_dependent_selectors_are_permissive() {
    let tree = parse_document(LIST_PAGE);
    assert_eq!(texts(&tree, "p:hover"), vec!["One", "Two"]);
    assert_eq!(texts(&tree, "p::before"), vec!["One", "Two"]);
    assert_eq!(texts(&tree, "p:not(:hover)"), vec!["One", "Two"]);
    assert_eq!(texts(&tree, "p:not(.a)"), vec!["Two"]);
}

#[test]
fn test_selector_lists() {
    let tree = parse_document(LIST_PAGE);
    assert_eq!(texts(&tree, ":is(p, span)"), vec!["One", "Two", "Three"]);
    assert_eq!(texts(&tree, "span, p"), vec!["One", "Two", "Three"]);
    assert_eq!(texts(&tree, "p, p.a"), vec!["One", "Two"]);
    assert!(select_all(&tree, "p >").is_empty());
    assert!(select_all(&tree, "p, ns|b").is_empty());
}

#[test]
fn test_descendant_matching_backtracks() {
    let tree = parse_document(
        r#"<div class="a"><div class="b"><div class="b"><p>x</p></div></div></div>"#,
    );
    assert_eq!(texts(&tree, ".a > .b p"), vec!["x"]);
    assert!(texts(&tree, ".a > .b > p").is_empty());
}
