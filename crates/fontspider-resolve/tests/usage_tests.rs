//! Integration tests for selector attribution.

use std::path::PathBuf;

use fontspider_css::{parse_declaration_list, parse_stylesheet};
use fontspider_resolve::DeclaredFamilyMap;
use fontspider_resolve::usage::{content_literal, resolve_usage, strip_interaction_pseudos};

fn declared(names: &[&str]) -> DeclaredFamilyMap {
    let mut map = DeclaredFamilyMap::new();
    for name in names {
        let _ = map.declare(*name, PathBuf::from(format!("/fonts/{name}.woff2")));
    }
    map
}

fn resolved(names: &[&str], css: &str) -> DeclaredFamilyMap {
    let mut map = declared(names);
    resolve_usage(&parse_stylesheet(css).unwrap(), &mut map);
    map
}

fn selectors<'a>(map: &'a DeclaredFamilyMap, name: &str) -> Vec<&'a str> {
    map.get(name)
        .unwrap()
        .selectors
        .iter()
        .map(String::as_str)
        .collect()
}

#[test]
fn test_first_declared_fallback_is_attributed() {
    let map = resolved(
        &["Known", "Unknown"],
        r#".a { font-family: "Known", "Unknown" } .b { font-family: Missing, Unknown }"#,
    );
    assert_eq!(selectors(&map, "Known"), vec![".a"]);
    assert_eq!(selectors(&map, "Unknown"), vec![".b"]);
}

#[test]
fn test_undeclared_families_are_ignored() {
    let map = resolved(&["Foo"], ".a { font-family: serif } .b { color: red }");
    assert!(selectors(&map, "Foo").is_empty());
    assert_eq!(map.len(), 1);
}

#[test]
fn test_font_shorthand() {
    let map = resolved(
        &["Foo", "Bar"],
        r#".a { font: italic 700 16px/1.4 "Bar", serif } .b { font: 12px Foo } .c { font: 12px FooBar }"#,
    );
    assert_eq!(selectors(&map, "Bar"), vec![".a"]);
    assert_eq!(selectors(&map, "Foo"), vec![".b"]);
}

#[test]
fn test_selector_list_is_recorded_per_selector() {
    let map = resolved(
        &["Foo"],
        ".a, .b > p, .a { font-family: Foo } .b > p { font-family: Foo }",
    );
    assert_eq!(selectors(&map, "Foo"), vec![".a", ".b > p"]);
}

#[test]
fn test_interaction_pseudos_are_stripped() {
    let map = resolved(
        &["Known"],
        ".title:hover { font-family: Known } a:focus, a:ACTIVE { font-family: Known } :hover { font-family: Known }",
    );
    assert_eq!(selectors(&map, "Known"), vec![".title", "a"]);
    assert!(map.get("Known").unwrap().chars.is_empty());
}

#[test]
fn test_generated_content_contributes_its_string() {
    let map = resolved(
        &["Known"],
        r#".title::before { content: "★"; font-family: Known } .x:after { font-family: Known; content: "a" counter(n) "b" }"#,
    );
    assert_eq!(selectors(&map, "Known"), vec![".title", ".x"]);
    assert_eq!(map.get("Known").unwrap().chars, "★ab");
}

#[test]
fn test_content_without_generating_pseudo_is_ignored() {
    let map = resolved(&["Known"], r#".title { content: "★"; font-family: Known }"#);
    assert!(map.get("Known").unwrap().chars.is_empty());
}

#[test]
fn test_rules_nested_in_media_are_attributed() {
    let map = resolved(
        &["Foo"],
        "@media (min-width: 40em) { @supports (display: grid) { main h1 { font-family: Foo } } }",
    );
    assert_eq!(selectors(&map, "Foo"), vec!["main h1"]);
}

#[test]
fn test_font_face_descriptors_are_not_usage() {
    let map = resolved(&["Foo"], "@font-face { font-family: Foo; src: url(foo.ttf) }");
    assert!(selectors(&map, "Foo").is_empty());
}

#[test]
fn test_strip_interaction_pseudos() {
    let strip = strip_interaction_pseudos;

    assert_eq!(strip(".title:hover"), (".title".to_string(), false));
    assert_eq!(strip(".title::before"), (".title".to_string(), true));
    assert_eq!(strip(".title:after"), (".title".to_string(), true));
    assert_eq!(strip("nav a:hover span"), ("nav a span".to_string(), false));
    assert_eq!(strip("a:hover:focus::after"), ("a".to_string(), true));
    assert_eq!(strip("a:focus-visible"), ("a:focus-visible".to_string(), false));
    assert_eq!(strip("a:hovered"), ("a:hovered".to_string(), false));
    assert_eq!(strip("a:not(:hover)"), ("a:not(:hover)".to_string(), false));
    assert_eq!(strip(r#"a[title=":hover"]"#), (r#"a[title=":hover"]"#.to_string(), false));
    assert_eq!(strip(r".md\:hover"), (r".md\:hover".to_string(), false));
    assert_eq!(strip("::before"), (String::new(), true));
}

#[test]
fn test_content_literal_uses_last_declaration() {
    let declarations = parse_declaration_list(r#"content: "x"; color: red; content: "y" "z""#).unwrap();
    assert_eq!(content_literal(&declarations).as_deref(), Some("yz"));

    let declarations = parse_declaration_list("content: none").unwrap();
    assert_eq!(content_literal(&declarations).as_deref(), Some(""));

    let declarations = parse_declaration_list("color: red").unwrap();
    assert_eq!(content_literal(&declarations), None);
}
