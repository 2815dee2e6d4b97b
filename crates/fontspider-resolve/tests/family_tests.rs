//! Integration tests for the family map.

use std::path::PathBuf;

use fontspider_resolve::{DeclaredFamilyMap, normalize_chars};

fn map_of(names: &[&str]) -> DeclaredFamilyMap {
    let mut map = DeclaredFamilyMap::new();
    for name in names {
        assert!(map.declare(*name, PathBuf::from(format!("/fonts/{name}.ttf"))));
    }
    map
}

#[test]
fn test_first_declaration_wins() {
    let mut map = map_of(&["Foo"]);
    assert!(!map.declare("Foo", PathBuf::from("/fonts/other.ttf")));

    assert_eq!(map.len(), 1);
    assert_eq!(map.get("Foo").unwrap().path, PathBuf::from("/fonts/Foo.ttf"));
    assert!(map.get("Foo").unwrap().selectors.is_empty());
    assert!(map.get("Foo").unwrap().chars.is_empty());
}

#[test]
fn test_selectors_are_deduplicated() {
    let mut map = map_of(&["Foo"]);
    let entry = map.get_mut("Foo").unwrap();
    assert!(entry.add_selector(".a"));
    assert!(entry.add_selector(".b"));
    assert!(!entry.add_selector(".a"));
    assert_eq!(entry.selectors, vec![".a", ".b"]);
}

#[test]
fn test_remove_and_retain_keep_lookups_consistent() {
    let mut map = map_of(&["A", "B", "C", "D"]);

    assert!(map.remove("B").is_some());
    assert!(map.remove("B").is_none());
    assert_eq!(map.names().collect::<Vec<_>>(), vec!["A", "C", "D"]);
    assert_eq!(map.get("D").unwrap().path, PathBuf::from("/fonts/D.ttf"));

    map.retain(|name, _| name != "A");
    assert_eq!(map.names().collect::<Vec<_>>(), vec!["C", "D"]);
    assert!(!map.contains("A"));
    assert_eq!(map.get("C").unwrap().path, PathBuf::from("/fonts/C.ttf"));
}

#[test]
fn test_first_declared_in_list() {
    let map = map_of(&["Known", "Unknown"]);

    assert_eq!(map.first_declared_in_list(r#""Known", "Unknown""#), Some("Known"));
    assert_eq!(map.first_declared_in_list(r#"Missing, 'Unknown', Known"#), Some("Unknown"));
    assert_eq!(map.first_declared_in_list("serif, sans-serif"), None);
    assert_eq!(map.first_declared_in_list("known"), None);
}

#[test]
fn test_find_in_shorthand_is_literal_and_delimited() {
    let map = map_of(&["Mono", "Open Sans", "a.b"]);

    assert_eq!(map.find_in_shorthand(r#"italic 12px/1.5 "Open Sans", serif"#), Some("Open Sans"));
    assert_eq!(map.find_in_shorthand("12px Mono"), Some("Mono"));
    assert_eq!(map.find_in_shorthand("12px/Mono,serif"), Some("Mono"));
    assert_eq!(map.find_in_shorthand("12px MonoLisa"), None);
    // Not a pattern: `.` only matches a dot.
    assert_eq!(map.find_in_shorthand("12px aXb"), None);
    assert_eq!(map.find_in_shorthand("12px a.b"), Some("a.b"));
}

#[test]
fn test_find_in_shorthand_prefers_declaration_order() {
    let map = map_of(&["Second", "First"]);
    assert_eq!(map.find_in_shorthand("12px First, Second"), Some("Second"));
}

#[test]
fn test_normalize_chars() {
    assert_eq!(normalize_chars("'666'"), "'6");
    assert_eq!(normalize_chars(r#""666""#), "\"6");
    assert_eq!(normalize_chars(r#""666" 'result' result result"#), "\"6'result");
    assert_eq!(normalize_chars("H i\n\tH\u{3000}i"), "Hi");
    assert_eq!(normalize_chars("你好你"), "你好");
}

#[test]
fn test_normalize_applies_to_every_entry() {
    let mut map = map_of(&["A", "B"]);
    map.get_mut("A").unwrap().push_chars("a a b");
    map.get_mut("B").unwrap().push_chars("zz");
    map.normalize();

    let chars: Vec<_> = map.iter().map(|(_, e)| e.chars.as_str()).collect();
    assert_eq!(chars, vec!["ab", "z"]);
}

#[test]
fn test_serializes_in_declaration_order() {
    let mut map = map_of(&["Zeta", "Alpha"]);
    let entry = map.get_mut("Zeta").unwrap();
    let _ = entry.add_selector(".z");
    entry.push_chars("z");

    let json = serde_json::to_string(&map).unwrap();
    assert_eq!(
        json,
        r#"{"Zeta":{"selector":[".z"],"path":"/fonts/Zeta.ttf","chars":"z"},"Alpha":{"selector":[],"path":"/fonts/Alpha.ttf","chars":""}}"#
    );
}
