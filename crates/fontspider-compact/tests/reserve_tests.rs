//! Integration tests for reserved text and backups.

use std::fs;
use std::path::PathBuf;

use fontspider_compact::{ReserveText, backup, backup_path};
use fontspider_resolve::DeclaredFamilyMap;

fn map() -> DeclaredFamilyMap {
    let mut map = DeclaredFamilyMap::new();
    let _ = map.declare("Foo", PathBuf::from("/fonts/foo.ttf"));
    let _ = map.declare("Bar", PathBuf::from("/fonts/bar.ttf"));
    map.get_mut("Foo").unwrap().push_chars("ab");
    map
}

#[test]
fn test_reserve_text_deserializes_from_string_or_object() {
    let all: ReserveText = serde_json::from_str(r#""0123""#).unwrap();
    assert_eq!(all, ReserveText::All("0123".to_string()));

    let per: ReserveText = serde_json::from_str(r#"{"Foo": "xyz"}"#).unwrap();
    assert_eq!(per.text_for("Foo"), Some("xyz"));
    assert_eq!(per.text_for("Bar"), None);

    let none: ReserveText = serde_json::from_str("null").unwrap();
    assert_eq!(none, ReserveText::None);
}

#[test]
fn test_reserve_text_for_every_family() {
    let mut map = map();
    ReserveText::All("b c".to_string()).apply(&mut map);
    assert_eq!(map.get("Foo").unwrap().chars, "abc");
    assert_eq!(map.get("Bar").unwrap().chars, "bc");
}

#[test]
fn test_reserve_text_per_family() {
    let mut map = map();
    let reserve: ReserveText = serde_json::from_str(r#"{"Bar": "加载中", "Missing": "x"}"#).unwrap();
    reserve.apply(&mut map);
    assert_eq!(map.get("Foo").unwrap().chars, "ab");
    assert_eq!(map.get("Bar").unwrap().chars, "加载中");
    assert!(map.get("Missing").is_none());
}

#[test]
fn test_backup_path() {
    assert_eq!(
        backup_path(&PathBuf::from("/site/font/SmileySans-Oblique.ttf")),
        PathBuf::from("/site/font/SmileySans-Oblique.backup.ttf")
    );
    assert_eq!(
        backup_path(&PathBuf::from("/site/font/Icons")),
        PathBuf::from("/site/font/Icons.backup")
    );
}

#[test]
fn test_backup_is_created_once() {
    let dir = tempfile::tempdir().unwrap();
    let font = dir.path().join("foo.woff2");
    fs::write(&font, "original").unwrap();

    let first = backup(&font).unwrap();
    assert_eq!(first, dir.path().join("foo.backup.woff2"));
    assert_eq!(fs::read_to_string(&first).unwrap(), "original");

    fs::write(&font, "subset").unwrap();
    let second = backup(&font).unwrap();
    assert_eq!(second, first);
    assert_eq!(fs::read_to_string(&second).unwrap(), "original");
}
