//! Tests for reference resolution and URL decoration stripping.

use std::path::{Path, PathBuf};

use fontspider_common::path::normalize;
use fontspider_common::{is_regular_file, resolve_reference, strip_url_decorations};

fn site() -> (PathBuf, PathBuf) {
    let root = PathBuf::from("/srv/site");
    let document = root.join("index.html");
    (root, document)
}

#[test]
fn test_relative_reference_uses_document_directory() {
    let (root, document) = site();
    assert_eq!(
        resolve_reference(&root, &document, "index.css"),
        PathBuf::from("/srv/site/index.css")
    );
    assert_eq!(
        resolve_reference(&root, &document, "./index.css"),
        PathBuf::from("/srv/site/index.css")
    );
}

#[test]
fn test_absolute_reference_is_rooted_at_project_root() {
    let (root, _) = site();
    let nested = root.join("blog/2024/post.html");
    assert_eq!(
        resolve_reference(&root, &nested, "/index.css"),
        PathBuf::from("/srv/site/index.css")
    );
}

#[test]
fn test_parent_segments_are_collapsed() {
    let (root, document) = site();
    assert_eq!(
        resolve_reference(&root, &document, "../index.css"),
        PathBuf::from("/srv/index.css")
    );
    let nested = root.join("blog/post.html");
    assert_eq!(
        resolve_reference(&root, &nested, "../fonts/./a.ttf"),
        PathBuf::from("/srv/site/fonts/a.ttf")
    );
}

#[test]
fn test_reference_relative_to_stylesheet() {
    let root = PathBuf::from("/srv/site");
    let stylesheet = root.join("css/site.css");
    assert_eq!(
        resolve_reference(&root, &stylesheet, "../fonts/Foo.woff2"),
        PathBuf::from("/srv/site/fonts/Foo.woff2")
    );
}

#[test]
fn test_normalize_never_climbs_above_root() {
    assert_eq!(normalize(Path::new("/a/../../b")), PathBuf::from("/b"));
    assert_eq!(normalize(Path::new("../../b")), PathBuf::from("../../b"));
}

#[test]
fn test_strip_url_decorations() {
    assert_eq!(strip_url_decorations("xxx.ttf?v=2574dae2ee"), "xxx.ttf");
    assert_eq!(strip_url_decorations("xxx.ttf?v=2574dae2ee#666"), "xxx.ttf");
    assert_eq!(strip_url_decorations("icons.svg#glyph"), "icons.svg");
    assert_eq!(strip_url_decorations("plain.woff"), "plain.woff");
}

#[test]
fn test_is_regular_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("foo.ttf");
    std::fs::write(&file, b"\0\x01\0\0").unwrap();

    assert!(is_regular_file(&file));
    assert!(!is_regular_file(dir.path()));
    assert!(!is_regular_file(&dir.path().join("missing.ttf")));
}
