//! Integration tests for document discovery.

use std::fs;
use std::path::Path;

use fontspider_compact::{CompactError, discover};

fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "").unwrap();
}

fn relative(root: &Path, found: &[std::path::PathBuf]) -> Vec<String> {
    found
        .iter()
        .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
        .collect()
}

fn site() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for file in [
        "index.html",
        "about/index.html",
        "blog/2024/post.html",
        ".hidden/page.html",
        "node_modules/pkg/readme.html",
        "style.css",
        "notes.htm",
    ] {
        touch(dir.path(), file);
    }
    dir
}

#[test]
fn test_default_pattern_finds_every_html_file() {
    let dir = site();
    let found = discover(dir.path(), &[], &[]).unwrap();
    assert_eq!(
        relative(dir.path(), &found),
        vec![
            ".hidden/page.html",
            "about/index.html",
            "blog/2024/post.html",
            "index.html",
            "node_modules/pkg/readme.html",
        ]
    );
    assert!(found.iter().all(|p| p.is_absolute()));
}

#[test]
fn test_ignore_patterns() {
    let dir = site();
    let found = discover(
        dir.path(),
        &[],
        &["node_modules/**".to_string(), "**/.hidden/**".to_string()],
    )
    .unwrap();
    assert_eq!(
        relative(dir.path(), &found),
        vec!["about/index.html", "blog/2024/post.html", "index.html"]
    );
}

#[test]
fn test_star_stays_within_a_directory() {
    let dir = site();
    let found = discover(dir.path(), &["*.html".to_string(), "*.htm".to_string()], &[]).unwrap();
    assert_eq!(relative(dir.path(), &found), vec!["index.html", "notes.htm"]);
}

#[test]
fn test_invalid_pattern_is_reported() {
    let dir = site();
    let error = discover(dir.path(), &["blog/[".to_string()], &[]).unwrap_err();
    assert!(matches!(error, CompactError::InvalidGlob { ref pattern, .. } if pattern == "blog/["));
}

#[test]
fn test_missing_root_is_a_walk_error() {
    let dir = tempfile::tempdir().unwrap();
    let error = discover(&dir.path().join("nope"), &[], &[]).unwrap_err();
    assert!(matches!(error, CompactError::Walk(_)));
}
