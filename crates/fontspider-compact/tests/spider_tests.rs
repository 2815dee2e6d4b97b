//! Integration tests for whole compaction runs, with a fake subsetter.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use fontspider_compact::{
    CompactError, ReserveText, SpiderOptions, SubsetError, Subsetter, plan, spider,
};
use tempfile::TempDir;

/// Writes `subset(<text>) of <source bytes>` and remembers every call.
#[derive(Default)]
struct RecordingSubsetter {
    calls: Mutex<Vec<(PathBuf, String)>>,
}

impl RecordingSubsetter {
    fn calls(&self) -> Vec<(PathBuf, String)> {
        let mut calls = self.calls.lock().unwrap().clone();
        calls.sort();
        calls
    }
}

impl Subsetter for RecordingSubsetter {
    fn subset(&self, source: &Path, text: &str) -> Result<Vec<u8>, SubsetError> {
        self.calls
            .lock()
            .unwrap()
            .push((source.to_path_buf(), text.to_string()));
        let original = fs::read_to_string(source)?;
        Ok(format!("subset({text}) of {original}").into_bytes())
    }
}

struct FailingSubsetter;

impl Subsetter for FailingSubsetter {
    fn subset(&self, _source: &Path, _text: &str) -> Result<Vec<u8>, SubsetError> {
        Err(SubsetError::Io(std::io::Error::other("broken font")))
    }
}

fn write(root: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, contents).unwrap();
    path
}

/// A site with two used fonts and one unused one.
fn site() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    let _ = write(root, "fonts/title.ttf", "TITLE");
    let _ = write(root, "fonts/body.woff2", "BODY");
    let _ = write(root, "fonts/unused.ttf", "UNUSED");
    let _ = write(
        root,
        "css/site.css",
        r#"
@font-face { font-family: "Title"; src: url(../fonts/title.ttf) }
@font-face { font-family: Body; src: url("/fonts/body.woff2?v=1") format("woff2") }
@font-face { font-family: Unused; src: url(../fonts/unused.ttf) }
h1 { font-family: Title, serif }
p { font-family: Body }
"#,
    );
    let _ = write(
        root,
        "index.html",
        r#"<link rel="stylesheet" href="/css/site.css"><h1>Hello</h1><p>ab</p>"#,
    );
    let _ = write(
        root,
        "drafts/wip.html",
        r#"<link rel="stylesheet" href="/css/site.css"><p>xyz</p>"#,
    );
    dir
}

#[test]
fn test_spider_rewrites_used_fonts_from_backups() {
    let dir = site();
    let root = dir.path();
    let subsetter = RecordingSubsetter::default();

    let report = spider(&SpiderOptions::new(root), &subsetter);
    assert!(report.is_success(), "{:?}", report.errors);

    let mut written = report.written.clone();
    written.sort();
    assert_eq!(written, vec![root.join("fonts/body.woff2"), root.join("fonts/title.ttf")]);
    assert_eq!(report.skipped, vec!["Unused"]);

    assert_eq!(
        subsetter.calls(),
        vec![
            (root.join("fonts/body.backup.woff2"), "xyzab".to_string()),
            (root.join("fonts/title.backup.ttf"), "Helo".to_string()),
        ]
    );
    assert_eq!(fs::read_to_string(root.join("fonts/title.ttf")).unwrap(), "subset(Helo) of TITLE");
    assert_eq!(fs::read_to_string(root.join("fonts/title.backup.ttf")).unwrap(), "TITLE");
    assert_eq!(fs::read_to_string(root.join("fonts/unused.ttf")).unwrap(), "UNUSED");
    assert!(!root.join("fonts/unused.backup.ttf").exists());
}

#[test]
fn test_second_run_subsets_from_the_pristine_backup() {
    let dir = site();
    let root = dir.path();

    let _ = spider(&SpiderOptions::new(root), &RecordingSubsetter::default());
    let report = spider(&SpiderOptions::new(root), &RecordingSubsetter::default());

    assert!(report.is_success());
    assert_eq!(fs::read_to_string(root.join("fonts/body.woff2")).unwrap(), "subset(xyzab) of BODY");
}

#[test]
fn test_without_backup_fonts_are_subset_in_place() {
    let dir = site();
    let root = dir.path();
    let subsetter = RecordingSubsetter::default();
    let mut options = SpiderOptions::new(root);
    options.backup = false;
    options.ignore = vec!["drafts/**".to_string()];

    let report = spider(&options, &subsetter);
    assert!(report.is_success());
    assert_eq!(
        subsetter.calls(),
        vec![
            (root.join("fonts/body.woff2"), "ab".to_string()),
            (root.join("fonts/title.ttf"), "Helo".to_string()),
        ]
    );
    assert!(!root.join("fonts/title.backup.ttf").exists());
}

#[test]
fn test_reserved_text_is_kept() {
    let dir = site();
    let root = dir.path();
    let mut options = SpiderOptions::new(root);
    options.reserve_text = serde_json::from_str(r#"{"Unused": "0 1", "Title": "!"}"#).unwrap();

    let resolution = plan(&options).unwrap();
    assert_eq!(resolution.map.get("Title").unwrap().chars, "Helo!");
    assert_eq!(resolution.map.get("Unused").unwrap().chars, "01");

    let subsetter = RecordingSubsetter::default();
    let report = spider(&options, &subsetter);
    assert!(report.skipped.is_empty());
    assert_eq!(report.written.len(), 3);
}

#[test]
fn test_families_sharing_a_file_get_one_job() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    let _ = write(root, "shared.ttf", "SHARED");
    let _ = write(
        root,
        "index.html",
        r"<style>
@font-face { font-family: A; src: url(shared.ttf) }
@font-face { font-family: B; src: url(shared.ttf) }
h1 { font-family: A } h2 { font-family: B }
</style><h1>ab</h1><h2>bc</h2>",
    );
    let subsetter = RecordingSubsetter::default();
    let mut options = SpiderOptions::new(root);
    options.reserve_text = ReserveText::None;

    let report = spider(&options, &subsetter);
    assert_eq!(report.written, vec![root.join("shared.ttf")]);
    let calls = subsetter.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1, "abc");
}

#[test]
fn test_subset_failure_is_reported_and_leaves_font_alone() {
    let dir = site();
    let root = dir.path();

    let report = spider(&SpiderOptions::new(root), &FailingSubsetter);
    assert_eq!(report.errors.len(), 2);
    assert!(report.errors.iter().all(|e| matches!(e, CompactError::Subset { .. })));
    assert!(report.written.is_empty());
    assert_eq!(fs::read_to_string(root.join("fonts/title.ttf")).unwrap(), "TITLE");
}

#[test]
fn test_resolution_error_leaves_every_font_alone() {
    let dir = site();
    let root = dir.path();
    let _ = write(root, "zz/broken.html", "<style>h1 { color: red</style>");
    let subsetter = RecordingSubsetter::default();

    let report = spider(&SpiderOptions::new(root), &subsetter);
    assert!(matches!(&report.errors[..], [CompactError::Resolve(_)]));
    assert!(report.written.is_empty());
    assert!(subsetter.calls().is_empty());
    assert_eq!(report.skipped.len(), 3);
}

#[test]
fn test_options_from_json() {
    let options: SpiderOptions = serde_json::from_str(
        r#"{ "basePath": "/srv/site", "source": ["**/*.html"], "backup": false, "reserveText": "©" }"#,
    )
    .unwrap();
    assert_eq!(options.root, PathBuf::from("/srv/site"));
    assert_eq!(options.sources, vec!["**/*.html"]);
    assert!(!options.backup);
    assert_eq!(options.reserve_text, ReserveText::All("©".to_string()));

    let options: SpiderOptions = serde_json::from_str(r#"{ "root": "site" }"#).unwrap();
    assert!(options.backup);
    assert!(options.ignore.is_empty());

    assert!(serde_json::from_str::<SpiderOptions>(r#"{ "root": "site", "colour": true }"#).is_err());
}
