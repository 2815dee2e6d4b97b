//! Integration tests for whole resolution runs over sites on disk.

use std::fs;
use std::path::{Path, PathBuf};

use fontspider_resolve::{DeclaredFamilyMap, Resolution, ResolveError, Resolver};
use tempfile::TempDir;

/// A throwaway site root.
struct Site {
    dir: TempDir,
}

impl Site {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    fn write(&self, relative: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        let path = self.path(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }

    fn font(&self, relative: &str) -> PathBuf {
        self.write(relative, b"\x00\x01\x00\x00not really a font")
    }

    fn resolve(&self, documents: &[PathBuf]) -> Resolution {
        Resolver::new(self.root()).resolve(documents)
    }
}

fn chars<'a>(map: &'a DeclaredFamilyMap, name: &str) -> &'a str {
    &map.get(name).unwrap().chars
}

#[test]
fn test_repeated_attributes_keep_the_first_value() {
    let site = Site::new();
    let _ = site.font("foo.ttf");
    let index = site.write(
        "index.html",
        r#"<style>
@font-face { font-family: Foo; src: url(foo.ttf) }
.headline, #main { font-family: Foo }
</style>
<h1 class="headline" class="big">Hi</h1>
<p id="main" class="a" id="x">Yo</p>"#,
    );

    let resolution = site.resolve(&[index]);
    assert!(resolution.is_complete());
    assert_eq!(chars(&resolution.map, "Foo"), "HiYo");
}

#[test]
fn test_linked_stylesheet_end_to_end() {
    let site = Site::new();
    let font = site.font("foo.ttf");
    let _ = site.write(
        "style.css",
        "@font-face { font-family: Foo; src: url(foo.ttf) }\n.headline { font-family: Foo }\n",
    );
    let index = site.write(
        "index.html",
        r#"<!DOCTYPE html>
<html>
  <head><link rel="stylesheet" href="style.css"></head>
  <body>
    <h1 class="headline">Hi</h1>
    <p>Not this</p>
  </body>
</html>"#,
    );

    let resolution = site.resolve(&[index]);
    assert!(resolution.is_complete());
    assert_eq!(resolution.map.len(), 1);

    let entry = resolution.map.get("Foo").unwrap();
    assert_eq!(entry.selectors, vec![".headline"]);
    assert_eq!(entry.path, font);
    assert_eq!(entry.chars, "Hi");

    let json = serde_json::to_value(&resolution.map).unwrap();
    assert_eq!(json["Foo"]["selector"], serde_json::json!([".headline"]));
    assert_eq!(json["Foo"]["chars"], "Hi");
}

#[test]
fn test_font_face_without_existing_source_declares_nothing() {
    let site = Site::new();
    let _ = site.font("fonts/real.woff2");
    let index = site.write(
        "index.html",
        r#"<style>
@font-face { font-family: Missing; src: url(fonts/missing.woff2) }
@font-face { font-family: Nameless; }
@font-face { src: url(fonts/real.woff2) }
@font-face { font-family: "Real"; src: url(fonts/missing.woff) format("woff"), url("fonts/real.woff2") format("woff2") }
p { font-family: Missing, Real }
</style>
<p>ok</p>"#,
    );

    let resolution = site.resolve(&[index]);
    assert_eq!(resolution.map.names().collect::<Vec<_>>(), vec!["Real"]);
    assert_eq!(resolution.map.get("Real").unwrap().path, site.path("fonts/real.woff2"));
    assert_eq!(chars(&resolution.map, "Real"), "ok");
}

#[test]
fn test_query_and_fragment_are_stripped() {
    let site = Site::new();
    let font = site.font("fonts/foo.ttf");
    let _ = site.write(
        "css/site.css",
        "@font-face { font-family: Foo; src: url('../fonts/foo.ttf?v=2574dae2ee#iefix') }\nb { font-family: Foo }",
    );
    let index = site.write(
        "index.html",
        r#"<link href="css/site.css?v=3" rel="stylesheet"><b>bold</b>"#,
    );

    let resolution = site.resolve(&[index]);
    assert_eq!(resolution.map.get("Foo").unwrap().path, font);
    assert_eq!(chars(&resolution.map, "Foo"), "bold");
}

#[test]
fn test_root_absolute_references_resolve_under_root() {
    let site = Site::new();
    let font = site.font("fonts/foo.ttf");
    let _ = site.write(
        "css/site.css",
        "@font-face { font-family: Foo; src: url(/fonts/foo.ttf) }\nh2 { font-family: Foo }",
    );
    let page = site.write(
        "blog/post/index.html",
        r#"<link rel="stylesheet" href="/css/site.css"><h2>Post</h2>"#,
    );

    let resolution = site.resolve(&[page]);
    assert_eq!(resolution.map.get("Foo").unwrap().path, font);
    assert_eq!(chars(&resolution.map, "Foo"), "Post");
}

#[test]
fn test_non_stylesheet_links_are_skipped() {
    let site = Site::new();
    let _ = site.write("icon.png", "png");
    let _ = site.write("feed.xml", "<rss/>");
    let index = site.write(
        "index.html",
        r#"<link rel="icon" href="icon.png"><link rel="alternate" href="feed.xml"><link rel="stylesheet" href="gone.css"><link href="dir.css"><p>x</p>"#,
    );
    fs::create_dir_all(site.path("dir.css")).unwrap();

    let resolution = site.resolve(&[index]);
    assert!(resolution.is_complete());
    assert!(resolution.map.is_empty());
}

#[test]
fn test_first_font_face_wins() {
    let site = Site::new();
    let first = site.font("first.ttf");
    let _ = site.font("second.ttf");
    let index = site.write(
        "index.html",
        r"<style>
@font-face { font-family: Foo; src: url(first.ttf) }
@font-face { font-family: Foo; src: url(second.ttf) }
</style>",
    );

    let resolution = site.resolve(&[index]);
    assert_eq!(resolution.map.get("Foo").unwrap().path, first);
}

#[test]
fn test_fallback_list_and_pseudos() {
    let site = Site::new();
    let _ = site.font("known.ttf");
    let _ = site.font("unknown.ttf");
    let index = site.write(
        "index.html",
        r#"<style>
@font-face { font-family: Known; src: url(known.ttf) }
@font-face { font-family: Unknown; src: url(unknown.ttf) }
.title:hover { font-family: "Known", "Unknown" }
.star::before { content: "★"; font-family: Known }
</style>
<p class="title">ab</p>"#,
    );

    let resolution = site.resolve(&[index]);
    let known = resolution.map.get("Known").unwrap();
    assert_eq!(known.selectors, vec![".title", ".star"]);
    // Generated content is attributed before any document is walked.
    assert_eq!(known.chars, "★ab");

    let unknown = resolution.map.get("Unknown").unwrap();
    assert!(unknown.selectors.is_empty());
    assert!(unknown.chars.is_empty());
}

#[test]
fn test_repeated_style_block_is_processed_once() {
    let site = Site::new();
    let _ = site.font("foo.ttf");
    let style = r#"<style>
@font-face { font-family: Foo; src: url(foo.ttf) }
.x::after { content: "!"; font-family: Foo }
p { font-family: Foo }
</style>"#;
    let a = site.write("a.html", format!("{style}<p>one</p>"));
    let b = site.write("b.html", format!("{style}<p>two</p>"));

    let resolution = site.resolve(&[a, b]);
    let entry = resolution.map.get("Foo").unwrap();
    assert_eq!(entry.selectors, vec![".x", "p"]);
    assert_eq!(entry.chars, "!onetw");
}

#[test]
fn test_selector_from_later_document_sees_earlier_document() {
    let site = Site::new();
    let _ = site.font("foo.ttf");
    let _ = site.write("fonts.css", "@font-face { font-family: Foo; src: url(foo.ttf) }");
    let early = site.write(
        "early.html",
        r#"<link rel="stylesheet" href="fonts.css"><p class="late">early</p>"#,
    );
    let late = site.write(
        "late.html",
        r#"<style>.late { font-family: Foo }</style><p>ignored</p>"#,
    );

    let resolution = site.resolve(&[early, late]);
    assert_eq!(chars(&resolution.map, "Foo"), "early");
}

#[test]
fn test_shorthand_media_and_inline_style() {
    let site = Site::new();
    let _ = site.font("foo.ttf");
    let _ = site.font("bar.ttf");
    let index = site.write(
        "index.html",
        r#"<style>
@font-face { font-family: "Foo Sans"; src: url(foo.ttf) }
@font-face { font-family: Bar; src: url(bar.ttf) }
@media screen { h1 { font: bold 2em/1.2 "Foo Sans", sans-serif } }
</style>
<h1>AB</h1>
<span style="font-family: 'Bar', serif">cd</span>
<span style="color: red">zz</span>"#,
    );

    let resolution = site.resolve(&[index]);
    assert_eq!(chars(&resolution.map, "Foo Sans"), "AB");
    let bar = resolution.map.get("Bar").unwrap();
    assert!(bar.selectors.is_empty());
    assert_eq!(bar.chars, "cd");
}

#[test]
fn test_script_and_style_text_is_not_collected() {
    let site = Site::new();
    let _ = site.font("foo.ttf");
    let index = site.write(
        "index.html",
        r"<style>
@font-face { font-family: Foo; src: url(foo.ttf) }
body { font-family: Foo }
</style>
<body><p>Hi</p><script>var zzz = 1;</script><template>qqq</template></body>",
    );

    let resolution = site.resolve(&[index]);
    assert_eq!(chars(&resolution.map, "Foo"), "Hi");
}

#[test]
fn test_unsupported_selector_selects_nothing() {
    let site = Site::new();
    let _ = site.font("foo.ttf");
    let index = site.write(
        "index.html",
        r"<style>
@font-face { font-family: Foo; src: url(foo.ttf) }
svg|text { font-family: Foo }
</style>
<p>text</p>",
    );

    let resolution = site.resolve(&[index]);
    assert!(resolution.is_complete());
    let entry = resolution.map.get("Foo").unwrap();
    assert_eq!(entry.selectors, vec!["svg|text"]);
    assert!(entry.chars.is_empty());
}

#[test]
fn test_filter_removes_family_before_text_collection() {
    let site = Site::new();
    let _ = site.font("foo.ttf");
    let _ = site.font("bar.ttf");
    let index = site.write(
        "index.html",
        r"<style>
@font-face { font-family: Foo; src: url(foo.ttf) }
@font-face { font-family: Bar; src: url(bar.ttf) }
p { font-family: Foo, Bar }
</style>
<p>text</p>",
    );

    let mut seen_by_filter = Vec::new();
    let mut seen_after = Vec::new();
    let resolution = Resolver::new(site.root())
        .filter(|map| {
            seen_by_filter = map.names().map(str::to_string).collect();
            let _ = map.remove("Foo");
        })
        .after_filter(|map| seen_after = map.names().map(str::to_string).collect())
        .resolve(&[index]);

    assert_eq!(seen_by_filter, vec!["Foo", "Bar"]);
    assert_eq!(seen_after, vec!["Bar"]);
    assert!(resolution.map.get("Foo").is_none());
    // The list now falls through to the next declared family.
    assert_eq!(chars(&resolution.map, "Bar"), "tex");
}

#[test]
fn test_parse_failure_returns_partial_map() {
    let site = Site::new();
    let _ = site.font("foo.ttf");
    let good = site.write(
        "good.html",
        r"<style>
@font-face { font-family: Foo; src: url(foo.ttf) }
p { font-family: Foo }
</style><p>good</p>",
    );
    let bad = site.write("bad.html", "<style>.x { color: red</style><p>bad</p>");

    let mut after_filter_calls = 0;
    let resolution = Resolver::new(site.root())
        .after_filter(|_| after_filter_calls += 1)
        .resolve(&[good, bad.clone()]);

    assert_eq!(after_filter_calls, 1);
    assert!(!resolution.is_complete());
    assert_eq!(resolution.errors.len(), 1);
    assert!(matches!(
        &resolution.errors[0],
        ResolveError::ParseFailure { path, .. } if *path == bad
    ));
    // Declared before the failure, but no text was collected.
    let entry = resolution.map.get("Foo").unwrap();
    assert!(entry.selectors.is_empty());
    assert!(entry.chars.is_empty());
}

#[test]
fn test_malformed_style_attribute_is_a_parse_failure() {
    let site = Site::new();
    let index = site.write("index.html", r#"<p style="font-family: 'Foo">x</p>"#);

    let resolution = site.resolve(&[index.clone()]);
    assert!(matches!(
        &resolution.errors[..],
        [ResolveError::ParseFailure { path, .. }] if *path == index
    ));
}

#[test]
fn test_unreadable_documents_are_reported() {
    let site = Site::new();
    let missing = site.path("missing.html");
    let resolution = site.resolve(&[missing.clone()]);
    assert!(matches!(
        &resolution.errors[..],
        [ResolveError::Io { path, .. }] if *path == missing
    ));
    assert_eq!(resolution.errors[0].path(), Some(missing.as_path()));

    let binary = site.write("binary.html", b"\xff\xfe\x00");
    let resolution = site.resolve(&[binary]);
    assert!(matches!(
        &resolution.errors[..],
        [ResolveError::InvalidDocument { .. }]
    ));
}
