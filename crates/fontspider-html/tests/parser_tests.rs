//! Integration tests for HTML tree construction.

use fontspider_dom::{DomTree, NodeId, NodeType};
use fontspider_html::{HTMLParser, HTMLTokenizer, parse_document};

/// First element with the given tag name, in document order.
fn find_element(tree: &DomTree, tag: &str) -> Option<NodeId> {
    tree.elements().find(|&id| tree.is_element_named(id, tag))
}

fn all_elements(tree: &DomTree, tag: &str) -> Vec<NodeId> {
    tree.elements()
        .filter(|&id| tree.is_element_named(id, tag))
        .collect()
}

fn parent_tag(tree: &DomTree, id: NodeId) -> Option<String> {
    tree.parent(id)
        .and_then(|parent| tree.as_element(parent))
        .map(|data| data.tag_name.clone())
}

#[test]
fn test_implied_html_head_body() {
    let tree = parse_document("<title>T</title><p>Hello");
    let html = tree.document_element().expect("html element");
    assert!(tree.is_element_named(html, "html"));

    let head = find_element(&tree, "head").expect("implied head");
    let title = find_element(&tree, "title").expect("title");
    assert_eq!(tree.parent(title), Some(head));

    let body = tree.body().expect("implied body");
    let p = find_element(&tree, "p").expect("p");
    assert_eq!(tree.parent(p), Some(body));
    assert_eq!(tree.text_content(p), "Hello");
}

#[test]
fn test_full_document() {
    let html = r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><link rel="stylesheet" href="a.css"></head>
<body class="page"><h1 id="t">Title</h1></body>
</html>"#;
    let tree = parse_document(html);
    let body = tree.body().expect("body");
    assert!(tree.as_element(body).is_some_and(|data| data.has_class("page")));
    let link = find_element(&tree, "link").expect("link");
    assert_eq!(parent_tag(&tree, link).as_deref(), Some("head"));
    assert!(tree.children(link).is_empty());
    let h1 = find_element(&tree, "h1").expect("h1");
    assert_eq!(tree.as_element(h1).and_then(|data| data.id()), Some("t"));
}

#[test]
fn test_paragraph_closed_by_block() {
    let tree = parse_document("<p>one<div>two</div>");
    let p = find_element(&tree, "p").expect("p");
    let div = find_element(&tree, "div").expect("div");
    assert_eq!(tree.text_content(p), "one");
    assert_eq!(parent_tag(&tree, div).as_deref(), Some("body"));
}

#[test]
fn test_paragraphs_do_not_nest() {
    let tree = parse_document("<p>a<p>b");
    let paragraphs = all_elements(&tree, "p");
    assert_eq!(paragraphs.len(), 2);
    assert_eq!(parent_tag(&tree, paragraphs[1]).as_deref(), Some("body"));
}

#[test]
fn test_stray_p_end_tag_inserts_empty_paragraph() {
    let tree = parse_document("<div>x</p></div>");
    let p = find_element(&tree, "p").expect("p");
    assert!(tree.children(p).is_empty());
    assert_eq!(parent_tag(&tree, p).as_deref(), Some("div"));
}

#[test]
fn test_list_items_close_each_other() {
    let tree = parse_document("<ul><li>a<li>b</ul>");
    let items = all_elements(&tree, "li");
    assert_eq!(items.len(), 2);
    for item in items {
        assert_eq!(parent_tag(&tree, item).as_deref(), Some("ul"));
    }
}

#[test]
fn test_void_elements_have_no_children() {
    let tree = parse_document("<p>a<br>b<img src=x>c</p>");
    let p = find_element(&tree, "p").expect("p");
    assert_eq!(tree.text_content(p), "abc");
    let br = find_element(&tree, "br").expect("br");
    assert!(tree.children(br).is_empty());
}

#[test]
fn test_style_and_script_are_raw_text() {
    let tree = parse_document(
        "<style>.a::before { content: '<b>' }</style><script>x = '<p>'</script><p>seen</p>",
    );
    let style = find_element(&tree, "style").expect("style");
    assert_eq!(tree.text_content(style), ".a::before { content: '<b>' }");
    let script = find_element(&tree, "script").expect("script");
    assert_eq!(tree.text_content(script), "x = '<p>'");
    assert_eq!(all_elements(&tree, "p").len(), 1);
    let body = tree.body().expect("body");
    assert_eq!(tree.rendered_text(body), "seen");
}

#[test]
fn test_textarea_drops_leading_newline() {
    let tree = parse_document("<textarea>\nline</textarea>");
    let textarea = find_element(&tree, "textarea").expect("textarea");
    assert_eq!(tree.text_content(textarea), "line");
}

#[test]
fn test_headings_close_open_heading() {
    let tree = parse_document("<h1>a<h2>b</h2>");
    let h2 = find_element(&tree, "h2").expect("h2");
    assert_eq!(parent_tag(&tree, h2).as_deref(), Some("body"));
}

#[test]
fn test_table_cells_close_each_other() {
    let tree = parse_document("<table><tr><td>a<td>b<tr><td>c</table><p>after");
    assert_eq!(all_elements(&tree, "tr").len(), 2);
    let cells = all_elements(&tree, "td");
    assert_eq!(cells.len(), 3);
    for cell in cells {
        assert_eq!(parent_tag(&tree, cell).as_deref(), Some("tr"));
    }
    let p = find_element(&tree, "p").expect("p");
    assert_eq!(parent_tag(&tree, p).as_deref(), Some("body"));
}

#[test]
fn test_misnested_inline_end_tag() {
    let tree = parse_document("<div><b><i>x</b>y</i></div>");
    let div = find_element(&tree, "div").expect("div");
    assert_eq!(tree.text_content(div), "xy");
    let b = find_element(&tree, "b").expect("b");
    assert_eq!(tree.text_content(b), "x");
}

#[test]
fn test_svg_self_closing_is_honoured() {
    let tree = parse_document("<svg><circle/><text>label</text></svg>");
    let circle = find_element(&tree, "circle").expect("circle");
    assert!(tree.children(circle).is_empty());
    let text = find_element(&tree, "text").expect("text");
    assert_eq!(parent_tag(&tree, text).as_deref(), Some("svg"));
}

#[test]
fn test_template_content_is_nested() {
    let tree = parse_document("<head><template><p>t</p></template></head><body>b</body>");
    let template = find_element(&tree, "template").expect("template");
    assert_eq!(parent_tag(&tree, template).as_deref(), Some("head"));
    let p = find_element(&tree, "p").expect("p");
    assert_eq!(tree.parent(p), Some(template));
    let body = tree.body().expect("body");
    assert_eq!(tree.rendered_text(body), "b");
}

#[test]
fn test_comments_after_body_and_html() {
    let tree = parse_document("<body>x</body><!--a--></html><!--b-->");
    let html = tree.document_element().expect("html");
    let last = tree.last_child(html).expect("html children");
    assert_eq!(
        tree.get(last).map(|node| &node.node_type),
        Some(&NodeType::Comment("a".to_string()))
    );
    let document_children = tree.children(NodeId::ROOT);
    assert_eq!(document_children.len(), 2);
    assert_eq!(
        tree.get(document_children[1]).map(|node| &node.node_type),
        Some(&NodeType::Comment("b".to_string()))
    );
}

#[test]
fn test_content_after_body_reopens_body() {
    let tree = parse_document("<body>a</body>b");
    let body = tree.body().expect("body");
    assert_eq!(tree.text_content(body), "ab");
}

#[test]
fn test_issues_are_recorded() {
    let mut tokenizer = HTMLTokenizer::new("<p>a</span></p></p>".to_string());
    tokenizer.run();
    let (tree, issues) = HTMLParser::new(tokenizer.into_tokens()).run_with_issues();
    assert!(tree.body().is_some());
    assert!(!issues.is_empty());
    assert!(issues.iter().all(|issue| issue.is_error));
}
