//! Integration tests for the CSS parser.

use fontspider_css::error::CssErrorKind;
use fontspider_css::parser::{AtRuleBlock, Rule};
use fontspider_css::tokenizer::SourceLocation;
use fontspider_css::{parse_declaration_list, parse_stylesheet};

fn selector_texts(css: &str) -> Vec<Vec<String>> {
    parse_stylesheet(css)
        .unwrap()
        .style_rules()
        .map(|rule| rule.selectors.iter().map(|s| s.text.clone()).collect())
        .collect()
}

#[test]
fn test_style_rule_selectors_and_declarations() {
    let sheet = parse_stylesheet(
        r#".a, .b > p { color: red; font-family: "Open Sans", serif !important }"#,
    )
    .unwrap();
    assert_eq!(sheet.rules.len(), 1);
    let Rule::Style(rule) = &sheet.rules[0] else {
        panic!("Expected style rule");
    };

    let selectors: Vec<&str> = rule.selectors.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(selectors, vec![".a", ".b > p"]);

    assert_eq!(rule.declarations.len(), 2);
    assert_eq!(rule.declarations[0].name, "color");
    assert_eq!(rule.declarations[0].value_text(), "red");
    assert!(!rule.declarations[0].important);
    assert_eq!(rule.declarations[1].name, "font-family");
    assert_eq!(rule.declarations[1].value_text(), r#""Open Sans", serif"#);
    assert!(rule.declarations[1].important);
}

#[test]
fn test_property_names_are_lowercased() {
    let sheet = parse_stylesheet("P { FONT-FAMILY: Foo }").unwrap();
    let rule = sheet.style_rules().next().unwrap();
    assert_eq!(rule.declarations[0].name, "font-family");
    assert_eq!(rule.declarations[0].value_text(), "Foo");
    assert_eq!(rule.selectors[0].text, "P");
}

#[test]
fn test_single_quotes_are_requoted() {
    let declarations = parse_declaration_list("font-family: 'A B', serif; color: red").unwrap();
    assert_eq!(declarations.len(), 2);
    assert_eq!(declarations[0].value_text(), r#""A B", serif"#);
    assert_eq!(declarations[1].value_text(), "red");
}

#[test]
fn test_selector_text_is_normalised() {
    assert_eq!(
        selector_texts("div   >\n  p.x ,[data-x='1']:not(.a, .b)::before {}"),
        vec![vec![
            "div > p.x".to_string(),
            r#"[data-x="1"]:not(.a, .b)::before"#.to_string(),
        ]]
    );
}

#[test]
fn test_font_face_blocks() {
    let sheet = parse_stylesheet(
        r#"@font-face { font-family: Foo; src: url(foo.ttf) format("truetype"); }
           @media print { @font-face { font-family: "Bar"; src: url("bar.woff2?v=2") } }"#,
    )
    .unwrap();
    let faces: Vec<_> = sheet.font_faces().collect();
    assert_eq!(faces.len(), 2);

    assert_eq!(faces[0][0].name, "font-family");
    assert_eq!(faces[0][0].value_text(), "Foo");
    assert_eq!(faces[0][1].name, "src");
    assert_eq!(faces[0][1].value_text(), r#"url(foo.ttf) format("truetype")"#);

    assert_eq!(faces[1][0].value_text(), r#""Bar""#);
    assert_eq!(faces[1][1].value_text(), r#"url("bar.woff2?v=2")"#);
}

#[test]
fn test_style_rules_descend_into_group_rules() {
    assert_eq!(
        selector_texts(
            "@media screen { .a { color: red } @supports (display: grid) { .b { color: blue } } } .c {}"
        ),
        vec![vec![".a".to_string()], vec![".b".to_string()], vec![".c".to_string()]]
    );
}

#[test]
fn test_at_rule_blocks_are_typed() {
    let sheet = parse_stylesheet(
        "@charset \"utf-8\"; @keyframes spin { from { opacity: 0 } } @media (min-width: 1px) { a {} }",
    )
    .unwrap();
    assert_eq!(sheet.rules.len(), 3);

    let Rule::At(charset) = &sheet.rules[0] else {
        panic!("Expected at-rule");
    };
    assert_eq!(charset.name, "charset");
    assert!(charset.block.is_none());

    let Rule::At(keyframes) = &sheet.rules[1] else {
        panic!("Expected at-rule");
    };
    assert!(matches!(keyframes.block, Some(AtRuleBlock::Raw(_))));

    let Rule::At(media) = &sheet.rules[2] else {
        panic!("Expected at-rule");
    };
    assert!(matches!(&media.block, Some(AtRuleBlock::Rules(rules)) if rules.len() == 1));
    assert_eq!(sheet.style_rules().count(), 1);
}

#[test]
fn test_nested_rule_in_block_is_skipped() {
    let sheet = parse_stylesheet("a { color: red; &:hover { color: blue } font-family: X }").unwrap();
    let rule = sheet.style_rules().next().unwrap();
    let names: Vec<&str> = rule.declarations.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["color", "font-family"]);
}

#[test]
fn test_rule_location() {
    let sheet = parse_stylesheet("\n  .a { }").unwrap();
    let rule = sheet.style_rules().next().unwrap();
    assert_eq!(rule.location, SourceLocation::new(2, 3));
}

#[test]
fn test_cdo_cdc_are_ignored_at_top_level() {
    assert_eq!(selector_texts("<!-- a {} -->"), vec![vec!["a".to_string()]]);
}

#[test]
fn test_structural_errors() {
    let error = parse_stylesheet("a { color: red").unwrap_err();
    assert_eq!(error.kind, CssErrorKind::UnclosedBlock);
    assert_eq!(error.location, SourceLocation::new(1, 3));
    assert_eq!(error.to_string(), "unclosed block at 1:3");

    let error = parse_stylesheet("a { } }").unwrap_err();
    assert_eq!(error.kind, CssErrorKind::UnexpectedCloseBrace);
    assert_eq!(error.location, SourceLocation::new(1, 7));
    assert_eq!(error.to_string(), "unexpected } at 1:7");

    let error = parse_stylesheet("a { color: rgb(1, 2 }").unwrap_err();
    assert_eq!(error.kind, CssErrorKind::UnclosedBracket);
    assert_eq!(error.location, SourceLocation::new(1, 12));

    let error = parse_stylesheet("@media screen { a { }").unwrap_err();
    assert_eq!(error.kind, CssErrorKind::UnclosedBlock);
    assert_eq!(error.location, SourceLocation::new(1, 15));
}

#[test]
fn test_tokenizer_errors_come_first() {
    let error = parse_stylesheet("a { content: \"x }").unwrap_err();
    assert_eq!(error.kind, CssErrorKind::UnclosedString);
    assert_eq!(error.location, SourceLocation::new(1, 14));

    let error = parse_stylesheet("a {} /* never closed").unwrap_err();
    assert_eq!(error.kind, CssErrorKind::UnclosedComment);
    assert_eq!(error.to_string(), "unclosed comment at 1:6");
}

#[test]
fn test_string_values() {
    let sheet = parse_stylesheet(r#"a::before { content: "★" attr(title) 'b' }"#).unwrap();
    let rule = sheet.style_rules().next().unwrap();
    let strings: Vec<&str> = rule.declarations[0].string_values().collect();
    assert_eq!(strings, vec!["★", "b"]);
}
