//! Integration tests for the CSS tokenizer.

use fontspider_css::error::CssErrorKind;
use fontspider_css::tokenizer::{CSSToken, CSSTokenizer, SourceLocation, SpannedToken};

/// Helper to tokenize a string and return the tokens
fn tokenize(input: &str) -> Vec<CSSToken> {
    spanned(input).into_iter().map(|t| t.token).collect()
}

fn spanned(input: &str) -> Vec<SpannedToken> {
    let mut tokenizer = CSSTokenizer::new(input);
    tokenizer.run();
    tokenizer.into_tokens()
}

fn error_kinds(input: &str) -> Vec<(CssErrorKind, SourceLocation)> {
    let mut tokenizer = CSSTokenizer::new(input);
    tokenizer.run();
    tokenizer.errors().iter().map(|e| (e.kind, e.location)).collect()
}

#[test]
fn test_whitespace() {
    let tokens = tokenize("   \t\n  ");
    assert_eq!(tokens, vec![CSSToken::Whitespace, CSSToken::Eof]);
}

#[test]
fn test_idents_functions_at_keywords() {
    let tokens = tokenize("font-family format( @font-face _x");
    assert_eq!(
        tokens,
        vec![
            CSSToken::Ident("font-family".to_string()),
            CSSToken::Whitespace,
            CSSToken::Function("format".to_string()),
            CSSToken::Whitespace,
            CSSToken::AtKeyword("font-face".to_string()),
            CSSToken::Whitespace,
            CSSToken::Ident("_x".to_string()),
            CSSToken::Eof,
        ]
    );
}

#[test]
fn test_hash_and_lone_number_sign() {
    assert_eq!(tokenize("#fff")[0], CSSToken::Hash("fff".to_string()));
    assert_eq!(tokenize("# ")[0], CSSToken::Delim('#'));
}

#[test]
fn test_numbers_keep_their_representation() {
    let tokens = tokenize("1.50px 10% +3 1e3");
    assert_eq!(
        tokens[0],
        CSSToken::Dimension {
            value: 1.5,
            repr: "1.50".to_string(),
            unit: "px".to_string(),
        }
    );
    assert_eq!(
        tokens[2],
        CSSToken::Percentage {
            value: 10.0,
            repr: "10".to_string(),
        }
    );
    assert_eq!(
        tokens[4],
        CSSToken::Number {
            value: 3.0,
            repr: "+3".to_string(),
        }
    );
    assert_eq!(
        tokens[6],
        CSSToken::Number {
            value: 1000.0,
            repr: "1e3".to_string(),
        }
    );
}

#[test]
fn test_strings_resolve_escapes() {
    let tokens = tokenize(r#""a\"b" 'c\41 d'"#);
    assert_eq!(tokens[0], CSSToken::String("a\"b".to_string()));
    assert_eq!(tokens[2], CSSToken::String("cAd".to_string()));
}

#[test]
fn test_newline_in_string_is_bad_string() {
    let tokens = tokenize("'abc\n");
    assert_eq!(tokens[0], CSSToken::BadString);
    assert_eq!(tokens[1], CSSToken::Whitespace);
}

#[test]
fn test_unquoted_url_is_one_token() {
    assert_eq!(tokenize("url( foo.ttf )")[0], CSSToken::Url("foo.ttf".to_string()));
    assert_eq!(tokenize("URL(a.woff?v=1#x)")[0], CSSToken::Url("a.woff?v=1#x".to_string()));
}

#[test]
fn test_quoted_url_is_a_function() {
    let tokens = tokenize("url(\"foo.ttf\")");
    assert_eq!(
        tokens,
        vec![
            CSSToken::Function("url".to_string()),
            CSSToken::String("foo.ttf".to_string()),
            CSSToken::RightParen,
            CSSToken::Eof,
        ]
    );
}

#[test]
fn test_cdo_cdc() {
    assert_eq!(
        tokenize("<!-- -->"),
        vec![CSSToken::Cdo, CSSToken::Whitespace, CSSToken::Cdc, CSSToken::Eof]
    );
}

#[test]
fn test_comments_are_skipped() {
    let tokens = spanned("/* x */a");
    assert_eq!(tokens[0].token, CSSToken::Ident("a".to_string()));
    assert_eq!(tokens[0].location, SourceLocation::new(1, 8));
}

#[test]
fn test_locations_are_one_based() {
    let tokens = spanned("a {\n  color: red;\n}");
    let located: Vec<(CSSToken, usize, usize)> = tokens
        .into_iter()
        .map(|t| (t.token, t.location.line, t.location.column))
        .collect();
    assert_eq!(located[0], (CSSToken::Ident("a".to_string()), 1, 1));
    assert_eq!(located[2], (CSSToken::LeftBrace, 1, 3));
    assert_eq!(located[4], (CSSToken::Ident("color".to_string()), 2, 3));
    assert_eq!(located[5], (CSSToken::Colon, 2, 8));
    assert_eq!(located[7], (CSSToken::Ident("red".to_string()), 2, 10));
    assert_eq!(located[10], (CSSToken::RightBrace, 3, 1));
    assert_eq!(located[11], (CSSToken::Eof, 3, 2));
}

#[test]
fn test_crlf_counts_as_one_line_break() {
    let tokens = spanned("a\r\nb");
    assert_eq!(tokens[2].token, CSSToken::Ident("b".to_string()));
    assert_eq!(tokens[2].location, SourceLocation::new(2, 1));
}

#[test]
fn test_unclosed_constructs_are_recorded() {
    assert_eq!(
        error_kinds("a /* open"),
        vec![(CssErrorKind::UnclosedComment, SourceLocation::new(1, 3))]
    );
    assert_eq!(
        error_kinds("\"abc"),
        vec![(CssErrorKind::UnclosedString, SourceLocation::new(1, 1))]
    );
    assert_eq!(
        error_kinds("x url(foo"),
        vec![(CssErrorKind::UnclosedUrl, SourceLocation::new(1, 3))]
    );
    assert!(error_kinds("a { b: 'c' }").is_empty());
}
