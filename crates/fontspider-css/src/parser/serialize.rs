//! [§ 9 Serialization](https://www.w3.org/TR/css-syntax-3/#serialization)
//!
//! Writes component values back out as CSS text. This is not a round-trip
//! serializer: whitespace collapses to one space and strings are always
//! quoted with `"`.

use super::rules::ComponentValue;
use crate::tokenizer::CSSToken;
use crate::tokenizer::core::is_ident_code_point;

/// Serialize a list of component values, trimmed.
#[must_use]
pub fn serialize_component_values(values: &[ComponentValue]) -> String {
    let mut out = String::new();
    write_values(values, &mut out);
    out.trim().to_string()
}

fn write_values(values: &[ComponentValue], out: &mut String) {
    for value in values {
        match value {
            ComponentValue::Token(token) => write_token(token, out),
            ComponentValue::Function { name, value } => {
                write_identifier(name, out);
                out.push('(');
                write_values(value, out);
                out.push(')');
            }
            ComponentValue::Block { token, value } => {
                let close = match token {
                    '[' => ']',
                    '(' => ')',
                    _ => '}',
                };
                out.push(*token);
                write_values(value, out);
                out.push(close);
            }
        }
    }
}

fn write_token(token: &CSSToken, out: &mut String) {
    match token {
        CSSToken::Ident(name) => write_identifier(name, out),
        CSSToken::Function(name) => {
            write_identifier(name, out);
            out.push('(');
        }
        CSSToken::AtKeyword(name) => {
            out.push('@');
            write_identifier(name, out);
        }
        CSSToken::Hash(value) => {
            out.push('#');
            write_name(value, out);
        }
        CSSToken::String(value) => write_string(value, out),
        CSSToken::Url(value) => {
            out.push_str("url(");
            for c in value.chars() {
                if matches!(c, '(' | ')' | '"' | '\'' | '\\') || c.is_whitespace() {
                    out.push('\\');
                }
                out.push(c);
            }
            out.push(')');
        }
        CSSToken::BadString | CSSToken::BadUrl => {}
        CSSToken::Delim(c) => out.push(*c),
        CSSToken::Number { repr, .. } => out.push_str(repr),
        CSSToken::Percentage { repr, .. } => {
            out.push_str(repr);
            out.push('%');
        }
        CSSToken::Dimension { repr, unit, .. } => {
            out.push_str(repr);
            write_name(unit, out);
        }
        CSSToken::Whitespace => {
            if !out.is_empty() && !out.ends_with(' ') {
                out.push(' ');
            }
        }
        CSSToken::Cdo => out.push_str("<!--"),
        CSSToken::Cdc => out.push_str("-->"),
        CSSToken::Colon => out.push(':'),
        CSSToken::Semicolon => out.push(';'),
        CSSToken::Comma => out.push(','),
        CSSToken::LeftBracket => out.push('['),
        CSSToken::RightBracket => out.push(']'),
        CSSToken::LeftParen => out.push('('),
        CSSToken::RightParen => out.push(')'),
        CSSToken::LeftBrace => out.push('{'),
        CSSToken::RightBrace => out.push('}'),
        CSSToken::Eof => {}
    }
}

/// [CSSOM § 2.1 serialize an identifier](https://drafts.csswg.org/cssom/#serialize-an-identifier)
///
/// A digit that would start the identifier is written as a hex escape.
fn write_identifier(name: &str, out: &mut String) {
    let mut chars = name.chars().peekable();
    if chars.next_if_eq(&'-').is_some() {
        out.push('-');
    }
    if let Some(digit) = chars.next_if(char::is_ascii_digit) {
        out.push_str(&format!("\\{:x} ", u32::from(digit)));
    }
    for c in chars {
        push_name_code_point(c, out);
    }
}

/// Serialize the rest of a name, where any ident code point may lead.
fn write_name(name: &str, out: &mut String) {
    for c in name.chars() {
        push_name_code_point(c, out);
    }
}

fn push_name_code_point(c: char, out: &mut String) {
    if !is_ident_code_point(c) {
        out.push('\\');
    }
    out.push(c);
}

/// [CSSOM § 2.1 serialize a string](https://drafts.csswg.org/cssom/#serialize-a-string)
fn write_string(value: &str, out: &mut String) {
    out.push('"');
    for c in value.chars() {
        match c {
            '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\a "),
            c => out.push(c),
        }
    }
    out.push('"');
}
