//! CSS Parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
//!
//! "The input to the parsing stage is a stream of tokens from the tokenization stage."
//!
//! Recovery follows the specification except where a stylesheet is
//! structurally broken: a block left open at EOF, an unclosed function or
//! bracket, and a `}` with no block to close are reported as
//! [`CssParseError`]s instead of being silently repaired.

use super::rules::{AtRule, AtRuleBlock, ComponentValue, Declaration, Rule, Selector, StyleRule, Stylesheet};
use super::serialize::serialize_component_values;
use crate::error::{CssErrorKind, CssParseError};
use crate::tokenizer::{CSSToken, SourceLocation, SpannedToken};

/// At-rules whose block is a list of declarations.
const DECLARATION_AT_RULES: &[&str] = &[
    "font-face",
    "page",
    "counter-style",
    "font-palette-values",
    "property",
    "viewport",
];

/// At-rules whose block is a list of rules.
///
/// [CSS Conditional Rules § 2](https://www.w3.org/TR/css-conditional-3/#processing)
const GROUPING_AT_RULES: &[&str] = &[
    "media",
    "supports",
    "layer",
    "container",
    "document",
    "-moz-document",
    "scope",
    "starting-style",
];

static EOF_TOKEN: CSSToken = CSSToken::Eof;

/// CSS parser
pub struct CSSParser {
    tokens: Vec<SpannedToken>,
    position: usize,
}

impl CSSParser {
    /// Create a new parser from a list of tokens.
    #[must_use]
    pub const fn new(tokens: Vec<SpannedToken>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
    ///
    /// "To parse a stylesheet from input..."
    ///
    /// # Errors
    ///
    /// Returns the first structural error: an unclosed block or bracket, or
    /// a stray `}` at the top level.
    pub fn parse_stylesheet(&mut self) -> Result<Stylesheet, CssParseError> {
        // "Consume a list of rules from input, with the top-level flag set."
        let rules = self.consume_list_of_rules(true)?;
        Ok(Stylesheet { rules })
    }

    /// [§ 5.3.8 Parse a list of declarations](https://www.w3.org/TR/css-syntax-3/#parse-list-of-declarations)
    ///
    /// Parse declarations from a `style` attribute or similar.
    ///
    /// # Errors
    ///
    /// Returns an error for a block or bracket left open at EOF.
    pub fn parse_declaration_list(&mut self) -> Result<Vec<Declaration>, CssParseError> {
        self.consume_list_of_declarations(false)
    }

    /// [§ 5.4.1 Consume a list of rules](https://www.w3.org/TR/css-syntax-3/#consume-list-of-rules)
    ///
    /// A nested list stops in front of the `}` that closes it.
    fn consume_list_of_rules(&mut self, top_level: bool) -> Result<Vec<Rule>, CssParseError> {
        // "Create an initially empty list of rules."
        let mut rules = Vec::new();

        loop {
            // "<whitespace-token>: Do nothing."
            self.skip_whitespace();

            match self.peek() {
                // "<EOF-token>: Return the list of rules."
                CSSToken::Eof => return Ok(rules),

                CSSToken::RightBrace => {
                    if top_level {
                        return Err(self.error(CssErrorKind::UnexpectedCloseBrace));
                    }
                    return Ok(rules);
                }

                // "<CDO-token> or <CDC-token>: If the top-level flag is set, do nothing."
                CSSToken::Cdo | CSSToken::Cdc if top_level => self.advance(),

                // "<at-keyword-token>: Reconsume the current input token. Consume an
                // at-rule, and append the returned value to the list of rules."
                CSSToken::AtKeyword(name) => {
                    let name = name.clone();
                    rules.push(Rule::At(self.consume_at_rule(name)?));
                }

                // "anything else: Reconsume the current input token. Consume a
                // qualified rule. If anything is returned, append it to the list of
                // rules."
                _ => {
                    if let Some(rule) = self.consume_qualified_rule(top_level)? {
                        rules.push(Rule::Style(rule));
                    }
                }
            }
        }
    }

    /// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule)
    ///
    /// Called with the at-keyword as the next token.
    fn consume_at_rule(&mut self, name: String) -> Result<AtRule, CssParseError> {
        let location = self.location();
        self.advance();

        // "Create a new at-rule with its name set to the value of the current input
        // token, its prelude initially set to an empty list, and its value initially
        // set to nothing."
        let mut prelude = Vec::new();

        loop {
            match self.peek() {
                // "<semicolon-token>: Return the at-rule."
                CSSToken::Semicolon => {
                    self.advance();
                    break;
                }

                // "<EOF-token>: This is a parse error. Return the at-rule."
                // A `}` ends the enclosing block and is left for its owner.
                CSSToken::Eof | CSSToken::RightBrace => break,

                // "<{-token>: Consume a simple block and assign it to the at-rule's
                // block. Return the at-rule."
                CSSToken::LeftBrace => {
                    let block = self.consume_at_rule_block(&name)?;
                    return Ok(AtRule {
                        name,
                        prelude: trim_whitespace(prelude),
                        block: Some(block),
                        location,
                    });
                }

                // "anything else: Reconsume the current input token. Consume a
                // component value. Append the returned value to the at-rule's prelude."
                _ => prelude.push(self.consume_component_value()?),
            }
        }

        Ok(AtRule {
            name,
            prelude: trim_whitespace(prelude),
            block: None,
            location,
        })
    }

    /// Consume the `{}` block of an at-rule, parsing its contents according
    /// to the kind of at-rule.
    fn consume_at_rule_block(&mut self, name: &str) -> Result<AtRuleBlock, CssParseError> {
        let open = self.location();
        self.advance();

        let name = name.to_ascii_lowercase();
        let block = if DECLARATION_AT_RULES.contains(&name.as_str()) {
            AtRuleBlock::Declarations(self.consume_list_of_declarations(true)?)
        } else if GROUPING_AT_RULES.contains(&name.as_str()) {
            AtRuleBlock::Rules(self.consume_list_of_rules(false)?)
        } else {
            let mut value = Vec::new();
            while !matches!(self.peek(), CSSToken::RightBrace | CSSToken::Eof) {
                value.push(self.consume_component_value()?);
            }
            AtRuleBlock::Raw(value)
        };

        self.expect_close_brace(open)?;
        Ok(block)
    }

    /// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
    fn consume_qualified_rule(&mut self, top_level: bool) -> Result<Option<StyleRule>, CssParseError> {
        let location = self.location();

        // "Create a new qualified rule with its prelude initially set to an empty list,
        // and its value initially set to nothing."
        let mut prelude = Vec::new();

        loop {
            match self.peek() {
                // "<EOF-token>: This is a parse error. Return nothing."
                CSSToken::Eof => return Ok(None),

                CSSToken::RightBrace => {
                    if top_level {
                        return Err(self.error(CssErrorKind::UnexpectedCloseBrace));
                    }
                    return Ok(None);
                }

                // "<{-token>: Consume a simple block and assign it to the qualified
                // rule's block. Return the qualified rule."
                CSSToken::LeftBrace => {
                    let open = self.location();
                    self.advance();
                    let declarations = self.consume_list_of_declarations(true)?;
                    self.expect_close_brace(open)?;

                    return Ok(Some(StyleRule {
                        selectors: split_selector_list(&prelude),
                        declarations,
                        location,
                    }));
                }

                // "anything else: Reconsume the current input token. Consume a
                // component value. Append the returned value to the qualified rule's
                // prelude."
                _ => prelude.push(self.consume_component_value()?),
            }
        }
    }

    /// [§ 5.4.5 Consume a list of declarations](https://www.w3.org/TR/css-syntax-3/#consume-list-of-declarations)
    ///
    /// Inside a block the list stops in front of the closing `}`. Outside one
    /// (a `style` attribute) a stray `}` is skipped.
    fn consume_list_of_declarations(&mut self, in_block: bool) -> Result<Vec<Declaration>, CssParseError> {
        let mut declarations = Vec::new();

        loop {
            match self.peek() {
                // "<whitespace-token> or <semicolon-token>: Do nothing."
                CSSToken::Whitespace | CSSToken::Semicolon => self.advance(),

                // "<EOF-token>: Return the list of declarations."
                CSSToken::Eof => return Ok(declarations),

                CSSToken::RightBrace => {
                    if in_block {
                        return Ok(declarations);
                    }
                    self.advance();
                }

                // "<at-keyword-token>: Reconsume the current input token. Consume an
                // at-rule."
                CSSToken::AtKeyword(name) => {
                    let name = name.clone();
                    let _ = self.consume_at_rule(name)?;
                }

                // "<ident-token>: Consume a declaration. If anything was returned,
                // append it to the list of declarations."
                CSSToken::Ident(name) => {
                    let name = name.to_ascii_lowercase();
                    if let Some(declaration) = self.consume_declaration(name)? {
                        declarations.push(declaration);
                    }
                }

                // "anything else: This is a parse error. Reconsume the current input
                // token. As long as the next input token is anything other than a
                // <semicolon-token> or <EOF-token>, consume a component value and
                // throw away the returned value."
                //
                // A nested rule ends with its `{}` block.
                _ => loop {
                    match self.peek() {
                        CSSToken::Semicolon | CSSToken::RightBrace | CSSToken::Eof => break,
                        CSSToken::LeftBrace => {
                            let _ = self.consume_component_value()?;
                            break;
                        }
                        _ => {
                            let _ = self.consume_component_value()?;
                        }
                    }
                },
            }
        }
    }

    /// [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
    ///
    /// Called with the property name as the next token.
    fn consume_declaration(&mut self, name: String) -> Result<Option<Declaration>, CssParseError> {
        self.advance();

        // "While the next input token is a <whitespace-token>, consume the next input token."
        self.skip_whitespace();

        // "If the next input token is anything other than a <colon-token>, this is a
        // parse error. Return nothing."
        if self.peek() != &CSSToken::Colon {
            return Ok(None);
        }
        self.advance();
        self.skip_whitespace();

        // "As long as the next input token is anything other than an <EOF-token>,
        // consume a component value and append it to the declaration's value."
        let mut value = Vec::new();
        while !matches!(
            self.peek(),
            CSSToken::Eof | CSSToken::Semicolon | CSSToken::RightBrace
        ) {
            value.push(self.consume_component_value()?);
        }

        let important = check_important(&value);
        let value = trim_important(value);

        Ok(Some(Declaration {
            name,
            value,
            important,
        }))
    }

    /// [§ 5.4.9 Consume a component value](https://www.w3.org/TR/css-syntax-3/#consume-component-value)
    fn consume_component_value(&mut self) -> Result<ComponentValue, CssParseError> {
        let open = self.location();
        match self.next_token() {
            // "<{-token>, <[-token>, <(-token>: Consume a simple block and return it."
            CSSToken::LeftBrace => Ok(ComponentValue::Block {
                token: '{',
                value: self.consume_simple_block(&CSSToken::RightBrace, open, CssErrorKind::UnclosedBlock)?,
            }),
            CSSToken::LeftBracket => Ok(ComponentValue::Block {
                token: '[',
                value: self.consume_simple_block(&CSSToken::RightBracket, open, CssErrorKind::UnclosedBracket)?,
            }),
            CSSToken::LeftParen => Ok(ComponentValue::Block {
                token: '(',
                value: self.consume_simple_block(&CSSToken::RightParen, open, CssErrorKind::UnclosedBracket)?,
            }),

            // "<function-token>: Consume a function and return it."
            CSSToken::Function(name) => Ok(ComponentValue::Function {
                name,
                value: self.consume_simple_block(&CSSToken::RightParen, open, CssErrorKind::UnclosedBracket)?,
            }),

            // "anything else: Return the current input token."
            token => Ok(ComponentValue::Token(token)),
        }
    }

    /// [§ 5.4.8 Consume a simple block](https://www.w3.org/TR/css-syntax-3/#consume-simple-block)
    ///
    /// Called after the opening token. "<EOF-token>: This is a parse error."
    fn consume_simple_block(
        &mut self,
        ending: &CSSToken,
        open: SourceLocation,
        unclosed: CssErrorKind,
    ) -> Result<Vec<ComponentValue>, CssParseError> {
        let mut value = Vec::new();
        loop {
            let token = self.peek();
            if token == ending {
                self.advance();
                return Ok(value);
            }
            if token.is_eof() {
                return Err(CssParseError::new(unclosed, open));
            }
            value.push(self.consume_component_value()?);
        }
    }

    fn expect_close_brace(&mut self, open: SourceLocation) -> Result<(), CssParseError> {
        if self.peek() == &CSSToken::RightBrace {
            self.advance();
            Ok(())
        } else {
            Err(CssParseError::new(CssErrorKind::UnclosedBlock, open))
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_whitespace() {
            self.advance();
        }
    }

    fn error(&self, kind: CssErrorKind) -> CssParseError {
        CssParseError::new(kind, self.location())
    }

    fn location(&self) -> SourceLocation {
        self.tokens
            .get(self.position)
            .or_else(|| self.tokens.last())
            .map_or_else(SourceLocation::default, |token| token.location)
    }

    fn peek(&self) -> &CSSToken {
        self.tokens
            .get(self.position)
            .map_or(&EOF_TOKEN, |token| &token.token)
    }

    fn next_token(&mut self) -> CSSToken {
        let token = self.peek().clone();
        self.advance();
        token
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }
}

/// [§ 5.1 Selector Lists](https://www.w3.org/TR/selectors-4/#selector-list)
///
/// "A selector list is a comma-separated list of selectors." Commas inside
/// functions and blocks, as in `:is(a, b)`, do not split.
fn split_selector_list(prelude: &[ComponentValue]) -> Vec<Selector> {
    prelude
        .split(|value| matches!(value, ComponentValue::Token(CSSToken::Comma)))
        .map(serialize_component_values)
        .filter(|text| !text.is_empty())
        .map(|text| Selector { text })
        .collect()
}

fn trim_whitespace(mut values: Vec<ComponentValue>) -> Vec<ComponentValue> {
    while matches!(values.last(), Some(ComponentValue::Token(CSSToken::Whitespace))) {
        let _ = values.pop();
    }
    let leading = values
        .iter()
        .take_while(|value| matches!(value, ComponentValue::Token(CSSToken::Whitespace)))
        .count();
    let _ = values.drain(..leading);
    values
}

/// [§ 6.4.2 Important declarations](https://www.w3.org/TR/css-cascade-4/#importance)
///
/// "A declaration is important if it has a !important annotation, i.e.
/// if the last two (non-whitespace, non-comment) tokens in its value are
/// a <delim-token> with the value "!" followed by an <ident-token> with
/// a value that is an ASCII case-insensitive match for "important"."
fn check_important(value: &[ComponentValue]) -> bool {
    let mut iter = value
        .iter()
        .rev()
        .filter(|value| !matches!(value, ComponentValue::Token(CSSToken::Whitespace)));

    matches!(
        iter.next(),
        Some(ComponentValue::Token(CSSToken::Ident(s))) if s.eq_ignore_ascii_case("important")
    ) && matches!(iter.next(), Some(ComponentValue::Token(CSSToken::Delim('!'))))
}

/// Remove trailing whitespace and `!important` from a declaration value.
fn trim_important(value: Vec<ComponentValue>) -> Vec<ComponentValue> {
    let mut value = trim_whitespace(value);
    if check_important(&value) {
        // "important", the whitespace before it, then "!".
        let _ = value.pop();
        value = trim_whitespace(value);
        let _ = value.pop();
    }
    trim_whitespace(value)
}
