//! Helper functions for the HTML tokenizer.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! - State transitions ("Switch to", "Reconsume in")
//! - Input handling ("Consume the next input character", lookahead)
//! - Token emission, including the tokenizer state switches that tree
//!   construction would request for raw text elements
//! - Mutation of the current tag or comment token

use super::core::{HTMLTokenizer, TokenizerState};
use super::token::Token;

// =============================================================================
// State Transition Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Switch to the X state"
    pub(super) const fn switch_to(&mut self, new_state: TokenizerState) {
        self.state = new_state;
    }

    /// "Reconsume in the X state"
    ///
    /// The current character is processed again by the new state.
    pub(super) const fn reconsume_in(&mut self, new_state: TokenizerState) {
        self.reconsume = true;
        self.state = new_state;
    }
}

// =============================================================================
// Input/Character Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Consume the next input character"
    pub(super) fn consume(&mut self) -> Option<char> {
        let c = self.input[self.current_pos..].chars().next()?;
        self.current_pos += c.len_utf8();
        Some(c)
    }

    /// Peek at a codepoint at the given offset from the current position
    /// without consuming it.
    #[must_use]
    pub fn peek_codepoint(&self, offset: usize) -> Option<char> {
        self.input[self.current_pos..].chars().nth(offset)
    }

    /// "If the next few characters are..."
    #[must_use]
    pub fn next_few_characters_are(&self, target: &str) -> bool {
        self.input[self.current_pos..].starts_with(target)
    }

    /// "ASCII case-insensitive match for the word 'DOCTYPE'"
    #[must_use]
    pub fn next_few_characters_are_case_insensitive(&self, target: &str) -> bool {
        self.input
            .get(self.current_pos..self.current_pos + target.len())
            .is_some_and(|next| next.eq_ignore_ascii_case(target))
    }

    /// Consume an ASCII string the caller has already matched.
    pub(super) const fn consume_string(&mut self, target: &str) {
        self.current_pos += target.len();
    }

    /// [ASCII whitespace](https://infra.spec.whatwg.org/#ascii-whitespace)
    /// without U+000D, which input preprocessing has already removed.
    pub(super) const fn is_whitespace_char(input_char: char) -> bool {
        matches!(input_char, ' ' | '\t' | '\n' | '\x0C')
    }
}

// =============================================================================
// Token Emission Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Emit the current token"
    ///
    /// The tree construction stage switches the tokenizer into a text state
    /// after certain start tags. The tokenizer runs ahead of the parser here,
    /// so the switch happens as the start tag is emitted:
    ///
    /// - [§ 13.2.6.2](https://html.spec.whatwg.org/multipage/parsing.html#generic-rcdata-element-parsing-algorithm)
    ///   `title`, `textarea`: "Switch the tokenizer to the RCDATA state."
    /// - [§ 13.2.6.3](https://html.spec.whatwg.org/multipage/parsing.html#generic-raw-text-element-parsing-algorithm)
    ///   `style`, `xmp`, `iframe`, `noembed`, `noframes`: "Switch the tokenizer to the RAWTEXT state."
    /// - `script`: "Switch the tokenizer to the script data state."
    /// - `plaintext`: "Switch the tokenizer to the PLAINTEXT state."
    pub(super) fn emit_token(&mut self) {
        self.drop_discarded_attribute();
        let Some(token) = self.current_token.take() else {
            return;
        };
        if let Token::StartTag { name, .. } = &token {
            self.last_start_tag_name = Some(name.clone());
            match name.as_str() {
                "title" | "textarea" => self.switch_to(TokenizerState::Rcdata),
                "style" | "xmp" | "iframe" | "noembed" | "noframes" => {
                    self.switch_to(TokenizerState::Rawtext);
                }
                "script" => self.switch_to(TokenizerState::ScriptData),
                "plaintext" => self.switch_to(TokenizerState::Plaintext),
                _ => {}
            }
        }
        self.token_stream.push(token);
    }

    /// "Emit the current input character as a character token."
    pub(super) fn emit_character_token(&mut self, c: char) {
        self.token_stream.push(Token::Character { data: c });
    }

    /// Emit one character token per character of `text`.
    pub(super) fn emit_character_tokens(&mut self, text: &str) {
        self.token_stream
            .extend(text.chars().map(|c| Token::Character { data: c }));
    }

    /// "Emit an end-of-file token."
    pub(super) fn emit_eof_token(&mut self) {
        self.token_stream.push(Token::EndOfFile);
        self.at_eof = true;
    }

    /// "EOF - This is an eof-in-tag parse error. Emit an end-of-file token."
    ///
    /// The unfinished tag is dropped.
    pub(super) fn emit_eof_in_tag(&mut self) {
        self.log_parse_error("eof-in-tag");
        self.current_token = None;
        self.discard_attribute = false;
        self.emit_eof_token();
    }

    /// "EOF - This is an eof-in-comment parse error. Emit the current comment
    /// token. Emit an end-of-file token."
    pub(super) fn emit_unterminated_comment(&mut self) {
        self.log_parse_error("eof-in-comment");
        self.emit_token();
        self.emit_eof_token();
    }
}

// =============================================================================
// RCDATA/RAWTEXT Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "An appropriate end tag token is an end tag token whose tag name matches
    /// the tag name of the last start tag to have been emitted from this
    /// tokenizer, if any."
    pub(super) fn is_appropriate_end_tag_token(&self) -> bool {
        match (&self.last_start_tag_name, &self.current_token) {
            (Some(last_start_tag), Some(Token::EndTag { name })) => name == last_start_tag,
            _ => false,
        }
    }

    /// "Emit a U+003C LESS-THAN SIGN character token, a U+002F SOLIDUS character
    /// token, and a character token for each of the characters in the temporary
    /// buffer... Reconsume in the RCDATA state."
    pub(super) fn emit_raw_end_tag_name_anything_else(&mut self) {
        self.emit_character_token('<');
        self.emit_character_token('/');
        let buffer = std::mem::take(&mut self.temporary_buffer);
        self.emit_character_tokens(&buffer);
        self.current_token = None;
        self.reconsume_in(self.raw_state);
    }
}

// =============================================================================
// Current Token Helpers
// =============================================================================

impl HTMLTokenizer {
    pub(super) fn append_to_tag_name(&mut self, c: char) {
        if let Some(token) = self.current_token.as_mut() {
            token.append_to_tag_name(c);
        }
    }

    pub(super) fn start_new_attribute(&mut self) {
        self.drop_discarded_attribute();
        if let Some(token) = self.current_token.as_mut() {
            token.start_new_attribute();
        }
    }

    pub(super) fn append_to_attribute_name(&mut self, c: char) {
        if let Some(token) = self.current_token.as_mut() {
            token.append_to_current_attribute_name(c);
        }
    }

    pub(super) fn append_to_attribute_value(&mut self, text: &str) {
        if self.discard_attribute {
            return;
        }
        if let Some(token) = self.current_token.as_mut() {
            token.append_to_current_attribute_value(text);
        }
    }

    pub(super) fn append_to_comment(&mut self, text: &str) {
        if let Some(token) = self.current_token.as_mut() {
            token.append_to_comment(text);
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    ///
    /// "When the user agent leaves the attribute name state ... if there is
    /// already an attribute on the token with the exact same name, then this is
    /// a duplicate-attribute parse error and the new attribute must be removed
    /// from the token."
    ///
    /// The duplicate is only marked here. Its value states still run, and
    /// [`drop_discarded_attribute`](Self::drop_discarded_attribute) removes it
    /// once the next attribute starts or the tag is emitted.
    pub(super) fn check_duplicate_attribute(&mut self) {
        let duplicate = self
            .current_token
            .as_ref()
            .is_some_and(Token::has_duplicate_attribute);
        if duplicate {
            self.discard_attribute = true;
            self.log_parse_error("duplicate-attribute");
        }
    }

    pub(super) fn drop_discarded_attribute(&mut self) {
        if !std::mem::take(&mut self.discard_attribute) {
            return;
        }
        if let Some(token) = self.current_token.as_mut() {
            token.remove_current_attribute();
        }
    }
}

// =============================================================================
// Parse Errors
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
    ///
    /// Parse errors in HTML are not fatal; the tokenizer recovers and
    /// continues. They are kept for inspection rather than printed, since
    /// generated sites routinely contain thousands of harmless ones.
    pub(super) fn log_parse_error(&mut self, code: &'static str) {
        self.errors.push((self.current_pos, code));
    }
}
