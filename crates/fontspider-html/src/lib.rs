//! HTML tokenizer and parser for fontspider.
//!
//! # Scope
//!
//! Static sites are read to find stylesheets and the text under selected
//! elements, so this crate builds a tree that agrees with browsers on the
//! things that decide *what text is where*:
//!
//! - **HTML Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - Data, RCDATA, RAWTEXT, script data and PLAINTEXT content
//!   - Tags, attributes, comments, DOCTYPE
//!   - Numeric and common named character references
//!
//! - **HTML Parser / Tree Builder** ([WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction))
//!   - Insertion modes: Initial, BeforeHtml, BeforeHead, InHead, AfterHead, InBody, Text, AfterBody
//!   - Implied `html`/`head`/`body`, void elements, implied end tags
//!
//! # Not Implemented
//!
//! - Table insertion modes and foster parenting (table content is nested
//!   as written)
//! - The adoption agency algorithm (misnested formatting tags close at the
//!   first matching end tag)
//! - Foreign content attribute adjustment

/// HTML parser and tree construction.
pub mod parser;
/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;

use fontspider_dom::DomTree;

pub use parser::{HTMLParser, InsertionMode, ParseIssue};
pub use tokenizer::{Attribute, HTMLTokenizer, Token};

/// Tokenize and parse `html` into a document tree.
///
/// Parsing HTML never fails; malformed markup is recovered the way a
/// browser would recover it.
#[must_use]
pub fn parse_document(html: &str) -> DomTree {
    let mut tokenizer = HTMLTokenizer::new(html.to_string());
    tokenizer.run();
    HTMLParser::new(tokenizer.into_tokens()).run()
}
