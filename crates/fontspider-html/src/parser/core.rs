use strum_macros::Display;

use fontspider_dom::{AttributesMap, DomTree, ElementData, NodeId, NodeType};

use crate::tokenizer::{Attribute, Token};

/// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
///
/// "The insertion mode is a state variable that controls the primary operation
/// of the tree construction stage."
///
/// Only the modes that decide where text lands are modelled. Table, select
/// and frameset content is built through the "in body" rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum InsertionMode {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    Initial,
    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    BeforeHtml,
    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    BeforeHead,
    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    InHead,
    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    AfterHead,
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    InBody,
    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    Text,
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    AfterBody,
    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    AfterAfterBody,
}

/// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
///
/// A recovered problem in the token stream. Parsing never stops on one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// What was wrong.
    pub message: String,
    /// Index into the token stream where this was encountered.
    pub token_index: usize,
    /// `true` for a parse error as the standard defines it, `false` for
    /// markup this builder handles in a simplified way.
    pub is_error: bool,
}

/// Elements whose start tag closes an open `p` in button scope.
const CLOSES_P: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "center",
    "details",
    "dialog",
    "dir",
    "div",
    "dl",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "header",
    "hgroup",
    "main",
    "menu",
    "nav",
    "ol",
    "p",
    "search",
    "section",
    "summary",
    "ul",
];

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// [§ 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "keygen", "link", "meta", "param",
    "source", "track", "wbr",
];

const HEAD_ELEMENTS: &[&str] = &[
    "base", "basefont", "bgsound", "link", "meta", "noframes", "script", "style", "template",
    "title",
];

const TABLE_SECTIONS: &[&str] = &["tbody", "tfoot", "thead"];
const TABLE_CELLS: &[&str] = &["td", "th"];

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
///
/// Builds a [`DomTree`] from the token stream of an
/// [`HTMLTokenizer`](crate::HTMLTokenizer).
pub struct HTMLParser {
    /// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
    insertion_mode: InsertionMode,

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#original-insertion-mode)
    ///
    /// Where the "text" mode returns to.
    original_insertion_mode: Option<InsertionMode>,

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#stack-of-template-insertion-modes)
    ///
    /// The mode to restore when each open `template` closes.
    template_insertion_modes: Vec<InsertionMode>,

    /// [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    stack_of_open_elements: Vec<NodeId>,

    /// [§ 13.2.4.4 The element pointers](https://html.spec.whatwg.org/multipage/parsing.html#the-element-pointers)
    head_element_pointer: Option<NodeId>,

    /// Set after `pre`, `listing` and `textarea` start tags: "If the next
    /// token is a U+000A LINE FEED (LF) character token, then ignore that
    /// token and move on to the next one."
    ignore_next_line_feed: bool,

    tree: DomTree,
    tokens: Vec<Token>,
    token_index: usize,
    stopped: bool,
    issues: Vec<ParseIssue>,
}

impl HTMLParser {
    /// Create a new parser from a token stream.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            insertion_mode: InsertionMode::Initial,
            original_insertion_mode: None,
            template_insertion_modes: Vec::new(),
            stack_of_open_elements: Vec::new(),
            head_element_pointer: None,
            ignore_next_line_feed: false,
            tree: DomTree::new(),
            tokens,
            token_index: 0,
            stopped: false,
            issues: Vec::new(),
        }
    }

    /// Parse issues recorded so far.
    #[must_use]
    pub fn get_issues(&self) -> &[ParseIssue] {
        &self.issues
    }

    /// Run the parser and return the document tree.
    #[must_use]
    pub fn run(self) -> DomTree {
        self.run_with_issues().0
    }

    /// Run the parser and return the tree together with every issue found.
    #[must_use]
    pub fn run_with_issues(mut self) -> (DomTree, Vec<ParseIssue>) {
        while !self.stopped && self.token_index < self.tokens.len() {
            let token = self.tokens[self.token_index].clone();
            self.process_token(&token);
            self.token_index += 1;
        }
        (self.tree, self.issues)
    }

    fn parse_error(&mut self, message: &str) {
        self.issues.push(ParseIssue {
            message: message.to_string(),
            token_index: self.token_index,
            is_error: true,
        });
    }

    fn parse_warning(&mut self, message: &str) {
        self.issues.push(ParseIssue {
            message: message.to_string(),
            token_index: self.token_index,
            is_error: false,
        });
    }

    /// [§ 13.2.6 Tree construction dispatcher](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction-dispatcher)
    fn process_token(&mut self, token: &Token) {
        if std::mem::take(&mut self.ignore_next_line_feed)
            && matches!(token, Token::Character { data: '\n' })
        {
            return;
        }
        match self.insertion_mode {
            InsertionMode::Initial => self.handle_initial_mode(token),
            InsertionMode::BeforeHtml => self.handle_before_html_mode(token),
            InsertionMode::BeforeHead => self.handle_before_head_mode(token),
            InsertionMode::InHead => self.handle_in_head_mode(token),
            InsertionMode::AfterHead => self.handle_after_head_mode(token),
            InsertionMode::InBody => self.handle_in_body_mode(token),
            InsertionMode::Text => self.handle_text_mode(token),
            InsertionMode::AfterBody => self.handle_after_body_mode(token),
            InsertionMode::AfterAfterBody => self.handle_after_after_body_mode(token),
        }
    }

    /// [§ 12.1.4 ASCII whitespace](https://infra.spec.whatwg.org/#ascii-whitespace)
    const fn is_whitespace(c: char) -> bool {
        matches!(c, '\t' | '\n' | '\x0C' | '\r' | ' ')
    }

    fn is_whitespace_token(token: &Token) -> bool {
        matches!(token, Token::Character { data } if Self::is_whitespace(*data))
    }

    // ===== Insertion =====

    fn current_node(&self) -> NodeId {
        self.stack_of_open_elements
            .last()
            .copied()
            .unwrap_or(NodeId::ROOT)
    }

    fn get_tag_name(&self, id: NodeId) -> Option<&str> {
        self.tree.as_element(id).map(|data| data.tag_name.as_str())
    }

    fn current_node_is(&self, tag_name: &str) -> bool {
        self.tree.is_element_named(self.current_node(), tag_name)
    }

    fn attributes_to_map(attributes: &[Attribute]) -> AttributesMap {
        attributes
            .iter()
            .map(|attr| (attr.name.clone(), attr.value.clone()))
            .collect()
    }

    /// [§ 13.2.6.1 Insert an HTML element](https://html.spec.whatwg.org/multipage/parsing.html#insert-an-html-element)
    ///
    /// Create the element, append it to the current node and push it onto
    /// the stack of open elements.
    fn insert_html_element(&mut self, tag_name: &str, attributes: &[Attribute]) {
        let parent = self.current_node();
        let element = self.tree.alloc(NodeType::Element(ElementData::new(
            tag_name.to_string(),
            Self::attributes_to_map(attributes),
        )));
        self.tree.append_child(parent, element);
        self.stack_of_open_elements.push(element);
    }

    /// Insert an element that never has children.
    fn insert_void_element(&mut self, tag_name: &str, attributes: &[Attribute]) {
        self.insert_html_element(tag_name, attributes);
        let _ = self.stack_of_open_elements.pop();
    }

    /// [§ 13.2.6.1 Insert a character](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    ///
    /// "If there is a Text node immediately before the adjusted insertion
    /// location, then append data to that Text node's data."
    fn insert_character(&mut self, c: char) {
        let parent = self.current_node();
        let mut buf = [0_u8; 4];
        self.tree.append_text(parent, c.encode_utf8(&mut buf));
    }

    /// [§ 13.2.6.1 Insert a comment](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-comment)
    fn insert_comment(&mut self, data: &str) {
        let parent = self.current_node();
        self.insert_comment_into(parent, data);
    }

    fn insert_comment_into(&mut self, parent: NodeId, data: &str) {
        let comment = self.tree.alloc(NodeType::Comment(data.to_string()));
        self.tree.append_child(parent, comment);
    }

    /// [§ 13.2.6.4.8](https://html.spec.whatwg.org/multipage/parsing.html#generic-raw-text-element-parsing-algorithm)
    ///
    /// Generic raw text and RCDATA element parsing. The tokenizer has already
    /// switched its own state when it emitted the start tag.
    fn insert_text_element(&mut self, tag_name: &str, attributes: &[Attribute]) {
        self.insert_html_element(tag_name, attributes);
        self.original_insertion_mode = Some(self.insertion_mode);
        self.insertion_mode = InsertionMode::Text;
    }

    // ===== Stack of open elements =====

    fn pop_until_tag(&mut self, tag_name: &str) {
        while let Some(id) = self.stack_of_open_elements.pop() {
            if self.get_tag_name(id) == Some(tag_name) {
                break;
            }
        }
    }

    fn pop_until_one_of(&mut self, tag_names: &[&str]) {
        while let Some(id) = self.stack_of_open_elements.pop() {
            if self
                .get_tag_name(id)
                .is_some_and(|name| tag_names.contains(&name))
            {
                break;
            }
        }
    }

    /// Remove `id` from the stack of open elements wherever it is.
    fn remove_from_stack(&mut self, id: NodeId) {
        self.stack_of_open_elements.retain(|&open| open != id);
    }

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope)
    ///
    /// STEP 1: "Initialize node to be the current node."
    /// STEP 2: "If node is the target node, terminate in a match state."
    /// STEP 3: "Otherwise, if node is one of the element types in list,
    ///          terminate in a failure state."
    /// STEP 4: "Otherwise, set node to the previous entry in the stack of
    ///          open elements and return to step 2."
    fn has_one_of_in_specific_scope(&self, tag_names: &[&str], scope_markers: &[&str]) -> bool {
        for &node_id in self.stack_of_open_elements.iter().rev() {
            if let Some(node_tag) = self.get_tag_name(node_id) {
                if tag_names.contains(&node_tag) {
                    return true;
                }
                if scope_markers.contains(&node_tag) {
                    return false;
                }
            }
        }
        false
    }

    /// "has an element in scope"
    fn has_element_in_scope(&self, tag_name: &str) -> bool {
        self.has_one_of_in_scope(&[tag_name])
    }

    fn has_one_of_in_scope(&self, tag_names: &[&str]) -> bool {
        const DEFAULT_SCOPE: &[&str] = &[
            "applet",
            "caption",
            "html",
            "table",
            "td",
            "th",
            "marquee",
            "object",
            "template",
            "foreignObject",
        ];
        self.has_one_of_in_specific_scope(tag_names, DEFAULT_SCOPE)
    }

    /// "has an element in button scope"
    fn has_element_in_button_scope(&self, tag_name: &str) -> bool {
        const BUTTON_SCOPE: &[&str] = &[
            "applet",
            "caption",
            "html",
            "table",
            "td",
            "th",
            "marquee",
            "object",
            "template",
            "foreignObject",
            "button",
        ];
        self.has_one_of_in_specific_scope(&[tag_name], BUTTON_SCOPE)
    }

    /// "has an element in list item scope"
    fn has_element_in_list_item_scope(&self, tag_name: &str) -> bool {
        const LIST_ITEM_SCOPE: &[&str] = &[
            "applet",
            "caption",
            "html",
            "table",
            "td",
            "th",
            "marquee",
            "object",
            "template",
            "foreignObject",
            "ol",
            "ul",
        ];
        self.has_one_of_in_specific_scope(&[tag_name], LIST_ITEM_SCOPE)
    }

    /// "has an element in table scope"
    fn has_one_of_in_table_scope(&self, tag_names: &[&str]) -> bool {
        const TABLE_SCOPE: &[&str] = &["html", "table", "template"];
        self.has_one_of_in_specific_scope(tag_names, TABLE_SCOPE)
    }

    /// [§ 13.2.6.3 Closing elements that have implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
    ///
    /// "while the current node is a dd element, a dt element, an li element,
    /// an optgroup element, an option element, a p element, an rb element,
    /// an rp element, an rt element, or an rtc element, the UA must pop the
    /// current node off the stack of open elements."
    fn generate_implied_end_tags_excluding(&mut self, exclude: Option<&str>) {
        loop {
            let Some(tag) = self.get_tag_name(self.current_node()) else {
                return;
            };
            if Some(tag) == exclude {
                return;
            }
            if !matches!(
                tag,
                "dd" | "dt" | "li" | "optgroup" | "option" | "p" | "rb" | "rp" | "rt" | "rtc"
            ) {
                return;
            }
            let _ = self.stack_of_open_elements.pop();
        }
    }

    fn generate_implied_end_tags(&mut self) {
        self.generate_implied_end_tags_excluding(None);
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#close-a-p-element)
    ///
    /// "Generate implied end tags, except for p elements. If the current node
    /// is not a p element, then this is a parse error. Pop elements from the
    /// stack of open elements until a p element has been popped."
    fn close_p_element(&mut self) {
        self.generate_implied_end_tags_excluding(Some("p"));
        if !self.current_node_is("p") {
            self.parse_error("unexpected open element while closing p");
        }
        self.pop_until_tag("p");
    }

    fn close_p_if_in_button_scope(&mut self) {
        if self.has_element_in_button_scope("p") {
            self.close_p_element();
        }
    }

    /// Close the nearest open element named in `tag_names` when one is in
    /// table scope.
    fn close_in_table_scope(&mut self, tag_names: &[&str]) {
        if self.has_one_of_in_table_scope(tag_names) {
            self.generate_implied_end_tags();
            self.pop_until_one_of(tag_names);
        }
    }

    /// Whether an `svg` or `math` element is open, where the self-closing
    /// flag of a start tag is honoured.
    fn in_foreign_content(&self) -> bool {
        self.stack_of_open_elements
            .iter()
            .any(|&id| matches!(self.get_tag_name(id), Some("svg" | "math")))
    }

    /// [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#special)
    fn is_special_element(tag_name: &str) -> bool {
        matches!(
            tag_name,
            "address"
                | "applet"
                | "area"
                | "article"
                | "aside"
                | "base"
                | "basefont"
                | "bgsound"
                | "blockquote"
                | "body"
                | "br"
                | "button"
                | "caption"
                | "center"
                | "col"
                | "colgroup"
                | "dd"
                | "details"
                | "dir"
                | "div"
                | "dl"
                | "dt"
                | "embed"
                | "fieldset"
                | "figcaption"
                | "figure"
                | "footer"
                | "form"
                | "frame"
                | "frameset"
                | "h1"
                | "h2"
                | "h3"
                | "h4"
                | "h5"
                | "h6"
                | "head"
                | "header"
                | "hgroup"
                | "hr"
                | "html"
                | "iframe"
                | "img"
                | "input"
                | "keygen"
                | "li"
                | "link"
                | "listing"
                | "main"
                | "marquee"
                | "menu"
                | "meta"
                | "nav"
                | "noembed"
                | "noframes"
                | "noscript"
                | "object"
                | "ol"
                | "p"
                | "param"
                | "plaintext"
                | "pre"
                | "script"
                | "search"
                | "section"
                | "select"
                | "source"
                | "style"
                | "summary"
                | "table"
                | "tbody"
                | "td"
                | "template"
                | "textarea"
                | "tfoot"
                | "th"
                | "thead"
                | "title"
                | "tr"
                | "track"
                | "ul"
                | "wbr"
                | "xmp"
        )
    }

    // ===== Insertion modes =====

    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    fn handle_initial_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, ...
            //  Ignore the token."
            _ if Self::is_whitespace_token(token) => {}
            Token::Comment { data } => self.insert_comment_into(NodeId::ROOT, data),
            // The doctype is not kept in the tree; it only ends this mode.
            Token::Doctype { .. } => self.insertion_mode = InsertionMode::BeforeHtml,
            _ => {
                self.insertion_mode = InsertionMode::BeforeHtml;
                self.process_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    fn handle_before_html_mode(&mut self, token: &Token) {
        match token {
            Token::Doctype { .. } => self.parse_error("unexpected DOCTYPE before html"),
            Token::Comment { data } => self.insert_comment_into(NodeId::ROOT, data),
            _ if Self::is_whitespace_token(token) => {}
            Token::StartTag {
                name, attributes, ..
            } if name == "html" => {
                self.insert_html_element(name, attributes);
                self.insertion_mode = InsertionMode::BeforeHead;
            }
            Token::EndTag { name } if !matches!(name.as_str(), "head" | "body" | "html" | "br") => {
                self.parse_error("unexpected end tag before html");
            }
            _ => {
                self.insert_html_element("html", &[]);
                self.insertion_mode = InsertionMode::BeforeHead;
                self.process_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    fn handle_before_head_mode(&mut self, token: &Token) {
        match token {
            _ if Self::is_whitespace_token(token) => {}
            Token::Comment { data } => self.insert_comment(data),
            Token::Doctype { .. } => self.parse_error("unexpected DOCTYPE before head"),
            Token::StartTag { name, .. } if name == "html" => {
                self.parse_error("unexpected html start tag");
            }
            Token::StartTag {
                name, attributes, ..
            } if name == "head" => {
                self.insert_html_element(name, attributes);
                self.head_element_pointer = Some(self.current_node());
                self.insertion_mode = InsertionMode::InHead;
            }
            Token::EndTag { name } if !matches!(name.as_str(), "head" | "body" | "html" | "br") => {
                self.parse_error("unexpected end tag before head");
            }
            _ => {
                self.insert_html_element("head", &[]);
                self.head_element_pointer = Some(self.current_node());
                self.insertion_mode = InsertionMode::InHead;
                self.process_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    fn handle_in_head_mode(&mut self, token: &Token) {
        match token {
            Token::Character { data } if Self::is_whitespace(*data) => self.insert_character(*data),
            Token::Comment { data } => self.insert_comment(data),
            Token::Doctype { .. } => self.parse_error("unexpected DOCTYPE in head"),
            Token::StartTag {
                name, attributes, ..
            } if matches!(
                name.as_str(),
                "base" | "basefont" | "bgsound" | "link" | "meta"
            ) =>
            {
                self.insert_void_element(name, attributes);
            }
            Token::StartTag {
                name, attributes, ..
            } if matches!(
                name.as_str(),
                "title" | "noframes" | "style" | "script"
            ) =>
            {
                self.insert_text_element(name, attributes);
            }
            Token::StartTag {
                name, attributes, ..
            } if name == "template" => self.open_template(attributes),
            Token::EndTag { name } if name == "template" => self.close_template(),
            Token::EndTag { name } if name == "head" => {
                let _ = self.stack_of_open_elements.pop();
                self.insertion_mode = InsertionMode::AfterHead;
            }
            Token::StartTag { name, .. } if name == "head" => {
                self.parse_error("unexpected head start tag in head");
            }
            Token::EndTag { name } if !matches!(name.as_str(), "body" | "html" | "br") => {
                self.parse_error("unexpected end tag in head");
            }
            _ => {
                // "Pop the current node (which will be the head element) off
                //  the stack of open elements."
                let _ = self.stack_of_open_elements.pop();
                self.insertion_mode = InsertionMode::AfterHead;
                self.process_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    fn handle_after_head_mode(&mut self, token: &Token) {
        match token {
            Token::Character { data } if Self::is_whitespace(*data) => self.insert_character(*data),
            Token::Comment { data } => self.insert_comment(data),
            Token::Doctype { .. } => self.parse_error("unexpected DOCTYPE after head"),
            Token::StartTag {
                name, attributes, ..
            } if matches!(name.as_str(), "body" | "frameset") => {
                self.insert_html_element(name, attributes);
                self.insertion_mode = InsertionMode::InBody;
            }
            Token::StartTag { name, .. } if HEAD_ELEMENTS.contains(&name.as_str()) => {
                // "Push the node pointed to by the head element pointer onto
                //  the stack of open elements. Process the token using the
                //  rules for the "in head" insertion mode. Remove the node
                //  pointed to by the head element pointer from the stack of
                //  open elements."
                self.parse_error("head element after head");
                match self.head_element_pointer {
                    Some(head) => {
                        self.stack_of_open_elements.push(head);
                        self.handle_in_head_mode(token);
                        self.remove_from_stack(head);
                    }
                    None => self.handle_in_head_mode(token),
                }
            }
            Token::EndTag { name } if name == "template" => self.handle_in_head_mode(token),
            Token::StartTag { name, .. } if name == "head" => {
                self.parse_error("unexpected head start tag after head");
            }
            Token::EndTag { name } if !matches!(name.as_str(), "body" | "html" | "br") => {
                self.parse_error("unexpected end tag after head");
            }
            _ => {
                self.insert_html_element("body", &[]);
                self.insertion_mode = InsertionMode::InBody;
                self.process_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    fn handle_in_body_mode(&mut self, token: &Token) {
        match token {
            Token::Character { data: '\0' } => self.parse_error("unexpected null character"),
            Token::Character { data } => self.insert_character(*data),
            Token::Comment { data } => self.insert_comment(data),
            Token::Doctype { .. } => self.parse_error("unexpected DOCTYPE in body"),
            Token::StartTag {
                name,
                self_closing,
                attributes,
            } => self.handle_in_body_start_tag(name, *self_closing, attributes),
            Token::EndTag { name } => self.handle_in_body_end_tag(name, token),
            // "Stop parsing."
            Token::EndOfFile => self.stopped = true,
        }
    }

    fn handle_in_body_start_tag(&mut self, name: &str, self_closing: bool, attributes: &[Attribute]) {
        match name {
            "html" | "body" | "frameset" => {
                self.parse_error("unexpected document-level start tag in body");
            }
            "template" => self.open_template(attributes),
            _ if HEAD_ELEMENTS.contains(&name) => {
                let token = Token::StartTag {
                    name: name.to_string(),
                    self_closing,
                    attributes: attributes.to_vec(),
                };
                self.handle_in_head_mode(&token);
            }
            _ if CLOSES_P.contains(&name) || matches!(name, "form" | "plaintext" | "table") => {
                self.close_p_if_in_button_scope();
                self.insert_html_element(name, attributes);
            }
            _ if HEADINGS.contains(&name) => {
                self.close_p_if_in_button_scope();
                // "If the current node is an HTML element whose tag name is
                //  one of h1, h2, h3, h4, h5, or h6, then this is a parse
                //  error; pop the current node off the stack of open elements."
                if self
                    .get_tag_name(self.current_node())
                    .is_some_and(|tag| HEADINGS.contains(&tag))
                {
                    self.parse_error("nested heading");
                    let _ = self.stack_of_open_elements.pop();
                }
                self.insert_html_element(name, attributes);
            }
            "pre" | "listing" => {
                self.close_p_if_in_button_scope();
                self.insert_html_element(name, attributes);
                self.ignore_next_line_feed = true;
            }
            "li" => {
                self.close_list_item(&["li"]);
                self.insert_html_element(name, attributes);
            }
            "dd" | "dt" => {
                self.close_list_item(&["dd", "dt"]);
                self.insert_html_element(name, attributes);
            }
            "button" => {
                if self.has_element_in_scope("button") {
                    self.parse_error("nested button");
                    self.generate_implied_end_tags();
                    self.pop_until_tag("button");
                }
                self.insert_html_element(name, attributes);
            }
            "a" => {
                // Without the adoption agency algorithm an unclosed anchor is
                // closed before a new one opens.
                if self.has_element_in_scope("a") {
                    self.parse_warning("nested a element closed implicitly");
                    self.pop_until_tag("a");
                }
                self.insert_html_element(name, attributes);
            }
            "caption" | "colgroup" => self.insert_html_element(name, attributes),
            "tbody" | "thead" | "tfoot" => {
                self.close_in_table_scope(TABLE_CELLS);
                self.close_in_table_scope(&["tr"]);
                self.close_in_table_scope(TABLE_SECTIONS);
                self.insert_html_element(name, attributes);
            }
            "tr" => {
                self.close_in_table_scope(TABLE_CELLS);
                self.close_in_table_scope(&["tr"]);
                self.insert_html_element(name, attributes);
            }
            "td" | "th" => {
                self.close_in_table_scope(TABLE_CELLS);
                self.insert_html_element(name, attributes);
            }
            "hr" => {
                self.close_p_if_in_button_scope();
                self.insert_void_element(name, attributes);
            }
            // "Parse error. Change the token's tag name to "img" and
            //  reprocess it. (Don't ask.)"
            "image" => {
                self.parse_error("image start tag");
                self.insert_void_element("img", attributes);
            }
            _ if VOID_ELEMENTS.contains(&name) => self.insert_void_element(name, attributes),
            "textarea" => {
                self.insert_text_element(name, attributes);
                self.ignore_next_line_feed = true;
            }
            "xmp" => {
                self.close_p_if_in_button_scope();
                self.insert_text_element(name, attributes);
            }
            "iframe" | "noembed" => self.insert_text_element(name, attributes),
            "optgroup" | "option" => {
                if self.current_node_is("option") {
                    let _ = self.stack_of_open_elements.pop();
                }
                self.insert_html_element(name, attributes);
            }
            "rb" | "rtc" => {
                if self.has_element_in_scope("ruby") {
                    self.generate_implied_end_tags();
                }
                self.insert_html_element(name, attributes);
            }
            "rp" | "rt" => {
                if self.has_element_in_scope("ruby") {
                    self.generate_implied_end_tags_excluding(Some("rtc"));
                }
                self.insert_html_element(name, attributes);
            }
            _ => {
                self.insert_html_element(name, attributes);
                // "If the token has its self-closing flag set, pop the current
                //  node off the stack of open elements and acknowledge the
                //  token's self-closing flag." Only foreign elements do this.
                if self_closing && (matches!(name, "svg" | "math") || self.in_foreign_content()) {
                    let _ = self.stack_of_open_elements.pop();
                }
            }
        }
    }

    /// Shared steps of the `li`, `dd` and `dt` start tags.
    ///
    /// STEP 1: "Initialize node to be the current node."
    /// STEP 2: "Loop: If node is one of `targets`, then generate implied end
    ///          tags except for it, pop up to and including it, and jump to
    ///          done."
    /// STEP 3: "If node is in the special category, but is not an address,
    ///          div, or p element, then jump to the step labeled done below."
    /// STEP 4: "Otherwise, set node to the previous entry in the stack of
    ///          open elements and return to the step labeled loop."
    /// STEP 5: "Done: If the stack of open elements has a p element in button
    ///          scope, then close a p element."
    fn close_list_item(&mut self, targets: &[&str]) {
        let mut found = None;
        for &node_id in self.stack_of_open_elements.iter().rev() {
            let Some(tag) = self.get_tag_name(node_id) else {
                continue;
            };
            if targets.contains(&tag) {
                found = Some(tag.to_string());
                break;
            }
            if Self::is_special_element(tag) && !matches!(tag, "address" | "div" | "p") {
                break;
            }
        }
        if let Some(tag) = found {
            self.generate_implied_end_tags_excluding(Some(&tag));
            self.pop_until_tag(&tag);
        }
        self.close_p_if_in_button_scope();
    }

    fn handle_in_body_end_tag(&mut self, name: &str, token: &Token) {
        match name {
            "body" | "html" => {
                if !self.has_element_in_scope("body") {
                    self.parse_error("end tag without open body");
                    return;
                }
                self.insertion_mode = InsertionMode::AfterBody;
                // "Reprocess the token." for </html>
                if name == "html" {
                    self.process_token(token);
                }
            }
            "template" => self.close_template(),
            "p" => {
                // "If the stack of open elements does not have a p element in
                //  button scope, then this is a parse error; insert an HTML
                //  element for a "p" start tag token with no attributes."
                if !self.has_element_in_button_scope("p") {
                    self.parse_error("p end tag without open p");
                    self.insert_html_element("p", &[]);
                }
                self.close_p_element();
            }
            "li" => {
                if self.has_element_in_list_item_scope("li") {
                    self.generate_implied_end_tags_excluding(Some("li"));
                    self.pop_until_tag("li");
                } else {
                    self.parse_error("li end tag without open li");
                }
            }
            "dd" | "dt" => {
                if self.has_element_in_scope(name) {
                    self.generate_implied_end_tags_excluding(Some(name));
                    self.pop_until_tag(name);
                } else {
                    self.parse_error("dd or dt end tag without open element");
                }
            }
            _ if HEADINGS.contains(&name) => {
                if self.has_one_of_in_scope(HEADINGS) {
                    self.generate_implied_end_tags();
                    self.pop_until_one_of(HEADINGS);
                } else {
                    self.parse_error("heading end tag without open heading");
                }
            }
            "table" | "tbody" | "tfoot" | "thead" | "tr" | "td" | "th" | "caption"
            | "colgroup" => self.close_in_table_scope(&[name]),
            // "Parse error. Drop the attributes from the token, and act as
            //  described in the next entry; i.e. act as if this was a "br"
            //  start tag token with no attributes."
            "br" => {
                self.parse_error("br end tag");
                self.insert_void_element("br", &[]);
            }
            _ if CLOSES_P.contains(&name)
                || matches!(
                    name,
                    "pre" | "listing" | "form" | "button" | "applet" | "marquee" | "object"
                ) =>
            {
                if self.has_element_in_scope(name) {
                    self.generate_implied_end_tags();
                    self.pop_until_tag(name);
                } else {
                    self.parse_error("end tag without matching open element");
                }
            }
            _ => self.any_other_end_tag(name),
        }
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    ///
    /// "Any other end tag"
    ///
    /// STEP 1: "Initialize node to be the current node."
    /// STEP 2: "Loop: If node is an HTML element with the same tag name as
    ///          the token, then generate implied end tags, except for HTML
    ///          elements with the same tag name as the token, and pop all the
    ///          nodes from the current node up to node, including node."
    /// STEP 3: "Otherwise, if node is in the special category, then this is a
    ///          parse error; ignore the token, and return."
    /// STEP 4: "Set node to the previous entry in the stack of open elements."
    fn any_other_end_tag(&mut self, tag_name: &str) {
        let mut i = self.stack_of_open_elements.len();
        while i > 0 {
            i -= 1;
            let node_id = self.stack_of_open_elements[i];
            let Some(node_tag) = self.get_tag_name(node_id) else {
                continue;
            };
            if node_tag == tag_name {
                self.generate_implied_end_tags_excluding(Some(tag_name));
                self.stack_of_open_elements.truncate(i);
                return;
            }
            if Self::is_special_element(node_tag) {
                self.parse_error("end tag closes nothing");
                return;
            }
        }
    }

    /// [§ 13.2.6.4.4](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    ///
    /// A `template` start tag: its contents are built with the "in body"
    /// rules until the matching end tag restores the previous mode.
    fn open_template(&mut self, attributes: &[Attribute]) {
        self.insert_html_element("template", attributes);
        self.template_insertion_modes.push(self.insertion_mode);
        self.insertion_mode = InsertionMode::InBody;
    }

    /// A `template` end tag.
    fn close_template(&mut self) {
        let open = self
            .stack_of_open_elements
            .iter()
            .any(|&id| self.tree.is_element_named(id, "template"));
        if !open {
            self.parse_error("template end tag without open template");
            return;
        }
        self.generate_implied_end_tags();
        self.pop_until_tag("template");
        if let Some(mode) = self.template_insertion_modes.pop() {
            self.insertion_mode = mode;
        }
    }

    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    fn handle_text_mode(&mut self, token: &Token) {
        match token {
            Token::Character { data } => self.insert_character(*data),
            // "Parse error. Pop the current node off the stack of open
            //  elements. Switch the insertion mode to the original insertion
            //  mode and reprocess the token."
            Token::EndOfFile => {
                self.parse_error("end of file in raw text element");
                self.leave_text_mode();
                self.process_token(token);
            }
            // "Pop the current node off the stack of open elements. Switch the
            //  insertion mode to the original insertion mode."
            Token::EndTag { .. } => self.leave_text_mode(),
            _ => self.parse_warning("unexpected token in raw text element"),
        }
    }

    fn leave_text_mode(&mut self) {
        let _ = self.stack_of_open_elements.pop();
        self.insertion_mode = self
            .original_insertion_mode
            .take()
            .unwrap_or(InsertionMode::InBody);
    }

    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    fn handle_after_body_mode(&mut self, token: &Token) {
        match token {
            _ if Self::is_whitespace_token(token) => self.handle_in_body_mode(token),
            // "Insert a comment as the last child of the first element in the
            //  stack of open elements (the html element)."
            Token::Comment { data } => {
                let html = self
                    .stack_of_open_elements
                    .first()
                    .copied()
                    .unwrap_or(NodeId::ROOT);
                self.insert_comment_into(html, data);
            }
            Token::Doctype { .. } => self.parse_error("unexpected DOCTYPE after body"),
            Token::EndTag { name } if name == "html" => {
                self.insertion_mode = InsertionMode::AfterAfterBody;
            }
            Token::EndOfFile => self.stopped = true,
            _ => {
                self.parse_error("content after body");
                self.insertion_mode = InsertionMode::InBody;
                self.process_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    fn handle_after_after_body_mode(&mut self, token: &Token) {
        match token {
            Token::Comment { data } => self.insert_comment_into(NodeId::ROOT, data),
            _ if Self::is_whitespace_token(token) => self.handle_in_body_mode(token),
            Token::Doctype { .. } => self.parse_error("unexpected DOCTYPE after html"),
            Token::EndOfFile => self.stopped = true,
            _ => {
                self.parse_error("content after html");
                self.insertion_mode = InsertionMode::InBody;
                self.process_token(token);
            }
        }
    }
}
