//! Arena DOM for fontspider.
//!
//! Documents are only ever read after parsing: the resolver selects elements
//! and pulls their text, so the tree supports appending and traversal but no
//! removal or reparenting. Relationships are stored as [`NodeId`] indices into
//! a single `Vec`, following the node model of the
//! [DOM Living Standard](https://dom.spec.whatwg.org/).

use std::collections::HashMap;
use std::fmt::Write as _;

/// Map of attribute names to values for an element.
pub type AttributesMap = HashMap<String, String>;

/// Elements whose children are never painted as text.
///
/// `<style>` and `<script>` hold source code and `<template>` holds an inert
/// fragment; none of their characters reach the screen.
const NON_RENDERED_ELEMENTS: [&str; 3] = ["script", "style", "template"];

/// Index of a node inside its [`DomTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The document node is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// A node plus its links to the rest of the tree.
#[derive(Debug, Clone)]
pub struct Node {
    /// "Each node has an associated node type"
    pub node_type: NodeType,
    /// Parent node, `None` for the document and for detached nodes.
    pub parent: Option<NodeId>,
    /// Children in tree order.
    pub children: Vec<NodeId>,
    /// Sibling immediately after this node.
    pub next_sibling: Option<NodeId>,
    /// Sibling immediately before this node.
    pub prev_sibling: Option<NodeId>,
}

/// The kinds of node a parsed HTML document contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeType {
    /// [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
    Document,
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    Element(ElementData),
    /// [§ 4.10 Interface Text](https://dom.spec.whatwg.org/#interface-text)
    Text(String),
    /// [§ 4.7 Interface Comment](https://dom.spec.whatwg.org/#interface-comment)
    Comment(String),
}

/// Tag name and attributes of an element.
///
/// Namespaces are not modelled; HTML tag and attribute names are stored
/// lowercased by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// "An element's local name"
    pub tag_name: String,
    /// "An element has an associated attribute list"
    pub attrs: AttributesMap,
}

impl ElementData {
    /// Create element data with the given tag name and attributes.
    #[must_use]
    pub const fn new(tag_name: String, attrs: AttributesMap) -> Self {
        Self { tag_name, attrs }
    }

    /// Value of the attribute `name`, if present.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// The element's `id` attribute.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    /// Iterate the class names of the `class` attribute.
    ///
    /// [§ 2.3.7 Space-separated tokens](https://html.spec.whatwg.org/multipage/common-microsyntaxes.html#space-separated-tokens)
    /// "A set of space-separated tokens is a string containing zero or more
    /// words ... separated by one or more ASCII whitespace"
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class")
            .unwrap_or_default()
            .split_ascii_whitespace()
    }

    /// Whether the `class` attribute contains `name`.
    #[must_use]
    pub fn has_class(&self, name: &str) -> bool {
        self.classes().any(|class| class == name)
    }
}

/// Arena-allocated document tree.
#[derive(Debug, Clone)]
pub struct DomTree {
    /// Every node ever allocated; the document lives at [`NodeId::ROOT`].
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree holding only the document node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                node_type: NodeType::Document,
                parent: None,
                children: Vec::new(),
                next_sibling: None,
                prev_sibling: None,
            }],
        }
    }

    /// The document node.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Number of allocated nodes, detached ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: the document node exists from construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a detached node.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
        });
        id
    }

    /// [§ 4.2.2 Append](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// Appends `child` as the last child of `parent`. Both IDs must come from
    /// this tree's [`alloc`](Self::alloc).
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let prev_last_child = self.nodes[parent.0].children.last().copied();
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
        if let Some(prev_id) = prev_last_child {
            self.nodes[prev_id.0].next_sibling = Some(child);
            self.nodes[child.0].prev_sibling = Some(prev_id);
        }
    }

    /// Append `data` to `parent`, merging it into a trailing text child.
    ///
    /// Adjacent character tokens become one text node, as tree construction
    /// does when it "inserts a character".
    pub fn append_text(&mut self, parent: NodeId, data: &str) {
        let trailing_text = self
            .last_child(parent)
            .filter(|&last| self.as_text(last).is_some());
        if let Some(last) = trailing_text {
            if let NodeType::Text(existing) = &mut self.nodes[last.0].node_type {
                existing.push_str(data);
            }
            return;
        }
        let text = self.alloc(NodeType::Text(data.to_string()));
        self.append_child(parent, text);
    }

    /// Parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Children of a node in tree order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.last().copied())
    }

    /// Next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling)
    }

    /// Previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling)
    }

    /// Ancestors of a node, parent first.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Siblings before a node, nearest first.
    #[must_use]
    pub fn preceding_siblings(&self, id: NodeId) -> SiblingIterator<'_> {
        SiblingIterator {
            tree: self,
            current: self.prev_sibling(id),
            forward: false,
        }
    }

    /// Siblings after a node, nearest first.
    #[must_use]
    pub fn following_siblings(&self, id: NodeId) -> SiblingIterator<'_> {
        SiblingIterator {
            tree: self,
            current: self.next_sibling(id),
            forward: true,
        }
    }

    /// [§ 4.2 Node tree](https://dom.spec.whatwg.org/#concept-tree-order)
    ///
    /// Descendants of `id` in tree order ("preorder, depth-first
    /// traversal"), not including `id` itself.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> DescendantIterator<'_> {
        let mut stack: Vec<NodeId> = self.children(id).to_vec();
        stack.reverse();
        DescendantIterator { tree: self, stack }
    }

    /// Every element of the document in tree order.
    pub fn elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.descendants(NodeId::ROOT)
            .filter(|&id| self.as_element(id).is_some())
    }

    /// Element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Text data if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Whether `id` is an element with the given (lowercase) tag name.
    #[must_use]
    pub fn is_element_named(&self, id: NodeId, tag_name: &str) -> bool {
        self.as_element(id).is_some_and(|e| e.tag_name == tag_name)
    }

    /// [§ 3.1.1 The document element](https://html.spec.whatwg.org/multipage/dom.html#the-html-element-2)
    ///
    /// "The document element of a document is the element whose parent is that
    /// document, if it exists; otherwise null."
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(NodeId::ROOT)
            .iter()
            .copied()
            .find(|&id| self.as_element(id).is_some())
    }

    /// [§ 3.1.3 The body element](https://html.spec.whatwg.org/multipage/dom.html#the-body-element-2)
    ///
    /// "The body element of a document is the first of the html element's children
    /// that is either a body element or a frameset element, or null if there is
    /// no such element."
    #[must_use]
    pub fn body(&self) -> Option<NodeId> {
        let html = self.document_element()?;
        self.children(html)
            .iter()
            .copied()
            .find(|&id| self.is_element_named(id, "body") || self.is_element_named(id, "frameset"))
    }

    /// [§ 4.4 textContent](https://dom.spec.whatwg.org/#dom-node-textcontent)
    ///
    /// "The descendant text content of a node node is the concatenation of the
    /// data of all the Text node descendants of node, in tree order."
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.as_text(id) {
            return text.to_string();
        }
        self.descendants(id)
            .filter_map(|d| self.as_text(d))
            .collect()
    }

    /// The characters of `id` that can actually be painted.
    ///
    /// Like [`text_content`](Self::text_content), but subtrees rooted at
    /// `<script>`, `<style>` and `<template>` are skipped. Selecting `body`
    /// must not drag inline scripts into a font subset.
    #[must_use]
    pub fn rendered_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.push_rendered_text(id, &mut out);
        out
    }

    fn push_rendered_text(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.get(id) else {
            return;
        };
        match &node.node_type {
            NodeType::Text(text) => out.push_str(text),
            NodeType::Comment(_) => {}
            NodeType::Document | NodeType::Element(_) => {
                if self
                    .as_element(id)
                    .is_some_and(|e| NON_RENDERED_ELEMENTS.contains(&e.tag_name.as_str()))
                {
                    return;
                }
                for &child in &node.children {
                    self.push_rendered_text(child, out);
                }
            }
        }
    }

    /// Indented dump of the tree, one node per line, for debugging.
    #[must_use]
    pub fn print_tree(&self) -> String {
        let mut out = String::new();
        self.print_node(NodeId::ROOT, 0, &mut out);
        out
    }

    fn print_node(&self, id: NodeId, depth: usize, out: &mut String) {
        let Some(node) = self.get(id) else {
            return;
        };
        let indent = "  ".repeat(depth);
        let _ = match &node.node_type {
            NodeType::Document => writeln!(out, "{indent}#document"),
            NodeType::Element(data) => {
                let mut attrs: Vec<_> = data.attrs.iter().collect();
                attrs.sort();
                let rendered: String = attrs
                    .into_iter()
                    .map(|(k, v)| format!(" {k}=\"{v}\""))
                    .collect();
                writeln!(out, "{indent}<{}{rendered}>", data.tag_name)
            }
            NodeType::Text(text) => writeln!(out, "{indent}\"{}\"", text.escape_debug()),
            NodeType::Comment(text) => writeln!(out, "{indent}<!-- {text} -->"),
        };
        for &child in &node.children {
            self.print_node(child, depth + 1, out);
        }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Iterator over the siblings on one side of a node.
pub struct SiblingIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
    forward: bool,
}

impl Iterator for SiblingIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = if self.forward {
            self.tree.next_sibling(id)
        } else {
            self.tree.prev_sibling(id)
        };
        Some(id)
    }
}

/// Pre-order iterator over the descendants of a node.
pub struct DescendantIterator<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for DescendantIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
