//! CSS Selector parsing and matching
//!
//! This module implements selector parsing and matching per
//! [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
//!
//! Matching answers "could text under this element be rendered with this
//! rule's font", so selectors that depend on user interaction or document
//! state are *permissive*: `a:visited` matches every `a`, and
//! `p::first-line` matches every `p`.

/// Matching selectors against a [`fontspider_dom::DomTree`].
pub mod matching;
/// Parsing selector text.
pub mod parse;

pub use matching::select_all;
pub use parse::{parse_selector, parse_selector_list};

/// [§ 5 Elemental selectors](https://www.w3.org/TR/selectors-4/#elemental-selectors)
/// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// A simple selector is a single condition on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    /// "A type selector is the name of a document language element type,
    /// and represents an instance of that element type in the document tree."
    ///
    /// Stored lowercased. Examples: `div`, `h1`
    Type(String),

    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    /// "The class selector is given as a full stop (. U+002E) immediately
    /// followed by an identifier."
    Class(String),

    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    /// "An ID selector is a hash (#, U+0023) immediately followed by the
    /// ID value, which is an identifier."
    Id(String),

    /// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
    /// "The universal selector is a single asterisk (*) and represents the
    /// qualified name of any element type."
    Universal,

    /// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    ///
    /// Examples: `[href]`, `[lang|=en]`, `[src$=".png" i]`
    Attribute(AttributeSelector),

    /// [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    /// A pseudo-class that can be decided from the document tree alone.
    PseudoClass(PseudoClass),

    /// [§ 4.3 The Negation Pseudo-class](https://www.w3.org/TR/selectors-4/#negation)
    /// "The negation pseudo-class, :not(), is a functional pseudo-class taking
    /// a selector list as an argument. It represents an element that is not
    /// represented by its argument."
    Not(Vec<ParsedSelector>),

    /// [§ 4.2 The Matches-Any Pseudo-class](https://www.w3.org/TR/selectors-4/#matches)
    /// `:is()` and `:where()`, which differ only in specificity.
    Is(Vec<ParsedSelector>),

    /// A pseudo-class or pseudo-element whose outcome depends on state the
    /// document does not carry: interaction (`:hover`), history
    /// (`:visited`), form state (`:checked`), fragments of the element's
    /// box (`::first-line`, `::before`) and anything unrecognised.
    ///
    /// Holds the lowercased name, without colons.
    Permissive(String),
}

/// Tree-structural pseudo-classes per [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PseudoClass {
    /// [§ 14.1 :root](https://www.w3.org/TR/selectors-4/#the-root-pseudo)
    /// "The :root pseudo-class represents an element that is the root of the document."
    Root,

    /// [§ 14.4.1 :first-child](https://www.w3.org/TR/selectors-4/#the-first-child-pseudo)
    /// "The :first-child pseudo-class represents an element that is first among its
    /// inclusive siblings."
    FirstChild,

    /// [§ 14.4.2 :last-child](https://www.w3.org/TR/selectors-4/#the-last-child-pseudo)
    LastChild,

    /// [§ 14.5.1 :first-of-type](https://www.w3.org/TR/selectors-4/#the-first-of-type-pseudo)
    FirstOfType,

    /// [§ 14.5.2 :last-of-type](https://www.w3.org/TR/selectors-4/#the-last-of-type-pseudo)
    LastOfType,

    /// [§ 14.4.3 :only-child](https://www.w3.org/TR/selectors-4/#the-only-child-pseudo)
    /// "The :only-child pseudo-class represents an element that has no siblings."
    OnlyChild,

    /// [§ 14.2 :empty](https://www.w3.org/TR/selectors-4/#the-empty-pseudo)
    Empty,

    /// [§ 8.2 :link](https://www.w3.org/TR/selectors-4/#the-link-pseudo)
    /// Every link is treated as unvisited, so this matches `a` and `area`
    /// elements with an `href`.
    Link,

    /// `:enabled`, an element without the `disabled` attribute.
    Enabled,

    /// `:disabled`, an element with the `disabled` attribute.
    Disabled,

    /// [§ 14.3.1 :nth-child()](https://www.w3.org/TR/selectors-4/#the-nth-child-pseudo)
    NthChild(Nth),

    /// [§ 14.3.2 :nth-last-child()](https://www.w3.org/TR/selectors-4/#the-nth-last-child-pseudo)
    NthLastChild(Nth),

    /// [§ 14.5.3 :nth-of-type()](https://www.w3.org/TR/selectors-4/#the-nth-of-type-pseudo)
    NthOfType(Nth),

    /// [§ 14.5.4 :nth-last-of-type()](https://www.w3.org/TR/selectors-4/#the-nth-last-of-type-pseudo)
    NthLastOfType(Nth),
}

/// [CSS Syntax § 6 The An+B microsyntax](https://www.w3.org/TR/css-syntax-3/#anb-microsyntax)
///
/// "The An+B notation defines an integer step (A) and offset (B), and
/// represents the An+Bth elements in a list, for every positive integer or
/// zero value of n, with the first element in the list having index 1."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nth {
    /// The step.
    pub a: i32,
    /// The offset.
    pub b: i32,
}

impl Nth {
    /// Whether the 1-based `index` is represented by this An+B.
    #[must_use]
    pub fn matches(self, index: usize) -> bool {
        let Ok(index) = i64::try_from(index) else {
            return false;
        };
        let (a, b) = (i64::from(self.a), i64::from(self.b));
        if a == 0 {
            return index == b;
        }
        let steps = index - b;
        steps % a == 0 && steps / a >= 0
    }
}

/// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSelector {
    /// The attribute name, lowercased.
    pub name: String,
    /// How the attribute value is tested.
    pub matcher: AttributeMatcher,
    /// [§ 6.3 Case-sensitivity](https://www.w3.org/TR/selectors-4/#attribute-case)
    /// Set by the `i` flag: "the attribute value is matched ASCII case-insensitively".
    pub case_insensitive: bool,
}

/// The operator of an attribute selector and the value it tests against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeMatcher {
    /// `[att]` "Represents an element with the att attribute, whatever the
    /// value of the attribute."
    Exists,
    /// `[att=val]` "Represents an element with the att attribute whose value
    /// is exactly "val"."
    Equals(String),
    /// `[att~=val]` "whose value is a whitespace-separated list of words, one
    /// of which is exactly "val"."
    Includes(String),
    /// `[att|=val]` "its value either being exactly "val" or beginning with
    /// "val" immediately followed by "-"."
    DashMatch(String),
    /// `[att^=val]` "whose value begins with the prefix "val"."
    Prefix(String),
    /// `[att$=val]` "whose value ends with the suffix "val"."
    Suffix(String),
    /// `[att*=val]` "whose value contains at least one instance of the
    /// substring "val"."
    Substring(String),
}

/// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
///
/// "A compound selector is a sequence of simple selectors that are not
/// separated by a combinator, and represents a set of simultaneous
/// conditions on a single element."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundSelector {
    /// The list of simple selectors that make up this compound selector.
    pub simple_selectors: Vec<SimpleSelector>,
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
///
/// "A combinator is punctuation that represents a particular kind of
/// relationship between the selectors on either side."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
    /// "A selector of the form 'A B' represents an element B that is an
    /// arbitrary descendant of some ancestor element A."
    Descendant,

    /// [§ 16.2 Child combinator](https://www.w3.org/TR/selectors-4/#child-combinators)
    /// "A selector of the form 'A > B' represents an element B that is a
    /// direct child of element A."
    Child,

    /// [§ 16.3 Next-sibling combinator](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators)
    /// "A selector of the form 'A + B' represents an element B that
    /// immediately follows element A, where A and B share the same parent."
    NextSibling,

    /// [§ 16.4 Subsequent-sibling combinator](https://www.w3.org/TR/selectors-4/#general-sibling-combinators)
    /// "A selector of the form 'A ~ B' represents an element B that follows
    /// element A (not necessarily immediately), where A and B share the same
    /// parent."
    SubsequentSibling,
}

/// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
///
/// "A complex selector is a chain of one or more compound selectors separated
/// by combinators."
///
/// `div.container > ul.nav li` is stored as:
/// ```text
/// subject: [li]
/// combinators: [(Descendant, [ul.nav]), (Child, [div.container])]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    /// The rightmost compound selector (the subject of the selector).
    /// "The elements represented by a complex selector are the elements matched
    /// by the last compound selector in the complex selector."
    pub subject: CompoundSelector,

    /// Chain of (combinator, compound) pairs going left from the subject.
    /// Empty if this is a single compound selector.
    pub combinators: Vec<(Combinator, CompoundSelector)>,
}

/// A parsed CSS selector ready for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSelector {
    /// The complex selector (compound selectors with combinators).
    pub complex: ComplexSelector,
}

impl ParsedSelector {
    /// Check if this is a single compound selector (no combinators).
    #[must_use]
    pub const fn is_simple(&self) -> bool {
        self.complex.combinators.is_empty()
    }
}
