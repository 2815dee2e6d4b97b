//! CSS parser module.

/// CSS parser implementation.
pub mod core;
/// Rule tree types.
pub mod rules;
/// Writing component values back out as text.
pub mod serialize;

pub use self::core::CSSParser;
pub use rules::{AtRule, AtRuleBlock, ComponentValue, Declaration, Rule, RuleWalk, Selector, StyleRule, Stylesheet};
pub use serialize::serialize_component_values;
