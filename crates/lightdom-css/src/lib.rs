//! Selector parsing and matching for lightdom.
//!
//! # Scope
//!
//! This crate implements a restricted selector language:
//! - Type (`div`), universal (`*`), class (`.name`), and ID (`#name`) clauses
//! - Attribute clauses `[a]`, `[a=v]`, `[a^=v]`, `[a$=v]`, `[a*=v]`, optionally
//!   prefixed by a tag name (`input[type=text]`)
//! - Comma-separated selector lists
//!
//! Clauses written together in one entry are alternatives: `div.note` matches
//! every `div` and every element with class `note`.
//!
//! # Not Implemented
//!
//! - Combinators (descendant, child, sibling)
//! - Pseudo-classes and pseudo-elements
//! - Specificity

/// Selector parsing and matching.
pub mod selector;

pub use selector::{
    AttributeSelector, Clause, SelectorEntry, SelectorList, parse_selector_list, query_selector,
    query_selector_all,
};
