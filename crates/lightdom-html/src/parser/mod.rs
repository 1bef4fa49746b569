//! Attribute parsing and tree construction.

/// Raw attribute text to name/value pairs.
pub mod attributes;
/// Stack-driven tree builder.
pub mod tree_builder;

pub use attributes::{apply_attributes, parse_attributes};
pub use tree_builder::{TreeBuilder, parse_fragment};
