//! Markup tokenizer and tree builder for lightdom.
//!
//! # Scope
//!
//! This crate implements:
//! - **Tag Tokenizer** - finds the next well-formed tag in raw text, skipping
//!   stray `<` characters and honoring `>` inside quoted attribute values
//! - **Attribute Parser** - splits one tag's raw attribute text into
//!   name/value pairs, including boolean attributes
//! - **Tree Builder** - appends Element and Text nodes under a parent with
//!   strict open/close matching and an explicit stack of open elements
//!
//! # Not Implemented
//!
//! - Comments, CDATA, and DOCTYPE tokens (handled by the caller or left as text)
//! - Raw-text elements: `<script>` and `<style>` content is tokenized like any other
//! - Implied end tags and error recovery; mismatched markup is an error

/// Attribute parsing and tree construction.
pub mod parser;
/// Tag tokenizer.
pub mod tokenizer;

pub use parser::{TreeBuilder, apply_attributes, parse_attributes, parse_fragment};
pub use tokenizer::{TagKind, TagToken, TagTokenizer, next_tag};
