//! Common utilities for lightdom.
//!
//! This crate provides shared infrastructure used by all lightdom components:
//! - **Errors** - the [`error::DomError`] kinds raised by parsing and configuration
//! - **Warning System** - deduplicated warnings for unsupported selector syntax
//! - **Self-closing tags** - the built-in set plus the process-wide custom predicate

pub mod error;
pub mod self_closing;
pub mod warning;

pub use error::{DomError, Result};
