//! Self-closing (void) tag classification.
//!
//! A self-closing tag never owns children and never consumes a matching
//! closing tag. The set is the fixed [`BUILTIN_SELF_CLOSING`] list plus an
//! optional process-wide custom predicate installed with
//! [`set_custom_self_closing`]. The tree builder and the serializer both
//! consult [`is_self_closing`], so parsing and serialization always agree.

use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};

use regex::Regex;
use serde_json::Value;

use crate::error::{DomError, Result};

/// Tags that are always self-closing, matched ASCII case-insensitively.
pub const BUILTIN_SELF_CLOSING: [&str; 7] = ["input", "link", "meta", "hr", "br", "source", "img"];

/// A user-supplied description of additional self-closing tags.
#[derive(Debug, Clone)]
pub enum SelfClosingConfig {
    /// An explicit list of tag names, matched exactly.
    Names(Vec<String>),
    /// A compiled pattern; a tag is self-closing if the pattern matches
    /// anywhere in its name.
    Pattern(Regex),
    /// A pattern in source form, compiled when installed.
    PatternString(String),
}

impl TryFrom<Value> for SelfClosingConfig {
    type Error = DomError;

    /// Accepts an array of strings (names), a string (pattern), or an
    /// object of the form `{"pattern": "..."}`.
    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::String(pattern) => Ok(Self::PatternString(pattern)),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(name) => Ok(name),
                    other => Err(unsupported(format!("expected a tag name, got {other}"))),
                })
                .collect::<Result<Vec<_>>>()
                .map(Self::Names),
            Value::Object(mut map) => match map.remove("pattern") {
                Some(Value::String(pattern)) if map.is_empty() => Ok(Self::PatternString(pattern)),
                _ => Err(unsupported(
                    "expected an object with a single string \"pattern\" field".to_string(),
                )),
            },
            other => Err(unsupported(format!("unrecognized value {other}"))),
        }
    }
}

/// The installed form of a [`SelfClosingConfig`].
#[derive(Debug)]
enum CustomSelfClosing {
    Names(HashSet<String>),
    Pattern(Regex),
}

impl CustomSelfClosing {
    fn compile(config: SelfClosingConfig) -> Result<Self> {
        match config {
            SelfClosingConfig::Names(names) => Ok(Self::Names(names.into_iter().collect())),
            SelfClosingConfig::Pattern(regex) => Ok(Self::Pattern(regex)),
            SelfClosingConfig::PatternString(source) => Regex::new(&source)
                .map(Self::Pattern)
                .map_err(|err| unsupported(format!("invalid pattern {source:?}: {err}"))),
        }
    }

    fn matches(&self, tag_name: &str) -> bool {
        match self {
            Self::Names(names) => names.contains(tag_name),
            Self::Pattern(regex) => regex.is_match(tag_name),
        }
    }
}

/// Process-wide custom predicate. `None` means only the built-in set applies.
static CUSTOM_SELF_CLOSING: RwLock<Option<CustomSelfClosing>> = RwLock::new(None);

fn unsupported(reason: String) -> DomError {
    DomError::UnsupportedSelfClosingConfig { reason }
}

/// Install (or with `None`, clear) the process-wide custom self-closing
/// predicate.
///
/// # Errors
///
/// Returns [`DomError::UnsupportedSelfClosingConfig`] if a pattern string
/// does not compile. The previous configuration stays in place.
pub fn set_custom_self_closing(config: Option<SelfClosingConfig>) -> Result<()> {
    let compiled = config.map(CustomSelfClosing::compile).transpose()?;
    tracing::debug!(configured = compiled.is_some(), "custom self-closing tags updated");
    *CUSTOM_SELF_CLOSING
        .write()
        .unwrap_or_else(PoisonError::into_inner) = compiled;
    Ok(())
}

/// Whether `tag_name` is in the built-in self-closing set.
#[must_use]
pub fn is_builtin_self_closing(tag_name: &str) -> bool {
    BUILTIN_SELF_CLOSING
        .iter()
        .any(|builtin| builtin.eq_ignore_ascii_case(tag_name))
}

/// Whether `tag_name` matches the configured custom predicate.
#[must_use]
pub fn is_custom_self_closing(tag_name: &str) -> bool {
    CUSTOM_SELF_CLOSING
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .is_some_and(|custom| custom.matches(tag_name))
}

/// Whether `tag_name` is self-closing, built-in or configured.
#[must_use]
pub fn is_self_closing(tag_name: &str) -> bool {
    is_builtin_self_closing(tag_name) || is_custom_self_closing(tag_name)
}
