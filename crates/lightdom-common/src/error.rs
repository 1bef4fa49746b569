//! Error kinds raised while building or configuring a document.
//!
//! Every error is raised at the point of detection and propagated to the
//! caller of the triggering operation. Nothing is retried internally.

use thiserror::Error;

/// Result alias used across the lightdom crates.
pub type Result<T> = std::result::Result<T, DomError>;

/// Failure raised by document construction, `innerHTML` assignment, or
/// self-closing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// An attribute name was expected but the raw attribute text did not
    /// start with one (for example an unescaped `<` or a leading digit).
    #[error("malformed attribute in <{tag}> near {remainder:?}")]
    MalformedAttribute {
        /// Tag name of the element that owns the attribute text.
        tag: String,
        /// Unconsumed attribute text at the point of failure.
        remainder: String,
    },

    /// A closing tag arrived with no open tag, or did not match the
    /// innermost open tag.
    #[error("unexpected closing tag </{found}>, expected {}", describe_expected(.expected))]
    UnexpectedClosingTag {
        /// Name of the closing tag that was found.
        found: String,
        /// Name of the innermost open tag, if any.
        expected: Option<String>,
    },

    /// Input ended while tags were still open.
    #[error("unclosed tag {}", join_tags(.tags))]
    UnclosedTag {
        /// Still-open tag names, innermost first.
        tags: Vec<String>,
    },

    /// The custom self-closing configuration had an unrecognized shape or
    /// an invalid pattern.
    #[error("unsupported self-closing configuration: {reason}")]
    UnsupportedSelfClosingConfig {
        /// What was wrong with the value.
        reason: String,
    },
}

fn describe_expected(expected: &Option<String>) -> String {
    expected
        .as_ref()
        .map_or_else(|| "no open tag".to_string(), |tag| format!("</{tag}>"))
}

fn join_tags(tags: &[String]) -> String {
    tags.join(", ")
}
