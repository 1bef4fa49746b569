//! Attribute parser.
//!
//! Accepted forms, separated by whitespace:
//! - `name="value"` and `name='value'` (the value may hold `>` or spaces)
//! - `name=value` (unquoted, ends at whitespace)
//! - `name` alone, a boolean attribute whose value is its own name
//!
//! Whitespace is allowed on either side of `=`.

use lightdom_common::{DomError, Result};
use lightdom_dom::{Attribute, DomTree, NodeId};

use crate::tokenizer::helpers::{is_tag_name_start, name_len};

fn malformed(tag: &str, remainder: &str) -> DomError {
    DomError::MalformedAttribute {
        tag: tag.to_string(),
        remainder: remainder.to_string(),
    }
}

/// Split `input` into a value and the text after it.
fn read_value<'a>(tag: &str, input: &'a str) -> Result<(&'a str, &'a str)> {
    match input.as_bytes().first() {
        Some(&quote @ (b'"' | b'\'')) => {
            let body = &input[1..];
            let close = body
                .find(char::from(quote))
                .ok_or_else(|| malformed(tag, input))?;
            Ok((&body[..close], &body[close + 1..]))
        }
        _ => {
            let end = input.find(char::is_whitespace).unwrap_or(input.len());
            Ok(input.split_at(end))
        }
    }
}

/// Parse the raw attribute text of one `<tag ...>` into ordered pairs.
///
/// # Errors
///
/// [`DomError::MalformedAttribute`] when a name is expected but the text
/// does not start with an ASCII letter, or when a quoted value is never
/// closed. Nothing is returned for a tag that fails.
pub fn parse_attributes(tag: &str, raw: &str) -> Result<Vec<Attribute>> {
    let mut attributes = Vec::new();
    let mut rest = raw.trim_start();

    while !rest.is_empty() {
        let bytes = rest.as_bytes();
        if !is_tag_name_start(bytes[0]) {
            return Err(malformed(tag, rest));
        }
        let (name, after_name) = rest.split_at(name_len(bytes));
        let after_name = after_name.trim_start();

        if let Some(value_text) = after_name.strip_prefix('=') {
            let (value, remaining) = read_value(tag, value_text.trim_start())?;
            attributes.push(Attribute::new(name.to_string(), value.to_string()));
            rest = remaining.trim_start();
        } else {
            attributes.push(Attribute::new(name.to_string(), name.to_string()));
            rest = after_name;
        }
    }

    Ok(attributes)
}

/// Parse `raw` and set every attribute on `element`, in order.
///
/// A repeated name replaces the earlier value in place.
///
/// # Errors
///
/// See [`parse_attributes`]. The element is left untouched on failure.
pub fn apply_attributes(tree: &mut DomTree, element: NodeId, tag: &str, raw: &str) -> Result<()> {
    for attribute in parse_attributes(tag, raw)? {
        tree.set_attribute(element, &attribute.name, &attribute.value);
    }
    Ok(())
}
