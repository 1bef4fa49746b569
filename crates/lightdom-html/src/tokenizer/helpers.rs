//! Character classes and scanning helpers for the tag tokenizer.
//!
//! All delimiters are ASCII, so scanning works on bytes and every offset
//! it produces is a valid `str` boundary.

/// First character of a tag or attribute name: an ASCII letter.
#[must_use]
pub const fn is_tag_name_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic()
}

/// Any later character of a tag or attribute name.
#[must_use]
pub const fn is_name_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b':' | b'-' | b'_')
}

/// [§ 12.1.4 ASCII whitespace](https://infra.spec.whatwg.org/#ascii-whitespace)
#[must_use]
pub const fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\x0C' | b'\r')
}

/// Length of the run of name characters at the start of `bytes`.
#[must_use]
pub fn name_len(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .position(|&byte| !is_name_char(byte))
        .unwrap_or(bytes.len())
}

/// Outcome of scanning for the `>` that ends a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagEnd {
    /// The tag ends at this offset.
    At(usize),
    /// An unterminated quoted value swallowed the rest of the input, and a
    /// `>` inside it may still end a later tag.
    QuotedPastEnd,
    /// No `>` remains anywhere in the input.
    Missing,
}

/// Locate the `>` that ends the tag whose attributes start at `from`.
///
/// A quote directly after `=` (whitespace allowed in between) opens a
/// value; a `>` inside it does not count.
#[must_use]
pub fn find_tag_end(bytes: &[u8], from: usize) -> TagEnd {
    let mut pos = from;
    let mut after_equals = false;

    while pos < bytes.len() {
        match bytes[pos] {
            b'>' => return TagEnd::At(pos),
            b'=' => after_equals = true,
            quote @ (b'"' | b'\'') if after_equals => {
                let rest = &bytes[pos + 1..];
                let Some(value_len) = rest.iter().position(|&b| b == quote) else {
                    return if rest.contains(&b'>') {
                        TagEnd::QuotedPastEnd
                    } else {
                        TagEnd::Missing
                    };
                };
                pos += value_len + 1;
                after_equals = false;
            }
            byte if is_whitespace(byte) => {}
            _ => after_equals = false,
        }
        pos += 1;
    }
    TagEnd::Missing
}
