//! Tag tokenizer.
//!
//! Unlike a WHATWG tokenizer this one only recognizes tags. Everything
//! between two tags is handed to the caller as literal text.

/// Character classes and quote-aware scanning.
pub mod helpers;
/// The token type produced by the tokenizer.
pub mod token;

pub use token::{TagKind, TagToken};

use helpers::{TagEnd, find_tag_end, is_tag_name_start, name_len};

/// Find the first tag that starts at or after byte offset `from`.
///
/// A `<` that is not followed by a tag name (or `/` and a tag name) is
/// skipped, as is a tag with no terminating `>`. A tag cut off by the end
/// of input, closing tags included, is text. `from` must lie on a
/// character boundary.
#[must_use]
pub fn next_tag(input: &str, from: usize) -> Option<TagToken<'_>> {
    let bytes = input.as_bytes();
    let mut search = from;

    while let Some(offset) = input.get(search..)?.find('<') {
        let index = search + offset;
        // Every rejected candidate resumes one byte past its `<`.
        search = index + 1;

        let mut pos = index + 1;
        let kind = if bytes.get(pos) == Some(&b'/') {
            pos += 1;
            TagKind::Close
        } else {
            TagKind::Open
        };

        if !bytes.get(pos).copied().is_some_and(is_tag_name_start) {
            continue;
        }
        let name_start = pos;
        pos += name_len(&bytes[pos..]);

        let close = match find_tag_end(bytes, pos) {
            TagEnd::At(close) => close,
            TagEnd::QuotedPastEnd => continue,
            // Every later candidate would need a `>` too.
            TagEnd::Missing => return None,
        };

        let (attributes_end, self_closing) = if close > pos && bytes[close - 1] == b'/' {
            (close - 1, true)
        } else {
            (close, false)
        };
        let raw = &input[pos..attributes_end];

        return Some(TagToken {
            kind,
            index,
            end: close + 1,
            text: &input[index..=close],
            name: &input[name_start..pos],
            raw_attributes: (!raw.trim().is_empty()).then_some(raw),
            self_closing,
        });
    }
    None
}

/// Iterator over every tag in a string, in order.
#[derive(Debug, Clone)]
pub struct TagTokenizer<'a> {
    input: &'a str,
    cursor: usize,
}

impl<'a> TagTokenizer<'a> {
    /// Tokenize `input` from the start.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self { input, cursor: 0 }
    }

    /// Byte offset just past the last emitted tag.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }
}

impl<'a> Iterator for TagTokenizer<'a> {
    type Item = TagToken<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = next_tag(self.input, self.cursor)?;
        self.cursor = token.end;
        Some(token)
    }
}
