use core::fmt;

use strum_macros::Display;

/// Whether a tag opens or closes an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum TagKind {
    /// `<name ...>` or `<name .../>`
    Open,
    /// `</name>`
    Close,
}

/// One tag found in the input, borrowing from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagToken<'a> {
    /// Opening or closing.
    pub kind: TagKind,
    /// Byte offset of the `<`.
    pub index: usize,
    /// Byte offset just past the `>`.
    pub end: usize,
    /// The full matched text, `<` through `>`.
    pub text: &'a str,
    /// Tag name, case as written.
    pub name: &'a str,
    /// Text between the name and the `>` (or the self-closing `/`), if it
    /// holds anything but whitespace.
    pub raw_attributes: Option<&'a str>,
    /// A `/` immediately preceded the `>`.
    pub self_closing: bool,
}

impl fmt::Display for TagToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} tag <{}> at {}", self.kind, self.name, self.index)?;
        if self.self_closing {
            write!(f, " (self-closing)")?;
        }
        Ok(())
    }
}
