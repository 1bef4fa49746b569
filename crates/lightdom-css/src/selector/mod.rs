//! Selector parsing and matching
//!
//! This module implements a small subset of
//! [Selectors Level 4](https://www.w3.org/TR/selectors-4/). Parsing never
//! fails: syntax outside the subset is skipped with a one-time warning and
//! the rest of the entry is kept.

use core::fmt;
use std::iter::Peekable;
use std::str::Chars;

use lightdom_common::warning::warn_once;
use lightdom_dom::{DomTree, ElementData, NodeId};

/// Attribute selectors per [§ 6.4](https://www.w3.org/TR/selectors-4/#attribute-selectors)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeSelector {
    /// `[name]`: the attribute is present, whatever its value.
    ///
    /// Example: `[__ready]` matches `<isinclude __ready>`
    Exists(String),

    /// `[name=value]`: exact value.
    Equals(String, String),

    /// `[name^=value]`: value starts with the given text.
    ///
    /// Example: `[href^="https"]` matches `<a href="https://example.com">`
    PrefixMatch(String, String),

    /// `[name$=value]`: value ends with the given text.
    SuffixMatch(String, String),

    /// `[name*=value]`: value contains the given text anywhere.
    SubstringMatch(String, String),
}

impl AttributeSelector {
    /// The attribute this selector tests.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Exists(name)
            | Self::Equals(name, _)
            | Self::PrefixMatch(name, _)
            | Self::SuffixMatch(name, _)
            | Self::SubstringMatch(name, _) => name,
        }
    }

    /// Check the attribute against the element. A missing attribute never
    /// matches.
    #[must_use]
    pub fn matches(&self, element: &ElementData) -> bool {
        let Some(actual) = element.attrs.get(self.name()) else {
            return false;
        };
        match self {
            Self::Exists(_) => true,
            Self::Equals(_, val) => actual == val,
            Self::PrefixMatch(_, val) => actual.starts_with(val.as_str()),
            Self::SuffixMatch(_, val) => actual.ends_with(val.as_str()),
            Self::SubstringMatch(_, val) => actual.contains(val.as_str()),
        }
    }
}

impl fmt::Display for AttributeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (op, val) = match self {
            Self::Exists(name) => return write!(f, "[{name}]"),
            Self::Equals(_, val) => ("=", val),
            Self::PrefixMatch(_, val) => ("^=", val),
            Self::SuffixMatch(_, val) => ("$=", val),
            Self::SubstringMatch(_, val) => ("*=", val),
        };
        write!(f, "[{}{op}\"{val}\"]", self.name())
    }
}

/// A single test inside a selector entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    ///
    /// Compared case-sensitively against the tag name as written.
    Type(String),

    /// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
    Universal,

    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    Class(String),

    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    Id(String),

    /// An attribute test, optionally restricted to one tag name.
    /// `*[a]` is stored without a tag.
    Attribute {
        /// Required tag name, if any.
        tag: Option<String>,
        /// The attribute test.
        selector: AttributeSelector,
    },
}

impl Clause {
    /// Check if this clause matches the given element.
    #[must_use]
    pub fn matches(&self, element: &ElementData) -> bool {
        match self {
            Self::Type(name) => element.tag_name == *name,
            Self::Universal => true,
            Self::Class(class_name) => element.class_list().contains(class_name),
            Self::Id(id) => element.id() == Some(id.as_str()),
            Self::Attribute { tag, selector } => {
                tag.as_ref().is_none_or(|tag| element.tag_name == *tag) && selector.matches(element)
            }
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(name) => f.write_str(name),
            Self::Universal => f.write_str("*"),
            Self::Class(name) => write!(f, ".{name}"),
            Self::Id(name) => write!(f, "#{name}"),
            Self::Attribute { tag, selector } => {
                write!(f, "{}{selector}", tag.as_deref().unwrap_or_default())
            }
        }
    }
}

/// One comma-separated entry of a selector list.
///
/// The clauses are alternatives: an element satisfies the entry when ANY
/// clause matches it, so `div.note` selects every `div` as well as every
/// element with class `note`. An entry with no clauses matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorEntry {
    /// Clauses in source order.
    pub clauses: Vec<Clause>,
}

impl SelectorEntry {
    /// Check if any clause matches the element.
    #[must_use]
    pub fn matches(&self, element: &ElementData) -> bool {
        self.clauses.iter().any(|clause| clause.matches(element))
    }
}

impl fmt::Display for SelectorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Space-separated so that `div` followed by `[a]` does not read
        // back as the single clause `div[a]`.
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{clause}")?;
        }
        Ok(())
    }
}

/// [§ 4.1 Selector lists](https://www.w3.org/TR/selectors-4/#grouping)
///
/// "A list of simple/compound/complex selectors is a comma-separated list
/// of simple, compound, or complex selectors."
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorList {
    /// Entries in source order.
    pub entries: Vec<SelectorEntry>,
}

impl SelectorList {
    /// True when no entry holds a clause, so nothing can match.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|entry| entry.clauses.is_empty())
    }

    /// Check the list against element data. Stops at the first matching
    /// entry.
    #[must_use]
    pub fn matches_element(&self, element: &ElementData) -> bool {
        self.entries.iter().any(|entry| entry.matches(element))
    }

    /// Check the list against a node. Non-element nodes never match.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, node_id: NodeId) -> bool {
        tree.as_element(node_id)
            .is_some_and(|element| self.matches_element(element))
    }

    /// Every matching element below `from`, in tree order, excluding `from`.
    #[must_use]
    pub fn select_all(&self, tree: &DomTree, from: NodeId) -> Vec<NodeId> {
        tree.find_elements(from, |_, element| self.matches_element(element))
    }

    /// The first matching element below `from` in tree order.
    #[must_use]
    pub fn select_first(&self, tree: &DomTree, from: NodeId) -> Option<NodeId> {
        tree.descendants(from).find(|&id| self.matches(tree, id))
    }
}

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}

/// Characters allowed in tag, class, ID, and attribute names.
const fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ':')
}

fn take_name(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut name = String::new();
    while let Some(c) = chars.next_if(|&c| is_name_char(c)) {
        name.push(c);
    }
    name
}

fn skip_whitespace(chars: &mut Peekable<Chars<'_>>) {
    while chars.next_if(|c| c.is_whitespace()).is_some() {}
}

/// Consume up to and including `end`, or to the end of input.
fn skip_past(chars: &mut Peekable<Chars<'_>>, end: char) {
    for c in chars.by_ref() {
        if c == end {
            break;
        }
    }
}

fn unsupported(entry: &str, what: &str) {
    let _ = warn_once("Selector", &format!("ignoring unsupported {what} in {entry:?}"));
}

/// Parse an attribute value inside `[attr=value]`.
/// Handles both quoted (`"val"`, `'val'`) and bare values; a bare value
/// ends at whitespace or `]`.
fn parse_attr_value(chars: &mut Peekable<Chars<'_>>) -> Option<String> {
    skip_whitespace(chars);
    match chars.peek() {
        Some(&q @ ('"' | '\'')) => {
            let _ = chars.next();
            let mut val = String::new();
            for ch in chars.by_ref() {
                if ch == q {
                    return Some(val);
                }
                val.push(ch);
            }
            None // unterminated string
        }
        _ => {
            let mut val = String::new();
            while let Some(ch) = chars.next_if(|&ch| ch != ']' && !ch.is_whitespace()) {
                val.push(ch);
            }
            Some(val)
        }
    }
}

/// Parse the rest of an attribute clause; the opening `[` is already
/// consumed.
fn parse_attribute(
    chars: &mut Peekable<Chars<'_>>,
    tag: Option<String>,
    entry: &str,
) -> Option<Clause> {
    skip_whitespace(chars);
    let name = take_name(chars);
    skip_whitespace(chars);

    let operator = chars.next_if(|&c| matches!(c, '^' | '$' | '*'));
    let selector = match (operator, chars.next()) {
        (None, Some(']')) if !name.is_empty() => AttributeSelector::Exists(name),
        (_, Some('=')) if !name.is_empty() => {
            let Some(val) = parse_attr_value(chars) else {
                unsupported(entry, "unterminated attribute value");
                return None;
            };
            skip_whitespace(chars);
            if chars.next() != Some(']') {
                unsupported(entry, "attribute selector");
                skip_past(chars, ']');
                return None;
            }
            match operator {
                Some('^') => AttributeSelector::PrefixMatch(name, val),
                Some('$') => AttributeSelector::SuffixMatch(name, val),
                Some('*') => AttributeSelector::SubstringMatch(name, val),
                _ => AttributeSelector::Equals(name, val),
            }
        }
        (_, Some(']')) => {
            unsupported(entry, "attribute selector");
            return None;
        }
        _ => {
            // `~=`, `|=`, a missing name, and the like.
            unsupported(entry, "attribute selector");
            skip_past(chars, ']');
            return None;
        }
    };

    Some(Clause::Attribute { tag, selector })
}

/// Consume through the `)` that balances an already-consumed `(`.
fn skip_parenthesized(chars: &mut Peekable<Chars<'_>>) {
    let mut depth = 1u32;
    for ch in chars.by_ref() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            _ => {}
        }
    }
}

/// Skip a pseudo-class or pseudo-element, including any parenthesized
/// argument. The leading `:` is already consumed.
fn skip_pseudo(chars: &mut Peekable<Chars<'_>>) {
    let _ = chars.next_if_eq(&':');
    let _ = take_name(chars);
    if chars.next_if_eq(&'(').is_some() {
        skip_parenthesized(chars);
    }
}

fn parse_entry(entry: &str) -> SelectorEntry {
    let mut clauses = Vec::new();
    let mut chars = entry.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            // Whitespace only separates clauses; it is not a combinator here.
            c if c.is_whitespace() => {}

            '.' | '#' => {
                let name = take_name(&mut chars);
                if name.is_empty() {
                    unsupported(entry, &format!("empty {c} clause"));
                } else if c == '.' {
                    clauses.push(Clause::Class(name));
                } else {
                    clauses.push(Clause::Id(name));
                }
            }

            '*' => {
                if chars.next_if_eq(&'[').is_some() {
                    clauses.extend(parse_attribute(&mut chars, None, entry));
                } else {
                    clauses.push(Clause::Universal);
                }
            }

            '[' => clauses.extend(parse_attribute(&mut chars, None, entry)),

            ':' => {
                unsupported(entry, "pseudo-class");
                skip_pseudo(&mut chars);
            }

            c if is_name_char(c) => {
                let mut name = String::from(c);
                name.push_str(&take_name(&mut chars));
                if chars.next_if_eq(&'[').is_some() {
                    clauses.extend(parse_attribute(&mut chars, Some(name), entry));
                } else {
                    clauses.push(Clause::Type(name));
                }
            }

            '(' => {
                unsupported(entry, "parenthesized argument");
                skip_parenthesized(&mut chars);
            }

            '>' | '+' | '~' => unsupported(entry, &format!("combinator '{c}'")),

            other => unsupported(entry, &format!("character '{other}'")),
        }
    }

    SelectorEntry { clauses }
}

/// Split on commas that are not inside a quoted attribute value.
fn split_entries(input: &str) -> Vec<&str> {
    let mut entries = Vec::new();
    let mut start = 0;
    let mut quote = None;

    for (i, c) in input.char_indices() {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), _) if c == q => quote = None,
            (None, ',') => {
                entries.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    entries.push(&input[start..]);
    entries
}

/// Parse a comma-separated selector list.
///
/// Empty entries are dropped. Unsupported syntax is skipped with a
/// deduplicated warning rather than rejected.
#[must_use]
pub fn parse_selector_list(input: &str) -> SelectorList {
    SelectorList {
        entries: split_entries(input)
            .into_iter()
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(parse_entry)
            .collect(),
    }
}

/// [§ 4.2.6 querySelectorAll()](https://dom.spec.whatwg.org/#dom-parentnode-queryselectorall)
///
/// Every element below `from` matching `selector`, in tree order.
#[must_use]
pub fn query_selector_all(tree: &DomTree, from: NodeId, selector: &str) -> Vec<NodeId> {
    parse_selector_list(selector).select_all(tree, from)
}

/// [§ 4.2.6 querySelector()](https://dom.spec.whatwg.org/#dom-parentnode-queryselector)
///
/// The first element below `from` matching `selector`.
#[must_use]
pub fn query_selector(tree: &DomTree, from: NodeId, selector: &str) -> Option<NodeId> {
    parse_selector_list(selector).select_first(tree, from)
}
