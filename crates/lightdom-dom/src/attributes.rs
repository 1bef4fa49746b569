//! Element attribute storage.
//!
//! [§ 4.9.2 Interface NamedNodeMap](https://dom.spec.whatwg.org/#interface-namednodemap)
//!
//! "A NamedNodeMap has an associated element... and an attribute list."
//!
//! Attributes are kept in two synchronized structures: an ordered list of
//! (name, value) pairs, which drives serialization, and a name-keyed index
//! into that list for O(1) lookup. Every mutation updates both.

use std::collections::HashMap;

use serde::Serialize;

/// A single attribute on an element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    /// Attribute name, case as written.
    pub name: String,
    /// Attribute value. Boolean attributes carry their own name.
    pub value: String,
}

impl Attribute {
    /// Create a new attribute with the given name and value.
    #[must_use]
    pub const fn new(name: String, value: String) -> Self {
        Self { name, value }
    }
}

/// Ordered, name-unique attribute collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    /// Insertion-ordered entries.
    entries: Vec<Attribute>,
    /// Name to position in `entries`.
    index: HashMap<String, usize>,
}

impl Attributes {
    /// Create an empty attribute collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value of the attribute called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.index
            .get(name)
            .map(|&position| self.entries[position].value.as_str())
    }

    /// The attribute at `position` in insertion order.
    #[must_use]
    pub fn get_index(&self, position: usize) -> Option<&Attribute> {
        self.entries.get(position)
    }

    /// Whether an attribute called `name` exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Set `name` to `value`.
    ///
    /// An existing attribute keeps its position and has its value replaced;
    /// the previous value is returned. A new attribute is appended.
    pub fn set(&mut self, name: &str, value: &str) -> Option<String> {
        if let Some(&position) = self.index.get(name) {
            return Some(std::mem::replace(
                &mut self.entries[position].value,
                value.to_string(),
            ));
        }
        let _ = self.index.insert(name.to_string(), self.entries.len());
        self.entries
            .push(Attribute::new(name.to_string(), value.to_string()));
        None
    }

    /// Remove the attribute called `name`, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let position = self.index.remove(name)?;
        let removed = self.entries.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        Some(removed.value)
    }

    /// Iterate attributes in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.entries.iter()
    }

    /// Attribute names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|attr| attr.name.as_str())
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<N: AsRef<str>, V: AsRef<str>> FromIterator<(N, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut attrs = Self::new();
        for (name, value) in iter {
            let _ = attrs.set(name.as_ref(), value.as_ref());
        }
        attrs
    }
}
