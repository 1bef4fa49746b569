//! Class membership backed by the `class` attribute.
//!
//! [§ 7.1 Interface DOMTokenList](https://dom.spec.whatwg.org/#interface-domtokenlist)
//!
//! The `class` attribute is the single source of truth. [`ClassList`] reads
//! it; [`ClassListMut`] rewrites it, tokenizing on ASCII whitespace and
//! joining the result with single spaces.

use crate::attributes::Attributes;

const CLASS: &str = "class";

/// Read-only view of an element's classes.
#[derive(Debug, Clone, Copy)]
pub struct ClassList<'a> {
    value: Option<&'a str>,
}

impl<'a> ClassList<'a> {
    /// View the classes stored in `attrs`.
    #[must_use]
    pub fn new(attrs: &'a Attributes) -> Self {
        Self {
            value: attrs.get(CLASS),
        }
    }

    /// Whether `name` is one of the classes.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.iter().any(|class| class == name)
    }

    /// Iterate the classes in attribute order.
    pub fn iter(&self) -> impl Iterator<Item = &'a str> + use<'a> {
        self.value.unwrap_or_default().split_ascii_whitespace()
    }

    /// Number of class tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Whether there are no class tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

/// Mutable view of an element's classes.
#[derive(Debug)]
pub struct ClassListMut<'a> {
    attrs: &'a mut Attributes,
}

impl<'a> ClassListMut<'a> {
    /// Edit the classes stored in `attrs`.
    pub const fn new(attrs: &'a mut Attributes) -> Self {
        Self { attrs }
    }

    fn tokens(&self) -> Vec<String> {
        ClassList::new(self.attrs).iter().map(str::to_string).collect()
    }

    fn store(&mut self, tokens: &[String]) {
        let _ = self.attrs.set(CLASS, &tokens.join(" "));
    }

    /// Whether `name` is one of the classes.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        ClassList::new(self.attrs).contains(name)
    }

    /// Add each name that is not already present.
    pub fn add(&mut self, names: &[&str]) {
        let mut tokens = self.tokens();
        let before = tokens.len();
        for name in names {
            if !tokens.iter().any(|token| token == name) {
                tokens.push((*name).to_string());
            }
        }
        if tokens.len() != before || !self.attrs.contains(CLASS) {
            self.store(&tokens);
        }
    }

    /// Remove every occurrence of each name.
    pub fn remove(&mut self, names: &[&str]) {
        if !self.attrs.contains(CLASS) {
            return;
        }
        let mut tokens = self.tokens();
        tokens.retain(|token| !names.contains(&token.as_str()));
        self.store(&tokens);
    }

    /// Remove `name` if present, otherwise add it. Returns whether the class
    /// is present afterwards.
    pub fn toggle(&mut self, name: &str) -> bool {
        if self.contains(name) {
            self.remove(&[name]);
            false
        } else {
            self.add(&[name]);
            true
        }
    }

    /// Replace `old` with `new`. Returns `false` and changes nothing when
    /// `old` is absent.
    pub fn replace(&mut self, old: &str, new: &str) -> bool {
        if !self.contains(old) {
            return false;
        }
        let mut tokens = self.tokens();
        let already_present = tokens.iter().any(|token| token == new);
        let mut replaced = false;
        tokens.retain_mut(|token| {
            if token != old {
                return true;
            }
            if replaced || already_present {
                return false;
            }
            new.clone_into(token);
            replaced = true;
            true
        });
        self.store(&tokens);
        true
    }
}
