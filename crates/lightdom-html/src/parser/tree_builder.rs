//! Tree builder.
//!
//! Consumes tag tokens in order and appends nodes under a parent. Open
//! elements live on an explicit stack, so nesting depth is bounded by the
//! heap rather than the call stack. Every closing tag must match the
//! innermost open element.

use lightdom_common::self_closing::is_self_closing;
use lightdom_common::{DomError, Result};
use lightdom_dom::{DomTree, NodeId};

use super::attributes::apply_attributes;
use crate::tokenizer::{TagKind, TagToken, TagTokenizer};

/// An element waiting for its closing tag.
#[derive(Debug)]
struct OpenElement {
    name: String,
    node: NodeId,
}

/// Builds nodes from markup under a fixed parent.
///
/// Each builder holds its own stack of open elements, so separate parses
/// never share state.
pub struct TreeBuilder<'t> {
    tree: &'t mut DomTree,
    root: NodeId,
    open_elements: Vec<OpenElement>,
}

impl<'t> TreeBuilder<'t> {
    /// Create a builder that appends under `root`.
    pub const fn new(tree: &'t mut DomTree, root: NodeId) -> Self {
        Self {
            tree,
            root,
            open_elements: Vec::new(),
        }
    }

    /// Parse `input` and append the resulting nodes.
    ///
    /// Text between tags (whitespace included) becomes a Text node under
    /// the innermost open element. Empty runs produce nothing.
    ///
    /// # Errors
    ///
    /// - [`DomError::MalformedAttribute`] from a tag's attribute text
    /// - [`DomError::UnexpectedClosingTag`] when a closing tag does not
    ///   match the innermost open element
    /// - [`DomError::UnclosedTag`] when input ends with elements still open
    ///
    /// Nodes appended before the error stay in the tree. A self-closing
    /// root takes no children, so nothing is parsed under it.
    pub fn run(mut self, input: &str) -> Result<()> {
        if self
            .tree
            .tag_name(self.root)
            .is_some_and(is_self_closing)
        {
            tracing::debug!(node = self.root.0, "self-closing root ignores markup");
            return Ok(());
        }
        let mut text_start = 0;

        for token in TagTokenizer::new(input) {
            tracing::trace!(
                kind = %token.kind,
                name = token.name,
                index = token.index,
                depth = self.open_elements.len(),
                "tag"
            );
            self.insert_text(&input[text_start..token.index]);
            text_start = token.end;

            match token.kind {
                TagKind::Open => self.open_element(&token)?,
                TagKind::Close => self.close_element(token.name)?,
            }
        }
        self.insert_text(&input[text_start..]);

        if self.open_elements.is_empty() {
            Ok(())
        } else {
            Err(DomError::UnclosedTag {
                tags: self
                    .open_elements
                    .drain(..)
                    .rev()
                    .map(|open| open.name)
                    .collect(),
            })
        }
    }

    fn current_parent(&self) -> NodeId {
        self.open_elements.last().map_or(self.root, |open| open.node)
    }

    fn insert_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let parent = self.current_parent();
        let node = self.tree.create_text_node(text);
        self.tree.append_child(parent, node);
    }

    fn open_element(&mut self, token: &TagToken<'_>) -> Result<()> {
        let element = self.tree.create_element(token.name);
        if let Some(raw) = token.raw_attributes {
            apply_attributes(self.tree, element, token.name, raw)?;
        }
        let parent = self.current_parent();
        self.tree.append_child(parent, element);

        if !token.self_closing && !is_self_closing(token.name) {
            self.open_elements.push(OpenElement {
                name: token.name.to_string(),
                node: element,
            });
        }
        Ok(())
    }

    fn close_element(&mut self, name: &str) -> Result<()> {
        match self.open_elements.last() {
            Some(open) if open.name == name => {
                let _ = self.open_elements.pop();
                Ok(())
            }
            innermost => Err(DomError::UnexpectedClosingTag {
                found: name.to_string(),
                expected: innermost.map(|open| open.name.clone()),
            }),
        }
    }
}

/// Parse `input` and append the result under `parent`.
///
/// # Errors
///
/// See [`TreeBuilder::run`].
pub fn parse_fragment(tree: &mut DomTree, parent: NodeId, input: &str) -> Result<()> {
    TreeBuilder::new(tree, parent).run(input)
}
