//! Markup serialization.
//!
//! [§ 13.3 Serializing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments)
//!
//! The output is the inverse of `lightdom-html`'s parser rather than the
//! WHATWG algorithm:
//! - attributes are double-quoted, in insertion order;
//! - self-closing tags (built-in or configured) render as `<tag/>` or
//!   `<tag a="v"/>` and never print children;
//! - text is written verbatim.
//!
//! Serialization walks the tree with an explicit stack, so deeply nested
//! input cannot exhaust the call stack.

use lightdom_common::self_closing::is_self_closing;
use serde::Serialize;

use crate::{Attribute, DomTree, ElementData, NodeId, NodeType};

enum Step {
    Node(NodeId),
    Close(NodeId),
}

fn write_start_tag(out: &mut String, data: &ElementData, self_closing: bool) {
    out.push('<');
    out.push_str(&data.tag_name);
    for attr in &data.attrs {
        out.push(' ');
        out.push_str(&attr.name);
        out.push_str("=\"");
        out.push_str(&attr.value);
        out.push('"');
    }
    out.push_str(if self_closing { "/>" } else { ">" });
}

fn write_end_tag(out: &mut String, data: &ElementData) {
    out.push_str("</");
    out.push_str(&data.tag_name);
    out.push('>');
}

impl DomTree {
    /// Append the markup of `roots` (and everything below them) to `out`.
    fn serialize_into(&self, roots: &[NodeId], out: &mut String) {
        let mut stack: Vec<Step> = roots.iter().rev().map(|&id| Step::Node(id)).collect();

        while let Some(step) = stack.pop() {
            match step {
                Step::Close(id) => {
                    if let Some(data) = self.as_element(id) {
                        write_end_tag(out, data);
                    }
                }
                Step::Node(id) => {
                    let Some(node) = self.get(id) else { continue };
                    match &node.node_type {
                        NodeType::Text(text) => out.push_str(text),
                        NodeType::Document => {
                            stack.extend(node.children.iter().rev().map(|&c| Step::Node(c)));
                        }
                        NodeType::Element(data) => {
                            let self_closing = is_self_closing(&data.tag_name);
                            write_start_tag(out, data, self_closing);
                            if !self_closing {
                                stack.push(Step::Close(id));
                                stack.extend(node.children.iter().rev().map(|&c| Step::Node(c)));
                            }
                        }
                    }
                }
            }
        }
    }

    /// [§ 3.5.1 innerHTML](https://html.spec.whatwg.org/multipage/dynamic-markup-insertion.html#dom-element-innerhtml)
    ///
    /// Each child's serialized form, concatenated in order.
    #[must_use]
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.serialize_into(self.children(id), &mut out);
        out
    }

    /// [§ 3.5.2 outerHTML](https://html.spec.whatwg.org/multipage/dynamic-markup-insertion.html#dom-element-outerhtml)
    ///
    /// The node's own markup. For the Document node this is its inner HTML.
    #[must_use]
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.serialize_into(&[id], &mut out);
        out
    }

    /// Structural copy of the subtree at `id`, for JSON dumps and
    /// structural comparisons. Built bottom-up with an explicit stack.
    #[must_use]
    pub fn snapshot(&self, id: NodeId) -> Option<NodeSnapshot> {
        let _ = self.get(id)?;
        let mut stack = vec![SnapshotFrame::new(id)];

        while let Some(frame) = stack.last_mut() {
            if let Some(&child) = self.children(frame.id).get(frame.next_child) {
                frame.next_child += 1;
                stack.push(SnapshotFrame::new(child));
                continue;
            }

            let Some(frame) = stack.pop() else { break };
            let Some(snapshot) = self.snapshot_node(frame.id, frame.children) else {
                continue;
            };
            match stack.last_mut() {
                Some(parent) => parent.children.push(snapshot),
                None => return Some(snapshot),
            }
        }
        None
    }

    fn snapshot_node(&self, id: NodeId, children: Vec<NodeSnapshot>) -> Option<NodeSnapshot> {
        Some(match &self.get(id)?.node_type {
            NodeType::Document => NodeSnapshot::Document { children },
            NodeType::Element(data) => NodeSnapshot::Element {
                tag_name: data.tag_name.clone(),
                attributes: data.attrs.iter().cloned().collect(),
                children,
            },
            NodeType::Text(text) => NodeSnapshot::Text { text: text.clone() },
        })
    }
}

/// A node whose children are still being copied.
struct SnapshotFrame {
    id: NodeId,
    next_child: usize,
    children: Vec<NodeSnapshot>,
}

impl SnapshotFrame {
    const fn new(id: NodeId) -> Self {
        Self {
            id,
            next_child: 0,
            children: Vec::new(),
        }
    }
}

/// Owned, serializable copy of a subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeSnapshot {
    /// The Document node.
    Document {
        /// Child nodes in order.
        children: Vec<NodeSnapshot>,
    },
    /// An element.
    Element {
        /// Tag name, case as written.
        #[serde(rename = "tagName")]
        tag_name: String,
        /// Attributes in insertion order.
        attributes: Vec<Attribute>,
        /// Child nodes in order.
        children: Vec<NodeSnapshot>,
    },
    /// A text node.
    Text {
        /// Literal content.
        text: String,
    },
}

impl NodeSnapshot {
    /// Child snapshots; empty for text.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Document { children } | Self::Element { children, .. } => children,
            Self::Text { .. } => &[],
        }
    }
}

// Frees nested snapshots from a flat list; stack use is constant in depth.
impl Drop for NodeSnapshot {
    fn drop(&mut self) {
        let mut pending = match self {
            Self::Document { children } | Self::Element { children, .. } => std::mem::take(children),
            Self::Text { .. } => return,
        };
        while let Some(mut node) = pending.pop() {
            if let Self::Document { children } | Self::Element { children, .. } = &mut node {
                pending.append(children);
            }
        }
    }
}
