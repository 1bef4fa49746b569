//! [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
//!
//! A [`Document`] owns one [`DomTree`] whose Document node has a single
//! `html` element child, the document element.
//!
//! Input comes in two shapes:
//! - **Full document**: the text contains `<!DOCTYPE ...>` (any case). The
//!   declaration and an `<html ...>` start tag right after it are removed,
//!   the start tag's attributes land on the document element, and the last
//!   `</html>` is dropped. The rest is parsed under the document element;
//!   `head` and `body` are the first descendants with those names, if any.
//! - **Fragment**: anything else. `html`, `head`, and `body` are synthesized
//!   and the text is parsed under `body`.

use std::borrow::Cow;

use lightdom_common::Result;
use lightdom_common::self_closing::is_self_closing;
use lightdom_css::selector::{query_selector, query_selector_all};
use lightdom_dom::{DomTree, NodeId};
use lightdom_html::{TagKind, apply_attributes, next_tag, parse_fragment};

const DOCTYPE: &str = "<!doctype";
const HTML_END_TAG: &str = "</html>";

/// ASCII case-insensitive substring search.
fn find_ignore_ascii_case(haystack: &str, needle: &str, last: bool) -> Option<usize> {
    let needle = needle.as_bytes();
    let mut windows = haystack.as_bytes().windows(needle.len());
    if last {
        windows.rposition(|w| w.eq_ignore_ascii_case(needle))
    } else {
        windows.position(|w| w.eq_ignore_ascii_case(needle))
    }
}

/// A full document split into its parts.
#[derive(Debug)]
struct DoctypeParts<'a> {
    /// Raw attribute text of the `<html ...>` wrapper.
    html_attributes: Option<&'a str>,
    /// Everything else, in order.
    content: Cow<'a, str>,
}

/// Split `input` if it is a full document, or return `None` for a fragment.
fn split_doctype(input: &str) -> Option<DoctypeParts<'_>> {
    let start = find_ignore_ascii_case(input, DOCTYPE, false)?;
    let declaration_end = start + input[start..].find('>')? + 1;
    let prefix = &input[..start];
    let mut rest = &input[declaration_end..];
    let mut html_attributes = None;

    let trimmed = rest.trim_start();
    if let Some(tag) = next_tag(trimmed, 0)
        && tag.index == 0
        && tag.kind == TagKind::Open
        && tag.name.eq_ignore_ascii_case("html")
    {
        html_attributes = tag.raw_attributes;
        rest = &trimmed[tag.end..];
    }

    let rest = match find_ignore_ascii_case(rest, HTML_END_TAG, true) {
        Some(end) => Cow::Owned(format!("{}{}", &rest[..end], &rest[end + HTML_END_TAG.len()..])),
        None => Cow::Borrowed(rest),
    };
    let content = if prefix.is_empty() {
        rest
    } else {
        Cow::Owned(format!("{prefix}{rest}"))
    };

    Some(DoctypeParts {
        html_attributes,
        content,
    })
}

/// A parsed document.
///
/// Tree access goes through [`Document::tree`] and [`Document::tree_mut`];
/// the methods here cover construction, `innerHTML` assignment, and
/// document-wide queries.
#[derive(Debug)]
pub struct Document {
    tree: DomTree,
    document_element: NodeId,
    head: Option<NodeId>,
    body: Option<NodeId>,
}

impl Document {
    /// Parse `html` into a new document.
    ///
    /// # Errors
    ///
    /// Any [`DomError`](lightdom_common::DomError) raised by the tree builder
    /// or by the `<html>` wrapper's attributes.
    pub fn new(html: &str) -> Result<Self> {
        let mut tree = DomTree::new();
        let document_element = tree.create_element("html");
        tree.append_child(NodeId::ROOT, document_element);

        let (head, body) = if let Some(parts) = split_doctype(html) {
            tracing::debug!(len = html.len(), "parsing full document");
            if let Some(raw) = parts.html_attributes {
                apply_attributes(&mut tree, document_element, "html", raw)?;
            }
            parse_fragment(&mut tree, document_element, &parts.content)?;
            (
                first_named(&tree, document_element, "head"),
                first_named(&tree, document_element, "body"),
            )
        } else {
            tracing::debug!(len = html.len(), "parsing body fragment");
            let head = tree.create_element("head");
            let body = tree.create_element("body");
            tree.append_child(document_element, head);
            tree.append_child(document_element, body);
            parse_fragment(&mut tree, body, html)?;
            (Some(head), Some(body))
        };

        Ok(Self {
            tree,
            document_element,
            head,
            body,
        })
    }

    /// The underlying tree.
    #[must_use]
    pub const fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// The underlying tree, for mutation and listener registration.
    pub const fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// Consume the document and keep only its tree.
    #[must_use]
    pub fn into_tree(self) -> DomTree {
        self.tree
    }

    /// [§ 4.5 documentElement](https://dom.spec.whatwg.org/#dom-document-documentelement)
    #[must_use]
    pub const fn document_element(&self) -> NodeId {
        self.document_element
    }

    /// The `head` element: synthesized for fragments, otherwise the first
    /// `head` in the parsed markup.
    #[must_use]
    pub const fn head(&self) -> Option<NodeId> {
        self.head
    }

    /// The `body` element: synthesized for fragments, otherwise the first
    /// `body` in the parsed markup.
    #[must_use]
    pub const fn body(&self) -> Option<NodeId> {
        self.body
    }

    /// [§ 4.5 createElement()](https://dom.spec.whatwg.org/#dom-document-createelement)
    ///
    /// The new element is detached until appended somewhere.
    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.tree.create_element(tag_name)
    }

    /// [§ 4.5 createTextNode()](https://dom.spec.whatwg.org/#dom-document-createtextnode)
    pub fn create_text_node(&mut self, data: &str) -> NodeId {
        self.tree.create_text_node(data)
    }

    /// Replace the children of `id` with the nodes parsed from `markup`.
    ///
    /// A self-closing element (built-in or configured) ends up with no
    /// children and `markup` is not parsed.
    ///
    /// # Errors
    ///
    /// Any tree builder error. The old children are already gone and the
    /// nodes parsed before the error stay; use
    /// [`set_inner_html_atomic`](Self::set_inner_html_atomic) to keep the
    /// old children on failure.
    pub fn set_inner_html(&mut self, id: NodeId, markup: &str) -> Result<()> {
        tracing::debug!(node = id.0, len = markup.len(), "set innerHTML");
        let _ = self.tree.detach_children(id);
        parse_fragment(&mut self.tree, id, markup)
    }

    /// Like [`set_inner_html`](Self::set_inner_html), but parses into a
    /// detached scratch element first and swaps the result in only on
    /// success.
    ///
    /// The scratch element and every node parsed into it take arena slots
    /// that are never reused, even after failure. A long-lived document
    /// that keeps reassigning markup grows with each call.
    ///
    /// # Errors
    ///
    /// Any tree builder error. The children of `id` are unchanged.
    pub fn set_inner_html_atomic(&mut self, id: NodeId, markup: &str) -> Result<()> {
        tracing::debug!(node = id.0, len = markup.len(), "set innerHTML atomically");
        if self.tree.tag_name(id).is_some_and(is_self_closing) {
            let _ = self.tree.detach_children(id);
            return Ok(());
        }
        let scratch = self.tree.create_element("template");
        parse_fragment(&mut self.tree, scratch, markup)?;
        let _ = self.tree.detach_children(id);
        self.tree.move_children(scratch, id);
        Ok(())
    }

    /// Serialized markup of every node in the document.
    #[must_use]
    pub fn to_html(&self) -> String {
        self.tree.inner_html(NodeId::ROOT)
    }

    // ========== document-wide queries ==========

    /// Every element with this tag name (`"*"` for all), in tree order.
    #[must_use]
    pub fn get_elements_by_tag_name(&self, tag_name: &str) -> Vec<NodeId> {
        self.tree.get_elements_by_tag_name(NodeId::ROOT, tag_name)
    }

    /// Every element whose class list contains `class_name`, in tree order.
    #[must_use]
    pub fn get_elements_by_class_name(&self, class_name: &str) -> Vec<NodeId> {
        self.tree.get_elements_by_class_name(NodeId::ROOT, class_name)
    }

    /// The first element in tree order whose `id` is `element_id`.
    #[must_use]
    pub fn get_element_by_id(&self, element_id: &str) -> Option<NodeId> {
        self.tree.get_element_by_id(NodeId::ROOT, element_id)
    }

    /// Every element matching `selector`, in tree order.
    #[must_use]
    pub fn query_selector_all(&self, selector: &str) -> Vec<NodeId> {
        query_selector_all(&self.tree, NodeId::ROOT, selector)
    }

    /// The first element matching `selector`.
    #[must_use]
    pub fn query_selector(&self, selector: &str) -> Option<NodeId> {
        query_selector(&self.tree, NodeId::ROOT, selector)
    }
}

fn first_named(tree: &DomTree, from: NodeId, tag_name: &str) -> Option<NodeId> {
    tree.descendants(from)
        .find(|&id| tree.tag_name(id) == Some(tag_name))
}
