//! DOM tree implementation for lightdom.
//!
//! This crate provides an arena-based DOM tree structure modelled on the
//! [DOM Living Standard](https://dom.spec.whatwg.org/), restricted to
//! Document, Element, and Text nodes.
//!
//! # Design
//!
//! Nodes live in a single arena and point at each other through [`NodeId`]
//! indices, so any node is one lookup away. Parent
//! links are plain indices and own nothing; ownership flows downward through
//! each node's `children` list. A node removed from its parent stays in the
//! arena but is unreachable from the tree.

/// Ordered, name-unique attribute storage.
pub mod attributes;
/// Class membership views over the `class` attribute.
pub mod class_list;
/// Event listeners and bubbling dispatch.
pub mod events;
/// `innerHTML` / `outerHTML` serialization and JSON snapshots.
pub mod serializer;

pub use attributes::{Attribute, Attributes};
pub use class_list::{ClassList, ClassListMut};
pub use events::{Event, EventListeners, Listener, ListenerId, ListenerOutcome, StandardEvent};
pub use serializer::NodeSnapshot;

/// Index of a node inside its [`DomTree`] arena.
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
/// "Each node has an associated node document..."
///
/// The node document is the [`DomTree`] that allocated the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The Document node, allocated first by [`DomTree::new`].
    pub const ROOT: Self = Self(0);
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Node is an abstract interface that is used by all nodes in a tree."
#[derive(Debug, Clone)]
pub struct Node {
    /// "Each node has an associated node type"
    pub node_type: NodeType,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-parent)
    /// "An object that participates in a tree has a parent, which is either
    /// null or an object."
    pub parent: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-child)
    /// "A node has an associated list of children"
    pub children: Vec<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-next-sibling)
    pub next_sibling: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-previous-sibling)
    pub prev_sibling: Option<NodeId>,

    /// Event name to listeners registered on this node.
    pub listeners: EventListeners,
}

impl Node {
    fn detached(node_type: NodeType) -> Self {
        Self {
            node_type,
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
            listeners: EventListeners::default(),
        }
    }
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Each node has an associated node type"
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeType {
    /// [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
    Document,
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    Element(ElementData),
    /// [§ 4.10 Interface Text](https://dom.spec.whatwg.org/#interface-text)
    /// Literal content, serialized verbatim.
    Text(String),
}

/// Payload of an element node.
///
/// Holds the tag name (case as written) and attributes. The `id`, `name`, and `title` convenience fields and the class list are
/// all read from the attributes, so they can never disagree with them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// "An element's local name"
    pub tag_name: String,
    /// "An element has an associated attribute list"
    pub attrs: Attributes,
}

impl ElementData {
    /// Element with no attributes.
    #[must_use]
    pub fn new(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_string(),
            attrs: Attributes::new(),
        }
    }

    /// Value of the `id` attribute.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attrs.get("id")
    }

    /// Value of the `name` attribute.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.attrs.get("name")
    }

    /// Value of the `title` attribute.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.attrs.get("title")
    }

    /// Class membership derived from the `class` attribute.
    #[must_use]
    pub fn class_list(&self) -> ClassList<'_> {
        ClassList::new(&self.attrs)
    }
}

/// The node arena for one document.
///
/// [§ 4 Nodes](https://dom.spec.whatwg.org/#nodes)
///
/// All nodes live in one vector and refer to each other by index. The
/// tree is also the factory for its nodes: every [`NodeId`] it hands out
/// belongs to it for the lifetime of the tree.
#[derive(Debug, Clone)]
pub struct DomTree {
    /// Slot `i` holds `NodeId(i)`; slot 0 is the Document.
    nodes: Vec<Node>,

    /// Counter for [`ListenerId`]s.
    next_listener_id: u64,
}

impl DomTree {
    /// A tree holding only the Document node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::detached(NodeType::Document)],
            next_listener_id: 0,
        }
    }

    /// Always [`NodeId::ROOT`].
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Node lookup; `None` for ids from another tree.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Mutable node lookup.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Number of nodes ever allocated, attached or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Never true for a tree built with [`DomTree::new`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Push a detached node onto the arena.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::detached(node_type));
        id
    }

    /// [§ 4.5 createElement()](https://dom.spec.whatwg.org/#dom-document-createelement)
    ///
    /// Allocate a detached element. The tag name is kept as written.
    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.alloc(NodeType::Element(ElementData::new(tag_name)))
    }

    /// [§ 4.5 createTextNode()](https://dom.spec.whatwg.org/#dom-document-createtextnode)
    pub fn create_text_node(&mut self, data: &str) -> NodeId {
        self.alloc(NodeType::Text(data.to_string()))
    }

    // ========== mutation ==========

    /// Recompute sibling links for every child of `parent`.
    fn relink_children(&mut self, parent: NodeId) {
        let children = self.nodes[parent.0].children.clone();
        for (position, &child) in children.iter().enumerate() {
            let node = &mut self.nodes[child.0];
            node.prev_sibling = position.checked_sub(1).map(|prev| children[prev]);
            node.next_sibling = children.get(position + 1).copied();
        }
    }

    /// Remove `child` from whatever parent it currently has.
    fn detach(&mut self, child: NodeId) {
        if let Some(old_parent) = self.parent(child) {
            let _ = self.remove_child(old_parent, child);
        }
    }

    /// [§ 4.2.2 Append](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// "To append a node to a parent, pre-insert node into parent before null."
    ///
    /// Appends `child` as the last child of `parent`, first detaching it from
    /// any previous parent. Cycles are not checked; callers must not append
    /// an ancestor into its own subtree.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);

        let prev_last_child = self.nodes[parent.0].children.last().copied();

        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[child.0].next_sibling = None;
        self.nodes[child.0].prev_sibling = prev_last_child;

        if let Some(prev_id) = prev_last_child {
            self.nodes[prev_id.0].next_sibling = Some(child);
        }
    }

    /// [§ 4.2.3 Remove](https://dom.spec.whatwg.org/#concept-node-remove)
    ///
    /// Removes `child` from `parent`. Returns `false` and changes nothing if
    /// `child` is not one of `parent`'s children.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let Some(position) = self.position_in(parent, child) else {
            return false;
        };
        let _ = self.nodes[parent.0].children.remove(position);
        let node = &mut self.nodes[child.0];
        node.parent = None;
        node.prev_sibling = None;
        node.next_sibling = None;
        self.relink_children(parent);
        true
    }

    /// [§ 4.2.3 Pre-insert](https://dom.spec.whatwg.org/#concept-node-pre-insert)
    ///
    /// Inserts `new_child` into `parent` before `reference`. Returns `false`
    /// and changes nothing if `reference` is not a child of `parent`.
    pub fn insert_before(&mut self, parent: NodeId, new_child: NodeId, reference: NodeId) -> bool {
        if new_child == reference || self.position_in(parent, reference).is_none() {
            return false;
        }
        self.detach(new_child);
        let Some(position) = self.position_in(parent, reference) else {
            return false;
        };
        self.nodes[parent.0].children.insert(position, new_child);
        self.nodes[new_child.0].parent = Some(parent);
        self.relink_children(parent);
        true
    }

    /// [§ 4.2.3 Replace](https://dom.spec.whatwg.org/#concept-node-replace)
    ///
    /// Puts `new_child` where `old_child` was. Returns `false` and changes
    /// nothing if `old_child` is not a child of `parent`.
    pub fn replace_child(&mut self, parent: NodeId, new_child: NodeId, old_child: NodeId) -> bool {
        if self.position_in(parent, old_child).is_none() {
            return false;
        }
        if new_child == old_child {
            return true;
        }
        self.detach(new_child);
        let Some(position) = self.position_in(parent, old_child) else {
            return false;
        };
        self.nodes[parent.0].children[position] = new_child;
        self.nodes[new_child.0].parent = Some(parent);
        let old = &mut self.nodes[old_child.0];
        old.parent = None;
        old.prev_sibling = None;
        old.next_sibling = None;
        self.relink_children(parent);
        true
    }

    /// [§ 4.2.8 remove()](https://dom.spec.whatwg.org/#dom-childnode-remove)
    ///
    /// Detaches `id` from its parent. Returns `false` if it had none.
    pub fn remove(&mut self, id: NodeId) -> bool {
        self.parent(id)
            .is_some_and(|parent| self.remove_child(parent, id))
    }

    /// Moves every child of `from` to the end of `to`, keeping their order.
    pub fn move_children(&mut self, from: NodeId, to: NodeId) {
        for child in self.detach_children(from) {
            self.append_child(to, child);
        }
    }

    /// Detaches and returns all children of `parent`.
    pub fn detach_children(&mut self, parent: NodeId) -> Vec<NodeId> {
        let Some(node) = self.get_mut(parent) else {
            return Vec::new();
        };
        let children = std::mem::take(&mut node.children);
        for &child in &children {
            let node = &mut self.nodes[child.0];
            node.parent = None;
            node.prev_sibling = None;
            node.next_sibling = None;
        }
        children
    }

    fn position_in(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.children(parent).iter().position(|&id| id == child)
    }

    // ========== traversal ==========

    /// Parent link, `None` for detached nodes and the Document.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node, text included.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// [§ 4.2.6 children](https://dom.spec.whatwg.org/#dom-parentnode-children)
    ///
    /// "The children getter steps are to return an HTMLCollection collection
    /// rooted at this matching only element children."
    #[must_use]
    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&child| self.as_element(child).is_some())
            .collect()
    }

    /// [§ 4.2.6 firstElementChild](https://dom.spec.whatwg.org/#dom-parentnode-firstelementchild)
    #[must_use]
    pub fn first_element_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&child| self.as_element(child).is_some())
    }

    /// [§ 4.4 firstChild](https://dom.spec.whatwg.org/#dom-node-firstchild)
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.first().copied())
    }

    /// [§ 4.4 lastChild](https://dom.spec.whatwg.org/#dom-node-lastchild)
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.last().copied())
    }

    /// [§ 4.4 nextSibling](https://dom.spec.whatwg.org/#dom-node-nextsibling)
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling)
    }

    /// [§ 4.4 previousSibling](https://dom.spec.whatwg.org/#dom-node-previoussibling)
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling)
    }

    /// [§ 4.2.6 Descendant](https://dom.spec.whatwg.org/#concept-tree-descendant)
    ///
    /// `true` when `ancestor` appears on the parent chain of `descendant`.
    #[must_use]
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(descendant).any(|id| id == ancestor)
    }

    /// Parent chain of `id`, nearest first, ending at the Document.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Iterate over the subtree below `id` in tree order (pre-order,
    /// depth-first), excluding `id` itself.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> DescendantIterator<'_> {
        DescendantIterator {
            tree: self,
            stack: self.children(id).iter().rev().copied().collect(),
        }
    }

    /// Element payload, or `None` for Document and Text nodes.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Mutable element payload.
    pub fn as_element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(|n| match &mut n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Character data of a Text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Tag name of an element, case as written.
    #[must_use]
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.as_element(id).map(|data| data.tag_name.as_str())
    }

    /// [§ 4.4 nodeName](https://dom.spec.whatwg.org/#dom-node-nodename)
    #[must_use]
    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        self.get(id).map(|n| match &n.node_type {
            NodeType::Document => "#document",
            NodeType::Element(data) => data.tag_name.as_str(),
            NodeType::Text(_) => "#text",
        })
    }

    /// [§ 4.4 textContent](https://dom.spec.whatwg.org/#dom-node-textcontent)
    ///
    /// Concatenated data of every text node in the subtree, in tree order.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.as_text(id) {
            return text.to_string();
        }
        self.descendants(id)
            .filter_map(|node| self.as_text(node))
            .collect()
    }

    // ========== attributes ==========

    /// [§ 4.9 setAttribute()](https://dom.spec.whatwg.org/#dom-element-setattribute)
    ///
    /// Ignored for non-element nodes.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(data) = self.as_element_mut(id) {
            let _ = data.attrs.set(name, value);
        }
    }

    /// [§ 4.9 getAttribute()](https://dom.spec.whatwg.org/#dom-element-getattribute)
    #[must_use]
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.as_element(id).and_then(|data| data.attrs.get(name))
    }

    /// [§ 4.9 hasAttribute()](https://dom.spec.whatwg.org/#dom-element-hasattribute)
    #[must_use]
    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.as_element(id)
            .is_some_and(|data| data.attrs.contains(name))
    }

    /// [§ 4.9 removeAttribute()](https://dom.spec.whatwg.org/#dom-element-removeattribute)
    ///
    /// Returns the removed value.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Option<String> {
        self.as_element_mut(id)
            .and_then(|data| data.attrs.remove(name))
    }

    /// Class membership of an element.
    #[must_use]
    pub fn class_list(&self, id: NodeId) -> Option<ClassList<'_>> {
        self.as_element(id).map(ElementData::class_list)
    }

    /// Editable class membership of an element.
    pub fn class_list_mut(&mut self, id: NodeId) -> Option<ClassListMut<'_>> {
        self.as_element_mut(id)
            .map(|data| ClassListMut::new(&mut data.attrs))
    }

    // ========== queries ==========

    /// Elements below `id` in tree order that satisfy `predicate`.
    pub fn find_elements<P>(&self, id: NodeId, mut predicate: P) -> Vec<NodeId>
    where
        P: FnMut(NodeId, &ElementData) -> bool,
    {
        self.descendants(id)
            .filter(|&node| {
                self.as_element(node)
                    .is_some_and(|data| predicate(node, data))
            })
            .collect()
    }

    /// [§ 4.4 getElementsByTagName()](https://dom.spec.whatwg.org/#dom-element-getelementsbytagname)
    ///
    /// `"*"` matches every element.
    #[must_use]
    pub fn get_elements_by_tag_name(&self, id: NodeId, tag_name: &str) -> Vec<NodeId> {
        self.find_elements(id, |_, data| tag_name == "*" || data.tag_name == tag_name)
    }

    /// [§ 4.4 getElementsByClassName()](https://dom.spec.whatwg.org/#dom-element-getelementsbyclassname)
    #[must_use]
    pub fn get_elements_by_class_name(&self, id: NodeId, class_name: &str) -> Vec<NodeId> {
        self.find_elements(id, |_, data| data.class_list().contains(class_name))
    }

    /// [§ 4.2.4 getElementById()](https://dom.spec.whatwg.org/#dom-nonelementparentnode-getelementbyid)
    ///
    /// "Return the first element in tree order within node's descendants
    /// whose ID is elementId; otherwise, return null."
    #[must_use]
    pub fn get_element_by_id(&self, id: NodeId, element_id: &str) -> Option<NodeId> {
        self.descendants(id)
            .find(|&node| self.as_element(node).and_then(ElementData::id) == Some(element_id))
    }

    /// [§ 3.1.1 The document element](https://html.spec.whatwg.org/multipage/dom.html#the-html-element-2)
    ///
    /// "The document element of a document is the element whose parent is that
    /// document, if it exists; otherwise null."
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(NodeId::ROOT)
            .iter()
            .find(|&&id| self.as_element(id).is_some())
            .copied()
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Returned by [`DomTree::ancestors`].
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Pre-order iterator over a subtree, driven by an explicit stack.
pub struct DescendantIterator<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for DescendantIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
