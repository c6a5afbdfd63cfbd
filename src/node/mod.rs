//! The node tree a [`Document`] is parsed into.
//!
//! Nodes live in an arena ([`Tree`]) and refer to each other by [`NodeId`]. A container owns its children through its
//! child list, while the link back to the parent is a plain id and never keeps anything alive.
use crate::{html, Document};

mod attributes;

pub use attributes::{Attributes, DEFAULT_KEY};

/// Handle to a node inside a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// The document node. Always present, never has a parent.
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// A tag with its attributes. Its children are kept by the [`Tree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagNode {
    name: String,
    attributes: Attributes,
}

impl TagNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

/// The kinds of node a tree holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// The root container.
    Document,
    /// Literal user text, stored unescaped.
    Text(String),
    /// A tag container.
    Tag(TagNode),
}

impl Node {
    pub fn is_container(&self) -> bool {
        !matches!(self, Node::Text(_))
    }

    pub fn as_tag(&self) -> Option<&TagNode> {
        match self {
            Node::Tag(tag) => Some(tag),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(text) => Some(text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct Slot {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    node: Node,
}

/// Arena holding every node of a document.
///
/// Ids handed out by one tree must not be used with another; doing so panics or addresses an unrelated node.
/// Nodes that are removed or replaced keep their slot but are no longer reachable from [`NodeId::ROOT`].
#[derive(Debug, Clone)]
pub struct Tree {
    slots: Vec<Slot>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// A tree holding only the document node.
    pub fn new() -> Self {
        Self {
            slots: vec![Slot {
                parent: None,
                children: vec![],
                node: Node::Document,
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Creates a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(Node::Text(text.into()))
    }

    /// Creates a detached tag node with no children.
    pub fn create_tag(&mut self, name: impl Into<String>, attributes: Attributes) -> NodeId {
        self.push(Node::Tag(TagNode {
            name: name.into(),
            attributes,
        }))
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.slots.len());
        self.slots.push(Slot {
            parent: None,
            children: vec![],
            node,
        });
        id
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.slots[id.0].node
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slots[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.slots[id.0].children
    }

    /// Tag name of a node, `None` for text and the document.
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.get(id).as_tag().map(TagNode::name)
    }

    /// Whether `ancestor` is `id` itself or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cur = Some(id);
        while let Some(node) = cur {
            if node == ancestor {
                return true;
            }
            cur = self.parent(node);
        }
        false
    }

    /// Appends `child` to the end of `parent`'s children, detaching it from any previous parent first.
    ///
    /// # Panics
    /// If `parent` is a text node, or if `child` is `parent` or one of its ancestors.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        assert!(self.get(parent).is_container(), "text nodes cannot have children");
        assert!(
            !self.is_ancestor_or_self(child, parent),
            "appending {child:?} to {parent:?} would create a cycle"
        );

        self.detach(child);
        self.slots[child.0].parent = Some(parent);
        self.slots[parent.0].children.push(child);
    }

    /// Appends a node that has never been attached, skipping the cycle check [`Tree::append_child`] makes.
    pub(crate) fn append_new(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(self.get(parent).is_container(), "text nodes cannot have children");
        debug_assert!(
            self.parent(child).is_none() && child != NodeId::ROOT,
            "{child:?} is already attached"
        );

        self.slots[child.0].parent = Some(parent);
        self.slots[parent.0].children.push(child);
    }

    /// Replaces `old` in `parent`'s children with `replacements`, in order. Returns false, changing nothing, if `old`
    /// is not a child of `parent`.
    ///
    /// # Panics
    /// If a replacement is `parent` or one of its ancestors.
    pub fn replace_child(&mut self, parent: NodeId, old: NodeId, replacements: &[NodeId]) -> bool {
        let Some(pos) = self.children(parent).iter().position(|&c| c == old) else {
            return false;
        };

        for &node in replacements {
            assert!(
                !self.is_ancestor_or_self(node, parent),
                "replacing with {node:?} under {parent:?} would create a cycle"
            );
        }

        for &node in replacements {
            if node != old {
                self.detach(node);
            }
        }

        // The old node may have moved if a replacement was one of its earlier siblings.
        let pos = self
            .children(parent)
            .iter()
            .position(|&c| c == old)
            .unwrap_or(pos);

        self.slots[old.0].parent = None;
        self.slots[parent.0]
            .children
            .splice(pos..=pos, replacements.iter().copied());

        for &node in replacements {
            self.slots[node.0].parent = Some(parent);
        }

        true
    }

    /// Removes `child` from `parent`. Returns false if it was not a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let children = &mut self.slots[parent.0].children;
        let Some(pos) = children.iter().position(|&c| c == child) else {
            return false;
        };

        children.remove(pos);
        self.slots[child.0].parent = None;
        true
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.parent(node) {
            self.remove_child(parent, node);
        }
    }

    /// The nearest ancestor of `id` (excluding `id`) that is a tag named `tag`.
    pub fn find_parent_by_tag(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        let mut cur = self.parent(id);
        while let Some(node) = cur {
            if self.tag_name(node) == Some(tag) {
                return Some(node);
            }
            cur = self.parent(node);
        }
        None
    }

    /// The last direct child of `id` that is a tag node.
    pub fn last_tag_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id)
            .iter()
            .rev()
            .copied()
            .find(|&c| self.get(c).as_tag().is_some())
    }

    /// Concatenation of every text node under `id`, unescaped.
    pub fn raw_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![id];

        while let Some(id) = stack.pop() {
            match self.get(id) {
                Node::Text(text) => out.push_str(text),
                _ => stack.extend(self.children(id).iter().rev()),
            }
        }

        out
    }
}

/// Read-only view of a node together with the document it belongs to.
///
/// This is what tag handlers receive, so they can inspect the node's children or reach the document settings
/// (e.g. [`Document::base_uri`]) while rendering.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    document: &'a Document,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(document: &'a Document, id: NodeId) -> Self {
        Self { document, id }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn node(&self) -> &'a Node {
        self.document.tree().get(self.id)
    }

    /// The document this node belongs to.
    pub fn root(&self) -> &'a Document {
        self.document
    }

    pub fn is_document(&self) -> bool {
        matches!(self.node(), Node::Document)
    }

    pub fn tag(&self) -> Option<&'a str> {
        self.node().as_tag().map(TagNode::name)
    }

    pub fn attributes(&self) -> Option<&'a Attributes> {
        self.node().as_tag().map(TagNode::attributes)
    }

    pub fn text(&self) -> Option<&'a str> {
        self.node().as_text()
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        let document = self.document;
        document
            .tree()
            .parent(self.id)
            .map(|id| NodeRef::new(document, id))
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let document = self.document;
        document
            .tree()
            .children(self.id)
            .iter()
            .map(move |&id| NodeRef::new(document, id))
    }

    pub fn find_parent_by_tag(&self, tag: &str) -> Option<NodeRef<'a>> {
        let document = self.document;
        document
            .tree()
            .find_parent_by_tag(self.id, tag)
            .map(|id| NodeRef::new(document, id))
    }

    pub fn last_tag_child(&self) -> Option<NodeRef<'a>> {
        let document = self.document;
        document
            .tree()
            .last_tag_child(self.id)
            .map(|id| NodeRef::new(document, id))
    }

    /// Renders this node to HTML.
    pub fn html(&self, escape_newlines: bool) -> String {
        let mut out = String::new();
        html::write_node(*self, escape_newlines, &mut out);
        out
    }

    /// Concatenated unescaped text of this node. Not safe to display directly.
    pub fn raw_text(&self) -> String {
        self.document.tree().raw_text(self.id)
    }
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("node", self.node())
            .finish()
    }
}
