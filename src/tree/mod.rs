//! The page element tree.
//!
//! A parsed wiki page is stored as an arena of [`Node`]s. Nodes refer to
//! their children and to their parent by [`NodeId`]. Every mutation method
//! on [`Tree`] keeps the parent links consistent: after it returns, the
//! parent of every node is the structural container that currently holds it.
//! The content of a table cell has the table itself as its parent.

pub use element::{
    DateTimeFormat, Element, Listing, NameFormat, Options, Table, TableCell, TableRow, Task,
    TaskState,
};
use core::ops::Index;

mod element;
pub mod json;
mod query;
#[cfg(test)]
mod tests;

/// A tree error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The JSON input could not be decoded.
    #[error("invalid tree json: {0}")]
    Json(#[from] serde_json::Error),

    /// A source span ends before it starts.
    #[error("invalid span {from}..{to}")]
    Span {
        /// The start of the span.
        from: usize,
        /// The end of the span.
        to: usize,
    },
}

/// The standard result type used by fallible tree functions.
pub type Result<T = (), E = Error> = core::result::Result<T, E>;

/// The identifier of a node in a [`Tree`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NodeId(usize);

/// A half-open range of character offsets into the wiki source text.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Span {
    /// The first character.
    pub from: usize,
    /// One past the last character.
    pub to: usize,
}

impl Span {
    /// Creates a new span.
    #[inline]
    pub fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }
}

/// A page element together with its position in the tree.
#[derive(Clone, Debug)]
pub struct Node {
    /// The element data.
    pub element: Element,
    /// The source range of the element, if it came from the parser.
    pub span: Option<Span>,
    /// The containing node.
    parent: Option<NodeId>,
}

impl Node {
    /// The containing node, or `None` for a root or a detached node.
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

/// An arena of page elements.
///
/// Nodes are never freed individually. A node which is removed from its
/// container stays in the arena without a parent until the tree is dropped.
#[derive(Clone, Debug, Default)]
pub struct Tree {
    /// All nodes ever added to the tree.
    nodes: Vec<Node>,
    /// The root node.
    root: Option<NodeId>,
}

impl Tree {
    /// Creates a new empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a new node and makes it the parent of every node that `element`
    /// refers to. The referenced nodes must not still be held by another
    /// container.
    pub fn add(&mut self, element: Element, span: Option<Span>) -> NodeId {
        let id = NodeId(self.nodes.len());
        let children = element.children();
        self.nodes.push(Node {
            element,
            span,
            parent: None,
        });
        for child in children {
            self.nodes[child.0].parent = Some(id);
        }
        id
    }

    /// Adds a new `Text` node.
    #[inline]
    pub fn add_text(&mut self, text: impl Into<String>) -> NodeId {
        self.add(Element::Text(text.into()), None)
    }

    /// Adds a new empty `List` node.
    #[inline]
    pub fn add_empty(&mut self) -> NodeId {
        self.add(Element::List(vec![]), None)
    }

    /// The root node of the tree.
    #[inline]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Sets the root node of the tree and detaches it from any parent.
    pub fn set_root(&mut self, id: NodeId) {
        self.nodes[id.0].parent = None;
        self.root = Some(id);
    }

    /// The number of nodes in the arena.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the arena contains no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The element of the given node.
    #[inline]
    pub fn element(&self, id: NodeId) -> &Element {
        &self.nodes[id.0].element
    }

    /// The parent of the given node.
    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// The source span of the given node.
    #[inline]
    pub fn span(&self, id: NodeId) -> Option<Span> {
        self.nodes[id.0].span
    }

    /// Returns true if the given node is rendered inline.
    #[inline]
    pub fn is_inline(&self, id: NodeId) -> bool {
        self.nodes[id.0].element.is_inline()
    }

    /// The single child of the given node, if it has a child slot that is
    /// filled.
    #[inline]
    pub fn child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].element.child_slot().copied().flatten()
    }

    /// The members of a `List` node. Any other node has no members.
    pub fn members(&self, id: NodeId) -> &[NodeId] {
        match &self.nodes[id.0].element {
            Element::List(members) => members,
            _ => &[],
        }
    }

    /// Replaces the single child of a node. Returns false, and does nothing,
    /// if the node has no child slot.
    pub fn set_child(&mut self, id: NodeId, child: Option<NodeId>) -> bool {
        let Some(slot) = self.nodes[id.0].element.child_slot_mut() else {
            log::warn!("{} node {id:?} has no child slot", self.nodes[id.0].element.kind_name());
            return false;
        };

        let old = core::mem::replace(slot, child);
        self.detach_replaced(old, child);
        if let Some(child) = child {
            self.nodes[child.0].parent = Some(id);
        }
        true
    }

    /// Replaces the member at `index` of a `List` node.
    pub fn list_set(&mut self, list: NodeId, index: usize, node: NodeId) {
        let Element::List(members) = &mut self.nodes[list.0].element else {
            log::warn!("list_set on non-list node {list:?}");
            return;
        };

        let old = core::mem::replace(&mut members[index], node);
        self.detach_replaced(Some(old), Some(node));
        self.nodes[node.0].parent = Some(list);
    }

    /// Removes and returns the member at `index` of a `List` node.
    pub fn list_remove(&mut self, list: NodeId, index: usize) -> Option<NodeId> {
        let Element::List(members) = &mut self.nodes[list.0].element else {
            return None;
        };

        let old = members.remove(index);
        self.nodes[old.0].parent = None;
        Some(old)
    }

    /// Appends a node to a `List` node.
    pub fn list_push(&mut self, list: NodeId, node: NodeId) {
        if let Element::List(members) = &mut self.nodes[list.0].element {
            members.push(node);
            self.nodes[node.0].parent = Some(list);
        } else {
            log::warn!("list_push on non-list node {list:?}");
        }
    }

    /// Moves all members of the list `other` to the end of `list`.
    pub fn list_append(&mut self, list: NodeId, other: NodeId) {
        let moved = match &mut self.nodes[other.0].element {
            Element::List(members) => core::mem::take(members),
            _ => return,
        };
        for node in moved {
            self.list_push(list, node);
        }
    }

    /// Replaces the content of a table cell.
    pub fn set_cell_content(
        &mut self,
        table: NodeId,
        row: usize,
        cell: usize,
        content: Option<NodeId>,
    ) {
        let Element::Table(data) = &mut self.nodes[table.0].element else {
            log::warn!("set_cell_content on non-table node {table:?}");
            return;
        };

        let slot = &mut data.rows[row].cells[cell].content;
        let old = core::mem::replace(slot, content);
        self.detach_replaced(old, content);
        if let Some(content) = content {
            self.nodes[content.0].parent = Some(table);
        }
    }

    /// Copies the subtree at `id` within this tree. The copy has no parent.
    pub fn deep_clone(&mut self, id: NodeId) -> NodeId {
        let mut element = self.nodes[id.0].element.clone();
        element.map_children(|child| self.deep_clone(child));
        let span = self.nodes[id.0].span;
        self.add(element, span)
    }

    /// Copies the subtree at `id` of another tree into this tree. The copy
    /// has no parent.
    pub fn import(&mut self, other: &Tree, id: NodeId) -> NodeId {
        let mut element = other.nodes[id.0].element.clone();
        element.map_children(|child| self.import(other, child));
        self.add(element, other.nodes[id.0].span)
    }

    /// Sets the parent link of a node without touching any container. The
    /// caller must store the node in `parent` before anything else reads the
    /// containers.
    #[inline]
    pub(crate) fn adopt(&mut self, id: NodeId, parent: Option<NodeId>) {
        self.nodes[id.0].parent = parent;
    }

    /// Clears the parent of a node that was replaced by a different node.
    fn detach_replaced(&mut self, old: Option<NodeId>, new: Option<NodeId>) {
        if let Some(old) = old
            && Some(old) != new
        {
            self.nodes[old.0].parent = None;
        }
    }
}

impl Index<NodeId> for Tree {
    type Output = Node;

    #[inline]
    fn index(&self, index: NodeId) -> &Self::Output {
        &self.nodes[index.0]
    }
}
