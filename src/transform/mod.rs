//! Tree transformation.
//!
//! A transformation walks a page element tree depth-first and offers every
//! node to a callback. The callback may keep the node, substitute another
//! node, or delete it. Substitution happens before descent, so the children
//! of a substituted node are transformed too.
//!
//! Deletion only splices in list context. A deleted single child or table
//! cell content is replaced by an empty list, and a deleted page root by a
//! page containing an empty list.

pub use contact::Contact;
pub use date::{PartialDate, local_now};
pub use events::Events;
pub use include_pages::IncludePages;
pub use wiki_tags::WikiTags;

use crate::tree::{Element, NodeId, Tree};

mod contact;
mod date;
mod events;
mod include_pages;
mod wiki_tags;

/// Transforms the subtree at `node` and returns its replacement, or `None`
/// if the node was deleted.
///
/// `List` nodes are never offered to the callback; only their members are.
pub fn transform<F>(tree: &mut Tree, node: NodeId, mut callback: F) -> Option<NodeId>
where
    F: FnMut(&mut Tree, NodeId) -> Option<NodeId>,
{
    walk(tree, node, &mut callback)
}

/// Transforms the whole tree, starting at its root. If the transformed root
/// is not a `Page`, it is wrapped into a new page with the path and span of
/// the original root.
pub fn transform_page<F>(tree: &mut Tree, mut callback: F)
where
    F: FnMut(&mut Tree, NodeId) -> Option<NodeId>,
{
    let Some(root) = tree.root() else {
        log::warn!("transforming a tree without a root");
        return;
    };

    let path = tree.page_path(root).map(str::to_string);
    let span = tree.span(root);
    let new_root = match walk(tree, root, &mut callback) {
        Some(node) if matches!(tree.element(node), Element::Page { .. }) => node,
        other => {
            let child = other.unwrap_or_else(|| tree.add_empty());
            tree.add(
                Element::Page {
                    path,
                    child: Some(child),
                },
                span,
            )
        }
    };
    tree.set_root(new_root);
}

/// Recursive worker of [`transform`].
fn walk<F>(tree: &mut Tree, node: NodeId, callback: &mut F) -> Option<NodeId>
where
    F: FnMut(&mut Tree, NodeId) -> Option<NodeId>,
{
    let node = if matches!(tree.element(node), Element::List(_)) {
        node
    } else {
        let parent = tree.parent(node);
        let result = callback(tree, node)?;
        if result != node {
            log::trace!(
                "replaced {} {node:?} with {} {result:?}",
                tree.element(node).kind_name(),
                tree.element(result).kind_name()
            );
            tree.adopt(result, parent);
        }
        result
    };

    match tree.element(node) {
        Element::List(_) => {
            let mut index = 0;
            while let Some(&member) = tree.members(node).get(index) {
                if let Some(result) = walk(tree, member, callback) {
                    tree.list_set(node, index, result);
                    index += 1;
                } else {
                    tree.list_remove(node, index);
                }
            }
        }
        Element::Table(table) => {
            let cells = table
                .cells()
                .filter_map(|(row, cell, data)| data.content.map(|content| (row, cell, content)))
                .collect::<Vec<_>>();
            for (row, cell, content) in cells {
                let result = walk(tree, content, callback).unwrap_or_else(|| tree.add_empty());
                tree.set_cell_content(node, row, cell, Some(result));
            }
        }
        _ => {
            if let Some(child) = tree.child(node) {
                let result = walk(tree, child, callback).unwrap_or_else(|| tree.add_empty());
                tree.set_child(node, Some(result));
            }
        }
    }

    Some(node)
}

/// A transformation pass over a whole page.
pub trait Pass {
    /// The name of the pass, for diagnostics.
    fn name(&self) -> &'static str;

    /// Offers one node to the pass. Returns the node itself to keep it,
    /// another node to substitute it, or `None` to delete it.
    fn rewrite(&mut self, tree: &mut Tree, node: NodeId) -> Option<NodeId>;

    /// Runs the pass over the whole tree.
    fn apply(&mut self, tree: &mut Tree) {
        transform_page(tree, |tree, node| self.rewrite(tree, node));
    }
}

/// An ordered sequence of transformation passes.
#[derive(Default)]
pub struct Pipeline<'a> {
    /// The passes, in execution order.
    passes: Vec<Box<dyn Pass + 'a>>,
}

impl<'a> Pipeline<'a> {
    /// Creates a new empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a pass to the pipeline.
    pub fn push(&mut self, pass: impl Pass + 'a) -> &mut Self {
        self.passes.push(Box::new(pass));
        self
    }

    /// Runs every pass over the tree, in order.
    pub fn apply(&mut self, tree: &mut Tree) {
        for pass in &mut self.passes {
            log::trace!("running pass {}", pass.name());
            pass.apply(tree);
        }
        log::debug!("ran {} passes, tree has {} nodes", self.passes.len(), tree.len());
    }
}

impl core::fmt::Debug for Pipeline<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list()
            .entries(self.passes.iter().map(|pass| pass.name()))
            .finish()
    }
}
