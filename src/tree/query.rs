//! Read-only tree queries.

use super::{Element, NodeId, Tree};
use crate::path;

impl Tree {
    /// Finds the page that contains the given node.
    ///
    /// The local context is the nearest enclosing `Page`. The global context
    /// is the root of the tree, if it is a `Page`. The two only differ when
    /// the content of another page was included.
    pub fn context_page(&self, id: NodeId, global: bool) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(node) = current {
            let parent = self.parent(node);
            if matches!(self.element(node), Element::Page { .. }) && (!global || parent.is_none()) {
                return Some(node);
            }
            current = parent;
        }
        None
    }

    /// The path of a `Page` node.
    pub fn page_path(&self, page: NodeId) -> Option<&str> {
        match self.element(page) {
            Element::Page { path, .. } => path.as_deref(),
            _ => None,
        }
    }

    /// Makes a page path absolute relative to the folder of the context page.
    ///
    /// Returns `None` if there is no context page. If `path` is `None`, the
    /// path of the context page itself is returned.
    pub fn absolute_page_path(&self, path: Option<&str>, context: Option<NodeId>) -> Option<String> {
        let context = context?;
        let context_path = self.page_path(context);
        match path {
            Some(relative) => Some(path::make_absolute(
                Some(relative),
                context_path.map(path::folder),
            )),
            None => context_path.map(str::to_string),
        }
    }

    /// Concatenates the text of every `Text` node in the subtree.
    pub fn string_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in self.traverse(id, |element| matches!(element, Element::Text(_)), true) {
            if let Element::Text(text) = self.element(node) {
                out += text;
            }
        }
        out
    }

    /// Collects all nodes in the subtree, in document order, whose element
    /// matches `predicate`. If `recurse_into_matches` is false, the subtree
    /// of a matching node is skipped.
    pub fn traverse<F>(&self, id: NodeId, predicate: F, recurse_into_matches: bool) -> Vec<NodeId>
    where
        F: Fn(&Element) -> bool,
    {
        let mut found = Vec::new();
        let mut pending = vec![id];
        while let Some(node) = pending.pop() {
            let element = self.element(node);
            if predicate(element) {
                found.push(node);
                if !recurse_into_matches {
                    continue;
                }
            }
            pending.extend(element.children().into_iter().rev());
        }
        found
    }
}
