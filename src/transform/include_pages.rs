//! Page inclusion.

use super::Pass;
use crate::{
    repository::Repository,
    tree::{Element, NodeId, Tree},
};

/// Replaces every `IncludePage` element with the tree of the referenced page.
///
/// This pass should run before every other pass so that they see the content
/// of included pages too.
pub struct IncludePages<'a> {
    /// The page store.
    repository: &'a dyn Repository,
}

impl<'a> IncludePages<'a> {
    /// Creates a new inclusion pass reading from the given repository.
    pub fn new(repository: &'a dyn Repository) -> Self {
        Self { repository }
    }

    /// Returns true if `path` is the path of `node` or of any page containing
    /// it.
    fn is_ancestor(tree: &Tree, node: NodeId, path: &str) -> bool {
        let mut current = tree.context_page(node, false);
        while let Some(page) = current {
            if tree.page_path(page) == Some(path) {
                return true;
            }
            current = tree.parent(page).and_then(|parent| tree.context_page(parent, false));
        }
        false
    }
}

impl Pass for IncludePages<'_> {
    fn name(&self) -> &'static str {
        "include-pages"
    }

    fn rewrite(&mut self, tree: &mut Tree, node: NodeId) -> Option<NodeId> {
        let Element::IncludePage { path } = tree.element(node) else {
            return Some(node);
        };

        let context = tree.context_page(node, false);
        let Some(absolute) = tree.absolute_page_path(Some(path.as_str()), context) else {
            log::warn!("cannot include page '{path}' without a containing page");
            return None;
        };

        if Self::is_ancestor(tree, node, &absolute) {
            log::warn!("cannot include page '{absolute}' into itself");
            return None;
        }

        let Some(page) = self.repository.lookup_page(&absolute) else {
            log::warn!("cannot include page '{absolute}' as it does not exist");
            return None;
        };

        let root = page.root()?;
        log::trace!("including page '{absolute}'");
        Some(tree.import(&page, root))
    }
}
