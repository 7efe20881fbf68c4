//! Access to stored wiki pages.

use crate::tree::{Element, Tree};
use std::{
    borrow::Cow,
    collections::{BTreeMap, BTreeSet},
};

/// A store of parsed wiki pages, keyed by absolute page path.
pub trait Repository {
    /// Returns the parsed tree of the page with the given path, or `None` if
    /// no such page exists.
    fn lookup_page(&self, path: &str) -> Option<Cow<'_, Tree>>;

    /// Returns true if a page with the given path exists.
    fn exists(&self, path: &str) -> bool {
        self.lookup_page(path).is_some()
    }

    /// Returns the paths of all stored pages.
    fn page_paths(&self) -> Vec<String>;

    /// Returns the pages named as parent by the page at `path`. The parents
    /// need not exist.
    fn parents(&self, path: &str) -> BTreeSet<String> {
        self.lookup_page(path)
            .map(|page| parent_paths(&page))
            .unwrap_or_default()
    }

    /// Returns the stored pages which name the page at `path` as a parent.
    fn children(&self, path: &str) -> BTreeSet<String> {
        self.page_paths()
            .into_iter()
            .filter(|child| self.parents(child).contains(path))
            .collect()
    }

    /// Returns the absolute target of every page link in every stored page.
    fn link_targets(&self) -> BTreeSet<String> {
        let mut targets = BTreeSet::new();
        for path in self.page_paths() {
            if let Some(page) = self.lookup_page(&path) {
                targets.extend(link_paths(&page));
            }
        }
        targets
    }
}

/// Collects the absolute paths named by the `Parent` elements of a page.
pub fn parent_paths(tree: &Tree) -> BTreeSet<String> {
    let Some(root) = tree.root() else {
        return BTreeSet::new();
    };
    tree.traverse(root, |e| matches!(e, Element::Parent { path: Some(_) }), false)
        .into_iter()
        .filter_map(|node| match tree.element(node) {
            Element::Parent { path } => {
                tree.absolute_page_path(path.as_deref(), tree.context_page(node, false))
            }
            _ => None,
        })
        .collect()
}

/// Collects the absolute targets of the page links of a page. A link
/// without a path targets the page containing it.
pub fn link_paths(tree: &Tree) -> BTreeSet<String> {
    let Some(root) = tree.root() else {
        return BTreeSet::new();
    };
    tree.traverse(root, |e| matches!(e, Element::LinkPage { .. }), true)
        .into_iter()
        .filter_map(|node| match tree.element(node) {
            Element::LinkPage { path, .. } => {
                tree.absolute_page_path(path.as_deref(), tree.context_page(node, false))
            }
            _ => None,
        })
        .collect()
}

/// A repository which keeps all pages in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryRepository {
    /// Pages by path.
    pages: BTreeMap<String, Tree>,
}

impl MemoryRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a page under `path`. The root of the stored tree is always a
    /// page with that path, so relative paths inside the page resolve
    /// against its folder.
    pub fn insert(&mut self, path: impl Into<String>, mut tree: Tree) {
        let path = path.into();
        if let Some(root) = tree.root()
            && tree.page_path(root) != Some(path.as_str())
        {
            if let Some(old) = tree.page_path(root) {
                log::debug!("storing page '{old}' as '{path}'");
            }
            let child = match *tree.element(root) {
                Element::Page { child, .. } => child,
                _ => Some(root),
            };
            let page = tree.add(
                Element::Page {
                    path: Some(path.clone()),
                    child,
                },
                tree.span(root),
            );
            tree.set_root(page);
        }
        log::trace!("storing page {path}");
        self.pages.insert(path, tree);
    }

    /// The number of stored pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Returns true if no pages are stored.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl Repository for MemoryRepository {
    fn lookup_page(&self, path: &str) -> Option<Cow<'_, Tree>> {
        self.pages.get(path).map(Cow::Borrowed)
    }

    fn exists(&self, path: &str) -> bool {
        self.pages.contains_key(path)
    }

    fn page_paths(&self) -> Vec<String> {
        self.pages.keys().cloned().collect()
    }
}
