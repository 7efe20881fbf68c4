//! Generated content tags.

use super::{Pass, date};
use crate::{
    common::id_string,
    config::Settings,
    path,
    repository::Repository,
    tree::{DateTimeFormat, Element, Listing, NameFormat, NodeId, Tree},
};
use std::collections::BTreeSet;
use time::{PrimitiveDateTime, macros::format_description};

mod keys {
    pub const DATE: &str = "WikiTagsTransformer.dateformat.date";
    pub const TIME: &str = "WikiTagsTransformer.dateformat.time";
    pub const DATE_TIME: &str = "WikiTagsTransformer.dateformat.datetime";
}

/// Replaces placeholder elements with generated content: the table of
/// contents, the page name, the program version, the current time, and
/// lists of pages. `Parent` elements are removed.
pub struct WikiTags<'a> {
    /// The page store, for page lists.
    repository: &'a dyn Repository,
    /// Renderer settings, for the program version and date formats.
    settings: &'a Settings,
    /// The time shown by date tags.
    now: PrimitiveDateTime,
}

impl<'a> WikiTags<'a> {
    /// Creates a new generated content pass which shows the current local
    /// time.
    pub fn new(repository: &'a dyn Repository, settings: &'a Settings) -> Self {
        Self {
            repository,
            settings,
            now: date::local_now(),
        }
    }

    /// Uses `now` as the current time.
    #[must_use]
    pub fn with_now(mut self, now: PrimitiveDateTime) -> Self {
        self.now = now;
        self
    }

    /// Formats the current time. A format from the messages overrides the
    /// default one; it uses the syntax of [`time::format_description`].
    fn date_time(&self, format: DateTimeFormat) -> String {
        let (key, default) = match format {
            DateTimeFormat::Date => (keys::DATE, format_description!("[day].[month].[year]")),
            DateTimeFormat::Time => (keys::TIME, format_description!("[hour]:[minute]")),
            DateTimeFormat::DateTime => (
                keys::DATE_TIME,
                format_description!("[day].[month].[year] [hour]:[minute]"),
            ),
        };

        if let Some(custom) = self.settings.messages.get(key) {
            match time::format_description::parse(custom)
                .map_err(time::Error::from)
                .and_then(|items| self.now.format(items.as_slice()).map_err(Into::into))
            {
                Ok(text) => return text,
                Err(err) => log::warn!("invalid date format '{custom}': {err}"),
            }
        }
        self.now.format(default).unwrap_or_default()
    }

    /// Builds a table of contents from the headings of levels 1 to 3 of the
    /// page containing `node`.
    fn table_of_contents(tree: &mut Tree, node: NodeId) -> NodeId {
        let Some(page) = tree.context_page(node, false) else {
            return tree.add_empty();
        };

        let headings = tree.traverse(page, |e| matches!(e, Element::Heading { .. }), false);
        let mut counters = [0_u32; 3];
        let mut lines = Vec::with_capacity(headings.len());
        for heading in headings {
            let &Element::Heading { level, child } = tree.element(heading) else {
                continue;
            };
            let depth = usize::from(level);
            if depth == 0 || depth > counters.len() {
                continue;
            }

            counters[depth - 1] += 1;
            counters[depth..].fill(0);
            let mut numbering = counters[..depth]
                .iter()
                .map(|counter| format!("{counter}."))
                .collect::<String>();
            numbering.push(' ');

            let anchor = id_string(&tree.string_content(heading));
            let mut text = vec![tree.add_text(numbering)];
            if let Some(child) = child {
                text.push(tree.deep_clone(child));
            }
            let text = tree.add(Element::List(text), None);
            let link = tree.add(
                Element::LinkPage {
                    path: None,
                    anchor: Some(anchor),
                    child: Some(text),
                },
                None,
            );
            lines.push(tree.add(
                Element::Paragraph {
                    centered: false,
                    indention: u32::from(level),
                    vertical_spacing: false,
                    child: Some(link),
                },
                None,
            ));
        }

        tree.add(Element::List(lines), None)
    }

    /// Builds the name of the page containing `node`.
    fn page_name(
        tree: &mut Tree,
        node: NodeId,
        format: NameFormat,
        linked: bool,
        global: bool,
    ) -> Option<NodeId> {
        let page = tree.context_page(node, global)?;
        let page_path = tree.page_path(page)?.to_string();
        let name = format.apply(&page_path).to_string();

        Some(match (format, linked) {
            (_, false) => tree.add_text(name),
            (NameFormat::Title, true) => {
                let text = tree.add_text(name);
                tree.add(
                    Element::LinkPage {
                        path: Some(page_path),
                        anchor: None,
                        child: Some(text),
                    },
                    None,
                )
            }
            (NameFormat::Folder | NameFormat::Path, true) => stepwise_links(tree, &name),
        })
    }

    /// Builds a list of links to all pages in a folder.
    fn list_pages(
        &self,
        tree: &mut Tree,
        node: NodeId,
        folder: Option<&str>,
        listing: &Listing,
    ) -> Option<NodeId> {
        let page = tree.context_page(node, listing.global)?;
        let folder = folder
            .map(str::to_string)
            .or_else(|| tree.page_path(page).map(|path| path::folder(path).to_string()));
        let folder = tree.absolute_page_path(folder.as_deref(), Some(page));

        let mut paths = self
            .repository
            .page_paths()
            .into_iter()
            .filter(|path| {
                folder
                    .as_deref()
                    .is_none_or(|folder| path::folder(path).starts_with(folder))
            })
            .collect::<Vec<_>>();
        paths.sort_by_cached_key(|path| path.to_lowercase());
        log::trace!("listing {} pages in {folder:?}", paths.len());

        page_links(tree, &paths, listing)
    }

    /// Resolves the page named by a parent or child listing. Returns `None`
    /// if the page is not stored.
    fn listed_page(
        &self,
        tree: &Tree,
        node: NodeId,
        path: Option<&str>,
        global: bool,
    ) -> Option<String> {
        let page = tree.absolute_page_path(path, tree.context_page(node, global))?;
        if self.repository.exists(&page) {
            Some(page)
        } else {
            log::warn!("cannot list relatives of missing page {page}");
            None
        }
    }

    /// Builds links to the pages which a page names as its parents.
    fn list_parents(
        &self,
        tree: &mut Tree,
        node: NodeId,
        path: Option<&str>,
        listing: &Listing,
    ) -> Option<NodeId> {
        let page = self.listed_page(tree, node, path, listing.global)?;
        page_links(tree, &sorted(self.repository.parents(&page)), listing)
    }

    /// Builds links to the pages which name a page as their parent.
    fn list_children(
        &self,
        tree: &mut Tree,
        node: NodeId,
        path: Option<&str>,
        listing: &Listing,
    ) -> Option<NodeId> {
        let page = self.listed_page(tree, node, path, listing.global)?;
        page_links(tree, &sorted(self.repository.children(&page)), listing)
    }

    /// Builds links to all link targets which do not exist. Folder links are
    /// not wanted.
    fn list_wanted_pages(&self, tree: &mut Tree, listing: &Listing) -> Option<NodeId> {
        let wanted = self
            .repository
            .link_targets()
            .into_iter()
            .filter(|target| !target.ends_with('/') && !self.repository.exists(target))
            .collect();
        page_links(tree, &sorted(wanted), listing)
    }

    /// Builds links to all pages which no page links to. The start page
    /// always counts as linked, and so can parent and child pages.
    fn list_unlinked_pages(
        &self,
        tree: &mut Tree,
        hide_parents: bool,
        hide_children: bool,
        listing: &Listing,
    ) -> Option<NodeId> {
        let pages = self.repository.page_paths();
        let mut unlinked = pages.iter().cloned().collect::<BTreeSet<_>>();

        for target in self.repository.link_targets() {
            match &self.settings.index_page_name {
                Some(index) if target.ends_with('/') => unlinked.remove(&format!("{target}{index}")),
                _ => unlinked.remove(&target),
            };
        }

        if hide_parents || hide_children {
            for page in &pages {
                let parents = self.repository.parents(page);
                if hide_children && parents.iter().any(|parent| self.repository.exists(parent)) {
                    unlinked.remove(page);
                }
                if hide_parents {
                    for parent in &parents {
                        unlinked.remove(parent);
                    }
                }
            }
        }

        unlinked.remove(&self.settings.start_page);
        page_links(tree, &sorted(unlinked), listing)
    }
}

impl Pass for WikiTags<'_> {
    fn name(&self) -> &'static str {
        "wiki-tags"
    }

    fn rewrite(&mut self, tree: &mut Tree, node: NodeId) -> Option<NodeId> {
        match tree.element(node) {
            Element::TableOfContents => Some(Self::table_of_contents(tree, node)),
            &Element::PageName {
                format,
                linked,
                global,
            } => Self::page_name(tree, node, format, linked, global),
            Element::WikiVersion => Some(tree.add_text(self.settings.program_name_version())),
            Element::Parent { .. } => None,
            Element::ListPages { folder, listing } => {
                let folder = folder.clone();
                let listing = listing.clone();
                self.list_pages(tree, node, folder.as_deref(), &listing)
            }
            &Element::DateTime { format } => Some(tree.add_text(self.date_time(format))),
            Element::ListParents { path, listing } => {
                let (path, listing) = (path.clone(), listing.clone());
                self.list_parents(tree, node, path.as_deref(), &listing)
            }
            Element::ListChildren { path, listing } => {
                let (path, listing) = (path.clone(), listing.clone());
                self.list_children(tree, node, path.as_deref(), &listing)
            }
            Element::ListWantedPages { listing } => {
                let listing = listing.clone();
                self.list_wanted_pages(tree, &listing)
            }
            Element::ListUnlinkedPages {
                hide_parents,
                hide_children,
                listing,
            } => {
                let (hide_parents, hide_children) = (*hide_parents, *hide_children);
                let listing = listing.clone();
                self.list_unlinked_pages(tree, hide_parents, hide_children, &listing)
            }
            _ => Some(node),
        }
    }
}

/// Links every folder of a path separately, so `/a/b` becomes the links
/// `/`, `a/`, and `b`, separated by spaces.
fn stepwise_links(tree: &mut Tree, path: &str) -> NodeId {
    let path = path::make_absolute(Some(path), None);
    let mut links = Vec::new();
    let mut start = 0;
    while start < path.len() {
        let end = path[start..]
            .find('/')
            .map_or(path.len(), |slash| start + slash + 1);

        if start > 0 {
            links.push(tree.add_text(" "));
        }
        let text = tree.add_text(&path[start..end]);
        links.push(tree.add(
            Element::LinkPage {
                path: Some(path[..end].to_string()),
                anchor: None,
                child: Some(text),
            },
            None,
        ));
        start = end;
    }
    tree.add(Element::List(links), None)
}

/// Orders page paths without regard to case.
fn sorted(paths: BTreeSet<String>) -> Vec<String> {
    let mut paths = paths.into_iter().collect::<Vec<_>>();
    paths.sort_by_cached_key(|path| path.to_lowercase());
    paths
}

/// Builds links to the given pages, formatted according to `listing`.
/// Returns `None` if there are no pages and no replacement text.
fn page_links(tree: &mut Tree, paths: &[String], listing: &Listing) -> Option<NodeId> {
    if paths.is_empty() {
        return listing
            .output_on_empty
            .as_ref()
            .map(|text| tree.add_text(text.as_str()));
    }

    let mut entries = Vec::with_capacity(paths.len());
    for (index, path) in paths.iter().enumerate() {
        let text = tree.add_text(listing.format.apply(path));
        let link = tree.add(
            Element::LinkPage {
                path: Some(path.clone()),
                anchor: None,
                child: Some(text),
            },
            None,
        );

        if listing.inline {
            if index > 0
                && let Some(separator) = &listing.separator
            {
                entries.push(tree.add_text(separator.as_str()));
            }
            entries.push(link);
        } else {
            entries.push(tree.add(
                Element::ListItem {
                    level: 1,
                    ordered: false,
                    child: Some(link),
                },
                None,
            ));
        }
    }
    Some(tree.add(Element::List(entries), None))
}
