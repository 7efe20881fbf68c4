//! Page element kinds.

use super::NodeId;
use indexmap::IndexMap;

/// Key-value options of an image or an XML tag, in source order.
pub type Options = IndexMap<String, String>;

/// The kind-specific data of a page element.
///
/// Elements refer to their children by [`NodeId`]. Use the mutation methods
/// of [`Tree`](super::Tree) instead of changing child references directly,
/// or parent links will go stale.
#[derive(Clone, Debug, PartialEq)]
pub enum Element {
    /// A grouping of elements. A list inside another container is treated
    /// as if its members were part of that container.
    List(Vec<NodeId>),
    /// A wiki page.
    Page {
        /// The absolute path of the page, if it is backed by a stored page.
        path: Option<String>,
        /// The page content.
        child: Option<NodeId>,
    },
    /// A section heading.
    Heading {
        /// The heading level, starting at 1.
        level: u8,
        /// The heading text.
        child: Option<NodeId>,
    },
    /// A paragraph.
    Paragraph {
        /// If true, the paragraph is centered.
        centered: bool,
        /// The indentation level, where 0 is no indentation.
        indention: u32,
        /// If true, the paragraph is visually separated from a preceding
        /// paragraph, list, or table.
        vertical_spacing: bool,
        /// The paragraph content.
        child: Option<NodeId>,
    },
    /// An item of an ordered or unordered list.
    ListItem {
        /// The nesting level, starting at 1.
        level: usize,
        /// If true, the item belongs to an ordered list.
        ordered: bool,
        /// The item content.
        child: Option<NodeId>,
    },
    /// Bold text.
    Bold { child: Option<NodeId> },
    /// Italic text.
    Italic { child: Option<NodeId> },
    /// Underlined text.
    Underlined { child: Option<NodeId> },
    /// Struck-through text.
    Strikethrough { child: Option<NodeId> },
    /// Monospaced text.
    Monospace { child: Option<NodeId> },
    /// Small text.
    Small { child: Option<NodeId> },
    /// Coloured text.
    Color {
        /// An HTML colour name or value.
        name: String,
        /// The coloured content.
        child: Option<NodeId>,
    },
    /// Content styled with CSS classes.
    Style {
        /// The CSS class names.
        classes: Vec<String>,
        /// The styled content.
        child: Option<NodeId>,
    },
    /// An HTML element written in the wiki source.
    HtmlTag {
        /// The tag name.
        name: String,
        /// The raw attribute string.
        attributes: Option<String>,
        /// The element content.
        child: Option<NodeId>,
    },
    /// A semantic XML tag that no transformation pass recognised.
    XmlTag {
        /// The namespace prefix.
        prefix: Option<String>,
        /// The tag name.
        name: String,
        /// The tag attributes.
        options: Options,
        /// The tag content.
        child: Option<NodeId>,
    },
    /// A link to a wiki page.
    LinkPage {
        /// The target page path, relative to the containing page unless it
        /// starts with `/`. If `None`, the link points into the containing
        /// page.
        path: Option<String>,
        /// The target anchor, without `#`.
        anchor: Option<String>,
        /// The alternative link text.
        child: Option<NodeId>,
    },
    /// A link to a built-in wiki command.
    LinkWiki {
        /// The command name.
        command: String,
        /// The alternative link text.
        child: Option<NodeId>,
    },
    /// A link to a file in the repository.
    LinkLocalFile {
        /// The file path, relative to the containing page unless it starts
        /// with `/`.
        path: String,
        /// The alternative link text.
        child: Option<NodeId>,
    },
    /// A link to an external URL.
    LinkExternal {
        /// The target URL.
        url: String,
        /// The alternative link text.
        child: Option<NodeId>,
    },
    /// Plain text.
    Text(String),
    /// A forced line break.
    LineBreak,
    /// Text which is displayed verbatim.
    Nowiki(String),
    /// Raw HTML.
    Html(String),
    /// A named anchor.
    Anchor(String),
    /// An image.
    Image {
        /// The image URL or repository path.
        url: String,
        /// Extra `<img>` attributes.
        options: Options,
    },
    /// A search input field.
    SearchInput,
    /// A horizontal rule.
    Separator,
    /// Extra vertical space.
    VerticalSpace,
    /// A task item.
    Task(Task),
    /// A block of source code.
    Code {
        /// The language of the code, for syntax highlighting.
        language: Option<String>,
        /// The code.
        text: String,
    },
    /// A table.
    Table(Table),
    /// A placeholder for the content of another page.
    IncludePage {
        /// The path of the page to include.
        path: String,
    },
    /// A placeholder for the table of contents of the containing page.
    TableOfContents,
    /// A placeholder for the name of the containing page.
    PageName {
        /// Which part of the page path to show.
        format: NameFormat,
        /// If true, the name links to the page.
        linked: bool,
        /// If true, the outermost page is used instead of the nearest page.
        global: bool,
    },
    /// A placeholder for the program name and version.
    WikiVersion,
    /// A reference to the parent page. It has no visible representation.
    Parent {
        /// The path of the parent page.
        path: Option<String>,
    },
    /// A placeholder for a list of pages in a folder.
    ListPages {
        /// The folder, relative to the containing page. If `None`, the
        /// folder of the containing page.
        folder: Option<String>,
        /// How to show the list.
        listing: Listing,
    },
    /// A placeholder for the current date, time, or both.
    DateTime {
        /// Which parts to show.
        format: DateTimeFormat,
    },
    /// A placeholder for a list of the parents of a page.
    ListParents {
        /// The page, relative to the containing page. If `None`, the
        /// containing page.
        path: Option<String>,
        /// How to show the list.
        listing: Listing,
    },
    /// A placeholder for a list of the pages that name a page as parent.
    ListChildren {
        /// The page, relative to the containing page. If `None`, the
        /// containing page.
        path: Option<String>,
        /// How to show the list.
        listing: Listing,
    },
    /// A placeholder for a list of link targets that do not exist.
    ListWantedPages {
        /// How to show the list.
        listing: Listing,
    },
    /// A placeholder for a list of pages that no other page links to.
    ListUnlinkedPages {
        /// If true, pages that are the parent of another page count as
        /// linked.
        hide_parents: bool,
        /// If true, pages that have a parent count as linked.
        hide_children: bool,
        /// How to show the list.
        listing: Listing,
    },
}

impl Element {
    /// Returns true if the element shares a line with its siblings instead
    /// of starting a new block.
    pub fn is_inline(&self) -> bool {
        match self {
            Self::List(_)
            | Self::Bold { .. }
            | Self::Italic { .. }
            | Self::Underlined { .. }
            | Self::Strikethrough { .. }
            | Self::Monospace { .. }
            | Self::Small { .. }
            | Self::Color { .. }
            | Self::Style { .. }
            | Self::HtmlTag { .. }
            | Self::XmlTag { .. }
            | Self::LinkPage { .. }
            | Self::LinkWiki { .. }
            | Self::LinkLocalFile { .. }
            | Self::LinkExternal { .. }
            | Self::Text(_)
            | Self::LineBreak
            | Self::Nowiki(_)
            | Self::Html(_)
            | Self::Anchor(_)
            | Self::Image { .. }
            | Self::SearchInput
            | Self::PageName { .. }
            | Self::WikiVersion
            | Self::DateTime { .. } => true,
            Self::Page { .. }
            | Self::Heading { .. }
            | Self::Paragraph { .. }
            | Self::ListItem { .. }
            | Self::Separator
            | Self::VerticalSpace
            | Self::Task(_)
            | Self::Code { .. }
            | Self::Table(_)
            | Self::IncludePage { .. }
            | Self::TableOfContents
            | Self::Parent { .. } => false,
            Self::ListPages { listing, .. }
            | Self::ListParents { listing, .. }
            | Self::ListChildren { listing, .. }
            | Self::ListWantedPages { listing }
            | Self::ListUnlinkedPages { listing, .. } => listing.inline,
        }
    }

    /// Returns the child slot of an element with a single child, or `None`
    /// if the element kind has no child slot.
    pub fn child_slot(&self) -> Option<&Option<NodeId>> {
        match self {
            Self::Page { child, .. }
            | Self::Heading { child, .. }
            | Self::Paragraph { child, .. }
            | Self::ListItem { child, .. }
            | Self::Bold { child }
            | Self::Italic { child }
            | Self::Underlined { child }
            | Self::Strikethrough { child }
            | Self::Monospace { child }
            | Self::Small { child }
            | Self::Color { child, .. }
            | Self::Style { child, .. }
            | Self::HtmlTag { child, .. }
            | Self::XmlTag { child, .. }
            | Self::LinkPage { child, .. }
            | Self::LinkWiki { child, .. }
            | Self::LinkLocalFile { child, .. }
            | Self::LinkExternal { child, .. } => Some(child),
            Self::List(_)
            | Self::Text(_)
            | Self::LineBreak
            | Self::Nowiki(_)
            | Self::Html(_)
            | Self::Anchor(_)
            | Self::Image { .. }
            | Self::SearchInput
            | Self::Separator
            | Self::VerticalSpace
            | Self::Task(_)
            | Self::Code { .. }
            | Self::Table(_)
            | Self::IncludePage { .. }
            | Self::TableOfContents
            | Self::PageName { .. }
            | Self::WikiVersion
            | Self::Parent { .. }
            | Self::ListPages { .. }
            | Self::DateTime { .. }
            | Self::ListParents { .. }
            | Self::ListChildren { .. }
            | Self::ListWantedPages { .. }
            | Self::ListUnlinkedPages { .. } => None,
        }
    }

    /// Returns the mutable child slot of an element with a single child.
    pub(super) fn child_slot_mut(&mut self) -> Option<&mut Option<NodeId>> {
        match self {
            Self::Page { child, .. }
            | Self::Heading { child, .. }
            | Self::Paragraph { child, .. }
            | Self::ListItem { child, .. }
            | Self::Bold { child }
            | Self::Italic { child }
            | Self::Underlined { child }
            | Self::Strikethrough { child }
            | Self::Monospace { child }
            | Self::Small { child }
            | Self::Color { child, .. }
            | Self::Style { child, .. }
            | Self::HtmlTag { child, .. }
            | Self::XmlTag { child, .. }
            | Self::LinkPage { child, .. }
            | Self::LinkWiki { child, .. }
            | Self::LinkLocalFile { child, .. }
            | Self::LinkExternal { child, .. } => Some(child),
            _ => None,
        }
    }

    /// Returns all nodes directly owned by this element, in document order.
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            Self::List(members) => members.clone(),
            Self::Table(table) => table.cells().filter_map(|(.., cell)| cell.content).collect(),
            _ => self.child_slot().copied().flatten().into_iter().collect(),
        }
    }

    /// Replaces every directly owned node with the result of `f`.
    pub(super) fn map_children<F>(&mut self, mut f: F)
    where
        F: FnMut(NodeId) -> NodeId,
    {
        match self {
            Self::List(members) => {
                for member in members {
                    *member = f(*member);
                }
            }
            Self::Table(table) => {
                for cell in table.rows.iter_mut().flat_map(|row| row.cells.iter_mut()) {
                    cell.content = cell.content.map(&mut f);
                }
            }
            _ => {
                if let Some(slot) = self.child_slot_mut() {
                    *slot = slot.map(f);
                }
            }
        }
    }

    /// A short name of the element kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::List(_) => "list",
            Self::Page { .. } => "page",
            Self::Heading { .. } => "heading",
            Self::Paragraph { .. } => "paragraph",
            Self::ListItem { .. } => "list-item",
            Self::Bold { .. } => "bold",
            Self::Italic { .. } => "italic",
            Self::Underlined { .. } => "underlined",
            Self::Strikethrough { .. } => "strikethrough",
            Self::Monospace { .. } => "monospace",
            Self::Small { .. } => "small",
            Self::Color { .. } => "color",
            Self::Style { .. } => "style",
            Self::HtmlTag { .. } => "html-tag",
            Self::XmlTag { .. } => "xml-tag",
            Self::LinkPage { .. } => "link-page",
            Self::LinkWiki { .. } => "link-wiki",
            Self::LinkLocalFile { .. } => "link-local-file",
            Self::LinkExternal { .. } => "link-external",
            Self::Text(_) => "text",
            Self::LineBreak => "line-break",
            Self::Nowiki(_) => "nowiki",
            Self::Html(_) => "html",
            Self::Anchor(_) => "anchor",
            Self::Image { .. } => "image",
            Self::SearchInput => "search-input",
            Self::Separator => "separator",
            Self::VerticalSpace => "vertical-space",
            Self::Task(_) => "task",
            Self::Code { .. } => "code",
            Self::Table(_) => "table",
            Self::IncludePage { .. } => "include-page",
            Self::TableOfContents => "table-of-contents",
            Self::PageName { .. } => "page-name",
            Self::WikiVersion => "wiki-version",
            Self::Parent { .. } => "parent",
            Self::ListPages { .. } => "list-pages",
            Self::DateTime { .. } => "date-time",
            Self::ListParents { .. } => "list-parents",
            Self::ListChildren { .. } => "list-children",
            Self::ListWantedPages { .. } => "list-wanted-pages",
            Self::ListUnlinkedPages { .. } => "list-unlinked-pages",
        }
    }
}

/// A task item.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Task {
    /// The task state.
    pub state: TaskState,
    /// A free-form due date.
    pub schedule: Option<String>,
    /// The task description.
    pub description: Option<String>,
}

/// The state of a [`Task`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    /// The task is open.
    #[default]
    Open,
    /// The task is open and important.
    Important,
    /// The task is done.
    Closed,
}

/// A table. Rows and cells are plain data owned by the table; the content
/// of every cell has the table as its parent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    /// CSS classes of the table.
    pub params: Option<String>,
    /// The table rows.
    pub rows: Vec<TableRow>,
}

impl Table {
    /// Iterates over all cells together with their row and column index.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, &TableCell)> {
        self.rows.iter().enumerate().flat_map(|(row_index, row)| {
            row.cells
                .iter()
                .enumerate()
                .map(move |(cell_index, cell)| (row_index, cell_index, cell))
        })
    }
}

/// A table row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableRow {
    /// CSS classes of the row.
    pub params: Option<String>,
    /// The row cells.
    pub cells: Vec<TableCell>,
}

/// A table cell.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableCell {
    /// If true, the cell is a header cell.
    pub header: bool,
    /// CSS classes of the cell.
    pub params: Option<String>,
    /// The cell content.
    pub content: Option<NodeId>,
}

/// Which part of a page path to show.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NameFormat {
    /// The full path.
    #[default]
    Path,
    /// The folder part of the path.
    Folder,
    /// The last path segment.
    Title,
}

impl NameFormat {
    /// Returns the part of `path` selected by this format.
    pub fn apply(self, path: &str) -> &str {
        match self {
            Self::Path => path,
            Self::Folder => crate::path::folder(path),
            Self::Title => crate::path::name(path),
        }
    }
}

/// Which parts of the current time to show.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateTimeFormat {
    /// The date.
    #[default]
    Date,
    /// The time of day.
    Time,
    /// The date and the time of day.
    DateTime,
}

/// Presentation options of a generated list of pages.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct Listing {
    /// Which part of each page path to show.
    pub format: NameFormat,
    /// If true, the pages are shown inline instead of as list items.
    pub inline: bool,
    /// The separator between inline entries.
    pub separator: Option<String>,
    /// The text to show if there are no pages. If `None`, nothing is shown.
    pub output_on_empty: Option<String>,
    /// If true, the outermost page is used as context.
    pub global: bool,
}
