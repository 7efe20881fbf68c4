//! JSON input format for page element trees.
//!
//! Every node is an object with a `"type"` field naming the element kind in
//! kebab case, an optional `"span": [from, to]`, and the fields of that kind.
//! Single children go in `"child"`, list members in `"items"`, and table rows
//! in `"rows"`:
//!
//! ```json
//! { "type": "page", "path": "/Start", "child": {
//!     "type": "list", "items": [
//!         { "type": "heading", "level": 1, "span": [0, 8],
//!           "child": { "type": "text", "text": "Hello" } }
//!     ]
//! } }
//! ```

use super::{
    DateTimeFormat, Element, Error, Listing, NameFormat, NodeId, Options, Result, Span, Table,
    TableCell, TableRow, Task, TaskState, Tree,
};
use serde::Deserialize;

/// Decodes a tree from a JSON string. The decoded top-level node becomes the
/// root of the tree.
pub fn from_str(json: &str) -> Result<Tree> {
    build_tree(serde_json::from_str(json)?)
}

/// Decodes a tree from a JSON reader.
pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Tree> {
    build_tree(serde_json::from_reader(reader)?)
}

impl core::str::FromStr for Tree {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        from_str(s)
    }
}

/// A serialised node.
#[derive(Debug, Deserialize)]
struct RawNode {
    /// The source range.
    #[serde(default)]
    span: Option<(usize, usize)>,
    /// The element kind and its fields.
    #[serde(flatten)]
    kind: RawKind,
}

type Child = Option<Box<RawNode>>;

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum RawKind {
    List {
        #[serde(default)]
        items: Vec<RawNode>,
    },
    Page {
        path: Option<String>,
        child: Child,
    },
    Heading {
        level: u8,
        child: Child,
    },
    Paragraph {
        #[serde(default)]
        centered: bool,
        #[serde(default)]
        indention: u32,
        #[serde(default)]
        vertical_spacing: bool,
        child: Child,
    },
    ListItem {
        #[serde(default = "first_level")]
        level: usize,
        #[serde(default)]
        ordered: bool,
        child: Child,
    },
    Bold {
        child: Child,
    },
    Italic {
        child: Child,
    },
    Underlined {
        child: Child,
    },
    Strikethrough {
        child: Child,
    },
    Monospace {
        child: Child,
    },
    Small {
        child: Child,
    },
    Color {
        name: String,
        child: Child,
    },
    Style {
        #[serde(default)]
        classes: Vec<String>,
        child: Child,
    },
    HtmlTag {
        name: String,
        attributes: Option<String>,
        child: Child,
    },
    XmlTag {
        prefix: Option<String>,
        name: String,
        #[serde(default)]
        options: Options,
        child: Child,
    },
    LinkPage {
        path: Option<String>,
        anchor: Option<String>,
        child: Child,
    },
    LinkWiki {
        command: String,
        child: Child,
    },
    LinkLocalFile {
        path: String,
        child: Child,
    },
    LinkExternal {
        url: String,
        child: Child,
    },
    Text {
        text: String,
    },
    LineBreak,
    Nowiki {
        text: String,
    },
    Html {
        text: String,
    },
    Anchor {
        name: String,
    },
    Image {
        url: String,
        #[serde(default)]
        options: Options,
    },
    SearchInput,
    Separator,
    VerticalSpace,
    Task {
        #[serde(default)]
        state: TaskState,
        schedule: Option<String>,
        description: Option<String>,
    },
    Code {
        language: Option<String>,
        #[serde(default)]
        text: String,
    },
    Table {
        params: Option<String>,
        #[serde(default)]
        rows: Vec<RawRow>,
    },
    IncludePage {
        path: String,
    },
    TableOfContents,
    PageName {
        #[serde(default)]
        format: NameFormat,
        #[serde(default)]
        linked: bool,
        #[serde(default)]
        global: bool,
    },
    WikiVersion,
    Parent {
        path: Option<String>,
    },
    ListPages {
        folder: Option<String>,
        #[serde(default)]
        listing: Listing,
    },
    DateTime {
        #[serde(default)]
        format: DateTimeFormat,
    },
    ListParents {
        path: Option<String>,
        #[serde(default)]
        listing: Listing,
    },
    ListChildren {
        path: Option<String>,
        #[serde(default)]
        listing: Listing,
    },
    ListWantedPages {
        #[serde(default)]
        listing: Listing,
    },
    ListUnlinkedPages {
        #[serde(default)]
        hide_parents: bool,
        #[serde(default)]
        hide_children: bool,
        #[serde(default)]
        listing: Listing,
    },
}

#[derive(Debug, Deserialize)]
struct RawRow {
    params: Option<String>,
    #[serde(default)]
    cells: Vec<RawCell>,
}

#[derive(Debug, Deserialize)]
struct RawCell {
    #[serde(default)]
    header: bool,
    params: Option<String>,
    content: Option<RawNode>,
}

fn first_level() -> usize {
    1
}

/// Builds a tree with the given node as its root.
fn build_tree(raw: RawNode) -> Result<Tree> {
    let mut tree = Tree::new();
    let root = build(&mut tree, raw)?;
    tree.set_root(root);
    log::debug!("decoded tree with {} nodes", tree.len());
    Ok(tree)
}

/// Adds the given node and all of its descendants to the tree.
fn build(tree: &mut Tree, raw: RawNode) -> Result<NodeId> {
    let span = match raw.span {
        Some((from, to)) if from > to => return Err(Error::Span { from, to }),
        Some((from, to)) => Some(Span::new(from, to)),
        None => None,
    };

    let element = match raw.kind {
        RawKind::List { items } => Element::List(
            items
                .into_iter()
                .map(|item| build(tree, item))
                .collect::<Result<_>>()?,
        ),
        RawKind::Page { path, child } => Element::Page {
            path,
            child: build_child(tree, child)?,
        },
        RawKind::Heading { level, child } => Element::Heading {
            level: level.max(1),
            child: build_child(tree, child)?,
        },
        RawKind::Paragraph {
            centered,
            indention,
            vertical_spacing,
            child,
        } => Element::Paragraph {
            centered,
            indention,
            vertical_spacing,
            child: build_child(tree, child)?,
        },
        RawKind::ListItem {
            level,
            ordered,
            child,
        } => Element::ListItem {
            level: level.max(1),
            ordered,
            child: build_child(tree, child)?,
        },
        RawKind::Bold { child } => Element::Bold {
            child: build_child(tree, child)?,
        },
        RawKind::Italic { child } => Element::Italic {
            child: build_child(tree, child)?,
        },
        RawKind::Underlined { child } => Element::Underlined {
            child: build_child(tree, child)?,
        },
        RawKind::Strikethrough { child } => Element::Strikethrough {
            child: build_child(tree, child)?,
        },
        RawKind::Monospace { child } => Element::Monospace {
            child: build_child(tree, child)?,
        },
        RawKind::Small { child } => Element::Small {
            child: build_child(tree, child)?,
        },
        RawKind::Color { name, child } => Element::Color {
            name,
            child: build_child(tree, child)?,
        },
        RawKind::Style { classes, child } => Element::Style {
            classes,
            child: build_child(tree, child)?,
        },
        RawKind::HtmlTag {
            name,
            attributes,
            child,
        } => Element::HtmlTag {
            name,
            attributes,
            child: build_child(tree, child)?,
        },
        RawKind::XmlTag {
            prefix,
            name,
            options,
            child,
        } => Element::XmlTag {
            prefix,
            name,
            options,
            child: build_child(tree, child)?,
        },
        RawKind::LinkPage {
            path,
            anchor,
            child,
        } => Element::LinkPage {
            path,
            anchor,
            child: build_child(tree, child)?,
        },
        RawKind::LinkWiki { command, child } => Element::LinkWiki {
            command,
            child: build_child(tree, child)?,
        },
        RawKind::LinkLocalFile { path, child } => Element::LinkLocalFile {
            path,
            child: build_child(tree, child)?,
        },
        RawKind::LinkExternal { url, child } => Element::LinkExternal {
            url,
            child: build_child(tree, child)?,
        },
        RawKind::Text { text } => Element::Text(text),
        RawKind::LineBreak => Element::LineBreak,
        RawKind::Nowiki { text } => Element::Nowiki(text),
        RawKind::Html { text } => Element::Html(text),
        RawKind::Anchor { name } => Element::Anchor(name),
        RawKind::Image { url, options } => Element::Image { url, options },
        RawKind::SearchInput => Element::SearchInput,
        RawKind::Separator => Element::Separator,
        RawKind::VerticalSpace => Element::VerticalSpace,
        RawKind::Task {
            state,
            schedule,
            description,
        } => Element::Task(Task {
            state,
            schedule,
            description,
        }),
        RawKind::Code { language, text } => Element::Code { language, text },
        RawKind::Table { params, rows } => {
            let mut table = Table {
                params,
                rows: Vec::with_capacity(rows.len()),
            };
            for row in rows {
                let mut cells = Vec::with_capacity(row.cells.len());
                for cell in row.cells {
                    cells.push(TableCell {
                        header: cell.header,
                        params: cell.params,
                        content: cell.content.map(|content| build(tree, content)).transpose()?,
                    });
                }
                table.rows.push(TableRow {
                    params: row.params,
                    cells,
                });
            }
            Element::Table(table)
        }
        RawKind::IncludePage { path } => Element::IncludePage { path },
        RawKind::TableOfContents => Element::TableOfContents,
        RawKind::PageName {
            format,
            linked,
            global,
        } => Element::PageName {
            format,
            linked,
            global,
        },
        RawKind::WikiVersion => Element::WikiVersion,
        RawKind::Parent { path } => Element::Parent { path },
        RawKind::ListPages { folder, listing } => Element::ListPages { folder, listing },
        RawKind::DateTime { format } => Element::DateTime { format },
        RawKind::ListParents { path, listing } => Element::ListParents { path, listing },
        RawKind::ListChildren { path, listing } => Element::ListChildren { path, listing },
        RawKind::ListWantedPages { listing } => Element::ListWantedPages { listing },
        RawKind::ListUnlinkedPages {
            hide_parents,
            hide_children,
            listing,
        } => Element::ListUnlinkedPages {
            hide_parents,
            hide_children,
            listing,
        },
    };

    Ok(tree.add(element, span))
}

/// Adds an optional single child.
#[inline]
fn build_child(tree: &mut Tree, child: Child) -> Result<Option<NodeId>> {
    child.map(|child| build(tree, *child)).transpose()
}
