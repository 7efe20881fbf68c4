//! Tree to HTML conversion.

use super::{
    emitters::{ListEmitter, ListKind},
    writer::{FormMethod, HtmlWriter},
};
use crate::{
    common::{encode_url, encode_url_parameter, escape_html, id_string, page_path_to_url},
    config::Messages,
    highlight, path,
    repository::Repository,
    tree::{Element, NodeId, Options, Span, Table, Task, TaskState, Tree},
};

/// Message keys used by the renderer.
mod keys {
    pub(super) const EDIT_CODE: &str = "ViewPageHandler.html.editCode";
    pub(super) const EDIT_SECTION: &str = "ViewPageHandler.html.editSection";
    pub(super) const EDIT_TABLE: &str = "ViewPageHandler.html.editTable";
    pub(super) const EDIT_TABLE_CELL: &str = "ViewPageHandler.html.editTableCell";
    pub(super) const SEARCH: &str = "ViewPageHandler.html.search";
    pub(super) const WIKI_EDIT_PAGE: &str = "ViewPageHandler.wiki.editpage";
    pub(super) const WIKI_NEW_PAGE: &str = "ViewPageHandler.wiki.newpage";
    pub(super) const WIKI_SHUTDOWN: &str = "ViewPageHandler.wiki.shutdown";
    pub(super) const WIKI_STARTPAGE: &str = "ViewPageHandler.wiki.startpage";
    pub(super) const WIKI_STATUS: &str = "ViewPageHandler.wiki.status";
}

/// Converts a transformed page tree into HTML.
///
/// A renderer is used for a single conversion. Placeholder elements which
/// should have been replaced by a transformation pass are skipped.
pub struct PageRenderer<'a> {
    /// The tree to render.
    tree: &'a Tree,
    /// The page store, used to decide whether link targets exist.
    repository: &'a dyn Repository,
    /// Localised link and tooltip texts.
    messages: &'a dyn Messages,
    /// If true, edit links are rendered for sections, tables, table cells,
    /// and code blocks which carry a source span.
    edit_links: bool,
    /// The output.
    out: HtmlWriter,
    /// The most recently rendered element, ignoring anchors.
    previous: Option<NodeId>,
}

impl<'a> PageRenderer<'a> {
    /// Creates a new renderer. Edit links are disabled.
    pub fn new(tree: &'a Tree, repository: &'a dyn Repository, messages: &'a dyn Messages) -> Self {
        Self {
            tree,
            repository,
            messages,
            edit_links: false,
            out: HtmlWriter::new(),
            previous: None,
        }
    }

    /// Enables or disables edit links.
    #[must_use]
    pub fn with_edit_links(mut self, edit_links: bool) -> Self {
        self.edit_links = edit_links;
        self
    }

    /// Renders the subtree at `node`. All tags of the returned writer are
    /// closed.
    pub fn render(mut self, node: NodeId) -> HtmlWriter {
        self.render_node(Some(node));
        self.out.close_all_tags();
        log::debug!("rendered {} body lines", self.out.body_lines().len());
        self.out
    }

    /// Renders a single element and its descendants.
    fn render_node(&mut self, node: Option<NodeId>) {
        let Some(node) = node else {
            return;
        };
        let tree = self.tree;
        let element = tree.element(node);

        if !matches!(element, Element::ListItem { .. }) {
            ListEmitter::finish(&mut self.out);
        }

        let block = !element.is_inline();
        if block {
            self.out.set_continue_in_new_line();
        }

        match element {
            Element::List(members) => {
                for &member in members {
                    self.render_node(Some(member));
                }
            }
            Element::Page { child, .. } | Element::XmlTag { child, .. } => self.render_node(*child),
            &Element::Heading { level, child } => self.heading(node, level, child),
            Element::Separator => self.out.text("<hr>"),
            Element::VerticalSpace => self.vertical_space(),
            Element::Task(task) => self.task(task),
            &Element::ListItem {
                level,
                ordered,
                child,
            } => {
                ListEmitter::emit(&mut self.out, level, ListKind::from(ordered));
                self.wrap("li", "", child);
            }
            Element::Table(table) => self.table(node, table),
            &Element::Paragraph {
                centered,
                indention,
                vertical_spacing,
                child,
            } => {
                if vertical_spacing && self.follows_block() {
                    self.vertical_space();
                }
                let mut class = format!("paragraph{indention}");
                if centered {
                    class += " center";
                }
                let depth = self.out.open_div_tag(Some(&class), None);
                self.render_node(child);
                self.out.close_tags(depth);
            }
            Element::Code { language, text } => self.code(node, language.as_deref(), text),
            Element::Bold { child } => self.wrap("b", "", *child),
            Element::Italic { child } => self.wrap("i", "", *child),
            Element::Underlined { child } => self.wrap("u", "", *child),
            Element::Strikethrough { child } => self.wrap("strike", "", *child),
            Element::Monospace { child } => self.wrap("tt", "", *child),
            Element::Small { child } => self.wrap("span", r#"class="small""#, *child),
            Element::Color { name, child } => {
                self.wrap("font", &format!(r#"color="{}""#, escape_html(name)), *child);
            }
            Element::Style { classes, child } => {
                let classes = classes.join(" ");
                self.wrap("span", &format!(r#"class="{}""#, escape_html(&classes)), *child);
            }
            Element::HtmlTag {
                name,
                attributes,
                child,
            } => self.wrap(name, attributes.as_deref().unwrap_or_default(), *child),
            Element::Nowiki(text) => self.out.text(&escape_html(text).replace('\n', "<br>\n")),
            Element::Html(html) => self.out.text(html),
            Element::LinkPage {
                path,
                anchor,
                child,
            } => self.link_page(node, path.as_deref(), anchor.as_deref(), *child),
            Element::LinkWiki { command, child } => self.link_wiki(node, command, *child),
            Element::LinkLocalFile { path, child } => self.link_local_file(node, path, *child),
            Element::LinkExternal { url, child } => self.link_external(url, *child),
            Element::Text(text) => self.out.text(&escape_html(text)),
            Element::LineBreak => self.out.new_line(),
            Element::Anchor(name) => {
                self.out
                    .open_tag("a", &format!(r#"name="{}""#, escape_html(name)));
                self.out.close_tag();
            }
            Element::Image { url, options } => self.image(node, url, options),
            Element::SearchInput => {
                let placeholder = self.messages.message(keys::SEARCH);
                let depth =
                    self.out
                        .open_form_tag(Some("searchForm"), Some("/search/"), FormMethod::Get);
                self.out.text(&format!(
                    r#"<input type="text" name="text" placeholder="{}">"#,
                    escape_html(&placeholder)
                ));
                self.out.close_tags(depth);
            }
            Element::IncludePage { .. }
            | Element::TableOfContents
            | Element::PageName { .. }
            | Element::WikiVersion
            | Element::Parent { .. }
            | Element::ListPages { .. }
            | Element::DateTime { .. }
            | Element::ListParents { .. }
            | Element::ListChildren { .. }
            | Element::ListWantedPages { .. }
            | Element::ListUnlinkedPages { .. } => {
                log::warn!("skipping untransformed {} element", element.kind_name());
            }
        }

        if block {
            self.out.set_continue_in_new_line();
        }

        if !matches!(element, Element::Anchor(_)) {
            self.previous = Some(node);
        }
    }

    /// Renders `child` inside a tag.
    fn wrap(&mut self, name: &str, attributes: &str, child: Option<NodeId>) {
        let depth = self.out.open_tag(name, attributes);
        self.render_node(child);
        self.out.close_tags(depth);
    }

    /// Renders an empty spacer block.
    fn vertical_space(&mut self) {
        self.out.open_div_tag(Some("verticalspace"), None);
        self.out.close_tag();
        self.out.set_continue_in_new_line();
    }

    /// Returns true if the previous element was a paragraph, a list item, or
    /// a table, which need extra space before a spaced paragraph.
    fn follows_block(&self) -> bool {
        self.previous.is_some_and(|previous| {
            matches!(
                self.tree.element(previous),
                Element::Paragraph { .. } | Element::ListItem { .. } | Element::Table(_)
            )
        })
    }

    /// The path of the page containing `node`.
    fn context_path(&self, node: NodeId) -> Option<&'a str> {
        let tree = self.tree;
        tree.context_page(node, false)
            .and_then(|page| tree.page_path(page))
    }

    /// Renders an edit icon linking to the editor for the given part of the
    /// page at `page_path`.
    fn edit_link(&mut self, page_path: &str, span: Span, class: &str, image: &str, key: &str) {
        let url = format!(
            "{}?fromPos={}&toPos={}",
            page_path_to_url(&path::concat("/edit/", page_path)),
            span.from,
            span.to
        );
        let title = self.messages.message(key);
        self.out.text(&format!(
            r#"<a class="{class}" href="{}"><img src="{image}" title="{}" alt=""></a>"#,
            escape_html(&encode_url(&url)),
            escape_html(&title)
        ));
    }

    /// Renders a heading. Levels above 3 are rendered as plain paragraphs.
    fn heading(&mut self, node: NodeId, level: u8, child: Option<NodeId>) {
        let tag = match level {
            1 => "h1",
            2 => "h2",
            3 => "h3",
            _ => "p",
        };
        let text = self.tree.string_content(node);
        let attributes = if text.is_empty() {
            String::new()
        } else {
            format!(r#"id="{}""#, id_string(&text))
        };
        let depth = self.out.open_tag(tag, &attributes);

        if self.edit_links
            && let Some(page_path) = self.context_path(node)
            && let Some(from) = self.tree.span(node).map(|span| span.from)
            && let Some(to) = self.section_end(node, level)
        {
            self.edit_link(
                page_path,
                Span::new(from, to),
                "editsection",
                "/edit2.png",
                keys::EDIT_SECTION,
            );
        }

        self.render_node(child);
        self.out.close_tags(depth);
    }

    /// Finds the end of the section started by the heading at `node`: the
    /// start of the next heading of the same or a lower level in the same
    /// list, or else the end of the list.
    fn section_end(&self, node: NodeId, level: u8) -> Option<usize> {
        let tree = self.tree;
        let list = tree.parent(node)?;
        let Element::List(members) = tree.element(list) else {
            return None;
        };
        let index = members.iter().position(|&member| member == node)?;

        for &member in &members[index + 1..] {
            if let Element::Heading { level: next, .. } = *tree.element(member)
                && next <= level
            {
                return tree.span(member).map(|span| span.from);
            }
        }
        tree.span(list).map(|span| span.to)
    }

    /// Renders a task item.
    fn task(&mut self, task: &Task) {
        let class = match task.state {
            TaskState::Open => "task open",
            TaskState::Important => "task important",
            TaskState::Closed => "task closed",
        };
        let depth = self.out.open_div_tag(Some(class), None);

        if let Some(schedule) = &task.schedule {
            self.out.open_span_tag("schedule");
            self.out.text(&escape_html(schedule));
            self.out.close_tag();
        }

        if let Some(description) = &task.description {
            self.out.text(&escape_html(description));
        }
        self.out.close_tags(depth);
    }

    /// Renders a table. Rows and cells start on their own lines.
    fn table(&mut self, node: NodeId, table: &Table) {
        let depth = self.out.open_div_tag(Some("table"), None);
        let page_path = self.context_path(node);

        if self.edit_links
            && let Some(span) = self.tree.span(node)
            && let Some(page_path) = page_path
        {
            self.edit_link(page_path, span, "edittable", "/edit.png", keys::EDIT_TABLE);
        }

        self.out.open_tag("table", &class_attribute(table.params.as_deref()));
        for row in &table.rows {
            self.out.set_continue_in_new_line();
            self.out.open_tag("tr", &class_attribute(row.params.as_deref()));

            for cell in &row.cells {
                self.out.set_continue_in_new_line();
                let tag = if cell.header { "th" } else { "td" };
                let cell_depth = self.out.open_tag(tag, &class_attribute(cell.params.as_deref()));

                if self.edit_links
                    && let Some(span) = cell.content.and_then(|content| self.tree.span(content))
                {
                    self.out.open_div_tag(Some("tablecell"), None);
                    if let Some(page_path) = page_path {
                        self.edit_link(
                            page_path,
                            span,
                            "editcell",
                            "/edit.png",
                            keys::EDIT_TABLE_CELL,
                        );
                    }
                }

                // A paragraph at the start of a cell gets no extra space.
                self.previous = None;
                self.render_node(cell.content);
                self.out.close_tags(cell_depth);
            }

            self.out.set_continue_in_new_line();
            self.out.close_tag();
        }

        self.out.set_continue_in_new_line();
        self.out.close_tags(depth);
    }

    /// Renders a code block, highlighted according to its language.
    fn code(&mut self, node: NodeId, language: Option<&str>, text: &str) {
        let depth = self.out.open_div_tag(Some("code"), None);

        if self.edit_links
            && let Some(span) = self.tree.span(node)
            && let Some(page_path) = self.context_path(node)
        {
            self.edit_link(page_path, span, "editcode", "/edit.png", keys::EDIT_CODE);
        }

        self.out.text(&highlight::format(language, text));
        self.out.close_tags(depth);
    }

    /// Renders a link to a wiki page. Links to missing pages lead to the
    /// editor instead.
    fn link_page(
        &mut self,
        node: NodeId,
        page_path: Option<&str>,
        anchor: Option<&str>,
        child: Option<NodeId>,
    ) {
        let tree = self.tree;
        let context = tree.context_page(node, false);
        let target = tree.absolute_page_path(page_path, context);

        let mut new_page = false;
        let url = match (page_path, target) {
            (Some(_), Some(target)) => {
                if target.ends_with('/') || self.repository.exists(&target) {
                    format!("/view{target}")
                } else {
                    new_page = true;
                    format!("/edit{target}")
                }
            }
            // Anchor in the same page
            _ => String::new(),
        };
        let mut url = page_path_to_url(&url).into_owned();
        let anchor = anchor.filter(|_| !new_page);
        if let Some(anchor) = anchor {
            url.push('#');
            url += &encode_url_parameter(anchor);
        }

        let mut attributes = String::new();
        if new_page {
            attributes += r#"class="linknewpage" "#;
        }
        attributes += &format!(r#"href="{}""#, escape_html(&encode_url(&url)));
        let depth = self.out.open_tag("a", &attributes);

        if child.is_some() {
            self.render_node(child);
        } else {
            if let Some(page_path) = page_path {
                let name = match page_path.strip_suffix('/') {
                    Some(folder) => match path::name(folder) {
                        "" => "/",
                        name => name,
                    },
                    None => path::name(page_path),
                };
                self.out.text(&escape_html(name));
            }
            if let Some(anchor) = anchor {
                self.out.text(&format!("#{}", escape_html(anchor)));
            }
        }
        self.out.close_tags(depth);
    }

    /// Renders a link to a built-in wiki command. Unknown commands are shown
    /// as plain text.
    fn link_wiki(&mut self, node: NodeId, command: &str, child: Option<NodeId>) {
        let tree = self.tree;
        let global_path = || {
            tree.context_page(node, true)
                .and_then(|page| tree.page_path(page))
        };

        let (url, key) = match command {
            "startpage" => (Some("/".to_string()), keys::WIKI_STARTPAGE),
            "editpage" => (
                global_path().map(|page_path| path::concat("/edit/", page_path)),
                keys::WIKI_EDIT_PAGE,
            ),
            "newpage" => (
                Some(global_path().map_or_else(
                    || "/edit/".to_string(),
                    |page_path| path::concat("/edit/", path::folder(page_path)),
                )),
                keys::WIKI_NEW_PAGE,
            ),
            "shutdown" => (Some("/shutdown".to_string()), keys::WIKI_SHUTDOWN),
            "status" => (Some("/status".to_string()), keys::WIKI_STATUS),
            _ => {
                log::trace!("unknown wiki command '{command}'");
                if child.is_some() {
                    self.render_node(child);
                } else {
                    self.out.text(&format!("wiki:{}?", escape_html(command)));
                }
                return;
            }
        };

        let depth = url.map(|url| {
            let href = escape_html(&encode_url(&page_path_to_url(&url))).into_owned();
            self.out.open_tag("a", &format!(r#"href="{href}""#))
        });
        if child.is_some() {
            self.render_node(child);
        } else {
            let text = self.messages.message(key);
            self.out.text(&text);
        }
        if let Some(depth) = depth {
            self.out.close_tags(depth);
        }
    }

    /// Renders a link to a file in the repository. Nothing is rendered
    /// outside of a page.
    fn link_local_file(&mut self, node: NodeId, file_path: &str, child: Option<NodeId>) {
        let tree = self.tree;
        let Some(target) = tree.absolute_page_path(Some(file_path), tree.context_page(node, false))
        else {
            return;
        };

        let url = page_path_to_url(&format!("/file{target}")).into_owned();
        let depth = self.out.open_tag(
            "a",
            &format!(r#"class="linkfile" href="{}""#, escape_html(&encode_url(&url))),
        );
        if child.is_some() {
            self.render_node(child);
        } else {
            self.out.text(&escape_html(file_path));
        }
        self.out.close_tags(depth);
    }

    /// Renders a link to an external URL. `mailto:` links are shown without
    /// the scheme.
    fn link_external(&mut self, url: &str, child: Option<NodeId>) {
        let (class, text) = match url.strip_prefix("mailto:") {
            Some(address) => ("linkemail", address),
            None => ("linkexternal", url),
        };
        let depth = self.out.open_tag(
            "a",
            &format!(r#"class="{class}" href="{}""#, escape_html(url)),
        );
        if child.is_some() {
            self.render_node(child);
        } else {
            self.out.text(&escape_html(text));
        }
        self.out.close_tags(depth);
    }

    /// Renders an image. Images which are not web URLs are served from the
    /// repository and need a containing page.
    fn image(&mut self, node: NodeId, url: &str, options: &Options) {
        let src = if url.starts_with("http") {
            escape_html(url).into_owned()
        } else {
            let tree = self.tree;
            let Some(target) = tree.absolute_page_path(Some(url), tree.context_page(node, false))
            else {
                return;
            };
            escape_html(&encode_url(&page_path_to_url(&format!("/img{target}")))).into_owned()
        };

        let mut html = format!(r#"<img src="{src}""#);
        for (key, value) in options {
            html += &format!(r#" {}="{}""#, escape_html(key), escape_html(value));
        }
        html += r#" alt="">"#;
        self.out.text(&html);
    }
}

/// A `class` attribute for optional table, row, or cell parameters.
fn class_attribute(params: Option<&str>) -> String {
    params
        .map(|params| format!(r#"class="{}""#, escape_html(params)))
        .unwrap_or_default()
}
