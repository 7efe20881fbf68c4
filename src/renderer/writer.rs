//! Line-oriented HTML output with a stack of open tags.

use crate::common::escape_html;

/// The submission method of an HTML form.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum FormMethod {
    /// `method="get"`.
    Get,
    /// `method="post"`.
    #[default]
    Post,
}

/// An append-only HTML builder.
///
/// The body is a list of lines. Text is appended to the current line until a
/// new line is requested, after which the next text starts a new line
/// indented by two spaces per open tag. Open tags are tracked on a stack so
/// that they can be closed by depth.
#[derive(Debug)]
pub struct HtmlWriter {
    /// The document title.
    title: Option<String>,
    /// Lines of the document head.
    head: Vec<String>,
    /// Extra attributes of the `<body>` tag.
    body_attributes: Option<String>,
    /// Lines of the document body.
    body: Vec<String>,
    /// Names of the currently open tags, innermost last.
    stack: Vec<String>,
    /// If true, the next text starts a new line.
    continue_in_new_line: bool,
}

impl Default for HtmlWriter {
    fn default() -> Self {
        Self {
            title: None,
            head: vec![],
            body_attributes: None,
            body: vec![],
            stack: vec![],
            continue_in_new_line: true,
        }
    }
}

impl HtmlWriter {
    /// Creates a new empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// The document title.
    #[inline]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Sets the document title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Adds a head line which redirects to `url` after `seconds`.
    pub fn add_redirect(&mut self, url: &str, seconds: u32) {
        self.head.push(format!(
            r#"<meta http-equiv="Refresh" content="{seconds}; URL={}" />"#,
            escape_html(url)
        ));
    }

    /// Adds a head line which links a stylesheet.
    pub fn add_stylesheet(&mut self, url: &str) {
        self.head.push(format!(
            r#"<link rel="stylesheet" type="text/css" href="{}" />"#,
            escape_html(url)
        ));
    }

    /// Adds a head line which loads a script.
    pub fn add_script(&mut self, url: &str) {
        self.head.push(format!(
            r#"<script type="text/javascript" src="{}"></script>"#,
            escape_html(url)
        ));
    }

    /// The lines of the document head.
    #[inline]
    pub fn head_lines(&self) -> &[String] {
        &self.head
    }

    /// Extra attributes of the `<body>` tag.
    #[inline]
    pub fn body_attributes(&self) -> Option<&str> {
        self.body_attributes.as_deref()
    }

    /// Sets extra attributes of the `<body>` tag.
    pub fn set_body_attributes(&mut self, attributes: impl Into<String>) {
        self.body_attributes = Some(attributes.into());
    }

    /// The lines of the document body.
    #[inline]
    pub fn body_lines(&self) -> &[String] {
        &self.body
    }

    /// Makes the next text start on a new line.
    #[inline]
    pub fn set_continue_in_new_line(&mut self) {
        self.continue_in_new_line = true;
    }

    /// Appends raw HTML to the body.
    pub fn text(&mut self, text: &str) {
        if self.continue_in_new_line || self.body.is_empty() {
            self.body.push("  ".repeat(self.stack.len()));
            self.continue_in_new_line = false;
        }

        if let Some(line) = self.body.last_mut() {
            *line += text;
        }
    }

    /// Appends a `<br>` and makes the next text start on a new line.
    pub fn new_line(&mut self) {
        self.text("<br>");
        self.set_continue_in_new_line();
    }

    /// Emits a start tag with the given raw attributes and returns the stack
    /// depth before the tag was opened, for use with
    /// [`close_tags`](Self::close_tags).
    pub fn open_tag(&mut self, name: &str, attributes: &str) -> usize {
        if attributes.is_empty() {
            self.text(&format!("<{name}>"));
        } else {
            self.text(&format!("<{name} {attributes}>"));
        }
        self.stack.push(name.to_string());
        self.stack.len() - 1
    }

    /// Emits a `<div>` start tag with an optional CSS class and optional raw
    /// attributes.
    pub fn open_div_tag(&mut self, class: Option<&str>, attributes: Option<&str>) -> usize {
        let mut all = String::new();
        if let Some(class) = class {
            all += &format!(r#"class="{}""#, escape_html(class));
        }
        if let Some(attributes) = attributes {
            if !all.is_empty() {
                all.push(' ');
            }
            all += attributes;
        }
        self.open_tag("div", &all)
    }

    /// Emits a `<span>` start tag with the given CSS class.
    pub fn open_span_tag(&mut self, class: &str) -> usize {
        self.open_tag("span", &format!(r#"class="{}""#, escape_html(class)))
    }

    /// Emits a `<form>` start tag for URL-encoded submission.
    pub fn open_form_tag(
        &mut self,
        name: Option<&str>,
        action: Option<&str>,
        method: FormMethod,
    ) -> usize {
        let method = match method {
            FormMethod::Get => "get",
            FormMethod::Post => "post",
        };
        let mut attributes = format!(r#"method="{method}""#);
        if let Some(action) = action {
            attributes += &format!(r#" action="{}""#, escape_html(action));
        }
        attributes += r#" enctype="application/x-www-form-urlencoded""#;
        if let Some(name) = name {
            attributes += &format!(r#" name="{}""#, escape_html(name));
        }
        self.open_tag("form", &attributes)
    }

    /// Closes the innermost open tag. Does nothing if no tag is open.
    pub fn close_tag(&mut self) {
        if let Some(name) = self.stack.pop() {
            self.text(&format!("</{name}>"));
        }
    }

    /// The number of open tags.
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Closes open tags until only `depth` tags remain open.
    pub fn close_tags(&mut self, depth: usize) {
        while self.stack.len() > depth {
            self.close_tag();
        }
    }

    /// Closes all open tags.
    #[inline]
    pub fn close_all_tags(&mut self) {
        self.close_tags(0);
    }

    /// Returns the name of the open tag `down` levels below the innermost
    /// one, or `None` if fewer tags are open.
    pub fn current_tag(&self, down: usize) -> Option<&str> {
        let index = self.stack.len().checked_sub(down + 1)?;
        Some(&self.stack[index])
    }

    /// Closes all tags of `other` and appends its body lines, each on a new
    /// line.
    pub fn absorb(&mut self, mut other: HtmlWriter) {
        other.close_all_tags();
        for line in &other.body {
            self.set_continue_in_new_line();
            self.text(line);
        }
        self.set_continue_in_new_line();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_and_body_attributes() {
        let mut writer = HtmlWriter::new();
        assert_eq!(writer.title(), None);
        writer.set_title("aTitle");
        assert_eq!(writer.title(), Some("aTitle"));

        assert_eq!(writer.body_attributes(), None);
        writer.set_body_attributes("onload=\"init()\"");
        assert_eq!(writer.body_attributes(), Some("onload=\"init()\""));
    }

    #[test]
    fn head_lines() {
        let mut writer = HtmlWriter::new();
        writer.add_redirect("/view/start", 5);
        writer.add_stylesheet("/wiki.css");
        writer.add_script("/script.js");
        assert_eq!(
            writer.head_lines(),
            [
                r#"<meta http-equiv="Refresh" content="5; URL=/view/start" />"#,
                r#"<link rel="stylesheet" type="text/css" href="/wiki.css" />"#,
                r#"<script type="text/javascript" src="/script.js"></script>"#,
            ]
        );
    }

    #[test]
    fn text() {
        let mut writer = HtmlWriter::new();
        writer.text("html text ");
        writer.text("more html");
        assert_eq!(writer.body_lines(), ["html text more html"]);
    }

    #[test]
    fn continue_in_new_line() {
        let mut writer = HtmlWriter::new();
        writer.text("html text");
        writer.set_continue_in_new_line();
        writer.text("more html");
        writer.open_tag("tagname", "");
        writer.set_continue_in_new_line();
        writer.text("even more html");
        assert_eq!(
            writer.body_lines(),
            ["html text", "more html<tagname>", "  even more html"]
        );
    }

    #[test]
    fn new_line() {
        let mut writer = HtmlWriter::new();
        writer.text("html text");
        writer.new_line();
        writer.text("more html");
        assert_eq!(writer.body_lines(), ["html text<br>", "more html"]);
    }

    #[test]
    fn open_tags() {
        let mut writer = HtmlWriter::new();
        assert_eq!(writer.open_tag("tagname1", ""), 0);
        assert_eq!(writer.open_tag("tagname2", "param2=value2"), 1);
        assert_eq!(writer.body_lines(), ["<tagname1><tagname2 param2=value2>"]);

        let mut writer = HtmlWriter::new();
        assert_eq!(writer.open_div_tag(Some("css-class1"), None), 0);
        assert_eq!(writer.open_div_tag(Some("css-class2"), Some("param2=value2")), 1);
        assert_eq!(writer.open_div_tag(None, None), 2);
        assert_eq!(
            writer.body_lines(),
            [r#"<div class="css-class1"><div class="css-class2" param2=value2><div>"#]
        );

        let mut writer = HtmlWriter::new();
        assert_eq!(writer.open_span_tag("a<b"), 0);
        assert_eq!(writer.body_lines(), [r#"<span class="a&lt;b">"#]);
    }

    #[test]
    fn form_tags() {
        let mut writer = HtmlWriter::new();
        assert_eq!(writer.open_form_tag(Some("form-name1"), None, FormMethod::Post), 0);
        assert_eq!(
            writer.body_lines(),
            [r#"<form method="post" enctype="application/x-www-form-urlencoded" name="form-name1">"#]
        );

        let mut writer = HtmlWriter::new();
        writer.open_form_tag(Some("form-name2"), None, FormMethod::Get);
        assert_eq!(
            writer.body_lines(),
            [r#"<form method="get" enctype="application/x-www-form-urlencoded" name="form-name2">"#]
        );

        let mut writer = HtmlWriter::new();
        writer.open_form_tag(None, Some("url"), FormMethod::default());
        assert_eq!(
            writer.body_lines(),
            [r#"<form method="post" action="url" enctype="application/x-www-form-urlencoded">"#]
        );
    }

    #[test]
    fn close_tags() {
        let mut writer = HtmlWriter::new();
        writer.close_tag();
        assert!(writer.body_lines().is_empty());

        writer.open_tag("tagname1", "");
        writer.open_tag("tagname2", "");
        writer.open_tag("tagname3", "");
        writer.close_tags(3);
        assert_eq!(writer.body_lines(), ["<tagname1><tagname2><tagname3>"]);
        writer.close_tags(1);
        assert_eq!(
            writer.body_lines(),
            ["<tagname1><tagname2><tagname3></tagname3></tagname2>"]
        );
        assert_eq!(writer.depth(), 1);
        writer.close_all_tags();
        assert_eq!(
            writer.body_lines(),
            ["<tagname1><tagname2><tagname3></tagname3></tagname2></tagname1>"]
        );
        assert_eq!(writer.depth(), 0);
    }

    #[test]
    fn well_formed_after_close_all() {
        let mut writer = HtmlWriter::new();
        for (index, name) in ["a", "b", "c", "d"].into_iter().enumerate() {
            writer.open_tag(name, "");
            if index % 2 == 1 {
                writer.set_continue_in_new_line();
            }
            writer.text("x");
        }
        writer.close_all_tags();

        let html = writer.body_lines().concat();
        let mut open = vec![];
        let mut rest = html.as_str();
        while let Some(start) = rest.find('<') {
            let end = start + rest[start..].find('>').unwrap();
            let tag = &rest[start + 1..end];
            if let Some(name) = tag.strip_prefix('/') {
                assert_eq!(open.pop(), Some(name));
            } else {
                open.push(tag);
            }
            rest = &rest[end + 1..];
        }
        assert!(open.is_empty());
    }

    #[test]
    fn current_tag() {
        let mut writer = HtmlWriter::new();
        assert_eq!(writer.current_tag(0), None);
        writer.open_tag("tagname1", "");
        writer.open_tag("tagname2", "");
        assert_eq!(writer.current_tag(0), Some("tagname2"));
        assert_eq!(writer.current_tag(1), Some("tagname1"));
        assert_eq!(writer.current_tag(2), None);
    }

    #[test]
    fn absorb() {
        let mut inner = HtmlWriter::new();
        inner.text("line1");
        inner.new_line();
        inner.text("line2");
        inner.new_line();
        inner.open_tag("tag1", "");

        let mut outer = HtmlWriter::new();
        outer.absorb(inner);
        assert_eq!(outer.body_lines(), ["line1<br>", "line2<br>", "<tag1></tag1>"]);

        outer.open_tag("div", "");
        let mut inner = HtmlWriter::new();
        inner.text("nested");
        outer.absorb(inner);
        outer.text("after");
        assert_eq!(outer.body_lines()[3..], ["<div>", "  nested", "  after"]);
    }
}
