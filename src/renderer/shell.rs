//! The HTML document around rendered page content.

use super::writer::HtmlWriter;
use crate::{common::escape_html, config::Settings};

/// The document type of every generated page.
const DOCTYPE: &str = r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01 Transitional//EN" "http://www.w3.org/TR/html4/loose.dtd">"#;

/// Builds a complete HTML document from the title, head lines, body
/// attributes, and body lines of `writer`.
///
/// The title is followed by the program name. Stylesheets and scripts from
/// the settings are linked before the head lines of the writer, and `head`
/// is copied verbatim at the end of the document head.
pub fn render_document(mut writer: HtmlWriter, settings: &Settings, head: Option<&str>) -> String {
    writer.close_all_tags();

    let mut assets = HtmlWriter::new();
    for url in &settings.stylesheets {
        assets.add_stylesheet(url);
    }
    for url in &settings.scripts {
        assets.add_script(url);
    }

    let title = match writer.title() {
        Some(title) => format!("{title} | {}", settings.program_name),
        None => settings.program_name.clone(),
    };

    let mut out = String::new();
    out += DOCTYPE;
    out += "\n<html>\n<head>\n";
    out += &format!("  <title>{}</title>\n", escape_html(&title));
    for line in assets.head_lines().iter().chain(writer.head_lines()) {
        out += "  ";
        out += line;
        out.push('\n');
    }
    if let Some(head) = head {
        out += head;
        if !head.ends_with('\n') {
            out.push('\n');
        }
    }
    out += "</head>\n";

    match writer.body_attributes() {
        Some(attributes) => out += &format!("<body {attributes}>\n"),
        None => out += "<body>\n",
    }
    for line in writer.body_lines() {
        out += "  ";
        out += line;
        out.push('\n');
    }
    out += "</body>\n</html>\n";
    out
}

/// Creates a page which shows a single message in bold.
pub fn message_page(text: &str) -> HtmlWriter {
    let mut writer = HtmlWriter::new();
    writer.text(&format!("<b>{}</b>", escape_html(text)));
    writer
}

/// Creates an error page with the given title, a message in bold, and
/// optional technical details below it.
pub fn error_page(title: &str, message: &str, details: Option<&str>) -> HtmlWriter {
    let mut writer = HtmlWriter::new();
    writer.set_title(title);
    writer.text(&format!("<b>{}</b>", escape_html(message)));
    writer.new_line();
    if let Some(details) = details {
        writer.text(&escape_html(details));
        writer.new_line();
    }
    writer
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings {
            program_name: "MyWiki".into(),
            ..Default::default()
        }
    }

    #[test]
    fn empty_document() {
        assert_eq!(
            render_document(HtmlWriter::new(), &settings(), None),
            format!(
                "{DOCTYPE}\n<html>\n<head>\n  <title>MyWiki</title>\n</head>\n<body>\n</body>\n</html>\n"
            )
        );
    }

    #[test]
    fn full_document() {
        let mut writer = HtmlWriter::new();
        writer.set_title("A & B");
        writer.add_redirect("/view/x", 3);
        writer.set_body_attributes(r#"onload="init()""#);
        writer.open_div_tag(Some("outer"), None);
        writer.set_continue_in_new_line();
        writer.text("content");

        let settings = Settings {
            stylesheets: vec!["/wiki.css".into()],
            scripts: vec!["/wiki.js".into()],
            ..settings()
        };
        let html = render_document(writer, &settings, Some(r#"<meta name="robots" content="noindex">"#));
        assert_eq!(
            html.lines().skip(1).collect::<Vec<_>>(),
            [
                "<html>",
                "<head>",
                "  <title>A &amp; B | MyWiki</title>",
                r#"  <link rel="stylesheet" type="text/css" href="/wiki.css" />"#,
                r#"  <script type="text/javascript" src="/wiki.js"></script>"#,
                r#"  <meta http-equiv="Refresh" content="3; URL=/view/x" />"#,
                r#"<meta name="robots" content="noindex">"#,
                "</head>",
                r#"<body onload="init()">"#,
                r#"  <div class="outer">"#,
                "    content</div>",
                "</body>",
                "</html>",
            ]
        );
    }

    #[test]
    fn message() {
        let writer = message_page("Done <now>");
        assert_eq!(writer.title(), None);
        assert_eq!(writer.body_lines(), ["<b>Done &lt;now&gt;</b>"]);
    }

    #[test]
    fn error() {
        let writer = error_page("Error", "Not found", Some("/x & y"));
        assert_eq!(writer.title(), Some("Error"));
        assert_eq!(writer.body_lines(), ["<b>Not found</b><br>", "/x &amp; y<br>"]);

        let writer = error_page("Error", "Failed", None);
        assert_eq!(writer.body_lines(), ["<b>Failed</b><br>"]);
    }
}
