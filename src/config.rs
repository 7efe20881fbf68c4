//! Renderer settings and localised messages.
//!
//! Settings are read from a JSON document. Every field is optional:
//!
//! ```json
//! {
//!     "program-name": "MyWiki",
//!     "version": "1.0",
//!     "edit-links": true,
//!     "head": "<meta name=\"robots\" content=\"noindex\">",
//!     "stylesheets": ["/wiki.css"],
//!     "start-page": "/Home",
//!     "index-page-name": "Index",
//!     "messages": { "ViewPageHandler.html.editSection": "Edit section" }
//! }
//! ```

use indexmap::IndexMap;
use serde::Deserialize;
use std::{borrow::Cow, path::Path};

/// A settings error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The settings file could not be read.
    #[error("could not read settings: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file is not valid.
    #[error("invalid settings: {0}")]
    Json(#[from] serde_json::Error),
}

/// The standard result type used by fallible settings functions.
pub type Result<T = (), E = Error> = core::result::Result<T, E>;

/// A source of localised user interface messages.
pub trait Messages {
    /// Returns the message for the given key. If no message is known, the
    /// key itself is returned.
    fn message<'a>(&'a self, key: &'a str) -> Cow<'a, str>;
}

/// Renderer settings.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Settings {
    /// The program name shown in page titles and by the version tag.
    pub program_name: String,
    /// The program version shown by the version tag.
    pub version: String,
    /// If true, edit links are rendered next to headings, tables, table
    /// cells, and code blocks.
    pub edit_links: bool,
    /// Extra markup copied verbatim into the document head.
    pub head: Option<String>,
    /// Stylesheet URLs linked from the document head.
    pub stylesheets: Vec<String>,
    /// Script URLs linked from the document head.
    pub scripts: Vec<String>,
    /// The path of the start page, which counts as linked.
    pub start_page: String,
    /// The name of the page shown for a folder link such as `/Docs/`.
    pub index_page_name: Option<String>,
    /// Localised messages, by key.
    pub messages: IndexMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            program_name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            edit_links: true,
            head: None,
            stylesheets: vec![],
            scripts: vec![],
            start_page: "/Home".to_string(),
            index_page_name: Some("Index".to_string()),
            messages: IndexMap::new(),
        }
    }
}

impl Settings {
    /// Reads settings from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("loading settings from {}", path.display());
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Reads settings from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The program name followed by the program version.
    pub fn program_name_version(&self) -> String {
        format!("{} {}", self.program_name, self.version)
    }
}

impl Messages for Settings {
    fn message<'a>(&'a self, key: &'a str) -> Cow<'a, str> {
        match self.messages.get(key) {
            Some(message) => Cow::Borrowed(message),
            None => {
                log::trace!("no message for {key}");
                Cow::Borrowed(key)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = Settings::from_json("{}").unwrap();
        assert_eq!(settings.program_name, "wiki-render");
        assert!(settings.edit_links);
        assert!(settings.head.is_none());
        assert_eq!(settings.message("some.key"), "some.key");
        assert_eq!(settings.start_page, "/Home");
        assert_eq!(settings.index_page_name.as_deref(), Some("Index"));
    }

    #[test]
    fn from_json() {
        let settings = Settings::from_json(
            r#"{
                "program-name": "MyWiki",
                "version": "3.1",
                "edit-links": false,
                "stylesheets": ["/a.css"],
                "messages": { "b": "Bee", "a": "Ay" }
            }"#,
        )
        .unwrap();
        assert_eq!(settings.program_name_version(), "MyWiki 3.1");
        assert!(!settings.edit_links);
        assert_eq!(settings.stylesheets, ["/a.css"]);
        assert_eq!(settings.message("a"), "Ay");
        assert_eq!(settings.messages.keys().collect::<Vec<_>>(), ["b", "a"]);
    }

    #[test]
    fn errors() {
        assert!(matches!(
            Settings::from_json(r#"{ "edit-links": "yes" }"#),
            Err(Error::Json(_))
        ));
        assert!(matches!(
            Settings::from_path("/nonexistent/settings.json"),
            Err(Error::Io(_))
        ));
    }
}
