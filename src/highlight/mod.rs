//! Syntax highlighting for code blocks.
//!
//! Every highlighter is a small state machine which splits a code block into
//! tokens of a language specific kind. [`Tokenizer::format`] turns the tokens
//! into HTML with one `<span class="code-<language>-<kind>">` per highlighted
//! token. A token never spans a line break: constructs which continue over
//! several lines, like block comments, start a new token of the same kind on
//! every line.
//!
//! Tokenizers never fail. Unterminated constructs end with the input.

pub use ini::{IniKind, IniTokenizer};
pub use java::{JavaKind, JavaTokenizer};
pub use properties::{PropertiesKind, PropertiesTokenizer};
pub use xml::{XmlKind, XmlTokenizer};
pub use yaml::{YamlKind, YamlTokenizer};

use crate::common::{escape_code, escape_html, is_code_whitespace};
use core::fmt::Write as _;

mod ini;
mod java;
mod properties;
mod scanner;
mod xml;
mod yaml;

/// A language with a dedicated highlighter.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Language {
    /// INI files.
    Ini,
    /// Java source code.
    Java,
    /// Java properties files.
    Properties,
    /// XML and HTML documents.
    Xml,
    /// YAML documents.
    Yaml,
}

/// Known language names, in lowercase.
static LANGUAGES: phf::Map<&'static str, Language> = phf::phf_map! {
    "html" => Language::Xml,
    "ini" => Language::Ini,
    "java" => Language::Java,
    "properties" => Language::Properties,
    "xml" => Language::Xml,
    "yaml" => Language::Yaml,
    "yml" => Language::Yaml,
};

impl Language {
    /// Finds the language with the given case-insensitive name.
    pub fn from_name(name: &str) -> Option<Self> {
        LANGUAGES.get(name.to_ascii_lowercase().as_str()).copied()
    }
}

/// A classified piece of a code block.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Token<K> {
    /// The token kind.
    pub kind: K,
    /// The raw token text.
    pub text: String,
}

impl<K> Token<K> {
    /// Creates a new token.
    #[inline]
    pub fn new(kind: K, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// The kind of a token of some language.
pub trait TokenKind: Copy {
    /// The language name used in CSS class names.
    const LANGUAGE: &'static str;

    /// The kind name used in CSS class names, or `None` if tokens of this
    /// kind are not highlighted.
    fn class(self) -> Option<&'static str>;

    /// Returns true for the line break kind.
    fn is_line_break(self) -> bool;
}

/// A highlighter for one language.
pub trait Tokenizer {
    /// The token kinds of the language.
    type Kind: TokenKind;

    /// Returns the next token, or `None` at the end of the input.
    fn next_token(&mut self) -> Option<Token<Self::Kind>>;

    /// Returns an iterator over the remaining tokens.
    fn tokens(mut self) -> impl Iterator<Item = Token<Self::Kind>>
    where
        Self: Sized,
    {
        core::iter::from_fn(move || self.next_token())
    }

    /// Converts the remaining tokens into HTML.
    fn format(self) -> String
    where
        Self: Sized,
    {
        let mut out = String::new();
        for token in self.tokens() {
            if token.kind.is_line_break() {
                out += "<br>\n";
            } else if let Some(class) = token.kind.class() {
                let _ = write!(
                    out,
                    r#"<span class="code-{}-{class}">{}</span>"#,
                    Self::Kind::LANGUAGE,
                    escape_code(&token.text)
                );
            } else {
                out += &escape_code(&token.text);
            }
        }
        out
    }
}

/// Converts a code block into HTML, highlighted according to the given
/// language. Unknown languages are formatted with [`plain`].
pub fn format(language: Option<&str>, code: &str) -> String {
    match language.and_then(Language::from_name) {
        Some(Language::Ini) => IniTokenizer::new(code).format(),
        Some(Language::Java) => JavaTokenizer::new(code).format(),
        Some(Language::Properties) => PropertiesTokenizer::new(code).format(),
        Some(Language::Xml) => XmlTokenizer::new(code).format(),
        Some(Language::Yaml) => YamlTokenizer::new(code).format(),
        None => {
            if let Some(language) = language {
                log::trace!("no highlighter for '{language}'");
            }
            plain(code)
        }
    }
}

/// Converts a code block into HTML without highlighting. Line breaks and
/// whitespace are kept.
pub fn plain(code: &str) -> String {
    let escaped = escape_html(code);
    let mut out = String::with_capacity(escaped.len());
    for c in escaped.chars() {
        match c {
            '\n' => out += "<br>\n",
            '\r' => {}
            c if is_code_whitespace(c) => out += "&nbsp;",
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Inputs with multi-line constructs, unterminated constructs, and stray
    /// characters for every language.
    const SAMPLES: &[&str] = &[
        "",
        "\n\n",
        "[section]\r\nkey = value ; x\n# comment\n[open",
        "a.b:c\n// x\n  k  =  v\nkey\nnext=1",
        "/* a\n\n b */ final int x = 'c' + \"s\\\"\\\n\"; // end\n\"open",
        "<?xml version=\"1.0\"?>\n<!-- a\n b --><a x='1' y=2 z>&amp; &x\n<![CDATA[ <\n]]></a>< b",
        "---\n- a: b\n  c: |\n    x\n\n    y\n  d: >\nk:\n:v\n# end",
        "tab\there & <there>\r\n",
    ];

    #[track_caller]
    fn assert_round_trip<T: Tokenizer>(tokenizer: T, input: &str) {
        let text = tokenizer
            .tokens()
            .map(|token| token.text)
            .collect::<String>();
        assert_eq!(text, input.replace('\r', ""));
    }

    #[test]
    fn tokens_reproduce_input() {
        for input in SAMPLES {
            assert_round_trip(IniTokenizer::new(input), input);
            assert_round_trip(JavaTokenizer::new(input), input);
            assert_round_trip(PropertiesTokenizer::new(input), input);
            assert_round_trip(XmlTokenizer::new(input), input);
            assert_round_trip(YamlTokenizer::new(input), input);
        }
    }

    #[test]
    fn tokens_do_not_span_lines() {
        for input in SAMPLES {
            for token in XmlTokenizer::new(input).tokens() {
                assert!(token.kind == XmlKind::LineBreak || !token.text.contains('\n'));
            }
            for token in YamlTokenizer::new(input).tokens() {
                assert!(token.kind == YamlKind::LineBreak || !token.text.contains('\n'));
            }
            for token in JavaTokenizer::new(input).tokens() {
                assert!(token.kind == JavaKind::LineBreak || !token.text.contains('\n'));
            }
        }
    }

    #[test]
    fn languages() {
        assert_eq!(Language::from_name("Java"), Some(Language::Java));
        assert_eq!(Language::from_name("HTML"), Some(Language::Xml));
        assert_eq!(Language::from_name("yml"), Some(Language::Yaml));
        assert_eq!(Language::from_name("cobol"), None);
    }

    #[test]
    fn dispatch() {
        assert_eq!(
            format(Some("INI"), "a=b"),
            r#"<span class="code-ini-key">a</span><span class="code-ini-delimiter">=</span><span class="code-ini-value">b</span>"#
        );
        assert_eq!(
            format(Some("yaml"), "name"),
            r#"<span class="code-yaml-key">name</span>"#
        );
        assert_eq!(format(Some("cobol"), "final"), "final");
        assert_eq!(format(None, "final"), "final");
    }

    #[test]
    fn plain_text() {
        assert_eq!(
            plain("text&with<special\r\nchars\tetc"),
            "text&amp;with&lt;special<br>\nchars&nbsp;etc"
        );
        assert_eq!(plain("a  b"), "a&nbsp;&nbsp;b");
    }
}
