//! YAML highlighting.
//!
//! This is a line based approximation of YAML. Flow collections and quoting
//! are not recognised; block scalars (`>` and `|`) continue for as long as
//! the following lines are indented deeper than the key which introduced
//! them.

use super::{Token, TokenKind, Tokenizer, scanner::Scanner};

/// The kind of a YAML token.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum YamlKind {
    /// A `#` comment, or the rest of a document separator line.
    Comment,
    /// `---`.
    DocumentSeparator,
    /// `-` before a sequence entry or `:` after a key.
    SpecialCharacter,
    /// A mapping key.
    Key,
    /// A single line value.
    Value,
    /// One line of a block scalar.
    MultilineText,
    /// Spaces and tabs.
    Whitespace,
    /// A line break.
    LineBreak,
}

impl TokenKind for YamlKind {
    const LANGUAGE: &'static str = "yaml";

    fn class(self) -> Option<&'static str> {
        Some(match self {
            Self::Comment => "comment",
            Self::DocumentSeparator => "document-separator",
            Self::SpecialCharacter => "special-character",
            Self::Key => "key",
            Self::Value => "value",
            Self::MultilineText => "multiline-text",
            Self::Whitespace | Self::LineBreak => return None,
        })
    }

    #[inline]
    fn is_line_break(self) -> bool {
        self == Self::LineBreak
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Expect {
    Key,
    Colon,
    Value,
    Comment,
    MultilineText,
}

/// A YAML highlighter.
#[derive(Debug)]
pub struct YamlTokenizer {
    scanner: Scanner,
    expect: Expect,
    /// The column of the most recent key, counted from 0.
    key_indent: usize,
}

impl YamlTokenizer {
    /// Creates a highlighter for the given text.
    pub fn new(text: &str) -> Self {
        Self {
            scanner: Scanner::new(text),
            expect: Expect::Key,
            key_indent: 0,
        }
    }

    /// Reads the rest of a block scalar line and decides whether the scalar
    /// continues on the next line.
    fn multiline_text(&mut self, first: char) -> Token<YamlKind> {
        let text = self.scanner.take_until(first, |c| c == '\n');
        self.expect = if self.block_continues() {
            Expect::MultilineText
        } else {
            Expect::Key
        };
        Token::new(YamlKind::MultilineText, text)
    }

    /// Returns true if the next non-blank line is indented deeper than the
    /// last key. Blank lines and the end of the input do not end a block.
    fn block_continues(&self) -> bool {
        let mut column = 0;
        for &c in self.scanner.rest().iter().skip(1) {
            match c {
                '\n' => column = 0,
                ' ' | '\t' => column += 1,
                _ => return column > self.key_indent,
            }
        }
        true
    }
}

impl Tokenizer for YamlTokenizer {
    type Kind = YamlKind;

    fn next_token(&mut self) -> Option<Token<YamlKind>> {
        let c = self.scanner.next_char()?;
        let token = match (self.expect, c) {
            (expect, '\n') => {
                if expect != Expect::MultilineText {
                    self.expect = Expect::Key;
                }
                Token::new(YamlKind::LineBreak, "\n")
            }
            (Expect::Key, '-') => {
                if self.scanner.eat("--") {
                    self.expect = Expect::Comment;
                    Token::new(YamlKind::DocumentSeparator, "---")
                } else {
                    Token::new(YamlKind::SpecialCharacter, c)
                }
            }
            (Expect::Key, '#') | (Expect::Comment, _) => {
                self.expect = Expect::Key;
                Token::new(YamlKind::Comment, self.scanner.take_until(c, |c| c == '\n'))
            }
            (Expect::MultilineText, c) => self.multiline_text(c),
            (_, ':') => {
                self.expect = Expect::Value;
                Token::new(YamlKind::SpecialCharacter, c)
            }
            (_, ' ' | '\t') => {
                let space = self.scanner.take_until(c, |c| !matches!(c, ' ' | '\t'));
                Token::new(YamlKind::Whitespace, space)
            }
            (Expect::Key, c) => {
                self.key_indent = self.scanner.column() - 1;
                self.expect = Expect::Colon;
                Token::new(YamlKind::Key, self.scanner.take_until(c, |c| matches!(c, ':' | '\n')))
            }
            (Expect::Value, '>' | '|') => self.multiline_text(c),
            (_, c) => {
                self.expect = Expect::Key;
                Token::new(YamlKind::Value, self.scanner.take_until(c, |c| c == '\n'))
            }
        };
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[track_caller]
    fn check(input: &str, expected: &str) {
        assert_eq!(YamlTokenizer::new(input).format(), expected);
    }

    #[test]
    fn comments() {
        check("# comment", r#"<span class="code-yaml-comment">#&nbsp;comment</span>"#);
        check(
            "# comment\n",
            "<span class=\"code-yaml-comment\">#&nbsp;comment</span><br>\n",
        );
    }

    #[test]
    fn document_separator() {
        check("---", r#"<span class="code-yaml-document-separator">---</span>"#);
        check(
            "--- # doc",
            r#"<span class="code-yaml-document-separator">---</span><span class="code-yaml-comment">&nbsp;#&nbsp;doc</span>"#,
        );
    }

    #[test]
    fn keys() {
        check("abc", r#"<span class="code-yaml-key">abc</span>"#);
        check(
            "- abc",
            r#"<span class="code-yaml-special-character">-</span>&nbsp;<span class="code-yaml-key">abc</span>"#,
        );
        check(
            "abc:",
            r#"<span class="code-yaml-key">abc</span><span class="code-yaml-special-character">:</span>"#,
        );
    }

    #[test]
    fn values() {
        check(
            "abc: value",
            r#"<span class="code-yaml-key">abc</span><span class="code-yaml-special-character">:</span>&nbsp;<span class="code-yaml-value">value</span>"#,
        );
        check(
            "key1: value1\nkey2: value2",
            concat!(
                r#"<span class="code-yaml-key">key1</span><span class="code-yaml-special-character">:</span>&nbsp;<span class="code-yaml-value">value1</span><br>"#,
                "\n",
                r#"<span class="code-yaml-key">key2</span><span class="code-yaml-special-character">:</span>&nbsp;<span class="code-yaml-value">value2</span>"#,
            ),
        );
    }

    #[test]
    fn multiline_text() {
        for marker in [">", "|"] {
            check(
                &format!("abc: {marker}\n  line 1\n  line 2"),
                &format!(
                    concat!(
                        r#"<span class="code-yaml-key">abc</span><span class="code-yaml-special-character">:</span>&nbsp;"#,
                        r#"<span class="code-yaml-multiline-text">{}</span><br>"#,
                        "\n",
                        r#"<span class="code-yaml-multiline-text">&nbsp;&nbsp;line&nbsp;1</span><br>"#,
                        "\n",
                        r#"<span class="code-yaml-multiline-text">&nbsp;&nbsp;line&nbsp;2</span>"#,
                    ),
                    if marker == ">" { "&gt;" } else { "|" }
                ),
            );
        }
    }

    #[test]
    fn multiline_text_until_key() {
        check(
            " key1: >\n   - a: b\n  --- line2\n key2",
            concat!(
                r#"&nbsp;<span class="code-yaml-key">key1</span><span class="code-yaml-special-character">:</span>&nbsp;"#,
                r#"<span class="code-yaml-multiline-text">&gt;</span><br>"#,
                "\n",
                r#"<span class="code-yaml-multiline-text">&nbsp;&nbsp;&nbsp;-&nbsp;a:&nbsp;b</span><br>"#,
                "\n",
                r#"<span class="code-yaml-multiline-text">&nbsp;&nbsp;---&nbsp;line2</span><br>"#,
                "\n",
                r#"&nbsp;<span class="code-yaml-key">key2</span>"#,
            ),
        );
    }

    #[test]
    fn blank_lines_inside_multiline_text() {
        let kinds = YamlTokenizer::new("a: |\n  x\n\n  y\nb")
            .tokens()
            .map(|token| token.kind)
            .collect::<Vec<_>>();
        assert_eq!(
            kinds,
            [
                YamlKind::Key,
                YamlKind::SpecialCharacter,
                YamlKind::Whitespace,
                YamlKind::MultilineText,
                YamlKind::LineBreak,
                YamlKind::MultilineText,
                YamlKind::LineBreak,
                YamlKind::LineBreak,
                YamlKind::MultilineText,
                YamlKind::LineBreak,
                YamlKind::Key,
            ]
        );
    }
}
