//! INI file highlighting.

use super::{Token, TokenKind, Tokenizer, scanner::Scanner};

/// The kind of an INI token.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IniKind {
    /// A line starting with `#` or `;`.
    Comment,
    /// `[` or `]` around a section name.
    SectionBracket,
    /// A section name.
    SectionName,
    /// The key of an entry.
    Key,
    /// `=` or `:` between key and value.
    Delimiter,
    /// The value of an entry.
    Value,
    /// Spaces and tabs.
    Whitespace,
    /// A line break.
    LineBreak,
}

impl TokenKind for IniKind {
    const LANGUAGE: &'static str = "ini";

    fn class(self) -> Option<&'static str> {
        Some(match self {
            Self::Comment => "comment",
            Self::SectionBracket => "section-bracket",
            Self::SectionName => "section-name",
            Self::Key => "key",
            Self::Delimiter => "delimiter",
            Self::Value => "value",
            Self::Whitespace | Self::LineBreak => return None,
        })
    }

    #[inline]
    fn is_line_break(self) -> bool {
        self == Self::LineBreak
    }
}

/// The part of a line which is expected next.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Expect {
    /// The start of a line.
    Key,
    /// The name after `[`.
    SectionName,
    /// The `]` after a section name.
    SectionEnd,
    /// The delimiter after a key.
    Delimiter,
    /// The value after a delimiter.
    Value,
}

/// An INI file highlighter.
#[derive(Debug)]
pub struct IniTokenizer {
    /// The input.
    scanner: Scanner,
    /// The expected part of the current line.
    expect: Expect,
}

impl IniTokenizer {
    /// Creates a highlighter for the given text.
    pub fn new(text: &str) -> Self {
        Self {
            scanner: Scanner::new(text),
            expect: Expect::Key,
        }
    }
}

impl Tokenizer for IniTokenizer {
    type Kind = IniKind;

    fn next_token(&mut self) -> Option<Token<IniKind>> {
        let c = self.scanner.next_char()?;
        let token = match (self.expect, c) {
            (_, '\n') => {
                self.expect = Expect::Key;
                Token::new(IniKind::LineBreak, "\n")
            }
            (Expect::Key, '[') => {
                self.expect = Expect::SectionName;
                Token::new(IniKind::SectionBracket, "[")
            }
            (Expect::SectionName, c) if c != ']' => {
                self.expect = Expect::SectionEnd;
                let name = self.scanner.take_until(c, |c| matches!(c, ']' | '\n'));
                Token::new(IniKind::SectionName, name)
            }
            (Expect::SectionName | Expect::SectionEnd, ']') => {
                self.expect = Expect::Key;
                Token::new(IniKind::SectionBracket, "]")
            }
            (Expect::Key, '#' | ';') => {
                Token::new(IniKind::Comment, self.scanner.take_until(c, |c| c == '\n'))
            }
            (_, ' ' | '\t') => {
                let space = self.scanner.take_until(c, |c| !matches!(c, ' ' | '\t'));
                Token::new(IniKind::Whitespace, space)
            }
            (Expect::Key, c) => {
                self.expect = Expect::Delimiter;
                let key = self.scanner.take_until(c, |c| matches!(c, ' ' | '=' | '\n'));
                Token::new(IniKind::Key, key)
            }
            (Expect::Delimiter, '=' | ':') => {
                self.expect = Expect::Value;
                Token::new(IniKind::Delimiter, c)
            }
            (_, c) => {
                self.expect = Expect::Key;
                Token::new(IniKind::Value, self.scanner.take_until(c, |c| c == '\n'))
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
        assert_eq!(IniTokenizer::new(input).format(), expected);
    }

    #[test]
    fn comments() {
        check("# comment", r#"<span class="code-ini-comment">#&nbsp;comment</span>"#);
        check(
            "# comment\n",
            "<span class=\"code-ini-comment\">#&nbsp;comment</span><br>\n",
        );
        check("; comment", r#"<span class="code-ini-comment">;&nbsp;comment</span>"#);
    }

    #[test]
    fn sections() {
        check(
            "[section]",
            r#"<span class="code-ini-section-bracket">[</span><span class="code-ini-section-name">section</span><span class="code-ini-section-bracket">]</span>"#,
        );
        check(
            "[section",
            r#"<span class="code-ini-section-bracket">[</span><span class="code-ini-section-name">section</span>"#,
        );
        check(
            "[]",
            r#"<span class="code-ini-section-bracket">[</span><span class="code-ini-section-bracket">]</span>"#,
        );
    }

    #[test]
    fn entries() {
        check("key", r#"<span class="code-ini-key">key</span>"#);
        check(
            "key=value",
            r#"<span class="code-ini-key">key</span><span class="code-ini-delimiter">=</span><span class="code-ini-value">value</span>"#,
        );
        check(
            "key  =  value",
            r#"<span class="code-ini-key">key</span>&nbsp;&nbsp;<span class="code-ini-delimiter">=</span>&nbsp;&nbsp;<span class="code-ini-value">value</span>"#,
        );
        check(
            "key1 = value1\nkey2 = value2",
            concat!(
                r#"<span class="code-ini-key">key1</span>&nbsp;<span class="code-ini-delimiter">=</span>&nbsp;<span class="code-ini-value">value1</span><br>"#,
                "\n",
                r#"<span class="code-ini-key">key2</span>&nbsp;<span class="code-ini-delimiter">=</span>&nbsp;<span class="code-ini-value">value2</span>"#,
            ),
        );
    }

    #[test]
    fn carriage_returns_are_dropped() {
        let tokens = IniTokenizer::new("a\r\n").tokens().collect::<Vec<_>>();
        assert_eq!(
            tokens,
            [
                Token::new(IniKind::Key, "a"),
                Token::new(IniKind::LineBreak, "\n"),
            ]
        );
    }
}
