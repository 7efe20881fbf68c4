//! Java properties file highlighting.

use super::{Token, TokenKind, Tokenizer, scanner::Scanner};

/// The kind of a properties token.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PropertiesKind {
    /// A line starting with `#`, `;`, or `//`.
    Comment,
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

impl TokenKind for PropertiesKind {
    const LANGUAGE: &'static str = "properties";

    fn class(self) -> Option<&'static str> {
        Some(match self {
            Self::Comment => "comment",
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

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Expect {
    Key,
    Delimiter,
    Value,
}

/// A properties file highlighter.
#[derive(Debug)]
pub struct PropertiesTokenizer {
    scanner: Scanner,
    expect: Expect,
}

impl PropertiesTokenizer {
    /// Creates a highlighter for the given text.
    pub fn new(text: &str) -> Self {
        Self {
            scanner: Scanner::new(text),
            expect: Expect::Key,
        }
    }

    fn is_comment_start(&self, c: char) -> bool {
        matches!(c, '#' | ';') || (c == '/' && self.scanner.peek() == Some('/'))
    }
}

impl Tokenizer for PropertiesTokenizer {
    type Kind = PropertiesKind;

    fn next_token(&mut self) -> Option<Token<PropertiesKind>> {
        let c = self.scanner.next_char()?;
        let token = match (self.expect, c) {
            (_, '\n') => {
                self.expect = Expect::Key;
                Token::new(PropertiesKind::LineBreak, "\n")
            }
            (Expect::Key, c) if self.is_comment_start(c) => {
                let comment = self.scanner.take_until(c, |c| c == '\n');
                Token::new(PropertiesKind::Comment, comment)
            }
            (_, ' ' | '\t') => {
                let space = self.scanner.take_until(c, |c| !matches!(c, ' ' | '\t'));
                Token::new(PropertiesKind::Whitespace, space)
            }
            (Expect::Key, c) => {
                self.expect = Expect::Delimiter;
                let key = self
                    .scanner
                    .take_until(c, |c| matches!(c, ' ' | '\t' | '=' | ':' | '\n'));
                Token::new(PropertiesKind::Key, key)
            }
            (Expect::Delimiter, '=' | ':') => {
                self.expect = Expect::Value;
                Token::new(PropertiesKind::Delimiter, c)
            }
            (_, c) => {
                self.expect = Expect::Key;
                let value = self.scanner.take_until(c, |c| c == '\n');
                Token::new(PropertiesKind::Value, value)
            }
        };
        Some(token)
    }
}
