//! Java source code highlighting.

use super::{Token, TokenKind, Tokenizer, scanner::Scanner};

/// The kind of a Java token.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum JavaKind {
    /// A line comment, or one line of a block comment.
    Comment,
    /// A reserved word.
    Keyword,
    /// Any other word.
    Identifier,
    /// A string or character literal.
    String,
    /// A line break.
    LineBreak,
    /// Anything else.
    Any,
}

impl TokenKind for JavaKind {
    const LANGUAGE: &'static str = "java";

    fn class(self) -> Option<&'static str> {
        match self {
            Self::Comment => Some("comment"),
            Self::Keyword => Some("keyword"),
            Self::String => Some("string"),
            Self::Identifier | Self::LineBreak | Self::Any => None,
        }
    }

    #[inline]
    fn is_line_break(self) -> bool {
        self == Self::LineBreak
    }
}

/// Words which are highlighted as keywords.
static KEYWORDS: phf::Set<&'static str> = phf::phf_set! {
    "return", "if", "else", "switch", "case", "default", "for", "while", "do",
    "break", "continue", "try", "catch", "finally", "throw", "new",
    "instanceof", "void", "public", "protected", "private", "static", "final",
    "class", "interface",
};

/// A Java source highlighter.
#[derive(Debug)]
pub struct JavaTokenizer {
    scanner: Scanner,
    /// True after `/*` until the matching `*/`.
    in_block_comment: bool,
}

impl JavaTokenizer {
    /// Creates a highlighter for the given text.
    pub fn new(text: &str) -> Self {
        Self {
            scanner: Scanner::new(text),
            in_block_comment: false,
        }
    }

    /// Reads the rest of the current line of a block comment.
    fn block_comment(&mut self, mut text: String) -> Token<JavaKind> {
        while let Some(c) = self.scanner.next_char() {
            if c == '\n' {
                self.scanner.unread();
                break;
            }
            text.push(c);
            if c == '*' && self.scanner.eat("/") {
                text.push('/');
                self.in_block_comment = false;
                break;
            }
        }
        Token::new(JavaKind::Comment, text)
    }

    /// Reads a literal up to and including the closing `quote`. Unterminated
    /// literals end at the line break.
    fn string(&mut self, quote: char) -> Token<JavaKind> {
        let mut text = String::from(quote);
        while let Some(c) = self.scanner.next_char() {
            match c {
                '\n' => {
                    self.scanner.unread();
                    break;
                }
                '\\' => {
                    text.push(c);
                    if self.scanner.peek() != Some('\n') {
                        text.extend(self.scanner.next_char());
                    }
                }
                c => {
                    text.push(c);
                    if c == quote {
                        break;
                    }
                }
            }
        }
        Token::new(JavaKind::String, text)
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '$')
}

impl Tokenizer for JavaTokenizer {
    type Kind = JavaKind;

    fn next_token(&mut self) -> Option<Token<JavaKind>> {
        let c = self.scanner.next_char()?;
        let token = match c {
            '\n' => Token::new(JavaKind::LineBreak, "\n"),
            _ if self.in_block_comment => {
                self.scanner.unread();
                self.block_comment(String::new())
            }
            '/' if self.scanner.eat("*") => {
                self.in_block_comment = true;
                self.block_comment("/*".into())
            }
            '/' if self.scanner.peek() == Some('/') => {
                Token::new(JavaKind::Comment, self.scanner.take_until(c, |c| c == '\n'))
            }
            '"' | '\'' => self.string(c),
            c if is_identifier_char(c) => {
                let word = self.scanner.take_until(c, |c| !is_identifier_char(c));
                let kind = if KEYWORDS.contains(word.as_str()) {
                    JavaKind::Keyword
                } else {
                    JavaKind::Identifier
                };
                Token::new(kind, word)
            }
            c => Token::new(JavaKind::Any, c),
        };
        Some(token)
    }
}
