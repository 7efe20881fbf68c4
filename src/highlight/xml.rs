//! XML and HTML highlighting.

use super::{Token, TokenKind, Tokenizer, scanner::Scanner};

/// The kind of an XML token.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum XmlKind {
    /// One line of a `<!-- -->` comment.
    Comment,
    /// Tag punctuation: `<`, `>`, `/`, `?`, `!`, and `=`.
    SpecialCharacter,
    /// A tag name, or a CDATA section delimiter.
    Tag,
    /// An attribute name.
    AttributeName,
    /// An attribute value, including its quotes.
    AttributeValue,
    /// A character reference like `&amp;`.
    EscapedCharacter,
    /// Character data and whitespace.
    Text,
    /// A line break.
    LineBreak,
}

impl TokenKind for XmlKind {
    const LANGUAGE: &'static str = "xml";

    fn class(self) -> Option<&'static str> {
        Some(match self {
            Self::Comment => "comment",
            Self::SpecialCharacter => "special-character",
            Self::Tag => "tag",
            Self::AttributeName => "attribute-name",
            Self::AttributeValue => "attribute-value",
            Self::EscapedCharacter => "escaped-character",
            Self::Text | Self::LineBreak => return None,
        })
    }

    #[inline]
    fn is_line_break(self) -> bool {
        self == Self::LineBreak
    }
}

/// The markup construct the highlighter is in.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Expect {
    /// Character data between tags.
    Text,
    /// A tag name after `<`.
    Tag,
    /// An attribute name inside a tag.
    AttributeName,
    /// An attribute value after `=`.
    AttributeValue,
    /// Inside `<!-- -->`.
    Comment,
    /// Inside `<![CDATA[ ]]>`.
    Cdata,
}

impl Expect {
    /// Returns true between `<` and `>`.
    fn in_tag(self) -> bool {
        matches!(self, Self::Tag | Self::AttributeName | Self::AttributeValue)
    }
}

/// An XML highlighter.
#[derive(Debug)]
pub struct XmlTokenizer {
    scanner: Scanner,
    expect: Expect,
}

impl XmlTokenizer {
    /// Creates a highlighter for the given text.
    pub fn new(text: &str) -> Self {
        Self {
            scanner: Scanner::new(text),
            expect: Expect::Text,
        }
    }

    /// Reads the rest of the current line of a comment.
    fn comment(&mut self, mut text: String) -> Token<XmlKind> {
        while let Some(c) = self.scanner.next_char() {
            if c == '\n' {
                self.scanner.unread();
                break;
            }
            text.push(c);
            if c == '-' && self.scanner.eat("-") {
                text.push('-');
                if self.scanner.eat(">") {
                    text.push('>');
                }
                self.expect = Expect::Text;
                break;
            }
        }
        Token::new(XmlKind::Comment, text)
    }

    /// Reads the rest of the current line of a CDATA section, or its end.
    fn cdata(&mut self) -> Token<XmlKind> {
        if self.scanner.eat("]]>") {
            self.expect = Expect::Text;
            return Token::new(XmlKind::Tag, "]]>");
        }

        let mut text = String::new();
        while let Some(c) = self.scanner.peek() {
            if c == '\n' || self.scanner.at("]]>") {
                break;
            }
            text.push(c);
            self.scanner.next_char();
        }
        Token::new(XmlKind::Text, text)
    }

    /// Reads an attribute value starting with `first`.
    fn attribute_value(&mut self, first: char) -> Token<XmlKind> {
        let value = if matches!(first, '"' | '\'') {
            let mut text = String::from(first);
            while let Some(c) = self.scanner.next_char() {
                if c == '\n' {
                    self.scanner.unread();
                    break;
                }
                text.push(c);
                if c == first {
                    break;
                }
            }
            text
        } else {
            self.scanner
                .take_until(first, |c| matches!(c, '/' | '?' | '>' | '\n') || c.is_whitespace())
        };
        Token::new(XmlKind::AttributeValue, value)
    }
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':')
}

impl Tokenizer for XmlTokenizer {
    type Kind = XmlKind;

    fn next_token(&mut self) -> Option<Token<XmlKind>> {
        let c = self.scanner.next_char()?;
        let expect = self.expect;
        let token = match c {
            '\n' => Token::new(XmlKind::LineBreak, "\n"),
            _ if expect == Expect::Comment => {
                self.scanner.unread();
                self.comment(String::new())
            }
            '<' if self.scanner.eat("!--") => {
                self.expect = Expect::Comment;
                self.comment("<!--".into())
            }
            _ if expect == Expect::Cdata => {
                self.scanner.unread();
                self.cdata()
            }
            '<' if self.scanner.eat("![CDATA[") => {
                self.expect = Expect::Cdata;
                Token::new(XmlKind::Tag, "<![CDATA[")
            }
            '<' => {
                self.expect = Expect::Tag;
                Token::new(XmlKind::SpecialCharacter, c)
            }
            '/' | '?' | '!' if expect != Expect::Text => {
                self.expect = Expect::Tag;
                Token::new(XmlKind::SpecialCharacter, c)
            }
            '>' => {
                self.expect = Expect::Text;
                Token::new(XmlKind::SpecialCharacter, c)
            }
            '&' => {
                self.expect = Expect::Text;
                let mut text = String::from(c);
                while let Some(c) = self.scanner.next_char() {
                    if c.is_whitespace() {
                        self.scanner.unread();
                        break;
                    }
                    text.push(c);
                    if c == ';' {
                        break;
                    }
                }
                Token::new(XmlKind::EscapedCharacter, text)
            }
            c if expect == Expect::Tag && is_name_start(c) => {
                self.expect = Expect::AttributeName;
                Token::new(XmlKind::Tag, self.scanner.take_until(c, |c| !is_name_char(c)))
            }
            c if expect == Expect::AttributeName && is_name_start(c) => {
                let name = self.scanner.take_until(c, |c| !is_name_char(c));
                Token::new(XmlKind::AttributeName, name)
            }
            '=' if expect == Expect::AttributeName => {
                self.expect = Expect::AttributeValue;
                Token::new(XmlKind::SpecialCharacter, c)
            }
            c if matches!(expect, Expect::AttributeName | Expect::AttributeValue)
                && c != '='
                && !c.is_whitespace() =>
            {
                self.expect = Expect::AttributeName;
                self.attribute_value(c)
            }
            c => {
                let in_tag = expect.in_tag();
                let text = self.scanner.take_until(c, |c| {
                    matches!(c, '<' | '&' | '\n') || (in_tag && !c.is_whitespace())
                });
                Token::new(XmlKind::Text, text)
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
        assert_eq!(XmlTokenizer::new(input).format(), expected);
    }

    #[test]
    fn text() {
        check("any text", "any&nbsp;text");
        check("line\nbreak", "line<br>\nbreak");
        check("a/b? c!", "a/b?&nbsp;c!");
    }

    #[test]
    fn comments() {
        check(
            "<!-- single line comment -->",
            r#"<span class="code-xml-comment">&lt;!--&nbsp;single&nbsp;line&nbsp;comment&nbsp;--&gt;</span>"#,
        );
        check(
            "<!-- multi line\n comment -->",
            concat!(
                r#"<span class="code-xml-comment">&lt;!--&nbsp;multi&nbsp;line</span><br>"#,
                "\n",
                r#"<span class="code-xml-comment">&nbsp;comment&nbsp;--&gt;</span>"#,
            ),
        );
    }

    #[test]
    fn tags() {
        check(
            "<tag>",
            r#"<span class="code-xml-special-character">&lt;</span><span class="code-xml-tag">tag</span><span class="code-xml-special-character">&gt;</span>"#,
        );
        check(
            "</tag>",
            r#"<span class="code-xml-special-character">&lt;</span><span class="code-xml-special-character">/</span><span class="code-xml-tag">tag</span><span class="code-xml-special-character">&gt;</span>"#,
        );
        check(
            "<ns:my-tag.x/>",
            r#"<span class="code-xml-special-character">&lt;</span><span class="code-xml-tag">ns:my-tag.x</span><span class="code-xml-special-character">/</span><span class="code-xml-special-character">&gt;</span>"#,
        );
    }

    #[test]
    fn attributes() {
        check(
            "<tag attr=value>",
            r#"<span class="code-xml-special-character">&lt;</span><span class="code-xml-tag">tag</span>&nbsp;<span class="code-xml-attribute-name">attr</span><span class="code-xml-special-character">=</span><span class="code-xml-attribute-value">value</span><span class="code-xml-special-character">&gt;</span>"#,
        );
        check(
            "<tag attr>",
            r#"<span class="code-xml-special-character">&lt;</span><span class="code-xml-tag">tag</span>&nbsp;<span class="code-xml-attribute-name">attr</span><span class="code-xml-special-character">&gt;</span>"#,
        );
        check(
            r#"<tag attr1="value1" attr2='value2'>"#,
            r#"<span class="code-xml-special-character">&lt;</span><span class="code-xml-tag">tag</span>&nbsp;<span class="code-xml-attribute-name">attr1</span><span class="code-xml-special-character">=</span><span class="code-xml-attribute-value">&quot;value1&quot;</span>&nbsp;<span class="code-xml-attribute-name">attr2</span><span class="code-xml-special-character">=</span><span class="code-xml-attribute-value">&apos;value2&apos;</span><span class="code-xml-special-character">&gt;</span>"#,
        );
    }

    #[test]
    fn escaped_characters() {
        check(
            "any&nbsp;text",
            r#"any<span class="code-xml-escaped-character">&amp;nbsp;</span>text"#,
        );
        check(
            "incomplete& char",
            r#"incomplete<span class="code-xml-escaped-character">&amp;</span>&nbsp;char"#,
        );
    }

    #[test]
    fn declarations() {
        check(
            "<!DOCTYPE xml>",
            r#"<span class="code-xml-special-character">&lt;</span><span class="code-xml-special-character">!</span><span class="code-xml-tag">DOCTYPE</span>&nbsp;<span class="code-xml-attribute-name">xml</span><span class="code-xml-special-character">&gt;</span>"#,
        );
        check(
            r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01 Transitional//EN">"#,
            r#"<span class="code-xml-special-character">&lt;</span><span class="code-xml-special-character">!</span><span class="code-xml-tag">DOCTYPE</span>&nbsp;<span class="code-xml-attribute-name">HTML</span>&nbsp;<span class="code-xml-attribute-name">PUBLIC</span>&nbsp;<span class="code-xml-attribute-value">&quot;-//W3C//DTD&nbsp;HTML&nbsp;4.01&nbsp;Transitional//EN&quot;</span><span class="code-xml-special-character">&gt;</span>"#,
        );
        check(
            r#"<?xml version="1.0" encoding="UTF-8"?>"#,
            r#"<span class="code-xml-special-character">&lt;</span><span class="code-xml-special-character">?</span><span class="code-xml-tag">xml</span>&nbsp;<span class="code-xml-attribute-name">version</span><span class="code-xml-special-character">=</span><span class="code-xml-attribute-value">&quot;1.0&quot;</span>&nbsp;<span class="code-xml-attribute-name">encoding</span><span class="code-xml-special-character">=</span><span class="code-xml-attribute-value">&quot;UTF-8&quot;</span><span class="code-xml-special-character">?</span><span class="code-xml-special-character">&gt;</span>"#,
        );
    }

    #[test]
    fn cdata() {
        check(
            "<![CDATA[any &nbsp; text]]>",
            r#"<span class="code-xml-tag">&lt;![CDATA[</span>any&nbsp;&amp;nbsp;&nbsp;text<span class="code-xml-tag">]]&gt;</span>"#,
        );
        check(
            "<![CDATA[any\ntext]]>",
            concat!(
                r#"<span class="code-xml-tag">&lt;![CDATA[</span>any<br>"#,
                "\n",
                r#"text<span class="code-xml-tag">]]&gt;</span>"#,
            ),
        );
    }
}
