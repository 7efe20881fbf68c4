//! Character cursor shared by the highlighters.

/// A cursor over the characters of a code block.
///
/// Carriage returns are dropped up front, so every line break is a single
/// `\n`.
#[derive(Debug)]
pub(super) struct Scanner {
    /// The characters of the code block.
    chars: Vec<char>,
    /// The index of the next character to read.
    pos: usize,
}

impl Scanner {
    /// Creates a new cursor at the start of `text`.
    pub(super) fn new(text: &str) -> Self {
        Self {
            chars: text.chars().filter(|&c| c != '\r').collect(),
            pos: 0,
        }
    }

    /// Consumes the next character.
    #[inline]
    pub(super) fn next_char(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        Some(c)
    }

    /// Puts back the most recently consumed character.
    #[inline]
    pub(super) fn unread(&mut self) {
        self.pos = self.pos.saturating_sub(1);
    }

    /// Returns the next character without consuming it.
    #[inline]
    pub(super) fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    /// Returns true if the upcoming characters are `s`.
    pub(super) fn at(&self, s: &str) -> bool {
        let mut upcoming = self.chars[self.pos..].iter().copied();
        s.chars().all(|c| upcoming.next() == Some(c))
    }

    /// Consumes `s` if the upcoming characters are `s`.
    pub(super) fn eat(&mut self, s: &str) -> bool {
        let found = self.at(s);
        if found {
            self.pos += s.chars().count();
        }
        found
    }

    /// Consumes characters until `stop` returns true or the input ends and
    /// returns them prefixed by `first`. The stop character is put back.
    pub(super) fn take_until<F>(&mut self, first: char, stop: F) -> String
    where
        F: Fn(char) -> bool,
    {
        let mut text = String::from(first);
        while let Some(c) = self.next_char() {
            if stop(c) {
                self.unread();
                break;
            }
            text.push(c);
        }
        text
    }

    /// The column of the next character, counted from 0.
    pub(super) fn column(&self) -> usize {
        let line_start = self.chars[..self.pos]
            .iter()
            .rposition(|&c| c == '\n')
            .map_or(0, |index| index + 1);
        self.pos - line_start
    }

    /// The characters which have not been consumed yet.
    #[inline]
    pub(super) fn rest(&self) -> &[char] {
        &self.chars[self.pos..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unread_and_lookahead() {
        let mut scanner = Scanner::new("ab\r\ncd");
        assert_eq!(scanner.next_char(), Some('a'));
        scanner.unread();
        assert_eq!(scanner.peek(), Some('a'));
        assert!(scanner.at("ab\nc"));
        assert!(!scanner.at("ab\nx"));
        assert!(scanner.eat("ab"));
        assert_eq!(scanner.rest(), ['\n', 'c', 'd']);
        assert!(!scanner.eat("cd"));
        assert!(!scanner.at("\ncde"));
    }

    #[test]
    fn take_until_puts_back_stop() {
        let mut scanner = Scanner::new("key=value");
        let first = scanner.next_char().unwrap();
        assert_eq!(scanner.take_until(first, |c| c == '='), "key");
        assert_eq!(scanner.next_char(), Some('='));
        let first = scanner.next_char().unwrap();
        assert_eq!(scanner.take_until(first, |c| c == '\n'), "value");
        assert_eq!(scanner.next_char(), None);
    }

    #[test]
    fn columns() {
        let mut scanner = Scanner::new("ab\n  c");
        assert_eq!(scanner.column(), 0);
        scanner.eat("ab");
        assert_eq!(scanner.column(), 2);
        scanner.eat("\n  ");
        assert_eq!(scanner.column(), 2);
    }
}
