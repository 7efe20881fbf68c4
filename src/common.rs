//! Escaping and URL encoding functions shared by the renderer, the page shell,
//! and the syntax highlighters.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::borrow::Cow;

/// Escapes all characters that would be interpreted in HTML text and in
/// quoted tag attributes: `&`, `"`, `'`, `<`, and `>`.
///
/// `'` is written as `&apos;`, which `html_escape` never produces, so it is
/// replaced after the other characters were encoded.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    let escaped = html_escape::encode_double_quoted_attribute(text);
    if escaped.contains('\'') {
        Cow::Owned(escaped.replace('\'', "&apos;"))
    } else {
        escaped
    }
}

/// Escapes text for use inside a highlighted code block, where every
/// whitespace character must survive as a non-breaking space.
pub fn escape_code(text: &str) -> String {
    let escaped = escape_html(text);
    let mut out = String::with_capacity(escaped.len());
    for c in escaped.chars() {
        if is_code_whitespace(c) {
            out += "&nbsp;";
        } else {
            out.push(c);
        }
    }
    out
}

/// Returns true if the given character is treated as whitespace by the code
/// formatters.
#[inline]
pub(crate) fn is_code_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0b' | '\x0c' | '\r')
}

/// Converts a heading text into a string that is safe to use as an HTML
/// `id` and URL fragment.
///
/// Letters and `_` are always kept. Digits, `-`, `.`, and `:` are kept only
/// after the first letter, since an ID must not start with them. Everything
/// else is dropped.
pub fn id_string(text: &str) -> String {
    let mut letter_prefix = false;
    text.chars()
        .filter(|&c| {
            let letter = c.is_ascii_alphabetic() || c == '_';
            letter_prefix |= letter;
            letter || (letter_prefix && (c.is_ascii_digit() || matches!(c, '-' | '.' | ':')))
        })
        .collect()
}

/// Encodes all characters which are not allowed in a URL. Characters which
/// already have URL meaning (`/`, `?`, `&`, `=`, `#`) and existing escapes
/// (`%`) are kept as-is. Spaces become `+`.
pub fn encode_url(url: &str) -> String {
    join_spaces(url, |part| utf8_percent_encode(part, &URL_SET).to_string())
}

/// Encodes a single URL query parameter name or value in
/// `application/x-www-form-urlencoded` style.
pub fn encode_url_parameter(value: &str) -> String {
    join_spaces(value, |part| utf8_percent_encode(part, &PARAMETER_SET).to_string())
}

/// Encodes each space-separated part of `text` with `encode` and joins the
/// parts with `+`.
fn join_spaces<F>(text: &str, encode: F) -> String
where
    F: Fn(&str) -> String,
{
    text.split(' ').map(encode).collect::<Vec<_>>().join("+")
}

/// Converts a wiki page path into its URL path representation. The
/// characters `!`, `%`, `?`, and `#` have a special meaning in URLs and are
/// replaced by `!` followed by their two-digit hex code.
///
/// The result should still be passed through [`encode_url`] to get a valid
/// URL.
pub fn page_path_to_url(path: &str) -> Cow<'_, str> {
    if !path.contains(['!', '%', '?', '#']) {
        return Cow::Borrowed(path);
    }

    let mut out = String::with_capacity(path.len() + 8);
    for c in path.chars() {
        if matches!(c, '!' | '%' | '?' | '#') {
            out.push('!');
            out += &format!("{:02x}", u32::from(c));
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

/// The characters to percent-encode when encoding a whole URL.
const URL_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'/')
    .remove(b'?')
    .remove(b'&')
    .remove(b'=')
    .remove(b'#')
    .remove(b'%');

/// The characters to percent-encode when encoding a URL parameter.
const PARAMETER_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'*');

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape() {
        assert_eq!(escape_html("plain"), Cow::Borrowed("plain"));
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&apos;&amp;&apos;&lt;/a&gt;"
        );
        assert_eq!(escape_code("a <b>\tc"), "a&nbsp;&lt;b&gt;&nbsp;c");
    }

    #[test]
    fn ids() {
        assert_eq!(id_string("Heading"), "Heading");
        assert_eq!(id_string("1. Intro to Rust"), "IntrotoRust");
        assert_eq!(id_string("v1.2-beta: notes"), "v1.2-beta:notes");
        assert_eq!(id_string("_9"), "_9");
        assert_eq!(id_string("123"), "");
        assert_eq!(id_string("Über"), "ber");
    }

    #[test]
    fn urls() {
        assert_eq!(encode_url("/view/a page?x=1&y=2#top"), "/view/a+page?x=1&y=2#top");
        assert_eq!(encode_url("/view/ä"), "/view/%C3%A4");
        assert_eq!(encode_url("/view/<script>"), "/view/%3Cscript%3E");
        assert_eq!(encode_url_parameter("a b&c/d"), "a+b%26c%2Fd");
        assert_eq!(page_path_to_url("/a/b"), Cow::Borrowed("/a/b"));
        assert_eq!(page_path_to_url("/what?#100%!"), "/what!3f!23100!25!21");
    }
}
