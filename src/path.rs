//! Wiki page path functions.
//!
//! Page paths are web-style paths separated by `/`. An absolute path starts
//! with `/`; a path ending with `/` denotes a folder.

use std::borrow::Cow;

/// Concatenates two paths with exactly one `/` between them.
pub fn concat(first: &str, second: &str) -> String {
    let mut out = String::with_capacity(first.len() + second.len() + 1);
    out += first;
    if !out.is_empty() && !out.ends_with('/') {
        out.push('/');
    }
    out += second.strip_prefix('/').unwrap_or(second);
    out
}

/// Makes a relative path absolute by prefixing `base`. An already absolute
/// path is returned unchanged. The result always starts with `/`, and any
/// `..` segments of a relative path are resolved.
pub fn make_absolute(path: Option<&str>, base: Option<&str>) -> String {
    if let Some(path) = path
        && path.starts_with('/')
    {
        return path.to_string();
    }

    let mut out = concat(base.unwrap_or_default(), path.unwrap_or_default());
    if !out.starts_with('/') {
        out.insert(0, '/');
    }

    match resolve_dots(&out) {
        Cow::Borrowed(_) => out,
        Cow::Owned(resolved) => resolved,
    }
}

/// Removes `..` segments together with the segment before them. The leading
/// `/` is never removed.
fn resolve_dots(path: &str) -> Cow<'_, str> {
    if !path.contains("..") {
        return Cow::Borrowed(path);
    }

    let mut out = path.to_string();
    let mut from = 0;
    while let Some(found) = out[from..].find("..") {
        let pos = from + found;
        let bytes = out.as_bytes();
        let is_segment = (pos == 0 || bytes[pos - 1] == b'/')
            && (pos + 2 >= bytes.len() || bytes[pos + 2] == b'/');

        if is_segment {
            let start = match pos {
                0 => 0,
                1 => 1,
                _ => out[..pos - 1].rfind('/').map_or(0, |slash| slash + 1),
            };
            let end = (pos + 3).min(out.len());
            out.replace_range(start..end, "");
            from = 0;
        } else {
            from = pos + 2;
        }
    }

    Cow::Owned(out)
}

/// Returns the folder part of a path, including the trailing `/`. A path
/// without any `/` is in the root folder.
pub fn folder(path: &str) -> &str {
    path.rfind('/').map_or("/", |index| &path[..=index])
}

/// Returns the name part of a path, after the last `/`.
pub fn name(path: &str) -> &str {
    path.rfind('/').map_or(path, |index| &path[index + 1..])
}
