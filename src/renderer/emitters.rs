//! HTML emitters for page elements that require state management.

use super::writer::HtmlWriter;

/// List container emitter.
///
/// List items only carry their nesting level and kind. The `<ul>` and `<ol>`
/// containers they need are derived from the open tags of the writer, so any
/// other open tag (like the `<li>` of an enclosing item) hides the lists
/// below it.
pub(super) struct ListEmitter;

impl ListEmitter {
    /// Opens and closes list containers until exactly `level` containers are
    /// open and the innermost one has the given kind. A level of zero closes
    /// all open containers.
    pub(super) fn emit(out: &mut HtmlWriter, level: usize, kind: ListKind) {
        let mut current = Self::open_levels(out);

        while current > level {
            out.close_tag();
            out.set_continue_in_new_line();
            current -= 1;
        }

        // Same level, different kind: the container is closed and reopened
        // below.
        if current > 0
            && current == level
            && out.current_tag(0).and_then(ListKind::from_tag) != Some(kind)
        {
            out.close_tag();
            out.set_continue_in_new_line();
            current -= 1;
        }

        while current < level {
            out.open_tag(kind.tag(), "");
            out.set_continue_in_new_line();
            current += 1;
        }
    }

    /// Closes all list containers which are open at the top of the tag stack.
    #[inline]
    pub(super) fn finish(out: &mut HtmlWriter) {
        Self::emit(out, 0, ListKind::Unordered);
    }

    /// The number of consecutive list containers at the top of the tag stack.
    fn open_levels(out: &HtmlWriter) -> usize {
        (0..)
            .take_while(|&down| out.current_tag(down).and_then(ListKind::from_tag).is_some())
            .count()
    }
}

/// A list kind.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum ListKind {
    /// Ordered list.
    Ordered,
    /// Unordered list.
    Unordered,
}

impl ListKind {
    /// The container tag name.
    fn tag(self) -> &'static str {
        match self {
            ListKind::Ordered => "ol",
            ListKind::Unordered => "ul",
        }
    }

    /// The list kind of a container tag name.
    fn from_tag(name: &str) -> Option<Self> {
        match name {
            "ol" => Some(ListKind::Ordered),
            "ul" => Some(ListKind::Unordered),
            _ => None,
        }
    }
}

impl From<bool> for ListKind {
    fn from(ordered: bool) -> Self {
        if ordered {
            ListKind::Ordered
        } else {
            ListKind::Unordered
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_jumps() {
        let mut out = HtmlWriter::new();
        ListEmitter::emit(&mut out, 3, ListKind::Unordered);
        assert_eq!(out.depth(), 3);
        ListEmitter::emit(&mut out, 1, ListKind::Unordered);
        assert_eq!(out.depth(), 1);
        ListEmitter::finish(&mut out);
        assert_eq!(
            out.body_lines(),
            ["<ul>", "  <ul>", "    <ul>", "    </ul>", "  </ul>", "</ul>"]
        );
    }

    #[test]
    fn kind_switch() {
        let mut out = HtmlWriter::new();
        ListEmitter::emit(&mut out, 2, ListKind::Unordered);
        ListEmitter::emit(&mut out, 2, ListKind::Ordered);
        assert_eq!(out.current_tag(0), Some("ol"));
        assert_eq!(out.current_tag(1), Some("ul"));
        ListEmitter::emit(&mut out, 2, ListKind::Ordered);
        assert_eq!(out.depth(), 2);
    }

    #[test]
    fn other_tags_hide_lists() {
        let mut out = HtmlWriter::new();
        ListEmitter::emit(&mut out, 1, ListKind::Ordered);
        out.open_tag("li", "");
        ListEmitter::finish(&mut out);
        assert_eq!(out.depth(), 2);
        ListEmitter::emit(&mut out, 1, ListKind::Unordered);
        assert_eq!(out.current_tag(0), Some("ul"));
        assert_eq!(out.current_tag(1), Some("li"));
    }
}
