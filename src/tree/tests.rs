use super::*;

fn page(tree: &mut Tree, path: &str, child: Option<NodeId>) -> NodeId {
    tree.add(
        Element::Page {
            path: Some(path.to_string()),
            child,
        },
        None,
    )
}

#[test]
fn parent_links() {
    let mut tree = Tree::new();
    let a = tree.add_text("a");
    let b = tree.add_text("b");
    let list = tree.add(Element::List(vec![a, b]), None);
    let bold = tree.add(Element::Bold { child: Some(list) }, None);
    assert_eq!(tree.parent(a), Some(list));
    assert_eq!(tree.parent(b), Some(list));
    assert_eq!(tree.parent(list), Some(bold));
    assert_eq!(tree.parent(bold), None);

    let c = tree.add_text("c");
    tree.list_set(list, 1, c);
    assert_eq!(tree.members(list), &[a, c]);
    assert_eq!(tree.parent(c), Some(list));
    assert_eq!(tree.parent(b), None);

    assert_eq!(tree.list_remove(list, 0), Some(a));
    assert_eq!(tree.parent(a), None);
    assert_eq!(tree.members(list), &[c]);

    tree.list_push(list, a);
    assert_eq!(tree.members(list), &[c, a]);
    assert_eq!(tree.parent(a), Some(list));

    assert!(tree.set_child(bold, Some(b)));
    assert_eq!(tree.parent(b), Some(bold));
    assert_eq!(tree.parent(list), None);
    assert!(!tree.set_child(a, Some(list)));
}

#[test]
fn list_append_moves_members() {
    let mut tree = Tree::new();
    let a = tree.add_text("a");
    let b = tree.add_text("b");
    let first = tree.add(Element::List(vec![a]), None);
    let second = tree.add(Element::List(vec![b]), None);
    tree.list_append(first, second);
    assert_eq!(tree.members(first), &[a, b]);
    assert!(tree.members(second).is_empty());
    assert_eq!(tree.parent(b), Some(first));
}

#[test]
fn table_cells_belong_to_table() {
    let mut tree = Tree::new();
    let content = tree.add_text("cell");
    let table = tree.add(
        Element::Table(Table {
            params: None,
            rows: vec![TableRow {
                params: None,
                cells: vec![TableCell {
                    header: false,
                    params: None,
                    content: Some(content),
                }],
            }],
        }),
        None,
    );
    assert_eq!(tree.parent(content), Some(table));

    let other = tree.add_text("other");
    tree.set_cell_content(table, 0, 0, Some(other));
    assert_eq!(tree.parent(other), Some(table));
    assert_eq!(tree.parent(content), None);
    assert_eq!(tree.element(table).children(), vec![other]);
}

#[test]
fn clone_and_import() {
    let mut tree = Tree::new();
    let text = tree.add_text("x");
    let italic = tree.add(Element::Italic { child: Some(text) }, Some(Span::new(1, 4)));
    let root = page(&mut tree, "/p", Some(italic));
    tree.set_root(root);

    let copy = tree.deep_clone(italic);
    assert_ne!(copy, italic);
    assert_eq!(tree.parent(copy), None);
    assert_eq!(tree.span(copy), Some(Span::new(1, 4)));
    let copied_text = tree.child(copy).unwrap();
    assert_ne!(copied_text, text);
    assert_eq!(tree.parent(copied_text), Some(copy));
    assert_eq!(tree.element(copied_text), &Element::Text("x".into()));

    let mut other = Tree::new();
    let imported = other.import(&tree, root);
    assert_eq!(other.parent(imported), None);
    assert_eq!(other.page_path(imported), Some("/p"));
    assert_eq!(other.string_content(imported), "x");
    assert_eq!(other.len(), 3);
}

#[test]
fn context_pages() {
    let mut tree = Tree::new();
    let text = tree.add_text("t");
    let inner = page(&mut tree, "/a/inner", Some(text));
    let list = tree.add(Element::List(vec![inner]), None);
    let outer = page(&mut tree, "/b/outer", Some(list));
    tree.set_root(outer);

    assert_eq!(tree.context_page(text, false), Some(inner));
    assert_eq!(tree.context_page(text, true), Some(outer));
    assert_eq!(tree.context_page(list, false), Some(outer));

    let loose = tree.add_text("loose");
    assert_eq!(tree.context_page(loose, false), None);
    assert_eq!(tree.context_page(loose, true), None);
}

#[test]
fn absolute_paths() {
    let mut tree = Tree::new();
    let ctx = page(&mut tree, "/wiki/folder/page", None);
    assert_eq!(tree.absolute_page_path(Some("other"), None), None);
    assert_eq!(
        tree.absolute_page_path(Some("other"), Some(ctx)).as_deref(),
        Some("/wiki/folder/other")
    );
    assert_eq!(
        tree.absolute_page_path(Some("../up"), Some(ctx)).as_deref(),
        Some("/wiki/up")
    );
    assert_eq!(
        tree.absolute_page_path(Some("/abs"), Some(ctx)).as_deref(),
        Some("/abs")
    );
    assert_eq!(
        tree.absolute_page_path(None, Some(ctx)).as_deref(),
        Some("/wiki/folder/page")
    );

    let pathless = tree.add(Element::Page { path: None, child: None }, None);
    assert_eq!(tree.absolute_page_path(None, Some(pathless)), None);
    assert_eq!(
        tree.absolute_page_path(Some("rel"), Some(pathless)).as_deref(),
        Some("/rel")
    );
}

#[test]
fn traversal() {
    let tree: Tree = r#"{ "type": "list", "items": [
        { "type": "text", "text": "a" },
        { "type": "bold", "child": { "type": "list", "items": [
            { "type": "text", "text": "b" },
            { "type": "nowiki", "text": "skipped" },
            { "type": "text", "text": "c" }
        ] } },
        { "type": "heading", "level": 2, "child": { "type": "text", "text": "d" } }
    ] }"#
        .parse()
        .unwrap();
    let root = tree.root().unwrap();
    assert_eq!(tree.string_content(root), "abcd");

    let lists = tree.traverse(root, |e| matches!(e, Element::List(_)), false);
    assert_eq!(lists, vec![root]);
    let lists = tree.traverse(root, |e| matches!(e, Element::List(_)), true);
    assert_eq!(lists.len(), 2);
}

#[test]
fn json_input() {
    let tree = json::from_str(
        r#"{ "type": "page", "path": "/Start", "span": [0, 20], "child": {
            "type": "list", "items": [
                { "type": "heading", "level": 0, "span": [0, 8],
                  "child": { "type": "text", "text": "Hi" } },
                { "type": "list-item", "ordered": true },
                { "type": "image", "url": "x.png",
                  "options": { "width": "10", "height": "20" } },
                { "type": "task", "state": "important", "description": "do" },
                { "type": "list-pages", "listing": { "inline": true, "separator": ", " } },
                { "type": "table", "rows": [
                    { "cells": [ { "header": true, "content": { "type": "text", "text": "h" } } ] }
                ] }
            ]
        } }"#,
    )
    .unwrap();

    let root = tree.root().unwrap();
    assert_eq!(tree.span(root), Some(Span::new(0, 20)));
    let list = tree.child(root).unwrap();
    let members = tree.members(list);
    assert_eq!(members.len(), 6);
    assert!(matches!(tree.element(members[0]), Element::Heading { level: 1, .. }));
    assert!(matches!(
        tree.element(members[1]),
        Element::ListItem {
            level: 1,
            ordered: true,
            child: None
        }
    ));
    let Element::Image { options, .. } = tree.element(members[2]) else {
        panic!("not an image");
    };
    assert_eq!(options.keys().collect::<Vec<_>>(), ["width", "height"]);
    assert!(matches!(
        tree.element(members[3]),
        Element::Task(Task {
            state: TaskState::Important,
            ..
        })
    ));
    assert!(tree.is_inline(members[4]));
    let cell = tree.element(members[5]).children()[0];
    assert_eq!(tree.parent(cell), Some(members[5]));
}

#[test]
fn json_errors() {
    assert!(matches!(
        json::from_str(r#"{ "type": "text", "text": "x", "span": [5, 2] }"#),
        Err(Error::Span { from: 5, to: 2 })
    ));
    assert!(matches!(
        json::from_str(r#"{ "type": "no-such-kind" }"#),
        Err(Error::Json(_))
    ));
}
