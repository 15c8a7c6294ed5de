//! Tests for the sealed DOM tree: lookup, traversal, printing and dumping.

use wren_arena::Span;
use wren_dom::dump::DumpNode;
use wren_dom::{
    Attribute, DomTables, DomTree, ElementData, ElementIndex, Node, NodeId, NodeKind, TextData,
    TextIndex,
};

/// Helper to create a node record with its relations.
fn node(
    kind: NodeKind,
    parent: Option<usize>,
    prev: Option<usize>,
    next: Option<usize>,
    children: (usize, usize),
) -> Node {
    Node {
        kind,
        parent: parent.map(NodeId),
        prev_sibling: prev.map(NodeId),
        next_sibling: next.map(NodeId),
        children: Span::new(children.0, children.1),
    }
}

/// Helper to create element data with no attributes.
fn element(node: usize, name: &'static str) -> ElementData<'static> {
    ElementData {
        node: NodeId(node),
        name: name.as_bytes(),
        attributes: Span::EMPTY,
        self_closing: false,
    }
}

/// Builds the tree for
/// `<html><head><title>Doc</title></head><body><P class="intro">Hello </P><br/></body></html>`.
fn sample_tree() -> DomTree<'static> {
    use NodeKind::{Element, Text};

    let nodes = [
        node(Element(ElementIndex(0)), None, None, None, (0, 2)),
        node(Element(ElementIndex(1)), Some(0), None, Some(4), (2, 1)),
        node(Element(ElementIndex(2)), Some(1), None, None, (3, 1)),
        node(Text(TextIndex(0)), Some(2), None, None, (0, 0)),
        node(Element(ElementIndex(3)), Some(0), Some(1), None, (4, 2)),
        node(Element(ElementIndex(4)), Some(4), None, Some(7), (6, 1)),
        node(Text(TextIndex(1)), Some(5), None, None, (0, 0)),
        node(Element(ElementIndex(5)), Some(4), Some(5), None, (0, 0)),
    ];
    let element_data = [
        element(0, "html"),
        element(1, "head"),
        element(2, "title"),
        element(4, "body"),
        ElementData {
            attributes: Span::new(0, 2),
            ..element(5, "P")
        },
        ElementData {
            self_closing: true,
            ..element(7, "br")
        },
    ];
    let text_data = [
        TextData {
            node: NodeId(3),
            contents: b"Doc",
        },
        TextData {
            node: NodeId(6),
            contents: b"Hello ",
        },
    ];
    let children = [1, 4, 2, 3, 5, 7, 6].map(NodeId);
    let attributes = [
        Attribute {
            name: b"class",
            value: b"intro",
        },
        Attribute {
            name: b"hidden",
            value: b"",
        },
    ];

    DomTree::from_tables(
        DomTables {
            nodes: &nodes,
            element_data: &element_data,
            text_data: &text_data,
            children: &children,
            attributes: &attributes,
        },
        NodeId(0),
        Some(NodeId(1)),
    )
}

// ========== Lookup ==========

#[test]
fn test_roots() {
    let tree = sample_tree();
    assert_eq!(tree.html(), NodeId(0));
    assert_eq!(tree.head(), Some(NodeId(1)));
    assert_eq!(tree.body(), Some(NodeId(4)));
    assert_eq!(tree.len(), 8);
    assert!(!tree.is_empty());
}

#[test]
fn test_children_and_siblings() {
    let tree = sample_tree();
    assert_eq!(tree.children(NodeId(0)), &[NodeId(1), NodeId(4)]);
    assert_eq!(tree.children(NodeId(4)), &[NodeId(5), NodeId(7)]);
    assert!(tree.children(NodeId(7)).is_empty());
    assert_eq!(tree.first_child(NodeId(4)), Some(NodeId(5)));
    assert_eq!(tree.last_child(NodeId(4)), Some(NodeId(7)));
    assert_eq!(tree.next_sibling(NodeId(1)), Some(NodeId(4)));
    assert_eq!(tree.prev_sibling(NodeId(7)), Some(NodeId(5)));
    assert_eq!(tree.parent(NodeId(0)), None);
}

#[test]
fn test_out_of_range_lookup() {
    let tree = sample_tree();
    assert!(tree.get(NodeId(99)).is_none());
    assert!(tree.children(NodeId(99)).is_empty());
    assert!(tree.as_element(NodeId(99)).is_none());
}

#[test]
fn test_element_and_text_payloads() {
    let tree = sample_tree();
    assert_eq!(tree.tag_name(NodeId(5)), Some(&b"P"[..]));
    assert!(tree.is_element_named(NodeId(5), "p"));
    assert!(tree.as_text(NodeId(5)).is_none());
    assert_eq!(tree.as_text(NodeId(6)).map(|t| t.contents), Some(&b"Hello "[..]));
    assert!(tree.as_element(NodeId(6)).is_none());
}

#[test]
fn test_attribute_lookup_case_insensitive() {
    let tree = sample_tree();
    assert_eq!(tree.attribute(NodeId(5), "CLASS"), Some(&b"intro"[..]));
    assert_eq!(tree.attribute(NodeId(5), "hidden"), Some(&b""[..]));
    assert_eq!(tree.attribute(NodeId(5), "id"), None);
    assert!(tree.attributes(NodeId(6)).is_empty());
}

// ========== Traversal ==========

#[test]
fn test_ancestors() {
    let tree = sample_tree();
    let ancestors: Vec<_> = tree.ancestors(NodeId(6)).collect();
    assert_eq!(ancestors, vec![NodeId(5), NodeId(4), NodeId(0)]);
    assert!(tree.is_descendant_of(NodeId(6), NodeId(0)));
    assert!(!tree.is_descendant_of(NodeId(6), NodeId(1)));
}

#[test]
fn test_sibling_iterators() {
    let tree = sample_tree();
    assert_eq!(tree.following_siblings(NodeId(1)).collect::<Vec<_>>(), vec![NodeId(4)]);
    assert_eq!(tree.preceding_siblings(NodeId(7)).collect::<Vec<_>>(), vec![NodeId(5)]);
    assert_eq!(tree.following_siblings(NodeId(7)).count(), 0);
}

#[test]
fn test_descendants_in_document_order() {
    let tree = sample_tree();
    let order: Vec<_> = tree.descendants(tree.html()).map(|id| id.0).collect();
    assert_eq!(order, vec![1, 2, 3, 4, 5, 6, 7]);
}

#[test]
fn test_elements_named() {
    let tree = sample_tree();
    assert_eq!(tree.elements_named("p").collect::<Vec<_>>(), vec![NodeId(5)]);
    assert_eq!(tree.elements_named("table").count(), 0);
}

// ========== Queries ==========

#[test]
fn test_text_content() {
    let tree = sample_tree();
    assert_eq!(tree.text_content(tree.html()), "DocHello ");
    assert_eq!(tree.text_content(NodeId(6)), "Hello ");
}

#[test]
fn test_title() {
    let tree = sample_tree();
    assert_eq!(tree.title().as_deref(), Some("Doc"));
}

#[test]
fn test_classification() {
    let tree = sample_tree();
    assert!(tree.is_block(NodeId(5)));
    assert!(tree.is_block(NodeId(4)));
    assert!(!tree.is_block(NodeId(6)));
    assert!(!tree.is_inline(NodeId(7)));
}

// ========== Printing ==========

#[test]
fn test_to_markup() {
    let tree = sample_tree();
    assert_eq!(
        tree.to_markup(),
        "<html><head><title>Doc</title></head><body><P class=\"intro\" hidden>Hello </P><br/></body></html>"
    );
    assert_eq!(tree.to_string(), tree.to_markup());
}

#[test]
fn test_outline() {
    let tree = sample_tree();
    let expected = "\
<html>
  <head>
    <title>
      \"Doc\"
  <body>
    <p class=\"intro\" hidden>
      \"Hello\u{00B7}\"
    <br/>
";
    assert_eq!(tree.outline(), expected);
}

#[test]
fn test_dump_json() {
    let tree = sample_tree();
    let dump = tree.dump();
    assert_eq!(dump.html, 0);
    assert_eq!(dump.head, Some(1));
    assert_eq!(dump.nodes.len(), tree.len());

    let DumpNode::Element { name, children, parent, .. } = &dump.nodes[0] else {
        panic!("html should dump as an element");
    };
    assert_eq!(name, "html");
    assert_eq!(children, &[1, 4]);
    assert_eq!(*parent, None);

    let json = serde_json::to_value(&dump).expect("serializable");
    let p = &json["nodes"][5];
    assert_eq!(p["kind"], "element");
    assert_eq!(p["name"], "p");
    assert_eq!(p["parent"], 4);
    assert_eq!(p["attributes"][0]["value"], "intro");
    assert!(p.get("self_closing").is_none());
    assert_eq!(p["children"], serde_json::json!([6]));
    assert_eq!(json["nodes"][6]["contents"], "Hello ");
    assert!(json["nodes"][0].get("parent").is_none());

    let br = serde_json::to_value(tree.dump_node(NodeId(7))).expect("serializable");
    assert_eq!(br["self_closing"], true);
    assert_eq!(br["children"], serde_json::json!([]));
}

// ========== Consistency ==========

#[test]
#[should_panic(expected = "payload belongs to")]
fn test_mismatched_back_reference_is_fatal() {
    let nodes = [Node::new(NodeKind::Element(ElementIndex(0)))];
    let element_data = [element(3, "html")];
    let _ = DomTree::from_tables(
        DomTables {
            nodes: &nodes,
            element_data: &element_data,
            text_data: &[],
            children: &[],
            attributes: &[],
        },
        NodeId(0),
        None,
    );
}

#[test]
#[should_panic(expected = "is not an element")]
fn test_text_root_is_fatal() {
    let nodes = [Node::new(NodeKind::Text(TextIndex(0)))];
    let text_data = [TextData {
        node: NodeId(0),
        contents: b"x",
    }];
    let _ = DomTree::from_tables(
        DomTables {
            nodes: &nodes,
            element_data: &[],
            text_data: &text_data,
            children: &[],
            attributes: &[],
        },
        NodeId(0),
        None,
    );
}
