//! Property tests for the tokenizer and tree builder.
//!
//! Structured inputs are assembled from a table of well-formed fragments so
//! that they always tokenize and the builder sees every insertion-mode path.

use quickcheck_macros::quickcheck;
use wren_dom::{DomTree, NodeId};
use wren_html::{TokenizeError, parse};

const FRAGMENTS: &[&str] = &[
    "<html>", "</html>", "<head>", "</head>", "<body>", "</body>", "<p>", "</p>", "<div>",
    "</div>", "<h1>", "</h1>", "<h2>", "</h2>", "<dl>", "</dl>", "<dt>", "<dd>", "</dd>",
    "<ul>", "<li>", "</li>", "</ul>", "<table>", "<td>", "</td>", "</table>", "<span class=x>",
    "</span>", "<a href='#'>", "</a>", "<br/>", "<img src=a.png />", "<div/>", "</br>", "</>",
    "<!-- note -->", "<!DOCTYPE html>", "text", "more text ", "a < b",
];

/// Helper to assemble a document from fragment picks
fn assemble(picks: &[u8]) -> String {
    picks
        .iter()
        .map(|&pick| FRAGMENTS[usize::from(pick) % FRAGMENTS.len()])
        .collect()
}

/// Helper to check the relations every sealed tree must satisfy
fn tree_is_well_formed(tree: &DomTree<'_>) -> bool {
    let html = tree.html();
    let roots = tree.nodes().iter().filter(|node| node.parent.is_none()).count();

    let structure = tree.is_element_named(html, "html")
        && tree.parent(html).is_none()
        && roots == 1
        && tree.head().is_some_and(|head| tree.parent(head) == Some(html))
        && tree.body().is_some();

    let links = (0..tree.len()).map(NodeId).all(|id| {
        let children = tree.children(id);
        children.iter().all(|&child| tree.parent(child) == Some(id))
            && children.first().is_none_or(|&first| tree.prev_sibling(first).is_none())
            && children.last().is_none_or(|&last| tree.next_sibling(last).is_none())
            && children
                .windows(2)
                .all(|pair| tree.next_sibling(pair[0]) == Some(pair[1]))
    });

    let self_closing_childless = tree
        .element_data()
        .iter()
        .filter(|element| element.self_closing)
        .all(|element| tree.children(element.node).is_empty());

    structure && links && self_closing_childless
}

#[quickcheck]
fn prop_assembled_documents_build_well_formed_trees(picks: Vec<u8>) -> bool {
    let source = assemble(&picks);
    parse(source.as_bytes()).is_ok_and(|tree| tree_is_well_formed(&tree))
}

#[quickcheck]
fn prop_every_node_is_reachable_from_html(picks: Vec<u8>) -> bool {
    let source = assemble(&picks);
    let Ok(tree) = parse(source.as_bytes()) else {
        return false;
    };
    tree.descendants(tree.html()).count() + 1 == tree.len()
}

#[quickcheck]
fn prop_arbitrary_bytes_never_panic(bytes: Vec<u8>) -> bool {
    match parse(&bytes) {
        Ok(tree) => tree_is_well_formed(&tree),
        Err(error) => error.offset() < bytes.len(),
    }
}

#[quickcheck]
fn prop_broken_quote_fails_whatever_comes_before(picks: Vec<u8>) -> bool {
    let source = format!("{}<a href=\"x>unterminated", assemble(&picks));
    matches!(
        parse(source.as_bytes()),
        Err(TokenizeError::UnterminatedQuote { quote: '"', .. })
    )
}

#[quickcheck]
fn prop_text_survives_verbatim(words: Vec<u8>) -> bool {
    // Letters only, so the text never contains markup or leading whitespace.
    let text: String = words
        .iter()
        .map(|&byte| char::from(b'a' + byte % 26))
        .collect();
    let source = format!("<div>{text}</div>");
    parse(source.as_bytes()).is_ok_and(|tree| tree.text_content(tree.html()) == text)
}
