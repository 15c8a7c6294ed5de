//! Integration tests for the HTML tokenizer.

use wren_arena::ArenaConfig;
use wren_dom::Attribute;
use wren_html::{HTMLTokenizer, Token, TokenKind, TokenStream, TokenizeError, tokenize};

/// Helper to tokenize input that is expected to be well formed
fn tokens(input: &[u8]) -> TokenStream<'_> {
    tokenize(input).expect("input should tokenize")
}

/// Helper to get the attributes of the token at `index` as (name, value) pairs
fn attributes_of<'s>(stream: &TokenStream<'s>, index: usize) -> Vec<(&'s str, &'s str)> {
    let token = stream.get(index).expect("token exists");
    stream
        .attributes(token)
        .iter()
        .map(|&Attribute { name, value }| {
            (
                std::str::from_utf8(name).unwrap(),
                std::str::from_utf8(value).unwrap(),
            )
        })
        .collect()
}

#[test]
fn test_plain_text() {
    let stream = tokens(b"Hello");
    assert_eq!(stream.len(), 1);
    assert_eq!(stream.tokens()[0], Token::Text { contents: b"Hello" });
}

#[test]
fn test_empty_input() {
    let stream = tokens(b"");
    assert!(stream.is_empty());
}

#[test]
fn test_doctype_is_skipped() {
    let stream = tokens(b"<!DOCTYPE html><p>");
    assert_eq!(stream.len(), 1);
    assert!(stream.tokens()[0].is_open_tag_named(&["p"]));
}

#[test]
fn test_doctype_is_case_insensitive() {
    let stream = tokens(b"<!doctype html>text");
    assert_eq!(stream.tokens(), &[Token::Text { contents: b"text" }]);
}

#[test]
fn test_comment_between_tags_is_skipped() {
    let stream = tokens(b"<p><!-- a <b> note --></p>");
    assert_eq!(stream.len(), 2);
    assert_eq!(stream.tokens()[0].kind(), TokenKind::OpenTag);
    assert_eq!(stream.tokens()[1], Token::CloseTag { name: b"p" });
}

#[test]
fn test_start_tag() {
    let stream = tokens(b"<div>");
    match stream.tokens()[0] {
        Token::OpenTag {
            name,
            attributes,
            self_closing,
        } => {
            assert_eq!(name, b"div");
            assert!(attributes.is_empty());
            assert!(!self_closing);
        }
        other => panic!("Expected OpenTag token, got {other:?}"),
    }
}

#[test]
fn test_end_tag() {
    let stream = tokens(b"</div   >");
    assert_eq!(stream.tokens(), &[Token::CloseTag { name: b"div" }]);
}

#[test]
fn test_end_tag_with_empty_name() {
    let stream = tokens(b"</>");
    assert_eq!(stream.tokens(), &[Token::CloseTag { name: b"" }]);
}

#[test]
fn test_tag_name_case_is_preserved() {
    let stream = tokens(b"<DIV></Div>");
    assert_eq!(stream.tokens()[0].tag_name(), Some(&b"DIV"[..]));
    assert!(stream.tokens()[0].is_open_tag_named(&["div"]));
    assert!(stream.tokens()[1].is_close_tag_named(&["span", "div"]));
}

#[test]
fn test_self_closing_tag() {
    for input in [&b"<br/>"[..], b"<br />", b"<br\n/>"] {
        let stream = tokens(input);
        assert!(
            matches!(stream.tokens()[0], Token::OpenTag { self_closing: true, .. }),
            "{input:?}"
        );
    }
}

#[test]
fn test_attribute_forms() {
    let stream = tokens(br#"<a href="x" id='y' data-k=v disabled>"#);
    assert_eq!(
        attributes_of(&stream, 0),
        vec![("href", "x"), ("id", "y"), ("data-k", "v"), ("disabled", "")]
    );
}

#[test]
fn test_whitespace_around_equals() {
    let stream = tokens(b"<a href = \"x\" >");
    assert_eq!(attributes_of(&stream, 0), vec![("href", "x")]);
}

#[test]
fn test_attributes_without_separating_whitespace() {
    let stream = tokens(br#"<a x="1"y="2">"#);
    assert_eq!(attributes_of(&stream, 0), vec![("x", "1"), ("y", "2")]);
}

#[test]
fn test_escaped_quote_stays_in_value() {
    let stream = tokens(br#"<a title="say \"hi\"">"#);
    assert_eq!(attributes_of(&stream, 0), vec![("title", r#"say \"hi\""#)]);
}

#[test]
fn test_unquoted_value_before_self_closing_slash() {
    let stream = tokens(b"<img src=a.png/>");
    assert_eq!(attributes_of(&stream, 0), vec![("src", "a.png")]);
    assert!(matches!(stream.tokens()[0], Token::OpenTag { self_closing: true, .. }));
}

#[test]
fn test_attribute_spans_are_disjoint() {
    let stream = tokens(b"<a x=1><b y=2 z=3><c>");
    assert_eq!(attributes_of(&stream, 0).len(), 1);
    assert_eq!(attributes_of(&stream, 1).len(), 2);
    assert!(attributes_of(&stream, 2).is_empty());
    assert_eq!(stream.attribute_pool().len(), 3);
}

#[test]
fn test_text_runs_until_tag() {
    let stream = tokens(b"<p>a b </p>");
    assert_eq!(stream.tokens()[1], Token::Text { contents: b"a b " });
}

#[test]
fn test_whitespace_between_tokens_is_skipped() {
    let stream = tokens(b"<p>\n   hi</p>  \t\n");
    assert_eq!(stream.len(), 3);
    assert_eq!(stream.tokens()[1], Token::Text { contents: b"hi" });
}

#[test]
fn test_lone_angle_bracket_is_text() {
    assert_eq!(tokens(b"a < b").tokens(), &[Token::Text { contents: b"a < b" }]);
    assert_eq!(tokens(b"x<").tokens(), &[Token::Text { contents: b"x<" }]);
    assert_eq!(tokens(b"<").tokens(), &[Token::Text { contents: b"<" }]);
}

#[test]
fn test_unterminated_quote() {
    let error = tokenize(b"<a href=\"x>unterminated").unwrap_err();
    assert_eq!(error, TokenizeError::UnterminatedQuote { offset: 8, quote: '"' });
    assert_eq!(error.offset(), 8);
    assert_eq!(
        error.to_string(),
        "unterminated \"-quoted attribute value at byte 8"
    );
}

#[test]
fn test_eof_inside_tag() {
    assert_eq!(
        tokenize(b"<div").unwrap_err(),
        TokenizeError::UnexpectedEof { offset: 0 }
    );
    assert_eq!(
        tokenize(b"ok <div class=x").unwrap_err(),
        TokenizeError::UnexpectedEof { offset: 3 }
    );
}

#[test]
fn test_malformed_close_tag() {
    assert_eq!(
        tokenize(b"</div x>").unwrap_err(),
        TokenizeError::MalformedCloseTag { offset: 6 }
    );
}

#[test]
fn test_malformed_attribute() {
    assert_eq!(
        tokenize(b"<div =x>").unwrap_err(),
        TokenizeError::MalformedAttribute { offset: 5 }
    );
    assert_eq!(
        tokenize(b"<div / x>").unwrap_err(),
        TokenizeError::MalformedAttribute { offset: 6 }
    );
}

#[test]
fn test_unknown_declaration() {
    assert_eq!(
        tokenize(b"<!ELEMENT br EMPTY>").unwrap_err(),
        TokenizeError::MalformedDoctype { offset: 0 }
    );
}

#[test]
fn test_unterminated_declarations() {
    assert_eq!(
        tokenize(b"<!-- never closed").unwrap_err(),
        TokenizeError::UnterminatedTag { offset: 0 }
    );
    assert_eq!(
        tokenize(b"<p><!DOCTYPE html").unwrap_err(),
        TokenizeError::UnterminatedTag { offset: 3 }
    );
}

#[test]
fn test_with_config() {
    let stream = HTMLTokenizer::with_config(b"<p id=a>x</p>", ArenaConfig::fixed(8))
        .run()
        .unwrap();
    assert_eq!(stream.len(), 3);
    assert_eq!(attributes_of(&stream, 0), vec![("id", "a")]);
}

#[test]
fn test_token_dump() {
    let stream = tokens(b"<p id=\"a\">Hi</p><br/>");
    let dump = stream.to_string();
    let lines: Vec<&str> = dump.lines().collect();
    assert_eq!(
        lines,
        vec![
            "   0 OpenTag  <p id=\"a\">",
            "   1 Text     \"Hi\"",
            "   2 CloseTag </p>",
            "   3 OpenTag  <br />",
        ]
    );
}
