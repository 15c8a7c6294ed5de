//! HTML tokenizer and tree builder for the Wren pipeline.
//!
//! # Scope
//!
//! This crate implements:
//! - **Tokenizer**: a fail-fast scanner that emits open tags, close tags and
//!   text borrowed from the source buffer. Doctypes and comments are
//!   recognised and skipped.
//! - **Tree builder** ([WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction))
//!   - Insertion modes: BeforeHtml, BeforeHead, InHead, AfterHead, InBody, AfterBody, AfterAfterBody
//!   - Implicit `html`, `head` and `body`, implied end tags, `<p>` and
//!     `<dd>`/`<dt>` auto-closing
//!
//! # Not Implemented
//!
//! - Character references, script and RCDATA/RAWTEXT states
//! - Comment and doctype nodes
//! - Table, form and foreign-content modes
//! - Active formatting elements and the adoption agency algorithm
//!
//! # Example
//!
//! ```
//! let tree = wren_html::parse(b"<p class=intro>Hello</p>").unwrap();
//! let body = tree.body().unwrap();
//! assert_eq!(tree.text_content(body), "Hello");
//! ```

/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;
/// Tree construction from a token stream.
pub mod tree_builder;

pub use tokenizer::{HTMLTokenizer, Token, TokenKind, TokenStream, TokenizeError, tokenize};
pub use tree_builder::{InsertionMode, ParseIssue, TreeBuilder};

use wren_dom::DomTree;

/// Tokenize `source` and build its tree.
///
/// The tree borrows names, values and text from `source`; the intermediate
/// token stream is dropped before returning.
///
/// # Errors
///
/// Returns the tokenizer's error if `source` contains a malformed tag.
pub fn parse(source: &[u8]) -> Result<DomTree<'_>, TokenizeError> {
    let tokens = tokenize(source)?;
    Ok(TreeBuilder::new(&tokens).build())
}

/// Like [`parse`], but also returns the issues the tree builder recovered
/// from.
///
/// # Errors
///
/// Returns the tokenizer's error if `source` contains a malformed tag.
pub fn parse_with_issues(source: &[u8]) -> Result<(DomTree<'_>, Vec<ParseIssue>), TokenizeError> {
    let tokens = tokenize(source)?;
    Ok(TreeBuilder::new(&tokens).build_with_issues())
}
