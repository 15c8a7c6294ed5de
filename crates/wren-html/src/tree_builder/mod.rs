//! [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
//!
//! Turns a [`TokenStream`](crate::TokenStream) into a
//! [`DomTree`](wren_dom::DomTree) using the stack of open elements and a
//! reduced set of insertion modes. Malformed nesting is recovered from and
//! reported as [`ParseIssue`]s; it never fails the build.

mod builder;
mod stack;

pub use builder::{InsertionMode, ParseIssue, TreeBuilder};
