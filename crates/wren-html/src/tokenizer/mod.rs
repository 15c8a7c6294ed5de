//! HTML tokenizer module.
//!
//! A permissive, fail-fast scanner in the spirit of
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization),
//! reduced to open tags, close tags and text.

mod error;
mod helpers;
mod scanner;
/// Token types produced by the tokenizer.
pub mod token;

pub use error::TokenizeError;
pub use scanner::{HTMLTokenizer, tokenize};
pub use token::{Token, TokenKind, TokenStream};
