use thiserror::Error;

/// Why tokenization failed.
///
/// Tokenization is all-or-nothing: any of these aborts the whole call and no
/// tokens are returned. Every variant carries the byte offset where the
/// offending construct starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenizeError {
    /// A quoted attribute value ran to the end of input.
    #[error("unterminated {quote}-quoted attribute value at byte {offset}")]
    UnterminatedQuote {
        /// Offset of the opening quote.
        offset: usize,
        /// The quote character, `'` or `"`.
        quote: char,
    },
    /// A doctype or comment has no closing delimiter.
    #[error("unterminated markup declaration at byte {offset}")]
    UnterminatedTag {
        /// Offset of the `<`.
        offset: usize,
    },
    /// A close tag name is followed by something other than `>`.
    #[error("malformed close tag at byte {offset}")]
    MalformedCloseTag {
        /// Offset of the unexpected byte.
        offset: usize,
    },
    /// `<!` is followed by neither `DOCTYPE` nor `--`.
    #[error("unknown markup declaration at byte {offset}")]
    MalformedDoctype {
        /// Offset of the `<`.
        offset: usize,
    },
    /// An attribute has no name, or a `/` inside a tag is not followed by `>`.
    #[error("malformed attribute at byte {offset}")]
    MalformedAttribute {
        /// Offset of the unexpected byte.
        offset: usize,
    },
    /// Input ended inside a tag.
    #[error("unexpected end of input in tag starting at byte {offset}")]
    UnexpectedEof {
        /// Offset of the tag's `<`.
        offset: usize,
    },
}

impl TokenizeError {
    /// Byte offset the error refers to.
    #[must_use]
    pub const fn offset(&self) -> usize {
        match *self {
            Self::UnterminatedQuote { offset, .. }
            | Self::UnterminatedTag { offset }
            | Self::MalformedCloseTag { offset }
            | Self::MalformedDoctype { offset }
            | Self::MalformedAttribute { offset }
            | Self::UnexpectedEof { offset } => offset,
        }
    }
}
