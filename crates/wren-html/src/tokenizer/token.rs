use core::fmt;

use strum_macros::Display;
use wren_arena::{Arena, ArenaConfig, ArenaId, ArenaKind, Span};
use wren_dom::Attribute;

/// The three kinds of token the tokenizer emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum TokenKind {
    /// `<name attr=value ...>` or `<name .../>`
    OpenTag,
    /// `</name>`
    CloseTag,
    /// A run of character data.
    Text,
}

/// A token borrowed from the source buffer.
///
/// Doctypes and comments are consumed by the tokenizer and never emitted.
/// There is no end-of-file token: the stream simply ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'src> {
    /// An open tag.
    OpenTag {
        /// Tag name as written.
        name: &'src [u8],
        /// Span into the stream's attribute pool.
        attributes: Span<Attribute<'src>>,
        /// The tag ended in `/>`.
        self_closing: bool,
    },
    /// A close tag. May have an empty name (`</>`).
    CloseTag {
        /// Tag name as written.
        name: &'src [u8],
    },
    /// Character data, never empty.
    Text {
        /// Raw bytes, character references left as written.
        contents: &'src [u8],
    },
}

impl<'src> Token<'src> {
    /// Which kind of token this is.
    #[must_use]
    pub const fn kind(&self) -> TokenKind {
        match self {
            Self::OpenTag { .. } => TokenKind::OpenTag,
            Self::CloseTag { .. } => TokenKind::CloseTag,
            Self::Text { .. } => TokenKind::Text,
        }
    }

    /// Tag name for open and close tags.
    #[must_use]
    pub const fn tag_name(&self) -> Option<&'src [u8]> {
        match *self {
            Self::OpenTag { name, .. } | Self::CloseTag { name } => Some(name),
            Self::Text { .. } => None,
        }
    }

    /// True if this is an open tag whose name matches one of `names`
    /// (ASCII case-insensitive).
    #[must_use]
    pub fn is_open_tag_named(&self, names: &[&str]) -> bool {
        matches!(self, Self::OpenTag { name, .. } if one_of(name, names))
    }

    /// True if this is a close tag whose name matches one of `names`
    /// (ASCII case-insensitive).
    #[must_use]
    pub fn is_close_tag_named(&self, names: &[&str]) -> bool {
        matches!(self, Self::CloseTag { name } if one_of(name, names))
    }
}

/// ASCII case-insensitive membership test for tag names.
pub(crate) fn one_of(name: &[u8], names: &[&str]) -> bool {
    names.iter().any(|n| name.eq_ignore_ascii_case(n.as_bytes()))
}

/// The output of tokenization: the token table and the attribute pool that
/// open-tag spans point into.
#[derive(Debug)]
pub struct TokenStream<'src> {
    tokens: Arena<Token<'src>>,
    attributes: Arena<Attribute<'src>>,
}

impl<'src> TokenStream<'src> {
    /// An empty stream backed by two permanent arenas.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tokens: Arena::permanent(),
            attributes: Arena::permanent(),
        }
    }

    /// An empty stream whose arenas use `config`.
    #[must_use]
    pub fn with_config(config: ArenaConfig) -> Self {
        Self {
            tokens: Arena::new(ArenaKind::Permanent, config),
            attributes: Arena::new(ArenaKind::Permanent, config),
        }
    }

    /// Number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True if no tokens were produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// All tokens in source order.
    #[must_use]
    pub fn tokens(&self) -> &[Token<'src>] {
        self.tokens.as_slice()
    }

    /// Token at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Token<'src>> {
        self.tokens.as_slice().get(index)
    }

    /// Attributes of `token`; empty unless it is an open tag.
    #[must_use]
    pub fn attributes(&self, token: &Token<'src>) -> &[Attribute<'src>] {
        match token {
            Token::OpenTag { attributes, .. } => self.attributes.get(*attributes),
            Token::CloseTag { .. } | Token::Text { .. } => &[],
        }
    }

    /// The whole attribute pool. Open-tag spans index into this slice.
    #[must_use]
    pub fn attribute_pool(&self) -> &[Attribute<'src>] {
        self.attributes.as_slice()
    }

    pub(crate) fn push(&mut self, token: Token<'src>) {
        let _ = self.tokens.push(token);
    }

    pub(crate) fn alloc_attributes(&mut self, attributes: &[Attribute<'src>]) -> Span<Attribute<'src>> {
        self.attributes.alloc_copy(attributes)
    }

    pub(crate) const fn attribute_arena_id(&self) -> ArenaId {
        self.attributes.id()
    }

    fn write_token(&self, f: &mut fmt::Formatter<'_>, token: &Token<'src>) -> fmt::Result {
        match *token {
            Token::OpenTag {
                name, self_closing, ..
            } => {
                write!(f, "<{}", String::from_utf8_lossy(name))?;
                for attr in self.attributes(token) {
                    write!(f, " {}=\"{}\"", attr.name_lossy(), attr.value_lossy())?;
                }
                f.write_str(if self_closing { " />" } else { ">" })
            }
            Token::CloseTag { name } => write!(f, "</{}>", String::from_utf8_lossy(name)),
            Token::Text { contents } => {
                write!(f, "{:?}", String::from_utf8_lossy(contents))
            }
        }
    }
}

impl Default for TokenStream<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// One line per token: index, kind, and the token as markup.
impl fmt::Display for TokenStream<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, token) in self.tokens().iter().enumerate() {
            let kind = token.kind().to_string();
            write!(f, "{index:>4} {kind:<8} ")?;
            self.write_token(f, token)?;
            writeln!(f)?;
        }
        Ok(())
    }
}
