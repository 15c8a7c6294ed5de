use tracing::{debug, trace};
use wren_arena::{ArenaConfig, ArenaVec, ScratchPool};
use wren_dom::Attribute;

use super::error::TokenizeError;
use super::helpers::{is_alphanumeric, is_attribute_name_byte, is_whitespace};
use super::token::{Token, TokenStream};

/// Records committed per scratch arena used for gathering attributes.
const ATTRIBUTE_SCRATCH: usize = 64;

/// A single-pass scanner that turns a byte buffer into a [`TokenStream`].
///
/// The grammar is a small subset of HTML:
///
/// - `<` opens markup only when followed by `/`, `!` or an ASCII
///   alphanumeric. Any other `<` is literal text.
/// - `<!DOCTYPE ...>` (case-insensitive) and `<!-- ... -->` are consumed
///   and discarded. Any other `<!` is an error.
/// - Close tags are `</name ws* >`; open tags are
///   `<name (ws* attribute)* ws* [/]>`.
/// - Attribute values may be single-quoted, double-quoted or unquoted. A
///   backslash inside a quoted value escapes the closing quote; the
///   backslash is kept in the value.
/// - Text runs until a `<` followed by `/` or an alphanumeric.
/// - Whitespace between tokens is skipped.
///
/// Unlike a WHATWG tokenizer this one never recovers: the first malformed
/// tag fails the whole run.
#[derive(Debug)]
pub struct HTMLTokenizer<'src> {
    pub(super) input: &'src [u8],
    pub(super) pos: usize,
    stream: TokenStream<'src>,
}

impl<'src> HTMLTokenizer<'src> {
    /// Create a tokenizer over `input`.
    #[must_use]
    pub fn new(input: &'src [u8]) -> Self {
        Self {
            input,
            pos: 0,
            stream: TokenStream::new(),
        }
    }

    /// Create a tokenizer whose token and attribute arenas use `config`.
    #[must_use]
    pub fn with_config(input: &'src [u8], config: ArenaConfig) -> Self {
        Self {
            input,
            pos: 0,
            stream: TokenStream::with_config(config),
        }
    }

    /// Tokenize the whole input.
    ///
    /// # Errors
    ///
    /// Returns a [`TokenizeError`] for the first malformed tag, attribute or
    /// declaration. No partial stream is returned.
    pub fn run(mut self) -> Result<TokenStream<'src>, TokenizeError> {
        let scratch = ScratchPool::with_config(ArenaConfig {
            initial: ATTRIBUTE_SCRATCH,
            ..ArenaConfig::default()
        });

        while let Some(byte) = self.peek(0) {
            if self.at_markup_start() {
                self.tokenize_tag(&scratch)?;
            } else if is_whitespace(byte) {
                self.pos += 1;
            } else {
                self.tokenize_text();
            }
        }

        debug!(
            bytes = self.input.len(),
            tokens = self.stream.len(),
            attributes = self.stream.attribute_pool().len(),
            "tokenized input"
        );
        Ok(self.stream)
    }

    fn emit(&mut self, token: Token<'src>) {
        trace!(kind = %token.kind(), offset = self.pos, "emit token");
        self.stream.push(token);
    }

    /// Cursor is on a `<` that starts markup.
    fn tokenize_tag(&mut self, scratch: &ScratchPool<Attribute<'src>>) -> Result<(), TokenizeError> {
        let start = self.pos;
        self.pos += 1;

        match self.peek(0) {
            Some(b'/') => self.tokenize_close_tag(start),
            Some(b'!') => self.skip_declaration(start),
            _ => self.tokenize_open_tag(start, scratch),
        }
    }

    /// `</name ws* >`. The name may be empty.
    fn tokenize_close_tag(&mut self, start: usize) -> Result<(), TokenizeError> {
        self.pos += 1;
        let name = self.eat_while(is_alphanumeric);

        if self.skip_whitespace_in_tag(start)? != b'>' {
            return Err(TokenizeError::MalformedCloseTag { offset: self.pos });
        }
        self.pos += 1;

        self.emit(Token::CloseTag { name });
        Ok(())
    }

    /// `<!DOCTYPE ...>` or `<!-- ... -->`, both discarded.
    fn skip_declaration(&mut self, start: usize) -> Result<(), TokenizeError> {
        if self.next_few_bytes_are(b"!--") {
            self.pos += 3;
            let end = self
                .find(b"-->")
                .ok_or(TokenizeError::UnterminatedTag { offset: start })?;
            self.pos = end + 3;
            return Ok(());
        }

        if self.next_few_bytes_are_case_insensitive(b"!DOCTYPE") {
            let end = self
                .find(b">")
                .ok_or(TokenizeError::UnterminatedTag { offset: start })?;
            self.pos = end + 1;
            return Ok(());
        }

        Err(TokenizeError::MalformedDoctype { offset: start })
    }

    /// `<name (ws* attribute)* ws* [/]>`
    ///
    /// Attributes are gathered in a scratch arena and copied into the
    /// stream's attribute pool once the tag is complete.
    fn tokenize_open_tag(
        &mut self,
        start: usize,
        scratch: &ScratchPool<Attribute<'src>>,
    ) -> Result<(), TokenizeError> {
        let name = self.eat_while(is_alphanumeric);

        let mut temp = scratch.get_scratch(&[self.stream.attribute_arena_id()]);
        let mut attributes = ArenaVec::new();

        let self_closing = loop {
            match self.skip_whitespace_in_tag(start)? {
                b'>' => {
                    self.pos += 1;
                    break false;
                }
                b'/' => {
                    self.pos += 1;
                    match self.peek(0) {
                        Some(b'>') => {
                            self.pos += 1;
                            break true;
                        }
                        Some(_) => {
                            return Err(TokenizeError::MalformedAttribute { offset: self.pos });
                        }
                        None => return Err(TokenizeError::UnexpectedEof { offset: start }),
                    }
                }
                _ => {
                    let attribute = self.eat_attribute(start)?;
                    attributes.push(&mut temp, attribute);
                }
            }
        };

        let attributes = self.stream.alloc_attributes(attributes.as_slice(&temp));
        temp.release();

        self.emit(Token::OpenTag {
            name,
            attributes,
            self_closing,
        });
        Ok(())
    }

    /// `name`, `name = value`. A name without `=` is a boolean attribute.
    fn eat_attribute(&mut self, tag_start: usize) -> Result<Attribute<'src>, TokenizeError> {
        let name_start = self.pos;
        let name = self.eat_while(is_attribute_name_byte);
        if name.is_empty() {
            return Err(TokenizeError::MalformedAttribute { offset: name_start });
        }

        if self.skip_whitespace_in_tag(tag_start)? != b'=' {
            return Ok(Attribute { name, value: &[] });
        }
        self.pos += 1;

        let value = match self.skip_whitespace_in_tag(tag_start)? {
            quote @ (b'"' | b'\'') => self.eat_quoted_value(quote)?,
            _ => self.eat_unquoted_value(tag_start)?,
        };
        Ok(Attribute { name, value })
    }

    /// Cursor is on the opening quote. Returns the bytes between the quotes.
    fn eat_quoted_value(&mut self, quote: u8) -> Result<&'src [u8], TokenizeError> {
        let open = self.pos;
        self.pos += 1;

        let mut escaped = false;
        let value = self.eat_while(|byte| {
            let stop = byte == quote && !escaped;
            escaped = byte == b'\\' && !escaped;
            !stop
        });

        if self.peek(0) != Some(quote) {
            return Err(TokenizeError::UnterminatedQuote {
                offset: open,
                quote: char::from(quote),
            });
        }
        self.pos += 1;
        Ok(value)
    }

    /// Runs to whitespace, `>`, or a `/` that closes the tag.
    fn eat_unquoted_value(&mut self, tag_start: usize) -> Result<&'src [u8], TokenizeError> {
        let input = self.input;
        let start = self.pos;
        while let Some(byte) = self.peek(0) {
            let closes_tag = byte == b'/' && input.get(self.pos + 1).is_none_or(|&next| next == b'>');
            if is_whitespace(byte) || byte == b'>' || closes_tag {
                break;
            }
            self.pos += 1;
        }

        if self.pos == input.len() {
            return Err(TokenizeError::UnexpectedEof { offset: tag_start });
        }
        Ok(&input[start..self.pos])
    }

    /// Text up to the next `<` that starts a tag, or the end of input.
    fn tokenize_text(&mut self) {
        let start = self.pos;
        self.pos += 1;
        while self.pos < self.input.len() && !self.at_text_end() {
            self.pos += 1;
        }
        let contents = &self.input[start..self.pos];
        self.emit(Token::Text { contents });
    }
}

/// Tokenize `source` in one call.
///
/// # Errors
///
/// See [`HTMLTokenizer::run`].
pub fn tokenize(source: &[u8]) -> Result<TokenStream<'_>, TokenizeError> {
    HTMLTokenizer::new(source)
        .run()
        .inspect_err(|error| debug!(%error, "tokenization failed"))
}
