//! Byte classes and cursor helpers for the tokenizer.

use super::scanner::HTMLTokenizer;
use super::error::TokenizeError;

// =============================================================================
// Byte Classes
// =============================================================================

/// `[A-Za-z0-9]`. Tag names consist of these.
pub(super) const fn is_alphanumeric(byte: u8) -> bool {
    byte.is_ascii_alphanumeric()
}

/// Tab, LF, FF, CR and space.
pub(super) const fn is_whitespace(byte: u8) -> bool {
    matches!(byte, 0x09 | 0x0A | 0x0C | 0x0D | 0x20)
}

/// Attribute names additionally allow `-`, `_`, `:` and `.` so that
/// `data-*`, `aria-*` and namespaced names survive.
pub(super) const fn is_attribute_name_byte(byte: u8) -> bool {
    is_alphanumeric(byte) || matches!(byte, b'-' | b'_' | b':' | b'.')
}

// =============================================================================
// Cursor Helpers
// =============================================================================

impl<'src> HTMLTokenizer<'src> {
    /// The byte `offset` positions past the cursor, if any.
    pub(super) fn peek(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    /// Advance the cursor while `pred` holds and return the bytes passed.
    pub(super) fn eat_while(&mut self, mut pred: impl FnMut(u8) -> bool) -> &'src [u8] {
        let input = self.input;
        let start = self.pos;
        while self.pos < input.len() && pred(input[self.pos]) {
            self.pos += 1;
        }
        &input[start..self.pos]
    }

    /// Skip whitespace inside a tag and return the next byte.
    ///
    /// A tag may not end in the middle, so running out of input is an error
    /// reported against the tag's `<` at `tag_start`.
    pub(super) fn skip_whitespace_in_tag(&mut self, tag_start: usize) -> Result<u8, TokenizeError> {
        let _ = self.eat_while(is_whitespace);
        self.peek(0)
            .ok_or(TokenizeError::UnexpectedEof { offset: tag_start })
    }

    /// "If the next few characters are..."
    pub(super) fn next_few_bytes_are(&self, target: &[u8]) -> bool {
        self.input[self.pos..].starts_with(target)
    }

    /// ASCII case-insensitive variant of [`Self::next_few_bytes_are`].
    pub(super) fn next_few_bytes_are_case_insensitive(&self, target: &[u8]) -> bool {
        self.input[self.pos..]
            .get(..target.len())
            .is_some_and(|bytes| bytes.eq_ignore_ascii_case(target))
    }

    /// Offset of the next occurrence of `needle` at or after the cursor.
    pub(super) fn find(&self, needle: &[u8]) -> Option<usize> {
        self.input[self.pos..]
            .windows(needle.len())
            .position(|window| window == needle)
            .map(|index| self.pos + index)
    }

    /// True if the byte at the cursor is a `<` that opens markup: followed by
    /// `/`, `!` or an alphanumeric.
    pub(super) fn at_markup_start(&self) -> bool {
        self.peek(0) == Some(b'<')
            && self
                .peek(1)
                .is_some_and(|next| next == b'/' || next == b'!' || is_alphanumeric(next))
    }

    /// True if the byte at the cursor is a `<` that ends a text run: followed
    /// by `/` or an alphanumeric. `<!` does not end text.
    pub(super) fn at_text_end(&self) -> bool {
        self.peek(0) == Some(b'<')
            && self
                .peek(1)
                .is_some_and(|next| next == b'/' || is_alphanumeric(next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_set() {
        for byte in [b'\t', b'\n', 0x0C, b'\r', b' '] {
            assert!(is_whitespace(byte));
        }
        assert!(!is_whitespace(0x0B));
    }

    #[test]
    fn test_attribute_name_bytes() {
        assert!(is_attribute_name_byte(b'-'));
        assert!(is_attribute_name_byte(b'Z'));
        assert!(!is_attribute_name_byte(b'='));
        assert!(!is_alphanumeric(b'-'));
    }
}
