//! Layout classification of element names.
//!
//! The names below are blocks and `a` is inline. Anything else is left to
//! the caller.

const BLOCK_NAMES: &[&str] = &[
    "body", "div", "p", "h1", "h2", "h3", "h4", "h5", "h6", "dl", "dt", "dd", "header", "address",
];

const INLINE_NAMES: &[&str] = &["a"];

fn one_of(name: &[u8], names: &[&str]) -> bool {
    names.iter().any(|n| name.eq_ignore_ascii_case(n.as_bytes()))
}

/// True if an element called `name` is laid out as a block.
#[must_use]
pub fn is_block_name(name: &[u8]) -> bool {
    one_of(name, BLOCK_NAMES)
}

/// True if an element called `name` is laid out inline.
#[must_use]
pub fn is_inline_name(name: &[u8]) -> bool {
    one_of(name, INLINE_NAMES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_names_case_insensitive() {
        assert!(is_block_name(b"DIV"));
        assert!(is_block_name(b"h3"));
        assert!(!is_block_name(b"span"));
    }

    #[test]
    fn test_inline_names() {
        assert!(is_inline_name(b"A"));
        assert!(!is_inline_name(b"p"));
    }
}
