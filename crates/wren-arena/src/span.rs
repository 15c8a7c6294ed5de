use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;
use core::ops::Range;

/// A run of records inside an [`Arena`](crate::Arena), addressed by index.
///
/// Spans are plain integers, so they can be stored inside the records of
/// another arena, copied freely and relocated together with the table they
/// point into. A span is only meaningful for the arena (or the copy of that
/// arena's table) that produced it.
pub struct Span<T> {
    start: usize,
    len: usize,
    marker: PhantomData<fn() -> T>,
}

impl<T> Span<T> {
    /// The empty span. Used for nodes that never had children.
    pub const EMPTY: Self = Self::new(0, 0);

    /// Create a span covering `len` records starting at `start`.
    #[must_use]
    pub const fn new(start: usize, len: usize) -> Self {
        Self {
            start,
            len,
            marker: PhantomData,
        }
    }

    /// Index of the first record.
    #[must_use]
    pub const fn start(self) -> usize {
        self.start
    }

    /// One past the index of the last record.
    #[must_use]
    pub const fn end(self) -> usize {
        self.start + self.len
    }

    /// Number of records covered.
    #[must_use]
    pub const fn len(self) -> usize {
        self.len
    }

    /// True if the span covers no records.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.len == 0
    }

    /// The index range covered by this span.
    #[must_use]
    pub const fn range(self) -> Range<usize> {
        self.start..self.start + self.len
    }
}

// Manual impls: deriving would require `T: Clone` etc. even though no `T`
// is stored.
impl<T> Clone for Span<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Span<T> {}

impl<T> PartialEq for Span<T> {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.len == other.len
    }
}

impl<T> Eq for Span<T> {}

impl<T> Hash for Span<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.start.hash(state);
        self.len.hash(state);
    }
}

impl<T> Default for Span<T> {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl<T> fmt::Debug for Span<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Span({}..{})", self.start, self.end())
    }
}
