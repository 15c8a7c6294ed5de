use crate::arena::Arena;
use crate::span::Span;

const MIN_CAPACITY: usize = 4;

/// A growable list whose storage lives inside an [`Arena`].
///
/// The handle itself is a small `Copy` value; every operation takes the arena
/// that backs it. When the list outgrows its buffer it moves to a buffer twice
/// the size and the old one is simply abandoned until the arena is restored.
/// A list whose buffer sits at the top of the arena extends in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArenaVec<T> {
    buf: Span<T>,
    len: usize,
}

impl<T> ArenaVec<T> {
    /// An empty list. Allocates nothing until the first push.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buf: Span::EMPTY,
            len: 0,
        }
    }

    /// Number of elements.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// True if the list has no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of elements the current buffer can hold.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// The span of live elements.
    #[must_use]
    pub const fn span(&self) -> Span<T> {
        Span::new(self.buf.start(), self.len)
    }
}

impl<T: Copy + Default> ArenaVec<T> {
    /// Append `value`, moving to a larger buffer if needed.
    ///
    /// # Panics
    ///
    /// Panics if `arena` cannot grow to hold the larger buffer.
    pub fn push(&mut self, arena: &mut Arena<T>, value: T) {
        if self.len == self.buf.len() {
            self.grow(arena);
        }
        arena.get_mut(self.buf)[self.len] = value;
        self.len += 1;
    }

    fn grow(&mut self, arena: &mut Arena<T>) {
        let capacity = (self.buf.len() * 2).max(MIN_CAPACITY);

        if !self.buf.is_empty() && self.buf.end() == arena.len() {
            let _ = arena.alloc(capacity - self.buf.len());
            self.buf = Span::new(self.buf.start(), capacity);
            return;
        }

        let moved = arena.alloc(capacity);
        arena.copy_within(self.span(), moved.start());
        self.buf = moved;
    }
}

impl<T: Copy> ArenaVec<T> {
    /// The live elements.
    ///
    /// # Panics
    ///
    /// Panics if `arena` was restored to a point before this list's buffer.
    #[must_use]
    pub fn as_slice<'a>(&self, arena: &'a Arena<T>) -> &'a [T] {
        arena.get(self.span())
    }

    /// Mutable access to the live elements.
    ///
    /// # Panics
    ///
    /// Panics if `arena` was restored to a point before this list's buffer.
    pub fn as_mut_slice<'a>(&self, arena: &'a mut Arena<T>) -> &'a mut [T] {
        arena.get_mut(self.span())
    }

    /// The last element, if any.
    #[must_use]
    pub fn last(&self, arena: &Arena<T>) -> Option<T> {
        self.as_slice(arena).last().copied()
    }

    /// Remove and return the last element. Its slot stays allocated.
    pub fn pop(&mut self, arena: &Arena<T>) -> Option<T> {
        let value = self.last(arena)?;
        self.len -= 1;
        Some(value)
    }

    /// Shorten the list to `len` elements. Does nothing if it is shorter.
    pub const fn truncate(&mut self, len: usize) {
        if len < self.len {
            self.len = len;
        }
    }
}
