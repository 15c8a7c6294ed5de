use std::sync::atomic::{AtomicU32, Ordering};

use strum_macros::Display;
use tracing::debug;

use crate::span::Span;

static NEXT_ARENA_ID: AtomicU32 = AtomicU32::new(1);

/// Identity of an arena, used to express "any scratch arena except these".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArenaId(u32);

impl ArenaId {
    fn next() -> Self {
        Self(NEXT_ARENA_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Growth policy of an arena.
///
/// Only root arenas may commit more storage once their initial commit is
/// exhausted. A `Fixed` arena running out of room is a bug in its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ArenaKind {
    /// Long-lived root arena; results are copied here.
    Permanent,
    /// Root arena handed out by a [`ScratchPool`](crate::ScratchPool).
    Scratch,
    /// Sub-arena with a fixed capacity.
    Fixed,
}

impl ArenaKind {
    /// Whether arenas of this kind may commit more storage.
    #[must_use]
    pub const fn can_grow(self) -> bool {
        matches!(self, Self::Permanent | Self::Scratch)
    }
}

/// Sizing of an arena, in records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Records committed up front.
    pub initial: usize,
    /// Records committed by each growth step.
    pub grow_by: usize,
    /// Upper bound on committed records. Growing past it is fatal.
    pub reserve: usize,
}

impl ArenaConfig {
    /// Default number of records committed at creation.
    pub const DEFAULT_INITIAL: usize = 1024;
    /// Default growth step.
    pub const DEFAULT_GROW_BY: usize = 4096;
    /// Default reservation: 16Mi records.
    pub const DEFAULT_RESERVE: usize = 16 * 1024 * 1024;

    /// Configuration for an arena that never grows past `capacity` records.
    #[must_use]
    pub const fn fixed(capacity: usize) -> Self {
        Self {
            initial: capacity,
            grow_by: 0,
            reserve: capacity,
        }
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            initial: Self::DEFAULT_INITIAL,
            grow_by: Self::DEFAULT_GROW_BY,
            reserve: Self::DEFAULT_RESERVE,
        }
    }
}

/// A saved allocation position. Restoring it frees everything allocated
/// after the snapshot was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    arena: ArenaId,
    len: usize,
}

impl Snapshot {
    /// Number of records that were live when the snapshot was taken.
    #[must_use]
    pub const fn len(self) -> usize {
        self.len
    }

    /// True if the arena was empty when the snapshot was taken.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.len == 0
    }
}

/// A bump allocator for `Copy` records.
///
/// Allocation appends to the end of the arena and hands back a [`Span`].
/// Records are never freed individually: they die together when the arena is
/// dropped, or in bulk when a [`Snapshot`] is restored. Because records are
/// `Copy`, restoring is a truncation with nothing to drop.
#[derive(Debug)]
pub struct Arena<T> {
    id: ArenaId,
    kind: ArenaKind,
    config: ArenaConfig,
    committed: usize,
    high_water: usize,
    items: Vec<T>,
}

impl<T: Copy> Arena<T> {
    /// Create an arena with the given growth policy and sizing.
    #[must_use]
    pub fn new(kind: ArenaKind, config: ArenaConfig) -> Self {
        let committed = config.initial.min(config.reserve);
        Self {
            id: ArenaId::next(),
            kind,
            config,
            committed,
            high_water: 0,
            items: Vec::with_capacity(committed),
        }
    }

    /// A growable root arena with default sizing.
    #[must_use]
    pub fn permanent() -> Self {
        Self::new(ArenaKind::Permanent, ArenaConfig::default())
    }

    /// A growable scratch arena with default sizing.
    #[must_use]
    pub fn scratch() -> Self {
        Self::new(ArenaKind::Scratch, ArenaConfig::default())
    }

    /// A sub-arena holding at most `capacity` records.
    #[must_use]
    pub fn fixed(capacity: usize) -> Self {
        Self::new(ArenaKind::Fixed, ArenaConfig::fixed(capacity))
    }

    /// This arena's identity.
    #[must_use]
    pub const fn id(&self) -> ArenaId {
        self.id
    }

    /// This arena's growth policy.
    #[must_use]
    pub const fn kind(&self) -> ArenaKind {
        self.kind
    }

    /// Number of live records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if no records are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Records committed so far, live or not.
    #[must_use]
    pub const fn committed(&self) -> usize {
        self.committed
    }

    /// Records that can still be allocated without growing.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.committed - self.items.len()
    }

    /// Largest number of records ever live at once.
    #[must_use]
    pub const fn high_water(&self) -> usize {
        self.high_water
    }

    /// Make room for `count` more records, committing storage as needed.
    ///
    /// # Panics
    ///
    /// Panics if the arena is not a root arena, or if growing would exceed
    /// the configured reservation.
    fn ensure(&mut self, count: usize) {
        let needed = self.items.len() + count;
        if needed <= self.committed {
            return;
        }

        assert!(
            self.kind.can_grow(),
            "cannot grow non-root {} arena: out of memory ({needed} records needed, {} committed)",
            self.kind,
            self.committed
        );

        let step = self.config.grow_by.max(1);
        let mut target = self.committed;
        while target < needed {
            target += step;
        }
        assert!(
            target <= self.config.reserve,
            "cannot grow {} arena: out of memory ({target} records exceeds reservation of {})",
            self.kind,
            self.config.reserve
        );

        self.items.reserve_exact(target - self.items.len());
        debug!(
            kind = %self.kind,
            from = self.committed,
            to = target,
            "arena committed more records"
        );
        self.committed = target;
    }

    fn bump(&mut self, start: usize) -> Span<T> {
        let len = self.items.len();
        self.high_water = self.high_water.max(len);
        Span::new(start, len - start)
    }

    /// Allocate one record and return its index.
    ///
    /// # Panics
    ///
    /// Panics if the arena cannot grow to fit the record.
    pub fn push(&mut self, value: T) -> usize {
        self.ensure(1);
        let index = self.items.len();
        self.items.push(value);
        let _ = self.bump(index);
        index
    }

    /// Allocate `count` zeroed (default-initialised) records.
    ///
    /// # Panics
    ///
    /// Panics if the arena cannot grow to fit the records.
    pub fn alloc(&mut self, count: usize) -> Span<T>
    where
        T: Default,
    {
        self.ensure(count);
        let start = self.items.len();
        self.items.resize(start + count, T::default());
        self.bump(start)
    }

    /// Allocate a copy of `values`.
    ///
    /// # Panics
    ///
    /// Panics if the arena cannot grow to fit the records.
    pub fn alloc_copy(&mut self, values: &[T]) -> Span<T> {
        if values.is_empty() {
            return Span::EMPTY;
        }
        self.ensure(values.len());
        let start = self.items.len();
        self.items.extend_from_slice(values);
        self.bump(start)
    }

    /// Records covered by `span`.
    ///
    /// # Panics
    ///
    /// Panics if `span` reaches past the live records, which happens when a
    /// span outlives the snapshot it was allocated under.
    #[must_use]
    pub fn get(&self, span: Span<T>) -> &[T] {
        &self.items[span.range()]
    }

    /// Mutable access to the records covered by `span`.
    ///
    /// # Panics
    ///
    /// Panics if `span` reaches past the live records.
    pub fn get_mut(&mut self, span: Span<T>) -> &mut [T] {
        &mut self.items[span.range()]
    }

    /// The record at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not live.
    #[must_use]
    pub fn at(&self, index: usize) -> &T {
        &self.items[index]
    }

    /// Mutable access to the record at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not live.
    pub fn at_mut(&mut self, index: usize) -> &mut T {
        &mut self.items[index]
    }

    /// Copy the records of `from` so they start at index `to`.
    ///
    /// # Panics
    ///
    /// Panics if either range is not live.
    pub fn copy_within(&mut self, from: Span<T>, to: usize) {
        self.items.copy_within(from.range(), to);
    }

    /// All live records, in allocation order.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Save the current allocation position.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            arena: self.id,
            len: self.items.len(),
        }
    }

    /// Free everything allocated since `snapshot` was taken.
    ///
    /// # Panics
    ///
    /// Panics if the snapshot was taken on another arena, or if the arena was
    /// already restored to an earlier position.
    pub fn restore(&mut self, snapshot: Snapshot) {
        assert_eq!(
            snapshot.arena, self.id,
            "snapshot restored onto a different arena"
        );
        assert!(
            snapshot.len <= self.items.len(),
            "snapshot of {} records is newer than the arena ({} live)",
            snapshot.len,
            self.items.len()
        );
        self.items.truncate(snapshot.len);
    }
}
