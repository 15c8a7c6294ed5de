use core::cell::{RefCell, RefMut};
use core::ops::{Deref, DerefMut};

use crate::arena::{Arena, ArenaConfig, ArenaId, ArenaKind, Snapshot};

const SCRATCH_ARENAS: usize = 2;

/// A small set of scratch arenas for temporary allocations.
///
/// Code that produces a result in one arena but needs temporary storage
/// while doing so asks for a scratch arena that is *not* the result arena:
///
/// ```
/// use wren_arena::{Arena, ScratchPool};
///
/// let pool: ScratchPool<u32> = ScratchPool::new();
/// let mut result: Arena<u32> = Arena::permanent();
///
/// let mut temp = pool.get_scratch(&[result.id()]);
/// let _ = temp.push(1);
/// let _ = temp.push(2);
/// let sum: u32 = temp.as_slice().iter().sum();
/// let _ = result.push(sum);
/// drop(temp); // everything allocated in `temp` is released here
/// ```
///
/// Nested scopes pass the arena they are already using as a conflict, so
/// the inner scope is handed the other one.
#[derive(Debug)]
pub struct ScratchPool<T> {
    arenas: [RefCell<Arena<T>>; SCRATCH_ARENAS],
}

impl<T: Copy> ScratchPool<T> {
    /// A pool of scratch arenas with default sizing.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ArenaConfig::default())
    }

    /// A pool of scratch arenas with the given sizing.
    #[must_use]
    pub fn with_config(config: ArenaConfig) -> Self {
        Self {
            arenas: [
                RefCell::new(Arena::new(ArenaKind::Scratch, config)),
                RefCell::new(Arena::new(ArenaKind::Scratch, config)),
            ],
        }
    }

    /// Acquire a scratch arena whose id is not in `conflicts`.
    ///
    /// The returned guard restores the arena to its current position when it
    /// is dropped, releasing everything allocated through it.
    ///
    /// # Panics
    ///
    /// Panics if every arena in the pool is either listed in `conflicts` or
    /// already handed out.
    #[must_use]
    pub fn get_scratch(&self, conflicts: &[ArenaId]) -> ArenaTemp<'_, T> {
        for cell in &self.arenas {
            let Ok(arena) = cell.try_borrow_mut() else {
                continue;
            };
            if conflicts.contains(&arena.id()) {
                continue;
            }
            return ArenaTemp::new(arena);
        }
        panic!(
            "no scratch arena free of {} conflicting arena(s)",
            conflicts.len()
        );
    }
}

impl<T: Copy> Default for ScratchPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A scratch arena on loan from a [`ScratchPool`].
///
/// Dereferences to the underlying [`Arena`]. Dropping the guard releases
/// every allocation made through it.
#[derive(Debug)]
pub struct ArenaTemp<'a, T: Copy> {
    arena: RefMut<'a, Arena<T>>,
    saved: Snapshot,
}

impl<'a, T: Copy> ArenaTemp<'a, T> {
    fn new(arena: RefMut<'a, Arena<T>>) -> Self {
        let saved = arena.snapshot();
        Self { arena, saved }
    }

    /// Release everything allocated since the guard was acquired, keeping the
    /// guard. Useful at the top of a loop body.
    pub fn reset(&mut self) {
        self.arena.restore(self.saved);
    }

    /// Release the scratch arena explicitly.
    pub fn release(self) {
        drop(self);
    }
}

impl<T: Copy> Deref for ArenaTemp<'_, T> {
    type Target = Arena<T>;

    fn deref(&self) -> &Arena<T> {
        &self.arena
    }
}

impl<T: Copy> DerefMut for ArenaTemp<'_, T> {
    fn deref_mut(&mut self) -> &mut Arena<T> {
        &mut self.arena
    }
}

impl<T: Copy> Drop for ArenaTemp<'_, T> {
    fn drop(&mut self) {
        self.arena.restore(self.saved);
    }
}
