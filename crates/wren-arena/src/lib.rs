//! Bump arena with scratch snapshots for the Wren HTML pipeline.
//!
//! Every table the tokenizer and tree builder produce lives in an [`Arena`]:
//! a growable, append-only store of `Copy` records addressed by [`Span`]
//! indices rather than pointers. Temporary work uses a [`ScratchPool`], whose
//! [`ArenaTemp`] guards roll their arena back to where it was when they are
//! dropped.
//!
//! # Design
//!
//! - Root arenas ([`ArenaKind::Permanent`], [`ArenaKind::Scratch`]) commit
//!   storage in [`ArenaConfig::grow_by`] steps up to a fixed reservation.
//! - [`ArenaKind::Fixed`] arenas never grow; running out is fatal.
//! - [`ArenaVec`] is a list whose buffer is a span in some arena, so lists
//!   can be stored inside other arena records.
//!
//! Exhausting an arena is a programming error and panics with an
//! "out of memory" message. There is no recoverable allocation failure.

mod arena;
mod scratch;
mod span;
mod vec;

pub use arena::{Arena, ArenaConfig, ArenaId, ArenaKind, Snapshot};
pub use scratch::{ArenaTemp, ScratchPool};
pub use span::Span;
pub use vec::ArenaVec;
