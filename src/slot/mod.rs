//! Slot model.
//!
//! - [`Entry`] - Decoded view of one slot: empty, direct or referenced
//!
//! The byte-level codec is crate-internal; [`RefBuffer`](crate::RefBuffer)
//! is the only writer of slots.

mod entry;

pub use entry::Entry;

pub(crate) use entry::{
    clear, decode, is_direct, is_sealed, used_space, write_inline, write_reference,
};
