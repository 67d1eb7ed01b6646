//! Append engine.
//!
//! Each append picks one of three placements:
//!
//! - extend the inline bytes of the current write slot, spilling into the next
//!   slot when the payload fits across both;
//! - copy into an empty slot when the payload fits inline;
//! - record a reference in an empty slot otherwise.
//!
//! A slot that holds a reference or a full inline payload is *sealed*. The
//! write index moves past a sealed slot unless the next slot is the read
//! slot; in that case it stays, and the buffer is full until a popping read
//! frees the read slot and moves it on. Appends never write partially.

use crate::layout::{Header, INLINE_CAPACITY};
use crate::slot;

use super::RefBuffer;

/// Largest payload a referenced slot can describe.
const MAX_REFERENCE_LEN: usize = i32::MAX as usize;

/// Result of [`RefBuffer::append`].
///
/// The discriminants match the wire-level return codes (0, 1, 2).
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AppendOutcome {
    /// No room; nothing was written. Retry after a popping read.
    Rejected = 0,
    /// The buffer recorded a reference to the caller's bytes.
    StoredByReference = 1,
    /// The bytes were copied into the buffer.
    StoredDirectly = 2,
}

impl AppendOutcome {
    /// Returns true unless the append was rejected.
    pub fn is_stored(self) -> bool {
        self != AppendOutcome::Rejected
    }

    /// Returns the numeric return code.
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl<'r, 'd> RefBuffer<'r, 'd> {
    /// Appends `data`.
    ///
    /// Payloads that fit inline (possibly across the current write slot and
    /// the next one) are copied; larger payloads are kept by reference and
    /// must stay valid for `'d`, which the borrow checker enforces.
    ///
    /// # Example
    ///
    /// ```
    /// use refbuf::{AppendOutcome, RefBuffer, RegionConfig};
    /// use refbuf::layout::INLINE_CAPACITY;
    ///
    /// let mut region = RegionConfig::new(2)?.allocate();
    /// let mut buffer = RefBuffer::init(&mut region[..])?;
    ///
    /// let exact = vec![1u8; INLINE_CAPACITY];
    /// assert_eq!(buffer.append(&exact), AppendOutcome::StoredDirectly);
    /// assert_eq!(buffer.write_index(), 1);
    /// # Ok::<(), refbuf::RefBufError>(())
    /// ```
    pub fn append(&mut self, data: &'d [u8]) -> AppendOutcome {
        if data.len() > MAX_REFERENCE_LEN {
            tracing::warn!(len = data.len(), "payload too large to reference");
            return AppendOutcome::Rejected;
        }

        if self.slot_count() == 0 || self.is_full() {
            return self.reject(data.len());
        }

        if data.is_empty() {
            return AppendOutcome::StoredDirectly;
        }

        let mut header = self.header();
        let w = header.w_index as usize;
        let next = self.next_index(w);
        let has_next = next != header.r_index as usize;

        let current = self.slot(w);
        // A sealed write slot only survives while the buffer is full.
        debug_assert!(!slot::is_sealed(current));
        let used = slot::used_space(current);
        let outcome = if used == 0 {
            self.store_in_empty(&mut header, data)
        } else {
            let free = INLINE_CAPACITY - used;
            if data.len() <= free {
                slot::write_inline(self.slot_mut(w), used, data);
                if data.len() == free {
                    self.advance(&mut header);
                }
                AppendOutcome::StoredDirectly
            } else {
                let max_direct = free + if has_next { INLINE_CAPACITY } else { 0 };
                if data.len() > max_direct {
                    if !has_next {
                        return self.reject(data.len());
                    }
                    // Leave the partial slot behind and reference from the next one.
                    header.w_index = next as u16;
                    self.store_reference(&mut header, data)
                } else {
                    let (head, rest) = data.split_at(free);
                    slot::write_inline(self.slot_mut(w), used, head);
                    header.w_index = next as u16;
                    self.store_in_empty(&mut header, rest)
                }
            }
        };

        self.set_header(header);
        tracing::trace!(
            len = data.len(),
            outcome = ?outcome,
            w_index = header.w_index,
            "appended"
        );
        outcome
    }

    /// Stores `data` in the empty slot at `header.w_index`.
    fn store_in_empty(&mut self, header: &mut Header, data: &'d [u8]) -> AppendOutcome {
        if data.len() > INLINE_CAPACITY {
            return self.store_reference(header, data);
        }
        slot::write_inline(self.slot_mut(header.w_index as usize), 0, data);
        if data.len() == INLINE_CAPACITY {
            self.advance(header);
        }
        AppendOutcome::StoredDirectly
    }

    /// Records a reference to `data` in the empty slot at `header.w_index`.
    fn store_reference(&mut self, header: &mut Header, data: &'d [u8]) -> AppendOutcome {
        slot::write_reference(self.slot_mut(header.w_index as usize), data);
        self.advance(header);
        AppendOutcome::StoredByReference
    }

    /// Moves the write index past a sealed slot, unless that would land on
    /// the read slot.
    pub(super) fn advance(&self, header: &mut Header) {
        let next = self.next_index(header.w_index as usize);
        if next != header.r_index as usize {
            header.w_index = next as u16;
        }
    }

    fn reject(&self, len: usize) -> AppendOutcome {
        let header = self.header();
        tracing::debug!(
            len,
            r_index = header.r_index,
            w_index = header.w_index,
            "append rejected: no space"
        );
        AppendOutcome::Rejected
    }
}
