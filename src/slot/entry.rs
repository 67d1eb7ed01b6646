//! The Entry type and the slot codec.
//!
//! A slot is [`SLOT_SIZE`] bytes with two overlapping encodings:
//!
//! ```text
//! referenced: [ pointer (native, POINTER_SIZE) | length (i32 LE, 4) ]
//! direct:     [ payload (INLINE_CAPACITY)              | tag|len (1) ]
//! ```
//!
//! The trailing byte of the direct form overlaps the most significant byte of
//! the little-endian length. Its top bit is the direct tag, which is also the
//! sign bit of the length, so a referenced length is never negative. An
//! all-zero slot is a referenced entry of length 0: the empty sentinel.

use std::fmt;

use crate::layout::{DIRECT_LEN_MASK, DIRECT_TAG, INLINE_CAPACITY, POINTER_SIZE, SLOT_SIZE};

/// Decoded view of one slot.
///
/// # Example
///
/// ```
/// use refbuf::{Entry, RefBuffer};
///
/// let mut region = [0u8; 64];
/// let mut buffer = RefBuffer::init(&mut region[..])?;
/// let _ = buffer.append(b"hi");
///
/// let first = buffer.entries().next();
/// assert_eq!(first, Some(Entry::Direct(b"hi")));
/// # Ok::<(), refbuf::RefBufError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry<'a> {
    /// No data.
    Empty,
    /// Bytes copied inline into the slot.
    Direct(&'a [u8]),
    /// Bytes owned by the caller and borrowed by the buffer.
    Referenced(&'a [u8]),
}

impl<'a> Entry<'a> {
    /// Returns the stored bytes (empty for [`Entry::Empty`]).
    pub fn as_bytes(&self) -> &'a [u8] {
        match *self {
            Entry::Empty => &[],
            Entry::Direct(bytes) | Entry::Referenced(bytes) => bytes,
        }
    }

    /// Returns the number of stored bytes.
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Returns true if the entry holds no data.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true for inline entries.
    pub fn is_direct(&self) -> bool {
        matches!(self, Entry::Direct(_))
    }

    /// Returns true for referenced entries.
    pub fn is_referenced(&self) -> bool {
        matches!(self, Entry::Referenced(_))
    }
}

impl fmt::Display for Entry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Empty => write!(f, "Empty"),
            Entry::Direct(bytes) => write!(f, "Direct({} bytes)", bytes.len()),
            Entry::Referenced(bytes) => write!(f, "Referenced({} bytes)", bytes.len()),
        }
    }
}

#[inline]
fn trailer(slot: &[u8]) -> u8 {
    slot[SLOT_SIZE - 1]
}

fn reference_len(slot: &[u8]) -> usize {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&slot[POINTER_SIZE..SLOT_SIZE]);
    // The sign bit doubles as the direct tag, so this is never negative here.
    i32::from_le_bytes(raw) as u32 as usize
}

fn reference_ptr(slot: &[u8]) -> *const u8 {
    let mut raw = [0u8; POINTER_SIZE];
    raw.copy_from_slice(&slot[..POINTER_SIZE]);
    std::ptr::with_exposed_provenance(usize::from_ne_bytes(raw))
}

/// Returns whether `slot` holds inline data.
#[inline]
pub(crate) fn is_direct(slot: &[u8]) -> bool {
    trailer(slot) & DIRECT_TAG != 0
}

/// Returns the number of bytes stored in `slot`.
pub(crate) fn used_space(slot: &[u8]) -> usize {
    if is_direct(slot) {
        (trailer(slot) & DIRECT_LEN_MASK) as usize
    } else {
        reference_len(slot)
    }
}

/// Returns whether `slot` can take no more bytes: a reference, or a full
/// direct slot.
pub(crate) fn is_sealed(slot: &[u8]) -> bool {
    let used = used_space(slot);
    used > 0 && (!is_direct(slot) || used == INLINE_CAPACITY)
}

/// Copies `data` inline into `slot` after its first `at` bytes.
///
/// `slot` must be empty or direct, and `at + data.len()` must not exceed
/// [`INLINE_CAPACITY`].
pub(crate) fn write_inline(slot: &mut [u8], at: usize, data: &[u8]) {
    let end = at + data.len();
    debug_assert!(end <= INLINE_CAPACITY);
    slot[at..end].copy_from_slice(data);
    slot[SLOT_SIZE - 1] = DIRECT_TAG | end as u8;
}

/// Records a reference to `data` in `slot`.
///
/// `data.len()` must be in `1..=i32::MAX`.
pub(crate) fn write_reference(slot: &mut [u8], data: &[u8]) {
    debug_assert!(!data.is_empty() && data.len() <= i32::MAX as usize);
    let addr = data.as_ptr().expose_provenance();
    slot[..POINTER_SIZE].copy_from_slice(&addr.to_ne_bytes());
    slot[POINTER_SIZE..SLOT_SIZE].copy_from_slice(&(data.len() as i32).to_le_bytes());
}

/// Returns `slot` to the empty state.
pub(crate) fn clear(slot: &mut [u8]) {
    slot.fill(0);
}

/// Decodes `slot`.
///
/// # Safety
///
/// If `slot` is a non-empty referenced entry, its pointer and length must
/// describe memory that is valid and unmodified for reads during `'a`.
#[allow(unsafe_code)]
pub(crate) unsafe fn decode<'a>(slot: &'a [u8]) -> Entry<'a> {
    let used = used_space(slot);
    if used == 0 {
        Entry::Empty
    } else if is_direct(slot) {
        Entry::Direct(&slot[..used])
    } else {
        // SAFETY: the caller guarantees the referenced memory outlives 'a.
        Entry::Referenced(unsafe { std::slice::from_raw_parts(reference_ptr(slot), used) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(unsafe_code)]
    fn decode_slot(slot: &[u8]) -> Entry<'_> {
        // SAFETY: every reference written in these tests points at a live
        // static or a local that outlives the decoded entry.
        unsafe { decode(slot) }
    }

    #[test]
    fn test_zeroed_slot_is_empty() {
        let slot = [0u8; SLOT_SIZE];
        assert!(!is_direct(&slot));
        assert_eq!(used_space(&slot), 0);
        assert!(!is_sealed(&slot));
        assert_eq!(decode_slot(&slot), Entry::Empty);
    }

    #[test]
    fn test_write_inline_sets_tag_and_len() {
        let mut slot = [0u8; SLOT_SIZE];
        write_inline(&mut slot, 0, b"ab");
        assert!(is_direct(&slot));
        assert_eq!(used_space(&slot), 2);
        assert_eq!(slot[SLOT_SIZE - 1], 0x82);

        write_inline(&mut slot, 2, b"c");
        assert_eq!(used_space(&slot), 3);
        assert_eq!(decode_slot(&slot), Entry::Direct(b"abc"));
        assert!(!is_sealed(&slot));
    }

    #[test]
    fn test_full_inline_slot_is_sealed() {
        let mut slot = [0u8; SLOT_SIZE];
        let data = vec![7u8; INLINE_CAPACITY];
        write_inline(&mut slot, 0, &data);
        assert!(is_sealed(&slot));
        assert_eq!(used_space(&slot), INLINE_CAPACITY);
    }

    #[test]
    fn test_reference_length_is_little_endian() {
        static PAYLOAD: [u8; 300] = [0x5A; 300];
        let mut slot = [0u8; SLOT_SIZE];
        write_reference(&mut slot, &PAYLOAD);

        assert_eq!(&slot[POINTER_SIZE..], &[0x2C, 0x01, 0x00, 0x00]);
        assert!(!is_direct(&slot));
        assert!(is_sealed(&slot));
        assert_eq!(used_space(&slot), 300);

        match decode_slot(&slot) {
            Entry::Referenced(bytes) => {
                assert_eq!(bytes.as_ptr(), PAYLOAD.as_ptr());
                assert_eq!(bytes.len(), 300);
            }
            other => panic!("expected a referenced entry, got {other}"),
        }
    }

    #[test]
    fn test_clear() {
        let mut slot = [0u8; SLOT_SIZE];
        write_inline(&mut slot, 0, b"xyz");
        clear(&mut slot);
        assert_eq!(slot, [0u8; SLOT_SIZE]);
    }

    #[test]
    fn test_entry_accessors() {
        let entry = Entry::Referenced(b"hello");
        assert_eq!(entry.len(), 5);
        assert!(entry.is_referenced());
        assert!(!entry.is_direct());
        assert_eq!(entry.to_string(), "Referenced(5 bytes)");
        assert!(Entry::Empty.is_empty());
        assert_eq!(Entry::Empty.as_bytes(), b"");
    }
}
