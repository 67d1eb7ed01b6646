//! Region layout: header and slot geometry.
//!
//! A region is a header followed by `N` fixed-size slots:
//!
//! ```text
//! +----------+--------+--------+--------+-----+--------+
//! | read_pos | r_idx  | w_idx  | slot 0 | ... | slot N-1
//! |   u32    |  u16   |  u16   |        |     |
//! +----------+--------+--------+--------+-----+--------+
//! ```
//!
//! Header fields are little-endian and packed (8 bytes). A slot is
//! `SLOT_SIZE` bytes and holds either inline bytes or a reference; see
//! [`crate::slot`] for the two encodings.

use std::mem::size_of;

/// Width of the pointer field in a referenced slot.
pub const POINTER_SIZE: usize = size_of::<*const u8>();

/// Width of the little-endian length field in a referenced slot.
pub const LENGTH_SIZE: usize = size_of::<i32>();

/// Size of one slot in bytes.
pub const SLOT_SIZE: usize = POINTER_SIZE + LENGTH_SIZE;

/// Number of payload bytes a direct slot can hold inline.
///
/// The last byte of a slot carries the direct tag and the inline length.
pub const INLINE_CAPACITY: usize = SLOT_SIZE - 1;

/// Size of the packed region header in bytes.
pub const HEADER_SIZE: usize = size_of::<u32>() + 2 * size_of::<u16>();

/// Largest slot count the 16-bit ring indices can address.
pub const MAX_SLOTS: usize = u16::MAX as usize + 1;

/// Bit 7 of the trailing byte marks a direct slot.
pub(crate) const DIRECT_TAG: u8 = 0x80;

/// Bits 0-6 of the trailing byte hold the inline length.
pub(crate) const DIRECT_LEN_MASK: u8 = 0x7F;

// The 7-bit length field must cover the whole inline area.
const _: () = assert!(
    INLINE_CAPACITY <= DIRECT_LEN_MASK as usize,
    "inline capacity must fit in the 7-bit length field"
);

/// Returns how many slots fit in a region of `region_len` bytes.
///
/// Regions smaller than the header hold zero slots. The count is capped at
/// [`MAX_SLOTS`].
///
/// # Example
///
/// ```
/// use refbuf::layout::{self, HEADER_SIZE, SLOT_SIZE};
///
/// assert_eq!(layout::slot_count(HEADER_SIZE + 3 * SLOT_SIZE + 1), 3);
/// assert_eq!(layout::slot_count(HEADER_SIZE - 1), 0);
/// ```
pub const fn slot_count(region_len: usize) -> usize {
    if region_len < HEADER_SIZE {
        return 0;
    }
    let slots = (region_len - HEADER_SIZE) / SLOT_SIZE;
    if slots > MAX_SLOTS { MAX_SLOTS } else { slots }
}

/// Returns the region length needed for `slots` slots.
pub const fn region_len(slots: usize) -> usize {
    HEADER_SIZE + slots * SLOT_SIZE
}

/// Decoded region header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Header {
    /// Bytes already consumed from the slot at `r_index`.
    pub read_pos: u32,
    /// Slot holding the next unread byte.
    pub r_index: u16,
    /// Slot currently accepting writes.
    pub w_index: u16,
}

impl Header {
    /// Decodes a header from the first [`HEADER_SIZE`] bytes of `region`.
    ///
    /// `region` must be at least [`HEADER_SIZE`] bytes long.
    pub(crate) fn read(region: &[u8]) -> Self {
        let mut read_pos = [0u8; 4];
        read_pos.copy_from_slice(&region[0..4]);
        Self {
            read_pos: u32::from_le_bytes(read_pos),
            r_index: u16::from_le_bytes([region[4], region[5]]),
            w_index: u16::from_le_bytes([region[6], region[7]]),
        }
    }

    /// Encodes this header into the first [`HEADER_SIZE`] bytes of `region`.
    pub(crate) fn write(&self, region: &mut [u8]) {
        region[0..4].copy_from_slice(&self.read_pos.to_le_bytes());
        region[4..6].copy_from_slice(&self.r_index.to_le_bytes());
        region[6..8].copy_from_slice(&self.w_index.to_le_bytes());
    }
}
