//! The RefBuffer type: region ownership, state accessors and queries.

use std::fmt;
use std::marker::PhantomData;

use crate::error::RefBufError;
use crate::layout::{self, HEADER_SIZE, Header, SLOT_SIZE};
use crate::slot::{self, Entry};

/// A fixed-capacity ring of slots over a caller-provided memory region.
///
/// Small appends are copied inline into slots; appends that do not fit are
/// recorded as references to the caller's memory. The region layout is
/// bit-exact (see [`crate::layout`]), so a region can be inspected or shipped
/// as raw bytes through [`RefBuffer::region`].
///
/// # Lifetimes
///
/// - `'r` is the borrow of the backing region.
/// - `'d` is the lifetime of every payload passed to
///   [`append`](RefBuffer::append). Referenced payloads stay borrowed for as
///   long as the buffer exists, so they cannot be freed or mutated while the
///   buffer may still read them. `freed_refs` in a
///   [`ReadOutcome`](crate::ReadOutcome) reports when a reference has been
///   let go.
///
/// # Threading
///
/// Not synchronized. One producer calls `append`, one consumer reads; sharing
/// across threads requires external locking.
///
/// # Example
///
/// ```
/// use refbuf::{AppendOutcome, ReadOptions, RefBuffer};
///
/// let large = vec![b'x'; 200];
/// let mut region = [0u8; 128];
/// let mut buffer = RefBuffer::init(&mut region[..])?;
///
/// assert_eq!(buffer.append(b"id:"), AppendOutcome::StoredDirectly);
/// assert_eq!(buffer.append(&large), AppendOutcome::StoredByReference);
/// assert_eq!(buffer.used_space(), 203);
///
/// let mut out = [0u8; 8];
/// let outcome = buffer.read(&mut out, ReadOptions::pop());
/// assert_eq!(&out[..outcome.copied], b"id:xxxxx");
/// # Ok::<(), refbuf::RefBufError>(())
/// ```
pub struct RefBuffer<'r, 'd> {
    region: &'r mut [u8],
    slots: usize,
    _refs: PhantomData<&'d [u8]>,
}

impl<'r, 'd> RefBuffer<'r, 'd> {
    /// Initializes a buffer over `region`, zero-filling it.
    ///
    /// The slot count is `floor((region.len() - HEADER_SIZE) / SLOT_SIZE)`,
    /// capped at [`MAX_SLOTS`](crate::layout::MAX_SLOTS). A region that holds
    /// only the header yields a buffer that rejects every append.
    ///
    /// # Errors
    ///
    /// Returns [`RefBufError::Capacity`] if `region` is shorter than
    /// [`HEADER_SIZE`].
    pub fn init(region: &'r mut [u8]) -> Result<Self, RefBufError> {
        if region.len() < HEADER_SIZE {
            return Err(RefBufError::Capacity {
                actual: region.len(),
                required: HEADER_SIZE,
            });
        }
        region.fill(0);
        let slots = layout::slot_count(region.len());
        tracing::trace!(region_len = region.len(), slots, "initialized reference buffer");
        Ok(Self {
            region,
            slots,
            _refs: PhantomData,
        })
    }

    /// Returns the number of slots.
    pub fn slot_count(&self) -> usize {
        self.slots
    }

    /// Returns the raw region bytes: header followed by the slots.
    pub fn region(&self) -> &[u8] {
        &self.region[..]
    }

    /// Returns the index of the slot holding the next unread byte.
    pub fn read_index(&self) -> usize {
        self.header().r_index as usize
    }

    /// Returns the index of the slot accepting writes.
    pub fn write_index(&self) -> usize {
        self.header().w_index as usize
    }

    /// Returns how many bytes of the slot at the read index were consumed.
    pub fn read_pos(&self) -> usize {
        self.header().read_pos as usize
    }

    /// Returns true if no unread byte is stored.
    pub fn is_empty(&self) -> bool {
        self.is_empty_at(&self.header())
    }

    /// Returns true if no append can succeed until a popping read.
    ///
    /// The write slot is sealed (a reference or a full inline slot) and the
    /// slot after it is the read slot.
    pub fn is_full(&self) -> bool {
        if self.slots == 0 {
            return false;
        }
        let header = self.header();
        let w = header.w_index as usize;
        slot::is_sealed(self.slot(w)) && self.next_index(w) == header.r_index as usize
    }

    /// Returns the number of unread bytes.
    pub fn used_space(&self) -> usize {
        let header = self.header();
        let mut index = header.r_index as usize;
        let mut total = 0;
        for _ in 0..self.span(&header) {
            total += slot::used_space(self.slot(index));
            index = self.next_index(index);
        }
        total - header.read_pos as usize
    }

    /// Returns true if the next append is guaranteed to succeed, whatever its
    /// size.
    ///
    /// That holds when the write slot or the slot after it is completely
    /// empty: a referenced append needs only one empty slot.
    pub fn has_free_slot(&self) -> bool {
        if self.slots == 0 {
            return false;
        }
        let w = self.header().w_index as usize;
        slot::used_space(self.slot(w)) == 0
            || slot::used_space(self.slot(self.next_index(w))) == 0
    }

    /// Iterates over the occupied slots from the read index to the write
    /// index.
    ///
    /// Entries are whole slots: the first one still includes the bytes
    /// already consumed through [`RefBuffer::read_pos`].
    pub fn entries(&self) -> impl Iterator<Item = Entry<'_>> + '_ {
        let header = self.header();
        let start = header.r_index as usize;
        (0..self.span(&header))
            .map(move |step| self.entry((start + step) % self.slots))
            .filter(|entry| !entry.is_empty())
    }

    pub(crate) fn header(&self) -> Header {
        Header::read(&self.region[..])
    }

    pub(crate) fn set_header(&mut self, header: Header) {
        header.write(&mut self.region[..]);
    }

    pub(crate) fn slot(&self, index: usize) -> &[u8] {
        let start = HEADER_SIZE + index * SLOT_SIZE;
        &self.region[start..start + SLOT_SIZE]
    }

    pub(crate) fn slot_mut(&mut self, index: usize) -> &mut [u8] {
        let start = HEADER_SIZE + index * SLOT_SIZE;
        &mut self.region[start..start + SLOT_SIZE]
    }

    /// Decodes the slot at `index`.
    #[allow(unsafe_code)]
    pub(crate) fn entry(&self, index: usize) -> Entry<'_> {
        // SAFETY: references are only written by `append`, which takes
        // `&'d [u8]`. `'d` outlives `self`, and `init` zeroed every slot, so
        // any referenced slot points at live, shared-borrowed memory.
        unsafe { slot::decode(self.slot(index)) }
    }

    #[inline]
    pub(crate) fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.slots
    }

    /// Emptiness as seen through an already decoded `header`.
    pub(crate) fn is_empty_at(&self, header: &Header) -> bool {
        if self.slots == 0 {
            return true;
        }
        header.r_index == header.w_index && slot::used_space(self.slot(header.r_index as usize)) == 0
    }

    /// Number of slots from the read index through the write index, or 0
    /// when the buffer is empty.
    pub(crate) fn span(&self, header: &Header) -> usize {
        if self.is_empty_at(header) {
            return 0;
        }
        let r = header.r_index as usize;
        let w = header.w_index as usize;
        (w + self.slots - r) % self.slots + 1
    }
}

impl fmt::Debug for RefBuffer<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = self.header();
        f.debug_struct("RefBuffer")
            .field("slots", &self.slots)
            .field("read_pos", &header.read_pos)
            .field("r_index", &header.r_index)
            .field("w_index", &header.w_index)
            .field("used_space", &self.used_space())
            .finish()
    }
}
