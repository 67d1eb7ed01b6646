//! Read and consume engine.
//!
//! A read treats the unread bytes of every occupied slot, from the read index
//! to the write index, as one concatenation. It skips `offset` bytes of it,
//! copies up to the requested amount, and with `pop` discards everything it
//! skipped or copied. Slots a popping read fully consumes are zeroed.

use bytes::{BufMut, Bytes, BytesMut};

use crate::config::ReadOptions;
use crate::layout::Header;
use crate::slot;

use super::RefBuffer;

/// Result of a read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ReadOutcome {
    /// Bytes copied to the caller (or discarded, for
    /// [`RefBuffer::discard`]).
    pub copied: usize,

    /// Referenced slots a popping read released. The caller may reclaim the
    /// memory behind each of them.
    pub freed_refs: usize,

    /// Whether the read moved past at least one whole slot. After a popping
    /// read that sets this, the next append is guaranteed to succeed.
    pub traversed_entry: bool,
}

/// Where a scan stopped.
#[derive(Debug)]
struct Walk {
    copied: usize,
    consumed: usize,
    r_index: usize,
    read_pos: usize,
}

impl<'r, 'd> RefBuffer<'r, 'd> {
    /// Reads into `out`, skipping `opts.offset` bytes first.
    ///
    /// Copies at most `out.len()` bytes; fewer if less data is stored. With
    /// `opts.pop`, the skipped and copied bytes are removed. An offset past
    /// the stored bytes reads nothing and leaves the buffer untouched.
    ///
    /// # Example
    ///
    /// ```
    /// use refbuf::{ReadOptions, RefBuffer};
    ///
    /// let mut region = [0u8; 64];
    /// let mut buffer = RefBuffer::init(&mut region[..])?;
    /// let _ = buffer.append(b"hello");
    ///
    /// let mut out = [0u8; 16];
    /// let outcome = buffer.read(&mut out, ReadOptions::peek().with_offset(2));
    /// assert_eq!(&out[..outcome.copied], b"llo");
    /// assert_eq!(buffer.used_space(), 5);
    /// # Ok::<(), refbuf::RefBufError>(())
    /// ```
    pub fn read(&mut self, out: &mut [u8], opts: ReadOptions) -> ReadOutcome {
        let mut filled = 0;
        let walk = self.walk(out.len(), opts.offset, |chunk| {
            out[filled..filled + chunk.len()].copy_from_slice(chunk);
            filled += chunk.len();
        });
        self.settle(walk, opts.pop)
    }

    /// Reads into `out` without removing anything.
    pub fn peek(&self, out: &mut [u8], offset: usize) -> ReadOutcome {
        let mut filled = 0;
        let walk = self.walk(out.len(), offset, |chunk| {
            out[filled..filled + chunk.len()].copy_from_slice(chunk);
            filled += chunk.len();
        });
        walk.map(|walk| ReadOutcome {
            copied: walk.copied,
            freed_refs: 0,
            traversed_entry: walk.consumed > 0,
        })
        .unwrap_or_default()
    }

    /// Reads up to `max` bytes into `buf`, bounded by its remaining capacity.
    pub fn read_buf<B: BufMut>(&mut self, buf: &mut B, max: usize, opts: ReadOptions) -> ReadOutcome {
        let max = max.min(buf.remaining_mut());
        let walk = self.walk(max, opts.offset, |chunk| buf.put_slice(chunk));
        self.settle(walk, opts.pop)
    }

    /// Reads up to `max` bytes into a new [`Bytes`].
    ///
    /// # Example
    ///
    /// ```
    /// use refbuf::{ReadOptions, RefBuffer};
    ///
    /// let mut region = [0u8; 64];
    /// let mut buffer = RefBuffer::init(&mut region[..])?;
    /// let _ = buffer.append(b"abc");
    /// let _ = buffer.append(b"def");
    ///
    /// let (bytes, outcome) = buffer.read_to_bytes(4, ReadOptions::pop());
    /// assert_eq!(&bytes[..], b"abcd");
    /// assert_eq!(outcome.copied, 4);
    /// assert_eq!(buffer.used_space(), 2);
    /// # Ok::<(), refbuf::RefBufError>(())
    /// ```
    pub fn read_to_bytes(&mut self, max: usize, opts: ReadOptions) -> (Bytes, ReadOutcome) {
        let len = max.min(self.used_space().saturating_sub(opts.offset));
        let mut buf = BytesMut::with_capacity(len);
        let outcome = self.read_buf(&mut buf, len, opts);
        (buf.freeze(), outcome)
    }

    /// Pops up to `n` bytes without copying them.
    ///
    /// `copied` in the outcome counts the discarded bytes.
    pub fn discard(&mut self, n: usize) -> ReadOutcome {
        let walk = self.walk(n, 0, |_| {});
        self.settle(walk, true)
    }

    /// Scans from the read position without mutating anything.
    ///
    /// Returns `None` when there is nothing to scan: the buffer is empty or
    /// `offset` lies past the stored bytes.
    fn walk(&self, max: usize, offset: usize, mut sink: impl FnMut(&[u8])) -> Option<Walk> {
        let header = self.header();
        if self.is_empty_at(&header) {
            return None;
        }

        let mut index = header.r_index as usize;
        let mut pos = header.read_pos as usize;
        let mut skip = offset;
        let mut remaining = max;
        let mut consumed = 0;
        let mut stop = None;

        for _ in 0..self.span(&header) {
            let entry = self.entry(index);
            let bytes = entry.as_bytes();
            if bytes.is_empty() {
                // Only the write slot can be empty.
                break;
            }

            let unread = &bytes[pos..];
            let skipped = skip.min(unread.len());
            skip -= skipped;
            let take = remaining.min(unread.len() - skipped);
            if take > 0 {
                sink(&unread[skipped..skipped + take]);
                remaining -= take;
            }

            let used = skipped + take;
            if used < unread.len() {
                stop = Some((index, pos + used));
                break;
            }

            consumed += 1;
            pos = 0;
            index = self.next_index(index);
        }

        // Nothing is emitted until the offset is used up, so an offset past
        // the stored bytes leaves no trace.
        if skip > 0 {
            return None;
        }

        // Once everything is consumed the reader parks on the write slot.
        let (r_index, read_pos) = stop.unwrap_or((header.w_index as usize, 0));
        Some(Walk {
            copied: max - remaining,
            consumed,
            r_index,
            read_pos,
        })
    }

    fn settle(&mut self, walk: Option<Walk>, pop: bool) -> ReadOutcome {
        let Some(walk) = walk else {
            return ReadOutcome::default();
        };

        let freed_refs = if pop { self.commit(&walk) } else { 0 };
        ReadOutcome {
            copied: walk.copied,
            freed_refs,
            traversed_entry: walk.consumed > 0,
        }
    }

    /// Zeroes the slots `walk` consumed and moves the read cursor.
    fn commit(&mut self, walk: &Walk) -> usize {
        let mut header = self.header();
        let mut index = header.r_index as usize;
        let mut freed = 0;

        for _ in 0..walk.consumed {
            let slot = self.slot_mut(index);
            if !slot::is_direct(slot) {
                freed += 1;
            }
            slot::clear(slot);
            index = self.next_index(index);
        }

        header = Header {
            read_pos: walk.read_pos as u32,
            r_index: walk.r_index as u16,
            ..header
        };
        // A write index held back by the old read slot can move on now.
        if slot::is_sealed(self.slot(header.w_index as usize)) {
            self.advance(&mut header);
        }
        self.set_header(header);

        tracing::trace!(
            copied = walk.copied,
            freed,
            r_index = header.r_index,
            read_pos = header.read_pos,
            w_index = header.w_index,
            "popped"
        );
        freed
    }
}
