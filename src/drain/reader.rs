//! Synchronous drain adapter.

use std::io::{self, Read};

use crate::config::ReadOptions;
use crate::ring::RefBuffer;

/// A reader that pops bytes off a [`RefBuffer`].
///
/// Every read is a popping read at offset 0. Reads return `Ok(0)` once the
/// buffer is empty; appending more data makes the drain readable again.
///
/// # Example
///
/// ```
/// use std::io::Read;
/// use refbuf::RefBuffer;
///
/// let payload = vec![b'p'; 64];
/// let mut region = [0u8; 128];
/// let mut buffer = RefBuffer::init(&mut region[..])?;
/// let _ = buffer.append(b"hdr:");
/// let _ = buffer.append(&payload);
///
/// let mut drain = buffer.drain();
/// let mut out = Vec::new();
/// drain.read_to_end(&mut out)?;
/// assert_eq!(out.len(), 68);
/// assert_eq!(drain.freed_refs(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Drain<'b, 'r, 'd> {
    buffer: &'b mut RefBuffer<'r, 'd>,
    freed_refs: usize,
}

impl<'b, 'r, 'd> Drain<'b, 'r, 'd> {
    /// Creates a drain over `buffer`.
    pub fn new(buffer: &'b mut RefBuffer<'r, 'd>) -> Self {
        Self {
            buffer,
            freed_refs: 0,
        }
    }

    /// Returns the number of referenced slots released so far.
    pub fn freed_refs(&self) -> usize {
        self.freed_refs
    }

    /// Returns the number of bytes left to drain.
    pub fn remaining(&self) -> usize {
        self.buffer.used_space()
    }

    /// Pops into `buf`, accumulating the released references.
    pub(crate) fn pop_into(&mut self, buf: &mut [u8]) -> usize {
        let outcome = self.buffer.read(buf, ReadOptions::pop());
        self.freed_refs += outcome.freed_refs;
        outcome.copied
    }
}

impl Read for Drain<'_, '_, '_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.pop_into(buf))
    }
}

impl<'r, 'd> RefBuffer<'r, 'd> {
    /// Returns a popping reader over this buffer.
    pub fn drain(&mut self) -> Drain<'_, 'r, 'd> {
        Drain::new(self)
    }
}
