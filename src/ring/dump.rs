//! Diagnostic dump of a region.

use std::fmt;

use crate::layout::{HEADER_SIZE, Header, SLOT_SIZE};

use super::RefBuffer;

/// Human-readable view of the header fields and the raw slot bytes.
///
/// # Example
///
/// ```
/// use refbuf::RefBuffer;
/// use refbuf::layout::region_len;
///
/// let mut region = [0u8; region_len(1)];
/// let mut buffer = RefBuffer::init(&mut region[..])?;
/// let _ = buffer.append(b"a");
///
/// let text = buffer.dump().to_string();
/// assert!(text.starts_with("Header: readpos = 0, r_index = 0, w_index = 0\n61 00"));
/// # Ok::<(), refbuf::RefBufError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Dump<'a> {
    header: Header,
    slots: &'a [u8],
}

impl RefBuffer<'_, '_> {
    /// Returns a diagnostic dump of this buffer.
    pub fn dump(&self) -> Dump<'_> {
        let end = HEADER_SIZE + self.slot_count() * SLOT_SIZE;
        Dump {
            header: self.header(),
            slots: &self.region()[HEADER_SIZE..end],
        }
    }
}

impl fmt::Display for Dump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Header: readpos = {}, r_index = {}, w_index = {}",
            self.header.read_pos, self.header.r_index, self.header.w_index
        )?;
        for slot in self.slots.chunks_exact(SLOT_SIZE) {
            for byte in slot {
                write!(f, "{:02x} ", byte)?;
            }
            write!(f, "   ")?;
        }
        Ok(())
    }
}
