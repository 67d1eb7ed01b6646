//! Configuration for buffer sizing and reads.
//!
//! - [`RegionConfig`] - Slot count and the region length it needs
//! - [`ReadOptions`] - Offset and pop behavior of a read
//!
//! # Example
//!
//! ```
//! use refbuf::{ReadOptions, RefBuffer, RegionConfig};
//!
//! let config = RegionConfig::new(18)?;
//! let mut region = config.allocate();
//! let mut buffer = RefBuffer::init(&mut region[..])?;
//! assert_eq!(buffer.slot_count(), 18);
//!
//! let _ = buffer.append(b"hello");
//! let mut out = [0u8; 3];
//! let outcome = buffer.read(&mut out, ReadOptions::pop().with_offset(1));
//! assert_eq!(&out[..outcome.copied], b"ell");
//! # Ok::<(), refbuf::RefBufError>(())
//! ```

use crate::error::RefBufError;
use crate::layout::{self, MAX_SLOTS};

/// Sizing of a reference buffer region.
///
/// The buffer itself never allocates; `RegionConfig` is how callers work out
/// how large a region to reserve for a given number of slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionConfig {
    slots: usize,
}

impl RegionConfig {
    /// Creates a configuration for `slots` slots.
    ///
    /// # Errors
    ///
    /// Returns [`RefBufError::InvalidConfig`] if `slots` is zero or larger than
    /// [`MAX_SLOTS`].
    pub fn new(slots: usize) -> Result<Self, RefBufError> {
        if slots == 0 {
            return Err(RefBufError::InvalidConfig {
                message: "slot count must be non-zero",
            });
        }

        if slots > MAX_SLOTS {
            return Err(RefBufError::InvalidConfig {
                message: "slot count exceeds what 16-bit ring indices can address",
            });
        }

        Ok(Self { slots })
    }

    /// Derives the configuration a region of `region_len` bytes yields.
    ///
    /// # Errors
    ///
    /// Returns [`RefBufError::Capacity`] if the region cannot hold the header,
    /// or [`RefBufError::InvalidConfig`] if it holds no whole slot.
    pub fn from_region_len(region_len: usize) -> Result<Self, RefBufError> {
        if region_len < layout::HEADER_SIZE {
            return Err(RefBufError::Capacity {
                actual: region_len,
                required: layout::HEADER_SIZE,
            });
        }
        Self::new(layout::slot_count(region_len))
    }

    /// Returns the slot count.
    pub fn slots(&self) -> usize {
        self.slots
    }

    /// Returns the region length in bytes.
    pub fn region_len(&self) -> usize {
        layout::region_len(self.slots)
    }

    /// Returns the total number of bytes the slots can hold inline.
    pub fn inline_capacity(&self) -> usize {
        self.slots * layout::INLINE_CAPACITY
    }

    /// Allocates a zeroed region of [`RegionConfig::region_len`] bytes.
    pub fn allocate(&self) -> Vec<u8> {
        vec![0u8; self.region_len()]
    }
}

/// Controls how a read walks the buffer.
///
/// The default is a non-destructive read from the first unread byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ReadOptions {
    /// Bytes to skip before copying.
    pub offset: usize,

    /// Whether to discard the skipped and copied bytes.
    pub pop: bool,
}

impl ReadOptions {
    /// Non-destructive read at offset 0.
    pub const fn peek() -> Self {
        Self {
            offset: 0,
            pop: false,
        }
    }

    /// Destructive read at offset 0.
    pub const fn pop() -> Self {
        Self {
            offset: 0,
            pop: true,
        }
    }

    /// Sets the number of bytes to skip.
    pub const fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Sets whether the read pops.
    pub const fn with_pop(mut self, pop: bool) -> Self {
        self.pop = pop;
        self
    }
}
