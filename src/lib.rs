//! refbuf
//!
//! A fixed-capacity hybrid ring buffer ("reference buffer") for constrained
//! devices.
//!
//! Records waiting for a downstream consumer (a radio, a socket) are stored
//! in fixed-size slots of a caller-provided region. Each record is either:
//!
//! - **copied inline** when it fits in the slot space at hand, or
//! - **kept by reference** to the caller's memory when it does not, so bulk
//!   data is never copied twice.
//!
//! The crate intentionally:
//! - does NOT allocate (the caller provides the region)
//! - does NOT synchronize (one producer, one consumer, same thread)
//! - does NOT own or free referenced memory
//! - does NOT grow
//!
//! All `unsafe` code goes through `slot::decode`, which turns a stored pointer
//! and length back into a slice borrowed for the payload lifetime; its one
//! caller is the internal `RefBuffer::entry` accessor.
//!
//! The region layout is bit-exact across devices; see [`layout`].
//!
//! # Example
//!
//! ```
//! use refbuf::{AppendOutcome, ReadOptions, RefBuffer, RegionConfig};
//!
//! let bulk = vec![0xABu8; 512];
//! let mut region = RegionConfig::new(8)?.allocate();
//! let mut buffer = RefBuffer::init(&mut region[..])?;
//!
//! assert_eq!(buffer.append(b"len=512"), AppendOutcome::StoredDirectly);
//! assert_eq!(buffer.append(&bulk), AppendOutcome::StoredByReference);
//!
//! let mut frame = [0u8; 64];
//! let outcome = buffer.read(&mut frame, ReadOptions::pop());
//! assert_eq!(outcome.copied, 64);
//! assert!(outcome.traversed_entry);
//! assert_eq!(buffer.used_space(), 7 + 512 - 64);
//! # Ok::<(), refbuf::RefBufError>(())
//! ```
//!
//! # Async (feature = "async-io")
//!
//! ```ignore
//! use futures_util::AsyncReadExt;
//!
//! let mut drain = buffer.drain();
//! let mut out = Vec::new();
//! drain.read_to_end(&mut out).await?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod drain;
mod error;
mod ring;
mod slot;

pub mod layout;

//
// Public surface
//

pub use config::{ReadOptions, RegionConfig};
pub use drain::Drain;
pub use error::{RefBufError, Result};
pub use ring::{AppendOutcome, Dump, ReadOutcome, RefBuffer};
pub use slot::Entry;
