//! Reader adapters that drain a buffer.
//!
//! - [`Drain`] - Popping reader over a [`RefBuffer`](crate::RefBuffer),
//!   implementing [`std::io::Read`] and, with the `async-io` feature,
//!   `futures_io::AsyncRead`

mod reader;

#[cfg(feature = "async-io")]
mod async_reader;

pub use reader::Drain;
