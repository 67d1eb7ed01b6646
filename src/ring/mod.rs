//! The reference buffer.
//!
//! - [`RefBuffer`] - Ring of slots over a caller-provided region
//! - [`AppendOutcome`] - Rejected / stored by reference / stored directly
//! - [`ReadOutcome`] - Bytes copied, references freed, slot traversal
//! - [`Dump`] - Diagnostic view of the raw region

mod append;
mod buffer;
mod dump;
mod read;

pub use append::AppendOutcome;
pub use buffer::RefBuffer;
pub use dump::Dump;
pub use read::ReadOutcome;
