//! Async drain adapter.
//!
//! The buffer never blocks, so every poll completes immediately. This lets a
//! buffer feed any `futures_io::AsyncRead` consumer (tokio via
//! `tokio-util::compat`, async-std, smol).

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_io::AsyncRead;

use super::Drain;

impl AsyncRead for Drain<'_, '_, '_> {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut [u8],
    ) -> Poll<io::Result<usize>> {
        Poll::Ready(Ok(self.get_mut().pop_into(buf)))
    }
}
