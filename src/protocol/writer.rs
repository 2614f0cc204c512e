//! Response writing
//!
//! Encodes replies onto the outbound half of the connection.

use crate::protocol::Response;
use log::debug;
use std::io;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

pub struct ResponseWriter<W> {
    inner: BufWriter<W>,
}

impl<W: AsyncWrite + Unpin> ResponseWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner: BufWriter::new(inner),
        }
    }

    /// Writes and flushes a reply. `None` writes nothing.
    pub async fn send(&mut self, response: Option<&Response>) -> io::Result<()> {
        let Some(response) = response else {
            return Ok(());
        };

        let encoded = response.encode();
        for line in encoded.lines() {
            debug!("> {}", line);
        }
        self.inner.write_all(encoded.as_bytes()).await?;
        self.inner.flush().await
    }

    /// Flushes pending output, then shuts the transport down.
    ///
    /// The shutdown is attempted even when the flush fails; the first error
    /// is returned.
    pub async fn close(&mut self) -> io::Result<()> {
        let flushed = self.inner.flush().await;
        let shut = self.inner.shutdown().await;
        flushed.and(shut)
    }
}
