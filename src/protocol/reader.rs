//! Line framing
//!
//! Turns the inbound byte stream into protocol lines. A line that arrives
//! over several reads is reassembled before it is returned.

use std::io;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

/// One unit read off the wire.
#[derive(Debug, PartialEq, Eq)]
pub enum Frame {
    /// A complete line with its terminator stripped.
    Line(String),
    /// A line longer than the configured limit. Its bytes were discarded.
    Overlong,
}

/// Reads CRLF (or bare LF) terminated lines from an async stream.
pub struct LineReader<R> {
    inner: BufReader<R>,
    max_line_length: usize,
}

impl<R: AsyncRead + Unpin> LineReader<R> {
    pub fn new(inner: R, max_line_length: usize) -> Self {
        Self {
            inner: BufReader::new(inner),
            max_line_length,
        }
    }

    /// Uses an explicit read buffer size.
    pub fn with_capacity(capacity: usize, inner: R, max_line_length: usize) -> Self {
        Self {
            inner: BufReader::with_capacity(capacity, inner),
            max_line_length,
        }
    }

    /// Returns the next frame, or `None` once the peer has closed the stream.
    ///
    /// An unterminated trailing line is returned before end-of-stream is
    /// reported. `max_line_length` counts the terminator.
    pub async fn next_frame(&mut self) -> io::Result<Option<Frame>> {
        let limit = self.max_line_length;
        let mut line = Vec::new();
        let mut overlong = false;
        let mut seen_any = false;

        loop {
            let available = self.inner.fill_buf().await?;
            if available.is_empty() {
                if !seen_any {
                    return Ok(None);
                }
                break;
            }
            seen_any = true;

            let (used, complete) = match available.iter().position(|&b| b == b'\n') {
                Some(i) => (i + 1, true),
                None => (available.len(), false),
            };

            if !overlong {
                if line.len() + used > limit {
                    overlong = true;
                    line.clear();
                } else {
                    line.extend_from_slice(&available[..used]);
                }
            }
            self.inner.consume(used);

            if complete {
                break;
            }
        }

        if overlong {
            return Ok(Some(Frame::Overlong));
        }

        if line.last() == Some(&b'\n') {
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
        }

        Ok(Some(Frame::Line(String::from_utf8_lossy(&line).into_owned())))
    }
}
