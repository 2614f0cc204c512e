//! Mail transaction attach point
//!
//! A [`Transaction`] is attached to the session by MAIL and detached by RSET,
//! end of data, or disconnect. What happens to it afterwards belongs to the
//! [`Spool`](crate::spool::Spool).

/// An in-progress message submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    sender: String,
    body: Vec<String>,
    size: u64,
    oversized: bool,
}

impl Transaction {
    pub fn new(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            ..Self::default()
        }
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Message body lines, dot-unstuffed, without terminators.
    pub fn body(&self) -> &[String] {
        &self.body
    }

    /// Bytes received so far, counting a CRLF per line.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Whether the message was rejected while it was being received.
    pub fn is_oversized(&self) -> bool {
        self.oversized
    }

    /// Appends a body line unless that would push the message past `limit`.
    /// Once over the limit the body stops growing.
    pub fn push_line(&mut self, line: &str, limit: u64) {
        self.size += line.len() as u64 + 2;
        if self.size > limit {
            self.mark_oversized();
        }
        if !self.oversized {
            self.body.push(line.to_owned());
        }
    }

    pub fn mark_oversized(&mut self) {
        self.oversized = true;
        self.body.clear();
    }
}
