//! SMTP replies and their wire encoding
//!
//! A [`Response`] is built by a command handler, encoded once by the
//! connection and then dropped.

use std::fmt;

/// Three-digit SMTP reply code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReplyCode(u16);

impl ReplyCode {
    /// Creates a reply code. Panics if `code` has more than three digits.
    pub const fn new(code: u16) -> Self {
        assert!(code <= 999, "reply codes have exactly three digits");
        Self(code)
    }

    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// 2xx
    pub const fn is_success(self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// 4xx
    pub const fn is_transient(self) -> bool {
        self.0 >= 400 && self.0 < 500
    }

    /// 5xx
    pub const fn is_permanent(self) -> bool {
        self.0 >= 500 && self.0 < 600
    }

    pub const SERVICE_READY: Self = Self(220);
    pub const CLOSING: Self = Self(221);
    pub const OK: Self = Self(250);
    pub const AUTH_CONTINUE: Self = Self(334);
    pub const START_DATA: Self = Self(354);
    pub const SERVICE_UNAVAILABLE: Self = Self(421);
    pub const LOCAL_ERROR: Self = Self(451);
    pub const SYNTAX_ERROR: Self = Self(500);
    pub const PARAMETER_ERROR: Self = Self(501);
    pub const BAD_SEQUENCE: Self = Self(503);
    pub const AUTH_FAILED: Self = Self(535);
    pub const MAILBOX_UNAVAILABLE: Self = Self(550);
    pub const EXCEEDED_STORAGE: Self = Self(552);
}

impl TryFrom<u16> for ReplyCode {
    type Error = u16;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        if code <= 999 { Ok(Self(code)) } else { Err(code) }
    }
}

impl fmt::Display for ReplyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

/// A reply: status code, ordered message lines and a disconnect flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    code: ReplyCode,
    lines: Vec<String>,
    disconnect: bool,
}

impl Response {
    /// Builds a reply from text; each `\n`-separated line becomes one wire line.
    pub fn new(code: ReplyCode, text: impl AsRef<str>) -> Self {
        let lines = text.as_ref().lines().map(str::to_owned).collect();
        Self::multiline(code, lines)
    }

    /// Builds a reply from explicit message lines.
    pub fn multiline(code: ReplyCode, mut lines: Vec<String>) -> Self {
        if lines.is_empty() {
            lines.push(String::new());
        }
        Self {
            code,
            lines,
            disconnect: false,
        }
    }

    /// Marks the reply as the last one on the connection.
    pub fn disconnecting(mut self) -> Self {
        self.disconnect = true;
        self
    }

    pub fn code(&self) -> ReplyCode {
        self.code
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_disconnect(&self) -> bool {
        self.disconnect
    }

    /// Encodes the reply for the wire.
    ///
    /// Every line but the last is written `DDD-text`, the last `DDD text`,
    /// each terminated with CRLF.
    pub fn encode(&self) -> String {
        let last = self.lines.len() - 1;
        let mut out = String::new();
        for (i, line) in self.lines.iter().enumerate() {
            let marker = if i == last { ' ' } else { '-' };
            out.push_str(&format!("{}{}{}\r\n", self.code, marker, line));
        }
        out
    }
}
