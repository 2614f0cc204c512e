//! Non-command session modes
//!
//! While a session is receiving message data or running an authentication
//! exchange, inbound lines bypass the command registry and go to a
//! [`LineHandler`] instead.

pub mod auth;
pub mod data;

pub use auth::AuthExchange;
pub use data::DataReceiver;

use crate::commands::HandlerResult;
use crate::protocol::{ReplyCode, Response};
use crate::session::Session;

pub trait LineHandler: Send + Sync {
    /// Consumes one line. Returning to command mode is the handler's job.
    fn handle_line(&self, session: &mut Session, line: &str) -> HandlerResult;

    /// Called instead of [`handle_line`](Self::handle_line) when a line
    /// exceeded the length limit and was dropped.
    fn handle_overlong(&self, _session: &mut Session) -> Option<Response> {
        Some(line_too_long())
    }
}

pub(crate) fn line_too_long() -> Response {
    Response::new(ReplyCode::SYNTAX_ERROR, "Line too long")
}
