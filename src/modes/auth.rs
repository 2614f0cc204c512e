//! Authentication exchange
//!
//! No SASL mechanism is implemented. The exchange is entered only through a
//! verb registered by the embedding application, and every attempt fails.

use crate::commands::HandlerResult;
use crate::modes::{LineHandler, line_too_long};
use crate::protocol::{ReplyCode, Response};
use crate::session::{Session, SessionState};
use log::info;

#[derive(Debug, Clone, Copy, Default)]
pub struct AuthExchange;

impl LineHandler for AuthExchange {
    fn handle_line(&self, session: &mut Session, line: &str) -> HandlerResult {
        session.set_state(SessionState::CommandReady);

        if line.trim() == "*" {
            return Ok(Some(Response::new(
                ReplyCode::PARAMETER_ERROR,
                "Authentication cancelled",
            )));
        }

        info!("Authentication attempt from {} rejected", session.remote().ip());
        Ok(Some(Response::new(ReplyCode::AUTH_FAILED, "Authentication failed")))
    }

    fn handle_overlong(&self, session: &mut Session) -> Option<Response> {
        session.set_state(SessionState::CommandReady);
        Some(line_too_long())
    }
}
