//! Message data reception
//!
//! Collects the lines that follow DATA until the lone "." marker, then
//! hands the transaction to the spool.

use crate::commands::HandlerResult;
use crate::modes::LineHandler;
use crate::protocol::{ReplyCode, Response};
use crate::session::{Session, SessionState};
use crate::spool::Spool;
use log::{debug, info};
use std::sync::Arc;

pub struct DataReceiver {
    spool: Arc<dyn Spool>,
    size_limit: u64,
}

impl DataReceiver {
    pub fn new(spool: Arc<dyn Spool>, size_limit: u64) -> Self {
        Self { spool, size_limit }
    }

    fn finish(&self, session: &mut Session) -> Response {
        session.set_state(SessionState::CommandReady);

        let Some(transaction) = session.detach_transaction() else {
            return Response::new(ReplyCode::BAD_SEQUENCE, "MAIL first please");
        };

        if transaction.is_oversized() {
            info!("Message too large to receive, declining");
            return Response::new(ReplyCode::EXCEEDED_STORAGE, "Message too big!");
        }

        debug!(
            "Message from {} complete: {} bytes",
            transaction.sender(),
            transaction.size()
        );
        self.spool.queue(transaction)
    }
}

impl LineHandler for DataReceiver {
    fn handle_line(&self, session: &mut Session, line: &str) -> HandlerResult {
        if line == "." {
            return Ok(Some(self.finish(session)));
        }

        let line = line.strip_prefix('.').unwrap_or(line);
        if let Some(transaction) = session.transaction_mut() {
            transaction.push_line(line, self.size_limit);
        }
        Ok(None)
    }

    /// An overlong data line spoils the message; it is refused at the end.
    fn handle_overlong(&self, session: &mut Session) -> Option<Response> {
        if let Some(transaction) = session.transaction_mut() {
            transaction.mark_oversized();
        }
        None
    }
}
