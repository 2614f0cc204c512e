//! Error handlers
//!
//! Converts recoverable command faults into wire responses.

use crate::error::types::CommandError;
use crate::protocol::{ReplyCode, Response};
use log::{error, warn};

pub const SYNTAX_ERROR_TEXT: &str = "Error: bad syntax";
pub const INTERNAL_ERROR_TEXT: &str = "Internal error - try again later";

/// Response sent when a handler produced nothing or faulted.
pub fn internal_error() -> Response {
    Response::new(ReplyCode::LOCAL_ERROR, INTERNAL_ERROR_TEXT)
}

/// Response sent for an empty or malformed command line.
pub fn syntax_error() -> Response {
    Response::new(ReplyCode::SYNTAX_ERROR, SYNTAX_ERROR_TEXT)
}

/// Log a command fault and convert it to the response the client sees.
///
/// Unknown verbs share the internal-error reply with handler faults.
pub fn error_response(err: &CommandError) -> Response {
    match err {
        CommandError::SyntaxError => syntax_error(),
        CommandError::UnknownCommand(verb) => {
            warn!("Unrecognized command: {}", verb);
            internal_error()
        }
        CommandError::Internal(msg) => {
            error!("Command handler failed: {}", msg);
            internal_error()
        }
    }
}
