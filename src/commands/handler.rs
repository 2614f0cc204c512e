//! Command handler trait
//!
//! Every verb the server understands is served by a [`CommandHandler`].
//! Plain functions and closures with the right signature are handlers too.

use crate::error::CommandError;
use crate::protocol::Response;
use crate::session::Session;

/// What a handler produces: a reply, no reply, or a fault.
///
/// `Ok(None)` and `Err(_)` are both answered with an internal-error reply by
/// the connection.
pub type HandlerResult = Result<Option<Response>, CommandError>;

pub trait CommandHandler: Send + Sync {
    /// Runs the command against `session`.
    ///
    /// `args` is the rest of the command line after the verb and its
    /// separating space, or empty. A handler that changes the session mode
    /// must set the new state itself.
    fn handle(&self, session: &mut Session, args: &str) -> HandlerResult;
}

impl<F> CommandHandler for F
where
    F: Fn(&mut Session, &str) -> HandlerResult + Send + Sync,
{
    fn handle(&self, session: &mut Session, args: &str) -> HandlerResult {
        self(session, args)
    }
}
