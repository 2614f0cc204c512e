//! Shared server context
//!
//! Everything a connection needs that is common to all sessions: the sealed
//! command table, the non-command mode handlers and connection limits. It is
//! built once before the listener starts and shared read-only afterwards.

use crate::commands::{CommandRegistry, Commands};
use crate::config::ServerConfig;
use crate::modes::{AuthExchange, DataReceiver, LineHandler};
use crate::session::{Endpoint, Session};
use crate::spool::{NullSpool, Spool};
use std::sync::Arc;

pub struct ServerContext {
    commands: Commands,
    data: Box<dyn LineHandler>,
    auth: Box<dyn LineHandler>,
    hostname: Option<String>,
    max_line_length: usize,
}

impl ServerContext {
    pub fn new(commands: Commands, config: &ServerConfig, spool: Arc<dyn Spool>) -> Self {
        Self {
            commands,
            data: Box::new(DataReceiver::new(spool, config.size_limit)),
            auth: Box::new(AuthExchange),
            hostname: config.hostname.clone(),
            max_line_length: config.max_line_length,
        }
    }

    /// Built-in commands and a spool that declines every message.
    pub fn from_config(config: &ServerConfig) -> Self {
        let commands = CommandRegistry::with_defaults(config.size_limit).seal();
        Self::new(commands, config, Arc::new(NullSpool))
    }

    /// Replaces the handler for the authentication exchange.
    pub fn with_auth(mut self, auth: impl LineHandler + 'static) -> Self {
        self.auth = Box::new(auth);
        self
    }

    pub fn commands(&self) -> &Commands {
        &self.commands
    }

    pub fn data_handler(&self) -> &dyn LineHandler {
        self.data.as_ref()
    }

    pub fn auth_handler(&self) -> &dyn LineHandler {
        self.auth.as_ref()
    }

    pub fn max_line_length(&self) -> usize {
        self.max_line_length
    }

    /// Creates the session for a freshly accepted connection.
    pub fn new_session(&self, local: Endpoint, remote: Endpoint) -> Session {
        Session::new(local, remote, self.hostname.as_deref())
    }
}
