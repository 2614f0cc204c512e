//! Module `session`
//!
//! Defines the per-connection [`Session`]: protocol mode, greeting details,
//! endpoints and the attached transaction.

use crate::session::{Endpoint, Transaction};
use std::fmt;

/// How the next inbound line is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Accepted, greeting banner not yet sent.
    Greeting,
    /// Lines are commands and go through the registry.
    CommandReady,
    /// Lines are message data.
    DataTransfer,
    /// Lines belong to an authentication exchange.
    Authenticating,
}

/// The greeting verb a client used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeloVerb {
    Helo,
    Ehlo,
}

impl HeloVerb {
    pub fn as_str(self) -> &'static str {
        match self {
            HeloVerb::Helo => "helo",
            HeloVerb::Ehlo => "ehlo",
        }
    }
}

impl fmt::Display for HeloVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of one accepted connection, owned by its connection handler.
#[derive(Debug)]
pub struct Session {
    state: SessionState,
    helo_verb: Option<HeloVerb>,
    helo_host: Option<String>,
    hostname: String,
    local: Endpoint,
    remote: Endpoint,
    transaction: Option<Transaction>,
}

impl Session {
    /// Creates a session in the `Greeting` state.
    ///
    /// The server announces itself as `hostname` when given, otherwise as
    /// the local endpoint's hostname, falling back to its IP address.
    pub fn new(local: Endpoint, remote: Endpoint, hostname: Option<&str>) -> Self {
        let hostname = match hostname {
            Some(name) if !name.is_empty() => name.to_string(),
            _ if !local.hostname().is_empty() => local.hostname().to_string(),
            _ => local.ip().to_string(),
        };

        Self {
            state: SessionState::Greeting,
            helo_verb: None,
            helo_host: None,
            hostname,
            local,
            remote,
            transaction: None,
        }
    }

    // --------------------
    // Getter methods
    // --------------------

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The greeting verb, once a greeting has been accepted.
    pub fn helo_verb(&self) -> Option<HeloVerb> {
        self.helo_verb
    }

    /// The identity the client claimed in its greeting.
    pub fn helo_host(&self) -> Option<&str> {
        self.helo_host.as_deref()
    }

    pub fn is_greeted(&self) -> bool {
        self.helo_verb.is_some()
    }

    /// The name this server announces on the connection.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn local(&self) -> &Endpoint {
        &self.local
    }

    pub fn remote(&self) -> &Endpoint {
        &self.remote
    }

    pub fn transaction(&self) -> Option<&Transaction> {
        self.transaction.as_ref()
    }

    pub fn transaction_mut(&mut self) -> Option<&mut Transaction> {
        self.transaction.as_mut()
    }

    // --------------------
    // Mutators
    // --------------------

    pub fn set_state(&mut self, state: SessionState) {
        self.state = state;
    }

    /// Records the client's greeting.
    ///
    /// Returns `false` without changing anything if a greeting was already
    /// accepted on this session.
    pub fn accept_greeting(&mut self, verb: HeloVerb, host: &str) -> bool {
        if self.helo_verb.is_some() {
            return false;
        }
        self.helo_verb = Some(verb);
        self.helo_host = Some(host.to_string());
        true
    }

    /// Attaches a new transaction, returning the one it replaces.
    pub fn attach_transaction(&mut self, transaction: Transaction) -> Option<Transaction> {
        self.transaction.replace(transaction)
    }

    /// Detaches the current transaction, if any.
    pub fn detach_transaction(&mut self) -> Option<Transaction> {
        self.transaction.take()
    }
}
