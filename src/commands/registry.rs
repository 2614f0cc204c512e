//! Command registry
//!
//! [`CommandRegistry`] collects verb handlers during startup. Sealing it
//! produces [`Commands`], the read-only table the connections dispatch
//! through. Only the sealed form can be handed to the server, so handlers
//! cannot be added once connections are being accepted.

use crate::commands::handlers;
use crate::commands::{CommandHandler, HandlerResult};
use crate::error::{CommandError, RegistryError};
use crate::session::Session;
use log::debug;
use std::collections::HashMap;
use std::fmt;

type HandlerMap = HashMap<String, Box<dyn CommandHandler>>;

/// Mutable verb → handler table used while the server is being set up.
#[derive(Default)]
pub struct CommandRegistry {
    handlers: HandlerMap,
}

impl CommandRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in SMTP verbs.
    ///
    /// `size_limit` is the message size EHLO advertises.
    pub fn with_defaults(size_limit: u64) -> Self {
        let mut registry = Self::new();
        registry.insert("helo", handlers::helo);
        registry.insert("ehlo", handlers::Ehlo::new(size_limit));
        registry.insert("mail", handlers::mail);
        registry.insert("rcpt", handlers::rcpt);
        registry.insert("data", handlers::data);
        registry.insert("rset", handlers::rset);
        registry.insert("vrfy", handlers::vrfy);
        registry.insert("noop", handlers::noop);
        registry.insert("quit", handlers::quit);
        registry
    }

    fn insert(&mut self, verb: &str, handler: impl CommandHandler + 'static) {
        self.handlers.insert(verb.to_ascii_lowercase(), Box::new(handler));
    }

    /// Adds a handler for `verb`. Verbs are case-insensitive.
    ///
    /// Fails if the verb already has a handler; the existing one is kept.
    pub fn register(
        &mut self,
        verb: &str,
        handler: impl CommandHandler + 'static,
    ) -> Result<(), RegistryError> {
        let verb = verb.to_ascii_lowercase();
        if self.contains(&verb) {
            return Err(RegistryError::DuplicateCommand(verb));
        }

        debug!("Registered command {}", verb);
        self.handlers.insert(verb, Box::new(handler));
        Ok(())
    }

    pub fn contains(&self, verb: &str) -> bool {
        self.handlers.contains_key(&verb.to_ascii_lowercase())
    }

    /// Freezes the registry.
    pub fn seal(self) -> Commands {
        Commands {
            handlers: self.handlers,
        }
    }
}

/// Sealed, read-only command table.
pub struct Commands {
    handlers: HandlerMap,
}

impl Commands {
    /// Runs the handler registered for `verb`.
    pub fn dispatch(&self, verb: &str, args: &str, session: &mut Session) -> HandlerResult {
        let verb = verb.to_ascii_lowercase();
        match self.handlers.get(&verb) {
            Some(handler) => handler.handle(session, args),
            None => Err(CommandError::UnknownCommand(verb)),
        }
    }

    /// Registered verbs in alphabetical order.
    pub fn verbs(&self) -> Vec<&str> {
        let mut verbs: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        verbs.sort_unstable();
        verbs
    }
}

impl fmt::Debug for Commands {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Commands").field("verbs", &self.verbs()).finish()
    }
}
