//! Error types
//!
//! Defines the error types for command dispatch, registration and startup.

use std::io;
use thiserror::Error;

/// Failures raised while dispatching a command line or running a handler.
#[derive(Debug, Error)]
pub enum CommandError {
    /// No handler is registered for the verb.
    #[error("no command {0:?} exists")]
    UnknownCommand(String),

    /// The command line is empty or malformed.
    #[error("bad syntax")]
    SyntaxError,

    /// A handler failed for a reason unrelated to the protocol.
    #[error("internal handler fault: {0}")]
    Internal(String),
}

/// Failures raised while building the command registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("command {0:?} already exists")]
    DuplicateCommand(String),
}

/// Startup errors
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
