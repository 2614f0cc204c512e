//! vsmtpd
//!
//! A small SMTP server core: connection handling, line framing, reply
//! encoding, a sealed command registry and the minimal built-in verb set.
//! Message delivery is left to a [`Spool`](spool::Spool) supplied by the
//! embedding application.

pub mod commands;
pub mod config;
pub mod connection;
pub mod error;
pub mod modes;
pub mod protocol;
pub mod resolver;
pub mod server;
pub mod session;
pub mod spool;
pub mod utils;

pub use commands::{CommandHandler, CommandRegistry, Commands, HandlerResult};
pub use config::ServerConfig;
pub use error::{CommandError, RegistryError, ServerError};
pub use protocol::{ReplyCode, Response};
pub use server::{ServeSummary, Server, ServerContext};
pub use session::{Session, SessionState};
