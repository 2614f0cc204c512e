//! SMTP commands
//!
//! The handler trait, the registry that maps verbs to handlers, and the
//! built-in verb set.

pub mod handler;
pub mod handlers;
pub mod registry;

pub use handler::{CommandHandler, HandlerResult};
pub use registry::{CommandRegistry, Commands};
