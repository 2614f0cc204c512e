//! Server core functionality
//!
//! The listener, the per-session task supervision, and the context shared by
//! every session.

pub mod context;
pub mod core;

pub use context::ServerContext;
pub use core::{ServeSummary, Server, SessionReport};
