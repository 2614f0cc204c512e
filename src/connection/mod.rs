//! Connection handling
//!
//! Turns an accepted byte stream into a sequence of command dispatches and
//! replies.

pub mod handler;

pub use handler::{Connection, SessionEnd};
