//! Error handling
//!
//! Defines error types and their mapping onto SMTP replies.

pub mod handlers;
pub mod types;

pub use handlers::{error_response, internal_error, syntax_error};
pub use types::*;
