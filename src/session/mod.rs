//! Session management
//!
//! Per-connection protocol state, endpoints and the transaction attach point.

pub mod endpoint;
pub mod state;
pub mod transaction;

pub use endpoint::Endpoint;
pub use state::{HeloVerb, Session, SessionState};
pub use transaction::Transaction;
