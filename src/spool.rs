//! Message spool
//!
//! Completed transactions are handed to a [`Spool`] at the end of DATA. The
//! spool's reply is what the client sees for the message.

use crate::protocol::{ReplyCode, Response};
use crate::session::Transaction;
use log::{info, warn};
use tokio::sync::mpsc;

pub trait Spool: Send + Sync {
    /// Takes ownership of a finished transaction and answers for it.
    fn queue(&self, transaction: Transaction) -> Response;
}

fn declined() -> Response {
    Response::new(
        ReplyCode::LOCAL_ERROR,
        "Queuing declined or disabled; try again later",
    )
}

/// Accepts nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSpool;

impl Spool for NullSpool {
    fn queue(&self, transaction: Transaction) -> Response {
        info!("No spool configured, declining message from {}", transaction.sender());
        declined()
    }
}

/// Forwards finished transactions to a channel.
#[derive(Debug, Clone)]
pub struct ChannelSpool {
    sender: mpsc::UnboundedSender<Transaction>,
}

impl ChannelSpool {
    pub fn new(sender: mpsc::UnboundedSender<Transaction>) -> Self {
        Self { sender }
    }

    /// Creates a spool together with the receiving end of its channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Transaction>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Spool for ChannelSpool {
    fn queue(&self, transaction: Transaction) -> Response {
        match self.sender.send(transaction) {
            Ok(()) => Response::new(ReplyCode::OK, "Queued"),
            Err(_) => {
                warn!("Spool receiver dropped, declining message");
                declined()
            }
        }
    }
}
