//! The seam between the reconnect supervisor and a concrete chat
//! protocol. A transport knows how to establish one connection; a
//! connection yields inbound events and carries the write half as a
//! [`ReplySink`].

use std::sync::Arc;

use async_trait::async_trait;

use burrow_common::{ReplySink, Result};

/// One inbound line of chat text, already normalized by the
/// transport: raw protocol framing stays on the other side of this
/// seam.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inbound {
    /// The message text.
    pub body: String,
    /// Full sender identity (`nick!ident` on IRC-like transports).
    pub source: String,
    /// Channel or nick the message arrived on; replies go back here.
    pub target: String,
    /// True for a direct message to the bot.
    pub private: bool,
}

/// The read half of one established connection.
#[async_trait]
pub trait Connection: Send {
    /// Wait for the next inbound message. `Ok(None)` is a clean
    /// close; an error is a broken connection. Either way the
    /// supervisor tears the session down and reconnects.
    async fn next_event(&mut self) -> Result<Option<Inbound>>;
}

/// Factory for connections to one configured network. Called once
/// per (re)connection attempt by the supervisor.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Establish a connection, returning the read half and the write
    /// half separately so the write half can be installed into the
    /// session's [`SessionSink`](crate::SessionSink).
    async fn connect(&self) -> Result<(Box<dyn Connection>, Arc<dyn ReplySink>)>;
}
