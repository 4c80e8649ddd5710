//! The session-lifetime reply sink. Plugins and in-flight hook
//! invocations hold this one handle for the life of the session; the
//! reconnect supervisor swaps the live connection's write half in
//! and out underneath them.

use std::sync::Arc;

use {async_trait::async_trait, tokio::sync::RwLock};

use burrow_common::{Error, ReplySink, Result};

/// A [`ReplySink`] that outlives any single connection.
///
/// While disconnected, writes fail with [`Error::Disconnected`];
/// [`Message::dispatch`](burrow_common::Message::dispatch) turns
/// that into a logged drop, so a hook that finishes during a
/// reconnect window loses its reply instead of crashing or queueing
/// into a dead socket.
#[derive(Default)]
pub struct SessionSink {
    inner: RwLock<Option<Arc<dyn ReplySink>>>,
}

impl SessionSink {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Install the write half of a freshly established connection.
    pub async fn attach(&self, sink: Arc<dyn ReplySink>) {
        *self.inner.write().await = Some(sink);
    }

    /// Drop the current connection's write half.
    pub async fn detach(&self) {
        *self.inner.write().await = None;
    }
}

#[async_trait]
impl ReplySink for SessionSink {
    async fn send(&self, target: &str, line: &str) -> Result<()> {
        let Some(sink) = self.inner.read().await.clone() else {
            return Err(Error::Disconnected);
        };
        sink.send(target, line).await
    }
}
