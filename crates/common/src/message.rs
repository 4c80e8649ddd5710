use std::{fmt, sync::Arc};

use {async_trait::async_trait, tracing::warn};

use crate::Result;

/// Hard cap on reply lines per dispatch before truncation kicks in.
pub const MAX_REPLY_LINES: usize = 10;
/// How many lines survive a truncated reply.
pub const KEPT_REPLY_LINES: usize = 8;
/// Marker line appended in place of the dropped tail.
pub const TRUNCATION_MARKER: &str = "...";

/// Write access to the owning chat connection. The transport layer
/// provides the concrete implementation; plugins only ever see it
/// through [`Message::dispatch`].
#[async_trait]
pub trait ReplySink: Send + Sync {
    /// Send one line of text to a chat target.
    async fn send(&self, target: &str, line: &str) -> Result<()>;
}

/// Immutable envelope for one inbound line of chat text.
///
/// `addressed` is stamped per matched invocation by the dispatcher:
/// it is true only when the command was invoked via the explicit
/// `nick:` form, and controls reply prefixing.
#[derive(Clone)]
pub struct Message {
    pub body: String,
    pub source: String,
    pub target: String,
    pub private: bool,
    pub addressed: bool,
    sink: Arc<dyn ReplySink>,
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("body", &self.body)
            .field("source", &self.source)
            .field("target", &self.target)
            .field("private", &self.private)
            .field("addressed", &self.addressed)
            .finish_non_exhaustive()
    }
}

impl Message {
    pub fn new(
        body: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        private: bool,
        sink: Arc<dyn ReplySink>,
    ) -> Self {
        Self {
            body: body.into(),
            source: source.into(),
            target: target.into(),
            private,
            addressed: false,
            sink,
        }
    }

    /// Stamp the per-invocation addressing outcome onto a clone.
    #[must_use]
    pub fn with_addressed(mut self, addressed: bool) -> Self {
        self.addressed = addressed;
        self
    }

    /// The nick part of the source identity (`nick!ident` on IRC).
    #[must_use]
    pub fn source_nick(&self) -> &str {
        self.source.split('!').next().unwrap_or(&self.source)
    }

    /// Send reply text back through the owning connection.
    ///
    /// The text is split on newlines and capped to avoid flooding:
    /// anything beyond [`MAX_REPLY_LINES`] lines keeps the first
    /// [`KEPT_REPLY_LINES`] and appends a single `"..."` marker.
    /// Public replies to an addressed invocation are prefixed with
    /// the sender's nick. A failed transport write drops the line
    /// with a warning; it never surfaces to the handler.
    pub async fn dispatch(&self, text: impl fmt::Display) {
        let text = text.to_string();
        let mut lines: Vec<&str> = text.split('\n').collect();
        if lines.len() > MAX_REPLY_LINES {
            lines.truncate(KEPT_REPLY_LINES);
            lines.push(TRUNCATION_MARKER);
        }

        for line in lines {
            let line = if self.addressed && !self.private {
                format!("{}: {}", self.source_nick(), line)
            } else {
                line.to_owned()
            };
            if let Err(error) = self.sink.send(&self.target, &line).await {
                warn!(target = %self.target, %error, "dropping reply line after failed transport write");
            }
        }
    }
}
