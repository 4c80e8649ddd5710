use std::sync::Arc;

use crate::message::ReplySink;

/// Handle for one connected chat network, shared by the dispatcher,
/// the permission gate, and every plugin constructed for it.
///
/// The surrounding transport layer owns the actual connection; this
/// handle only carries the identity and policy the core needs for
/// matching and gating.
pub struct Session {
    network: String,
    nick: String,
    command_prefix: String,
    admins: Vec<String>,
    sink: Arc<dyn ReplySink>,
}

impl Session {
    pub fn new(
        network: impl Into<String>,
        nick: impl Into<String>,
        command_prefix: impl Into<String>,
        admins: Vec<String>,
        sink: Arc<dyn ReplySink>,
    ) -> Arc<Self> {
        Arc::new(Self {
            network: network.into(),
            nick: nick.into(),
            command_prefix: command_prefix.into(),
            admins,
            sink,
        })
    }

    #[must_use]
    pub fn network(&self) -> &str {
        &self.network
    }

    #[must_use]
    pub fn nick(&self) -> &str {
        &self.nick
    }

    #[must_use]
    pub fn command_prefix(&self) -> &str {
        &self.command_prefix
    }

    #[must_use]
    pub fn admins(&self) -> &[String] {
        &self.admins
    }

    /// Whether a full source identity is in the configured admin set.
    #[must_use]
    pub fn is_admin(&self, source: &str) -> bool {
        self.admins.iter().any(|admin| admin == source)
    }

    /// Direct write access to the connection, for hooks that target
    /// arbitrary channels rather than replying in place.
    #[must_use]
    pub fn sink(&self) -> Arc<dyn ReplySink> {
        Arc::clone(&self.sink)
    }
}
