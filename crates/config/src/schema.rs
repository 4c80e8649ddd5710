//! Config schema types. Bot-wide settings live at the root; each
//! `[networks.<name>]` table may override the ones that vary per
//! network.

use std::{collections::BTreeMap, time::Duration};

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Leading string that marks a public message as a command.
    pub command_prefix: String,
    /// Full source identities allowed through the admin gate.
    pub admins: Vec<String>,
    /// Fixed delay between reconnect attempts.
    pub reconnect_delay_secs: u64,
    /// Plugin names to load, in order.
    pub plugins: Vec<String>,
    /// Connected networks, keyed by a local name.
    pub networks: BTreeMap<String, NetworkConfig>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            command_prefix: ".".to_owned(),
            admins: Vec::new(),
            reconnect_delay_secs: 60,
            plugins: vec!["admin".to_owned(), "dev".to_owned()],
            networks: BTreeMap::from([("local".to_owned(), NetworkConfig::default())]),
        }
    }
}

impl BotConfig {
    #[must_use]
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_secs(self.reconnect_delay_secs)
    }

    /// Per-network command prefix, falling back to the bot-wide one.
    #[must_use]
    pub fn prefix_for(&self, network: &NetworkConfig) -> String {
        network
            .command_prefix
            .clone()
            .unwrap_or_else(|| self.command_prefix.clone())
    }

    /// Per-network admin set, falling back to the bot-wide one.
    #[must_use]
    pub fn admins_for(&self, network: &NetworkConfig) -> Vec<String> {
        network.admins.clone().unwrap_or_else(|| self.admins.clone())
    }

    /// Per-network plugin list, falling back to the bot-wide one.
    #[must_use]
    pub fn plugins_for(&self, network: &NetworkConfig) -> Vec<String> {
        network
            .plugins
            .clone()
            .unwrap_or_else(|| self.plugins.clone())
    }
}

/// One `[networks.<name>]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Transport kind; `"console"` is built in, other kinds are
    /// provided by the embedding binary.
    pub transport: String,
    /// Server host, for transports that dial out.
    pub server: Option<String>,
    pub port: Option<u16>,
    /// Nick the bot answers to on this network.
    pub nick: String,
    /// Channels to join on connect.
    pub channels: Vec<String>,
    pub command_prefix: Option<String>,
    pub admins: Option<Vec<String>>,
    pub plugins: Option<Vec<String>>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            transport: "console".to_owned(),
            server: None,
            port: None,
            nick: "burrow".to_owned(),
            channels: Vec::new(),
            command_prefix: None,
            admins: None,
            plugins: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_include_a_local_console_network() {
        let cfg = BotConfig::default();
        assert_eq!(cfg.command_prefix, ".");
        assert_eq!(cfg.reconnect_delay_secs, 60);
        let local = cfg.networks.get("local");
        assert_eq!(local.map(|n| n.transport.as_str()), Some("console"));
    }

    #[test]
    fn per_network_overrides_win() {
        let cfg = BotConfig {
            admins: vec!["root!a".to_owned()],
            ..BotConfig::default()
        };
        let plain = NetworkConfig::default();
        let tuned = NetworkConfig {
            command_prefix: Some("!".to_owned()),
            admins: Some(vec!["op!b".to_owned()]),
            ..NetworkConfig::default()
        };

        assert_eq!(cfg.prefix_for(&plain), ".");
        assert_eq!(cfg.prefix_for(&tuned), "!");
        assert_eq!(cfg.admins_for(&plain), vec!["root!a"]);
        assert_eq!(cfg.admins_for(&tuned), vec!["op!b"]);
        assert_eq!(cfg.plugins_for(&plain), vec!["admin", "dev"]);
    }
}
