//! The commented starter config written by `burrow config init`.

use std::path::Path;

use tracing::info;

/// Example config: one console network plus a commented wire
/// network, with every bot-wide knob shown at its default.
#[must_use]
pub fn example() -> &'static str {
    r##"# burrow configuration

# Leading string that marks a public message as a command.
command_prefix = "."

# Full source identities (nick!ident) allowed to run admin commands.
admins = []

# Seconds to wait between reconnect attempts.
reconnect_delay_secs = 60

# Plugins to load, in order.
plugins = ["admin", "dev"]

# A local stdin/stdout session, handy for trying things out.
[networks.local]
transport = "console"
nick = "burrow"

# [networks.freenode]
# transport = "irc"
# server = "irc.example.org"
# port = 6667
# nick = "burrow"
# channels = ["#burrow"]
"##
}

/// Write the example config to `path`, refusing to clobber an
/// existing file.
pub fn write_example(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        anyhow::bail!("{} already exists, not overwriting", path.display());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, example())?;
    info!(path = %path.display(), "wrote example config");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config;

    #[test]
    fn example_parses_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
        let path = dir.path().join("burrow.toml");
        write_example(&path).unwrap_or_else(|e| panic!("write: {e}"));

        let cfg = load_config(&path).unwrap_or_else(|e| panic!("load: {e}"));
        assert_eq!(cfg.command_prefix, ".");
        assert_eq!(
            cfg.networks.get("local").map(|n| n.transport.as_str()),
            Some("console")
        );
    }

    #[test]
    fn existing_file_is_not_clobbered() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
        let path = dir.path().join("burrow.toml");
        std::fs::write(&path, "keep me").unwrap_or_else(|e| panic!("write: {e}"));

        assert!(write_example(&path).is_err());
        let kept = std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("read: {e}"));
        assert_eq!(kept, "keep me");
    }
}
