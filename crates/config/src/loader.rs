use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::schema::BotConfig;

const CONFIG_FILENAME: &str = "burrow.toml";

/// Load config from an explicit path. Read or parse failures are
/// hard errors here; the caller asked for this exact file.
pub fn load_config(path: &Path) -> anyhow::Result<BotConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let cfg = toml::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("failed to parse {}: {e}", path.display()))?;
    Ok(cfg)
}

/// Discover and load config.
///
/// With an explicit path, that file must load. Otherwise the search
/// order is `./burrow.toml` then `~/.config/burrow/burrow.toml`; a
/// broken discovered file falls back to defaults with a warning, and
/// no file at all silently yields [`BotConfig::default`].
pub fn discover_and_load(explicit: Option<&Path>) -> anyhow::Result<BotConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }

    if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => return Ok(cfg),
            Err(error) => {
                warn!(path = %path.display(), %error, "failed to load config, using defaults");
            },
        }
    } else {
        debug!("no config file found, using defaults");
    }
    Ok(BotConfig::default())
}

fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILENAME);
    if local.exists() {
        return Some(local);
    }
    let global = config_dir()?.join(CONFIG_FILENAME);
    global.exists().then_some(global)
}

/// The user-global config directory (`~/.config/burrow/`).
#[must_use]
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "burrow").map(|d| d.config_dir().to_path_buf())
}

/// Where `config init` writes when no path is given.
#[must_use]
pub fn default_config_path() -> PathBuf {
    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_FILENAME)
}
