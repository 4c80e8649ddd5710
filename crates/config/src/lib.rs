//! Configuration loading for the bot.
//!
//! Config file: `burrow.toml`, searched in `./` then
//! `~/.config/burrow/`. Every field has a default; a missing file
//! yields a single local console network.

pub mod loader;
pub mod schema;
pub mod template;

pub use {
    loader::{config_dir, default_config_path, discover_and_load, load_config},
    schema::{BotConfig, NetworkConfig},
    template::{example, write_example},
};
