//! The command-routing core: hook descriptors and registry, the
//! message-to-hook pattern matcher, the plugin catalog with poll
//! supervision, and the dispatcher with its concurrency runner.
//!
//! The wire-level chat transport and individual capability plugins
//! live elsewhere; this crate only defines the contract they plug
//! into.

pub mod bot;
pub mod catalog;
pub mod error;
pub mod gate;
pub mod hook;
pub mod matcher;
pub mod plugin;
pub mod registry;
pub mod runner;

pub use {
    bot::{Bot, CatalogControl},
    catalog::Catalog,
    error::{Error, Result},
    gate::{DENIAL, admin_only, require_params},
    hook::{Hook, HookContext, HookFn, HookSet, HookSpec, PatternCaptures, hook_fn},
    plugin::{Plugin, PluginContext, PluginFactory, PluginSet},
    registry::HookRegistry,
};
