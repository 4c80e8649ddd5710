//! The capability contract: an explicitly registered factory per
//! plugin name, constructing one instance per catalog build. This
//! replaces implicit global registration lists (the legacy design
//! registered plugins as a side effect of subclass definition).

use std::{
    collections::HashMap,
    sync::{Arc, Weak},
};

use burrow_common::Session;

use crate::{bot::CatalogControl, hook::Hook};

/// A capability instance owning zero or more hooks. Instances live
/// for exactly one catalog generation.
pub trait Plugin: Send + Sync {
    /// Stable name, used in catalog listings and help lookups.
    fn name(&self) -> &str;

    /// One-line description, shown by `help <plugin>`.
    fn description(&self) -> &str;

    /// The plugin's hook descriptors. An error here excludes the
    /// plugin from the catalog without aborting the rest of the
    /// build.
    fn hooks(&self) -> crate::Result<Vec<Hook>>;
}

/// Everything a plugin gets at construction time.
#[derive(Clone)]
pub struct PluginContext {
    /// The network session the plugin was constructed for.
    pub session: Arc<Session>,
    /// Weak handle to the catalog control surface, for admin-facing
    /// plugins (reload, active listings). Weak because the catalog
    /// holds the plugin instances.
    pub control: Weak<dyn CatalogControl>,
}

/// Constructor for one plugin. Errors (missing credentials, bad
/// config) exclude only this plugin from the catalog.
pub type PluginFactory = Arc<dyn Fn(PluginContext) -> anyhow::Result<Box<dyn Plugin>> + Send + Sync>;

/// The set of registered plugin factories, keyed by configured name.
#[derive(Default, Clone)]
pub struct PluginSet {
    factories: HashMap<String, PluginFactory>,
}

impl PluginSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: &str, factory: F) -> &mut Self
    where
        F: Fn(PluginContext) -> anyhow::Result<Box<dyn Plugin>> + Send + Sync + 'static,
    {
        self.factories.insert(name.to_owned(), Arc::new(factory));
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PluginFactory> {
        self.factories.get(name)
    }

    /// Registered factory names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }
}
