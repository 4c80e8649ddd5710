//! One catalog generation: the plugin instances constructed from the
//! configured name list plus their aggregated hook registry, and the
//! poll tasks running for the catalog's lifetime.

use std::time::Duration;

use {
    tokio::{sync::Mutex, task::JoinHandle},
    tokio_util::sync::CancellationToken,
    tracing::{debug, info, warn},
};

use crate::{
    hook::{HookContext, HookSpec},
    plugin::{Plugin, PluginContext, PluginSet},
    registry::HookRegistry,
    runner,
};

pub struct Catalog {
    plugins: Vec<Box<dyn Plugin>>,
    registry: HookRegistry,
    cancel: CancellationToken,
    poll_tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl Catalog {
    /// The empty catalog a bot starts with before its first load.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            plugins: Vec::new(),
            registry: HookRegistry::new(),
            cancel: CancellationToken::new(),
            poll_tasks: Mutex::new(Vec::new()),
        }
    }

    /// Construct one instance per listed plugin name, in listed
    /// order, collecting all hooks. A failure constructing or
    /// registering a single plugin is logged and excludes only that
    /// plugin; the rest of the build continues.
    #[must_use]
    pub fn load(names: &[String], factories: &PluginSet, ctx: &PluginContext) -> Self {
        let mut catalog = Self::empty();

        for name in names {
            let Some(factory) = factories.get(name) else {
                warn!(plugin = %name, "no factory registered, skipping");
                continue;
            };
            let plugin = match factory(ctx.clone()) {
                Ok(plugin) => plugin,
                Err(error) => {
                    warn!(plugin = %name, error = %format!("{error:#}"), "plugin failed to construct, skipping");
                    continue;
                },
            };
            let hooks = match plugin.hooks() {
                Ok(hooks) => hooks,
                Err(error) => {
                    warn!(plugin = %name, %error, "plugin hooks failed to register, skipping");
                    continue;
                },
            };
            for mut hook in hooks {
                hook.plugin = plugin.name().to_owned();
                debug!(plugin = %hook.plugin, handler = %hook.name, spec = ?hook.spec, "hook registered");
                catalog.registry.insert(hook);
            }
            catalog.plugins.push(plugin);
        }

        info!(
            plugins = ?catalog.active_plugins(),
            hooks = catalog.registry.len(),
            "catalog built"
        );
        catalog
    }

    #[must_use]
    pub fn registry(&self) -> &HookRegistry {
        &self.registry
    }

    /// Names of the live plugin instances, in load order.
    #[must_use]
    pub fn active_plugins(&self) -> Vec<String> {
        self.plugins.iter().map(|p| p.name().to_owned()).collect()
    }

    /// Help lookup: a plugin name yields its description, a command
    /// or keyword trigger yields its usage line. Case-insensitive.
    #[must_use]
    pub fn describe(&self, query: &str) -> Option<String> {
        self.plugins
            .iter()
            .find(|p| p.name().eq_ignore_ascii_case(query))
            .map(|p| p.description().to_owned())
            .or_else(|| self.registry.usage(query).map(str::to_owned))
    }

    /// Start one repeating task per poll hook: run the handler body
    /// (no triggering message), sleep the configured interval,
    /// repeat. Tasks stop cooperatively via the catalog's
    /// cancellation token.
    pub async fn start_polls(&self) {
        let mut tasks = self.poll_tasks.lock().await;
        for hook in self.registry.polls() {
            let HookSpec::Poll(interval) = hook.spec else {
                continue;
            };
            let hook = hook.clone();
            let cancel = self.cancel.clone();
            tasks.push(tokio::spawn(async move {
                poll_loop(hook, interval, cancel).await;
            }));
        }
        if !tasks.is_empty() {
            info!(polls = tasks.len(), "poll hooks started");
        }
    }

    /// Cancel every poll task and wait until each one has observed
    /// the cancellation. Called before this catalog is discarded on
    /// reload or session shutdown, so no periodic task outlives its
    /// generation.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        let mut tasks = self.poll_tasks.lock().await;
        for task in tasks.drain(..) {
            if let Err(error) = task.await {
                if !error.is_cancelled() {
                    warn!(%error, "poll task ended abnormally");
                }
            }
        }
    }
}

async fn poll_loop(hook: crate::hook::Hook, interval: Duration, cancel: CancellationToken) {
    debug!(plugin = %hook.plugin, handler = %hook.name, ?interval, "poll loop started");
    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            () = runner::run_hook(&hook, HookContext::poll()) => {},
        }
        tokio::select! {
            () = cancel.cancelled() => break,
            () = tokio::time::sleep(interval) => {},
        }
    }
    debug!(plugin = %hook.plugin, handler = %hook.name, "poll loop stopped");
}
