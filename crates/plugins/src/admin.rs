//! The admin surface: help listings, version, catalog reload, and
//! directed speech. Reload and say are behind the permission gate.

use std::sync::{Arc, Weak};

use burrow_common::Session;
use burrow_core::{
    CatalogControl, Hook, HookSet, Plugin, PluginContext, admin_only, hook_fn, require_params,
};

pub struct Admin {
    session: Arc<Session>,
    control: Weak<dyn CatalogControl>,
}

impl Admin {
    #[must_use]
    pub fn new(ctx: PluginContext) -> Self {
        Self {
            session: ctx.session,
            control: ctx.control,
        }
    }
}

impl Plugin for Admin {
    fn name(&self) -> &str {
        "admin"
    }

    fn description(&self) -> &str {
        "Bot administration: help, version, reload, say"
    }

    fn hooks(&self) -> burrow_core::Result<Vec<Hook>> {
        let help_control = self.control.clone();
        let reload_control = self.control.clone();
        let say_session = Arc::clone(&self.session);

        Ok(HookSet::new()
            .command(
                "help",
                "List hooks, or show help for one (ex: .help [<topic>])",
                hook_fn(move |ctx| {
                    let control = help_control.clone();
                    async move {
                        let Some(message) = ctx.message else {
                            return Ok(());
                        };
                        let Some(control) = control.upgrade() else {
                            return Ok(());
                        };
                        let query = ctx
                            .argument
                            .as_deref()
                            .map(str::trim)
                            .filter(|q| !q.is_empty());
                        match query {
                            Some(query) => {
                                let reply = control.describe(query).await.unwrap_or_else(|| {
                                    format!("No help available for {query}")
                                });
                                message.dispatch(reply).await;
                            },
                            None => {
                                let lines = [
                                    format!(
                                        "Active plugins: {}",
                                        control.active_plugins().await.join(", ")
                                    ),
                                    format!(
                                        "Active commands: {}",
                                        control.active_commands().await.join(", ")
                                    ),
                                    format!(
                                        "Active keywords: {}",
                                        control.active_keywords().await.join(", ")
                                    ),
                                ];
                                message.dispatch(lines.join("\n")).await;
                            },
                        }
                        Ok(())
                    }
                }),
            )
            .command(
                "version",
                "Show the running version (ex: .version)",
                hook_fn(|ctx| async move {
                    if let Some(message) = ctx.message {
                        message.dispatch(burrow_common::version_string()).await;
                    }
                    Ok(())
                }),
            )
            .command(
                "reload",
                "Rebuild the plugin catalog (ex: .reload)",
                admin_only(
                    Arc::clone(&self.session),
                    hook_fn(move |ctx| {
                        let control = reload_control.clone();
                        async move {
                            let Some(message) = ctx.message else {
                                return Ok(());
                            };
                            let Some(control) = control.upgrade() else {
                                return Ok(());
                            };
                            let names = control.reload(None).await;
                            message
                                .dispatch(format!("Loaded plugins: {}", names.join(", ")))
                                .await;
                            Ok(())
                        }
                    }),
                ),
            )
            .command(
                "say",
                "Speak into a channel (ex: .say <target> <text>)",
                admin_only(
                    Arc::clone(&self.session),
                    require_params(
                        "Speak into a channel (ex: .say <target> <text>)",
                        hook_fn(move |ctx| {
                            let session = Arc::clone(&say_session);
                            async move {
                                let Some(message) = ctx.message else {
                                    return Ok(());
                                };
                                let argument = ctx.argument.unwrap_or_default();
                                let Some((target, text)) = argument.trim().split_once(' ') else {
                                    message
                                        .dispatch("Speak into a channel (ex: .say <target> <text>)")
                                        .await;
                                    return Ok(());
                                };
                                session.sink().send(target, text).await?;
                                Ok(())
                            }
                        }),
                    ),
                ),
            )
            .build())
    }
}
