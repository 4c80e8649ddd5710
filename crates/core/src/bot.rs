//! The dispatcher and its control surface: owns the current catalog
//! behind an atomically swapped `Arc`, matches every inbound message
//! against every registered hook, and hands matches to the
//! concurrency runner.

use std::sync::{Arc, Weak};

use {
    async_trait::async_trait,
    tokio::sync::{Mutex, RwLock},
    tracing::info,
};

use burrow_common::{Message, Session};

use crate::{
    catalog::Catalog,
    hook::{HookContext, HookSpec},
    matcher,
    plugin::{PluginContext, PluginSet},
    runner,
};

/// Catalog operations exposed to admin-facing plugins (reload,
/// active listings, help lookups). The `Bot` is the only
/// implementation; plugins hold it weakly, since the catalog holds
/// the plugins.
#[async_trait]
pub trait CatalogControl: Send + Sync {
    /// Rebuild the catalog. `Some(names)` replaces the configured
    /// plugin list; `None` reuses it. Returns the active plugin
    /// names after the swap.
    async fn reload(&self, names: Option<Vec<String>>) -> Vec<String>;

    async fn active_plugins(&self) -> Vec<String>;
    async fn active_commands(&self) -> Vec<String>;
    async fn active_keywords(&self) -> Vec<String>;
    async fn active_patterns(&self) -> Vec<String>;

    /// Description of a plugin or usage of a hook, for `help`.
    async fn describe(&self, query: &str) -> Option<String>;
}

/// One bot per connected network: session identity, plugin
/// factories, and the live catalog.
pub struct Bot {
    session: Arc<Session>,
    factories: PluginSet,
    plugin_names: RwLock<Vec<String>>,
    catalog: RwLock<Arc<Catalog>>,
    /// Serializes generation changes. Reload runs as an ordinary
    /// spawned hook invocation, so overlapping reloads are normal;
    /// without this lock two of them could retire the same catalog
    /// and orphan the loser's freshly started poll tasks.
    generation: Mutex<()>,
    weak: Weak<Bot>,
}

impl Bot {
    /// A bot starts with an empty catalog; call [`Bot::load`] to
    /// build it from the configured plugin list.
    pub fn new(
        session: Arc<Session>,
        factories: PluginSet,
        plugin_names: Vec<String>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|weak| Self {
            session,
            factories,
            plugin_names: RwLock::new(plugin_names),
            catalog: RwLock::new(Arc::new(Catalog::empty())),
            generation: Mutex::new(()),
            weak: weak.clone(),
        })
    }

    #[must_use]
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Build and install the catalog from the configured plugin
    /// list. Equivalent to a reload keeping the current list.
    pub async fn load(&self) -> Vec<String> {
        self.swap_catalog(None).await
    }

    /// Stop poll tasks and drop the catalog. Used at session
    /// shutdown.
    pub async fn shutdown(&self) {
        let _guard = self.generation.lock().await;
        let old = self.catalog.read().await.clone();
        old.shutdown().await;
        *self.catalog.write().await = Arc::new(Catalog::empty());
    }

    /// Stop-the-world catalog swap: build the replacement off to the
    /// side, cancel the old generation's poll tasks (observing every
    /// cancellation), then publish the new catalog in one pointer
    /// store and start its polls. Dispatches running against the old
    /// snapshot are unaffected.
    async fn swap_catalog(&self, names: Option<Vec<String>>) -> Vec<String> {
        // One generation change at a time: the retiring catalog's
        // poll cancellations must all be observed before its
        // replacement is published, and no other swap may slip in
        // between.
        let _guard = self.generation.lock().await;
        if let Some(names) = names {
            *self.plugin_names.write().await = names;
        }
        let names = self.plugin_names.read().await.clone();

        let ctx = PluginContext {
            session: Arc::clone(&self.session),
            control: self.weak.clone() as Weak<dyn CatalogControl>,
        };
        let new = Arc::new(Catalog::load(&names, &self.factories, &ctx));

        let old = self.catalog.read().await.clone();
        old.shutdown().await;

        *self.catalog.write().await = Arc::clone(&new);
        new.start_polls().await;

        info!(
            network = %self.session.network(),
            plugins = ?new.active_plugins(),
            "catalog installed"
        );
        new.active_plugins()
    }

    /// Route one inbound message: command hooks, then keyword hooks,
    /// then pattern hooks. Every hook of every kind is evaluated; no
    /// match suppresses any other. Each match becomes an independent
    /// spawned invocation.
    pub async fn dispatch(&self, message: &Message) {
        let catalog = self.catalog.read().await.clone();
        let nick = self.session.nick();
        let prefix = self.session.command_prefix();
        let private = message.private;

        for hook in catalog.registry().commands() {
            let HookSpec::Command(word) = &hook.spec else {
                continue;
            };
            for m in matcher::match_command(&message.body, nick, prefix, private, word) {
                let ctx = HookContext {
                    message: Some(message.clone().with_addressed(m.addressed)),
                    argument: m.argument,
                    private,
                    addressed: m.addressed,
                    captures: None,
                };
                runner::spawn_hook(hook, ctx);
            }
        }

        for hook in catalog.registry().keywords() {
            let HookSpec::Keyword(keyword) = &hook.spec else {
                continue;
            };
            // Keyword triggers are never "addressed".
            for argument in matcher::match_keyword(&message.body, keyword) {
                let ctx = HookContext {
                    message: Some(message.clone()),
                    argument: Some(argument),
                    private,
                    addressed: false,
                    captures: None,
                };
                runner::spawn_hook(hook, ctx);
            }
        }

        for hook in catalog.registry().patterns() {
            let HookSpec::Pattern(re) = &hook.spec else {
                continue;
            };
            if let Some(captures) = matcher::match_pattern(re, &message.body) {
                let ctx = HookContext {
                    message: Some(message.clone()),
                    argument: None,
                    private,
                    addressed: false,
                    captures: Some(captures),
                };
                runner::spawn_hook(hook, ctx);
            }
        }
    }
}

#[async_trait]
impl CatalogControl for Bot {
    async fn reload(&self, names: Option<Vec<String>>) -> Vec<String> {
        self.swap_catalog(names).await
    }

    async fn active_plugins(&self) -> Vec<String> {
        self.catalog.read().await.active_plugins()
    }

    async fn active_commands(&self) -> Vec<String> {
        self.catalog.read().await.registry().active_commands()
    }

    async fn active_keywords(&self) -> Vec<String> {
        self.catalog.read().await.registry().active_keywords()
    }

    async fn active_patterns(&self) -> Vec<String> {
        self.catalog.read().await.registry().active_patterns()
    }

    async fn describe(&self, query: &str) -> Option<String> {
        self.catalog.read().await.describe(query)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            Mutex,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    };

    use {async_trait::async_trait, burrow_common::ReplySink};

    use super::*;
    use crate::{
        hook::{Hook, HookSet, hook_fn},
        plugin::Plugin,
    };

    #[derive(Default)]
    struct RecordingSink {
        lines: Mutex<Vec<String>>,
    }

    impl RecordingSink {
        fn lines(&self) -> Vec<String> {
            self.lines.lock().unwrap_or_else(|e| e.into_inner()).clone()
        }
    }

    #[async_trait]
    impl ReplySink for RecordingSink {
        async fn send(&self, _target: &str, line: &str) -> burrow_common::Result<()> {
            self.lines
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(line.to_owned());
            Ok(())
        }
    }

    struct FixturePlugin {
        hooks: Vec<Hook>,
    }

    impl Plugin for FixturePlugin {
        fn name(&self) -> &str {
            "fixture"
        }

        fn description(&self) -> &str {
            "Test fixture plugin"
        }

        fn hooks(&self) -> crate::Result<Vec<Hook>> {
            Ok(self.hooks.clone())
        }
    }

    fn bot_with(hooks: Vec<Hook>, sink: Arc<dyn ReplySink>) -> Arc<Bot> {
        let session = Session::new(
            "testnet",
            "bot",
            ".",
            vec!["admin!ident".into()],
            sink,
        );
        let mut factories = PluginSet::new();
        factories.register("fixture", move |_ctx| {
            Ok(Box::new(FixturePlugin {
                hooks: hooks.clone(),
            }) as Box<dyn Plugin>)
        });
        Bot::new(session, factories, vec!["fixture".into()])
    }

    fn public_message(body: &str, sink: Arc<dyn ReplySink>) -> Message {
        Message::new(body, "alice!ident", "#chan", false, sink)
    }

    /// Recorded (argument, addressed) per invocation.
    type Calls = Arc<Mutex<Vec<(Option<String>, bool)>>>;

    fn recording_handler(calls: Calls) -> crate::hook::HookFn {
        hook_fn(move |ctx| {
            let calls = Arc::clone(&calls);
            async move {
                calls
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .push((ctx.argument.clone(), ctx.addressed));
                Ok(())
            }
        })
    }

    async fn settle() {
        // Spawned invocations have no ordering guarantee; give them
        // a moment to land.
        tokio::time::sleep(Duration::from_millis(30)).await;
    }

    fn calls(calls: &Calls) -> Vec<(Option<String>, bool)> {
        calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    #[tokio::test]
    async fn prefixed_command_dispatches_with_argument() {
        let recorded: Calls = Arc::default();
        let sink = Arc::new(RecordingSink::default());
        let bot = bot_with(
            HookSet::new()
                .command("echo", "", recording_handler(Arc::clone(&recorded)))
                .build(),
            sink.clone(),
        );
        bot.load().await;

        bot.dispatch(&public_message(".echo hello world", sink.clone()))
            .await;
        settle().await;

        assert_eq!(
            calls(&recorded),
            vec![(Some("hello world".to_owned()), false)]
        );
    }

    #[tokio::test]
    async fn nick_addressed_command_sets_addressed() {
        let recorded: Calls = Arc::default();
        let sink = Arc::new(RecordingSink::default());
        let bot = bot_with(
            HookSet::new()
                .command("echo", "", recording_handler(Arc::clone(&recorded)))
                .build(),
            sink.clone(),
        );
        bot.load().await;

        bot.dispatch(&public_message("bot: echo hi", sink.clone()))
            .await;
        settle().await;

        assert_eq!(calls(&recorded), vec![(Some("hi".to_owned()), true)]);
    }

    #[tokio::test]
    async fn private_bare_command_dispatches_unaddressed() {
        let recorded: Calls = Arc::default();
        let sink = Arc::new(RecordingSink::default());
        let bot = bot_with(
            HookSet::new()
                .command("echo", "", recording_handler(Arc::clone(&recorded)))
                .build(),
            sink.clone(),
        );
        bot.load().await;

        let msg = Message::new("echo hi", "alice!ident", "alice", true, sink.clone());
        bot.dispatch(&msg).await;
        settle().await;

        assert_eq!(calls(&recorded), vec![(Some("hi".to_owned()), false)]);
    }

    #[tokio::test]
    async fn keyword_fires_per_matching_token() {
        let recorded: Calls = Arc::default();
        let sink = Arc::new(RecordingSink::default());
        let bot = bot_with(
            HookSet::new()
                .keyword("k", "", recording_handler(Arc::clone(&recorded)))
                .build(),
            sink.clone(),
        );
        bot.load().await;

        bot.dispatch(&public_message("see K123 and k456 too", sink.clone()))
            .await;
        settle().await;

        let mut args: Vec<Option<String>> =
            calls(&recorded).into_iter().map(|(arg, _)| arg).collect();
        args.sort();
        assert_eq!(args, vec![Some("123".to_owned()), Some("456".to_owned())]);
    }

    #[tokio::test]
    async fn pattern_fires_regardless_of_prefix_or_addressing() {
        let recorded: Calls = Arc::default();
        let sink = Arc::new(RecordingSink::default());
        let hooks = HookSet::new()
            .pattern(
                "issue-url",
                "",
                r"github\.com/\S+/issues/(\d+)",
                recording_handler(Arc::clone(&recorded)),
            )
            .map(HookSet::build);
        let bot = bot_with(hooks.unwrap_or_default(), sink.clone());
        bot.load().await;

        bot.dispatch(&public_message(
            "fyi https://github.com/a/b/issues/7 broke",
            sink.clone(),
        ))
        .await;
        bot.dispatch(&public_message("nothing to see", sink.clone()))
            .await;
        settle().await;

        assert_eq!(calls(&recorded).len(), 1);
    }

    #[tokio::test]
    async fn failing_hook_does_not_block_other_hooks_on_same_message() {
        let recorded: Calls = Arc::default();
        let sink = Arc::new(RecordingSink::default());
        let hooks = HookSet::new()
            .command("boom", "", hook_fn(|_| async { anyhow::bail!("exploded") }))
            .pattern(
                "boom-watch",
                "",
                r"boom",
                recording_handler(Arc::clone(&recorded)),
            )
            .map(HookSet::build);
        let bot = bot_with(hooks.unwrap_or_default(), sink.clone());
        bot.load().await;

        // Matches both the command hook (which fails) and the
        // pattern hook (which must still run and record).
        bot.dispatch(&public_message(".boom now", sink.clone())).await;
        settle().await;

        assert_eq!(calls(&recorded).len(), 1);
    }

    #[tokio::test]
    async fn reload_with_empty_list_clears_commands_and_is_recoverable() {
        let sink = Arc::new(RecordingSink::default());
        let bot = bot_with(
            HookSet::new()
                .command("echo", "", hook_fn(|_| async { Ok(()) }))
                .build(),
            sink.clone(),
        );
        bot.load().await;
        assert_eq!(bot.active_commands().await, vec!["echo"]);

        bot.reload(Some(Vec::new())).await;
        assert!(bot.active_commands().await.is_empty());

        bot.reload(Some(vec!["fixture".into()])).await;
        assert_eq!(bot.active_commands().await, vec!["echo"]);
    }

    #[tokio::test]
    async fn reload_stops_previous_generation_polls() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        let sink = Arc::new(RecordingSink::default());
        let bot = bot_with(
            HookSet::new()
                .poll(
                    "tick",
                    "",
                    Duration::from_millis(15),
                    hook_fn(move |_| {
                        let c = Arc::clone(&c);
                        async move {
                            c.fetch_add(1, Ordering::SeqCst);
                            Ok(())
                        }
                    }),
                )
                .build(),
            sink.clone(),
        );
        bot.load().await;

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(count.load(Ordering::SeqCst) >= 1);

        bot.reload(Some(Vec::new())).await;
        let after = count.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(
            count.load(Ordering::SeqCst),
            after,
            "old catalog's poll must not fire after reload"
        );
    }

    #[tokio::test]
    async fn overlapping_reloads_never_orphan_polls() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        let sink = Arc::new(RecordingSink::default());
        let bot = bot_with(
            HookSet::new()
                .poll(
                    "tick",
                    "",
                    Duration::from_millis(5),
                    hook_fn(move |_| {
                        let c = Arc::clone(&c);
                        async move {
                            c.fetch_add(1, Ordering::SeqCst);
                            Ok(())
                        }
                    }),
                )
                .build(),
            sink.clone(),
        );
        bot.load().await;

        // Reload runs as a spawned hook invocation, so overlapping
        // pairs are the normal case, not an abuse of the API.
        for _ in 0..50 {
            tokio::join!(
                bot.reload(Some(vec!["fixture".into()])),
                bot.reload(Some(Vec::new())),
            );
        }
        bot.reload(Some(Vec::new())).await;

        let after = count.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(
            count.load(Ordering::SeqCst),
            after,
            "a poll from a retired catalog generation must not keep running"
        );
    }

    #[tokio::test]
    async fn end_to_end_echo_reply_addressing() {
        let sink = Arc::new(RecordingSink::default());
        let bot = bot_with(
            HookSet::new()
                .command(
                    "echo",
                    "Echo text back (ex: .echo <text>)",
                    hook_fn(|ctx| async move {
                        if let (Some(msg), Some(arg)) = (ctx.message.as_ref(), ctx.argument) {
                            msg.dispatch(arg).await;
                        }
                        Ok(())
                    }),
                )
                .build(),
            sink.clone(),
        );
        bot.load().await;

        bot.dispatch(&public_message(".echo hello world", sink.clone()))
            .await;
        settle().await;
        assert_eq!(sink.lines(), vec!["hello world"]);

        bot.dispatch(&public_message("bot: echo hi", sink.clone()))
            .await;
        settle().await;
        assert_eq!(sink.lines(), vec!["hello world", "alice: hi"]);
    }
}
