//! Developer utilities: echo, ping, and the bug/issue lookups that
//! exercise the keyword and pattern trigger kinds.

use burrow_core::{Hook, HookSet, Plugin, PluginContext, hook_fn, require_params};

use burrow_common::util::ensure_int;

pub struct Dev;

impl Dev {
    #[must_use]
    pub fn new(_ctx: PluginContext) -> Self {
        Self
    }
}

impl Plugin for Dev {
    fn name(&self) -> &str {
        "dev"
    }

    fn description(&self) -> &str {
        "Developer utilities: echo, ping, bug and issue lookups"
    }

    fn hooks(&self) -> burrow_core::Result<Vec<Hook>> {
        HookSet::new()
            .command(
                "echo",
                "Echo text back (ex: .echo <text>)",
                require_params(
                    "Echo text back (ex: .echo <text>)",
                    hook_fn(|ctx| async move {
                        if let (Some(message), Some(argument)) = (&ctx.message, ctx.argument) {
                            message.dispatch(argument).await;
                        }
                        Ok(())
                    }),
                ),
            )
            .command(
                "ping",
                "Check that the bot is alive (ex: .ping)",
                hook_fn(|ctx| async move {
                    if let Some(message) = ctx.message {
                        message.dispatch("pong").await;
                    }
                    Ok(())
                }),
            )
            .keyword(
                "bug",
                "Expand bug numbers mentioned in chat (ex: bug123)",
                hook_fn(|ctx| async move {
                    let (Some(message), Some(argument)) = (&ctx.message, ctx.argument) else {
                        return Ok(());
                    };
                    if let Some(id) = ensure_int(&argument) {
                        message
                            .dispatch(format!("bug #{id}: https://bugs.example.org/{id}"))
                            .await;
                    }
                    Ok(())
                }),
            )
            .pattern(
                "issue-url",
                "Expand issue links pasted in chat",
                r"https?://github\.com/\S+/issues/(\d+)",
                hook_fn(|ctx| async move {
                    let (Some(message), Some(captures)) = (&ctx.message, &ctx.captures) else {
                        return Ok(());
                    };
                    if let Some(Some(id)) = captures.groups.first() {
                        message.dispatch(format!("issue #{id}")).await;
                    }
                    Ok(())
                }),
            )
            .map(HookSet::build)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex, Weak};

    use {
        async_trait::async_trait,
        burrow_common::{Message, ReplySink, Session},
        burrow_core::{Bot, HookContext, HookSpec, PatternCaptures},
    };

    use super::*;

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

    fn hooks(sink: Arc<RecordingSink>) -> Vec<Hook> {
        let session = Session::new("testnet", "bot", ".", Vec::new(), sink);
        let plugin = Dev::new(PluginContext {
            session,
            control: Weak::<Bot>::new(),
        });
        plugin.hooks().unwrap_or_default()
    }

    fn hook<'a>(hooks: &'a [Hook], name: &str) -> &'a Hook {
        hooks
            .iter()
            .find(|h| h.name == name)
            .unwrap_or_else(|| panic!("missing hook {name}"))
    }

    fn context(argument: Option<&str>, sink: Arc<RecordingSink>) -> HookContext {
        HookContext {
            message: Some(Message::new("body", "alice!ident", "#chan", false, sink)),
            argument: argument.map(str::to_owned),
            private: false,
            addressed: false,
            captures: None,
        }
    }

    #[tokio::test]
    async fn echo_replies_with_its_argument() {
        let sink = Arc::new(RecordingSink::default());
        let all = hooks(sink.clone());
        (hook(&all, "echo").handler)(context(Some("hello world"), sink.clone()))
            .await
            .unwrap_or(());
        assert_eq!(sink.lines(), vec!["hello world"]);
    }

    #[tokio::test]
    async fn bare_echo_shows_usage() {
        let sink = Arc::new(RecordingSink::default());
        let all = hooks(sink.clone());
        (hook(&all, "echo").handler)(context(None, sink.clone()))
            .await
            .unwrap_or(());
        assert_eq!(sink.lines(), vec!["Echo text back (ex: .echo <text>)"]);
    }

    #[tokio::test]
    async fn ping_answers_pong() {
        let sink = Arc::new(RecordingSink::default());
        let all = hooks(sink.clone());
        (hook(&all, "ping").handler)(context(None, sink.clone()))
            .await
            .unwrap_or(());
        assert_eq!(sink.lines(), vec!["pong"]);
    }

    #[tokio::test]
    async fn bug_keyword_expands_numeric_ids_only() {
        let sink = Arc::new(RecordingSink::default());
        let all = hooks(sink.clone());
        let bug = hook(&all, "bug");

        (bug.handler)(context(Some("#123"), sink.clone()))
            .await
            .unwrap_or(());
        (bug.handler)(context(Some("zilla"), sink.clone()))
            .await
            .unwrap_or(());

        assert_eq!(sink.lines(), vec!["bug #123: https://bugs.example.org/123"]);
    }

    #[tokio::test]
    async fn issue_pattern_uses_the_captured_number() {
        let sink = Arc::new(RecordingSink::default());
        let all = hooks(sink.clone());
        let issue = hook(&all, "issue-url");
        assert!(matches!(issue.spec, HookSpec::Pattern(_)));

        let mut ctx = context(None, sink.clone());
        ctx.captures = Some(PatternCaptures {
            matched: "https://github.com/a/b/issues/42".to_owned(),
            groups: vec![Some("42".to_owned())],
        });
        (issue.handler)(ctx).await.unwrap_or(());
        assert_eq!(sink.lines(), vec!["issue #42"]);
    }
}
