//! Explicit hook descriptors and the builder plugins use to register
//! them. A hook is a (kind, trigger, handler) tuple; the same handler
//! may back several hook entries, each matched independently.

use std::{fmt, future::Future, sync::Arc, time::Duration};

use {futures::future::BoxFuture, regex::RegexBuilder};

use burrow_common::Message;

use crate::error::{Error, Result};

/// Boxed async hook handler. Errors are caught and logged at the
/// concurrency-runner boundary; nothing flows back to the dispatcher.
pub type HookFn = Arc<dyn Fn(HookContext) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// Lift an async closure into a [`HookFn`].
pub fn hook_fn<F, Fut>(f: F) -> HookFn
where
    F: Fn(HookContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Arc::new(move |ctx| Box::pin(f(ctx)))
}

/// Trigger kind and pattern for one hook entry.
#[derive(Clone)]
pub enum HookSpec {
    /// Literal command word, matched after prefix/nick stripping.
    Command(String),
    /// Literal prefix tested against every whitespace-delimited token.
    Keyword(String),
    /// Free-form regex searched anywhere in the raw message.
    Pattern(regex::Regex),
    /// No trigger; runs on a repeating timer for the catalog lifetime.
    Poll(Duration),
}

impl fmt::Debug for HookSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command(word) => write!(f, "command({word})"),
            Self::Keyword(prefix) => write!(f, "keyword({prefix})"),
            Self::Pattern(re) => write!(f, "pattern({})", re.as_str()),
            Self::Poll(interval) => write!(f, "poll({interval:?})"),
        }
    }
}

impl HookSpec {
    /// The trigger string shown in `active_*` listings.
    #[must_use]
    pub fn trigger(&self) -> String {
        match self {
            Self::Command(word) => word.clone(),
            Self::Keyword(prefix) => prefix.clone(),
            Self::Pattern(re) => re.as_str().to_owned(),
            Self::Poll(interval) => format!("every {}s", interval.as_secs()),
        }
    }
}

/// One registered hook: owning plugin, handler identity, usage line,
/// trigger spec, and the handler itself.
#[derive(Clone)]
pub struct Hook {
    /// Owning plugin name; stamped by the catalog at build time.
    pub plugin: String,
    /// Handler name, used in logs and `<plugin>.<command>` help.
    pub name: String,
    /// One-line usage/description, exposed via the help surface.
    pub usage: String,
    pub spec: HookSpec,
    pub handler: HookFn,
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook")
            .field("plugin", &self.plugin)
            .field("name", &self.name)
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

/// Regex match context handed to pattern hooks alongside the raw
/// message (handlers commonly re-derive structured data from the raw
/// text rather than the captured groups alone).
#[derive(Debug, Clone)]
pub struct PatternCaptures {
    /// The whole matched substring.
    pub matched: String,
    /// Capture groups 1.., in order.
    pub groups: Vec<Option<String>>,
}

/// Per-invocation context passed to every hook handler.
#[derive(Clone)]
pub struct HookContext {
    /// The triggering message; `None` for poll hooks.
    pub message: Option<Message>,
    /// Command rest / keyword capture; `None` for bare commands,
    /// pattern hooks, and polls.
    pub argument: Option<String>,
    pub private: bool,
    pub addressed: bool,
    /// Regex context, set for pattern hooks only.
    pub captures: Option<PatternCaptures>,
}

impl HookContext {
    /// Context for a poll invocation: no message, no argument.
    #[must_use]
    pub fn poll() -> Self {
        Self {
            message: None,
            argument: None,
            private: false,
            addressed: false,
            captures: None,
        }
    }
}

/// Builder collecting a plugin's hooks at registration time.
///
/// This replaces attribute-tagged handler discovery: every hook is an
/// explicit descriptor, so wrapping a handler (permission gate,
/// parameter guard) never hides its registration metadata.
#[derive(Default)]
pub struct HookSet {
    hooks: Vec<Hook>,
}

impl HookSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, name: &str, usage: &str, spec: HookSpec, handler: HookFn) -> Self {
        self.hooks.push(Hook {
            plugin: String::new(),
            name: name.to_owned(),
            usage: usage.to_owned(),
            spec,
            handler,
        });
        self
    }

    #[must_use]
    pub fn command(self, word: &str, usage: &str, handler: HookFn) -> Self {
        self.push(word, usage, HookSpec::Command(word.to_owned()), handler)
    }

    #[must_use]
    pub fn keyword(self, prefix: &str, usage: &str, handler: HookFn) -> Self {
        self.push(prefix, usage, HookSpec::Keyword(prefix.to_owned()), handler)
    }

    /// Register a free-text pattern hook. The regex is compiled here,
    /// case-insensitively; a bad pattern surfaces at catalog build and
    /// excludes the owning plugin rather than the whole catalog.
    pub fn pattern(self, name: &str, usage: &str, pattern: &str, handler: HookFn) -> Result<Self> {
        let re = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| Error::Pattern {
                pattern: pattern.to_owned(),
                source,
            })?;
        Ok(self.push(name, usage, HookSpec::Pattern(re), handler))
    }

    #[must_use]
    pub fn poll(self, name: &str, usage: &str, interval: Duration, handler: HookFn) -> Self {
        self.push(name, usage, HookSpec::Poll(interval), handler)
    }

    #[must_use]
    pub fn build(self) -> Vec<Hook> {
        self.hooks
    }
}
