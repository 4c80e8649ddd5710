//! The concurrency runner: every matched handler invocation is an
//! independent unit of spawned work. Failures are caught and logged
//! at this boundary with enough context to reproduce, and never reach
//! the dispatcher or other invocations.

use {
    tokio::task::JoinHandle,
    tracing::{debug, warn},
};

use crate::hook::{Hook, HookContext};

/// Run one hook invocation inline, absorbing its error.
pub async fn run_hook(hook: &Hook, ctx: HookContext) {
    match ctx.argument.as_deref() {
        Some(argument) => {
            debug!(plugin = %hook.plugin, handler = %hook.name, argument, "invoking hook");
        },
        None => debug!(plugin = %hook.plugin, handler = %hook.name, "invoking hook"),
    }

    let argument = ctx.argument.clone();
    if let Err(error) = (hook.handler)(ctx).await {
        warn!(
            plugin = %hook.plugin,
            handler = %hook.name,
            argument = argument.as_deref().unwrap_or(""),
            error = %format!("{error:#}"),
            "hook handler failed"
        );
    }
}

/// Spawn one hook invocation as its own task. Fire-and-forget: the
/// handle is returned for tests, but nothing awaits it in dispatch.
/// A panicking handler dies with its task; the dispatcher and every
/// other invocation are unaffected.
pub fn spawn_hook(hook: &Hook, ctx: HookContext) -> JoinHandle<()> {
    let hook = hook.clone();
    tokio::spawn(async move { run_hook(&hook, ctx).await })
}
