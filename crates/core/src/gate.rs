//! Handler wrappers applied at registration time: the admin
//! permission gate and the missing-parameter guard. Both wrap a
//! [`HookFn`] and return a [`HookFn`], so gated handlers register
//! exactly like plain ones.

use std::sync::Arc;

use {burrow_common::Session, tracing::info};

use crate::hook::{HookContext, HookFn, hook_fn};

/// Reply sent to non-admin callers of a gated hook.
pub const DENIAL: &str = "Sorry, you are not authorized to do that.";

/// Restrict a handler to callers whose full source identity is in
/// the session's admin set. Denied callers get exactly one denial
/// reply and the inner handler never runs. Identity comes from the
/// triggering message; an invocation without one (a poll) is denied
/// silently, since there is no caller to answer.
pub fn admin_only(session: Arc<Session>, handler: HookFn) -> HookFn {
    hook_fn(move |ctx: HookContext| {
        let session = Arc::clone(&session);
        let handler = Arc::clone(&handler);
        async move {
            let Some(message) = ctx.message.clone() else {
                return Ok(());
            };
            if !session.is_admin(&message.source) {
                info!(source = %message.source, "denied admin-only hook");
                message.dispatch(DENIAL).await;
                return Ok(());
            }
            handler(ctx).await
        }
    })
}

/// Require a non-empty argument: a bare invocation replies with the
/// usage line instead of running the handler.
pub fn require_params(usage: &str, handler: HookFn) -> HookFn {
    let usage = usage.to_owned();
    hook_fn(move |ctx: HookContext| {
        let usage = usage.clone();
        let handler = Arc::clone(&handler);
        async move {
            let has_argument = ctx
                .argument
                .as_deref()
                .is_some_and(|arg| !arg.trim().is_empty());
            if has_argument {
                return handler(ctx).await;
            }
            if let Some(message) = &ctx.message {
                message.dispatch(&usage).await;
            }
            Ok(())
        }
    })
}
