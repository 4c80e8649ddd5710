//! Kind-grouped store of every registered hook, plus the sorted
//! trigger listings the help surface exposes.

use crate::hook::{Hook, HookSpec};

#[derive(Default)]
pub struct HookRegistry {
    commands: Vec<Hook>,
    keywords: Vec<Hook>,
    patterns: Vec<Hook>,
    polls: Vec<Hook>,
}

impl HookRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, hook: Hook) {
        match hook.spec {
            HookSpec::Command(_) => self.commands.push(hook),
            HookSpec::Keyword(_) => self.keywords.push(hook),
            HookSpec::Pattern(_) => self.patterns.push(hook),
            HookSpec::Poll(_) => self.polls.push(hook),
        }
    }

    #[must_use]
    pub fn commands(&self) -> &[Hook] {
        &self.commands
    }

    #[must_use]
    pub fn keywords(&self) -> &[Hook] {
        &self.keywords
    }

    #[must_use]
    pub fn patterns(&self) -> &[Hook] {
        &self.patterns
    }

    #[must_use]
    pub fn polls(&self) -> &[Hook] {
        &self.polls
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len() + self.keywords.len() + self.patterns.len() + self.polls.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn active(hooks: &[Hook]) -> Vec<String> {
        let mut triggers: Vec<String> = hooks.iter().map(|h| h.spec.trigger()).collect();
        triggers.sort();
        triggers
    }

    /// Sorted command words currently registered.
    #[must_use]
    pub fn active_commands(&self) -> Vec<String> {
        Self::active(&self.commands)
    }

    /// Sorted keyword prefixes currently registered.
    #[must_use]
    pub fn active_keywords(&self) -> Vec<String> {
        Self::active(&self.keywords)
    }

    /// Sorted pattern sources currently registered.
    #[must_use]
    pub fn active_patterns(&self) -> Vec<String> {
        Self::active(&self.patterns)
    }

    /// Case-insensitive usage lookup over command and keyword hooks,
    /// for `help <trigger>`.
    #[must_use]
    pub fn usage(&self, trigger: &str) -> Option<&str> {
        self.commands
            .iter()
            .chain(self.keywords.iter())
            .find(|h| h.spec.trigger().eq_ignore_ascii_case(trigger))
            .map(|h| h.usage.as_str())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::hook::{HookSet, hook_fn};

    fn sample() -> HookRegistry {
        let mut registry = HookRegistry::new();
        let hooks = HookSet::new()
            .command("version", "Show the version", hook_fn(|_| async { Ok(()) }))
            .command("echo", "Echo text back", hook_fn(|_| async { Ok(()) }))
            .keyword("bug", "Look up a bug", hook_fn(|_| async { Ok(()) }))
            .poll(
                "tick",
                "Heartbeat",
                Duration::from_secs(1),
                hook_fn(|_| async { Ok(()) }),
            )
            .build();
        for hook in hooks {
            registry.insert(hook);
        }
        registry
    }

    #[test]
    fn hooks_are_grouped_by_kind() {
        let registry = sample();
        assert_eq!(registry.commands().len(), 2);
        assert_eq!(registry.keywords().len(), 1);
        assert_eq!(registry.polls().len(), 1);
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn active_listings_are_sorted() {
        let registry = sample();
        assert_eq!(registry.active_commands(), vec!["echo", "version"]);
        assert_eq!(registry.active_keywords(), vec!["bug"]);
    }

    #[test]
    fn usage_lookup_is_case_insensitive() {
        let registry = sample();
        assert_eq!(registry.usage("ECHO"), Some("Echo text back"));
        assert_eq!(registry.usage("nope"), None);
    }
}
