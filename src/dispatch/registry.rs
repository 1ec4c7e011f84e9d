//! Command registry keyed by trigger keyword.

use std::collections::BTreeMap;

use super::command::Command;

/// One command per keyword, last registration wins.
///
/// Backed by an ordered map so the candidate order for a multi-match
/// message is deterministic (keyword order). Registration happens during
/// startup configuration; it must not race a concurrent dispatch.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    by_keyword: BTreeMap<String, Command>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the command registered under its keyword.
    pub fn register(&mut self, command: Command) {
        self.by_keyword.insert(command.keyword().to_string(), command);
    }

    /// Look up the command for an exact keyword.
    pub fn get(&self, keyword: &str) -> Option<&Command> {
        self.by_keyword.get(keyword)
    }

    /// All registered commands whose rule matches `text`, in keyword
    /// order. Several keywords can match one message; every match is a
    /// candidate.
    pub fn matching<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a Command> {
        self.by_keyword
            .values()
            .filter(move |command| command.rule().matches(text))
    }

    pub fn len(&self) -> usize {
        self.by_keyword.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_keyword.is_empty()
    }
}
