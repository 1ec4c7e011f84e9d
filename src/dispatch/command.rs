//! Commands: a keyword rule bound to a handler and an auth requirement.

use std::sync::Arc;

use async_trait::async_trait;

use crate::chat::{ChatMessage, ChatOps};
use crate::error::CommandResult;

use super::rule::{MatchMode, MatchRule};

/// Invocation context passed to a command handler.
///
/// Bound parameters (status targets, image banks, mute settings) are
/// not here: each handler struct owns its own, fixed at registration.
pub struct CommandContext<'a> {
    /// The triggering message.
    pub message: &'a ChatMessage,
    /// Chat platform operations.
    pub chat: &'a Arc<dyn ChatOps>,
    /// The author's effective authorization level.
    pub auth_level: u8,
}

impl CommandContext<'_> {
    /// Whitespace-separated arguments after the first token.
    pub fn args(&self) -> Vec<&str> {
        self.message.text.split_whitespace().skip(1).collect()
    }

    /// Everything after the first token, joined with single spaces.
    /// `None` when the message is the bare keyword.
    pub fn rest(&self) -> Option<String> {
        let args = self.args();
        if args.is_empty() {
            None
        } else {
            Some(args.join(" "))
        }
    }
}

/// Trait implemented by all command handlers.
#[async_trait]
pub trait ChatHandler: Send + Sync {
    async fn handle(&self, ctx: &CommandContext<'_>) -> CommandResult;
}

/// A registered command: keyword, match rule, auth gate, handler.
pub struct Command {
    keyword: String,
    rule: MatchRule,
    required_auth: u8,
    deny_notice: Option<String>,
    handler: Box<dyn ChatHandler>,
}

impl Command {
    /// Create a command triggered by `keyword` at `mode`.
    ///
    /// The keyword is lowercased here so it compares correctly against
    /// lowercased message text.
    pub fn new(keyword: impl Into<String>, mode: MatchMode, handler: Box<dyn ChatHandler>) -> Self {
        let keyword = keyword.into().to_lowercase();
        let rule = MatchRule::new(keyword.clone(), mode);
        Self {
            keyword,
            rule,
            required_auth: 0,
            deny_notice: None,
            handler,
        }
    }

    /// Require at least `level` to run.
    pub fn with_auth(mut self, level: u8) -> Self {
        self.required_auth = level;
        self
    }

    /// Send `notice` instead of running when the author's level is too
    /// low. Without a notice, denial is silent.
    pub fn with_deny_notice(mut self, notice: impl Into<String>) -> Self {
        self.deny_notice = Some(notice.into());
        self
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn rule(&self) -> &MatchRule {
        &self.rule
    }

    pub fn required_auth(&self) -> u8 {
        self.required_auth
    }

    pub fn deny_notice(&self) -> Option<&str> {
        self.deny_notice.as_deref()
    }

    /// Run the handler.
    pub async fn invoke(&self, ctx: &CommandContext<'_>) -> CommandResult {
        self.handler.handle(ctx).await
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("keyword", &self.keyword)
            .field("rule", &self.rule)
            .field("required_auth", &self.required_auth)
            .field("deny_notice", &self.deny_notice)
            .finish_non_exhaustive()
    }
}
