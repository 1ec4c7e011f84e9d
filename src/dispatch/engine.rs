//! The dispatch engine: one inbound message in, zero or more command
//! executions out.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::chat::{ChatMessage, ChatOps};
use crate::error::CommandError;

use super::auth::AuthStore;
use super::command::CommandContext;
use super::registry::CommandRegistry;

/// Outcome counts for one dispatch, mostly for tests and logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Candidates that ran to completion.
    pub ran: usize,
    /// Candidates refused by the auth gate.
    pub denied: usize,
    /// Candidates whose handler returned an error.
    pub failed: usize,
}

/// Matches one message against the registry and runs every permitted
/// candidate.
pub struct DispatchEngine {
    registry: CommandRegistry,
    auth: Arc<AuthStore>,
}

impl DispatchEngine {
    pub fn new(registry: CommandRegistry, auth: Arc<AuthStore>) -> Self {
        Self { registry, auth }
    }

    pub fn auth(&self) -> &Arc<AuthStore> {
        &self.auth
    }

    /// Process one inbound message.
    ///
    /// Candidates are evaluated independently in the registry's keyword
    /// order: every match either runs or is denied, with no
    /// first-match-wins short circuit. A handler failure is logged and
    /// never prevents the remaining candidates from being evaluated.
    pub async fn dispatch(
        &self,
        chat: &Arc<dyn ChatOps>,
        message: &ChatMessage,
    ) -> DispatchSummary {
        let level = self.auth.effective_level(message.author_id);
        let mut summary = DispatchSummary::default();

        for command in self.registry.matching(&message.text) {
            if level < command.required_auth() {
                info!(
                    user = %message.display_name,
                    user_id = message.author_id,
                    keyword = command.keyword(),
                    level,
                    required = command.required_auth(),
                    outcome = "denied",
                    "command denied"
                );
                summary.denied += 1;
                if let Some(notice) = command.deny_notice() {
                    if let Err(e) = chat.send_text(message.channel_id, notice).await {
                        warn!(keyword = command.keyword(), error = %e, "failed to send deny notice");
                    }
                }
                continue;
            }

            let ctx = CommandContext {
                message,
                chat,
                auth_level: level,
            };
            match command.invoke(&ctx).await {
                Ok(()) => {
                    info!(
                        user = %message.display_name,
                        user_id = message.author_id,
                        keyword = command.keyword(),
                        outcome = "ran",
                        "command ran"
                    );
                    summary.ran += 1;
                }
                Err(e) => {
                    summary.failed += 1;
                    match &e {
                        CommandError::BadInput(_) => {
                            info!(
                                user_id = message.author_id,
                                keyword = command.keyword(),
                                code = e.error_code(),
                                error = %e,
                                "command rejected input"
                            );
                        }
                        CommandError::Unavailable { .. } => {
                            warn!(
                                user_id = message.author_id,
                                keyword = command.keyword(),
                                code = e.error_code(),
                                error = %e,
                                "command collaborator unavailable"
                            );
                        }
                        CommandError::Internal(_) => {
                            error!(
                                user_id = message.author_id,
                                keyword = command.keyword(),
                                code = e.error_code(),
                                error = %e,
                                "command failed"
                            );
                        }
                    }
                }
            }
        }

        summary
    }
}
