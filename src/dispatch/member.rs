//! Membership-update handlers.
//!
//! Unlike chat commands there is no keyword matching and no
//! authorization: every registered handler runs on every event, in
//! registration order.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::chat::{ChatOps, MemberState};
use crate::error::{CommandError, CommandResult};

/// Trait implemented by membership-update handlers.
///
/// `before` is absent when the gateway could not supply the previous
/// member state.
#[async_trait]
pub trait MemberHandler: Send + Sync {
    async fn handle(
        &self,
        chat: &Arc<dyn ChatOps>,
        before: Option<&MemberState>,
        after: &MemberState,
    ) -> CommandResult;
}

/// Registry of membership-update handlers, dispatched in registration
/// order.
#[derive(Default)]
pub struct MemberEventRegistry {
    handlers: Vec<Box<dyn MemberHandler>>,
}

impl MemberEventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handler: Box<dyn MemberHandler>) {
        self.handlers.push(handler);
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Run every handler. A failing handler is logged and does not
    /// prevent the rest from running.
    pub async fn dispatch(
        &self,
        chat: &Arc<dyn ChatOps>,
        before: Option<&MemberState>,
        after: &MemberState,
    ) {
        for handler in &self.handlers {
            if let Err(e) = handler.handle(chat, before, after).await {
                match &e {
                    CommandError::BadInput(_) => {
                        info!(user_id = after.user_id, error = %e, "member handler rejected input");
                    }
                    CommandError::Unavailable { .. } => {
                        warn!(user_id = after.user_id, error = %e, "member handler degraded");
                    }
                    CommandError::Internal(_) => {
                        error!(user_id = after.user_id, error = %e, "member handler failed");
                    }
                }
            }
        }
    }
}
