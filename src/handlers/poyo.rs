//! `poyo` — post an image, delete it later.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tracing::{debug, warn};

use crate::config::PoyoConfig;
use crate::dispatch::{ChatHandler, CommandContext};
use crate::error::CommandResult;

pub struct PoyoHandler {
    images: Vec<String>,
    delete_after: Duration,
}

impl PoyoHandler {
    pub fn new(images: Vec<String>, delete_after: Duration) -> Self {
        Self {
            images,
            delete_after,
        }
    }

    pub fn from_config(config: &PoyoConfig) -> Self {
        Self::new(
            config.images.clone(),
            Duration::from_secs(config.delete_after_secs),
        )
    }
}

#[async_trait]
impl ChatHandler for PoyoHandler {
    async fn handle(&self, ctx: &CommandContext<'_>) -> CommandResult {
        if self.images.is_empty() {
            debug!("no poyo images configured");
            return Ok(());
        }
        let pick = rand::thread_rng().gen_range(0..self.images.len());
        let channel_id = ctx.message.channel_id;
        let message_id = ctx.chat.send_text(channel_id, &self.images[pick]).await?;

        // The deletion happens off-dispatch so the engine is free
        // immediately.
        let chat = Arc::clone(ctx.chat);
        let delete_after = self.delete_after;
        tokio::spawn(async move {
            tokio::time::sleep(delete_after).await;
            if let Err(e) = chat.delete_message(channel_id, message_id).await {
                warn!(channel_id, message_id, error = %e, "failed to delete poyo");
            }
        });
        Ok(())
    }
}
