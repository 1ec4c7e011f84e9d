//! `!flip me` — the roleplay mute.
//!
//! Grants the mute role, announces the mute in the mute channel, and
//! reverts the role when the timer runs out. The whole sequence runs
//! inside this handler; it is the one deliberately long-running command
//! and later dispatches proceed while it sleeps.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::config::MuteConfig;
use crate::dispatch::{ChatHandler, CommandContext};
use crate::error::CommandResult;

/// Delay between granting the role and announcing it.
const ANNOUNCE_DELAY: Duration = Duration::from_secs(3);

pub struct MuteHandler {
    role_name: String,
    channel_name: String,
    seconds: u64,
}

impl MuteHandler {
    pub fn new(role_name: impl Into<String>, channel_name: impl Into<String>, seconds: u64) -> Self {
        Self {
            role_name: role_name.into(),
            channel_name: channel_name.into(),
            seconds,
        }
    }

    pub fn from_config(config: &MuteConfig) -> Self {
        Self::new(&config.role, &config.channel, config.seconds)
    }
}

#[async_trait]
impl ChatHandler for MuteHandler {
    async fn handle(&self, ctx: &CommandContext<'_>) -> CommandResult {
        // Mutes only make sense inside a guild.
        let Some(guild_id) = ctx.message.guild_id else {
            return Ok(());
        };

        let Some(role_id) = ctx.chat.find_role(guild_id, &self.role_name).await? else {
            debug!(role = %self.role_name, "mute role not found, skipping");
            return Ok(());
        };
        let Some(channel_id) = ctx
            .chat
            .find_text_channel(guild_id, &self.channel_name)
            .await?
        else {
            debug!(channel = %self.channel_name, "mute channel not found, skipping");
            return Ok(());
        };

        let user_id = ctx.message.author_id;
        ctx.chat.add_role(guild_id, user_id, role_id).await?;

        tokio::time::sleep(ANNOUNCE_DELAY).await;
        let announcement = format!(
            "{} has been muted for {} seconds.",
            ctx.message.display_name, self.seconds
        );
        ctx.chat.send_text(channel_id, &announcement).await?;

        tokio::time::sleep(Duration::from_secs(self.seconds.saturating_sub(1))).await;
        ctx.chat.remove_role(guild_id, user_id, role_id).await?;
        Ok(())
    }
}
