//! Discord event handler for serenity.
//!
//! Translates gateway events into the engine's platform-neutral shapes
//! and runs one dispatch per event.

use std::sync::Arc;

use serenity::all::{
    ActivityData, Context, EventHandler, GatewayIntents, GuildMemberUpdateEvent, Member, Message,
    Ready,
};
use serenity::async_trait;
use tracing::{debug, info};

use crate::chat::{ChatMessage, ChatOps, MemberState};
use crate::dispatch::{DispatchEngine, MemberEventRegistry};

use super::ops::DiscordOps;

/// Handler for Discord gateway events.
pub struct DiscordHandler {
    pub engine: Arc<DispatchEngine>,
    pub members: Arc<MemberEventRegistry>,
    /// Presence applied once the session is ready.
    pub presence_game: Option<String>,
}

impl DiscordHandler {
    /// Required gateway intents for the bot.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::DIRECT_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT
            | GatewayIntents::GUILD_MEMBERS
            | GatewayIntents::GUILD_PRESENCES
    }
}

fn member_state(member: &Member) -> MemberState {
    MemberState {
        guild_id: member.guild_id.get(),
        user_id: member.user.id.get(),
        username: member.user.name.to_string(),
        display_name: member.display_name().to_string(),
    }
}

#[async_trait]
impl EventHandler for DiscordHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(
            bot_name = %ready.user.name,
            guilds = ready.guilds.len(),
            "discord session ready"
        );
        ctx.set_activity(self.presence_game.clone().map(ActivityData::playing));
    }

    async fn message(&self, ctx: Context, msg: Message) {
        // Skip bot messages to prevent loops.
        if msg.author.bot {
            return;
        }

        let display_name = msg
            .member
            .as_ref()
            .and_then(|member| member.nick.clone())
            .or_else(|| msg.author.global_name.clone())
            .map(|name| name.to_string())
            .unwrap_or_else(|| msg.author.name.to_string());

        let message = ChatMessage {
            author_id: msg.author.id.get(),
            author_name: msg.author.name.to_string(),
            display_name,
            channel_id: msg.channel_id.get(),
            guild_id: msg.guild_id.map(|id| id.get()),
            text: msg.content.to_string(),
        };

        let chat: Arc<dyn ChatOps> = Arc::new(DiscordOps::new(ctx));
        let summary = self.engine.dispatch(&chat, &message).await;
        debug!(
            ran = summary.ran,
            denied = summary.denied,
            failed = summary.failed,
            "dispatch finished"
        );
    }

    async fn guild_member_update(
        &self,
        ctx: Context,
        old_if_available: Option<Member>,
        new: Option<Member>,
        event: GuildMemberUpdateEvent,
    ) {
        let before = old_if_available.as_ref().map(member_state);
        let after = match new.as_ref() {
            Some(member) => member_state(member),
            // Fall back to the raw event payload when the cache cannot
            // supply the full member.
            None => MemberState {
                guild_id: event.guild_id.get(),
                user_id: event.user.id.get(),
                username: event.user.name.to_string(),
                display_name: event
                    .nick
                    .clone()
                    .or_else(|| event.user.global_name.clone())
                    .map(|name| name.to_string())
                    .unwrap_or_else(|| event.user.name.to_string()),
            },
        };

        let chat: Arc<dyn ChatOps> = Arc::new(DiscordOps::new(ctx));
        self.members.dispatch(&chat, before.as_ref(), &after).await;
    }
}
