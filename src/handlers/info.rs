//! `!info` — member profile embed.

use async_trait::async_trait;
use chrono::{DateTime, Local, Utc};

use crate::chat::{Embed, MemberProfile};
use crate::dispatch::{ChatHandler, CommandContext};
use crate::error::{CommandError, CommandResult};

use super::EMBED_COLOUR;

const TIME_FORMAT: &str = "%B %d %Y at %I:%M %p";

fn format_time(time: DateTime<Utc>) -> String {
    time.format(TIME_FORMAT).to_string()
}

fn profile_embed(profile: &MemberProfile) -> Embed {
    let mut embed = Embed::new()
        .title(format!("Profile for {}", profile.username))
        .colour(EMBED_COLOUR)
        .field("Full Name", profile.username.clone())
        .field("Current Name", profile.display_name.clone())
        .field("Discord Join Time", format_time(profile.created_at))
        .field(
            "Server Join Time",
            profile
                .joined_at
                .map(format_time)
                .unwrap_or_else(|| "Unknown".to_string()),
        )
        .field(
            "Current Status",
            profile.status.clone().unwrap_or_else(|| "Unknown".to_string()),
        )
        .field(
            "Current Game",
            profile.activity.clone().unwrap_or_else(|| "None".to_string()),
        )
        .field("Color", format!("#{:06x}", profile.colour))
        .field(
            "Top Role",
            profile.top_role.clone().unwrap_or_else(|| "None".to_string()),
        )
        .field("Is a bot?", if profile.is_bot { "Yes" } else { "No!" })
        .footer(
            format!("Retrieved on {}", Local::now().format("%B %d at %I:%M %p")),
            None,
        );
    if let Some(url) = &profile.avatar_url {
        embed = embed.thumbnail(url.clone());
    }
    embed
}

/// Shows a profile for the author, or for the member named after the
/// keyword.
pub struct InfoHandler;

#[async_trait]
impl ChatHandler for InfoHandler {
    async fn handle(&self, ctx: &CommandContext<'_>) -> CommandResult {
        let channel_id = ctx.message.channel_id;
        let Some(guild_id) = ctx.message.guild_id else {
            ctx.chat
                .send_text(channel_id, "Profiles are only available in a server.")
                .await?;
            return Ok(());
        };

        let target = match ctx.rest() {
            None => ctx.message.author_id,
            Some(query) => {
                match ctx.chat.find_member(guild_id, &query.to_lowercase()).await? {
                    Some(user_id) => user_id,
                    None => {
                        ctx.chat
                            .send_text(channel_id, "Could not find that member.")
                            .await?;
                        return Err(CommandError::BadInput(format!("no member {query:?}")));
                    }
                }
            }
        };

        let Some(profile) = ctx.chat.member_profile(guild_id, target).await? else {
            ctx.chat
                .send_text(channel_id, "Could not find that member.")
                .await?;
            return Err(CommandError::BadInput(format!("no profile for {target}")));
        };

        ctx.chat.send_embed(channel_id, profile_embed(&profile)).await?;
        Ok(())
    }
}
