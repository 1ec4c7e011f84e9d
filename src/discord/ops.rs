//! Serenity-backed implementation of the chat collaborator trait.

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serenity::all::{
    ActivityData, ChannelId, ChannelType, Colour, Context, CreateEmbed, CreateEmbedFooter,
    CreateMessage, GuildId, Member, MessageId, RoleId, UserId,
};

use crate::chat::{ChatOps, Embed, MemberProfile};

/// Per-event chat operations over the serenity context.
pub struct DiscordOps {
    ctx: Context,
}

impl DiscordOps {
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }
}

/// Convert the platform-neutral embed into serenity's builder form.
fn build_embed(embed: Embed) -> CreateEmbed {
    let mut builder = CreateEmbed::new();
    if let Some(title) = embed.title {
        builder = builder.title(title);
    }
    if let Some(description) = embed.description {
        builder = builder.description(description);
    }
    if let Some(colour) = embed.colour {
        builder = builder.colour(Colour::new(colour));
    }
    for (name, value, inline) in embed.fields {
        builder = builder.field(name, value, inline);
    }
    if let Some(thumbnail) = embed.thumbnail {
        builder = builder.thumbnail(thumbnail);
    }
    if let Some(text) = embed.footer_text {
        let mut footer = CreateEmbedFooter::new(text);
        if let Some(icon) = embed.footer_icon {
            footer = footer.icon_url(icon);
        }
        builder = builder.footer(footer);
    }
    builder
}

fn timestamp_to_utc(timestamp: serenity::model::Timestamp) -> DateTime<Utc> {
    DateTime::from_timestamp(timestamp.unix_timestamp(), 0).unwrap_or_default()
}

/// Whether `member` answers to `query` (already lowercased).
fn member_answers_to(member: &Member, query: &str) -> bool {
    if member.user.name.to_lowercase() == query {
        return true;
    }
    if member.user.id.get().to_string() == query {
        return true;
    }
    if let Some(nick) = &member.nick {
        if nick.to_lowercase() == query {
            return true;
        }
    }
    if let Some(global) = &member.user.global_name {
        if global.to_lowercase() == query {
            return true;
        }
    }
    false
}

#[async_trait]
impl ChatOps for DiscordOps {
    async fn send_text(&self, channel_id: u64, text: &str) -> Result<u64> {
        let message = ChannelId::new(channel_id)
            .send_message(&self.ctx.http, CreateMessage::new().content(text))
            .await
            .context("failed to send message")?;
        Ok(message.id.get())
    }

    async fn send_embed(&self, channel_id: u64, embed: Embed) -> Result<u64> {
        let message = ChannelId::new(channel_id)
            .send_message(&self.ctx.http, CreateMessage::new().embed(build_embed(embed)))
            .await
            .context("failed to send embed")?;
        Ok(message.id.get())
    }

    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<()> {
        ChannelId::new(channel_id)
            .delete_message(&self.ctx.http, MessageId::new(message_id))
            .await
            .context("failed to delete message")?;
        Ok(())
    }

    async fn set_presence(&self, game: Option<&str>) -> Result<()> {
        self.ctx.set_activity(game.map(ActivityData::playing));
        Ok(())
    }

    async fn find_role(&self, guild_id: u64, name: &str) -> Result<Option<u64>> {
        let roles = GuildId::new(guild_id)
            .roles(&self.ctx.http)
            .await
            .context("failed to list roles")?;
        Ok(roles
            .iter()
            .find(|(_, role)| role.name == name)
            .map(|(id, _)| id.get()))
    }

    async fn find_text_channel(&self, guild_id: u64, name: &str) -> Result<Option<u64>> {
        let channels = GuildId::new(guild_id)
            .channels(&self.ctx.http)
            .await
            .context("failed to list channels")?;
        Ok(channels
            .iter()
            .find(|(_, channel)| channel.kind == ChannelType::Text && channel.name == name)
            .map(|(id, _)| id.get()))
    }

    async fn add_role(&self, guild_id: u64, user_id: u64, role_id: u64) -> Result<()> {
        self.ctx
            .http
            .add_member_role(
                GuildId::new(guild_id),
                UserId::new(user_id),
                RoleId::new(role_id),
                None,
            )
            .await
            .context("failed to add role")?;
        Ok(())
    }

    async fn remove_role(&self, guild_id: u64, user_id: u64, role_id: u64) -> Result<()> {
        self.ctx
            .http
            .remove_member_role(
                GuildId::new(guild_id),
                UserId::new(user_id),
                RoleId::new(role_id),
                None,
            )
            .await
            .context("failed to remove role")?;
        Ok(())
    }

    async fn find_member(&self, guild_id: u64, query: &str) -> Result<Option<u64>> {
        let members = GuildId::new(guild_id)
            .members(&self.ctx.http, None, None)
            .await
            .context("failed to list members")?;
        Ok(members
            .iter()
            .find(|member| member_answers_to(member, query))
            .map(|member| member.user.id.get()))
    }

    async fn member_profile(&self, guild_id: u64, user_id: u64) -> Result<Option<MemberProfile>> {
        let guild = GuildId::new(guild_id);
        let member = match guild.member(&self.ctx.http, UserId::new(user_id)).await {
            Ok(member) => member,
            Err(_) => return Ok(None),
        };
        let roles = guild
            .roles(&self.ctx.http)
            .await
            .context("failed to list roles")?;

        let mut member_roles: Vec<_> = member
            .roles
            .iter()
            .filter_map(|role_id| roles.get(role_id))
            .collect();
        member_roles.sort_by_key(|role| role.position);

        let top_role = member_roles.last().map(|role| role.name.to_string());
        let colour = member_roles
            .iter()
            .rev()
            .find(|role| role.colour.0 != 0)
            .map(|role| role.colour.0)
            .unwrap_or(0);

        // Presence only exists in the gateway cache; scoped so the
        // cache ref never crosses an await.
        let (status, activity) = {
            match self.ctx.cache.guild(guild) {
                Some(cached) => match cached.presences.get(&member.user.id) {
                    Some(presence) => (
                        Some(presence.status.name().to_string()),
                        presence
                            .activities
                            .first()
                            .map(|activity| activity.name.to_string()),
                    ),
                    None => (None, None),
                },
                None => (None, None),
            }
        };

        Ok(Some(MemberProfile {
            user_id,
            username: member.user.name.to_string(),
            display_name: member.display_name().to_string(),
            created_at: timestamp_to_utc(member.user.created_at()),
            joined_at: member.joined_at.map(timestamp_to_utc),
            status,
            activity,
            colour,
            top_role,
            is_bot: member.user.bot,
            avatar_url: member.user.avatar_url(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embed_conversion_is_lossless_enough() {
        // The builder is opaque; this just exercises every branch.
        let embed = Embed::new()
            .title("Profile for alice")
            .description("desc")
            .colour(0x066b_fb)
            .field("Full Name", "alice")
            .thumbnail("https://img.example/a.png")
            .footer("Retrieved on June 01 at 10:00 AM", None);
        let _ = build_embed(embed);
    }

    #[test]
    fn timestamps_convert_to_chrono() {
        let ts = serenity::model::Timestamp::from_unix_timestamp(1_500_000_000).unwrap();
        assert_eq!(timestamp_to_utc(ts).timestamp(), 1_500_000_000);
    }
}
