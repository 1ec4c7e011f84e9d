//! Chat collaborator interface.
//!
//! The dispatch engine and the command handlers talk to the platform
//! through [`ChatOps`], a platform-neutral trait. The serenity-backed
//! implementation lives in `discord::ops`; tests substitute a recording
//! mock.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// One inbound chat message, as delivered by the gateway.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub author_id: u64,
    /// Account name of the author.
    pub author_name: String,
    /// Server nickname if set, otherwise the account/display name.
    pub display_name: String,
    pub channel_id: u64,
    /// Absent for direct messages.
    pub guild_id: Option<u64>,
    pub text: String,
}

/// Snapshot of a guild member, used by membership-update events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberState {
    pub guild_id: u64,
    pub user_id: u64,
    pub username: String,
    pub display_name: String,
}

/// A platform-neutral embed. Converted to the Discord builder form
/// inside the serenity implementation only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Embed {
    pub title: Option<String>,
    pub description: Option<String>,
    pub colour: Option<u32>,
    /// (name, value, inline)
    pub fields: Vec<(String, String, bool)>,
    pub thumbnail: Option<String>,
    pub footer_text: Option<String>,
    pub footer_icon: Option<String>,
}

impl Embed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn colour(mut self, colour: u32) -> Self {
        self.colour = Some(colour);
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into(), true));
        self
    }

    pub fn thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail = Some(url.into());
        self
    }

    pub fn footer(mut self, text: impl Into<String>, icon: Option<String>) -> Self {
        self.footer_text = Some(text.into());
        self.footer_icon = icon;
        self
    }
}

/// Profile data for the `!info` command.
#[derive(Debug, Clone)]
pub struct MemberProfile {
    pub user_id: u64,
    pub username: String,
    pub display_name: String,
    /// When the account was created (derived from the snowflake).
    pub created_at: DateTime<Utc>,
    /// When the member joined the guild.
    pub joined_at: Option<DateTime<Utc>>,
    /// Presence status ("Online", "Idle", ...) if the gateway cache has it.
    pub status: Option<String>,
    /// Current activity name, if any.
    pub activity: Option<String>,
    /// Display colour from the member's highest coloured role.
    pub colour: u32,
    pub top_role: Option<String>,
    pub is_bot: bool,
    pub avatar_url: Option<String>,
}

/// Operations the bot performs against the chat platform.
///
/// Send operations return the delivered message id so callers can
/// delete or edit later.
#[async_trait]
pub trait ChatOps: Send + Sync {
    async fn send_text(&self, channel_id: u64, text: &str) -> Result<u64>;

    async fn send_embed(&self, channel_id: u64, embed: Embed) -> Result<u64>;

    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<()>;

    /// Update the bot's own presence; `None` clears it.
    async fn set_presence(&self, game: Option<&str>) -> Result<()>;

    /// Look up a role id by exact name.
    async fn find_role(&self, guild_id: u64, name: &str) -> Result<Option<u64>>;

    /// Look up a text channel id by exact name.
    async fn find_text_channel(&self, guild_id: u64, name: &str) -> Result<Option<u64>>;

    async fn add_role(&self, guild_id: u64, user_id: u64, role_id: u64) -> Result<()>;

    async fn remove_role(&self, guild_id: u64, user_id: u64, role_id: u64) -> Result<()>;

    /// Resolve a member by name, id, or nickname (case-insensitive).
    async fn find_member(&self, guild_id: u64, query: &str) -> Result<Option<u64>>;

    async fn member_profile(&self, guild_id: u64, user_id: u64) -> Result<Option<MemberProfile>>;
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording chat mock shared by the unit tests.

    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

    use super::*;

    /// Everything a handler did to the chat platform, in order.
    #[derive(Debug, Clone, PartialEq)]
    pub enum ChatAction {
        Text { channel_id: u64, text: String },
        Embed { channel_id: u64, embed: Embed },
        Deleted { channel_id: u64, message_id: u64 },
        Presence(Option<String>),
        RoleAdded { user_id: u64, role_id: u64 },
        RoleRemoved { user_id: u64, role_id: u64 },
    }

    /// ChatOps mock that records actions and can be told to fail sends.
    #[derive(Default)]
    pub struct RecordingChat {
        pub actions: Mutex<Vec<ChatAction>>,
        pub fail_sends: AtomicBool,
        next_message_id: AtomicU64,
    }

    impl RecordingChat {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn actions(&self) -> Vec<ChatAction> {
            self.actions.lock().unwrap().clone()
        }

        pub fn texts(&self) -> Vec<String> {
            self.actions()
                .into_iter()
                .filter_map(|action| match action {
                    ChatAction::Text { text, .. } => Some(text),
                    _ => None,
                })
                .collect()
        }

        pub fn embeds(&self) -> Vec<Embed> {
            self.actions()
                .into_iter()
                .filter_map(|action| match action {
                    ChatAction::Embed { embed, .. } => Some(embed),
                    _ => None,
                })
                .collect()
        }

        fn record(&self, action: ChatAction) {
            self.actions.lock().unwrap().push(action);
        }

        fn check_send(&self) -> Result<()> {
            if self.fail_sends.load(Ordering::Relaxed) {
                anyhow::bail!("send failed (test)");
            }
            Ok(())
        }
    }

    #[async_trait]
    impl ChatOps for RecordingChat {
        async fn send_text(&self, channel_id: u64, text: &str) -> Result<u64> {
            self.check_send()?;
            self.record(ChatAction::Text {
                channel_id,
                text: text.to_string(),
            });
            Ok(self.next_message_id.fetch_add(1, Ordering::Relaxed) + 1)
        }

        async fn send_embed(&self, channel_id: u64, embed: Embed) -> Result<u64> {
            self.check_send()?;
            self.record(ChatAction::Embed { channel_id, embed });
            Ok(self.next_message_id.fetch_add(1, Ordering::Relaxed) + 1)
        }

        async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<()> {
            self.record(ChatAction::Deleted {
                channel_id,
                message_id,
            });
            Ok(())
        }

        async fn set_presence(&self, game: Option<&str>) -> Result<()> {
            self.record(ChatAction::Presence(game.map(str::to_string)));
            Ok(())
        }

        async fn find_role(&self, _guild_id: u64, name: &str) -> Result<Option<u64>> {
            Ok((name == "Muted").then_some(900))
        }

        async fn find_text_channel(&self, _guild_id: u64, name: &str) -> Result<Option<u64>> {
            Ok((name == "muted").then_some(901))
        }

        async fn add_role(&self, _guild_id: u64, user_id: u64, role_id: u64) -> Result<()> {
            self.record(ChatAction::RoleAdded { user_id, role_id });
            Ok(())
        }

        async fn remove_role(&self, _guild_id: u64, user_id: u64, role_id: u64) -> Result<()> {
            self.record(ChatAction::RoleRemoved { user_id, role_id });
            Ok(())
        }

        async fn find_member(&self, _guild_id: u64, query: &str) -> Result<Option<u64>> {
            Ok((query == "alice").then_some(42))
        }

        async fn member_profile(
            &self,
            _guild_id: u64,
            user_id: u64,
        ) -> Result<Option<MemberProfile>> {
            Ok(Some(MemberProfile {
                user_id,
                username: "alice".into(),
                display_name: "Alice".into(),
                created_at: chrono::DateTime::from_timestamp(1_500_000_000, 0).unwrap(),
                joined_at: chrono::DateTime::from_timestamp(1_600_000_000, 0),
                status: Some("Online".into()),
                activity: None,
                colour: 0x066b_fb,
                top_role: Some("regular".into()),
                is_bot: false,
                avatar_url: None,
            }))
        }
    }

    /// A message in a guild channel, for handler tests.
    pub fn guild_message(text: &str) -> ChatMessage {
        ChatMessage {
            author_id: 42,
            author_name: "alice".into(),
            display_name: "Alice".into(),
            channel_id: 100,
            guild_id: Some(7),
            text: text.to_string(),
        }
    }
}
