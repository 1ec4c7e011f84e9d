//! Shared fixtures: a recording chat mock and a scripted status source.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use async_trait::async_trait;

use poyobot::chat::{ChatMessage, ChatOps, Embed, MemberProfile};
use poyobot::handlers::status::{ServerStatus, StatusSource};

/// Everything the bot did to the chat platform, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatAction {
    Text { channel_id: u64, text: String },
    Embed { channel_id: u64, embed: Embed },
    Deleted { channel_id: u64, message_id: u64 },
    Presence(Option<String>),
    RoleAdded { user_id: u64, role_id: u64 },
    RoleRemoved { user_id: u64, role_id: u64 },
}

/// ChatOps mock recording every action.
///
/// Knows one guild: role "Muted" (900), channel "muted" (901), and a
/// member "kirby" (77).
#[derive(Default)]
pub struct MockChat {
    actions: Mutex<Vec<ChatAction>>,
    next_message_id: AtomicU64,
}

impl MockChat {
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
}

#[async_trait]
impl ChatOps for MockChat {
    async fn send_text(&self, channel_id: u64, text: &str) -> Result<u64> {
        self.record(ChatAction::Text {
            channel_id,
            text: text.to_string(),
        });
        Ok(self.next_message_id.fetch_add(1, Ordering::Relaxed) + 1)
    }

    async fn send_embed(&self, channel_id: u64, embed: Embed) -> Result<u64> {
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
        Ok((query == "kirby").then_some(77))
    }

    async fn member_profile(&self, _guild_id: u64, user_id: u64) -> Result<Option<MemberProfile>> {
        if user_id != 77 && user_id != 42 {
            return Ok(None);
        }
        Ok(Some(MemberProfile {
            user_id,
            username: if user_id == 77 { "kirby" } else { "alice" }.into(),
            display_name: if user_id == 77 { "Kirby" } else { "Alice" }.into(),
            created_at: chrono::DateTime::from_timestamp(1_500_000_000, 0).unwrap(),
            joined_at: chrono::DateTime::from_timestamp(1_600_000_000, 0),
            status: Some("Online".into()),
            activity: Some("15-122".into()),
            colour: 0x066b_fb,
            top_role: Some("regular".into()),
            is_bot: false,
            avatar_url: None,
        }))
    }
}

/// Status source scripted per address.
pub struct ScriptedStatus;

#[async_trait]
impl StatusSource for ScriptedStatus {
    async fn query(&self, address: &str) -> Result<ServerStatus> {
        match address {
            "127.0.0.1" => Ok(ServerStatus {
                online_players: 3,
                max_players: 20,
                sample: vec!["kirby".into(), "dedede".into(), "meta".into()],
                motd: "come craft".into(),
            }),
            _ => Err(anyhow::anyhow!("connection refused")),
        }
    }
}

/// A message from user 42 ("alice") in guild 7, channel 100.
pub fn message(text: &str) -> ChatMessage {
    ChatMessage {
        author_id: 42,
        author_name: "alice".into(),
        display_name: "Alice".into(),
        channel_id: 100,
        guild_id: Some(7),
        text: text.to_string(),
    }
}
