//! Command handler bodies and startup registration.

pub mod flip;
pub mod game;
pub mod info;
pub mod mute;
pub mod poyo;
pub mod roll;
pub mod status;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::chat::{ChatOps, MemberState};
use crate::config::Config;
use crate::dispatch::{Command, CommandRegistry, MatchMode, MemberEventRegistry, MemberHandler};
use crate::error::CommandResult;

pub use status::{McPingSource, StatusSource};

/// House colour for every embed the bot posts.
pub const EMBED_COLOUR: u32 = 0x066b_fb;

/// Build the command registry from static configuration.
///
/// Note the `!flip` / `!flip me` pair: a `!flip me` message matches
/// both prefixes, the flip handler stays quiet for it, and the mute
/// handler does the work.
pub fn build_registry(config: &Config, status_source: Arc<dyn StatusSource>) -> CommandRegistry {
    let mut registry = CommandRegistry::new();

    let mut game = Command::new("!game ", MatchMode::Prefix, Box::new(game::GameHandler))
        .with_auth(config.commands.game.required_auth);
    if let Some(notice) = &config.commands.game.deny_notice {
        game = game.with_deny_notice(notice);
    }
    registry.register(game);

    registry.register(Command::new(
        "!roll ",
        MatchMode::Prefix,
        Box::new(roll::RollHandler),
    ));
    registry.register(Command::new(
        "!flip",
        MatchMode::Prefix,
        Box::new(flip::FlipHandler),
    ));
    registry.register(Command::new(
        "!status",
        MatchMode::Prefix,
        Box::new(status::StatusHandler::from_config(
            &config.status,
            status_source,
        )),
    ));
    registry.register(Command::new(
        "!flip me",
        MatchMode::Prefix,
        Box::new(mute::MuteHandler::from_config(&config.mute)),
    ));
    registry.register(Command::new(
        "poyo",
        MatchMode::Contains,
        Box::new(poyo::PoyoHandler::from_config(&config.poyo)),
    ));
    registry.register(Command::new(
        "!info",
        MatchMode::Prefix,
        Box::new(info::InfoHandler),
    ));

    registry
}

/// Build the membership-update registry.
pub fn build_member_registry() -> MemberEventRegistry {
    let mut registry = MemberEventRegistry::new();
    registry.register(Box::new(NameChangeLogger));
    registry
}

/// Logs display-name changes; purely observational.
struct NameChangeLogger;

#[async_trait]
impl MemberHandler for NameChangeLogger {
    async fn handle(
        &self,
        _chat: &Arc<dyn ChatOps>,
        before: Option<&MemberState>,
        after: &MemberState,
    ) -> CommandResult {
        if let Some(before) = before {
            if before.display_name != after.display_name {
                info!(
                    user_id = after.user_id,
                    guild_id = after.guild_id,
                    from = %before.display_name,
                    to = %after.display_name,
                    "member display name changed"
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        toml::from_str(
            r#"
            [discord]
            token = "t"
            [commands.game]
            deny_notice = "Insufficient permissions"
            "#,
        )
        .unwrap()
    }

    struct NeverUp;

    #[async_trait]
    impl StatusSource for NeverUp {
        async fn query(&self, _address: &str) -> anyhow::Result<status::ServerStatus> {
            Err(anyhow::anyhow!("down"))
        }
    }

    #[test]
    fn registry_carries_the_full_command_set() {
        let registry = build_registry(&test_config(), Arc::new(NeverUp));
        assert_eq!(registry.len(), 7);
        for keyword in ["!game ", "!roll ", "!flip", "!status", "!flip me", "poyo", "!info"] {
            assert!(registry.get(keyword).is_some(), "missing {keyword:?}");
        }
        assert_eq!(registry.get("!game ").unwrap().required_auth(), 3);
        assert_eq!(
            registry.get("!game ").unwrap().deny_notice(),
            Some("Insufficient permissions")
        );
    }

    #[test]
    fn flip_me_matches_two_commands() {
        let registry = build_registry(&test_config(), Arc::new(NeverUp));
        let matched: Vec<_> = registry
            .matching("!flip me")
            .map(|c| c.keyword().to_string())
            .collect();
        assert_eq!(matched, vec!["!flip", "!flip me"]);
    }

    #[test]
    fn member_registry_has_the_name_logger() {
        assert_eq!(build_member_registry().len(), 1);
    }
}
