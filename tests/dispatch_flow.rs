//! End-to-end dispatch through the full startup command set.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{ChatAction, MockChat, ScriptedStatus, message};
use poyobot::chat::ChatOps;
use poyobot::config::Config;
use poyobot::dispatch::{AuthStore, DispatchEngine, DispatchSummary};
use poyobot::handlers;

const CONFIG: &str = r#"
    [discord]
    token = "test-token"

    [auth]
    default_level = 0
    [auth.overrides]
    "73007938238676992" = 5

    [presence]
    game = "15-122"

    [[status.servers]]
    label = "Main Server"
    address = "127.0.0.1"

    [[status.servers]]
    label = "Alt. Server"
    address = "127.0.0.1:25566"

    [mute]
    role = "Muted"
    channel = "muted"
    seconds = 15

    [poyo]
    images = ["https://i.imgur.com/72Whn87.png"]
    delete_after_secs = 120

    [commands.game]
    required_auth = 3
    deny_notice = "Insufficient permissions"
"#;

fn engine() -> anyhow::Result<(DispatchEngine, Arc<MockChat>, Arc<dyn ChatOps>)> {
    let config: Config = toml::from_str(CONFIG)?;
    let auth = Arc::new(AuthStore::from_config(&config.auth)?);
    let registry = handlers::build_registry(&config, Arc::new(ScriptedStatus));
    let chat = Arc::new(MockChat::new());
    let ops: Arc<dyn ChatOps> = Arc::clone(&chat) as Arc<dyn ChatOps>;
    Ok((DispatchEngine::new(registry, auth), chat, ops))
}

#[tokio::test]
async fn roll_runs_for_an_ordinary_user() {
    let (engine, chat, ops) = engine().expect("engine setup failed");

    let summary = engine.dispatch(&ops, &message("!roll d20")).await;

    assert_eq!(summary, DispatchSummary { ran: 1, denied: 0, failed: 0 });
    let embeds = chat.embeds();
    assert_eq!(embeds.len(), 1);
    assert!(embeds[0].title.as_deref().unwrap().starts_with("You rolled a "));
}

#[tokio::test]
async fn game_is_denied_with_the_configured_notice() {
    let (engine, chat, ops) = engine().expect("engine setup failed");

    let summary = engine.dispatch(&ops, &message("!game osu")).await;

    assert_eq!(summary, DispatchSummary { ran: 0, denied: 1, failed: 0 });
    assert_eq!(chat.texts(), vec!["Insufficient permissions"]);
    // The presence was never touched.
    assert!(
        !chat
            .actions()
            .iter()
            .any(|a| matches!(a, ChatAction::Presence(_)))
    );
}

#[tokio::test]
async fn game_runs_for_the_seeded_admin() {
    let (engine, chat, ops) = engine().expect("engine setup failed");

    let mut admin = message("!game Kirby Super Star");
    admin.author_id = 73007938238676992;

    let summary = engine.dispatch(&ops, &admin).await;

    assert_eq!(summary.ran, 1);
    assert_eq!(
        chat.actions(),
        vec![ChatAction::Presence(Some("Kirby Super Star".into()))]
    );
}

#[tokio::test(start_paused = true)]
async fn flip_me_triggers_the_mute_and_not_the_coin() {
    let (engine, chat, ops) = engine().expect("engine setup failed");

    let summary = engine.dispatch(&ops, &message("!flip me")).await;

    // Both "!flip" and "!flip me" matched; the coin handler defers.
    assert_eq!(summary.ran, 2);
    assert_eq!(
        chat.actions(),
        vec![
            ChatAction::RoleAdded { user_id: 42, role_id: 900 },
            ChatAction::Text {
                channel_id: 901,
                text: "Alice has been muted for 15 seconds.".into(),
            },
            ChatAction::RoleRemoved { user_id: 42, role_id: 900 },
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn poyo_anywhere_in_a_message_posts_and_later_deletes() {
    let (engine, chat, ops) = engine().expect("engine setup failed");

    let summary = engine.dispatch(&ops, &message("oh poyo poyo")).await;

    // One command object, one invocation, however often the keyword
    // occurs.
    assert_eq!(summary.ran, 1);
    assert_eq!(chat.texts(), vec!["https://i.imgur.com/72Whn87.png"]);

    tokio::time::sleep(Duration::from_secs(121)).await;
    assert!(
        chat.actions()
            .iter()
            .any(|a| matches!(a, ChatAction::Deleted { .. }))
    );
}

#[tokio::test]
async fn status_summarizes_reachable_and_unreachable_servers() {
    let (engine, chat, ops) = engine().expect("engine setup failed");

    let summary = engine.dispatch(&ops, &message("!status")).await;

    assert_eq!(summary.ran, 1);
    let embeds = chat.embeds();
    let description = embeds[0].description.as_deref().unwrap();
    assert!(description.contains("Main Server: 3 players online [kirby, dedede, meta], \"come craft\""));
    assert!(description.contains("Could not contact Alt. Server!"));
}

#[tokio::test]
async fn info_profiles_a_named_member() {
    let (engine, chat, ops) = engine().expect("engine setup failed");

    let summary = engine.dispatch(&ops, &message("!info Kirby")).await;

    assert_eq!(summary.ran, 1);
    let embeds = chat.embeds();
    assert_eq!(embeds[0].title.as_deref(), Some("Profile for kirby"));
}

#[tokio::test]
async fn a_failing_candidate_leaves_its_sibling_untouched() {
    let (engine, chat, ops) = engine().expect("engine setup failed");

    // "!roll banana poyo" matches both "!roll " (which rejects the
    // syntax) and "poyo" (which posts the image).
    let summary = engine.dispatch(&ops, &message("!roll banana poyo")).await;

    assert_eq!(summary.ran, 1);
    assert_eq!(summary.failed, 1);
    let embeds = chat.embeds();
    assert_eq!(embeds[0].title.as_deref(), Some("Bad syntax!"));
    assert_eq!(chat.texts(), vec!["https://i.imgur.com/72Whn87.png"]);
}

#[tokio::test]
async fn unmatched_messages_do_nothing() {
    let (engine, chat, ops) = engine().expect("engine setup failed");

    let summary = engine.dispatch(&ops, &message("hello there")).await;

    assert_eq!(summary, DispatchSummary::default());
    assert!(chat.actions().is_empty());
}
