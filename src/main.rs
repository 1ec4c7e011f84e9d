//! poyobot entry point: load config, build the registries, connect.

use std::sync::Arc;
use std::time::Duration;

use serenity::all::Client;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use poyobot::config::Config;
use poyobot::discord::DiscordHandler;
use poyobot::dispatch::{AuthStore, DispatchEngine};
use poyobot::handlers::{self, McPingSource, StatusSource};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "poyobot.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;
    let token = config.discord.resolve_token()?;

    let auth = Arc::new(AuthStore::from_config(&config.auth)?);
    let status_source: Arc<dyn StatusSource> = Arc::new(McPingSource::new(Duration::from_secs(
        config.status.timeout_secs,
    )));
    let registry = handlers::build_registry(&config, status_source);
    info!(
        commands = registry.len(),
        status_targets = config.status.servers.len(),
        "Command registry built"
    );

    let engine = Arc::new(DispatchEngine::new(registry, auth));
    let members = Arc::new(handlers::build_member_registry());

    let handler = DiscordHandler {
        engine,
        members,
        presence_game: config.presence.game.clone(),
    };

    let mut client = Client::builder(&token, DiscordHandler::intents())
        .event_handler(handler)
        .await?;

    info!("Starting poyobot");
    client.start().await?;

    Ok(())
}
