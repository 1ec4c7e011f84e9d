//! `!status` — game-server status summary.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Local;
use tracing::debug;

use crate::chat::Embed;
use crate::config::StatusConfig;
use crate::dispatch::{ChatHandler, CommandContext};
use crate::error::{CommandError, CommandResult};

use super::EMBED_COLOUR;

/// What the status collaborator reports for one server.
#[derive(Debug, Clone)]
pub struct ServerStatus {
    pub online_players: u32,
    pub max_players: u32,
    /// Names of a sample of the online players, possibly empty.
    pub sample: Vec<String>,
    pub motd: String,
}

/// The game-server status collaborator.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn query(&self, address: &str) -> Result<ServerStatus>;
}

/// Status source backed by the Server List Ping exchange.
pub struct McPingSource {
    timeout: Duration,
}

impl McPingSource {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl StatusSource for McPingSource {
    async fn query(&self, address: &str) -> Result<ServerStatus> {
        let status = mc_ping::query_timeout(address, self.timeout).await?;
        Ok(ServerStatus {
            online_players: status.players.online,
            max_players: status.players.max,
            sample: status
                .players
                .sample
                .into_iter()
                .map(|player| player.name)
                .collect(),
            motd: status.description.text().to_string(),
        })
    }
}

/// One server shown in the summary.
#[derive(Debug, Clone)]
pub struct StatusTarget {
    pub label: String,
    pub address: String,
}

/// Queries each bound target and posts one embed titled with the
/// current time.
pub struct StatusHandler {
    targets: Vec<StatusTarget>,
    source: Arc<dyn StatusSource>,
}

impl StatusHandler {
    pub fn new(targets: Vec<StatusTarget>, source: Arc<dyn StatusSource>) -> Self {
        Self { targets, source }
    }

    pub fn from_config(config: &StatusConfig, source: Arc<dyn StatusSource>) -> Self {
        let targets = config
            .servers
            .iter()
            .map(|server| StatusTarget {
                label: server.label.clone(),
                address: server.address.clone(),
            })
            .collect();
        Self::new(targets, source)
    }
}

fn status_line(label: &str, status: &ServerStatus) -> String {
    let count = status.online_players;
    let plural = if count == 1 { "" } else { "s" };
    let names = if status.sample.is_empty() {
        String::new()
    } else {
        format!(" [{}]", status.sample.join(", "))
    };
    format!(
        "{label}: {count} player{plural} online{names}, \"{motd}\"",
        motd = status.motd
    )
}

fn failure_line(label: &str) -> String {
    format!("Could not contact {label}!")
}

#[async_trait]
impl ChatHandler for StatusHandler {
    async fn handle(&self, ctx: &CommandContext<'_>) -> CommandResult {
        if self.targets.is_empty() {
            ctx.chat
                .send_text(ctx.message.channel_id, "No game servers are configured.")
                .await?;
            return Ok(());
        }

        let mut lines = Vec::with_capacity(self.targets.len());
        let mut last_error = None;
        for target in &self.targets {
            match self.source.query(&target.address).await {
                Ok(status) => lines.push(status_line(&target.label, &status)),
                Err(e) => {
                    debug!(label = %target.label, address = %target.address, error = %e, "status query failed");
                    lines.push(failure_line(&target.label));
                    last_error = Some(e);
                }
            }
        }

        let all_down = lines.len() == self.targets.len()
            && last_error.is_some()
            && lines.iter().all(|line| line.starts_with("Could not contact"));

        let embed = Embed::new()
            .title(Local::now().format("%B %d at %I:%M %p").to_string())
            .description(lines.join("\n"))
            .colour(EMBED_COLOUR);
        ctx.chat.send_embed(ctx.message.channel_id, embed).await?;

        // The user already got the friendly lines; flag total outage
        // for the log.
        if all_down {
            if let Some(source) = last_error {
                return Err(CommandError::Unavailable {
                    what: "game servers".into(),
                    source,
                });
            }
        }
        Ok(())
    }
}
