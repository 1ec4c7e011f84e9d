//! Configuration loading and management.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("no token configured: set discord.token or discord.token_file")]
    MissingToken,
    #[error("bad user id in auth overrides: {0:?}")]
    BadUserId(String),
}

/// Bot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Discord connection.
    pub discord: DiscordConfig,
    /// Authorization levels.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Presence shown when the bot comes online.
    #[serde(default)]
    pub presence: PresenceConfig,
    /// Game-server status targets for the `!status` command.
    #[serde(default)]
    pub status: StatusConfig,
    /// Roleplay mute parameters for the `!flip me` command.
    #[serde(default)]
    pub mute: MuteConfig,
    /// Image bank for the `poyo` command.
    #[serde(default)]
    pub poyo: PoyoConfig,
    /// Per-command tuning.
    #[serde(default)]
    pub commands: CommandsConfig,
}

/// Discord connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscordConfig {
    /// Bot token, inline. Prefer `token_file` outside of tests.
    pub token: Option<String>,
    /// Path to a file whose first line is the bot token.
    pub token_file: Option<String>,
}

impl DiscordConfig {
    /// Resolve the bot token, preferring the inline value.
    pub fn resolve_token(&self) -> Result<String, ConfigError> {
        if let Some(token) = &self.token {
            return Ok(token.trim().to_string());
        }
        if let Some(path) = &self.token_file {
            let content = std::fs::read_to_string(path)?;
            let token = content.lines().next().unwrap_or("").trim();
            if !token.is_empty() {
                return Ok(token.to_string());
            }
        }
        Err(ConfigError::MissingToken)
    }
}

/// Authorization configuration.
///
/// TOML map keys are strings, so override keys are user-id strings and
/// parsed when the store is seeded.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// Level assigned to users with no override.
    #[serde(default)]
    pub default_level: u8,
    /// Permanently elevated users: user id -> level.
    #[serde(default)]
    pub overrides: HashMap<String, u8>,
}

impl AuthConfig {
    /// Parse the override map keys into user ids.
    pub fn parsed_overrides(&self) -> Result<Vec<(u64, u8)>, ConfigError> {
        self.overrides
            .iter()
            .map(|(id, level)| {
                id.parse::<u64>()
                    .map(|id| (id, *level))
                    .map_err(|_| ConfigError::BadUserId(id.clone()))
            })
            .collect()
    }
}

/// Presence configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PresenceConfig {
    /// Game shown as "Playing ..." once the gateway session is ready.
    pub game: Option<String>,
}

/// Status command configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusConfig {
    /// Per-server query deadline in seconds.
    #[serde(default = "default_status_timeout")]
    pub timeout_secs: u64,
    /// Servers queried in order.
    #[serde(default)]
    pub servers: Vec<StatusTargetConfig>,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_status_timeout(),
            servers: Vec::new(),
        }
    }
}

fn default_status_timeout() -> u64 {
    5
}

/// One game server shown by `!status`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusTargetConfig {
    /// Display label (e.g. "Main Server").
    pub label: String,
    /// `host` or `host:port`.
    pub address: String,
}

/// Roleplay mute configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MuteConfig {
    /// Role granted for the mute duration.
    #[serde(default = "default_mute_role")]
    pub role: String,
    /// Channel where the mute is announced.
    #[serde(default = "default_mute_channel")]
    pub channel: String,
    /// Mute duration in seconds.
    #[serde(default = "default_mute_seconds")]
    pub seconds: u64,
}

impl Default for MuteConfig {
    fn default() -> Self {
        Self {
            role: default_mute_role(),
            channel: default_mute_channel(),
            seconds: default_mute_seconds(),
        }
    }
}

fn default_mute_role() -> String {
    "Muted".to_string()
}

fn default_mute_channel() -> String {
    "muted".to_string()
}

fn default_mute_seconds() -> u64 {
    15
}

/// Image bank configuration for the `poyo` command.
#[derive(Debug, Clone, Deserialize)]
pub struct PoyoConfig {
    /// Candidate image URLs; one is picked at random per trigger.
    #[serde(default)]
    pub images: Vec<String>,
    /// Seconds before the posted image is deleted.
    #[serde(default = "default_poyo_delete")]
    pub delete_after_secs: u64,
}

impl Default for PoyoConfig {
    fn default() -> Self {
        Self {
            images: Vec::new(),
            delete_after_secs: default_poyo_delete(),
        }
    }
}

fn default_poyo_delete() -> u64 {
    120
}

/// Per-command tuning.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommandsConfig {
    #[serde(default)]
    pub game: GameCommandConfig,
}

/// Tuning for the `!game` presence command.
#[derive(Debug, Clone, Deserialize)]
pub struct GameCommandConfig {
    /// Minimum authorization level.
    #[serde(default = "default_game_auth")]
    pub required_auth: u8,
    /// Notice sent when a too-low user triggers the command. Absent
    /// means silent denial.
    pub deny_notice: Option<String>,
}

impl Default for GameCommandConfig {
    fn default() -> Self {
        Self {
            required_auth: default_game_auth(),
            deny_notice: None,
        }
    }
}

fn default_game_auth() -> u8 {
    3
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
