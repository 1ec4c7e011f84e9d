//! Discord integration: the serenity gateway handler and the
//! serenity-backed [`crate::chat::ChatOps`] implementation.

mod gateway;
mod ops;

pub use gateway::DiscordHandler;
pub use ops::DiscordOps;
