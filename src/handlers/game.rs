//! `!game` — set the bot's presence.

use async_trait::async_trait;

use crate::dispatch::{ChatHandler, CommandContext};
use crate::error::CommandResult;

/// Sets the "Playing ..." presence to the rest of the message, or
/// clears it when there is none.
pub struct GameHandler;

#[async_trait]
impl ChatHandler for GameHandler {
    async fn handle(&self, ctx: &CommandContext<'_>) -> CommandResult {
        let game = ctx.rest();
        ctx.chat.set_presence(game.as_deref()).await?;
        Ok(())
    }
}
