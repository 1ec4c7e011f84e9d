//! `!roll` — dice and ranged random numbers.

use async_trait::async_trait;
use rand::Rng;

use crate::chat::Embed;
use crate::dispatch::{ChatHandler, CommandContext};
use crate::error::{CommandError, CommandResult};

use super::EMBED_COLOUR;

/// Parse the roll spec after the keyword.
///
/// Accepted forms: `d<N>` (1..=N), `<A>,<B>`, `<A>, <B>` (comma then a
/// separate word), and `<A> <B>`.
fn parse_roll(args: &[&str]) -> Result<(i64, i64), String> {
    let first = args.first().ok_or("missing roll spec")?;

    if let Some(sides) = first.strip_prefix('d') {
        let sides: i64 = sides.parse().map_err(|_| format!("bad die: {first:?}"))?;
        if sides < 1 {
            return Err(format!("die needs at least one side, got {sides}"));
        }
        return Ok((1, sides));
    }

    let (low_text, high_text) = match first.split_once(',') {
        Some((low, "")) => (low, *args.get(1).ok_or("missing upper bound")?),
        Some((low, high)) => (low, high),
        None => (*first, *args.get(1).ok_or("missing upper bound")?),
    };

    let low: i64 = low_text
        .parse()
        .map_err(|_| format!("bad lower bound: {low_text:?}"))?;
    let high: i64 = high_text
        .parse()
        .map_err(|_| format!("bad upper bound: {high_text:?}"))?;
    if low > high {
        return Err(format!("empty range: {low}..{high}"));
    }
    Ok((low, high))
}

pub struct RollHandler;

#[async_trait]
impl ChatHandler for RollHandler {
    async fn handle(&self, ctx: &CommandContext<'_>) -> CommandResult {
        match parse_roll(&ctx.args()) {
            Ok((low, high)) => {
                let roll = rand::thread_rng().gen_range(low..=high);
                let embed = Embed::new()
                    .title(format!("You rolled a {roll}!"))
                    .colour(EMBED_COLOUR);
                ctx.chat.send_embed(ctx.message.channel_id, embed).await?;
                Ok(())
            }
            Err(reason) => {
                let embed = Embed::new().title("Bad syntax!").colour(EMBED_COLOUR);
                ctx.chat.send_embed(ctx.message.channel_id, embed).await?;
                Err(CommandError::BadInput(reason))
            }
        }
    }
}
