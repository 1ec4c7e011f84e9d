//! `!flip` — coin flips, single or tallied.

use async_trait::async_trait;
use rand::Rng;

use crate::chat::Embed;
use crate::dispatch::{ChatHandler, CommandContext};
use crate::error::CommandResult;

use super::EMBED_COLOUR;

/// Tally size cap; keeps a hostile `!flip 99999999999` bounded.
const MAX_FLIPS: u64 = 100_000_000;

/// What a `!flip` invocation asked for.
#[derive(Debug, PartialEq, Eq)]
enum FlipRequest {
    /// One coin, result as an embed title.
    Single,
    /// Flip this many coins and report the tally.
    Tally(u64),
    /// `!flip me` belongs to the mute command, which matches the same
    /// message; produce no output here.
    Defer,
}

fn parse_flip(args: &[&str]) -> FlipRequest {
    match args.first() {
        None => FlipRequest::Single,
        Some(&"me") => FlipRequest::Defer,
        Some(arg) => match arg.parse::<u64>() {
            Ok(count) if count >= 2 => FlipRequest::Tally(count.min(MAX_FLIPS)),
            // Anything unparsable or below 2 falls back to one coin.
            _ => FlipRequest::Single,
        },
    }
}

/// Tally line with the winning side bolded.
fn tally_line(heads: u64, tails: u64) -> String {
    let (head_mark, tail_mark) = if heads > tails {
        ("**", "")
    } else if tails > heads {
        ("", "**")
    } else {
        ("", "")
    };
    format!("{head_mark}Heads: {heads}{head_mark} | {tail_mark}Tails: {tails}{tail_mark}")
}

pub struct FlipHandler;

#[async_trait]
impl ChatHandler for FlipHandler {
    async fn handle(&self, ctx: &CommandContext<'_>) -> CommandResult {
        let embed = match parse_flip(&ctx.args()) {
            FlipRequest::Defer => return Ok(()),
            FlipRequest::Single => {
                let title = if rand::thread_rng().gen_bool(0.5) {
                    "Heads!"
                } else {
                    "Tails!"
                };
                Embed::new().title(title).colour(EMBED_COLOUR)
            }
            FlipRequest::Tally(count) => {
                let mut rng = rand::thread_rng();
                let mut heads = 0u64;
                for _ in 0..count {
                    if rng.gen_bool(0.5) {
                        heads += 1;
                    }
                }
                Embed::new()
                    .description(tally_line(heads, count - heads))
                    .colour(EMBED_COLOUR)
            }
        };
        ctx.chat.send_embed(ctx.message.channel_id, embed).await?;
        Ok(())
    }
}
