//! Liveness check.

use async_trait::async_trait;
use cadenza_core::{Command, CommandContext, HandlerResult, InboundMessage};

/// Replies immediately; useful for checking the bot is alive at all.
pub struct Ping;

#[async_trait]
impl Command for Ping {
    fn name(&self) -> &str {
        "ping"
    }

    fn description(&self) -> Option<&str> {
        Some("Check that the bot is responding.")
    }

    async fn run(
        &self,
        ctx: &CommandContext,
        message: &InboundMessage,
        _args: &str,
    ) -> HandlerResult {
        ctx.api.create_message(&message.channel_id, "Pong!").await?;
        Ok(())
    }
}
