//! Skip the current track.

use async_trait::async_trait;
use cadenza_core::{Command, CommandContext, HandlerResult, InboundMessage};

use super::voice::control_intent;

/// Tells the audio worker to drop the current track and move on.
pub struct Skip;

#[async_trait]
impl Command for Skip {
    fn name(&self) -> &str {
        "skip"
    }

    fn aliases(&self) -> &[&str] {
        &["next"]
    }

    fn description(&self) -> Option<&str> {
        Some("Skip the current track.")
    }

    fn group(&self) -> &str {
        "music"
    }

    async fn run(
        &self,
        ctx: &CommandContext,
        message: &InboundMessage,
        _args: &str,
    ) -> HandlerResult {
        control_intent(
            ctx,
            message,
            "lavalink:SKIP",
            None,
            "Gone. Next one coming up.",
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{TestPorts, message};

    #[tokio::test]
    async fn denial_precedes_publish() {
        let ports = TestPorts::new();
        ports.place_user("u1", "voice-a");
        ports.place_user("bot", "voice-b");
        let ctx = ports.context();

        Skip.run(&ctx, &message(), "").await.unwrap();

        assert!(ports.published().is_empty());
        assert_eq!(ports.replies().len(), 1);
    }

    #[tokio::test]
    async fn publishes_skip_intent_when_together() {
        let ports = TestPorts::new();
        ports.place_user("u1", "voice-a");
        ports.place_user("bot", "voice-a");
        let ctx = ports.context();

        Skip.run(&ctx, &message(), "").await.unwrap();

        let published = ports.published();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].topic, "lavalink:SKIP");
    }
}
