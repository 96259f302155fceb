//! Resume playback.

use async_trait::async_trait;
use cadenza_core::{
    Command, CommandContext, HandlerResult, InboundMessage, ThrottleGate, ThrottlePolicy,
};

use super::voice::control_intent;

/// Tells the audio worker to resume a paused track.
pub struct Resume {
    gate: ThrottleGate,
}

impl Resume {
    /// Creates the command with its throttle gate.
    pub fn new() -> Self {
        Self {
            gate: ThrottleGate::new(ThrottlePolicy::per_seconds(2, 3)),
        }
    }
}

impl Default for Resume {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Command for Resume {
    fn name(&self) -> &str {
        "resume"
    }

    fn aliases(&self) -> &[&str] {
        &["unpause"]
    }

    fn description(&self) -> Option<&str> {
        Some("Resume the music.")
    }

    fn group(&self) -> &str {
        "music"
    }

    fn throttle(&self) -> Option<&ThrottleGate> {
        Some(&self.gate)
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
            "lavalink:RESUME",
            None,
            "Back to business.",
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{TestPorts, message};

    #[tokio::test]
    async fn publishes_resume_intent_when_together() {
        let ports = TestPorts::new();
        ports.place_user("u1", "voice-a");
        ports.place_user("bot", "voice-a");
        let ctx = ports.context();

        Resume::new().run(&ctx, &message(), "").await.unwrap();

        let published = ports.published();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].topic, "lavalink:RESUME");
        assert_eq!(ports.replies(), vec!["Back to business.".to_string()]);
    }
}
