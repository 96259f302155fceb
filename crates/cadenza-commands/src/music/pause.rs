//! Pause playback.

use async_trait::async_trait;
use cadenza_core::{
    Command, CommandContext, HandlerResult, InboundMessage, ThrottleGate, ThrottlePolicy,
};

use super::voice::control_intent;

/// Tells the audio worker to pause the current track.
///
/// Throttled to two calls per user per three seconds; pause is the command
/// people mash.
pub struct Pause {
    gate: ThrottleGate,
}

impl Pause {
    /// Creates the command with its throttle gate.
    pub fn new() -> Self {
        Self {
            gate: ThrottleGate::new(ThrottlePolicy::per_seconds(2, 3)),
        }
    }
}

impl Default for Pause {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Command for Pause {
    fn name(&self) -> &str {
        "pause"
    }

    fn description(&self) -> Option<&str> {
        Some("Pause the music.")
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
            "lavalink:PAUSE",
            None,
            "Hold on, hold on! I got this.",
        )
        .await
    }
}
