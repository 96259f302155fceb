//! Volume control, as a command with subcommands.
//!
//! `volume` on its own only explains itself; the actual intents live on the
//! `up` and `down` subcommands. Subcommand dispatch is resolved by the
//! dispatcher against [`Command::sub_commands`], and subcommands carry no
//! throttle gate of their own.

use std::sync::Arc;

use async_trait::async_trait;
use cadenza_core::{
    BoxedSubCommand, Command, CommandContext, HandlerResult, InboundMessage, SubCommand,
};

use super::voice::control_intent;

const USAGE_HINT: &str = "Tell me which way: `volume up` or `volume down`.";

/// Parent command owning the `up` and `down` subcommands.
pub struct Volume {
    subs: Vec<BoxedSubCommand>,
}

impl Volume {
    /// Creates the command with both subcommands attached.
    pub fn new() -> Self {
        Self {
            subs: vec![Arc::new(VolumeUp), Arc::new(VolumeDown)],
        }
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Command for Volume {
    fn name(&self) -> &str {
        "volume"
    }

    fn aliases(&self) -> &[&str] {
        &["vol"]
    }

    fn description(&self) -> Option<&str> {
        Some("Nudge the playback volume.")
    }

    fn group(&self) -> &str {
        "music"
    }

    fn sub_commands(&self) -> &[BoxedSubCommand] {
        &self.subs
    }

    async fn run(
        &self,
        ctx: &CommandContext,
        message: &InboundMessage,
        _args: &str,
    ) -> HandlerResult {
        // Reached when no subcommand token matched.
        ctx.api.create_message(&message.channel_id, USAGE_HINT).await?;
        Ok(())
    }
}

/// Raise the volume one step.
pub struct VolumeUp;

#[async_trait]
impl SubCommand for VolumeUp {
    fn name(&self) -> &str {
        "up"
    }

    fn aliases(&self) -> &[&str] {
        &["+"]
    }

    fn description(&self) -> Option<&str> {
        Some("Raise the volume.")
    }

    fn parent(&self) -> &str {
        "volume"
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
            "lavalink:VOLUME",
            Some(("direction", "up")),
            "Pump it up.",
        )
        .await
    }
}

/// Lower the volume one step.
pub struct VolumeDown;

#[async_trait]
impl SubCommand for VolumeDown {
    fn name(&self) -> &str {
        "down"
    }

    fn aliases(&self) -> &[&str] {
        &["-"]
    }

    fn description(&self) -> Option<&str> {
        Some("Lower the volume.")
    }

    fn parent(&self) -> &str {
        "volume"
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
            "lavalink:VOLUME",
            Some(("direction", "down")),
            "Bringing it down.",
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{TestPorts, message};

    #[tokio::test]
    async fn bare_volume_replies_with_usage() {
        let ports = TestPorts::new();
        let ctx = ports.context();

        Volume::new().run(&ctx, &message(), "").await.unwrap();

        assert_eq!(ports.replies(), vec![USAGE_HINT.to_string()]);
        assert!(ports.published().is_empty());
    }

    #[tokio::test]
    async fn up_publishes_a_directional_intent() {
        let ports = TestPorts::new();
        ports.place_user("u1", "voice-a");
        ports.place_user("bot", "voice-a");
        let ctx = ports.context();

        VolumeUp.run(&ctx, &message(), "").await.unwrap();

        let published = ports.published();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].topic, "lavalink:VOLUME");
        assert_eq!(published[0].payload["direction"], "up");
        assert_eq!(published[0].payload["guild"], "g1");
    }

    #[test]
    fn sub_commands_point_back_at_volume() {
        let volume = Volume::new();
        for sub in volume.sub_commands() {
            assert_eq!(sub.parent(), volume.name());
        }
    }
}
