//! Shared voice-channel policy for playback commands.
//!
//! A playback control intent is only honored for a caller who shares the
//! bot's voice channel. The denial replies distinguish a caller who is in
//! no voice channel at all from one sitting in the wrong channel. A bot
//! that is not in any voice channel does not block the intent; the worker
//! decides what an intent without a session means.

use std::time::Duration;

use cadenza_core::{CommandContext, HandlerResult, InboundMessage, PublishOptions};
use serde_json::json;
use tracing::debug;

pub(crate) const NOT_IN_VOICE: &str =
    "I know, I know, you are eager to do that but make sure you are in a voice channel first.";

pub(crate) const WRONG_CHANNEL: &str = "Look, don't be that guy alright?";

/// Bus lifetime for playback control intents. A stale intent is worse than
/// a dropped one.
pub(crate) const INTENT_EXPIRATION: Duration = Duration::from_secs(60);

/// Where the caller stands relative to the bot's voice session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum VoicePlacement {
    /// Caller may issue playback intents.
    Together,
    /// Caller is in no voice channel.
    CallerAbsent,
    /// Caller and bot sit in different channels.
    DifferentChannels,
}

/// Resolves the caller's placement from the voice-state cache.
pub(crate) async fn placement(ctx: &CommandContext, message: &InboundMessage) -> VoicePlacement {
    let caller = ctx.voice.get(&message.guild_id, &message.author_id).await;
    let Some(caller_channel) = caller.and_then(|state| state.channel_id) else {
        return VoicePlacement::CallerAbsent;
    };

    let bot = ctx.voice.get(&message.guild_id, &ctx.bot_id).await;
    match bot.and_then(|state| state.channel_id) {
        Some(bot_channel) if bot_channel != caller_channel => VoicePlacement::DifferentChannels,
        _ => VoicePlacement::Together,
    }
}

/// Runs the full control-intent flow for one playback command: policy
/// check, publish, success reply.
///
/// On a policy denial the matching reply is sent and nothing is published.
pub(crate) async fn control_intent(
    ctx: &CommandContext,
    message: &InboundMessage,
    topic: &str,
    payload_extra: Option<(&str, &str)>,
    success_reply: &str,
) -> HandlerResult {
    match placement(ctx, message).await {
        VoicePlacement::CallerAbsent => {
            ctx.api.create_message(&message.channel_id, NOT_IN_VOICE).await?;
        }
        VoicePlacement::DifferentChannels => {
            ctx.api.create_message(&message.channel_id, WRONG_CHANNEL).await?;
        }
        VoicePlacement::Together => {
            let mut payload = json!({ "guild": message.guild_id });
            if let Some((key, value)) = payload_extra {
                payload[key] = json!(value);
            }

            debug!(%topic, guild = %message.guild_id, "publishing control intent");
            ctx.bus
                .publish(topic, payload, PublishOptions::expires_in(INTENT_EXPIRATION))
                .await?;
            ctx.api
                .create_message(&message.channel_id, success_reply)
                .await?;
        }
    }

    Ok(())
}
