//! Inbound message and voice-state models.
//!
//! These are the records the gateway and cache collaborators hand to the
//! engine. They carry only what dispatch needs: where a message came from,
//! who sent it, and what it said.

use serde::{Deserialize, Serialize};

/// A chat message received from the gateway.
///
/// The unit of input for command dispatch. The engine reads the identity
/// fields and `content`; anything else the platform attaches to a message is
/// the gateway collaborator's concern and never reaches this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Guild (server) the message was sent in.
    pub guild_id: String,
    /// Channel the message was sent in. Replies go back here.
    pub channel_id: String,
    /// User that authored the message.
    pub author_id: String,
    /// Raw text content.
    pub content: String,
}

impl InboundMessage {
    /// Convenience constructor, mostly for tests and demos.
    pub fn new(
        guild_id: impl Into<String>,
        channel_id: impl Into<String>,
        author_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            guild_id: guild_id.into(),
            channel_id: channel_id.into(),
            author_id: author_id.into(),
            content: content.into(),
        }
    }
}

/// Voice-channel membership for a single user, as reported by the presence
/// cache collaborator.
///
/// A state may exist for a user who is not currently in any channel, so
/// `channel_id` is optional on top of the lookup itself being optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceState {
    /// The voice channel the user currently occupies, if any.
    pub channel_id: Option<String>,
}

impl VoiceState {
    /// A state placing the user in the given channel.
    pub fn in_channel(channel_id: impl Into<String>) -> Self {
        Self {
            channel_id: Some(channel_id.into()),
        }
    }
}
