//! Ports to the engine's external collaborators.
//!
//! The engine does not speak HTTP or the broker wire protocol itself. It
//! consumes three narrow capabilities, injected at construction time:
//!
//! - [`ChatApi`]: send a reply to a chat channel over the platform REST API
//! - [`ControlBus`]: publish a control intent to the remote audio worker
//! - [`VoiceStates`]: read-only voice-channel membership lookup
//!
//! Production implementations live outside this crate. Tests and the demo
//! binary provide in-memory doubles.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::message::VoiceState;

// =============================================================================
// Chat REST API
// =============================================================================

/// Errors surfaced by the chat REST collaborator.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The platform accepted the request and refused it.
    #[error("request rejected by the chat platform: {0}")]
    Rejected(String),

    /// The request never made it to the platform.
    #[error("chat API transport failure: {0}")]
    Transport(String),
}

/// Result type for chat API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// The REST reply capability.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Sends a text message to the given channel.
    async fn create_message(&self, channel_id: &str, content: &str) -> ApiResult<()>;
}

/// A shared chat API handle.
pub type BoxedChatApi = Arc<dyn ChatApi>;

// =============================================================================
// Control bus
// =============================================================================

/// Errors surfaced by the broker publish collaborator.
#[derive(Debug, Clone, Error)]
pub enum PublishError {
    /// No broker connection is available.
    #[error("broker connection unavailable")]
    NotConnected,

    /// The broker refused or dropped the publish.
    #[error("failed to publish to '{topic}': {reason}")]
    Failed {
        /// Topic the publish was addressed to.
        topic: String,
        /// Reason reported by the broker client.
        reason: String,
    },
}

/// Result type for publish calls.
pub type PublishResult<T> = Result<T, PublishError>;

/// Delivery options for an outbound control intent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishOptions {
    /// How long the message may sit on the bus before the broker discards
    /// it. This bounds the intent's lifetime, not a response wait: the
    /// publisher never blocks on the worker's reaction.
    pub expiration: Option<Duration>,
}

impl PublishOptions {
    /// Options with the given bus lifetime.
    pub fn expires_in(expiration: Duration) -> Self {
        Self {
            expiration: Some(expiration),
        }
    }
}

/// The publish path to the remote audio worker.
#[async_trait]
pub trait ControlBus: Send + Sync {
    /// Publishes a control intent.
    ///
    /// The contract is "submitted", not "delivered": the returned future
    /// resolves once the broker client has accepted the message.
    async fn publish(
        &self,
        topic: &str,
        payload: Value,
        options: PublishOptions,
    ) -> PublishResult<()>;
}

/// A shared control bus handle.
pub type BoxedControlBus = Arc<dyn ControlBus>;

// =============================================================================
// Voice-state cache
// =============================================================================

/// Read-only lookup of voice-channel membership, keyed by guild and user.
#[async_trait]
pub trait VoiceStates: Send + Sync {
    /// Returns the voice state of `user_id` within `guild_id`, or `None` if
    /// the cache holds no state for that pair.
    async fn get(&self, guild_id: &str, user_id: &str) -> Option<VoiceState>;
}

/// A shared voice-state cache handle.
pub type BoxedVoiceStates = Arc<dyn VoiceStates>;
