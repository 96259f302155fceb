//! Port to the message-broker consumer collaborator.
//!
//! The runtime consumes the broker as a connect/subscribe/receive
//! capability and never sees the wire protocol. A production implementation
//! wraps an AMQP or comparable client; tests script deliveries from memory.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors surfaced by the broker consumer.
#[derive(Debug, Clone, Error)]
pub enum BrokerError {
    /// Connecting to the broker failed.
    #[error("failed to connect to broker at {url}: {reason}")]
    ConnectionFailed {
        /// The URL that failed to connect.
        url: String,
        /// Reason reported by the client.
        reason: String,
    },

    /// Subscribing to one or more topics failed.
    #[error("failed to subscribe: {reason}")]
    SubscribeFailed {
        /// Reason reported by the client.
        reason: String,
    },
}

/// Result type for broker operations.
pub type BrokerResult<T> = Result<T, BrokerError>;

/// One message taken off the bus.
#[derive(Debug, Clone)]
pub struct Delivery {
    /// The signal name the broker delivered this under.
    pub event: String,
    /// Decoded payload.
    pub payload: Value,
}

impl Delivery {
    /// Convenience constructor, mostly for tests and demos.
    pub fn new(event: impl Into<String>, payload: Value) -> Self {
        Self {
            event: event.into(),
            payload,
        }
    }
}

/// The inbound half of the message-bus collaborator.
#[async_trait]
pub trait BrokerConsumer: Send {
    /// Establishes the connection.
    async fn connect(&mut self, url: &str) -> BrokerResult<()>;

    /// Subscribes to the given signal names.
    async fn subscribe(&mut self, events: &[String]) -> BrokerResult<()>;

    /// Waits for the next delivery. `None` means the connection is closed
    /// for good and the run loop should end.
    async fn recv(&mut self) -> Option<Delivery>;
}
