//! The event handler contract.
//!
//! Events react to signals delivered off the message bus: gateway lifecycle
//! notices, voice updates, worker acknowledgements. They differ from
//! commands in two ways. An event can be statically disabled, and a failure
//! inside an event's `run` is caught right here at the contract boundary.
//! Bus signals arrive at high frequency and independently of one another;
//! one handler's failure must never interrupt delivery of the next signal,
//! and it must never reach the transport layer.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::HandlerResult;
use crate::signal::{ErrorSignal, ErrorSink};

/// A handler for one named bus signal.
#[async_trait]
pub trait Event: Send + Sync {
    /// The bus signal name this handler reacts to.
    fn name(&self) -> &str;

    /// Whether this handler is active. Static after construction; a runtime
    /// toggle is a future extension, not part of this contract.
    fn enabled(&self) -> bool {
        true
    }

    /// Processes one signal payload.
    async fn run(&self, payload: &Value) -> HandlerResult;

    /// Runs the handler if it is enabled.
    ///
    /// A disabled handler is an exact no-op: no error, no log. A failure
    /// inside [`run`](Self::run) is converted into an
    /// [`ErrorSignal::Event`] carrying the handler name, the payload, and
    /// the error, then swallowed.
    async fn dispatch(&self, payload: Value, errors: &ErrorSink) {
        if !self.enabled() {
            return;
        }

        if let Err(error) = self.run(&payload).await {
            errors.emit(ErrorSignal::Event {
                event: self.name().to_string(),
                payload,
                error,
            });
        }
    }
}

/// A shared event handle.
pub type BoxedEvent = Arc<dyn Event>;
