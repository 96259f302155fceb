//! The process-wide error signal.
//!
//! The sole channel by which uncaught failures inside the engine become
//! observable. Dispatch never crashes on a handler failure; the failure,
//! together with the input that provoked it, is pushed onto an unbounded
//! channel for whoever owns the process to log, alert on, or drop.

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::trace;

use crate::error::HandlerError;
use crate::message::InboundMessage;

/// An uncaught failure, paired with the input that provoked it.
#[derive(Debug)]
pub enum ErrorSignal {
    /// A command's `run` failed. Caught at the dispatcher boundary.
    Command {
        /// Name of the failing command.
        command: String,
        /// The message that was being dispatched.
        message: InboundMessage,
        /// The failure itself.
        error: HandlerError,
    },

    /// An event's `run` failed. Caught at the event contract boundary.
    Event {
        /// Name of the failing event handler.
        event: String,
        /// The signal payload that was being processed.
        payload: Value,
        /// The failure itself.
        error: HandlerError,
    },
}

impl ErrorSignal {
    /// Name of the handler the failure originated in.
    pub fn source(&self) -> &str {
        match self {
            Self::Command { command, .. } => command,
            Self::Event { event, .. } => event,
        }
    }

    /// The underlying handler error.
    pub fn error(&self) -> &HandlerError {
        match self {
            Self::Command { error, .. } | Self::Event { error, .. } => error,
        }
    }
}

/// The emitting half of the error signal channel.
///
/// Cheap to clone; one sink is shared by the dispatcher and every event
/// handler it drives.
#[derive(Debug, Clone)]
pub struct ErrorSink {
    tx: mpsc::UnboundedSender<ErrorSignal>,
}

impl ErrorSink {
    /// Emits a signal. Never blocks and never fails the caller; if the
    /// receiving half is gone the signal is dropped.
    pub fn emit(&self, signal: ErrorSignal) {
        if let Err(dropped) = self.tx.send(signal) {
            trace!(source = dropped.0.source(), "error signal dropped, receiver closed");
        }
    }
}

/// Creates the error signal channel.
///
/// The sink goes to the dispatcher; the receiver goes to the process owner.
pub fn error_channel() -> (ErrorSink, mpsc::UnboundedReceiver<ErrorSignal>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ErrorSink { tx }, rx)
}
