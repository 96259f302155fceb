//! # Cadenza Core
//!
//! The command dispatch and throttling engine of the Cadenza bot.
//!
//! Inbound chat messages are resolved against a [`Registry`] of named,
//! alias-addressable commands; accepted calls pass a per-user
//! [`ThrottleGate`] before the command body runs. Bus signals resolve to
//! [`Event`] handlers whose failures are isolated at the contract boundary.
//! Commands talk to the outside world only through injected bridge ports.
//!
//! ```text
//! ┌──────────┐  chat message  ┌────────────┐  resolve  ┌──────────┐
//! │ Gateway  │───────────────▶│ Dispatcher │──────────▶│ Registry │
//! │ (broker) │  bus signal    │            │           └──────────┘
//! └──────────┘                │  throttle  │  execute  ┌──────────┐
//!                             │  check     │──────────▶│ Command  │──▶ ChatApi
//!                             └────────────┘  dispatch │ / Event  │──▶ ControlBus
//!                                   │                  └──────────┘
//!                                   ▼
//!                             error signal
//! ```
//!
//! Two design rules hold everywhere:
//!
//! - The registry is an explicitly constructed, dependency-injected value.
//!   There is no global command table.
//! - A handler failure never crashes the dispatch loop. Command failures
//!   surface on the process-wide error signal at the dispatcher boundary;
//!   event failures are caught inside [`Event::dispatch`] itself.
//!
//! # Example
//!
//! ```rust,ignore
//! use cadenza_core::{Dispatcher, Registry, CommandContext, error_channel};
//!
//! let mut registry = Registry::new();
//! registry.register(Arc::new(Pause::new()))?;
//!
//! let (errors, mut error_rx) = error_channel();
//! let dispatcher = Dispatcher::new(Arc::new(registry), ctx, "=", errors);
//!
//! dispatcher.handle_message(message).await;
//! ```

pub mod bridge;
pub mod command;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod message;
pub mod registry;
pub mod signal;
pub mod throttle;

pub use bridge::{
    ApiError, ApiResult, BoxedChatApi, BoxedControlBus, BoxedVoiceStates, ChatApi, ControlBus,
    PublishError, PublishOptions, PublishResult, VoiceStates,
};
pub use command::{BoxedCommand, BoxedSubCommand, Command, CommandContext, SubCommand};
pub use dispatcher::Dispatcher;
pub use error::{HandlerError, HandlerResult, RegistryError, RegistryResult};
pub use event::{BoxedEvent, Event};
pub use message::{InboundMessage, VoiceState};
pub use registry::Registry;
pub use signal::{ErrorSignal, ErrorSink, error_channel};
pub use throttle::{ThrottleDecision, ThrottleGate, ThrottlePolicy};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::bridge::{
        BoxedChatApi, BoxedControlBus, BoxedVoiceStates, ChatApi, ControlBus, PublishOptions,
        VoiceStates,
    };
    pub use crate::command::{BoxedCommand, Command, CommandContext, SubCommand};
    pub use crate::dispatcher::Dispatcher;
    pub use crate::error::{HandlerError, HandlerResult};
    pub use crate::event::Event;
    pub use crate::message::{InboundMessage, VoiceState};
    pub use crate::registry::Registry;
    pub use crate::signal::{ErrorSignal, error_channel};
    pub use crate::throttle::{ThrottleGate, ThrottlePolicy};
}
