//! # Cadenza
//!
//! A command-dispatch and throttling core for chat bots that drive a remote
//! audio worker over a message bus.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐    deliveries    ┌────────┐   messages/signals   ┌────────────┐
//! │  Broker  │─────────────────▶│ Client │─────────────────────▶│ Dispatcher │
//! │ consumer │                  │ (loop) │                      │ + Registry │
//! └──────────┘                  └────────┘                      └─────┬──────┘
//!                                                   throttle gate ──▶ │
//!                                   ┌──────────────┬──────────────────┤
//!                                   ▼              ▼                  ▼
//!                               ChatApi       ControlBus        error signal
//!                              (replies)   (control intents)
//! ```
//!
//! - **cadenza-core**: registry, dispatcher, throttle gate, command/event
//!   contracts, bridge ports
//! - **cadenza-commands**: the built-in playback command set
//! - **cadenza-runtime**: configuration, logging, client run loop
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cadenza::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::new().load()?;
//!     cadenza::runtime::logging::init_from_config(&config.logging);
//!
//!     let client = Client::builder(config.client.id.clone(), api, bus, voice)
//!         .with_config(&config)
//!         .commands(cadenza::commands::commands())
//!         .build()?;
//!
//!     client.login(consumer, &config.broker.url, &config.broker.events).await?;
//!     Ok(())
//! }
//! ```

pub use cadenza_commands as commands;
pub use cadenza_core as core;
pub use cadenza_runtime as runtime;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use cadenza_core::{
        BoxedChatApi, BoxedControlBus, BoxedVoiceStates, ChatApi, Command, CommandContext,
        ControlBus, Dispatcher, ErrorSignal, Event, HandlerError, HandlerResult, InboundMessage,
        PublishOptions, Registry, SubCommand, ThrottleGate, ThrottlePolicy, VoiceState,
        VoiceStates, error_channel,
    };
    pub use cadenza_runtime::{
        BrokerConsumer, CadenzaConfig, Client, ClientBuilder, ConfigLoader, Delivery,
    };
}
