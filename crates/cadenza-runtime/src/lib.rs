//! # Cadenza Runtime
//!
//! Orchestration layer for the Cadenza bot: configuration, logging, and the
//! client run loop that connects the dispatch engine to the broker.
//!
//! The runtime decides which of the dispatcher's two entry points each
//! delivery takes. The configured message event becomes a chat-message
//! dispatch; every other signal goes through the event registry. Both are
//! spawned as independent tasks, so dispatch ordering is only guaranteed
//! within a single inbound item.
//!
//! # Example
//!
//! ```rust,ignore
//! use cadenza_runtime::{Client, ConfigLoader, logging};
//!
//! let config = ConfigLoader::new().load()?;
//! logging::init_from_config(&config.logging);
//!
//! let client = Client::builder(config.client.id.clone(), api, bus, voice)
//!     .with_config(&config)
//!     .commands(cadenza_commands::commands())
//!     .build()?;
//!
//! client.login(consumer, &config.broker.url, &config.broker.events).await?;
//! ```

pub mod broker;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;

pub use broker::{BrokerConsumer, BrokerError, BrokerResult, Delivery};
pub use client::{Client, ClientBuilder};
pub use config::{CadenzaConfig, ConfigError, ConfigLoader, ConfigResult};
pub use error::{ClientError, ClientResult};
