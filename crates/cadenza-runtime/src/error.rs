//! Runtime error types.

use thiserror::Error;

use crate::broker::BrokerError;
use crate::config::ConfigError;

/// Errors that can occur while assembling or running the client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// A naming collision while loading the registry. Fatal at startup.
    #[error("registry load failed: {0}")]
    Registry(#[from] cadenza_core::RegistryError),

    /// The broker consumer failed to connect or subscribe.
    #[error("broker error: {0}")]
    Broker(#[from] BrokerError),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
