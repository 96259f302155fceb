//! Configuration loading and schema.

mod loader;
mod schema;

pub use loader::{ConfigError, ConfigLoader, ConfigResult};
pub use schema::{
    BrokerConfig, CadenzaConfig, ClientConfig, LogFormat, LogLevel, LogOutput, LoggingConfig,
    ThrottleConfig,
};
