//! Configuration loader using figment.
//!
//! Sources are layered, later ones overriding earlier ones:
//!
//! 1. Built-in defaults
//! 2. TOML file (`cadenza.toml` by default)
//! 3. Environment variables (`CADENZA_*`, `__` as the nesting separator)
//!
//! # Environment Variable Mapping
//!
//! - `CADENZA_CLIENT__PREFIX="!"` maps to `client.prefix = "!"`
//! - `CADENZA_BROKER__URL=amqp://...` maps to `broker.url = "amqp://..."`
//! - `CADENZA_LOGGING__LEVEL=debug` maps to `logging.level = "debug"`
//!
//! # Example
//!
//! ```rust,ignore
//! use cadenza_runtime::config::ConfigLoader;
//!
//! let config = ConfigLoader::new().load()?;
//!
//! let config = ConfigLoader::new()
//!     .file("./config/cadenza.toml")
//!     .load()?;
//! ```

use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use thiserror::Error;
use tracing::debug;

use super::schema::CadenzaConfig;

/// Default config file searched in the working directory.
const DEFAULT_FILE: &str = "cadenza.toml";

/// Environment variable prefix.
const ENV_PREFIX: &str = "CADENZA_";

/// Errors produced while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment could not merge or deserialize the layered sources.
    #[error("failed to read configuration: {0}")]
    Extraction(#[from] figment::Error),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Layered configuration loader.
pub struct ConfigLoader {
    figment: Figment,
}

impl ConfigLoader {
    /// Creates a loader with defaults, the default file location, and
    /// environment overrides.
    pub fn new() -> Self {
        Self {
            figment: Figment::from(Serialized::defaults(CadenzaConfig::default()))
                .merge(Toml::file(DEFAULT_FILE))
                .merge(Env::prefixed(ENV_PREFIX).split("__")),
        }
    }

    /// Replaces the file source with a specific path. Environment variables
    /// still override the file.
    pub fn file(self, path: impl AsRef<Path>) -> Self {
        Self {
            figment: Figment::from(Serialized::defaults(CadenzaConfig::default()))
                .merge(Toml::file(path.as_ref()))
                .merge(Env::prefixed(ENV_PREFIX).split("__")),
        }
    }

    /// Extracts the merged configuration.
    pub fn load(self) -> ConfigResult<CadenzaConfig> {
        let config: CadenzaConfig = self.figment.extract()?;
        debug!(
            prefix = %config.client.prefix,
            broker = %config.broker.url,
            "configuration loaded"
        );
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
