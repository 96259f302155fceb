//! Configuration schema definitions.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CadenzaConfig {
    /// Client identity and dispatch settings.
    #[serde(default)]
    pub client: ClientConfig,

    /// Broker connection settings.
    #[serde(default)]
    pub broker: BrokerConfig,

    /// Throttle housekeeping settings.
    #[serde(default)]
    pub throttle: ThrottleConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Client identity and dispatch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// The bot's own user id on the chat platform.
    #[serde(default)]
    pub id: String,

    /// Platform token, handed to the REST collaborator. Never logged.
    #[serde(default)]
    pub token: Option<String>,

    /// Command prefix stripped from inbound messages.
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Name of the broker event that carries chat messages.
    #[serde(default = "default_message_event")]
    pub message_event: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            id: String::new(),
            token: None,
            prefix: default_prefix(),
            message_event: default_message_event(),
        }
    }
}

fn default_prefix() -> String {
    "=".to_string()
}

fn default_message_event() -> String {
    "MESSAGE_CREATE".to_string()
}

/// Broker connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerConfig {
    /// Broker URL passed to the consumer's connect call.
    #[serde(default = "default_broker_url")]
    pub url: String,

    /// Signal names to subscribe to.
    #[serde(default = "default_broker_events")]
    pub events: Vec<String>,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            url: default_broker_url(),
            events: default_broker_events(),
        }
    }
}

fn default_broker_url() -> String {
    "localhost".to_string()
}

fn default_broker_events() -> Vec<String> {
    vec!["MESSAGE_CREATE".to_string()]
}

/// Throttle housekeeping settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThrottleConfig {
    /// Interval, in seconds, between sweeps of expired throttle windows.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

fn default_sweep_interval() -> u64 {
    60
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Base log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Output destination.
    #[serde(default)]
    pub output: LogOutput,

    /// Log file path, used when `output` is `file`.
    #[serde(default)]
    pub file_path: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            format: LogFormat::default(),
            output: LogOutput::default(),
            file_path: None,
        }
    }
}

/// Base log level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose.
    Trace,
    /// Developer detail.
    Debug,
    /// Default operational level.
    #[default]
    Info,
    /// Something is off but the process continues.
    Warn,
    /// Failures only.
    Error,
}

impl LogLevel {
    /// Converts to a `tracing` level.
    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Single-line compact output.
    #[default]
    Compact,
    /// Default `tracing` formatting.
    Full,
    /// Multi-line human-oriented output.
    Pretty,
    /// Newline-delimited JSON. Requires the `json-log` feature.
    #[cfg(feature = "json-log")]
    Json,
}

/// Log output destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    /// Standard output.
    #[default]
    Stdout,
    /// Standard error.
    Stderr,
    /// A file; see `file_path`.
    File,
}
