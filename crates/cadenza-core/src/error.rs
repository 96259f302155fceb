//! Error taxonomy for the dispatch engine.
//!
//! Two outcomes in this engine are deliberately not errors: a throttle
//! rejection (a normal outcome, surfaced as a user-facing reply) and input
//! that resolves to no command (a silent no-op). What remains:
//!
//! - [`RegistryError`]: a naming collision at registration time. Fatal at
//!   startup, the registry load must abort.
//! - [`HandlerError`]: a failure inside a command's or event's `run`.
//!   Command failures propagate to the dispatcher boundary; event failures
//!   are caught at the event contract itself. Either way they end up on the
//!   process-wide error signal and never crash the dispatch loop.

use thiserror::Error;

use crate::bridge::{ApiError, PublishError};

/// Naming collisions detected while loading the registry.
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    /// A command with this name (or an alias spelled the same) already
    /// exists.
    #[error("command '{name}' is already registered")]
    DuplicateCommand {
        /// The colliding name.
        name: String,
    },

    /// An alias collides with an existing name or alias.
    #[error("alias '{alias}' on command '{name}' collides with an existing name or alias")]
    DuplicateAlias {
        /// The command being registered.
        name: String,
        /// The colliding alias.
        alias: String,
    },

    /// Two subcommands of the same parent share a name or alias.
    #[error("subcommand token '{token}' is declared twice under '{parent}'")]
    DuplicateSubCommand {
        /// The owning command.
        parent: String,
        /// The colliding name or alias.
        token: String,
    },

    /// An event with this name already exists.
    #[error("event '{name}' is already registered")]
    DuplicateEvent {
        /// The colliding name.
        name: String,
    },
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// A failure raised inside a command's or event's `run`.
#[derive(Debug, Clone, Error)]
pub enum HandlerError {
    /// A reply call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A control-intent publish failed.
    #[error(transparent)]
    Publish(#[from] PublishError),

    /// Anything else a handler body can get wrong.
    #[error("{0}")]
    Other(String),
}

impl HandlerError {
    /// Creates a handler error from a plain message.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

/// Result type for handler bodies.
pub type HandlerResult<T = ()> = Result<T, HandlerError>;
