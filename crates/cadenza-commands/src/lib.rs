//! # Cadenza Commands
//!
//! The built-in command set for the Cadenza bot.
//!
//! Command bodies here stay deliberately thin. Playback commands check the
//! voice-channel policy, publish a control intent for the remote audio
//! worker, and reply; they never block on the worker's reaction. Everything
//! stateful about playback lives on the worker side of the bus.

pub mod music;
pub mod ping;

#[cfg(test)]
mod testutil;

use cadenza_core::BoxedCommand;
use std::sync::Arc;

pub use music::{Pause, Resume, Skip, Volume};
pub use ping::Ping;

/// All built-in commands, ready for registration.
pub fn commands() -> Vec<BoxedCommand> {
    vec![
        Arc::new(Pause::new()),
        Arc::new(Resume::new()),
        Arc::new(Skip),
        Arc::new(Volume::new()),
        Arc::new(Ping),
    ]
}
