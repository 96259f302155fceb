//! Playback control commands.
//!
//! Every command here follows the same shape: voice-channel policy check,
//! control intent published for the remote audio worker, then a reply to
//! the originating channel. None of them touch audio or queues; the worker
//! owns all of that.

mod pause;
mod resume;
mod skip;
pub(crate) mod voice;
mod volume;

pub use pause::Pause;
pub use resume::Resume;
pub use skip::Skip;
pub use volume::{Volume, VolumeDown, VolumeUp};
