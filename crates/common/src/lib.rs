//! Shared value types used by every tableau crate.

mod preset;
mod types;

pub use preset::{GoblinCount, ParsePresetError, Preset};
pub use types::{ObjectId, Transform, WORLD_FORWARD, WORLD_RIGHT, WORLD_UP};
