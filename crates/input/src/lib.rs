//! Keyboard input: backend-agnostic keys mapped to scene actions.
//!
//! # Invariants
//! - Only key-down events produce actions.
//! - Auto-repeat never re-triggers a preset.

pub mod action;
mod key;

pub use action::{Action, map_key};
pub use key::{Key, KeyInput, KeyState, ParseKeyError};

pub fn crate_info() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"))
}
