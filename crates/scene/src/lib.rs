//! Scene: the renderable objects and lights of one configuration.
//!
//! # Invariants
//! - Object ids are never reused, not even across `clear`.
//! - Objects iterate in creation order.

mod light;
mod scene;

pub use light::Light;
pub use scene::{Scene, SceneObject};

pub fn crate_info() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"))
}
