//! Rendering Adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers never mutate the scene.
//! - Render state derives from the scene and the camera only.
//!
//! The trait is stable; the text renderer here and the wgpu backend in
//! `tableau-render-wgpu` are interchangeable for consumers.

mod camera;
mod renderer;

pub use camera::PerspectiveCamera;
pub use renderer::{DebugTextRenderer, Renderer};

pub fn crate_info() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"))
}
