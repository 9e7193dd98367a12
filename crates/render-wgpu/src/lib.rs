//! wgpu render backend.
//!
//! Draws every mesh of every scene object with a Blinn-Phong shader lit by the
//! scene's first point light. Frames are planned on the CPU by [`FramePlanner`]
//! and submitted by [`WgpuRenderer`].
//!
//! # Invariants
//! - Renderer never mutates the scene.
//! - GPU buffers are cached by geometry content hash, so instances sharing a
//!   mesh share one upload.

mod gpu;
mod plan;
mod shaders;

pub use gpu::WgpuRenderer;
pub use plan::{Batch, FramePlan, FramePlanner};
