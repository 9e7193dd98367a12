//! Scene configuration: the presets, the camera rig and the keyboard remap.
//!
//! # Invariants
//! - Every setup call replaces the previous scene contents.
//! - Only the last object created by the latest setup call is "current".
//! - A failed mesh load aborts the setup without panicking; no light is added.

mod config;
pub mod layout;
mod stage;

use std::path::PathBuf;
use tableau_assets::AssetError;

pub use config::{CameraConfig, ConfigError, StageConfig, WindowConfig};
pub use layout::{Placement, PosePicker};
pub use stage::Stage;

/// Errors from setup calls.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error("model {} produced no meshes", .path.display())]
    EmptyMesh { path: PathBuf },
    #[error("failed to load model {}: {source}", .path.display())]
    MeshLoad {
        path: PathBuf,
        #[source]
        source: AssetError,
    },
    #[error(transparent)]
    Asset(#[from] AssetError),
}

pub fn crate_info() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"))
}
