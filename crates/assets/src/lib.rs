//! Mesh assets: shader parameters, geometry, loaders.
//!
//! Geometry is content-addressed: identical mesh data always gets the same
//! [`AssetId`], and renderers cache GPU resources by that id rather than by
//! file path.

mod loader;
mod mesh;
mod primitive;
mod shader;
mod store;

use std::path::PathBuf;

pub use loader::{MeshSource, ObjMeshLoader};
pub use mesh::{AssetId, MeshGeometry, RenderingObject};
pub use primitive::PrimitiveCreator;
pub use shader::{BlinnPhongLightProperties, BlinnPhongShader};
pub use store::AssetStore;

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to load OBJ {}: {source}", .path.display())]
    Obj {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },
    #[error("vertex colour count {got} does not match vertex count {expected}")]
    VertexColorCount { expected: usize, got: usize },
}

pub fn crate_info() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"))
}
