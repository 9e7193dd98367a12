use crate::{AssetError, AssetStore, BlinnPhongShader, MeshGeometry, RenderingObject};
use glam::Vec3;
use std::path::{Path, PathBuf};

/// Anything that can turn a model path into drawables.
///
/// An `Ok` with an empty list means the file held no usable geometry.
pub trait MeshSource {
    fn load_mesh(
        &mut self,
        shader: &BlinnPhongShader,
        path: &Path,
    ) -> Result<Vec<RenderingObject>, AssetError>;
}

/// Loads Wavefront OBJ files relative to an asset root.
///
/// Each model in a file becomes one [`RenderingObject`]. Parsed geometry is
/// kept in an [`AssetStore`], so loading the same file again is free.
#[derive(Debug)]
pub struct ObjMeshLoader {
    root: PathBuf,
    store: AssetStore,
}

impl ObjMeshLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            store: AssetStore::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn store(&self) -> &AssetStore {
        &self.store
    }

    /// Resolve `path` against the asset root. Absolute paths are kept as-is.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn parse(&mut self, full_path: &Path) -> Result<Vec<MeshGeometry>, AssetError> {
        let (models, materials) = tobj::load_obj(
            full_path,
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
        )
        .map_err(|source| AssetError::Obj {
            path: full_path.to_path_buf(),
            source,
        })?;

        if let Err(e) = materials {
            tracing::debug!("no materials for {}: {e}", full_path.display());
        }

        let mut meshes = Vec::with_capacity(models.len());
        for (i, model) in models.into_iter().enumerate() {
            let mesh = model.mesh;
            if mesh.indices.is_empty() {
                continue;
            }
            let positions: Vec<Vec3> = mesh
                .positions
                .chunks_exact(3)
                .map(|p| Vec3::new(p[0], p[1], p[2]))
                .collect();
            let normals: Vec<Vec3> = mesh
                .normals
                .chunks_exact(3)
                .map(|n| Vec3::new(n[0], n[1], n[2]))
                .collect();
            let name = if model.name.is_empty() {
                format!("model_{i}")
            } else {
                model.name
            };
            meshes.push(MeshGeometry::new(name, positions, normals, mesh.indices));
        }
        Ok(meshes)
    }
}

impl MeshSource for ObjMeshLoader {
    fn load_mesh(
        &mut self,
        shader: &BlinnPhongShader,
        path: &Path,
    ) -> Result<Vec<RenderingObject>, AssetError> {
        let full_path = self.resolve(path);

        if let Some(geometries) = self.store.cached(&full_path) {
            return Ok(geometries
                .into_iter()
                .map(|g| RenderingObject::new(g, *shader))
                .collect());
        }

        let meshes = self.parse(&full_path)?;
        let mut ids = Vec::with_capacity(meshes.len());
        let mut objects = Vec::with_capacity(meshes.len());
        for mesh in meshes {
            let geometry = self.store.register(mesh);
            ids.push(geometry.id());
            objects.push(RenderingObject::new(geometry, *shader));
        }
        tracing::debug!(
            "loaded {} mesh(es) from {}",
            objects.len(),
            full_path.display()
        );
        self.store.remember_path(full_path, ids);
        Ok(objects)
    }
}
