use crate::{AssetId, MeshGeometry};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Content-addressed geometry registry.
///
/// Geometry is indexed by its content hash, so registering the same data twice
/// yields the same shared instance. Loaders also record which geometries a file
/// produced so repeated loads of one path skip the parse.
#[derive(Debug, Default)]
pub struct AssetStore {
    geometries: BTreeMap<AssetId, Arc<MeshGeometry>>,
    by_path: HashMap<PathBuf, Vec<AssetId>>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a geometry and return the shared instance for its content.
    pub fn register(&mut self, geometry: MeshGeometry) -> Arc<MeshGeometry> {
        self.geometries
            .entry(geometry.id())
            .or_insert_with(|| Arc::new(geometry))
            .clone()
    }

    /// Get a geometry by ID.
    pub fn get(&self, id: AssetId) -> Option<&Arc<MeshGeometry>> {
        self.geometries.get(&id)
    }

    /// Record the geometries a file produced, in file order.
    pub fn remember_path(&mut self, path: impl Into<PathBuf>, ids: Vec<AssetId>) {
        self.by_path.insert(path.into(), ids);
    }

    /// Geometries previously loaded from `path`, if all are still registered.
    pub fn cached(&self, path: &Path) -> Option<Vec<Arc<MeshGeometry>>> {
        let ids = self.by_path.get(path)?;
        ids.iter().map(|id| self.geometries.get(id).cloned()).collect()
    }

    /// Number of registered geometries.
    pub fn len(&self) -> usize {
        self.geometries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty()
    }
}
