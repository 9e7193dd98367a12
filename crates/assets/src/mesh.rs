use crate::{AssetError, BlinnPhongShader};
use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Content-addressed asset ID computed from the asset data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(pub u64);

/// Triangle mesh data, immutable once built.
#[derive(Debug, Clone)]
pub struct MeshGeometry {
    id: AssetId,
    name: String,
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    indices: Vec<u32>,
    colors: Option<Vec<Vec4>>,
}

impl MeshGeometry {
    /// Build a mesh. If `normals` does not have one entry per position, smooth
    /// vertex normals are computed from the triangles.
    pub fn new(
        name: impl Into<String>,
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        indices: Vec<u32>,
    ) -> Self {
        let normals = if normals.len() == positions.len() {
            normals
        } else {
            compute_normals(&positions, &indices)
        };
        let mut mesh = Self {
            id: AssetId(0),
            name: name.into(),
            positions,
            normals,
            indices,
            colors: None,
        };
        mesh.id = mesh.content_hash();
        mesh
    }

    /// Return a copy of this mesh with one colour per vertex.
    pub fn with_colors(mut self, colors: Vec<Vec4>) -> Result<Self, AssetError> {
        if colors.len() != self.positions.len() {
            return Err(AssetError::VertexColorCount {
                expected: self.positions.len(),
                got: colors.len(),
            });
        }
        self.colors = Some(colors);
        self.id = self.content_hash();
        Ok(self)
    }

    pub fn id(&self) -> AssetId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn colors(&self) -> Option<&[Vec4]> {
        self.colors.as_deref()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn content_hash(&self) -> AssetId {
        let mut hasher = Sha256::new();
        hasher.update(self.name.as_bytes());
        for p in &self.positions {
            for c in p.to_array() {
                hasher.update(c.to_le_bytes());
            }
        }
        for i in &self.indices {
            hasher.update(i.to_le_bytes());
        }
        if let Some(colors) = &self.colors {
            hasher.update(b"colors");
            for color in colors {
                for c in color.to_array() {
                    hasher.update(c.to_le_bytes());
                }
            }
        }
        let result = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&result[..8]);
        AssetId(u64::from_le_bytes(bytes))
    }
}

/// Area-weighted vertex normals. Vertices not referenced by any triangle get +Y.
fn compute_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        if a >= positions.len() || b >= positions.len() || c >= positions.len() {
            continue;
        }
        let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }
    normals
        .into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y))
        .collect()
}

/// A drawable: shared geometry plus the shader parameters it is drawn with.
#[derive(Debug, Clone)]
pub struct RenderingObject {
    geometry: Arc<MeshGeometry>,
    shader: BlinnPhongShader,
}

impl RenderingObject {
    pub fn new(geometry: Arc<MeshGeometry>, shader: BlinnPhongShader) -> Self {
        Self { geometry, shader }
    }

    pub fn geometry(&self) -> &Arc<MeshGeometry> {
        &self.geometry
    }

    pub fn shader(&self) -> &BlinnPhongShader {
        &self.shader
    }

    pub fn total_vertices(&self) -> usize {
        self.geometry.vertex_count()
    }

    /// Replace the per-vertex colours. The shared geometry is left untouched;
    /// this object gets its own copy.
    pub fn set_vertex_colors(&mut self, colors: Vec<Vec4>) -> Result<(), AssetError> {
        let colored = (*self.geometry).clone().with_colors(colors)?;
        self.geometry = Arc::new(colored);
        Ok(())
    }
}
