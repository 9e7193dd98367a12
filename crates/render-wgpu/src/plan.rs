use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};
use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::Arc;
use tableau_assets::{AssetId, MeshGeometry, RenderingObject};
use tableau_render::{PerspectiveCamera, Renderer};
use tableau_scene::Scene;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct Uniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_position: [f32; 4],
    /// `w` is 1 when the scene has a light, 0 otherwise.
    pub light_position: [f32; 4],
    pub light_diffuse: [f32; 4],
    pub light_specular: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct InstanceData {
    pub model_0: [f32; 4],
    pub model_1: [f32; 4],
    pub model_2: [f32; 4],
    pub model_3: [f32; 4],
    pub diffuse: [f32; 4],
    pub ambient: [f32; 4],
    /// Specular colour with the shininess exponent in `w`.
    pub specular: [f32; 4],
}

/// One indexed draw: a mesh and its slice of the instance buffer.
#[derive(Debug, Clone)]
pub struct Batch {
    pub geometry: Arc<MeshGeometry>,
    pub instances: Range<u32>,
}

impl Batch {
    pub fn asset_id(&self) -> AssetId {
        self.geometry.id()
    }
}

/// Everything the GPU needs for one frame, computed on the CPU.
#[derive(Debug, Clone)]
pub struct FramePlan {
    pub(crate) uniforms: Uniforms,
    pub(crate) instances: Vec<InstanceData>,
    pub batches: Vec<Batch>,
}

impl FramePlan {
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    pub fn is_lit(&self) -> bool {
        self.uniforms.light_position[3] > 0.0
    }
}

/// Groups the scene's meshes by geometry so each distinct mesh is one
/// instanced draw.
#[derive(Debug, Default)]
pub struct FramePlanner;

impl Renderer for FramePlanner {
    type Output = FramePlan;

    fn render(&self, scene: &Scene, camera: &PerspectiveCamera) -> FramePlan {
        let mut groups: BTreeMap<AssetId, (Arc<MeshGeometry>, Vec<InstanceData>)> =
            BTreeMap::new();
        for (_, object) in scene.objects() {
            let model = object.transform().matrix();
            for mesh in object.meshes() {
                groups
                    .entry(mesh.geometry().id())
                    .or_insert_with(|| (Arc::clone(mesh.geometry()), Vec::new()))
                    .1
                    .push(instance(model, mesh));
            }
        }

        let mut instances = Vec::new();
        let mut batches = Vec::with_capacity(groups.len());
        for (geometry, group) in groups.into_values() {
            let start = instances.len() as u32;
            instances.extend(group);
            batches.push(Batch {
                geometry,
                instances: start..instances.len() as u32,
            });
        }

        FramePlan {
            uniforms: uniforms(scene, camera),
            instances,
            batches,
        }
    }
}

fn instance(model: Mat4, mesh: &RenderingObject) -> InstanceData {
    let cols = model.to_cols_array_2d();
    let shader = mesh.shader();
    let specular = shader.specular.truncate().extend(shader.shininess);
    InstanceData {
        model_0: cols[0],
        model_1: cols[1],
        model_2: cols[2],
        model_3: cols[3],
        diffuse: shader.diffuse.to_array(),
        ambient: shader.ambient.to_array(),
        specular: specular.to_array(),
    }
}

fn uniforms(scene: &Scene, camera: &PerspectiveCamera) -> Uniforms {
    let eye = camera.position().extend(1.0).to_array();
    match scene.lights().first() {
        Some(light) => Uniforms {
            view_proj: camera.view_projection().to_cols_array_2d(),
            camera_position: eye,
            light_position: light.position.extend(1.0).to_array(),
            light_diffuse: light.properties.diffuse_color.to_array(),
            light_specular: light.properties.specular_color.to_array(),
        },
        None => Uniforms {
            view_proj: camera.view_projection().to_cols_array_2d(),
            camera_position: eye,
            light_position: [0.0; 4],
            light_diffuse: [0.0; 4],
            light_specular: [0.0; 4],
        },
    }
}

/// Interleave a geometry's attributes. Meshes without vertex colours are
/// drawn white so the material alone decides their colour.
pub(crate) fn vertices(geometry: &MeshGeometry) -> Vec<Vertex> {
    let colors = geometry.colors();
    geometry
        .positions()
        .iter()
        .zip(geometry.normals())
        .enumerate()
        .map(|(i, (p, n))| Vertex {
            position: p.to_array(),
            normal: n.to_array(),
            color: colors
                .and_then(|c| c.get(i))
                .copied()
                .unwrap_or(Vec4::ONE)
                .to_array(),
        })
        .collect()
}

/// Scene lights beyond the first are ignored by the shader.
pub(crate) fn extra_lights(scene: &Scene) -> usize {
    scene.light_count().saturating_sub(1)
}
