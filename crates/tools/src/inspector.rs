use serde::Serialize;
use tableau_common::ObjectId;
use tableau_render::PerspectiveCamera;
use tableau_scene::Scene;

/// Scene inspector for developer tooling.
///
/// Read-only queries against the scene for the desktop HUD and the CLI.
pub struct SceneInspector;

impl SceneInspector {
    /// Produce a summary of the scene and camera.
    pub fn summary(scene: &Scene, camera: &PerspectiveCamera) -> SceneSummary {
        let p = camera.position();
        SceneSummary {
            object_count: scene.object_count(),
            mesh_count: scene.mesh_count(),
            light_count: scene.light_count(),
            camera_position: [p.x, p.y, p.z],
            camera_aspect: camera.aspect,
        }
    }

    /// Details of a single object.
    pub fn inspect_object(scene: &Scene, id: ObjectId) -> Option<ObjectInfo> {
        scene.get(id).map(|obj| {
            let t = obj.transform();
            ObjectInfo {
                id,
                meshes: obj
                    .meshes()
                    .iter()
                    .map(|m| m.geometry().name().to_string())
                    .collect(),
                position: t.position.to_array(),
                rotation: t.rotation.to_array(),
                scale: t.scale.to_array(),
            }
        })
    }

    /// Every object, in creation order.
    pub fn list_objects(scene: &Scene) -> Vec<ObjectInfo> {
        scene
            .objects()
            .filter_map(|(id, _)| Self::inspect_object(scene, id))
            .collect()
    }
}

/// Summary of scene state for the inspector.
#[derive(Debug, Clone, Serialize)]
pub struct SceneSummary {
    pub object_count: usize,
    pub mesh_count: usize,
    pub light_count: usize,
    pub camera_position: [f32; 3],
    pub camera_aspect: f32,
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scene: objects={} meshes={} lights={} camera=({:.1}, {:.1}, {:.1})",
            self.object_count,
            self.mesh_count,
            self.light_count,
            self.camera_position[0],
            self.camera_position[1],
            self.camera_position[2],
        )
    }
}

/// Detailed info about a single object.
#[derive(Debug, Clone, Serialize)]
pub struct ObjectInfo {
    pub id: ObjectId,
    pub meshes: Vec<String>,
    pub position: [f32; 3],
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
}

impl std::fmt::Display for ObjectInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Object [{}] pos=({:.2}, {:.2}, {:.2}) scale=({:.2}, {:.2}, {:.2})",
            self.id,
            self.position[0],
            self.position[1],
            self.position[2],
            self.scale[0],
            self.scale[1],
            self.scale[2],
        )
    }
}
