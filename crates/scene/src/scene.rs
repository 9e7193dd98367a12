use crate::Light;
use glam::Vec3;
use std::collections::BTreeMap;
use tableau_assets::RenderingObject;
use tableau_common::{ObjectId, Transform};

/// A placed, renderable thing: one or more mesh templates sharing a transform.
#[derive(Debug, Clone)]
pub struct SceneObject {
    meshes: Vec<RenderingObject>,
    transform: Transform,
}

impl SceneObject {
    pub fn new(meshes: Vec<RenderingObject>) -> Self {
        Self {
            meshes,
            transform: Transform::default(),
        }
    }

    /// Convenience for a single mesh template.
    pub fn from_mesh(mesh: RenderingObject) -> Self {
        Self::new(vec![mesh])
    }

    pub fn meshes(&self) -> &[RenderingObject] {
        &self.meshes
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.transform.position = position;
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.transform.translate(delta);
    }

    /// Rotate about a world-space axis.
    pub fn rotate(&mut self, axis: Vec3, angle: f32) {
        self.transform.rotate(axis, angle);
    }

    /// Add `delta` uniformly to the scale. Not clamped.
    pub fn add_scale(&mut self, delta: f32) {
        self.transform.add_scale(delta);
    }
}

/// The objects and lights currently on stage.
///
/// Objects live in a BTreeMap keyed by sequential ids, which gives creation
/// order on iteration.
#[derive(Debug, Default)]
pub struct Scene {
    objects: BTreeMap<ObjectId, SceneObject>,
    lights: Vec<Light>,
    next_id: u64,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object. Returns its id.
    pub fn add_object(&mut self, object: SceneObject) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.objects.insert(id, object);
        id
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    /// Drop every object and light.
    pub fn clear(&mut self) {
        tracing::trace!(
            "clearing scene ({} objects, {} lights)",
            self.objects.len(),
            self.lights.len()
        );
        self.objects.clear();
        self.lights.clear();
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(&id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(&id)
    }

    /// Objects in creation order.
    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &SceneObject)> {
        self.objects.iter().map(|(id, obj)| (*id, obj))
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    /// Total mesh templates across all objects.
    pub fn mesh_count(&self) -> usize {
        self.objects.values().map(|o| o.meshes().len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tableau_assets::{BlinnPhongLightProperties, BlinnPhongShader, MeshGeometry};

    fn mesh() -> RenderingObject {
        let geometry = MeshGeometry::new(
            "tri",
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            Vec::new(),
            vec![0, 1, 2],
        );
        RenderingObject::new(Arc::new(geometry), BlinnPhongShader::default())
    }

    #[test]
    fn scene_starts_empty() {
        let scene = Scene::new();
        assert_eq!(scene.object_count(), 0);
        assert_eq!(scene.light_count(), 0);
    }

    #[test]
    fn add_and_get_object() {
        let mut scene = Scene::new();
        let id = scene.add_object(SceneObject::from_mesh(mesh()));
        assert_eq!(scene.object_count(), 1);
        assert_eq!(scene.get(id).unwrap().meshes().len(), 1);
        assert_eq!(scene.mesh_count(), 1);
    }

    #[test]
    fn objects_iterate_in_creation_order() {
        let mut scene = Scene::new();
        let ids: Vec<ObjectId> = (0..20)
            .map(|i| {
                let mut obj = SceneObject::from_mesh(mesh());
                obj.set_position(Vec3::new(i as f32, 0.0, 0.0));
                scene.add_object(obj)
            })
            .collect();
        let seen: Vec<ObjectId> = scene.objects().map(|(id, _)| id).collect();
        assert_eq!(ids, seen);
    }

    #[test]
    fn clear_drops_objects_and_lights_but_not_ids() {
        let mut scene = Scene::new();
        let first = scene.add_object(SceneObject::from_mesh(mesh()));
        scene.add_light(Light::new(BlinnPhongLightProperties::default()));
        scene.clear();
        assert_eq!(scene.object_count(), 0);
        assert_eq!(scene.light_count(), 0);
        assert!(scene.get(first).is_none());

        let second = scene.add_object(SceneObject::from_mesh(mesh()));
        assert!(second > first);
    }

    #[test]
    fn object_transform_ops() {
        let mut obj = SceneObject::from_mesh(mesh());
        obj.set_position(Vec3::new(0.0, 0.0, -150.0));
        obj.translate(Vec3::new(1.0, 0.0, 0.0));
        obj.add_scale(0.1);
        obj.add_scale(0.1);
        assert_eq!(obj.position(), Vec3::new(1.0, 0.0, -150.0));
        assert!((obj.transform().scale.x - 1.2).abs() < 1e-6);
    }

    #[test]
    fn get_mut_edits_in_place() {
        let mut scene = Scene::new();
        let id = scene.add_object(SceneObject::from_mesh(mesh()));
        scene.get_mut(id).unwrap().rotate(Vec3::X, -1.2);
        assert_ne!(scene.get(id).unwrap().transform().rotation, glam::Quat::IDENTITY);
    }
}
