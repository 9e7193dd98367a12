use crate::PerspectiveCamera;
use std::fmt::Write;
use tableau_scene::Scene;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the scene and a camera, then produces output. It never
/// mutates the scene.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&self, scene: &Scene, camera: &PerspectiveCamera) -> Self::Output;
}

/// Renders a scene as human-readable text.
///
/// Used by the headless CLI, logging and tests of the render interface.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    /// Stop listing objects after this many; `None` lists all.
    pub max_objects: Option<usize>,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_objects(max_objects: usize) -> Self {
        Self {
            max_objects: Some(max_objects),
        }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene, camera: &PerspectiveCamera) -> String {
        let mut out = String::new();
        let p = camera.position();
        let _ = writeln!(
            out,
            "=== Scene (objects={}, meshes={}, lights={}) ===",
            scene.object_count(),
            scene.mesh_count(),
            scene.light_count()
        );
        let _ = writeln!(
            out,
            "Camera: pos=({:.1}, {:.1}, {:.1}) fov={:.0} aspect={:.3} near={:.1} far={:.1}",
            p.x, p.y, p.z, camera.fov_degrees, camera.aspect, camera.z_near, camera.z_far
        );

        for light in scene.lights() {
            let l = light.position;
            let c = light.properties.diffuse_color;
            let _ = writeln!(
                out,
                "  light pos=({:.1}, {:.1}, {:.1}) diffuse=({:.2}, {:.2}, {:.2})",
                l.x, l.y, l.z, c.x, c.y, c.z
            );
        }

        let limit = self.max_objects.unwrap_or(usize::MAX);
        for (id, obj) in scene.objects().take(limit) {
            let t = obj.transform();
            let name = obj
                .meshes()
                .first()
                .map(|m| m.geometry().name())
                .unwrap_or("-");
            let _ = writeln!(
                out,
                "  [{id}] {name} pos=({:.2}, {:.2}, {:.2}) scale={:.2}",
                t.position.x, t.position.y, t.position.z, t.scale.x
            );
        }
        if scene.object_count() > limit {
            let _ = writeln!(out, "  ... {} more", scene.object_count() - limit);
        }

        out
    }
}
