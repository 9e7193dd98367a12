use crate::layout::{self, GOBLIN_MODELS, HUMAN_MODEL, MODEL_TILT, OUTLANDER_MODEL, PosePicker};
use crate::{StageConfig, StageError};
use glam::{Vec3, Vec4};
use std::path::Path;
use tableau_assets::{
    BlinnPhongShader, MeshSource, ObjMeshLoader, PrimitiveCreator, RenderingObject,
};
use tableau_common::{GoblinCount, ObjectId, Preset, WORLD_RIGHT};
use tableau_input::{Action, Key, KeyInput, map_key};
use tableau_render::PerspectiveCamera;
use tableau_scene::{Light, Scene, SceneObject};

const LIGHT_POSITION: Vec3 = Vec3::new(0.0, 0.0, 10.0);
const LIGHT_DIFFUSE: Vec4 = Vec4::new(0.5, 0.5, 0.5, 1.0);
const CAMERA_START: Vec3 = Vec3::new(0.0, 100.0, 10.0);
const CAMERA_PITCH: f32 = -0.5;
const SPHERE_RADIUS: f32 = 5.0;
const SPHERE_SUBDIVISIONS: u32 = 4;
const SPHERE_VERTEX_COLOR: Vec4 = Vec4::new(0.5, 0.5, 0.5, 1.0);

/// The scene configurator.
///
/// Owns the scene and camera on behalf of the host application and exposes
/// the host's hooks: camera creation and setup, scene setup, keyboard input,
/// window resize and per-frame tick.
pub struct Stage<L: MeshSource = ObjMeshLoader> {
    config: StageConfig,
    scene: Scene,
    camera: PerspectiveCamera,
    loader: L,
    current: Option<ObjectId>,
    preset: Option<Preset>,
    picker: PosePicker,
    frames: u64,
    elapsed: f64,
    exit_requested: bool,
}

impl Stage<ObjMeshLoader> {
    /// A stage loading OBJ files from the configured asset root.
    pub fn from_config(config: StageConfig) -> Self {
        let loader = ObjMeshLoader::new(config.asset_root.clone());
        Self::new(config, loader)
    }
}

impl<L: MeshSource> Stage<L> {
    pub fn new(config: StageConfig, loader: L) -> Self {
        let camera = Self::create_camera(&config);
        let picker = PosePicker::new(config.army_seed);
        Self {
            config,
            scene: Scene::new(),
            camera,
            loader,
            current: None,
            preset: None,
            picker,
            frames: 0,
            elapsed: 0.0,
            exit_requested: false,
        }
    }

    /// Camera before `setup_camera`: configured lens, aspect of the
    /// configured window, default far plane.
    pub fn create_camera(config: &StageConfig) -> PerspectiveCamera {
        let mut camera = PerspectiveCamera::new(config.camera.fov_degrees, config.aspect_ratio());
        camera.z_near = config.camera.z_near;
        camera
    }

    /// Window size to request from the host, in pixels.
    pub fn window_size(&self) -> (u32, u32) {
        (self.config.window.width, self.config.window.height)
    }

    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// The object that arrow and scale keys act on.
    pub fn current_object(&self) -> Option<ObjectId> {
        self.current
    }

    /// The last preset that finished setting up.
    pub fn preset(&self) -> Option<Preset> {
        self.preset
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Set once the user asked to quit.
    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Apply the configured startup preset.
    pub fn setup_scene(&mut self) -> Result<(), StageError> {
        self.apply_preset(self.config.startup_preset)
    }

    /// Raise the camera, pitch it down towards the models and push the far
    /// plane out so the whole army fits.
    pub fn setup_camera(&mut self) {
        self.camera.translate(CAMERA_START);
        self.camera.rotate(WORLD_RIGHT, CAMERA_PITCH);
        self.camera.set_z_far(self.config.camera.z_far);
    }

    pub fn apply_preset(&mut self, preset: Preset) -> Result<(), StageError> {
        match preset {
            Preset::Goblin(count) => self.setup_goblin(count),
            Preset::Human => self.setup_human(),
            Preset::Sphere => self.setup_example1(),
            Preset::Outlander => self.setup_example2(),
        }
    }

    pub fn setup_goblin(&mut self, count: GoblinCount) -> Result<(), StageError> {
        self.run_setup(Preset::Goblin(count), |stage, shader| {
            for placement in layout::goblin_layout(count, &mut stage.picker) {
                let meshes = stage.load(shader, GOBLIN_MODELS[placement.model])?;
                stage.place(meshes, placement.position, MODEL_TILT);
            }
            Ok(())
        })
    }

    pub fn setup_human(&mut self) -> Result<(), StageError> {
        self.run_setup(Preset::Human, |stage, shader| {
            let meshes = stage.load(shader, HUMAN_MODEL)?;
            stage.place(meshes, Vec3::new(0.0, 0.0, layout::FRONT_DEPTH), MODEL_TILT);
            Ok(())
        })
    }

    /// Grey vertex-coloured icosphere at the origin.
    pub fn setup_example1(&mut self) -> Result<(), StageError> {
        self.run_setup(Preset::Sphere, |stage, shader| {
            let mut sphere =
                PrimitiveCreator::create_icosphere(shader, SPHERE_RADIUS, SPHERE_SUBDIVISIONS);
            let colors = vec![SPHERE_VERTEX_COLOR; sphere.total_vertices()];
            sphere.set_vertex_colors(colors)?;
            stage.place(vec![sphere], Vec3::ZERO, 0.0);
            Ok(())
        })
    }

    /// External OBJ model at the origin.
    pub fn setup_example2(&mut self) -> Result<(), StageError> {
        self.run_setup(Preset::Outlander, |stage, shader| {
            let meshes = stage.load(shader, OUTLANDER_MODEL)?;
            stage.place(meshes, Vec3::ZERO, 0.0);
            Ok(())
        })
    }

    /// Keyboard dispatch. See [`map_key`] for the bindings.
    pub fn handle_input(&mut self, input: KeyInput) {
        if let Some(action) = map_key(input) {
            self.handle_action(action);
        }
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::ApplyPreset(preset) => {
                // Failures are logged by the setup call; the stage stays usable.
                let _ = self.apply_preset(preset);
            }
            Action::RotateObject { axis, angle } => {
                if let Some(obj) = self.current_mut() {
                    obj.rotate(axis, angle);
                }
            }
            Action::TranslateCamera(delta) => {
                self.camera.translate(delta);
                tracing::debug!("camera at {:?}", self.camera.position());
            }
            Action::ScaleObject(delta) => {
                if let Some(obj) = self.current_mut() {
                    obj.add_scale(delta);
                }
            }
            Action::Delegate(key) => self.handle_unbound_key(key),
        }
    }

    /// Recompute the aspect ratio for the new window size.
    pub fn handle_window_resize(&mut self, width: f32, height: f32) {
        if height <= 0.0 || width <= 0.0 {
            tracing::warn!("ignoring resize to {width}x{height}");
            return;
        }
        self.camera.set_aspect_ratio(width / height);
    }

    /// Per-frame hook. The scene is static between inputs.
    pub fn tick(&mut self, delta_seconds: f64) {
        self.frames += 1;
        self.elapsed += delta_seconds;
    }

    /// Default handling for keys the stage does not bind.
    fn handle_unbound_key(&mut self, key: Key) {
        match key {
            Key::Escape => {
                tracing::info!("exit requested");
                self.exit_requested = true;
            }
            other => tracing::trace!("unbound key {other}"),
        }
    }

    fn current_mut(&mut self) -> Option<&mut SceneObject> {
        let id = self.current?;
        self.scene.get_mut(id)
    }

    /// Clear, build the shader, run `place`, then light the scene. If `place`
    /// fails the error is logged and returned and the scene stays as `place`
    /// left it.
    fn run_setup<F>(&mut self, preset: Preset, place: F) -> Result<(), StageError>
    where
        F: FnOnce(&mut Self, &BlinnPhongShader) -> Result<(), StageError>,
    {
        self.scene.clear();
        self.current = None;
        self.preset = None;

        let mut shader = BlinnPhongShader::new();
        shader.set_diffuse(Vec4::new(0.8, 0.8, 0.8, 1.0));
        shader.set_ambient(Vec4::splat(0.5));

        if let Err(e) = place(self, &shader) {
            tracing::error!("setting up {preset} failed: {e}");
            return Err(e);
        }

        let mut properties = BlinnPhongShader::create_light_properties();
        properties.diffuse_color = LIGHT_DIFFUSE;
        let mut light = Light::new(properties);
        light.set_position(LIGHT_POSITION);
        self.scene.add_light(light);

        self.preset = Some(preset);
        tracing::info!(
            "preset {preset}: {} object(s), {} mesh(es)",
            self.scene.object_count(),
            self.scene.mesh_count()
        );
        Ok(())
    }

    fn load(
        &mut self,
        shader: &BlinnPhongShader,
        path: &str,
    ) -> Result<Vec<RenderingObject>, StageError> {
        let path = Path::new(path);
        let meshes = self
            .loader
            .load_mesh(shader, path)
            .map_err(|source| StageError::MeshLoad {
                path: path.to_path_buf(),
                source,
            })?;
        if meshes.is_empty() {
            return Err(StageError::EmptyMesh {
                path: path.to_path_buf(),
            });
        }
        Ok(meshes)
    }

    /// Add an object and make it current.
    fn place(&mut self, meshes: Vec<RenderingObject>, position: Vec3, tilt: f32) -> ObjectId {
        let mut object = SceneObject::new(meshes);
        object.set_position(position);
        if tilt != 0.0 {
            object.rotate(WORLD_RIGHT, tilt);
        }
        let id = self.scene.add_object(object);
        self.current = Some(id);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;
    use std::path::PathBuf;
    use std::sync::Arc;
    use tableau_assets::{AssetError, MeshGeometry};

    /// Hands out a triangle named after the file stem; can be told to come up
    /// empty after a number of successful loads.
    #[derive(Default)]
    struct FakeLoader {
        loads: Vec<PathBuf>,
        empty_after: Option<usize>,
        fail_io: bool,
    }

    impl MeshSource for FakeLoader {
        fn load_mesh(
            &mut self,
            shader: &BlinnPhongShader,
            path: &Path,
        ) -> Result<Vec<RenderingObject>, AssetError> {
            if self.fail_io {
                return Err(AssetError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "no such file",
                )));
            }
            if self.empty_after.is_some_and(|n| self.loads.len() >= n) {
                return Ok(Vec::new());
            }
            self.loads.push(path.to_path_buf());
            let name = path.file_stem().unwrap().to_string_lossy().into_owned();
            let geometry = MeshGeometry::new(
                name,
                vec![Vec3::ZERO, Vec3::X, Vec3::Y],
                Vec::new(),
                vec![0, 1, 2],
            );
            Ok(vec![RenderingObject::new(Arc::new(geometry), *shader)])
        }
    }

    fn stage() -> Stage<FakeLoader> {
        Stage::new(StageConfig::default(), FakeLoader::default())
    }

    fn positions(stage: &Stage<FakeLoader>) -> Vec<Vec3> {
        stage.scene().objects().map(|(_, o)| o.position()).collect()
    }

    fn press(stage: &mut Stage<FakeLoader>, key: Key) {
        stage.handle_input(KeyInput::pressed(key));
    }

    #[test]
    fn create_camera_uses_config() {
        let camera = Stage::<FakeLoader>::create_camera(&StageConfig::default());
        assert_eq!(camera.fov_degrees, 75.0);
        assert_eq!(camera.aspect, 1280.0 / 720.0);
        assert_eq!(camera.z_far, 100.0);
        assert_eq!(stage().window_size(), (1280, 720));
    }

    #[test]
    fn setup_camera_raises_pitches_and_extends_far_plane() {
        let mut s = stage();
        s.setup_camera();
        assert_eq!(s.camera().position(), Vec3::new(0.0, 100.0, 10.0));
        assert_eq!(s.camera().z_far, 1000.0);
        let expected = Quat::from_axis_angle(Vec3::X, -0.5);
        assert!(s.camera().transform.rotation.abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn setup_scene_applies_startup_preset() {
        let mut s = stage();
        s.setup_scene().unwrap();
        assert_eq!(s.preset(), Some(Preset::Goblin(GoblinCount::Single)));
        assert_eq!(s.scene().object_count(), 1);
        assert_eq!(s.scene().light_count(), 1);
        assert_eq!(positions(&s), vec![Vec3::new(0.0, 0.0, -150.0)]);
        assert_eq!(
            s.loader().loads,
            vec![PathBuf::from("goblin/Model/goblin_unposed.obj")]
        );
    }

    #[test]
    fn goblins_are_tilted_forward() {
        let mut s = stage();
        s.setup_goblin(GoblinCount::Single).unwrap();
        let (_, obj) = s.scene().objects().next().unwrap();
        let expected = Quat::from_axis_angle(Vec3::X, -1.2);
        assert!(obj.transform().rotation.abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn trio_places_three_at_fixed_offsets() {
        let mut s = stage();
        s.setup_goblin(GoblinCount::Trio).unwrap();
        let xs: Vec<f32> = positions(&s).iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![-100.0, 0.0, 100.0]);
        assert_eq!(s.loader().loads.len(), 3);
        assert_eq!(
            s.loader().loads[2],
            PathBuf::from("goblin/Model/goblin_pose_02.obj")
        );
    }

    #[test]
    fn army_places_one_hundred_fifty() {
        let mut s = stage();
        s.setup_goblin(GoblinCount::Army).unwrap();
        assert_eq!(s.scene().object_count(), 150);
        assert_eq!(s.scene().light_count(), 1);
        let p = positions(&s);
        assert_eq!(p[0], Vec3::new(-700.0, -50.0, -150.0));
        assert_eq!(p[149], Vec3::new(700.0, -50.0, -1050.0));
    }

    #[test]
    fn only_last_created_object_is_current() {
        let mut s = stage();
        s.setup_goblin(GoblinCount::Trio).unwrap();
        let last = s.scene().objects().last().map(|(id, _)| id);
        assert_eq!(s.current_object(), last);

        press(&mut s, Key::Equals);
        let scales: Vec<f32> = s
            .scene()
            .objects()
            .map(|(_, o)| o.transform().scale.x)
            .collect();
        assert_eq!(scales[0], 1.0);
        assert_eq!(scales[1], 1.0);
        assert!((scales[2] - 1.1).abs() < 1e-6);
    }

    #[test]
    fn new_setup_replaces_previous_scene() {
        let mut s = stage();
        s.setup_goblin(GoblinCount::Army).unwrap();
        s.setup_human().unwrap();
        assert_eq!(s.scene().object_count(), 1);
        assert_eq!(s.scene().light_count(), 1);
        assert_eq!(s.preset(), Some(Preset::Human));
        assert_eq!(
            s.loader().loads.last().unwrap(),
            &PathBuf::from("human/human_male_unposed.obj")
        );
    }

    #[test]
    fn light_is_grey_point_light_in_front() {
        let mut s = stage();
        s.setup_human().unwrap();
        let light = s.scene().lights()[0];
        assert_eq!(light.position, Vec3::new(0.0, 0.0, 10.0));
        assert_eq!(light.properties.diffuse_color, Vec4::new(0.5, 0.5, 0.5, 1.0));
    }

    #[test]
    fn shader_parameters_reach_the_meshes() {
        let mut s = stage();
        s.setup_human().unwrap();
        let (_, obj) = s.scene().objects().next().unwrap();
        let shader = obj.meshes()[0].shader();
        assert_eq!(shader.diffuse, Vec4::new(0.8, 0.8, 0.8, 1.0));
        assert_eq!(shader.ambient, Vec4::splat(0.5));
    }

    #[test]
    fn example1_is_a_grey_icosphere() {
        let mut s = stage();
        s.setup_example1().unwrap();
        let (_, obj) = s.scene().objects().next().unwrap();
        let geometry = obj.meshes()[0].geometry();
        assert_eq!(geometry.vertex_count(), 2562);
        assert!(
            geometry
                .colors()
                .unwrap()
                .iter()
                .all(|c| *c == Vec4::new(0.5, 0.5, 0.5, 1.0))
        );
        assert_eq!(obj.position(), Vec3::ZERO);
        assert!(s.loader().loads.is_empty());
    }

    #[test]
    fn example2_loads_the_outlander() {
        let mut s = stage();
        s.apply_preset(Preset::Outlander).unwrap();
        assert_eq!(
            s.loader().loads,
            vec![PathBuf::from("outlander/Model/Outlander_Model.obj")]
        );
        assert_eq!(s.scene().light_count(), 1);
    }

    #[test]
    fn empty_mesh_aborts_setup_without_light() {
        let loader = FakeLoader {
            empty_after: Some(0),
            ..FakeLoader::default()
        };
        let mut s = Stage::new(StageConfig::default(), loader);
        let err = s.setup_goblin(GoblinCount::Single).unwrap_err();
        assert!(matches!(err, StageError::EmptyMesh { .. }));
        assert_eq!(s.scene().object_count(), 0);
        assert_eq!(s.scene().light_count(), 0);
        assert_eq!(s.current_object(), None);
        assert_eq!(s.preset(), None);
    }

    #[test]
    fn army_failure_keeps_objects_placed_so_far() {
        let loader = FakeLoader {
            empty_after: Some(40),
            ..FakeLoader::default()
        };
        let mut s = Stage::new(StageConfig::default(), loader);
        assert!(s.setup_goblin(GoblinCount::Army).is_err());
        assert_eq!(s.scene().object_count(), 40);
        assert_eq!(s.scene().light_count(), 0);
        let last = s.scene().objects().last().map(|(id, _)| id);
        assert_eq!(s.current_object(), last);
    }

    #[test]
    fn loader_error_is_reported_with_path() {
        let loader = FakeLoader {
            fail_io: true,
            ..FakeLoader::default()
        };
        let mut s = Stage::new(StageConfig::default(), loader);
        let err = s.setup_human().unwrap_err();
        assert!(matches!(err, StageError::MeshLoad { .. }));
        assert!(err.to_string().contains("human_male_unposed.obj"));
    }

    #[test]
    fn failed_setup_clears_previous_scene() {
        let mut s = stage();
        s.setup_goblin(GoblinCount::Trio).unwrap();
        s.loader.empty_after = Some(0);
        press(&mut s, Key::Digit4);
        assert_eq!(s.scene().object_count(), 0);
        assert_eq!(s.scene().light_count(), 0);
    }

    #[test]
    fn number_keys_switch_presets_but_not_on_repeat() {
        let mut s = stage();
        press(&mut s, Key::Digit3);
        assert_eq!(s.scene().object_count(), 150);

        s.handle_input(KeyInput::repeated(Key::Digit2));
        assert_eq!(s.scene().object_count(), 150);

        press(&mut s, Key::Digit2);
        assert_eq!(s.scene().object_count(), 3);
        press(&mut s, Key::Digit1);
        assert_eq!(s.scene().object_count(), 1);
    }

    #[test]
    fn key_up_does_nothing() {
        let mut s = stage();
        s.handle_input(KeyInput::released(Key::Digit3));
        s.handle_input(KeyInput::released(Key::W));
        assert_eq!(s.scene().object_count(), 0);
        assert_eq!(s.camera().position(), Vec3::ZERO);
    }

    #[test]
    fn arrows_rotate_current_object() {
        let mut s = stage();
        s.setup_goblin(GoblinCount::Single).unwrap();
        press(&mut s, Key::Right);
        s.handle_input(KeyInput::repeated(Key::Right));
        press(&mut s, Key::Up);

        let id = s.current_object().unwrap();
        let rotation = s.scene().get(id).unwrap().transform().rotation;
        let expected = Quat::from_axis_angle(Vec3::X, -0.1)
            * Quat::from_axis_angle(Vec3::Y, 0.1)
            * Quat::from_axis_angle(Vec3::Y, 0.1)
            * Quat::from_axis_angle(Vec3::X, -1.2);
        assert!(rotation.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn wasd_space_ctrl_move_camera() {
        let mut s = stage();
        press(&mut s, Key::W);
        press(&mut s, Key::W);
        press(&mut s, Key::A);
        press(&mut s, Key::Space);
        let p = s.camera().position();
        assert!((p - Vec3::new(0.3, -0.3, -0.6)).length() < 1e-5);

        press(&mut s, Key::S);
        press(&mut s, Key::S);
        press(&mut s, Key::D);
        press(&mut s, Key::RightCtrl);
        assert!(s.camera().position().length() < 1e-5);
    }

    #[test]
    fn scale_is_additive_and_unbounded() {
        let mut s = stage();
        s.setup_goblin(GoblinCount::Single).unwrap();
        for _ in 0..25 {
            press(&mut s, Key::Minus);
        }
        let id = s.current_object().unwrap();
        let scale = s.scene().get(id).unwrap().transform().scale;
        assert!((scale.x - (-1.5)).abs() < 1e-4);

        for _ in 0..50 {
            s.handle_input(KeyInput::repeated(Key::Equals));
        }
        let scale = s.scene().get(id).unwrap().transform().scale;
        assert!((scale.x - 3.5).abs() < 1e-4);
    }

    #[test]
    fn object_keys_without_object_are_ignored() {
        let mut s = stage();
        press(&mut s, Key::Up);
        press(&mut s, Key::Equals);
        assert_eq!(s.current_object(), None);
    }

    #[test]
    fn resize_sets_exact_aspect_ratio() {
        let mut s = stage();
        s.handle_window_resize(1920.0, 1080.0);
        assert_eq!(s.camera().aspect, 1920.0 / 1080.0);
        s.handle_window_resize(333.0, 777.0);
        assert_eq!(s.camera().aspect, 333.0 / 777.0);
    }

    #[test]
    fn degenerate_resize_is_ignored() {
        let mut s = stage();
        s.handle_window_resize(800.0, 0.0);
        assert_eq!(s.camera().aspect, 1280.0 / 720.0);
    }

    #[test]
    fn escape_requests_exit_and_other_keys_are_ignored() {
        let mut s = stage();
        press(&mut s, Key::Other);
        assert!(!s.exit_requested());
        press(&mut s, Key::Escape);
        assert!(s.exit_requested());
    }

    #[test]
    fn tick_counts_frames() {
        let mut s = stage();
        s.tick(0.016);
        s.tick(0.016);
        assert_eq!(s.frames(), 2);
        assert!((s.elapsed() - 0.032).abs() < 1e-9);
        assert_eq!(s.scene().object_count(), 0);
    }

    #[test]
    fn army_seed_makes_pose_selection_reproducible() {
        let config = StageConfig {
            army_seed: 11,
            ..StageConfig::default()
        };
        let mut a = Stage::new(config.clone(), FakeLoader::default());
        let mut b = Stage::new(config, FakeLoader::default());
        a.setup_goblin(GoblinCount::Army).unwrap();
        b.setup_goblin(GoblinCount::Army).unwrap();
        assert_eq!(a.loader().loads, b.loader().loads);
    }

    #[test]
    fn obj_loader_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        for model in GOBLIN_MODELS {
            let path = dir.path().join(model);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, "o goblin\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        }
        let config = StageConfig {
            asset_root: dir.path().to_path_buf(),
            ..StageConfig::default()
        };
        let mut s = Stage::from_config(config);
        s.setup_goblin(GoblinCount::Army).unwrap();
        assert_eq!(s.scene().object_count(), 150);
        // The three files are parsed once each and shared by every goblin.
        assert!(s.loader().store().len() <= 3);

        assert!(s.setup_human().is_err());
        assert_eq!(s.scene().object_count(), 0);
    }
}
