use glam::{Mat4, Vec3};
use tableau_common::Transform;

/// Perspective camera with its own world transform.
///
/// Looks down its local -Z axis. The field of view is the vertical one, in
/// degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    pub fov_degrees: f32,
    pub aspect: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub transform: Transform,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(75.0, 1280.0 / 720.0)
    }
}

impl PerspectiveCamera {
    /// Camera at the origin with near 1 and far 100.
    pub fn new(fov_degrees: f32, aspect: f32) -> Self {
        Self {
            fov_degrees,
            aspect,
            z_near: 1.0,
            z_far: 100.0,
            transform: Transform::default(),
        }
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.transform.translate(delta);
    }

    /// Rotate about a world-space axis.
    pub fn rotate(&mut self, axis: Vec3, angle: f32) {
        self.transform.rotate(axis, angle);
    }

    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    pub fn set_z_far(&mut self, z_far: f32) {
        self.z_far = z_far;
    }

    /// Viewing direction in world space.
    pub fn forward(&self) -> Vec3 {
        self.transform.rotation * Vec3::NEG_Z
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.transform.rotation, self.transform.position).inverse()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_degrees.to_radians(),
            self.aspect,
            self.z_near,
            self.z_far,
        )
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera() {
        let cam = PerspectiveCamera::default();
        assert_eq!(cam.fov_degrees, 75.0);
        assert_eq!(cam.aspect, 1280.0 / 720.0);
        assert_eq!(cam.z_far, 100.0);
        let vp = cam.view_projection();
        assert!(!vp.col(0).x.is_nan());
    }

    #[test]
    fn looks_down_negative_z() {
        let cam = PerspectiveCamera::default();
        assert_eq!(cam.forward(), Vec3::NEG_Z);
    }

    #[test]
    fn pitching_about_right_tilts_view_down() {
        let mut cam = PerspectiveCamera::default();
        cam.rotate(Vec3::X, -0.5);
        let f = cam.forward();
        assert!(f.y < 0.0);
        assert!(f.z < 0.0);
    }

    #[test]
    fn view_matrix_moves_camera_to_origin() {
        let mut cam = PerspectiveCamera::default();
        cam.translate(Vec3::new(0.0, 100.0, 10.0));
        let p = cam.view_matrix().transform_point3(Vec3::new(0.0, 100.0, 10.0));
        assert!(p.length() < 1e-4);
    }

    #[test]
    fn point_in_front_projects_inside_clip_volume() {
        let mut cam = PerspectiveCamera::default();
        cam.set_z_far(1000.0);
        let clip = cam.view_projection() * Vec3::new(0.0, 0.0, -150.0).extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0);
        assert!((0.0..=1.0).contains(&ndc.z));
    }
}
