use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// World-space right axis.
pub const WORLD_RIGHT: Vec3 = Vec3::X;
/// World-space up axis.
pub const WORLD_UP: Vec3 = Vec3::Y;
/// World-space forward axis.
pub const WORLD_FORWARD: Vec3 = Vec3::Z;

/// Identifier for an object in a scene.
///
/// Handed out sequentially by the scene, so ordering by id is creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Move by a world-space delta.
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }

    /// Rotate about a world-space axis. The new rotation is applied on top of
    /// the existing one.
    pub fn rotate(&mut self, axis: Vec3, angle: f32) {
        let axis = axis.normalize_or_zero();
        if axis == Vec3::ZERO {
            return;
        }
        self.rotation = (Quat::from_axis_angle(axis, angle) * self.rotation).normalize();
    }

    /// Add `delta` to every scale component. No clamping.
    pub fn add_scale(&mut self, delta: f32) {
        self.scale += Vec3::splat(delta);
    }

    /// Model matrix (scale, then rotate, then translate).
    pub fn matrix(&self) -> glam::Mat4 {
        glam::Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
    }

    #[test]
    fn object_ids_order_by_value() {
        assert!(ObjectId(1) < ObjectId(2));
        assert_eq!(ObjectId(7).to_string(), "#7");
    }

    #[test]
    fn rotate_about_world_up() {
        let mut t = Transform::default();
        t.rotate(WORLD_UP, FRAC_PI_2);
        let v = t.rotation * Vec3::X;
        assert!((v - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn rotations_compose_in_world_space() {
        let mut t = Transform::default();
        t.rotate(WORLD_RIGHT, -1.2);
        t.rotate(WORLD_UP, 0.1);
        let expected = Quat::from_axis_angle(Vec3::Y, 0.1) * Quat::from_axis_angle(Vec3::X, -1.2);
        assert!(t.rotation.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn rotate_with_zero_axis_is_noop() {
        let mut t = Transform::default();
        t.rotate(Vec3::ZERO, 1.0);
        assert_eq!(t.rotation, Quat::IDENTITY);
    }

    #[test]
    fn add_scale_is_additive_and_unclamped() {
        let mut t = Transform::default();
        for _ in 0..15 {
            t.add_scale(-0.1);
        }
        assert!((t.scale.x - (-0.5)).abs() < 1e-5);
        assert_eq!(t.scale.x, t.scale.y);
        assert_eq!(t.scale.y, t.scale.z);
    }

    #[test]
    fn translate_adds_delta() {
        let mut t = Transform::default();
        t.translate(Vec3::new(0.0, 100.0, 10.0));
        t.translate(WORLD_FORWARD * -0.3);
        assert!((t.position - Vec3::new(0.0, 100.0, 9.7)).length() < 1e-5);
    }

    #[test]
    fn matrix_places_origin_at_position() {
        let t = Transform {
            position: Vec3::new(1.0, 2.0, 3.0),
            ..Transform::default()
        };
        let p = t.matrix().transform_point3(Vec3::ZERO);
        assert_eq!(p, Vec3::new(1.0, 2.0, 3.0));
    }
}
