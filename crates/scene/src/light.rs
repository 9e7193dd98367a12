use glam::Vec3;
use tableau_assets::BlinnPhongLightProperties;

/// A point light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub properties: BlinnPhongLightProperties,
}

impl Light {
    /// A light at the origin with the given colours.
    pub fn new(properties: BlinnPhongLightProperties) -> Self {
        Self {
            position: Vec3::ZERO,
            properties,
        }
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }
}
