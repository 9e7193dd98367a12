use glam::Vec4;
use serde::{Deserialize, Serialize};

/// Surface parameters for the Blinn-Phong reflectance model.
///
/// This is a material description only. Backends turn it into whatever
/// pipeline state they need.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlinnPhongShader {
    pub diffuse: Vec4,
    pub ambient: Vec4,
    pub specular: Vec4,
    pub shininess: f32,
}

impl Default for BlinnPhongShader {
    fn default() -> Self {
        Self {
            diffuse: Vec4::new(0.8, 0.8, 0.8, 1.0),
            ambient: Vec4::splat(0.1),
            specular: Vec4::new(0.3, 0.3, 0.3, 1.0),
            shininess: 32.0,
        }
    }
}

impl BlinnPhongShader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_diffuse(&mut self, diffuse: Vec4) {
        self.diffuse = diffuse;
    }

    pub fn set_ambient(&mut self, ambient: Vec4) {
        self.ambient = ambient;
    }

    pub fn set_specular(&mut self, specular: Vec4, shininess: f32) {
        self.specular = specular;
        self.shininess = shininess;
    }

    /// Light properties understood by this shading model, at their defaults.
    pub fn create_light_properties() -> BlinnPhongLightProperties {
        BlinnPhongLightProperties::default()
    }
}

/// Per-light colours for the Blinn-Phong model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlinnPhongLightProperties {
    pub diffuse_color: Vec4,
    pub specular_color: Vec4,
}

impl Default for BlinnPhongLightProperties {
    fn default() -> Self {
        Self {
            diffuse_color: Vec4::ONE,
            specular_color: Vec4::ONE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setters_replace_colours() {
        let mut shader = BlinnPhongShader::new();
        shader.set_diffuse(Vec4::new(0.8, 0.8, 0.8, 1.0));
        shader.set_ambient(Vec4::splat(0.5));
        assert_eq!(shader.diffuse, Vec4::new(0.8, 0.8, 0.8, 1.0));
        assert_eq!(shader.ambient, Vec4::splat(0.5));
    }

    #[test]
    fn light_properties_default_to_white() {
        let props = BlinnPhongShader::create_light_properties();
        assert_eq!(props.diffuse_color, Vec4::ONE);
        assert_eq!(props.specular_color, Vec4::ONE);
    }
}
