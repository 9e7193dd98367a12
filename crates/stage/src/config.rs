use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tableau_common::Preset;

/// Errors from loading a stage configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Window size requested from the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Camera lens settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view.
    pub fov_degrees: f32,
    pub z_near: f32,
    /// Far plane set by `setup_camera`.
    pub z_far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            z_near: 1.0,
            z_far: 1000.0,
        }
    }
}

/// Everything a stage needs that is not hard-wired into the presets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Directory model paths are resolved against.
    pub asset_root: PathBuf,
    pub window: WindowConfig,
    pub camera: CameraConfig,
    /// Preset applied by `setup_scene`.
    pub startup_preset: Preset,
    /// Seed for the army's pose picks.
    pub army_seed: u64,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("assets"),
            window: WindowConfig::default(),
            camera: CameraConfig::default(),
            startup_preset: Preset::default(),
            army_seed: 0,
        }
    }
}

impl StageConfig {
    /// Load and validate a YAML file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_yaml(&text)?;
        tracing::debug!("loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window must be non-empty, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        let cam = &self.camera;
        if !(cam.fov_degrees > 0.0 && cam.fov_degrees < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "fov_degrees must be in (0, 180), got {}",
                cam.fov_degrees
            )));
        }
        if !(cam.z_near > 0.0 && cam.z_far > cam.z_near) {
            return Err(ConfigError::Invalid(format!(
                "clip planes must satisfy 0 < z_near < z_far, got {} and {}",
                cam.z_near, cam.z_far
            )));
        }
        Ok(())
    }

    /// Width over height of the configured window.
    pub fn aspect_ratio(&self) -> f32 {
        self.window.width as f32 / self.window.height as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tableau_common::GoblinCount;

    #[test]
    fn defaults_match_the_demo() {
        let config = StageConfig::default();
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.window.height, 720);
        assert_eq!(config.camera.fov_degrees, 75.0);
        assert_eq!(config.camera.z_far, 1000.0);
        assert_eq!(config.startup_preset, Preset::Goblin(GoblinCount::Single));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = StageConfig::from_yaml("startup_preset: army\narmy_seed: 9\n").unwrap();
        assert_eq!(config.startup_preset, Preset::Goblin(GoblinCount::Army));
        assert_eq!(config.army_seed, 9);
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn nested_sections_parse() {
        let yaml = "asset_root: /data/models\nwindow:\n  width: 800\n  height: 600\ncamera:\n  fov_degrees: 60\n";
        let config = StageConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.asset_root, PathBuf::from("/data/models"));
        assert_eq!(config.window.height, 600);
        assert_eq!(config.camera.fov_degrees, 60.0);
        assert_eq!(config.camera.z_near, 1.0);
        assert!((config.aspect_ratio() - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn unknown_preset_is_rejected() {
        assert!(matches!(
            StageConfig::from_yaml("startup_preset: dragon\n"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn zero_window_is_rejected() {
        let err = StageConfig::from_yaml("window:\n  width: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn inverted_clip_planes_are_rejected() {
        let err = StageConfig::from_yaml("camera:\n  z_near: 10\n  z_far: 5\n").unwrap_err();
        assert!(err.to_string().contains("z_near"));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tableau.yaml");
        std::fs::write(&path, "startup_preset: human\n").unwrap();
        let config = StageConfig::load(&path).unwrap();
        assert_eq!(config.startup_preset, Preset::Human);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = StageConfig::load(dir.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
