use crate::{Key, KeyInput, KeyState};
use glam::Vec3;
use tableau_common::{GoblinCount, Preset, WORLD_FORWARD, WORLD_RIGHT, WORLD_UP};

/// Rotation applied to the current object per key press, in radians.
pub const ROTATE_STEP: f32 = 0.1;
/// Camera translation per key press, in world units.
pub const CAMERA_STEP: f32 = 0.3;
/// Uniform scale change per key press.
pub const SCALE_STEP: f32 = 0.1;

/// What a key press asks the stage to do.
///
/// The stage consumes actions, never raw key codes, so every host (desktop,
/// headless CLI, tests) drives the same logic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Rebuild the scene from a preset.
    ApplyPreset(Preset),
    /// Rotate the current object about a world axis.
    RotateObject { axis: Vec3, angle: f32 },
    /// Move the camera by a world-space delta.
    TranslateCamera(Vec3),
    /// Add to the current object's uniform scale.
    ScaleObject(f32),
    /// Not bound here; hand to the host's default handling.
    Delegate(Key),
}

/// Map one keyboard event to an action.
///
/// Key-up events map to nothing. Number keys ignore auto-repeat; every other
/// binding fires on repeats too.
pub fn map_key(input: KeyInput) -> Option<Action> {
    if input.state != KeyState::Pressed {
        return None;
    }

    let preset = match input.key {
        Key::Digit1 => Some(Preset::Goblin(GoblinCount::Single)),
        Key::Digit2 => Some(Preset::Goblin(GoblinCount::Trio)),
        Key::Digit3 => Some(Preset::Goblin(GoblinCount::Army)),
        Key::Digit4 => Some(Preset::Human),
        _ => None,
    };
    if let Some(preset) = preset {
        return (!input.repeat).then_some(Action::ApplyPreset(preset));
    }

    let action = match input.key {
        Key::Up => Action::RotateObject {
            axis: WORLD_RIGHT,
            angle: -ROTATE_STEP,
        },
        Key::Down => Action::RotateObject {
            axis: WORLD_RIGHT,
            angle: ROTATE_STEP,
        },
        Key::Right => Action::RotateObject {
            axis: WORLD_UP,
            angle: ROTATE_STEP,
        },
        Key::Left => Action::RotateObject {
            axis: WORLD_UP,
            angle: -ROTATE_STEP,
        },
        Key::W => Action::TranslateCamera(WORLD_FORWARD * -CAMERA_STEP),
        Key::S => Action::TranslateCamera(WORLD_FORWARD * CAMERA_STEP),
        Key::A => Action::TranslateCamera(WORLD_RIGHT * CAMERA_STEP),
        Key::D => Action::TranslateCamera(WORLD_RIGHT * -CAMERA_STEP),
        Key::Space => Action::TranslateCamera(WORLD_UP * -CAMERA_STEP),
        Key::LeftCtrl | Key::RightCtrl => Action::TranslateCamera(WORLD_UP * CAMERA_STEP),
        Key::Equals => Action::ScaleObject(SCALE_STEP),
        Key::Minus => Action::ScaleObject(-SCALE_STEP),
        other => Action::Delegate(other),
    };
    Some(action)
}
