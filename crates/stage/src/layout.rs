//! Where each preset puts its models.

use glam::Vec3;
use tableau_common::GoblinCount;

pub const GOBLIN_MODELS: [&str; 3] = [
    "goblin/Model/goblin_unposed.obj",
    "goblin/Model/goblin_pose_01.obj",
    "goblin/Model/goblin_pose_02.obj",
];
pub const HUMAN_MODEL: &str = "human/human_male_unposed.obj";
pub const OUTLANDER_MODEL: &str = "outlander/Model/Outlander_Model.obj";

/// Tilt about world right applied to the goblin and human models.
pub const MODEL_TILT: f32 = -1.2;
/// Distance between neighbouring models.
pub const SPACING: f32 = 100.0;
/// Depth of the front row.
pub const FRONT_DEPTH: f32 = -150.0;
/// Height the army stands at.
pub const ARMY_HEIGHT: f32 = -50.0;
/// Rows going away from the camera.
pub const ARMY_ROWS: usize = 10;
/// Goblins per row.
pub const ARMY_COLUMNS: usize = 15;

/// One model to load and where to put it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Index into [`GOBLIN_MODELS`].
    pub model: usize,
    pub position: Vec3,
}

/// Picks goblin poses for the army.
///
/// A splitmix64 stream: the same seed always yields the same poses, and each
/// pick advances the stream.
#[derive(Debug, Clone)]
pub struct PosePicker {
    state: u64,
}

impl PosePicker {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Uniform index in `0..n`. `n` must be non-zero.
    pub fn pick(&mut self, n: usize) -> usize {
        self.state = splitmix64(self.state);
        (self.state % n as u64) as usize
    }
}

/// Placements for a goblin preset, in creation order.
pub fn goblin_layout(count: GoblinCount, picker: &mut PosePicker) -> Vec<Placement> {
    match count {
        GoblinCount::Single => vec![Placement {
            model: 0,
            position: Vec3::new(0.0, 0.0, FRONT_DEPTH),
        }],
        GoblinCount::Trio => (0..GOBLIN_MODELS.len())
            .map(|i| Placement {
                model: i,
                position: Vec3::new(-SPACING + SPACING * i as f32, 0.0, FRONT_DEPTH),
            })
            .collect(),
        GoblinCount::Army => {
            // Integer halving: 15 columns start at -700, not -750.
            let left = -((ARMY_COLUMNS / 2) as f32) * SPACING;
            let mut placements = Vec::with_capacity(ARMY_ROWS * ARMY_COLUMNS);
            for row in 0..ARMY_ROWS {
                for column in 0..ARMY_COLUMNS {
                    placements.push(Placement {
                        model: picker.pick(GOBLIN_MODELS.len()),
                        position: Vec3::new(
                            left + SPACING * column as f32,
                            ARMY_HEIGHT,
                            FRONT_DEPTH - SPACING * row as f32,
                        ),
                    });
                }
            }
            placements
        }
    }
}

fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
