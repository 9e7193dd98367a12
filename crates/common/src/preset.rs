use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How many goblins a goblin preset places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoblinCount {
    /// One unposed goblin.
    Single,
    /// One goblin per pose, side by side.
    Trio,
    /// A 10 x 15 grid of randomly posed goblins.
    Army,
}

/// A hard-coded scene configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Preset {
    Goblin(GoblinCount),
    Human,
    /// Procedural vertex-coloured icosphere.
    Sphere,
    /// External OBJ model.
    Outlander,
}

impl Preset {
    pub const ALL: [Preset; 6] = [
        Preset::Goblin(GoblinCount::Single),
        Preset::Goblin(GoblinCount::Trio),
        Preset::Goblin(GoblinCount::Army),
        Preset::Human,
        Preset::Sphere,
        Preset::Outlander,
    ];

    /// Short name used by config files and the command line.
    pub fn name(self) -> &'static str {
        match self {
            Preset::Goblin(GoblinCount::Single) => "single",
            Preset::Goblin(GoblinCount::Trio) => "trio",
            Preset::Goblin(GoblinCount::Army) => "army",
            Preset::Human => "human",
            Preset::Sphere => "sphere",
            Preset::Outlander => "outlander",
        }
    }
}

impl Default for Preset {
    fn default() -> Self {
        Preset::Goblin(GoblinCount::Single)
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown preset `{0}` (expected one of: single, trio, army, human, sphere, outlander)")]
pub struct ParsePresetError(pub String);

impl FromStr for Preset {
    type Err = ParsePresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Preset::ALL
            .into_iter()
            .find(|p| p.name() == lower)
            .ok_or_else(|| ParsePresetError(s.to_string()))
    }
}

impl TryFrom<String> for Preset {
    type Error = ParsePresetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Preset> for String {
    fn from(value: Preset) -> Self {
        value.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_single_goblin() {
        assert_eq!(Preset::default(), Preset::Goblin(GoblinCount::Single));
    }

    #[test]
    fn names_round_trip_through_from_str() {
        for preset in Preset::ALL {
            assert_eq!(preset.name().parse::<Preset>().unwrap(), preset);
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("ARMY".parse::<Preset>().unwrap(), Preset::Goblin(GoblinCount::Army));
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "dragon".parse::<Preset>().unwrap_err();
        assert!(err.to_string().contains("dragon"));
    }
}
