use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::errors::BuildError;

/// Optional override file, read once at startup. Absent file means
/// defaults; a malformed file is logged and ignored rather than aborting
/// the scene.
pub const CONFIG_PATH: &str = "assets/roadchase.ron";

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Seed for all procedural placement.
    pub seed: u64,
    /// Paved distance in world units.
    pub road_length: f32,
    /// Travel speed of the chase in units per second.
    pub chase_speed: f32,
    /// How far the chaser trails the leader.
    pub chase_gap: f32,
    pub forest: ForestSettings,
    pub desert: DesertSettings,
}

impl Default for SceneConfig {
    fn default() -> Self {
        SceneConfig {
            seed: 1991,
            road_length: 1000.0,
            chase_speed: 15.0,
            chase_gap: 10.0,
            forest: ForestSettings::default(),
            desert: DesertSettings::default(),
        }
    }
}

/// Candidate counts for the forest band. Counts are candidates, not
/// guarantees: placements that land on the road are dropped, not retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestSettings {
    pub trees: usize,
    pub grass: usize,
    pub bushes: usize,
}

impl Default for ForestSettings {
    fn default() -> Self {
        ForestSettings {
            trees: 80,
            grass: 200,
            bushes: 50,
        }
    }
}

/// Candidate counts for the desert band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesertSettings {
    /// Cactus-or-rock candidates.
    pub scatter: usize,
    pub tumbleweeds: usize,
}

impl Default for DesertSettings {
    fn default() -> Self {
        DesertSettings {
            scatter: 60,
            tumbleweeds: 10,
        }
    }
}

impl SceneConfig {
    /// Reads [`CONFIG_PATH`] if present, falling back to defaults on a
    /// missing or unparseable file.
    pub fn load_or_default() -> Self {
        match std::fs::read_to_string(CONFIG_PATH) {
            Ok(text) => match ron::from_str(&text) {
                Ok(config) => {
                    info!("loaded scene overrides from {CONFIG_PATH}");
                    config
                }
                Err(err) => {
                    warn!("ignoring malformed {CONFIG_PATH}: {err}");
                    SceneConfig::default()
                }
            },
            Err(_) => SceneConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<(), BuildError> {
        if !self.road_length.is_finite() || self.road_length <= 0.0 {
            return Err(BuildError::InvalidSettings(format!(
                "road length must be positive, got {}",
                self.road_length
            )));
        }
        if !self.chase_speed.is_finite() || self.chase_speed <= 0.0 {
            return Err(BuildError::InvalidSettings(format!(
                "chase speed must be positive, got {}",
                self.chase_speed
            )));
        }
        if !self.chase_gap.is_finite() || self.chase_gap < 0.0 {
            return Err(BuildError::InvalidSettings(format!(
                "chase gap must be non-negative, got {}",
                self.chase_gap
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert_eq!(SceneConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_degenerate_fields() {
        let mut config = SceneConfig::default();
        config.road_length = 0.0;
        assert!(config.validate().is_err());

        let mut config = SceneConfig::default();
        config.chase_speed = -3.0;
        assert!(config.validate().is_err());

        let mut config = SceneConfig::default();
        config.chase_gap = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_ron_overrides_merge_with_defaults() {
        let config: SceneConfig =
            ron::from_str("(seed: 42, forest: (trees: 10))").unwrap();
        assert_eq!(config.seed, 42);
        assert_eq!(config.forest.trees, 10);
        // Untouched fields keep their defaults.
        assert_eq!(config.road_length, 1000.0);
        assert_eq!(config.forest.grass, 200);
        assert_eq!(config.desert.scatter, 60);
    }

    #[test]
    fn round_trips_through_ron() {
        let config = SceneConfig::default();
        let text = ron::to_string(&config).unwrap();
        let back: SceneConfig = ron::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
