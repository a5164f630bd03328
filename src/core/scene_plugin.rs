//! Top-level plugin that assembles the whole chase scene.

use bevy::prelude::*;

use crate::camera::CameraRigPlugin;
use crate::characters::CharactersPlugin;
use crate::core::config::SceneConfig;
use crate::core::rng::GenRng;
use crate::effects::EffectsPlugin;
use crate::environment::EnvironmentPlugin;
use crate::management::loading::LoadingPlugin;
use crate::systems::chase::ChasePlugin;
use crate::terrain::TerrainPlugin;

/// Adds every scene plugin plus the shared config and RNG resources.
/// Expects Bevy's own plugin set (or a headless subset of it) to be in
/// place already.
pub struct ChaseScenePlugin;

impl Plugin for ChaseScenePlugin {
    fn build(&self, app: &mut App) {
        let config = SceneConfig::load_or_default();
        let rng = GenRng::new(config.seed);
        app.insert_resource(ClearColor(Color::srgb_u8(0x89, 0xcf, 0xf0)))
            .insert_resource(rng)
            .insert_resource(config)
            .add_plugins((
                LoadingPlugin,
                TerrainPlugin,
                EnvironmentPlugin,
                CharactersPlugin,
                EffectsPlugin,
                CameraRigPlugin,
                ChasePlugin,
            ));
    }
}
