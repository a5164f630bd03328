use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::window::WindowPlugin;

use roadchase::ChaseScenePlugin;

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Road Chase".into(),
                        resolution: (1280.0, 720.0).into(),
                        ..default()
                    }),
                    ..default()
                })
                .set(LogPlugin {
                    filter: "info,wgpu_core=warn,wgpu_hal=warn,roadchase=debug".into(),
                    ..default()
                }),
        )
        .add_plugins(ChaseScenePlugin)
        .run();
}
