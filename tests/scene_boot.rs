//! Boots the full scene headless: the staged build runs to completion,
//! the world comes out populated and deterministic for a fixed seed, and
//! a bad configuration freezes loading instead of crashing.

use std::thread;
use std::time::Duration;

use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use roadchase::characters::Chaser;
use roadchase::core::config::SceneConfig;
use roadchase::environment::forest::Tree;
use roadchase::management::loading::LoadingProgress;
use roadchase::management::AppState;
use roadchase::systems::chase::ChaseProgress;
use roadchase::terrain::{LaneMarking, TerrainSettings};
use roadchase::ChaseScenePlugin;

fn headless_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, AssetPlugin::default(), StatesPlugin));
    app.init_asset::<Mesh>();
    app.init_asset::<StandardMaterial>();
    app.init_resource::<ButtonInput<KeyCode>>();
    app.add_plugins(ChaseScenePlugin);
    app
}

/// Updates until the app leaves `Loading`. Real sleeps give the ready
/// dwell timer actual time to elapse.
fn drive_to_running(app: &mut App, max_frames: usize) -> bool {
    for _ in 0..max_frames {
        app.update();
        if app.world().resource::<State<AppState>>().get() == &AppState::Running {
            return true;
        }
        thread::sleep(Duration::from_millis(25));
    }
    false
}

#[test]
fn boot_reaches_running_with_a_populated_world() {
    let mut app = headless_app();
    assert!(drive_to_running(&mut app, 200), "never left loading");

    let markings = app
        .world_mut()
        .query::<&LaneMarking>()
        .iter(app.world())
        .count();
    assert_eq!(markings, 200);
    let trees = app.world_mut().query::<&Tree>().iter(app.world()).count();
    assert!(trees > 0, "forest came up empty");

    // A few running frames move the chase and pin the chaser to the
    // road curve a gap behind the leader.
    for _ in 0..5 {
        thread::sleep(Duration::from_millis(10));
        app.update();
    }
    let (curve, gap, distance) = {
        let world = app.world();
        (
            world.resource::<TerrainSettings>().curve,
            world.resource::<SceneConfig>().chase_gap,
            world.resource::<ChaseProgress>().distance,
        )
    };
    assert!(distance > 0.0);
    let mut chasers = app.world_mut().query_filtered::<&Transform, With<Chaser>>();
    let chaser = chasers.single(app.world()).translation;
    assert!((chaser - curve.road_position(distance - gap)).length() < 1e-3);
}

#[test]
fn same_seed_builds_the_same_forest() {
    fn tree_positions(app: &mut App) -> Vec<Vec3> {
        let mut query = app.world_mut().query_filtered::<&Transform, With<Tree>>();
        let mut positions: Vec<Vec3> = query.iter(app.world()).map(|t| t.translation).collect();
        positions.sort_by(|a, b| {
            a.z.partial_cmp(&b.z)
                .unwrap()
                .then(a.x.partial_cmp(&b.x).unwrap())
        });
        positions
    }

    let mut first = headless_app();
    let mut second = headless_app();
    assert!(drive_to_running(&mut first, 200));
    assert!(drive_to_running(&mut second, 200));

    let first_trees = tree_positions(&mut first);
    let second_trees = tree_positions(&mut second);
    assert!(!first_trees.is_empty());
    assert_eq!(first_trees, second_trees);
}

#[test]
fn bad_config_freezes_loading_with_an_error() {
    let mut app = headless_app();
    app.insert_resource(SceneConfig {
        road_length: -50.0,
        ..SceneConfig::default()
    });

    for _ in 0..10 {
        app.update();
        thread::sleep(Duration::from_millis(5));
    }

    assert_eq!(
        app.world().resource::<State<AppState>>().get(),
        &AppState::Loading
    );
    let progress = app.world().resource::<LoadingProgress>();
    let error = progress.error.as_deref().unwrap_or_default();
    assert!(error.contains("road length"), "unexpected error: {error}");
    assert_eq!(progress.next, 0, "build should not advance past the failure");
}
