//! One build stage per frame, with progress mirrored to an overlay of
//! title, status line and progress bar. A build error freezes the
//! sequence and surfaces on the status line instead of crashing.

use bevy::prelude::*;

use crate::characters::{hedgehog, roadrunner};
use crate::core::config::SceneConfig;
use crate::core::errors::BuildError;
use crate::core::rng::GenRng;
use crate::effects;
use crate::environment::{desert, forest};
use crate::management::AppState;
use crate::terrain::{self, TerrainSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStage {
    Scene,
    Terrain,
    Forest,
    Desert,
    Chaser,
    Leader,
    Effects,
    Lighting,
    Finish,
}

/// Stage order with the percent and status line reported once the stage
/// completes.
pub const BUILD_PLAN: [(BuildStage, f32, &str); 9] = [
    (BuildStage::Scene, 10.0, "Creating scene..."),
    (BuildStage::Terrain, 20.0, "Building terrain..."),
    (BuildStage::Forest, 35.0, "Growing forest..."),
    (BuildStage::Desert, 50.0, "Creating desert..."),
    (BuildStage::Chaser, 65.0, "Spawning the hedgehog..."),
    (BuildStage::Leader, 75.0, "Spawning the roadrunner..."),
    (BuildStage::Effects, 85.0, "Adding effects..."),
    (BuildStage::Lighting, 95.0, "Finalizing..."),
    (BuildStage::Finish, 100.0, "Ready!"),
];

/// Dwell on the full bar before the chase starts, long enough to read
/// "Ready!".
const READY_DWELL_SECS: f32 = 0.5;

#[derive(Resource)]
pub struct LoadingProgress {
    /// Index of the next stage in [`BUILD_PLAN`] to run.
    pub next: usize,
    pub percent: f32,
    pub message: String,
    /// A failed stage parks its message here and halts the build.
    pub error: Option<String>,
    /// Set once the last stage finishes; entering `Running` waits for it.
    pub done: Option<Timer>,
}

impl Default for LoadingProgress {
    fn default() -> Self {
        Self {
            next: 0,
            percent: 0.0,
            message: "Loading...".into(),
            error: None,
            done: None,
        }
    }
}

#[derive(Component)]
struct LoadingScreen;

#[derive(Component)]
struct LoadingText;

#[derive(Component)]
struct LoadingBar;

pub struct LoadingPlugin;

impl Plugin for LoadingPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<AppState>()
            .init_resource::<LoadingProgress>()
            .add_systems(OnEnter(AppState::Loading), spawn_loading_ui)
            .add_systems(
                Update,
                (drive_loading, update_loading_ui)
                    .chain()
                    .run_if(in_state(AppState::Loading)),
            )
            .add_systems(OnEnter(AppState::Running), teardown_loading_ui);
    }
}

/// Runs the next pending build stage, or ticks down the ready dwell once
/// everything is built.
#[allow(clippy::too_many_arguments)]
fn drive_loading(
    mut commands: Commands,
    time: Res<Time>,
    mut progress: ResMut<LoadingProgress>,
    mut next_state: ResMut<NextState<AppState>>,
    config: Res<SceneConfig>,
    mut settings: ResMut<TerrainSettings>,
    mut rng: ResMut<GenRng>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if progress.error.is_some() {
        return;
    }
    if let Some(timer) = progress.done.as_mut() {
        if timer.tick(time.delta()).finished() {
            next_state.set(AppState::Running);
        }
        return;
    }
    let Some(&(stage, percent, message)) = BUILD_PLAN.get(progress.next) else {
        return;
    };

    let result = match stage {
        BuildStage::Scene => prepare_scene(&config, &mut settings),
        BuildStage::Terrain => {
            terrain::build_terrain(&mut commands, &mut meshes, &mut materials, &settings)
        }
        BuildStage::Forest => {
            let band = settings.forest_scatter_band();
            let plan = forest::plan_forest(rng.rng_mut(), &settings.curve, &config.forest, band);
            let candidates = config.forest.trees + config.forest.grass + config.forest.bushes;
            debug!("forest plan kept {} of {candidates} candidates", plan.len());
            forest::spawn_forest(&mut commands, &mut meshes, &mut materials, &plan);
            Ok(())
        }
        BuildStage::Desert => {
            let band = settings.desert_scatter_band();
            let plan = desert::plan_desert(rng.rng_mut(), &settings.curve, &config.desert, band);
            let candidates = config.desert.scatter + config.desert.tumbleweeds;
            debug!("desert plan kept {} of {candidates} candidates", plan.len());
            desert::spawn_desert(&mut commands, &mut meshes, &mut materials, &plan);
            Ok(())
        }
        BuildStage::Chaser => {
            hedgehog::spawn(&mut commands, &mut meshes, &mut materials);
            Ok(())
        }
        BuildStage::Leader => {
            roadrunner::spawn(&mut commands, &mut meshes, &mut materials);
            Ok(())
        }
        BuildStage::Effects => effects::build_effects(&mut commands, &mut meshes, &mut materials),
        BuildStage::Lighting => {
            effects::build_lighting(&mut commands);
            Ok(())
        }
        BuildStage::Finish => {
            progress.done = Some(Timer::from_seconds(READY_DWELL_SECS, TimerMode::Once));
            Ok(())
        }
    };

    match result {
        Ok(()) => {
            info!("build stage {stage:?} done, {percent}%");
            progress.percent = percent;
            progress.message = message.to_string();
            progress.next += 1;
        }
        Err(error) => {
            error!("scene build failed during {stage:?}: {error}");
            progress.error = Some(error.to_string());
        }
    }
}

/// Folds the configured road length into the terrain settings and checks
/// both before anything gets built.
fn prepare_scene(config: &SceneConfig, settings: &mut TerrainSettings) -> Result<(), BuildError> {
    config.validate()?;
    settings.road_length = config.road_length;
    settings.validate()
}

fn spawn_loading_ui(mut commands: Commands) {
    commands
        .spawn((
            Name::new("Loading screen"),
            LoadingScreen,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                row_gap: Val::Px(18.0),
                ..default()
            },
            BackgroundColor(Color::srgb_u8(0x10, 0x10, 0x18)),
        ))
        .with_children(|screen| {
            screen.spawn((
                Text::new("ROAD CHASE"),
                TextFont {
                    font_size: 48.0,
                    ..default()
                },
                TextColor(Color::srgb_u8(0xff, 0xdd, 0x00)),
            ));
            screen.spawn((
                LoadingText,
                Text::new("Loading..."),
                TextFont {
                    font_size: 22.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
            screen
                .spawn((
                    Node {
                        width: Val::Px(320.0),
                        height: Val::Px(10.0),
                        ..default()
                    },
                    BackgroundColor(Color::srgb_u8(0x33, 0x33, 0x3f)),
                ))
                .with_children(|outer| {
                    outer.spawn((
                        LoadingBar,
                        Node {
                            width: Val::Percent(0.0),
                            height: Val::Percent(100.0),
                            ..default()
                        },
                        BackgroundColor(Color::srgb_u8(0xff, 0xdd, 0x00)),
                    ));
                });
        });
}

fn update_loading_ui(
    progress: Res<LoadingProgress>,
    mut texts: Query<(&mut Text, &mut TextColor), With<LoadingText>>,
    mut bars: Query<&mut Node, With<LoadingBar>>,
) {
    if !progress.is_changed() {
        return;
    }
    for (mut text, mut color) in &mut texts {
        if let Some(error) = &progress.error {
            text.0 = format!("Error: {error}");
            color.0 = Color::srgb_u8(0xff, 0x45, 0x45);
        } else {
            text.0.clone_from(&progress.message);
        }
    }
    for mut node in &mut bars {
        node.width = Val::Percent(progress.percent);
    }
}

fn teardown_loading_ui(mut commands: Commands, screens: Query<Entity, With<LoadingScreen>>) {
    for entity in &screens {
        commands.entity(entity).despawn_recursive();
    }
}
