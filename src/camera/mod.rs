//! Follow camera with four toggleable vantage presets and the biome fog
//! cue.

use bevy::pbr::{DistanceFog, FogFalloff};
use bevy::prelude::*;

use crate::characters::Chaser;
use crate::management::AppState;
use crate::systems::chase::{ChasePhase, ChaseProgress};

/// Chase distance beyond which the haze warms to desert colors.
const FOG_ZONE_BOUNDARY: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraMode {
    #[default]
    Behind,
    Side,
    Front,
    Wide,
}

impl CameraMode {
    pub fn next(self) -> Self {
        match self {
            CameraMode::Behind => CameraMode::Side,
            CameraMode::Side => CameraMode::Front,
            CameraMode::Front => CameraMode::Wide,
            CameraMode::Wide => CameraMode::Behind,
        }
    }

    /// Camera position relative to the followed runner.
    pub fn offset(self) -> Vec3 {
        match self {
            CameraMode::Behind => Vec3::new(0.0, 8.0, 15.0),
            CameraMode::Side => Vec3::new(12.0, 6.0, 5.0),
            CameraMode::Front => Vec3::new(0.0, 5.0, -15.0),
            CameraMode::Wide => Vec3::new(25.0, 8.0, -5.0),
        }
    }

    /// Point the camera aims at, relative to the followed runner. The
    /// wide preset frames the gap between the two runners.
    pub fn look_offset(self) -> Vec3 {
        match self {
            CameraMode::Behind => Vec3::new(0.0, 2.0, -10.0),
            CameraMode::Side => Vec3::new(-5.0, 2.0, -5.0),
            CameraMode::Front => Vec3::new(0.0, 2.0, 10.0),
            CameraMode::Wide => Vec3::new(0.0, 2.0, -5.0),
        }
    }
}

#[derive(Component, Default)]
pub struct FollowCamera {
    pub mode: CameraMode,
}

/// Haze color for the biome the chase has reached.
pub fn fog_color_for(distance: f32) -> Color {
    if distance > FOG_ZONE_BOUNDARY {
        Color::srgb_u8(0xda, 0xa5, 0x88)
    } else {
        Color::srgb_u8(0x89, 0xcf, 0xf0)
    }
}

pub struct CameraRigPlugin;

impl Plugin for CameraRigPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppState::Loading), spawn_camera)
            .add_systems(
                Update,
                (toggle_camera_mode, follow_chaser, update_fog_color)
                    .chain()
                    .in_set(ChasePhase::Dress)
                    .run_if(in_state(AppState::Running)),
            );
    }
}

fn spawn_camera(mut commands: Commands) {
    let mode = CameraMode::default();
    commands.spawn((
        Name::new("Follow camera"),
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: 75f32.to_radians(),
            near: 0.1,
            far: 1000.0,
            ..default()
        }),
        Transform::from_translation(mode.offset()).looking_at(mode.look_offset(), Vec3::Y),
        DistanceFog {
            color: fog_color_for(0.0),
            falloff: FogFalloff::Linear {
                start: 50.0,
                end: 200.0,
            },
            ..default()
        },
        FollowCamera::default(),
    ));
}

fn toggle_camera_mode(keys: Res<ButtonInput<KeyCode>>, mut cameras: Query<&mut FollowCamera>) {
    if !keys.just_pressed(KeyCode::Space) {
        return;
    }
    for mut camera in &mut cameras {
        camera.mode = camera.mode.next();
        debug!("camera mode now {:?}", camera.mode);
    }
}

/// Eases the camera toward the active preset's offset from the chaser
/// and aims it at the preset's look point. The blend is exponential in
/// dt, matching a 0.1 per-frame lerp at 60 Hz.
fn follow_chaser(
    time: Res<Time>,
    chasers: Query<&Transform, With<Chaser>>,
    mut cameras: Query<(&FollowCamera, &mut Transform), Without<Chaser>>,
) {
    let Ok(target) = chasers.get_single() else {
        return;
    };
    let blend = 1.0 - 0.9f32.powf(60.0 * time.delta_secs());
    for (camera, mut transform) in &mut cameras {
        let desired = target.translation + camera.mode.offset();
        transform.translation = transform.translation.lerp(desired, blend);
        let look = target.translation + camera.mode.look_offset();
        transform.look_at(look, Vec3::Y);
    }
}

fn update_fog_color(
    progress: Res<ChaseProgress>,
    mut fogs: Query<&mut DistanceFog, With<FollowCamera>>,
) {
    for mut fog in &mut fogs {
        fog.color = fog_color_for(progress.distance);
    }
}
