//! Scene dressing that is not terrain or characters: the sky dome and
//! sun, scene lighting, and short-lived burst particles.

use bevy::pbr::{CascadeShadowConfigBuilder, DirectionalLightShadowMap, NotShadowCaster};
use bevy::prelude::*;
use bevy::render::render_resource::Face;

use crate::core::errors::BuildError;
use crate::core::rng::GenRng;
use crate::management::AppState;
use crate::materials::{unlit, unlit_translucent};
use crate::meshes;
use crate::systems::chase::ChasePhase;

pub mod banner_bird;

/// Request for a one-shot particle burst.
#[derive(Event)]
pub struct SpawnBurst {
    pub position: Vec3,
    pub color: Color,
    pub count: u32,
}

/// A single burst particle. `life` counts down in seconds and doubles
/// as the alpha of the shared burst material.
#[derive(Component)]
pub struct Particle {
    pub velocity: Vec3,
    pub life: f32,
}

pub struct EffectsPlugin;

impl Plugin for EffectsPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<SpawnBurst>().add_systems(
            Update,
            (
                banner_bird::fly_banner_bird,
                banner_bird::wave_banner,
                spawn_bursts,
                integrate_particles,
            )
                .chain()
                .in_set(ChasePhase::Dress)
                .run_if(in_state(AppState::Running)),
        );
    }
}

/// Spawns the sky dome, the sun with its glow shell, and the banner
/// bird.
pub fn build_effects(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) -> Result<(), BuildError> {
    spawn_sky(commands, meshes, materials);
    spawn_sun(commands, meshes, materials);
    banner_bird::spawn(commands, meshes, materials)?;
    Ok(())
}

/// A vertex-painted gradient dome viewed from the inside.
fn spawn_sky(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    let mut dome = meshes::uv_sphere(500.0, 32, 32);
    meshes::paint_sky_gradient(
        &mut dome,
        Color::srgb_u8(0x89, 0xcf, 0xf0),
        Color::srgb_u8(0x00, 0x77, 0xff),
        33.0,
        0.6,
    );
    commands.spawn((
        Name::new("Sky dome"),
        Mesh3d(meshes.add(dome)),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::WHITE,
            unlit: true,
            cull_mode: Some(Face::Front),
            ..default()
        })),
        Transform::default(),
        NotShadowCaster,
    ));
}

fn spawn_sun(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    let position = Vec3::new(100.0, 150.0, -200.0);
    commands.spawn((
        Name::new("Sun"),
        Mesh3d(meshes.add(meshes::uv_sphere(20.0, 32, 32))),
        MeshMaterial3d(materials.add(unlit(Color::srgb_u8(0xff, 0xff, 0x00)))),
        Transform::from_translation(position),
        NotShadowCaster,
    ));
    commands.spawn((
        Name::new("Sun glow"),
        Mesh3d(meshes.add(meshes::uv_sphere(25.0, 32, 32))),
        MeshMaterial3d(materials.add(unlit_translucent(Color::srgb_u8(0xff, 0xaa, 0x00), 0.3))),
        Transform::from_translation(position),
        NotShadowCaster,
    ));
}

/// Warm-tinted ambient fill plus a shadow-casting directional sun. The
/// ambient tint leans green so the fill reads as bounced ground light.
pub fn build_lighting(commands: &mut Commands) {
    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.75, 0.85, 0.78),
        brightness: 300.0,
    });
    commands.insert_resource(DirectionalLightShadowMap { size: 2048 });
    commands.spawn((
        Name::new("Sun light"),
        DirectionalLight {
            illuminance: 30_000.0,
            shadows_enabled: true,
            ..default()
        },
        CascadeShadowConfigBuilder {
            first_cascade_far_bound: 30.0,
            maximum_distance: 250.0,
            ..default()
        }
        .build(),
        Transform::from_xyz(100.0, 150.0, -200.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

/// Turns each burst request into `count` particles sharing one fading
/// material.
fn spawn_bursts(
    mut commands: Commands,
    mut events: EventReader<SpawnBurst>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut rng: ResMut<GenRng>,
) {
    use rand::Rng;

    for burst in events.read() {
        let mesh = meshes.add(meshes::uv_sphere(0.05, 8, 8));
        let material = materials.add(unlit_translucent(burst.color, 1.0));
        for _ in 0..burst.count {
            let r = rng.rng_mut();
            let velocity = Vec3::new(
                (r.gen::<f32>() - 0.5) * 0.2,
                r.gen::<f32>() * 0.3,
                (r.gen::<f32>() - 0.5) * 0.2,
            );
            commands.spawn((
                Particle {
                    velocity,
                    life: 1.0,
                },
                Mesh3d(mesh.clone()),
                MeshMaterial3d(material.clone()),
                Transform::from_translation(burst.position),
                NotShadowCaster,
            ));
        }
    }
}

/// Ballistic step with light gravity; alpha tracks remaining life and
/// spent particles are removed.
fn integrate_particles(
    mut commands: Commands,
    time: Res<Time>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut particles: Query<(
        Entity,
        &mut Particle,
        &mut Transform,
        &MeshMaterial3d<StandardMaterial>,
    )>,
) {
    let dt = time.delta_secs();
    for (entity, mut particle, mut transform, material) in &mut particles {
        let step = particle.velocity * dt;
        transform.translation += step;
        particle.velocity.y -= 0.5 * dt;
        particle.life -= dt;
        if particle.life <= 0.0 {
            commands.entity(entity).despawn();
            continue;
        }
        if let Some(material) = materials.get_mut(&material.0) {
            material.base_color = material.base_color.with_alpha(particle.life);
        }
    }
}
