//! A googly-eyed yellow bird that flies across the scene towing a
//! rippling cloth banner, then leaves with a small burst.

use bevy::pbr::NotShadowCaster;
use bevy::prelude::*;
use bevy::render::mesh::VertexAttributeValues;
use std::f32::consts::{FRAC_PI_2, PI};

use crate::characters::animation::{GaitDriver, GaitPhase, JointSwing, SwingAxis};
use crate::characters::Chaser;
use crate::core::errors::BuildError;
use crate::effects::SpawnBurst;
use crate::materials::tinted;
use crate::meshes;

const FLY_SPEED: f32 = 30.0;
const START_OFFSET: f32 = 60.0;
const LIFETIME: f32 = 10.0;
const FLAP_FREQUENCY: f32 = 15.0;
const FLAP_ANGLE: f32 = 0.6;

const BANNER_WIDTH: f32 = 20.0;
const BANNER_HEIGHT: f32 = 5.0;
const BANNER_COLUMNS: usize = 8;
const BANNER_ROWS: usize = 40;

#[derive(Component)]
pub struct BannerBird;

/// Cloth mesh state: the rig whose clock drives the wave, and the rest
/// position of every vertex.
#[derive(Component)]
pub struct BannerCloth {
    pub rig: Entity,
    pub rest: Vec<Vec3>,
}

/// Builds the bird and its banner off to the right of the road, facing
/// across it.
pub fn spawn(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) -> Result<Entity, BuildError> {
    let body_yellow = materials.add(tinted(Color::srgb_u8(0xff, 0xdd, 0x00), 0.2, 0.7));
    let wing_yellow = materials.add(tinted(Color::srgb_u8(0xff, 0xcc, 0x00), 0.2, 0.7));
    let tail_orange = materials.add(tinted(Color::srgb_u8(0xff, 0xaa, 0x00), 0.2, 0.7));
    let beak_orange = materials.add(tinted(Color::srgb_u8(0xff, 0x66, 0x00), 0.2, 0.7));
    let tongue_pink = materials.add(tinted(Color::srgb_u8(0xff, 0x33, 0x66), 0.2, 0.7));
    let eye_white = materials.add(tinted(Color::WHITE, 0.1, 0.5));
    let pupil_black = materials.add(tinted(Color::BLACK, 0.5, 0.4));

    // Cloth grid lies in the local XY plane, long axis on X.
    let mut cloth_mesh = meshes::displaced_grid(
        BANNER_HEIGHT,
        BANNER_WIDTH,
        BANNER_COLUMNS,
        BANNER_ROWS,
        |across, along| Vec3::new(along - BANNER_WIDTH / 2.0, across, 0.0),
    )?;
    let rest: Vec<Vec3> = cloth_mesh
        .attribute(Mesh::ATTRIBUTE_POSITION)
        .and_then(VertexAttributeValues::as_float3)
        .map(|positions| positions.iter().map(|p| Vec3::from_array(*p)).collect())
        .ok_or_else(|| BuildError::MeshConstruction("banner cloth lost its positions".into()))?;
    // White cloth with a red stripe across the trailing edge.
    let colors: Vec<[f32; 4]> = rest
        .iter()
        .map(|p| {
            if p.x < -BANNER_WIDTH / 2.0 + 2.0 {
                [0.9, 0.1, 0.15, 1.0]
            } else {
                [1.0, 1.0, 1.0, 1.0]
            }
        })
        .collect();
    cloth_mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, colors);
    let cloth_material = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        perceptual_roughness: 0.9,
        double_sided: true,
        cull_mode: None,
        ..default()
    });

    let root = commands
        .spawn((
            Name::new("Banner bird"),
            BannerBird,
            GaitPhase::default(),
            GaitDriver {
                rate: 1.0,
                speed: 1.0,
            },
            Transform::from_xyz(150.0, 40.0, 0.0).with_rotation(Quat::from_rotation_y(PI)),
            Visibility::default(),
        ))
        .id();

    commands.entity(root).with_children(|bird| {
        bird.spawn((
            Mesh3d(meshes.add(meshes::uv_sphere(2.0, 16, 16))),
            MeshMaterial3d(body_yellow.clone()),
            Transform::default().with_scale(Vec3::new(1.0, 0.8, 1.2)),
        ));
        bird.spawn((
            Mesh3d(meshes.add(meshes::uv_sphere(1.5, 16, 16))),
            MeshMaterial3d(body_yellow.clone()),
            Transform::from_xyz(0.0, 1.5, 1.0),
        ));
        bird.spawn((
            Mesh3d(meshes.add(meshes::cone(0.4, 1.2, 8))),
            MeshMaterial3d(beak_orange.clone()),
            Transform::from_xyz(0.0, 1.3, 2.2).with_rotation(Quat::from_rotation_x(FRAC_PI_2)),
        ));

        // Googly eyes, pupils deliberately mismatched.
        let eye_mesh = meshes.add(meshes::uv_sphere(0.4, 16, 16));
        for side in [-1.0f32, 1.0] {
            bird.spawn((
                Mesh3d(eye_mesh.clone()),
                MeshMaterial3d(eye_white.clone()),
                Transform::from_xyz(side * 0.5, 1.8, 1.8),
            ));
        }
        let pupil_mesh = meshes.add(meshes::uv_sphere(0.2, 16, 16));
        for (x, y) in [(-0.6f32, 1.7f32), (0.6, 1.9)] {
            bird.spawn((
                Mesh3d(pupil_mesh.clone()),
                MeshMaterial3d(pupil_black.clone()),
                Transform::from_xyz(x, y, 2.1),
            ));
        }
        bird.spawn((
            Mesh3d(meshes.add(Cuboid::new(0.3, 0.15, 0.8))),
            MeshMaterial3d(tongue_pink.clone()),
            Transform::from_xyz(0.0, 1.0, 2.5).with_rotation(Quat::from_rotation_x(0.3)),
        ));

        // Wings hinge at the body; the slab hangs outward from the pivot.
        let wing_mesh = meshes.add(Cuboid::new(2.0, 0.2, 1.5));
        for side in [-1.0f32, 1.0] {
            let rest = if side < 0.0 {
                Quat::IDENTITY
            } else {
                Quat::from_rotation_y(PI)
            };
            bird.spawn((
                Transform::from_xyz(side * 1.5, 0.0, 0.0),
                Visibility::default(),
                JointSwing {
                    rig: root,
                    axis: SwingAxis::Z,
                    frequency: FLAP_FREQUENCY,
                    amplitude: -side * FLAP_ANGLE,
                    phase: 0.0,
                    clamp_positive: false,
                    rest,
                },
            ))
            .with_children(|pivot| {
                pivot.spawn((
                    Mesh3d(wing_mesh.clone()),
                    MeshMaterial3d(wing_yellow.clone()),
                    Transform::from_xyz(1.0, 0.0, 0.0),
                ));
            });
        }

        bird.spawn((
            Mesh3d(meshes.add(meshes::cone(0.8, 2.0, 8))),
            MeshMaterial3d(tail_orange.clone()),
            Transform::from_xyz(0.0, 0.0, -2.0).with_rotation(Quat::from_rotation_x(FRAC_PI_2)),
        ));

        bird.spawn((
            Name::new("Banner cloth"),
            BannerCloth { rig: root, rest },
            Mesh3d(meshes.add(cloth_mesh)),
            MeshMaterial3d(cloth_material),
            Transform::from_xyz(-12.0, 0.0, 0.0),
            NotShadowCaster,
        ));
    });

    Ok(root)
}

/// Sweeps the bird right to left across the chaser's position, bobbing
/// as it goes. Past its lifetime or the far edge it despawns with a
/// farewell burst.
pub fn fly_banner_bird(
    mut commands: Commands,
    mut bursts: EventWriter<SpawnBurst>,
    chasers: Query<&Transform, With<Chaser>>,
    mut birds: Query<(Entity, &GaitPhase, &mut Transform), (With<BannerBird>, Without<Chaser>)>,
) {
    let Ok(player) = chasers.get_single() else {
        return;
    };
    for (entity, phase, mut transform) in &mut birds {
        let t = phase.time;
        let offset = START_OFFSET - t * FLY_SPEED;
        if t > LIFETIME || offset < -START_OFFSET {
            bursts.send(SpawnBurst {
                position: transform.translation,
                color: Color::srgb_u8(0xff, 0xdd, 0x00),
                count: 24,
            });
            commands.entity(entity).despawn_recursive();
            continue;
        }
        transform.translation = Vec3::new(
            player.translation.x + offset,
            player.translation.y + 15.0 + (t * 3.0).sin() * 0.5,
            player.translation.z - 5.0,
        );
    }
}

/// Re-displaces the cloth vertices each frame with three superimposed
/// travelling waves that grow toward the free end, then refreshes the
/// normals.
pub fn wave_banner(
    mut meshes: ResMut<Assets<Mesh>>,
    birds: Query<&GaitPhase>,
    cloths: Query<(&BannerCloth, &Mesh3d)>,
) {
    for (cloth, mesh_handle) in &cloths {
        let Ok(phase) = birds.get(cloth.rig) else {
            continue;
        };
        let Some(mesh) = meshes.get_mut(&mesh_handle.0) else {
            continue;
        };
        let t = phase.time;
        if let Some(VertexAttributeValues::Float32x3(positions)) =
            mesh.attribute_mut(Mesh::ATTRIBUTE_POSITION)
        {
            for (position, rest) in positions.iter_mut().zip(&cloth.rest) {
                let wave_x = (rest.x + BANNER_WIDTH / 2.0) / BANNER_WIDTH;
                let flutter = ((t * 4.0 + wave_x * PI * 3.0).sin() * 0.3
                    + (t * 6.0 + wave_x * PI * 5.0).sin() * 0.15)
                    * wave_x
                    * wave_x;
                let whirl = (t * 8.0 + wave_x * PI * 4.0).cos() * 0.1 * wave_x * 2.0;
                position[1] = rest.y + flutter;
                position[2] = rest.z + whirl;
            }
        }
        mesh.compute_smooth_normals();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bird_tracks_the_chaser() {
        let mut app = App::new();
        app.add_event::<SpawnBurst>();
        app.add_systems(Update, fly_banner_bird);
        app.world_mut()
            .spawn((Chaser, Transform::from_xyz(2.0, 1.0, -30.0)));
        let bird = app
            .world_mut()
            .spawn((
                BannerBird,
                GaitPhase { time: 1.0 },
                Transform::from_xyz(150.0, 40.0, 0.0),
            ))
            .id();

        app.update();

        let translation = app.world().get::<Transform>(bird).unwrap().translation;
        assert_eq!(translation.x, 2.0 + 30.0);
        assert!((translation.y - (16.0 + (3.0f32).sin() * 0.5)).abs() < 1e-6);
        assert_eq!(translation.z, -35.0);
    }

    #[test]
    fn bird_departs_with_a_burst() {
        let mut app = App::new();
        app.add_event::<SpawnBurst>();
        app.add_systems(Update, fly_banner_bird);
        app.world_mut()
            .spawn((Chaser, Transform::from_xyz(0.0, 1.0, 0.0)));
        let bird = app
            .world_mut()
            .spawn((
                BannerBird,
                GaitPhase { time: 4.1 },
                Transform::from_xyz(-100.0, 40.0, 0.0),
            ))
            .id();

        app.update();

        assert!(!app.world().entities().contains(bird));
        let events = app.world().resource::<Events<SpawnBurst>>();
        assert_eq!(events.len(), 1);
    }
}
