//! The roadrunner: elongated purple body, long yellow legs, a crest and
//! a fan of emissive tail feathers, running ahead of the hedgehog.

use bevy::pbr::NotShadowCaster;
use bevy::prelude::*;
use std::f32::consts::{FRAC_PI_2, PI};

use crate::characters::animation::{Bob, GaitDriver, GaitPhase, JointSwing, SwingAxis};
use crate::characters::{DustPuff, Leader};
use crate::materials::{glowing, tinted, unlit, unlit_translucent};
use crate::meshes;

const GAIT_RATE: f32 = 4.0;
const STRIDE_FREQUENCY: f32 = 18.0;
const WING_FREQUENCY: f32 = 15.0;
const TAIL_FREQUENCY: f32 = 10.0;
const LEG_SWING: f32 = 0.7;
const WING_FLAP: f32 = 0.6;
const LEAN: f32 = -0.2;

pub const DUST_LENGTH: usize = 20;

#[derive(Component)]
pub struct Roadrunner;

/// Spawns the rig plus its pooled dust-puff entities, returning the rig
/// root.
pub fn spawn(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) -> Entity {
    let body_purple = materials.add(tinted(Color::srgb_u8(0x6a, 0x4c, 0x93), 0.3, 0.5));
    let belly_lilac = materials.add(tinted(Color::srgb_u8(0xd8, 0xc8, 0xe6), 0.2, 0.6));
    let head_purple = materials.add(tinted(Color::srgb_u8(0x5a, 0x3d, 0x7a), 0.2, 0.5));
    let wing_purple = materials.add(tinted(Color::srgb_u8(0x5a, 0x3d, 0x7a), 0.3, 0.4));
    let crest_purple = materials.add(tinted(Color::srgb_u8(0x4a, 0x2c, 0x6a), 0.3, 0.4));
    let beak_yellow = materials.add(tinted(Color::srgb_u8(0xff, 0xcc, 0x00), 0.4, 0.4));
    let leg_yellow = materials.add(tinted(Color::srgb_u8(0xff, 0xcc, 0x00), 0.3, 0.5));
    let claw_dark = materials.add(tinted(Color::srgb_u8(0x33, 0x33, 0x33), 0.5, 0.4));
    let eye_white = materials.add(tinted(Color::WHITE, 0.7, 0.2));
    let pupil_black = materials.add(tinted(Color::BLACK, 0.9, 0.1));
    let highlight = materials.add(unlit(Color::WHITE));

    let root = commands
        .spawn((
            Name::new("Roadrunner"),
            Roadrunner,
            Leader,
            GaitPhase::default(),
            GaitDriver {
                rate: GAIT_RATE,
                speed: 1.0,
            },
            Transform::from_xyz(0.0, 1.0, -5.0)
                .with_rotation(Quat::from_euler(EulerRot::XYZ, LEAN, PI, 0.0)),
            Visibility::default(),
        ))
        .id();

    commands.entity(root).with_children(|rig| {
        // body, belly, neck, head
        rig.spawn((
            Mesh3d(meshes.add(meshes::uv_sphere(0.35, 24, 12))),
            MeshMaterial3d(body_purple.clone()),
            Transform::from_xyz(0.0, 1.0, -0.2).with_scale(Vec3::new(1.5, 1.0, 1.0)),
            Bob {
                rig: root,
                frequency: STRIDE_FREQUENCY,
                amplitude: 0.12,
                base_height: 1.0,
            },
        ));
        rig.spawn((
            Mesh3d(meshes.add(meshes::uv_sphere(0.32, 24, 12))),
            MeshMaterial3d(belly_lilac.clone()),
            Transform::from_xyz(0.0, 0.95, 0.1).with_scale(Vec3::new(1.2, 1.1, 0.9)),
        ));
        rig.spawn((
            Mesh3d(meshes.add(meshes::frustum(0.15, 0.18, 0.3, 16))),
            MeshMaterial3d(body_purple.clone()),
            Transform::from_xyz(0.0, 1.25, 0.3).with_rotation(Quat::from_rotation_x(0.3)),
            Bob {
                rig: root,
                frequency: STRIDE_FREQUENCY,
                amplitude: 0.1,
                base_height: 1.25,
            },
        ));
        rig.spawn((
            Mesh3d(meshes.add(meshes::uv_sphere(0.28, 24, 12))),
            MeshMaterial3d(head_purple.clone()),
            Transform::from_xyz(0.0, 1.45, 0.5),
            Bob {
                rig: root,
                frequency: STRIDE_FREQUENCY,
                amplitude: 0.08,
                base_height: 1.45,
            },
        ));

        // crest fan
        let crest_mesh = meshes.add(meshes::cone(0.12, 0.45, 12));
        let crest = [
            (-0.15f32, 1.7f32, 0.45f32, 0.3f32),
            (-0.08, 1.75, 0.48, 0.15),
            (0.0, 1.78, 0.5, 0.0),
            (0.08, 1.75, 0.48, -0.15),
            (0.15, 1.7, 0.45, -0.3),
        ];
        for (x, y, z, rz) in crest {
            rig.spawn((
                Mesh3d(crest_mesh.clone()),
                MeshMaterial3d(crest_purple.clone()),
                Transform::from_xyz(x, y, z)
                    .with_rotation(Quat::from_euler(EulerRot::XYZ, -0.2, 0.0, rz)),
            ));
        }

        // beak, two stacked cones pointing forward
        rig.spawn((
            Mesh3d(meshes.add(meshes::cone(0.08, 0.5, 12))),
            MeshMaterial3d(beak_yellow.clone()),
            Transform::from_xyz(0.0, 1.45, 0.75).with_rotation(Quat::from_rotation_x(FRAC_PI_2)),
        ));
        rig.spawn((
            Mesh3d(meshes.add(meshes::cone(0.06, 0.15, 12))),
            MeshMaterial3d(beak_yellow.clone()),
            Transform::from_xyz(0.0, 1.5, 0.9).with_rotation(Quat::from_rotation_x(FRAC_PI_2)),
        ));

        // eyes
        let eye_mesh = meshes.add(meshes::uv_sphere(0.14, 16, 8));
        let pupil_mesh = meshes.add(meshes::uv_sphere(0.08, 12, 6));
        for side in [-1.0f32, 1.0] {
            rig.spawn((
                Mesh3d(eye_mesh.clone()),
                MeshMaterial3d(eye_white.clone()),
                Transform::from_xyz(side * 0.12, 1.55, 0.6)
                    .with_scale(Vec3::new(1.0, 1.2, 0.8)),
            ));
            rig.spawn((
                Mesh3d(pupil_mesh.clone()),
                MeshMaterial3d(pupil_black.clone()),
                Transform::from_xyz(side * 0.12, 1.55, 0.72),
            ));
        }
        let glint_mesh = meshes.add(meshes::uv_sphere(0.04, 12, 6));
        for x in [-0.1f32, 0.14] {
            rig.spawn((
                Mesh3d(glint_mesh.clone()),
                MeshMaterial3d(highlight.clone()),
                Transform::from_xyz(x, 1.6, 0.75),
                NotShadowCaster,
            ));
        }

        // nine tail feathers in blues and purples, waving independently
        let feather_mesh = meshes.add(meshes::cone(0.08, 0.7, 12));
        let palette = [0x0066ffu32, 0x00aaff, 0x6a4c93, 0x8855dd];
        let feather_materials: Vec<Handle<StandardMaterial>> = palette
            .iter()
            .map(|&hex| {
                let color = Color::srgb_u8((hex >> 16) as u8, (hex >> 8) as u8, hex as u8);
                materials.add(glowing(color, 0.4, 0.4, color.to_linear() * 0.15))
            })
            .collect();
        let tail = [
            (0.0f32, 1.1f32, -0.7f32, 0.0f32, 0usize),
            (-0.12, 1.15, -0.75, -0.2, 1),
            (0.12, 1.15, -0.75, 0.2, 1),
            (-0.22, 1.08, -0.8, -0.4, 2),
            (0.22, 1.08, -0.8, 0.4, 2),
            (-0.3, 1.0, -0.75, -0.6, 3),
            (0.3, 1.0, -0.75, 0.6, 3),
            (-0.18, 1.2, -0.7, -0.3, 1),
            (0.18, 1.2, -0.7, 0.3, 1),
        ];
        for (index, (x, y, z, ry, color)) in tail.into_iter().enumerate() {
            rig.spawn((
                Mesh3d(feather_mesh.clone()),
                MeshMaterial3d(feather_materials[color].clone()),
                Transform::from_xyz(x, y, z),
                JointSwing {
                    rig: root,
                    axis: SwingAxis::Z,
                    frequency: TAIL_FREQUENCY,
                    amplitude: 0.15,
                    phase: index as f32 * 0.4,
                    clamp_positive: false,
                    rest: Quat::from_euler(EulerRot::XYZ, FRAC_PI_2, ry, 0.0),
                },
            ));
        }

        // wings: a shoulder knob and four flapping feather slats per side
        let wing_base_mesh = meshes.add(meshes::uv_sphere(0.15, 16, 8));
        let wing_feather_mesh = meshes.add(Cuboid::new(0.08, 0.6, 0.04));
        for side in [-1.0f32, 1.0] {
            rig.spawn((
                Mesh3d(wing_base_mesh.clone()),
                MeshMaterial3d(wing_purple.clone()),
                Transform::from_xyz(side * 0.4, 1.0, 0.0),
            ));
            for i in 0..4 {
                let droop = 0.3 + i as f32 * 0.1;
                rig.spawn((
                    Mesh3d(wing_feather_mesh.clone()),
                    MeshMaterial3d(wing_purple.clone()),
                    Transform::from_xyz(
                        side * (0.45 + i as f32 * 0.08),
                        1.0 - i as f32 * 0.1,
                        -0.05 * i as f32,
                    ),
                    JointSwing {
                        rig: root,
                        axis: SwingAxis::Z,
                        frequency: WING_FREQUENCY,
                        amplitude: side * WING_FLAP,
                        phase: 0.0,
                        clamp_positive: false,
                        rest: Quat::from_rotation_z(side * droop),
                    },
                ));
            }
        }

        // stilt legs
        let thigh_mesh = meshes.add(meshes::frustum(0.06, 0.05, 0.5, 12));
        let shin_mesh = meshes.add(meshes::frustum(0.04, 0.04, 0.6, 12));
        for side in [-1.0f32, 1.0] {
            rig.spawn((
                Mesh3d(thigh_mesh.clone()),
                MeshMaterial3d(leg_yellow.clone()),
                Transform::from_xyz(side * 0.15, 0.5, 0.0),
                JointSwing {
                    rig: root,
                    axis: SwingAxis::X,
                    frequency: STRIDE_FREQUENCY,
                    amplitude: -side * LEG_SWING,
                    phase: 0.0,
                    clamp_positive: false,
                    rest: Quat::IDENTITY,
                },
            ));
            rig.spawn((
                Mesh3d(shin_mesh.clone()),
                MeshMaterial3d(leg_yellow.clone()),
                Transform::from_xyz(side * 0.15, 0.05, 0.0),
                JointSwing {
                    rig: root,
                    axis: SwingAxis::X,
                    frequency: STRIDE_FREQUENCY,
                    amplitude: -side * LEG_SWING * 0.6,
                    phase: 0.0,
                    clamp_positive: true,
                    rest: Quat::IDENTITY,
                },
            ));
        }

        // three splayed toes and claws per foot
        let toe_mesh = meshes.add(meshes::frustum(0.03, 0.015, 0.25, 12));
        let claw_mesh = meshes.add(meshes::cone(0.02, 0.08, 8));
        for side in [-1.0f32, 1.0] {
            for (z, angle) in [(0.15f32, 0.5f32), (0.25, 0.0), (0.05, -0.5)] {
                rig.spawn((
                    Mesh3d(toe_mesh.clone()),
                    MeshMaterial3d(leg_yellow.clone()),
                    Transform::from_xyz(side * 0.15, -0.15, z)
                        .with_rotation(Quat::from_euler(EulerRot::XYZ, PI / 3.0, angle, 0.0)),
                ));
                rig.spawn((
                    Mesh3d(claw_mesh.clone()),
                    MeshMaterial3d(claw_dark.clone()),
                    Transform::from_xyz(side * 0.15, -0.25, z + 0.15)
                        .with_rotation(Quat::from_euler(EulerRot::XYZ, PI / 2.5, angle, 0.0)),
                ));
            }
        }
    });

    // Pooled dust cloud kicked up along the ground behind the bird.
    let puff_mesh = meshes.add(meshes::uv_sphere(0.08, 12, 12));
    for index in 0..DUST_LENGTH {
        let material = materials.add(unlit_translucent(
            Color::srgb_u8(0xcc, 0xaa, 0x88),
            0.6 - index as f32 * 0.025,
        ));
        commands.spawn((
            DustPuff { index },
            Mesh3d(puff_mesh.clone()),
            MeshMaterial3d(material),
            Transform::default(),
            Visibility::Hidden,
            NotShadowCaster,
        ));
    }

    root
}
