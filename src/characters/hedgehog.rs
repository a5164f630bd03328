//! The blue hedgehog: a spiky biped built from spheres, lathed limbs,
//! and boxy sneakers, animated entirely by joint swings and bobs.

use bevy::pbr::NotShadowCaster;
use bevy::prelude::*;
use std::f32::consts::PI;

use crate::characters::animation::{Bob, GaitDriver, GaitPhase, JointSwing, SwingAxis};
use crate::characters::{Chaser, TrailBlob};
use crate::materials::{glowing, tinted, unlit, unlit_translucent};
use crate::meshes;

/// Gait multiplier relative to scene speed.
const GAIT_RATE: f32 = 3.0;
const STRIDE_FREQUENCY: f32 = 12.0;
const LEG_SWING: f32 = 0.6;
const ARM_SWING: f32 = 0.5;
const LEAN: f32 = -0.15;

pub const TRAIL_LENGTH: usize = 15;

#[derive(Component)]
pub struct Hedgehog;

/// Spawns the rig plus its pooled speed-trail entities, returning the
/// rig root. The root carries the gait clock; limbs reference it.
pub fn spawn(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) -> Entity {
    let body_blue = materials.add(StandardMaterial {
        base_color: Color::srgb_u8(0x00, 0x55, 0xdd),
        metallic: 0.2,
        perceptual_roughness: 0.6,
        emissive: Color::srgb_u8(0x00, 0x11, 0x44).to_linear() * 0.1,
        ..default()
    });
    let limb_blue = materials.add(tinted(
        Color::srgb_u8(0x00, 0x55, 0xdd),
        0.2,
        0.5,
    ));
    let spike_blue = materials.add(tinted(
        Color::srgb_u8(0x00, 0x44, 0xcc),
        0.3,
        0.4,
    ));
    let tan = materials.add(tinted(Color::srgb_u8(0xff, 0xcc, 0x99), 0.1, 0.8));
    let black_gloss = materials.add(tinted(Color::BLACK, 0.5, 0.3));
    let eye_white = materials.add(tinted(Color::WHITE, 0.7, 0.2));
    let iris_green = materials.add(glowing(
        Color::srgb(0.0, 1.0, 0.0),
        0.6,
        0.3,
        Color::srgb(0.0, 1.0, 0.0).to_linear() * 0.2,
    ));
    let pupil_black = materials.add(tinted(Color::BLACK, 0.9, 0.1));
    let highlight = materials.add(unlit(Color::WHITE));
    let glove_white = materials.add(tinted(Color::WHITE, 0.1, 0.7));
    let cuff_white = materials.add(tinted(
        Color::srgb_u8(0xee, 0xee, 0xee),
        0.2,
        0.6,
    ));
    let shoe_red = materials.add(tinted(Color::srgb_u8(0xdd, 0x00, 0x00), 0.5, 0.4));
    let stripe_white = materials.add(tinted(Color::WHITE, 0.3, 0.5));
    let buckle_gold = materials.add(tinted(
        Color::srgb_u8(0xff, 0xdd, 0x00),
        0.8,
        0.2,
    ));
    let sole_pale = materials.add(tinted(
        Color::srgb_u8(0xee, 0xee, 0xee),
        0.1,
        0.9,
    ));

    let root = commands
        .spawn((
            Name::new("Hedgehog"),
            Hedgehog,
            Chaser,
            GaitPhase::default(),
            GaitDriver {
                rate: GAIT_RATE,
                speed: 1.0,
            },
            Transform::from_xyz(0.0, 1.0, 5.0)
                .with_rotation(Quat::from_euler(EulerRot::XYZ, LEAN, PI, 0.0)),
            Visibility::default(),
        ))
        .id();

    commands.entity(root).with_children(|rig| {
        // torso and head
        rig.spawn((
            Mesh3d(meshes.add(meshes::uv_sphere(0.6, 32, 16))),
            MeshMaterial3d(body_blue.clone()),
            Transform::from_xyz(0.0, 0.8, 0.0),
            Bob {
                rig: root,
                frequency: STRIDE_FREQUENCY,
                amplitude: 0.08,
                base_height: 0.8,
            },
        ));
        rig.spawn((
            Mesh3d(meshes.add(meshes::uv_sphere(0.5, 24, 12))),
            MeshMaterial3d(tan.clone()),
            Transform::from_xyz(0.0, 0.8, 0.3).with_scale(Vec3::new(0.9, 1.0, 0.7)),
        ));
        rig.spawn((
            Mesh3d(meshes.add(meshes::uv_sphere(0.7, 32, 16))),
            MeshMaterial3d(limb_blue.clone()),
            Transform::from_xyz(0.0, 1.6, 0.2),
            Bob {
                rig: root,
                frequency: STRIDE_FREQUENCY,
                amplitude: 0.08,
                base_height: 1.6,
            },
        ));
        rig.spawn((
            Mesh3d(meshes.add(meshes::uv_sphere(0.3, 24, 12))),
            MeshMaterial3d(tan.clone()),
            Transform::from_xyz(0.0, 1.5, 0.7).with_scale(Vec3::new(1.2, 0.7, 0.9)),
        ));
        rig.spawn((
            Mesh3d(meshes.add(meshes::uv_sphere(0.08, 12, 6))),
            MeshMaterial3d(black_gloss.clone()),
            Transform::from_xyz(0.0, 1.55, 0.95),
        ));

        // eyes: white, iris, pupil, then an unlit glint
        let eye_mesh = meshes.add(meshes::uv_sphere(0.28, 24, 12));
        let iris_mesh = meshes.add(meshes::uv_sphere(0.18, 24, 12));
        let pupil_mesh = meshes.add(meshes::uv_sphere(0.1, 16, 8));
        for side in [-1.0f32, 1.0] {
            rig.spawn((
                Mesh3d(eye_mesh.clone()),
                MeshMaterial3d(eye_white.clone()),
                Transform::from_xyz(side * 0.22, 1.7, 0.55)
                    .with_scale(Vec3::new(1.0, 1.1, 0.8)),
            ));
            rig.spawn((
                Mesh3d(iris_mesh.clone()),
                MeshMaterial3d(iris_green.clone()),
                Transform::from_xyz(side * 0.22, 1.7, 0.7),
            ));
            rig.spawn((
                Mesh3d(pupil_mesh.clone()),
                MeshMaterial3d(pupil_black.clone()),
                Transform::from_xyz(side * 0.22, 1.7, 0.82),
            ));
        }
        let glint_mesh = meshes.add(meshes::uv_sphere(0.05, 12, 6));
        for x in [-0.18f32, 0.26] {
            rig.spawn((
                Mesh3d(glint_mesh.clone()),
                MeshMaterial3d(highlight.clone()),
                Transform::from_xyz(x, 1.75, 0.85),
                NotShadowCaster,
            ));
        }

        // seven quills fanning backward
        let spike_mesh = meshes.add(meshes::cone(0.22, 1.0, 12));
        let quills = [
            (0.0f32, 2.0f32, -0.4f32, 0.4f32, 0.0f32),
            (-0.25, 1.95, -0.5, 0.35, -0.4),
            (0.25, 1.95, -0.5, 0.35, 0.4),
            (-0.45, 1.8, -0.55, 0.3, -0.6),
            (0.45, 1.8, -0.55, 0.3, 0.6),
            (-0.6, 1.6, -0.5, 0.25, -0.8),
            (0.6, 1.6, -0.5, 0.25, 0.8),
        ];
        for (x, y, z, rx, ry) in quills {
            rig.spawn((
                Mesh3d(spike_mesh.clone()),
                MeshMaterial3d(spike_blue.clone()),
                Transform::from_xyz(x, y, z)
                    .with_rotation(Quat::from_euler(EulerRot::XYZ, PI * rx, ry, 0.0)),
            ));
        }

        let ear_mesh = meshes.add(meshes::cone(0.15, 0.4, 12));
        for side in [-1.0f32, 1.0] {
            rig.spawn((
                Mesh3d(ear_mesh.clone()),
                MeshMaterial3d(limb_blue.clone()),
                Transform::from_xyz(side * 0.5, 2.0, 0.0)
                    .with_rotation(Quat::from_rotation_z(side * 0.3)),
            ));
        }

        // arms: shoulder > upper arm > elbow > forearm > wrist > glove,
        // each segment hanging off the previous so the shoulder swing
        // carries the whole chain
        let shoulder_mesh = meshes.add(meshes::uv_sphere(0.16, 16, 8));
        let upper_arm_mesh = meshes.add(meshes::frustum(0.14, 0.12, 0.5, 16));
        let elbow_mesh = meshes.add(meshes::uv_sphere(0.12, 16, 8));
        let forearm_mesh = meshes.add(meshes::frustum(0.12, 0.11, 0.4, 16));
        let wrist_mesh = meshes.add(meshes::uv_sphere(0.11, 16, 8));
        let glove_mesh = meshes.add(meshes::uv_sphere(0.18, 16, 8));
        let cuff_mesh = meshes.add(meshes::frustum(0.19, 0.14, 0.12, 16));
        for side in [-1.0f32, 1.0] {
            rig.spawn((
                Mesh3d(shoulder_mesh.clone()),
                MeshMaterial3d(limb_blue.clone()),
                Transform::from_xyz(side * 0.6, 1.0, 0.0),
                JointSwing {
                    rig: root,
                    axis: SwingAxis::X,
                    frequency: STRIDE_FREQUENCY,
                    amplitude: side * ARM_SWING,
                    phase: 0.0,
                    clamp_positive: false,
                    rest: Quat::IDENTITY,
                },
            ))
            .with_children(|shoulder| {
                shoulder
                    .spawn((
                        Mesh3d(upper_arm_mesh.clone()),
                        MeshMaterial3d(limb_blue.clone()),
                        Transform::from_xyz(0.0, -0.25, 0.0),
                    ))
                    .with_children(|upper| {
                        upper
                            .spawn((
                                Mesh3d(elbow_mesh.clone()),
                                MeshMaterial3d(limb_blue.clone()),
                                Transform::from_xyz(0.0, -0.25, 0.0),
                                JointSwing {
                                    rig: root,
                                    axis: SwingAxis::X,
                                    frequency: STRIDE_FREQUENCY,
                                    amplitude: side * ARM_SWING * 0.3,
                                    phase: 0.0,
                                    clamp_positive: false,
                                    rest: Quat::IDENTITY,
                                },
                            ))
                            .with_children(|elbow| {
                                elbow
                                    .spawn((
                                        Mesh3d(forearm_mesh.clone()),
                                        MeshMaterial3d(limb_blue.clone()),
                                        Transform::from_xyz(0.0, -0.2, 0.0),
                                    ))
                                    .with_children(|forearm| {
                                        forearm
                                            .spawn((
                                                Mesh3d(wrist_mesh.clone()),
                                                MeshMaterial3d(limb_blue.clone()),
                                                Transform::from_xyz(0.0, -0.2, 0.0),
                                            ))
                                            .with_children(|wrist| {
                                                wrist
                                                    .spawn((
                                                        Mesh3d(glove_mesh.clone()),
                                                        MeshMaterial3d(glove_white.clone()),
                                                        Transform::from_xyz(0.0, -0.15, 0.0)
                                                            .with_scale(Vec3::new(1.0, 0.9, 1.1)),
                                                    ))
                                                    .with_children(|glove| {
                                                        glove.spawn((
                                                            Mesh3d(cuff_mesh.clone()),
                                                            MeshMaterial3d(cuff_white.clone()),
                                                            Transform::from_xyz(0.0, 0.12, 0.0),
                                                        ));
                                                    });
                                            });
                                    });
                            });
                    });
            });
        }

        // legs and sneakers
        let thigh_mesh = meshes.add(meshes::frustum(0.18, 0.16, 0.5, 16));
        let shin_mesh = meshes.add(meshes::frustum(0.14, 0.16, 0.4, 16));
        let shoe_mesh = meshes.add(Cuboid::new(0.32, 0.25, 0.55));
        let toe_mesh = meshes.add(meshes::uv_sphere(0.16, 16, 8));
        let stripe_mesh = meshes.add(Cuboid::new(0.33, 0.12, 0.56));
        let buckle_mesh = meshes.add(Cuboid::new(0.08, 0.15, 0.02));
        let sole_mesh = meshes.add(Cuboid::new(0.34, 0.08, 0.6));
        for side in [-1.0f32, 1.0] {
            rig.spawn((
                Mesh3d(thigh_mesh.clone()),
                MeshMaterial3d(limb_blue.clone()),
                Transform::from_xyz(side * 0.25, 0.2, 0.0),
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
                MeshMaterial3d(limb_blue.clone()),
                Transform::from_xyz(side * 0.25, -0.15, 0.0),
                JointSwing {
                    rig: root,
                    axis: SwingAxis::X,
                    frequency: STRIDE_FREQUENCY,
                    amplitude: -side * LEG_SWING * 0.5,
                    phase: 0.0,
                    clamp_positive: true,
                    rest: Quat::IDENTITY,
                },
            ));
            // The whole sneaker assembly hangs off the swinging shoe box.
            rig.spawn((
                Mesh3d(shoe_mesh.clone()),
                MeshMaterial3d(shoe_red.clone()),
                Transform::from_xyz(side * 0.25, -0.45, 0.15),
                JointSwing {
                    rig: root,
                    axis: SwingAxis::X,
                    frequency: STRIDE_FREQUENCY,
                    amplitude: -side * LEG_SWING,
                    phase: 0.0,
                    clamp_positive: false,
                    rest: Quat::IDENTITY,
                },
            ))
            .with_children(|shoe| {
                shoe.spawn((
                    Mesh3d(toe_mesh.clone()),
                    MeshMaterial3d(shoe_red.clone()),
                    Transform::from_xyz(0.0, 0.0, 0.25).with_scale(Vec3::new(1.0, 0.8, 1.2)),
                ));
                shoe.spawn((
                    Mesh3d(stripe_mesh.clone()),
                    MeshMaterial3d(stripe_white.clone()),
                    Transform::default(),
                ));
                shoe.spawn((
                    Mesh3d(buckle_mesh.clone()),
                    MeshMaterial3d(buckle_gold.clone()),
                    Transform::from_xyz(0.0, 0.0, 0.28),
                ));
                shoe.spawn((
                    Mesh3d(sole_mesh.clone()),
                    MeshMaterial3d(sole_pale.clone()),
                    Transform::from_xyz(0.0, -0.13, 0.0),
                ));
            });
        }
    });

    // Pooled world-space trail, faked motion blur behind the runner.
    let blob_mesh = meshes.add(meshes::uv_sphere(0.12, 12, 12));
    for index in 0..TRAIL_LENGTH {
        let material = materials.add(unlit_translucent(
            Color::srgb_u8(0x00, 0xaa, 0xff),
            0.7 - index as f32 * 0.04,
        ));
        commands.spawn((
            TrailBlob { index },
            Mesh3d(blob_mesh.clone()),
            MeshMaterial3d(material),
            Transform::default(),
            Visibility::Hidden,
            NotShadowCaster,
        ));
    }

    root
}
