//! Cacti, rock piles, and tumbleweeds for the desert quarter.

use bevy::pbr::NotShadowCaster;
use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::f32::consts::{FRAC_PI_2, TAU};

use crate::core::config::DesertSettings;
use crate::core::road_curve::RoadCurve;
use crate::environment::clears_road;
use crate::meshes;

pub const SCATTER_CLEARANCE: f32 = 5.0;
pub const TUMBLEWEED_CLEARANCE: f32 = 4.0;

const SCATTER_SPREAD: f32 = 80.0;
const TUMBLEWEED_SPREAD: f32 = 60.0;
/// Share of accepted scatter candidates that become rocks instead of
/// cacti.
const ROCK_SHARE: f32 = 0.3;

#[derive(Component)]
pub struct Cactus;

#[derive(Component)]
pub struct Rock;

#[derive(Component)]
pub struct Tumbleweed;

/// One planned desert decoration. Fine detail (arm lengths, spine
/// heights, boulder lumps) is derived from the piece's own `detail_seed`
/// at spawn time, keeping the plan small while staying reproducible.
#[derive(Debug, Clone, PartialEq)]
pub enum DesertPiece {
    Cactus {
        x: f32,
        z: f32,
        trunk_height: f32,
        arm_count: usize,
        detail_seed: u64,
    },
    Rock {
        x: f32,
        z: f32,
        yaw: f32,
        detail_seed: u64,
    },
    Tumbleweed {
        x: f32,
        z: f32,
    },
}

impl DesertPiece {
    pub fn ground_point(&self) -> (f32, f32) {
        match *self {
            DesertPiece::Cactus { x, z, .. }
            | DesertPiece::Rock { x, z, .. }
            | DesertPiece::Tumbleweed { x, z } => (x, z),
        }
    }
}

pub fn plan_desert(
    rng: &mut impl Rng,
    curve: &RoadCurve,
    settings: &DesertSettings,
    band: (f32, f32),
) -> Vec<DesertPiece> {
    let (start, end) = band;
    let span = end - start;
    let mut plan = Vec::new();

    for _ in 0..settings.scatter {
        let x = (rng.gen::<f32>() - 0.5) * SCATTER_SPREAD;
        let z = -(rng.gen::<f32>() * span) - start;
        if !clears_road(curve, x, z, SCATTER_CLEARANCE) {
            continue;
        }
        if rng.gen::<f32>() > ROCK_SHARE {
            plan.push(DesertPiece::Cactus {
                x,
                z,
                trunk_height: 2.0 + rng.gen::<f32>() * 2.0,
                arm_count: rng.gen_range(0..3),
                detail_seed: rng.gen(),
            });
        } else {
            plan.push(DesertPiece::Rock {
                x,
                z,
                yaw: rng.gen::<f32>() * TAU,
                detail_seed: rng.gen(),
            });
        }
    }

    for _ in 0..settings.tumbleweeds {
        let x = (rng.gen::<f32>() - 0.5) * TUMBLEWEED_SPREAD;
        let z = -(rng.gen::<f32>() * span) - start;
        if !clears_road(curve, x, z, TUMBLEWEED_CLEARANCE) {
            continue;
        }
        plan.push(DesertPiece::Tumbleweed { x, z });
    }

    plan
}

pub fn spawn_desert(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    plan: &[DesertPiece],
) {
    let cactus_material = materials.add(StandardMaterial {
        base_color: Color::srgb_u8(0x3d, 0x7d, 0x3d),
        perceptual_roughness: 0.85,
        metallic: 0.1,
        ..default()
    });
    let spine_mesh = meshes.add(meshes::frustum(0.01, 0.01, 0.1, 4));
    let spine_material = materials.add(StandardMaterial {
        base_color: Color::srgb_u8(0xcc, 0xcc, 0xaa),
        perceptual_roughness: 0.7,
        ..default()
    });
    let rock_material = materials.add(StandardMaterial {
        base_color: Color::srgb_u8(0x8b, 0x73, 0x55),
        perceptual_roughness: 0.95,
        metallic: 0.05,
        ..default()
    });
    let tumbleweed_mesh = meshes.add(meshes::uv_sphere(0.4, 8, 8));
    // Stand-in for a wireframe ball of twigs: a see-through shell reads
    // as dried brush without a dedicated wireframe render pass.
    let tumbleweed_material = materials.add(StandardMaterial {
        base_color: Color::srgb_u8(0xb8, 0x95, 0x6a).with_alpha(0.45),
        perceptual_roughness: 0.9,
        metallic: 0.05,
        alpha_mode: AlphaMode::Blend,
        cull_mode: None,
        double_sided: true,
        ..default()
    });

    for piece in plan {
        match *piece {
            DesertPiece::Cactus {
                x,
                z,
                trunk_height,
                arm_count,
                detail_seed,
            } => {
                let mut detail = ChaCha8Rng::seed_from_u64(detail_seed);
                commands
                    .spawn((
                        Name::new("Cactus"),
                        Cactus,
                        Transform::from_xyz(x, 0.0, z),
                        Visibility::default(),
                    ))
                    .with_children(|cactus| {
                        cactus.spawn((
                            Mesh3d(
                                meshes.add(Cylinder::new(0.3, trunk_height).mesh().resolution(12)),
                            ),
                            MeshMaterial3d(cactus_material.clone()),
                            Transform::from_xyz(0.0, trunk_height / 2.0, 0.0),
                        ));
                        for arm in 0..arm_count {
                            let arm_length = 1.0 + detail.gen::<f32>();
                            let side = if arm % 2 == 0 { 1.0 } else { -1.0 };
                            let arm_y =
                                trunk_height * 0.4 + detail.gen::<f32>() * trunk_height * 0.3;
                            cactus.spawn((
                                Mesh3d(
                                    meshes.add(Cylinder::new(0.2, arm_length).mesh().resolution(12)),
                                ),
                                MeshMaterial3d(cactus_material.clone()),
                                Transform::from_xyz(side * 0.4, arm_y, 0.0)
                                    .with_rotation(Quat::from_rotation_z(side * FRAC_PI_2)),
                            ));
                            cactus.spawn((
                                Mesh3d(
                                    meshes.add(
                                        Cylinder::new(0.2, arm_length * 0.7).mesh().resolution(12),
                                    ),
                                ),
                                MeshMaterial3d(cactus_material.clone()),
                                Transform::from_xyz(
                                    side * (0.4 + arm_length / 2.0),
                                    arm_y + arm_length * 0.35,
                                    0.0,
                                ),
                            ));
                        }
                        // A ring of spines wrapped around the lower trunk.
                        for spine in 0..20 {
                            let angle = spine as f32 / 20.0 * TAU;
                            let spine_y = detail.gen::<f32>() * 2.0;
                            cactus.spawn((
                                Mesh3d(spine_mesh.clone()),
                                MeshMaterial3d(spine_material.clone()),
                                Transform::from_xyz(
                                    angle.cos() * 0.35,
                                    spine_y,
                                    angle.sin() * 0.35,
                                )
                                .with_rotation(
                                    Quat::from_rotation_y(-angle)
                                        * Quat::from_rotation_x(FRAC_PI_2),
                                ),
                                NotShadowCaster,
                            ));
                        }
                    });
            }
            DesertPiece::Rock {
                x,
                z,
                yaw,
                detail_seed,
            } => {
                let mut detail = ChaCha8Rng::seed_from_u64(detail_seed);
                commands
                    .spawn((
                        Name::new("Rock"),
                        Rock,
                        Transform::from_xyz(x, 0.0, z)
                            .with_rotation(Quat::from_rotation_y(yaw)),
                        Visibility::default(),
                    ))
                    .with_children(|pile| {
                        let boulders = 2 + detail.gen_range(0..3);
                        for _ in 0..boulders {
                            let size = 0.5 + detail.gen::<f32>() * 0.8;
                            let mut mesh = meshes::uv_sphere(size, 8, 6);
                            meshes::deform_vertices(&mut mesh, &mut detail, 0.8, 1.2);
                            let jitter_x = (detail.gen::<f32>() - 0.5) * 0.5;
                            let jitter_z = (detail.gen::<f32>() - 0.5) * 0.5;
                            pile.spawn((
                                Mesh3d(meshes.add(mesh)),
                                MeshMaterial3d(rock_material.clone()),
                                Transform::from_xyz(jitter_x, size * 0.3, jitter_z),
                            ));
                        }
                    });
            }
            DesertPiece::Tumbleweed { x, z } => {
                commands.spawn((
                    Tumbleweed,
                    Mesh3d(tumbleweed_mesh.clone()),
                    MeshMaterial3d(tumbleweed_material.clone()),
                    Transform::from_xyz(x, 0.4, z),
                    NotShadowCaster,
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_plan(seed: u64) -> Vec<DesertPiece> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        plan_desert(
            &mut rng,
            &RoadCurve::default(),
            &DesertSettings::default(),
            (750.0, 1000.0),
        )
    }

    #[test]
    fn planning_is_reproducible() {
        assert_eq!(default_plan(11), default_plan(11));
        assert_ne!(default_plan(11), default_plan(12));
    }

    #[test]
    fn every_piece_clears_the_road() {
        let curve = RoadCurve::default();
        for piece in &default_plan(11) {
            let margin = match piece {
                DesertPiece::Tumbleweed { .. } => TUMBLEWEED_CLEARANCE,
                _ => SCATTER_CLEARANCE,
            };
            let (x, z) = piece.ground_point();
            assert!(
                (x - curve.lateral_offset(z)).abs() > margin,
                "{piece:?} overlaps the road"
            );
        }
    }

    #[test]
    fn pieces_stay_inside_their_band() {
        for piece in &default_plan(13) {
            let (_, z) = piece.ground_point();
            let d = -z;
            assert!((750.0..=1000.0).contains(&d), "{piece:?} outside the band");
        }
    }

    #[test]
    fn scatter_contains_both_kinds() {
        let plan = default_plan(11);
        let cacti = plan
            .iter()
            .filter(|p| matches!(p, DesertPiece::Cactus { .. }))
            .count();
        let rocks = plan
            .iter()
            .filter(|p| matches!(p, DesertPiece::Rock { .. }))
            .count();
        assert!(cacti > 0);
        assert!(rocks > 0);
        // Cacti dominate the mix.
        assert!(cacti > rocks);
    }

    #[test]
    fn cactus_parameters_stay_in_range() {
        for piece in &default_plan(19) {
            if let DesertPiece::Cactus {
                trunk_height,
                arm_count,
                ..
            } = piece
            {
                assert!((2.0..4.0).contains(trunk_height));
                assert!(*arm_count <= 2);
            }
        }
    }

    #[test]
    fn detail_seeds_are_distinct() {
        let seeds: Vec<u64> = default_plan(29)
            .iter()
            .filter_map(|piece| match piece {
                DesertPiece::Cactus { detail_seed, .. }
                | DesertPiece::Rock { detail_seed, .. } => Some(*detail_seed),
                DesertPiece::Tumbleweed { .. } => None,
            })
            .collect();
        let mut unique = seeds.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), seeds.len());
    }
}
