//! Trees, grass tufts, and bushes for the forest quarter of the road.

use bevy::pbr::NotShadowCaster;
use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;

use crate::core::config::ForestSettings;
use crate::core::road_curve::RoadCurve;
use crate::environment::{clears_road, Sway};
use crate::meshes;

pub const TREE_CLEARANCE: f32 = 5.0;
pub const GRASS_CLEARANCE: f32 = 3.0;
pub const BUSH_CLEARANCE: f32 = 4.0;

const TREE_SPREAD: f32 = 80.0;
const GRASS_SPREAD: f32 = 80.0;
const BUSH_SPREAD: f32 = 70.0;

#[derive(Component)]
pub struct Tree;

#[derive(Component)]
pub struct GrassTuft;

#[derive(Component)]
pub struct Bush;

/// One planned forest decoration. Planning is pure data so the placement
/// rules can be checked without spinning up an app.
#[derive(Debug, Clone, PartialEq)]
pub enum ForestPiece {
    Tree {
        x: f32,
        z: f32,
        trunk_height: f32,
        trunk_radius: f32,
        yaw: f32,
    },
    Grass {
        x: f32,
        z: f32,
        yaw: f32,
        scale: Vec3,
    },
    Bush {
        x: f32,
        z: f32,
        scale: Vec3,
    },
}

impl ForestPiece {
    pub fn ground_point(&self) -> (f32, f32) {
        match *self {
            ForestPiece::Tree { x, z, .. }
            | ForestPiece::Grass { x, z, .. }
            | ForestPiece::Bush { x, z, .. } => (x, z),
        }
    }
}

/// Rolls every candidate for the band and keeps the ones that land clear
/// of the road. `band` is in travel distances; pieces come out in world
/// coordinates with negative z.
pub fn plan_forest(
    rng: &mut impl Rng,
    curve: &RoadCurve,
    settings: &ForestSettings,
    band: (f32, f32),
) -> Vec<ForestPiece> {
    let (start, end) = band;
    let span = end - start;
    let mut plan = Vec::new();

    for _ in 0..settings.trees {
        let x = (rng.gen::<f32>() - 0.5) * TREE_SPREAD;
        let z = -(rng.gen::<f32>() * span) - start;
        if !clears_road(curve, x, z, TREE_CLEARANCE) {
            continue;
        }
        plan.push(ForestPiece::Tree {
            x,
            z,
            trunk_height: 3.0 + rng.gen::<f32>() * 2.0,
            trunk_radius: 0.3 + rng.gen::<f32>() * 0.2,
            yaw: rng.gen::<f32>() * TAU,
        });
    }

    for _ in 0..settings.grass {
        let x = (rng.gen::<f32>() - 0.5) * GRASS_SPREAD;
        let z = -(rng.gen::<f32>() * span) - start;
        if !clears_road(curve, x, z, GRASS_CLEARANCE) {
            continue;
        }
        plan.push(ForestPiece::Grass {
            x,
            z,
            yaw: rng.gen::<f32>() * TAU,
            scale: Vec3::new(
                1.0 + rng.gen::<f32>(),
                1.0 + rng.gen::<f32>() * 0.5,
                1.0 + rng.gen::<f32>(),
            ),
        });
    }

    for _ in 0..settings.bushes {
        let x = (rng.gen::<f32>() - 0.5) * BUSH_SPREAD;
        let z = -(rng.gen::<f32>() * span) - start;
        if !clears_road(curve, x, z, BUSH_CLEARANCE) {
            continue;
        }
        plan.push(ForestPiece::Bush {
            x,
            z,
            scale: Vec3::new(
                1.0 + rng.gen::<f32>(),
                0.8 + rng.gen::<f32>() * 0.4,
                1.0 + rng.gen::<f32>(),
            ),
        });
    }

    plan
}

pub fn spawn_forest(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    plan: &[ForestPiece],
) {
    let trunk_material = materials.add(StandardMaterial {
        base_color: Color::srgb_u8(0x4a, 0x37, 0x28),
        perceptual_roughness: 0.9,
        metallic: 0.1,
        ..default()
    });
    // Three stacked canopy layers, darker toward the top.
    let canopy: Vec<(Handle<Mesh>, Handle<StandardMaterial>)> = [0x228b22u32, 0x2d5016, 0x1a3d0a]
        .iter()
        .enumerate()
        .map(|(layer, &color)| {
            let size = 2.0 - layer as f32 * 0.3;
            let mesh = meshes.add(meshes::cone(size, size * 1.5, 8));
            let material = materials.add(StandardMaterial {
                base_color: Color::srgb_u8(
                    (color >> 16) as u8,
                    (color >> 8) as u8,
                    color as u8,
                ),
                perceptual_roughness: 0.8,
                metallic: 0.1,
                ..default()
            });
            (mesh, material)
        })
        .collect();
    let grass_mesh = meshes.add(meshes::cone(0.1, 0.5, 4));
    let grass_material = materials.add(StandardMaterial {
        base_color: Color::srgb_u8(0x3a, 0x7d, 0x44),
        perceptual_roughness: 0.9,
        metallic: 0.05,
        ..default()
    });
    let bush_mesh = meshes.add(meshes::uv_sphere(0.5, 8, 8));
    let bush_material = materials.add(StandardMaterial {
        base_color: Color::srgb_u8(0x2d, 0x50, 0x16),
        perceptual_roughness: 0.85,
        metallic: 0.1,
        ..default()
    });

    let mut tree_index = 0;
    let mut grass_index = 0;
    for piece in plan {
        match *piece {
            ForestPiece::Tree {
                x,
                z,
                trunk_height,
                trunk_radius,
                yaw,
            } => {
                let rest = Quat::from_rotation_y(yaw);
                commands
                    .spawn((
                        Name::new("Tree"),
                        Tree,
                        Sway {
                            rate: 1.0,
                            amplitude: 0.02,
                            phase: tree_index as f32,
                            rest,
                        },
                        Transform::from_xyz(x, 0.0, z).with_rotation(rest),
                        Visibility::default(),
                    ))
                    .with_children(|tree| {
                        tree.spawn((
                            Mesh3d(meshes.add(meshes::frustum(
                                trunk_radius,
                                trunk_radius * 1.2,
                                trunk_height,
                                8,
                            ))),
                            MeshMaterial3d(trunk_material.clone()),
                            Transform::from_xyz(0.0, trunk_height / 2.0, 0.0),
                        ));
                        for (layer, (mesh, material)) in canopy.iter().enumerate() {
                            tree.spawn((
                                Mesh3d(mesh.clone()),
                                MeshMaterial3d(material.clone()),
                                Transform::from_xyz(0.0, trunk_height + layer as f32 * 1.2, 0.0),
                            ));
                        }
                    });
                tree_index += 1;
            }
            ForestPiece::Grass { x, z, yaw, scale } => {
                let rest = Quat::from_rotation_y(yaw);
                commands.spawn((
                    GrassTuft,
                    Sway {
                        rate: 2.0,
                        amplitude: 0.05,
                        phase: grass_index as f32 * 0.1,
                        rest,
                    },
                    Mesh3d(grass_mesh.clone()),
                    MeshMaterial3d(grass_material.clone()),
                    Transform {
                        translation: Vec3::new(x, 0.0, z),
                        rotation: rest,
                        scale,
                    },
                    NotShadowCaster,
                ));
                grass_index += 1;
            }
            ForestPiece::Bush { x, z, scale } => {
                commands.spawn((
                    Bush,
                    Mesh3d(bush_mesh.clone()),
                    MeshMaterial3d(bush_material.clone()),
                    Transform::from_xyz(x, 0.3, z).with_scale(scale),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn default_plan(seed: u64) -> Vec<ForestPiece> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        plan_forest(
            &mut rng,
            &RoadCurve::default(),
            &ForestSettings::default(),
            (0.0, 250.0),
        )
    }

    #[test]
    fn planning_is_reproducible() {
        assert_eq!(default_plan(5), default_plan(5));
        assert_ne!(default_plan(5), default_plan(6));
    }

    #[test]
    fn every_piece_clears_the_road() {
        let curve = RoadCurve::default();
        let plan = default_plan(17);
        assert!(!plan.is_empty());
        for piece in &plan {
            let margin = match piece {
                ForestPiece::Tree { .. } => TREE_CLEARANCE,
                ForestPiece::Grass { .. } => GRASS_CLEARANCE,
                ForestPiece::Bush { .. } => BUSH_CLEARANCE,
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
        for piece in &default_plan(23) {
            let (_, z) = piece.ground_point();
            let d = -z;
            assert!((0.0..=250.0).contains(&d), "{piece:?} outside the band");
        }
    }

    #[test]
    fn tree_parameters_stay_in_range() {
        for piece in &default_plan(31) {
            if let ForestPiece::Tree {
                trunk_height,
                trunk_radius,
                yaw,
                ..
            } = piece
            {
                assert!((3.0..5.0).contains(trunk_height));
                assert!((0.3..0.5).contains(trunk_radius));
                assert!((0.0..TAU).contains(yaw));
            }
        }
    }

    #[test]
    fn rejections_leave_fewer_pieces_than_candidates() {
        let settings = ForestSettings::default();
        let plan = default_plan(41);
        let candidates = settings.trees + settings.grass + settings.bushes;
        assert!(plan.len() <= candidates);
    }
}
