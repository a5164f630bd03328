//! Runner rigs and the per-frame systems that animate them.
//!
//! Both characters are built from primitive meshes parented to a single
//! root entity. The root carries a [`animation::GaitPhase`] clock and a
//! [`animation::GaitDriver`], and every swinging or bobbing part reads
//! that clock through the rig entity it points back at.

use bevy::prelude::*;

use crate::core::rng::GenRng;
use crate::management::AppState;
use crate::systems::chase::ChasePhase;

pub mod animation;
pub mod hedgehog;
pub mod roadrunner;

use animation::{advance_gait, apply_bobs, apply_joint_swings, GaitDriver};

/// The pursuer, placed behind the leader on the road.
#[derive(Component)]
pub struct Chaser;

/// The runner being chased. The camera's fog cue and the dust cloud key
/// off this marker.
#[derive(Component)]
pub struct Leader;

/// One pooled blob of the chaser's speed trail. `index` orders the pool
/// from the body outward.
#[derive(Component)]
pub struct TrailBlob {
    pub index: usize,
}

/// One pooled puff of the leader's dust cloud.
#[derive(Component)]
pub struct DustPuff {
    pub index: usize,
}

pub struct CharactersPlugin;

impl Plugin for CharactersPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                (advance_gait, apply_joint_swings, apply_bobs)
                    .chain()
                    .in_set(ChasePhase::Animate),
                (update_speed_trail, update_dust_cloud).in_set(ChasePhase::Dress),
            )
                .run_if(in_state(AppState::Running)),
        );
    }
}

/// Strings the trail blobs out behind the chaser while it is moving and
/// hides them when it stalls.
fn update_speed_trail(
    chasers: Query<(&Transform, &GaitDriver), With<Chaser>>,
    mut blobs: Query<(&TrailBlob, &mut Transform, &mut Visibility), Without<Chaser>>,
) {
    let Ok((chaser, driver)) = chasers.get_single() else {
        return;
    };
    let moving = driver.speed > 0.5;
    for (blob, mut transform, mut visibility) in &mut blobs {
        if moving {
            transform.translation =
                chaser.translation + Vec3::new(0.0, 0.4, 0.25 * blob.index as f32);
            *visibility = Visibility::Visible;
        } else {
            *visibility = Visibility::Hidden;
        }
    }
}

/// Scatters the dust puffs along the ground behind the leader with a
/// little sideways jitter per frame.
fn update_dust_cloud(
    mut rng: ResMut<GenRng>,
    leaders: Query<(&Transform, &GaitDriver), With<Leader>>,
    mut puffs: Query<(&DustPuff, &mut Transform, &mut Visibility), Without<Leader>>,
) {
    use rand::Rng;

    let Ok((leader, driver)) = leaders.get_single() else {
        return;
    };
    let moving = driver.speed > 0.5;
    for (puff, mut transform, mut visibility) in &mut puffs {
        if moving {
            let jitter = (rng.rng_mut().gen::<f32>() - 0.5) * 0.2;
            transform.translation = Vec3::new(
                leader.translation.x + jitter,
                0.1,
                leader.translation.z + 0.15 * puff.index as f32,
            );
            *visibility = Visibility::Visible;
        } else {
            *visibility = Visibility::Hidden;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trail_follows_moving_chaser() {
        let mut app = App::new();
        app.add_systems(Update, update_speed_trail);
        let chaser = app
            .world_mut()
            .spawn((
                Chaser,
                GaitDriver {
                    rate: 3.0,
                    speed: 1.0,
                },
                Transform::from_xyz(2.0, 1.0, -40.0),
            ))
            .id();
        let blob = app
            .world_mut()
            .spawn((TrailBlob { index: 2 }, Transform::default(), Visibility::Hidden))
            .id();

        app.update();
        let transform = app.world().get::<Transform>(blob).unwrap();
        assert_eq!(transform.translation, Vec3::new(2.0, 1.4, -39.5));
        assert_eq!(*app.world().get::<Visibility>(blob).unwrap(), Visibility::Visible);

        app.world_mut().get_mut::<GaitDriver>(chaser).unwrap().speed = 0.0;
        app.update();
        assert_eq!(*app.world().get::<Visibility>(blob).unwrap(), Visibility::Hidden);
    }

    #[test]
    fn dust_hugs_the_ground_behind_the_leader() {
        let mut app = App::new();
        app.insert_resource(GenRng::new(7));
        app.add_systems(Update, update_dust_cloud);
        app.world_mut().spawn((
            Leader,
            GaitDriver {
                rate: 4.0,
                speed: 1.0,
            },
            Transform::from_xyz(-1.0, 1.0, -60.0),
        ));
        let puff = app
            .world_mut()
            .spawn((DustPuff { index: 4 }, Transform::default(), Visibility::Hidden))
            .id();

        app.update();
        let translation = app.world().get::<Transform>(puff).unwrap().translation;
        assert!((translation.x + 1.0).abs() <= 0.100_001);
        assert_eq!(translation.y, 0.1);
        assert!((translation.z + 59.4).abs() < 1e-5);
        assert_eq!(*app.world().get::<Visibility>(puff).unwrap(), Visibility::Visible);
    }
}
