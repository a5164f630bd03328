//! The pursuit itself: advancing the shared distance along the road and
//! pinning both runners to the curve.

use bevy::prelude::*;

use crate::characters::{Chaser, Leader};
use crate::core::config::SceneConfig;
use crate::management::AppState;
use crate::terrain::TerrainSettings;

/// How far along the road the leader has run, in world units. Grows
/// without bound; the runners simply leave the paved stretch behind.
#[derive(Resource, Default)]
pub struct ChaseProgress {
    pub distance: f32,
}

/// Frame phases for the running scene. Movement lands first, the gait
/// animation reads the new root positions, then trails, dust, fog and
/// swaying foliage dress the frame.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChasePhase {
    Drive,
    Animate,
    Dress,
}

pub struct ChasePlugin;

impl Plugin for ChasePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ChaseProgress>()
            .configure_sets(
                Update,
                (ChasePhase::Drive, ChasePhase::Animate, ChasePhase::Dress).chain(),
            )
            .add_systems(
                Update,
                (advance_chase, place_runners)
                    .chain()
                    .in_set(ChasePhase::Drive)
                    .run_if(in_state(AppState::Running)),
            );
    }
}

fn advance_chase(time: Res<Time>, config: Res<SceneConfig>, mut progress: ResMut<ChaseProgress>) {
    progress.distance += time.delta_secs() * config.chase_speed;
}

/// Snaps the leader to the curve at the current distance and the chaser
/// a fixed gap behind. Both ride at the constant road height even where
/// the ground relief beside the road rises and falls.
fn place_runners(
    progress: Res<ChaseProgress>,
    config: Res<SceneConfig>,
    settings: Res<TerrainSettings>,
    mut leaders: Query<&mut Transform, (With<Leader>, Without<Chaser>)>,
    mut chasers: Query<&mut Transform, With<Chaser>>,
) {
    if let Ok(mut transform) = leaders.get_single_mut() {
        transform.translation = settings.curve.road_position(progress.distance);
    }
    if let Ok(mut transform) = chasers.get_single_mut() {
        transform.translation = settings
            .curve
            .road_position(progress.distance - config.chase_gap);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::road_curve::RoadCurve;

    #[test]
    fn runners_pinned_to_curve_a_gap_apart() {
        let mut app = App::new();
        app.insert_resource(ChaseProgress { distance: 120.0 })
            .insert_resource(SceneConfig::default())
            .insert_resource(TerrainSettings::default())
            .add_systems(Update, place_runners);
        let leader = app
            .world_mut()
            .spawn((Leader, Transform::default()))
            .id();
        let chaser = app
            .world_mut()
            .spawn((Chaser, Transform::default()))
            .id();

        app.update();

        let curve = RoadCurve::default();
        let gap = SceneConfig::default().chase_gap;
        assert_eq!(
            app.world().get::<Transform>(leader).unwrap().translation,
            curve.road_position(120.0)
        );
        assert_eq!(
            app.world().get::<Transform>(chaser).unwrap().translation,
            curve.road_position(120.0 - gap)
        );
    }
}
