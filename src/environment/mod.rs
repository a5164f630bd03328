//! Scatter decoration for the two biome strips, plus the idle sway that
//! keeps vegetation from looking frozen.

pub mod desert;
pub mod forest;

use bevy::prelude::*;

use crate::core::road_curve::RoadCurve;
use crate::management::AppState;
use crate::systems::chase::ChasePhase;

pub struct EnvironmentPlugin;

impl Plugin for EnvironmentPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            sway_decorations
                .in_set(ChasePhase::Dress)
                .run_if(in_state(AppState::Running)),
        );
    }
}

/// True when a candidate at world `(x, z)` sits clear of the asphalt.
///
/// The curve is evaluated at the signed world z, i.e. against the road
/// that actually passes at that depth. Candidates that fail are dropped,
/// never repositioned, so configured counts are upper bounds.
pub fn clears_road(curve: &RoadCurve, x: f32, z: f32, margin: f32) -> bool {
    (x - curve.lateral_offset(z)).abs() > margin
}

/// Idle roll layered on top of a decoration's rest orientation.
#[derive(Component)]
pub struct Sway {
    /// Oscillations in radians per second of scene time.
    pub rate: f32,
    pub amplitude: f32,
    pub phase: f32,
    pub rest: Quat,
}

fn sway_decorations(time: Res<Time>, mut swayers: Query<(&Sway, &mut Transform)>) {
    let now = time.elapsed_secs();
    for (sway, mut transform) in &mut swayers {
        let roll = (now * sway.rate + sway.phase).sin() * sway.amplitude;
        transform.rotation = sway.rest * Quat::from_rotation_z(roll);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clearance_on_a_straight_section() {
        let curve = RoadCurve::default();
        assert!(clears_road(&curve, 6.0, 0.0, 5.0));
        assert!(!clears_road(&curve, 4.0, 0.0, 5.0));
    }

    #[test]
    fn clearance_follows_the_bend() {
        let curve = RoadCurve::default();
        // At z = -30 the centerline swings to about x = -2.99, so the
        // road blocks candidates west of the origin, not east.
        let center = curve.lateral_offset(-30.0);
        assert!((center + 2.99).abs() < 0.01);
        assert!(!clears_road(&curve, -7.0, -30.0, 5.0));
        assert!(clears_road(&curve, 7.0, -30.0, 5.0));
    }
}
