//! Gait-driven procedural animation shared by both runner rigs and the
//! banner bird: a per-rig phase clock, sinusoidal joint swings composed
//! on rest orientations, and vertical bobbing.

use bevy::prelude::*;

/// Accumulated animation phase for one rig. Joints and bobs reference
/// their rig entity and read this clock, so each rig can run at its own
/// tempo.
#[derive(Component, Default)]
pub struct GaitPhase {
    pub time: f32,
}

/// Tempo of a rig's clock: phase advances by `dt * speed * rate`.
#[derive(Component)]
pub struct GaitDriver {
    pub rate: f32,
    pub speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwingAxis {
    X,
    Z,
}

/// Sinusoidal rotation layered on a joint's rest orientation.
///
/// The swing multiplies on the right of `rest`, which matches stacking a
/// single animated Euler component on top of fixed build-time ones. A
/// negative amplitude mirrors the motion for the opposite limb.
#[derive(Component)]
pub struct JointSwing {
    pub rig: Entity,
    pub axis: SwingAxis,
    pub frequency: f32,
    pub amplitude: f32,
    pub phase: f32,
    /// Clamp the angle at zero so a joint only ever bends one way, the
    /// way knees do.
    pub clamp_positive: bool,
    pub rest: Quat,
}

impl JointSwing {
    pub fn angle_at(&self, phase_time: f32) -> f32 {
        let angle = (phase_time * self.frequency + self.phase).sin() * self.amplitude;
        if self.clamp_positive {
            angle.max(0.0)
        } else {
            angle
        }
    }
}

/// Rectified-sine vertical bounce around a base height.
#[derive(Component)]
pub struct Bob {
    pub rig: Entity,
    pub frequency: f32,
    pub amplitude: f32,
    pub base_height: f32,
}

impl Bob {
    pub fn height_at(&self, phase_time: f32) -> f32 {
        self.base_height + (phase_time * self.frequency).sin().abs() * self.amplitude
    }
}

pub fn advance_gait(time: Res<Time>, mut rigs: Query<(&mut GaitPhase, &GaitDriver)>) {
    for (mut phase, driver) in &mut rigs {
        phase.time += time.delta_secs() * driver.speed * driver.rate;
    }
}

pub fn apply_joint_swings(
    rigs: Query<&GaitPhase>,
    mut joints: Query<(&JointSwing, &mut Transform)>,
) {
    for (swing, mut transform) in &mut joints {
        let Ok(phase) = rigs.get(swing.rig) else {
            continue;
        };
        let angle = swing.angle_at(phase.time);
        let spin = match swing.axis {
            SwingAxis::X => Quat::from_rotation_x(angle),
            SwingAxis::Z => Quat::from_rotation_z(angle),
        };
        transform.rotation = swing.rest * spin;
    }
}

pub fn apply_bobs(rigs: Query<&GaitPhase>, mut bobs: Query<(&Bob, &mut Transform)>) {
    for (bob, mut transform) in &mut bobs {
        let Ok(phase) = rigs.get(bob.rig) else {
            continue;
        };
        transform.translation.y = bob.height_at(phase.time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn swing(amplitude: f32, clamp_positive: bool) -> JointSwing {
        JointSwing {
            rig: Entity::PLACEHOLDER,
            axis: SwingAxis::X,
            frequency: 12.0,
            amplitude,
            phase: 0.0,
            clamp_positive,
            rest: Quat::IDENTITY,
        }
    }

    #[test]
    fn swing_follows_the_sine() {
        let joint = swing(0.6, false);
        // Quarter period of the 12 rad/s cycle.
        let t = FRAC_PI_2 / 12.0;
        assert!((joint.angle_at(t) - 0.6).abs() < 1e-5);
        assert!((joint.angle_at(3.0 * t) + 0.6).abs() < 1e-5);
        assert_eq!(joint.angle_at(0.0), 0.0);
    }

    #[test]
    fn opposite_limbs_mirror() {
        let left = swing(0.6, false);
        let right = swing(-0.6, false);
        for i in 0..50 {
            let t = i as f32 * 0.01;
            assert!((left.angle_at(t) + right.angle_at(t)).abs() < 1e-6);
        }
    }

    #[test]
    fn knees_never_hyperextend() {
        let left_knee = swing(0.3, true);
        let right_knee = swing(-0.3, true);
        for i in 0..200 {
            let t = i as f32 * 0.013;
            assert!(left_knee.angle_at(t) >= 0.0);
            assert!(right_knee.angle_at(t) >= 0.0);
        }
        // The clamp still lets the swing reach its peak.
        let t = FRAC_PI_2 / 12.0;
        assert!((left_knee.angle_at(t) - 0.3).abs() < 1e-5);
    }

    #[test]
    fn phase_offset_shifts_the_cycle() {
        let mut wave = swing(0.15, false);
        wave.frequency = 10.0;
        wave.phase = 0.4;
        assert!((wave.angle_at(0.0) - 0.4_f32.sin() * 0.15).abs() < 1e-6);
    }

    #[test]
    fn bob_is_rectified_and_grounded_at_base() {
        let bob = Bob {
            rig: Entity::PLACEHOLDER,
            frequency: 12.0,
            amplitude: 0.08,
            base_height: 0.8,
        };
        assert_eq!(bob.height_at(0.0), 0.8);
        for i in 0..200 {
            let h = bob.height_at(i as f32 * 0.017);
            assert!(h >= 0.8 - 1e-6);
            assert!(h <= 0.88 + 1e-6);
        }
        let peak = FRAC_PI_2 / 12.0;
        assert!((bob.height_at(peak) - 0.88).abs() < 1e-5);
    }

    #[test]
    fn rest_orientation_survives_the_swing() {
        let rest = Quat::from_rotation_y(1.1);
        let joint = JointSwing { rest, ..swing(0.5, false) };
        // At a zero crossing the joint sits exactly at rest.
        let spin = Quat::from_rotation_x(joint.angle_at(0.0));
        assert!((joint.rest * spin).angle_between(rest) < 1e-6);
    }
}
