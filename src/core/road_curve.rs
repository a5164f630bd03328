use bevy::prelude::*;

/// Parameters of the winding road centerline.
///
/// This is the single source of truth for "where is the road at distance
/// `d`": the road mesh displaces its vertices with it at build time, and
/// every runtime consumer (characters, camera, fog zones, lane markings)
/// samples it through the same functions. Any divergence shows up as
/// runners drifting off the rendered asphalt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadCurve {
    /// Lateral sine amplitude in world units.
    pub curve_amplitude: f32,
    /// Lateral sine frequency in radians per unit of travel.
    pub curve_frequency: f32,
    /// Elevation sine amplitude.
    pub rise_amplitude: f32,
    /// Elevation sine frequency.
    pub rise_frequency: f32,
    /// Constant height runners ride at, independent of ground relief.
    pub ride_height: f32,
}

impl Default for RoadCurve {
    fn default() -> Self {
        RoadCurve {
            curve_amplitude: 3.0,
            curve_frequency: 0.05,
            rise_amplitude: 0.5,
            rise_frequency: 0.1,
            ride_height: 0.5,
        }
    }
}

/// A point on the road, derived on demand from a travel distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadSample {
    pub lateral_offset: f32,
    pub elevation: f32,
    pub forward_distance: f32,
}

impl RoadCurve {
    /// Side-to-side displacement of the centerline. Defined for all real
    /// inputs; the scatter code calls this with signed world z as well as
    /// with travel distances.
    pub fn lateral_offset(&self, s: f32) -> f32 {
        (s * self.curve_frequency).sin() * self.curve_amplitude
    }

    /// Vertical undulation of the road surface.
    pub fn elevation(&self, s: f32) -> f32 {
        (s * self.rise_frequency).sin() * self.rise_amplitude
    }

    pub fn sample(&self, distance: f32) -> RoadSample {
        RoadSample {
            lateral_offset: self.lateral_offset(distance),
            elevation: self.elevation(distance),
            forward_distance: distance,
        }
    }

    /// World position a runner occupies at `distance` along the road.
    ///
    /// The y coordinate is always [`ride_height`](RoadCurve::ride_height),
    /// never the decorative ground relief. Runners stay glued to the
    /// nominal road surface; the bumpy biome meshes underneath are
    /// cosmetic and deliberately ignored here.
    pub fn road_position(&self, distance: f32) -> Vec3 {
        Vec3::new(
            self.lateral_offset(distance),
            self.ride_height,
            -distance,
        )
    }
}
