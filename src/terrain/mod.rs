//! Road ribbon, lane markings, and the three biome ground bands.

use bevy::pbr::NotShadowCaster;
use bevy::prelude::*;

use crate::core::errors::BuildError;
use crate::core::road_curve::RoadCurve;
use crate::meshes;

pub struct TerrainPlugin;

impl Plugin for TerrainPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TerrainSettings>();
    }
}

/// Dimensions shared by the terrain builder and the scatter passes.
#[derive(Resource, Debug, Clone)]
pub struct TerrainSettings {
    pub curve: RoadCurve,
    /// Paved distance; overridden from [`SceneConfig`](crate::core::config::SceneConfig)
    /// before the build starts.
    pub road_length: f32,
    pub road_width: f32,
    pub road_columns: usize,
    pub road_rows: usize,
    pub marking_spacing: f32,
    pub band_width: f32,
    pub band_columns: usize,
    pub band_rows: usize,
    pub transition_length: f32,
    pub transition_rows: usize,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        TerrainSettings {
            curve: RoadCurve::default(),
            road_length: 1000.0,
            road_width: 4.0,
            road_columns: 8,
            road_rows: 200,
            marking_spacing: 5.0,
            band_width: 100.0,
            band_columns: 100,
            band_rows: 100,
            transition_length: 100.0,
            transition_rows: 50,
        }
    }
}

impl TerrainSettings {
    pub fn validate(&self) -> Result<(), BuildError> {
        for (name, value) in [
            ("road length", self.road_length),
            ("road width", self.road_width),
            ("marking spacing", self.marking_spacing),
            ("band width", self.band_width),
            ("transition length", self.transition_length),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(BuildError::InvalidSettings(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if self.transition_length >= self.road_length {
            return Err(BuildError::InvalidSettings(format!(
                "transition length {} must be shorter than the road {}",
                self.transition_length, self.road_length
            )));
        }
        Ok(())
    }

    /// Ground coverage of the forest band, as travel distances.
    pub fn forest_ground_band(&self) -> (f32, f32) {
        (0.0, self.road_length * 0.5)
    }

    pub fn desert_ground_band(&self) -> (f32, f32) {
        (self.road_length * 0.5, self.road_length)
    }

    /// The blend strip straddles the forest/desert seam and overlaps both
    /// neighbours; its displaced heights differ from theirs, so the
    /// surfaces interleave rather than fight.
    pub fn transition_ground_band(&self) -> (f32, f32) {
        let seam = self.road_length * 0.5;
        (
            seam - self.transition_length * 0.5,
            seam + self.transition_length * 0.5,
        )
    }

    /// Decorations only fill the first quarter of the road; the rest of
    /// the forest ground runs bare toward the transition.
    pub fn forest_scatter_band(&self) -> (f32, f32) {
        (0.0, self.road_length * 0.25)
    }

    pub fn desert_scatter_band(&self) -> (f32, f32) {
        (self.road_length * 0.75, self.road_length)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Biome {
    Forest,
    Transition,
    Desert,
}

/// Decorative relief of the forest floor at lateral `x` and signed
/// offset `u` from the band center. Purely cosmetic; runners never
/// consult it.
pub fn forest_relief(x: f32, u: f32) -> f32 {
    (x * 0.1).sin() * (u * 0.08).cos() * 2.0 + (x * 0.05).sin() * 1.5
}

pub fn desert_relief(x: f32, u: f32) -> f32 {
    (x * 0.08).sin() * (u * 0.1).cos() * 3.0 + (x * 0.15).sin() * 2.0
}

/// Cross-fade between the leading terms of the two neighbouring reliefs.
/// At the forest edge (`u = -length/2`) only the forest term remains, at
/// the desert edge only the desert term.
pub fn transition_relief(x: f32, u: f32, length: f32) -> f32 {
    let progress = ((u + length * 0.5) / length).clamp(0.0, 1.0);
    let forest = (x * 0.1).sin() * (u * 0.08).cos() * 2.0;
    let desert = (x * 0.08).sin() * (u * 0.1).cos() * 3.0;
    forest * (1.0 - progress) + desert * progress
}

/// Centerline points for the dashed lane marking, one every
/// `marking_spacing` units from the start up to (excluding) the road end.
pub fn marking_positions(curve: &RoadCurve, road_length: f32, spacing: f32) -> Vec<Vec3> {
    let mut points = Vec::new();
    let mut d = 0.0;
    while d < road_length {
        points.push(Vec3::new(curve.lateral_offset(d), 0.02, -d));
        d += spacing;
    }
    points
}

#[derive(Component)]
pub struct RoadSurface;

#[derive(Component)]
pub struct LaneMarking;

#[derive(Component)]
pub struct GroundBand(pub Biome);

/// Spawns the road ribbon, its markings, and the three ground bands.
pub fn build_terrain(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    settings: &TerrainSettings,
) -> Result<(), BuildError> {
    settings.validate()?;
    let curve = settings.curve;

    let road_mesh = meshes::displaced_grid(
        settings.road_width,
        settings.road_length,
        settings.road_columns,
        settings.road_rows,
        |x, d| Vec3::new(x + curve.lateral_offset(d), curve.elevation(d), -d),
    )?;
    let road_material = materials.add(StandardMaterial {
        base_color: Color::srgb_u8(0x33, 0x33, 0x33),
        perceptual_roughness: 0.9,
        metallic: 0.1,
        ..default()
    });
    commands.spawn((
        Name::new("Road"),
        RoadSurface,
        Mesh3d(meshes.add(road_mesh)),
        MeshMaterial3d(road_material),
        Transform::IDENTITY,
    ));

    let marking_mesh = meshes.add(Plane3d::default().mesh().size(0.2, 2.0));
    let marking_material = materials.add(StandardMaterial {
        base_color: Color::srgb_u8(0xff, 0xff, 0x00),
        emissive: Color::srgb(1.0, 1.0, 0.0).to_linear() * 0.3,
        perceptual_roughness: 0.7,
        ..default()
    });
    for point in marking_positions(&curve, settings.road_length, settings.marking_spacing) {
        commands.spawn((
            Name::new("LaneMarking"),
            LaneMarking,
            Mesh3d(marking_mesh.clone()),
            MeshMaterial3d(marking_material.clone()),
            Transform::from_translation(point),
            NotShadowCaster,
        ));
    }

    spawn_ground_band(
        commands,
        meshes,
        materials,
        settings,
        Biome::Forest,
        settings.forest_ground_band(),
        settings.band_rows,
        Color::srgb_u8(0x6b, 0x8e, 0x23),
        0.95,
    )?;
    spawn_ground_band(
        commands,
        meshes,
        materials,
        settings,
        Biome::Desert,
        settings.desert_ground_band(),
        settings.band_rows,
        Color::srgb_u8(0xda, 0xa5, 0x20),
        0.90,
    )?;
    spawn_ground_band(
        commands,
        meshes,
        materials,
        settings,
        Biome::Transition,
        settings.transition_ground_band(),
        settings.transition_rows,
        Color::srgb_u8(0x9a, 0x9a, 0x52),
        0.92,
    )?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn spawn_ground_band(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    settings: &TerrainSettings,
    biome: Biome,
    band: (f32, f32),
    rows: usize,
    color: Color,
    roughness: f32,
) -> Result<(), BuildError> {
    let (start, end) = band;
    let length = end - start;
    let transition_length = settings.transition_length;
    let mesh = meshes::displaced_grid(
        settings.band_width,
        length,
        settings.band_columns,
        rows,
        |x, d| {
            let u = d - length * 0.5;
            let relief = match biome {
                Biome::Forest => forest_relief(x, u),
                Biome::Desert => desert_relief(x, u),
                Biome::Transition => transition_relief(x, u, transition_length),
            };
            Vec3::new(x, relief, -d)
        },
    )?;
    let material = materials.add(StandardMaterial {
        base_color: color,
        perceptual_roughness: roughness,
        metallic: 0.05,
        ..default()
    });
    let name = match biome {
        Biome::Forest => "ForestGround",
        Biome::Desert => "DesertGround",
        Biome::Transition => "TransitionGround",
    };
    commands.spawn((
        Name::new(name),
        GroundBand(biome),
        Mesh3d(meshes.add(mesh)),
        MeshMaterial3d(material),
        // The band sits half a unit below the road deck.
        Transform::from_xyz(0.0, -0.5, -start),
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meshes::displaced_grid;
    use bevy::render::mesh::VertexAttributeValues;

    #[test]
    fn settings_validate_and_band_layout() {
        let settings = TerrainSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.forest_ground_band(), (0.0, 500.0));
        assert_eq!(settings.desert_ground_band(), (500.0, 1000.0));
        assert_eq!(settings.transition_ground_band(), (450.0, 550.0));
        assert_eq!(settings.forest_scatter_band(), (0.0, 250.0));
        assert_eq!(settings.desert_scatter_band(), (750.0, 1000.0));
    }

    #[test]
    fn settings_reject_bad_dimensions() {
        let mut settings = TerrainSettings::default();
        settings.road_length = -5.0;
        assert!(settings.validate().is_err());

        let mut settings = TerrainSettings::default();
        settings.transition_length = 2000.0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn road_rows_follow_the_curve() {
        let settings = TerrainSettings::default();
        let curve = settings.curve;
        let mesh = displaced_grid(
            settings.road_width,
            settings.road_length,
            settings.road_columns,
            settings.road_rows,
            |x, d| Vec3::new(x + curve.lateral_offset(d), curve.elevation(d), -d),
        )
        .unwrap();
        let Some(VertexAttributeValues::Float32x3(positions)) =
            mesh.attribute(Mesh::ATTRIBUTE_POSITION)
        else {
            panic!("road mesh should have positions");
        };

        let stride = settings.road_columns + 1;
        for row in [0usize, 1, 57, 200] {
            let d = row as f32 / settings.road_rows as f32 * settings.road_length;
            let left = Vec3::from_array(positions[row * stride]);
            let right = Vec3::from_array(positions[row * stride + settings.road_columns]);
            // The row midpoint recovers the centerline sample.
            let mid = (left + right) / 2.0;
            assert!((mid.x - curve.lateral_offset(d)).abs() < 1e-3);
            assert!((mid.y - curve.elevation(d)).abs() < 1e-3);
            assert!((mid.z + d).abs() < 1e-3);
        }
    }

    #[test]
    fn markings_sit_on_the_centerline() {
        let settings = TerrainSettings::default();
        let points = marking_positions(&settings.curve, settings.road_length, 5.0);
        assert_eq!(points.len(), 200);
        for point in &points {
            assert_eq!(point.x, settings.curve.lateral_offset(-point.z));
            assert_eq!(point.y, 0.02);
        }
        // Strictly short of the far end.
        assert!(points.last().unwrap().z > -settings.road_length);
    }

    #[test]
    fn relief_formulas_match_their_definitions() {
        for (x, u) in [(0.0_f32, 0.0_f32), (7.0, -120.0), (-33.0, 200.0)] {
            assert_eq!(
                forest_relief(x, u),
                (x * 0.1).sin() * (u * 0.08).cos() * 2.0 + (x * 0.05).sin() * 1.5
            );
            assert_eq!(
                desert_relief(x, u),
                (x * 0.08).sin() * (u * 0.1).cos() * 3.0 + (x * 0.15).sin() * 2.0
            );
        }
    }

    #[test]
    fn transition_blends_between_biome_terms() {
        let x = 11.0;
        let len = 100.0;
        // Forest edge keeps only the forest term, desert edge only desert.
        let at_forest_edge = transition_relief(x, -50.0, len);
        assert!((at_forest_edge - (x * 0.1).sin() * (-50.0_f32 * 0.08).cos() * 2.0).abs() < 1e-5);
        let at_desert_edge = transition_relief(x, 50.0, len);
        assert!((at_desert_edge - (x * 0.08).sin() * (50.0_f32 * 0.1).cos() * 3.0).abs() < 1e-5);
        // Midway both terms carry equal weight.
        let midway = transition_relief(x, 0.0, len);
        let forest = (x * 0.1).sin() * 2.0;
        let desert = (x * 0.08).sin() * 3.0;
        assert!((midway - (forest + desert) * 0.5).abs() < 1e-5);
        // Beyond the strip the weight clamps to pure desert.
        let beyond = transition_relief(x, 80.0, len);
        assert!((beyond - (x * 0.08).sin() * (80.0_f32 * 0.1).cos() * 3.0).abs() < 1e-5);
    }
}
