//! Hand-built triangle meshes for everything the stock primitives cannot
//! express: grids displaced by a height rule, tapered lathe surfaces for
//! limbs and trunks, low-poly spheres for rocks, and vertex painting for
//! the sky dome.

use bevy::prelude::*;
use bevy::render::mesh::{Indices, VertexAttributeValues};
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::PrimitiveTopology;
use itertools::iproduct;
use rand::Rng;
use std::f32::consts::TAU;

use crate::core::errors::BuildError;

/// Grid of `columns x rows` cells whose vertices are produced by
/// `vertex(x_across, d_along)`, with `x_across` centered on zero spanning
/// `width` and `d_along` running from `0` to `length`.
///
/// Vertices are laid out row-major from the near edge, so row `k` starts
/// at index `k * (columns + 1)` and sits at `d = k / rows * length`.
/// Normals are smooth-computed from the displaced positions.
pub fn displaced_grid(
    width: f32,
    length: f32,
    columns: usize,
    rows: usize,
    mut vertex: impl FnMut(f32, f32) -> Vec3,
) -> Result<Mesh, BuildError> {
    if columns == 0 || rows == 0 {
        return Err(BuildError::MeshConstruction(
            "grid needs at least one cell per axis".into(),
        ));
    }
    if !(width.is_finite() && length.is_finite()) || width <= 0.0 || length <= 0.0 {
        return Err(BuildError::MeshConstruction(format!(
            "grid dimensions must be finite and positive, got {width}x{length}"
        )));
    }

    let mut positions = Vec::with_capacity((columns + 1) * (rows + 1));
    let mut uvs = Vec::with_capacity(positions.capacity());
    for (row, col) in iproduct!(0..=rows, 0..=columns) {
        let u = col as f32 / columns as f32;
        let v = row as f32 / rows as f32;
        let x = (u - 0.5) * width;
        let d = v * length;
        positions.push(vertex(x, d).to_array());
        uvs.push([u, v]);
    }

    let mut indices = Vec::with_capacity(columns * rows * 6);
    for (row, col) in iproduct!(0..rows, 0..columns) {
        let a = (row * (columns + 1) + col) as u32;
        let b = a + 1;
        let c = a + columns as u32 + 1;
        let d = c + 1;
        indices.extend_from_slice(&[a, b, c, b, d, c]);
    }

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::default(),
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
    .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
    .with_inserted_indices(Indices::U32(indices));
    mesh.compute_smooth_normals();
    Ok(mesh)
}

/// Lathe surface with distinct top and bottom radii, centered on the
/// origin with its axis along +y. A zero top radius gives a cone with
/// per-segment apex normals; non-zero radii get flat cap fans.
pub fn frustum(radius_top: f32, radius_bottom: f32, height: f32, segments: usize) -> Mesh {
    let segments = segments.max(3);
    let half = height / 2.0;
    let slope = (radius_bottom - radius_top) / height;

    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut uvs: Vec<[f32; 2]> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    for (ring, (radius, y)) in [(radius_top, half), (radius_bottom, -half)]
        .into_iter()
        .enumerate()
    {
        for k in 0..=segments {
            let theta = k as f32 / segments as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            positions.push([radius * cos, y, radius * sin]);
            normals.push(Vec3::new(cos, slope, sin).normalize().to_array());
            uvs.push([k as f32 / segments as f32, ring as f32]);
        }
    }
    for k in 0..segments as u32 {
        let top = k;
        let bottom = segments as u32 + 1 + k;
        indices.extend_from_slice(&[top, top + 1, bottom, top + 1, bottom + 1, bottom]);
    }

    for (radius, y, up) in [(radius_top, half, 1.0f32), (radius_bottom, -half, -1.0)] {
        if radius <= 0.0 {
            continue;
        }
        let center = positions.len() as u32;
        positions.push([0.0, y, 0.0]);
        normals.push([0.0, up, 0.0]);
        uvs.push([0.5, 0.5]);
        for k in 0..=segments {
            let theta = k as f32 / segments as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            positions.push([radius * cos, y, radius * sin]);
            normals.push([0.0, up, 0.0]);
            uvs.push([0.5 + cos / 2.0, 0.5 + sin / 2.0]);
        }
        for k in 0..segments as u32 {
            let ring = center + 1 + k;
            if up > 0.0 {
                indices.extend_from_slice(&[center, ring + 1, ring]);
            } else {
                indices.extend_from_slice(&[center, ring, ring + 1]);
            }
        }
    }

    Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::default(),
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
    .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
    .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
    .with_inserted_indices(Indices::U32(indices))
}

/// Cone pointing up, centered on the origin like [`frustum`].
pub fn cone(radius: f32, height: f32, segments: usize) -> Mesh {
    frustum(0.0, radius, height, segments)
}

/// Latitude-longitude sphere with controllable resolution. The stock
/// sphere primitive is too finely tessellated for the chunky low-poly
/// look the rocks and decorations want.
pub fn uv_sphere(radius: f32, sectors: usize, stacks: usize) -> Mesh {
    let sectors = sectors.max(3);
    let stacks = stacks.max(2);

    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut uvs: Vec<[f32; 2]> = Vec::new();
    for stack in 0..=stacks {
        let phi = stack as f32 / stacks as f32 * std::f32::consts::PI;
        let (sin_phi, cos_phi) = phi.sin_cos();
        for sector in 0..=sectors {
            let theta = sector as f32 / sectors as f32 * TAU;
            let (sin_theta, cos_theta) = theta.sin_cos();
            let dir = Vec3::new(sin_phi * cos_theta, cos_phi, sin_phi * sin_theta);
            positions.push((dir * radius).to_array());
            normals.push(dir.to_array());
            uvs.push([
                sector as f32 / sectors as f32,
                stack as f32 / stacks as f32,
            ]);
        }
    }

    let mut indices: Vec<u32> = Vec::new();
    for (stack, sector) in iproduct!(0..stacks, 0..sectors) {
        let a = (stack * (sectors + 1) + sector) as u32;
        let b = a + 1;
        let c = a + sectors as u32 + 1;
        let d = c + 1;
        indices.extend_from_slice(&[a, b, c, b, d, c]);
    }

    Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::default(),
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
    .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
    .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
    .with_inserted_indices(Indices::U32(indices))
}

/// Scales every position component by an independent draw from
/// `low..high`, then recomputes smooth normals. Turns tidy spheres into
/// lumpy boulders.
pub fn deform_vertices(mesh: &mut Mesh, rng: &mut impl Rng, low: f32, high: f32) {
    if let Some(VertexAttributeValues::Float32x3(positions)) =
        mesh.attribute_mut(Mesh::ATTRIBUTE_POSITION)
    {
        for position in positions.iter_mut() {
            for component in position.iter_mut() {
                *component *= rng.gen_range(low..high);
            }
        }
    }
    mesh.compute_smooth_normals();
}

/// Writes a vertex-color gradient keyed on the view direction height,
/// matching a horizon-to-zenith sky blend: `t = max(dir.y, 0) ^ exponent`
/// where `dir` points from `(0, -offset, 0)` through the vertex.
pub fn paint_sky_gradient(mesh: &mut Mesh, bottom: Color, top: Color, offset: f32, exponent: f32) {
    let bottom = bottom.to_linear();
    let top = top.to_linear();
    let Some(positions) = mesh
        .attribute(Mesh::ATTRIBUTE_POSITION)
        .and_then(VertexAttributeValues::as_float3)
    else {
        return;
    };

    let colors: Vec<[f32; 4]> = positions
        .iter()
        .map(|&[x, y, z]| {
            let dir = Vec3::new(x, y + offset, z).normalize_or_zero();
            let t = dir.y.max(0.0).powf(exponent);
            [
                bottom.red + (top.red - bottom.red) * t,
                bottom.green + (top.green - bottom.green) * t,
                bottom.blue + (top.blue - bottom.blue) * t,
                1.0,
            ]
        })
        .collect();
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, colors);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn positions(mesh: &Mesh) -> &[[f32; 3]] {
        mesh.attribute(Mesh::ATTRIBUTE_POSITION)
            .and_then(VertexAttributeValues::as_float3)
            .unwrap()
    }

    #[test]
    fn grid_is_row_major_and_matches_rule() {
        let mesh = displaced_grid(4.0, 10.0, 2, 5, |x, d| Vec3::new(x, d * 2.0, -d)).unwrap();
        let positions = positions(&mesh);
        assert_eq!(positions.len(), 3 * 6);

        // Row 2, column 0: x spans [-2, 2], d = 2/5 of the length.
        let [x, y, z] = positions[2 * 3];
        assert_eq!(x, -2.0);
        assert_eq!(y, 8.0);
        assert_eq!(z, -4.0);
    }

    #[test]
    fn grid_rejects_degenerate_dimensions() {
        assert!(displaced_grid(4.0, 10.0, 0, 5, |x, d| Vec3::new(x, 0.0, -d)).is_err());
        assert!(displaced_grid(-1.0, 10.0, 2, 5, |x, d| Vec3::new(x, 0.0, -d)).is_err());
        assert!(displaced_grid(4.0, f32::NAN, 2, 5, |x, d| Vec3::new(x, 0.0, -d)).is_err());
    }

    #[test]
    fn flat_grid_normals_point_up() {
        let mesh = displaced_grid(10.0, 10.0, 4, 4, |x, d| Vec3::new(x, 0.0, -d)).unwrap();
        let Some(VertexAttributeValues::Float32x3(normals)) =
            mesh.attribute(Mesh::ATTRIBUTE_NORMAL)
        else {
            panic!("grid should carry normals");
        };
        for normal in normals {
            assert!((Vec3::from_array(*normal) - Vec3::Y).length() < 1e-4);
        }
    }

    #[test]
    fn frustum_vertex_and_triangle_counts() {
        let mesh = frustum(0.5, 0.5, 2.0, 8);
        // Two side rings of 9, plus two caps of 10.
        assert_eq!(positions(&mesh).len(), 18 + 10 + 10);
        let Some(Indices::U32(indices)) = mesh.indices() else {
            panic!("expected u32 indices");
        };
        assert_eq!(indices.len(), 8 * 6 + 8 * 3 * 2);
    }

    #[test]
    fn cone_skips_the_degenerate_cap() {
        let mesh = cone(0.3, 1.0, 8);
        // Side rings only, plus the bottom cap.
        assert_eq!(positions(&mesh).len(), 18 + 10);
    }

    #[test]
    fn frustum_normals_are_unit_length() {
        let mesh = frustum(0.2, 0.4, 1.5, 12);
        let Some(VertexAttributeValues::Float32x3(normals)) =
            mesh.attribute(Mesh::ATTRIBUTE_NORMAL)
        else {
            panic!("frustum should carry normals");
        };
        for normal in normals {
            assert!((Vec3::from_array(*normal).length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn uv_sphere_sits_on_its_radius() {
        let mesh = uv_sphere(2.5, 8, 6);
        for &p in positions(&mesh) {
            assert!((Vec3::from_array(p).length() - 2.5).abs() < 1e-4);
        }
    }

    #[test]
    fn deform_stays_within_scale_bounds() {
        let mut mesh = uv_sphere(1.0, 8, 6);
        let before: Vec<[f32; 3]> = positions(&mesh).to_vec();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        deform_vertices(&mut mesh, &mut rng, 0.8, 1.2);
        let after = positions(&mesh);
        for (b, a) in before.iter().zip(after) {
            for i in 0..3 {
                assert!(a[i].abs() <= b[i].abs() * 1.2 + 1e-6);
                assert!(a[i].abs() >= b[i].abs() * 0.8 - 1e-6);
            }
        }
    }

    #[test]
    fn sky_gradient_hits_both_ends() {
        let bottom = Color::srgb_u8(0x89, 0xcf, 0xf0);
        let top = Color::srgb_u8(0x00, 0x77, 0xff);
        let mut mesh = uv_sphere(500.0, 8, 8);
        paint_sky_gradient(&mut mesh, bottom, top, 33.0, 0.6);

        let Some(VertexAttributeValues::Float32x4(colors)) =
            mesh.attribute(Mesh::ATTRIBUTE_COLOR)
        else {
            panic!("sky dome should carry vertex colors");
        };
        let verts = positions(&mesh);

        let top_linear = top.to_linear();
        let bottom_linear = bottom.to_linear();
        for (p, c) in verts.iter().zip(colors) {
            if p[1] >= 499.9 {
                assert!((c[0] - top_linear.red).abs() < 1e-3);
                assert!((c[2] - top_linear.blue).abs() < 1e-3);
            }
            if p[1] < -40.0 {
                // Below the horizon the blend factor clamps to zero.
                assert!((c[0] - bottom_linear.red).abs() < 1e-3);
                assert!((c[1] - bottom_linear.green).abs() < 1e-3);
            }
        }
    }
}
