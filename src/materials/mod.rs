//! Shorthand constructors for the handful of material shapes the scene
//! uses over and over.

use bevy::prelude::*;

/// Opaque lit surface with explicit metallic/roughness.
pub fn tinted(color: Color, metallic: f32, roughness: f32) -> StandardMaterial {
    StandardMaterial {
        base_color: color,
        metallic,
        perceptual_roughness: roughness,
        ..default()
    }
}

/// Like [`tinted`] with an emissive term, for parts that should read even
/// in shadow (irises, lane paint, tail feathers).
pub fn glowing(
    color: Color,
    metallic: f32,
    roughness: f32,
    emissive: LinearRgba,
) -> StandardMaterial {
    StandardMaterial {
        emissive,
        ..tinted(color, metallic, roughness)
    }
}

/// Flat unlit color, for highlights and the sun disc.
pub fn unlit(color: Color) -> StandardMaterial {
    StandardMaterial {
        base_color: color,
        unlit: true,
        ..default()
    }
}

/// Unlit and alpha-blended, for trails, dust, and burst particles.
pub fn unlit_translucent(color: Color, alpha: f32) -> StandardMaterial {
    StandardMaterial {
        base_color: color.with_alpha(alpha),
        unlit: true,
        alpha_mode: AlphaMode::Blend,
        ..default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translucent_carries_its_alpha() {
        let material = unlit_translucent(Color::srgb_u8(0x00, 0xaa, 0xff), 0.7);
        assert_eq!(material.base_color.alpha(), 0.7);
        assert!(matches!(material.alpha_mode, AlphaMode::Blend));
        assert!(material.unlit);
    }

    #[test]
    fn glowing_keeps_the_surface_params() {
        let material = glowing(
            Color::srgb(1.0, 1.0, 0.0),
            0.4,
            0.4,
            Color::srgb(1.0, 1.0, 0.0).to_linear() * 0.15,
        );
        assert_eq!(material.metallic, 0.4);
        assert!(material.emissive.red > 0.0);
        assert!(!material.unlit);
    }
}
