//! Standard PBR material

use super::Side;
use crate::assets::TextureHandle;
use crate::math::Color;

/// Metallic-roughness material
#[derive(Clone, Debug, PartialEq)]
pub struct StandardMaterial {
    /// Base color (albedo)
    pub color: Color,
    /// Albedo texture map
    pub map: Option<TextureHandle>,
    /// Metalness factor (0.0 = dielectric, 1.0 = metal)
    pub metalness: f32,
    /// Roughness factor (0.0 = smooth/mirror, 1.0 = rough)
    pub roughness: f32,
    /// Emissive color
    pub emissive: Color,
    /// Opacity
    pub opacity: f32,
    /// Transparent
    pub transparent: bool,
    /// Which side to render
    pub side: Side,
    /// Environment (ambient radiance) contribution
    pub env_map_intensity: f32,
}

impl Default for StandardMaterial {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            map: None,
            metalness: 0.0,
            roughness: 1.0,
            emissive: Color::BLACK,
            opacity: 1.0,
            transparent: false,
            side: Side::Front,
            env_map_intensity: 1.0,
        }
    }
}

impl StandardMaterial {
    /// Create a new standard material
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with color
    pub fn with_color(color: Color) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    pub fn roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness.clamp(0.0, 1.0);
        self
    }

    pub fn metalness(mut self, metalness: f32) -> Self {
        self.metalness = metalness.clamp(0.0, 1.0);
        self
    }

    /// Set opacity; values below 1 make the material transparent
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self.transparent = self.opacity < 1.0;
        self
    }

    pub fn side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }
}
