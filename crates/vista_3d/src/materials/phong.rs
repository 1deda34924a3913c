//! Blinn-Phong material

use super::Side;
use crate::assets::TextureHandle;
use crate::math::Color;

/// Classic shading with a specular highlight
#[derive(Clone, Debug, PartialEq)]
pub struct PhongMaterial {
    /// Diffuse color
    pub color: Color,
    pub map: Option<TextureHandle>,
    /// Specular color
    pub specular: Color,
    /// Specular exponent
    pub shininess: f32,
    pub emissive: Color,
    pub opacity: f32,
    pub transparent: bool,
    pub side: Side,
}

impl Default for PhongMaterial {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            map: None,
            specular: Color::from_hex(0x111111),
            shininess: 30.0,
            emissive: Color::BLACK,
            opacity: 1.0,
            transparent: false,
            side: Side::Front,
        }
    }
}

impl PhongMaterial {
    pub fn with_color(color: Color) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    pub fn shininess(mut self, shininess: f32) -> Self {
        self.shininess = shininess.max(0.0);
        self
    }
}
