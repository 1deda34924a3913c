//! Basic unlit material

use super::Side;
use crate::assets::TextureHandle;
use crate::math::Color;

/// Unlit material: flat color, no lighting or shadows
#[derive(Clone, Debug, PartialEq)]
pub struct BasicMaterial {
    pub color: Color,
    pub map: Option<TextureHandle>,
    pub opacity: f32,
    pub transparent: bool,
    pub side: Side,
}

impl Default for BasicMaterial {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            map: None,
            opacity: 1.0,
            transparent: false,
            side: Side::Front,
        }
    }
}

impl BasicMaterial {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_color(color: Color) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    pub fn side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }
}
