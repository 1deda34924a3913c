//! Ambient light

use super::Light;
use crate::ecs::Component;
use crate::math::Color;

/// Ambient light providing uniform illumination
///
/// Lights every lit surface equally; position is irrelevant.
#[derive(Clone, Debug, PartialEq)]
pub struct AmbientLight {
    /// Light color
    pub color: Color,
    /// Light intensity
    pub intensity: f32,
}

impl Component for AmbientLight {}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            intensity: 1.0,
        }
    }
}

impl AmbientLight {
    /// Create a new ambient light
    pub fn new(color: Color, intensity: f32) -> Self {
        Self { color, intensity }
    }

    /// Create from a hex color at full intensity
    pub fn from_hex(hex: u32) -> Self {
        Self::new(Color::from_hex(hex), 1.0)
    }
}

impl Light for AmbientLight {
    fn color(&self) -> Color {
        self.color
    }

    fn intensity(&self) -> f32 {
        self.intensity
    }
}
