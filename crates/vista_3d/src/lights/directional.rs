//! Directional light

use super::{Light, ShadowCamera};
use crate::ecs::Component;
use crate::math::Color;
use glam::{Mat4, Vec3};

/// Directional light (like sunlight)
///
/// Emits parallel rays from the entity's position toward `target`. The
/// position only matters for the direction and the shadow camera.
#[derive(Clone, Debug, PartialEq)]
pub struct DirectionalLight {
    /// Light color
    pub color: Color,
    /// Light intensity
    pub intensity: f32,
    /// Whether this light casts shadows
    pub cast_shadows: bool,
    /// Shadow camera
    pub shadow: ShadowCamera,
    /// World-space point the light shines at
    pub target: Vec3,
}

impl Component for DirectionalLight {}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            intensity: 1.0,
            cast_shadows: false,
            shadow: ShadowCamera::default(),
            target: Vec3::ZERO,
        }
    }
}

impl DirectionalLight {
    /// Create a new directional light
    pub fn new(color: Color, intensity: f32) -> Self {
        Self {
            color,
            intensity,
            ..Default::default()
        }
    }

    /// Enable shadow casting
    pub fn with_shadows(mut self) -> Self {
        self.cast_shadows = true;
        self
    }

    pub fn with_shadow_camera(mut self, shadow: ShadowCamera) -> Self {
        self.shadow = shadow;
        self
    }

    pub fn with_target(mut self, target: Vec3) -> Self {
        self.target = target;
        self
    }

    /// Direction the rays travel, for a light at `position`
    pub fn direction(&self, position: Vec3) -> Vec3 {
        let dir = (self.target - position).normalize_or_zero();
        if dir == Vec3::ZERO {
            Vec3::NEG_Y
        } else {
            dir
        }
    }

    /// Shadow view-projection for a light at `position`
    pub fn shadow_matrix(&self, position: Vec3) -> Mat4 {
        self.shadow.view_projection(position, self.target)
    }
}

impl Light for DirectionalLight {
    fn color(&self) -> Color {
        self.color
    }

    fn intensity(&self) -> f32 {
        self.intensity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction() {
        let light = DirectionalLight::default();
        let d = light.direction(Vec3::splat(20.0));
        assert!((d - Vec3::splat(-1.0).normalize()).length() < 1e-6);
        assert_eq!(light.direction(Vec3::ZERO), Vec3::NEG_Y);
    }
}
