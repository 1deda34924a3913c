//! Spot light

use super::shadow::light_view;
use super::{Light, ShadowCamera};
use crate::ecs::Component;
use crate::math::Color;
use glam::{Mat4, Vec3};
use std::f32::consts::FRAC_PI_2;

/// Cone-shaped light from the entity's position toward `target`
#[derive(Clone, Debug, PartialEq)]
pub struct SpotLight {
    /// Light color
    pub color: Color,
    /// Light intensity
    pub intensity: f32,
    /// Range; 0 means unlimited
    pub distance: f32,
    /// Half-angle of the cone in radians, at most π/2
    pub angle: f32,
    /// Fraction of the cone that fades out (0..1)
    pub penumbra: f32,
    /// Falloff exponent over `distance`
    pub decay: f32,
    /// Whether this light casts shadows
    pub cast_shadows: bool,
    /// Shadow camera (near, far, map size, bias)
    pub shadow: ShadowCamera,
    /// World-space point the cone points at
    pub target: Vec3,
}

impl Component for SpotLight {}

impl Default for SpotLight {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            intensity: 1.0,
            distance: 0.0,
            angle: std::f32::consts::FRAC_PI_3,
            penumbra: 0.0,
            decay: 2.0,
            cast_shadows: false,
            shadow: ShadowCamera::default(),
            target: Vec3::ZERO,
        }
    }
}

impl SpotLight {
    pub fn new(color: Color, intensity: f32) -> Self {
        Self {
            color,
            intensity,
            ..Default::default()
        }
    }

    /// Set the cone half-angle, clamped to (0, π/2]
    pub fn angle(mut self, angle: f32) -> Self {
        self.angle = angle.clamp(1e-4, FRAC_PI_2);
        self
    }

    pub fn penumbra(mut self, penumbra: f32) -> Self {
        self.penumbra = penumbra.clamp(0.0, 1.0);
        self
    }

    pub fn distance(mut self, distance: f32) -> Self {
        self.distance = distance.max(0.0);
        self
    }

    /// Enable shadow casting
    pub fn with_shadows(mut self) -> Self {
        self.cast_shadows = true;
        self
    }

    pub fn with_target(mut self, target: Vec3) -> Self {
        self.target = target;
        self
    }

    /// Cosine where the cone starts fading
    pub fn inner_cone_cos(&self) -> f32 {
        (self.angle * (1.0 - self.penumbra)).cos()
    }

    /// Cosine of the cone edge
    pub fn outer_cone_cos(&self) -> f32 {
        self.angle.min(FRAC_PI_2).cos()
    }

    pub fn direction(&self, position: Vec3) -> Vec3 {
        let dir = (self.target - position).normalize_or_zero();
        if dir == Vec3::ZERO {
            Vec3::NEG_Y
        } else {
            dir
        }
    }

    /// Perspective shadow view-projection covering the cone
    pub fn shadow_matrix(&self, position: Vec3) -> Mat4 {
        let far = if self.distance > 0.0 {
            self.distance
        } else {
            self.shadow.far
        };
        let fov = (self.angle * 2.0).clamp(1e-3, std::f32::consts::PI - 1e-3);
        let proj = Mat4::perspective_rh(fov, 1.0, self.shadow.near, far);
        proj * light_view(position, position + self.direction(position))
    }
}

impl Light for SpotLight {
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
    fn test_angle_clamped() {
        let spot = SpotLight::default().angle(3.0);
        assert_eq!(spot.angle, FRAC_PI_2);
        let spot = SpotLight::default().angle(0.2);
        assert!((spot.outer_cone_cos() - 0.2f32.cos()).abs() < 1e-6);
        assert_eq!(spot.inner_cone_cos(), spot.outer_cone_cos());
    }

    #[test]
    fn test_shadow_matrix_centers_target() {
        let spot = SpotLight::default().angle(0.2);
        let pos = Vec3::new(-100.0, 100.0, 0.0);
        let p = spot.shadow_matrix(pos).project_point3(Vec3::ZERO);
        assert!(p.x.abs() < 1e-4 && p.y.abs() < 1e-4);
        assert!(p.z > 0.0 && p.z < 1.0);
    }
}
