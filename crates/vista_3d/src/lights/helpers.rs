//! Wireframe helpers for lights
//!
//! Helper entities carry a [`LineSegments`] component that `HelperSystem`
//! rebuilds every frame in world space from the light they follow.

use super::{DirectionalLight, SpotLight};
use crate::ecs::{Component, Entity};
use crate::geometry::LineSegments;
use crate::math::Color;
use glam::{Mat4, Vec3};

/// Draws the shadow frustum of a directional light
#[derive(Clone, Debug, PartialEq)]
pub struct CameraHelper {
    pub light: Entity,
}

impl Component for CameraHelper {}

/// Draws the cone of a spot light
#[derive(Clone, Debug, PartialEq)]
pub struct SpotLightHelper {
    pub light: Entity,
    /// Line color; the light's color when unset
    pub color: Option<Color>,
}

impl Component for SpotLightHelper {}

const FRUSTUM_COLOR: Color = Color::rgb(1.0, 0.67, 0.0);
const CONE_SEGMENTS: usize = 32;

impl CameraHelper {
    pub fn new(light: Entity) -> Self {
        Self { light }
    }

    /// Rebuild `lines` from a light at `position`
    pub fn rebuild(lines: &mut LineSegments, light: &DirectionalLight, position: Vec3) {
        lines.clear();
        let corners = frustum_corners(&light.shadow_matrix(position));
        // near ring, far ring, connecting edges
        for i in 0..4 {
            let j = (i + 1) % 4;
            lines.push(corners[i], corners[j], FRUSTUM_COLOR);
            lines.push(corners[i + 4], corners[j + 4], FRUSTUM_COLOR);
            lines.push(corners[i], corners[i + 4], FRUSTUM_COLOR);
        }
        lines.push(position, light.target, Color::WHITE);
    }
}

impl SpotLightHelper {
    pub fn new(light: Entity) -> Self {
        Self { light, color: None }
    }

    /// Rebuild `lines` from a light at `position`
    pub fn rebuild(&self, lines: &mut LineSegments, light: &SpotLight, position: Vec3) {
        lines.clear();
        let color = self.color.unwrap_or(light.color);
        let dir = light.direction(position);
        let length = if light.distance > 0.0 {
            light.distance
        } else {
            (light.target - position).length().max(1.0)
        };
        let radius = length * light.angle.tan();
        let base = position + dir * length;
        let (u, v) = dir.any_orthonormal_pair();

        let rim: Vec<Vec3> = (0..CONE_SEGMENTS)
            .map(|i| {
                let a = i as f32 / CONE_SEGMENTS as f32 * std::f32::consts::TAU;
                base + (u * a.cos() + v * a.sin()) * radius
            })
            .collect();
        for i in 0..CONE_SEGMENTS {
            lines.push(rim[i], rim[(i + 1) % CONE_SEGMENTS], color);
        }
        for i in (0..CONE_SEGMENTS).step_by(CONE_SEGMENTS / 4) {
            lines.push(position, rim[i], color);
        }
        lines.push(position, base, color);
    }
}

/// World-space corners of a view-projection's clip volume (near ring first)
fn frustum_corners(view_projection: &Mat4) -> [Vec3; 8] {
    let inv = view_projection.inverse();
    let ndc = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];
    let mut out = [Vec3::ZERO; 8];
    for (k, z) in [0.0, 1.0].into_iter().enumerate() {
        for (i, (x, y)) in ndc.iter().enumerate() {
            out[k * 4 + i] = inv.project_point3(Vec3::new(*x, *y, z));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::World;

    #[test]
    fn test_camera_helper_lines() {
        let mut light = DirectionalLight::default();
        light.shadow.enlarge(25.0);
        let mut lines = LineSegments::default();
        CameraHelper::rebuild(&mut lines, &light, Vec3::splat(20.0));
        assert_eq!(lines.segment_count(), 13);
        // far ring lies `shadow.far` units down the light direction
        let pos = Vec3::splat(20.0);
        let far = Vec3::from_array(lines.vertices[2].position);
        let depth = (far - pos).dot(light.direction(pos));
        assert!((depth - light.shadow.far).abs() < 0.1);
    }

    #[test]
    fn test_spot_helper_cone() {
        let mut world = World::new();
        let e = world.spawn().id();
        let light = SpotLight::default().angle(0.2);
        let helper = SpotLightHelper::new(e);
        let mut lines = LineSegments::default();
        let pos = Vec3::new(-100.0, 100.0, 0.0);
        helper.rebuild(&mut lines, &light, pos);
        assert_eq!(lines.segment_count(), CONE_SEGMENTS + 4 + 1);

        let apex_to_rim = Vec3::from_array(lines.vertices[1].position) - pos;
        let axis = light.direction(pos);
        let angle = apex_to_rim.normalize().dot(axis).acos();
        assert!((angle - 0.2).abs() < 1e-3);
    }
}
