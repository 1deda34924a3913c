//! Lighting system
//!
//! Light components, shadow cameras, wireframe helpers, and the uniform
//! block the renderer feeds to its lit shaders.

mod ambient;
mod directional;
mod helpers;
mod shadow;
mod spot;

pub use ambient::AmbientLight;
pub use directional::DirectionalLight;
pub use helpers::{CameraHelper, SpotLightHelper};
pub use shadow::ShadowCamera;
pub use spot::SpotLight;

use crate::ecs::{Entity, World};
use crate::math::Color;
use crate::scene::{GlobalTransform, Object3D};
use glam::{Mat4, Vec3};

/// Common surface of every light component
pub trait Light: Send + Sync {
    /// sRGB color
    fn color(&self) -> Color;

    fn intensity(&self) -> f32;

    /// Linear color premultiplied by intensity
    fn radiance(&self) -> [f32; 3] {
        let c = self.color().to_linear().scaled(self.intensity());
        [c.r, c.g, c.b]
    }
}

pub const MAX_DIRECTIONAL_LIGHTS: usize = 4;
pub const MAX_SPOT_LIGHTS: usize = 4;

/// Shadow map layer used by the first shadow-casting directional light
pub const DIRECTIONAL_SHADOW_LAYER: usize = 0;
/// Shadow map layer used by the first shadow-casting spot light
pub const SPOT_SHADOW_LAYER: usize = 1;
pub const SHADOW_LAYERS: usize = 2;

/// Packed directional light (`w` of `color` is the shadow layer or -1)
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DirectionalLightUniform {
    pub direction: [f32; 4],
    pub color: [f32; 4],
}

/// Packed spot light
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpotLightUniform {
    /// xyz position, w distance (0 = unlimited)
    pub position: [f32; 4],
    /// xyz direction, w outer cone cosine
    pub direction: [f32; 4],
    /// rgb radiance, w shadow layer or -1
    pub color: [f32; 4],
    /// x inner cone cosine, y decay
    pub params: [f32; 4],
}

/// Lighting block shared by every lit draw
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniforms {
    /// rgb ambient sum
    pub ambient: [f32; 4],
    /// x directional count, y spot count
    pub counts: [u32; 4],
    pub directional: [DirectionalLightUniform; MAX_DIRECTIONAL_LIGHTS],
    pub spot: [SpotLightUniform; MAX_SPOT_LIGHTS],
    pub shadow_matrices: [[[f32; 4]; 4]; SHADOW_LAYERS],
    /// bias per layer
    pub shadow_bias: [f32; 4],
    /// 1 when a layer is in use
    pub shadow_enabled: [u32; 4],
}

impl Default for LightUniforms {
    fn default() -> Self {
        Self {
            ambient: [0.0; 4],
            counts: [0; 4],
            directional: [DirectionalLightUniform::default(); MAX_DIRECTIONAL_LIGHTS],
            spot: [SpotLightUniform::default(); MAX_SPOT_LIGHTS],
            shadow_matrices: [Mat4::IDENTITY.to_cols_array_2d(); SHADOW_LAYERS],
            shadow_bias: [0.0; 4],
            shadow_enabled: [0; 4],
        }
    }
}

/// World-space position of an entity: its global transform when computed,
/// its local position otherwise
pub fn world_position(world: &World, entity: Entity) -> Vec3 {
    if let Some(global) = world.get::<GlobalTransform>(entity) {
        return global.translation();
    }
    world
        .get::<Object3D>(entity)
        .map(|o| o.position)
        .unwrap_or(Vec3::ZERO)
}

impl LightUniforms {
    /// Pack the lights of `world`
    ///
    /// Extra lights past the per-type limit are ignored. Shadows are taken
    /// from the first casting light of each type. Lights on hidden entities
    /// are skipped.
    pub fn collect(world: &World) -> Self {
        let mut out = Self::default();
        let shadows_allowed = world
            .resource::<ShadowSettings>()
            .map_or(true, |s| s.enabled);

        let mut ambient = [0.0f32; 3];
        for (entity, light) in world.query::<&AmbientLight>().iter() {
            if !is_visible(world, entity) {
                continue;
            }
            let r = light.radiance();
            for i in 0..3 {
                ambient[i] += r[i];
            }
        }
        out.ambient = [ambient[0], ambient[1], ambient[2], 0.0];

        let mut count = 0;
        for (entity, light) in world.query::<&DirectionalLight>().iter() {
            if count == MAX_DIRECTIONAL_LIGHTS || !is_visible(world, entity) {
                continue;
            }
            let position = world_position(world, entity);
            let mut layer = -1.0;
            if shadows_allowed && light.cast_shadows && out.shadow_enabled[DIRECTIONAL_SHADOW_LAYER] == 0 {
                layer = DIRECTIONAL_SHADOW_LAYER as f32;
                out.set_shadow(DIRECTIONAL_SHADOW_LAYER, light.shadow_matrix(position), light.shadow.bias);
            }
            let [r, g, b] = light.radiance();
            out.directional[count] = DirectionalLightUniform {
                direction: light.direction(position).extend(0.0).to_array(),
                color: [r, g, b, layer],
            };
            count += 1;
        }
        out.counts[0] = count as u32;

        let mut count = 0;
        for (entity, light) in world.query::<&SpotLight>().iter() {
            if count == MAX_SPOT_LIGHTS || !is_visible(world, entity) {
                continue;
            }
            let position = world_position(world, entity);
            let mut layer = -1.0;
            if shadows_allowed && light.cast_shadows && out.shadow_enabled[SPOT_SHADOW_LAYER] == 0 {
                layer = SPOT_SHADOW_LAYER as f32;
                out.set_shadow(SPOT_SHADOW_LAYER, light.shadow_matrix(position), light.shadow.bias);
            }
            let [r, g, b] = light.radiance();
            out.spot[count] = SpotLightUniform {
                position: position.extend(light.distance).to_array(),
                direction: light.direction(position).extend(light.outer_cone_cos()).to_array(),
                color: [r, g, b, layer],
                params: [light.inner_cone_cos(), light.decay, 0.0, 0.0],
            };
            count += 1;
        }
        out.counts[1] = count as u32;

        out
    }

    fn set_shadow(&mut self, layer: usize, matrix: Mat4, bias: f32) {
        self.shadow_matrices[layer] = matrix.to_cols_array_2d();
        self.shadow_bias[layer] = bias;
        self.shadow_enabled[layer] = 1;
    }

    /// Light-space matrix of a shadow layer, if a light uses it
    pub fn shadow_view(&self, layer: usize) -> Option<Mat4> {
        if layer >= SHADOW_LAYERS || self.shadow_enabled[layer] == 0 {
            return None;
        }
        Some(Mat4::from_cols_array_2d(&self.shadow_matrices[layer]))
    }

    pub fn directional_count(&self) -> usize {
        self.counts[0] as usize
    }

    pub fn spot_count(&self) -> usize {
        self.counts[1] as usize
    }
}

/// Global shadow switch, stored as a world resource
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowSettings {
    pub enabled: bool,
}

impl Default for ShadowSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

fn is_visible(world: &World, entity: Entity) -> bool {
    match world.get::<GlobalTransform>(entity) {
        Some(global) => global.visible,
        None => world.get::<Object3D>(entity).map_or(true, |o| o.visible),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit_world() -> World {
        let mut world = World::new();
        world
            .spawn()
            .insert(Object3D::at(0.0, 0.0, 10.0))
            .insert(AmbientLight::from_hex(0x404040));
        let mut sun = DirectionalLight::new(Color::WHITE, 1.0).with_shadows();
        sun.shadow.enlarge(25.0);
        world
            .spawn()
            .insert(Object3D::at(20.0, 20.0, 20.0))
            .insert(sun);
        world
            .spawn()
            .insert(Object3D::at(-100.0, 100.0, 0.0))
            .insert(SpotLight::new(Color::WHITE, 1.0).angle(0.2).with_shadows());
        world
    }

    #[test]
    fn test_collect_counts_and_layers() {
        let world = lit_world();
        let u = LightUniforms::collect(&world);
        assert_eq!(u.directional_count(), 1);
        assert_eq!(u.spot_count(), 1);
        assert_eq!(u.directional[0].color[3], DIRECTIONAL_SHADOW_LAYER as f32);
        assert_eq!(u.spot[0].color[3], SPOT_SHADOW_LAYER as f32);
        assert!(u.shadow_view(0).is_some());
        assert!(u.shadow_view(1).is_some());
        assert!(u.shadow_view(2).is_none());

        let expected = Color::from_hex(0x404040).to_linear().r;
        assert!((u.ambient[0] - expected).abs() < 1e-6);
    }

    #[test]
    fn test_shadow_settings_disable_layers() {
        let mut world = lit_world();
        world.insert_resource(ShadowSettings { enabled: false });
        let u = LightUniforms::collect(&world);
        assert!(u.shadow_view(0).is_none());
        assert_eq!(u.directional[0].color[3], -1.0);
    }

    #[test]
    fn test_limits_and_hidden_lights() {
        let mut world = World::new();
        for _ in 0..6 {
            world.spawn().insert(Object3D::new()).insert(DirectionalLight::default());
        }
        world
            .spawn()
            .insert(Object3D::new().with_visible(false))
            .insert(SpotLight::default());
        let u = LightUniforms::collect(&world);
        assert_eq!(u.directional_count(), MAX_DIRECTIONAL_LIGHTS);
        assert_eq!(u.spot_count(), 0);
    }

    #[test]
    fn test_uniform_size_is_aligned() {
        assert_eq!(std::mem::size_of::<LightUniforms>() % 16, 0);
    }
}
