//! Per-frame motion: spinning and orbiting

use crate::ecs::{Component, System, SystemContext};
use crate::scene::Object3D;

/// Rotation added every frame about the local axes (radians per frame)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Spin {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Component for Spin {}

impl Spin {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn y(y: f32) -> Self {
        Self::new(0.0, y, 0.0)
    }
}

pub struct SpinSystem;

impl System for SpinSystem {
    fn run(&mut self, ctx: &mut SystemContext) {
        for entity in ctx.world.entities_with::<Spin>() {
            let Some(spin) = ctx.world.get::<Spin>(entity).copied() else {
                continue;
            };
            if let Some(object) = ctx.world.get_mut::<Object3D>(entity) {
                if spin.x != 0.0 {
                    object.rotate_x(spin.x);
                }
                if spin.y != 0.0 {
                    object.rotate_y(spin.y);
                }
                if spin.z != 0.0 {
                    object.rotate_z(spin.z);
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        "SpinSystem"
    }
}

/// Circular path in the XZ plane around the origin
///
/// Position is `(sin(t)·radius, height, cos(t)·radius)` with
/// `t = elapsed milliseconds × speed`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitAround {
    pub radius: f32,
    pub speed: f32,
    pub height: f32,
}

impl Component for OrbitAround {}

impl OrbitAround {
    pub fn position_at(&self, elapsed_ms: f32) -> glam::Vec3 {
        let t = elapsed_ms * self.speed;
        glam::Vec3::new(t.sin() * self.radius, self.height, t.cos() * self.radius)
    }
}

pub struct OrbitAroundSystem;

impl System for OrbitAroundSystem {
    fn run(&mut self, ctx: &mut SystemContext) {
        let elapsed_ms = ctx.elapsed_time * 1000.0;
        for entity in ctx.world.entities_with::<OrbitAround>() {
            let Some(orbit) = ctx.world.get::<OrbitAround>(entity).copied() else {
                continue;
            };
            if let Some(object) = ctx.world.get_mut::<Object3D>(entity) {
                object.position = orbit.position_at(elapsed_ms);
            }
        }
    }

    fn name(&self) -> &'static str {
        "OrbitAroundSystem"
    }

    fn priority(&self) -> i32 {
        10
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{Schedule, World};
    use glam::{EulerRot, Vec3};

    #[test]
    fn test_spin_is_per_frame() {
        let mut world = World::new();
        let cube = world
            .spawn()
            .insert(Object3D::new())
            .insert(Spin::y(0.01))
            .id();
        let mut schedule = Schedule::new().with_system(SpinSystem);
        // delta time does not scale the increment
        schedule.run(&mut world, 0.5, 0.5, 0);
        schedule.run(&mut world, 0.001, 0.501, 1);
        let rot = world.get::<Object3D>(cube).map(|o| o.rotation).unwrap_or_default();
        let (y, _, _) = rot.to_euler(EulerRot::YXZ);
        assert!((y - 0.02).abs() < 1e-5);
    }

    #[test]
    fn test_orbit_position() {
        let orbit = OrbitAround {
            radius: 20.0,
            speed: 0.0005,
            height: 20.0,
        };
        assert_eq!(orbit.position_at(0.0), Vec3::new(0.0, 20.0, 20.0));
        let p = orbit.position_at(std::f32::consts::PI * 1000.0);
        assert!((p - Vec3::new(20.0, 20.0, 0.0)).length() < 1e-3);

        let mut world = World::new();
        let sun = world.spawn().insert(Object3D::at(20.0, 20.0, 20.0)).insert(orbit).id();
        let mut schedule = Schedule::new().with_system(OrbitAroundSystem);
        schedule.run(&mut world, 0.016, 0.0, 0);
        assert_eq!(world.get::<Object3D>(sun).map(|o| o.position), Some(Vec3::new(0.0, 20.0, 20.0)));
    }
}
