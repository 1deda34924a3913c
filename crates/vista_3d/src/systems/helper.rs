//! Light helper line regeneration

use crate::ecs::{System, SystemContext, SystemStage, World};
use crate::geometry::LineSegments;
use crate::lights::{world_position, CameraHelper, DirectionalLight, SpotLight, SpotLightHelper};

/// Rebuilds the world-space lines of every [`CameraHelper`] and
/// [`SpotLightHelper`] from the current light state
pub struct HelperSystem;

impl HelperSystem {
    pub fn update(world: &mut World) {
        for entity in world.entities_with::<CameraHelper>() {
            let Some(light_entity) = world.get::<CameraHelper>(entity).map(|h| h.light) else {
                continue;
            };
            let Some(light) = world.get::<DirectionalLight>(light_entity).cloned() else {
                continue;
            };
            let position = world_position(world, light_entity);
            let mut lines = world.take::<LineSegments>(entity).unwrap_or_default();
            CameraHelper::rebuild(&mut lines, &light, position);
            world.insert(entity, lines);
        }

        for entity in world.entities_with::<SpotLightHelper>() {
            let Some(helper) = world.get::<SpotLightHelper>(entity).cloned() else {
                continue;
            };
            let Some(light) = world.get::<SpotLight>(helper.light).cloned() else {
                continue;
            };
            let position = world_position(world, helper.light);
            let mut lines = world.take::<LineSegments>(entity).unwrap_or_default();
            helper.rebuild(&mut lines, &light, position);
            world.insert(entity, lines);
        }
    }
}

impl System for HelperSystem {
    fn run(&mut self, ctx: &mut SystemContext) {
        Self::update(ctx.world);
    }

    fn name(&self) -> &'static str {
        "HelperSystem"
    }

    fn stage(&self) -> SystemStage {
        SystemStage::PreRender
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Object3D;
    use crate::systems::TransformSystem;

    #[test]
    fn test_helpers_get_lines() {
        let mut world = World::new();
        let sun = world
            .spawn()
            .insert(Object3D::at(20.0, 20.0, 20.0))
            .insert(DirectionalLight::default().with_shadows())
            .id();
        let spot = world
            .spawn()
            .insert(Object3D::at(-100.0, 100.0, 0.0))
            .insert(SpotLight::default().angle(0.2))
            .id();
        let cam_helper = world.spawn().insert(Object3D::new()).insert(CameraHelper::new(sun)).id();
        let spot_helper = world
            .spawn()
            .insert(Object3D::new())
            .insert(SpotLightHelper::new(spot))
            .id();

        TransformSystem::update(&mut world);
        HelperSystem::update(&mut world);

        assert!(world.get::<LineSegments>(cam_helper).map_or(0, |l| l.segment_count()) > 0);
        assert!(world.get::<LineSegments>(spot_helper).map_or(0, |l| l.segment_count()) > 0);

        // a despawned light leaves the helper's last lines alone
        world.despawn(spot);
        HelperSystem::update(&mut world);
        assert!(world.has::<LineSegments>(spot_helper));
    }
}
