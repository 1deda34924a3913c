//! Transform hierarchy system

use crate::ecs::{Entity, System, SystemContext, SystemStage, World};
use crate::scene::{GlobalTransform, Object3D};
use glam::Mat4;

/// Propagates local transforms into [`GlobalTransform`]s, parents first
///
/// Entities without an `Object3D` pass their parent's matrix through.
/// Visibility is inherited: a hidden node hides its whole subtree.
pub struct TransformSystem;

impl TransformSystem {
    /// Update every root and its descendants
    pub fn update(world: &mut World) {
        for root in world.roots() {
            Self::propagate(world, root, Mat4::IDENTITY, true);
        }
    }

    /// Update one subtree, starting from its parent's current world matrix
    pub fn update_subtree(world: &mut World, root: Entity) {
        let (parent_matrix, parent_visible) = world
            .parent(root)
            .and_then(|p| world.get::<GlobalTransform>(p))
            .map_or((Mat4::IDENTITY, true), |g| (g.matrix, g.visible));
        Self::propagate(world, root, parent_matrix, parent_visible);
    }

    fn propagate(world: &mut World, root: Entity, parent_matrix: Mat4, parent_visible: bool) {
        let mut stack = vec![(root, parent_matrix, parent_visible)];
        while let Some((entity, parent_matrix, parent_visible)) = stack.pop() {
            let (matrix, visible) = match world.get::<Object3D>(entity) {
                Some(object) => (parent_matrix * object.local_matrix(), parent_visible && object.visible),
                None => (parent_matrix, parent_visible),
            };
            if world.has::<Object3D>(entity) {
                world.insert(entity, GlobalTransform { matrix, visible });
            }
            for &child in world.children(entity) {
                stack.push((child, matrix, visible));
            }
        }
    }
}

impl System for TransformSystem {
    fn run(&mut self, ctx: &mut SystemContext) {
        Self::update(ctx.world);
    }

    fn name(&self) -> &'static str {
        "TransformSystem"
    }

    fn stage(&self) -> SystemStage {
        SystemStage::PostUpdate
    }

    fn priority(&self) -> i32 {
        -100
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_parent_first_propagation() {
        let mut world = World::new();
        let pivot = world.spawn().insert(Object3D::at(15.0, 0.0, 0.0)).id();
        let child = world
            .spawn()
            .insert(Object3D::at(3.0, 0.0, 0.0))
            .parent(pivot)
            .id();

        TransformSystem::update(&mut world);
        let g = world.get::<GlobalTransform>(child).copied().unwrap_or_default();
        assert!((g.translation() - Vec3::new(18.0, 0.0, 0.0)).length() < 1e-5);

        if let Some(p) = world.get_mut::<Object3D>(pivot) {
            p.rotate_y(std::f32::consts::FRAC_PI_2);
        }
        TransformSystem::update(&mut world);
        let g = world.get::<GlobalTransform>(child).copied().unwrap_or_default();
        assert!((g.translation() - Vec3::new(15.0, 0.0, -3.0)).length() < 1e-5);
    }

    #[test]
    fn test_group_without_object_passes_through() {
        let mut world = World::new();
        let root = world.spawn().insert(Object3D::at(1.0, 0.0, 0.0)).id();
        let group = world.spawn().parent(root).id();
        let leaf = world.spawn().insert(Object3D::new()).parent(group).id();
        TransformSystem::update(&mut world);
        assert!(world.get::<GlobalTransform>(group).is_none());
        let g = world.get::<GlobalTransform>(leaf).copied().unwrap_or_default();
        assert_eq!(g.translation(), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_hidden_parent_hides_children() {
        let mut world = World::new();
        let root = world.spawn().insert(Object3D::new().with_visible(false)).id();
        let leaf = world.spawn().insert(Object3D::new()).parent(root).id();
        TransformSystem::update(&mut world);
        assert_eq!(world.get::<GlobalTransform>(leaf).map(|g| g.visible), Some(false));
    }

    #[test]
    fn test_update_subtree() {
        let mut world = World::new();
        let root = world.spawn().insert(Object3D::at(0.0, 2.0, 0.0)).id();
        TransformSystem::update(&mut world);
        let model = world.spawn().insert(Object3D::at(1.0, 1.0, 1.0)).parent(root).id();
        TransformSystem::update_subtree(&mut world, model);
        let g = world.get::<GlobalTransform>(model).copied().unwrap_or_default();
        assert_eq!(g.translation(), Vec3::new(1.0, 3.0, 1.0));
    }
}
