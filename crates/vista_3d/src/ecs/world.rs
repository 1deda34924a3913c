//! The world: entities, their components, and shared resources

use super::{Columns, Component, Entity, EntityBuilder, Nodes, Query, WorldQuery};
use rustc_hash::FxHashMap;
use std::any::{Any, TypeId};

/// Anything storable as a world-wide singleton (asset stores, settings)
pub trait Resource: 'static + Send + Sync {}

impl<T: 'static + Send + Sync> Resource for T {}

/// Singletons keyed by type
#[derive(Default)]
pub struct Resources {
    by_type: FxHashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Resources {
    pub fn insert<R: Resource>(&mut self, resource: R) {
        self.by_type.insert(TypeId::of::<R>(), Box::new(resource));
    }

    pub fn get<R: Resource>(&self) -> Option<&R> {
        self.by_type.get(&TypeId::of::<R>())?.downcast_ref()
    }

    pub fn get_mut<R: Resource>(&mut self) -> Option<&mut R> {
        self.by_type.get_mut(&TypeId::of::<R>())?.downcast_mut()
    }

    pub fn remove<R: Resource>(&mut self) -> Option<R> {
        let boxed = self.by_type.remove(&TypeId::of::<R>())?;
        boxed.downcast().ok().map(|r| *r)
    }

    pub fn contains<R: Resource>(&self) -> bool {
        self.by_type.contains_key(&TypeId::of::<R>())
    }
}

/// Scene nodes, their components, and resources
#[derive(Default)]
pub struct World {
    pub(crate) nodes: Nodes,
    columns: Columns,
    resources: Resources,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self) -> EntityBuilder<'_> {
        let entity = self.nodes.spawn();
        EntityBuilder::new(self, entity)
    }

    /// Remove an entity with its subtree and every component they held
    pub fn despawn(&mut self, entity: Entity) {
        for removed in self.nodes.despawn(entity) {
            self.columns.clear_entity(removed);
        }
    }

    pub fn exists(&self, entity: Entity) -> bool {
        self.nodes.exists(entity)
    }

    pub fn entity_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.nodes.iter()
    }

    pub fn name(&self, entity: Entity) -> Option<&str> {
        self.nodes.node(entity)?.name.as_deref()
    }

    pub fn find_by_name(&self, name: &str) -> Option<Entity> {
        self.nodes.iter().find(|&e| self.name(e) == Some(name))
    }

    /// Attach `child` under `parent`; `false` if that would be invalid
    pub fn set_parent(&mut self, child: Entity, parent: Entity) -> bool {
        self.nodes.set_parent(child, parent)
    }

    pub fn detach(&mut self, child: Entity) {
        self.nodes.detach(child);
    }

    pub fn parent(&self, entity: Entity) -> Option<Entity> {
        self.nodes.parent(entity)
    }

    pub fn children(&self, entity: Entity) -> &[Entity] {
        self.nodes.children(entity)
    }

    pub fn roots(&self) -> Vec<Entity> {
        self.nodes.roots().collect()
    }

    /// `entity` and everything below it, parents before children
    pub fn descendants(&self, entity: Entity) -> Vec<Entity> {
        let mut out = Vec::new();
        let mut stack = vec![entity];
        while let Some(e) = stack.pop() {
            if self.exists(e) {
                out.push(e);
                stack.extend(self.children(e).iter().rev().copied());
            }
        }
        out
    }

    /// Attach `component`, replacing one of the same type; ignored for
    /// despawned entities
    pub fn insert<C: Component>(&mut self, entity: Entity, component: C) {
        if !self.exists(entity) {
            return;
        }
        if let Some(column) = self.columns.column_or_insert::<C>() {
            column.insert(entity, component);
        }
    }

    pub fn get<C: Component>(&self, entity: Entity) -> Option<&C> {
        self.columns.column::<C>()?.get(entity)
    }

    pub fn get_mut<C: Component>(&mut self, entity: Entity) -> Option<&mut C> {
        self.columns.column_mut::<C>()?.get_mut(entity)
    }

    pub fn has<C: Component>(&self, entity: Entity) -> bool {
        self.columns.erased::<C>().is_some_and(|c| c.contains(entity))
    }

    pub fn remove<C: Component>(&mut self, entity: Entity) -> bool {
        self.columns.erased_mut::<C>().is_some_and(|c| c.remove(entity))
    }

    /// Move a component out so a system can mutate it while reading the
    /// rest of the world; insert it back afterwards
    pub fn take<C: Component>(&mut self, entity: Entity) -> Option<C> {
        self.columns.column_mut::<C>()?.take(entity)
    }

    pub fn entities_with<C: Component>(&self) -> Vec<Entity> {
        self.columns.column::<C>().map(|c| c.entities()).unwrap_or_default()
    }

    pub fn query<Q: WorldQuery>(&self) -> Query<'_, Q> {
        Query::new(self)
    }

    pub fn resource<R: Resource>(&self) -> Option<&R> {
        self.resources.get::<R>()
    }

    pub fn resource_mut<R: Resource>(&mut self) -> Option<&mut R> {
        self.resources.get_mut::<R>()
    }

    /// The resource, default-constructed first if missing
    pub fn resource_or_default<R: Resource + Default>(&mut self) -> &mut R {
        if !self.resources.contains::<R>() {
            self.resources.insert(R::default());
        }
        match self.resources.get_mut::<R>() {
            Some(resource) => resource,
            None => unreachable!("resource inserted above"),
        }
    }

    pub fn insert_resource<R: Resource>(&mut self, resource: R) {
        self.resources.insert(resource);
    }

    pub fn remove_resource<R: Resource>(&mut self) -> Option<R> {
        self.resources.remove::<R>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
    }

    impl Component for Position {}

    #[derive(Clone, Debug, PartialEq)]
    struct Velocity {
        x: f32,
        y: f32,
    }

    impl Component for Velocity {
        const STORAGE: crate::ecs::StorageType = crate::ecs::StorageType::Sparse;
    }

    #[test]
    fn test_world_spawn_despawn() {
        let mut world = World::new();

        let entity = world.spawn().id();
        assert!(world.exists(entity));
        assert_eq!(world.entity_count(), 1);

        world.despawn(entity);
        assert!(!world.exists(entity));
        assert_eq!(world.entity_count(), 0);
    }

    #[test]
    fn test_world_components() {
        let mut world = World::new();

        let a = world.spawn().insert(Position { x: 1.0, y: 2.0 }).id();
        let b = world
            .spawn()
            .insert(Position { x: 3.0, y: 4.0 })
            .insert(Velocity { x: 0.5, y: 0.0 })
            .id();

        assert!(world.has::<Position>(a));
        assert!(!world.has::<Velocity>(a));
        assert_eq!(world.get::<Position>(a), Some(&Position { x: 1.0, y: 2.0 }));
        assert_eq!(world.get::<Position>(b).map(|p| p.x), Some(3.0));

        if let Some(p) = world.get_mut::<Position>(a) {
            p.x = 9.0;
        }
        assert_eq!(world.get::<Position>(a).map(|p| p.x), Some(9.0));
        assert_eq!(world.get::<Position>(b).map(|p| p.x), Some(3.0));
    }

    #[test]
    fn test_despawn_removes_descendant_components() {
        let mut world = World::new();
        let pivot = world.spawn().insert(Position { x: 0.0, y: 0.0 }).id();
        let child = world
            .spawn()
            .insert(Position { x: 1.0, y: 0.0 })
            .parent(pivot)
            .id();

        world.despawn(pivot);
        assert!(!world.exists(child));
        assert!(world.get::<Position>(child).is_none());
        assert!(world.entities_with::<Position>().is_empty());
    }

    #[test]
    fn test_take_and_reinsert() {
        let mut world = World::new();
        let e = world.spawn().insert(Velocity { x: 1.0, y: 1.0 }).id();

        let mut v = world.take::<Velocity>(e).unwrap();
        assert!(!world.has::<Velocity>(e));
        v.x = 2.0;
        world.insert(e, v);
        assert_eq!(world.get::<Velocity>(e).map(|v| v.x), Some(2.0));
    }

    #[test]
    fn test_names_and_descendants() {
        let mut world = World::new();
        let root = world.spawn().name("model").id();
        let a = world.spawn().name("frame").parent(root).id();
        let b = world.spawn().name("glass").parent(a).id();

        assert_eq!(world.find_by_name("glass"), Some(b));
        assert_eq!(world.name(root), Some("model"));
        assert_eq!(world.descendants(root), vec![root, a, b]);
        assert_eq!(world.roots(), vec![root]);
    }

    #[test]
    fn test_world_resources() {
        let mut world = World::new();

        #[derive(Debug, Default, PartialEq)]
        struct FrameCount(u64);

        assert!(world.resource::<FrameCount>().is_none());
        world.resource_or_default::<FrameCount>().0 += 1;
        assert_eq!(world.resource::<FrameCount>(), Some(&FrameCount(1)));

        world.insert_resource(FrameCount(5));
        assert_eq!(world.remove_resource::<FrameCount>(), Some(FrameCount(5)));
    }
}
