//! Read-only queries over component combinations

use super::{Component, Entity, World};
use std::marker::PhantomData;

/// Something a query can pull out of the world for one entity
///
/// `fetch` returning `None` means the entity does not match.
pub trait WorldQuery {
    type Item<'a>;

    fn fetch(world: &World, entity: Entity) -> Option<Self::Item<'_>>;
}

impl<T: Component> WorldQuery for &T {
    type Item<'a> = &'a T;

    fn fetch(world: &World, entity: Entity) -> Option<Self::Item<'_>> {
        world.get::<T>(entity)
    }
}

macro_rules! tuple_query {
    ($($q:ident),+) => {
        impl<$($q: WorldQuery),+> WorldQuery for ($($q,)+) {
            type Item<'a> = ($($q::Item<'a>,)+);

            fn fetch(world: &World, entity: Entity) -> Option<Self::Item<'_>> {
                Some(($($q::fetch(world, entity)?,)+))
            }
        }
    };
}

tuple_query!(A);
tuple_query!(A, B);
tuple_query!(A, B, C);
tuple_query!(A, B, C, D);

/// Matches entities that have `T`, without borrowing it
pub struct With<T>(PhantomData<T>);

impl<T: Component> WorldQuery for With<T> {
    type Item<'a> = ();

    fn fetch(world: &World, entity: Entity) -> Option<Self::Item<'_>> {
        world.has::<T>(entity).then_some(())
    }
}

/// Matches entities that lack `T`
pub struct Without<T>(PhantomData<T>);

impl<T: Component> WorldQuery for Without<T> {
    type Item<'a> = ();

    fn fetch(world: &World, entity: Entity) -> Option<Self::Item<'_>> {
        (!world.has::<T>(entity)).then_some(())
    }
}

/// Entities matching `Q`, with their fetched components
pub struct Query<'w, Q: WorldQuery> {
    world: &'w World,
    _marker: PhantomData<Q>,
}

impl<'w, Q: WorldQuery> Query<'w, Q> {
    pub(crate) fn new(world: &'w World) -> Self {
        Self {
            world,
            _marker: PhantomData,
        }
    }

    pub fn iter(&self) -> QueryIter<'w, Q> {
        QueryIter {
            world: self.world,
            entities: Box::new(self.world.entities()),
            _marker: PhantomData,
        }
    }

    pub fn get(&self, entity: Entity) -> Option<Q::Item<'w>> {
        Q::fetch(self.world, entity)
    }

    pub fn entities(&self) -> Vec<Entity> {
        self.iter().map(|(entity, _)| entity).collect()
    }
}

impl<'w, Q: WorldQuery> IntoIterator for Query<'w, Q> {
    type Item = (Entity, Q::Item<'w>);
    type IntoIter = QueryIter<'w, Q>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct QueryIter<'w, Q: WorldQuery> {
    world: &'w World,
    entities: Box<dyn Iterator<Item = Entity> + 'w>,
    _marker: PhantomData<Q>,
}

impl<'w, Q: WorldQuery> Iterator for QueryIter<'w, Q> {
    type Item = (Entity, Q::Item<'w>);

    fn next(&mut self) -> Option<Self::Item> {
        let world = self.world;
        self.entities
            .by_ref()
            .find_map(|entity| Q::fetch(world, entity).map(|item| (entity, item)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Mass(f32);
    impl Component for Mass {}

    struct Frozen;
    impl Component for Frozen {}

    #[test]
    fn test_query_filters() {
        let mut world = World::new();
        let a = world.spawn().insert(Mass(1.0)).id();
        let b = world.spawn().insert(Mass(2.0)).insert(Frozen).id();
        world.spawn();

        assert_eq!(world.query::<&Mass>().entities().len(), 2);
        assert_eq!(world.query::<(&Mass, With<Frozen>)>().entities(), vec![b]);
        assert_eq!(world.query::<(&Mass, Without<Frozen>)>().entities(), vec![a]);

        let total: f32 = world.query::<&Mass>().iter().map(|(_, m)| m.0).sum();
        assert_eq!(total, 3.0);
        assert!(world.query::<&Frozen>().get(a).is_none());
        assert!(world.query::<(&Mass, &Frozen)>().get(b).is_some());
    }
}
