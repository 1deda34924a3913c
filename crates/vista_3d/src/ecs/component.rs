//! Components and their per-type columns

use super::Entity;
use rustc_hash::FxHashMap;
use slotmap::SecondaryMap;
use std::any::{Any, TypeId};

/// How a component column lays out its values
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StorageType {
    /// Indexed by the entity slot; for components most nodes carry
    #[default]
    Dense,
    /// Hashed; for components only a handful of nodes carry (cameras,
    /// mixers, helpers)
    Sparse,
}

/// Data attached to a scene node
///
/// ```rust,ignore
/// use vista_3d::ecs::{Component, StorageType};
///
/// struct Spin { y: f32 }
///
/// impl Component for Spin {
///     const STORAGE: StorageType = StorageType::Sparse;
/// }
/// ```
pub trait Component: 'static + Send + Sync + Sized {
    const STORAGE: StorageType = StorageType::Dense;
}

enum Slots<T> {
    Dense(SecondaryMap<Entity, T>),
    Sparse(FxHashMap<Entity, T>),
}

/// Every value of one component type
pub struct Column<T: Component> {
    slots: Slots<T>,
}

impl<T: Component> Default for Column<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Component> Column<T> {
    pub fn new() -> Self {
        let slots = match T::STORAGE {
            StorageType::Dense => Slots::Dense(SecondaryMap::new()),
            StorageType::Sparse => Slots::Sparse(FxHashMap::default()),
        };
        Self { slots }
    }

    /// Store `value` for `entity`, returning the value it replaced
    pub fn insert(&mut self, entity: Entity, value: T) -> Option<T> {
        match &mut self.slots {
            Slots::Dense(map) => map.insert(entity, value),
            Slots::Sparse(map) => map.insert(entity, value),
        }
    }

    pub fn get(&self, entity: Entity) -> Option<&T> {
        match &self.slots {
            Slots::Dense(map) => map.get(entity),
            Slots::Sparse(map) => map.get(&entity),
        }
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        match &mut self.slots {
            Slots::Dense(map) => map.get_mut(entity),
            Slots::Sparse(map) => map.get_mut(&entity),
        }
    }

    pub fn take(&mut self, entity: Entity) -> Option<T> {
        match &mut self.slots {
            Slots::Dense(map) => map.remove(entity),
            Slots::Sparse(map) => map.remove(&entity),
        }
    }

    /// Entities holding a value, in no particular order
    pub fn entities(&self) -> Vec<Entity> {
        match &self.slots {
            Slots::Dense(map) => map.keys().collect(),
            Slots::Sparse(map) => map.keys().copied().collect(),
        }
    }
}

/// A column with its value type erased
pub trait AnyColumn: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn contains(&self, entity: Entity) -> bool;
    /// Drop the entity's value; `true` if there was one
    fn remove(&mut self, entity: Entity) -> bool;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Component> AnyColumn for Column<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn contains(&self, entity: Entity) -> bool {
        self.get(entity).is_some()
    }

    fn remove(&mut self, entity: Entity) -> bool {
        self.take(entity).is_some()
    }

    fn len(&self) -> usize {
        match &self.slots {
            Slots::Dense(map) => map.len(),
            Slots::Sparse(map) => map.len(),
        }
    }
}

/// One column per component type seen so far
#[derive(Default)]
pub struct Columns {
    by_type: FxHashMap<TypeId, Box<dyn AnyColumn>>,
}

impl Columns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column<T: Component>(&self) -> Option<&Column<T>> {
        self.by_type.get(&TypeId::of::<T>())?.as_any().downcast_ref()
    }

    pub fn column_mut<T: Component>(&mut self) -> Option<&mut Column<T>> {
        self.by_type.get_mut(&TypeId::of::<T>())?.as_any_mut().downcast_mut()
    }

    /// The column for `T`, created on first use
    pub fn column_or_insert<T: Component>(&mut self) -> Option<&mut Column<T>> {
        self.by_type
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(Column::<T>::new()))
            .as_any_mut()
            .downcast_mut()
    }

    pub fn erased<T: Component>(&self) -> Option<&dyn AnyColumn> {
        self.by_type.get(&TypeId::of::<T>()).map(|c| c.as_ref())
    }

    pub fn erased_mut<T: Component>(&mut self) -> Option<&mut dyn AnyColumn> {
        self.by_type.get_mut(&TypeId::of::<T>()).map(|c| c.as_mut())
    }

    /// Strip every component from `entity`
    pub fn clear_entity(&mut self, entity: Entity) {
        for column in self.by_type.values_mut() {
            column.remove(entity);
        }
    }
}
