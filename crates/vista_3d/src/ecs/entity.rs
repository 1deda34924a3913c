//! Entities and the node hierarchy

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    /// Handle to a scene node
    pub struct Entity;
}

/// Bookkeeping the world keeps for every entity
#[derive(Clone, Debug, Default)]
pub struct Node {
    /// Node name; loaded models carry their glTF node names here
    pub name: Option<String>,
    parent: Option<Entity>,
    children: SmallVec<[Entity; 8]>,
}

impl Node {
    pub fn parent(&self) -> Option<Entity> {
        self.parent
    }

    pub fn children(&self) -> &[Entity] {
        &self.children
    }
}

/// Live entities and their parent/child links
///
/// Both directions of every link are stored on the nodes and always updated
/// together.
#[derive(Default)]
pub struct Nodes {
    nodes: SlotMap<Entity, Node>,
}

impl Nodes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self) -> Entity {
        self.nodes.insert(Node::default())
    }

    pub fn exists(&self, entity: Entity) -> bool {
        self.nodes.contains_key(entity)
    }

    pub fn node(&self, entity: Entity) -> Option<&Node> {
        self.nodes.get(entity)
    }

    pub fn node_mut(&mut self, entity: Entity) -> Option<&mut Node> {
        self.nodes.get_mut(entity)
    }

    /// Remove `entity` and its whole subtree
    ///
    /// Returns every removed entity so the caller can drop their components.
    pub fn despawn(&mut self, entity: Entity) -> Vec<Entity> {
        if !self.exists(entity) {
            return Vec::new();
        }
        self.detach(entity);

        let mut removed = Vec::new();
        let mut pending = vec![entity];
        while let Some(e) = pending.pop() {
            if let Some(node) = self.nodes.remove(e) {
                pending.extend(node.children);
                removed.push(e);
            }
        }
        removed
    }

    /// Make `child` the last child of `parent`
    ///
    /// Refuses (returns `false`) when either entity is gone or when `child`
    /// is `parent` or one of its ancestors.
    pub fn set_parent(&mut self, child: Entity, parent: Entity) -> bool {
        if !self.exists(child) || !self.exists(parent) || self.is_ancestor(child, parent) {
            return false;
        }
        self.detach(child);
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(child);
        }
        true
    }

    /// Unlink `child` from its parent, if it has one
    pub fn detach(&mut self, child: Entity) {
        let Some(parent) = self.nodes.get_mut(child).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.retain(|e| *e != child);
        }
    }

    /// Whether `ancestor` is `entity` itself or above it in the tree
    pub fn is_ancestor(&self, ancestor: Entity, entity: Entity) -> bool {
        std::iter::successors(Some(entity), |&e| self.parent(e)).any(|e| e == ancestor)
    }

    pub fn parent(&self, entity: Entity) -> Option<Entity> {
        self.nodes.get(entity).and_then(|n| n.parent)
    }

    pub fn children(&self, entity: Entity) -> &[Entity] {
        self.nodes.get(entity).map_or(&[], |n| n.children.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.nodes.keys()
    }

    pub fn roots(&self) -> impl Iterator<Item = Entity> + '_ {
        self.nodes.iter().filter(|(_, n)| n.parent.is_none()).map(|(e, _)| e)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Spawns one entity, chaining components, a name and a parent
///
/// ```rust,ignore
/// let cube = world
///     .spawn()
///     .insert(Object3D::at(5.0, 5.0, 5.0))
///     .insert(Spin::new(0.01, 0.01, 0.0))
///     .name("cube")
///     .id();
/// ```
pub struct EntityBuilder<'w> {
    world: &'w mut super::World,
    entity: Entity,
}

impl<'w> EntityBuilder<'w> {
    pub(crate) fn new(world: &'w mut super::World, entity: Entity) -> Self {
        Self { world, entity }
    }

    pub fn insert<C: super::Component>(self, component: C) -> Self {
        self.world.insert(self.entity, component);
        self
    }

    pub fn name(self, name: impl Into<String>) -> Self {
        if let Some(node) = self.world.nodes.node_mut(self.entity) {
            node.name = Some(name.into());
        }
        self
    }

    pub fn parent(self, parent: Entity) -> Self {
        self.world.set_parent(self.entity, parent);
        self
    }

    pub fn id(self) -> Entity {
        self.entity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_and_despawn() {
        let mut nodes = Nodes::new();
        let a = nodes.spawn();
        let b = nodes.spawn();
        assert_eq!(nodes.len(), 2);

        assert_eq!(nodes.despawn(a), vec![a]);
        assert!(!nodes.exists(a));
        assert!(nodes.exists(b));
        assert!(nodes.despawn(a).is_empty());
    }

    #[test]
    fn test_pivot_children() {
        let mut nodes = Nodes::new();
        let pivot = nodes.spawn();
        let sphere = nodes.spawn();
        let torus = nodes.spawn();

        assert!(nodes.set_parent(sphere, pivot));
        assert!(nodes.set_parent(torus, pivot));

        assert_eq!(nodes.parent(sphere), Some(pivot));
        assert_eq!(nodes.children(pivot), &[sphere, torus]);
        assert_eq!(nodes.roots().collect::<Vec<_>>(), vec![pivot]);
    }

    #[test]
    fn test_reparent_moves_child() {
        let mut nodes = Nodes::new();
        let a = nodes.spawn();
        let b = nodes.spawn();
        let child = nodes.spawn();

        nodes.set_parent(child, a);
        nodes.set_parent(child, b);
        assert!(nodes.children(a).is_empty());
        assert_eq!(nodes.children(b), &[child]);

        nodes.detach(child);
        assert!(nodes.children(b).is_empty());
        assert_eq!(nodes.parent(child), None);
    }

    #[test]
    fn test_cycles_rejected() {
        let mut nodes = Nodes::new();
        let root = nodes.spawn();
        let child = nodes.spawn();
        let grandchild = nodes.spawn();
        nodes.set_parent(child, root);
        nodes.set_parent(grandchild, child);

        assert!(!nodes.set_parent(root, grandchild));
        assert!(!nodes.set_parent(root, root));
        assert_eq!(nodes.parent(root), None);
    }

    #[test]
    fn test_despawn_takes_subtree() {
        let mut nodes = Nodes::new();
        let root = nodes.spawn();
        let parent = nodes.spawn();
        let child = nodes.spawn();
        let grandchild = nodes.spawn();
        nodes.set_parent(parent, root);
        nodes.set_parent(child, parent);
        nodes.set_parent(grandchild, child);

        let removed = nodes.despawn(parent);
        assert_eq!(removed.len(), 3);
        assert_eq!(nodes.len(), 1);
        assert!(nodes.children(root).is_empty());
        assert!(!nodes.exists(grandchild));
    }
}
