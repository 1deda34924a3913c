//! Typed asset stores
//!
//! Geometry, materials, and textures live in [`Assets`] stores held as
//! world resources. Components refer to them through slotmap handles, so
//! many meshes can share one geometry or material.

use crate::geometry::Geometry;
use crate::materials::{Material, Texture};
use rustc_hash::FxHashSet;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle to a shared geometry resource
    pub struct GeometryHandle;
    /// Handle to a material resource
    pub struct MaterialHandle;
    /// Handle to a texture resource
    pub struct TextureHandle;
}

/// A resource type stored in [`Assets`]
pub trait Asset: Send + Sync + 'static {
    type Handle: slotmap::Key + std::hash::Hash + Send + Sync;
}

impl Asset for Geometry {
    type Handle = GeometryHandle;
}

impl Asset for Material {
    type Handle = MaterialHandle;
}

impl Asset for Texture {
    type Handle = TextureHandle;
}

/// Store of one asset type with change tracking
///
/// Every `add` and `get_mut` marks the handle changed; the renderer drains
/// the set with [`Assets::take_changed`] and re-uploads only those.
pub struct Assets<T: Asset> {
    items: SlotMap<T::Handle, T>,
    changed: FxHashSet<T::Handle>,
    removed: Vec<T::Handle>,
}

impl<T: Asset> Default for Assets<T> {
    fn default() -> Self {
        Self {
            items: SlotMap::with_key(),
            changed: FxHashSet::default(),
            removed: Vec::new(),
        }
    }
}

impl<T: Asset> Assets<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, asset: T) -> T::Handle {
        let handle = self.items.insert(asset);
        self.changed.insert(handle);
        handle
    }

    pub fn get(&self, handle: T::Handle) -> Option<&T> {
        self.items.get(handle)
    }

    /// Mutable access; marks the asset changed
    pub fn get_mut(&mut self, handle: T::Handle) -> Option<&mut T> {
        let item = self.items.get_mut(handle)?;
        self.changed.insert(handle);
        Some(item)
    }

    pub fn remove(&mut self, handle: T::Handle) -> Option<T> {
        let item = self.items.remove(handle)?;
        self.changed.remove(&handle);
        self.removed.push(handle);
        Some(item)
    }

    pub fn contains(&self, handle: T::Handle) -> bool {
        self.items.contains_key(handle)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (T::Handle, &T)> {
        self.items.iter()
    }

    /// Mutable iteration; marks every asset changed
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (T::Handle, &mut T)> {
        self.changed.extend(self.items.keys());
        self.items.iter_mut()
    }

    /// Report every asset as changed on the next drain, e.g. for a renderer
    /// that starts with empty GPU caches
    pub fn mark_all_changed(&mut self) {
        self.changed.extend(self.items.keys());
    }

    /// Drain handles added or modified since the last call
    pub fn take_changed(&mut self) -> Vec<T::Handle> {
        self.changed.drain().collect()
    }

    /// Drain handles removed since the last call
    pub fn take_removed(&mut self) -> Vec<T::Handle> {
        std::mem::take(&mut self.removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BoxGeometry;

    #[test]
    fn test_add_get_remove() {
        let mut assets = Assets::<Geometry>::new();
        let h = assets.add(BoxGeometry::cube(1.0));
        assert_eq!(assets.len(), 1);
        assert_eq!(assets.get(h).map(|g| g.vertex_count()), Some(24));
        assert!(assets.remove(h).is_some());
        assert!(assets.get(h).is_none());
        assert!(assets.is_empty());
        assert_eq!(assets.take_removed(), vec![h]);
    }

    #[test]
    fn test_change_tracking() {
        let mut assets = Assets::<Geometry>::new();
        let a = assets.add(BoxGeometry::cube(1.0));
        let b = assets.add(BoxGeometry::cube(2.0));
        let mut changed = assets.take_changed();
        changed.sort();
        let mut expected = vec![a, b];
        expected.sort();
        assert_eq!(changed, expected);
        assert!(assets.take_changed().is_empty());

        let _ = assets.get(a);
        assert!(assets.take_changed().is_empty());

        if let Some(g) = assets.get_mut(b) {
            g.indices.clear();
        }
        assert_eq!(assets.take_changed(), vec![b]);

        assets.mark_all_changed();
        assert_eq!(assets.take_changed().len(), 2);
    }

    #[test]
    fn test_removed_not_reported_changed() {
        let mut assets = Assets::<Geometry>::new();
        let a = assets.add(BoxGeometry::cube(1.0));
        assets.remove(a);
        assert!(assets.take_changed().is_empty());
    }
}
