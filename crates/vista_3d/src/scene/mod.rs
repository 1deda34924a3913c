//! Scene graph components

mod camera;
mod mesh;
mod object3d;

pub use camera::PerspectiveCamera;
pub use mesh::{Mesh, Skin, SkinnedMesh};
pub use object3d::{GlobalTransform, Object3D};

use crate::ecs::{Component, StorageType};

/// An empty transform node that only groups its children
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pivot;

impl Component for Pivot {
    const STORAGE: StorageType = StorageType::Sparse;
}

/// Marks the camera entity the renderer draws from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ActiveCamera;

impl Component for ActiveCamera {
    const STORAGE: StorageType = StorageType::Sparse;
}
