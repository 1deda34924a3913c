//! Mesh components

use crate::assets::{GeometryHandle, MaterialHandle};
use crate::ecs::{Component, Entity};
use glam::Mat4;

/// Mesh component combining geometry and material
///
/// Attach this to an entity with an Object3D to render 3D geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mesh {
    /// Handle to the geometry data
    pub geometry: GeometryHandle,
    /// Handle to the material
    pub material: MaterialHandle,
}

impl Component for Mesh {}

impl Mesh {
    /// Create a new mesh
    pub fn new(geometry: GeometryHandle, material: MaterialHandle) -> Self {
        Self { geometry, material }
    }
}

/// Joints of a skeleton and their inverse bind matrices
#[derive(Clone, Debug, Default)]
pub struct Skin {
    pub name: Option<String>,
    /// Joint node entities, indexed by the vertex joint indices
    pub joints: Vec<Entity>,
    pub inverse_bind_matrices: Vec<Mat4>,
}

impl Skin {
    /// Joint matrices in the mesh's local space
    ///
    /// `joint_world` resolves a joint entity to its world matrix;
    /// `mesh_world_inverse` moves the result back into mesh space.
    pub fn joint_matrices(
        &self,
        mesh_world_inverse: &Mat4,
        mut joint_world: impl FnMut(Entity) -> Option<Mat4>,
    ) -> Vec<Mat4> {
        self.joints
            .iter()
            .enumerate()
            .map(|(i, &joint)| {
                let world = joint_world(joint).unwrap_or(Mat4::IDENTITY);
                let ibm = self
                    .inverse_bind_matrices
                    .get(i)
                    .copied()
                    .unwrap_or(Mat4::IDENTITY);
                *mesh_world_inverse * world * ibm
            })
            .collect()
    }
}

/// A mesh deformed by a skeleton
///
/// `bind_geometry` holds the rest pose with joint weights; the entity's
/// [`Mesh`] geometry is rewritten from it every frame by `SkinningSystem`.
#[derive(Clone, Debug)]
pub struct SkinnedMesh {
    pub skin: Skin,
    pub bind_geometry: GeometryHandle,
}

impl Component for SkinnedMesh {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::World;
    use glam::Vec3;

    #[test]
    fn test_joint_matrices() {
        let mut world = World::new();
        let joint = world.spawn().id();
        let skin = Skin {
            name: None,
            joints: vec![joint],
            inverse_bind_matrices: vec![Mat4::from_translation(Vec3::new(0.0, -1.0, 0.0))],
        };
        let joint_world = Mat4::from_translation(Vec3::new(0.0, 3.0, 0.0));
        let mats = skin.joint_matrices(&Mat4::IDENTITY, |_| Some(joint_world));
        let p = mats[0].transform_point3(Vec3::new(0.0, 1.0, 0.0));
        assert!((p - Vec3::new(0.0, 3.0, 0.0)).length() < 1e-6);
    }
}
