//! CPU skinning

use crate::assets::Assets;
use crate::ecs::{System, SystemContext, SystemStage, World};
use crate::geometry::{Geometry, Vertex};
use crate::scene::{GlobalTransform, Mesh, SkinnedMesh};
use glam::{Mat4, Vec3};

/// Deforms each [`SkinnedMesh`]'s bind geometry by its joints and writes
/// the result into the entity's [`Mesh`] geometry
///
/// Runs after `TransformSystem` so joint world matrices are current.
pub struct SkinningSystem;

impl SkinningSystem {
    pub fn update(world: &mut World) {
        for entity in world.entities_with::<SkinnedMesh>() {
            let (Some(skinned), Some(mesh)) = (world.get::<SkinnedMesh>(entity), world.get::<Mesh>(entity)) else {
                continue;
            };
            let mesh_world = world
                .get::<GlobalTransform>(entity)
                .map_or(Mat4::IDENTITY, |g| g.matrix);
            let joints = skinned.skin.joint_matrices(&mesh_world.inverse(), |joint| {
                world.get::<GlobalTransform>(joint).map(|g| g.matrix)
            });
            let (bind, target) = (skinned.bind_geometry, mesh.geometry);

            let Some(geometries) = world.resource_mut::<Assets<Geometry>>() else {
                return;
            };
            let Some(vertices) = geometries.get(bind).and_then(|g| skin_vertices(g, &joints)) else {
                continue;
            };
            if let Some(out) = geometries.get_mut(target) {
                out.vertices = vertices;
                out.compute_bounds();
            }
        }
    }
}

/// Linear blend skinning of a bind-pose geometry
pub fn skin_vertices(bind: &Geometry, joints: &[Mat4]) -> Option<Vec<Vertex>> {
    let weights = bind.skin.as_ref()?;
    let out = bind
        .vertices
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let (Some(js), Some(ws)) = (weights.joints.get(i), weights.weights.get(i)) else {
                return *v;
            };
            let mut m = Mat4::ZERO;
            let mut total = 0.0;
            for k in 0..4 {
                if ws[k] > 0.0 {
                    if let Some(joint) = joints.get(js[k] as usize) {
                        m += *joint * ws[k];
                        total += ws[k];
                    }
                }
            }
            if total <= 0.0 {
                return *v;
            }
            let m = m * (1.0 / total);
            let position = m.transform_point3(v.position());
            let normal = m.transform_vector3(v.normal()).normalize_or(Vec3::Y);
            Vertex::new(position.to_array(), normal.to_array(), v.uv)
        })
        .collect();
    Some(out)
}

impl System for SkinningSystem {
    fn run(&mut self, ctx: &mut SystemContext) {
        Self::update(ctx.world);
    }

    fn name(&self) -> &'static str {
        "SkinningSystem"
    }

    fn stage(&self) -> SystemStage {
        SystemStage::PostUpdate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::Assets;
    use crate::geometry::SkinWeights;
    use crate::materials::{BasicMaterial, Material};
    use crate::scene::{Object3D, Skin};
    use crate::systems::TransformSystem;

    fn bind_geometry() -> Geometry {
        Geometry::from_data(
            vec![
                Vertex::new([0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0]),
                Vertex::new([0.0, 1.0, 0.0], [0.0, 1.0, 0.0], [0.0, 1.0]),
            ],
            vec![],
        )
        .with_skin(SkinWeights {
            joints: vec![[0, 0, 0, 0], [1, 0, 0, 0]],
            weights: vec![[1.0, 0.0, 0.0, 0.0], [1.0, 0.0, 0.0, 0.0]],
        })
    }

    #[test]
    fn test_skin_follows_joint() {
        let mut world = World::new();
        let mut geometries = Assets::<Geometry>::new();
        let bind = geometries.add(bind_geometry());
        let target = geometries.add(bind_geometry());
        let mut materials = Assets::<Material>::new();
        let material = materials.add(BasicMaterial::new().into());
        world.insert_resource(geometries);
        world.insert_resource(materials);

        let root_joint = world.spawn().insert(Object3D::new()).id();
        let tip_joint = world.spawn().insert(Object3D::at(0.0, 1.0, 0.0)).id();
        let skin = Skin {
            name: None,
            joints: vec![root_joint, tip_joint],
            inverse_bind_matrices: vec![Mat4::IDENTITY, Mat4::from_translation(Vec3::new(0.0, -1.0, 0.0))],
        };
        let mesh = world
            .spawn()
            .insert(Object3D::new())
            .insert(Mesh::new(target, material))
            .insert(SkinnedMesh { skin, bind_geometry: bind })
            .id();

        if let Some(tip) = world.get_mut::<Object3D>(tip_joint) {
            tip.position = Vec3::new(2.0, 1.0, 0.0);
        }
        TransformSystem::update(&mut world);
        SkinningSystem::update(&mut world);

        let geometries = world.resource::<Assets<Geometry>>();
        let moved = geometries.and_then(|g| g.get(target)).map(|g| g.vertices[1].position);
        assert_eq!(moved, Some([2.0, 1.0, 0.0]));
        let rest = geometries.and_then(|g| g.get(target)).map(|g| g.vertices[0].position);
        assert_eq!(rest, Some([0.0, 0.0, 0.0]));
        assert!(world.exists(mesh));
    }

    #[test]
    fn test_unskinned_geometry_is_skipped() {
        let plain = Geometry::from_data(vec![Vertex::default()], vec![]);
        assert!(skin_vertices(&plain, &[Mat4::IDENTITY]).is_none());
    }
}
