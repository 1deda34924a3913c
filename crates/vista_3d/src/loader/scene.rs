//! Format-independent loaded scene and its instantiation into a world

use crate::animation::{AnimationClip, AnimationMixer};
use crate::assets::{Assets, GeometryHandle, MaterialHandle, TextureHandle};
use crate::ecs::{Entity, World};
use crate::geometry::Geometry;
use crate::materials::{Material, StandardMaterial, Texture};
use crate::math::BoundingBox;
use crate::scene::{Mesh, Object3D, Skin, SkinnedMesh};
use glam::{Mat4, Quat, Vec3};

/// One drawable part of a mesh
#[derive(Clone, Debug)]
pub struct LoadedPrimitive {
    pub geometry: Geometry,
    /// Index into [`LoadedScene::materials`]
    pub material: Option<usize>,
}

#[derive(Clone, Debug)]
pub struct LoadedMesh {
    pub name: String,
    pub primitives: Vec<LoadedPrimitive>,
}

#[derive(Clone, Debug)]
pub struct LoadedMaterial {
    pub name: String,
    pub material: StandardMaterial,
    /// Index into [`LoadedScene::textures`]
    pub base_color_texture: Option<usize>,
}

#[derive(Clone, Debug)]
pub struct LoadedNode {
    pub name: String,
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub mesh: Option<usize>,
    pub skin: Option<usize>,
    pub children: Vec<usize>,
}

impl LoadedNode {
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

#[derive(Clone, Debug)]
pub struct LoadedSkin {
    pub name: Option<String>,
    /// Node indices
    pub joints: Vec<usize>,
    pub inverse_bind_matrices: Vec<Mat4>,
}

/// Everything read from a model file
///
/// Node indices are shared by `root_nodes`, `LoadedNode::children`, skin
/// joints, and animation channels.
#[derive(Clone, Debug, Default)]
pub struct LoadedScene {
    pub name: String,
    pub meshes: Vec<LoadedMesh>,
    pub materials: Vec<LoadedMaterial>,
    pub textures: Vec<Texture>,
    pub nodes: Vec<LoadedNode>,
    pub root_nodes: Vec<usize>,
    pub skins: Vec<LoadedSkin>,
    pub animations: Vec<AnimationClip>,
    /// Bounds of all mesh geometry in scene space
    pub bounds: BoundingBox,
}

impl LoadedScene {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn has_animations(&self) -> bool {
        !self.animations.is_empty()
    }

    /// Recompute `bounds` by walking the node tree
    pub fn compute_bounds(&mut self) {
        let mut bounds = BoundingBox::empty();
        let mut stack: Vec<(usize, Mat4)> = self.root_nodes.iter().map(|&n| (n, Mat4::IDENTITY)).collect();
        let mut visited = vec![false; self.nodes.len()];
        while let Some((index, parent)) = stack.pop() {
            let Some(node) = self.nodes.get(index) else {
                continue;
            };
            if std::mem::replace(&mut visited[index], true) {
                continue;
            }
            let matrix = parent * node.local_matrix();
            if let Some(mesh) = node.mesh.and_then(|m| self.meshes.get(m)) {
                for primitive in &mesh.primitives {
                    bounds.merge(&primitive.geometry.bounds.transformed(&matrix));
                }
            }
            stack.extend(node.children.iter().map(|&c| (c, matrix)));
        }
        self.bounds = bounds;
    }

    /// Node indices reachable from `root_nodes`, parents before children
    fn reachable_nodes(&self) -> Vec<usize> {
        let mut visited = vec![false; self.nodes.len()];
        let mut order = Vec::new();
        let mut stack: Vec<usize> = self.root_nodes.iter().rev().copied().collect();
        while let Some(index) = stack.pop() {
            let Some(node) = self.nodes.get(index) else {
                continue;
            };
            if std::mem::replace(&mut visited[index], true) {
                continue;
            }
            order.push(index);
            stack.extend(node.children.iter().rev());
        }
        order
    }

    /// Spawn the scene into `world` under a new group entity
    ///
    /// Only nodes reachable from `root_nodes` are spawned. Textures,
    /// materials and geometry are added to the world's asset stores and
    /// recorded on the returned [`SceneInstance`] so they can be released
    /// with it. If the file has animations, an [`AnimationMixer`] holding
    /// every clip is attached to the root; nothing plays until the caller
    /// starts a clip.
    pub fn instantiate(&self, world: &mut World, parent: Option<Entity>) -> SceneInstance {
        let textures: Vec<TextureHandle> = {
            let store = world.resource_or_default::<Assets<Texture>>();
            self.textures.iter().map(|t| store.add(t.clone())).collect()
        };

        let mut materials: Vec<MaterialHandle> = {
            let store = world.resource_or_default::<Assets<Material>>();
            self.materials
                .iter()
                .map(|m| {
                    let mut material = m.material.clone();
                    material.map = m.base_color_texture.and_then(|t| textures.get(t).copied());
                    store.add(Material::Standard(material))
                })
                .collect()
        };
        let default_material = world
            .resource_or_default::<Assets<Material>>()
            .add(Material::Standard(StandardMaterial::default()));

        let mut root = world.spawn().insert(Object3D::new()).name(self.name.clone());
        if let Some(parent) = parent {
            root = root.parent(parent);
        }
        let root = root.id();

        let mut nodes: Vec<Option<Entity>> = vec![None; self.nodes.len()];
        for index in self.reachable_nodes() {
            let node = &self.nodes[index];
            nodes[index] = Some(
                world
                    .spawn()
                    .insert(Object3D {
                        position: node.translation,
                        rotation: node.rotation,
                        scale: node.scale,
                        ..Default::default()
                    })
                    .name(node.name.clone())
                    .id(),
            );
        }

        for (index, node) in self.nodes.iter().enumerate() {
            let Some(entity) = nodes[index] else {
                continue;
            };
            for &child in &node.children {
                if let Some(Some(child)) = nodes.get(child) {
                    world.set_parent(*child, entity);
                }
            }
        }
        for &index in &self.root_nodes {
            if let Some(Some(node)) = nodes.get(index) {
                world.set_parent(*node, root);
            }
        }

        let mut geometries = Vec::new();
        for (index, node) in self.nodes.iter().enumerate() {
            let Some(entity) = nodes[index] else {
                continue;
            };
            let Some(mesh) = node.mesh.and_then(|m| self.meshes.get(m)) else {
                continue;
            };
            let skin = node.skin.and_then(|s| self.skins.get(s)).and_then(|s| resolve_skin(s, &nodes));

            for (p, primitive) in mesh.primitives.iter().enumerate() {
                let material = primitive
                    .material
                    .and_then(|m| materials.get(m).copied())
                    .unwrap_or(default_material);
                let skinned = primitive.geometry.skin.is_some() && skin.is_some();
                let (geometry, bind) = {
                    let store = world.resource_or_default::<Assets<Geometry>>();
                    let geometry = store.add(primitive.geometry.clone());
                    let bind = skinned.then(|| store.add(primitive.geometry.clone()));
                    (geometry, bind)
                };
                geometries.push(geometry);
                geometries.extend(bind);

                let mut mesh_entity = world
                    .spawn()
                    .insert(Object3D::new())
                    .insert(Mesh::new(geometry, material))
                    .name(format!("{}.{}", mesh.name, p))
                    .parent(entity);
                if let (Some(bind), Some(skin)) = (bind, skin.clone()) {
                    mesh_entity = mesh_entity.insert(SkinnedMesh {
                        skin,
                        bind_geometry: bind,
                    });
                }
                mesh_entity.id();
            }
        }

        if self.has_animations() {
            world.insert(root, AnimationMixer::new(self.animations.clone(), nodes));
        }

        materials.push(default_material);
        SceneInstance {
            root,
            geometries,
            materials,
            textures,
        }
    }
}

/// Runtime skin for `skin`, or `None` when any joint was not spawned
///
/// Joint order must line up with the inverse bind matrices and the vertex
/// joint indices, so a single missing joint invalidates the whole skin.
fn resolve_skin(skin: &LoadedSkin, nodes: &[Option<Entity>]) -> Option<Skin> {
    let joints: Option<Vec<Entity>> = skin.joints.iter().map(|&j| nodes.get(j).copied().flatten()).collect();
    let Some(joints) = joints else {
        tracing::warn!(skin = skin.name.as_deref(), "skin references a missing joint, rendering unskinned");
        return None;
    };
    Some(Skin {
        name: skin.name.clone(),
        joints,
        inverse_bind_matrices: skin.inverse_bind_matrices.clone(),
    })
}

/// Entities and assets one [`LoadedScene::instantiate`] call created
#[derive(Clone, Debug)]
pub struct SceneInstance {
    pub root: Entity,
    pub geometries: Vec<GeometryHandle>,
    pub materials: Vec<MaterialHandle>,
    pub textures: Vec<TextureHandle>,
}

impl SceneInstance {
    /// Remove the root's subtree and every asset the instance added
    pub fn despawn(self, world: &mut World) {
        world.despawn(self.root);
        if let Some(store) = world.resource_mut::<Assets<Geometry>>() {
            for handle in self.geometries {
                store.remove(handle);
            }
        }
        if let Some(store) = world.resource_mut::<Assets<Material>>() {
            for handle in self.materials {
                store.remove(handle);
            }
        }
        if let Some(store) = world.resource_mut::<Assets<Texture>>() {
            for handle in self.textures {
                store.remove(handle);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{Channel, Interpolation, Property};
    use crate::geometry::{BoxGeometry, SkinWeights};
    use glam::Vec4;

    fn two_node_scene() -> LoadedScene {
        let mut scene = LoadedScene::new("frame");
        scene.meshes.push(LoadedMesh {
            name: "box".into(),
            primitives: vec![LoadedPrimitive {
                geometry: BoxGeometry::cube(2.0),
                material: Some(0),
            }],
        });
        scene.materials.push(LoadedMaterial {
            name: "wood".into(),
            material: StandardMaterial::default(),
            base_color_texture: Some(0),
        });
        scene.textures.push(Texture::solid([200, 100, 50, 255]));
        scene.nodes.push(LoadedNode {
            name: "root".into(),
            translation: Vec3::new(0.0, 1.0, 0.0),
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            mesh: None,
            skin: None,
            children: vec![1],
        });
        scene.nodes.push(LoadedNode {
            name: "body".into(),
            translation: Vec3::new(2.0, 0.0, 0.0),
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            mesh: Some(0),
            skin: None,
            children: vec![],
        });
        scene.root_nodes.push(0);
        scene
    }

    #[test]
    fn test_bounds_follow_nodes() {
        let mut scene = two_node_scene();
        scene.compute_bounds();
        assert_eq!(scene.bounds.min, Vec3::new(1.0, 0.0, -1.0));
        assert_eq!(scene.bounds.max, Vec3::new(3.0, 2.0, 1.0));
    }

    #[test]
    fn test_instantiate_hierarchy() {
        let scene = two_node_scene();
        let mut world = World::new();
        let holder = world.spawn().insert(Object3D::new()).id();
        let root = scene.instantiate(&mut world, Some(holder)).root;

        assert_eq!(world.parent(root), Some(holder));
        assert_eq!(world.name(root), Some("frame"));
        let body = world.find_by_name("body");
        assert!(body.is_some());
        let mesh_entities = world.entities_with::<Mesh>();
        assert_eq!(mesh_entities.len(), 1);
        assert_eq!(world.parent(mesh_entities[0]), body);

        // texture wired into the material
        let mesh = world.get::<Mesh>(mesh_entities[0]).copied();
        let map = mesh.and_then(|m| {
            world
                .resource::<Assets<Material>>()
                .and_then(|s| s.get(m.material))
                .and_then(Material::map)
        });
        assert!(map.is_some());

        // no animations, no mixer
        assert!(!world.has::<AnimationMixer>(root));
    }

    #[test]
    fn test_animations_attach_mixer() {
        let mut scene = two_node_scene();
        scene.animations.push(AnimationClip::new(
            "spin",
            vec![Channel {
                node: 1,
                property: Property::Rotation,
                interpolation: Interpolation::Linear,
                times: vec![0.0, 1.0],
                values: vec![Vec4::from(Quat::IDENTITY); 2],
            }],
        ));
        let mut world = World::new();
        let root = scene.instantiate(&mut world, None).root;
        let mixer = world.get::<AnimationMixer>(root);
        assert_eq!(mixer.map(|m| m.clips().len()), Some(1));
        assert_eq!(mixer.map(|m| m.targets().len()), Some(2));
        assert_eq!(mixer.map(|m| m.is_playing()), Some(false));
    }

    #[test]
    fn test_skinned_primitive() {
        let mut scene = two_node_scene();
        let count = scene.meshes[0].primitives[0].geometry.vertex_count();
        scene.meshes[0].primitives[0].geometry.skin = Some(SkinWeights {
            joints: vec![[0, 0, 0, 0]; count],
            weights: vec![[1.0, 0.0, 0.0, 0.0]; count],
        });
        scene.skins.push(LoadedSkin {
            name: None,
            joints: vec![0],
            inverse_bind_matrices: vec![Mat4::IDENTITY],
        });
        scene.nodes[1].skin = Some(0);

        let mut world = World::new();
        scene.instantiate(&mut world, None);
        let skinned = world.entities_with::<SkinnedMesh>();
        assert_eq!(skinned.len(), 1);
        let mesh = world.get::<Mesh>(skinned[0]).map(|m| m.geometry);
        let bind = world.get::<SkinnedMesh>(skinned[0]).map(|s| s.bind_geometry);
        assert_ne!(mesh, bind);
    }

    #[test]
    fn test_unreachable_nodes_not_spawned() {
        let mut scene = two_node_scene();
        scene.nodes.push(LoadedNode {
            name: "other_scene".into(),
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            mesh: Some(0),
            skin: None,
            children: vec![],
        });
        scene.animations.push(AnimationClip::new("idle", Vec::<Channel>::new()));

        let mut world = World::new();
        let instance = scene.instantiate(&mut world, None);
        assert!(world.find_by_name("other_scene").is_none());
        assert_eq!(world.entities_with::<Mesh>().len(), 1);
        let targets = world.get::<AnimationMixer>(instance.root).map(|m| m.targets().to_vec());
        assert_eq!(targets.map(|t| t[2]), Some(None));

        instance.despawn(&mut world);
        assert_eq!(world.entity_count(), 0);
    }

    #[test]
    fn test_despawn_releases_assets() {
        let scene = two_node_scene();
        let mut world = World::new();
        let first = scene.instantiate(&mut world, None);
        let second = scene.instantiate(&mut world, None);
        first.despawn(&mut world);

        // one geometry, the file's material plus the fallback, one texture
        assert_eq!(world.resource::<Assets<Geometry>>().map(Assets::len), Some(1));
        assert_eq!(world.resource::<Assets<Material>>().map(Assets::len), Some(2));
        assert_eq!(world.resource::<Assets<Texture>>().map(Assets::len), Some(1));
        assert!(world.exists(second.root));

        second.despawn(&mut world);
        assert_eq!(world.resource::<Assets<Geometry>>().map(Assets::len), Some(0));
        assert_eq!(world.resource::<Assets<Material>>().map(Assets::len), Some(0));
        assert_eq!(world.entity_count(), 0);
    }

    #[test]
    fn test_skin_with_missing_joint_dropped() {
        let mut scene = two_node_scene();
        let count = scene.meshes[0].primitives[0].geometry.vertex_count();
        scene.meshes[0].primitives[0].geometry.skin = Some(SkinWeights {
            joints: vec![[0, 1, 0, 0]; count],
            weights: vec![[0.5, 0.5, 0.0, 0.0]; count],
        });
        scene.skins.push(LoadedSkin {
            name: Some("rig".into()),
            joints: vec![7, 0],
            inverse_bind_matrices: vec![Mat4::IDENTITY; 2],
        });
        scene.nodes[1].skin = Some(0);

        let mut world = World::new();
        scene.instantiate(&mut world, None);
        assert!(world.entities_with::<SkinnedMesh>().is_empty());
        assert_eq!(world.entities_with::<Mesh>().len(), 1);
    }
}
