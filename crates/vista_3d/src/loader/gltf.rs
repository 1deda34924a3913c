//! glTF 2.0 loader
//!
//! Reads `.gltf` and `.glb` files using the `gltf` crate. Buffers and images
//! are resolved relative to the file; embedded data URIs and GLB blobs work
//! from plain byte slices as well.

use super::scene::{LoadedMaterial, LoadedMesh, LoadedNode, LoadedPrimitive, LoadedScene, LoadedSkin};
use super::{read_with_progress, LoadError, Progress, Result};
use crate::animation::{AnimationClip, Channel, Interpolation, Property};
use crate::geometry::{Geometry, SkinWeights, Vertex};
use crate::materials::{Side, StandardMaterial, Texture};
use crate::math::Color;
use glam::{Mat4, Quat, Vec3, Vec4};
use std::path::Path;

/// glTF 2.0 scene loader
#[derive(Clone, Debug)]
pub struct GltfLoader {
    /// Whether to load animations
    pub load_animations: bool,
    /// Whether to decode images
    pub load_textures: bool,
}

impl Default for GltfLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl GltfLoader {
    pub fn new() -> Self {
        Self {
            load_animations: true,
            load_textures: true,
        }
    }

    pub fn with_animations(mut self, load: bool) -> Self {
        self.load_animations = load;
        self
    }

    pub fn with_textures(mut self, load: bool) -> Self {
        self.load_textures = load;
        self
    }

    /// Load a file, reporting read progress
    pub fn load_path(&self, path: impl AsRef<Path>, progress: impl FnMut(Progress)) -> Result<LoadedScene> {
        let path = path.as_ref();
        let bytes = read_with_progress(path, progress)?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("scene");
        self.load(&bytes, path.parent(), name)
    }

    /// Load from memory; external buffer or image URIs are not resolvable
    pub fn load_slice(&self, bytes: &[u8]) -> Result<LoadedScene> {
        self.load(bytes, None, "scene")
    }

    fn load(&self, bytes: &[u8], base: Option<&Path>, name: &str) -> Result<LoadedScene> {
        let gltf::Gltf { document, blob } =
            gltf::Gltf::from_slice(bytes).map_err(|e| LoadError::Parse(e.to_string()))?;
        let buffers = gltf::import_buffers(&document, base, blob).map_err(import_error)?;

        let mut scene = LoadedScene::new(name);

        if self.load_textures {
            let images = gltf::import_images(&document, base, &buffers).map_err(import_error)?;
            scene.textures = images.into_iter().map(convert_image).collect();
        }

        // Textures reference images; materials reference textures
        let texture_images: Vec<usize> = document.textures().map(|t| t.source().index()).collect();
        for material in document.materials() {
            scene.materials.push(load_material(&material, &texture_images, self.load_textures));
        }

        for mesh in document.meshes() {
            let primitives = mesh
                .primitives()
                .filter(|p| p.mode() == gltf::mesh::Mode::Triangles)
                .filter_map(|p| load_primitive(&p, &buffers))
                .collect();
            scene.meshes.push(LoadedMesh {
                name: mesh.name().unwrap_or("mesh").to_string(),
                primitives,
            });
        }

        for node in document.nodes() {
            let (translation, rotation, scale) = node.transform().decomposed();
            scene.nodes.push(LoadedNode {
                name: node
                    .name()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("node{}", node.index())),
                translation: Vec3::from_array(translation),
                rotation: Quat::from_array(rotation),
                scale: Vec3::from_array(scale),
                mesh: node.mesh().map(|m| m.index()),
                skin: node.skin().map(|s| s.index()),
                children: node.children().map(|c| c.index()).collect(),
            });
        }

        for skin in document.skins() {
            let reader = skin.reader(|b| buffers.get(b.index()).map(|d| d.0.as_slice()));
            let joints: Vec<usize> = skin.joints().map(|j| j.index()).collect();
            let inverse_bind_matrices = match reader.read_inverse_bind_matrices() {
                Some(iter) => iter.map(|m| Mat4::from_cols_array_2d(&m)).collect(),
                None => vec![Mat4::IDENTITY; joints.len()],
            };
            scene.skins.push(LoadedSkin {
                name: skin.name().map(str::to_string),
                joints,
                inverse_bind_matrices,
            });
        }

        if let Some(root) = document.default_scene().or_else(|| document.scenes().next()) {
            scene.root_nodes = root.nodes().map(|n| n.index()).collect();
        } else {
            // No scene: every parentless node is a root
            let mut has_parent = vec![false; scene.nodes.len()];
            for node in &scene.nodes {
                for &child in &node.children {
                    if let Some(flag) = has_parent.get_mut(child) {
                        *flag = true;
                    }
                }
            }
            scene.root_nodes = (0..scene.nodes.len()).filter(|&i| !has_parent[i]).collect();
        }

        if self.load_animations {
            for (index, animation) in document.animations().enumerate() {
                if let Some(clip) = load_animation(&animation, index, &buffers) {
                    scene.animations.push(clip);
                }
            }
        }

        scene.compute_bounds();

        tracing::debug!(
            name,
            meshes = scene.meshes.len(),
            nodes = scene.nodes.len(),
            animations = scene.animations.len(),
            "glTF loaded"
        );
        Ok(scene)
    }
}

fn import_error(err: gltf::Error) -> LoadError {
    match err {
        gltf::Error::Io(e) => e.into(),
        other => LoadError::InvalidData(other.to_string()),
    }
}

fn convert_image(image: gltf::image::Data) -> Texture {
    use gltf::image::Format;

    let pixels = image.width as usize * image.height as usize;
    let rgba: Option<Vec<u8>> = match image.format {
        Format::R8G8B8A8 => Some(image.pixels),
        Format::R8G8B8 => Some(
            image
                .pixels
                .chunks_exact(3)
                .flat_map(|p| [p[0], p[1], p[2], 255])
                .collect(),
        ),
        Format::R8G8 => Some(
            image
                .pixels
                .chunks_exact(2)
                .flat_map(|p| [p[0], p[1], 0, 255])
                .collect(),
        ),
        Format::R8 => Some(image.pixels.iter().flat_map(|&v| [v, v, v, 255]).collect()),
        _ => None,
    };

    match rgba.filter(|p| p.len() == pixels * 4) {
        Some(rgba) => Texture::rgba8(image.width, image.height, rgba, true).unwrap_or_else(|| Texture::solid([255; 4])),
        None => {
            tracing::warn!(format = ?image.format, "unsupported glTF image format, using white");
            Texture::solid([255; 4])
        }
    }
}

fn load_material(material: &gltf::Material, texture_images: &[usize], with_textures: bool) -> LoadedMaterial {
    let pbr = material.pbr_metallic_roughness();
    let [r, g, b, a] = pbr.base_color_factor();
    let [er, eg, eb] = material.emissive_factor();

    let standard = StandardMaterial {
        color: Color::rgba(r, g, b, a),
        metalness: pbr.metallic_factor(),
        roughness: pbr.roughness_factor(),
        emissive: Color::rgb(er, eg, eb),
        opacity: a,
        transparent: material.alpha_mode() == gltf::material::AlphaMode::Blend,
        side: if material.double_sided() { Side::Double } else { Side::Front },
        ..Default::default()
    };

    LoadedMaterial {
        name: material.name().unwrap_or("material").to_string(),
        material: standard,
        base_color_texture: pbr
            .base_color_texture()
            .filter(|_| with_textures)
            .and_then(|info| texture_images.get(info.texture().index()).copied()),
    }
}

fn load_primitive(primitive: &gltf::Primitive, buffers: &[gltf::buffer::Data]) -> Option<LoadedPrimitive> {
    let reader = primitive.reader(|b| buffers.get(b.index()).map(|d| d.0.as_slice()));

    let positions: Vec<[f32; 3]> = reader.read_positions()?.collect();
    if positions.is_empty() {
        return None;
    }
    let normals: Option<Vec<[f32; 3]>> = reader.read_normals().map(Iterator::collect);
    let uvs: Option<Vec<[f32; 2]>> = reader.read_tex_coords(0).map(|iter| iter.into_f32().collect());

    let indices: Vec<u32> = reader
        .read_indices()
        .map(|iter| iter.into_u32().collect())
        .unwrap_or_else(|| (0..positions.len() as u32).collect());

    let vertices = positions
        .iter()
        .enumerate()
        .map(|(i, &position)| {
            Vertex::new(
                position,
                normals.as_ref().and_then(|n| n.get(i).copied()).unwrap_or([0.0, 1.0, 0.0]),
                uvs.as_ref().and_then(|u| u.get(i).copied()).unwrap_or([0.0, 0.0]),
            )
        })
        .collect();

    let mut geometry = Geometry::from_data(vertices, indices);
    if normals.is_none() {
        geometry.recompute_normals();
    }

    let joints: Option<Vec<[u16; 4]>> = reader.read_joints(0).map(|iter| iter.into_u16().collect());
    let weights: Option<Vec<[f32; 4]>> = reader.read_weights(0).map(|iter| iter.into_f32().collect());
    if let (Some(joints), Some(weights)) = (joints, weights) {
        if joints.len() == positions.len() && weights.len() == positions.len() {
            geometry.skin = Some(SkinWeights { joints, weights });
        }
    }

    Some(LoadedPrimitive {
        geometry,
        material: primitive.material().index(),
    })
}

fn load_animation(
    animation: &gltf::Animation,
    index: usize,
    buffers: &[gltf::buffer::Data],
) -> Option<AnimationClip> {
    use gltf::animation::util::ReadOutputs;

    let mut channels = Vec::new();
    for channel in animation.channels() {
        let reader = channel.reader(|b| buffers.get(b.index()).map(|d| d.0.as_slice()));
        let Some(inputs) = reader.read_inputs() else {
            continue;
        };
        let times: Vec<f32> = inputs.collect();

        let (property, values): (Property, Vec<Vec4>) = match reader.read_outputs() {
            Some(ReadOutputs::Translations(iter)) => {
                (Property::Translation, iter.map(|t| Vec3::from_array(t).extend(0.0)).collect())
            }
            Some(ReadOutputs::Rotations(iter)) => {
                (Property::Rotation, iter.into_f32().map(Vec4::from_array).collect())
            }
            Some(ReadOutputs::Scales(iter)) => {
                (Property::Scale, iter.map(|s| Vec3::from_array(s).extend(0.0)).collect())
            }
            // Morph targets are not supported
            Some(ReadOutputs::MorphTargetWeights(_)) | None => continue,
        };

        let interpolation = match channel.sampler().interpolation() {
            gltf::animation::Interpolation::Step => Interpolation::Step,
            gltf::animation::Interpolation::Linear => Interpolation::Linear,
            gltf::animation::Interpolation::CubicSpline => Interpolation::CubicSpline,
        };

        channels.push(Channel {
            node: channel.target().node().index(),
            property,
            interpolation,
            times,
            values,
        });
    }

    if channels.is_empty() {
        return None;
    }
    let name = animation
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("animation{index}"));
    Some(AnimationClip::new(name, channels))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NODES_ONLY: &str = r#"{
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [ { "nodes": [0] } ],
        "nodes": [
            { "name": "frame", "children": [1], "translation": [1.0, 2.0, 3.0] },
            { "scale": [2.0, 2.0, 2.0] }
        ]
    }"#;

    #[test]
    fn test_load_node_tree() {
        let scene = GltfLoader::new().load_slice(NODES_ONLY.as_bytes()).unwrap();
        assert_eq!(scene.nodes.len(), 2);
        assert_eq!(scene.root_nodes, vec![0]);
        assert_eq!(scene.nodes[0].name, "frame");
        assert_eq!(scene.nodes[0].translation, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(scene.nodes[0].children, vec![1]);
        assert_eq!(scene.nodes[1].name, "node1");
        assert_eq!(scene.nodes[1].scale, Vec3::splat(2.0));
        assert!(scene.meshes.is_empty());
        assert!(!scene.has_animations());
        assert!(scene.bounds.is_empty());
    }

    #[test]
    fn test_rejects_garbage() {
        let err = GltfLoader::new().load_slice(b"not a model").unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = GltfLoader::new().load_path("/no/such/frame.glb", |_| {}).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }

    #[test]
    fn test_image_conversion() {
        let image = gltf::image::Data {
            pixels: vec![10, 20, 30, 40, 50, 60],
            format: gltf::image::Format::R8G8B8,
            width: 2,
            height: 1,
        };
        let texture = convert_image(image);
        assert_eq!(texture.width, 2);
        assert_eq!(
            texture.data,
            crate::materials::TextureData::Rgba8(vec![10, 20, 30, 255, 40, 50, 60, 255])
        );
    }
}
