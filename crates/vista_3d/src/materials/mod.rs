//! Material system

mod basic;
mod phong;
mod shader;
mod standard;
mod texture;

pub use basic::BasicMaterial;
pub use phong::PhongMaterial;
pub use shader::{ShaderMaterial, ShaderProgram, ShaderUniforms};
pub use standard::StandardMaterial;
pub use texture::{Texture, TextureData};

use crate::assets::TextureHandle;
use crate::math::Color;

/// A surface description referenced by [`Mesh`](crate::scene::Mesh)
#[derive(Clone, Debug, PartialEq)]
pub enum Material {
    /// Unlit flat color
    Basic(BasicMaterial),
    /// Classic Blinn-Phong shading
    Phong(PhongMaterial),
    /// Metallic-roughness PBR
    Standard(StandardMaterial),
    /// Built-in procedural shader program
    Shader(ShaderMaterial),
}

/// Material types
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaterialType {
    Basic,
    Phong,
    Standard,
    Shader,
}

impl Material {
    pub fn material_type(&self) -> MaterialType {
        match self {
            Material::Basic(_) => MaterialType::Basic,
            Material::Phong(_) => MaterialType::Phong,
            Material::Standard(_) => MaterialType::Standard,
            Material::Shader(_) => MaterialType::Shader,
        }
    }

    /// Base color (shader materials report their first color)
    pub fn base_color(&self) -> Color {
        match self {
            Material::Basic(m) => m.color,
            Material::Phong(m) => m.color,
            Material::Standard(m) => m.color,
            Material::Shader(m) => m.uniforms.color_a,
        }
    }

    pub fn side(&self) -> Side {
        match self {
            Material::Basic(m) => m.side,
            Material::Phong(m) => m.side,
            Material::Standard(m) => m.side,
            Material::Shader(m) => m.side,
        }
    }

    pub fn opacity(&self) -> f32 {
        match self {
            Material::Basic(m) => m.opacity,
            Material::Phong(m) => m.opacity,
            Material::Standard(m) => m.opacity,
            Material::Shader(_) => 1.0,
        }
    }

    /// Whether this material needs blending
    pub fn is_transparent(&self) -> bool {
        match self {
            Material::Basic(m) => m.transparent,
            Material::Phong(m) => m.transparent,
            Material::Standard(m) => m.transparent,
            Material::Shader(_) => false,
        }
    }

    /// Base color texture, if any
    pub fn map(&self) -> Option<TextureHandle> {
        match self {
            Material::Basic(m) => m.map,
            Material::Phong(m) => m.map,
            Material::Standard(m) => m.map,
            Material::Shader(_) => None,
        }
    }

    /// Whether lights and shadows affect this material
    pub fn is_lit(&self) -> bool {
        matches!(self, Material::Phong(_) | Material::Standard(_))
    }
}

impl From<BasicMaterial> for Material {
    fn from(m: BasicMaterial) -> Self {
        Material::Basic(m)
    }
}

impl From<PhongMaterial> for Material {
    fn from(m: PhongMaterial) -> Self {
        Material::Phong(m)
    }
}

impl From<StandardMaterial> for Material {
    fn from(m: StandardMaterial) -> Self {
        Material::Standard(m)
    }
}

impl From<ShaderMaterial> for Material {
    fn from(m: ShaderMaterial) -> Self {
        Material::Shader(m)
    }
}

/// Which side of faces to render
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Side {
    /// Render front faces only
    #[default]
    Front,
    /// Render back faces only
    Back,
    /// Render both sides
    Double,
}
