//! Uniform blocks shared with the WGSL sources
//!
//! Every struct here mirrors a struct in `shaders/common.wgsl` field by
//! field; the shader tests compare their sizes through naga.

use glam::{Mat4, Vec3};
use vista_3d::materials::{Material, MaterialType};
use vista_3d::scene::{GlobalTransform, PerspectiveCamera};

/// Alignment of dynamic uniform offsets (`min_uniform_buffer_offset_alignment`
/// of the default limits)
pub const UNIFORM_ALIGNMENT: u64 = 256;

/// Camera uniform data for GPU
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_projection: [[f32; 4]; 4],
    pub inverse_view_projection: [[f32; 4]; 4],
    /// xyz eye position, w elapsed seconds
    pub position: [f32; 4],
    /// rgb environment radiance, w 1 when the background is drawn
    pub environment: [f32; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view_projection: Mat4::IDENTITY.to_cols_array_2d(),
            inverse_view_projection: Mat4::IDENTITY.to_cols_array_2d(),
            position: [0.0, 0.0, 0.0, 0.0],
            environment: [0.0; 4],
        }
    }
}

impl CameraUniform {
    /// Build from a camera and its world matrix
    pub fn new(camera: &PerspectiveCamera, world: &Mat4, time: f32) -> Self {
        let view_projection = camera.projection_matrix() * PerspectiveCamera::view_from_world(world);
        let eye = world.w_axis.truncate();
        Self {
            view_projection: view_projection.to_cols_array_2d(),
            inverse_view_projection: view_projection.inverse().to_cols_array_2d(),
            position: eye.extend(time).to_array(),
            environment: [0.0; 4],
        }
    }

    pub fn with_environment(mut self, radiance: [f32; 3], background: bool) -> Self {
        self.environment = [radiance[0], radiance[1], radiance[2], if background { 1.0 } else { 0.0 }];
        self
    }

    pub fn eye(&self) -> Vec3 {
        Vec3::new(self.position[0], self.position[1], self.position[2])
    }
}

/// Model uniform data for GPU
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelUniform {
    /// Model matrix (local to world)
    pub model: [[f32; 4]; 4],
    /// Normal matrix (transpose of inverse model matrix)
    pub normal_matrix: [[f32; 4]; 4],
    /// x receive shadows
    pub flags: [f32; 4],
}

impl ModelUniform {
    pub fn new(transform: &GlobalTransform, receive_shadows: bool) -> Self {
        Self {
            model: transform.matrix.to_cols_array_2d(),
            normal_matrix: transform.normal_matrix().to_cols_array_2d(),
            flags: [if receive_shadows { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
        }
    }
}

impl Default for ModelUniform {
    fn default() -> Self {
        Self::new(&GlobalTransform::default(), false)
    }
}

/// Material uniform data for GPU
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    /// Linear rgb, a opacity
    pub color: [f32; 4],
    /// rgb emissive, w shininess
    pub emissive: [f32; 4],
    /// rgb specular, w environment intensity
    pub specular: [f32; 4],
    /// x kind, y metalness, z roughness, w has map
    pub params: [f32; 4],
    /// Second procedural color
    pub color_b: [f32; 4],
    /// x time, y amplitude, z frequency
    pub wave: [f32; 4],
}

impl MaterialUniform {
    /// Pack a material; `has_map` says whether its texture resolved on the GPU
    pub fn from_material(material: &Material, has_map: bool) -> Self {
        let kind = match material.material_type() {
            MaterialType::Basic => 0.0,
            MaterialType::Phong => 1.0,
            MaterialType::Standard => 2.0,
            MaterialType::Shader => 3.0,
        };
        let map = if has_map { 1.0 } else { 0.0 };
        let rgba = |c: vista_3d::math::Color, a: f32| {
            let l = c.to_linear();
            [l.r, l.g, l.b, a]
        };

        match material {
            Material::Basic(m) => Self {
                color: rgba(m.color, m.opacity),
                params: [kind, 0.0, 1.0, map],
                ..Default::default()
            },
            Material::Phong(m) => Self {
                color: rgba(m.color, m.opacity),
                emissive: rgba(m.emissive, m.shininess),
                specular: rgba(m.specular, 0.0),
                params: [kind, 0.0, 1.0, map],
                ..Default::default()
            },
            Material::Standard(m) => Self {
                color: rgba(m.color, m.opacity),
                emissive: rgba(m.emissive, 0.0),
                specular: [0.0, 0.0, 0.0, m.env_map_intensity],
                params: [kind, m.metalness, m.roughness, map],
                ..Default::default()
            },
            Material::Shader(m) => Self {
                color: rgba(m.uniforms.color_a, 1.0),
                color_b: rgba(m.uniforms.color_b, 1.0),
                params: [kind, 0.0, 1.0, 0.0],
                wave: [m.uniforms.time, m.uniforms.amplitude, m.uniforms.frequency, 0.0],
                ..Default::default()
            },
        }
    }
}

/// View-projection of one shadow layer
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShadowPassUniform {
    pub view_projection: [[f32; 4]; 4],
}

/// Round a uniform size up to the dynamic offset alignment
pub fn aligned_stride(size: usize) -> u64 {
    let size = size as u64;
    size.div_ceil(UNIFORM_ALIGNMENT) * UNIFORM_ALIGNMENT
}

/// Lay out Pod blocks at a fixed stride for dynamic-offset binding
pub fn pack_aligned<T: bytemuck::Pod>(items: &[T]) -> Vec<u8> {
    let stride = aligned_stride(std::mem::size_of::<T>()) as usize;
    let mut bytes = vec![0u8; items.len() * stride];
    for (i, item) in items.iter().enumerate() {
        let raw = bytemuck::bytes_of(item);
        bytes[i * stride..i * stride + raw.len()].copy_from_slice(raw);
    }
    bytes
}

/// IEEE half-precision bits of `value` (round to nearest even)
pub fn f32_to_f16(value: f32) -> u16 {
    let bits = value.to_bits();
    let sign = ((bits >> 16) & 0x8000) as u16;
    let exp = ((bits >> 23) & 0xff) as i32;
    let mantissa = bits & 0x007f_ffff;

    if exp == 0xff {
        // inf or nan
        let nan = if mantissa != 0 { 0x0200 } else { 0 };
        return sign | 0x7c00 | nan;
    }

    let half_exp = exp - 127 + 15;
    if half_exp >= 0x1f {
        return sign | 0x7c00;
    }
    if half_exp <= 0 {
        if half_exp < -10 {
            return sign;
        }
        // subnormal
        let m = mantissa | 0x0080_0000;
        let shift = (14 - half_exp) as u32;
        let mut half = (m >> shift) as u16;
        let rem = m & ((1 << shift) - 1);
        let halfway = 1 << (shift - 1);
        if rem > halfway || (rem == halfway && half & 1 == 1) {
            half += 1;
        }
        return sign | half;
    }

    let mut half = ((half_exp as u32) << 10 | (mantissa >> 13)) as u16;
    let rem = mantissa & 0x1fff;
    if rem > 0x1000 || (rem == 0x1000 && half & 1 == 1) {
        // carry may roll into the exponent, which is still correct
        half += 1;
    }
    sign | half
}
