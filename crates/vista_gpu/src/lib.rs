//! Vista GPU Renderer
//!
//! wgpu rendering for `vista_3d` worlds.
//!
//! # Features
//!
//! - **Lit materials**: basic, Blinn-Phong, and metallic-roughness shading
//! - **Procedural materials**: time-driven plasma and ripple programs
//! - **Shadows**: PCF-filtered depth maps for one directional and one spot light
//! - **Environment**: equirectangular HDR backgrounds and ambient lighting
//! - **Helpers**: world-space line lists for light gizmos
//!
//! [`GpuContext`] owns the device and surface; [`SceneRenderer`] mirrors a
//! world's assets onto the GPU and draws it each frame.

pub mod context;
pub mod error;
pub mod items;
pub mod pipelines;
pub mod renderer;
pub mod shaders;
pub mod uniforms;

pub use context::{ContextSettings, GpuContext};
pub use error::{GpuError, Result};
pub use items::{collect_render_items, DrawKind, RenderItem};
pub use renderer::SceneRenderer;
pub use uniforms::{CameraUniform, MaterialUniform, ModelUniform};

/// Depth format of the main and shadow passes
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
