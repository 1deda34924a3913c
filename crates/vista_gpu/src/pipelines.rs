//! Render pipelines

use rustc_hash::FxHashMap;
use std::num::NonZeroU64;
use vista_3d::geometry::{LineVertex, Vertex};
use vista_3d::lights::LightUniforms;
use vista_3d::materials::{ShaderProgram, Side};

use crate::shaders::{BACKGROUND_SHADER, LINE_SHADER, LIT_SHADER, PROCEDURAL_SHADER, SHADOW_SHADER};
use crate::uniforms::{CameraUniform, MaterialUniform, ModelUniform, ShadowPassUniform};
use crate::DEPTH_FORMAT;

/// Vertex buffer layout of [`Vertex`]
pub fn mesh_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x2
    ];
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRIBUTES,
    }
}

/// Position-only view of [`Vertex`] for depth passes
fn shadow_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRIBUTES,
    }
}

/// Vertex buffer layout of [`LineVertex`]
pub fn line_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x4
    ];
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<LineVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRIBUTES,
    }
}

/// Vertex and fragment entry points of a procedural program
pub fn procedural_entry_points(program: ShaderProgram) -> (&'static str, &'static str) {
    match program {
        ShaderProgram::Plasma => ("vs_plasma", "fs_plasma"),
        ShaderProgram::Ripple => ("vs_ripple", "fs_ripple"),
    }
}

/// Face culling for a material side (geometry is counter-clockwise)
pub fn cull_mode(side: Side) -> Option<wgpu::Face> {
    match side {
        Side::Front => Some(wgpu::Face::Back),
        Side::Back => Some(wgpu::Face::Front),
        Side::Double => None,
    }
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages, size: usize, dynamic: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: dynamic,
            min_binding_size: NonZeroU64::new(size as u64),
        },
        count: None,
    }
}

fn texture_entry(binding: u32, sample_type: wgpu::TextureSampleType, dimension: wgpu::TextureViewDimension) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type,
            view_dimension: dimension,
            multisampled: false,
        },
        count: None,
    }
}

fn sampler_entry(binding: u32, ty: wgpu::SamplerBindingType) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(ty),
        count: None,
    }
}

/// Bind group layouts shared by the scene pipelines
pub struct BindGroupLayouts {
    /// Group 0: camera, lights, shadow map, environment
    pub frame: wgpu::BindGroupLayout,
    /// Group 1: per-draw model block (dynamic offset)
    pub model: wgpu::BindGroupLayout,
    /// Group 2: material block and base color map
    pub material: wgpu::BindGroupLayout,
    /// Group 0 of the shadow pass: light view-projection (dynamic offset)
    pub shadow_pass: wgpu::BindGroupLayout,
}

impl BindGroupLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        let all = wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT;

        let frame = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Bind Group Layout"),
            entries: &[
                uniform_entry(0, all, std::mem::size_of::<CameraUniform>(), false),
                uniform_entry(1, wgpu::ShaderStages::FRAGMENT, std::mem::size_of::<LightUniforms>(), false),
                texture_entry(2, wgpu::TextureSampleType::Depth, wgpu::TextureViewDimension::D2Array),
                sampler_entry(3, wgpu::SamplerBindingType::Comparison),
                texture_entry(
                    4,
                    wgpu::TextureSampleType::Float { filterable: true },
                    wgpu::TextureViewDimension::D2,
                ),
                sampler_entry(5, wgpu::SamplerBindingType::Filtering),
            ],
        });

        let model = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Model Bind Group Layout"),
            entries: &[uniform_entry(0, all, std::mem::size_of::<ModelUniform>(), true)],
        });

        let material = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Material Bind Group Layout"),
            entries: &[
                uniform_entry(0, all, std::mem::size_of::<MaterialUniform>(), false),
                texture_entry(
                    1,
                    wgpu::TextureSampleType::Float { filterable: true },
                    wgpu::TextureViewDimension::D2,
                ),
                sampler_entry(2, wgpu::SamplerBindingType::Filtering),
            ],
        });

        let shadow_pass = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Shadow Pass Bind Group Layout"),
            entries: &[uniform_entry(
                0,
                wgpu::ShaderStages::VERTEX,
                std::mem::size_of::<ShadowPassUniform>(),
                true,
            )],
        });

        Self {
            frame,
            model,
            material,
            shadow_pass,
        }
    }
}

/// Key for the lit/procedural pipeline variants
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PipelineKey {
    pub program: Option<ShaderProgram>,
    pub cull: Option<wgpu::Face>,
    pub transparent: bool,
}

/// Compiled scene pipelines
///
/// Mesh pipelines are created lazily per [`PipelineKey`]; the line,
/// shadow and background pipelines are fixed.
pub struct Pipelines {
    lit_shader: wgpu::ShaderModule,
    procedural_shader: wgpu::ShaderModule,
    scene_layout: wgpu::PipelineLayout,
    color_format: wgpu::TextureFormat,
    sample_count: u32,
    meshes: FxHashMap<PipelineKey, wgpu::RenderPipeline>,
    pub line: wgpu::RenderPipeline,
    pub shadow: wgpu::RenderPipeline,
    pub background: wgpu::RenderPipeline,
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        layouts: &BindGroupLayouts,
        color_format: wgpu::TextureFormat,
        sample_count: u32,
    ) -> Self {
        let lit_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Lit Shader"),
            source: wgpu::ShaderSource::Wgsl(LIT_SHADER.into()),
        });
        let procedural_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Procedural Shader"),
            source: wgpu::ShaderSource::Wgsl(PROCEDURAL_SHADER.into()),
        });
        let line_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Line Shader"),
            source: wgpu::ShaderSource::Wgsl(LINE_SHADER.into()),
        });
        let shadow_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Shadow Shader"),
            source: wgpu::ShaderSource::Wgsl(SHADOW_SHADER.into()),
        });
        let background_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Background Shader"),
            source: wgpu::ShaderSource::Wgsl(BACKGROUND_SHADER.into()),
        });

        let scene_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&layouts.frame, &layouts.model, &layouts.material],
            push_constant_ranges: &[],
        });
        let frame_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Frame Pipeline Layout"),
            bind_group_layouts: &[&layouts.frame],
            push_constant_ranges: &[],
        });
        let shadow_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Shadow Pipeline Layout"),
            bind_group_layouts: &[&layouts.shadow_pass, &layouts.model],
            push_constant_ranges: &[],
        });

        let multisample = wgpu::MultisampleState {
            count: sample_count,
            mask: !0,
            alpha_to_coverage_enabled: false,
        };

        let line = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Line Pipeline"),
            layout: Some(&frame_layout),
            vertex: wgpu::VertexState {
                module: &line_shader,
                entry_point: Some("vs_main"),
                buffers: &[line_vertex_layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &line_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(color_target(color_format, true))],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                ..Default::default()
            },
            depth_stencil: Some(depth_state(true, wgpu::CompareFunction::LessEqual)),
            multisample,
            multiview: None,
            cache: None,
        });

        let shadow = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Shadow Pipeline"),
            layout: Some(&shadow_layout),
            vertex: wgpu::VertexState {
                module: &shadow_shader,
                entry_point: Some("vs_main"),
                buffers: &[shadow_vertex_layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: None,
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                bias: wgpu::DepthBiasState {
                    constant: 2,
                    slope_scale: 2.0,
                    clamp: 0.0,
                },
                ..depth_state(true, wgpu::CompareFunction::LessEqual)
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let background = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Background Pipeline"),
            layout: Some(&frame_layout),
            vertex: wgpu::VertexState {
                module: &background_shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &background_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(color_target(color_format, false))],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: Some(depth_state(false, wgpu::CompareFunction::Always)),
            multisample,
            multiview: None,
            cache: None,
        });

        Self {
            lit_shader,
            procedural_shader,
            scene_layout,
            color_format,
            sample_count,
            meshes: FxHashMap::default(),
            line,
            shadow,
            background,
        }
    }

    /// Mesh pipeline for `key`, if [`Pipelines::prepare_mesh`] built it
    pub fn mesh(&self, key: PipelineKey) -> Option<&wgpu::RenderPipeline> {
        self.meshes.get(&key)
    }

    /// Build the mesh pipeline for `key` unless cached
    pub fn prepare_mesh(&mut self, device: &wgpu::Device, key: PipelineKey) {
        let Self {
            lit_shader,
            procedural_shader,
            scene_layout,
            color_format,
            sample_count,
            meshes,
            ..
        } = self;

        meshes.entry(key).or_insert_with(|| {
            let (module, vs, fs) = match key.program {
                None => (&*lit_shader, "vs_main", "fs_main"),
                Some(program) => {
                    let (vs, fs) = procedural_entry_points(program);
                    (&*procedural_shader, vs, fs)
                }
            };
            tracing::debug!(?key, "creating mesh pipeline");

            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Mesh Pipeline"),
                layout: Some(&*scene_layout),
                vertex: wgpu::VertexState {
                    module,
                    entry_point: Some(vs),
                    buffers: &[mesh_vertex_layout()],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module,
                    entry_point: Some(fs),
                    targets: &[Some(color_target(*color_format, key.transparent))],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: key.cull,
                    ..Default::default()
                },
                depth_stencil: Some(depth_state(!key.transparent, wgpu::CompareFunction::LessEqual)),
                multisample: wgpu::MultisampleState {
                    count: *sample_count,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                multiview: None,
                cache: None,
            })
        });
    }
}

/// Shaders write premultiplied color
fn color_target(format: wgpu::TextureFormat, blend: bool) -> wgpu::ColorTargetState {
    wgpu::ColorTargetState {
        format,
        blend: blend.then_some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
        write_mask: wgpu::ColorWrites::ALL,
    }
}

fn depth_state(write: bool, compare: wgpu::CompareFunction) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: write,
        depth_compare: compare,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}
