//! Scene renderer
//!
//! Mirrors the asset stores of a [`World`] into GPU buffers and textures,
//! then draws the world in up to three passes per frame: one depth-only
//! pass per active shadow layer, and a main pass with the environment
//! background, meshes, and helper lines.

use std::num::NonZeroU64;

use rustc_hash::{FxHashMap, FxHashSet};
use wgpu::util::DeviceExt;

use vista_3d::assets::{Assets, GeometryHandle, MaterialHandle, TextureHandle};
use vista_3d::ecs::World;
use vista_3d::geometry::{Geometry, LineSegments, LineVertex};
use vista_3d::lights::{DirectionalLight, LightUniforms, SpotLight, SHADOW_LAYERS};
use vista_3d::materials::{Material, Texture, TextureData};
use vista_3d::scene::{ActiveCamera, GlobalTransform, PerspectiveCamera};

use crate::context::GpuContext;
use crate::items::{collect_render_items, RenderItem};
use crate::pipelines::{cull_mode, BindGroupLayouts, PipelineKey, Pipelines};
use crate::uniforms::{
    aligned_stride, f32_to_f16, pack_aligned, CameraUniform, MaterialUniform, ModelUniform, ShadowPassUniform,
};
use crate::{Result, DEPTH_FORMAT};

const DEFAULT_SHADOW_MAP_SIZE: u32 = 2048;
const INITIAL_MODEL_CAPACITY: usize = 64;
const INITIAL_LINE_CAPACITY: usize = 1024;

struct GpuGeometry {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

struct GpuTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

struct GpuMaterial {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    map: Option<TextureHandle>,
}

struct ShadowTarget {
    texture: wgpu::Texture,
    /// All layers, sampled by the lit shader
    array_view: wgpu::TextureView,
    /// One render target per layer
    layer_views: Vec<wgpu::TextureView>,
    size: u32,
}

/// Environment map state
struct Environment {
    texture: GpuTexture,
    radiance: [f32; 3],
    background: bool,
    lighting: bool,
}

/// Draws a [`World`] into a [`GpuContext`]
pub struct SceneRenderer {
    layouts: BindGroupLayouts,
    pipelines: Pipelines,

    camera_buffer: wgpu::Buffer,
    light_buffer: wgpu::Buffer,
    model_buffer: wgpu::Buffer,
    model_capacity: usize,
    model_bind_group: wgpu::BindGroup,
    shadow_pass_buffer: wgpu::Buffer,
    shadow_pass_bind_group: wgpu::BindGroup,
    line_buffer: wgpu::Buffer,
    line_capacity: usize,

    shadow: ShadowTarget,
    shadow_sampler: wgpu::Sampler,
    environment: Environment,
    env_sampler: wgpu::Sampler,
    frame_bind_group: wgpu::BindGroup,

    material_sampler: wgpu::Sampler,
    white: GpuTexture,

    geometries: FxHashMap<GeometryHandle, GpuGeometry>,
    textures: FxHashMap<TextureHandle, GpuTexture>,
    materials: FxHashMap<MaterialHandle, GpuMaterial>,

    clear_color: wgpu::Color,
}

impl SceneRenderer {
    pub fn new(ctx: &GpuContext) -> Self {
        let device = ctx.device();
        let queue = ctx.queue();

        let layouts = BindGroupLayouts::new(device);
        let pipelines = Pipelines::new(device, &layouts, ctx.format(), ctx.sample_count());

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Uniform Buffer"),
            contents: bytemuck::bytes_of(&CameraUniform::default()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let light_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Light Uniform Buffer"),
            contents: bytemuck::bytes_of(&LightUniforms::default()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let model_buffer = create_model_buffer(device, INITIAL_MODEL_CAPACITY);
        let model_bind_group = create_model_bind_group(device, &layouts, &model_buffer);

        let shadow_pass_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Shadow Pass Uniform Buffer"),
            size: aligned_stride(std::mem::size_of::<ShadowPassUniform>()) * SHADOW_LAYERS as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let shadow_pass_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Shadow Pass Bind Group"),
            layout: &layouts.shadow_pass,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &shadow_pass_buffer,
                    offset: 0,
                    size: NonZeroU64::new(std::mem::size_of::<ShadowPassUniform>() as u64),
                }),
            }],
        });

        let line_buffer = create_line_buffer(device, INITIAL_LINE_CAPACITY);

        let shadow = create_shadow_target(device, DEFAULT_SHADOW_MAP_SIZE);
        let shadow_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Shadow Sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            compare: Some(wgpu::CompareFunction::LessEqual),
            ..Default::default()
        });

        let env_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Environment Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let environment = Environment {
            texture: upload_texture(device, queue, &Texture::solid([0, 0, 0, 255]), "Empty Environment"),
            radiance: [0.0; 3],
            background: false,
            lighting: false,
        };

        let material_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Material Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let white = upload_texture(device, queue, &Texture::solid([255; 4]), "White Texture");

        let frame_bind_group = create_frame_bind_group(
            device,
            &layouts,
            &camera_buffer,
            &light_buffer,
            &shadow,
            &shadow_sampler,
            &environment.texture,
            &env_sampler,
        );

        Self {
            layouts,
            pipelines,
            camera_buffer,
            light_buffer,
            model_buffer,
            model_capacity: INITIAL_MODEL_CAPACITY,
            model_bind_group,
            shadow_pass_buffer,
            shadow_pass_bind_group,
            line_buffer,
            line_capacity: INITIAL_LINE_CAPACITY,
            shadow,
            shadow_sampler,
            environment,
            env_sampler,
            frame_bind_group,
            material_sampler,
            white,
            geometries: FxHashMap::default(),
            textures: FxHashMap::default(),
            materials: FxHashMap::default(),
            clear_color: wgpu::Color::TRANSPARENT,
        }
    }

    /// Color the main pass clears to (transparent by default)
    pub fn set_clear_color(&mut self, color: wgpu::Color) {
        self.clear_color = color;
    }

    /// Install an equirectangular environment map
    ///
    /// `background` draws it behind the scene; `lighting` adds its average
    /// radiance to the ambient term of lit materials.
    pub fn set_environment(
        &mut self,
        ctx: &GpuContext,
        texture: &Texture,
        radiance: [f32; 3],
        background: bool,
        lighting: bool,
    ) {
        let uploaded = upload_texture(ctx.device(), ctx.queue(), texture, "Environment Texture");
        let previous = std::mem::replace(&mut self.environment.texture, uploaded);
        previous.texture.destroy();
        self.environment.radiance = radiance;
        self.environment.background = background;
        self.environment.lighting = lighting;
        self.rebuild_frame_bind_group(ctx.device());
        tracing::debug!(
            width = texture.width,
            height = texture.height,
            background,
            lighting,
            "environment installed"
        );
    }

    /// Render one frame of `world` from its active camera
    ///
    /// Does nothing when the world has no camera with a computed transform.
    pub fn render(&mut self, ctx: &mut GpuContext, world: &mut World, time: f32) -> Result<()> {
        self.sync_assets(ctx, world);

        let Some(camera) = active_camera(world) else {
            tracing::trace!("no active camera");
            return Ok(());
        };
        let mut camera_uniform = CameraUniform::new(&camera.0, &camera.1, time);
        if self.environment.lighting || self.environment.background {
            let radiance = if self.environment.lighting {
                self.environment.radiance
            } else {
                [0.0; 3]
            };
            camera_uniform = camera_uniform.with_environment(radiance, self.environment.background);
        }

        let lights = LightUniforms::collect(world);
        let max_size = ctx.device().limits().max_texture_dimension_2d;
        self.ensure_shadow_size(ctx.device(), shadow_map_size(world, max_size));

        let items = collect_render_items(world, camera_uniform.eye());
        let lines: Vec<LineVertex> = world
            .query::<&LineSegments>()
            .iter()
            .filter(|(entity, _)| world.get::<GlobalTransform>(*entity).map_or(true, |g| g.visible))
            .flat_map(|(_, segments)| segments.vertices.iter().copied())
            .collect();

        let device = ctx.device();
        let queue = ctx.queue();

        queue.write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&camera_uniform));
        queue.write_buffer(&self.light_buffer, 0, bytemuck::bytes_of(&lights));

        self.ensure_model_capacity(device, items.len());
        if !items.is_empty() {
            let models: Vec<ModelUniform> = items.iter().map(|item| item.model).collect();
            queue.write_buffer(&self.model_buffer, 0, &pack_aligned(&models));
        }

        let shadow_passes: Vec<usize> = (0..SHADOW_LAYERS)
            .filter(|&layer| lights.shadow_view(layer).is_some())
            .collect();
        if !shadow_passes.is_empty() {
            let passes: Vec<ShadowPassUniform> = (0..SHADOW_LAYERS)
                .map(|layer| ShadowPassUniform {
                    view_projection: lights
                        .shadow_view(layer)
                        .unwrap_or(glam::Mat4::IDENTITY)
                        .to_cols_array_2d(),
                })
                .collect();
            queue.write_buffer(&self.shadow_pass_buffer, 0, &pack_aligned(&passes));
        }

        self.ensure_line_capacity(device, lines.len());
        if !lines.is_empty() {
            queue.write_buffer(&self.line_buffer, 0, bytemuck::cast_slice(&lines));
        }

        for item in &items {
            self.pipelines.prepare_mesh(device, pipeline_key(item));
        }

        let Some(frame) = ctx.acquire()? else {
            return Ok(());
        };
        let target = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = ctx.device().create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Scene Encoder"),
        });

        for &layer in &shadow_passes {
            self.encode_shadow_pass(&mut encoder, layer, &items);
        }

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(ctx.color_attachment(&target, wgpu::LoadOp::Clear(self.clear_color)))],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: ctx.depth_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_bind_group(0, &self.frame_bind_group, &[]);

            if self.environment.background {
                pass.set_pipeline(&self.pipelines.background);
                pass.draw(0..3, 0..1);
            }

            let stride = aligned_stride(std::mem::size_of::<ModelUniform>());
            for (i, item) in items.iter().enumerate() {
                let (Some(geometry), Some(material)) =
                    (self.geometries.get(&item.geometry), self.materials.get(&item.material))
                else {
                    continue;
                };
                let Some(pipeline) = self.pipelines.mesh(pipeline_key(item)) else {
                    continue;
                };
                pass.set_pipeline(pipeline);
                pass.set_bind_group(1, &self.model_bind_group, &[(i as u64 * stride) as u32]);
                pass.set_bind_group(2, &material.bind_group, &[]);
                pass.set_vertex_buffer(0, geometry.vertex_buffer.slice(..));
                pass.set_index_buffer(geometry.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..geometry.index_count, 0, 0..1);
            }

            if !lines.is_empty() {
                pass.set_pipeline(&self.pipelines.line);
                pass.set_vertex_buffer(0, self.line_buffer.slice(..));
                pass.draw(0..lines.len() as u32, 0..1);
            }
        }

        ctx.queue().submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn encode_shadow_pass(&self, encoder: &mut wgpu::CommandEncoder, layer: usize, items: &[RenderItem]) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Shadow Pass"),
            color_attachments: &[],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.shadow.layer_views[layer],
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        let pass_stride = aligned_stride(std::mem::size_of::<ShadowPassUniform>());
        let model_stride = aligned_stride(std::mem::size_of::<ModelUniform>());
        pass.set_pipeline(&self.pipelines.shadow);
        pass.set_bind_group(0, &self.shadow_pass_bind_group, &[(layer as u64 * pass_stride) as u32]);

        for (i, item) in items.iter().enumerate() {
            if !item.cast_shadows || item.transparent {
                continue;
            }
            let Some(geometry) = self.geometries.get(&item.geometry) else {
                continue;
            };
            pass.set_bind_group(1, &self.model_bind_group, &[(i as u64 * model_stride) as u32]);
            pass.set_vertex_buffer(0, geometry.vertex_buffer.slice(..));
            pass.set_index_buffer(geometry.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..geometry.index_count, 0, 0..1);
        }
    }

    /// Upload changed assets and release removed ones
    fn sync_assets(&mut self, ctx: &GpuContext, world: &mut World) {
        let device = ctx.device();
        let queue = ctx.queue();

        if let Some(geometries) = world.resource_mut::<Assets<Geometry>>() {
            for handle in geometries.take_removed() {
                if let Some(gpu) = self.geometries.remove(&handle) {
                    gpu.vertex_buffer.destroy();
                    gpu.index_buffer.destroy();
                }
            }
            for handle in geometries.take_changed() {
                let Some(geometry) = geometries.get(handle) else {
                    continue;
                };
                self.sync_geometry(device, queue, handle, geometry);
            }
        }

        let mut refreshed_textures = FxHashSet::default();
        if let Some(textures) = world.resource_mut::<Assets<Texture>>() {
            for handle in textures.take_removed() {
                if let Some(gpu) = self.textures.remove(&handle) {
                    gpu.texture.destroy();
                }
                refreshed_textures.insert(handle);
            }
            for handle in textures.take_changed() {
                let Some(texture) = textures.get(handle) else {
                    continue;
                };
                let uploaded = upload_texture(device, queue, texture, "Material Texture");
                if let Some(previous) = self.textures.insert(handle, uploaded) {
                    previous.texture.destroy();
                }
                refreshed_textures.insert(handle);
            }
        }

        let Some(materials) = world.resource_mut::<Assets<Material>>() else {
            return;
        };
        for handle in materials.take_removed() {
            if let Some(gpu) = self.materials.remove(&handle) {
                gpu.buffer.destroy();
            }
        }
        let mut changed: FxHashSet<MaterialHandle> = materials.take_changed().into_iter().collect();
        if !refreshed_textures.is_empty() {
            changed.extend(
                self.materials
                    .iter()
                    .filter(|(_, gpu)| gpu.map.is_some_and(|map| refreshed_textures.contains(&map)))
                    .map(|(handle, _)| *handle),
            );
        }
        for handle in changed {
            let Some(material) = materials.get(handle) else {
                continue;
            };
            self.sync_material(device, queue, handle, material);
        }
    }

    fn sync_geometry(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, handle: GeometryHandle, geometry: &Geometry) {
        if geometry.vertices.is_empty() || geometry.indices.is_empty() {
            if let Some(gpu) = self.geometries.remove(&handle) {
                gpu.vertex_buffer.destroy();
                gpu.index_buffer.destroy();
            }
            return;
        }

        let vertices: &[u8] = bytemuck::cast_slice(&geometry.vertices);
        let indices: &[u8] = bytemuck::cast_slice(&geometry.indices);

        // Skinned and morphing geometry changes every frame at a fixed size
        if let Some(gpu) = self.geometries.get_mut(&handle) {
            if gpu.vertex_buffer.size() >= vertices.len() as u64 && gpu.index_buffer.size() >= indices.len() as u64 {
                queue.write_buffer(&gpu.vertex_buffer, 0, vertices);
                queue.write_buffer(&gpu.index_buffer, 0, indices);
                gpu.index_count = geometry.indices.len() as u32;
                return;
            }
        }

        let gpu = GpuGeometry {
            vertex_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Vertex Buffer"),
                contents: vertices,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            }),
            index_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Index Buffer"),
                contents: indices,
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            }),
            index_count: geometry.indices.len() as u32,
        };
        if let Some(previous) = self.geometries.insert(handle, gpu) {
            previous.vertex_buffer.destroy();
            previous.index_buffer.destroy();
        }
    }

    fn sync_material(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, handle: MaterialHandle, material: &Material) {
        let map = material.map();
        let view = map.and_then(|m| self.textures.get(&m)).map(|t| &t.view);
        let uniform = MaterialUniform::from_material(material, view.is_some());

        // Same texture binding: only the uniform block changes
        if let Some(gpu) = self.materials.get(&handle) {
            if gpu.map == map {
                queue.write_buffer(&gpu.buffer, 0, bytemuck::bytes_of(&uniform));
                return;
            }
        }

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Material Uniform Buffer"),
            contents: bytemuck::bytes_of(&uniform),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Material Bind Group"),
            layout: &self.layouts.material,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(view.unwrap_or(&self.white.view)),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.material_sampler),
                },
            ],
        });

        if let Some(previous) = self.materials.insert(handle, GpuMaterial { buffer, bind_group, map }) {
            previous.buffer.destroy();
        }
    }

    fn ensure_model_capacity(&mut self, device: &wgpu::Device, count: usize) {
        if count <= self.model_capacity {
            return;
        }
        let capacity = count.next_power_of_two();
        tracing::debug!(capacity, "growing model uniform buffer");
        self.model_buffer.destroy();
        self.model_buffer = create_model_buffer(device, capacity);
        self.model_bind_group = create_model_bind_group(device, &self.layouts, &self.model_buffer);
        self.model_capacity = capacity;
    }

    fn ensure_line_capacity(&mut self, device: &wgpu::Device, count: usize) {
        if count <= self.line_capacity {
            return;
        }
        let capacity = count.next_power_of_two();
        self.line_buffer.destroy();
        self.line_buffer = create_line_buffer(device, capacity);
        self.line_capacity = capacity;
    }

    fn ensure_shadow_size(&mut self, device: &wgpu::Device, size: u32) {
        if size == self.shadow.size {
            return;
        }
        tracing::debug!(size, "resizing shadow map");
        self.shadow.texture.destroy();
        self.shadow = create_shadow_target(device, size);
        self.rebuild_frame_bind_group(device);
    }

    fn rebuild_frame_bind_group(&mut self, device: &wgpu::Device) {
        self.frame_bind_group = create_frame_bind_group(
            device,
            &self.layouts,
            &self.camera_buffer,
            &self.light_buffer,
            &self.shadow,
            &self.shadow_sampler,
            &self.environment.texture,
            &self.env_sampler,
        );
    }

    /// Release every GPU resource the renderer owns
    ///
    /// The renderer stays usable: the next [`SceneRenderer::render`] only
    /// re-uploads assets that change afterwards.
    pub fn dispose(&mut self) {
        for (_, gpu) in self.geometries.drain() {
            gpu.vertex_buffer.destroy();
            gpu.index_buffer.destroy();
        }
        for (_, gpu) in self.textures.drain() {
            gpu.texture.destroy();
        }
        for (_, gpu) in self.materials.drain() {
            gpu.buffer.destroy();
        }
        tracing::debug!("scene renderer disposed");
    }
}

fn pipeline_key(item: &RenderItem) -> PipelineKey {
    PipelineKey {
        program: item.kind.program(),
        cull: cull_mode(item.side),
        transparent: item.transparent,
    }
}

/// Camera entity marked [`ActiveCamera`], or the first camera found
fn active_camera(world: &World) -> Option<(PerspectiveCamera, glam::Mat4)> {
    let marked = world.entities_with::<ActiveCamera>();
    let entity = marked
        .into_iter()
        .find(|e| world.has::<PerspectiveCamera>(*e))
        .or_else(|| world.entities_with::<PerspectiveCamera>().into_iter().next())?;
    let camera = world.get::<PerspectiveCamera>(entity)?.clone();
    let matrix = world.get::<GlobalTransform>(entity)?.matrix;
    Some((camera, matrix))
}

/// Largest shadow map any casting light asks for, within device limits
fn shadow_map_size(world: &World, max_size: u32) -> u32 {
    let directional = world
        .query::<&DirectionalLight>()
        .iter()
        .filter(|(_, light)| light.cast_shadows)
        .map(|(_, light)| light.shadow.map_size);
    let spot = world
        .query::<&SpotLight>()
        .iter()
        .filter(|(_, light)| light.cast_shadows)
        .map(|(_, light)| light.shadow.map_size);
    directional
        .chain(spot)
        .max()
        .unwrap_or(DEFAULT_SHADOW_MAP_SIZE)
        .clamp(1, max_size)
}

fn create_model_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Model Uniform Buffer"),
        size: aligned_stride(std::mem::size_of::<ModelUniform>()) * capacity as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_model_bind_group(device: &wgpu::Device, layouts: &BindGroupLayouts, buffer: &wgpu::Buffer) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Model Bind Group"),
        layout: &layouts.model,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer,
                offset: 0,
                size: NonZeroU64::new(std::mem::size_of::<ModelUniform>() as u64),
            }),
        }],
    })
}

fn create_line_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Line Vertex Buffer"),
        size: (std::mem::size_of::<LineVertex>() * capacity) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_shadow_target(device: &wgpu::Device, size: u32) -> ShadowTarget {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Shadow Map"),
        size: wgpu::Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: SHADOW_LAYERS as u32,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    let array_view = texture.create_view(&wgpu::TextureViewDescriptor {
        label: Some("Shadow Map Array View"),
        dimension: Some(wgpu::TextureViewDimension::D2Array),
        ..Default::default()
    });
    let layer_views = (0..SHADOW_LAYERS as u32)
        .map(|layer| {
            texture.create_view(&wgpu::TextureViewDescriptor {
                label: Some("Shadow Map Layer View"),
                dimension: Some(wgpu::TextureViewDimension::D2),
                base_array_layer: layer,
                array_layer_count: Some(1),
                ..Default::default()
            })
        })
        .collect();
    ShadowTarget {
        texture,
        array_view,
        layer_views,
        size,
    }
}

#[allow(clippy::too_many_arguments)]
fn create_frame_bind_group(
    device: &wgpu::Device,
    layouts: &BindGroupLayouts,
    camera: &wgpu::Buffer,
    lights: &wgpu::Buffer,
    shadow: &ShadowTarget,
    shadow_sampler: &wgpu::Sampler,
    environment: &GpuTexture,
    env_sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Frame Bind Group"),
        layout: &layouts.frame,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: camera.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: lights.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::TextureView(&shadow.array_view),
            },
            wgpu::BindGroupEntry {
                binding: 3,
                resource: wgpu::BindingResource::Sampler(shadow_sampler),
            },
            wgpu::BindGroupEntry {
                binding: 4,
                resource: wgpu::BindingResource::TextureView(&environment.view),
            },
            wgpu::BindGroupEntry {
                binding: 5,
                resource: wgpu::BindingResource::Sampler(env_sampler),
            },
        ],
    })
}

/// GPU format and tightly packed bytes of a texture
///
/// Float data goes up as half floats: 32-bit float textures are not
/// filterable without an optional feature.
fn texture_bytes(texture: &Texture) -> (wgpu::TextureFormat, u32, Vec<u8>) {
    match &texture.data {
        TextureData::Rgba8(pixels) => {
            let format = if texture.srgb {
                wgpu::TextureFormat::Rgba8UnormSrgb
            } else {
                wgpu::TextureFormat::Rgba8Unorm
            };
            (format, 4, pixels.clone())
        }
        TextureData::Rgba32F(pixels) => {
            let halves: Vec<u16> = pixels.iter().flat_map(|p| p.map(f32_to_f16)).collect();
            (wgpu::TextureFormat::Rgba16Float, 8, bytemuck::cast_slice(&halves).to_vec())
        }
    }
}

fn upload_texture(device: &wgpu::Device, queue: &wgpu::Queue, texture: &Texture, label: &str) -> GpuTexture {
    let (format, bytes_per_pixel, bytes) = texture_bytes(texture);
    let size = wgpu::Extent3d {
        width: texture.width.max(1),
        height: texture.height.max(1),
        depth_or_array_layers: 1,
    };
    let gpu = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    let expected = (size.width * size.height * bytes_per_pixel) as usize;
    if bytes.len() == expected {
        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &gpu,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &bytes,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(size.width * bytes_per_pixel),
                rows_per_image: Some(size.height),
            },
            size,
        );
    } else {
        tracing::warn!(label, expected, actual = bytes.len(), "texture data size mismatch, left blank");
    }

    let view = gpu.create_view(&wgpu::TextureViewDescriptor::default());
    GpuTexture { texture: gpu, view }
}
