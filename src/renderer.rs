use anyhow::{Context, Result};
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::camera::Camera;
use crate::catalog::MaterialCatalog;
use crate::core::GpuContext;
use crate::loaders::CubeMapData;
use crate::math::rgb_to_linear;
use crate::scene::{Model, SceneState};
use crate::scroll::BackgroundGradient;
use crate::types::{
    GradientUniform, Lighting, MaterialUniform, MeshVertex, ParticleInstance, ParticleUniform,
    SceneUniform,
};

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

/// Source factor alpha, destination kept: overlapping points brighten
const ADDITIVE_BLENDING: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::Zero,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
};

/// What the renderer reads from the app for one frame
pub struct FrameInputs<'a> {
    pub scene: &'a SceneState,
    pub camera: &'a Camera,
    pub gradient: BackgroundGradient,
    pub materials: &'a MaterialCatalog,
    pub lighting: Lighting,
}

struct MeshBuffers {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

struct ParticleBuffers {
    instance_buffer: wgpu::Buffer,
    count: u32,
    /// Reused staging for per-frame uploads
    scratch: Vec<ParticleInstance>,
}

pub struct Renderer {
    gpu: GpuContext,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    background_pipeline: wgpu::RenderPipeline,
    gradient_buffer: wgpu::Buffer,
    gradient_bind_group: wgpu::BindGroup,
    mesh_pipeline: wgpu::RenderPipeline,
    scene_buffer: wgpu::Buffer,
    material_buffer: wgpu::Buffer,
    mesh_bind_group: wgpu::BindGroup,
    env_bind_group: wgpu::BindGroup,
    particle_pipeline: wgpu::RenderPipeline,
    particle_uniform_buffer: wgpu::Buffer,
    particle_bind_group: wgpu::BindGroup,
    mesh: Option<MeshBuffers>,
    particles: Option<ParticleBuffers>,
    egui_renderer: egui_wgpu::Renderer,
    egui_state: egui_winit::State,
    egui_ctx: egui::Context,
}

impl Renderer {
    pub async fn new(window: Arc<Window>, env_map: &CubeMapData) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("Failed to create surface")?;
        let gpu = GpuContext::new_with_surface(&instance, &surface).await?;

        let config = gpu.surface_config(&surface, size.width, size.height)?;
        surface.configure(gpu.device(), &config);

        let device = gpu.device();
        let depth_view = Self::create_depth_view(device, config.width, config.height);

        // Background
        let gradient_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Gradient Buffer"),
            contents: bytemuck::cast_slice(&[GradientUniform::from(&BackgroundGradient::default())]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let gradient_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("gradient_bind_group_layout"),
            entries: &[uniform_entry(0, wgpu::ShaderStages::FRAGMENT)],
        });
        let gradient_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("gradient_bind_group"),
            layout: &gradient_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: gradient_buffer.as_entire_binding(),
            }],
        });
        let background_pipeline = create_pipeline(
            device,
            PipelineSpec {
                label: "Background Pipeline",
                shader: wgpu::ShaderSource::Wgsl(include_str!("background.wgsl").into()),
                bind_group_layouts: &[&gradient_layout],
                buffers: &[],
                format: config.format,
                blend: wgpu::BlendState::REPLACE,
                depth_write: false,
                depth_compare: wgpu::CompareFunction::Always,
            },
        );

        // Model surface
        let scene_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Scene Buffer"),
            size: std::mem::size_of::<SceneUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let material_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Material Buffer"),
            size: std::mem::size_of::<MaterialUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let mesh_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("mesh_bind_group_layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT),
                uniform_entry(1, wgpu::ShaderStages::FRAGMENT),
            ],
        });
        let mesh_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("mesh_bind_group"),
            layout: &mesh_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: scene_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: material_buffer.as_entire_binding(),
                },
            ],
        });
        let (env_layout, env_bind_group) = Self::create_env_map(&gpu, env_map);
        let mesh_pipeline = create_pipeline(
            device,
            PipelineSpec {
                label: "Mesh Pipeline",
                shader: wgpu::ShaderSource::Wgsl(include_str!("mesh.wgsl").into()),
                bind_group_layouts: &[&mesh_layout, &env_layout],
                buffers: &[MeshVertex::layout()],
                format: config.format,
                blend: wgpu::BlendState::ALPHA_BLENDING,
                depth_write: true,
                depth_compare: wgpu::CompareFunction::Less,
            },
        );

        // Particles
        let particle_uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Particle Uniform Buffer"),
            size: std::mem::size_of::<ParticleUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let particle_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("particle_bind_group_layout"),
            entries: &[uniform_entry(
                0,
                wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            )],
        });
        let particle_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("particle_bind_group"),
            layout: &particle_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: particle_uniform_buffer.as_entire_binding(),
            }],
        });
        let particle_pipeline = create_pipeline(
            device,
            PipelineSpec {
                label: "Particle Pipeline",
                shader: wgpu::ShaderSource::Wgsl(include_str!("particles.wgsl").into()),
                bind_group_layouts: &[&particle_layout],
                buffers: &[ParticleInstance::layout()],
                format: config.format,
                blend: ADDITIVE_BLENDING,
                depth_write: false,
                depth_compare: wgpu::CompareFunction::Less,
            },
        );

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            device,
            config.format,
            egui_wgpu::RendererOptions::default(),
        );

        log::info!(
            "Renderer initialized: {}x{} {:?}",
            config.width,
            config.height,
            config.format
        );

        Ok(Self {
            gpu,
            surface,
            config,
            depth_view,
            background_pipeline,
            gradient_buffer,
            gradient_bind_group,
            mesh_pipeline,
            scene_buffer,
            material_buffer,
            mesh_bind_group,
            env_bind_group,
            particle_pipeline,
            particle_uniform_buffer,
            particle_bind_group,
            mesh: None,
            particles: None,
            egui_renderer,
            egui_state,
            egui_ctx,
        })
    }

    fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    /// Uploads the six faces once; every material samples the same cube
    fn create_env_map(
        gpu: &GpuContext,
        env_map: &CubeMapData,
    ) -> (wgpu::BindGroupLayout, wgpu::BindGroup) {
        let device = gpu.device();
        let texture = device.create_texture_with_data(
            gpu.queue(),
            &wgpu::TextureDescriptor {
                label: Some("Environment Map"),
                size: wgpu::Extent3d {
                    width: env_map.size,
                    height: env_map.size,
                    depth_or_array_layers: 6,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            &env_map.faces.concat(),
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("Environment Map View"),
            dimension: Some(wgpu::TextureViewDimension::Cube),
            ..Default::default()
        });
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Environment Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("env_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::Cube,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("env_bind_group"),
            layout: &layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        (layout, bind_group)
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Zero-sized (minimized) windows are ignored until they grow again
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.reconfigure();
    }

    /// Re-applies the current configuration after the surface was lost
    pub fn reconfigure(&mut self) {
        self.surface.configure(self.gpu.device(), &self.config);
        self.depth_view =
            Self::create_depth_view(self.gpu.device(), self.config.width, self.config.height);
    }

    /// Creates GPU buffers for the model's geometry and particle cloud
    pub fn upload_model(&mut self, model: &Model) {
        let device = self.gpu.device();

        let vertices = MeshVertex::interleave(&model.mesh.positions, &model.mesh.normals);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Index Buffer"),
            contents: bytemuck::cast_slice(&model.mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        self.mesh = Some(MeshBuffers {
            vertex_buffer,
            index_buffer,
            index_count: model.mesh.indices.len() as u32,
        });

        self.particles = if model.particles.is_empty() {
            None
        } else {
            let scratch: Vec<ParticleInstance> = model
                .particles
                .positions()
                .iter()
                .copied()
                .map(ParticleInstance::from)
                .collect();
            let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Particle Instance Buffer"),
                contents: bytemuck::cast_slice(&scratch),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            });
            Some(ParticleBuffers {
                instance_buffer,
                count: scratch.len() as u32,
                scratch,
            })
        };

        log::info!(
            "Uploaded model: {} vertices, {} triangles, {} particles",
            model.mesh.vertex_count(),
            model.mesh.triangle_count(),
            model.particles.len()
        );
    }

    /// Returns true when egui wants the event for itself
    pub fn handle_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        self.egui_state.on_window_event(window, event).consumed
    }

    fn write_frame_uniforms(&mut self, inputs: &FrameInputs) -> bool {
        let queue = self.gpu.queue();
        queue.write_buffer(
            &self.gradient_buffer,
            0,
            bytemuck::cast_slice(&[GradientUniform::from(&inputs.gradient)]),
        );

        let Some(model) = inputs.scene.model() else {
            return false;
        };

        let scene = SceneUniform::new(inputs.camera.to_uniform(), model.transform(), &inputs.lighting);
        queue.write_buffer(&self.scene_buffer, 0, bytemuck::cast_slice(&[scene]));

        match inputs.materials.get(&model.material) {
            Some(preset) => queue.write_buffer(
                &self.material_buffer,
                0,
                bytemuck::cast_slice(&[MaterialUniform::from(preset)]),
            ),
            None => log::warn!("Model uses unknown material {:?}", model.material),
        }

        if let Some(particles) = &mut self.particles {
            particles.scratch.clear();
            particles.scratch.extend(
                model
                    .particles
                    .positions()
                    .iter()
                    .copied()
                    .map(ParticleInstance::from),
            );
            queue.write_buffer(
                &particles.instance_buffer,
                0,
                bytemuck::cast_slice(&particles.scratch),
            );

            let [r, g, b] = rgb_to_linear(model.particles.color);
            let uniform = ParticleUniform {
                view_proj: inputs.camera.view_proj().to_cols_array_2d(),
                camera_right: inputs.camera.right().extend(0.0).to_array(),
                camera_up: inputs.camera.up().extend(0.0).to_array(),
                origin_size: model.particles.origin.extend(model.particles.size).to_array(),
                color: [r, g, b, model.particles.opacity],
            };
            queue.write_buffer(
                &self.particle_uniform_buffer,
                0,
                bytemuck::cast_slice(&[uniform]),
            );
        }

        true
    }

    /// Draws background, model, particles and the overlay built by `ui`
    pub fn render(
        &mut self,
        window: &Window,
        inputs: &FrameInputs,
        ui: impl FnMut(&egui::Context),
    ) -> std::result::Result<(), wgpu::SurfaceError> {
        let has_model = self.write_frame_uniforms(inputs);
        let particle_opacity = inputs
            .scene
            .model()
            .map_or(0.0, |m| m.particles.opacity);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let device = self.gpu.device();
        let queue = self.gpu.queue();
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&self.background_pipeline);
            render_pass.set_bind_group(0, &self.gradient_bind_group, &[]);
            render_pass.draw(0..3, 0..1);

            if let (true, Some(mesh)) = (has_model, &self.mesh) {
                render_pass.set_pipeline(&self.mesh_pipeline);
                render_pass.set_bind_group(0, &self.mesh_bind_group, &[]);
                render_pass.set_bind_group(1, &self.env_bind_group, &[]);
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }

            if let (true, Some(particles)) = (has_model && particle_opacity > 0.0, &self.particles) {
                render_pass.set_pipeline(&self.particle_pipeline);
                render_pass.set_bind_group(0, &self.particle_bind_group, &[]);
                render_pass.set_vertex_buffer(0, particles.instance_buffer.slice(..));
                render_pass.draw(0..6, 0..particles.count);
            }
        }

        // egui pass - UI overlay
        let raw_input = self.egui_state.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, ui);

        self.egui_state
            .handle_platform_output(window, full_output.platform_output);

        let tris = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        let egui_commands = self.egui_renderer.update_buffers(
            device,
            queue,
            &mut encoder,
            &tris,
            &screen_descriptor,
        );

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            // egui-wgpu wants a 'static pass; it is dropped before the
            // encoder is used again
            let mut render_pass = render_pass.forget_lifetime();
            self.egui_renderer
                .render(&mut render_pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        queue.submit(egui_commands.into_iter().chain(std::iter::once(encoder.finish())));
        output.present();
        Ok(())
    }
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

struct PipelineSpec<'a> {
    label: &'a str,
    shader: wgpu::ShaderSource<'a>,
    bind_group_layouts: &'a [&'a wgpu::BindGroupLayout],
    buffers: &'a [wgpu::VertexBufferLayout<'a>],
    format: wgpu::TextureFormat,
    blend: wgpu::BlendState,
    depth_write: bool,
    depth_compare: wgpu::CompareFunction,
}

/// All scene pipelines share one colour target and the depth buffer
fn create_pipeline(device: &wgpu::Device, spec: PipelineSpec) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(spec.label),
        source: spec.shader,
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(spec.label),
        bind_group_layouts: spec.bind_group_layouts,
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(spec.label),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: spec.buffers,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: spec.format,
                blend: Some(spec.blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: spec.depth_write,
            depth_compare: spec.depth_compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    })
}
