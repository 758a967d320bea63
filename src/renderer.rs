use anyhow::{Context, Result};
use std::sync::Arc;
use winit::window::Window;

use crate::cli::AppConfig;
use crate::model::{self, DepthTexture, Mesh, ModelVertex, Texture};
use crate::scene::{Scene, Shading};
use crate::shader::{
    self, CameraUniform, LightPassUniform, LightingUniform, MaterialUniform, ModelUniform, Shader,
    Uniform,
};

struct Pipelines {
    shadow: wgpu::RenderPipeline,
    lit: wgpu::RenderPipeline,
    unlit: wgpu::RenderPipeline,
    // Only when the adapter supports POLYGON_MODE_LINE.
    lit_wireframe: Option<wgpu::RenderPipeline>,
    unlit_wireframe: Option<wgpu::RenderPipeline>,
}

struct PipelineDesc<'a> {
    label: &'a str,
    layout: &'a wgpu::PipelineLayout,
    shader: &'a Shader,
    /// `None` for depth-only.
    color_format: Option<wgpu::TextureFormat>,
    polygon_mode: wgpu::PolygonMode,
    cull_mode: Option<wgpu::Face>,
}

fn create_pipeline(device: &wgpu::Device, desc: PipelineDesc<'_>) -> wgpu::RenderPipeline {
    let targets = [desc.color_format.map(|format| wgpu::ColorTargetState {
        format,
        blend: Some(wgpu::BlendState::REPLACE),
        write_mask: wgpu::ColorWrites::ALL,
    })];

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(desc.layout),
        vertex: wgpu::VertexState {
            module: &desc.shader.module,
            entry_point: Some("vs_main"),
            buffers: &[ModelVertex::desc()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: desc.color_format.map(|_| wgpu::FragmentState {
            module: &desc.shader.module,
            entry_point: Some("fs_main"),
            targets: &targets,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: desc.cull_mode,
            polygon_mode: desc.polygon_mode,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DepthTexture::FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
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

fn lighting_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    let fragment = wgpu::ShaderStages::FRAGMENT;
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Lighting Bind Group Layout"),
        entries: &[
            shader::uniform_layout_entry(0, fragment),
            shader::uniform_layout_entry(1, fragment),
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: fragment,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Depth,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 3,
                visibility: fragment,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 4,
                visibility: fragment,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

pub struct Renderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    model_layout: wgpu::BindGroupLayout,
    camera: Uniform<CameraUniform>,
    light_pass: Uniform<LightPassUniform>,
    lighting_buffer: wgpu::Buffer,
    material_buffer: wgpu::Buffer,
    lighting_bind_group: wgpu::BindGroup,
    depth_texture: DepthTexture,
    shadow_texture: DepthTexture,
    pipelines: Pipelines,
    meshes: Vec<Mesh>,
    objects: Vec<Uniform<ModelUniform>>,
    pub wireframe: bool,
}

impl Renderer {
    pub fn new(window: Arc<Window>, scene: &Scene, app: &AppConfig) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .context("Failed to create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("Failed to find an appropriate adapter")?;

        let info = adapter.get_info();
        log::info!("Using adapter: {} ({:?})", info.name, info.backend);

        let wireframe_features = adapter.features() & wgpu::Features::POLYGON_MODE_LINE;
        if wireframe_features.is_empty() {
            log::warn!("Adapter does not support line polygon mode; wireframe toggle disabled");
        }

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Primary Device"),
                required_features: wireframe_features,
                required_limits: wgpu::Limits::default().using_resolution(adapter.limits()),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("Failed to create device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("Surface reports no supported formats")?;
        log::info!("Selected surface format: {:?}", surface_format);

        let present_mode = if app.vsync {
            wgpu::PresentMode::Fifo
        } else {
            surface_caps
                .present_modes
                .iter()
                .copied()
                .find(|&mode| mode == wgpu::PresentMode::Immediate || mode == wgpu::PresentMode::Mailbox)
                .unwrap_or(wgpu::PresentMode::Fifo)
        };
        log::info!("Selected present mode: {:?}", present_mode);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let max_dim = device.limits().max_texture_dimension_2d;
        let shadow_resolution = scene.shadow_settings().resolution;
        if shadow_resolution > max_dim {
            log::warn!(
                "Shadow resolution {} exceeds device limit, using {}",
                shadow_resolution,
                max_dim
            );
        }
        let shadow_resolution = shadow_resolution.min(max_dim);
        let shadow_texture =
            DepthTexture::new(&device, shadow_resolution, shadow_resolution, "Shadow Map");
        let depth_texture = DepthTexture::new(&device, config.width, config.height, "Depth Texture");

        let diffuse = Texture::from_image(
            &device,
            &queue,
            &model::diffuse_image(app.texture.as_deref()),
            Some("Diffuse Texture"),
        );

        let vertex_fragment = wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT;
        let camera_layout = shader::uniform_layout(&device, "Camera Bind Group Layout", vertex_fragment);
        let model_layout = shader::uniform_layout(&device, "Model Bind Group Layout", vertex_fragment);
        let light_pass_layout =
            shader::uniform_layout(&device, "Light Pass Bind Group Layout", wgpu::ShaderStages::VERTEX);
        let lighting_layout = lighting_layout(&device);

        let camera = Uniform::new(
            &device,
            "Camera",
            &camera_layout,
            &CameraUniform::from_camera(&scene.camera),
        );
        let light_pass = Uniform::new(
            &device,
            "Light Pass",
            &light_pass_layout,
            &LightPassUniform::new(scene.light_view_projection()),
        );
        let lighting_buffer =
            Uniform::create_buffer(&device, "Lighting", &LightingUniform::from_scene(scene));
        let material_buffer =
            Uniform::create_buffer(&device, "Material", &MaterialUniform::from(&scene.material));

        let lighting_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Lighting Bind Group"),
            layout: &lighting_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: lighting_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: material_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&shadow_texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(&diffuse.view),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::Sampler(&diffuse.sampler),
                },
            ],
        });

        let depth_shader = Shader::new(&device, "Depth Shader", include_str!("shaders/depth.wgsl"));
        let lit_shader = Shader::new(&device, "Lit Shader", include_str!("shaders/lit.wgsl"));
        let unlit_shader = Shader::new(&device, "Unlit Shader", include_str!("shaders/unlit.wgsl"));

        let shadow_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Shadow Pipeline Layout"),
            bind_group_layouts: &[&light_pass_layout, &model_layout],
            push_constant_ranges: &[],
        });
        let lit_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Lit Pipeline Layout"),
            bind_group_layouts: &[&camera_layout, &model_layout, &lighting_layout],
            push_constant_ranges: &[],
        });
        let unlit_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Unlit Pipeline Layout"),
            bind_group_layouts: &[&camera_layout, &model_layout],
            push_constant_ranges: &[],
        });

        let lit_desc = |label: &'static str, polygon_mode: wgpu::PolygonMode| PipelineDesc {
            label,
            layout: &lit_layout,
            shader: &lit_shader,
            color_format: Some(surface_format),
            polygon_mode,
            cull_mode: Some(wgpu::Face::Back),
        };
        let unlit_desc = |label: &'static str, polygon_mode: wgpu::PolygonMode| PipelineDesc {
            label,
            layout: &unlit_layout,
            shader: &unlit_shader,
            color_format: Some(surface_format),
            polygon_mode,
            cull_mode: None,
        };
        let has_wireframe = !wireframe_features.is_empty();

        let pipelines = Pipelines {
            shadow: create_pipeline(
                &device,
                PipelineDesc {
                    label: "Shadow Pipeline",
                    layout: &shadow_layout,
                    shader: &depth_shader,
                    color_format: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    cull_mode: None,
                },
            ),
            lit: create_pipeline(&device, lit_desc("Lit Pipeline", wgpu::PolygonMode::Fill)),
            unlit: create_pipeline(&device, unlit_desc("Unlit Pipeline", wgpu::PolygonMode::Fill)),
            lit_wireframe: has_wireframe
                .then(|| create_pipeline(&device, lit_desc("Lit Wireframe Pipeline", wgpu::PolygonMode::Line))),
            unlit_wireframe: has_wireframe.then(|| {
                create_pipeline(&device, unlit_desc("Unlit Wireframe Pipeline", wgpu::PolygonMode::Line))
            }),
        };
        log::info!("Render pipelines created (wireframe: {})", has_wireframe);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            model_layout,
            camera,
            light_pass,
            lighting_buffer,
            material_buffer,
            lighting_bind_group,
            depth_texture,
            shadow_texture,
            pipelines,
            meshes: Vec::new(),
            objects: Vec::new(),
            wireframe: false,
        })
    }

    pub fn supports_wireframe(&self) -> bool {
        self.pipelines.lit_wireframe.is_some()
    }

    /// Flips wireframe mode when the adapter supports it. Returns the new mode.
    pub fn toggle_wireframe(&mut self) -> bool {
        if self.supports_wireframe() {
            self.wireframe = !self.wireframe;
        }
        self.wireframe
    }

    /// Recreates the surface and camera depth target. The shadow map keeps its size.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture = DepthTexture::new(&self.device, width, height, "Depth Texture");
    }

    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Uploads meshes and creates model bindings for anything new in the scene.
    fn sync(&mut self, scene: &Scene) {
        for data in scene.meshes.iter().skip(self.meshes.len()) {
            let name = format!("Mesh {}", self.meshes.len());
            self.meshes.push(Mesh::from_data(&self.device, &name, data));
        }
        for object in scene.objects.iter().skip(self.objects.len()) {
            log::debug!("Creating bindings for `{}`", object.name);
            self.objects.push(Uniform::new(
                &self.device,
                &object.name,
                &self.model_layout,
                &ModelUniform::new(&object.transform, glam::Vec3::ONE),
            ));
        }
    }

    fn write_uniforms(&self, scene: &Scene) {
        self.camera
            .write(&self.queue, &CameraUniform::from_camera(&scene.camera));
        self.light_pass
            .write(&self.queue, &LightPassUniform::new(scene.light_view_projection()));
        self.queue.write_buffer(
            &self.lighting_buffer,
            0,
            bytemuck::bytes_of(&LightingUniform::from_scene(scene)),
        );
        self.queue.write_buffer(
            &self.material_buffer,
            0,
            bytemuck::bytes_of(&MaterialUniform::from(&scene.material)),
        );

        for (object, uniform) in scene.objects.iter().zip(&self.objects) {
            let color = match object.shading {
                Shading::Unlit { color } => color,
                Shading::Lit => glam::Vec3::ONE,
            };
            uniform.write(&self.queue, &ModelUniform::new(&object.transform, color));
        }
    }

    pub fn render(&mut self, scene: &Scene) -> Result<(), wgpu::SurfaceError> {
        self.sync(scene);
        self.write_uniforms(scene);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        if scene.shadows.is_some() {
            let mut shadow_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Shadow Pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.shadow_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            shadow_pass.set_pipeline(&self.pipelines.shadow);
            shadow_pass.set_bind_group(0, &self.light_pass.bind_group, &[]);
            for (object, uniform) in scene.objects.iter().zip(&self.objects) {
                if !object.casts_shadow {
                    continue;
                }
                let Some(mesh) = self.meshes.get(object.mesh.0) else {
                    continue;
                };
                shadow_pass.set_bind_group(1, &uniform.bind_group, &[]);
                mesh.render(&mut shadow_pass);
            }
        }

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(scene.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            let pipelines = &self.pipelines;
            let (lit, unlit) = match (self.wireframe, &pipelines.lit_wireframe, &pipelines.unlit_wireframe) {
                (true, Some(lit), Some(unlit)) => (lit, unlit),
                _ => (&pipelines.lit, &pipelines.unlit),
            };

            render_pass.set_bind_group(0, &self.camera.bind_group, &[]);
            for (object, uniform) in scene.objects.iter().zip(&self.objects) {
                let Some(mesh) = self.meshes.get(object.mesh.0) else {
                    continue;
                };
                match object.shading {
                    Shading::Lit => {
                        render_pass.set_pipeline(lit);
                        render_pass.set_bind_group(2, &self.lighting_bind_group, &[]);
                    }
                    Shading::Unlit { .. } => render_pass.set_pipeline(unlit),
                }
                render_pass.set_bind_group(1, &uniform.bind_group, &[]);
                mesh.render(&mut render_pass);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
