use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::core::{Frame, GpuContext, RenderPipeline, Viewport};
use crate::scene::{LoadStatus, Scene};
use crate::types::{GpuVertex, SceneUniforms};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// egui text overlay for load progress and load failures
struct Overlay {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
    message: Option<String>,
}

/// Overlay text for a load status; `None` once the world is on screen
pub fn status_message(status: LoadStatus<'_>) -> Option<String> {
    match status {
        LoadStatus::Unloaded | LoadStatus::Ready => None,
        LoadStatus::Loading => Some("Loading world...".to_string()),
        LoadStatus::Failed(reason) => Some(format!("Failed to load world: {reason}")),
    }
}

/// wgpu backend: draws the uploaded triangle list with depth testing
pub struct MazeRenderer {
    window: Arc<Window>,
    gpu: GpuContext,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    depth_view: wgpu::TextureView,
    overlay: Option<Overlay>,
}

impl MazeRenderer {
    pub async fn new(window: Arc<Window>, show_overlay: bool) -> Result<Self> {
        let size = window.inner_size();

        let instance = GpuContext::instance();
        let surface = instance.create_surface(window.clone())?;
        let gpu = GpuContext::new_with_surface(&instance, &surface).await?;

        let config = Self::create_surface_config(&surface, gpu.adapter(), Viewport::from(size))?;
        surface.configure(gpu.device(), &config);

        // Shader compile and pipeline link errors surface here instead of panicking
        gpu.device().push_error_scope(wgpu::ErrorFilter::Validation);

        let uniform_buffer = gpu.device().create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Uniforms"),
            contents: bytemuck::bytes_of(&SceneUniforms::default()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let (pipeline, uniform_bind_group) =
            Self::create_pipeline(gpu.device(), &uniform_buffer, config.format);

        if let Some(error) = gpu.device().pop_error_scope().await {
            return Err(format!("Failed to build render pipeline: {error}").into());
        }

        let depth_view = Self::create_depth_texture(gpu.device(), config.width, config.height);

        let overlay = show_overlay.then(|| {
            let ctx = egui::Context::default();
            let state = egui_winit::State::new(
                ctx.clone(),
                egui::ViewportId::ROOT,
                &window,
                Some(window.scale_factor() as f32),
                None,
                None,
            );
            let renderer = egui_wgpu::Renderer::new(
                gpu.device(),
                config.format,
                egui_wgpu::RendererOptions::default(),
            );
            Overlay {
                ctx,
                state,
                renderer,
                message: None,
            }
        });

        log::info!(
            "Renderer initialized: {}x{} {:?}",
            config.width,
            config.height,
            config.format
        );

        Ok(Self {
            window,
            gpu,
            surface,
            config,
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            depth_view,
            overlay,
        })
    }

    /// Current surface size
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.config.width, self.config.height)
    }

    /// Reconfigure surface and depth buffer for a new drawable size
    pub fn resize(&mut self, viewport: Viewport) {
        if viewport.is_empty() {
            return;
        }

        self.config.width = viewport.width;
        self.config.height = viewport.height;
        self.reconfigure();
    }

    /// Update the overlay text from the world load status
    pub fn set_status(&mut self, status: LoadStatus<'_>) {
        if let Some(overlay) = &mut self.overlay {
            overlay.message = status_message(status);
        }
    }

    /// Forward a window event to the overlay; true if egui consumed it
    pub fn handle_event(&mut self, event: &winit::event::WindowEvent) -> bool {
        self.overlay
            .as_mut()
            .is_some_and(|overlay| overlay.state.on_window_event(&self.window, event).consumed)
    }

    fn reconfigure(&mut self) {
        log::debug!("Configuring surface {}x{}", self.config.width, self.config.height);
        self.surface.configure(self.gpu.device(), &self.config);
        self.depth_view =
            Self::create_depth_texture(self.gpu.device(), self.config.width, self.config.height);
    }

    fn create_surface_config(
        surface: &wgpu::Surface,
        adapter: &wgpu::Adapter,
        viewport: Viewport,
    ) -> Result<wgpu::SurfaceConfiguration> {
        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or("Surface is not supported by the adapter")?;

        Ok(wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: viewport.width.max(1),
            height: viewport.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        })
    }

    fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
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

    fn create_pipeline(
        device: &wgpu::Device,
        uniform_buffer: &wgpu::Buffer,
        surface_format: wgpu::TextureFormat,
    ) -> (wgpu::RenderPipeline, wgpu::BindGroup) {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Maze Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("maze.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Uniforms Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Uniforms Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Maze Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Maze Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[GpuVertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // World files carry no consistent winding
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        (pipeline, bind_group)
    }

    fn acquire_frame(&mut self) -> Result<Option<wgpu::SurfaceTexture>> {
        match self.surface.get_current_texture() {
            Ok(texture) => Ok(Some(texture)),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                self.reconfigure();
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn draw_overlay(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
    ) {
        let Some(overlay) = &mut self.overlay else {
            return;
        };

        let raw_input = overlay.state.take_egui_input(&self.window);
        let message = overlay.message.clone();
        let full_output = overlay.ctx.run(raw_input, |ctx| {
            let Some(message) = &message else {
                return;
            };
            egui::Area::new(egui::Id::new("status"))
                .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
                .show(ctx, |ui| {
                    ui.label(
                        egui::RichText::new(message)
                            .size(24.0)
                            .color(egui::Color32::from_rgb(230, 230, 230)),
                    );
                });
        });

        overlay
            .state
            .handle_platform_output(&self.window, full_output.platform_output);

        let tris = overlay
            .ctx
            .tessellate(full_output.shapes, overlay.ctx.pixels_per_point());
        for (id, image_delta) in &full_output.textures_delta.set {
            overlay
                .renderer
                .update_texture(self.gpu.device(), self.gpu.queue(), *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: self.window.scale_factor() as f32,
        };

        overlay.renderer.update_buffers(
            self.gpu.device(),
            self.gpu.queue(),
            encoder,
            &tris,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Overlay Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
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
                })
                .forget_lifetime();

            overlay
                .renderer
                .render(&mut render_pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            overlay.renderer.free_texture(id);
        }
    }
}

impl RenderPipeline for MazeRenderer {
    type Buffer = wgpu::Buffer;

    fn upload(&mut self, scene: &Scene) -> wgpu::Buffer {
        self.gpu
            .device()
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("World Vertex Buffer"),
                contents: bytemuck::cast_slice(&scene.to_gpu_vertices()),
                usage: wgpu::BufferUsages::VERTEX,
            })
    }

    fn submit(&mut self, frame: &Frame<'_, wgpu::Buffer>) -> Result<()> {
        if frame.viewport.is_empty() {
            return Ok(());
        }
        if frame.viewport != self.viewport() {
            self.resize(frame.viewport);
        }

        let Some(output) = self.acquire_frame()? else {
            return Ok(());
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        if let Some(draw) = &frame.draw {
            self.gpu
                .queue()
                .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&draw.uniforms));
        }

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let [r, g, b, a] = frame.clear.color;
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Maze Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(frame.clear.depth),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let Some(draw) = &frame.draw {
                render_pass.set_viewport(
                    0.0,
                    0.0,
                    frame.viewport.width as f32,
                    frame.viewport.height as f32,
                    0.0,
                    1.0,
                );
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                render_pass.set_vertex_buffer(0, draw.buffer.slice(..));
                render_pass.draw(0..draw.vertex_count, 0..1);
            }
        }

        self.draw_overlay(&mut encoder, &view);

        self.gpu.queue().submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}
