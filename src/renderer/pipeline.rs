//! WebGPU render pipeline setup

use glam::Vec2;
use wgpu::util::DeviceExt;

use super::batch::QuadBatch;
use super::vertex::{Vertex, srgb_to_linear};
use super::{Color, Renderer};

/// Why a `GpuRenderer` could not be created
#[derive(Debug)]
pub enum GpuInitError {
    Device(wgpu::RequestDeviceError),
    /// The adapter reported no usable format for the surface
    NoSurfaceFormat,
}

impl std::fmt::Display for GpuInitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GpuInitError::Device(e) => write!(f, "device request failed: {}", e),
            GpuInitError::NoSurfaceFormat => write!(f, "surface reports no texture formats"),
        }
    }
}

impl std::error::Error for GpuInitError {}

impl From<wgpu::RequestDeviceError> for GpuInitError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuInitError::Device(e)
    }
}

/// Prefer an sRGB format, else the first one offered
pub fn pick_surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .find(|f| f.is_srgb())
        .or_else(|| formats.first())
        .copied()
}

/// Draws a `QuadBatch` to a WebGPU surface
pub struct GpuRenderer {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,
    pub vertex_buffer: wgpu::Buffer,
    pub vertex_count: u32,
    /// Surface size in physical pixels
    pub size: (u32, u32),
    /// Draw calls for the current frame, in logical viewport pixels
    batch: QuadBatch,
}

impl GpuRenderer {
    /// `width`/`height` are the surface's physical size; `viewport` the
    /// logical size the game draws in
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        viewport: Vec2,
    ) -> Result<Self, GpuInitError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("gap-runner-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        log::info!("Surface formats: {:?}", surface_caps.formats);

        let Some(surface_format) = pick_surface_format(&surface_caps.formats) else {
            log::error!("Surface is not supported by the adapter");
            return Err(GpuInitError::NoSurfaceFormat);
        };
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!("Surface config: {}x{}, format: {:?}", width, height, surface_format);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("quad_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("quad_pipeline_layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("quad_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
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
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        // Placeholder until the first frame is uploaded
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vertices"),
            contents: bytemuck::cast_slice(&[Vertex::new(0.0, 0.0, [1.0; 4])]),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            vertex_buffer,
            vertex_count: 0,
            size: (width, height),
            batch: QuadBatch::new(viewport.x, viewport.y),
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Convert viewport pixels (y down) to normalized device coordinates
    pub fn pixel_to_ndc(viewport: Vec2, x: f32, y: f32) -> (f32, f32) {
        let ndc = Vec2::new(x, y) / viewport * 2.0 - Vec2::ONE;
        (ndc.x, -ndc.y)
    }

    fn target_color(&self, color: Color) -> Color {
        if self.config.format.is_srgb() {
            srgb_to_linear(color)
        } else {
            color
        }
    }

    /// Upload the batched vertices and draw them
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let viewport = self.batch.size();
        let ndc_vertices: Vec<Vertex> = self
            .batch
            .vertices()
            .iter()
            .map(|v| {
                let (x, y) = Self::pixel_to_ndc(viewport, v.position[0], v.position[1]);
                Vertex::new(x, y, self.target_color(v.color))
            })
            .collect();

        // Grow the buffer only when the frame outgrows it
        let bytes: &[u8] = bytemuck::cast_slice(&ndc_vertices);
        if bytes.len() as u64 > self.vertex_buffer.size() {
            self.vertex_buffer = self
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("quad_vertices"),
                    contents: bytes,
                    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                });
        } else if !bytes.is_empty() {
            self.queue.write_buffer(&self.vertex_buffer, 0, bytes);
        }
        self.vertex_count = ndc_vertices.len() as u32;

        let background = self.target_color(self.batch.background());

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("quad_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("quad_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: background[0] as f64,
                            g: background[1] as f64,
                            b: background[2] as f64,
                            a: background[3] as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if self.vertex_count > 0 {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                render_pass.draw(0..self.vertex_count, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

impl Renderer for GpuRenderer {
    fn width(&self) -> f32 {
        self.batch.width()
    }

    fn height(&self) -> f32 {
        self.batch.height()
    }

    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.batch.clear_rect(x, y, w, h);
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.batch.stroke_rect(x, y, w, h);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.batch.fill_rect(x, y, w, h);
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        self.batch.fill_text(text, x, y);
    }

    fn set_line_width(&mut self, width: f32) {
        self.batch.set_line_width(width);
    }

    fn set_fill_color(&mut self, color: Color) {
        self.batch.set_fill_color(color);
    }

    fn set_font(&mut self, font: &str) {
        self.batch.set_font(font);
    }

    fn present(&mut self) {
        match self.render() {
            Ok(_) => {}
            Err(wgpu::SurfaceError::Lost) => {
                let (w, h) = self.size;
                self.resize(w, h);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of memory!");
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }
    }
}
