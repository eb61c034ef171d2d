//! WebGPU render pipeline setup

use std::ops::Range;

use thiserror::Error;
use wgpu::util::DeviceExt;

use super::draw::{DrawList, TextureSlot};
use super::texture::{DecodedImage, GpuTexture};
use super::vertex::{Vertex, colors};
use crate::sim::Camera;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("could not create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("could not create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no texture formats")]
    NoSurfaceFormat,
}

/// Decoded images the scene samples
pub struct SceneImages {
    pub tiles: DecodedImage,
    pub sprites: DecodedImage,
}

/// Main render state
pub struct RenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,
    pub vertex_buffer: wgpu::Buffer,
    pub vertex_count: u32,
    /// One texture per [`TextureSlot`], indexed by `TextureSlot::index`
    pub textures: Vec<GpuTexture>,
    /// Viewport size in pixels
    pub size: (u32, u32),
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        images: SceneImages,
    ) -> Result<Self, RenderError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("enigme-town-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(RenderError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
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

        // Pixel art: no filtering between texels
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("pixel_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let white = DecodedImage::white();
        let textures = TextureSlot::ALL
            .iter()
            .map(|slot| {
                let (label, image) = match slot {
                    TextureSlot::Tiles => ("tileset", &images.tiles),
                    TextureSlot::Sprites => ("atlas", &images.sprites),
                    TextureSlot::Solid => ("white", &white),
                };
                GpuTexture::upload(&device, &queue, &texture_layout, &sampler, label, image)
            })
            .collect();

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&texture_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("render_pipeline"),
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

        // Placeholder buffer, replaced every frame
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("vertex_buffer"),
            contents: bytemuck::cast_slice(&[Vertex::solid(0.0, 0.0, [1.0; 4])]),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        log::info!("Renderer ready ({}x{}, {:?})", width, height, surface_format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            vertex_buffer,
            vertex_count: 0,
            textures,
            size: (width, height),
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

    fn texture_size(&self, slot: TextureSlot) -> (u32, u32) {
        self.textures
            .get(slot.index())
            .map(|t| (t.width, t.height))
            .unwrap_or((1, 1))
    }

    /// Upload a world-space draw list and draw it through `camera`
    pub fn render(&mut self, list: &DrawList, camera: &Camera) -> Result<(), wgpu::SurfaceError> {
        let (ndc_vertices, draws) = prepare_vertices(list, camera, |slot| self.texture_size(slot));

        // Recreate buffer each frame (simple approach; could optimize)
        self.vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("vertex_buffer"),
                contents: bytemuck::cast_slice(&ndc_vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        self.vertex_count = ndc_vertices.len() as u32;

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let [r, g, b, a] = colors::BACKGROUND;
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: a as f64,
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
                for (slot, range) in draws {
                    if let Some(texture) = self.textures.get(slot.index()) {
                        render_pass.set_bind_group(0, &texture.bind_group, &[]);
                        render_pass.draw(range, 0..1);
                    }
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

/// Flatten a draw list into NDC vertices with normalized texture
/// coordinates, plus the vertex range each batch occupies
pub fn prepare_vertices(
    list: &DrawList,
    camera: &Camera,
    texture_size: impl Fn(TextureSlot) -> (u32, u32),
) -> (Vec<Vertex>, Vec<(TextureSlot, Range<u32>)>) {
    let mut vertices = Vec::with_capacity(list.vertex_count());
    let mut draws = Vec::with_capacity(list.batches().len());
    for batch in list.batches() {
        let (w, h) = texture_size(batch.slot);
        let (w, h) = (w.max(1) as f32, h.max(1) as f32);
        let start = vertices.len() as u32;
        vertices.extend(batch.vertices.iter().map(|v| {
            let [x, y] = world_to_ndc(camera, v.position);
            Vertex::new(x, y, [v.uv[0] / w, v.uv[1] / h], v.color)
        }));
        let end = vertices.len() as u32;
        if end > start {
            draws.push((batch.slot, start..end));
        }
    }
    (vertices, draws)
}

/// World pixel position to normalized device coordinates.
/// The camera view maps onto the whole surface; y is flipped.
pub fn world_to_ndc(camera: &Camera, position: [f32; 2]) -> [f32; 2] {
    let local = camera.world_to_view(glam::Vec2::from(position));
    let w = camera.viewport.x.max(1.0);
    let h = camera.viewport.y.max(1.0);
    [local.x / w * 2.0 - 1.0, 1.0 - local.y / h * 2.0]
}

/// Create the surface and renderer for a canvas (WASM only)
#[cfg(target_arch = "wasm32")]
pub async fn init_canvas(
    canvas: web_sys::HtmlCanvasElement,
    width: u32,
    height: u32,
    images: SceneImages,
) -> Result<RenderState, RenderError> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
        ..Default::default()
    });

    let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas))?;

    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        })
        .await?;

    log::info!("Using adapter: {:?}", adapter.get_info().name);

    RenderState::new(surface, &adapter, width, height, images).await
}
