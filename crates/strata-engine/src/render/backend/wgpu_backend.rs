use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::device::{Acquire, Gpu, GpuFrame, GpuInit};
use crate::paint::Color;

use super::{
    BufferId, DrawCall, FrameUniforms, ProgramDesc, ProgramId, RenderBackend, RenderError,
    SurfaceSize, TextureId,
};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct GlobalsUniform {
    transform: [[f32; 4]; 3],
    resolution: [f32; 2],
    _pad: [f32; 2], // 16-byte struct alignment
}

impl From<&FrameUniforms> for GlobalsUniform {
    fn from(u: &FrameUniforms) -> Self {
        Self {
            transform: u.transform.to_wgsl_columns(),
            resolution: u.resolution,
            _pad: [0.0; 2],
        }
    }
}

struct TextureEntry {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

/// Window-surface backend built on wgpu.
///
/// Owns the [`Gpu`] (and therefore the surface) plus every resource the renderer creates.
/// Each draw is its own render pass loading the previous contents, matching the one-pass-per-
/// batch cost model the renderer counts.
pub struct WgpuBackend<'w> {
    gpu: Gpu<'w>,
    next_id: u32,

    pipelines: HashMap<ProgramId, wgpu::RenderPipeline>,
    buffers: HashMap<BufferId, wgpu::Buffer>,
    textures: HashMap<TextureId, TextureEntry>,

    globals_ubo: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    globals_bgl: wgpu::BindGroupLayout,
    last_globals: Option<GlobalsUniform>,

    texture_bgl: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    white: TextureEntry,

    frame: Option<GpuFrame>,
    fatal: bool,
    released: bool,
}

impl<'w> WgpuBackend<'w> {
    /// Creates the device and surface for `window`.
    ///
    /// Any failure here means the surface cannot be rendered to.
    pub fn new(window: &'w Window, init: GpuInit) -> Result<Self, RenderError> {
        let gpu = pollster::block_on(Gpu::new(window, init))
            .map_err(|e| RenderError::UnsupportedSurface(format!("{e:#}")))?;
        let device = gpu.device();

        let globals_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("strata globals bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<GlobalsUniform>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let globals_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("strata globals ubo"),
            size: std::mem::size_of::<GlobalsUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("strata globals bind group"),
            layout: &globals_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_ubo.as_entire_binding(),
            }],
        });

        let texture_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("strata atlas bgl"),
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

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("strata atlas sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let white = upload_texture(&gpu, &texture_bgl, &sampler, "strata white", 1, 1, &[255; 4]);

        log::info!(
            "wgpu backend ready: {}x{} px, format {:?}",
            gpu.size().width,
            gpu.size().height,
            gpu.surface_format()
        );

        Ok(Self {
            gpu,
            next_id: 1,
            pipelines: HashMap::new(),
            buffers: HashMap::new(),
            textures: HashMap::new(),
            globals_ubo,
            globals_bind_group,
            globals_bgl,
            last_globals: None,
            texture_bgl,
            sampler,
            white,
            frame: None,
            fatal: false,
            released: false,
        })
    }

    /// Reconfigures the surface. Call before `SceneRenderer::handle_resize`.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.gpu.resize(new_size);
    }

    /// Set once the surface reported an unrecoverable error; the host should shut down.
    pub fn is_fatal(&self) -> bool {
        self.fatal
    }

    fn next_handle(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    fn create_pipeline(
        &self,
        desc: &ProgramDesc<'_>,
        shader: &wgpu::ShaderModule,
    ) -> wgpu::RenderPipeline {
        let device = self.gpu.device();

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(desc.label),
            bind_group_layouts: &[&self.globals_bgl, &self.texture_bgl],
            immediate_size: 0,
        });

        let vertex_layout = wgpu::VertexBufferLayout {
            array_stride: desc.vertex_stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: desc.attributes,
        };

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(desc.label),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some(desc.vertex_entry),
                compilation_options: Default::default(),
                buffers: &[vertex_layout],
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some(desc.fragment_entry),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.gpu.surface_format(),
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
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
        })
    }
}

impl RenderBackend for WgpuBackend<'_> {
    fn surface_size(&self) -> SurfaceSize {
        let scale = self.gpu.scale_factor();
        let logical = self.gpu.size().to_logical::<f64>(scale);
        SurfaceSize::new(logical.width as f32, logical.height as f32, scale as f32)
    }

    fn create_program(&mut self, desc: &ProgramDesc<'_>) -> Result<ProgramId, RenderError> {
        let device = self.gpu.device();

        let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(desc.label),
            source: wgpu::ShaderSource::Wgsl(desc.source.into()),
        });
        if let Some(err) = pollster::block_on(scope.pop()) {
            return Err(RenderError::ShaderCompilation(err.to_string()));
        }

        let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = self.create_pipeline(desc, &shader);
        if let Some(err) = pollster::block_on(scope.pop()) {
            return Err(RenderError::ProgramLink(err.to_string()));
        }

        let id = ProgramId(self.next_handle());
        self.pipelines.insert(id, pipeline);
        log::debug!("program '{}' linked as {id:?}", desc.label);
        Ok(id)
    }

    fn destroy_program(&mut self, program: ProgramId) {
        self.pipelines.remove(&program);
    }

    fn create_vertex_buffer(&mut self, label: &str, size: u64) -> BufferId {
        let buffer = self.gpu.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let id = BufferId(self.next_handle());
        self.buffers.insert(id, buffer);
        id
    }

    fn write_vertex_buffer(&mut self, buffer: BufferId, data: &[u8]) {
        if let Some(b) = self.buffers.get(&buffer) {
            self.gpu.queue().write_buffer(b, 0, data);
        }
    }

    fn destroy_buffer(&mut self, buffer: BufferId) {
        if let Some(b) = self.buffers.remove(&buffer) {
            b.destroy();
        }
    }

    fn create_texture(&mut self, width: u32, height: u32, rgba: &[u8]) -> TextureId {
        let entry = upload_texture(
            &self.gpu,
            &self.texture_bgl,
            &self.sampler,
            "strata atlas",
            width,
            height,
            rgba,
        );
        let id = TextureId(self.next_handle());
        self.textures.insert(id, entry);
        id
    }

    fn destroy_texture(&mut self, texture: TextureId) {
        if let Some(entry) = self.textures.remove(&texture) {
            entry.texture.destroy();
        }
    }

    fn begin_frame(&mut self, clear: Color) -> bool {
        if self.fatal || self.released {
            return false;
        }
        // A frame left open (caller skipped end_frame) is presented rather than leaked.
        if let Some(stale) = self.frame.take() {
            self.gpu.present(stale);
        }

        let mut frame = match self.gpu.acquire_frame() {
            Acquire::Frame(f) => f,
            Acquire::Skip(reason) => {
                log::debug!("frame skipped: {reason:?}");
                return false;
            }
            Acquire::Fatal => {
                log::error!("surface out of memory; rendering stopped");
                self.fatal = true;
                return false;
            }
        };

        {
            let _rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("strata clear"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: clear.r as f64,
                            g: clear.g as f64,
                            b: clear.b as f64,
                            a: clear.a as f64,
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
        }

        self.frame = Some(frame);
        true
    }

    fn draw(&mut self, call: &DrawCall) {
        let globals = GlobalsUniform::from(&call.uniforms);
        if self.last_globals != Some(globals) {
            self.gpu.queue().write_buffer(&self.globals_ubo, 0, bytemuck::bytes_of(&globals));
            self.last_globals = Some(globals);
        }

        let Some(frame) = self.frame.as_mut() else { return };
        let Some(pipeline) = self.pipelines.get(&call.program) else { return };
        let Some(buffer) = self.buffers.get(&call.buffer) else { return };
        let texture = match call.texture {
            Some(id) => match self.textures.get(&id) {
                Some(t) => t,
                None => return,
            },
            None => &self.white,
        };

        let byte_len = call.vertex_count as u64 * crate::render::Vertex::STRIDE;

        let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(call.kind.as_str()),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &frame.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, &self.globals_bind_group, &[]);
        rpass.set_bind_group(1, &texture.bind_group, &[]);
        rpass.set_vertex_buffer(0, buffer.slice(0..byte_len));
        rpass.draw(0..call.vertex_count, 0..1);
    }

    fn end_frame(&mut self) {
        if let Some(frame) = self.frame.take() {
            self.gpu.present(frame);
        }
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        // An unsubmitted frame is dropped, not presented.
        self.frame = None;

        self.pipelines.clear();
        for (_, buffer) in self.buffers.drain() {
            buffer.destroy();
        }
        for (_, entry) in self.textures.drain() {
            entry.texture.destroy();
        }
        self.white.texture.destroy();
        self.globals_ubo.destroy();
        self.last_globals = None;
        log::debug!("wgpu backend released");
    }
}

fn upload_texture(
    gpu: &Gpu<'_>,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    label: &str,
    width: u32,
    height: u32,
    rgba: &[u8],
) -> TextureEntry {
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };

    let texture = gpu.device().create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    gpu.queue().write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        size,
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let bind_group = gpu.device().create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    });

    TextureEntry {
        texture,
        bind_group,
    }
}

fn premul_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}
