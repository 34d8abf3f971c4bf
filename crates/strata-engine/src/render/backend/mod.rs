//! GPU backend seam.
//!
//! The renderer talks to the GPU only through [`RenderBackend`]. Two implementations ship:
//! - [`wgpu_backend::WgpuBackend`]: a window surface driven by wgpu
//! - [`headless::HeadlessBackend`]: records calls instead of drawing (tests, benchmarks)
//!
//! All methods are called from the thread that owns the surface.

pub mod headless;
pub mod wgpu_backend;

use crate::coords::Mat3;
use crate::paint::Color;
use crate::scene::ObjectKind;

use super::RenderError;

/// Handle to a linked program.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ProgramId(pub u32);

/// Handle to a vertex buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BufferId(pub u32);

/// Handle to a texture.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextureId(pub u32);

/// Surface dimensions as reported by the surface provider.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SurfaceSize {
    pub logical_width: f32,
    pub logical_height: f32,
    /// Device pixel ratio.
    pub scale_factor: f32,
}

impl SurfaceSize {
    #[inline]
    pub const fn new(logical_width: f32, logical_height: f32, scale_factor: f32) -> Self {
        Self { logical_width, logical_height, scale_factor }
    }
}

/// Backend-neutral description of the batch program.
#[derive(Debug, Clone)]
pub struct ProgramDesc<'a> {
    pub label: &'a str,
    /// WGSL source containing both stages.
    pub source: &'a str,
    pub vertex_entry: &'a str,
    pub fragment_entry: &'a str,
    pub vertex_stride: u64,
    pub attributes: &'a [wgpu::VertexAttribute],
}

/// Uniform values shared by every draw of a frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameUniforms {
    /// Scene units -> device pixels.
    pub transform: Mat3,
    /// Viewport size in device pixels.
    pub resolution: [f32; 2],
}

/// One batched draw submission.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawCall {
    pub kind: ObjectKind,
    pub program: ProgramId,
    pub buffer: BufferId,
    pub vertex_count: u32,
    /// Atlas to sample; `None` binds the built-in white texture.
    pub texture: Option<TextureId>,
    pub uniforms: FrameUniforms,
}

/// GPU operations the renderer needs.
pub trait RenderBackend {
    /// Current surface size and device pixel ratio.
    fn surface_size(&self) -> SurfaceSize;

    /// Compiles and links a program. Failure is fatal for the caller.
    fn create_program(&mut self, desc: &ProgramDesc<'_>) -> Result<ProgramId, RenderError>;

    fn destroy_program(&mut self, program: ProgramId);

    /// Allocates a vertex buffer of `size` bytes. Contents are undefined until written.
    fn create_vertex_buffer(&mut self, label: &str, size: u64) -> BufferId;

    /// Writes `data` at offset 0. `data` never exceeds the buffer size.
    fn write_vertex_buffer(&mut self, buffer: BufferId, data: &[u8]);

    fn destroy_buffer(&mut self, buffer: BufferId);

    /// Uploads a premultiplied RGBA8 texture. `rgba.len() == width * height * 4`.
    fn create_texture(&mut self, width: u32, height: u32, rgba: &[u8]) -> TextureId;

    fn destroy_texture(&mut self, texture: TextureId);

    /// Starts a frame and clears the surface.
    ///
    /// Returns `false` when no frame could be acquired; the caller skips drawing.
    fn begin_frame(&mut self, clear: Color) -> bool;

    fn draw(&mut self, call: &DrawCall);

    /// Submits and presents the frame started by `begin_frame`.
    fn end_frame(&mut self);

    /// Frees everything the backend still holds, its own internal resources included.
    /// Called once by the renderer's `dispose`; no frame begins afterwards.
    fn release(&mut self);
}
