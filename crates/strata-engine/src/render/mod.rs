//! Scene rendering.
//!
//! Per frame: the [`SceneRenderer`] culls the host's objects against the padded camera
//! bounds, stable-sorts survivors by z-index, groups them by drawable kind, and submits one
//! draw per kind through a [`RenderBackend`].
//!
//! Convention:
//! - CPU geometry is in scene units (top-left origin, +Y down)
//! - the camera matrix maps scene units to device pixels
//! - the vertex shader converts device pixels to NDC using a resolution uniform

mod backend;
mod batch;
mod camera;
mod cull;
mod error;
mod pool;
mod program;
mod renderer;
mod texture;
mod vertex;

pub use backend::headless::{DrawRecord, HeadlessBackend};
pub use backend::wgpu_backend::WgpuBackend;
pub use backend::{
    BufferId, DrawCall, FrameUniforms, ProgramDesc, ProgramId, RenderBackend, SurfaceSize,
    TextureId,
};
pub use batch::{BatchCompositor, GeometryBatch};
pub use camera::{Camera, DEFAULT_CULL_PADDING};
pub use cull::Culler;
pub use error::RenderError;
pub use pool::GeometryPool;
pub use program::ProgramManager;
pub use renderer::{FrameState, RenderStats, RendererConfig, SceneRenderer};
pub use texture::{AtlasMap, NoTextures, TextureSource};
pub use vertex::Vertex;
