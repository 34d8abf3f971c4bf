use std::sync::{Arc, Weak};

use crate::coords::{Mat3, ViewportBounds};
use crate::paint::Color;
use crate::perf::PerformanceMonitor;
use crate::scene::{ObjectList, RenderObject};
use crate::time::{FpsCounter, SystemClock, TimeSource};

use super::{
    BatchCompositor, Camera, Culler, DEFAULT_CULL_PADDING, DrawCall, FrameUniforms, GeometryPool,
    NoTextures, ProgramManager, RenderBackend, RenderError, TextureId, TextureSource,
};

/// Renderer settings.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RendererConfig {
    /// Scene units added around the view before culling.
    pub cull_padding: f32,
    /// Fan triangles per circle.
    pub circle_segments: u32,
    pub clear_color: Color,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            cull_padding: DEFAULT_CULL_PADDING,
            circle_segments: 32,
            clear_color: Color::new(0.06, 0.06, 0.08, 1.0),
        }
    }
}

/// Dirty-state machine driving `render`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameState {
    /// The last frame matches the current inputs.
    Clean,
    /// Something changed; the next `render` draws.
    Dirty,
    /// Inside `render`.
    Rendering,
}

/// Counters exposed through [`SceneRenderer::get_stats`].
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct RenderStats {
    /// `render` calls per rolling one-second window; 0 until the first window closes.
    pub fps: u32,
    pub visible_objects: usize,
    pub total_objects: usize,
    /// Draws submitted by the last rendered frame.
    pub draw_calls: usize,
    pub frames_rendered: u64,
    pub frames_skipped: u64,
}

/// Frame orchestrator: cull, sort, batch and draw a host's object list.
///
/// Single-threaded. Every GPU resource it creates is released by [`dispose`](Self::dispose)
/// (also run on drop), after which every method is a no-op.
pub struct SceneRenderer<B: RenderBackend> {
    backend: B,
    config: RendererConfig,

    programs: ProgramManager,
    pool: GeometryPool,
    compositor: BatchCompositor,
    culler: Culler,

    camera: Camera,
    viewport: ViewportBounds,
    state: FrameState,
    last_list: Option<Weak<[RenderObject]>>,

    clock: Arc<dyn TimeSource>,
    fps: FpsCounter,
    stats: RenderStats,

    textures: Box<dyn TextureSource>,
    owned_textures: Vec<TextureId>,
    monitor: Option<PerformanceMonitor>,

    disposed: bool,
}

impl<B: RenderBackend> SceneRenderer<B> {
    /// Builds the renderer and its batch program.
    ///
    /// Fails when the program does not compile or link; no resources are left behind.
    pub fn new(backend: B, config: RendererConfig) -> Result<Self, RenderError> {
        Self::with_clock(backend, config, Arc::new(SystemClock::new()))
    }

    pub fn with_clock(
        mut backend: B,
        config: RendererConfig,
        clock: Arc<dyn TimeSource>,
    ) -> Result<Self, RenderError> {
        let programs = ProgramManager::new(&mut backend)?;

        let surface = backend.surface_size();
        let viewport =
            ViewportBounds::from_logical(surface.logical_width, surface.logical_height, surface.scale_factor);
        log::info!(
            "scene renderer ready: viewport {}x{} px (scale {})",
            viewport.width,
            viewport.height,
            surface.scale_factor
        );

        let now = clock.now();
        Ok(Self {
            backend,
            config,
            programs,
            pool: GeometryPool::new(),
            compositor: BatchCompositor::new(config.circle_segments),
            culler: Culler::new(),
            camera: Camera::default(),
            viewport,
            state: FrameState::Dirty,
            last_list: None,
            clock,
            fps: FpsCounter::new(now),
            stats: RenderStats::default(),
            textures: Box::new(NoTextures),
            owned_textures: Vec::new(),
            monitor: None,
            disposed: false,
        })
    }

    /// Draws `objects`, or returns at once when nothing changed since the last frame.
    ///
    /// "Nothing changed" means the state is clean and `objects` is the very allocation
    /// drawn last time. When the surface has no frame to give, the frame is dropped and the
    /// renderer stays dirty so the next call retries.
    pub fn render(&mut self, objects: &ObjectList) {
        if self.disposed {
            return;
        }
        if self.fps.record(self.clock.now()) {
            self.stats.fps = self.fps.fps().unwrap_or(0);
        }

        if self.state == FrameState::Clean && self.is_last_list(objects) {
            self.stats.frames_skipped += 1;
            return;
        }
        let Some(program) = self.programs.program() else { return };

        self.state = FrameState::Rendering;
        if !self.backend.begin_frame(self.config.clear_color) {
            log::debug!("surface frame unavailable; will retry on next render");
            self.state = FrameState::Dirty;
            return;
        }
        if let Some(monitor) = &self.monitor {
            monitor.render_start();
        }

        let bounds = self.camera.visible_bounds(self.viewport, self.config.cull_padding);
        let visible = self.culler.cull(objects, bounds);
        self.compositor.compose(objects, visible, self.textures.as_ref());

        let uniforms = FrameUniforms {
            transform: self.camera.transform(),
            resolution: [self.viewport.width, self.viewport.height],
        };

        let mut draw_calls = 0;
        for batch in self.compositor.groups() {
            let Some(buffer) = self.pool.upload(&mut self.backend, batch.kind(), batch.vertices()) else {
                continue;
            };
            self.backend.draw(&DrawCall {
                kind: batch.kind(),
                program,
                buffer,
                vertex_count: batch.vertex_count(),
                texture: batch.texture(),
                uniforms,
            });
            draw_calls += 1;
        }
        self.backend.end_frame();

        self.last_list = Some(Arc::downgrade(objects));
        self.state = FrameState::Clean;

        let visible_count = self.culler.visible().len();
        self.stats.visible_objects = visible_count;
        self.stats.total_objects = objects.len();
        self.stats.draw_calls = draw_calls;
        self.stats.frames_rendered += 1;

        if let Some(monitor) = &self.monitor {
            monitor.update_object_count(objects.len(), visible_count);
            monitor.render_end();
        }
    }

    fn is_last_list(&self, objects: &ObjectList) -> bool {
        self.last_list
            .as_ref()
            .is_some_and(|last| std::ptr::addr_eq(last.as_ptr(), Arc::as_ptr(objects)))
    }

    /// Moves the camera. Rejects a non-positive or non-finite zoom (and non-finite
    /// position) without touching the current camera.
    pub fn set_camera(&mut self, x: f32, y: f32, zoom: f32) -> Result<(), RenderError> {
        if self.disposed {
            return Ok(());
        }
        self.camera = Camera::new(x, y, zoom)?;
        self.state = FrameState::Dirty;
        Ok(())
    }

    /// Forces the next `render` to draw.
    pub fn mark_dirty(&mut self) {
        if self.disposed {
            return;
        }
        self.state = FrameState::Dirty;
    }

    /// Re-reads the surface size. Call after the surface itself was resized.
    pub fn handle_resize(&mut self) {
        if self.disposed {
            return;
        }
        let surface = self.backend.surface_size();
        self.viewport =
            ViewportBounds::from_logical(surface.logical_width, surface.logical_height, surface.scale_factor);
        self.state = FrameState::Dirty;

        if let Some(monitor) = &self.monitor {
            monitor.update_canvas_size(self.viewport.width as u32, self.viewport.height as u32);
        }
        log::debug!("viewport now {}x{} px", self.viewport.width, self.viewport.height);
    }

    /// Scene units -> device pixels for the current camera.
    pub fn create_transform_matrix(&self) -> Mat3 {
        self.camera.transform()
    }

    pub fn get_stats(&self) -> RenderStats {
        self.stats
    }

    /// Uploads a premultiplied RGBA8 texture owned by this renderer.
    pub fn upload_texture(&mut self, width: u32, height: u32, rgba: &[u8]) -> Result<TextureId, RenderError> {
        if self.disposed {
            return Err(RenderError::Disposed);
        }
        if width == 0 || height == 0 || rgba.len() != width as usize * height as usize * 4 {
            return Err(RenderError::InvalidTexture { width, height, len: rgba.len() });
        }

        let id = self.backend.create_texture(width, height, rgba);
        self.owned_textures.push(id);
        Ok(id)
    }

    /// Installs the provider text and image objects resolve against.
    pub fn set_texture_source(&mut self, source: impl TextureSource + 'static) {
        if self.disposed {
            return;
        }
        self.textures = Box::new(source);
        self.state = FrameState::Dirty;
    }

    /// Reports render time and object counts to `monitor` from now on.
    pub fn attach_monitor(&mut self, monitor: PerformanceMonitor) {
        if self.disposed {
            return;
        }
        monitor.update_canvas_size(self.viewport.width as u32, self.viewport.height as u32);
        self.monitor = Some(monitor);
    }

    /// Releases the program, vertex buffers, textures and whatever the backend holds for
    /// itself. Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        self.programs.release(&mut self.backend);
        self.pool.release(&mut self.backend);
        for texture in self.owned_textures.drain(..) {
            self.backend.destroy_texture(texture);
        }
        self.backend.release();
        self.textures = Box::new(NoTextures);
        self.last_list = None;
        self.monitor = None;

        log::debug!(
            "scene renderer disposed after {} frames ({} skipped)",
            self.stats.frames_rendered,
            self.stats.frames_skipped
        );
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    pub fn camera(&self) -> Camera {
        self.camera
    }

    pub fn viewport(&self) -> ViewportBounds {
        self.viewport
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Direct backend access, e.g. to resize a window surface.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

impl<B: RenderBackend> Drop for SceneRenderer<B> {
    fn drop(&mut self) {
        self.dispose();
    }
}
