use std::time::Instant;

use anyhow::{Context, Result};
use ouroboros::self_referencing;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use strata_engine::device::GpuInit;
use strata_engine::perf::PerformanceMonitor;
use strata_engine::render::{RenderError, RendererConfig, SceneRenderer, WgpuBackend};

use crate::cli::Arguments;
use crate::report;
use crate::scene::{self, DemoScene};

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[not_covariant]
    renderer: SceneRenderer<WgpuBackend<'this>>,
}

/// Opens a window and renders the demo scene until it closes (or the frame limit hits).
pub fn run(args: Arguments) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
    let mut app = StudioApp::new(args);

    event_loop
        .run_app(&mut app)
        .context("winit event loop terminated with error")?;

    match app.startup_error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct StudioApp {
    args: Arguments,
    scene: DemoScene,
    monitor: PerformanceMonitor,
    entry: Option<WindowEntry>,

    started: Instant,
    frames: u64,
    startup_error: Option<anyhow::Error>,
}

impl StudioApp {
    fn new(args: Arguments) -> Self {
        let scene = DemoScene::new(args.objects, args.seed);
        let monitor = report::logging_monitor(args.interval());
        Self {
            args,
            scene,
            monitor,
            entry: None,
            started: Instant::now(),
            frames: 0,
            startup_error: None,
        }
    }

    fn open_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(format!("strata studio ({} objects)", self.args.objects))
            .with_inner_size(LogicalSize::new(1280.0, 720.0));
        let window = event_loop.create_window(attrs).context("failed to create window")?;

        let mut entry = WindowEntryTryBuilder {
            window,
            renderer_builder: |w: &Window| -> Result<_, RenderError> {
                let backend = WgpuBackend::new(w, GpuInit::default())?;
                SceneRenderer::new(backend, RendererConfig::default())
            },
        }
        .try_build()
        .context("failed to create renderer for window")?;

        let monitor = self.monitor.clone();
        entry.with_renderer_mut(|r| -> Result<()> {
            let atlas = r.upload_texture(scene::ATLAS_WIDTH, scene::ATLAS_HEIGHT, &scene::atlas_pixels())?;
            r.set_texture_source(scene::atlas_regions(atlas));
            r.attach_monitor(monitor);
            Ok(())
        })?;

        self.monitor.start_monitoring_default()?;
        entry.with_window(|w| w.request_redraw());
        self.entry = Some(entry);
        self.started = Instant::now();
        Ok(())
    }

    fn draw_frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(entry) = self.entry.as_mut() else { return };

        let (x, y, zoom) = DemoScene::camera_at(self.started.elapsed().as_secs_f32());
        let list = self.scene.advance();
        let monitor = &self.monitor;

        let fatal = entry.with_renderer_mut(|r| {
            monitor.frame_start();
            if let Err(e) = r.set_camera(x, y, zoom) {
                log::warn!("camera update rejected: {e}");
            }
            r.render(&list);
            monitor.frame_end();
            r.backend().is_fatal()
        });

        self.frames += 1;
        let limit_hit = self.args.frame_limit().is_some_and(|limit| self.frames >= limit);
        if fatal || limit_hit {
            self.shutdown(event_loop);
        }
    }

    fn resize(&mut self) {
        if let Some(entry) = self.entry.as_mut() {
            let size = entry.with_window(|w| w.inner_size());
            entry.with_renderer_mut(|r| {
                r.backend_mut().resize(size);
                r.handle_resize();
            });
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        self.monitor.stop_monitoring();
        if let Some(entry) = self.entry.take() {
            let stats = entry.with_renderer(|r| r.get_stats());
            report::log_summary(&self.monitor, stats);
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for StudioApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }
        if let Err(e) = self.open_window(event_loop) {
            log::error!("failed to start: {e:#}");
            self.startup_error = Some(e);
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw; the monitor wants a steady frame stream.
        if let Some(entry) = &self.entry {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => self.shutdown(event_loop),

            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => self.resize(),

            WindowEvent::RedrawRequested => self.draw_frame(event_loop),

            _ => {}
        }
    }
}
