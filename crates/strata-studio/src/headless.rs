use std::time::Instant;

use anyhow::{Context, Result};
use strata_engine::render::{HeadlessBackend, RendererConfig, SceneRenderer};

use crate::cli::Arguments;
use crate::report;
use crate::scene::{self, DemoScene};

const SURFACE: (f32, f32) = (1280.0, 720.0);
const DEFAULT_FRAMES: u64 = 600;
/// Simulated frame rate driving the camera path.
const SIM_FPS: f32 = 60.0;

/// Runs the scene against the recording backend as fast as possible.
pub fn run(args: &Arguments) -> Result<()> {
    let backend = HeadlessBackend::new(SURFACE.0, SURFACE.1, 1.0).discard_vertex_data();
    let mut renderer =
        SceneRenderer::new(backend, RendererConfig::default()).context("failed to create headless renderer")?;

    let atlas = renderer
        .upload_texture(scene::ATLAS_WIDTH, scene::ATLAS_HEIGHT, &scene::atlas_pixels())
        .context("failed to upload demo atlas")?;
    renderer.set_texture_source(scene::atlas_regions(atlas));

    let monitor = report::logging_monitor(args.interval());
    renderer.attach_monitor(monitor.clone());
    monitor.start_monitoring_default()?;

    let mut scene = DemoScene::new(args.objects, args.seed);
    let frames = args.frame_limit().unwrap_or(DEFAULT_FRAMES);
    log::info!("headless run: {} objects, {frames} frames", args.objects);

    let started = Instant::now();
    for frame in 0..frames {
        monitor.frame_start();
        let (x, y, zoom) = DemoScene::camera_at(frame as f32 / SIM_FPS);
        renderer.set_camera(x, y, zoom)?;
        renderer.render(&scene.advance());
        monitor.frame_end();
    }
    let elapsed = started.elapsed();

    monitor.stop_monitoring();
    monitor.sample_tick();

    log::info!(
        "headless run finished in {:.1} ms ({:.3} ms/frame, {} draws recorded)",
        elapsed.as_secs_f64() * 1000.0,
        elapsed.as_secs_f64() * 1000.0 / frames.max(1) as f64,
        renderer.backend().draw_count(),
    );
    report::log_summary(&monitor, renderer.get_stats());
    Ok(())
}
