use std::time::Duration;

use strata_engine::perf::{MonitorConfig, PerformanceMonitor, Severity};
use strata_engine::render::RenderStats;

/// Monitor that logs each sample at `info` and each issue at `warn`/`error`.
pub fn logging_monitor(interval: Duration) -> PerformanceMonitor {
    let monitor = PerformanceMonitor::new(MonitorConfig {
        update_interval: interval,
        ..MonitorConfig::default()
    });

    monitor.on_metrics_updated(|s| {
        log::info!(
            "fps {:>3} | frame {:>6.2} ms | render {:>6.2} ms | {:>6} / {:<6} visible | {}x{}",
            s.fps,
            s.frame_time_ms,
            s.render_time_ms,
            s.visible_object_count,
            s.object_count,
            s.canvas_size.width,
            s.canvas_size.height,
        );
    });

    monitor.on_performance_issue_detected(|issue| match issue.severity {
        Severity::Warning => log::warn!("[{}] {}", issue.kind, issue.message),
        Severity::Critical => log::error!("[{}] {}", issue.kind, issue.message),
    });

    monitor
}

pub fn log_summary(monitor: &PerformanceMonitor, stats: RenderStats) {
    let summary = monitor.get_performance_summary();
    log::info!(
        "summary: {} samples, fps avg {:.1} (min {}, max {}), frame avg {:.2} ms, render avg {:.2} ms, peak {} objects, {} issues",
        summary.sample_count,
        summary.average_fps,
        summary.min_fps,
        summary.max_fps,
        summary.average_frame_time_ms,
        summary.average_render_time_ms,
        summary.peak_object_count,
        summary.issues_detected,
    );
    log::info!(
        "renderer: {} frames drawn, {} skipped, {} draw calls last frame",
        stats.frames_rendered,
        stats.frames_skipped,
        stats.draw_calls,
    );
}
