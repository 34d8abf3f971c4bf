use std::collections::VecDeque;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result};

use crate::time::{FpsCounter, SystemClock, TimeSource};

use super::{LiveMetrics, PerformanceIssue, PerformanceSample, PerformanceSummary, Thresholds};

type IssueCallback = Box<dyn FnMut(&PerformanceIssue) + Send>;
type UpdateCallback = Box<dyn FnMut(&PerformanceSample) + Send>;

#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    /// Sampling period used by `start_monitoring_default`.
    pub update_interval: Duration,
    /// Samples kept; the oldest is evicted first.
    pub history_capacity: usize,
    pub thresholds: Thresholds,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            update_interval: Duration::from_millis(1000),
            history_capacity: 300,
            thresholds: Thresholds::default(),
        }
    }
}

struct MonitorCore {
    thresholds: Thresholds,
    capacity: usize,
    history: VecDeque<PerformanceSample>,
    metrics: LiveMetrics,
    fps: FpsCounter,
    frame_started: Option<Duration>,
    render_started: Option<Duration>,
    issues_detected: u64,
}

struct Sampler {
    stop: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

struct Shared {
    clock: Arc<dyn TimeSource>,
    update_interval: Duration,
    core: Mutex<MonitorCore>,
    on_issue: Mutex<Option<IssueCallback>>,
    on_update: Mutex<Option<UpdateCallback>>,
    sampler: Mutex<Option<Sampler>>,
}

/// Shared handle to one monitor.
///
/// Clones observe and feed the same metrics. The sampling thread holds only a weak
/// reference: dropping the last handle closes its channel and the thread exits.
///
/// Callbacks run on the thread that triggered them (`frame_end` caller for issues, the
/// sampling thread for updates) with no monitor lock held.
#[derive(Clone)]
pub struct PerformanceMonitor {
    shared: Arc<Shared>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl PerformanceMonitor {
    pub fn new(config: MonitorConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock::new()))
    }

    /// Uses `clock` for every timestamp; tests pass a `ManualClock`.
    pub fn with_clock(config: MonitorConfig, clock: Arc<dyn TimeSource>) -> Self {
        let now = clock.now();
        let capacity = config.history_capacity.max(1);
        let core = MonitorCore {
            thresholds: config.thresholds,
            capacity,
            history: VecDeque::with_capacity(capacity),
            metrics: LiveMetrics::default(),
            fps: FpsCounter::new(now),
            frame_started: None,
            render_started: None,
            issues_detected: 0,
        };

        Self {
            shared: Arc::new(Shared {
                clock,
                update_interval: config.update_interval,
                core: Mutex::new(core),
                on_issue: Mutex::new(None),
                on_update: Mutex::new(None),
                sampler: Mutex::new(None),
            }),
        }
    }

    // ── frame bracketing ──────────────────────────────────────────────────

    pub fn frame_start(&self) {
        let now = self.shared.clock.now();
        lock(&self.shared.core).frame_started = Some(now);
    }

    /// Closes a host frame: records frame time, counts the frame for FPS, then checks
    /// thresholds and reports each breach to the issue callback.
    pub fn frame_end(&self) {
        let now = self.shared.clock.now();
        let mut issues = Vec::new();
        {
            let mut guard = lock(&self.shared.core);
            let core = &mut *guard;
            if let Some(start) = core.frame_started.take() {
                core.metrics.frame_time_ms = Some(millis(now.saturating_sub(start)));
            }
            if core.fps.record(now) {
                core.metrics.fps = core.fps.fps();
            }
            core.thresholds.check(&core.metrics, &mut issues);
            core.issues_detected += issues.len() as u64;
        }

        for issue in &issues {
            log::debug!("{} ({:?}): {}", issue.kind, issue.severity, issue.message);
        }
        if !issues.is_empty() {
            self.shared.fire_issues(&issues);
        }
    }

    pub fn render_start(&self) {
        let now = self.shared.clock.now();
        lock(&self.shared.core).render_started = Some(now);
    }

    pub fn render_end(&self) {
        let now = self.shared.clock.now();
        let mut core = lock(&self.shared.core);
        if let Some(start) = core.render_started.take() {
            core.metrics.render_time_ms = Some(millis(now.saturating_sub(start)));
        }
    }

    // ── host-reported metrics ─────────────────────────────────────────────

    pub fn update_object_count(&self, total: usize, visible: usize) {
        let mut core = lock(&self.shared.core);
        core.metrics.object_count = Some(total);
        core.metrics.visible_object_count = Some(visible);
    }

    pub fn update_canvas_size(&self, width: u32, height: u32) {
        lock(&self.shared.core).metrics.canvas_size = Some(super::CanvasSize { width, height });
    }

    pub fn update_memory_usage(&self, bytes: u64) {
        lock(&self.shared.core).metrics.memory_usage = Some(bytes);
    }

    // ── callbacks ─────────────────────────────────────────────────────────

    /// Replaces the issue callback.
    pub fn on_performance_issue_detected(&self, cb: impl FnMut(&PerformanceIssue) + Send + 'static) {
        *lock(&self.shared.on_issue) = Some(Box::new(cb));
    }

    /// Replaces the sample callback.
    pub fn on_metrics_updated(&self, cb: impl FnMut(&PerformanceSample) + Send + 'static) {
        *lock(&self.shared.on_update) = Some(Box::new(cb));
    }

    // ── sampling ──────────────────────────────────────────────────────────

    /// Starts the sampling thread with the configured interval.
    pub fn start_monitoring_default(&self) -> Result<()> {
        self.start_monitoring(self.shared.update_interval)
    }

    /// Starts (or restarts) the sampling thread, ticking every `interval`.
    pub fn start_monitoring(&self, interval: Duration) -> Result<()> {
        self.stop_monitoring();

        let interval = interval.max(Duration::from_millis(1));
        let (stop, stop_rx) = mpsc::channel::<()>();
        let weak: Weak<Shared> = Arc::downgrade(&self.shared);

        let handle = thread::Builder::new()
            .name("strata-perf-sampler".into())
            .spawn(move || {
                loop {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {
                            let Some(shared) = weak.upgrade() else { break };
                            shared.sample_tick();
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                log::debug!("performance sampler stopped");
            })
            .context("failed to spawn performance sampler thread")?;

        *lock(&self.shared.sampler) = Some(Sampler { stop, handle });
        log::debug!("performance sampler started ({interval:?})");
        Ok(())
    }

    /// Stops the sampling thread and waits for it. No-op when not running.
    pub fn stop_monitoring(&self) {
        let Some(sampler) = lock(&self.shared.sampler).take() else { return };
        let _ = sampler.stop.send(());
        // A callback stopping its own sampler must not join itself.
        if sampler.handle.thread().id() != thread::current().id() {
            let _ = sampler.handle.join();
        }
    }

    pub fn is_monitoring(&self) -> bool {
        lock(&self.shared.sampler).is_some()
    }

    /// One sampling step: rolls the FPS window and, when every required metric has been
    /// observed, appends a sample and reports it.
    ///
    /// This is what the sampling thread runs; hosts without a thread may call it directly.
    pub fn sample_tick(&self) -> Option<PerformanceSample> {
        self.shared.sample_tick()
    }

    // ── queries ───────────────────────────────────────────────────────────

    pub fn set_thresholds(&self, thresholds: Thresholds) {
        lock(&self.shared.core).thresholds = thresholds;
    }

    pub fn thresholds(&self) -> Thresholds {
        lock(&self.shared.core).thresholds
    }

    pub fn current_metrics(&self) -> LiveMetrics {
        lock(&self.shared.core).metrics.clone()
    }

    /// The `count` most recent samples, oldest first.
    pub fn get_metrics_history(&self, count: usize) -> Vec<PerformanceSample> {
        let core = lock(&self.shared.core);
        let skip = core.history.len().saturating_sub(count);
        core.history.iter().skip(skip).cloned().collect()
    }

    pub fn get_performance_summary(&self) -> PerformanceSummary {
        let core = lock(&self.shared.core);
        PerformanceSummary::from_samples(&core.history, core.issues_detected)
    }

    pub fn clear_history(&self) {
        lock(&self.shared.core).history.clear();
    }
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new(MonitorConfig::default())
    }
}

impl std::fmt::Debug for PerformanceMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerformanceMonitor")
            .field("monitoring", &self.is_monitoring())
            .field("metrics", &self.current_metrics())
            .finish()
    }
}

impl Shared {
    fn sample_tick(&self) -> Option<PerformanceSample> {
        let now = self.clock.now();
        let sample = {
            let mut guard = lock(&self.core);
            let core = &mut *guard;
            if core.fps.roll(now) {
                core.metrics.fps = core.fps.fps();
            }
            let sample = core.metrics.to_sample(now)?;
            if core.history.len() == core.capacity {
                core.history.pop_front();
            }
            core.history.push_back(sample.clone());
            sample
        };

        // Taken out while running so the callback may call back into the monitor,
        // including replacing itself.
        let cb = lock(&self.on_update).take();
        if let Some(mut cb) = cb {
            cb(&sample);
            lock(&self.on_update).get_or_insert(cb);
        }
        Some(sample)
    }

    fn fire_issues(&self, issues: &[PerformanceIssue]) {
        let cb = lock(&self.on_issue).take();
        if let Some(mut cb) = cb {
            for issue in issues {
                cb(issue);
            }
            lock(&self.on_issue).get_or_insert(cb);
        }
    }
}

#[inline]
fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::perf::{IssueKind, Severity};
    use crate::time::ManualClock;

    fn manual() -> (PerformanceMonitor, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let monitor = PerformanceMonitor::with_clock(MonitorConfig::default(), clock.clone());
        (monitor, clock)
    }

    fn feed_static_metrics(m: &PerformanceMonitor) {
        m.update_object_count(500, 50);
        m.update_canvas_size(800, 600);
        m.render_start();
        m.render_end();
    }

    // ── fps ───────────────────────────────────────────────────────────────

    #[test]
    fn sixty_frames_in_a_second_sample_as_sixty_fps() {
        let (m, clock) = manual();
        feed_static_metrics(&m);
        for _ in 0..60 {
            m.frame_start();
            clock.advance_ms(16);
            m.frame_end();
        }
        clock.set(Duration::from_millis(1000));

        let sample = m.sample_tick().unwrap();
        assert_eq!(sample.fps, 60);
        assert!((sample.frame_time_ms - 16.0).abs() < 1e-9);
        assert_eq!((sample.object_count, sample.visible_object_count), (500, 50));
    }

    #[test]
    fn no_sample_until_every_metric_is_known() {
        let (m, clock) = manual();
        m.update_object_count(1, 1);
        clock.advance_ms(1000);
        assert_eq!(m.sample_tick(), None);
        assert!(m.get_metrics_history(10).is_empty());
    }

    // ── issues ────────────────────────────────────────────────────────────

    #[test]
    fn low_fps_reports_exactly_one_issue() {
        let (m, clock) = manual();
        let issues = Arc::new(Mutex::new(Vec::new()));
        let sink = issues.clone();
        m.on_performance_issue_detected(move |i| sink.lock().unwrap().push(i.clone()));

        for _ in 0..20 {
            clock.advance_ms(45);
            m.frame_start();
            clock.advance_ms(5);
            m.frame_end();
        }

        let issues = issues.lock().unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::LowFps);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert_eq!((issues[0].value, issues[0].threshold), (20.0, 30.0));
        assert_eq!(m.get_performance_summary().issues_detected, 1);
    }

    #[test]
    fn issue_callback_is_replaced_not_stacked() {
        let (m, clock) = manual();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let f = first.clone();
        m.on_performance_issue_detected(move |_| {
            f.fetch_add(1, Ordering::SeqCst);
        });
        let s = second.clone();
        m.on_performance_issue_detected(move |_| {
            s.fetch_add(1, Ordering::SeqCst);
        });

        m.frame_start();
        clock.advance_ms(100);
        m.frame_end();

        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    // ── history ───────────────────────────────────────────────────────────

    #[test]
    fn history_is_capped_and_returns_most_recent_oldest_first() {
        let (m, clock) = manual();
        feed_static_metrics(&m);
        m.frame_start();
        m.frame_end();
        for _ in 0..310 {
            clock.advance_ms(1000);
            m.sample_tick();
        }

        assert_eq!(m.get_metrics_history(1000).len(), 300);
        let last_two = m.get_metrics_history(2);
        assert_eq!(last_two.len(), 2);
        assert!(last_two[0].timestamp < last_two[1].timestamp);
        assert_eq!(last_two[1].timestamp, Duration::from_secs(310));
        assert_eq!(m.get_performance_summary().sample_count, 300);

        m.clear_history();
        assert!(m.get_metrics_history(5).is_empty());
    }

    #[test]
    fn update_callback_sees_each_sample() {
        let (m, clock) = manual();
        let seen = Arc::new(AtomicUsize::new(0));
        let s = seen.clone();
        m.on_metrics_updated(move |_| {
            s.fetch_add(1, Ordering::SeqCst);
        });
        feed_static_metrics(&m);
        m.frame_start();
        m.frame_end();
        clock.advance_ms(1000);
        m.sample_tick();
        m.sample_tick();
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    // ── sampling thread ───────────────────────────────────────────────────

    #[test]
    fn sampler_thread_records_and_stops() {
        let m = PerformanceMonitor::default();
        feed_static_metrics(&m);
        m.frame_start();
        m.frame_end();
        m.update_memory_usage(1 << 20);

        m.start_monitoring(Duration::from_millis(5)).unwrap();
        assert!(m.is_monitoring());
        thread::sleep(Duration::from_millis(1200));
        m.stop_monitoring();
        m.stop_monitoring();
        assert!(!m.is_monitoring());

        let count = m.get_metrics_history(usize::MAX).len();
        assert!(count > 0);
        assert_eq!(m.get_metrics_history(1)[0].memory_usage, Some(1 << 20));
        thread::sleep(Duration::from_millis(20));
        assert_eq!(m.get_metrics_history(usize::MAX).len(), count);
    }

    #[test]
    fn restarting_replaces_the_sampler() {
        let m = PerformanceMonitor::default();
        m.start_monitoring(Duration::from_millis(50)).unwrap();
        m.start_monitoring(Duration::from_millis(50)).unwrap();
        assert!(m.is_monitoring());
        m.stop_monitoring();
    }

    #[test]
    fn dropping_the_last_handle_ends_the_sampler() {
        let m = PerformanceMonitor::default();
        m.start_monitoring(Duration::from_millis(5)).unwrap();
        let weak = Arc::downgrade(&m.shared);
        drop(m);
        thread::sleep(Duration::from_millis(50));
        assert!(weak.upgrade().is_none());
    }
}
