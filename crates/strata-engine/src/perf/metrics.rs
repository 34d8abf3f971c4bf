use std::time::Duration;

/// Drawable size in device pixels.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

/// Snapshot recorded at a sample tick. Immutable once in history.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceSample {
    pub fps: u32,
    /// Duration of the last host frame (`frame_start` -> `frame_end`).
    pub frame_time_ms: f64,
    /// Duration of the last draw pass (`render_start` -> `render_end`).
    pub render_time_ms: f64,
    pub object_count: usize,
    pub visible_object_count: usize,
    /// Host-reported; `None` when the host never reported it.
    pub memory_usage: Option<u64>,
    pub canvas_size: CanvasSize,
    /// Monitor clock time of the tick.
    pub timestamp: Duration,
}

/// Most recent value of every metric; `None` until first observed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveMetrics {
    pub fps: Option<u32>,
    pub frame_time_ms: Option<f64>,
    pub render_time_ms: Option<f64>,
    pub object_count: Option<usize>,
    pub visible_object_count: Option<usize>,
    pub memory_usage: Option<u64>,
    pub canvas_size: Option<CanvasSize>,
}

impl LiveMetrics {
    /// Builds a sample once every required metric has been seen.
    pub fn to_sample(&self, timestamp: Duration) -> Option<PerformanceSample> {
        Some(PerformanceSample {
            fps: self.fps?,
            frame_time_ms: self.frame_time_ms?,
            render_time_ms: self.render_time_ms?,
            object_count: self.object_count?,
            visible_object_count: self.visible_object_count?,
            memory_usage: self.memory_usage,
            canvas_size: self.canvas_size?,
            timestamp,
        })
    }
}

/// Aggregate over the sample history. All zero when the history is empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerformanceSummary {
    pub average_fps: f64,
    pub min_fps: u32,
    pub max_fps: u32,
    pub average_frame_time_ms: f64,
    pub average_render_time_ms: f64,
    pub peak_object_count: usize,
    pub sample_count: usize,
    /// Issues raised since creation (not bounded by the history).
    pub issues_detected: u64,
}

impl PerformanceSummary {
    pub fn from_samples<'a>(
        samples: impl IntoIterator<Item = &'a PerformanceSample>,
        issues_detected: u64,
    ) -> Self {
        let mut s = Self {
            issues_detected,
            min_fps: u32::MAX,
            ..Self::default()
        };
        let (mut fps_sum, mut frame_sum, mut render_sum) = (0.0, 0.0, 0.0);

        for sample in samples {
            s.sample_count += 1;
            fps_sum += sample.fps as f64;
            frame_sum += sample.frame_time_ms;
            render_sum += sample.render_time_ms;
            s.min_fps = s.min_fps.min(sample.fps);
            s.max_fps = s.max_fps.max(sample.fps);
            s.peak_object_count = s.peak_object_count.max(sample.object_count);
        }

        if s.sample_count == 0 {
            s.min_fps = 0;
            return s;
        }
        let n = s.sample_count as f64;
        s.average_fps = fps_sum / n;
        s.average_frame_time_ms = frame_sum / n;
        s.average_render_time_ms = render_sum / n;
        s
    }
}
