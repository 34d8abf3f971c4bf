use std::fmt;

use super::LiveMetrics;

/// Limits checked after every `frame_end`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Thresholds {
    pub min_fps: u32,
    pub max_frame_time_ms: f64,
    pub max_render_time_ms: f64,
    pub max_object_count: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_fps: 30,
            max_frame_time_ms: 33.3,
            max_render_time_ms: 16.7,
            max_object_count: 10_000,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum IssueKind {
    LowFps,
    HighFrameTime,
    HighRenderTime,
    HighObjectCount,
}

impl IssueKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            IssueKind::LowFps => "low_fps",
            IssueKind::HighFrameTime => "high_frame_time",
            IssueKind::HighRenderTime => "high_render_time",
            IssueKind::HighObjectCount => "high_object_count",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `Critical` once a metric is at least twice as far off as allowed.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Severity {
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceIssue {
    pub kind: IssueKind,
    pub severity: Severity,
    pub message: String,
    pub value: f64,
    pub threshold: f64,
}

impl Thresholds {
    /// Compares observed metrics against the limits and appends one issue per breach.
    ///
    /// Order is fixed: fps, frame time, render time, object count. Unobserved metrics are
    /// not checked.
    pub fn check(&self, m: &LiveMetrics, out: &mut Vec<PerformanceIssue>) {
        if let Some(fps) = m.fps {
            let (value, min) = (fps as f64, self.min_fps as f64);
            if value < min {
                let severity = if value <= min / 2.0 { Severity::Critical } else { Severity::Warning };
                out.push(PerformanceIssue {
                    kind: IssueKind::LowFps,
                    severity,
                    message: format!("fps {fps} is below the minimum of {}", self.min_fps),
                    value,
                    threshold: min,
                });
            }
        }

        if let Some(ms) = m.frame_time_ms {
            push_above(out, IssueKind::HighFrameTime, "frame time", ms, self.max_frame_time_ms, "ms");
        }
        if let Some(ms) = m.render_time_ms {
            push_above(out, IssueKind::HighRenderTime, "render time", ms, self.max_render_time_ms, "ms");
        }
        if let Some(count) = m.object_count {
            push_above(
                out,
                IssueKind::HighObjectCount,
                "object count",
                count as f64,
                self.max_object_count as f64,
                "",
            );
        }
    }
}

fn push_above(out: &mut Vec<PerformanceIssue>, kind: IssueKind, what: &str, value: f64, max: f64, unit: &str) {
    if value <= max {
        return;
    }
    let severity = if value >= max * 2.0 { Severity::Critical } else { Severity::Warning };
    out.push(PerformanceIssue {
        kind,
        severity,
        message: format!("{what} {value:.1}{unit} exceeds the maximum of {max:.1}{unit}"),
        value,
        threshold: max,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(m: &LiveMetrics) -> Vec<PerformanceIssue> {
        let mut out = Vec::new();
        Thresholds::default().check(m, &mut out);
        out
    }

    #[test]
    fn nothing_observed_nothing_reported() {
        assert!(check(&LiveMetrics::default()).is_empty());
    }

    #[test]
    fn low_fps_is_a_warning_above_half_the_minimum() {
        let issues = check(&LiveMetrics { fps: Some(20), ..Default::default() });
        assert_eq!(issues.len(), 1);
        let issue = &issues[0];
        assert_eq!((issue.kind, issue.severity), (IssueKind::LowFps, Severity::Warning));
        assert_eq!((issue.value, issue.threshold), (20.0, 30.0));
    }

    #[test]
    fn half_the_minimum_fps_is_critical() {
        let issues = check(&LiveMetrics { fps: Some(15), ..Default::default() });
        assert_eq!(issues[0].severity, Severity::Critical);
    }

    #[test]
    fn metrics_at_the_limit_pass() {
        let m = LiveMetrics {
            fps: Some(30),
            frame_time_ms: Some(33.3),
            render_time_ms: Some(16.7),
            object_count: Some(10_000),
            ..Default::default()
        };
        assert!(check(&m).is_empty());
    }

    #[test]
    fn breaches_are_reported_in_fixed_order() {
        let m = LiveMetrics {
            object_count: Some(25_000),
            render_time_ms: Some(20.0),
            frame_time_ms: Some(100.0),
            fps: Some(10),
            ..Default::default()
        };
        let issues = check(&m);
        let kinds: Vec<_> = issues.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![IssueKind::LowFps, IssueKind::HighFrameTime, IssueKind::HighRenderTime, IssueKind::HighObjectCount]
        );
        let severities: Vec<_> = issues.iter().map(|i| i.severity).collect();
        assert_eq!(severities, vec![Severity::Critical, Severity::Critical, Severity::Warning, Severity::Critical]);
    }

    #[test]
    fn kinds_have_stable_names() {
        assert_eq!(IssueKind::HighRenderTime.to_string(), "high_render_time");
    }
}
