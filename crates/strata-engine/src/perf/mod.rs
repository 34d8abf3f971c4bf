//! Frame/render timing instrumentation.
//!
//! A [`PerformanceMonitor`] is a cloneable handle. The host brackets frames and draw work,
//! reports object counts and canvas size, and receives:
//! - periodic [`PerformanceSample`]s from a background sampling thread
//! - [`PerformanceIssue`]s synchronously at `frame_end` when a threshold is breached
//!
//! Nothing here ever fails a frame; breaches are observations.

mod issue;
mod metrics;
mod monitor;

pub use issue::{IssueKind, PerformanceIssue, Severity, Thresholds};
pub use metrics::{CanvasSize, LiveMetrics, PerformanceSample, PerformanceSummary};
pub use monitor::{MonitorConfig, PerformanceMonitor};
