//! Strata engine crate.
//!
//! A batched, culled 2D scene renderer on top of wgpu, plus the frame/render timing
//! instrumentation used to watch it.
//!
//! Layering (leaf first):
//! - `coords`, `paint`, `time`: plain value types and clocks
//! - `scene`: the host-owned object model the renderer reads each frame
//! - `device`: wgpu instance/adapter/device/surface ownership
//! - `render`: backend seam, program manager, buffer pool, camera, culling, batching, orchestrator
//! - `perf`: the performance monitor

pub mod coords;
pub mod device;
pub mod logging;
pub mod paint;
pub mod perf;
pub mod render;
pub mod scene;
pub mod time;
