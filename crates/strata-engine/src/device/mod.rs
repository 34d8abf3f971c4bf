//! GPU device and window surface.
//!
//! [`Gpu`] owns the wgpu device/queue and the window's swapchain. Frames are handed out by
//! [`Gpu::acquire_frame`], which absorbs recoverable surface errors itself and tells the
//! caller only whether to draw, skip, or give up.

mod acquire;
mod gpu;
mod init;

pub use acquire::{Acquire, GpuFrame, SkipReason};
pub use gpu::Gpu;
pub use init::GpuInit;
