//! Time subsystem.
//!
//! Monotonic time sources and the rolling FPS window shared by the renderer and the
//! performance monitor. Components take an `Arc<dyn TimeSource>` so tests can drive time
//! explicitly with [`ManualClock`].

mod clock;
mod fps;

pub use clock::{ManualClock, SystemClock, TimeSource};
pub use fps::FpsCounter;
