//! Coordinate and geometry types shared by the scene model and the renderer.
//!
//! Two spaces are in play:
//! - scene units: where hosts place objects; origin top-left, +X right, +Y down
//! - device pixels: the drawable surface; the camera transform maps scene -> device
//!
//! The shader converts device pixels to NDC using a resolution uniform.

mod rect;
mod transform;
mod vec2;
mod viewport;

pub use rect::Rect;
pub use transform::Mat3;
pub use vec2::Vec2;
pub use viewport::ViewportBounds;
