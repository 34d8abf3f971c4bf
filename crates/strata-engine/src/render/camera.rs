use crate::coords::{Mat3, Rect, Vec2, ViewportBounds};

use super::RenderError;

/// Scene units added on every side of the visible area before culling.
///
/// Covers rotated objects whose unrotated box lies just outside the view.
pub const DEFAULT_CULL_PADDING: f32 = 100.0;

/// Pan/zoom state. `(x, y)` is the scene point shown at the viewport's top-left.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub x: f32,
    pub y: f32,
    pub zoom: f32,
}

impl Camera {
    /// Validates and builds a camera. `zoom` must be finite and strictly positive; the
    /// position must be finite.
    pub fn new(x: f32, y: f32, zoom: f32) -> Result<Self, RenderError> {
        let valid = zoom > 0.0 && zoom.is_finite() && x.is_finite() && y.is_finite();
        if !valid {
            return Err(RenderError::InvalidCameraState { x, y, zoom });
        }
        Ok(Self { x, y, zoom })
    }

    /// Scene units -> device pixels: `scale = zoom`, `translate = -position * zoom`.
    #[inline]
    pub fn transform(&self) -> Mat3 {
        Mat3::scale_translate(self.zoom, -self.x * self.zoom, -self.y * self.zoom)
    }

    /// Scene-space area covered by `viewport`, grown by `padding` on every side.
    pub fn visible_bounds(&self, viewport: ViewportBounds, padding: f32) -> Rect {
        let min = Vec2::new(self.x - padding, self.y - padding);
        let max = Vec2::new(
            self.x + viewport.width / self.zoom + padding,
            self.y + viewport.height / self.zoom + padding,
        );
        Rect::from_min_max(min, max)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, zoom: 1.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── validation ────────────────────────────────────────────────────────

    #[test]
    fn rejects_non_positive_zoom() {
        for zoom in [0.0, -1.0, -0.0] {
            assert_eq!(
                Camera::new(-5.0, 10.0, zoom),
                Err(RenderError::InvalidCameraState { x: -5.0, y: 10.0, zoom })
            );
        }
    }

    #[test]
    fn rejects_non_finite_components() {
        assert!(Camera::new(0.0, 0.0, f32::NAN).is_err());
        assert!(Camera::new(0.0, 0.0, f32::INFINITY).is_err());
        assert!(Camera::new(f32::NAN, 0.0, 1.0).is_err());
        assert!(Camera::new(0.0, f32::NEG_INFINITY, 1.0).is_err());
    }

    // ── transform ─────────────────────────────────────────────────────────

    #[test]
    fn origin_maps_to_device_zero() {
        for (x, y, zoom) in [(0.0, 0.0, 1.0), (120.0, -40.0, 2.5), (-3.0, 7.5, 0.25), (1e4, 1e4, 8.0)] {
            let cam = Camera::new(x, y, zoom).unwrap();
            let p = cam.transform().transform_point(Vec2::new(x, y));
            assert!(p.x.abs() < 1e-3 && p.y.abs() < 1e-3, "{cam:?} -> {p:?}");
        }
    }

    #[test]
    fn zoom_scales_distances() {
        let cam = Camera::new(10.0, 10.0, 2.0).unwrap();
        assert_eq!(cam.transform().transform_point(Vec2::new(15.0, 20.0)), Vec2::new(10.0, 20.0));
    }

    // ── visible bounds ────────────────────────────────────────────────────

    #[test]
    fn bounds_cover_viewport_in_scene_units_plus_padding() {
        let cam = Camera::new(50.0, 20.0, 2.0).unwrap();
        let vp = ViewportBounds::new(0.0, 0.0, 800.0, 600.0);
        assert_eq!(cam.visible_bounds(vp, 100.0), Rect::new(-50.0, -80.0, 600.0, 500.0));
    }

    #[test]
    fn zero_padding_is_exact_view() {
        let cam = Camera::default();
        let vp = ViewportBounds::new(0.0, 0.0, 640.0, 480.0);
        assert_eq!(cam.visible_bounds(vp, 0.0), Rect::new(0.0, 0.0, 640.0, 480.0));
    }
}
