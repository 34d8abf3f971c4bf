/// Drawable surface region in device pixels.
///
/// Recomputed whenever the surface resizes; see `render::SceneRenderer::handle_resize`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ViewportBounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ViewportBounds {
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Builds bounds from a logical surface size and its device pixel ratio.
    ///
    /// Non-finite or non-positive ratios are treated as 1.0.
    pub fn from_logical(logical_width: f32, logical_height: f32, scale_factor: f32) -> Self {
        let scale = if scale_factor.is_finite() && scale_factor > 0.0 { scale_factor } else { 1.0 };
        Self::new(
            0.0,
            0.0,
            (logical_width.max(0.0) * scale).round(),
            (logical_height.max(0.0) * scale).round(),
        )
    }
}
