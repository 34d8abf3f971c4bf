use std::fmt;

/// Errors surfaced by the renderer.
///
/// Construction failures (`UnsupportedSurface`, `ShaderCompilation`, `ProgramLink`) mean no
/// renderer exists. `InvalidCameraState` is a rejected call that left the renderer untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// The surface provider could not give us a usable GPU surface.
    UnsupportedSurface(String),
    /// The batch shader failed to compile.
    ShaderCompilation(String),
    /// The compiled stages could not be linked into a pipeline.
    ProgramLink(String),
    /// `set_camera` was called with a zoom that is not strictly positive, or with a
    /// non-finite component.
    InvalidCameraState { x: f32, y: f32, zoom: f32 },
    /// Texture data does not match its declared dimensions.
    InvalidTexture { width: u32, height: u32, len: usize },
    /// The renderer was disposed; it accepts no new resources.
    Disposed,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::UnsupportedSurface(msg) => write!(f, "unsupported surface: {msg}"),
            RenderError::ShaderCompilation(msg) => write!(f, "shader compilation failed: {msg}"),
            RenderError::ProgramLink(msg) => write!(f, "program link failed: {msg}"),
            RenderError::InvalidCameraState { x, y, zoom } => {
                write!(f, "invalid camera state: x={x}, y={y}, zoom={zoom} (zoom must be > 0)")
            }
            RenderError::InvalidTexture { width, height, len } => write!(
                f,
                "invalid texture: {width}x{height} RGBA8 needs {} bytes, got {len}",
                *width as usize * *height as usize * 4
            ),
            RenderError::Disposed => f.write_str("renderer has been disposed"),
        }
    }
}

impl std::error::Error for RenderError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_zoom() {
        let err = RenderError::InvalidCameraState { x: -5.0, y: 10.0, zoom: 0.0 };
        assert_eq!(err.to_string(), "invalid camera state: x=-5, y=10, zoom=0 (zoom must be > 0)");
    }
}
