/// Knobs for bringing up the window surface.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Scene colors are hex sRGB written straight to the surface, canvas-style, so a linear
    /// (non-sRGB) format is chosen unless this is set.
    pub prefer_srgb: bool,
    pub present_mode: wgpu::PresentMode,
    /// Falls back to whatever the surface supports first.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,
    pub power_preference: wgpu::PowerPreference,
    /// The batch renderer needs nothing beyond WebGL2-level limits.
    pub limits: wgpu::Limits,
    pub frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: false,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: None,
            power_preference: wgpu::PowerPreference::HighPerformance,
            limits: wgpu::Limits::downlevel_webgl2_defaults(),
            frame_latency: 2,
        }
    }
}
