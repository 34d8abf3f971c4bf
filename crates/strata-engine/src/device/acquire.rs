/// A swapchain image plus the encoder recording into it.
///
/// Holding one blocks acquisition of the next; submit it promptly.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

/// Why no frame was produced this time. All of these are retried on the next call.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SkipReason {
    /// Window has zero area (typically minimized).
    ZeroSize,
    /// Surface was lost or outdated and has been reconfigured.
    Reconfigured,
    /// The compositor did not hand out an image in time.
    Timeout,
    /// Any other transient surface failure.
    Other,
}

/// Outcome of [`Gpu::acquire_frame`](super::Gpu::acquire_frame).
pub enum Acquire {
    Frame(GpuFrame),
    Skip(SkipReason),
    /// The device ran out of memory; the surface is unusable.
    Fatal,
}

/// Classifies a surface error. `reconfigure` is invoked for lost/outdated surfaces.
pub(super) fn classify(err: wgpu::SurfaceError, reconfigure: impl FnOnce()) -> Acquire {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
            reconfigure();
            Acquire::Skip(SkipReason::Reconfigured)
        }
        wgpu::SurfaceError::Timeout => Acquire::Skip(SkipReason::Timeout),
        wgpu::SurfaceError::OutOfMemory => Acquire::Fatal,
        wgpu::SurfaceError::Other => Acquire::Skip(SkipReason::Other),
    }
}

/// Picks the first format whose sRGB-ness matches the preference, else the first format.
pub(super) fn pick_format(formats: &[wgpu::TextureFormat], prefer_srgb: bool) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|f| f.is_srgb() == prefer_srgb)
        .or_else(|| formats.first().copied())
}

/// The requested alpha mode when supported, else the surface's first.
pub(super) fn pick_alpha_mode(
    supported: &[wgpu::CompositeAlphaMode],
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| supported.contains(m))
        .or_else(|| supported.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

#[cfg(test)]
mod tests {
    use super::*;

    use wgpu::TextureFormat as F;

    #[test]
    fn format_matches_srgb_preference() {
        let formats = [F::Bgra8UnormSrgb, F::Bgra8Unorm];
        assert_eq!(pick_format(&formats, false), Some(F::Bgra8Unorm));
        assert_eq!(pick_format(&formats, true), Some(F::Bgra8UnormSrgb));
    }

    #[test]
    fn format_falls_back_to_first() {
        assert_eq!(pick_format(&[F::Rgba16Float], false), Some(F::Rgba16Float));
        assert_eq!(pick_format(&[], false), None);
    }

    #[test]
    fn unsupported_alpha_mode_falls_back() {
        let supported = [wgpu::CompositeAlphaMode::Opaque];
        assert_eq!(
            pick_alpha_mode(&supported, Some(wgpu::CompositeAlphaMode::PreMultiplied)),
            wgpu::CompositeAlphaMode::Opaque
        );
        assert_eq!(pick_alpha_mode(&[], None), wgpu::CompositeAlphaMode::Auto);
    }

    #[test]
    fn lost_surface_reconfigures_and_skips() {
        let mut reconfigured = false;
        let outcome = classify(wgpu::SurfaceError::Lost, || reconfigured = true);
        assert!(matches!(outcome, Acquire::Skip(SkipReason::Reconfigured)));
        assert!(reconfigured);
    }

    #[test]
    fn out_of_memory_is_fatal() {
        assert!(matches!(classify(wgpu::SurfaceError::OutOfMemory, || {}), Acquire::Fatal));
        assert!(matches!(classify(wgpu::SurfaceError::Timeout, || {}), Acquire::Skip(SkipReason::Timeout)));
    }
}
