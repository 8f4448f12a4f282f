use crate::render::Extent;

/// What the frame loop should do after a swapchain error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface configured again; the next frame can proceed.
    Reconfigured,
    SkipFrame,
    /// Device out of memory. Stop rendering.
    Fatal,
}

/// Picks the swapchain format: an sRGB 8-bit format when preferred and
/// offered, otherwise the first supported one.
pub(crate) fn choose_surface_format(
    formats: &[wgpu::TextureFormat],
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    if prefer_srgb {
        let preferred = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        if let Some(f) = preferred.into_iter().find(|f| formats.contains(f)) {
            return Some(f);
        }
    }

    formats.first().copied()
}

pub(crate) fn choose_alpha_mode(
    supported: &[wgpu::CompositeAlphaMode],
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| supported.contains(m))
        .or_else(|| supported.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// Updates the tracked size and reconfigures the surface.
///
/// wgpu cannot configure a 0x0 surface (minimized window); configuration is
/// deferred until a non-zero size arrives.
pub(crate) fn apply_resize(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &mut wgpu::SurfaceConfiguration,
    size: &mut Extent,
    new_size: Extent,
) {
    *size = new_size;
    if new_size.is_empty() {
        return;
    }

    config.width = new_size.width;
    config.height = new_size.height;

    surface.configure(device, config);
}

/// Classifies `err`, reconfiguring the surface when it was lost or outdated.
pub(crate) fn map_surface_error(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    size: Extent,
    err: wgpu::SurfaceError,
) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
            if !size.is_empty() {
                surface.configure(device, config);
            }
            SurfaceErrorAction::Reconfigured
        }
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout => SurfaceErrorAction::SkipFrame,
        wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::{CompositeAlphaMode, TextureFormat};

    #[test]
    fn srgb_preferred_when_offered() {
        let formats = [TextureFormat::Bgra8Unorm, TextureFormat::Bgra8UnormSrgb];
        assert_eq!(
            choose_surface_format(&formats, true),
            Some(TextureFormat::Bgra8UnormSrgb)
        );
        assert_eq!(
            choose_surface_format(&formats, false),
            Some(TextureFormat::Bgra8Unorm)
        );
    }

    #[test]
    fn falls_back_to_first_format() {
        let formats = [TextureFormat::Rgba16Float];
        assert_eq!(
            choose_surface_format(&formats, true),
            Some(TextureFormat::Rgba16Float)
        );
        assert_eq!(choose_surface_format(&[], true), None);
    }

    #[test]
    fn unsupported_alpha_mode_is_replaced() {
        let supported = [CompositeAlphaMode::Opaque];
        assert_eq!(
            choose_alpha_mode(&supported, Some(CompositeAlphaMode::PreMultiplied)),
            CompositeAlphaMode::Opaque
        );
        assert_eq!(
            choose_alpha_mode(&supported, Some(CompositeAlphaMode::Opaque)),
            CompositeAlphaMode::Opaque
        );
        assert_eq!(choose_alpha_mode(&[], None), CompositeAlphaMode::Auto);
    }
}
