use winit::dpi::PhysicalSize;

/// Picks the surface color format.
///
/// Without an sRGB preference the first reported format wins. An empty
/// capability list has no usable format and yields `None`.
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
    modes: &[wgpu::CompositeAlphaMode],
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| modes.contains(m))
        .or_else(|| modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// wgpu rejects 0x0 surface configurations; those are deferred until the
/// window has area again.
pub(crate) fn is_drawable(size: PhysicalSize<u32>) -> bool {
    size.width > 0 && size.height > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::TextureFormat as F;

    #[test]
    fn first_format_wins_without_preference() {
        let formats = [F::Bgra8Unorm, F::Bgra8UnormSrgb];
        assert_eq!(choose_surface_format(&formats, false), Some(F::Bgra8Unorm));
    }

    #[test]
    fn srgb_preference_picks_srgb_when_offered() {
        let formats = [F::Rgba16Float, F::Rgba8UnormSrgb];
        assert_eq!(choose_surface_format(&formats, true), Some(F::Rgba8UnormSrgb));
        assert_eq!(choose_surface_format(&[F::Rgba16Float], true), Some(F::Rgba16Float));
    }

    #[test]
    fn no_formats_is_none() {
        assert_eq!(choose_surface_format(&[], false), None);
        assert_eq!(choose_surface_format(&[], true), None);
    }

    #[test]
    fn unsupported_alpha_request_falls_back() {
        let modes = [wgpu::CompositeAlphaMode::Opaque];
        assert_eq!(
            choose_alpha_mode(&modes, Some(wgpu::CompositeAlphaMode::PreMultiplied)),
            wgpu::CompositeAlphaMode::Opaque
        );
        assert_eq!(choose_alpha_mode(&[], None), wgpu::CompositeAlphaMode::Auto);
    }

    #[test]
    fn zero_area_is_not_drawable() {
        assert!(!is_drawable(PhysicalSize::new(0, 600)));
        assert!(is_drawable(PhysicalSize::new(1200, 800)));
    }
}
