use std::time::Duration;

/// Initialization parameters for the GPU layer.
///
/// Keep this structure stable and minimal. Add configuration flags only when a
/// concrete platform or backend requirement exists.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when available.
    ///
    /// When `false`, the first format reported by the surface is used.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior).
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference for the surface.
    ///
    /// If provided but unsupported on the current surface, a supported mode is selected.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Adapter power preference.
    pub power_preference: wgpu::PowerPreference,

    /// Force the software fallback adapter (headless CI).
    pub force_fallback_adapter: bool,

    /// Required wgpu features.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency for the surface.
    pub desired_maximum_frame_latency: u32,

    /// Upper bound for each asynchronous request (adapter, device, buffer map).
    pub request_timeout: Duration,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: false,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            power_preference: wgpu::PowerPreference::HighPerformance,
            force_fallback_adapter: false,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl GpuInit {
    /// Settings for an offscreen device: low power, portable limits.
    pub fn headless() -> Self {
        Self {
            power_preference: wgpu::PowerPreference::LowPower,
            required_limits: wgpu::Limits::downlevel_defaults(),
            ..Self::default()
        }
    }
}
