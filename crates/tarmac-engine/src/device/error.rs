use std::time::Duration;

use thiserror::Error;

/// Adapter, device and surface failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GpuError {
    #[error("no suitable GPU adapter: {0}")]
    AdapterUnavailable(String),

    #[error("GPU device request failed: {0}")]
    DeviceUnavailable(String),

    #[error("{what} did not complete within {after:?}")]
    Timeout { what: &'static str, after: Duration },

    #[error("failed to create surface: {0}")]
    SurfaceCreation(String),

    #[error("surface reports no supported color format")]
    UnsupportedSurfaceFormat,

    #[error("window has zero size")]
    ZeroSizedWindow,

    #[error("surface is out of memory")]
    SurfaceOutOfMemory,

    #[error("buffer read-back failed: {0}")]
    Readback(String),
}

/// High-level response after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface configuration is stale; reconfigure, then skip this frame.
    Reconfigure,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Fatal error (commonly OOM); terminate gracefully.
    Fatal,
}

/// Why a frame was skipped without touching any GPU resource.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SkipReason {
    /// The surface texture was acquired but is not optimal for presentation.
    Suboptimal,
    /// The surface was lost or outdated and has been reconfigured.
    Reconfigured,
    /// Acquisition timed out or failed transiently.
    Transient,
    /// The window is minimized (zero drawable size).
    ZeroSized,
}

impl SurfaceErrorAction {
    /// Classifies a surface acquisition error.
    pub fn classify(err: &wgpu::SurfaceError) -> Self {
        match err {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => Self::Reconfigure,
            wgpu::SurfaceError::OutOfMemory => Self::Fatal,
            wgpu::SurfaceError::Timeout => Self::SkipFrame,
            wgpu::SurfaceError::Other => Self::SkipFrame,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lost_and_outdated_reconfigure() {
        assert_eq!(
            SurfaceErrorAction::classify(&wgpu::SurfaceError::Lost),
            SurfaceErrorAction::Reconfigure
        );
        assert_eq!(
            SurfaceErrorAction::classify(&wgpu::SurfaceError::Outdated),
            SurfaceErrorAction::Reconfigure
        );
    }

    #[test]
    fn timeout_skips_and_oom_is_fatal() {
        assert_eq!(
            SurfaceErrorAction::classify(&wgpu::SurfaceError::Timeout),
            SurfaceErrorAction::SkipFrame
        );
        assert_eq!(
            SurfaceErrorAction::classify(&wgpu::SurfaceError::OutOfMemory),
            SurfaceErrorAction::Fatal
        );
    }
}
