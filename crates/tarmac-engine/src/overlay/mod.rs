//! UI overlay composited into the scene pass.
//!
//! An overlay is driven through exactly two calls per frame: `begin_frame`
//! before rendering (build and upload draw data) and `draw` inside the scene
//! render pass, after the scene's own draws.

mod panel;
mod rects;
mod slider;

pub use panel::{TuningPanel, TuningState};
pub use rects::{RectBatch, ScreenRect};
pub use slider::Slider;

/// Per-frame context handed to an overlay.
#[derive(Debug, Clone, Copy)]
pub struct OverlayFrame<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub format: wgpu::TextureFormat,
    /// Target size in physical pixels.
    pub viewport: (u32, u32),
}

pub trait Overlay {
    /// Builds and uploads this frame's draw data.
    fn begin_frame(&mut self, frame: &OverlayFrame<'_>);

    /// Records previously built draw data into the current pass.
    fn draw(&self, pass: &mut wgpu::RenderPass<'_>);
}

/// Overlay that draws nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOverlay;

impl Overlay for NoOverlay {
    fn begin_frame(&mut self, _frame: &OverlayFrame<'_>) {}

    fn draw(&self, _pass: &mut wgpu::RenderPass<'_>) {}
}
