use winit::event::WindowEvent;
use winit::window::Window;

use crate::device::Gpu;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application driven by [`crate::window::Runtime`].
///
/// An `Err` from any callback stops the event loop and is returned from
/// `Runtime::run`.
pub trait App {
    /// Called once, after the window and its GPU session exist.
    fn on_gpu_ready(&mut self, gpu: &mut Gpu<'_>, window: &Window) -> anyhow::Result<()>;

    /// Called for every window event before the runtime handles it.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called once per redraw.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> anyhow::Result<AppControl>;
}
