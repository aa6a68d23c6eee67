use winit::window::Window;

use crate::device::Gpu;
use crate::time::FrameTime;

/// Per-frame context passed to `App::on_frame`.
///
/// `'a` is the callback; `'w` is the window borrow held by `Gpu<'w>`.
pub struct FrameCtx<'a, 'w> {
    pub window: &'a Window,
    pub gpu: &'a mut Gpu<'w>,
    pub time: FrameTime,
}

impl FrameCtx<'_, '_> {
    /// Physical size of the drawable area.
    pub fn viewport(&self) -> (u32, u32) {
        let size = self.gpu.size();
        (size.width, size.height)
    }
}
