use super::SkipReason;

/// Result of trying to obtain a frame target.
#[derive(Debug)]
pub enum Acquired<F> {
    /// A target ready for rendering.
    Frame(F),
    /// Nothing to render into this frame.
    Skip(SkipReason),
}

/// Represents a single acquired surface frame.
///
/// This object is short-lived and must be presented promptly. Holding the
/// surface texture prevents acquisition of subsequent frames.
pub struct GpuFrame {
    pub view: wgpu::TextureView,
    pub surface_texture: wgpu::SurfaceTexture,
}

impl GpuFrame {
    pub(crate) fn new(surface_texture: wgpu::SurfaceTexture) -> Self {
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor {
                label: Some("tarmac frame view"),
                ..Default::default()
            });
        Self {
            view,
            surface_texture,
        }
    }

    /// Releases the frame view and presents the surface texture.
    pub fn present(self) {
        let Self {
            view,
            surface_texture,
        } = self;
        drop(view);
        surface_texture.present();
    }
}
