use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::surface;
use super::{Acquired, DeviceContext, GpuError, GpuFrame, GpuInit, SkipReason, SurfaceErrorAction};

/// Owns the window surface and the device it renders with.
///
/// This type is the low-level rendering session:
/// - negotiates Instance/Adapter/Device/Queue through `DeviceContext`
/// - creates and configures the Surface (swapchain)
/// - acquires frames, skipping the ones that cannot be rendered
///
/// Field order is drop order: the surface is released before the device and
/// the device before the instance.
pub struct Gpu<'w> {
    /// Surface bound to the window.
    ///
    /// Surface lifetime is tied to the window; the window must outlive `Gpu`.
    surface: wgpu::Surface<'w>,

    /// Active surface configuration.
    config: wgpu::SurfaceConfiguration,

    /// Current drawable size in physical pixels.
    size: PhysicalSize<u32>,

    /// Device, queue, adapter and instance.
    ctx: DeviceContext,
}

impl<'w> Gpu<'w> {
    /// Creates a GPU session bound to a window.
    ///
    /// Adapter and device requests are awaited with the bounded timeout from
    /// `init`. The negotiated color format is never undefined: a surface with
    /// no supported formats is an error.
    pub fn new(window: &'w Window, init: GpuInit) -> Result<Self, GpuError> {
        let size = window.inner_size();
        if !surface::is_drawable(size) {
            return Err(GpuError::ZeroSizedWindow);
        }

        let instance = DeviceContext::create_instance();

        // Surface lifetime is tied to `window` via `'w`.
        let wgpu_surface = instance
            .create_surface(window)
            .map_err(|e| GpuError::SurfaceCreation(e.to_string()))?;

        let ctx = DeviceContext::negotiate(instance, Some(&wgpu_surface), &init)?;

        let caps = wgpu_surface.get_capabilities(ctx.adapter());
        let format = surface::choose_surface_format(&caps.formats, init.prefer_srgb)
            .ok_or(GpuError::UnsupportedSurfaceFormat)?;
        let alpha_mode = surface::choose_alpha_mode(&caps.alpha_modes, init.alpha_mode);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: init.present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
        };

        wgpu_surface.configure(ctx.device(), &config);
        log::info!(
            "surface configured: {}x{} {:?} {:?}",
            size.width,
            size.height,
            format,
            init.present_mode
        );

        Ok(Self {
            surface: wgpu_surface,
            config,
            size,
            ctx,
        })
    }

    /// Returns the negotiated surface color format.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Returns the current drawable size (physical pixels).
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    pub fn context(&self) -> &DeviceContext {
        &self.ctx
    }

    pub fn device(&self) -> &wgpu::Device {
        self.ctx.device()
    }

    pub fn queue(&self) -> &wgpu::Queue {
        self.ctx.queue()
    }

    /// Reconfigures the surface after a resize.
    ///
    /// A 0x0 size only updates internal state; configuration is deferred.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.size = new_size;
        if !surface::is_drawable(new_size) {
            return;
        }

        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(self.ctx.device(), &self.config);
    }

    /// Acquires the next surface texture.
    ///
    /// Anything other than an optimal texture skips the frame before an
    /// encoder exists. Lost and outdated surfaces are reconfigured with the
    /// current configuration first. Only out-of-memory is an error.
    pub fn acquire_frame(&mut self) -> Result<Acquired<GpuFrame>, GpuError> {
        if !surface::is_drawable(self.size) {
            return Ok(Acquired::Skip(SkipReason::ZeroSized));
        }

        let err = match self.surface.get_current_texture() {
            Ok(surface_texture) if surface_texture.suboptimal => {
                // Dropping an unpresented texture hands it back to the swapchain.
                drop(surface_texture);
                return Ok(Acquired::Skip(SkipReason::Suboptimal));
            }
            Ok(surface_texture) => return Ok(Acquired::Frame(GpuFrame::new(surface_texture))),
            Err(err) => err,
        };

        match SurfaceErrorAction::classify(&err) {
            SurfaceErrorAction::Reconfigure => {
                log::debug!("surface {err}; reconfiguring");
                self.surface.configure(self.ctx.device(), &self.config);
                Ok(Acquired::Skip(SkipReason::Reconfigured))
            }
            SurfaceErrorAction::SkipFrame => {
                log::debug!("surface {err}; skipping frame");
                Ok(Acquired::Skip(SkipReason::Transient))
            }
            SurfaceErrorAction::Fatal => Err(GpuError::SurfaceOutOfMemory),
        }
    }
}
