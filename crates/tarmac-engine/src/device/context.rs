use std::time::Duration;

use super::wait::block_on_timeout;
use super::{GpuError, GpuInit};

/// Adapter, device and queue, negotiated once.
///
/// Field order is drop order: the queue and device are released before the
/// adapter, and the instance goes last.
pub struct DeviceContext {
    queue: wgpu::Queue,
    device: wgpu::Device,
    adapter: wgpu::Adapter,
    instance: wgpu::Instance,
    request_timeout: Duration,
}

impl DeviceContext {
    /// Creates an instance over every backend wgpu supports on this platform.
    pub fn create_instance() -> wgpu::Instance {
        wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        })
    }

    /// Requests an adapter, then a device and queue from it.
    ///
    /// Each request is awaited with `init.request_timeout` as its upper bound.
    /// Nothing is returned unless both steps succeed.
    pub fn negotiate(
        instance: wgpu::Instance,
        compatible_surface: Option<&wgpu::Surface<'_>>,
        init: &GpuInit,
    ) -> Result<Self, GpuError> {
        let timeout = init.request_timeout;

        let adapter = block_on_timeout(
            instance.request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: init.power_preference,
                compatible_surface,
                force_fallback_adapter: init.force_fallback_adapter,
            }),
            timeout,
        )
        .ok_or(GpuError::Timeout {
            what: "adapter request",
            after: timeout,
        })?
        .map_err(|e| GpuError::AdapterUnavailable(e.to_string()))?;

        log_adapter(&adapter);

        let (device, queue) = block_on_timeout(
            adapter.request_device(&wgpu::DeviceDescriptor {
                label: Some("tarmac-engine device"),
                required_features: init.required_features,
                required_limits: init.required_limits.clone(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            }),
            timeout,
        )
        .ok_or(GpuError::Timeout {
            what: "device request",
            after: timeout,
        })?
        .map_err(|e| GpuError::DeviceUnavailable(e.to_string()))?;

        log_limits(&device.limits());

        Ok(Self {
            queue,
            device,
            adapter,
            instance,
            request_timeout: timeout,
        })
    }

    /// Negotiates a device with no surface attached.
    pub fn headless(init: &GpuInit) -> Result<Self, GpuError> {
        Self::negotiate(Self::create_instance(), None, init)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn adapter(&self) -> &wgpu::Adapter {
        &self.adapter
    }

    pub fn instance(&self) -> &wgpu::Instance {
        &self.instance
    }

    /// Upper bound applied to blocking waits on this device.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Minimum alignment of dynamic uniform-buffer offsets on this device.
    pub fn uniform_offset_alignment(&self) -> u64 {
        u64::from(self.device.limits().min_uniform_buffer_offset_alignment)
    }
}

fn log_adapter(adapter: &wgpu::Adapter) {
    let info = adapter.get_info();
    log::info!(
        "adapter: {} ({:?}, {:?})",
        info.name,
        info.backend,
        info.device_type
    );
    log::debug!("adapter driver: {} {}", info.driver, info.driver_info);
}

fn log_limits(limits: &wgpu::Limits) {
    log::debug!(
        "device limits: max_texture_dimension_2d={} max_bind_groups={} min_uniform_buffer_offset_alignment={}",
        limits.max_texture_dimension_2d,
        limits.max_bind_groups,
        limits.min_uniform_buffer_offset_alignment
    );
}
