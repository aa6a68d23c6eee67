use wgpu::util::DeviceExt;

use crate::error::ConfigError;

/// Describes a GPU buffer.
///
/// The size is fixed at creation; later updates are byte-range writes through
/// the queue (`write_buffer`).
#[derive(Debug, Clone, Copy)]
pub struct BufferSpec<'a> {
    pub label: Option<&'a str>,
    pub usage: wgpu::BufferUsages,
    pub size: u64,
    pub contents: Option<&'a [u8]>,
}

impl<'a> BufferSpec<'a> {
    /// An uninitialized buffer of `size` bytes.
    pub fn new(label: &'a str, usage: wgpu::BufferUsages, size: u64) -> Self {
        Self {
            label: Some(label),
            usage,
            size,
            contents: None,
        }
    }

    /// A buffer sized to and initialized with `contents`.
    pub fn with_contents(label: &'a str, usage: wgpu::BufferUsages, contents: &'a [u8]) -> Self {
        Self {
            label: Some(label),
            usage,
            size: contents.len() as u64,
            contents: Some(contents),
        }
    }

    /// Checks size and contents without touching the device.
    ///
    /// Sizes must be non-zero multiples of `wgpu::COPY_BUFFER_ALIGNMENT` so the
    /// buffer can always be written and copied whole.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size == 0 {
            return Err(ConfigError::ZeroSizedBuffer);
        }
        if self.size % wgpu::COPY_BUFFER_ALIGNMENT != 0 {
            return Err(ConfigError::UnalignedBuffer {
                size: self.size,
                alignment: wgpu::COPY_BUFFER_ALIGNMENT,
            });
        }
        if let Some(contents) = self.contents {
            let actual = contents.len() as u64;
            if actual != self.size {
                return Err(ConfigError::ContentsSize {
                    declared: self.size,
                    actual,
                });
            }
        }
        Ok(())
    }

    pub fn create(&self, device: &wgpu::Device) -> Result<wgpu::Buffer, ConfigError> {
        self.validate()?;

        let buffer = match self.contents {
            Some(contents) => device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: self.label,
                contents,
                usage: self.usage,
            }),
            None => device.create_buffer(&wgpu::BufferDescriptor {
                label: self.label,
                size: self.size,
                usage: self.usage,
                mapped_at_creation: false,
            }),
        };
        Ok(buffer)
    }
}

/// Writes `bytes` into `buffer` at `offset` through the queue.
///
/// The range must lie inside the buffer; buffers never grow.
pub fn write_buffer(
    queue: &wgpu::Queue,
    buffer: &wgpu::Buffer,
    offset: u64,
    bytes: &[u8],
) -> Result<(), ConfigError> {
    check_write_range(offset, bytes.len() as u64, buffer.size())?;
    queue.write_buffer(buffer, offset, bytes);
    Ok(())
}

fn check_write_range(offset: u64, len: u64, buffer_size: u64) -> Result<(), ConfigError> {
    for value in [offset, len] {
        if value % wgpu::COPY_BUFFER_ALIGNMENT != 0 {
            return Err(ConfigError::UnalignedBuffer {
                size: value,
                alignment: wgpu::COPY_BUFFER_ALIGNMENT,
            });
        }
    }
    match offset.checked_add(len) {
        Some(end) if end <= buffer_size => Ok(()),
        _ => Err(ConfigError::ByteRange {
            offset,
            len,
            buffer_size,
        }),
    }
}
