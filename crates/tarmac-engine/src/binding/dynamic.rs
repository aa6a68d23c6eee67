use std::marker::PhantomData;

use bytemuck::Pod;

use crate::error::ConfigError;
use crate::resource::{write_buffer, BufferSpec};

use super::{Binding, SlotKind};

/// Offset alignment assumed when no device limit is at hand.
///
/// Satisfies `min_uniform_buffer_offset_alignment` on every common backend.
pub const DEFAULT_UNIFORM_ALIGNMENT: u64 = 256;

/// Smallest multiple of `alignment` that holds a `block_size`-byte block.
pub fn slot_stride(block_size: u64, alignment: u64) -> u64 {
    let alignment = alignment.max(1);
    block_size.max(1).div_ceil(alignment) * alignment
}

/// One uniform buffer holding `capacity` blocks of `T`, one per object.
///
/// Bind groups reference the whole buffer through a `T`-sized window; each
/// draw selects its slot with a dynamic offset of `slot * stride`.
#[derive(Debug)]
pub struct UniformSlots<T> {
    buffer: wgpu::Buffer,
    stride: u64,
    capacity: u32,
    _block: PhantomData<T>,
}

impl<T: Pod> UniformSlots<T> {
    /// `alignment` is normally the device's minimum uniform offset alignment.
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        capacity: u32,
        alignment: u64,
    ) -> Result<Self, ConfigError> {
        let stride = slot_stride(Self::block_size(), alignment);
        let buffer = BufferSpec::new(
            label,
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            stride * u64::from(capacity),
        )
        .create(device)?;

        Ok(Self {
            buffer,
            stride,
            capacity,
            _block: PhantomData,
        })
    }

    pub fn block_size() -> u64 {
        std::mem::size_of::<T>() as u64
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub fn stride(&self) -> u64 {
        self.stride
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Dynamic offset selecting `slot`, or `None` past the end.
    pub fn offset(&self, slot: u32) -> Option<u32> {
        if slot >= self.capacity {
            return None;
        }
        u32::try_from(u64::from(slot) * self.stride).ok()
    }

    /// Writes the block for `slot` through the queue.
    pub fn write(&self, queue: &wgpu::Queue, slot: u32, value: &T) -> Result<(), ConfigError> {
        let offset = u64::from(slot) * self.stride;
        if slot >= self.capacity {
            return Err(ConfigError::ByteRange {
                offset,
                len: Self::block_size(),
                buffer_size: self.buffer.size(),
            });
        }
        write_buffer(queue, &self.buffer, offset, bytemuck::bytes_of(value))
    }

    /// Layout slot kind matching this buffer.
    pub fn slot_kind(&self) -> SlotKind {
        SlotKind::DynamicUniform {
            stride: self.stride,
            min_size: Self::block_size(),
        }
    }

    /// Binding of the first slot's window; dynamic offsets move it.
    pub fn binding(&self) -> Binding<'_> {
        Binding::Buffer {
            buffer: &self.buffer,
            offset: 0,
            size: Some(Self::block_size()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_rounds_up_to_alignment() {
        assert_eq!(slot_stride(64, 256), 256);
        assert_eq!(slot_stride(256, 256), 256);
        assert_eq!(slot_stride(257, 256), 512);
        assert_eq!(slot_stride(64, 64), 64);
        assert_eq!(slot_stride(80, 32), 96);
    }

    #[test]
    fn degenerate_inputs_still_give_a_positive_stride() {
        assert_eq!(slot_stride(0, 256), 256);
        assert_eq!(slot_stride(12, 0), 12);
    }
}
