use std::sync::mpsc;

use crate::error::{ConfigError, EngineError};
use crate::resource::Texture;

use super::{DeviceContext, GpuError};

/// Copies `size` bytes starting at `offset` out of `source` and returns them.
///
/// `source` needs `COPY_SRC` usage. The copy goes through a map-read staging
/// buffer; the wait for the mapping is bounded by the context's request
/// timeout.
pub fn read_buffer(
    ctx: &DeviceContext,
    source: &wgpu::Buffer,
    offset: u64,
    size: u64,
) -> Result<Vec<u8>, EngineError> {
    check_copy_range(offset, size, source.size())?;

    let device = ctx.device();
    let staging = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("tarmac readback staging"),
        size,
        usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("tarmac readback encoder"),
    });
    encoder.copy_buffer_to_buffer(source, offset, &staging, 0, size);
    ctx.queue().submit(std::iter::once(encoder.finish()));

    map_staging(ctx, &staging)
}

/// Reads mip `level` of `texture` back as tightly packed rows.
///
/// `texture` needs `COPY_SRC` usage. Rows are copied with the 256-byte
/// alignment the copy requires, then the padding is stripped.
pub fn read_texture(ctx: &DeviceContext, texture: &Texture, level: u32) -> Result<Vec<u8>, EngineError> {
    let (width, height) = texture.level_size(level).ok_or(ConfigError::MipLevel {
        level,
        count: texture.mip_level_count(),
    })?;
    let format = texture.format();
    let texel = format
        .block_copy_size(None)
        .ok_or(ConfigError::UnsizedFormat { format })?;

    let row = width * texel;
    let padded_row = padded_bytes_per_row(row);

    let device = ctx.device();
    let staging = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("tarmac texture readback staging"),
        size: u64::from(padded_row) * u64::from(height),
        usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("tarmac texture readback encoder"),
    });
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture: texture.raw(),
            mip_level: level,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &staging,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(padded_row),
                rows_per_image: Some(height),
            },
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
    ctx.queue().submit(std::iter::once(encoder.finish()));

    let padded = map_staging(ctx, &staging)?;
    Ok(padded
        .chunks_exact(padded_row as usize)
        .flat_map(|r| &r[..row as usize])
        .copied()
        .collect())
}

fn padded_bytes_per_row(row: u32) -> u32 {
    row.div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT) * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT
}

/// Maps a submitted staging buffer and copies its contents out.
fn map_staging(ctx: &DeviceContext, staging: &wgpu::Buffer) -> Result<Vec<u8>, EngineError> {
    let timeout = ctx.request_timeout();
    let slice = staging.slice(..);
    let (tx, rx) = mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = tx.send(result);
    });

    ctx.device()
        .poll(wgpu::PollType::Wait {
            submission_index: None,
            timeout: Some(timeout),
        })
        .map_err(|e| GpuError::Readback(e.to_string()))?;

    rx.recv_timeout(timeout)
        .map_err(|_| GpuError::Timeout {
            what: "buffer mapping",
            after: timeout,
        })?
        .map_err(|e| GpuError::Readback(e.to_string()))?;

    let bytes = slice.get_mapped_range().to_vec();
    staging.unmap();
    Ok(bytes)
}

fn check_copy_range(offset: u64, size: u64, buffer_size: u64) -> Result<(), ConfigError> {
    if size == 0 {
        return Err(ConfigError::ZeroSizedBuffer);
    }
    for value in [offset, size] {
        if value % wgpu::COPY_BUFFER_ALIGNMENT != 0 {
            return Err(ConfigError::UnalignedBuffer {
                size: value,
                alignment: wgpu::COPY_BUFFER_ALIGNMENT,
            });
        }
    }
    match offset.checked_add(size) {
        Some(end) if end <= buffer_size => Ok(()),
        _ => Err(ConfigError::ByteRange {
            offset,
            len: size,
            buffer_size,
        }),
    }
}
