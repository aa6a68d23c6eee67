use crate::error::ConfigError;
use crate::overlay::Overlay;
use crate::pipeline::RenderPipeline;

use super::{DrawTable, PassDesc};

/// Records one clear + draw pass into `target`, composites the overlay and
/// submits. Returns the number of draw calls issued.
pub(crate) fn encode_and_submit(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    target: &wgpu::TextureView,
    pipeline: &RenderPipeline,
    table: &DrawTable,
    pass: &PassDesc<'_>,
    overlay: &dyn Overlay,
) -> Result<usize, ConfigError> {
    // Resolve every handle before recording anything.
    let mut resolved = Vec::with_capacity(pass.draws.len());
    for draw in pass.draws {
        let mesh = table
            .mesh(draw.mesh)
            .ok_or(ConfigError::UnknownMesh { index: draw.mesh.0 })?;
        let group = table
            .bind_group(draw.bind_group)
            .ok_or(ConfigError::UnknownBindGroup {
                index: draw.bind_group.0,
            })?;
        resolved.push((mesh, group, draw.dynamic_offsets.as_slice()));
    }

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("tarmac frame encoder"),
    });

    {
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("tarmac scene pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(pass.clear),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline.raw());
        for &(mesh, group, offsets) in &resolved {
            rpass.set_vertex_buffer(0, mesh.vertex_buffer().slice(..));
            rpass.set_index_buffer(mesh.index_buffer().slice(..), mesh.index_format());
            rpass.set_bind_group(0, group.raw(), offsets);
            rpass.draw_indexed(0..mesh.index_count(), 0, 0..1);
        }

        overlay.draw(&mut rpass);
    }

    queue.submit(std::iter::once(encoder.finish()));
    Ok(resolved.len())
}
