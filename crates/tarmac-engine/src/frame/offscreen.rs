use crate::binding::{BindGroupShape, LayoutId};
use crate::device::{Acquired, DeviceContext, SkipReason};
use crate::error::EngineError;
use crate::geometry::MeshHandle;
use crate::overlay::Overlay;
use crate::pipeline::RenderPipeline;
use crate::resource::Texture;

use super::encode::encode_and_submit;
use super::{BindGroupHandle, DrawResources, DrawTable, FrameBackend, PassDesc};

/// Renders into a texture instead of a window surface.
///
/// Used for headless rendering. `skip_next` makes the next acquisition report
/// a skip, the way a surface does when its texture is not optimal.
pub struct OffscreenBackend<'a> {
    ctx: &'a DeviceContext,
    target: &'a Texture,
    pipeline: &'a RenderPipeline,
    table: &'a DrawTable,
    pending_skip: Option<SkipReason>,
    submissions: u64,
}

impl<'a> OffscreenBackend<'a> {
    pub fn new(
        ctx: &'a DeviceContext,
        target: &'a Texture,
        pipeline: &'a RenderPipeline,
        table: &'a DrawTable,
    ) -> Self {
        Self {
            ctx,
            target,
            pipeline,
            table,
            pending_skip: None,
            submissions: 0,
        }
    }

    pub fn skip_next(&mut self, reason: SkipReason) {
        self.pending_skip = Some(reason);
    }

    /// Number of passes submitted so far.
    pub fn submissions(&self) -> u64 {
        self.submissions
    }
}

impl DrawResources for OffscreenBackend<'_> {
    fn index_count(&self, mesh: MeshHandle) -> Option<u32> {
        self.table.index_count(mesh)
    }

    fn bind_group_shape(&self, group: BindGroupHandle) -> Option<&BindGroupShape> {
        self.table.bind_group_shape(group)
    }
}

impl FrameBackend for OffscreenBackend<'_> {
    type Frame = wgpu::TextureView;

    fn pipeline_layouts(&self) -> &[LayoutId] {
        self.pipeline.layout_ids()
    }

    fn acquire(&mut self) -> Result<Acquired<wgpu::TextureView>, EngineError> {
        if let Some(reason) = self.pending_skip.take() {
            return Ok(Acquired::Skip(reason));
        }
        Ok(Acquired::Frame(self.target.mip_view(0, "tarmac offscreen view")?))
    }

    fn encode_and_submit(
        &mut self,
        frame: wgpu::TextureView,
        pass: &PassDesc<'_>,
        overlay: &dyn Overlay,
    ) -> Result<usize, EngineError> {
        let draws = encode_and_submit(
            self.ctx.device(),
            self.ctx.queue(),
            &frame,
            self.pipeline,
            self.table,
            pass,
            overlay,
        )?;
        self.submissions += 1;
        Ok(draws)
    }
}
