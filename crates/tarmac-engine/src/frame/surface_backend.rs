use crate::binding::{BindGroupShape, LayoutId};
use crate::device::{Acquired, Gpu, GpuFrame};
use crate::error::EngineError;
use crate::geometry::MeshHandle;
use crate::overlay::Overlay;
use crate::pipeline::RenderPipeline;

use super::encode::encode_and_submit;
use super::{BindGroupHandle, DrawResources, DrawTable, FrameBackend, PassDesc};

/// Renders into the window surface and presents.
pub struct SurfaceBackend<'a, 'w> {
    gpu: &'a mut Gpu<'w>,
    pipeline: &'a RenderPipeline,
    table: &'a DrawTable,
}

impl<'a, 'w> SurfaceBackend<'a, 'w> {
    pub fn new(gpu: &'a mut Gpu<'w>, pipeline: &'a RenderPipeline, table: &'a DrawTable) -> Self {
        Self {
            gpu,
            pipeline,
            table,
        }
    }
}

impl DrawResources for SurfaceBackend<'_, '_> {
    fn index_count(&self, mesh: MeshHandle) -> Option<u32> {
        self.table.index_count(mesh)
    }

    fn bind_group_shape(&self, group: BindGroupHandle) -> Option<&BindGroupShape> {
        self.table.bind_group_shape(group)
    }
}

impl FrameBackend for SurfaceBackend<'_, '_> {
    type Frame = GpuFrame;

    fn pipeline_layouts(&self) -> &[LayoutId] {
        self.pipeline.layout_ids()
    }

    fn acquire(&mut self) -> Result<Acquired<GpuFrame>, EngineError> {
        Ok(self.gpu.acquire_frame()?)
    }

    fn encode_and_submit(
        &mut self,
        frame: GpuFrame,
        pass: &PassDesc<'_>,
        overlay: &dyn Overlay,
    ) -> Result<usize, EngineError> {
        let draws = encode_and_submit(
            self.gpu.device(),
            self.gpu.queue(),
            &frame.view,
            self.pipeline,
            self.table,
            pass,
            overlay,
        )?;
        frame.present();
        Ok(draws)
    }
}
