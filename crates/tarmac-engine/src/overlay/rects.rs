use bytemuck::{Pod, Zeroable};

use crate::binding::{
    create_bind_group, BindGroupLayoutSpec, Binding, BindingEntry, BoundGroup, Layout, LayoutSlot,
    SlotKind,
};
use crate::geometry::VertexLayout;
use crate::pipeline::{alpha_over_blend, PipelineSpec, RenderPipeline, ShaderStage};
use crate::resource::BufferSpec;

use super::OverlayFrame;

/// Axis-aligned rectangle in physical pixels (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ScreenRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl ScreenRect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }

    /// Half-open containment: [min, max).
    #[inline]
    pub fn contains(self, x: f32, y: f32) -> bool {
        x >= self.x && y >= self.y && x < self.x + self.w && y < self.y + self.h
    }
}

// ── gpu types ─────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ViewportUniform {
    size: [f32; 2],
    _pad: [f32; 2], // 16-byte alignment
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct RectVertex {
    position: [f32; 2],
    color: [f32; 4],
}

/// Four corners and six indices per non-empty rect.
fn tessellate(rects: &[(ScreenRect, [f32; 4])]) -> (Vec<RectVertex>, Vec<u32>) {
    let mut vertices = Vec::with_capacity(rects.len() * 4);
    let mut indices = Vec::with_capacity(rects.len() * 6);

    for &(r, color) in rects.iter().filter(|(r, _)| !r.is_empty()) {
        let base = vertices.len() as u32;
        for (x, y) in [(r.x, r.y), (r.x + r.w, r.y), (r.x + r.w, r.y + r.h), (r.x, r.y + r.h)] {
            vertices.push(RectVertex {
                position: [x, y],
                color,
            });
        }
        indices.extend([0, 1, 2, 0, 2, 3].map(|i| base + i));
    }
    (vertices, indices)
}

/// Batched solid-rect renderer drawing inside an existing render pass.
///
/// GPU objects are created lazily on the first frame and the pipeline is
/// rebuilt if the target format changes. Buffers grow to the next power of
/// two when a frame needs more rects than fit.
#[derive(Debug, Default)]
pub struct RectBatch {
    pipeline: Option<RenderPipeline>,
    bind_group: Option<BoundGroup>,
    layout: Option<Layout>,
    viewport_ubo: Option<wgpu::Buffer>,

    vbo: Option<wgpu::Buffer>,
    ibo: Option<wgpu::Buffer>,
    rect_capacity: usize,
    index_count: u32,

    warned: bool,
}

impl RectBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploads `rects` for the next `draw`.
    pub fn prepare(&mut self, frame: &OverlayFrame<'_>, rects: &[(ScreenRect, [f32; 4])]) {
        self.index_count = 0;
        if !self.ensure_pipeline(frame) {
            return;
        }

        let (vertices, indices) = tessellate(rects);
        if indices.is_empty() {
            return;
        }

        self.write_viewport_uniform(frame);
        self.ensure_capacity(frame, vertices.len() / 4);

        let (Some(vbo), Some(ibo)) = (self.vbo.as_ref(), self.ibo.as_ref()) else { return };
        frame.queue.write_buffer(vbo, 0, bytemuck::cast_slice(&vertices));
        frame.queue.write_buffer(ibo, 0, bytemuck::cast_slice(&indices));
        self.index_count = indices.len() as u32;
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.index_count == 0 {
            return;
        }
        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let (Some(vbo), Some(ibo)) = (self.vbo.as_ref(), self.ibo.as_ref()) else { return };

        pass.set_pipeline(pipeline.raw());
        pass.set_bind_group(0, bind_group.raw(), &[]);
        pass.set_vertex_buffer(0, vbo.slice(..));
        pass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }

    fn ensure_pipeline(&mut self, frame: &OverlayFrame<'_>) -> bool {
        if self
            .pipeline
            .as_ref()
            .is_some_and(|p| p.color_format() == frame.format)
        {
            return true;
        }

        match self.build(frame) {
            Ok(()) => true,
            Err(e) => {
                if !self.warned {
                    log::warn!("overlay disabled: {e}");
                    self.warned = true;
                }
                false
            }
        }
    }

    fn build(&mut self, frame: &OverlayFrame<'_>) -> Result<(), crate::error::ConfigError> {
        let device = frame.device;
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("tarmac overlay shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/rect.wgsl").into()),
        });

        let layout = BindGroupLayoutSpec::new(
            "tarmac overlay bgl",
            vec![LayoutSlot::new(
                0,
                wgpu::ShaderStages::VERTEX,
                SlotKind::Uniform {
                    min_size: std::mem::size_of::<ViewportUniform>() as u64,
                },
            )],
        )
        .create(device)?;

        let vertex_layout = VertexLayout::new(
            std::mem::size_of::<RectVertex>() as u64,
            &[wgpu::VertexFormat::Float32x2, wgpu::VertexFormat::Float32x4],
        )?;

        let pipeline = PipelineSpec {
            label: "tarmac overlay pipeline",
            vertex_layout: &vertex_layout,
            vertex: ShaderStage {
                module: &module,
                entry_point: "vs_main",
            },
            fragment: ShaderStage {
                module: &module,
                entry_point: "fs_main",
            },
            topology: wgpu::PrimitiveTopology::TriangleList,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            blend: Some(alpha_over_blend()),
            color_format: Some(frame.format),
            bind_group_layouts: &[&layout],
        }
        .create(device)?;

        let viewport_ubo = BufferSpec::new(
            "tarmac overlay viewport ubo",
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            std::mem::size_of::<ViewportUniform>() as u64,
        )
        .create(device)?;

        let bind_group = create_bind_group(
            device,
            &layout,
            "tarmac overlay bind group",
            &[BindingEntry::new(0, Binding::buffer(&viewport_ubo))],
        )?;

        self.pipeline = Some(pipeline);
        self.bind_group = Some(bind_group);
        self.layout = Some(layout);
        self.viewport_ubo = Some(viewport_ubo);
        Ok(())
    }

    fn write_viewport_uniform(&self, frame: &OverlayFrame<'_>) {
        let Some(ubo) = self.viewport_ubo.as_ref() else { return };
        let u = ViewportUniform {
            size: [frame.viewport.0.max(1) as f32, frame.viewport.1.max(1) as f32],
            _pad: [0.0; 2],
        };
        frame.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
    }

    fn ensure_capacity(&mut self, frame: &OverlayFrame<'_>, rects: usize) {
        if rects <= self.rect_capacity && self.vbo.is_some() && self.ibo.is_some() {
            return;
        }

        let cap = rects.next_power_of_two().max(16);
        self.vbo = Some(frame.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("tarmac overlay vbo"),
            size: (cap * 4 * std::mem::size_of::<RectVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.ibo = Some(frame.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("tarmac overlay ibo"),
            size: (cap * 6 * std::mem::size_of::<u32>()) as u64,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.rect_capacity = cap;
    }
}
