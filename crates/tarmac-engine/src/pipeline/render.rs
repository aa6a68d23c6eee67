use crate::binding::{Layout, LayoutId};
use crate::error::ConfigError;
use crate::geometry::VertexLayout;

/// Standard alpha-over for color; alpha passes the destination through.
pub fn alpha_over_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::Zero,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

/// A shader module plus the entry point to run.
#[derive(Debug, Clone, Copy)]
pub struct ShaderStage<'a> {
    pub module: &'a wgpu::ShaderModule,
    pub entry_point: &'a str,
}

/// Everything a render pipeline is built from.
///
/// Cull mode and winding are inputs; nothing is fixed per mesh variant.
#[derive(Debug, Clone, Copy)]
pub struct PipelineSpec<'a> {
    pub label: &'a str,
    pub vertex_layout: &'a VertexLayout,
    pub vertex: ShaderStage<'a>,
    pub fragment: ShaderStage<'a>,
    pub topology: wgpu::PrimitiveTopology,
    pub front_face: wgpu::FrontFace,
    pub cull_mode: Option<wgpu::Face>,
    pub blend: Option<wgpu::BlendState>,
    /// `None` is an undefined format and is rejected.
    pub color_format: Option<wgpu::TextureFormat>,
    /// Layouts for groups 0, 1, ... in order.
    pub bind_group_layouts: &'a [&'a Layout],
}

impl PipelineSpec<'_> {
    pub fn validate(&self) -> Result<wgpu::TextureFormat, ConfigError> {
        let format = self.color_format.ok_or(ConfigError::UndefinedColorFormat)?;
        check_color_format(format)?;
        Ok(format)
    }

    pub fn create(&self, device: &wgpu::Device) -> Result<RenderPipeline, ConfigError> {
        let color_format = self.validate()?;

        let layouts: Vec<&wgpu::BindGroupLayout> =
            self.bind_group_layouts.iter().map(|l| l.raw()).collect();

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(self.label),
            bind_group_layouts: &layouts,
            immediate_size: 0,
        });

        let raw = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(self.label),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: self.vertex.module,
                entry_point: Some(self.vertex.entry_point),
                compilation_options: Default::default(),
                buffers: &[self.vertex_layout.buffer_layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: self.fragment.module,
                entry_point: Some(self.fragment.entry_point),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: self.blend,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: self.topology,
                strip_index_format: None,
                front_face: self.front_face,
                cull_mode: self.cull_mode,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("created pipeline `{}` for {:?}", self.label, color_format);

        Ok(RenderPipeline {
            raw,
            color_format,
            layout_ids: self.bind_group_layouts.iter().map(|l| l.id()).collect(),
        })
    }
}

fn check_color_format(format: wgpu::TextureFormat) -> Result<(), ConfigError> {
    if format.is_depth_stencil_format() {
        return Err(ConfigError::NonColorFormat { format });
    }
    Ok(())
}

/// An immutable render pipeline; changing any input means building a new one.
#[derive(Debug)]
pub struct RenderPipeline {
    raw: wgpu::RenderPipeline,
    color_format: wgpu::TextureFormat,
    layout_ids: Vec<LayoutId>,
}

impl RenderPipeline {
    pub fn raw(&self) -> &wgpu::RenderPipeline {
        &self.raw
    }

    pub fn color_format(&self) -> wgpu::TextureFormat {
        self.color_format
    }

    /// Identity of the layout expected at each bind group index.
    pub fn layout_ids(&self) -> &[LayoutId] {
        &self.layout_ids
    }
}
