use bytemuck::{Pod, Zeroable};

use crate::error::ConfigError;

// ── vertex types ──────────────────────────────────────────────────────────

/// Position + texcoord, 5 floats (20 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl QuadVertex {
    pub const fn new(position: [f32; 3], uv: [f32; 2]) -> Self {
        Self { position, uv }
    }
}

/// Position + normal + texcoord, 8 floats (32 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Which interleaved layout a mesh uses.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VertexKind {
    Quad,
    Model,
}

impl VertexKind {
    pub fn floats_per_vertex(self) -> usize {
        match self {
            VertexKind::Quad => 5,
            VertexKind::Model => 8,
        }
    }

    pub fn layout(self) -> VertexLayout {
        match self {
            VertexKind::Quad => VertexLayout::packed(&[
                wgpu::VertexFormat::Float32x3,
                wgpu::VertexFormat::Float32x2,
            ]),
            VertexKind::Model => VertexLayout::packed(&[
                wgpu::VertexFormat::Float32x3,
                wgpu::VertexFormat::Float32x3,
                wgpu::VertexFormat::Float32x2,
            ]),
        }
    }
}

// ── layout ────────────────────────────────────────────────────────────────

/// Stride plus tightly packed attributes at shader locations 0, 1, ...
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexLayout {
    stride: u64,
    attributes: Vec<wgpu::VertexAttribute>,
}

impl VertexLayout {
    /// A layout whose attributes must add up to exactly `stride` bytes.
    pub fn new(stride: u64, formats: &[wgpu::VertexFormat]) -> Result<Self, ConfigError> {
        let layout = Self::packed(formats);
        if layout.stride != stride {
            return Err(ConfigError::VertexStride {
                stride,
                attributes: layout.stride,
            });
        }
        Ok(layout)
    }

    fn packed(formats: &[wgpu::VertexFormat]) -> Self {
        let mut offset = 0;
        let attributes = formats
            .iter()
            .zip(0u32..)
            .map(|(&format, shader_location)| {
                let attr = wgpu::VertexAttribute {
                    format,
                    offset,
                    shader_location,
                };
                offset += format.size();
                attr
            })
            .collect();
        Self {
            stride: offset,
            attributes,
        }
    }

    pub fn stride(&self) -> u64 {
        self.stride
    }

    pub fn attributes(&self) -> &[wgpu::VertexAttribute] {
        &self.attributes
    }

    pub fn buffer_layout(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &self.attributes,
        }
    }
}
