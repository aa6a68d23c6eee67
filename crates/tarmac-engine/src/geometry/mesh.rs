use crate::error::ConfigError;

use super::{ModelVertex, QuadVertex, VertexKind};

/// Interleaved vertex floats plus a triangle-list index buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    kind: VertexKind,
    vertices: Vec<f32>,
    indices: Vec<u32>,
}

impl Mesh {
    pub fn new(kind: VertexKind, vertices: Vec<f32>, indices: Vec<u32>) -> Result<Self, ConfigError> {
        let mesh = Self {
            kind,
            vertices,
            indices,
        };
        mesh.validate()?;
        Ok(mesh)
    }

    /// Two triangles over four corners, wound 0-1-2, 0-2-3.
    pub fn quad(corners: [QuadVertex; 4]) -> Self {
        Self {
            kind: VertexKind::Quad,
            vertices: bytemuck::cast_slice(&corners).to_vec(),
            indices: vec![0, 1, 2, 0, 2, 3],
        }
    }

    /// One vertex per face corner, indexed by identity.
    pub fn from_corners(corners: &[ModelVertex]) -> Result<Self, ConfigError> {
        let count = u32::try_from(corners.len()).map_err(|_| ConfigError::IndexOutOfRange {
            index: u32::MAX,
            vertex_count: corners.len(),
        })?;
        Self::new(
            VertexKind::Model,
            bytemuck::cast_slice(corners).to_vec(),
            (0..count).collect(),
        )
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.vertices.is_empty() || self.indices.is_empty() {
            return Err(ConfigError::EmptyMesh);
        }
        let per_vertex = self.kind.floats_per_vertex();
        if self.vertices.len() % per_vertex != 0 {
            return Err(ConfigError::RaggedVertices {
                floats: self.vertices.len(),
                per_vertex,
            });
        }
        let vertex_count = self.vertex_count();
        if let Some(&index) = self.indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(ConfigError::IndexOutOfRange {
                index,
                vertex_count,
            });
        }
        Ok(())
    }

    pub fn kind(&self) -> VertexKind {
        self.kind
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / self.kind.floats_per_vertex()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }
}
