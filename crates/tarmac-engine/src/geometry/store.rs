use crate::error::ConfigError;
use crate::resource::BufferSpec;

use super::{Mesh, VertexKind};

/// Index of a mesh in a `GeometryStore`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub usize);

/// A mesh living in GPU vertex/index buffers.
#[derive(Debug)]
pub struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    vertex_count: u32,
    index_count: u32,
    kind: VertexKind,
}

impl GpuMesh {
    pub fn vertex_buffer(&self) -> &wgpu::Buffer {
        &self.vertex_buffer
    }

    pub fn index_buffer(&self) -> &wgpu::Buffer {
        &self.index_buffer
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Indices drawn for this mesh; never a global constant.
    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn kind(&self) -> VertexKind {
        self.kind
    }

    pub fn index_format(&self) -> wgpu::IndexFormat {
        wgpu::IndexFormat::Uint32
    }
}

/// Owns every uploaded mesh.
#[derive(Debug, Default)]
pub struct GeometryStore {
    meshes: Vec<GpuMesh>,
}

impl GeometryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploads `mesh` and drops the CPU copy.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        mesh: Mesh,
        label: &str,
    ) -> Result<MeshHandle, ConfigError> {
        mesh.validate()?;
        let too_many = || ConfigError::IndexOutOfRange {
            index: u32::MAX,
            vertex_count: mesh.vertex_count(),
        };
        let vertex_count = u32::try_from(mesh.vertex_count()).map_err(|_| too_many())?;
        let index_count = u32::try_from(mesh.index_count()).map_err(|_| too_many())?;

        let vertex_label = format!("{label} vbo");
        let vertex_buffer = BufferSpec::with_contents(
            &vertex_label,
            wgpu::BufferUsages::VERTEX,
            bytemuck::cast_slice(mesh.vertices()),
        )
        .create(device)?;

        let index_label = format!("{label} ibo");
        let index_buffer = BufferSpec::with_contents(
            &index_label,
            wgpu::BufferUsages::INDEX,
            bytemuck::cast_slice(mesh.indices()),
        )
        .create(device)?;

        log::debug!("uploaded {label}: {vertex_count} vertices, {index_count} indices");

        let handle = MeshHandle(self.meshes.len());
        self.meshes.push(GpuMesh {
            vertex_buffer,
            index_buffer,
            vertex_count,
            index_count,
            kind: mesh.kind(),
        });
        Ok(handle)
    }

    pub fn get(&self, handle: MeshHandle) -> Option<&GpuMesh> {
        self.meshes.get(handle.0)
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}
