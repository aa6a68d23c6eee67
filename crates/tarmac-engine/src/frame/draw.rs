use crate::binding::{check_dynamic_offsets, BindGroupShape, BoundGroup, LayoutId};
use crate::error::ConfigError;
use crate::geometry::{GeometryStore, GpuMesh, Mesh, MeshHandle};

/// Index of a bind group in a `DrawTable`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct BindGroupHandle(pub usize);

/// One indexed draw: a mesh, the bind group for group 0 and its dynamic offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawCall {
    pub mesh: MeshHandle,
    pub bind_group: BindGroupHandle,
    pub dynamic_offsets: Vec<u32>,
}

impl DrawCall {
    pub fn new(mesh: MeshHandle, bind_group: BindGroupHandle) -> Self {
        Self {
            mesh,
            bind_group,
            dynamic_offsets: Vec::new(),
        }
    }

    pub fn with_offsets(mut self, dynamic_offsets: Vec<u32>) -> Self {
        self.dynamic_offsets = dynamic_offsets;
        self
    }
}

/// What draw validation needs to know about meshes and bind groups.
pub trait DrawResources {
    fn index_count(&self, mesh: MeshHandle) -> Option<u32>;
    fn bind_group_shape(&self, group: BindGroupHandle) -> Option<&BindGroupShape>;
}

/// Rejects a draw list that the pipeline could not execute.
///
/// Every handle must resolve, every bind group must come from the layout the
/// pipeline expects at group 0, and dynamic offsets must fit their slots.
pub fn validate_draws<R: DrawResources + ?Sized>(
    resources: &R,
    pipeline_layouts: &[LayoutId],
    draws: &[DrawCall],
) -> Result<(), ConfigError> {
    for draw in draws {
        resources
            .index_count(draw.mesh)
            .ok_or(ConfigError::UnknownMesh { index: draw.mesh.0 })?;

        let shape = resources
            .bind_group_shape(draw.bind_group)
            .ok_or(ConfigError::UnknownBindGroup {
                index: draw.bind_group.0,
            })?;

        if let Some(&expected) = pipeline_layouts.first() {
            if shape.layout_id != expected {
                return Err(ConfigError::LayoutMismatch {
                    expected: expected.get(),
                    actual: shape.layout_id.get(),
                });
            }
        }

        check_dynamic_offsets(shape, &draw.dynamic_offsets)?;
    }
    Ok(())
}

/// Meshes and bind groups a frame draws from.
#[derive(Debug, Default)]
pub struct DrawTable {
    // Bind groups go before the geometry they are drawn with.
    bind_groups: Vec<BoundGroup>,
    geometry: GeometryStore,
}

impl DrawTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upload_mesh(
        &mut self,
        device: &wgpu::Device,
        mesh: Mesh,
        label: &str,
    ) -> Result<MeshHandle, ConfigError> {
        self.geometry.upload(device, mesh, label)
    }

    pub fn add_bind_group(&mut self, group: BoundGroup) -> BindGroupHandle {
        self.bind_groups.push(group);
        BindGroupHandle(self.bind_groups.len() - 1)
    }

    /// Swaps in a rebuilt bind group, dropping the old one.
    pub fn replace_bind_group(
        &mut self,
        handle: BindGroupHandle,
        group: BoundGroup,
    ) -> Result<(), ConfigError> {
        let slot = self
            .bind_groups
            .get_mut(handle.0)
            .ok_or(ConfigError::UnknownBindGroup { index: handle.0 })?;
        *slot = group;
        Ok(())
    }

    pub fn mesh(&self, handle: MeshHandle) -> Option<&GpuMesh> {
        self.geometry.get(handle)
    }

    pub fn bind_group(&self, handle: BindGroupHandle) -> Option<&BoundGroup> {
        self.bind_groups.get(handle.0)
    }

    pub fn geometry(&self) -> &GeometryStore {
        &self.geometry
    }
}

impl DrawResources for DrawTable {
    fn index_count(&self, mesh: MeshHandle) -> Option<u32> {
        self.mesh(mesh).map(GpuMesh::index_count)
    }

    fn bind_group_shape(&self, group: BindGroupHandle) -> Option<&BindGroupShape> {
        self.bind_group(group).map(BoundGroup::shape)
    }
}
