//! Geometry store.
//!
//! CPU-side meshes (fixed quads or OBJ models) with a fixed interleaved
//! vertex layout, uploaded once into vertex/index buffers. The CPU copy is
//! consumed by the upload.

mod mesh;
pub mod obj;
mod store;
mod vertex;

pub use mesh::Mesh;
pub use store::{GeometryStore, GpuMesh, MeshHandle};
pub use vertex::{ModelVertex, QuadVertex, VertexKind, VertexLayout};
