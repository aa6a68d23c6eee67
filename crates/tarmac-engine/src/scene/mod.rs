//! Scene assembly.
//!
//! One parameterized builder covers every variant: fixed quads or an OBJ
//! model, textured or not, mip-mapped or not, with per-object uniforms behind
//! dynamic offsets or a single static object block.

mod builder;
mod camera;
mod capabilities;
pub mod quads;

pub use builder::{Scene, SceneBuilder};
pub use camera::{Camera, FrameUniforms, ObjectUniforms};
pub use capabilities::{Capabilities, GeometrySource, SceneConfig, ShaderSet, ShaderSource, TextureSource};
