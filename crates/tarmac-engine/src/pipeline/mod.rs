//! Shader blobs and render pipeline construction.

mod render;
mod shader;

pub use render::{alpha_over_blend, PipelineSpec, RenderPipeline, ShaderStage};
pub use shader::{spirv_words, ShaderBlob, ShaderCode};
