//! GPU resource descriptors.
//!
//! Descriptors (`BufferSpec`, `TextureSpec`, `SamplerSpec`) are plain data and
//! validate themselves before anything reaches the device. The mip generator
//! builds on the same descriptors and the binding layer.

mod buffer;
pub mod mipmap;
mod rgba;
mod sampler;
mod texture;

pub use buffer::{write_buffer, BufferSpec};
pub use mipmap::MipGenerator;
pub use rgba::RgbaImage;
pub use sampler::SamplerSpec;
pub use texture::{mip_level_count, MipLevels, Texture, TextureRegion, TextureSpec};
