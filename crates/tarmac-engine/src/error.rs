//! Engine error taxonomy.
//!
//! - `ConfigError`: a descriptor or binding shape rejected before any GPU call.
//! - `AssetError`: files that could not be read or decoded.
//! - `GpuError` (see `device`): adapter/device/surface failures.
//!
//! `EngineError` is the single type handed to callers when an operation can
//! fail in more than one of those ways.

use std::path::PathBuf;

use thiserror::Error;

use crate::device::GpuError;

/// A configuration rejected before any GPU call was issued.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    // ── bind groups ───────────────────────────────────────────────────────
    #[error("bind group supplies {got} bindings but its layout declares {expected}")]
    BindingCount { expected: usize, got: usize },

    #[error("binding {binding} is not declared by the layout")]
    UnknownBinding { binding: u32 },

    #[error("binding {binding} is declared more than once")]
    DuplicateBinding { binding: u32 },

    #[error("binding {binding} expects a {expected} resource but got a {got}")]
    BindingKind {
        binding: u32,
        expected: &'static str,
        got: &'static str,
    },

    #[error("binding {binding} is not visible to any shader stage")]
    NoShaderStages { binding: u32 },

    #[error("binding {binding} covers {size} bytes, below the declared minimum of {min_size}")]
    BindingTooSmall { binding: u32, size: u64, min_size: u64 },

    #[error("binding {binding} range {offset}+{size} exceeds buffer size {buffer_size}")]
    BindingOutOfRange {
        binding: u32,
        offset: u64,
        size: u64,
        buffer_size: u64,
    },

    #[error("dynamic uniform stride {stride} cannot hold a {min_size}-byte block")]
    DynamicStride { stride: u64, min_size: u64 },

    #[error("bind group was built against layout #{actual}, pipeline expects layout #{expected}")]
    LayoutMismatch { expected: u64, actual: u64 },

    // ── dynamic offsets ───────────────────────────────────────────────────
    #[error("draw supplies {got} dynamic offsets but the bind group has {expected} dynamic slots")]
    DynamicOffsetCount { expected: usize, got: usize },

    #[error("dynamic offset {offset} is not a multiple of the slot stride {stride}")]
    MisalignedOffset { offset: u32, stride: u64 },

    #[error("dynamic offset {offset} plus a {size}-byte window exceeds buffer size {buffer_size}")]
    OffsetOutOfRange { offset: u32, size: u64, buffer_size: u64 },

    // ── vertex layout / geometry ──────────────────────────────────────────
    #[error("vertex stride is {stride} bytes but attributes add up to {attributes} bytes")]
    VertexStride { stride: u64, attributes: u64 },

    #[error("mesh has no vertices or no indices")]
    EmptyMesh,

    #[error("mesh vertex data ({floats} floats) is not a whole number of {per_vertex}-float vertices")]
    RaggedVertices { floats: usize, per_vertex: usize },

    #[error("index {index} references vertex beyond count {vertex_count}")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    // ── buffers ───────────────────────────────────────────────────────────
    #[error("buffer size must be non-zero")]
    ZeroSizedBuffer,

    #[error("buffer size {size} is not a multiple of {alignment}")]
    UnalignedBuffer { size: u64, alignment: u64 },

    #[error("initial contents are {actual} bytes but the buffer is {declared} bytes")]
    ContentsSize { declared: u64, actual: u64 },

    #[error("{len} bytes at offset {offset} do not fit a {buffer_size}-byte buffer")]
    ByteRange { offset: u64, len: u64, buffer_size: u64 },

    // ── textures / samplers ───────────────────────────────────────────────
    #[error("texture size {width}x{height} must be non-zero")]
    EmptyTexture { width: u32, height: u32 },

    #[error("{requested} mip levels requested, at most {max} fit")]
    MipLevelCount { requested: u32, max: u32 },

    #[error("mip level {level} does not exist (texture has {count})")]
    MipLevel { level: u32, count: u32 },

    #[error("region {width}x{height} at ({x}, {y}) does not fit a {level_width}x{level_height} mip level")]
    RegionOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        level_width: u32,
        level_height: u32,
    },

    #[error("texel data is {actual} bytes, expected {expected}")]
    TexelDataSize { expected: u64, actual: u64 },

    #[error("texture format {format:?} has no fixed texel size")]
    UnsizedFormat { format: wgpu::TextureFormat },

    #[error("mip generation needs an Rgba8Unorm texture with storage and sampling usage")]
    MipTarget,

    #[error("anisotropy clamp {clamp} outside 1..=16")]
    Anisotropy { clamp: u16 },

    #[error("anisotropic filtering requires linear mag, min and mipmap filters")]
    AnisotropyRequiresLinear,

    #[error("LOD clamp range {min}..{max} is invalid")]
    LodRange { min: f32, max: f32 },

    // ── shaders / pipeline ────────────────────────────────────────────────
    #[error("SPIR-V blob is {len} bytes, not a non-empty multiple of 4")]
    SpirvSize { len: usize },

    #[error("SPIR-V blob starts with {found:#010x}, not the SPIR-V magic number")]
    SpirvMagic { found: u32 },

    #[error("color target format is undefined")]
    UndefinedColorFormat,

    #[error("color target format {format:?} is not a color format")]
    NonColorFormat { format: wgpu::TextureFormat },

    // ── draw resources ────────────────────────────────────────────────────
    #[error("mesh handle {index} does not exist")]
    UnknownMesh { index: usize },

    #[error("bind group handle {index} does not exist")]
    UnknownBindGroup { index: usize },

    // ── scene ─────────────────────────────────────────────────────────────
    #[error("scene geometry \"model\" needs a model path")]
    MissingModelPath,
}

/// A file that could not be read or decoded.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image {path}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("obj parse error at line {line}: {message}")]
    Obj { line: usize, message: String },

    #[error("invalid config file {path}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{path} is not valid UTF-8")]
    Utf8 { path: PathBuf },
}

impl AssetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub(crate) fn obj(line: usize, message: impl Into<String>) -> Self {
        Self::Obj { line, message: message.into() }
    }
}

/// Any engine failure.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error(transparent)]
    Gpu(#[from] GpuError),
}
