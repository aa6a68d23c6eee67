use std::path::PathBuf;

use crate::geometry::VertexKind;
use crate::pipeline::ShaderBlob;
use crate::resource::RgbaImage;

/// Where the drawn geometry comes from.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum GeometrySource {
    /// The two built-in textured quads: ground and billboard.
    #[default]
    Quads,
    /// A Wavefront OBJ file, drawn once per object slot.
    Model(PathBuf),
}

impl GeometrySource {
    pub fn vertex_kind(&self) -> VertexKind {
        match self {
            GeometrySource::Quads => VertexKind::Quad,
            GeometrySource::Model(_) => VertexKind::Model,
        }
    }
}

/// Feature switches for one scene build.
#[derive(Debug, Clone, PartialEq)]
pub struct Capabilities {
    pub geometry: GeometrySource,
    /// When off every drawable samples a 1x1 white texture.
    pub textured: bool,
    /// Generate full mip chains with the compute downsampler.
    pub mipmaps: bool,
    /// One uniform slot per object selected with a dynamic offset. When off a
    /// single object block is bound statically.
    pub per_object_uniforms: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            geometry: GeometrySource::Quads,
            textured: true,
            mipmaps: true,
            per_object_uniforms: true,
        }
    }
}

/// Image for one drawable's texture.
#[derive(Debug, Clone, PartialEq)]
pub enum TextureSource {
    File(PathBuf),
    Image(RgbaImage),
}

impl TextureSource {
    pub(crate) fn resolve(&self) -> Result<RgbaImage, crate::AssetError> {
        match self {
            TextureSource::File(path) => RgbaImage::load(path),
            TextureSource::Image(image) => Ok(image.clone()),
        }
    }
}

/// A shader blob plus the entry point to run in it.
#[derive(Debug, Clone)]
pub struct ShaderSource {
    pub blob: ShaderBlob,
    pub entry_point: String,
}

impl ShaderSource {
    pub fn new(blob: ShaderBlob, entry_point: impl Into<String>) -> Self {
        Self {
            blob,
            entry_point: entry_point.into(),
        }
    }
}

/// Optional replacements for the built-in WGSL stages.
#[derive(Debug, Clone, Default)]
pub struct ShaderSet {
    pub vertex: Option<ShaderSource>,
    pub fragment: Option<ShaderSource>,
    /// Mip downsampler; must match the built-in shader's bindings.
    pub compute: Option<ShaderSource>,
}

/// Everything a scene build needs besides the device.
#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub capabilities: Capabilities,
    /// One texture per drawable. Missing entries fall back to generated
    /// checkerboards.
    pub textures: Vec<TextureSource>,
    /// World positions of the model instances. Ignored for quads.
    pub model_positions: Vec<[f32; 3]>,
    pub anisotropy: u16,
    pub cull_mode: Option<wgpu::Face>,
    pub front_face: wgpu::FrontFace,
    pub clear_color: wgpu::Color,
    pub shaders: ShaderSet,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            capabilities: Capabilities::default(),
            textures: Vec::new(),
            model_positions: vec![[-3.0, 0.0, -20.0], [3.0, 0.0, -20.0]],
            anisotropy: 1,
            // Quad corners are listed clockwise as seen from the camera.
            cull_mode: Some(wgpu::Face::Front),
            front_face: wgpu::FrontFace::Ccw,
            clear_color: wgpu::Color {
                r: 0.5,
                g: 0.5,
                b: 0.5,
                a: 1.0,
            },
            shaders: ShaderSet::default(),
        }
    }
}
