//! TOML configuration file.
//!
//! Every key is optional; an empty file yields the defaults. Unknown keys are
//! rejected so typos surface at startup.
//!
//! ```toml
//! [window]
//! width = 1200
//! height = 800
//!
//! [scene]
//! geometry = "model"
//! model = "assets/models/suzanne.obj"
//! mipmaps = true
//!
//! [shaders]
//! vertex = "build/vertex.spv"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use winit::dpi::PhysicalSize;

use crate::device::GpuInit;
use crate::logging::LoggingConfig;
use crate::pipeline::ShaderBlob;
use crate::scene::{Capabilities, GeometrySource, SceneConfig, ShaderSet, ShaderSource, TextureSource};
use crate::window::RuntimeConfig;
use crate::{AssetError, ConfigError, EngineError};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub window: WindowSection,
    pub gpu: GpuSection,
    pub scene: SceneSection,
    pub shaders: ShaderSection,
    pub logging: LoggingSection,
}

// ── sections ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowSection {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
}

impl Default for WindowSection {
    fn default() -> Self {
        Self {
            title: "tarmac".to_string(),
            width: 1200,
            height: 800,
            resizable: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentModeSetting {
    Fifo,
    Mailbox,
    Immediate,
    AutoVsync,
    AutoNoVsync,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerSetting {
    None,
    LowPower,
    HighPerformance,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GpuSection {
    pub prefer_srgb: bool,
    pub present_mode: PresentModeSetting,
    pub power_preference: PowerSetting,
    pub force_fallback_adapter: bool,
    pub frame_latency: u32,
    /// Bound on adapter/device negotiation and buffer read-back.
    pub request_timeout_ms: u64,
}

impl Default for GpuSection {
    fn default() -> Self {
        Self {
            prefer_srgb: false,
            present_mode: PresentModeSetting::Fifo,
            power_preference: PowerSetting::HighPerformance,
            force_fallback_adapter: false,
            frame_latency: 2,
            request_timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometrySetting {
    Quads,
    Model,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CullSetting {
    None,
    Front,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindingSetting {
    Ccw,
    Cw,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneSection {
    pub geometry: GeometrySetting,
    pub model: Option<PathBuf>,
    pub textured: bool,
    pub mipmaps: bool,
    pub per_object_uniforms: bool,
    pub textures: Vec<PathBuf>,
    pub model_positions: Vec<[f32; 3]>,
    pub anisotropy: u16,
    pub cull_mode: CullSetting,
    pub front_face: WindingSetting,
    pub clear_color: [f64; 4],
}

impl Default for SceneSection {
    fn default() -> Self {
        let scene = SceneConfig::default();
        let caps = scene.capabilities;
        let c = scene.clear_color;
        Self {
            geometry: GeometrySetting::Quads,
            model: None,
            textured: caps.textured,
            mipmaps: caps.mipmaps,
            per_object_uniforms: caps.per_object_uniforms,
            textures: Vec::new(),
            model_positions: scene.model_positions,
            anisotropy: scene.anisotropy,
            cull_mode: CullSetting::Front,
            front_face: WindingSetting::Ccw,
            clear_color: [c.r, c.g, c.b, c.a],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShaderSection {
    pub vertex: Option<PathBuf>,
    pub vertex_entry: String,
    pub fragment: Option<PathBuf>,
    pub fragment_entry: String,
    pub compute: Option<PathBuf>,
    pub compute_entry: String,
}

impl Default for ShaderSection {
    fn default() -> Self {
        // Entry point compilers give SPIR-V modules by default.
        Self {
            vertex: None,
            vertex_entry: "main".to_string(),
            fragment: None,
            fragment_entry: "main".to_string(),
            compute: None,
            compute_entry: "main".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorSetting {
    #[default]
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    pub filter: Option<String>,
    pub color: ColorSetting,
}

// ── loading + conversion ──────────────────────────────────────────────────

impl EngineConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| AssetError::io(path, e))?;
        Self::from_toml_str(&text).map_err(|source| AssetError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `path` when given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, AssetError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn runtime(&self) -> RuntimeConfig {
        RuntimeConfig {
            title: self.window.title.clone(),
            initial_size: PhysicalSize::new(self.window.width, self.window.height),
            resizable: self.window.resizable,
        }
    }

    pub fn gpu_init(&self) -> GpuInit {
        let gpu = &self.gpu;
        GpuInit {
            prefer_srgb: gpu.prefer_srgb,
            present_mode: match gpu.present_mode {
                PresentModeSetting::Fifo => wgpu::PresentMode::Fifo,
                PresentModeSetting::Mailbox => wgpu::PresentMode::Mailbox,
                PresentModeSetting::Immediate => wgpu::PresentMode::Immediate,
                PresentModeSetting::AutoVsync => wgpu::PresentMode::AutoVsync,
                PresentModeSetting::AutoNoVsync => wgpu::PresentMode::AutoNoVsync,
            },
            power_preference: match gpu.power_preference {
                PowerSetting::None => wgpu::PowerPreference::None,
                PowerSetting::LowPower => wgpu::PowerPreference::LowPower,
                PowerSetting::HighPerformance => wgpu::PowerPreference::HighPerformance,
            },
            force_fallback_adapter: gpu.force_fallback_adapter,
            desired_maximum_frame_latency: gpu.frame_latency,
            request_timeout: Duration::from_millis(gpu.request_timeout_ms),
            ..GpuInit::default()
        }
    }

    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            env_filter: self.logging.filter.clone(),
            write_style: match self.logging.color {
                ColorSetting::Auto => env_logger::WriteStyle::Auto,
                ColorSetting::Always => env_logger::WriteStyle::Always,
                ColorSetting::Never => env_logger::WriteStyle::Never,
            },
        }
    }

    /// Scene settings, with any configured shader files loaded.
    pub fn scene(&self) -> Result<SceneConfig, EngineError> {
        let s = &self.scene;
        let geometry = match s.geometry {
            GeometrySetting::Quads => GeometrySource::Quads,
            GeometrySetting::Model => {
                GeometrySource::Model(s.model.clone().ok_or(ConfigError::MissingModelPath)?)
            }
        };

        let [r, g, b, a] = s.clear_color;
        Ok(SceneConfig {
            capabilities: Capabilities {
                geometry,
                textured: s.textured,
                mipmaps: s.mipmaps,
                per_object_uniforms: s.per_object_uniforms,
            },
            textures: s.textures.iter().cloned().map(TextureSource::File).collect(),
            model_positions: s.model_positions.clone(),
            anisotropy: s.anisotropy,
            cull_mode: match s.cull_mode {
                CullSetting::None => None,
                CullSetting::Front => Some(wgpu::Face::Front),
                CullSetting::Back => Some(wgpu::Face::Back),
            },
            front_face: match s.front_face {
                WindingSetting::Ccw => wgpu::FrontFace::Ccw,
                WindingSetting::Cw => wgpu::FrontFace::Cw,
            },
            clear_color: wgpu::Color { r, g, b, a },
            shaders: self.shader_set()?,
        })
    }

    fn shader_set(&self) -> Result<ShaderSet, EngineError> {
        let sh = &self.shaders;
        let load = |path: &Option<PathBuf>, entry: &str| -> Result<Option<ShaderSource>, EngineError> {
            match path {
                Some(path) => Ok(Some(ShaderSource::new(ShaderBlob::load(path)?, entry))),
                None => Ok(None),
            }
        };
        Ok(ShaderSet {
            vertex: load(&sh.vertex, &sh.vertex_entry)?,
            fragment: load(&sh.fragment, &sh.fragment_entry)?,
            compute: load(&sh.compute, &sh.compute_entry)?,
        })
    }
}
