use std::borrow::Cow;
use std::path::Path;

use crate::error::{AssetError, ConfigError, EngineError};

const SPIRV_MAGIC: u32 = 0x0723_0203;

/// Shader source handed to pipeline creation as an opaque blob.
#[derive(Debug, Clone, PartialEq)]
pub enum ShaderCode {
    Wgsl(String),
    SpirV(Vec<u32>),
}

/// A labelled shader blob.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderBlob {
    label: String,
    code: ShaderCode,
}

impl ShaderBlob {
    pub fn wgsl(label: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            code: ShaderCode::Wgsl(source.into()),
        }
    }

    /// Validates a SPIR-V binary and keeps it as 32-bit words.
    pub fn spirv(label: impl Into<String>, bytes: &[u8]) -> Result<Self, ConfigError> {
        Ok(Self {
            label: label.into(),
            code: ShaderCode::SpirV(spirv_words(bytes)?),
        })
    }

    /// Loads a blob from disk: `.spv` files are SPIR-V, anything else WGSL.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| AssetError::io(path, e))?;
        let label = path.display().to_string();

        let is_spirv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("spv"));
        if is_spirv {
            return Ok(Self::spirv(label, &bytes)?);
        }

        let source = String::from_utf8(bytes).map_err(|_| AssetError::Utf8 {
            path: path.to_path_buf(),
        })?;
        Ok(Self::wgsl(label, source))
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn code(&self) -> &ShaderCode {
        &self.code
    }

    pub fn create_module(&self, device: &wgpu::Device) -> wgpu::ShaderModule {
        let source = match &self.code {
            ShaderCode::Wgsl(src) => wgpu::ShaderSource::Wgsl(Cow::Borrowed(src.as_str())),
            ShaderCode::SpirV(words) => wgpu::ShaderSource::SpirV(Cow::Borrowed(words.as_slice())),
        };
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&self.label),
            source,
        })
    }
}

/// Reinterprets a SPIR-V binary as words.
///
/// The length must be a non-zero multiple of 4 and the first word the SPIR-V
/// magic number. Big-endian modules are byte-swapped.
pub fn spirv_words(bytes: &[u8]) -> Result<Vec<u32>, ConfigError> {
    if bytes.is_empty() || bytes.len() % 4 != 0 {
        return Err(ConfigError::SpirvSize { len: bytes.len() });
    }

    let mut words: Vec<u32> = bytes
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();

    match words[0] {
        SPIRV_MAGIC => {}
        m if m.swap_bytes() == SPIRV_MAGIC => {
            words.iter_mut().for_each(|w| *w = w.swap_bytes());
        }
        found => return Err(ConfigError::SpirvMagic { found }),
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module_bytes(words: &[u32]) -> Vec<u8> {
        words.iter().flat_map(|w| w.to_le_bytes()).collect()
    }

    #[test]
    fn size_must_be_word_multiple() {
        assert_eq!(spirv_words(&[]), Err(ConfigError::SpirvSize { len: 0 }));
        assert_eq!(spirv_words(&[3, 2, 35, 7, 0]), Err(ConfigError::SpirvSize { len: 5 }));
        assert_eq!(spirv_words(&[3, 2, 35]), Err(ConfigError::SpirvSize { len: 3 }));
    }

    #[test]
    fn magic_is_checked() {
        let bytes = module_bytes(&[SPIRV_MAGIC, 0x0001_0000, 7]);
        assert_eq!(spirv_words(&bytes), Ok(vec![SPIRV_MAGIC, 0x0001_0000, 7]));

        let bytes = module_bytes(&[0xdead_beef]);
        assert_eq!(spirv_words(&bytes), Err(ConfigError::SpirvMagic { found: 0xdead_beef }));
    }

    #[test]
    fn big_endian_modules_are_swapped() {
        let bytes: Vec<u8> = [SPIRV_MAGIC, 9].iter().flat_map(|w| w.to_be_bytes()).collect();
        assert_eq!(spirv_words(&bytes), Ok(vec![SPIRV_MAGIC, 9]));
    }

    #[test]
    fn load_picks_format_from_extension() {
        let dir = tempfile::tempdir().unwrap();

        let wgsl = dir.path().join("flat.wgsl");
        std::fs::write(&wgsl, "@fragment fn fs_main() {}").unwrap();
        let blob = ShaderBlob::load(&wgsl).unwrap();
        assert!(matches!(blob.code(), ShaderCode::Wgsl(s) if s.contains("fs_main")));

        let spv = dir.path().join("flat.spv");
        std::fs::write(&spv, module_bytes(&[SPIRV_MAGIC, 1])).unwrap();
        assert_eq!(
            ShaderBlob::load(&spv).unwrap().code(),
            &ShaderCode::SpirV(vec![SPIRV_MAGIC, 1])
        );

        let bad = dir.path().join("bad.spv");
        std::fs::write(&bad, [1u8, 2, 3, 4, 5, 6]).unwrap();
        assert!(matches!(
            ShaderBlob::load(&bad),
            Err(EngineError::Config(ConfigError::SpirvSize { len: 6 }))
        ));
    }
}
