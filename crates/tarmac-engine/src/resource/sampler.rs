use crate::error::ConfigError;

/// Describes an immutable sampler.
///
/// Changing filtering at runtime means building a new sampler and every bind
/// group that references the old one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerSpec {
    pub address_mode_u: wgpu::AddressMode,
    pub address_mode_v: wgpu::AddressMode,
    pub address_mode_w: wgpu::AddressMode,
    pub mag_filter: wgpu::FilterMode,
    pub min_filter: wgpu::FilterMode,
    pub mipmap_filter: wgpu::MipmapFilterMode,
    pub lod_min_clamp: f32,
    pub lod_max_clamp: f32,
    /// Anisotropic sample count, 1..=16. Values above 1 need linear filtering.
    pub anisotropy_clamp: u16,
}

impl Default for SamplerSpec {
    /// Linear, clamped across and repeating along V (long ground textures).
    fn default() -> Self {
        Self {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Linear,
            lod_min_clamp: 0.0,
            lod_max_clamp: 1000.0,
            anisotropy_clamp: 16,
        }
    }
}

impl SamplerSpec {
    pub const MAX_ANISOTROPY: u16 = 16;

    /// Linear filtering, clamp-to-edge on every axis, no anisotropy.
    pub fn clamped_linear() -> Self {
        Self {
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            anisotropy_clamp: 1,
            ..Self::default()
        }
    }

    pub fn with_anisotropy(mut self, anisotropy_clamp: u16) -> Self {
        self.anisotropy_clamp = anisotropy_clamp;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=Self::MAX_ANISOTROPY).contains(&self.anisotropy_clamp) {
            return Err(ConfigError::Anisotropy {
                clamp: self.anisotropy_clamp,
            });
        }
        let all_linear = self.mag_filter == wgpu::FilterMode::Linear
            && self.min_filter == wgpu::FilterMode::Linear
            && self.mipmap_filter == wgpu::MipmapFilterMode::Linear;
        if self.anisotropy_clamp > 1 && !all_linear {
            return Err(ConfigError::AnisotropyRequiresLinear);
        }
        let (min, max) = (self.lod_min_clamp, self.lod_max_clamp);
        if !(min.is_finite() && max.is_finite() && 0.0 <= min && min <= max) {
            return Err(ConfigError::LodRange { min, max });
        }
        Ok(())
    }

    pub fn create(&self, device: &wgpu::Device, label: &str) -> Result<wgpu::Sampler, ConfigError> {
        self.validate()?;
        Ok(device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: self.address_mode_u,
            address_mode_v: self.address_mode_v,
            address_mode_w: self.address_mode_w,
            mag_filter: self.mag_filter,
            min_filter: self.min_filter,
            mipmap_filter: self.mipmap_filter,
            lod_min_clamp: self.lod_min_clamp,
            lod_max_clamp: self.lod_max_clamp,
            compare: None,
            anisotropy_clamp: self.anisotropy_clamp,
            border_color: None,
        }))
    }
}
