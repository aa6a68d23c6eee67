use std::collections::HashSet;
use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::ConfigError;

/// Resource kind a layout slot accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    /// Uniform buffer of at least `min_size` bytes.
    Uniform { min_size: u64 },
    /// Uniform buffer addressed with a per-draw offset in multiples of `stride`.
    DynamicUniform { stride: u64, min_size: u64 },
    /// Filtering sampler.
    Sampler,
    /// Filterable float 2D texture.
    SampledTexture,
    /// Write-only 2D storage texture.
    StorageTexture { format: wgpu::TextureFormat },
}

impl SlotKind {
    pub fn name(&self) -> &'static str {
        match self {
            SlotKind::Uniform { .. } => "uniform buffer",
            SlotKind::DynamicUniform { .. } => "dynamic uniform buffer",
            SlotKind::Sampler => "sampler",
            SlotKind::SampledTexture => "sampled texture",
            SlotKind::StorageTexture { .. } => "storage texture",
        }
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, SlotKind::DynamicUniform { .. })
    }

    fn binding_type(&self) -> wgpu::BindingType {
        match *self {
            SlotKind::Uniform { min_size } => wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: NonZeroU64::new(min_size),
            },
            SlotKind::DynamicUniform { min_size, .. } => wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: true,
                min_binding_size: NonZeroU64::new(min_size),
            },
            SlotKind::Sampler => wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            SlotKind::SampledTexture => wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            SlotKind::StorageTexture { format } => wgpu::BindingType::StorageTexture {
                access: wgpu::StorageTextureAccess::WriteOnly,
                format,
                view_dimension: wgpu::TextureViewDimension::D2,
            },
        }
    }
}

/// One binding slot of a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutSlot {
    pub binding: u32,
    pub visibility: wgpu::ShaderStages,
    pub kind: SlotKind,
}

impl LayoutSlot {
    pub fn new(binding: u32, visibility: wgpu::ShaderStages, kind: SlotKind) -> Self {
        Self {
            binding,
            visibility,
            kind,
        }
    }
}

/// Process-unique identity of a created layout.
///
/// wgpu layouts are only compatible with bind groups built against them, so
/// shapes remember which layout they came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayoutId(u64);

impl LayoutId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }

    #[cfg(test)]
    pub(crate) fn for_tests(id: u64) -> Self {
        Self(id)
    }
}

/// Ordered set of binding slots.
#[derive(Debug, Clone)]
pub struct BindGroupLayoutSpec<'a> {
    pub label: &'a str,
    pub slots: Vec<LayoutSlot>,
}

impl<'a> BindGroupLayoutSpec<'a> {
    pub fn new(label: &'a str, slots: Vec<LayoutSlot>) -> Self {
        Self { label, slots }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for slot in &self.slots {
            if !seen.insert(slot.binding) {
                return Err(ConfigError::DuplicateBinding {
                    binding: slot.binding,
                });
            }
            if slot.visibility.is_empty() {
                return Err(ConfigError::NoShaderStages {
                    binding: slot.binding,
                });
            }
            if let SlotKind::DynamicUniform { stride, min_size } = slot.kind {
                if stride == 0 || stride < min_size {
                    return Err(ConfigError::DynamicStride { stride, min_size });
                }
            }
        }
        Ok(())
    }

    pub fn create(&self, device: &wgpu::Device) -> Result<Layout, ConfigError> {
        self.validate()?;

        let entries: Vec<wgpu::BindGroupLayoutEntry> = self
            .slots
            .iter()
            .map(|slot| wgpu::BindGroupLayoutEntry {
                binding: slot.binding,
                visibility: slot.visibility,
                ty: slot.kind.binding_type(),
                count: None,
            })
            .collect();

        let raw = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(self.label),
            entries: &entries,
        });

        Ok(Layout {
            raw,
            slots: self.slots.clone(),
            id: LayoutId::next(),
        })
    }
}

/// A created bind group layout with the slots it declares.
#[derive(Debug)]
pub struct Layout {
    raw: wgpu::BindGroupLayout,
    slots: Vec<LayoutSlot>,
    id: LayoutId,
}

impl Layout {
    pub fn raw(&self) -> &wgpu::BindGroupLayout {
        &self.raw
    }

    pub fn slots(&self) -> &[LayoutSlot] {
        &self.slots
    }

    pub fn id(&self) -> LayoutId {
        self.id
    }

    pub fn dynamic_slot_count(&self) -> usize {
        self.slots.iter().filter(|s| s.kind.is_dynamic()).count()
    }
}
