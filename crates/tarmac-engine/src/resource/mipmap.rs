//! Compute-shader mip chain generation.
//!
//! Level L+1 is produced from level L, one level per submission, so every
//! level reads a source that is already complete. The bind group layout,
//! pipeline and dimension uniform are built once and reused for every level
//! of every texture.

use bytemuck::{Pod, Zeroable};

use crate::binding::{
    create_bind_group, Binding, BindGroupLayoutSpec, BindingEntry, Layout, LayoutSlot, SlotKind,
};
use crate::error::ConfigError;
use crate::resource::{BufferSpec, Texture};

const MIP_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Dimensions of the level being downsampled.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Pod, Zeroable)]
pub struct SourceDims {
    pub width: u32,
    pub height: u32,
    pub _pad: [u32; 2], // 16-byte uniform block
}

/// One downsample dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MipStep {
    pub source_level: u32,
    pub target_level: u32,
    pub source_size: (u32, u32),
    /// Workgroup counts: one invocation per destination texel.
    pub dispatch: (u32, u32, u32),
}

/// Dispatches needed to fill levels `1..mip_count` from level 0.
///
/// Level sizes are `dim >> level`, floored at 1 so non-square textures keep a
/// one-texel edge once their short side runs out.
pub fn plan(width: u32, height: u32, mip_count: u32) -> Vec<MipStep> {
    (0..mip_count.saturating_sub(1))
        .map(|level| MipStep {
            source_level: level,
            target_level: level + 1,
            source_size: ((width >> level).max(1), (height >> level).max(1)),
            dispatch: (
                (width >> (level + 1)).max(1),
                (height >> (level + 1)).max(1),
                1,
            ),
        })
        .collect()
}

/// Reusable mip chain generator.
#[derive(Debug)]
pub struct MipGenerator {
    pipeline: wgpu::ComputePipeline,
    layout: Layout,
    dims: wgpu::Buffer,
}

impl MipGenerator {
    pub const ENTRY_POINT: &'static str = "cs_main";

    /// Generator running the built-in WGSL downsample shader.
    pub fn new(device: &wgpu::Device) -> Result<Self, ConfigError> {
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("tarmac mipmap shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mipmap.wgsl").into()),
        });
        Self::with_shader(device, &module, Self::ENTRY_POINT)
    }

    /// Generator running a caller-supplied compute shader.
    ///
    /// The shader must declare the four bindings of the built-in one:
    /// sampler, source texture, rgba8unorm storage target, dimension uniform.
    pub fn with_shader(
        device: &wgpu::Device,
        module: &wgpu::ShaderModule,
        entry_point: &str,
    ) -> Result<Self, ConfigError> {
        let cs = wgpu::ShaderStages::COMPUTE;
        let layout = BindGroupLayoutSpec::new(
            "tarmac mipmap bgl",
            vec![
                LayoutSlot::new(0, cs, SlotKind::Sampler),
                LayoutSlot::new(1, cs, SlotKind::SampledTexture),
                LayoutSlot::new(2, cs, SlotKind::StorageTexture { format: MIP_FORMAT }),
                LayoutSlot::new(
                    3,
                    cs,
                    SlotKind::Uniform {
                        min_size: std::mem::size_of::<SourceDims>() as u64,
                    },
                ),
            ],
        )
        .create(device)?;

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("tarmac mipmap pipeline layout"),
            bind_group_layouts: &[layout.raw()],
            immediate_size: 0,
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("tarmac mipmap pipeline"),
            layout: Some(&pipeline_layout),
            module,
            entry_point: Some(entry_point),
            compilation_options: Default::default(),
            cache: None,
        });

        let dims = BufferSpec::new(
            "tarmac mipmap dims",
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            std::mem::size_of::<SourceDims>() as u64,
        )
        .create(device)?;

        Ok(Self {
            pipeline,
            layout,
            dims,
        })
    }

    /// Fills every level below 0 of `texture` and returns the dispatch count.
    ///
    /// `texture` must be Rgba8Unorm with `TEXTURE_BINDING | STORAGE_BINDING`
    /// usage and its level 0 already uploaded.
    pub fn generate(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        texture: &Texture,
        sampler: &wgpu::Sampler,
    ) -> Result<usize, ConfigError> {
        let needed = wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::STORAGE_BINDING;
        if texture.format() != MIP_FORMAT || !texture.usage().contains(needed) {
            return Err(ConfigError::MipTarget);
        }

        let steps = plan(texture.width(), texture.height(), texture.mip_level_count());
        for step in &steps {
            // Views live for this iteration only.
            let source = texture.mip_view(step.source_level, "tarmac mipmap source")?;
            let target = texture.mip_view(step.target_level, "tarmac mipmap target")?;

            let dims = SourceDims {
                width: step.source_size.0,
                height: step.source_size.1,
                _pad: [0; 2],
            };
            queue.write_buffer(&self.dims, 0, bytemuck::bytes_of(&dims));

            let group = create_bind_group(
                device,
                &self.layout,
                "tarmac mipmap bind group",
                &[
                    BindingEntry::new(0, Binding::Sampler(sampler)),
                    BindingEntry::new(1, Binding::Texture(&source)),
                    BindingEntry::new(2, Binding::StorageTexture(&target)),
                    BindingEntry::new(3, Binding::buffer(&self.dims)),
                ],
            )?;

            let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("tarmac mipmap encoder"),
            });
            {
                let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                    label: Some("tarmac mipmap pass"),
                    timestamp_writes: None,
                });
                pass.set_pipeline(&self.pipeline);
                pass.set_bind_group(0, group.raw(), &[]);
                let (x, y, z) = step.dispatch;
                pass.dispatch_workgroups(x, y, z);
            }
            queue.submit(std::iter::once(encoder.finish()));
        }

        log::debug!(
            "generated {} mip levels for {}x{} texture",
            steps.len(),
            texture.width(),
            texture.height()
        );
        Ok(steps.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_has_one_step_per_level_below_base() {
        assert!(plan(1, 1, 1).is_empty());
        assert_eq!(plan(256, 256, 9).len(), 8);
        assert_eq!(plan(64, 64, 3).len(), 2);
        assert!(plan(64, 64, 0).is_empty());
    }

    #[test]
    fn steps_read_level_l_and_write_level_l_plus_one() {
        for (i, step) in plan(128, 128, 8).iter().enumerate() {
            let level = i as u32;
            assert_eq!(step.source_level, level);
            assert_eq!(step.target_level, level + 1);
            assert_eq!(step.source_size, (128 >> level, 128 >> level));
            assert_eq!(step.dispatch, (128 >> (level + 1), 128 >> (level + 1), 1));
        }
    }

    #[test]
    fn non_square_chain_keeps_one_texel_edge() {
        let steps = plan(8, 2, 4);
        assert_eq!(steps[0].dispatch, (4, 1, 1));
        assert_eq!(steps[1].source_size, (4, 1));
        assert_eq!(steps[1].dispatch, (2, 1, 1));
        assert_eq!(steps[2].dispatch, (1, 1, 1));
    }

    #[test]
    fn source_dims_is_a_16_byte_block() {
        assert_eq!(std::mem::size_of::<SourceDims>(), 16);
    }
}
