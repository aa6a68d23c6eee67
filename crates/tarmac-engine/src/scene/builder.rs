use glam::{Mat4, Vec3};

use crate::binding::{
    create_bind_group, BindGroupLayoutSpec, Binding, BindingEntry, BoundGroup, Layout, LayoutSlot,
    SlotKind, UniformSlots,
};
use crate::device::DeviceContext;
use crate::frame::{BindGroupHandle, DrawCall, DrawTable};
use crate::geometry::{obj, VertexKind};
use crate::pipeline::{alpha_over_blend, PipelineSpec, RenderPipeline, ShaderStage};
use crate::resource::{write_buffer, BufferSpec, MipGenerator, MipLevels, RgbaImage, SamplerSpec, Texture};
use crate::{ConfigError, EngineError};

use super::camera::{Camera, FrameUniforms, ObjectUniforms};
use super::capabilities::{GeometrySource, SceneConfig, ShaderSource};
use super::quads;

// ── planning ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PlannedDraw {
    pub mesh: usize,
    pub group: usize,
    /// Object slot selected by dynamic offset; `None` for a static block.
    pub slot: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ScenePlan {
    pub textures: usize,
    pub transforms: Vec<Mat4>,
    pub draws: Vec<PlannedDraw>,
}

pub(crate) fn plan(config: &SceneConfig) -> ScenePlan {
    let per_object = config.capabilities.per_object_uniforms;
    match config.capabilities.geometry {
        GeometrySource::Quads => {
            let slot = |i: u32| per_object.then_some(i);
            ScenePlan {
                textures: 2,
                transforms: vec![Mat4::IDENTITY; if per_object { 2 } else { 1 }],
                draws: (0..2)
                    .map(|i| PlannedDraw {
                        mesh: i,
                        group: i,
                        slot: slot(i as u32),
                    })
                    .collect(),
            }
        }
        GeometrySource::Model(_) => {
            let mut transforms: Vec<Mat4> = config
                .model_positions
                .iter()
                .map(|p| Mat4::from_translation(Vec3::from_array(*p)))
                .collect();
            if transforms.is_empty() {
                transforms.push(Mat4::IDENTITY);
            }
            if !per_object {
                transforms.truncate(1);
            }
            let draws = (0..transforms.len() as u32)
                .map(|slot| PlannedDraw {
                    mesh: 0,
                    group: 0,
                    slot: per_object.then_some(slot),
                })
                .collect();
            ScenePlan {
                textures: 1,
                transforms,
                draws,
            }
        }
    }
}

// ── scene ─────────────────────────────────────────────────────────────────

/// Builds a [`Scene`] from a [`SceneConfig`].
pub struct SceneBuilder {
    config: SceneConfig,
}

/// GPU state for one configured scene.
///
/// Field order is drop order: bind groups go before the layout and the
/// views, samplers and buffers they reference; views before their textures.
pub struct Scene {
    draws: Vec<DrawCall>,
    groups: Vec<BindGroupHandle>,
    table: DrawTable,
    pipeline: RenderPipeline,
    layout: Layout,
    views: Vec<wgpu::TextureView>,
    textures: Vec<Texture>,
    sampler: wgpu::Sampler,
    sampler_spec: SamplerSpec,
    frame_uniforms: wgpu::Buffer,
    objects: UniformSlots<ObjectUniforms>,
    clear_color: wgpu::Color,
}

impl SceneBuilder {
    pub fn new(config: SceneConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Loads assets and creates every GPU object the scene draws with.
    ///
    /// `color_format` is the target the pipeline renders into, normally the
    /// negotiated surface format.
    pub fn build(
        self,
        ctx: &DeviceContext,
        color_format: wgpu::TextureFormat,
    ) -> Result<Scene, EngineError> {
        let device = ctx.device();
        let queue = ctx.queue();
        let config = self.config;
        let caps = &config.capabilities;
        let plan = plan(&config);

        log::info!(
            "building scene: geometry={:?} textured={} mipmaps={} per_object_uniforms={}",
            caps.geometry,
            caps.textured,
            caps.mipmaps,
            caps.per_object_uniforms
        );

        // ── sampler + textures ──
        let sampler_spec = SamplerSpec::default().with_anisotropy(config.anisotropy);
        let sampler = sampler_spec.create(device, "tarmac scene sampler")?;

        let images = load_images(&config, plan.textures)?;
        let generator = if caps.mipmaps && caps.textured {
            Some(mip_generator(device, config.shaders.compute.as_ref())?)
        } else {
            None
        };
        let mip_sampler = SamplerSpec::clamped_linear().create(device, "tarmac mip sampler")?;

        let mut textures = Vec::with_capacity(images.len());
        for (i, image) in images.iter().enumerate() {
            let label = format!("tarmac scene texture {i}");
            let texture = match &generator {
                Some(generator) => {
                    let texture = image.create_texture(
                        device,
                        queue,
                        &label,
                        MipLevels::Full,
                        wgpu::TextureUsages::STORAGE_BINDING,
                    )?;
                    let dispatches = generator.generate(device, queue, &texture, &mip_sampler)?;
                    log::debug!("{label}: {dispatches} mip levels generated");
                    texture
                }
                None => image.create_texture(
                    device,
                    queue,
                    &label,
                    MipLevels::Single,
                    wgpu::TextureUsages::empty(),
                )?,
            };
            textures.push(texture);
        }
        let views: Vec<wgpu::TextureView> = textures
            .iter()
            .enumerate()
            .map(|(i, t)| t.view_all(&format!("tarmac scene view {i}")))
            .collect();

        // ── uniforms ──
        let frame_uniforms = BufferSpec::new(
            "tarmac frame uniforms",
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            std::mem::size_of::<FrameUniforms>() as u64,
        )
        .create(device)?;

        let object_count = plan.transforms.len() as u32;
        let objects = UniformSlots::<ObjectUniforms>::new(
            device,
            "tarmac object uniforms",
            object_count,
            ctx.uniform_offset_alignment(),
        )?;
        for (slot, transform) in plan.transforms.iter().enumerate() {
            objects.write(queue, slot as u32, &ObjectUniforms::from_transform(*transform))?;
        }

        // ── layout + pipeline ──
        let object_kind = if caps.per_object_uniforms {
            objects.slot_kind()
        } else {
            SlotKind::Uniform {
                min_size: UniformSlots::<ObjectUniforms>::block_size(),
            }
        };
        let layout = scene_layout(object_kind).create(device)?;

        let kind = caps.geometry.vertex_kind();
        let vertex_layout = kind.layout();
        let builtin = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("tarmac scene shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
        });
        let custom_vs = compile(device, config.shaders.vertex.as_ref());
        let custom_fs = compile(device, config.shaders.fragment.as_ref());
        let builtin_vs = match kind {
            VertexKind::Quad => "vs_quad",
            VertexKind::Model => "vs_model",
        };

        let pipeline = PipelineSpec {
            label: "tarmac scene pipeline",
            vertex_layout: &vertex_layout,
            vertex: stage(custom_vs.as_ref(), &builtin, builtin_vs),
            fragment: stage(custom_fs.as_ref(), &builtin, "fs_main"),
            topology: wgpu::PrimitiveTopology::TriangleList,
            front_face: config.front_face,
            cull_mode: config.cull_mode,
            blend: Some(alpha_over_blend()),
            color_format: Some(color_format),
            bind_group_layouts: &[&layout],
        }
        .create(device)?;

        // ── geometry + bind groups ──
        let meshes = match &caps.geometry {
            GeometrySource::Quads => quads::meshes(),
            GeometrySource::Model(path) => vec![obj::load(path)?],
        };
        let mut table = DrawTable::new();
        let mut mesh_handles = Vec::with_capacity(meshes.len());
        for (i, mesh) in meshes.into_iter().enumerate() {
            mesh_handles.push(table.upload_mesh(device, mesh, &format!("tarmac mesh {i}"))?);
        }

        let groups: Vec<BindGroupHandle> =
            bind_views(device, &layout, &frame_uniforms, &sampler, &views, &objects)?
                .into_iter()
                .map(|g| table.add_bind_group(g))
                .collect();

        let mut draws = Vec::with_capacity(plan.draws.len());
        for planned in &plan.draws {
            let offsets = match planned.slot {
                Some(slot) => vec![objects.offset(slot).ok_or(ConfigError::ByteRange {
                    offset: u64::from(slot) * objects.stride(),
                    len: UniformSlots::<ObjectUniforms>::block_size(),
                    buffer_size: objects.buffer().size(),
                })?],
                None => Vec::new(),
            };
            draws.push(
                DrawCall::new(mesh_handles[planned.mesh], groups[planned.group])
                    .with_offsets(offsets),
            );
        }

        log::info!(
            "scene ready: {} draws, {} textures, object stride {} bytes",
            draws.len(),
            textures.len(),
            objects.stride()
        );

        Ok(Scene {
            draws,
            groups,
            table,
            pipeline,
            layout,
            views,
            textures,
            sampler,
            sampler_spec,
            frame_uniforms,
            objects,
            clear_color: config.clear_color,
        })
    }
}

impl Scene {
    pub fn pipeline(&self) -> &RenderPipeline {
        &self.pipeline
    }

    pub fn table(&self) -> &DrawTable {
        &self.table
    }

    pub fn draws(&self) -> &[DrawCall] {
        &self.draws
    }

    pub fn clear_color(&self) -> wgpu::Color {
        self.clear_color
    }

    pub fn textures(&self) -> &[Texture] {
        &self.textures
    }

    pub fn anisotropy(&self) -> u16 {
        self.sampler_spec.anisotropy_clamp
    }

    pub fn frame_uniforms(&self) -> &wgpu::Buffer {
        &self.frame_uniforms
    }

    pub fn objects(&self) -> &UniformSlots<ObjectUniforms> {
        &self.objects
    }

    /// Writes this frame's camera and time.
    pub fn update(&self, queue: &wgpu::Queue, camera: &Camera, time: f32) -> Result<(), ConfigError> {
        write_buffer(queue, &self.frame_uniforms, 0, bytemuck::bytes_of(&camera.uniforms(time)))
    }

    pub fn set_object_transform(
        &self,
        queue: &wgpu::Queue,
        slot: u32,
        model: Mat4,
    ) -> Result<(), ConfigError> {
        self.objects.write(queue, slot, &ObjectUniforms::from_transform(model))
    }

    /// Replaces the sampler with one using `clamp` and rebuilds every bind
    /// group that referenced the old one. Returns whether anything changed.
    pub fn set_anisotropy(&mut self, device: &wgpu::Device, clamp: u16) -> Result<bool, ConfigError> {
        if clamp == self.sampler_spec.anisotropy_clamp {
            return Ok(false);
        }
        let spec = self.sampler_spec.with_anisotropy(clamp);
        let sampler = spec.create(device, "tarmac scene sampler")?;

        let rebuilt = bind_views(
            device,
            &self.layout,
            &self.frame_uniforms,
            &sampler,
            &self.views,
            &self.objects,
        )?;
        for (handle, group) in self.groups.iter().zip(rebuilt) {
            self.table.replace_bind_group(*handle, group)?;
        }
        self.sampler = sampler;
        self.sampler_spec = spec;

        log::info!("anisotropy clamp set to {clamp}, {} bind groups rebuilt", self.groups.len());
        Ok(true)
    }
}

// ── helpers ───────────────────────────────────────────────────────────────

fn scene_layout(object_kind: SlotKind) -> BindGroupLayoutSpec<'static> {
    use wgpu::ShaderStages as S;
    BindGroupLayoutSpec::new(
        "tarmac scene bgl",
        vec![
            LayoutSlot::new(
                0,
                S::VERTEX_FRAGMENT,
                SlotKind::Uniform {
                    min_size: std::mem::size_of::<FrameUniforms>() as u64,
                },
            ),
            LayoutSlot::new(1, S::FRAGMENT, SlotKind::Sampler),
            LayoutSlot::new(2, S::FRAGMENT, SlotKind::SampledTexture),
            LayoutSlot::new(3, S::VERTEX, object_kind),
        ],
    )
}

fn bind_views(
    device: &wgpu::Device,
    layout: &Layout,
    frame_uniforms: &wgpu::Buffer,
    sampler: &wgpu::Sampler,
    views: &[wgpu::TextureView],
    objects: &UniformSlots<ObjectUniforms>,
) -> Result<Vec<BoundGroup>, ConfigError> {
    views
        .iter()
        .enumerate()
        .map(|(i, view)| {
            create_bind_group(
                device,
                layout,
                &format!("tarmac scene bind group {i}"),
                &[
                    BindingEntry::new(0, Binding::buffer(frame_uniforms)),
                    BindingEntry::new(1, Binding::Sampler(sampler)),
                    BindingEntry::new(2, Binding::Texture(view)),
                    BindingEntry::new(3, objects.binding()),
                ],
            )
        })
        .collect()
}

fn load_images(config: &SceneConfig, count: usize) -> Result<Vec<RgbaImage>, EngineError> {
    if !config.capabilities.textured {
        return Ok(vec![RgbaImage::solid(1, 1, [255, 255, 255, 255]); count]);
    }
    let mut images = Vec::with_capacity(count);
    for i in 0..count {
        match config.textures.get(i) {
            Some(source) => images.push(source.resolve()?),
            None => {
                log::debug!("no texture configured for drawable {i}, using a generated one");
                images.push(quads::fallback_texture(i));
            }
        }
    }
    Ok(images)
}

fn mip_generator(
    device: &wgpu::Device,
    custom: Option<&ShaderSource>,
) -> Result<MipGenerator, ConfigError> {
    match custom {
        Some(source) => {
            let module = source.blob.create_module(device);
            MipGenerator::with_shader(device, &module, &source.entry_point)
        }
        None => MipGenerator::new(device),
    }
}

fn compile<'a>(
    device: &wgpu::Device,
    source: Option<&'a ShaderSource>,
) -> Option<(&'a ShaderSource, wgpu::ShaderModule)> {
    source.map(|s| (s, s.blob.create_module(device)))
}

fn stage<'a>(
    custom: Option<&'a (&'a ShaderSource, wgpu::ShaderModule)>,
    builtin: &'a wgpu::ShaderModule,
    builtin_entry: &'a str,
) -> ShaderStage<'a> {
    match custom {
        Some((source, module)) => ShaderStage {
            module,
            entry_point: &source.entry_point,
        },
        None => ShaderStage {
            module: builtin,
            entry_point: builtin_entry,
        },
    }
}
