//! Two draws against one bind group, each selecting its own uniform slot.

mod common;

use glam::{Mat4, Vec3};

use tarmac_engine::binding::{
    create_bind_group, slot_stride, BindGroupLayoutSpec, BindingEntry, LayoutSlot, UniformSlots,
};
use tarmac_engine::device::read_buffer;
use tarmac_engine::frame::{DrawCall, DrawTable, FrameOrchestrator, FrameOutcome, OffscreenBackend};
use tarmac_engine::geometry::{Mesh, QuadVertex, VertexKind};
use tarmac_engine::overlay::NoOverlay;
use tarmac_engine::pipeline::{PipelineSpec, ShaderStage};
use tarmac_engine::resource::{BufferSpec, TextureSpec};
use tarmac_engine::scene::ObjectUniforms;

const SHADER: &str = r#"
struct ObjectUniforms { model: mat4x4<f32> };
@group(0) @binding(0) var<uniform> object_data: ObjectUniforms;

struct VsOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>, @location(1) uv: vec2<f32>) -> VsOut {
    var out: VsOut;
    out.clip = object_data.model * vec4<f32>(position, 1.0);
    // Slot 0 is shifted left and draws red; slot 1 stays put and draws green.
    let shifted = abs(object_data.model[3].x);
    out.color = vec4<f32>(shifted, 1.0 - shifted, 0.0, 1.0);
    return out;
}

@fragment
fn fs_main(v: VsOut) -> @location(0) vec4<f32> {
    return v.color;
}
"#;

/// Right half of clip space.
const HALF_SCREEN: [QuadVertex; 4] = [
    QuadVertex::new([0.0, -1.0, 0.0], [0.0, 0.0]),
    QuadVertex::new([0.0, 1.0, 0.0], [0.0, 1.0]),
    QuadVertex::new([1.0, 1.0, 0.0], [1.0, 1.0]),
    QuadVertex::new([1.0, -1.0, 0.0], [1.0, 0.0]),
];

#[test]
fn each_draw_reads_its_own_slot() {
    let Some(ctx) = common::headless() else { return };
    let device = ctx.device();
    let queue = ctx.queue();
    let format = wgpu::TextureFormat::Rgba8Unorm;

    let objects =
        UniformSlots::<ObjectUniforms>::new(device, "objects", 2, ctx.uniform_offset_alignment())
            .unwrap();
    assert_eq!(objects.stride(), slot_stride(64, ctx.uniform_offset_alignment()));
    assert_eq!(objects.stride() % 256, 0);

    let left = Mat4::from_translation(Vec3::new(-1.0, 0.0, 0.0));
    objects.write(queue, 0, &ObjectUniforms::from_transform(left)).unwrap();
    objects.write(queue, 1, &ObjectUniforms::from_transform(Mat4::IDENTITY)).unwrap();

    let layout = BindGroupLayoutSpec::new(
        "objects bgl",
        vec![LayoutSlot::new(0, wgpu::ShaderStages::VERTEX, objects.slot_kind())],
    )
    .create(device)
    .unwrap();

    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("slot shader"),
        source: wgpu::ShaderSource::Wgsl(SHADER.into()),
    });
    let vertex_layout = VertexKind::Quad.layout();
    let pipeline = PipelineSpec {
        label: "slot pipeline",
        vertex_layout: &vertex_layout,
        vertex: ShaderStage { module: &module, entry_point: "vs_main" },
        fragment: ShaderStage { module: &module, entry_point: "fs_main" },
        topology: wgpu::PrimitiveTopology::TriangleList,
        front_face: wgpu::FrontFace::Ccw,
        cull_mode: None,
        blend: None,
        color_format: Some(format),
        bind_group_layouts: &[&layout],
    }
    .create(device)
    .unwrap();

    let mut table = DrawTable::new();
    let mesh = table.upload_mesh(device, Mesh::quad(HALF_SCREEN), "half screen").unwrap();
    let group = table.add_bind_group(
        create_bind_group(device, &layout, "objects", &[BindingEntry::new(0, objects.binding())])
            .unwrap(),
    );

    let offsets = [objects.offset(0).unwrap(), objects.offset(1).unwrap()];
    assert_eq!(offsets[0], 0);
    assert_eq!(u64::from(offsets[1]), objects.stride());
    let draws = vec![
        DrawCall::new(mesh, group).with_offsets(vec![offsets[0]]),
        DrawCall::new(mesh, group).with_offsets(vec![offsets[1]]),
    ];

    let target = TextureSpec::new(
        "target",
        64,
        32,
        format,
        wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
    )
    .create(device)
    .unwrap();

    let mut orchestrator = FrameOrchestrator::new(wgpu::Color::BLACK);
    let mut backend = OffscreenBackend::new(&ctx, &target, &pipeline, &table);
    let outcome = orchestrator.render(&mut backend, &draws, &NoOverlay).unwrap();
    assert_eq!(outcome, FrameOutcome::Presented { draw_calls: 2 });

    assert_eq!(common::texel(&ctx, &target, 0, 16, 16), [255, 0, 0, 255]);
    assert_eq!(common::texel(&ctx, &target, 0, 48, 16), [0, 255, 0, 255]);
}

#[test]
fn slots_hold_distinct_blocks() {
    let Some(ctx) = common::headless() else { return };
    let device = ctx.device();
    let queue = ctx.queue();

    // Same slot arithmetic as UniformSlots, on a buffer that can be copied out.
    let stride = slot_stride(64, ctx.uniform_offset_alignment());
    let buffer = BufferSpec::new(
        "slots",
        wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::COPY_SRC,
        stride * 2,
    )
    .create(device)
    .unwrap();

    let a = ObjectUniforms::from_transform(Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)));
    let b = ObjectUniforms::from_transform(Mat4::from_scale(Vec3::splat(4.0)));
    queue.write_buffer(&buffer, 0, bytemuck::bytes_of(&a));
    queue.write_buffer(&buffer, stride, bytemuck::bytes_of(&b));

    let first = read_buffer(&ctx, &buffer, 0, 64).unwrap();
    let second = read_buffer(&ctx, &buffer, stride, 64).unwrap();
    assert_eq!(bytemuck::pod_read_unaligned::<ObjectUniforms>(&first), a);
    assert_eq!(bytemuck::pod_read_unaligned::<ObjectUniforms>(&second), b);
}
