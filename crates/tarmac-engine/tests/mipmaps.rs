mod common;

use tarmac_engine::device::read_texture;
use tarmac_engine::resource::{MipGenerator, MipLevels, RgbaImage, SamplerSpec};

const BLACK: [u8; 4] = [0, 0, 0, 255];
const WHITE: [u8; 4] = [255, 255, 255, 255];

fn usage() -> wgpu::TextureUsages {
    wgpu::TextureUsages::STORAGE_BINDING | wgpu::TextureUsages::COPY_SRC
}

#[test]
fn checkerboard_averages_to_gray() {
    let Some(ctx) = common::headless() else { return };
    let (device, queue) = (ctx.device(), ctx.queue());

    let image = RgbaImage::checker(64, 64, 1, BLACK, WHITE);
    let texture = image
        .create_texture(device, queue, "checker", MipLevels::Full, usage())
        .unwrap();
    assert_eq!(texture.mip_level_count(), 7);

    let sampler = SamplerSpec::clamped_linear().create(device, "mip sampler").unwrap();
    let generator = MipGenerator::new(device).unwrap();
    let dispatches = generator.generate(device, queue, &texture, &sampler).unwrap();
    assert_eq!(dispatches, 6);

    // Every 2x2 block of a one-texel checker is half black, half white.
    let level1 = read_texture(&ctx, &texture, 1).unwrap();
    assert_eq!(level1.len(), 32 * 32 * 4);
    for px in level1.chunks_exact(4) {
        assert!(common::close(px[0], 128, 2), "level 1 texel {px:?}");
        assert_eq!(px[3], 255);
    }

    let last = common::texel(&ctx, &texture, 6, 0, 0);
    assert!(common::close(last[0], 128, 2), "1x1 texel {last:?}");
    assert!(common::close(last[1], 128, 2));
    assert!(common::close(last[2], 128, 2));
}

#[test]
fn non_square_chain_keeps_a_solid_color() {
    let Some(ctx) = common::headless() else { return };
    let (device, queue) = (ctx.device(), ctx.queue());

    let color = [10, 200, 30, 255];
    let image = RgbaImage::solid(8, 2, color);
    let texture = image
        .create_texture(device, queue, "strip", MipLevels::Full, usage())
        .unwrap();
    assert_eq!(texture.mip_level_count(), 4);
    assert_eq!(texture.level_size(3), Some((1, 1)));

    let sampler = SamplerSpec::clamped_linear().create(device, "mip sampler").unwrap();
    let generator = MipGenerator::new(device).unwrap();
    assert_eq!(generator.generate(device, queue, &texture, &sampler).unwrap(), 3);

    for level in 1..4 {
        let bytes = read_texture(&ctx, &texture, level).unwrap();
        let (w, h) = texture.level_size(level).unwrap();
        assert_eq!(bytes.len() as u32, w * h * 4);
        for px in bytes.chunks_exact(4) {
            for c in 0..4 {
                assert!(common::close(px[c], color[c], 1), "level {level} texel {px:?}");
            }
        }
    }
}

#[test]
fn single_level_texture_needs_no_dispatch() {
    let Some(ctx) = common::headless() else { return };
    let (device, queue) = (ctx.device(), ctx.queue());

    let texture = RgbaImage::solid(4, 4, WHITE)
        .create_texture(device, queue, "flat", MipLevels::Single, usage())
        .unwrap();
    let sampler = SamplerSpec::clamped_linear().create(device, "mip sampler").unwrap();
    let generator = MipGenerator::new(device).unwrap();
    assert_eq!(generator.generate(device, queue, &texture, &sampler).unwrap(), 0);
}
