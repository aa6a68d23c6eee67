//! Shared setup for GPU integration tests.
//!
//! Without an adapter the tests print a skip notice and pass; set
//! `TARMAC_REQUIRE_GPU=1` to make a missing adapter fail instead.

#![allow(dead_code)]

use tarmac_engine::device::{read_texture, DeviceContext, GpuInit};
use tarmac_engine::resource::Texture;

pub fn headless() -> Option<DeviceContext> {
    let instance = DeviceContext::create_instance();
    let probe = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions::default()));
    if let Err(err) = probe {
        return skip(format!("no adapter: {err}"));
    }

    match DeviceContext::headless(&GpuInit::headless()) {
        Ok(ctx) => Some(ctx),
        Err(err) => skip(err.to_string()),
    }
}

fn skip(reason: String) -> Option<DeviceContext> {
    if std::env::var("TARMAC_REQUIRE_GPU").is_ok_and(|v| v == "1") {
        panic!("GPU required but unavailable: {reason}");
    }
    eprintln!("skipping GPU test: {reason}");
    None
}

/// RGBA8 texel at (x, y) of mip `level`.
pub fn texel(ctx: &DeviceContext, texture: &Texture, level: u32, x: u32, y: u32) -> [u8; 4] {
    let (width, _) = texture.level_size(level).unwrap();
    let bytes = read_texture(ctx, texture, level).unwrap();
    let i = ((y * width + x) * 4) as usize;
    [bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]
}

pub fn close(a: u8, b: u8, tolerance: u8) -> bool {
    a.abs_diff(b) <= tolerance
}
