use crate::geometry::{Mesh, QuadVertex};
use crate::resource::RgbaImage;

/// Ground strip; V repeats 15 times along its length.
pub const ASPHALT: [QuadVertex; 4] = [
    QuadVertex::new([-10.0, 0.0, -10.0], [0.0, 0.0]),
    QuadVertex::new([-10.0, 0.0, -330.0], [0.0, 15.0]),
    QuadVertex::new([10.0, 0.0, -330.0], [1.0, 15.0]),
    QuadVertex::new([10.0, 0.0, -10.0], [1.0, 0.0]),
];

/// Upright billboard to the right of the road.
pub const EXPLOSION: [QuadVertex; 4] = [
    QuadVertex::new([2.0, 0.0, -22.0], [0.0, 0.0]),
    QuadVertex::new([2.0, 10.0, -22.0], [0.0, 1.0]),
    QuadVertex::new([12.0, 10.0, -22.0], [1.0, 1.0]),
    QuadVertex::new([12.0, 0.0, -22.0], [1.0, 0.0]),
];

pub fn meshes() -> Vec<Mesh> {
    vec![Mesh::quad(ASPHALT), Mesh::quad(EXPLOSION)]
}

/// Generated stand-in for drawable `index` when no image was configured.
pub fn fallback_texture(index: usize) -> RgbaImage {
    match index % 2 {
        0 => RgbaImage::checker(256, 256, 16, [58, 58, 62, 255], [92, 92, 98, 255]),
        _ => RgbaImage::checker(128, 128, 16, [255, 140, 0, 255], [255, 220, 60, 255]),
    }
}
