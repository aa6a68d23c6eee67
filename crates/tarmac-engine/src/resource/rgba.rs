use std::path::Path;

use crate::error::{AssetError, ConfigError};

use super::{MipLevels, Texture, TextureSpec};

/// Tightly packed RGBA8 pixels, row-major, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RgbaImage {
    /// Decodes an image file and converts it to RGBA8.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let decoded = image::open(path).map_err(|source| AssetError::Image {
            path: path.to_path_buf(),
            source,
        })?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        log::debug!("loaded {} ({width}x{height})", path.display());

        Ok(Self {
            width,
            height,
            pixels: rgba.into_raw(),
        })
    }

    pub fn from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyTexture { width, height });
        }
        let expected = u64::from(width) * u64::from(height) * 4;
        let actual = pixels.len() as u64;
        if actual != expected {
            return Err(ConfigError::TexelDataSize { expected, actual });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// A single-color image.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width.max(1) as usize * height.max(1) as usize;
        Self {
            width: width.max(1),
            height: height.max(1),
            pixels: rgba.repeat(count),
        }
    }

    /// A two-color checkerboard with square cells of `cell` pixels.
    pub fn checker(width: u32, height: u32, cell: u32, a: [u8; 4], b: [u8; 4]) -> Self {
        let (width, height, cell) = (width.max(1), height.max(1), cell.max(1));
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height {
            for x in 0..width {
                let even = ((x / cell) + (y / cell)) % 2 == 0;
                pixels.extend_from_slice(if even { &a } else { &b });
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Creates an Rgba8Unorm texture sized to this image and uploads it to mip 0.
    ///
    /// `COPY_DST` and `TEXTURE_BINDING` are always added to `usage`; the other
    /// levels of the chain are left for the mip generator.
    pub fn create_texture(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        mip_levels: MipLevels,
        usage: wgpu::TextureUsages,
    ) -> Result<Texture, ConfigError> {
        let texture = TextureSpec::new(
            label,
            self.width,
            self.height,
            wgpu::TextureFormat::Rgba8Unorm,
            usage | wgpu::TextureUsages::COPY_DST | wgpu::TextureUsages::TEXTURE_BINDING,
        )
        .with_mips(mip_levels)
        .create(device)?;

        texture.write_level(queue, 0, &self.pixels)?;
        Ok(texture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_checks_length() {
        assert!(RgbaImage::from_raw(2, 2, vec![0; 16]).is_ok());
        assert_eq!(
            RgbaImage::from_raw(2, 2, vec![0; 15]),
            Err(ConfigError::TexelDataSize { expected: 16, actual: 15 })
        );
        assert_eq!(
            RgbaImage::from_raw(0, 2, vec![]),
            Err(ConfigError::EmptyTexture { width: 0, height: 2 })
        );
    }

    #[test]
    fn checker_alternates_cells() {
        let white = [255, 255, 255, 255];
        let black = [0, 0, 0, 255];
        let img = RgbaImage::checker(4, 4, 2, white, black);
        let px = |x: usize, y: usize| &img.pixels()[(y * 4 + x) * 4..(y * 4 + x) * 4 + 4];
        assert_eq!(px(0, 0), white);
        assert_eq!(px(1, 1), white);
        assert_eq!(px(2, 0), black);
        assert_eq!(px(0, 2), black);
        assert_eq!(px(3, 3), white);
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = RgbaImage::load(dir.path().join("missing.png")).unwrap_err();
        assert!(matches!(err, AssetError::Image { .. }));
    }

    #[test]
    fn load_decodes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pixel.png");
        image::RgbaImage::from_raw(2, 1, vec![255, 0, 0, 255, 0, 0, 255, 128])
            .unwrap()
            .save(&path)
            .unwrap();

        let img = RgbaImage::load(&path).unwrap();
        assert_eq!((img.width(), img.height()), (2, 1));
        assert_eq!(img.pixels(), &[255, 0, 0, 255, 0, 0, 255, 128]);
    }
}
