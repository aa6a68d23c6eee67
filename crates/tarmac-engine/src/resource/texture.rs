use crate::error::ConfigError;

/// Number of levels in a full mip chain: `floor(log2(max(w, h))) + 1`.
///
/// A zero dimension counts as 1, so the result is never 0.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    u32::BITS - width.max(height).max(1).leading_zeros()
}

/// How many mip levels a texture gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MipLevels {
    /// Base level only.
    #[default]
    Single,
    /// Full chain down to 1x1.
    Full,
    /// Explicit count, at most the full chain.
    Count(u32),
}

/// Describes a 2D texture (sample count 1, one array layer).
#[derive(Debug, Clone, Copy)]
pub struct TextureSpec<'a> {
    pub label: Option<&'a str>,
    pub width: u32,
    pub height: u32,
    pub mip_levels: MipLevels,
    pub format: wgpu::TextureFormat,
    pub usage: wgpu::TextureUsages,
}

impl<'a> TextureSpec<'a> {
    pub fn new(
        label: &'a str,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
        usage: wgpu::TextureUsages,
    ) -> Self {
        Self {
            label: Some(label),
            width,
            height,
            mip_levels: MipLevels::Single,
            format,
            usage,
        }
    }

    pub fn with_mips(mut self, mip_levels: MipLevels) -> Self {
        self.mip_levels = mip_levels;
        self
    }

    /// Resolves the mip level count, rejecting empty sizes and over-long chains.
    pub fn mip_level_count(&self) -> Result<u32, ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyTexture {
                width: self.width,
                height: self.height,
            });
        }
        let max = mip_level_count(self.width, self.height);
        match self.mip_levels {
            MipLevels::Single => Ok(1),
            MipLevels::Full => Ok(max),
            MipLevels::Count(n) if (1..=max).contains(&n) => Ok(n),
            MipLevels::Count(n) => Err(ConfigError::MipLevelCount { requested: n, max }),
        }
    }

    pub fn create(&self, device: &wgpu::Device) -> Result<Texture, ConfigError> {
        let mip_level_count = self.mip_level_count()?;

        let raw = device.create_texture(&wgpu::TextureDescriptor {
            label: self.label,
            size: wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
            mip_level_count,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.format,
            usage: self.usage,
            view_formats: &[],
        });

        Ok(Texture {
            raw,
            width: self.width,
            height: self.height,
            mip_level_count,
            format: self.format,
            usage: self.usage,
        })
    }
}

/// A rectangle of texels within one mip level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureRegion {
    pub level: u32,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// A created 2D texture and the descriptor values it was built from.
#[derive(Debug)]
pub struct Texture {
    raw: wgpu::Texture,
    width: u32,
    height: u32,
    mip_level_count: u32,
    format: wgpu::TextureFormat,
    usage: wgpu::TextureUsages,
}

impl Texture {
    pub fn raw(&self) -> &wgpu::Texture {
        &self.raw
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn mip_level_count(&self) -> u32 {
        self.mip_level_count
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    pub fn usage(&self) -> wgpu::TextureUsages {
        self.usage
    }

    /// Size of mip `level`, or `None` past the end of the chain.
    pub fn level_size(&self, level: u32) -> Option<(u32, u32)> {
        (level < self.mip_level_count).then(|| level_extent(self.width, self.height, level))
    }

    /// A view over the whole mip chain, used for sampling.
    pub fn view_all(&self, label: &str) -> wgpu::TextureView {
        self.raw.create_view(&wgpu::TextureViewDescriptor {
            label: Some(label),
            dimension: Some(wgpu::TextureViewDimension::D2),
            base_mip_level: 0,
            mip_level_count: Some(self.mip_level_count),
            ..Default::default()
        })
    }

    /// A view over exactly one mip level.
    pub fn mip_view(&self, level: u32, label: &str) -> Result<wgpu::TextureView, ConfigError> {
        if level >= self.mip_level_count {
            return Err(ConfigError::MipLevel {
                level,
                count: self.mip_level_count,
            });
        }
        Ok(self.raw.create_view(&wgpu::TextureViewDescriptor {
            label: Some(label),
            dimension: Some(wgpu::TextureViewDimension::D2),
            base_mip_level: level,
            mip_level_count: Some(1),
            ..Default::default()
        }))
    }

    /// Uploads a tightly packed image into a whole mip level.
    pub fn write_level(
        &self,
        queue: &wgpu::Queue,
        level: u32,
        data: &[u8],
    ) -> Result<(), ConfigError> {
        let (width, height) = self.level_size(level).ok_or(ConfigError::MipLevel {
            level,
            count: self.mip_level_count,
        })?;
        let bytes_per_row = width * self.texel_size()?;
        self.write_region(
            queue,
            TextureRegion {
                level,
                x: 0,
                y: 0,
                width,
                height,
            },
            data,
            bytes_per_row,
        )
    }

    /// Uploads `data` into `region`; rows are `bytes_per_row` apart in `data`.
    pub fn write_region(
        &self,
        queue: &wgpu::Queue,
        region: TextureRegion,
        data: &[u8],
        bytes_per_row: u32,
    ) -> Result<(), ConfigError> {
        let texel = self.texel_size()?;
        let (level_w, level_h) = self.level_size(region.level).ok_or(ConfigError::MipLevel {
            level: region.level,
            count: self.mip_level_count,
        })?;
        check_region(region, level_w, level_h, texel, bytes_per_row, data.len())?;

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.raw,
                mip_level: region.level,
                origin: wgpu::Origin3d {
                    x: region.x,
                    y: region.y,
                    z: 0,
                },
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: Some(region.height),
            },
            wgpu::Extent3d {
                width: region.width,
                height: region.height,
                depth_or_array_layers: 1,
            },
        );
        Ok(())
    }

    fn texel_size(&self) -> Result<u32, ConfigError> {
        self.format
            .block_copy_size(None)
            .ok_or(ConfigError::UnsizedFormat {
                format: self.format,
            })
    }
}

fn level_extent(width: u32, height: u32, level: u32) -> (u32, u32) {
    ((width >> level).max(1), (height >> level).max(1))
}

fn check_region(
    region: TextureRegion,
    level_w: u32,
    level_h: u32,
    texel: u32,
    bytes_per_row: u32,
    data_len: usize,
) -> Result<(), ConfigError> {
    let fits_x = region.x.checked_add(region.width).is_some_and(|r| r <= level_w);
    let fits_y = region.y.checked_add(region.height).is_some_and(|b| b <= level_h);
    if region.width == 0 || region.height == 0 || !fits_x || !fits_y {
        return Err(ConfigError::RegionOutOfBounds {
            x: region.x,
            y: region.y,
            width: region.width,
            height: region.height,
            level_width: level_w,
            level_height: level_h,
        });
    }

    let row = u64::from(region.width) * u64::from(texel);
    if u64::from(bytes_per_row) < row {
        return Err(ConfigError::TexelDataSize {
            expected: row,
            actual: u64::from(bytes_per_row),
        });
    }

    let expected = u64::from(bytes_per_row) * u64::from(region.height - 1) + row;
    let actual = data_len as u64;
    if actual < expected {
        return Err(ConfigError::TexelDataSize { expected, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(width: u32, height: u32, mips: MipLevels) -> TextureSpec<'static> {
        TextureSpec::new(
            "t",
            width,
            height,
            wgpu::TextureFormat::Rgba8Unorm,
            wgpu::TextureUsages::TEXTURE_BINDING,
        )
        .with_mips(mips)
    }

    #[test]
    fn mip_count_matches_log2_formula() {
        assert_eq!(mip_level_count(1, 1), 1);
        assert_eq!(mip_level_count(2, 1), 2);
        assert_eq!(mip_level_count(3, 3), 2);
        assert_eq!(mip_level_count(256, 256), 9);
        assert_eq!(mip_level_count(1200, 800), 11);
        assert_eq!(mip_level_count(1, 4096), 13);
        assert_eq!(mip_level_count(0, 0), 1);

        for (w, h) in [(5u32, 9u32), (640, 480), (1023, 1), (1024, 1025)] {
            let expected = (w.max(h) as f64).log2().floor() as u32 + 1;
            assert_eq!(mip_level_count(w, h), expected, "{w}x{h}");
        }
    }

    #[test]
    fn spec_resolves_mip_levels() {
        assert_eq!(spec(64, 32, MipLevels::Single).mip_level_count(), Ok(1));
        assert_eq!(spec(64, 32, MipLevels::Full).mip_level_count(), Ok(7));
        assert_eq!(spec(64, 32, MipLevels::Count(3)).mip_level_count(), Ok(3));
        assert_eq!(
            spec(64, 32, MipLevels::Count(8)).mip_level_count(),
            Err(ConfigError::MipLevelCount { requested: 8, max: 7 })
        );
        assert_eq!(
            spec(64, 0, MipLevels::Full).mip_level_count(),
            Err(ConfigError::EmptyTexture { width: 64, height: 0 })
        );
    }

    #[test]
    fn level_extent_halves_and_clamps() {
        assert_eq!(level_extent(64, 16, 0), (64, 16));
        assert_eq!(level_extent(64, 16, 3), (8, 2));
        assert_eq!(level_extent(64, 16, 6), (1, 1));
    }

    #[test]
    fn region_checks_bounds_and_data_length() {
        let full = TextureRegion { level: 0, x: 0, y: 0, width: 4, height: 2 };
        assert_eq!(check_region(full, 4, 2, 4, 16, 32), Ok(()));
        // Padded rows only need the last row to be tight.
        assert_eq!(check_region(full, 4, 2, 4, 20, 36), Ok(()));
        assert_eq!(
            check_region(full, 4, 2, 4, 16, 31),
            Err(ConfigError::TexelDataSize { expected: 32, actual: 31 })
        );
        assert_eq!(
            check_region(full, 4, 2, 4, 12, 64),
            Err(ConfigError::TexelDataSize { expected: 16, actual: 12 })
        );

        let outside = TextureRegion { level: 0, x: 2, y: 0, width: 4, height: 2 };
        assert_eq!(
            check_region(outside, 4, 2, 4, 16, 32),
            Err(ConfigError::RegionOutOfBounds {
                x: 2,
                y: 0,
                width: 4,
                height: 2,
                level_width: 4,
                level_height: 2
            })
        );
    }
}
