use std::collections::HashSet;
use std::num::NonZeroU64;

use crate::error::ConfigError;

use super::{Layout, LayoutId, LayoutSlot, SlotKind};

/// A resource supplied for one slot.
#[derive(Debug, Clone, Copy)]
pub enum Binding<'a> {
    /// `size: None` binds from `offset` to the end of the buffer.
    Buffer {
        buffer: &'a wgpu::Buffer,
        offset: u64,
        size: Option<u64>,
    },
    Sampler(&'a wgpu::Sampler),
    Texture(&'a wgpu::TextureView),
    StorageTexture(&'a wgpu::TextureView),
}

impl<'a> Binding<'a> {
    /// The whole buffer.
    pub fn buffer(buffer: &'a wgpu::Buffer) -> Self {
        Binding::Buffer {
            buffer,
            offset: 0,
            size: None,
        }
    }

    pub fn kind(&self) -> BindingKind {
        match *self {
            Binding::Buffer {
                buffer,
                offset,
                size,
            } => {
                let buffer_size = buffer.size();
                BindingKind::Buffer {
                    offset,
                    size: size.unwrap_or(buffer_size.saturating_sub(offset)),
                    buffer_size,
                }
            }
            Binding::Sampler(_) => BindingKind::Sampler,
            Binding::Texture(_) => BindingKind::Texture,
            Binding::StorageTexture(_) => BindingKind::StorageTexture,
        }
    }

    fn resource(&self) -> wgpu::BindingResource<'a> {
        match *self {
            Binding::Buffer {
                buffer,
                offset,
                size,
            } => wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer,
                offset,
                size: size.and_then(NonZeroU64::new),
            }),
            Binding::Sampler(sampler) => wgpu::BindingResource::Sampler(sampler),
            Binding::Texture(view) | Binding::StorageTexture(view) => {
                wgpu::BindingResource::TextureView(view)
            }
        }
    }
}

/// A binding index paired with the resource for it.
#[derive(Debug, Clone, Copy)]
pub struct BindingEntry<'a> {
    pub binding: u32,
    pub resource: Binding<'a>,
}

impl<'a> BindingEntry<'a> {
    pub fn new(binding: u32, resource: Binding<'a>) -> Self {
        Self { binding, resource }
    }
}

/// Shape of a supplied binding, without the GPU handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Buffer {
        offset: u64,
        size: u64,
        buffer_size: u64,
    },
    Sampler,
    Texture,
    StorageTexture,
}

impl BindingKind {
    pub fn name(&self) -> &'static str {
        match self {
            BindingKind::Buffer { .. } => "buffer",
            BindingKind::Sampler => "sampler",
            BindingKind::Texture => "texture view",
            BindingKind::StorageTexture => "storage texture view",
        }
    }
}

/// A dynamic-uniform slot of a bind group.
///
/// The bound window of `window` bytes starts at `base_offset`; each draw moves
/// it by a dynamic offset that must be a multiple of `stride`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DynamicBinding {
    pub binding: u32,
    pub stride: u64,
    pub base_offset: u64,
    pub window: u64,
    pub buffer_size: u64,
}

/// What a validated bind group looks like from a draw call's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindGroupShape {
    pub layout_id: LayoutId,
    /// Dynamic slots in binding order, which is the order offsets are given in.
    pub dynamic: Vec<DynamicBinding>,
}

/// Checks that `entries` supply exactly the slots of a layout.
pub fn check_shape(
    slots: &[LayoutSlot],
    layout_id: LayoutId,
    entries: &[(u32, BindingKind)],
) -> Result<BindGroupShape, ConfigError> {
    if entries.len() != slots.len() {
        return Err(ConfigError::BindingCount {
            expected: slots.len(),
            got: entries.len(),
        });
    }

    let mut seen = HashSet::new();
    let mut dynamic = Vec::new();

    for &(binding, kind) in entries {
        let Some(slot) = slots.iter().find(|s| s.binding == binding) else {
            return Err(ConfigError::UnknownBinding { binding });
        };
        if !seen.insert(binding) {
            return Err(ConfigError::DuplicateBinding { binding });
        }

        match (slot.kind, kind) {
            (SlotKind::Sampler, BindingKind::Sampler)
            | (SlotKind::SampledTexture, BindingKind::Texture)
            | (SlotKind::StorageTexture { .. }, BindingKind::StorageTexture) => {}

            (
                SlotKind::Uniform { min_size },
                BindingKind::Buffer {
                    offset,
                    size,
                    buffer_size,
                },
            ) => {
                check_buffer_range(binding, offset, size, buffer_size, min_size)?;
            }

            (
                SlotKind::DynamicUniform { stride, min_size },
                BindingKind::Buffer {
                    offset,
                    size,
                    buffer_size,
                },
            ) => {
                check_buffer_range(binding, offset, size, buffer_size, min_size)?;
                dynamic.push(DynamicBinding {
                    binding,
                    stride,
                    base_offset: offset,
                    window: size,
                    buffer_size,
                });
            }

            (expected, got) => {
                return Err(ConfigError::BindingKind {
                    binding,
                    expected: expected.name(),
                    got: got.name(),
                });
            }
        }
    }

    dynamic.sort_by_key(|d| d.binding);
    Ok(BindGroupShape { layout_id, dynamic })
}

fn check_buffer_range(
    binding: u32,
    offset: u64,
    size: u64,
    buffer_size: u64,
    min_size: u64,
) -> Result<(), ConfigError> {
    if offset.checked_add(size).is_none_or(|end| end > buffer_size) {
        return Err(ConfigError::BindingOutOfRange {
            binding,
            offset,
            size,
            buffer_size,
        });
    }
    if size == 0 || size < min_size {
        return Err(ConfigError::BindingTooSmall {
            binding,
            size,
            min_size,
        });
    }
    Ok(())
}

/// Checks draw-time dynamic offsets against a bind group's dynamic slots.
///
/// One offset per dynamic slot, stride-aligned, keeping the window inside the
/// buffer.
pub fn check_dynamic_offsets(shape: &BindGroupShape, offsets: &[u32]) -> Result<(), ConfigError> {
    if offsets.len() != shape.dynamic.len() {
        return Err(ConfigError::DynamicOffsetCount {
            expected: shape.dynamic.len(),
            got: offsets.len(),
        });
    }

    for (slot, &offset) in shape.dynamic.iter().zip(offsets) {
        if u64::from(offset) % slot.stride != 0 {
            return Err(ConfigError::MisalignedOffset {
                offset,
                stride: slot.stride,
            });
        }
        let end = slot.base_offset + u64::from(offset) + slot.window;
        if end > slot.buffer_size {
            return Err(ConfigError::OffsetOutOfRange {
                offset,
                size: slot.window,
                buffer_size: slot.buffer_size,
            });
        }
    }
    Ok(())
}

/// A created bind group with its validated shape.
#[derive(Debug)]
pub struct BoundGroup {
    raw: wgpu::BindGroup,
    shape: BindGroupShape,
}

impl BoundGroup {
    pub fn raw(&self) -> &wgpu::BindGroup {
        &self.raw
    }

    pub fn shape(&self) -> &BindGroupShape {
        &self.shape
    }
}

/// Validates `entries` against `layout`, then creates the bind group.
pub fn create_bind_group(
    device: &wgpu::Device,
    layout: &Layout,
    label: &str,
    entries: &[BindingEntry<'_>],
) -> Result<BoundGroup, ConfigError> {
    let kinds: Vec<(u32, BindingKind)> = entries
        .iter()
        .map(|e| (e.binding, e.resource.kind()))
        .collect();
    let shape = check_shape(layout.slots(), layout.id(), &kinds)?;

    let wgpu_entries: Vec<wgpu::BindGroupEntry> = entries
        .iter()
        .map(|e| wgpu::BindGroupEntry {
            binding: e.binding,
            resource: e.resource.resource(),
        })
        .collect();

    let raw = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout: layout.raw(),
        entries: &wgpu_entries,
    });

    Ok(BoundGroup { raw, shape })
}

#[cfg(test)]
mod tests {
    use super::*;

    const VF: wgpu::ShaderStages = wgpu::ShaderStages::VERTEX_FRAGMENT;

    fn scene_slots() -> Vec<LayoutSlot> {
        vec![
            LayoutSlot::new(0, VF, SlotKind::Uniform { min_size: 80 }),
            LayoutSlot::new(1, VF, SlotKind::Sampler),
            LayoutSlot::new(2, VF, SlotKind::SampledTexture),
            LayoutSlot::new(3, VF, SlotKind::DynamicUniform { stride: 256, min_size: 64 }),
        ]
    }

    fn buf(offset: u64, size: u64, buffer_size: u64) -> BindingKind {
        BindingKind::Buffer { offset, size, buffer_size }
    }

    fn good_entries() -> Vec<(u32, BindingKind)> {
        vec![
            (0, buf(0, 80, 80)),
            (1, BindingKind::Sampler),
            (2, BindingKind::Texture),
            (3, buf(0, 64, 512)),
        ]
    }

    fn id() -> LayoutId {
        LayoutId::for_tests(7)
    }

    #[test]
    fn matching_entries_produce_shape() {
        let shape = check_shape(&scene_slots(), id(), &good_entries()).unwrap();
        assert_eq!(shape.layout_id, id());
        assert_eq!(
            shape.dynamic,
            vec![DynamicBinding {
                binding: 3,
                stride: 256,
                base_offset: 0,
                window: 64,
                buffer_size: 512
            }]
        );
    }

    #[test]
    fn entry_order_does_not_matter() {
        let mut entries = good_entries();
        entries.reverse();
        assert!(check_shape(&scene_slots(), id(), &entries).is_ok());
    }

    #[test]
    fn missing_or_extra_entries_are_rejected() {
        let mut entries = good_entries();
        entries.pop();
        assert_eq!(
            check_shape(&scene_slots(), id(), &entries),
            Err(ConfigError::BindingCount { expected: 4, got: 3 })
        );

        let mut entries = good_entries();
        entries.push((4, BindingKind::Sampler));
        assert_eq!(
            check_shape(&scene_slots(), id(), &entries),
            Err(ConfigError::BindingCount { expected: 4, got: 5 })
        );
    }

    #[test]
    fn unknown_and_duplicate_bindings_are_rejected() {
        let mut entries = good_entries();
        entries[1] = (9, BindingKind::Sampler);
        assert_eq!(
            check_shape(&scene_slots(), id(), &entries),
            Err(ConfigError::UnknownBinding { binding: 9 })
        );

        let mut entries = good_entries();
        entries[1] = (2, BindingKind::Texture);
        assert_eq!(
            check_shape(&scene_slots(), id(), &entries),
            Err(ConfigError::DuplicateBinding { binding: 2 })
        );
    }

    #[test]
    fn kind_mismatch_is_rejected() {
        let mut entries = good_entries();
        entries[1] = (1, BindingKind::Texture);
        assert_eq!(
            check_shape(&scene_slots(), id(), &entries),
            Err(ConfigError::BindingKind {
                binding: 1,
                expected: "sampler",
                got: "texture view"
            })
        );
    }

    #[test]
    fn buffer_ranges_are_checked() {
        let mut entries = good_entries();
        entries[0] = (0, buf(0, 64, 80));
        assert_eq!(
            check_shape(&scene_slots(), id(), &entries),
            Err(ConfigError::BindingTooSmall { binding: 0, size: 64, min_size: 80 })
        );

        entries[0] = (0, buf(16, 80, 80));
        assert_eq!(
            check_shape(&scene_slots(), id(), &entries),
            Err(ConfigError::BindingOutOfRange { binding: 0, offset: 16, size: 80, buffer_size: 80 })
        );
    }

    #[test]
    fn dynamic_offsets_count_must_match() {
        let shape = check_shape(&scene_slots(), id(), &good_entries()).unwrap();
        assert_eq!(
            check_dynamic_offsets(&shape, &[]),
            Err(ConfigError::DynamicOffsetCount { expected: 1, got: 0 })
        );
        assert_eq!(
            check_dynamic_offsets(&shape, &[0, 256]),
            Err(ConfigError::DynamicOffsetCount { expected: 1, got: 2 })
        );
        assert_eq!(check_dynamic_offsets(&shape, &[0]), Ok(()));
        assert_eq!(check_dynamic_offsets(&shape, &[256]), Ok(()));
    }

    #[test]
    fn dynamic_offsets_must_be_aligned_and_in_range() {
        let shape = check_shape(&scene_slots(), id(), &good_entries()).unwrap();
        assert_eq!(
            check_dynamic_offsets(&shape, &[128]),
            Err(ConfigError::MisalignedOffset { offset: 128, stride: 256 })
        );
        assert_eq!(
            check_dynamic_offsets(&shape, &[512]),
            Err(ConfigError::OffsetOutOfRange { offset: 512, size: 64, buffer_size: 512 })
        );
    }

    #[test]
    fn groups_without_dynamic_slots_take_no_offsets() {
        let slots = vec![LayoutSlot::new(0, VF, SlotKind::Sampler)];
        let shape = check_shape(&slots, id(), &[(0, BindingKind::Sampler)]).unwrap();
        assert_eq!(check_dynamic_offsets(&shape, &[]), Ok(()));
        assert_eq!(
            check_dynamic_offsets(&shape, &[0]),
            Err(ConfigError::DynamicOffsetCount { expected: 0, got: 1 })
        );
    }
}
