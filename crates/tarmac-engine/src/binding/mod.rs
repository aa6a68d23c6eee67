//! Bind group layouts, bind groups and dynamic uniform slots.
//!
//! Every bind group is checked against its layout before wgpu sees it: same
//! slot count, known and unique binding indices, matching resource kinds and
//! buffer ranges that fit. The resulting `BindGroupShape` is what draw-time
//! dynamic offsets are validated against.

mod dynamic;
mod group;
mod layout;

pub use dynamic::{slot_stride, UniformSlots, DEFAULT_UNIFORM_ALIGNMENT};
pub use group::{
    check_dynamic_offsets, check_shape, create_bind_group, BindGroupShape, Binding, BindingEntry,
    BindingKind, BoundGroup, DynamicBinding,
};
pub use layout::{BindGroupLayoutSpec, Layout, LayoutId, LayoutSlot, SlotKind};
