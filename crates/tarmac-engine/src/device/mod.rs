//! GPU device session.
//!
//! This module is responsible for:
//! - negotiating the wgpu Adapter and Device/Queue (bounded waits, no spinning)
//! - creating & configuring the Surface (swapchain) and its color format
//! - acquiring surface frames and classifying acquisition failures
//! - reading GPU buffers and textures back to the CPU

mod context;
mod error;
mod frame;
mod gpu;
mod init;
mod readback;
mod surface;
pub mod wait;

pub use context::DeviceContext;
pub use error::{GpuError, SkipReason, SurfaceErrorAction};
pub use frame::{Acquired, GpuFrame};
pub use gpu::Gpu;
pub use init::GpuInit;
pub use readback::{read_buffer, read_texture};
