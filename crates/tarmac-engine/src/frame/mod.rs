//! Per-frame protocol.
//!
//! Acquire -> (skip if not optimal) -> encoder -> clear pass -> pipeline ->
//! per-draw vertex/index/bind group/draw -> overlay -> submit -> present.
//!
//! Draw lists are validated against the pipeline before a frame is acquired,
//! so a rejected configuration never touches the surface.

mod draw;
mod encode;
mod offscreen;
mod orchestrator;
mod surface_backend;

pub use draw::{validate_draws, BindGroupHandle, DrawCall, DrawResources, DrawTable};
pub use offscreen::OffscreenBackend;
pub use orchestrator::{FrameBackend, FrameOrchestrator, FrameOutcome, FrameStats, PassDesc};
pub use surface_backend::SurfaceBackend;
