//! Tarmac engine crate.
//!
//! This crate owns the GPU session, the resource descriptors, geometry and
//! texture upload (including compute mip generation), bind groups, the render
//! pipeline and the per-frame submission protocol. The viewer binary only wires
//! configuration and window events into it.

pub mod binding;
pub mod config;
pub mod core;
pub mod device;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod logging;
pub mod overlay;
pub mod pipeline;
pub mod resource;
pub mod scene;
pub mod time;
pub mod window;

pub use error::{AssetError, ConfigError, EngineError};
