//! Window + runtime loop.
//!
//! Owns the `winit` event loop and the single window, and wires them to the
//! GPU session and the application callbacks.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
