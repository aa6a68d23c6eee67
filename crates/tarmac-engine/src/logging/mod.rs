//! Logging setup.
//!
//! Everything logs through the `log` facade; `env_logger` is installed once
//! by the binary.

mod init;

pub use init::{init_logging, resolve_filter, LoggingConfig, DEFAULT_FILTER};
