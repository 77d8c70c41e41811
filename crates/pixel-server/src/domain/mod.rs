//! Domain layer for pixel-server.
//!
//! Pure types with no dependencies on I/O, networking, or the async runtime.
//! The design entity itself lives in `pixel-core`; this layer only adds the
//! server's runtime settings.

pub mod config;

pub use config::{ServerConfig, DEFAULT_PORT};
