//! Infrastructure layer for pixel-server.
//!
//! Handles all I/O and shared-state plumbing:
//!
//! - Binding the TCP listener and serving the axum router
//! - Holding the design behind a lock (`InMemoryDesignStore`)
//! - Reading the optional TOML config file
//! - Observing the graceful shutdown flag
//!
//! # What does NOT belong here?
//!
//! - Validation rules (that is `pixel-core`)
//! - Deciding when the store is written (that is the application layer)

pub mod config_file;
pub mod http_server;
pub mod memory_store;

// Re-export the primary entry points so `main.rs` can call them concisely.
pub use http_server::{router, run_server, serve};
pub use memory_store::InMemoryDesignStore;
