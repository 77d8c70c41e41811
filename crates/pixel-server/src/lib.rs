//! pixel-server library crate.
//!
//! An HTTP service that holds a single pixel-art design in memory and lets
//! clients read it or replace it wholesale.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Client (JSON over HTTP)
//!         ↕
//! [pixel-server]
//!   ├── domain/           ServerConfig
//!   ├── application/      DesignService + DesignStore port
//!   └── infrastructure/
//!         ├── http_server/   axum router and accept loop
//!         ├── memory_store/  RwLock-backed DesignStore
//!         └── config_file/   optional TOML config
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O.
//! - `application` depends on `domain` and `pixel-core` only.
//! - `infrastructure` depends on all other layers plus `tokio`, `axum`, and `toml`.

/// Domain layer: server configuration (no I/O).
pub mod domain;

/// Application layer: validate-and-replace logic over the design store.
pub mod application;

/// Infrastructure layer: HTTP server, in-memory store, config file loading.
pub mod infrastructure;
