//! Application layer for pixel-server.
//!
//! The application layer knows *what* to do with a request (validate, stamp,
//! replace) but delegates *where* the design lives to a [`DesignStore`]
//! implementation from the infrastructure layer.
//!
//! # What does NOT belong here?
//!
//! - HTTP routing, status codes, or body extraction (that is infrastructure)
//! - Locks or other storage details (hidden behind `DesignStore`)

pub mod design_service;

pub use design_service::{DesignService, DesignStore};
