//! # pixel-core
//!
//! Shared library for the pixel design store containing the `Design` entity,
//! the validation rules for untrusted update payloads, and the JSON wire types
//! exchanged between server and client.
//!
//! This crate is used by both the server and the client.  It has zero
//! dependencies on async runtimes, HTTP frameworks, or sockets.
//!
//! # Architecture overview
//!
//! The store holds exactly one pixel-art design: a square grid of colored
//! cells.  Clients read the design and replace it wholesale.
//!
//! - **`domain`** – The `Design` value and the rules that decide whether an
//!   incoming payload may become the new design.  Validation turns an untyped
//!   [`DesignCandidate`] into a strongly typed [`DesignPayload`]; only the
//!   latter can be stamped into a [`Design`].
//!
//! - **`protocol`** – The JSON envelopes of the HTTP API (`{ ok: true }`,
//!   `{ error: "..." }`, and friends).

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `pixel_core::Design` instead of `pixel_core::domain::design::Design`.
pub use domain::design::{
    Design, DesignCandidate, DesignError, DesignPayload, DEFAULT_GRID_SIZE, EMPTY_COLOR,
    MAX_GRID_SIZE, MIN_GRID_SIZE,
};
pub use protocol::api::{ErrorResponse, HealthResponse, SaveDesignResponse};
