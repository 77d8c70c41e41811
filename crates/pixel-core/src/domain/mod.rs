//! Domain entities for the pixel design store.
//!
//! This module contains pure business logic with no infrastructure
//! dependencies: no sockets, no async runtime, no global state.
//!
//! Code in outer layers (the HTTP server, the client) depends on the domain,
//! but the domain never depends on them.  This keeps the validation rules easy
//! to unit-test in isolation.

/// The design entity and its write-boundary validation.
///
/// See [`design::Design`] and [`design::DesignCandidate`].
pub mod design;
