//! Wire types of the HTTP API.
//!
//! The sub-module:
//!
//! - [`api`] – JSON response envelopes shared by the server and the client.

pub mod api;
