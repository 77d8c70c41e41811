//! JSON envelopes for the design store HTTP API.
//!
//! ```text
//! GET  /api/health  → HealthResponse        {"ok":true}
//! GET  /api/design  → Design                {"gridSize":..,"pixels":[..],"updatedAt":".."}
//! POST /api/design  → SaveDesignResponse    {"ok":true,"savedDesign":{..}}
//!                   | ErrorResponse (400)   {"error":"Invalid payload"}
//! ```
//!
//! The request body of `POST /api/design` is a
//! [`DesignPayload`](crate::DesignPayload) on the client side and a
//! [`DesignCandidate`](crate::DesignCandidate) on the server side.

use serde::{Deserialize, Serialize};

use crate::domain::design::{Design, DesignError};

/// Body of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

/// Body of a successful `POST /api/design`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveDesignResponse {
    pub ok: bool,
    /// The design as stored, including the server-assigned `updatedAt`.
    pub saved_design: Design,
}

impl SaveDesignResponse {
    pub fn saved(design: Design) -> Self {
        Self {
            ok: true,
            saved_design: design,
        }
    }
}

/// Body of every 4xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&DesignError> for ErrorResponse {
    fn from(err: &DesignError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}
