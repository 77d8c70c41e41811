//! DesignService: the read and validate-and-replace use cases.
//!
//! The service owns a handle to a [`DesignStore`] and is the only code that
//! writes to it.  A write goes through these steps:
//!
//! ```text
//! DesignCandidate ──validate()──► DesignPayload ──commit(now)──► store
//!        │                                                     │
//!        └── DesignError (store untouched)                     └── stamped Design returned
//! ```
//!
//! The store never validates; everything it receives has already passed
//! [`DesignCandidate::validate`].  Stamping happens inside `commit` so the
//! previous timestamp is read and the new design written under one lock.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use pixel_core::{Design, DesignCandidate, DesignError, DesignPayload};
use tracing::{debug, info, warn};

#[cfg(test)]
use mockall::automock;

/// Holds exactly one [`Design`].
///
/// Implementations perform no validation.
#[cfg_attr(test, automock)]
pub trait DesignStore: Send + Sync {
    /// Returns the current design, unmodified.
    fn get(&self) -> Design;

    /// Overwrites the stored design in one step.
    fn replace(&self, design: Design);

    /// Stamps `payload` with [`DesignPayload::into_design_after`] against the
    /// stored design and stores the result, as one atomic step.  Concurrent
    /// commits are serialized, so the stored `updated_at` never decreases.
    fn commit(&self, payload: DesignPayload, now: DateTime<Utc>) -> Design;
}

/// Read and write operations over the shared [`DesignStore`].
pub struct DesignService {
    store: Arc<dyn DesignStore>,
}

impl DesignService {
    pub fn new(store: Arc<dyn DesignStore>) -> Self {
        Self { store }
    }

    /// Returns the stored design verbatim.
    pub fn current_design(&self) -> Design {
        self.store.get()
    }

    /// Validates `candidate` and, if it passes, stamps and stores it.
    ///
    /// `updated_at` is the later of now and the stored design's timestamp, so
    /// it never decreases even if the wall clock steps backwards.
    ///
    /// # Errors
    ///
    /// Returns the first [`DesignError`] raised by validation.  The stored
    /// design is left untouched in that case.
    pub fn update_design(&self, candidate: DesignCandidate) -> Result<Design, DesignError> {
        let payload = candidate.validate().map_err(|e| {
            warn!("rejected design update: {e}");
            e
        })?;

        debug!("committing design ({} cells)", payload.pixels.len());
        let design = self.store.commit(payload, Utc::now());

        info!(
            "design updated: {}x{} grid at {}",
            design.grid_size, design.grid_size, design.updated_at
        );
        Ok(design)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
