//! Volatile [`DesignStore`] backed by an `RwLock`.
//!
//! The design is lost when the process exits.  Reads take a shared lock and
//! clone; writes take the exclusive lock once, and a commit reads the previous
//! timestamp under that same guard.  No lock is held across an `.await`, so a
//! plain `std::sync::RwLock` is enough.

use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use pixel_core::{Design, DesignPayload};

use crate::application::DesignStore;

pub struct InMemoryDesignStore {
    design: RwLock<Design>,
}

impl InMemoryDesignStore {
    pub fn new(initial: Design) -> Self {
        Self {
            design: RwLock::new(initial),
        }
    }
}

impl Default for InMemoryDesignStore {
    /// Seeds the store with the 16 × 16 `#000000` startup design.
    fn default() -> Self {
        Self::new(Design::default())
    }
}

// A poisoned lock still holds a complete Design: replacement is one
// assignment, so a panicking writer cannot leave it half-written.
impl DesignStore for InMemoryDesignStore {
    fn get(&self) -> Design {
        self.design
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace(&self, design: Design) {
        *self.design.write().unwrap_or_else(PoisonError::into_inner) = design;
    }

    fn commit(&self, payload: DesignPayload, now: DateTime<Utc>) -> Design {
        let mut current = self.design.write().unwrap_or_else(PoisonError::into_inner);
        let design = payload.into_design_after(now, current.updated_at);
        *current = design.clone();
        design
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn design(grid_size: u32, color: &str) -> Design {
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        Design::blank(grid_size, color, at).unwrap()
    }

    #[test]
    fn test_default_store_holds_startup_design() {
        let store = InMemoryDesignStore::default();
        let current = store.get();
        assert_eq!(current.grid_size, 16);
        assert_eq!(current.pixels.len(), 256);
    }

    #[test]
    fn test_get_has_no_side_effects() {
        let store = InMemoryDesignStore::new(design(2, "#fff"));
        assert_eq!(store.get(), store.get());
    }

    #[test]
    fn test_replace_overwrites_whole_design() {
        // Arrange
        let store = InMemoryDesignStore::new(design(4, "#000"));
        let next = design(1, "#f00");

        // Act
        store.replace(next.clone());

        // Assert
        assert_eq!(store.get(), next);
    }

    #[test]
    fn test_replace_does_not_validate() {
        // The store trusts its caller, even with a broken invariant.
        let store = InMemoryDesignStore::default();
        let mut broken = design(2, "#fff");
        broken.pixels.pop();

        store.replace(broken.clone());

        assert_eq!(store.get().pixels.len(), 3);
    }

    #[test]
    fn test_commit_stamps_and_stores_payload() {
        // Arrange
        let store = InMemoryDesignStore::new(design(2, "#fff"));
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 13, 0, 0).unwrap();
        let payload = DesignPayload {
            grid_size: 1,
            pixels: vec!["#0f0".to_string()],
        };

        // Act
        let committed = store.commit(payload, now);

        // Assert
        assert_eq!(committed.updated_at, now);
        assert_eq!(store.get(), committed);
    }

    #[test]
    fn test_commit_with_stale_clock_keeps_stored_stamp() {
        // Arrange: a writer that read the clock before a later write landed.
        let store = InMemoryDesignStore::new(design(2, "#fff"));
        let later = Utc.with_ymd_and_hms(2026, 10, 19, 14, 0, 0).unwrap();
        let earlier = Utc.with_ymd_and_hms(2026, 10, 19, 13, 0, 0).unwrap();
        let payload = |color: &str| DesignPayload {
            grid_size: 1,
            pixels: vec![color.to_string()],
        };
        store.commit(payload("#111"), later);

        // Act
        let committed = store.commit(payload("#222"), earlier);

        // Assert
        assert_eq!(committed.updated_at, later);
        assert_eq!(store.get().updated_at, later);
        assert_eq!(store.get().pixels, vec!["#222"]);
    }

    #[test]
    fn test_concurrent_commits_never_store_an_older_stamp() {
        // Arrange
        let store = std::sync::Arc::new(InMemoryDesignStore::new(design(2, "#fff")));
        let base = Utc.with_ymd_and_hms(2026, 10, 19, 13, 0, 0).unwrap();

        // Act: each thread commits with clocks that disagree with each other.
        let workers: Vec<_> = (0..2)
            .map(|worker| {
                let store = std::sync::Arc::clone(&store);
                std::thread::spawn(move || {
                    (0..200)
                        .map(|i| {
                            let skew = if worker == 0 { i * 2 } else { 400 - i * 2 };
                            let now = base + chrono::Duration::milliseconds(skew);
                            let payload = DesignPayload {
                                grid_size: 1,
                                pixels: vec!["#fff".to_string()],
                            };
                            store.commit(payload, now).updated_at
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        let stamps: Vec<_> = workers
            .into_iter()
            .flat_map(|worker| worker.join().unwrap())
            .collect();

        // Assert
        assert_eq!(Some(&store.get().updated_at), stamps.iter().max());
    }

    #[test]
    fn test_store_recovers_from_poisoned_lock() {
        let store = std::sync::Arc::new(InMemoryDesignStore::new(design(2, "#fff")));
        let poisoner = std::sync::Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.design.write().unwrap();
            panic!("poison the lock");
        })
        .join();

        store.replace(design(1, "#000"));

        assert_eq!(store.get().grid_size, 1);
    }
}
