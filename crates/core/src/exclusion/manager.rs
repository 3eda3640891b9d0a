//! TTL-aware access to the persisted exclusion set.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use super::entries::{excluded_ids, prune, record, ExclusionEntry};
use super::store::{ExclusionError, ExclusionStore};
use crate::config::ExclusionConfig;
use crate::metrics::{EXCLUSIONS_PRUNED, EXCLUSIONS_RECORDED};
use crate::seating::SeatId;

/// Exclusion list of one store with its time window.
///
/// Every read prunes expired entries first and writes the pruned list back,
/// so callers always see the ids that are excluded right now.
#[derive(Clone)]
pub struct ExclusionManager {
    store: Arc<dyn ExclusionStore>,
    ttl: Duration,
}

impl ExclusionManager {
    pub fn new(store: Arc<dyn ExclusionStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn from_config(store: Arc<dyn ExclusionStore>, config: &ExclusionConfig) -> Self {
        Self::new(store, config.ttl())
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Entries still active at `now`.
    ///
    /// Never fails: if the pruned list cannot be written back, the pruned
    /// view of the stored list is returned anyway.
    pub fn entries(&self, now: DateTime<Utc>) -> Vec<ExclusionEntry> {
        let ttl = self.ttl;
        let mut removed = 0usize;

        let result = self.store.update(&mut |entries| {
            let before = entries.len();
            let kept = prune(entries, now, ttl);
            removed = before - kept.len();
            kept
        });

        match result {
            Ok(kept) => {
                if removed > 0 {
                    debug!(removed, remaining = kept.len(), "Pruned expired exclusions");
                    EXCLUSIONS_PRUNED.inc_by(removed as u64);
                }
                kept
            }
            Err(e) => {
                warn!(error = %e, "Failed to write pruned exclusions, using stored view");
                prune(self.store.load(), now, ttl)
            }
        }
    }

    /// Ids excluded at `now`.
    pub fn active_ids(&self, now: DateTime<Utc>) -> HashSet<SeatId> {
        excluded_ids(&self.entries(now))
    }

    /// Exclude `ids` starting at `now`. Returns the stored list.
    pub fn record(
        &self,
        ids: &[SeatId],
        now: DateTime<Utc>,
    ) -> Result<Vec<ExclusionEntry>, ExclusionError> {
        if ids.is_empty() {
            return Ok(self.entries(now));
        }

        let ttl = self.ttl;
        let stored = self
            .store
            .update(&mut |entries| record(prune(entries, now, ttl), ids, now))?;

        let distinct = ids.iter().collect::<HashSet<_>>().len();
        EXCLUSIONS_RECORDED.inc_by(distinct as u64);
        info!(recorded = distinct, total = stored.len(), "Recorded exclusions");

        Ok(stored)
    }

    /// Remove every entry.
    pub fn clear(&self) -> Result<(), ExclusionError> {
        self.store.persist(&[])?;
        info!("Cleared exclusion list");
        Ok(())
    }
}

impl std::fmt::Debug for ExclusionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExclusionManager")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
