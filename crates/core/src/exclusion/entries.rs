//! Exclusion entries and the pure operations over them.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::lenient::u64_from_any;
use crate::metrics::EXCLUSION_LOAD_FAILURES;
use crate::seating::SeatId;

/// A seat that was attempted at `timestamp`.
///
/// Serialized as `{"id": 12, "timestamp": 1700000000000}` with the timestamp
/// in epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionEntry {
    #[serde(deserialize_with = "u64_from_any")]
    pub id: SeatId,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl ExclusionEntry {
    pub fn new(id: SeatId, timestamp: DateTime<Utc>) -> Self {
        Self { id, timestamp }
    }

    /// Whether the entry still applies at `now`.
    pub fn is_active(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.timestamp < ttl
    }
}

/// Keep the entries with `now - timestamp < ttl`.
pub fn prune(mut entries: Vec<ExclusionEntry>, now: DateTime<Utc>, ttl: Duration) -> Vec<ExclusionEntry> {
    entries.retain(|entry| entry.is_active(now, ttl));
    entries
}

/// Append a fresh entry stamped `now` for every id in `ids`.
///
/// Older entries for the same ids are replaced so each id appears once and
/// its window restarts.
pub fn record(
    mut entries: Vec<ExclusionEntry>,
    ids: &[SeatId],
    now: DateTime<Utc>,
) -> Vec<ExclusionEntry> {
    let fresh: HashSet<SeatId> = ids.iter().copied().collect();
    entries.retain(|entry| !fresh.contains(&entry.id));

    let mut seen = HashSet::new();
    entries.extend(
        ids.iter()
            .filter(|id| seen.insert(**id))
            .map(|id| ExclusionEntry::new(*id, now)),
    );
    entries
}

/// Id projection of a set of entries.
pub fn excluded_ids(entries: &[ExclusionEntry]) -> HashSet<SeatId> {
    entries.iter().map(|entry| entry.id).collect()
}

/// Read stored entries.
///
/// Text that is not a JSON list yields no entries; list items that are not
/// valid entries are skipped.
pub fn decode(raw: &str) -> Vec<ExclusionEntry> {
    let items = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items,
        Ok(_) => {
            warn!("Stored exclusion state is not a list, treating as empty");
            EXCLUSION_LOAD_FAILURES.inc();
            return Vec::new();
        }
        Err(e) => {
            warn!(error = %e, "Stored exclusion state is not valid JSON, treating as empty");
            EXCLUSION_LOAD_FAILURES.inc();
            return Vec::new();
        }
    };

    let total = items.len();
    let entries: Vec<ExclusionEntry> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();

    if entries.len() < total {
        debug!(skipped = total - entries.len(), "Skipped malformed exclusion entries");
    }

    entries
}

/// Serialize entries for storage.
pub fn encode(entries: &[ExclusionEntry]) -> Result<String, serde_json::Error> {
    serde_json::to_string(entries)
}
