//! Time-windowed exclusion of attempted seats.
//!
//! Seats that were submitted once stay excluded from chain discovery until
//! their entry is older than the TTL. Entries are kept in an
//! [`ExclusionStore`]; [`ExclusionManager`] applies the window on every read.

mod entries;
mod manager;
mod sqlite;
mod store;

pub use entries::{decode, encode, excluded_ids, prune, record, ExclusionEntry};
pub use manager::ExclusionManager;
pub use sqlite::SqliteExclusionStore;
pub use store::{ExclusionError, ExclusionStore, MemoryExclusionStore, EXCLUSION_KEY};
