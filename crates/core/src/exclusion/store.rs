//! Storage backends for the serialized exclusion set.

use std::sync::Mutex;

use thiserror::Error;
use tracing::warn;

use super::entries::{decode, encode, ExclusionEntry};

/// Key under which the exclusion list is stored.
pub const EXCLUSION_KEY: &str = "blacklist";

#[derive(Debug, Error)]
pub enum ExclusionError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ExclusionError {
    fn from(e: serde_json::Error) -> Self {
        ExclusionError::Serialization(e.to_string())
    }
}

/// Durable home of the exclusion list.
pub trait ExclusionStore: Send + Sync {
    /// Stored entries. Missing or unreadable state yields an empty list.
    fn load(&self) -> Vec<ExclusionEntry>;

    /// Replace the stored entries.
    fn persist(&self, entries: &[ExclusionEntry]) -> Result<(), ExclusionError>;

    /// Read-modify-write against the latest stored state without
    /// interleaving other updates. Returns what was written.
    fn update(
        &self,
        apply: &mut dyn FnMut(Vec<ExclusionEntry>) -> Vec<ExclusionEntry>,
    ) -> Result<Vec<ExclusionEntry>, ExclusionError>;
}

/// Store keeping the serialized list in memory.
#[derive(Debug, Default)]
pub struct MemoryExclusionStore {
    raw: Mutex<Option<String>>,
}

impl MemoryExclusionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store starting from previously serialized (possibly corrupt) text.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Mutex::new(Some(raw.into())),
        }
    }

    /// Currently stored text.
    pub fn raw(&self) -> Option<String> {
        match self.raw.lock() {
            Ok(raw) => raw.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl ExclusionStore for MemoryExclusionStore {
    fn load(&self) -> Vec<ExclusionEntry> {
        self.raw().as_deref().map(decode).unwrap_or_default()
    }

    fn persist(&self, entries: &[ExclusionEntry]) -> Result<(), ExclusionError> {
        let encoded = encode(entries)?;
        let mut raw = self
            .raw
            .lock()
            .map_err(|e| ExclusionError::Database(e.to_string()))?;
        *raw = Some(encoded);
        Ok(())
    }

    fn update(
        &self,
        apply: &mut dyn FnMut(Vec<ExclusionEntry>) -> Vec<ExclusionEntry>,
    ) -> Result<Vec<ExclusionEntry>, ExclusionError> {
        let mut raw = self
            .raw
            .lock()
            .map_err(|e| ExclusionError::Database(e.to_string()))?;

        let current = raw.as_deref().map(decode).unwrap_or_default();
        let updated = apply(current);
        *raw = Some(encode(&updated)?);
        Ok(updated)
    }
}

/// Log and swallow a failed read so selection keeps working.
pub(crate) fn empty_on_error(context: &str, error: impl std::fmt::Display) -> Vec<ExclusionEntry> {
    warn!(error = %error, "{context}, treating exclusion list as empty");
    crate::metrics::EXCLUSION_LOAD_FAILURES.inc();
    Vec::new()
}
