//! SQLite-backed exclusion store.
//!
//! The list lives as one JSON document in a small key-value table, under the
//! same key and layout the browser extension kept in local storage.

use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

use super::entries::{decode, encode, ExclusionEntry};
use super::store::{empty_on_error, ExclusionError, ExclusionStore, EXCLUSION_KEY};

/// SQLite-backed exclusion store.
pub struct SqliteExclusionStore {
    conn: Mutex<Connection>,
}

impl SqliteExclusionStore {
    /// Open (or create) the database file and its tables.
    pub fn new(path: &Path) -> Result<Self, ExclusionError> {
        let conn = Connection::open(path).map_err(|e| ExclusionError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite exclusion store (useful for testing).
    pub fn in_memory() -> Result<Self, ExclusionError> {
        let conn =
            Connection::open_in_memory().map_err(|e| ExclusionError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), ExclusionError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .map_err(|e| ExclusionError::Database(e.to_string()))?;

        Ok(())
    }

    /// Overwrite the stored text as-is. Used to seed state in tests and
    /// migrations.
    pub fn put_raw(&self, raw: &str) -> Result<(), ExclusionError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ExclusionError::Database(e.to_string()))?;
        write_raw(&conn, raw).map_err(|e| ExclusionError::Database(e.to_string()))
    }
}

fn read_raw(conn: &Connection) -> rusqlite::Result<Option<String>> {
    conn.query_row(
        "SELECT value FROM kv_store WHERE key = ?1",
        params![EXCLUSION_KEY],
        |row| row.get(0),
    )
    .optional()
}

fn write_raw(conn: &Connection, raw: &str) -> rusqlite::Result<()> {
    conn.execute(
        r#"
        INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
        "#,
        params![EXCLUSION_KEY, raw, Utc::now().to_rfc3339()],
    )?;
    Ok(())
}

impl ExclusionStore for SqliteExclusionStore {
    fn load(&self) -> Vec<ExclusionEntry> {
        let conn = match self.conn.lock() {
            Ok(conn) => conn,
            Err(e) => return empty_on_error("Exclusion store lock poisoned", e),
        };

        match read_raw(&conn) {
            Ok(Some(raw)) => decode(&raw),
            Ok(None) => Vec::new(),
            Err(e) => empty_on_error("Failed to read exclusion list", e),
        }
    }

    fn persist(&self, entries: &[ExclusionEntry]) -> Result<(), ExclusionError> {
        let encoded = encode(entries)?;
        let conn = self
            .conn
            .lock()
            .map_err(|e| ExclusionError::Database(e.to_string()))?;
        write_raw(&conn, &encoded).map_err(|e| ExclusionError::Database(e.to_string()))
    }

    fn update(
        &self,
        apply: &mut dyn FnMut(Vec<ExclusionEntry>) -> Vec<ExclusionEntry>,
    ) -> Result<Vec<ExclusionEntry>, ExclusionError> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| ExclusionError::Database(e.to_string()))?;

        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| ExclusionError::Database(e.to_string()))?;

        let current = match read_raw(&tx) {
            Ok(raw) => raw.as_deref().map(decode).unwrap_or_default(),
            Err(e) => empty_on_error("Failed to read exclusion list", e),
        };

        let updated = apply(current);
        let encoded = encode(&updated)?;

        write_raw(&tx, &encoded).map_err(|e| ExclusionError::Database(e.to_string()))?;
        tx.commit()
            .map_err(|e| ExclusionError::Database(e.to_string()))?;

        Ok(updated)
    }
}
