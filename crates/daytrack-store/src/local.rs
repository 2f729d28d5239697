//! SQLite-backed snapshot store.
//!
//! Mirrors the three logical tables as JSON blobs under fixed string keys,
//! so reads keep working when the hosted database is unreachable or never
//! configured.

use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Fixed snapshot keys, one per logical table.
pub const PROJECTS_KEY: &str = "projects";
pub const TASKS_KEY: &str = "tasks";
pub const ADHOC_TASKS_KEY: &str = "adhoc_tasks";

/// Local key/value store holding JSON mirrors of remote tables.
pub struct SnapshotStore {
    conn: Connection,
}

impl SnapshotStore {
    /// Open or create the snapshot database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (tests and ephemeral runs).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS snapshots (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                saved_at TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    /// Serialize and store a value under a fixed key.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO snapshots (key, value, saved_at) VALUES (?1, ?2, ?3)",
            params![key, json, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Load and deserialize a value, or `None` if never saved.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let json: Option<String> = self
            .conn
            .query_row("SELECT value FROM snapshots WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;

        match json {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Drop all snapshots.
    pub fn clear(&self) -> Result<()> {
        self.conn.execute("DELETE FROM snapshots", [])?;
        Ok(())
    }
}
