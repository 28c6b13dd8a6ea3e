use std::{path::PathBuf, sync::Mutex};

use anyhow::{Context, Result};
use chrono::Utc;
use log::{error, info};
use rusqlite::{params, Connection};

use super::DurableStore;

/// SQLite-backed store: a single `kv` table holding one row per key.
/// A plain `Mutex<Connection>` is enough here; the tracker flushes one
/// small blob at a time.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new(db_path: PathBuf) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create database directory {}", parent.display())
            })?;
        }

        let conn = Connection::open(&db_path).context("failed to open SQLite database")?;
        if let Err(err) = conn.pragma_update(None, "journal_mode", "WAL") {
            error!("Failed to enable WAL mode: {err}");
        }

        Self::init(conn, Some(&db_path))
    }

    /// Purely in-memory database, for tests.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
        Self::init(conn, None)
    }

    fn init(conn: Connection, path: Option<&PathBuf>) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                 key TEXT PRIMARY KEY,
                 value TEXT NOT NULL,
                 updated_at TEXT NOT NULL
             )",
            [],
        )
        .context("failed to create kv table")?;

        if let Some(path) = path {
            info!("Snapshot store initialized at {}", path.display());
        }

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl DurableStore for SqliteStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let mut rows = stmt.query(params![key])?;
        if let Some(row) = rows.next()? {
            Ok(Some(row.get::<_, String>(0)?))
        } else {
            Ok(None)
        }
    }

    fn save(&self, key: &str, blob: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3",
            params![key, blob, Utc::now().to_rfc3339()],
        )
        .with_context(|| format!("failed to persist blob under key '{key}'"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_replaces_the_previous_blob() {
        let store = SqliteStore::in_memory().unwrap();
        assert!(store.load("snapshot").unwrap().is_none());

        store.save("snapshot", "first").unwrap();
        store.save("snapshot", "second").unwrap();
        assert_eq!(store.load("snapshot").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn keys_are_independent() {
        let store = SqliteStore::in_memory().unwrap();
        store.save("a", "1").unwrap();
        store.save("b", "2").unwrap();
        assert_eq!(store.load("a").unwrap().as_deref(), Some("1"));
        assert_eq!(store.load("b").unwrap().as_deref(), Some("2"));
    }
}
