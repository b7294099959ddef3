use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};

use crate::progress::SnapshotStore;

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create database directory {}", parent.display())
            })?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {}", path.display()))?;
        tracing::debug!(path = %path.display(), "opened progress database");
        Ok(Self { conn })
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
        Ok(Self { conn })
    }

    pub fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv_slots (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                saved_at TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    pub fn slot_saved_at(&self, key: &str) -> Result<Option<String>> {
        let saved_at = self
            .conn
            .query_row(
                "SELECT saved_at FROM kv_slots WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(saved_at)
    }
}

impl SnapshotStore for Database {
    fn read_slot(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_slots WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("failed to read slot '{key}'"))?;
        Ok(value)
    }

    fn write_slot(&mut self, key: &str, value: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        self.conn
            .execute(
                r#"
                INSERT INTO kv_slots (key, value, saved_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    saved_at = excluded.saved_at
                "#,
                params![key, value, now],
            )
            .with_context(|| format!("failed to write slot '{key}'"))?;
        Ok(())
    }
}
