use crate::dlog;
use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::HashMap;
use std::path::Path;

/// Durable string key-value store, scoped to one application origin.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// Session-only store; what the app falls back to when the durable one
/// cannot be opened.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// SQLite-backed store. Several origins can share one file; each only sees
/// its own rows.
pub struct SqliteStore {
    conn: Connection,
    scope: String,
}

impl SqliteStore {
    pub fn open(db_path: &Path, scope: &str) -> Result<Self> {
        let display = db_path.display();
        let conn =
            Connection::open(db_path).with_context(|| format!("Opening SQLite DB: {display}"))?;
        Self::with_connection(conn, scope)
    }

    pub fn in_memory(scope: &str) -> Result<Self> {
        let conn = Connection::open_in_memory().context("Opening in-memory SQLite DB")?;
        Self::with_connection(conn, scope)
    }

    fn with_connection(conn: Connection, scope: &str) -> Result<Self> {
        let existed = table_exists(&conn, "kv_store")?;
        conn.execute_batch(
            r"
            CREATE TABLE IF NOT EXISTS kv_store (
              scope  TEXT NOT NULL,
              key    TEXT NOT NULL,
              value  TEXT NOT NULL,
              PRIMARY KEY (scope, key)
            );
            ",
        )
        .context("Ensuring kv_store schema")?;
        dlog!("sqlite_store_ready scope={scope} existed={existed}");

        Ok(Self {
            conn,
            scope: scope.to_string(),
        })
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM kv_store WHERE scope = ?1 AND key = ?2",
                params![self.scope, key],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("Reading key {key:?}"))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                r"
                INSERT INTO kv_store (scope, key, value) VALUES (?1, ?2, ?3)
                ON CONFLICT (scope, key) DO UPDATE SET value = excluded.value
                ",
                params![self.scope, key, value],
            )
            .with_context(|| format!("Writing key {key:?}"))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.conn
            .execute(
                "DELETE FROM kv_store WHERE scope = ?1 AND key = ?2",
                params![self.scope, key],
            )
            .with_context(|| format!("Removing key {key:?}"))?;
        Ok(())
    }
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let mut stmt =
        conn.prepare("SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1 LIMIT 1")?;
    let mut rows = stmt.query([table])?;
    Ok(rows.next()?.is_some())
}
