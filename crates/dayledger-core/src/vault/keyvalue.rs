//! Key-value tier: a SQLite `kv` table holding one JSON envelope per
//! resource.
//!
//! Keys are namespaced with a fixed prefix so vault entries cannot collide
//! with unrelated keys sharing the store. The envelope carries the content
//! string plus the metadata the durable tier would get from the filesystem.

use std::path::Path;
use std::sync::Mutex;

use chrono::{TimeZone, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use crate::error::VaultError;

use super::VaultEntry;

const KEY_PREFIX: &str = "dayledger.vault.";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct Envelope {
    pub content: String,
    /// Epoch milliseconds.
    pub last_modified: i64,
    pub size: u64,
    pub mime_type: String,
}

#[derive(Debug)]
pub(super) struct KvStore {
    conn: Mutex<Connection>,
}

impl KvStore {
    pub(super) fn open(path: &Path) -> Result<Self, VaultError> {
        let conn = Connection::open(path)?;
        Self::from_conn(conn)
    }

    /// In-memory store, used when even the on-disk kv file is unusable
    /// and by tests.
    pub(super) fn open_memory() -> Result<Self, VaultError> {
        Self::from_conn(Connection::open_in_memory()?)
    }

    fn from_conn(conn: Connection) -> Result<Self, VaultError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn key(name: &str) -> String {
        format!("{KEY_PREFIX}{name}")
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub(super) fn set(&self, name: &str, content: &str, mime_type: &str) -> Result<(), VaultError> {
        let envelope = Envelope {
            size: content.len() as u64,
            content: content.to_string(),
            last_modified: Utc::now().timestamp_millis(),
            mime_type: mime_type.to_string(),
        };
        let value = serde_json::to_string(&envelope).map_err(|e| VaultError::Malformed {
            name: name.to_string(),
            message: e.to_string(),
        })?;
        self.lock().execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![Self::key(name), value],
        )?;
        Ok(())
    }

    pub(super) fn get(&self, name: &str) -> Result<Option<Envelope>, VaultError> {
        let conn = self.lock();
        let mut stmt = conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let row = stmt.query_row(params![Self::key(name)], |row| row.get::<_, String>(0));
        match row {
            Ok(value) => {
                let envelope =
                    serde_json::from_str(&value).map_err(|e| VaultError::Malformed {
                        name: name.to_string(),
                        message: e.to_string(),
                    })?;
                Ok(Some(envelope))
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub(super) fn delete(&self, name: &str) -> Result<bool, VaultError> {
        let changed = self.lock().execute(
            "DELETE FROM kv WHERE key = ?1",
            params![Self::key(name)],
        )?;
        Ok(changed > 0)
    }

    pub(super) fn list(&self) -> Result<Vec<VaultEntry>, VaultError> {
        let conn = self.lock();
        let mut stmt = conn.prepare("SELECT key, value FROM kv WHERE key LIKE ?1")?;
        let rows = stmt.query_map(params![format!("{KEY_PREFIX}%")], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (key, value) = row?;
            let name = key.trim_start_matches(KEY_PREFIX).to_string();
            // A malformed envelope makes that entry invisible, not fatal.
            match serde_json::from_str::<Envelope>(&value) {
                Ok(envelope) => entries.push(VaultEntry {
                    name,
                    last_modified: Utc
                        .timestamp_millis_opt(envelope.last_modified)
                        .single()
                        .unwrap_or_else(Utc::now),
                    size: envelope.size,
                    mime_type: envelope.mime_type,
                }),
                Err(e) => {
                    tracing::warn!(name, error = %e, "skipping malformed kv entry");
                }
            }
        }
        Ok(entries)
    }
}
