//! Local state storage trait and its SQLite and in-memory implementations.

use chrono::{DateTime, Utc};
use color_eyre::{eyre::eyre, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

/// Errors from the local storage layer. Never surfaced to the UI.
#[derive(Error, Debug)]
pub enum PersistenceError {
  #[error("storage error: {0}")]
  Storage(#[from] rusqlite::Error),

  #[error("encoding error: {0}")]
  Encode(#[from] serde_json::Error),

  #[error("lock poisoned")]
  Lock,
}

/// Trait for key/value storage backends holding serialized state.
pub trait StateStorage: Send + Sync {
  /// Read the blob stored under `key`.
  fn read(&self, key: &str) -> Result<Option<Vec<u8>>, PersistenceError>;

  /// Replace the blob stored under `key`.
  fn write(&self, key: &str, data: &[u8]) -> Result<(), PersistenceError>;

  /// When `key` was last written, if the backend tracks it.
  fn saved_at(&self, _key: &str) -> Result<Option<DateTime<Utc>>, PersistenceError> {
    Ok(None)
  }
}

impl<T: StateStorage + ?Sized> StateStorage for std::sync::Arc<T> {
  fn read(&self, key: &str) -> Result<Option<Vec<u8>>, PersistenceError> {
    (**self).read(key)
  }

  fn write(&self, key: &str, data: &[u8]) -> Result<(), PersistenceError> {
    (**self).write(key, data)
  }

  fn saved_at(&self, key: &str) -> Result<Option<DateTime<Utc>>, PersistenceError> {
    (**self).saved_at(key)
  }
}

/// Storage that keeps everything in a process-local map.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryStorage {
  entries: Mutex<std::collections::HashMap<String, Vec<u8>>>,
}

#[cfg(test)]
impl MemoryStorage {
  pub fn new() -> Self {
    Self::default()
  }
}

#[cfg(test)]
impl StateStorage for MemoryStorage {
  fn read(&self, key: &str) -> Result<Option<Vec<u8>>, PersistenceError> {
    let entries = self.entries.lock().map_err(|_| PersistenceError::Lock)?;
    Ok(entries.get(key).cloned())
  }

  fn write(&self, key: &str, data: &[u8]) -> Result<(), PersistenceError> {
    let mut entries = self.entries.lock().map_err(|_| PersistenceError::Lock)?;
    entries.insert(key.to_string(), data.to_vec());
    Ok(())
  }
}

/// SQLite-based state storage implementation.
pub struct SqliteStorage {
  conn: Mutex<Connection>,
}

impl SqliteStorage {
  /// Open the state database at `path`, or the default location.
  pub fn open(path: Option<&Path>) -> Result<Self> {
    let path = match path {
      Some(p) => p.to_path_buf(),
      None => Self::default_path()?,
    };

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .map_err(|e| eyre!("Failed to create state directory: {}", e))?;
    }

    let conn = Connection::open(&path)
      .map_err(|e| eyre!("Failed to open state database at {}: {}", path.display(), e))?;

    Self::with_connection(conn)
  }

  /// Open a throwaway in-memory database.
  pub fn open_in_memory() -> Result<Self> {
    let conn = Connection::open_in_memory()
      .map_err(|e| eyre!("Failed to open in-memory database: {}", e))?;
    Self::with_connection(conn)
  }

  fn with_connection(conn: Connection) -> Result<Self> {
    conn
      .execute_batch(STATE_SCHEMA)
      .map_err(|e| eyre!("Failed to run state migrations: {}", e))?;

    Ok(Self {
      conn: Mutex::new(conn),
    })
  }

  /// Get the default database path.
  fn default_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(data_dir.join("datapad").join("state.db"))
  }
}

/// Schema for the state table.
const STATE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS local_state (
    key TEXT PRIMARY KEY,
    data BLOB NOT NULL,
    saved_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

impl StateStorage for SqliteStorage {
  fn read(&self, key: &str) -> Result<Option<Vec<u8>>, PersistenceError> {
    let conn = self.conn.lock().map_err(|_| PersistenceError::Lock)?;

    let data = conn
      .query_row(
        "SELECT data FROM local_state WHERE key = ?",
        params![key],
        |row| row.get(0),
      )
      .optional()?;

    Ok(data)
  }

  fn write(&self, key: &str, data: &[u8]) -> Result<(), PersistenceError> {
    let conn = self.conn.lock().map_err(|_| PersistenceError::Lock)?;

    conn.execute(
      "INSERT OR REPLACE INTO local_state (key, data, saved_at)
       VALUES (?, ?, datetime('now'))",
      params![key, data],
    )?;

    Ok(())
  }

  fn saved_at(&self, key: &str) -> Result<Option<DateTime<Utc>>, PersistenceError> {
    let conn = self.conn.lock().map_err(|_| PersistenceError::Lock)?;

    let saved_at: Option<String> = conn
      .query_row(
        "SELECT saved_at FROM local_state WHERE key = ?",
        params![key],
        |row| row.get(0),
      )
      .optional()?;

    Ok(saved_at.and_then(|s| parse_datetime(&s)))
  }
}

/// Parse a datetime string from SQLite format ("YYYY-MM-DD HH:MM:SS").
fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
  chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
    .map(|dt| dt.and_utc())
    .ok()
}
