//! Durable key-value capability.
//!
//! [`KeyValueStore`] is the narrow interface the tombstone overlay needs: a
//! string value per string key. [`Database`] persists entries in SQLite;
//! [`MemoryKeyValueStore`] keeps them in a shared map and is meant for tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use crate::database::Database;
use crate::error::{Result, StoreError};

pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`; durable once this returns `Ok`.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// A key-value store shared between the components of one client.
pub type SharedKeyValueStore = Arc<Mutex<dyn KeyValueStore>>;

/// Wrap a store for sharing.
pub fn shared<S: KeyValueStore + 'static>(store: S) -> SharedKeyValueStore {
    Arc::new(Mutex::new(store))
}

impl KeyValueStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn()
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn().execute(
            "INSERT INTO kv_entries (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// In-memory store. Clones share the same entries, which lets a test drop a
/// client and "restart" it on the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    entries: HashMap<String, String>,
    fail_writes: bool,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set` fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.fail_writes = fail;
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|inner| inner.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let inner = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(inner.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut inner = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        if inner.fail_writes {
            return Err(StoreError::WriteRejected(key.to_string()));
        }
        inner.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
