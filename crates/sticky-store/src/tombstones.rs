//! Durable set of hidden note ids.
//!
//! The whole set is stored as one JSON array under `<namespace>:hidden-notes`.
//! It only grows: there is no unhide. Each [`TombstoneStore::hide`] writes the
//! complete updated set before touching the in-memory copy, so a crash right
//! after a successful hide never loses it.

use std::collections::BTreeSet;

use sticky_shared::constants::HIDDEN_NOTES_KEY;
use tracing::{debug, info};

use crate::error::{Result, StoreError};
use crate::kv::SharedKeyValueStore;

pub struct TombstoneStore {
    kv: SharedKeyValueStore,
    key: String,
    hidden: BTreeSet<String>,
}

impl TombstoneStore {
    /// Load the set for `namespace` (normally the account address). A missing
    /// entry yields an empty set; an unreadable one is an error.
    pub fn load(kv: SharedKeyValueStore, namespace: &str) -> Result<Self> {
        let key = storage_key(namespace);

        let stored = kv.lock().map_err(|_| StoreError::Poisoned)?.get(&key)?;
        let hidden = match stored {
            Some(json) => serde_json::from_str::<BTreeSet<String>>(&json).map_err(|source| {
                StoreError::Corrupt {
                    key: key.clone(),
                    source,
                }
            })?,
            None => BTreeSet::new(),
        };

        info!(key = %key, count = hidden.len(), "loaded hidden notes");

        Ok(Self { kv, key, hidden })
    }

    pub fn is_hidden(&self, id: &str) -> bool {
        self.hidden.contains(id)
    }

    /// Hide `id`. Returns `false` without writing if it was already hidden.
    pub fn hide(&mut self, id: &str) -> Result<bool> {
        if self.hidden.contains(id) {
            debug!(note = %id, "note already hidden");
            return Ok(false);
        }

        let mut updated = self.hidden.clone();
        updated.insert(id.to_string());
        let json = serde_json::to_string(&updated).map_err(|source| StoreError::Corrupt {
            key: self.key.clone(),
            source,
        })?;

        self.kv
            .lock()
            .map_err(|_| StoreError::Poisoned)?
            .set(&self.key, &json)?;

        self.hidden = updated;
        debug!(note = %id, count = self.hidden.len(), "note hidden");
        Ok(true)
    }

    pub fn all_hidden(&self) -> &BTreeSet<String> {
        &self.hidden
    }

    pub fn len(&self) -> usize {
        self.hidden.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hidden.is_empty()
    }
}

/// Key holding the hidden set of one namespace. Addresses are compared
/// case-insensitively, so the namespace is lowercased.
fn storage_key(namespace: &str) -> String {
    format!("{}:{}", namespace.to_ascii_lowercase(), HIDDEN_NOTES_KEY)
}
