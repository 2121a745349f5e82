//! Client configuration loaded from environment variables.
//!
//! All settings have defaults so the client can start with zero
//! configuration for local development.

use std::path::PathBuf;

use sticky_store::{Database, StoreError};

use crate::view::SortMode;

/// Capacity of the board event channel when `STICKY_EVENT_CAPACITY` is unset.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// SQLite file holding the hidden-note overlay.
    /// Env: `STICKY_DB_PATH`
    /// Default: `sticky.db` in the platform data directory.
    pub db_path: Option<PathBuf>,

    /// Ordering used until the viewer picks one.
    /// Env: `STICKY_DEFAULT_SORT` (`newest` / `oldest` / `color` / `size`)
    /// Default: `newest`
    pub default_sort: SortMode,

    /// Buffered board events per subscriber before slow ones start lagging.
    /// Env: `STICKY_EVENT_CAPACITY`
    /// Default: `256`
    pub event_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            default_sort: SortMode::Newest,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = lookup("STICKY_DB_PATH") {
            if !path.is_empty() {
                config.db_path = Some(PathBuf::from(path));
            }
        }

        if let Some(value) = lookup("STICKY_DEFAULT_SORT") {
            match value.parse::<SortMode>() {
                Ok(sort) => config.default_sort = sort,
                Err(e) => tracing::warn!(error = %e, "Invalid STICKY_DEFAULT_SORT, using default"),
            }
        }

        if let Some(value) = lookup("STICKY_EVENT_CAPACITY") {
            match value.parse::<usize>() {
                Ok(n) if n > 0 => config.event_capacity = n,
                _ => tracing::warn!(value = %value, "Invalid STICKY_EVENT_CAPACITY, using default"),
            }
        }

        config
    }

    /// Open the configured database (the platform default when unset).
    pub fn open_database(&self) -> Result<Database, StoreError> {
        match &self.db_path {
            Some(path) => Database::open_at(path),
            None => Database::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> ClientConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_default_config() {
        let config = config_from(&[]);
        assert!(config.db_path.is_none());
        assert_eq!(config.default_sort, SortMode::Newest);
        assert_eq!(config.event_capacity, DEFAULT_EVENT_CAPACITY);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("STICKY_DB_PATH", "/tmp/notes.db"),
            ("STICKY_DEFAULT_SORT", "color"),
            ("STICKY_EVENT_CAPACITY", "16"),
        ]);
        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/notes.db")));
        assert_eq!(config.default_sort, SortMode::Color);
        assert_eq!(config.event_capacity, 16);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            ("STICKY_DEFAULT_SORT", "sideways"),
            ("STICKY_EVENT_CAPACITY", "0"),
        ]);
        assert_eq!(config.default_sort, SortMode::Newest);
        assert_eq!(config.event_capacity, DEFAULT_EVENT_CAPACITY);
    }

    #[test]
    fn test_open_configured_database() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig {
            db_path: Some(dir.path().join("sticky.db")),
            ..ClientConfig::default()
        };
        assert!(config.open_database().unwrap().path().is_some());
    }
}
