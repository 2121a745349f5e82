//! # sticky-store
//!
//! Local durable storage for the sticky client, backed by SQLite.
//!
//! The only state that outlives a session is the set of notes the user has
//! hidden. The crate exposes a synchronous [`Database`] handle, a small
//! [`KeyValueStore`] capability implemented by it (and by an in-memory map for
//! tests), and the [`TombstoneStore`] built on top of that capability.

pub mod database;
pub mod kv;
pub mod migrations;
pub mod tombstones;

mod error;

pub use database::Database;
pub use error::{Result, StoreError};
pub use kv::{shared, KeyValueStore, MemoryKeyValueStore, SharedKeyValueStore};
pub use tombstones::TombstoneStore;
