//! Storage layer for juno
//!
//! The journal persists everything as text values under string keys. This
//! module provides:
//! - The [`KeyValueStore`] seam the journal is written against
//! - [`SqliteStore`], the durable backend (schema migrations via `PRAGMA user_version`)
//! - [`MemoryStore`], an in-process backend for tests and ephemeral use
//! - [`keys`], the logical key space

pub mod keys;
pub mod memory;
pub mod schema;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::Result;

/// Durable string-keyed text storage.
///
/// A read miss is `Ok(None)`, never an error. Implementations must be safe to
/// share across threads; the journal serializes its own read-modify-write
/// sequences on top of this.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or replace the value under `key`
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Write several keys so that either all or none of them land
    fn set_many(&self, entries: &[(String, String)]) -> Result<()>;

    /// Delete `key`; deleting a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;

    /// All stored keys, in ascending order
    fn keys(&self) -> Result<Vec<String>>;

    /// Delete every key
    fn clear(&self) -> Result<()>;
}
