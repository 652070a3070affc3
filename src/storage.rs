//! Persistent key-value collaborator
//!
//! The engine persists whole values under a small set of well-known keys;
//! there are no partial-field updates. Callback-style storage access maps to
//! `async fn` returning `Result`, awaited sequentially so every mutation is a
//! read-then-decide-then-write sequence.

use crate::error::{LockerError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::RwLock;

/// Store key holding the scope-key → hash mapping
pub const LOCKS_KEY: &str = "locks";

/// Store key holding the optional master hash
pub const MASTER_HASH_KEY: &str = "masterHash";

/// Whole-value persistent string store
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the whole value stored under `key`
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the whole value stored under `key`
    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Removes `key` if present; absent keys are not an error
    async fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory store implementation
///
/// Used in tests and as a stand-in when no durable backend is wired up.
#[derive(Default)]
pub struct MemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.remove(key);
        Ok(())
    }
}

/// Durable store backed by sled
pub struct SledKeyValueStore {
    db: sled::Db,
}

impl SledKeyValueStore {
    /// Opens (or creates) the store at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = sled::open(path)
            .map_err(|e| LockerError::Storage(format!("failed to open store: {}", e)))?;
        Ok(Self { db })
    }
}

#[async_trait]
impl KeyValueStore for SledKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .db
            .get(key)
            .map_err(|e| LockerError::Storage(e.to_string()))?;

        match value {
            Some(bytes) => {
                let text = String::from_utf8(bytes.to_vec()).map_err(|e| {
                    LockerError::Storage(format!("non-UTF-8 value under '{}': {}", key, e))
                })?;
                Ok(Some(text))
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.db
            .insert(key, value.into_bytes())
            .map_err(|e| LockerError::Storage(e.to_string()))?;
        self.db
            .flush_async()
            .await
            .map_err(|e| LockerError::Storage(e.to_string()))?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.db
            .remove(key)
            .map_err(|e| LockerError::Storage(e.to_string()))?;
        self.db
            .flush_async()
            .await
            .map_err(|e| LockerError::Storage(e.to_string()))?;
        Ok(())
    }
}
