//! Lock Registry: owns lock entries and the master hash
//!
//! The registry is an explicitly owned service passed by reference to the
//! resolver and engine; there is no ambient global. Lock entries and the
//! master hash live under separate store keys and are read/written as whole
//! values. Clearing the master hash never touches lock entries.

use crate::error::{LockerError, Result};
use crate::storage::{KeyValueStore, LOCKS_KEY, MASTER_HASH_KEY};
use crate::types::{LockSnapshot, PasswordHash, ScopeKey};
use std::sync::Arc;
use tracing::{debug, info};

/// Mapping from locked scopes to their stored password hashes, plus the
/// single optional master hash.
pub struct LockRegistry {
    store: Arc<dyn KeyValueStore>,
}

impl LockRegistry {
    /// Opens the registry over a persistence backend.
    ///
    /// The backend is probed once up front: an unreachable backend is a
    /// startup failure, not a per-call condition.
    pub async fn open(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        store.get(LOCKS_KEY).await.map_err(|e| {
            LockerError::Storage(format!("persistence backend unavailable: {}", e))
        })?;

        Ok(Self { store })
    }

    /// Inserts or overwrites the lock entry for `scope` (last write wins)
    pub async fn set_lock(&self, scope: &ScopeKey, hash: PasswordHash) -> Result<()> {
        let mut locks = self.load_locks().await?;
        locks.insert(scope.clone(), hash);
        self.store_locks(&locks).await?;

        debug!(scope = %scope, "lock stored");
        Ok(())
    }

    /// Deletes the lock entry for `scope`.
    ///
    /// Returns [`LockerError::NotFound`] when no entry exists; nothing is
    /// mutated in that case.
    pub async fn remove_lock(&self, scope: &ScopeKey) -> Result<()> {
        let mut locks = self.load_locks().await?;

        if locks.remove(scope).is_none() {
            return Err(LockerError::NotFound(scope.to_string()));
        }

        self.store_locks(&locks).await?;
        info!(scope = %scope, "lock removed");
        Ok(())
    }

    /// Full current mapping as a snapshot for resolution and export
    pub async fn snapshot(&self) -> Result<LockSnapshot> {
        self.load_locks().await
    }

    /// All lock entries in ascending scope-key order (stable for display)
    pub async fn list_locks(&self) -> Result<Vec<(ScopeKey, PasswordHash)>> {
        let locks = self.load_locks().await?;

        let mut entries: Vec<(ScopeKey, PasswordHash)> = locks.into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        Ok(entries)
    }

    /// Sets the master hash, replacing any previous value (idempotent)
    pub async fn set_master_hash(&self, hash: PasswordHash) -> Result<()> {
        self.store
            .set(MASTER_HASH_KEY, hash.as_str().to_string())
            .await?;

        info!("master hash set");
        Ok(())
    }

    /// Clears the master hash; a no-op when none is set
    pub async fn clear_master_hash(&self) -> Result<()> {
        self.store.remove(MASTER_HASH_KEY).await?;

        info!("master hash cleared");
        Ok(())
    }

    /// The current master hash, if one is set
    pub async fn master_hash(&self) -> Result<Option<PasswordHash>> {
        Ok(self
            .store
            .get(MASTER_HASH_KEY)
            .await?
            .map(PasswordHash::new))
    }

    async fn load_locks(&self) -> Result<LockSnapshot> {
        match self.store.get(LOCKS_KEY).await? {
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|e| LockerError::Storage(format!("corrupt lock mapping: {}", e))),
            None => Ok(LockSnapshot::new()),
        }
    }

    async fn store_locks(&self, locks: &LockSnapshot) -> Result<()> {
        let raw = serde_json::to_string(locks)
            .map_err(|e| LockerError::Storage(e.to_string()))?;
        self.store.set(LOCKS_KEY, raw).await
    }
}
