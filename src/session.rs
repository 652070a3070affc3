//! Session unlock cache
//!
//! Records, for the lifetime of the current browsing session, which scopes
//! the visitor has already authenticated for. The backing store is session
//! scoped and never durable. Store failures read as "not unlocked": this
//! path fails toward showing the overlay, never toward skipping it.

use crate::error::Result;
use crate::types::ScopeKey;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Prefix for session-store keys recording an unlock
const SESSION_KEY_PREFIX: &str = "weblocker_unlocked_";

/// Literal value marking a scope as unlocked; anything else reads as locked
const UNLOCKED_VALUE: &str = "1";

/// Session-scoped string store (e.g. browser sessionStorage).
///
/// Both operations are fallible; the cache swallows failures rather than
/// letting them surface as unlocks.
pub trait SessionStore: Send + Sync {
    /// Reads the value under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes `value` under `key`
    fn set(&self, key: &str, value: String) -> Result<()>;
}

/// In-memory session store implementation
#[derive(Default)]
pub struct MemorySessionStore {
    entries: DashMap<String, String>,
}

impl MemorySessionStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    fn set(&self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// Statistics about session cache lookups
#[derive(Debug, Clone, Default)]
pub struct SessionCacheStats {
    /// Lookups answered "unlocked"
    pub hits: usize,
    /// Lookups answered "locked"
    pub misses: usize,
    /// Store failures degraded to "locked"
    pub store_failures: usize,
}

/// Per-session unlock flags, keyed by scope key.
///
/// A flag for scope K implies the visitor already supplied a password whose
/// hash matched K's stored hash or the master hash during this session.
pub struct SessionUnlockCache {
    store: Arc<dyn SessionStore>,
    stats: DashMap<&'static str, usize>,
}

impl SessionUnlockCache {
    /// Creates a cache over a session store
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            stats: DashMap::new(),
        }
    }

    /// Whether `scope` was already unlocked during this session
    pub fn is_unlocked(&self, scope: &ScopeKey) -> bool {
        match self.store.get(&Self::session_key(scope)) {
            Ok(Some(value)) if value == UNLOCKED_VALUE => {
                self.increment_stat("hits");
                true
            }
            Ok(_) => {
                self.increment_stat("misses");
                false
            }
            Err(e) => {
                warn!(scope = %scope, error = %e, "session store read failed; treating as locked");
                self.increment_stat("store_failures");
                false
            }
        }
    }

    /// Records that `scope` was unlocked for the remainder of the session.
    ///
    /// A write failure is swallowed: the scope simply stays locked and the
    /// overlay will be shown again on the next navigation.
    pub fn mark_unlocked(&self, scope: &ScopeKey) {
        if let Err(e) = self
            .store
            .set(&Self::session_key(scope), UNLOCKED_VALUE.to_string())
        {
            warn!(scope = %scope, error = %e, "session store write failed; unlock not recorded");
            self.increment_stat("store_failures");
            return;
        }

        debug!(scope = %scope, "session unlock recorded");
    }

    /// Returns cache statistics
    pub fn stats(&self) -> SessionCacheStats {
        SessionCacheStats {
            hits: self.get_stat("hits"),
            misses: self.get_stat("misses"),
            store_failures: self.get_stat("store_failures"),
        }
    }

    fn session_key(scope: &ScopeKey) -> String {
        format!("{}{}", SESSION_KEY_PREFIX, scope.as_str())
    }

    fn increment_stat(&self, key: &'static str) {
        self.stats
            .entry(key)
            .and_modify(|count| *count += 1)
            .or_insert(1);
    }

    fn get_stat(&self, key: &'static str) -> usize {
        self.stats.get(key).map(|v| *v).unwrap_or(0)
    }
}
