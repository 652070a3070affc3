//! Core identifier and snapshot types

use crate::error::{LockerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Identifier for a locked location.
///
/// Either a full URL (exact-match scope, e.g. `https://a.com/x`) or a bare
/// hostname (domain-wide scope, e.g. `a.com`). The registry treats the key
/// as an opaque string; which form it is only matters to the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeKey(String);

impl ScopeKey {
    /// Creates a scope key, trimming surrounding whitespace.
    ///
    /// Empty (or whitespace-only) keys are rejected.
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            return Err(LockerError::InvalidInput(
                "scope key must not be empty".to_string(),
            ));
        }
        Ok(Self(key))
    }

    /// The key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScopeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hex-encoded output of the one-way digest.
///
/// Imported hashes are carried verbatim and never re-validated against the
/// digest length or charset, matching the exchange-format contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wraps an already-hashed value
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    /// The hash as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Point-in-time view of the lock registry: scope key → stored hash
pub type LockSnapshot = HashMap<ScopeKey, PasswordHash>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_key_trims() {
        let key = ScopeKey::new("  a.com  ").unwrap();
        assert_eq!(key.as_str(), "a.com");
    }

    #[test]
    fn test_scope_key_rejects_empty() {
        assert!(ScopeKey::new("").is_err());
        assert!(ScopeKey::new("   ").is_err());
    }

    #[test]
    fn test_scope_key_as_map_key() {
        let mut snapshot = LockSnapshot::new();
        snapshot.insert(
            ScopeKey::new("a.com").unwrap(),
            PasswordHash::new("abc123"),
        );

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: LockSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
