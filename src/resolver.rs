//! Lock resolution for navigated locations
//!
//! Given a navigated URL and hostname plus a registry snapshot, decides
//! whether a lock applies and which scope key it is keyed under.

use crate::types::{LockSnapshot, PasswordHash, ScopeKey};

/// How a navigated location matched a registered scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeMatch {
    /// The full URL matched an exact-URL lock
    ExactUrl,
    /// The hostname matched a domain-wide lock
    Domain,
}

/// A lock that applies to a navigated location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLock {
    /// The registry key the lock is stored under
    pub scope: ScopeKey,
    /// The stored hash for that key
    pub stored_hash: PasswordHash,
    /// Whether the URL or the hostname matched
    pub matched: ScopeMatch,
}

/// Resolves which registered scope, if any, covers a navigated location.
///
/// An exact-URL entry always wins over a hostname entry: a page-specific
/// lock is never shadowed by a coarser domain lock, and a domain lock covers
/// every URL under its host unless a URL-level entry exists for that page.
/// `None` means no lock applies.
pub fn resolve(url: &str, hostname: &str, snapshot: &LockSnapshot) -> Option<ResolvedLock> {
    if let Ok(exact) = ScopeKey::new(url) {
        if let Some(hash) = snapshot.get(&exact) {
            return Some(ResolvedLock {
                scope: exact,
                stored_hash: hash.clone(),
                matched: ScopeMatch::ExactUrl,
            });
        }
    }

    let domain = ScopeKey::new(hostname).ok()?;
    snapshot.get(&domain).map(|hash| ResolvedLock {
        scope: domain.clone(),
        stored_hash: hash.clone(),
        matched: ScopeMatch::Domain,
    })
}
