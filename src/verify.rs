//! Credential verification
//!
//! Decides authentic vs rejected for a submitted password. A rejection is a
//! normal negative result, not an error, and never reveals whether the scope
//! hash or the master hash was the failing candidate.

use crate::hash;
use crate::types::PasswordHash;

/// Outcome of a verification attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The password's digest matched the stored hash or the master hash
    Accepted,
    /// Neither candidate matched; surface a generic failure only
    Rejected,
}

impl Verdict {
    /// Whether this verdict unlocks the scope
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }
}

/// Verifies an entered password against a scope's stored hash and the
/// optional master hash.
///
/// The digest is computed exactly once and compared against both candidates.
/// Comparison is plain equality; constant-structure comparison is a
/// hardening option, not required for correctness.
pub fn verify(
    entered: &str,
    stored_hash: &PasswordHash,
    master_hash: Option<&PasswordHash>,
) -> Verdict {
    let entered_hash = hash::digest(entered);

    if entered_hash == *stored_hash {
        return Verdict::Accepted;
    }

    if let Some(master) = master_hash {
        if entered_hash == *master {
            return Verdict::Accepted;
        }
    }

    Verdict::Rejected
}
