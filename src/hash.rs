//! One-way digest service
//!
//! Produces the fixed-length hex string all stored hashes are compared
//! against. Stateless; the same input always yields the same output.

use crate::types::PasswordHash;
use sha2::{Digest, Sha256};

/// Length in hex characters of a digest produced by [`digest`]
pub const DIGEST_HEX_LEN: usize = 64;

/// Hashes a password (or any text) to its lowercase hex SHA-256 digest
pub fn digest(text: &str) -> PasswordHash {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    PasswordHash::new(hex::encode(hasher.finalize()))
}
