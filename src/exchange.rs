//! Flat two-column exchange format for the lock registry
//!
//! One record per line, `scope,hash`, no header. Fields are quoted
//! RFC-4180-style: a field containing the delimiter, a quote, or a line
//! break is wrapped in double quotes, with embedded quotes doubled. The
//! master hash never leaves through this surface; the export carries
//! scope-level secrets only.

use crate::error::{LockerError, Result};
use crate::registry::LockRegistry;
use crate::types::{LockSnapshot, PasswordHash, ScopeKey};
use tracing::{debug, info};

/// Conventional filename for exported registries
pub const EXPORT_FILENAME: &str = "weblocker-locks.csv";

const FIELD_DELIMITER: char = ',';
const QUOTE: char = '"';

/// Outcome of a successful import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    /// Number of distinct scopes applied to the registry
    pub applied: usize,
}

/// Serializes a registry snapshot to exchange text.
///
/// Lines are emitted in ascending scope-key order, so a given snapshot
/// always exports identically.
pub fn export_all(snapshot: &LockSnapshot) -> String {
    let mut entries: Vec<(&ScopeKey, &PasswordHash)> = snapshot.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    entries
        .iter()
        .map(|(scope, hash)| {
            format!(
                "{}{}{}",
                escape_field(scope.as_str()),
                FIELD_DELIMITER,
                escape_field(hash.as_str())
            )
        })
        .collect::<Vec<String>>()
        .join("\n")
}

/// Parses exchange text into (scope, hash) rows.
///
/// A line is valid iff it yields at least two fields; surplus fields are
/// ignored and blank lines are skipped. Later rows for the same scope win.
/// Hash values are carried verbatim, never re-hashed or validated. Zero
/// valid rows is an error.
pub fn parse(text: &str) -> Result<Vec<(ScopeKey, PasswordHash)>> {
    let mut rows: Vec<(ScopeKey, PasswordHash)> = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields = parse_line(line);
        if fields.len() < 2 {
            debug!(line, "skipping line with fewer than two fields");
            continue;
        }

        let Ok(scope) = ScopeKey::new(fields[0].as_str()) else {
            continue;
        };
        let hash = PasswordHash::new(fields[1].as_str());

        // Last occurrence of a scope wins
        if let Some(existing) = rows.iter_mut().find(|(s, _)| *s == scope) {
            existing.1 = hash;
        } else {
            rows.push((scope, hash));
        }
    }

    if rows.is_empty() {
        return Err(LockerError::Import("no valid rows found".to_string()));
    }

    Ok(rows)
}

/// Parses exchange text and merges every valid row into the registry.
///
/// Existing scopes absent from the text are left untouched; scopes present
/// in both are overwritten. Zero valid rows is an error and leaves the
/// registry unchanged.
pub async fn import_all(text: &str, registry: &LockRegistry) -> Result<ImportOutcome> {
    let rows = parse(text)?;
    let applied = rows.len();

    for (scope, hash) in rows {
        registry.set_lock(&scope, hash).await?;
    }

    info!(applied, "import merged into registry");
    Ok(ImportOutcome { applied })
}

fn escape_field(field: &str) -> String {
    if field.contains([FIELD_DELIMITER, QUOTE, '\n', '\r']) {
        let doubled = field.replace(QUOTE, "\"\"");
        format!("{}{}{}", QUOTE, doubled, QUOTE)
    } else {
        field.to_string()
    }
}

fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            QUOTE => {
                if in_quotes && chars.peek() == Some(&QUOTE) {
                    current.push(QUOTE);
                    chars.next();
                } else {
                    in_quotes = !in_quotes;
                }
            }
            FIELD_DELIMITER if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    fields.push(current);

    fields.into_iter().map(|f| f.trim().to_string()).collect()
}
