//! # weblocker-core
//!
//! Engine for password-gating designated web locations (exact URLs or whole
//! domains) behind a blocking overlay until the correct credential is
//! supplied.
//!
//! ## Features
//!
//! - **Lock Registry**: persisted scope-key → password-hash mapping plus an
//!   optional master hash that unlocks any scope
//! - **Lock Resolution**: exact-URL locks take precedence over domain locks
//! - **Session Unlock Cache**: per-session unlock flags, fail-safe toward
//!   showing the overlay
//! - **Verification**: one-way SHA-256 digests, generic rejection that never
//!   reveals which candidate hash failed
//! - **Import/Export**: flat two-column CSV exchange format with
//!   merge-on-import semantics
//!
//! ## Module Structure
//!
//! ```text
//! weblocker-core/
//! ├── engine/    - Per-navigation gating and management operations
//! ├── registry/  - Lock entries and master hash over a persistent store
//! ├── resolver/  - Scope resolution with exact-URL precedence
//! ├── session/   - Session-scoped unlock flags
//! ├── verify/    - Credential verification
//! ├── exchange/  - CSV import/export with merge semantics
//! ├── overlay/   - Presenter contract and unlock state machine
//! ├── hash/      - One-way digest service
//! └── storage/   - Key-value persistence backends (memory, sled)
//! ```

pub mod engine;
pub mod error;
pub mod exchange;
pub mod hash;
pub mod overlay;
pub mod registry;
pub mod resolver;
pub mod session;
pub mod storage;
pub mod types;
pub mod verify;

pub use engine::{LockEngine, NavigationOutcome};
pub use error::{LockerError, Result};
pub use exchange::{ImportOutcome, EXPORT_FILENAME};
pub use overlay::{OverlayEffect, OverlayEvent, OverlayPresenter, OverlayState, UnlockChallenge, UnlockFlow};
pub use registry::LockRegistry;
pub use resolver::{resolve, ResolvedLock, ScopeMatch};
pub use session::{MemorySessionStore, SessionStore, SessionUnlockCache};
pub use storage::{KeyValueStore, MemoryKeyValueStore, SledKeyValueStore};
pub use types::{LockSnapshot, PasswordHash, ScopeKey};
pub use verify::{verify, Verdict};
