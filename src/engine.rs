//! Navigation gating engine
//!
//! Orchestrates the registry, resolver, session cache, and verifier for the
//! two surfaces of the system: the per-navigation check that decides whether
//! to block, and the management operations behind the popup UI.
//!
//! ```text
//! Navigation → resolve → session cache → UnlockFlow → verify → session mark
//!                 ↓            ↓                                    ↓
//!            [Registry]   [SessionUnlockCache]              [OverlayPresenter]
//! ```

use crate::error::{LockerError, Result};
use crate::exchange::{self, ImportOutcome};
use crate::hash;
use crate::overlay::{
    OverlayEffect, OverlayEvent, OverlayPresenter, UnlockChallenge, UnlockFlow,
};
use crate::registry::LockRegistry;
use crate::resolver;
use crate::session::SessionUnlockCache;
use crate::types::ScopeKey;
use crate::verify;
use std::collections::VecDeque;
use tracing::{debug, info};

/// Result of a per-navigation check
#[derive(Debug)]
pub enum NavigationOutcome {
    /// No applicable lock, or the scope was already unlocked this session
    Unlocked,
    /// The location is locked; the caller should present the flow
    Blocked(UnlockFlow),
}

impl NavigationOutcome {
    /// Whether the navigation proceeds without an overlay
    pub fn is_unlocked(&self) -> bool {
        matches!(self, NavigationOutcome::Unlocked)
    }
}

/// Orchestrates lock resolution, verification, and session unlocks.
///
/// Owns the registry and session cache; the presenter is a consumer the
/// caller supplies per blocked navigation.
pub struct LockEngine {
    registry: LockRegistry,
    session: SessionUnlockCache,
}

impl LockEngine {
    /// Creates an engine over an opened registry and session cache
    pub fn new(registry: LockRegistry, session: SessionUnlockCache) -> Self {
        Self { registry, session }
    }

    /// The underlying registry
    pub fn registry(&self) -> &LockRegistry {
        &self.registry
    }

    /// The session unlock cache
    pub fn session(&self) -> &SessionUnlockCache {
        &self.session
    }

    /// Per-navigation entry point.
    ///
    /// Resolution order: exact-URL entry, then hostname entry, then
    /// unlocked. A resolved scope that was already unlocked this session
    /// passes without a challenge.
    pub async fn check_navigation(&self, url: &str, hostname: &str) -> Result<NavigationOutcome> {
        let snapshot = self.registry.snapshot().await?;

        let Some(resolved) = resolver::resolve(url, hostname, &snapshot) else {
            debug!(url, "no lock applies");
            return Ok(NavigationOutcome::Unlocked);
        };

        if self.session.is_unlocked(&resolved.scope) {
            debug!(scope = %resolved.scope, "already unlocked this session");
            return Ok(NavigationOutcome::Unlocked);
        }

        let master_hash = self.registry.master_hash().await?;
        info!(scope = %resolved.scope, matched = ?resolved.matched, "navigation blocked");

        Ok(NavigationOutcome::Blocked(UnlockFlow::new(UnlockChallenge {
            scope: resolved.scope,
            stored_hash: resolved.stored_hash,
            master_hash,
        })))
    }

    /// Shows the overlay for a blocked navigation.
    ///
    /// Idempotent: calling this against an already-presented flow is a no-op.
    pub fn present(&self, flow: &mut UnlockFlow, presenter: &mut dyn OverlayPresenter) {
        let effects = flow.apply(OverlayEvent::Resolve);
        self.drive(flow, effects, presenter);
    }

    /// Runs one password submission through the flow.
    ///
    /// On acceptance the session unlock is recorded before the presenter is
    /// told to dismiss; on rejection the presenter shows the generic
    /// failure message and the flow awaits the next retry.
    pub fn submit(&self, flow: &mut UnlockFlow, entered: &str, presenter: &mut dyn OverlayPresenter) {
        let effects = flow.apply(OverlayEvent::Submit(entered.to_string()));
        self.drive(flow, effects, presenter);
    }

    /// Relays the visitor's reload action
    pub fn reload(&self, flow: &mut UnlockFlow, presenter: &mut dyn OverlayPresenter) {
        let effects = flow.apply(OverlayEvent::Reload);
        self.drive(flow, effects, presenter);
    }

    /// Locks `scope` with the given plaintext password.
    ///
    /// The password is hashed exactly once; empty scope or password is
    /// rejected with nothing mutated.
    pub async fn lock_scope(&self, scope: &str, password: &str) -> Result<()> {
        let scope = ScopeKey::new(scope)?;
        let password = Self::require_password(password)?;

        self.registry.set_lock(&scope, hash::digest(password)).await
    }

    /// Removes the lock for `scope`; reported as not-found when absent
    pub async fn unlock_scope(&self, scope: &str) -> Result<()> {
        let scope = ScopeKey::new(scope)?;
        self.registry.remove_lock(&scope).await
    }

    /// Sets the master password, hashing it once
    pub async fn set_master_password(&self, password: &str) -> Result<()> {
        let password = Self::require_password(password)?;
        self.registry.set_master_hash(hash::digest(password)).await
    }

    /// Clears the master password; lock entries are unaffected
    pub async fn clear_master_password(&self) -> Result<()> {
        self.registry.clear_master_hash().await
    }

    /// Exports all lock entries as exchange text (master hash excluded)
    pub async fn export_locks(&self) -> Result<String> {
        let snapshot = self.registry.snapshot().await?;
        Ok(exchange::export_all(&snapshot))
    }

    /// Merges exchange text into the registry
    pub async fn import_locks(&self, text: &str) -> Result<ImportOutcome> {
        exchange::import_all(text, &self.registry).await
    }

    fn require_password(password: &str) -> Result<&str> {
        let password = password.trim();
        if password.is_empty() {
            return Err(LockerError::InvalidInput(
                "password must not be empty".to_string(),
            ));
        }
        Ok(password)
    }

    fn drive(
        &self,
        flow: &mut UnlockFlow,
        effects: Vec<OverlayEffect>,
        presenter: &mut dyn OverlayPresenter,
    ) {
        let mut queue: VecDeque<OverlayEffect> = effects.into();

        while let Some(effect) = queue.pop_front() {
            match effect {
                OverlayEffect::Present => presenter.present(flow.challenge()),
                OverlayEffect::Verify(password) => {
                    // The digest must complete before verification proceeds;
                    // the flow stays in Verifying until the result lands.
                    let verdict = {
                        let challenge = flow.challenge();
                        verify::verify(
                            &password,
                            &challenge.stored_hash,
                            challenge.master_hash.as_ref(),
                        )
                    };
                    queue.extend(flow.apply(OverlayEvent::VerifyResult(verdict)));
                }
                OverlayEffect::RecordUnlock(scope) => self.session.mark_unlocked(&scope),
                OverlayEffect::Dismiss => presenter.dismiss(),
                OverlayEffect::ShowFailure => presenter.show_failure(),
                OverlayEffect::ReloadPage => presenter.reload(),
            }
        }
    }
}
