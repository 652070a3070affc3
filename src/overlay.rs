//! Overlay contract and unlock state machine
//!
//! The blocking overlay itself (DOM, styling) is an external collaborator.
//! The core owns the control flow as an explicit state machine: the
//! presenter feeds events in and consumes the effects that come back out.
//! It never sees hashes compared or decides verification itself.
//!
//! ```text
//! NotShown --Resolve--> AwaitingInput --Submit--> Verifying
//!                            ^                        |
//!                            +----- Rejected ---------+--- Accepted --> Unlocked
//! ```

use crate::types::{PasswordHash, ScopeKey};
use crate::verify::Verdict;

/// Everything a presenter needs to pose the password challenge for a scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockChallenge {
    /// The resolved scope key the visitor must unlock
    pub scope: ScopeKey,
    /// Stored hash for that key
    pub stored_hash: PasswordHash,
    /// Master hash, if one is set
    pub master_hash: Option<PasswordHash>,
}

/// States of the unlock flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    /// Lock resolved but the overlay is not inserted yet
    NotShown,
    /// Overlay visible, waiting for a password submission
    AwaitingInput,
    /// A submission is being hashed and compared; further submits are ignored
    Verifying,
    /// Correct password supplied; the overlay is gone for this session
    Unlocked,
}

/// Events fed into the unlock flow
#[derive(Debug, Clone)]
pub enum OverlayEvent {
    /// A blocked navigation wants the overlay shown
    Resolve,
    /// The visitor submitted a password (Enter key or explicit action)
    Submit(String),
    /// The verifier finished
    VerifyResult(Verdict),
    /// The visitor asked for an unconditional page reload
    Reload,
}

/// Effects the presenter (or engine) must carry out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayEffect {
    /// Insert the blocking overlay
    Present,
    /// Run the verifier over the submitted password
    Verify(String),
    /// Record the session unlock for this scope
    RecordUnlock(ScopeKey),
    /// Remove the overlay
    Dismiss,
    /// Show the generic failure message; it never says which hash failed
    ShowFailure,
    /// Reload the page, bypassing nothing
    ReloadPage,
}

/// Renders the blocking UI and relays visitor input.
///
/// On an accepted result the presenter removes itself; on a rejection it
/// stays up, shows the generic failure message, and permits further
/// retries without lockout or backoff.
pub trait OverlayPresenter {
    /// Insert the overlay for `challenge`
    fn present(&mut self, challenge: &UnlockChallenge);

    /// Show the generic "incorrect password" message
    fn show_failure(&mut self);

    /// Remove the overlay
    fn dismiss(&mut self);

    /// Reload the page
    fn reload(&mut self);
}

/// State machine for unlocking one blocked navigation.
///
/// Once shown, the overlay persists until a correct password is entered or
/// the page is reloaded or navigated away from; abandoning the page simply
/// drops the flow.
#[derive(Debug, Clone)]
pub struct UnlockFlow {
    challenge: UnlockChallenge,
    state: OverlayState,
}

impl UnlockFlow {
    /// Creates a flow for a resolved challenge, not yet shown
    pub fn new(challenge: UnlockChallenge) -> Self {
        Self {
            challenge,
            state: OverlayState::NotShown,
        }
    }

    /// The challenge this flow is unlocking
    pub fn challenge(&self) -> &UnlockChallenge {
        &self.challenge
    }

    /// Current state
    pub fn state(&self) -> OverlayState {
        self.state
    }

    /// Applies an event, returning the effects to carry out.
    ///
    /// Invalid state/event combinations are no-ops: a second `Resolve`
    /// against a visible overlay must not insert it twice, and a `Submit`
    /// while verifying must not start a second verification.
    pub fn apply(&mut self, event: OverlayEvent) -> Vec<OverlayEffect> {
        use OverlayEvent::*;
        use OverlayState::*;

        match (self.state, event) {
            (NotShown, Resolve) => {
                self.state = AwaitingInput;
                vec![OverlayEffect::Present]
            }
            (AwaitingInput, Submit(password)) => {
                self.state = Verifying;
                vec![OverlayEffect::Verify(password)]
            }
            (Verifying, VerifyResult(Verdict::Accepted)) => {
                self.state = Unlocked;
                vec![
                    OverlayEffect::RecordUnlock(self.challenge.scope.clone()),
                    OverlayEffect::Dismiss,
                ]
            }
            (Verifying, VerifyResult(Verdict::Rejected)) => {
                self.state = AwaitingInput;
                vec![OverlayEffect::ShowFailure]
            }
            (_, Reload) => vec![OverlayEffect::ReloadPage],
            _ => vec![],
        }
    }
}
