//! End-to-end tests for the navigation gating pipeline:
//! resolution → session cache → overlay flow → verification → session mark

use std::sync::Arc;

use weblocker_core::{
    LockEngine, LockRegistry, LockerError, MemoryKeyValueStore, MemorySessionStore,
    NavigationOutcome, OverlayPresenter, SessionUnlockCache, SledKeyValueStore,
    UnlockChallenge,
};

/// Presenter double that records the calls it receives
#[derive(Default)]
struct RecordingPresenter {
    calls: Vec<String>,
}

impl OverlayPresenter for RecordingPresenter {
    fn present(&mut self, challenge: &UnlockChallenge) {
        self.calls.push(format!("present:{}", challenge.scope));
    }

    fn show_failure(&mut self) {
        self.calls.push("failure".to_string());
    }

    fn dismiss(&mut self) {
        self.calls.push("dismiss".to_string());
    }

    fn reload(&mut self) {
        self.calls.push("reload".to_string());
    }
}

async fn engine() -> LockEngine {
    let registry = LockRegistry::open(Arc::new(MemoryKeyValueStore::new()))
        .await
        .unwrap();
    let session = SessionUnlockCache::new(Arc::new(MemorySessionStore::new()));
    LockEngine::new(registry, session)
}

fn blocked(outcome: NavigationOutcome) -> weblocker_core::UnlockFlow {
    match outcome {
        NavigationOutcome::Blocked(flow) => flow,
        NavigationOutcome::Unlocked => panic!("expected blocked navigation"),
    }
}

#[tokio::test]
async fn test_domain_lock_blocks_every_page_under_host() -> anyhow::Result<()> {
    let engine = engine().await;
    engine.lock_scope("a.com", "secret").await?;

    for url in ["https://a.com/", "https://a.com/x", "https://a.com/deep/page"] {
        let outcome = engine.check_navigation(url, "a.com").await?;
        let flow = blocked(outcome);
        assert_eq!(flow.challenge().scope.as_str(), "a.com");
    }

    assert!(engine
        .check_navigation("https://b.com/", "b.com")
        .await?
        .is_unlocked());

    Ok(())
}

#[tokio::test]
async fn test_exact_url_lock_takes_precedence() -> anyhow::Result<()> {
    let engine = engine().await;
    engine.lock_scope("https://a.com/x", "page-pw").await?;
    engine.lock_scope("a.com", "domain-pw").await?;

    let flow = blocked(engine.check_navigation("https://a.com/x", "a.com").await?);
    assert_eq!(flow.challenge().scope.as_str(), "https://a.com/x");

    let flow = blocked(engine.check_navigation("https://a.com/y", "a.com").await?);
    assert_eq!(flow.challenge().scope.as_str(), "a.com");

    Ok(())
}

#[tokio::test]
async fn test_unlock_is_cached_for_the_session() -> anyhow::Result<()> {
    let engine = engine().await;
    engine.lock_scope("a.com", "secret").await?;

    let mut flow = blocked(engine.check_navigation("https://a.com/x", "a.com").await?);
    let mut presenter = RecordingPresenter::default();
    engine.present(&mut flow, &mut presenter);
    engine.submit(&mut flow, "secret", &mut presenter);

    assert_eq!(presenter.calls, vec!["present:a.com", "dismiss"]);

    // Same scope resolves as unlocked for the rest of the session
    assert!(engine
        .check_navigation("https://a.com/x", "a.com")
        .await?
        .is_unlocked());
    assert!(engine
        .check_navigation("https://a.com/other", "a.com")
        .await?
        .is_unlocked());

    Ok(())
}

#[tokio::test]
async fn test_session_unlock_does_not_leak_across_scopes() -> anyhow::Result<()> {
    let engine = engine().await;
    engine.lock_scope("a.com", "secret").await?;
    engine.lock_scope("b.com", "secret").await?;

    let mut flow = blocked(engine.check_navigation("https://a.com/", "a.com").await?);
    let mut presenter = RecordingPresenter::default();
    engine.present(&mut flow, &mut presenter);
    engine.submit(&mut flow, "secret", &mut presenter);

    assert!(engine
        .check_navigation("https://a.com/", "a.com")
        .await?
        .is_unlocked());
    assert!(!engine
        .check_navigation("https://b.com/", "b.com")
        .await?
        .is_unlocked());

    Ok(())
}

#[tokio::test]
async fn test_master_password_unlocks_any_scope() -> anyhow::Result<()> {
    let engine = engine().await;
    engine.lock_scope("a.com", "site-password").await?;
    engine.set_master_password("master-password").await?;

    let mut flow = blocked(engine.check_navigation("https://a.com/", "a.com").await?);
    let mut presenter = RecordingPresenter::default();
    engine.present(&mut flow, &mut presenter);
    engine.submit(&mut flow, "master-password", &mut presenter);

    assert_eq!(presenter.calls, vec!["present:a.com", "dismiss"]);

    Ok(())
}

#[tokio::test]
async fn test_clearing_master_keeps_scope_passwords_working() -> anyhow::Result<()> {
    let engine = engine().await;
    engine.lock_scope("a.com", "site-password").await?;
    engine.set_master_password("master-password").await?;
    engine.clear_master_password().await?;

    // Lock entry survived the clear
    let mut flow = blocked(engine.check_navigation("https://a.com/", "a.com").await?);
    assert!(flow.challenge().master_hash.is_none());

    // The old master no longer unlocks; the scope's own password still does
    let mut presenter = RecordingPresenter::default();
    engine.present(&mut flow, &mut presenter);
    engine.submit(&mut flow, "master-password", &mut presenter);
    engine.submit(&mut flow, "site-password", &mut presenter);

    assert_eq!(
        presenter.calls,
        vec!["present:a.com", "failure", "dismiss"]
    );

    Ok(())
}

#[tokio::test]
async fn test_rejection_permits_unlimited_retries() -> anyhow::Result<()> {
    let engine = engine().await;
    engine.lock_scope("a.com", "secret").await?;

    let mut flow = blocked(engine.check_navigation("https://a.com/", "a.com").await?);
    let mut presenter = RecordingPresenter::default();
    engine.present(&mut flow, &mut presenter);

    for _ in 0..5 {
        engine.submit(&mut flow, "wrong", &mut presenter);
    }
    engine.submit(&mut flow, "secret", &mut presenter);

    let failures = presenter.calls.iter().filter(|c| *c == "failure").count();
    assert_eq!(failures, 5);
    assert_eq!(presenter.calls.last().unwrap(), "dismiss");

    Ok(())
}

#[tokio::test]
async fn test_reload_action_reaches_presenter() -> anyhow::Result<()> {
    let engine = engine().await;
    engine.lock_scope("a.com", "secret").await?;

    let mut flow = blocked(engine.check_navigation("https://a.com/", "a.com").await?);
    let mut presenter = RecordingPresenter::default();
    engine.present(&mut flow, &mut presenter);
    engine.reload(&mut flow, &mut presenter);

    assert_eq!(presenter.calls, vec!["present:a.com", "reload"]);

    Ok(())
}

#[tokio::test]
async fn test_removing_a_lock_unblocks_navigation() -> anyhow::Result<()> {
    let engine = engine().await;
    engine.lock_scope("a.com", "secret").await?;
    engine.unlock_scope("a.com").await?;

    assert!(engine
        .check_navigation("https://a.com/", "a.com")
        .await?
        .is_unlocked());

    // Removing again reports not-found
    let err = engine.unlock_scope("a.com").await.unwrap_err();
    assert!(matches!(err, LockerError::NotFound(_)));

    Ok(())
}

#[tokio::test]
async fn test_relocking_replaces_the_password() -> anyhow::Result<()> {
    let engine = engine().await;
    engine.lock_scope("a.com", "old-password").await?;
    engine.lock_scope("a.com", "new-password").await?;

    let mut flow = blocked(engine.check_navigation("https://a.com/", "a.com").await?);
    let mut presenter = RecordingPresenter::default();
    engine.present(&mut flow, &mut presenter);
    engine.submit(&mut flow, "old-password", &mut presenter);
    engine.submit(&mut flow, "new-password", &mut presenter);

    assert_eq!(
        presenter.calls,
        vec!["present:a.com", "failure", "dismiss"]
    );

    Ok(())
}

#[tokio::test]
async fn test_locks_survive_reopening_a_sled_store() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;

    {
        let store = Arc::new(SledKeyValueStore::open(dir.path())?);
        let registry = LockRegistry::open(store).await?;
        let session = SessionUnlockCache::new(Arc::new(MemorySessionStore::new()));
        let engine = LockEngine::new(registry, session);
        engine.lock_scope("a.com", "secret").await?;
    }

    let store = Arc::new(SledKeyValueStore::open(dir.path())?);
    let registry = LockRegistry::open(store).await?;
    // A fresh session store: durable locks persist, session unlocks do not
    let session = SessionUnlockCache::new(Arc::new(MemorySessionStore::new()));
    let engine = LockEngine::new(registry, session);

    let outcome = engine.check_navigation("https://a.com/", "a.com").await?;
    assert!(!outcome.is_unlocked());

    Ok(())
}
