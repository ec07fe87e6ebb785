//! Integration tests for the Runtime against a real cipher and store.
//!
//! # Oracle Pattern
//!
//! Tests end with oracle checks that verify:
//! - The App view agrees with the session key holder
//! - Notices shown match what happened
//! - Nothing decrypted is rendered while locked

use std::{convert::Infallible, sync::Arc, time::Duration};

use keepsake_app::{App, Driver, Notice, Runtime, VaultView};
use keepsake_core::{
    AutoLockTimeout, Environment, MemoryStore, SecretPayload, SessionKeyHolder, SimEnv,
    VaultService,
};
use keepsake_crypto::{Cipher, KdfParams};

/// Driver that records what the runtime asked it to do.
struct RecordingDriver {
    env: SimEnv,
    /// Number of items visible at each render.
    renders: Vec<usize>,
    notices: Vec<Notice>,
    signed_out: bool,
}

impl RecordingDriver {
    fn new(env: SimEnv) -> Self {
        Self { env, renders: Vec::new(), notices: Vec::new(), signed_out: false }
    }
}

impl Driver for RecordingDriver {
    type Error = Infallible;
    type Instant = Duration;

    fn now(&self) -> Duration {
        self.env.now()
    }

    fn render(&mut self, app: &App<Duration>) -> Result<(), Infallible> {
        self.renders.push(app.view().items().len());
        Ok(())
    }

    fn notify(&mut self, notice: &Notice) -> Result<(), Infallible> {
        self.notices.push(notice.clone());
        Ok(())
    }

    fn sign_out(&mut self) -> Result<(), Infallible> {
        self.signed_out = true;
        Ok(())
    }
}

type TestRuntime = Runtime<MemoryStore<SimEnv>, RecordingDriver>;

/// Runtime over a store seeded with two records written under `passphrase`.
fn runtime_with_records(env: &SimEnv, passphrase: &str) -> TestRuntime {
    let service = VaultService::with_cipher(
        MemoryStore::with_env(env.clone()),
        Arc::new(SessionKeyHolder::new()),
        Cipher::with_params(KdfParams::new(16).unwrap()),
    );

    service.holder().unlock(passphrase).unwrap();
    service.create("Server", &SecretPayload::password("root", "secure_password_123")).unwrap();
    service.create("Todo", &SecretPayload::note("buy milk")).unwrap();
    service.holder().lock();

    Runtime::new(service, RecordingDriver::new(env.clone()), AutoLockTimeout::from_millis(60_000))
}

/// Oracle: the App shows records exactly when the holder holds a key.
fn assert_consistent(runtime: &TestRuntime) {
    let holder_unlocked = runtime.service().holder().is_unlocked();
    let view = runtime.app().view();
    if view.is_unlocked() {
        assert!(holder_unlocked, "records visible while holder is locked");
    }
    if matches!(view, VaultView::Locked) {
        assert!(!holder_unlocked, "holder still unlocked behind a locked view");
    }
}

#[test]
fn right_passphrase_shows_records() {
    let env = SimEnv::with_seed(1);
    let mut runtime = runtime_with_records(&env, "my-super-secret-key");

    runtime.unlock("my-super-secret-key").unwrap();

    assert!(runtime.app().is_unlocked());
    assert_eq!(runtime.app().view().items().len(), 2);
    assert_eq!(runtime.driver().renders.last(), Some(&2));
    assert!(runtime.driver().notices.is_empty());
    assert_consistent(&runtime);
}

#[test]
fn wrong_passphrase_relocks_without_exposing_records() {
    let env = SimEnv::with_seed(2);
    let mut runtime = runtime_with_records(&env, "my-super-secret-key");

    runtime.unlock("wrong-key").unwrap();

    assert_eq!(runtime.app().view(), &VaultView::Locked);
    assert!(!runtime.service().holder().is_unlocked());
    assert_eq!(runtime.driver().notices, vec![Notice::WrongPassphrase]);
    assert!(runtime.driver().renders.iter().all(|&visible| visible == 0));
    assert_consistent(&runtime);

    // Retrying with the right passphrase works.
    runtime.unlock("my-super-secret-key").unwrap();
    assert!(runtime.app().is_unlocked());
    assert_consistent(&runtime);
}

#[test]
fn empty_vault_unlocks_with_any_passphrase() {
    let env = SimEnv::with_seed(3);
    let service = VaultService::with_cipher(
        MemoryStore::with_env(env.clone()),
        Arc::new(SessionKeyHolder::new()),
        Cipher::with_params(KdfParams::new(16).unwrap()),
    );
    let mut runtime =
        Runtime::new(service, RecordingDriver::new(env), AutoLockTimeout::DEFAULT);

    runtime.unlock("anything").unwrap();

    assert!(runtime.app().is_unlocked());
    assert!(runtime.app().view().items().is_empty());
    assert_consistent(&runtime);
}

#[test]
fn auto_lock_after_hidden_timeout() {
    let env = SimEnv::with_seed(4);
    let mut runtime = runtime_with_records(&env, "k");
    runtime.unlock("k").unwrap();

    runtime.hidden().unwrap();
    env.advance(Duration::from_secs(59));
    runtime.tick().unwrap();
    assert!(runtime.app().is_unlocked());

    env.advance(Duration::from_secs(1));
    runtime.tick().unwrap();

    assert!(!runtime.app().is_unlocked());
    assert!(!runtime.service().holder().is_unlocked());
    assert_eq!(runtime.driver().notices, vec![Notice::AutoLocked]);
    assert_consistent(&runtime);
}

#[test]
fn returning_before_timeout_keeps_vault_open() {
    let env = SimEnv::with_seed(5);
    let mut runtime = runtime_with_records(&env, "k");
    runtime.unlock("k").unwrap();

    runtime.hidden().unwrap();
    env.advance(Duration::from_secs(30));
    runtime.visible().unwrap();
    env.advance(Duration::from_secs(600));
    runtime.tick().unwrap();

    assert!(runtime.app().is_unlocked());
    assert_consistent(&runtime);
}

#[test]
fn logout_signs_out_and_locks() {
    let env = SimEnv::with_seed(6);
    let mut runtime = runtime_with_records(&env, "k");
    runtime.unlock("k").unwrap();

    runtime.dispatch(keepsake_app::AppEvent::LogoutRequested).unwrap();

    assert!(runtime.driver().signed_out);
    assert!(!runtime.service().holder().is_unlocked());
    assert_consistent(&runtime);
}

#[test]
fn refresh_picks_up_new_records() {
    let env = SimEnv::with_seed(7);
    let mut runtime = runtime_with_records(&env, "k");
    runtime.unlock("k").unwrap();

    runtime.service().create("Blog", &SecretPayload::link("https://example.com", None)).unwrap();
    runtime.dispatch(keepsake_app::AppEvent::RefreshRequested).unwrap();

    assert_eq!(runtime.app().view().items().len(), 3);
    assert_consistent(&runtime);
}
