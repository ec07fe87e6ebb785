//! End-to-end tests for the vault service.
//!
//! Records go through the real cipher into an in-memory store; tests then
//! check what an observer of the holder and the store can see.

use std::sync::{Arc, Mutex};

use keepsake_core::{
    ItemId, MemoryStore, RecordStore, SecretPayload, SessionKeyHolder, SimEnv, StoreError,
    VaultError, VaultItem, VaultService,
};
use keepsake_crypto::{Cipher, KdfParams, decrypt};

/// Cheap key derivation so tests stay fast.
fn cipher() -> Cipher {
    Cipher::with_params(KdfParams::new(16).unwrap())
}

fn service_on<S: RecordStore>(store: S) -> VaultService<S> {
    VaultService::with_cipher(store, Arc::new(SessionKeyHolder::new()), cipher())
}

fn memory_service() -> VaultService<MemoryStore<SimEnv>> {
    service_on(MemoryStore::with_env(SimEnv::with_seed(99)))
}

#[test]
fn credential_roundtrip_and_wrong_key() {
    let service = memory_service();
    service.holder().unlock("my-super-secret-key").unwrap();
    let item = service
        .create("Server", &SecretPayload::password("root", "secure_password_123"))
        .unwrap();

    let loaded = service.load().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].payload, SecretPayload::password("root", "secure_password_123"));

    service.holder().unlock("wrong-key").unwrap();
    let result = service.load();

    assert!(matches!(result, Err(VaultError::WrongPassphrase)));
    assert!(result.is_err_and(|err| err.is_retryable()));
    assert!(!service.holder().is_unlocked(), "wrong key must leave the holder locked");
    assert!(decrypt(&item.content, "wrong-key").is_none());

    // Retry with the right passphrase succeeds and the record is untouched.
    service.holder().unlock("my-super-secret-key").unwrap();
    assert_eq!(service.load().unwrap()[0].item, item);
}

#[test]
fn empty_vault_trusts_any_passphrase() {
    let service = memory_service();
    service.holder().unlock("anything").unwrap();

    assert_eq!(service.load().unwrap(), Vec::new());
    assert!(service.holder().is_unlocked());

    // The first record written becomes the verifier for later unlocks.
    service.create("first", &SecretPayload::note("hello")).unwrap();
    service.holder().unlock("something-else").unwrap();
    assert!(matches!(service.load(), Err(VaultError::WrongPassphrase)));
}

#[test]
fn records_under_an_older_key_are_hidden() {
    let store = MemoryStore::with_env(SimEnv::with_seed(5));
    let foreign = VaultItem {
        id: ItemId::new(7),
        title: "old".into(),
        is_encrypted: true,
        content: cipher()
            .encrypt(SecretPayload::note("old secret").to_plaintext().unwrap(), "previous")
            .unwrap(),
        created_at: 0,
    };
    store.insert(foreign);

    let service = service_on(store);
    service.holder().unlock("current").unwrap();
    // Newest record is written under the current key and verifies it.
    service.create("new", &SecretPayload::note("new secret")).unwrap();

    let loaded = service.load().unwrap();

    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].payload, SecretPayload::note("new secret"));
    assert!(service.holder().is_unlocked());
}

#[test]
fn lock_blocks_further_operations() {
    let service = memory_service();
    service.holder().unlock("k").unwrap();
    let item = service.create("t", &SecretPayload::note("n")).unwrap();

    service.holder().lock();

    assert!(matches!(service.load(), Err(VaultError::Locked)));
    assert!(matches!(service.get(item.id), Err(VaultError::Locked)));
    assert!(matches!(
        service.update(item.id, "t", &SecretPayload::note("x")),
        Err(VaultError::Locked)
    ));
    assert!(matches!(service.delete(item.id), Err(VaultError::Locked)));
}

#[test]
fn delete_removes_from_views() {
    let service = memory_service();
    service.holder().unlock("k").unwrap();
    let keep = service.create("keep", &SecretPayload::link("https://a.example", None)).unwrap();
    let gone = service.create("gone", &SecretPayload::note("bye")).unwrap();

    service.delete(gone.id).unwrap();

    let rest = service.notes_and_links().unwrap();
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0].item.id, keep.id);
    assert!(matches!(
        service.delete(gone.id),
        Err(VaultError::Store(StoreError::NotFound { .. }))
    ));
}

/// Store that lets the test run code between the key capture and the
/// verification of a `load`.
#[derive(Clone)]
struct InterleavingStore {
    inner: MemoryStore<SimEnv>,
    on_list: Arc<Mutex<Option<Box<dyn FnOnce() + Send>>>>,
}

impl RecordStore for InterleavingStore {
    fn list(&self) -> Result<Vec<VaultItem>, StoreError> {
        let hook = self.on_list.lock().unwrap().take();
        if let Some(hook) = hook {
            hook();
        }
        self.inner.list()
    }

    fn create(&self, title: &str, content: &str) -> Result<VaultItem, StoreError> {
        self.inner.create(title, content)
    }

    fn update(&self, id: ItemId, title: &str, content: &str) -> Result<VaultItem, StoreError> {
        self.inner.update(id, title, content)
    }

    fn delete(&self, id: ItemId) -> Result<(), StoreError> {
        self.inner.delete(id)
    }
}

#[test]
fn failed_verification_keeps_newer_unlock() {
    let store = InterleavingStore {
        inner: MemoryStore::with_env(SimEnv::with_seed(3)),
        on_list: Arc::new(Mutex::new(None)),
    };
    let service = service_on(store.clone());

    service.holder().unlock("right").unwrap();
    service.create("t", &SecretPayload::note("n")).unwrap();

    // A wrong unlock starts loading; the user unlocks again correctly before
    // the first verification finishes.
    service.holder().unlock("wrong").unwrap();
    let holder = Arc::clone(service.holder());
    *store.on_list.lock().unwrap() = Some(Box::new(move || {
        holder.unlock("right").unwrap();
    }));

    assert!(matches!(service.load(), Err(VaultError::WrongPassphrase)));
    assert!(service.holder().is_unlocked(), "newer unlock must survive");
    assert_eq!(service.load().unwrap().len(), 1);
}

#[test]
fn load_for_superseded_generation_skips_the_store() {
    let store = InterleavingStore {
        inner: MemoryStore::with_env(SimEnv::with_seed(4)),
        on_list: Arc::new(Mutex::new(None)),
    };
    let service = service_on(store.clone());

    let stale = service.holder().unlock("first").unwrap();
    service.create("t", &SecretPayload::note("n")).unwrap();
    let current = service.holder().unlock("first").unwrap();

    let listed = Arc::new(Mutex::new(false));
    let flag = Arc::clone(&listed);
    *store.on_list.lock().unwrap() = Some(Box::new(move || *flag.lock().unwrap() = true));

    assert_eq!(service.load_for(stale).unwrap(), None);
    assert!(!*listed.lock().unwrap(), "superseded fetch must not list");

    let records = service.load_for(current).unwrap().unwrap();
    assert_eq!(records.len(), 1);
    assert!(*listed.lock().unwrap());
}

#[test]
fn load_for_keeps_records_under_the_captured_key() {
    let store = InterleavingStore {
        inner: MemoryStore::with_env(SimEnv::with_seed(6)),
        on_list: Arc::new(Mutex::new(None)),
    };
    let service = service_on(store.clone());

    let generation = service.holder().unlock("right").unwrap();
    service.create("t", &SecretPayload::note("n")).unwrap();

    // Another unlock lands while the records for `generation` are in flight.
    let holder = Arc::clone(service.holder());
    *store.on_list.lock().unwrap() = Some(Box::new(move || {
        holder.unlock("wrong").unwrap();
    }));

    let records = service.load_for(generation).unwrap().unwrap();
    assert_eq!(records[0].payload, SecretPayload::note("n"));
    assert_ne!(service.holder().generation(), Some(generation));

    service.holder().lock();
    assert_eq!(service.load_for(generation).unwrap(), None);
}
