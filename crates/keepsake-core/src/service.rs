//! Vault item service.
//!
//! Moves records between the cipher and the record store. Every operation
//! captures the session key at entry; a concurrent lock does not affect an
//! operation already in flight, and the next operation sees `Locked`.

use std::sync::Arc;

use keepsake_crypto::{Cipher, Entropy, OsEntropy};

use crate::{
    error::VaultError,
    item::{ItemId, UnlockedItem, VaultItem, filter_kinds},
    payload::{SecretKind, SecretPayload},
    session::{Generation, SessionKey, SessionKeyHolder},
    store::{RecordStore, StoreError},
    verify::open_records_with_key,
};

/// Encrypting front for a [`RecordStore`].
#[derive(Debug, Clone)]
pub struct VaultService<S, R = OsEntropy> {
    store: S,
    holder: Arc<SessionKeyHolder>,
    cipher: Cipher<R>,
}

impl<S: RecordStore> VaultService<S> {
    /// Service with default key-derivation parameters.
    pub fn new(store: S, holder: Arc<SessionKeyHolder>) -> Self {
        Self::with_cipher(store, holder, Cipher::new())
    }
}

impl<S: RecordStore, R: Entropy> VaultService<S, R> {
    /// Service encrypting with `cipher`.
    pub fn with_cipher(store: S, holder: Arc<SessionKeyHolder>, cipher: Cipher<R>) -> Self {
        Self { store, holder, cipher }
    }

    /// The shared session key holder.
    pub fn holder(&self) -> &Arc<SessionKeyHolder> {
        &self.holder
    }

    /// The underlying record store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Encrypt `payload` and store it under `title`.
    ///
    /// # Errors
    ///
    /// - `EmptyTitle`: `title` is blank
    /// - `Locked`: no passphrase is held
    /// - `Cipher`, `Store`: encryption or persistence failed
    pub fn create(&self, title: &str, payload: &SecretPayload) -> Result<VaultItem, VaultError> {
        let title = checked_title(title)?;
        let content = self.seal(payload)?;

        let item = self.store.create(title, &content)?;
        tracing::debug!(id = %item.id, kind = %payload.kind(), "record created");
        Ok(item)
    }

    /// Re-encrypt `payload` into an existing record.
    ///
    /// # Errors
    ///
    /// As [`create`](Self::create), plus `Store(NotFound)` for an unknown id.
    pub fn update(
        &self,
        id: ItemId,
        title: &str,
        payload: &SecretPayload,
    ) -> Result<VaultItem, VaultError> {
        let title = checked_title(title)?;
        let content = self.seal(payload)?;

        let item = self.store.update(id, title, &content)?;
        tracing::debug!(%id, kind = %payload.kind(), "record updated");
        Ok(item)
    }

    /// Remove a record.
    ///
    /// Requires an unlocked vault even though nothing is decrypted.
    pub fn delete(&self, id: ItemId) -> Result<(), VaultError> {
        self.key()?;
        self.store.delete(id)?;
        tracing::debug!(%id, "record deleted");
        Ok(())
    }

    /// Fetch, verify and decrypt every record, newest first.
    ///
    /// # Errors
    ///
    /// - `Locked`: no passphrase is held
    /// - `WrongPassphrase`: the held passphrase failed verification; the
    ///   holder is now locked
    /// - `Store`: listing failed
    pub fn load(&self) -> Result<Vec<UnlockedItem>, VaultError> {
        let (generation, key) = self.captured_key()?;
        let records = self.store.list()?;
        open_records_with_key(&self.holder, generation, &key, records)
    }

    /// [`load`](Self::load) pinned to one unlock.
    ///
    /// Returns `Ok(None)` without touching the store when the holder no
    /// longer holds the key of `generation`. Records returned always belong
    /// to that key.
    ///
    /// # Errors
    ///
    /// As [`load`](Self::load), except that a locked holder is `Ok(None)`.
    pub fn load_for(
        &self,
        generation: Generation,
    ) -> Result<Option<Vec<UnlockedItem>>, VaultError> {
        let key = match self.holder.current_key() {
            Some((current, key)) if current == generation => key,
            _ => return Ok(None),
        };
        let records = self.store.list()?;
        open_records_with_key(&self.holder, generation, &key, records).map(Some)
    }

    /// Fetch and decrypt one record.
    ///
    /// Only the verification record and the requested one are decrypted.
    ///
    /// # Errors
    ///
    /// As [`load`](Self::load), plus `Store(NotFound)` when the record does
    /// not exist or cannot be opened with the held passphrase.
    pub fn get(&self, id: ItemId) -> Result<UnlockedItem, VaultError> {
        let (generation, key) = self.captured_key()?;
        let records = self.store.list()?;
        let position =
            records.iter().position(|item| item.id == id).ok_or(StoreError::NotFound { id })?;

        let mut records = records.into_iter();
        let mut subset = Vec::with_capacity(2);
        subset.extend(records.next());
        if position > 0 {
            subset.extend(records.nth(position - 1));
        }

        open_records_with_key(&self.holder, generation, &key, subset)?
            .into_iter()
            .find(|unlocked| unlocked.item.id == id)
            .ok_or_else(|| StoreError::NotFound { id }.into())
    }

    /// Login credentials only.
    pub fn passwords(&self) -> Result<Vec<UnlockedItem>, VaultError> {
        Ok(filter_kinds(self.load()?, &[SecretKind::Password]))
    }

    /// Notes and links, everything but credentials.
    pub fn notes_and_links(&self) -> Result<Vec<UnlockedItem>, VaultError> {
        Ok(filter_kinds(self.load()?, &[SecretKind::Note, SecretKind::Link]))
    }

    fn captured_key(&self) -> Result<(Generation, SessionKey), VaultError> {
        self.holder.current_key().ok_or(VaultError::Locked)
    }

    fn key(&self) -> Result<SessionKey, VaultError> {
        self.captured_key().map(|(_, key)| key)
    }

    fn seal(&self, payload: &SecretPayload) -> Result<String, VaultError> {
        let key = self.key()?;
        Ok(self.cipher.encrypt(payload.to_plaintext()?, key.expose())?)
    }
}

fn checked_title(title: &str) -> Result<&str, VaultError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(VaultError::EmptyTitle);
    }
    Ok(title)
}
