//! Lazy passphrase verification.
//!
//! [`SessionKeyHolder::unlock`] accepts any string. Whether it was the right
//! one is established the first time real ciphertext is fetched: the first
//! record is decrypted under the held key, and failure means the key was
//! wrong. With no records there is nothing to check and the key is trusted
//! provisionally.
//!
//! The decision (expose or re-lock) completes before any record is returned,
//! so unverified plaintext is never observable.

use keepsake_crypto::{Plaintext, decrypt};

use crate::{
    error::VaultError,
    item::{UnlockedItem, VaultItem},
    payload::SecretPayload,
    session::{Generation, SessionKey, SessionKeyHolder},
};

/// Outcome of checking a passphrase against fetched records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// The first record decrypted under the key.
    Verified,
    /// No records exist; the key is provisionally trusted.
    Unverifiable,
    /// The first record did not decrypt; the key is wrong.
    WrongPassphrase,
}

/// Check `key` against the first record.
pub fn verify_key(key: &SessionKey, records: &[VaultItem]) -> Verification {
    match records.first() {
        None => Verification::Unverifiable,
        Some(first) => check_first(key, first).0,
    }
}

/// Decrypt the verification record, keeping the plaintext so it is not
/// derived twice.
fn check_first(key: &SessionKey, first: &VaultItem) -> (Verification, Option<Plaintext>) {
    match decrypt(&first.content, key.expose()) {
        Some(plaintext) => (Verification::Verified, Some(plaintext)),
        None => (Verification::WrongPassphrase, None),
    }
}

/// Verify the held key against `records`, then decrypt them.
///
/// On a wrong passphrase the holder is locked, but only if it still holds
/// the key that was checked; a newer unlock racing this call is left alone.
///
/// After verification, records that still fail to decrypt or that hold an
/// unrecognised payload are skipped and logged rather than exposed.
///
/// # Errors
///
/// - `Locked`: no key is held
/// - `WrongPassphrase`: the first record did not decrypt
pub fn open_records(
    holder: &SessionKeyHolder,
    records: Vec<VaultItem>,
) -> Result<Vec<UnlockedItem>, VaultError> {
    let (generation, key) = holder.current_key().ok_or(VaultError::Locked)?;
    open_records_with_key(holder, generation, &key, records)
}

/// [`open_records`] with a key captured earlier, at the start of the
/// operation that fetched `records`.
///
/// If the holder was unlocked again since `generation` was captured, a
/// failed verification leaves the newer key in place.
///
/// # Errors
///
/// - `WrongPassphrase`: the first record did not decrypt under `key`
pub fn open_records_with_key(
    holder: &SessionKeyHolder,
    generation: Generation,
    key: &SessionKey,
    records: Vec<VaultItem>,
) -> Result<Vec<UnlockedItem>, VaultError> {
    let mut records = records.into_iter();
    let Some(first) = records.next() else {
        tracing::debug!("no records to verify against, passphrase trusted provisionally");
        return Ok(Vec::new());
    };

    let (verification, plaintext) = check_first(key, &first);
    if verification == Verification::WrongPassphrase {
        holder.lock_if_current(generation);
        tracing::warn!(id = %first.id, "passphrase failed verification, vault locked");
        return Err(VaultError::WrongPassphrase);
    }

    let mut unlocked = Vec::with_capacity(records.len() + 1);
    let payload = plaintext.and_then(|plaintext| SecretPayload::from_plaintext(&plaintext));
    push_payload(&mut unlocked, first, payload);

    for item in records {
        let payload = decrypt(&item.content, key.expose())
            .and_then(|plaintext| SecretPayload::from_plaintext(&plaintext));
        push_payload(&mut unlocked, item, payload);
    }

    Ok(unlocked)
}

fn push_payload(out: &mut Vec<UnlockedItem>, item: VaultItem, payload: Option<SecretPayload>) {
    match payload {
        Some(payload) => out.push(UnlockedItem { item, payload }),
        None => tracing::warn!(id = %item.id, "record could not be opened, skipping"),
    }
}
