//! Vault error types.

use keepsake_crypto::CipherError;
use thiserror::Error;

use crate::store::StoreError;

/// Errors surfaced by vault operations.
#[derive(Debug, Error)]
pub enum VaultError {
    /// No passphrase is held.
    ///
    /// Recoverable: prompt for the passphrase and retry.
    #[error("vault is locked")]
    Locked,

    /// The held passphrase could not decrypt the vault's records.
    ///
    /// The holder has already been locked. Transient: the user may try
    /// unlocking again. Records are untouched.
    #[error("wrong master passphrase, try unlocking again")]
    WrongPassphrase,

    /// An empty passphrase was offered for unlocking.
    #[error("passphrase is empty")]
    EmptyPassphrase,

    /// Records need a title.
    #[error("title is empty")]
    EmptyTitle,

    /// Encryption rejected its input.
    #[error(transparent)]
    Cipher(#[from] CipherError),

    /// The record store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl VaultError {
    /// Whether re-entering the passphrase may resolve the error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Locked | Self::WrongPassphrase | Self::EmptyPassphrase)
    }
}
